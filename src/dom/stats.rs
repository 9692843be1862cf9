//! Mutation counters for the structural DOM operations.

use std::ops::Sub;

/// Counts of successful structural operations performed on a [`Dom`](super::Dom).
///
/// Attribute and character-data writes are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationStats {
    pub append_child: usize,
    pub insert_before: usize,
    pub remove_child: usize,
    pub replace_child: usize,
}

impl MutationStats {
    /// Sum of all counters.
    pub fn total(&self) -> usize {
        self.append_child + self.insert_before + self.remove_child + self.replace_child
    }

    /// Whether no structural operation was recorded.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl Sub for MutationStats {
    type Output = MutationStats;

    fn sub(self, earlier: MutationStats) -> MutationStats {
        MutationStats {
            append_child: self.append_child.saturating_sub(earlier.append_child),
            insert_before: self.insert_before.saturating_sub(earlier.insert_before),
            remove_child: self.remove_child.saturating_sub(earlier.remove_child),
            replace_child: self.replace_child.saturating_sub(earlier.replace_child),
        }
    }
}
