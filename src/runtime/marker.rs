//! Marker pairs: two comment nodes bounding a dynamic region inside a parent.
//!
//! The region is everything strictly between `start` and `end`. Siblings
//! outside the pair belong to the parent and are never touched.

use crate::dom::node::NodeId;
use crate::dom::tree::Dom;
use crate::error::DomError;
use crate::modifier::Slot;

/// Sentinel comments delimiting a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Markers {
    pub start: NodeId,
    pub end: NodeId,
}

impl Markers {
    /// Create `<prefix>-start-<id>` / `<prefix>-end` comments and insert them at `slot`.
    pub fn insert(dom: &mut Dom, slot: Slot, prefix: &str, id: u64) -> Result<Self, DomError> {
        let start = dom.create_comment(format!("{prefix}-start-{id}"));
        let end = dom.create_comment(format!("{prefix}-end"));
        slot.insert(dom, start)?;
        slot.insert(dom, end)?;
        Ok(Self { start, end })
    }

    /// The parent holding the region, if the pair is still together.
    pub fn parent(&self, dom: &Dom) -> Option<NodeId> {
        let parent = dom.parent(self.start)?;
        (dom.parent(self.end) == Some(parent)).then_some(parent)
    }

    /// Whether both markers are attached to the document under one parent.
    pub fn is_connected(&self, dom: &Dom) -> bool {
        self.parent(dom).is_some() && dom.is_connected(self.start)
    }

    /// Nodes strictly between the markers, in order.
    pub fn between(&self, dom: &Dom) -> Vec<NodeId> {
        let mut nodes = Vec::new();
        let mut cursor = dom.next_sibling(self.start);
        while let Some(node) = cursor {
            if node == self.end {
                break;
            }
            nodes.push(node);
            cursor = dom.next_sibling(node);
        }
        nodes
    }

    /// Remove and free every node between the markers. Returns how many were
    /// removed.
    pub fn clear(&self, dom: &mut Dom) -> Result<usize, DomError> {
        let Some(parent) = self.parent(dom) else {
            return Ok(0);
        };
        let nodes = self.between(dom);
        for &node in &nodes {
            dom.remove_child(parent, node)?;
            dom.remove(node);
        }
        Ok(nodes.len())
    }
}
