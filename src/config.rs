//! Configuration for a [`Ui`](crate::Ui) context.

use crate::event::UPDATE_EVENT;

// ---------------------------------------------------------------------------
// RenderMode
// ---------------------------------------------------------------------------

/// Which environment nodes are being created for.
///
/// The arena creates the same node kinds in every mode; the mode only changes
/// the text of toggle placeholders so server output can be told apart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
    #[default]
    Browser,
    Ssr,
    Hydrate,
}

// ---------------------------------------------------------------------------
// WhenRerender
// ---------------------------------------------------------------------------

/// When a `when` region rebuilds its content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WhenRerender {
    /// Clear and rebuild the selected content on every update. Node identity
    /// inside the region is not preserved across updates.
    #[default]
    EveryUpdate,
    /// Rebuild only when a different branch is selected.
    OnBranchChange,
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Configuration for a [`Ui`](crate::Ui).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiConfig {
    pub mode: RenderMode,
    /// Prefix of list marker comments (`<prefix>-start-<n>` / `<prefix>-end`).
    pub list_marker_prefix: String,
    pub when_rerender: WhenRerender,
    /// Event used to re-evaluate reactive attributes, also dispatched to body
    /// and document at the end of every update.
    pub update_event: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            mode: RenderMode::Browser,
            list_marker_prefix: "list".to_owned(),
            when_rerender: WhenRerender::EveryUpdate,
            update_event: UPDATE_EVENT.to_owned(),
        }
    }
}

impl UiConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the render mode (builder).
    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the list marker prefix (builder).
    pub fn with_list_marker_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.list_marker_prefix = prefix.into();
        self
    }

    /// Set the `when` re-render policy (builder).
    pub fn with_when_rerender(mut self, policy: WhenRerender) -> Self {
        self.when_rerender = policy;
        self
    }

    /// Set the name of the update event (builder).
    pub fn with_update_event(mut self, name: impl Into<String>) -> Self {
        self.update_event = name.into();
        self
    }
}
