//! Pilot: drive a [`Ui`] through mounts and updates in tests.
//!
//! The `Pilot` owns a context, mounts modifiers into its body, runs update
//! passes, and reports how many structural DOM operations each pass made.

use crate::config::UiConfig;
use crate::dom::node::NodeId;
use crate::dom::stats::MutationStats;
use crate::error::Result;
use crate::modifier::Modifier;
use crate::ui::Ui;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A test driver around a [`Ui`].
///
/// # Examples
///
/// ```ignore
/// use splice_dom::testing::Pilot;
/// use splice_dom::{el, text};
///
/// let mut pilot = Pilot::new();
/// pilot.mount(el("p", [text("hi")]))?;
/// assert_eq!(pilot.html(), "<p>hi</p>");
/// assert!(pilot.update()?.is_empty());
/// ```
pub struct Pilot {
    ui: Ui,
}

impl Pilot {
    /// Create a pilot with a default context.
    pub fn new() -> Self {
        Self { ui: Ui::new() }
    }

    pub fn with_config(config: UiConfig) -> Self {
        Self {
            ui: Ui::with_config(config),
        }
    }

    // ── Driving ──────────────────────────────────────────────────────

    /// Render `root` at the end of the body.
    pub fn mount(&mut self, root: impl Into<Modifier>) -> Result<Option<NodeId>> {
        self.ui.render(root.into(), None, 0)
    }

    /// Run one update pass and return the structural operations it made.
    pub fn update(&mut self) -> Result<MutationStats> {
        let before = self.ui.dom.mutation_stats();
        self.ui.update()?;
        Ok(self.ui.dom.mutation_stats() - before)
    }

    // ── Query ────────────────────────────────────────────────────────

    pub fn ui(&self) -> &Ui {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut Ui {
        &mut self.ui
    }

    /// The body's inner markup.
    pub fn html(&self) -> String {
        super::snapshot::render_to_string(&self.ui)
    }

    /// The body's text content.
    pub fn text(&self) -> String {
        self.ui.dom.text_content(self.ui.dom.body())
    }
}

impl Default for Pilot {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
