//! The [`Ui`] context: a DOM, the registry of live runtimes, and configuration.
//!
//! Everything that renders or reconciles takes `&mut Ui`. There is no global
//! state, so independent contexts never see each other's runtimes.

use crate::config::UiConfig;
use crate::dom::node::NodeId;
use crate::dom::tree::Dom;
use crate::error::Result;
use crate::modifier::{Modifier, Slot};
use crate::runtime::registry::Registry;

/// A rendering context.
pub struct Ui {
    /// The document being rendered into.
    pub dom: Dom,
    pub(crate) registry: Registry,
    pub(crate) config: UiConfig,
    /// Source of marker ids, so marker text is deterministic per context.
    next_region: u64,
}

impl Ui {
    /// Create a context with an empty document and the default config.
    pub fn new() -> Self {
        Self::with_config(UiConfig::default())
    }

    pub fn with_config(config: UiConfig) -> Self {
        Self::with_registry(config, Registry::new())
    }

    /// Create a context around an existing registry.
    pub fn with_registry(config: UiConfig, registry: Registry) -> Self {
        Self {
            dom: Dom::new(),
            registry,
            config,
            next_region: 1,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Swap in another registry, returning the current one.
    pub fn replace_registry(&mut self, registry: Registry) -> Registry {
        std::mem::replace(&mut self.registry, registry)
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    pub(crate) fn next_region_id(&mut self) -> u64 {
        let id = self.next_region;
        self.next_region += 1;
        id
    }

    /// Mount `root` as the last child of `parent` (the body when `None`).
    ///
    /// `index` is passed to `root` if it is a function modifier. Returns the
    /// node inserted, if the modifier produced one.
    pub fn render(
        &mut self,
        root: Modifier,
        parent: Option<NodeId>,
        index: usize,
    ) -> Result<Option<NodeId>> {
        let parent = parent.unwrap_or_else(|| self.dom.body());
        self.apply_modifier(Slot::append(parent), &root, index)
    }
}

impl Default for Ui {
    fn default() -> Self {
        Self::new()
    }
}
