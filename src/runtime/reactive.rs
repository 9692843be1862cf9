//! Reactive tracker: text bindings, reactive elements and attribute bindings.
//!
//! Text bindings are re-resolved by [`notify_reactive_text_nodes`]. Attribute
//! bindings listen for the update event on their element;
//! [`notify_reactive_elements`] delivers that event to every tracked element.
//! Both passes prune nodes that are no longer connected to the document.

use std::fmt;
use std::rc::Rc;

use tracing::{debug, error, trace};

use super::registry::Registry;
use crate::dom::node::NodeId;
use crate::dom::tree::Dom;
use crate::error::{DomError, EvalError};
use crate::event::Event;
use crate::modifier::Resolver;

/// Writes a resolved value onto an element.
pub type AttributeApplyFn = Rc<dyn Fn(&mut Dom, NodeId, &str, String) -> Result<(), DomError>>;

/// An attribute (or property-like key) kept in sync with a resolver.
#[derive(Clone)]
pub struct ReactiveAttributeBinding {
    pub element: NodeId,
    pub key: String,
    pub resolver: Resolver,
    apply: AttributeApplyFn,
}

impl ReactiveAttributeBinding {
    /// Bind `name` on `element`, writing the value with `set_attribute`.
    pub fn new(element: NodeId, name: &str, resolver: Resolver) -> Self {
        Self {
            element,
            key: name.to_owned(),
            resolver,
            apply: Rc::new(|dom, element, key, value| {
                dom.set_attribute(element, key, value).map(|_| ())
            }),
        }
    }

    /// Replace the applier, e.g. to write a style entry instead of an attribute.
    pub fn with_apply(
        mut self,
        apply: impl Fn(&mut Dom, NodeId, &str, String) -> Result<(), DomError> + 'static,
    ) -> Self {
        self.apply = Rc::new(apply);
        self
    }

    /// Resolve and write the current value.
    pub fn refresh(&self, dom: &mut Dom) -> Result<(), EvalError> {
        let value = self.resolver.resolve()?;
        (self.apply)(dom, self.element, &self.key, value)
            .map_err(|err| EvalError::new(err.to_string()))
    }
}

impl fmt::Debug for ReactiveAttributeBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveAttributeBinding")
            .field("element", &self.element)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// Apply `binding` once, re-apply it on every `event_name` event reaching the
/// element, and track the element as reactive.
///
/// A failing first resolution is logged and leaves the attribute unset.
pub fn bind_attribute(
    dom: &mut Dom,
    registry: &mut Registry,
    event_name: &str,
    binding: ReactiveAttributeBinding,
) -> Result<(), DomError> {
    let element = binding.element;
    if !dom.contains(element) {
        return Err(DomError::NotFound(element));
    }
    if let Err(err) = binding.refresh(dom) {
        error!(key = %binding.key, "reactive attribute failed on first render: {err}");
    }
    dom.add_event_listener(element, event_name, move |dom, _event| binding.refresh(dom))?;
    registry.track_element(element);
    Ok(())
}

/// Re-resolve every tracked text node.
///
/// Disconnected nodes are dropped from the registry. A failing resolver is
/// logged and its node keeps the previous value. Returns the number of nodes
/// whose content was written.
pub fn notify_reactive_text_nodes(dom: &mut Dom, registry: &mut Registry) -> usize {
    let mut written = 0;
    let before = registry.texts.len();
    registry.texts.retain(|binding| {
        if !dom.is_connected(binding.node) {
            return false;
        }
        match binding.resolver.resolve() {
            Ok(value) => match dom.set_text_content(binding.node, value) {
                Ok(()) => written += 1,
                Err(err) => error!(node = ?binding.node, "failed to write reactive text: {err}"),
            },
            Err(err) => error!(node = ?binding.node, "reactive text resolver failed: {err}"),
        }
        true
    });
    let pruned = before - registry.texts.len();
    if pruned > 0 {
        debug!(pruned, "pruned disconnected reactive text nodes");
    }
    trace!(written, "reactive text notified");
    written
}

/// Dispatch a bubbling `event_name` event to every connected reactive element.
///
/// Disconnected elements are dropped from the registry. Returns the number of
/// elements notified.
pub fn notify_reactive_elements(dom: &mut Dom, registry: &mut Registry, event_name: &str) -> usize {
    let before = registry.reactive_element_count();
    registry.retain_elements(|element| dom.is_connected(element));
    let pruned = before - registry.reactive_element_count();
    if pruned > 0 {
        debug!(pruned, "pruned disconnected reactive elements");
    }

    // Listeners may bind new elements; only the ones tracked now are notified.
    let elements = registry.elements.clone();
    for &element in &elements {
        let outcome = dom.dispatch_event(element, Event::bubbling(event_name));
        if !outcome.is_clean() {
            debug!(?element, failures = outcome.failures, "update listeners failed");
        }
    }
    elements.len()
}
