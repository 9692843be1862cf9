//! Event dispatch: listener registration and bubble-path delivery.
//!
//! Listeners are stored per node on the [`Dom`]. [`Dom::dispatch_event`]
//! computes the bubble path up front, so listeners that restructure the tree
//! do not change who receives the event being delivered.

use tracing::{error, trace};

use super::message::{Event, Listener};
use crate::dom::node::NodeId;
use crate::dom::tree::Dom;
use crate::error::{DomError, EvalError};

/// Result of delivering one event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Listener invocations that returned `Ok`.
    pub delivered: usize,
    /// Listener invocations that failed. Each failure was logged.
    pub failures: usize,
}

impl DispatchOutcome {
    pub fn is_clean(&self) -> bool {
        self.failures == 0
    }
}

/// Compute the bubble path from `start` up to the root (inclusive).
///
/// Returns `[start, parent, grandparent, ..., root]`.
/// If `start` does not exist in the DOM, returns an empty vec.
pub fn bubble_path(dom: &Dom, start: NodeId) -> Vec<NodeId> {
    if !dom.contains(start) {
        return Vec::new();
    }
    let mut path = vec![start];
    path.extend(dom.ancestors(start));
    path
}

impl Dom {
    /// Register a listener for events named `name` on `node`.
    pub fn add_event_listener(
        &mut self,
        node: NodeId,
        name: impl Into<String>,
        callback: impl Fn(&mut Dom, &mut Event) -> Result<(), EvalError> + 'static,
    ) -> Result<(), DomError> {
        if !self.contains(node) {
            return Err(DomError::NotFound(node));
        }
        let listener = Listener::new(name, callback);
        match self.listeners.get_mut(node) {
            Some(list) => list.push(listener),
            None => {
                self.listeners.insert(node, vec![listener]);
            }
        }
        Ok(())
    }

    /// Number of listeners for `name` registered on `node`.
    pub fn listener_count(&self, node: NodeId, name: &str) -> usize {
        self.listeners
            .get(node)
            .map_or(0, |list| list.iter().filter(|l| l.name == name).count())
    }

    /// Deliver `event` to `target`, then to its ancestors if it bubbles.
    ///
    /// Listener failures are logged and counted; delivery continues.
    pub fn dispatch_event(&mut self, target: NodeId, mut event: Event) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();
        let path = if event.bubbles {
            bubble_path(self, target)
        } else if self.contains(target) {
            vec![target]
        } else {
            Vec::new()
        };
        event.target = Some(target);

        for node in path {
            let matching: Vec<Listener> = self
                .listeners
                .get(node)
                .map(|list| {
                    list.iter()
                        .filter(|l| l.name == event.name)
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();
            event.current_target = Some(node);
            for listener in matching {
                match (listener.callback)(self, &mut event) {
                    Ok(()) => outcome.delivered += 1,
                    Err(err) => {
                        outcome.failures += 1;
                        error!(event = %event.name, ?node, "event listener failed: {err}");
                    }
                }
            }
            if event.propagation_stopped() {
                break;
            }
        }
        trace!(event = %event.name, ?target, delivered = outcome.delivered, "dispatched");
        outcome
    }
}

// ===========================================================================
// Tests
// ===========================================================================
