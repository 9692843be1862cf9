//! DOM event value and listener registration types.
//!
//! An [`Event`] carries routing metadata (target, current target, bubbling)
//! while it is delivered; a [`Listener`] pairs an event name with a callback.

use std::fmt;
use std::rc::Rc;

use crate::dom::node::NodeId;
use crate::dom::tree::Dom;
use crate::error::EvalError;

/// Name of the synthetic event used for explicit updates.
pub const UPDATE_EVENT: &str = "update";

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// A DOM event being delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Event type, e.g. `"update"`.
    pub name: String,
    /// Whether delivery continues to ancestors of the target.
    pub bubbles: bool,
    /// The node the event was dispatched to. Set by dispatch.
    pub target: Option<NodeId>,
    /// The node whose listeners are currently running. Set by dispatch.
    pub current_target: Option<NodeId>,
    propagation_stopped: bool,
}

impl Event {
    /// A non-bubbling event.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bubbles: false,
            target: None,
            current_target: None,
            propagation_stopped: false,
        }
    }

    /// A bubbling event.
    pub fn bubbling(name: impl Into<String>) -> Self {
        Self {
            bubbles: true,
            ..Self::new(name)
        }
    }

    /// Stop delivery to further ancestors. Listeners on the current node still run.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

// ---------------------------------------------------------------------------
// Listener
// ---------------------------------------------------------------------------

/// Listener callback. Failures are logged by the dispatcher, never propagated.
pub type ListenerFn = Rc<dyn Fn(&mut Dom, &mut Event) -> Result<(), EvalError>>;

/// A registered event listener.
#[derive(Clone)]
pub struct Listener {
    pub name: String,
    pub callback: ListenerFn,
}

impl Listener {
    pub fn new(
        name: impl Into<String>,
        callback: impl Fn(&mut Dom, &mut Event) -> Result<(), EvalError> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            callback: Rc::new(callback),
        }
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener").field("name", &self.name).finish()
    }
}
