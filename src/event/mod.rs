//! DOM events: event values, listener storage, bubbling dispatch.

pub mod handler;
pub mod message;

pub use handler::{bubble_path, DispatchOutcome};
pub use message::{Event, Listener, ListenerFn, UPDATE_EVENT};
