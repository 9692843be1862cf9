//! Reconciliation runtimes: lists, `when` chains, toggle elements, and the
//! reactive bindings refreshed by every update.

pub mod list;
pub mod marker;
pub mod reactive;
pub mod registry;
pub mod toggle;
pub mod when;

pub use list::{list, Rendered};
pub use marker::Markers;
pub use reactive::ReactiveAttributeBinding;
pub use registry::{Registry, RuntimeKind};
pub use toggle::placeholder_text;
pub use when::{when, WhenBuilder};
