//! # splice-dom
//!
//! Explicit-update DOM reconciliation over an arena DOM.
//!
//! Markup is built from [`Modifier`] values. Dynamic parts render into regions
//! bounded by comment markers and are brought up to date by calling
//! [`Ui::update`]; nothing re-renders on its own.
//!
//! ## Core Systems
//!
//! - **[`dom`]**: slotmap-backed DOM arena with DOM mutation semantics
//! - **[`event`]**: DOM events, listeners and bubbling dispatch
//! - **[`modifier`]**: tag builder and modifier application
//! - **[`runtime`]**: list regions, `when` chains, toggle elements, reactive bindings
//! - **[`update`]**: the update orchestrator
//! - **[`testing`]**: markup serialization and a headless pilot
//!
//! ```ignore
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use splice_dom::{el, list, text, Ui};
//!
//! let todos = Rc::new(RefCell::new(vec![Rc::new("milk".to_owned())]));
//! let source = todos.clone();
//!
//! let mut ui = Ui::new();
//! ui.render(
//!     el("ul", [list(
//!         move || source.borrow().clone(),
//!         |ui, item, _| Ok(ui.build("li", &[text(item.as_str())])?.into()),
//!     )]),
//!     None,
//!     0,
//! )?;
//!
//! todos.borrow_mut().push(Rc::new("eggs".to_owned()));
//! ui.update()?;
//! ```

// Foundation
pub mod config;
pub mod error;

// Core systems
pub mod dom;
pub mod event;
pub mod modifier;

// Reconciliation
pub mod runtime;
pub mod ui;
pub mod update;

// Test support
pub mod testing;

pub use config::{RenderMode, UiConfig, WhenRerender};
pub use dom::{Dom, NodeData, NodeId, NodeKind};
pub use error::{DomError, Error, EvalError, Result};
pub use event::Event;
pub use modifier::{
    apply, attr, condition, el, node, reactive_attr, reactive_text, text, AttrValue, Condition, Modifier,
    Resolver, Slot,
};
pub use runtime::{list, when, Rendered, WhenBuilder};
pub use ui::Ui;
