//! Boolean-toggle elements.
//!
//! A tag build carrying a [`Condition`] renders either the element or a
//! placeholder comment, and swaps between the two in place as the condition
//! changes. Exactly one representation is attached at any time.
//!
//! Unlike `when` branches, a failing toggle condition is treated as `false`:
//! the element is hidden and the failure is logged.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::{debug, error};

use super::registry::{NodeCell, Reconcile, RuntimeKind};
use crate::config::RenderMode;
use crate::dom::node::NodeId;
use crate::dom::tree::Dom;
use crate::error::Result;
use crate::modifier::{Condition, Modifier};
use crate::ui::Ui;

/// Text of the comment standing in for a hidden `tag`.
pub fn placeholder_text(tag: &str, mode: RenderMode) -> String {
    match mode {
        RenderMode::Ssr => format!("conditional-{tag}-ssr"),
        RenderMode::Browser | RenderMode::Hydrate => format!("conditional-{tag}-hidden"),
    }
}

pub(crate) struct ToggleRuntime {
    condition: Condition,
    tag: String,
    modifiers: Vec<Modifier>,
    /// The attached representation, shared with lists holding it as an item.
    current: NodeCell,
    shown: bool,
}

/// Build the initial representation of a toggle element and register it.
///
/// Returns the element or the placeholder, detached; the caller inserts it.
pub(crate) fn build_toggle(
    ui: &mut Ui,
    tag: &str,
    condition: Condition,
    modifiers: Vec<Modifier>,
) -> Result<NodeId> {
    let shown = evaluate(&condition, tag);
    let current = if shown {
        ui.build_element(tag, &modifiers)?
    } else {
        placeholder(ui, tag)
    };
    let cell = Rc::new(Cell::new(current));
    ui.registry.track_toggle_node(cell.clone());
    let runtime = ToggleRuntime {
        condition,
        tag: tag.to_owned(),
        modifiers,
        current: cell,
        shown,
    };
    ui.registry
        .register(RuntimeKind::Toggle, Rc::new(RefCell::new(runtime)));
    Ok(current)
}

fn evaluate(condition: &Condition, tag: &str) -> bool {
    match condition.eval() {
        Ok(value) => value,
        Err(err) => {
            error!(tag, "toggle condition failed; hiding element: {err}");
            false
        }
    }
}

fn placeholder(ui: &mut Ui, tag: &str) -> NodeId {
    let text = placeholder_text(tag, ui.config.mode);
    ui.dom.create_comment(text)
}

impl Reconcile for ToggleRuntime {
    fn is_connected(&self, dom: &Dom) -> bool {
        dom.is_connected(self.current.get())
    }

    fn reconcile(&mut self, ui: &mut Ui) -> Result<()> {
        let shown = evaluate(&self.condition, &self.tag);
        if shown == self.shown {
            return Ok(());
        }
        let current = self.current.get();
        let Some(parent) = ui.dom.parent(current) else {
            error!(tag = %self.tag, "toggle node has no parent; leaving it in place");
            return Ok(());
        };
        let next = if shown {
            match ui.build_element(&self.tag, &self.modifiers) {
                Ok(element) => element,
                Err(err) => {
                    error!(tag = %self.tag, "failed to build toggle element; keeping placeholder: {err}");
                    return Ok(());
                }
            }
        } else {
            placeholder(ui, &self.tag)
        };
        if let Err(err) = ui.dom.replace_child(parent, next, current) {
            error!(tag = %self.tag, "failed to swap toggle element: {err}");
            ui.dom.remove(next);
            return Ok(());
        }
        debug!(tag = %self.tag, shown, "toggle swapped");
        ui.dom.remove(current);
        ui.registry.retarget_toggle_node(&self.current, next);
        self.shown = shown;
        Ok(())
    }
}
