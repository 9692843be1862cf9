//! Registry of live runtimes and reactive bindings.
//!
//! Runtimes register when first rendered and are unregistered lazily, by the
//! update pass that finds their nodes detached from the document. The registry
//! is an ordinary value owned by a [`Ui`](crate::Ui), so tests can inject or
//! swap one.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use crate::dom::node::NodeId;
use crate::dom::tree::Dom;
use crate::error::Result;
use crate::modifier::Resolver;
use crate::ui::Ui;

/// A live reconciliation instance bound to a DOM region.
pub(crate) trait Reconcile {
    /// Whether the nodes this runtime owns are still attached to the document.
    fn is_connected(&self, dom: &Dom) -> bool;

    /// Bring the region in line with current data.
    fn reconcile(&mut self, ui: &mut Ui) -> Result<()>;
}

pub(crate) type RuntimeHandle = Rc<RefCell<dyn Reconcile>>;

/// The node a toggle currently shows, shared with whoever positions it.
pub(crate) type NodeCell = Rc<Cell<NodeId>>;

/// The kinds of runtime, in update order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeKind {
    List,
    When,
    Toggle,
}

/// A reactive text node and the resolver that produces its content.
#[derive(Debug, Clone)]
pub(crate) struct TextBinding {
    pub node: NodeId,
    pub resolver: Resolver,
}

/// Live runtimes and reactive bindings of one [`Ui`](crate::Ui).
#[derive(Default)]
pub struct Registry {
    lists: Vec<RuntimeHandle>,
    whens: Vec<RuntimeHandle>,
    toggles: Vec<RuntimeHandle>,
    pub(crate) texts: Vec<TextBinding>,
    pub(crate) elements: Vec<NodeId>,
    element_set: HashSet<NodeId>,
    /// Toggle representations, keyed by the node attached right now.
    toggle_nodes: HashMap<NodeId, NodeCell>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn runtimes(&self, kind: RuntimeKind) -> &Vec<RuntimeHandle> {
        match kind {
            RuntimeKind::List => &self.lists,
            RuntimeKind::When => &self.whens,
            RuntimeKind::Toggle => &self.toggles,
        }
    }

    fn runtimes_mut(&mut self, kind: RuntimeKind) -> &mut Vec<RuntimeHandle> {
        match kind {
            RuntimeKind::List => &mut self.lists,
            RuntimeKind::When => &mut self.whens,
            RuntimeKind::Toggle => &mut self.toggles,
        }
    }

    pub(crate) fn register(&mut self, kind: RuntimeKind, handle: RuntimeHandle) {
        self.runtimes_mut(kind).push(handle);
    }

    /// The runtimes of `kind` registered right now, in registration order.
    ///
    /// Runtimes registered while the snapshot is processed are not included.
    pub(crate) fn snapshot(&self, kind: RuntimeKind) -> Vec<RuntimeHandle> {
        self.runtimes(kind).clone()
    }

    pub(crate) fn unregister(&mut self, kind: RuntimeKind, handle: &RuntimeHandle) {
        self.runtimes_mut(kind).retain(|h| !Rc::ptr_eq(h, handle));
    }

    /// Unregister `handle` if its nodes are detached. Returns `true` if removed.
    ///
    /// A runtime that is mid-reconcile (borrowed) is left registered.
    pub(crate) fn unregister_if_disconnected(
        &mut self,
        kind: RuntimeKind,
        handle: &RuntimeHandle,
        dom: &Dom,
    ) -> bool {
        let connected = match handle.try_borrow() {
            Ok(runtime) => runtime.is_connected(dom),
            Err(_) => return false,
        };
        if !connected {
            self.unregister(kind, handle);
        }
        !connected
    }

    pub(crate) fn track_text(&mut self, node: NodeId, resolver: Resolver) {
        self.texts.push(TextBinding { node, resolver });
    }

    pub(crate) fn track_element(&mut self, element: NodeId) {
        if self.element_set.insert(element) {
            self.elements.push(element);
        }
    }

    /// Drop reactive elements for which `keep` returns `false`.
    pub(crate) fn retain_elements(&mut self, mut keep: impl FnMut(NodeId) -> bool) {
        let set = &mut self.element_set;
        self.elements.retain(|&element| {
            let kept = keep(element);
            if !kept {
                set.remove(&element);
            }
            kept
        });
    }

    pub(crate) fn track_toggle_node(&mut self, cell: NodeCell) {
        self.toggle_nodes.insert(cell.get(), cell);
    }

    /// Point a toggle's shared cell at `next` after a swap.
    pub(crate) fn retarget_toggle_node(&mut self, cell: &NodeCell, next: NodeId) {
        self.toggle_nodes.remove(&cell.get());
        cell.set(next);
        self.toggle_nodes.insert(next, cell.clone());
    }

    pub(crate) fn is_toggle_node(&self, node: NodeId) -> bool {
        self.toggle_nodes.contains_key(&node)
    }

    /// A cell following `node`. Toggle representations share the toggle's
    /// cell, so holders see later swaps; any other node gets a fixed cell.
    pub(crate) fn node_cell(&self, node: NodeId) -> NodeCell {
        self.toggle_nodes
            .get(&node)
            .cloned()
            .unwrap_or_else(|| Rc::new(Cell::new(node)))
    }

    /// Forget toggle nodes for which `keep` returns `false`.
    pub(crate) fn retain_toggle_nodes(&mut self, mut keep: impl FnMut(NodeId) -> bool) {
        self.toggle_nodes.retain(|&node, _| keep(node));
    }

    /// Number of registered runtimes of `kind`.
    pub fn count(&self, kind: RuntimeKind) -> usize {
        self.runtimes(kind).len()
    }

    pub fn list_count(&self) -> usize {
        self.count(RuntimeKind::List)
    }

    pub fn when_count(&self) -> usize {
        self.count(RuntimeKind::When)
    }

    pub fn toggle_count(&self) -> usize {
        self.count(RuntimeKind::Toggle)
    }

    pub fn text_binding_count(&self) -> usize {
        self.texts.len()
    }

    pub fn reactive_element_count(&self) -> usize {
        self.elements.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
            && self.whens.is_empty()
            && self.toggles.is_empty()
            && self.texts.is_empty()
            && self.elements.is_empty()
    }

    /// Forget every runtime and binding. The DOM is left as is.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("lists", &self.lists.len())
            .field("whens", &self.whens.len())
            .field("toggles", &self.toggles.len())
            .field("texts", &self.texts.len())
            .field("elements", &self.elements.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        node: NodeId,
    }

    impl Reconcile for Fixed {
        fn is_connected(&self, dom: &Dom) -> bool {
            dom.is_connected(self.node)
        }

        fn reconcile(&mut self, _ui: &mut Ui) -> Result<()> {
            Ok(())
        }
    }

    fn handle(node: NodeId) -> RuntimeHandle {
        Rc::new(RefCell::new(Fixed { node }))
    }

    #[test]
    fn new_registry_is_empty() {
        let registry = Registry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.list_count(), 0);
    }

    #[test]
    fn register_and_snapshot_in_order() {
        let mut dom = Dom::new();
        let a = dom.create_element("a");
        let mut registry = Registry::new();
        let first = handle(a);
        let second = handle(a);
        registry.register(RuntimeKind::When, first.clone());
        registry.register(RuntimeKind::When, second.clone());
        let snapshot = registry.snapshot(RuntimeKind::When);
        assert_eq!(snapshot.len(), 2);
        assert!(Rc::ptr_eq(&snapshot[0], &first));
        assert!(Rc::ptr_eq(&snapshot[1], &second));
        assert_eq!(registry.list_count(), 0);
    }

    #[test]
    fn unregister_if_disconnected() {
        let mut dom = Dom::new();
        let body = dom.body();
        let attached = dom.create_element("a");
        dom.append_child(body, attached).unwrap();
        let detached = dom.create_element("b");

        let mut registry = Registry::new();
        let live = handle(attached);
        let dead = handle(detached);
        registry.register(RuntimeKind::List, live.clone());
        registry.register(RuntimeKind::List, dead.clone());

        assert!(!registry.unregister_if_disconnected(RuntimeKind::List, &live, &dom));
        assert!(registry.unregister_if_disconnected(RuntimeKind::List, &dead, &dom));
        assert_eq!(registry.list_count(), 1);
    }

    #[test]
    fn busy_runtime_is_not_unregistered() {
        let mut dom = Dom::new();
        let detached = dom.create_element("b");
        let mut registry = Registry::new();
        let busy = handle(detached);
        registry.register(RuntimeKind::Toggle, busy.clone());
        let _guard = busy.borrow_mut();
        assert!(!registry.unregister_if_disconnected(RuntimeKind::Toggle, &busy, &dom));
        assert_eq!(registry.toggle_count(), 1);
    }

    #[test]
    fn track_element_dedupes() {
        let mut dom = Dom::new();
        let a = dom.create_element("a");
        let b = dom.create_element("b");
        let mut registry = Registry::new();
        registry.track_element(a);
        registry.track_element(a);
        registry.track_element(b);
        assert_eq!(registry.reactive_element_count(), 2);
        registry.retain_elements(|el| el != a);
        assert_eq!(registry.elements, vec![b]);
        registry.track_element(a);
        assert_eq!(registry.reactive_element_count(), 2);
    }

    #[test]
    fn toggle_cell_follows_retarget() {
        let mut dom = Dom::new();
        let shown = dom.create_element("li");
        let hidden = dom.create_comment("conditional-li-hidden");
        let plain = dom.create_element("p");
        let mut registry = Registry::new();
        let cell: NodeCell = Rc::new(Cell::new(shown));
        registry.track_toggle_node(cell.clone());

        let held = registry.node_cell(shown);
        assert!(Rc::ptr_eq(&held, &cell));
        registry.retarget_toggle_node(&cell, hidden);
        assert_eq!(held.get(), hidden);
        assert!(registry.is_toggle_node(hidden));
        assert!(!registry.is_toggle_node(shown));

        let fixed = registry.node_cell(plain);
        assert!(!Rc::ptr_eq(&fixed, &cell));
        assert_eq!(fixed.get(), plain);

        registry.retain_toggle_nodes(|node| node != hidden);
        assert!(!registry.is_toggle_node(hidden));
    }

    #[test]
    fn clear_forgets_everything() {
        let mut dom = Dom::new();
        let a = dom.create_text("x");
        let mut registry = Registry::new();
        registry.track_text(a, Resolver::new(|| "y"));
        registry.register(RuntimeKind::List, handle(a));
        assert!(!registry.is_empty());
        registry.clear();
        assert!(registry.is_empty());
    }
}
