//! List runtime: a marker-bounded region mirroring an array of items.
//!
//! Items are matched to previously rendered nodes by `Rc` pointer identity, so
//! reordering the same `Rc`s moves the existing nodes instead of re-rendering.
//!
//! # Sync
//!
//! 1. Call the items provider. If the result holds the same `Rc`s in the same
//!    order as the last sync, stop: no DOM operation happens.
//! 2. Queue the old records by item pointer. Duplicate pointers queue up in
//!    order, so the k-th occurrence of an item keeps the k-th record.
//! 3. Walk the new items forward, claiming a queued record or rendering a new
//!    node.
//! 4. Remove and free the node of every record nobody claimed.
//! 5. Walk the claimed records backwards with a cursor starting at the end
//!    marker; a node is moved only when it is not already right before the
//!    cursor. Removing before positioning keeps unaffected nodes in place.
//! 6. Store the new records and the snapshot of items.
//!
//! Items whose render produced nothing are skipped and not retried until the
//! provider returns a different array.
//!
//! An item rendered as a toggle element keeps following the toggle: its
//! record reads the node the toggle shows right now, element or placeholder.
//! A deferred renderer runs against a detached scratch fragment. Only the
//! element it returns enters the region; anything else it created is freed.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use tracing::{debug, error, trace};

use super::marker::Markers;
use super::registry::{NodeCell, Reconcile, RuntimeKind};
use crate::dom::node::{NodeData, NodeId};
use crate::dom::tree::Dom;
use crate::error::{Error, Result};
use crate::modifier::{ApplyFn, Modifier, Slot};
use crate::ui::Ui;

/// Returns the current items.
pub type ItemsFn<T> = Rc<dyn Fn() -> Vec<Rc<T>>>;

/// Renders one item at an index.
pub type RenderItemFn<T> = Rc<dyn Fn(&mut Ui, &Rc<T>, usize) -> Result<Rendered>>;

/// What a render-item callback produced.
#[derive(Clone)]
pub enum Rendered {
    /// A concrete node. It is moved into the region.
    Node(NodeId),
    /// A deferred renderer, called with a detached scratch slot and the item
    /// index. Its result is accepted only if it is an element or a toggle.
    Deferred(ApplyFn),
    /// Nothing to show for this item.
    Nothing,
}

impl From<NodeId> for Rendered {
    fn from(id: NodeId) -> Self {
        Rendered::Node(id)
    }
}

impl From<Modifier> for Rendered {
    fn from(modifier: Modifier) -> Self {
        match modifier {
            Modifier::Apply(f) => Rendered::Deferred(f),
            Modifier::Node(id) => Rendered::Node(id),
            _ => Rendered::Nothing,
        }
    }
}

/// One item and the node rendered for it.
pub(crate) struct ListItemRecord<T> {
    pub item: Rc<T>,
    node: NodeCell,
}

impl<T> ListItemRecord<T> {
    /// The node representing the item right now.
    pub fn element(&self) -> NodeId {
        self.node.get()
    }
}

pub(crate) struct ListRuntime<T> {
    items: ItemsFn<T>,
    render: RenderItemFn<T>,
    markers: Markers,
    pub(crate) records: Vec<ListItemRecord<T>>,
    last_synced: Vec<Rc<T>>,
}

/// Function modifier rendering a list region at the slot it is applied to.
///
/// ```ignore
/// let todos = Rc::new(RefCell::new(vec![Rc::new("milk")]));
/// let source = todos.clone();
/// el("ul", [list(
///     move || source.borrow().clone(),
///     |ui, item, _| Ok(ui.build("li", &[text(**item)])?.into()),
/// )])
/// ```
pub fn list<T: 'static>(
    items: impl Fn() -> Vec<Rc<T>> + 'static,
    render: impl Fn(&mut Ui, &Rc<T>, usize) -> Result<Rendered> + 'static,
) -> Modifier {
    let items: ItemsFn<T> = Rc::new(items);
    let render: RenderItemFn<T> = Rc::new(render);
    Modifier::Apply(Rc::new(move |ui, slot, _index| {
        create_list_runtime(ui, slot, items.clone(), render.clone())?;
        Ok(None)
    }))
}

/// Insert a marker pair at `slot`, register the runtime and run the first sync.
pub(crate) fn create_list_runtime<T: 'static>(
    ui: &mut Ui,
    slot: Slot,
    items: ItemsFn<T>,
    render: RenderItemFn<T>,
) -> Result<Rc<RefCell<ListRuntime<T>>>> {
    let id = ui.next_region_id();
    let prefix = ui.config.list_marker_prefix.clone();
    let markers = Markers::insert(&mut ui.dom, slot, &prefix, id)?;
    let runtime = Rc::new(RefCell::new(ListRuntime {
        items,
        render,
        markers,
        records: Vec::new(),
        last_synced: Vec::new(),
    }));
    ui.registry.register(RuntimeKind::List, runtime.clone());
    runtime.borrow_mut().sync(ui)?;
    Ok(runtime)
}

fn same_items<T>(a: &[Rc<T>], b: &[Rc<T>]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| Rc::ptr_eq(x, y))
}

impl<T: 'static> ListRuntime<T> {
    /// Reconcile the region with the provider's current items.
    pub(crate) fn sync(&mut self, ui: &mut Ui) -> Result<()> {
        let items = (self.items)();
        if same_items(&items, &self.last_synced) {
            trace!(len = items.len(), "list unchanged");
            return Ok(());
        }
        let Some(parent) = self.markers.parent(&ui.dom) else {
            debug!("list markers separated; skipping sync");
            return Ok(());
        };

        let mut pool: HashMap<*const T, VecDeque<ListItemRecord<T>>> = HashMap::new();
        for record in self.records.drain(..) {
            pool.entry(Rc::as_ptr(&record.item))
                .or_default()
                .push_back(record);
        }

        let mut failures = Vec::new();
        let mut claimed = Vec::with_capacity(items.len());
        let mut created = 0usize;
        for (index, item) in items.iter().enumerate() {
            if let Some(record) = pool.get_mut(&Rc::as_ptr(item)).and_then(VecDeque::pop_front) {
                claimed.push(record);
                continue;
            }
            match self.render_item(ui, item, index) {
                Ok(Some(element)) => {
                    created += 1;
                    claimed.push(ListItemRecord {
                        item: item.clone(),
                        node: ui.registry.node_cell(element),
                    });
                }
                Ok(None) => debug!(index, "list item rendered nothing; skipped"),
                Err(err) => {
                    error!(index, "list item render failed: {err}");
                    failures.push(err);
                }
            }
        }

        let mut removed = 0usize;
        for record in pool.into_values().flatten() {
            let element = record.element();
            if ui.dom.parent(element) != Some(parent) {
                continue;
            }
            match ui.dom.remove_child(parent, element) {
                Ok(()) => {
                    ui.dom.remove(element);
                    removed += 1;
                }
                Err(err) => error!("failed to remove list item: {err}"),
            }
        }

        let mut moved = 0usize;
        let mut cursor = self.markers.end;
        let mut positioned = Vec::with_capacity(claimed.len());
        for record in claimed.into_iter().rev() {
            let element = record.element();
            if ui.dom.next_sibling(element) != Some(cursor) {
                if let Err(err) = ui.dom.insert_before(parent, element, Some(cursor)) {
                    error!("failed to position list item; dropping its record: {err}");
                    continue;
                }
                moved += 1;
            }
            cursor = element;
            positioned.push(record);
        }
        positioned.reverse();

        debug!(
            items = items.len(),
            created,
            removed,
            moved,
            "list synced"
        );
        self.records = positioned;
        self.last_synced = items;
        Error::from_failures(failures)
    }

    fn render_item(&self, ui: &mut Ui, item: &Rc<T>, index: usize) -> Result<Option<NodeId>> {
        match (self.render)(ui, item, index)? {
            Rendered::Node(node) => Ok(ui.dom.contains(node).then_some(node)),
            Rendered::Deferred(f) => render_deferred(ui, &f, index),
            Rendered::Nothing => Ok(None),
        }
    }
}

/// Run `f` against a scratch fragment and keep only the item node it returns.
///
/// The fragment is freed with whatever else `f` left in it, so regions it
/// created there become disconnected and are pruned by the next update.
fn render_deferred(ui: &mut Ui, f: &ApplyFn, index: usize) -> Result<Option<NodeId>> {
    let scratch = ui.dom.create_fragment();
    let produced = match f(ui, Slot::append(scratch), index) {
        Ok(produced) => produced,
        Err(err) => {
            ui.dom.remove(scratch);
            return Err(err);
        }
    };
    let accepted = produced.filter(|&node| is_item_node(ui, node));
    match (produced, accepted) {
        (Some(node), Some(_)) if ui.dom.parent(node) == Some(scratch) => {
            if let Err(err) = ui.dom.remove_child(scratch, node) {
                ui.dom.remove(scratch);
                return Err(err.into());
            }
        }
        (Some(node), None) if node != scratch && ui.dom.parent(node).is_none() => {
            trace!(index, "deferred item is not an element; freed");
            ui.dom.remove(node);
        }
        _ => {}
    }
    ui.dom.remove(scratch);
    Ok(accepted)
}

fn is_item_node(ui: &Ui, node: NodeId) -> bool {
    ui.dom.get(node).is_some_and(NodeData::is_element) || ui.registry.is_toggle_node(node)
}

impl<T: 'static> Reconcile for ListRuntime<T> {
    fn is_connected(&self, dom: &Dom) -> bool {
        self.markers.is_connected(dom)
    }

    fn reconcile(&mut self, ui: &mut Ui) -> Result<()> {
        self.sync(ui)
    }
}
