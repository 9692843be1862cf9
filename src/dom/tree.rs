//! Tree operations: create, insert, move, remove, walk.

use slotmap::{SecondaryMap, SlotMap};

use super::node::{NodeData, NodeId, NodeKind};
use super::stats::MutationStats;
use crate::error::DomError;
use crate::event::Listener;

/// Sibling and parent links for one node.
#[derive(Debug, Clone, Copy, Default)]
struct Links {
    parent: Option<NodeId>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
}

/// The live DOM, backed by a slotmap arena.
///
/// All nodes live in a single `SlotMap`. Parent and sibling links are stored in
/// a secondary map as an intrusive doubly linked list, so moving a node next to
/// a known sibling is O(1). Nodes created with the `create_*` methods start
/// detached; detached nodes keep their id until [`Dom::remove`] frees them.
pub struct Dom {
    pub(crate) nodes: SlotMap<NodeId, NodeData>,
    links: SecondaryMap<NodeId, Links>,
    pub(crate) listeners: SecondaryMap<NodeId, Vec<Listener>>,
    document: NodeId,
    body: NodeId,
    stats: MutationStats,
}

impl Dom {
    /// Create a DOM holding a document with an empty `<body>`.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let mut links = SecondaryMap::new();
        let document = nodes.insert(NodeData::with_kind(NodeKind::Document));
        let body = nodes.insert(NodeData::element("body"));
        links.insert(
            document,
            Links {
                first_child: Some(body),
                last_child: Some(body),
                ..Links::default()
            },
        );
        links.insert(
            body,
            Links {
                parent: Some(document),
                ..Links::default()
            },
        );
        Self {
            nodes,
            links,
            listeners: SecondaryMap::new(),
            document,
            body,
            stats: MutationStats::default(),
        }
    }

    /// The document node.
    pub fn document(&self) -> NodeId {
        self.document
    }

    /// The `<body>` element.
    pub fn body(&self) -> NodeId {
        self.body
    }

    // ── Creation ─────────────────────────────────────────────────────

    /// Insert detached node data into the arena.
    pub fn create(&mut self, data: NodeData) -> NodeId {
        let id = self.nodes.insert(data);
        self.links.insert(id, Links::default());
        id
    }

    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        self.create(NodeData::element(tag))
    }

    pub fn create_text(&mut self, data: impl Into<String>) -> NodeId {
        self.create(NodeData::text(data))
    }

    pub fn create_comment(&mut self, data: impl Into<String>) -> NodeId {
        self.create(NodeData::comment(data))
    }

    pub fn create_fragment(&mut self) -> NodeId {
        self.create(NodeData::with_kind(NodeKind::Fragment))
    }

    // ── Structural mutation ──────────────────────────────────────────

    /// Append `child` as the last child of `parent`, moving it if attached.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.insert_at(parent, child, None)?;
        self.stats.append_child += 1;
        Ok(())
    }

    /// Insert `child` before `reference` (or at the end when `None`).
    ///
    /// A fragment splices its children in order and is left empty.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DomError> {
        self.insert_at(parent, child, reference)?;
        self.stats.insert_before += 1;
        Ok(())
    }

    /// Detach `child` from `parent`. The node stays alive in the arena.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.ensure(parent)?;
        self.ensure(child)?;
        if self.parent(child) != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        self.detach(child);
        self.stats.remove_child += 1;
        Ok(())
    }

    /// Replace `old` (a child of `parent`) with `new`.
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        new: NodeId,
        old: NodeId,
    ) -> Result<(), DomError> {
        self.ensure(old)?;
        if self.parent(old) != Some(parent) {
            return Err(DomError::NotAChild { parent, child: old });
        }
        self.check_insert(parent, new)?;
        if new != old {
            let mut reference = self.next_sibling(old);
            if reference == Some(new) {
                reference = self.next_sibling(new);
            }
            self.detach(old);
            self.splice(parent, new, reference);
        }
        self.stats.replace_child += 1;
        Ok(())
    }

    /// Free a node and all its descendants.
    ///
    /// Returns the `NodeData` for the removed node, or `None` if it didn't
    /// exist. The document node cannot be removed.
    pub fn remove(&mut self, id: NodeId) -> Option<NodeData> {
        if id == self.document || !self.nodes.contains_key(id) {
            return None;
        }
        self.detach(id);
        let subtree = self.walk_depth_first(id);
        let mut removed_root_data = None;
        for current in subtree {
            self.links.remove(current);
            self.listeners.remove(current);
            let data = self.nodes.remove(current);
            if current == id {
                removed_root_data = data;
            }
        }
        removed_root_data
    }

    fn insert_at(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DomError> {
        self.check_insert(parent, child)?;
        let mut reference = reference;
        if let Some(r) = reference {
            self.ensure(r)?;
            if self.parent(r) != Some(parent) {
                return Err(DomError::NotAChild { parent, child: r });
            }
            if r == child {
                reference = self.next_sibling(child);
            }
        }
        self.splice(parent, child, reference);
        Ok(())
    }

    /// Link `child` (or a fragment's children) into `parent` before `reference`.
    fn splice(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        let moving: Vec<NodeId> = if self.is_fragment(child) {
            self.children(child).collect()
        } else {
            vec![child]
        };
        for node in moving {
            self.detach(node);
            self.link_before(parent, node, reference);
        }
    }

    fn detach(&mut self, node: NodeId) {
        let Some(links) = self.links.get(node).copied() else {
            return;
        };
        let Some(parent) = links.parent else {
            return;
        };
        match links.prev {
            Some(prev) => self.links[prev].next = links.next,
            None => self.links[parent].first_child = links.next,
        }
        match links.next {
            Some(next) => self.links[next].prev = links.prev,
            None => self.links[parent].last_child = links.prev,
        }
        let own = &mut self.links[node];
        own.parent = None;
        own.prev = None;
        own.next = None;
    }

    fn link_before(&mut self, parent: NodeId, node: NodeId, reference: Option<NodeId>) {
        let prev = match reference {
            Some(r) => self.links[r].prev,
            None => self.links[parent].last_child,
        };
        {
            let own = &mut self.links[node];
            own.parent = Some(parent);
            own.prev = prev;
            own.next = reference;
        }
        match prev {
            Some(p) => self.links[p].next = Some(node),
            None => self.links[parent].first_child = Some(node),
        }
        match reference {
            Some(r) => self.links[r].prev = Some(node),
            None => self.links[parent].last_child = Some(node),
        }
    }

    fn ensure(&self, id: NodeId) -> Result<(), DomError> {
        if self.nodes.contains_key(id) {
            Ok(())
        } else {
            Err(DomError::NotFound(id))
        }
    }

    fn check_insert(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.ensure(parent)?;
        self.ensure(child)?;
        let hierarchy = |reason| DomError::HierarchyRequest {
            parent,
            child,
            reason,
        };
        if !self.nodes[parent].is_container() {
            return Err(hierarchy("parent cannot hold children"));
        }
        if matches!(self.nodes[child].kind, NodeKind::Document) {
            return Err(hierarchy("the document cannot be inserted"));
        }
        if child == parent || self.ancestors(parent).contains(&child) {
            return Err(hierarchy("a node cannot become its own descendant"));
        }
        Ok(())
    }

    fn is_fragment(&self, id: NodeId) -> bool {
        matches!(
            self.nodes.get(id).map(|data| &data.kind),
            Some(NodeKind::Fragment)
        )
    }

    // ── Navigation ───────────────────────────────────────────────────

    /// Get the parent of a node, if it has one.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.links.get(id).and_then(|links| links.parent)
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.links.get(id).and_then(|links| links.next)
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.links.get(id).and_then(|links| links.prev)
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.links.get(id).and_then(|links| links.first_child)
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.links.get(id).and_then(|links| links.last_child)
    }

    /// Iterate the children of a node in order. Empty if the node does not exist.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            dom: self,
            next: self.first_child(id),
        }
    }

    /// Walk from `id` up to the root, collecting ancestor node ids.
    ///
    /// The returned vec does **not** include `id` itself; it starts with the
    /// immediate parent and ends at the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent(current) {
            result.push(p);
            current = p;
        }
        result
    }

    /// Whether the node is attached (transitively) to the document.
    pub fn is_connected(&self, id: NodeId) -> bool {
        if !self.nodes.contains_key(id) {
            return false;
        }
        let mut current = id;
        while let Some(p) = self.parent(current) {
            current = p;
        }
        current == self.document
    }

    /// Immutable access to a node's data.
    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id)
    }

    /// Mutable access to a node's data.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id)
    }

    /// Number of live nodes in the arena, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena is empty. Never true: the document always exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the arena contains a node with the given id.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            // Push children in reverse so the first child is visited first.
            let kids: Vec<NodeId> = self.children(current).collect();
            stack.extend(kids.into_iter().rev());
        }
        result
    }

    // ── Content ──────────────────────────────────────────────────────

    /// Concatenated text of the node and its descendants.
    ///
    /// Comments contribute their data only when asked for directly.
    pub fn text_content(&self, id: NodeId) -> String {
        match self.nodes.get(id).map(|data| &data.kind) {
            Some(NodeKind::Text(data)) | Some(NodeKind::Comment(data)) => data.clone(),
            Some(_) => self
                .walk_depth_first(id)
                .into_iter()
                .filter_map(|node| match &self.nodes[node].kind {
                    NodeKind::Text(data) => Some(data.as_str()),
                    _ => None,
                })
                .collect(),
            None => String::new(),
        }
    }

    /// Set character data, or replace an element's children with one text node.
    pub fn set_text_content(&mut self, id: NodeId, value: impl Into<String>) -> Result<(), DomError> {
        let value = value.into();
        let data = self.nodes.get_mut(id).ok_or(DomError::NotFound(id))?;
        match &mut data.kind {
            NodeKind::Text(data) | NodeKind::Comment(data) => {
                *data = value;
                return Ok(());
            }
            NodeKind::Document => return Err(DomError::NotAnElement(id)),
            NodeKind::Element { .. } | NodeKind::Fragment => {}
        }
        let kids: Vec<NodeId> = self.children(id).collect();
        for kid in kids {
            self.detach(kid);
        }
        if !value.is_empty() {
            let text = self.create_text(value);
            self.link_before(id, text, None);
        }
        Ok(())
    }

    /// Set an attribute on an element. Returns `true` if the value changed.
    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<bool, DomError> {
        let data = self.element_mut(id)?;
        Ok(data.set_attribute(name, value))
    }

    /// Look up an attribute value on an element.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes.get(id).and_then(|data| data.attribute(name))
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<Option<String>, DomError> {
        let data = self.element_mut(id)?;
        Ok(data.remove_attribute(name))
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut NodeData, DomError> {
        match self.nodes.get_mut(id) {
            Some(data) if data.is_element() => Ok(data),
            Some(_) => Err(DomError::NotAnElement(id)),
            None => Err(DomError::NotFound(id)),
        }
    }

    // ── Stats ────────────────────────────────────────────────────────

    /// Structural operations performed since creation or the last reset.
    pub fn mutation_stats(&self) -> MutationStats {
        self.stats
    }

    pub fn reset_mutation_stats(&mut self) {
        self.stats = MutationStats::default();
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Dom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dom")
            .field("nodes", &self.nodes.len())
            .field("document", &self.document)
            .field("body", &self.body)
            .field("stats", &self.stats)
            .finish()
    }
}

/// Iterator over a node's children, see [`Dom::children`].
pub struct Children<'a> {
    dom: &'a Dom,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.dom.next_sibling(current);
        Some(current)
    }
}
