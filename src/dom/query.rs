//! DOM queries: by tag, attribute, class, comment prefix; generic predicates.
//!
//! Queries walk the tree below a starting node in document order, so detached
//! nodes still sitting in the arena never show up in results.

use super::node::{NodeData, NodeId};
use super::tree::Dom;

impl Dom {
    /// Find all elements below `root` (inclusive) with the given tag name.
    pub fn query_by_tag(&self, root: NodeId, tag: &str) -> Vec<NodeId> {
        self.query_all(root, |data| data.tag_name() == Some(tag))
    }

    /// Find the first element below `root` whose attribute `name` equals `value`.
    pub fn query_by_attribute(&self, root: NodeId, name: &str, value: &str) -> Option<NodeId> {
        self.walk_depth_first(root)
            .into_iter()
            .find(|&id| self.attribute(id, name) == Some(value))
    }

    /// Find all elements below `root` that have the given CSS class.
    pub fn query_by_class(&self, root: NodeId, class: &str) -> Vec<NodeId> {
        self.query_all(root, |data| data.has_class(class))
    }

    /// Find all comments below `root` whose data starts with `prefix`.
    pub fn comments_with_prefix(&self, root: NodeId, prefix: &str) -> Vec<NodeId> {
        self.query_all(root, |data| {
            data.is_comment() && data.data().is_some_and(|d| d.starts_with(prefix))
        })
    }

    /// Find all nodes below `root` matching an arbitrary predicate.
    pub fn query_all(&self, root: NodeId, predicate: impl Fn(&NodeData) -> bool) -> Vec<NodeId> {
        self.walk_depth_first(root)
            .into_iter()
            .filter(|&id| self.get(id).is_some_and(&predicate))
            .collect()
    }
}
