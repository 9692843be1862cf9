//! Node types: NodeId, NodeKind, NodeData.

use slotmap::new_key_type;

new_key_type! {
    /// Unique identifier for a DOM node. Copy, lightweight (u64).
    ///
    /// Ids stay valid while a node is detached; only [`Dom::remove`](super::Dom::remove)
    /// invalidates them.
    pub struct NodeId;
}

/// What a node is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The document root. Exactly one per [`Dom`](super::Dom).
    Document,
    /// A document fragment; inserting it splices its children instead.
    Fragment,
    /// An element with a lowercase tag name.
    Element { tag: String },
    /// A text node and its data.
    Text(String),
    /// A comment node and its data.
    Comment(String),
}

/// Data associated with a single DOM node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    pub kind: NodeKind,
    /// Attributes in insertion order. Only meaningful for elements.
    pub attributes: Vec<(String, String)>,
}

impl NodeData {
    /// Create element data with the given tag name.
    pub fn element(tag: impl Into<String>) -> Self {
        Self::with_kind(NodeKind::Element {
            tag: tag.into().to_ascii_lowercase(),
        })
    }

    /// Create text node data.
    pub fn text(data: impl Into<String>) -> Self {
        Self::with_kind(NodeKind::Text(data.into()))
    }

    /// Create comment node data.
    pub fn comment(data: impl Into<String>) -> Self {
        Self::with_kind(NodeKind::Comment(data.into()))
    }

    pub(crate) fn with_kind(kind: NodeKind) -> Self {
        Self {
            kind,
            attributes: Vec::new(),
        }
    }

    /// Set an attribute (builder).
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// The element tag name, or `None` for non-elements.
    pub fn tag_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag } => Some(tag),
            _ => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element { .. })
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.kind, NodeKind::Comment(_))
    }

    /// Whether this node may hold children.
    pub fn is_container(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Document | NodeKind::Fragment | NodeKind::Element { .. }
        )
    }

    /// Character data for text and comment nodes.
    pub fn data(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(data) | NodeKind::Comment(data) => Some(data),
            _ => None,
        }
    }

    /// Look up an attribute value.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing an existing value in place.
    ///
    /// Returns `true` if the stored value changed.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) if *existing == value => false,
            Some((_, existing)) => {
                *existing = value;
                true
            }
            None => {
                self.attributes.push((name, value));
                true
            }
        }
    }

    /// Remove an attribute. Returns the old value, if any.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let pos = self.attributes.iter().position(|(key, _)| key == name)?;
        Some(self.attributes.remove(pos).1)
    }

    /// Check whether the `class` attribute contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_lowercases_tag() {
        let data = NodeData::element("DIV");
        assert_eq!(data.tag_name(), Some("div"));
        assert!(data.is_element());
        assert!(data.is_container());
        assert!(data.attributes.is_empty());
    }

    #[test]
    fn text_and_comment_data() {
        assert_eq!(NodeData::text("hi").data(), Some("hi"));
        let comment = NodeData::comment("list-end");
        assert!(comment.is_comment());
        assert!(!comment.is_container());
        assert_eq!(comment.data(), Some("list-end"));
        assert_eq!(comment.tag_name(), None);
    }

    #[test]
    fn set_attribute_reports_change() {
        let mut data = NodeData::element("a");
        assert!(data.set_attribute("href", "/x"));
        assert!(!data.set_attribute("href", "/x"));
        assert!(data.set_attribute("href", "/y"));
        assert_eq!(data.attribute("href"), Some("/y"));
        assert_eq!(data.attributes.len(), 1);
    }

    #[test]
    fn remove_attribute() {
        let mut data = NodeData::element("a").with_attribute("id", "main");
        assert_eq!(data.remove_attribute("id").as_deref(), Some("main"));
        assert_eq!(data.remove_attribute("id"), None);
    }

    #[test]
    fn has_class_splits_whitespace() {
        let data = NodeData::element("p").with_attribute("class", "big  primary");
        assert!(data.has_class("primary"));
        assert!(data.has_class("big"));
        assert!(!data.has_class("prim"));
        assert!(!NodeData::element("p").has_class("big"));
    }

    #[test]
    fn node_id_is_copy() {
        fn assert_copy<T: Copy>() {}
        assert_copy::<NodeId>();
    }
}
