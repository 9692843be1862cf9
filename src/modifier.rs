//! Modifiers: the values a tag build turns into child nodes or attribute effects.
//!
//! A [`Modifier`] is applied against a [`Slot`]: produced nodes are inserted at
//! the slot, attribute effects land on the slot's parent element. Resolvers and
//! conditions are explicit typed values, so nothing is classified by probing a
//! closure at runtime.

use std::fmt;
use std::rc::Rc;

use tracing::{error, warn};

use crate::dom::node::NodeId;
use crate::dom::tree::Dom;
use crate::error::{DomError, EvalError, Result};
use crate::runtime::{reactive, toggle};
use crate::ui::Ui;

// ---------------------------------------------------------------------------
// Resolver / Condition
// ---------------------------------------------------------------------------

/// A zero-argument closure producing the current string value of a binding.
#[derive(Clone)]
pub struct Resolver(Rc<dyn Fn() -> Result<String, EvalError>>);

impl Resolver {
    /// Wrap an infallible closure; its result is coerced with `Display`.
    pub fn new<T: fmt::Display>(f: impl Fn() -> T + 'static) -> Self {
        Self(Rc::new(move || Ok(f().to_string())))
    }

    /// Wrap a fallible closure. An `Err` leaves the rendered value unchanged.
    pub fn fallible<T, E>(f: impl Fn() -> Result<T, E> + 'static) -> Self
    where
        T: fmt::Display,
        E: fmt::Display,
    {
        Self(Rc::new(move || {
            f().map(|value| value.to_string())
                .map_err(|err| EvalError::new(err.to_string()))
        }))
    }

    pub fn resolve(&self) -> Result<String, EvalError> {
        (self.0)()
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Resolver")
    }
}

/// A zero-argument predicate.
#[derive(Clone)]
pub struct Condition(Rc<dyn Fn() -> Result<bool, EvalError>>);

impl Condition {
    pub fn new(f: impl Fn() -> bool + 'static) -> Self {
        Self(Rc::new(move || Ok(f())))
    }

    pub fn fallible<E: fmt::Display>(f: impl Fn() -> Result<bool, E> + 'static) -> Self {
        Self(Rc::new(move || f().map_err(|err| EvalError::new(err.to_string()))))
    }

    pub fn eval(&self) -> Result<bool, EvalError> {
        (self.0)()
    }

    /// Render this condition's value as text.
    pub fn to_resolver(&self) -> Resolver {
        let condition = self.clone();
        Resolver(Rc::new(move || condition.eval().map(|value| value.to_string())))
    }
}

impl<F: Fn() -> bool + 'static> From<F> for Condition {
    fn from(f: F) -> Self {
        Condition::new(f)
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Condition")
    }
}

// ---------------------------------------------------------------------------
// Slot
// ---------------------------------------------------------------------------

/// Where produced nodes are inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// Receives inserted nodes and attribute effects.
    pub parent: NodeId,
    /// Insert before this child of `parent`; append when `None`.
    pub before: Option<NodeId>,
}

impl Slot {
    pub fn append(parent: NodeId) -> Self {
        Self {
            parent,
            before: None,
        }
    }

    pub fn before(parent: NodeId, anchor: NodeId) -> Self {
        Self {
            parent,
            before: Some(anchor),
        }
    }

    pub fn insert(&self, dom: &mut Dom, node: NodeId) -> Result<(), DomError> {
        match self.before {
            Some(anchor) => dom.insert_before(self.parent, node, Some(anchor)),
            None => dom.append_child(self.parent, node),
        }
    }
}

// ---------------------------------------------------------------------------
// Modifier
// ---------------------------------------------------------------------------

/// A function modifier, called with the slot and the modifier's index.
///
/// A returned node is inserted at the slot by the caller.
pub type ApplyFn = Rc<dyn Fn(&mut Ui, Slot, usize) -> Result<Option<NodeId>>>;

/// An attribute value.
#[derive(Debug, Clone)]
pub enum AttrValue {
    Static(String),
    /// Recomputed whenever an `update` event reaches the element.
    Reactive(Resolver),
}

/// One argument of a tag build.
#[derive(Clone)]
pub enum Modifier {
    /// Static text child.
    Text(String),
    /// Attribute object.
    Attrs(Vec<(String, AttrValue)>),
    /// An existing node, moved into place.
    Node(NodeId),
    /// Text child recomputed on every update.
    ReactiveText(Resolver),
    /// Visibility condition of a tag build; see [`el`].
    Condition(Condition),
    /// Function modifier: lists, when-chains, nested tag builds.
    Apply(ApplyFn),
}

impl fmt::Debug for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modifier::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Modifier::Attrs(attrs) => f.debug_tuple("Attrs").field(attrs).finish(),
            Modifier::Node(id) => f.debug_tuple("Node").field(id).finish(),
            Modifier::ReactiveText(_) => f.write_str("ReactiveText"),
            Modifier::Condition(_) => f.write_str("Condition"),
            Modifier::Apply(_) => f.write_str("Apply"),
        }
    }
}

impl From<&str> for Modifier {
    fn from(text: &str) -> Self {
        Modifier::Text(text.to_owned())
    }
}

impl From<String> for Modifier {
    fn from(text: String) -> Self {
        Modifier::Text(text)
    }
}

impl From<NodeId> for Modifier {
    fn from(id: NodeId) -> Self {
        Modifier::Node(id)
    }
}

pub fn text(value: impl Into<String>) -> Modifier {
    Modifier::Text(value.into())
}

pub fn node(id: NodeId) -> Modifier {
    Modifier::Node(id)
}

pub fn attr(name: impl Into<String>, value: impl Into<String>) -> Modifier {
    Modifier::Attrs(vec![(name.into(), AttrValue::Static(value.into()))])
}

pub fn reactive_attr(name: impl Into<String>, resolver: Resolver) -> Modifier {
    Modifier::Attrs(vec![(name.into(), AttrValue::Reactive(resolver))])
}

pub fn reactive_text<T: fmt::Display>(f: impl Fn() -> T + 'static) -> Modifier {
    Modifier::ReactiveText(Resolver::new(f))
}

pub fn condition(f: impl Fn() -> bool + 'static) -> Modifier {
    Modifier::Condition(Condition::new(f))
}

pub fn apply(f: impl Fn(&mut Ui, Slot, usize) -> Result<Option<NodeId>> + 'static) -> Modifier {
    Modifier::Apply(Rc::new(f))
}

/// Tag builder.
///
/// The first [`Modifier::Condition`] among `modifiers` turns the build into a
/// toggle element: the element is shown while the condition holds and replaced
/// by a placeholder comment otherwise.
pub fn el(tag: impl Into<String>, modifiers: impl IntoIterator<Item = Modifier>) -> Modifier {
    let tag = tag.into();
    let modifiers: Vec<Modifier> = modifiers.into_iter().collect();
    Modifier::Apply(Rc::new(move |ui, _slot, _index| {
        ui.build(&tag, &modifiers).map(Some)
    }))
}

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

impl Ui {
    /// Apply `modifiers` at `slot`. `start_index` is the index passed to the
    /// first function modifier.
    pub fn apply_modifiers(&mut self, slot: Slot, modifiers: &[Modifier], start_index: usize) -> Result<()> {
        for (offset, modifier) in modifiers.iter().enumerate() {
            self.apply_modifier(slot, modifier, start_index + offset)?;
        }
        Ok(())
    }

    /// Apply one modifier, returning the node it inserted, if any.
    pub fn apply_modifier(&mut self, slot: Slot, modifier: &Modifier, index: usize) -> Result<Option<NodeId>> {
        match modifier {
            Modifier::Text(value) => {
                let node = self.dom.create_text(value.clone());
                slot.insert(&mut self.dom, node)?;
                Ok(Some(node))
            }
            Modifier::Node(node) => {
                if !self.dom.contains(*node) {
                    warn!(?node, "skipping node modifier for a freed node");
                    return Ok(None);
                }
                slot.insert(&mut self.dom, *node)?;
                Ok(Some(*node))
            }
            Modifier::Attrs(attrs) => {
                for (name, value) in attrs {
                    match value {
                        AttrValue::Static(value) => {
                            self.dom.set_attribute(slot.parent, name.clone(), value.clone())?;
                        }
                        AttrValue::Reactive(resolver) => {
                            self.bind_attribute(slot.parent, name, resolver.clone())?;
                        }
                    }
                }
                Ok(None)
            }
            Modifier::ReactiveText(resolver) => self.insert_reactive_text(slot, resolver.clone()).map(Some),
            // Only a tag build consumes a condition; elsewhere it reads as text.
            Modifier::Condition(condition) => {
                self.insert_reactive_text(slot, condition.to_resolver()).map(Some)
            }
            Modifier::Apply(f) => {
                let produced = f(self, slot, index)?;
                if let Some(node) = produced {
                    slot.insert(&mut self.dom, node)?;
                }
                Ok(produced)
            }
        }
    }

    /// Build a detached element (or toggle placeholder) for `tag`.
    pub fn build(&mut self, tag: &str, modifiers: &[Modifier]) -> Result<NodeId> {
        let found = modifiers.iter().enumerate().find_map(|(pos, m)| match m {
            Modifier::Condition(condition) => Some((pos, condition.clone())),
            _ => None,
        });
        match found {
            Some((pos, condition)) => {
                let rest: Vec<Modifier> = modifiers
                    .iter()
                    .enumerate()
                    .filter(|&(i, _)| i != pos)
                    .map(|(_, m)| m.clone())
                    .collect();
                toggle::build_toggle(self, tag, condition, rest)
            }
            None => self.build_element(tag, modifiers),
        }
    }

    /// Build a detached element and apply every modifier to it.
    pub(crate) fn build_element(&mut self, tag: &str, modifiers: &[Modifier]) -> Result<NodeId> {
        let element = self.dom.create_element(tag);
        if let Err(err) = self.apply_modifiers(Slot::append(element), modifiers, 0) {
            self.dom.remove(element);
            return Err(err);
        }
        Ok(element)
    }

    fn insert_reactive_text(&mut self, slot: Slot, resolver: Resolver) -> Result<NodeId> {
        let initial = resolver.resolve().unwrap_or_else(|err| {
            error!("reactive text resolver failed on first render: {err}");
            String::new()
        });
        let node = self.dom.create_text(initial);
        slot.insert(&mut self.dom, node)?;
        self.registry.track_text(node, resolver);
        Ok(node)
    }

    /// Bind a reactive attribute with the default string-coercing applier.
    pub fn bind_attribute(&mut self, element: NodeId, name: &str, resolver: Resolver) -> Result<()> {
        let binding = reactive::ReactiveAttributeBinding::new(element, name, resolver);
        self.bind(binding)
    }

    /// Register an attribute binding: apply it once, then on every `update`
    /// event reaching the element.
    pub fn bind(&mut self, binding: reactive::ReactiveAttributeBinding) -> Result<()> {
        let event = self.config.update_event.clone();
        reactive::bind_attribute(&mut self.dom, &mut self.registry, &event, binding)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::snapshot::inner_html;
    use std::cell::Cell;

    #[test]
    fn resolver_coerces_with_display() {
        let resolver = Resolver::new(|| 42);
        assert_eq!(resolver.resolve().unwrap(), "42");
        let failing = Resolver::fallible(|| Err::<i32, _>("nope"));
        assert_eq!(failing.resolve(), Err(EvalError::new("nope")));
    }

    #[test]
    fn condition_from_closure() {
        let flag = Rc::new(Cell::new(true));
        let f = flag.clone();
        let condition: Condition = (move || f.get()).into();
        assert_eq!(condition.eval(), Ok(true));
        flag.set(false);
        assert_eq!(condition.to_resolver().resolve().unwrap(), "false");
    }

    #[test]
    fn apply_text_attrs_and_nested() {
        let mut ui = Ui::new();
        let body = ui.dom.body();
        let tree = el(
            "div",
            [
                attr("class", "box"),
                text("hello "),
                el("b", [text("world")]),
            ],
        );
        let node = ui.render(tree, None, 0).unwrap().unwrap();
        assert_eq!(ui.dom.parent(node), Some(body));
        assert_eq!(
            inner_html(&ui.dom, body),
            r#"<div class="box">hello <b>world</b></div>"#
        );
    }

    #[test]
    fn slot_before_anchor() {
        let mut ui = Ui::new();
        let body = ui.dom.body();
        let anchor = ui.dom.create_comment("anchor");
        ui.dom.append_child(body, anchor).unwrap();
        ui.apply_modifiers(Slot::before(body, anchor), &[text("a"), text("b")], 0)
            .unwrap();
        assert_eq!(inner_html(&ui.dom, body), "ab<!--anchor-->");
    }

    #[test]
    fn node_modifier_moves_existing_node() {
        let mut ui = Ui::new();
        let body = ui.dom.body();
        let span = ui.dom.create_element("span");
        let div = ui.build("div", &[node(span)]).unwrap();
        ui.dom.append_child(body, div).unwrap();
        assert_eq!(ui.dom.parent(span), Some(div));
    }

    #[test]
    fn freed_node_modifier_is_skipped() {
        let mut ui = Ui::new();
        let span = ui.dom.create_element("span");
        ui.dom.remove(span);
        let div = ui.build("div", &[Modifier::Node(span)]).unwrap();
        assert_eq!(ui.dom.children(div).count(), 0);
    }

    #[test]
    fn function_modifier_receives_index() {
        let mut ui = Ui::new();
        let seen = Rc::new(Cell::new(usize::MAX));
        let s = seen.clone();
        let recorder = apply(move |_, _, index| {
            s.set(index);
            Ok(None)
        });
        ui.build("div", &[text("a"), attr("x", "y"), recorder]).unwrap();
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn reactive_text_initial_failure_renders_empty() {
        let mut ui = Ui::new();
        let failing = Modifier::ReactiveText(Resolver::fallible(|| Err::<String, _>("x")));
        let div = ui.build("div", &[failing]).unwrap();
        assert_eq!(ui.dom.text_content(div), "");
        assert_eq!(ui.registry().text_binding_count(), 1);
    }

    #[test]
    fn reactive_attr_sets_initial_value() {
        let mut ui = Ui::new();
        let div = ui
            .build("div", &[reactive_attr("title", Resolver::new(|| "hi"))])
            .unwrap();
        assert_eq!(ui.dom.attribute(div, "title"), Some("hi"));
        assert_eq!(ui.registry().reactive_element_count(), 1);
    }

    #[test]
    fn condition_outside_tag_build_is_text() {
        let mut ui = Ui::new();
        let body = ui.dom.body();
        ui.apply_modifiers(Slot::append(body), &[condition(|| true)], 0)
            .unwrap();
        assert_eq!(ui.dom.text_content(body), "true");
    }

    #[test]
    fn debug_format() {
        assert_eq!(format!("{:?}", text("x")), "Text(\"x\")");
        assert_eq!(format!("{:?}", condition(|| true)), "Condition");
    }
}
