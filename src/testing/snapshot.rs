//! Markup serialization for snapshot testing.
//!
//! Converts a subtree of the arena DOM into HTML-like text. Output is
//! deterministic: attributes appear in insertion order and nothing is
//! pretty-printed, so it can be compared directly or fed to `insta`.

use std::fmt::Write;

use crate::dom::node::{NodeId, NodeKind};
use crate::dom::tree::Dom;
use crate::ui::Ui;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Serialize `node` and its descendants.
///
/// Elements render as `<tag a="v">…</tag>`, comments as `<!--data-->`.
/// Documents and fragments render only their children. A missing node
/// renders as an empty string.
///
/// # Examples
///
/// ```ignore
/// use splice_dom::testing::to_html;
///
/// let mut dom = Dom::new();
/// let p = dom.create_element("p");
/// let t = dom.create_text("a < b");
/// dom.append_child(p, t)?;
/// assert_eq!(to_html(&dom, p), "<p>a &lt; b</p>");
/// ```
pub fn to_html(dom: &Dom, node: NodeId) -> String {
    let mut out = String::new();
    write_node(dom, node, &mut out);
    out
}

/// Serialize the children of `node`, without the node itself.
pub fn inner_html(dom: &Dom, node: NodeId) -> String {
    let mut out = String::new();
    for child in dom.children(node) {
        write_node(dom, child, &mut out);
    }
    out
}

/// The inner markup of a context's body.
pub fn render_to_string(ui: &Ui) -> String {
    inner_html(&ui.dom, ui.dom.body())
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

fn write_node(dom: &Dom, node: NodeId, out: &mut String) {
    let Some(data) = dom.get(node) else {
        return;
    };
    match &data.kind {
        NodeKind::Text(text) => escape_text(text, out),
        NodeKind::Comment(text) => {
            let _ = write!(out, "<!--{text}-->");
        }
        NodeKind::Element { tag } => {
            out.push('<');
            out.push_str(tag);
            for (name, value) in &data.attributes {
                let _ = write!(out, " {name}=\"");
                escape_attribute(value, out);
                out.push('"');
            }
            out.push('>');
            for child in dom.children(node) {
                write_node(dom, child, out);
            }
            let _ = write!(out, "</{tag}>");
        }
        NodeKind::Document | NodeKind::Fragment => {
            for child in dom.children(node) {
                write_node(dom, child, out);
            }
        }
    }
}

fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attribute(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::node::NodeData;

    #[test]
    fn element_with_attributes_and_children() {
        let mut dom = Dom::new();
        let div = dom.create(
            NodeData::element("DIV")
                .with_attribute("id", "main")
                .with_attribute("title", "a \"quoted\" & b"),
        );
        let text = dom.create_text("x < y && z > w");
        let comment = dom.create_comment("note");
        dom.append_child(div, text).unwrap();
        dom.append_child(div, comment).unwrap();
        assert_eq!(
            to_html(&dom, div),
            r#"<div id="main" title="a &quot;quoted&quot; &amp; b">x &lt; y &amp;&amp; z &gt; w<!--note--></div>"#
        );
    }

    #[test]
    fn inner_html_skips_the_node_itself() {
        let mut dom = Dom::new();
        let body = dom.body();
        let a = dom.create_element("a");
        let b = dom.create_text("b");
        dom.append_child(body, a).unwrap();
        dom.append_child(body, b).unwrap();
        assert_eq!(inner_html(&dom, body), "<a></a>b");
        assert_eq!(to_html(&dom, body), "<body><a></a>b</body>");
    }

    #[test]
    fn document_renders_children_only() {
        let dom = Dom::new();
        assert_eq!(to_html(&dom, dom.document()), "<body></body>");
    }

    #[test]
    fn missing_node_is_empty() {
        let mut dom = Dom::new();
        let gone = dom.create_element("p");
        dom.remove(gone);
        assert_eq!(to_html(&dom, gone), "");
        assert_eq!(inner_html(&dom, gone), "");
    }

    #[test]
    fn render_to_string_uses_body() {
        let mut ui = Ui::new();
        ui.render(crate::text("hi"), None, 0).unwrap();
        insta::assert_snapshot!(render_to_string(&ui), @"hi");
    }
}
