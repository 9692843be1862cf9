//! Integration tests for splice-dom.
//!
//! These tests exercise the public API from outside the crate: mounting
//! modifiers, mutating the data behind them, and checking what `update` does
//! to the DOM.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pretty_assertions::assert_eq;
use splice_dom::runtime::Rendered;
use splice_dom::testing::{inner_html, Pilot};
use splice_dom::{
    attr, condition, el, list, reactive_attr, reactive_text, text, Condition, Error, EvalError,
    NodeId, RenderMode, Resolver, UiConfig, WhenRerender, when,
};

#[derive(Debug)]
struct Row {
    id: u32,
}

type Rows = Rc<RefCell<Vec<Rc<Row>>>>;

fn rows(ids: &[u32]) -> Rows {
    Rc::new(RefCell::new(ids.iter().map(|&id| Rc::new(Row { id })).collect()))
}

/// Mount `<ul>` with one `<li>` per row, counting renders.
fn mount_rows(pilot: &mut Pilot, source: &Rows) -> (NodeId, Rc<Cell<usize>>) {
    let renders = Rc::new(Cell::new(0));
    let counter = renders.clone();
    let provider = source.clone();
    let ul = pilot
        .mount(el(
            "ul",
            [list(
                move || provider.borrow().clone(),
                move |ui, row, _| {
                    counter.set(counter.get() + 1);
                    let li = ui.build("li", &[attr("data-id", row.id.to_string()), text(row.id.to_string())])?;
                    Ok(li.into())
                },
            )],
        ))
        .unwrap()
        .unwrap();
    (ul, renders)
}

fn item_nodes(pilot: &Pilot, ul: NodeId) -> Vec<NodeId> {
    let dom = &pilot.ui().dom;
    dom.children(ul)
        .filter(|&n| dom.get(n).is_some_and(|d| d.is_element()))
        .collect()
}

// ---------------------------------------------------------------------------
// Lists
// ---------------------------------------------------------------------------

#[test]
fn test_list_noop_update_touches_nothing() {
    let mut pilot = Pilot::new();
    let source = rows(&[1, 2, 3]);
    let (_ul, renders) = mount_rows(&mut pilot, &source);
    assert!(pilot.update().unwrap().is_empty());
    assert!(pilot.update().unwrap().is_empty());
    assert_eq!(renders.get(), 3);
}

#[test]
fn test_list_reorder_keeps_nodes() {
    let mut pilot = Pilot::new();
    let source = rows(&[1, 2, 3]);
    let (ul, renders) = mount_rows(&mut pilot, &source);
    let before = item_nodes(&pilot, ul);
    {
        let mut v = source.borrow_mut();
        v.rotate_right(1);
    }
    pilot.update().unwrap();
    assert_eq!(item_nodes(&pilot, ul), vec![before[2], before[0], before[1]]);
    assert_eq!(renders.get(), 3);
}

#[test]
fn test_list_duplicates_are_independent() {
    let mut pilot = Pilot::new();
    let x = Rc::new(Row { id: 5 });
    let source: Rows = Rc::new(RefCell::new(vec![x.clone(), x.clone()]));
    let (ul, renders) = mount_rows(&mut pilot, &source);
    let first = item_nodes(&pilot, ul);
    assert_eq!(first.len(), 2);
    assert_ne!(first[0], first[1]);

    source.borrow_mut().pop();
    pilot.update().unwrap();
    assert_eq!(item_nodes(&pilot, ul), vec![first[0]]);

    source.borrow_mut().push(x.clone());
    pilot.update().unwrap();
    let again = item_nodes(&pilot, ul);
    assert_eq!(again[0], first[0]);
    assert_eq!(renders.get(), 3);
}

#[test]
fn test_list_single_removal() {
    let mut pilot = Pilot::new();
    let source = rows(&[1, 2, 3]);
    let (ul, _renders) = mount_rows(&mut pilot, &source);
    let before = item_nodes(&pilot, ul);
    source.borrow_mut().remove(0);
    let stats = pilot.update().unwrap();
    assert_eq!(stats.remove_child, 1);
    assert_eq!(stats.insert_before + stats.append_child, 0);
    assert_eq!(item_nodes(&pilot, ul), before[1..].to_vec());
}

#[test]
fn test_list_remove_and_swap_scenario() {
    let mut pilot = Pilot::new();
    let source = rows(&[1, 2, 3]);
    let (ul, renders) = mount_rows(&mut pilot, &source);
    let before = item_nodes(&pilot, ul);
    {
        let mut v = source.borrow_mut();
        let (one, two) = (v[0].clone(), v[1].clone());
        *v = vec![two, one];
    }
    let stats = pilot.update().unwrap();
    assert_eq!(stats.remove_child, 1);
    assert_eq!(renders.get(), 3);
    assert_eq!(item_nodes(&pilot, ul), vec![before[1], before[0]]);
    insta::assert_snapshot!(
        pilot.html(),
        @r#"<ul><!--list-start-1--><li data-id="2">2</li><li data-id="1">1</li><!--list-end--></ul>"#
    );
}

#[test]
fn test_list_marker_prefix_is_configurable() {
    let mut pilot = Pilot::with_config(UiConfig::new().with_list_marker_prefix("rows"));
    let source = rows(&[]);
    mount_rows(&mut pilot, &source);
    assert_eq!(pilot.html(), "<ul><!--rows-start-1--><!--rows-end--></ul>");
}

// ---------------------------------------------------------------------------
// When chains
// ---------------------------------------------------------------------------

#[test]
fn test_when_short_circuit() {
    let mut pilot = Pilot::new();
    let c_calls = Rc::new(Cell::new(0));
    let c = c_calls.clone();
    pilot
        .mount(
            when(|| false, [text("A")])
                .when(|| true, [text("B")])
                .when(
                    move || {
                        c.set(c.get() + 1);
                        true
                    },
                    [text("C")],
                ),
        )
        .unwrap();
    pilot.update().unwrap();
    assert_eq!(pilot.text(), "B");
    assert_eq!(c_calls.get(), 0);
}

#[test]
fn test_when_switches_branches() {
    let mut pilot = Pilot::new();
    let state = Rc::new(Cell::new(0u8));
    let (a, b) = (state.clone(), state.clone());
    pilot
        .mount(el(
            "main",
            [when(move || a.get() == 1, [text("one")])
                .when(move || b.get() == 2, [el("b", [text("two")])])
                .otherwise([text("none")])
                .into()],
        ))
        .unwrap();
    assert_eq!(pilot.text(), "none");
    state.set(2);
    pilot.update().unwrap();
    insta::assert_snapshot!(
        pilot.html(),
        @"<main><!--when-start-1--><b>two</b><!--when-end--></main>"
    );
    state.set(1);
    pilot.update().unwrap();
    assert_eq!(pilot.text(), "one");
}

#[test]
fn test_when_on_branch_change_is_quiet() {
    let config = UiConfig::new().with_when_rerender(WhenRerender::OnBranchChange);
    let mut pilot = Pilot::with_config(config);
    pilot.mount(when(|| true, [el("p", [])])).unwrap();
    assert!(pilot.update().unwrap().is_empty());
}

#[test]
fn test_when_condition_failure_propagates() {
    let mut pilot = Pilot::new();
    let broken = Rc::new(Cell::new(false));
    let b = broken.clone();
    pilot
        .mount(when(
            Condition::fallible(move || if b.get() { Err("branch exploded") } else { Ok(true) }),
            [text("kept")],
        ))
        .unwrap();
    broken.set(true);
    let err = pilot.update().unwrap_err();
    assert_eq!(
        err,
        Error::Condition {
            branch: 0,
            source: EvalError::new("branch exploded"),
        }
    );
    assert_eq!(pilot.text(), "kept");
}

// ---------------------------------------------------------------------------
// Toggle elements
// ---------------------------------------------------------------------------

#[test]
fn test_toggle_failure_hides_without_error() {
    let mut pilot = Pilot::new();
    let condition = Condition::fallible(|| Err::<bool, _>("toggle exploded"));
    pilot
        .mount(el("aside", [splice_dom::Modifier::Condition(condition), text("x")]))
        .unwrap();
    assert!(pilot.update().is_ok());
    assert_eq!(pilot.html(), "<!--conditional-aside-hidden-->");
}

#[test]
fn test_toggle_swaps_in_place() {
    let mut pilot = Pilot::new();
    let visible = Rc::new(Cell::new(false));
    let v = visible.clone();
    pilot.mount(text("[")).unwrap();
    pilot
        .mount(el("em", [condition(move || v.get()), text("on")]))
        .unwrap();
    pilot.mount(text("]")).unwrap();
    assert_eq!(pilot.html(), "[<!--conditional-em-hidden-->]");

    visible.set(true);
    let stats = pilot.update().unwrap();
    assert_eq!(stats.replace_child, 1);
    assert_eq!(pilot.html(), "[<em>on</em>]");
    assert!(pilot.update().unwrap().is_empty());
}

#[test]
fn test_toggle_ssr_placeholder() {
    let mut pilot = Pilot::with_config(UiConfig::new().with_mode(RenderMode::Ssr));
    pilot.mount(el("nav", [condition(|| false)])).unwrap();
    assert_eq!(pilot.html(), "<!--conditional-nav-ssr-->");
}

// ---------------------------------------------------------------------------
// Reactive bindings and orchestration
// ---------------------------------------------------------------------------

#[test]
fn test_reactive_text_and_attributes_follow_data() {
    let mut pilot = Pilot::new();
    let count = Rc::new(Cell::new(0));
    let (c1, c2) = (count.clone(), count.clone());
    pilot
        .mount(el(
            "output",
            [
                reactive_attr("data-count", Resolver::new(move || c1.get())),
                reactive_text(move || c2.get()),
            ],
        ))
        .unwrap();
    count.set(3);
    pilot.update().unwrap();
    assert_eq!(pilot.html(), r#"<output data-count="3">3</output>"#);
}

#[test]
fn test_reactive_failure_is_isolated() {
    let mut pilot = Pilot::new();
    let count = Rc::new(Cell::new(1));
    let c = count.clone();
    pilot
        .mount(el(
            "p",
            [
                splice_dom::Modifier::ReactiveText(Resolver::fallible(|| Err::<u8, _>("nope"))),
                text("|"),
                reactive_text(move || c.get()),
            ],
        ))
        .unwrap();
    count.set(2);
    pilot.update().unwrap();
    assert_eq!(pilot.text(), "|2");
}

#[test]
fn test_items_added_in_update_see_reactive_pass() {
    let mut pilot = Pilot::new();
    let label = Rc::new(RefCell::new("old".to_owned()));
    let source = rows(&[]);
    let provider = source.clone();
    let l = label.clone();
    pilot
        .mount(list(move || provider.borrow().clone(), move |ui, _row, _| {
            let l = l.clone();
            Ok(ui.build("span", &[reactive_text(move || l.borrow().clone())])?.into())
        }))
        .unwrap();
    source.borrow_mut().push(Rc::new(Row { id: 1 }));
    *label.borrow_mut() = "new".to_owned();
    pilot.update().unwrap();
    assert_eq!(pilot.text(), "new");
}

#[test]
fn test_removed_regions_are_pruned() {
    let mut pilot = Pilot::new();
    let source = rows(&[1]);
    let (ul, _renders) = mount_rows(&mut pilot, &source);
    pilot.mount(when(|| true, [reactive_text(|| "x")])).unwrap();
    assert_eq!(pilot.ui().registry().list_count(), 1);

    let body = pilot.ui().dom.body();
    pilot.ui_mut().dom.remove_child(body, ul).unwrap();
    pilot.update().unwrap();
    assert_eq!(pilot.ui().registry().list_count(), 0);
    assert_eq!(pilot.ui().registry().when_count(), 1);
}

#[test]
fn test_deferred_list_items() {
    let mut pilot = Pilot::new();
    let source = rows(&[7, 8]);
    let provider = source.clone();
    pilot
        .mount(list(move || provider.borrow().clone(), |_ui, row, _| {
            Ok(Rendered::from(el("i", [text(row.id.to_string())])))
        }))
        .unwrap();
    assert_eq!(
        inner_html(&pilot.ui().dom, pilot.ui().dom.body()),
        "<!--list-start-1--><i>7</i><i>8</i><!--list-end-->"
    );
}
