//! `when` / `otherwise` chains: a marker-bounded region showing the content of
//! the first branch whose condition holds.
//!
//! Branch conditions are evaluated in order and evaluation stops at the first
//! `true`. A failing condition is returned as [`Error::Condition`] and the
//! region keeps whatever it showed before.
//!
//! Node identity is not preserved by default: every update clears the region
//! and rebuilds the selected content, even when the same branch is selected
//! again, so its nodes and their listeners are replaced each time. Use
//! [`WhenRerender::OnBranchChange`] to rebuild only when the selected branch
//! changes.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};

use super::marker::Markers;
use super::registry::{Reconcile, RuntimeKind};
use crate::config::WhenRerender;
use crate::dom::tree::Dom;
use crate::error::{Error, Result};
use crate::modifier::{Condition, Modifier, Slot};
use crate::ui::Ui;

const MARKER_PREFIX: &str = "when";

struct Branch {
    condition: Condition,
    content: Vec<Modifier>,
}

#[derive(Default)]
struct Chain {
    branches: Vec<Branch>,
    otherwise: Option<Vec<Modifier>>,
}

/// Which content a chain selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Selection {
    Branch(usize),
    Otherwise,
    Empty,
}

impl Chain {
    fn select(&self) -> Result<Selection> {
        for (index, branch) in self.branches.iter().enumerate() {
            let holds = branch
                .condition
                .eval()
                .map_err(|source| Error::Condition {
                    branch: index,
                    source,
                })?;
            if holds {
                return Ok(Selection::Branch(index));
            }
        }
        Ok(match self.otherwise {
            Some(_) => Selection::Otherwise,
            None => Selection::Empty,
        })
    }

    fn content(&self, selection: Selection) -> &[Modifier] {
        match selection {
            Selection::Branch(index) => &self.branches[index].content,
            Selection::Otherwise => self.otherwise.as_deref().unwrap_or_default(),
            Selection::Empty => &[],
        }
    }
}

/// Chain builder returned by [`when`].
#[must_use = "a when chain does nothing until it is used as a modifier"]
pub struct WhenBuilder {
    chain: Chain,
}

/// Start a chain: show `content` while `condition` holds.
///
/// ```ignore
/// el("main", [
///     when(move || state.loading(), [text("Loading")])
///         .when(move || state.failed(), [text("Failed")])
///         .otherwise([el("p", [reactive_text(move || state.message())])])
///         .into(),
/// ])
/// ```
pub fn when(
    condition: impl Into<Condition>,
    content: impl IntoIterator<Item = Modifier>,
) -> WhenBuilder {
    WhenBuilder {
        chain: Chain::default(),
    }
    .when(condition, content)
}

impl WhenBuilder {
    /// Add a branch, checked after the ones already added.
    pub fn when(
        mut self,
        condition: impl Into<Condition>,
        content: impl IntoIterator<Item = Modifier>,
    ) -> Self {
        self.chain.branches.push(Branch {
            condition: condition.into(),
            content: content.into_iter().collect(),
        });
        self
    }

    /// Content shown when no branch holds. Replaces earlier fallback content.
    pub fn otherwise(mut self, content: impl IntoIterator<Item = Modifier>) -> Self {
        self.chain.otherwise = Some(content.into_iter().collect());
        self
    }
}

impl From<WhenBuilder> for Modifier {
    fn from(builder: WhenBuilder) -> Self {
        let chain = Rc::new(builder.chain);
        Modifier::Apply(Rc::new(move |ui, slot, _index| {
            create_when_runtime(ui, slot, chain.clone())?;
            Ok(None)
        }))
    }
}

pub(crate) struct WhenRuntime {
    chain: Rc<Chain>,
    markers: Markers,
    /// Selection currently rendered; `None` before the first successful render.
    rendered: Option<Selection>,
}

fn create_when_runtime(
    ui: &mut Ui,
    slot: Slot,
    chain: Rc<Chain>,
) -> Result<Rc<RefCell<WhenRuntime>>> {
    let id = ui.next_region_id();
    let markers = Markers::insert(&mut ui.dom, slot, MARKER_PREFIX, id)?;
    let runtime = Rc::new(RefCell::new(WhenRuntime {
        chain,
        markers,
        rendered: None,
    }));
    ui.registry.register(RuntimeKind::When, runtime.clone());
    runtime.borrow_mut().reconcile(ui)?;
    Ok(runtime)
}

impl Reconcile for WhenRuntime {
    fn is_connected(&self, dom: &Dom) -> bool {
        self.markers.is_connected(dom)
    }

    fn reconcile(&mut self, ui: &mut Ui) -> Result<()> {
        let selection = self.chain.select()?;
        if ui.config.when_rerender == WhenRerender::OnBranchChange
            && self.rendered == Some(selection)
        {
            trace!(?selection, "when branch unchanged");
            return Ok(());
        }
        let Some(parent) = self.markers.parent(&ui.dom) else {
            debug!("when markers separated; skipping render");
            return Ok(());
        };
        let removed = self.markers.clear(&mut ui.dom)?;
        self.rendered = Some(selection);
        let content = self.chain.content(selection);
        debug!(?selection, removed, "when region rendered");
        ui.apply_modifiers(Slot::before(parent, self.markers.end), content, 0)
    }
}
