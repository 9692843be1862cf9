//! The update orchestrator.
//!
//! [`Ui::update`] brings every registered runtime and binding in line with
//! current data, in a fixed order:
//!
//! 1. list runtimes
//! 2. `when` runtimes
//! 3. toggle elements
//! 4. reactive elements (bubbling update event)
//! 5. reactive text nodes
//! 6. the update event on body, then on the document
//!
//! Lists and `when` regions run first so nodes they create are visited by the
//! reactive passes of the same update.

use tracing::{debug, error, instrument, warn};

use crate::error::{Error, Result};
use crate::event::Event;
use crate::runtime::reactive;
use crate::runtime::registry::RuntimeKind;
use crate::ui::Ui;

impl Ui {
    /// Run one update pass.
    ///
    /// Every stage runs even if an earlier one failed. Failures are logged as
    /// they happen and returned together at the end: a single failure as is,
    /// several wrapped in [`Error::Update`]. A failing `when` condition is
    /// therefore always reported.
    ///
    /// Calling `update` again from inside a resolver, condition or render
    /// callback is the caller's responsibility. The nested pass skips every
    /// runtime the outer pass is reconciling at that moment, logging a
    /// warning for each, so those regions catch up on the next update.
    #[instrument(skip_all)]
    pub fn update(&mut self) -> Result<()> {
        let mut failures = Vec::new();
        failures.extend(self.reconcile_kind(RuntimeKind::List));
        failures.extend(self.reconcile_kind(RuntimeKind::When));
        failures.extend(self.reconcile_kind(RuntimeKind::Toggle));
        self.notify_reactive_elements();
        self.notify_reactive_text_nodes();
        self.dispatch_global_update();
        Error::from_failures(failures)
    }

    pub fn update_list_runtimes(&mut self) -> Result<()> {
        Error::from_failures(self.reconcile_kind(RuntimeKind::List))
    }

    pub fn update_when_runtimes(&mut self) -> Result<()> {
        Error::from_failures(self.reconcile_kind(RuntimeKind::When))
    }

    pub fn update_toggle_runtimes(&mut self) -> Result<()> {
        Error::from_failures(self.reconcile_kind(RuntimeKind::Toggle))
    }

    /// Dispatch the update event to every connected reactive element.
    /// Returns how many were notified.
    pub fn notify_reactive_elements(&mut self) -> usize {
        let event = self.config.update_event.clone();
        reactive::notify_reactive_elements(&mut self.dom, &mut self.registry, &event)
    }

    /// Re-resolve every connected reactive text node. Returns how many were
    /// written.
    pub fn notify_reactive_text_nodes(&mut self) -> usize {
        reactive::notify_reactive_text_nodes(&mut self.dom, &mut self.registry)
    }

    /// Reconcile a snapshot of the runtimes of `kind`, collecting failures.
    fn reconcile_kind(&mut self, kind: RuntimeKind) -> Vec<Error> {
        let mut failures = Vec::new();
        for handle in self.registry.snapshot(kind) {
            if self
                .registry
                .unregister_if_disconnected(kind, &handle, &self.dom)
            {
                debug!(?kind, "pruned disconnected runtime");
                continue;
            }
            let Ok(mut runtime) = handle.try_borrow_mut() else {
                warn!(?kind, "runtime is already reconciling; skipped by nested update");
                continue;
            };
            if let Err(err) = runtime.reconcile(self) {
                error!(?kind, "runtime failed to reconcile: {err}");
                failures.push(err);
            }
        }
        if kind == RuntimeKind::Toggle {
            let dom = &self.dom;
            self.registry.retain_toggle_nodes(|node| dom.is_connected(node));
        }
        failures
    }

    fn dispatch_global_update(&mut self) {
        let name = self.config.update_event.clone();
        for target in [self.dom.body(), self.dom.document()] {
            let outcome = self.dom.dispatch_event(target, Event::new(name.as_str()));
            if !outcome.is_clean() {
                error!(?target, failures = outcome.failures, "global update listeners failed");
            }
        }
    }
}
