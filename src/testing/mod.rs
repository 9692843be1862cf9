//! Headless testing helpers: Pilot, markup snapshots.
//!
//! Use the [`Pilot`] to mount modifiers and run updates while counting DOM
//! operations. Use [`to_html`] and [`inner_html`] to capture markup for
//! assertions or `insta` snapshots.

pub mod pilot;
pub mod snapshot;

pub use pilot::Pilot;
pub use snapshot::{inner_html, render_to_string, to_html};
