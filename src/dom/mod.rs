//! DOM arena: slotmap-backed node tree with DOM mutation semantics and queries.

pub mod node;
pub mod query;
pub mod stats;
pub mod tree;

pub use node::{NodeData, NodeId, NodeKind};
pub use stats::MutationStats;
pub use tree::{Children, Dom};
