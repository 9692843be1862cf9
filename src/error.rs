//! Error types: DOM operation failures, resolver failures, update failures.

use crate::dom::node::NodeId;

/// Errors from arena DOM tree operations.
///
/// A failed operation never leaves the tree half-modified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("node {0:?} does not exist")]
    NotFound(NodeId),
    #[error("node {0:?} is not an element")]
    NotAnElement(NodeId),
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },
    #[error("cannot insert {child:?} into {parent:?}: {reason}")]
    HierarchyRequest {
        parent: NodeId,
        child: NodeId,
        reason: &'static str,
    },
}

/// A resolver or condition failed to produce a value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct EvalError {
    message: String,
}

impl EvalError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors surfaced by rendering and [`Ui::update`](crate::Ui::update).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Dom(#[from] DomError),
    /// A `when` branch condition failed. Never swallowed.
    #[error("when-branch condition #{branch} failed: {source}")]
    Condition {
        branch: usize,
        #[source]
        source: EvalError,
    },
    /// Several runtimes failed within one update pass.
    #[error("{} runtime(s) failed during update", failures.len())]
    Update { failures: Vec<Error> },
}

impl Error {
    /// Collapse the failures collected during a pass into a single result.
    pub(crate) fn from_failures(mut failures: Vec<Error>) -> Result<(), Error> {
        match failures.len() {
            0 => Ok(()),
            1 => Err(failures.remove(0)),
            _ => Err(Error::Update { failures }),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
