//! Error types for node adapter operations

use crate::node::NodeKind;

/// Result type for node adapter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the node adapter contract.
///
/// All variants are programmer/contract errors surfaced synchronously to
/// the immediate caller; none are retried or swallowed internally.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A wrapper graph is already attached to the tree or node
    #[error("already wrapped: {0}")]
    AlreadyWrapped(String),

    /// The wrapper factory received a node kind outside the supported set
    #[error("unsupported node kind: {0}")]
    UnsupportedNodeKind(String),

    /// An axis was requested on a node kind that does not provide it
    #[error("axis '{axis}' is not supported on {kind:?} nodes")]
    UnsupportedAxis {
        /// Name of the requested axis
        axis: &'static str,
        /// Kind of the node the axis was requested on
        kind: NodeKind,
    },

    /// A deliberately unfinished capability was invoked
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),

    /// A copy sink rejected an event
    #[error("receiver error: {0}")]
    Receive(String),
}

impl Error {
    /// Create a new unsupported-axis error
    pub fn unsupported_axis(axis: &'static str, kind: NodeKind) -> Self {
        Error::UnsupportedAxis { axis, kind }
    }

    /// Create a new already-wrapped error
    pub fn already_wrapped<S: Into<String>>(what: S) -> Self {
        Error::AlreadyWrapped(what.into())
    }
}
