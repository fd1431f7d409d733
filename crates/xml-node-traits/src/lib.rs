//! Node-level contract traits for XPath-style query engines.
//!
//! This crate defines the capability set a query engine requires from a
//! navigable node graph: node kinds and tests, interned name codes with
//! a prefix-independent fingerprint, the lookahead cursor protocol used
//! for axis traversal, and the event sink used for deep copies. Tree
//! adapters implement this contract; engines consume it.

pub mod axis;
pub mod error;
pub mod name;
pub mod node;
pub mod receiver;

pub use axis::LookaheadIterator;
pub use error::{Error, Result};
pub use name::{
    Configuration, DocumentNumberAllocator, NameCode, NamePool, NameRegistry, FINGERPRINT_MASK,
    NO_NAME,
};
pub use node::{NamespaceBinding, NodeKind, NodeTest, QualifiedName};
pub use receiver::{NamespaceReducer, Receiver};
