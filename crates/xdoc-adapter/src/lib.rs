//! Adapter presenting a foreign XML document tree as the node graph an
//! XPath-style query engine navigates.
//!
//! The foreign tree is owned elsewhere and never copied or re-parsed;
//! a one-shot [`wrap`] pass attaches exactly one wrapper per node, and
//! the engine then walks the wrapper graph through [`NodeRef`] and the
//! axis cursors, reaching the foreign tree only by back-reference.

pub mod axis;
pub mod factory;
pub mod foreign;
pub mod node;
pub mod tree;
pub mod wrap;

// Re-export main types
pub use axis::{AxisFilter, AxisIter, AxisIteratorAdapter};
pub use factory::WrapperKind;
pub use foreign::{ForeignNodeType, ForeignTree};
pub use node::{CopyOptions, NodeRef};
pub use tree::{XotHandle, XotTree};
pub use wrap::{wrap, WrappedDocument};

// Re-export key contract types for convenience
pub use xml_node_traits::{
    Configuration, Error, LookaheadIterator, NodeKind, NodeTest, Result,
};
