//! Abstraction over the externally-owned document tree.
//!
//! The adapter never parses, copies or mutates the foreign tree; it
//! reads it through this trait and keys everything on the tree's own
//! handle identity. Handles are cheap copyable values whose equality is
//! reference identity in the foreign model.

use std::fmt::Debug;
use std::hash::Hash;

/// Kind of a node as reported by the foreign document model.
///
/// This is the foreign model's vocabulary, not the engine's: CDATA
/// sections are distinct from plain text here, and some models expose
/// standalone namespace nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForeignNodeType {
    /// Document node
    Document,
    /// Element node
    Element,
    /// Attribute node (namespace declarations included, flagged via
    /// [`ForeignTree::is_namespace_decl`])
    Attribute,
    /// Text node
    Text,
    /// CDATA section
    CData,
    /// Comment node
    Comment,
    /// Processing instruction node
    ProcessingInstruction,
    /// Standalone namespace node
    Namespace,
}

impl ForeignNodeType {
    /// Stable name used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            ForeignNodeType::Document => "document",
            ForeignNodeType::Element => "element",
            ForeignNodeType::Attribute => "attribute",
            ForeignNodeType::Text => "text",
            ForeignNodeType::CData => "cdata",
            ForeignNodeType::Comment => "comment",
            ForeignNodeType::ProcessingInstruction => "processing-instruction",
            ForeignNodeType::Namespace => "namespace",
        }
    }
}

/// Read-only view of a foreign XML document tree.
///
/// Implementations supply handles for every node the adapter must
/// navigate, including attribute and namespace-declaration handles,
/// which share one ordered per-element collection.
pub trait ForeignTree {
    /// Handle identifying one node; equality is node identity
    type Handle: Copy + Eq + Hash + Debug;

    /// Kind of the node behind a handle
    fn node_type(&self, node: Self::Handle) -> ForeignNodeType;

    /// Parent of a node; for attribute handles, the owning element
    fn parent(&self, node: Self::Handle) -> Option<Self::Handle>;

    /// Child nodes in document order (no attributes or namespaces)
    fn children(&self, node: Self::Handle) -> Vec<Self::Handle>;

    /// Attribute handles of an element in document order, namespace
    /// declarations and ordinary attributes interleaved as the model
    /// stores them. Empty for non-elements.
    fn attributes(&self, node: Self::Handle) -> Vec<Self::Handle>;

    /// Whether an attribute handle is a namespace declaration
    fn is_namespace_decl(&self, node: Self::Handle) -> bool;

    /// Next sibling in the foreign model's raw order. For attribute
    /// handles this is the next entry in the owning element's
    /// attribute collection, declaration or not.
    fn next_sibling(&self, node: Self::Handle) -> Option<Self::Handle>;

    /// Previous sibling in the foreign model's raw order
    fn previous_sibling(&self, node: Self::Handle) -> Option<Self::Handle>;

    /// Local part of the node's name; None for unnamed kinds. For
    /// processing instructions this is the target; for namespace
    /// declarations, the declared prefix (empty for the default
    /// namespace).
    fn local_name(&self, node: Self::Handle) -> Option<String>;

    /// Namespace prefix of the node's name, if any
    fn prefix(&self, node: Self::Handle) -> Option<String>;

    /// Namespace URI of the node's name, if any. For namespace
    /// declarations this is the declared URI.
    fn namespace_uri(&self, node: Self::Handle) -> Option<String>;

    /// String value: concatenated text for containers, content for
    /// text/comment nodes, value for attributes, data for processing
    /// instructions.
    fn string_value(&self, node: Self::Handle) -> String;

    /// Base URI of the node, if the model tracks one
    fn base_uri(&self, node: Self::Handle) -> Option<String>;

    /// Descendant nodes of `node` in document order, excluding `node`
    /// itself and excluding attributes.
    fn descendants(&self, node: Self::Handle) -> Vec<Self::Handle> {
        let mut out = Vec::new();
        let mut stack: Vec<Self::Handle> = self.children(node);
        stack.reverse();
        while let Some(n) = stack.pop() {
            out.push(n);
            let mut kids = self.children(n);
            kids.reverse();
            stack.extend(kids);
        }
        out
    }

    /// Claim the annotation slot recording that a wrapper graph is now
    /// attached at `root`. Returns false when the slot is already
    /// taken, in which case the caller must not attach a second graph.
    fn mark_wrapped(&self, root: Self::Handle) -> bool;
}
