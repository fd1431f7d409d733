//! One-shot whole-tree wrap and the document wrapper.
//!
//! Wrapping walks the foreign document once, in document order, and
//! builds exactly one wrapper per node: the document, every descendant
//! node, and every attribute of every element. The resulting
//! [`WrappedDocument`] owns the wrapper arena and everything
//! document-scoped: the document number, user data, and the engine
//! configuration reference.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use xml_node_traits::{
    error::Result, name::DocumentNumberAllocator, Configuration, Error,
};

use crate::factory::{make_wrapper, WrapperSlot};
use crate::foreign::{ForeignNodeType, ForeignTree};
use crate::node::NodeRef;

/// Index of a wrapper within a wrapped document's arena
pub(crate) type WrapperId = usize;

/// A foreign document presented as a query-engine node graph.
///
/// One per wrapped tree; borrows the foreign tree and never outlives
/// it. Not safe for concurrent use: wrap must complete before any
/// traversal starts, and no two wraps may run over the same tree.
pub struct WrappedDocument<'t, T: ForeignTree> {
    pub(crate) tree: &'t T,
    pub(crate) config: Rc<RefCell<Configuration>>,
    pub(crate) slots: Vec<WrapperSlot<T::Handle>>,
    pub(crate) by_handle: HashMap<T::Handle, WrapperId>,
    document_number: u64,
    user_data: RefCell<HashMap<String, String>>,
}

/// Wrap a foreign document root, producing its document wrapper.
///
/// Strictly one-shot per tree: fails with `AlreadyWrapped` when the
/// root already carries a wrapper graph, or when any handle is met
/// twice during the pass. The document number is allocated here,
/// exactly once, before the pass begins.
pub fn wrap<'t, T: ForeignTree>(
    tree: &'t T,
    doc: T::Handle,
    config: Rc<RefCell<Configuration>>,
) -> Result<WrappedDocument<'t, T>> {
    if tree.node_type(doc) != ForeignNodeType::Document {
        return Err(Error::UnsupportedNodeKind(format!(
            "cannot wrap a {} node as a document",
            tree.node_type(doc).name()
        )));
    }
    if !tree.mark_wrapped(doc) {
        return Err(Error::already_wrapped(
            "document is already annotated with a wrapper",
        ));
    }

    let document_number = config.borrow_mut().allocate_document_number();
    let mut wrapped = WrappedDocument {
        tree,
        config,
        slots: Vec::new(),
        by_handle: HashMap::new(),
        document_number,
        user_data: RefCell::new(HashMap::new()),
    };

    wrapped.annotate(doc)?;
    for node in tree.descendants(doc) {
        wrapped.annotate(node)?;
        if tree.node_type(node) == ForeignNodeType::Element {
            for attr in tree.attributes(node) {
                wrapped.annotate(attr)?;
            }
        }
    }
    Ok(wrapped)
}

impl<'t, T: ForeignTree> WrappedDocument<'t, T> {
    fn annotate(&mut self, handle: T::Handle) -> Result<()> {
        if self.by_handle.contains_key(&handle) {
            return Err(Error::AlreadyWrapped(format!(
                "{} node is already annotated with a wrapper",
                self.tree.node_type(handle).name()
            )));
        }
        let slot = make_wrapper(self.tree, handle)?;
        let id = self.slots.len();
        self.slots.push(slot);
        self.by_handle.insert(handle, id);
        Ok(())
    }

    /// The document node itself
    pub fn root(&self) -> NodeRef<'_, 't, T> {
        // slot 0 is the document, established by wrap()
        NodeRef::new(self, 0)
    }

    /// The wrapper attached to a foreign node, if one exists
    pub fn wrapper_for(&self, handle: T::Handle) -> Option<NodeRef<'_, 't, T>> {
        self.by_handle.get(&handle).map(|&id| NodeRef::new(self, id))
    }

    /// The foreign tree this document wraps
    pub fn tree(&self) -> &'t T {
        self.tree
    }

    /// Document number allocated at wrap time; immutable thereafter
    pub fn document_number(&self) -> u64 {
        self.document_number
    }

    /// Number of wrappers attached by the wrap pass
    pub fn wrapper_count(&self) -> usize {
        self.slots.len()
    }

    /// System identifier: the foreign document's base URI, if any
    pub fn system_id(&self) -> Option<String> {
        self.tree.base_uri(self.slots[0].handle)
    }

    /// Retrieve a user-data property previously stored with
    /// [`set_user_data`](Self::set_user_data)
    pub fn user_data(&self, key: &str) -> Option<String> {
        self.user_data.borrow().get(key).cloned()
    }

    /// Store a user-data property on the document node. Last write
    /// wins; None removes the key.
    pub fn set_user_data(&self, key: &str, value: Option<String>) {
        let mut data = self.user_data.borrow_mut();
        match value {
            Some(v) => {
                data.insert(key.to_string(), v);
            }
            None => {
                data.remove(key);
            }
        }
    }

    /// Whether any node carries a type annotation other than untyped.
    /// No schema validation is performed, so always false.
    pub fn is_typed(&self) -> bool {
        false
    }

    /// Find the element with a given ID.
    ///
    /// The foreign model cannot resolve DTD-declared ID attributes
    /// without schema information, so this is an acknowledged gap.
    pub fn select_id(&self, _id: &str, _want_parent: bool) -> Result<NodeRef<'_, 't, T>> {
        Err(Error::NotImplemented("select_id"))
    }

    /// Names of unparsed entities declared in the document. The
    /// foreign model gives no access to them, so always empty.
    pub fn unparsed_entity_names(&self) -> Vec<String> {
        Vec::new()
    }

    /// System/public identifier pair of a named unparsed entity;
    /// always None, as above.
    pub fn unparsed_entity(&self, _name: &str) -> Option<(String, String)> {
        None
    }
}

impl<'t, T: ForeignTree> std::fmt::Debug for WrappedDocument<'t, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WrappedDocument")
            .field("document_number", &self.document_number)
            .field("wrappers", &self.slots.len())
            .finish()
    }
}
