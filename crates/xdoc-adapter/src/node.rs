//! The node wrapper family.
//!
//! [`NodeRef`] is the polymorphic unit presenting one foreign node to
//! the query engine: identity, naming, parent/sibling navigation, axis
//! iteration and deep copy. Dispatch over the closed kind set was
//! resolved by the wrapper factory at wrap time; every operation here
//! is a pure read over foreign-tree state plus wrapper-local caches.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use xml_node_traits::{
    error::Result,
    name::{NameCode, NamePool, NameRegistry, NO_NAME},
    Error, NamespaceBinding, NamespaceReducer, NodeKind, NodeTest, QualifiedName, Receiver,
};

use crate::axis::{AxisIter, AxisIteratorAdapter};
use crate::factory::{WrapperKind, WrapperSlot};
use crate::foreign::ForeignTree;
use crate::wrap::{WrappedDocument, WrapperId};

/// Options controlling [`NodeRef::copy_to`]
#[derive(Debug, Clone, Copy)]
pub struct CopyOptions {
    /// Copy the node's descendants as well as the node itself
    pub deep: bool,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self { deep: true }
    }
}

impl CopyOptions {
    /// Copy the whole subtree
    pub fn deep() -> Self {
        Self { deep: true }
    }

    /// Copy the node only
    pub fn shallow() -> Self {
        Self { deep: false }
    }
}

// Rank of a node among the children of a common parent: namespace
// declarations precede attributes, which precede child content.
const RANK_NAMESPACE: u8 = 0;
const RANK_ATTRIBUTE: u8 = 1;
const RANK_CHILD: u8 = 2;

/// Wrapper around one foreign node.
///
/// Cheap to copy; identity is the identity of the foreign node behind
/// it, never the wrapper instance.
pub struct NodeRef<'a, 't, T: ForeignTree> {
    doc: &'a WrappedDocument<'t, T>,
    id: WrapperId,
}

impl<'a, 't, T: ForeignTree> Clone for NodeRef<'a, 't, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, 't, T: ForeignTree> Copy for NodeRef<'a, 't, T> {}

impl<'a, 't, T: ForeignTree> NodeRef<'a, 't, T> {
    pub(crate) fn new(doc: &'a WrappedDocument<'t, T>, id: WrapperId) -> Self {
        Self { doc, id }
    }

    fn slot(&self) -> &'a WrapperSlot<T::Handle> {
        &self.doc.slots[self.id]
    }

    fn tree(&self) -> &'t T {
        self.doc.tree
    }

    pub(crate) fn wrapper_kind(&self) -> WrapperKind {
        self.slot().kind
    }

    /// The underlying foreign node handle
    pub fn handle(&self) -> T::Handle {
        self.slot().handle
    }

    /// The document this node belongs to
    pub fn document(&self) -> &'a WrappedDocument<'t, T> {
        self.doc
    }

    /// Structural kind of this node. Attribute wrappers report
    /// [`NodeKind::Namespace`] for namespace declarations.
    pub fn kind(&self) -> NodeKind {
        if self.slot().kind == WrapperKind::Attribute
            && self.tree().is_namespace_decl(self.handle())
        {
            NodeKind::Namespace
        } else {
            self.slot().kind.node_kind()
        }
    }

    fn is_attribute_wrapper(&self) -> bool {
        self.slot().kind == WrapperKind::Attribute
    }

    fn is_container(&self) -> bool {
        matches!(
            self.slot().kind,
            WrapperKind::Document | WrapperKind::Element
        )
    }

    // ---- naming ----------------------------------------------------

    /// Local part of the name; empty for unnamed kinds. Namespace
    /// declarations report the declared prefix.
    pub fn local_name(&self) -> String {
        match self.slot().kind {
            WrapperKind::Element
            | WrapperKind::Attribute
            | WrapperKind::ProcessingInstruction => {
                self.tree().local_name(self.handle()).unwrap_or_default()
            }
            _ => String::new(),
        }
    }

    /// Namespace prefix; empty when none. Namespace declarations
    /// always report empty.
    pub fn prefix(&self) -> String {
        match self.slot().kind {
            WrapperKind::Element => self.tree().prefix(self.handle()).unwrap_or_default(),
            WrapperKind::Attribute => {
                if self.tree().is_namespace_decl(self.handle()) {
                    String::new()
                } else {
                    self.tree().prefix(self.handle()).unwrap_or_default()
                }
            }
            _ => String::new(),
        }
    }

    /// Namespace URI of the name; empty when the name is in no
    /// namespace and for unnamed kinds.
    pub fn namespace_uri(&self) -> String {
        match self.slot().kind {
            WrapperKind::Element => {
                self.tree().namespace_uri(self.handle()).unwrap_or_default()
            }
            WrapperKind::Attribute => {
                if self.tree().is_namespace_decl(self.handle()) {
                    String::new()
                } else {
                    self.tree().namespace_uri(self.handle()).unwrap_or_default()
                }
            }
            _ => String::new(),
        }
    }

    /// The expanded name as a single value
    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName::new(self.prefix(), self.namespace_uri(), self.local_name())
    }

    /// Display name: `prefix:local` for named nodes, the target for
    /// processing instructions, empty otherwise. Namespace-declaration
    /// attributes always report empty.
    pub fn display_name(&self) -> String {
        match self.slot().kind {
            WrapperKind::Element => self.qualified_name().display(),
            WrapperKind::Attribute => {
                if self.tree().is_namespace_decl(self.handle()) {
                    String::new()
                } else {
                    self.qualified_name().display()
                }
            }
            WrapperKind::ProcessingInstruction => self.local_name(),
            _ => String::new(),
        }
    }

    /// Memoized name code. Two wrappers with equal prefix, URI and
    /// local name resolve to the same code; masking with
    /// [`xml_node_traits::FINGERPRINT_MASK`] drops the prefix.
    pub fn name_code(&self) -> NameCode {
        if let Some(code) = self.slot().name_code.get() {
            return code;
        }
        let code = self.generate_name_code();
        self.slot().name_code.set(Some(code));
        code
    }

    fn generate_name_code(&self) -> NameCode {
        let mut config = self.doc.config.borrow_mut();
        match self.slot().kind {
            WrapperKind::Element => {
                let name = self.qualified_name();
                config.allocate(&name.prefix, &name.uri, &name.local)
            }
            WrapperKind::Attribute => {
                if self.tree().is_namespace_decl(self.handle()) {
                    config.allocate("", "", &self.local_name())
                } else {
                    let name = self.qualified_name();
                    config.allocate(&name.prefix, &name.uri, &name.local)
                }
            }
            WrapperKind::ProcessingInstruction => config.allocate("", "", &self.local_name()),
            _ => NO_NAME,
        }
    }

    /// The (URI, local-name) fingerprint of the name code
    pub fn fingerprint(&self) -> NameCode {
        NamePool::fingerprint(self.name_code())
    }

    // ---- values ----------------------------------------------------

    /// String value: concatenated text for containers, content or
    /// value for the leaf kinds.
    pub fn string_value(&self) -> String {
        self.tree().string_value(self.handle())
    }

    /// Base URI, if the foreign model tracks one
    pub fn base_uri(&self) -> Option<String> {
        self.tree().base_uri(self.handle())
    }

    /// Value of a named attribute of this element; None for missing
    /// attributes and for non-element nodes.
    pub fn attribute_value(&self, uri: &str, local: &str) -> Option<String> {
        if self.slot().kind != WrapperKind::Element {
            return None;
        }
        let tree = self.tree();
        tree.attributes(self.handle())
            .into_iter()
            .filter(|&a| !tree.is_namespace_decl(a))
            .find(|&a| {
                tree.namespace_uri(a).unwrap_or_default() == uri
                    && tree.local_name(a).as_deref() == Some(local)
            })
            .map(|a| tree.string_value(a))
    }

    /// Namespace declarations in force on this element, synthesized
    /// from the explicit declarations plus the bindings implied by the
    /// element's own name and its prefixed attributes. Empty for
    /// non-elements.
    pub fn declared_namespaces(&self) -> Vec<NamespaceBinding> {
        if self.slot().kind != WrapperKind::Element {
            return Vec::new();
        }
        let tree = self.tree();
        let mut bindings: Vec<NamespaceBinding> = Vec::new();
        let push = |b: NamespaceBinding, out: &mut Vec<NamespaceBinding>| {
            if !out.contains(&b) {
                out.push(b);
            }
        };

        for attr in tree.attributes(self.handle()) {
            if tree.is_namespace_decl(attr) {
                let prefix = tree.local_name(attr).unwrap_or_default();
                push(
                    NamespaceBinding::new(prefix, tree.string_value(attr)),
                    &mut bindings,
                );
            } else if let Some(uri) = tree.namespace_uri(attr) {
                if !uri.is_empty() {
                    push(
                        NamespaceBinding::new(tree.prefix(attr).unwrap_or_default(), uri),
                        &mut bindings,
                    );
                }
            }
        }
        if let Some(uri) = tree.namespace_uri(self.handle()) {
            if !uri.is_empty() {
                push(
                    NamespaceBinding::new(tree.prefix(self.handle()).unwrap_or_default(), uri),
                    &mut bindings,
                );
            }
        }
        bindings
    }

    // ---- navigation ------------------------------------------------

    /// Parent wrapper, or None at the tree root. For attributes this
    /// is the owning element.
    pub fn parent(&self) -> Option<NodeRef<'a, 't, T>> {
        let parent = self.tree().parent(self.handle())?;
        self.doc.wrapper_for(parent)
    }

    /// Next sibling, or None at the boundary. Attribute wrappers skip
    /// neighbors on the other namespace-declaration chain: namespace
    /// declarations and ordinary attributes navigate as two disjoint
    /// sibling chains over one underlying collection.
    pub fn next_sibling(&self) -> Option<NodeRef<'a, 't, T>> {
        let tree = self.tree();
        if self.is_attribute_wrapper() {
            let chain = tree.is_namespace_decl(self.handle());
            let mut n = tree.next_sibling(self.handle());
            while let Some(h) = n {
                if tree.is_namespace_decl(h) == chain {
                    return self.doc.wrapper_for(h);
                }
                n = tree.next_sibling(h);
            }
            None
        } else {
            tree.next_sibling(self.handle())
                .and_then(|h| self.doc.wrapper_for(h))
        }
    }

    /// Previous sibling, mirroring [`next_sibling`](Self::next_sibling)
    pub fn previous_sibling(&self) -> Option<NodeRef<'a, 't, T>> {
        let tree = self.tree();
        if self.is_attribute_wrapper() {
            let chain = tree.is_namespace_decl(self.handle());
            let mut n = tree.previous_sibling(self.handle());
            while let Some(h) = n {
                if tree.is_namespace_decl(h) == chain {
                    return self.doc.wrapper_for(h);
                }
                n = tree.previous_sibling(h);
            }
            None
        } else {
            tree.previous_sibling(self.handle())
                .and_then(|h| self.doc.wrapper_for(h))
        }
    }

    /// Zero-based position among same-chain siblings, computed by
    /// counting preceding siblings.
    // TODO: O(n) per call; worth caching if position-heavy queries show up
    pub fn sibling_position(&self) -> usize {
        let tree = self.tree();
        let mut count = 0;
        if self.is_attribute_wrapper() {
            let chain = tree.is_namespace_decl(self.handle());
            let mut n = tree.previous_sibling(self.handle());
            while let Some(h) = n {
                if tree.is_namespace_decl(h) == chain {
                    count += 1;
                }
                n = tree.previous_sibling(h);
            }
        } else {
            let mut n = tree.previous_sibling(self.handle());
            while let Some(h) = n {
                count += 1;
                n = tree.previous_sibling(h);
            }
        }
        count
    }

    /// First child in child order, or None outside containers
    pub fn first_child(&self) -> Option<NodeRef<'a, 't, T>> {
        if !self.is_container() {
            return None;
        }
        self.tree()
            .children(self.handle())
            .first()
            .and_then(|&h| self.doc.wrapper_for(h))
    }

    /// Whether this node has children; false outside containers
    pub fn has_child_nodes(&self) -> bool {
        self.is_container() && !self.tree().children(self.handle()).is_empty()
    }

    /// Next matching element in document order within a subtree.
    /// An acknowledged gap carried over from the source model.
    pub fn successor_element(
        &self,
        _anchor: &NodeRef<'a, 't, T>,
        _uri: Option<&str>,
        _local: Option<&str>,
    ) -> Result<NodeRef<'a, 't, T>> {
        Err(Error::NotImplemented("successor_element"))
    }

    // ---- identity and order ----------------------------------------

    /// Whether both wrappers present the same foreign node
    pub fn is_same_node(&self, other: &NodeRef<'a, 't, T>) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.handle() == other.handle()
    }

    fn depth(&self) -> usize {
        let mut d = 0;
        let mut n = self.parent();
        while let Some(p) = n {
            d += 1;
            n = p.parent();
        }
        d
    }

    fn rank(&self) -> u8 {
        match self.kind() {
            NodeKind::Namespace => RANK_NAMESPACE,
            NodeKind::Attribute => RANK_ATTRIBUTE,
            _ => RANK_CHILD,
        }
    }

    /// Total ordering consistent with document order. Nodes of
    /// different documents order by document number; within one
    /// document the shared sibling-counting walk applies, with
    /// namespace and attribute nodes ranked before child content under
    /// a common parent.
    pub fn compare_order(&self, other: &NodeRef<'a, 't, T>) -> Ordering {
        if self.is_same_node(other) {
            return Ordering::Equal;
        }
        if !std::ptr::eq(self.doc, other.doc) {
            return self
                .doc
                .document_number()
                .cmp(&other.doc.document_number());
        }

        // climb the deeper node to a common depth, then walk both up
        // until the parents coincide
        let mut a = *self;
        let mut b = *other;
        let (da, db) = (a.depth(), b.depth());
        for _ in db..da {
            match a.parent() {
                Some(p) if p.is_same_node(&b) => return Ordering::Greater,
                Some(p) => a = p,
                None => break,
            }
        }
        for _ in da..db {
            match b.parent() {
                Some(p) if p.is_same_node(&a) => return Ordering::Less,
                Some(p) => b = p,
                None => break,
            }
        }
        loop {
            let (pa, pb) = (a.parent(), b.parent());
            match (pa, pb) {
                (Some(pa), Some(pb)) if pa.is_same_node(&pb) => {
                    return a
                        .rank()
                        .cmp(&b.rank())
                        .then_with(|| a.sibling_position().cmp(&b.sibling_position()));
                }
                (Some(pa), Some(pb)) => {
                    a = pa;
                    b = pb;
                }
                // distinct roots inside one document cannot happen
                // once the wrap pass has completed
                _ => return Ordering::Equal,
            }
        }
    }

    /// Append a document-wide unique identifier for this node:
    /// the document number followed by the kind-tagged sibling
    /// position path from the root.
    pub fn generate_id(&self, buffer: &mut String) {
        let mut path = Vec::new();
        let mut node = *self;
        loop {
            path.push(node);
            match node.parent() {
                Some(p) => node = p,
                None => break,
            }
        }
        buffer.push('d');
        buffer.push_str(&self.doc.document_number().to_string());
        for step in path.iter().rev() {
            let letter = match step.kind() {
                NodeKind::Document => continue,
                NodeKind::Element => 'e',
                NodeKind::Attribute => 'a',
                NodeKind::Namespace => 'n',
                NodeKind::Text => 't',
                NodeKind::Comment => 'c',
                NodeKind::ProcessingInstruction => 'p',
            };
            buffer.push(letter);
            buffer.push_str(&step.sibling_position().to_string());
        }
    }

    // ---- axes ------------------------------------------------------

    fn axis_over(&self, seq: Vec<T::Handle>, test: &NodeTest) -> AxisIter<'a, 't, T> {
        AxisIter::over(
            AxisIteratorAdapter::new(self.doc, Rc::new(seq)),
            test.clone(),
        )
    }

    /// Children axis; fails with `UnsupportedAxis` outside containers
    pub fn children(&self, test: &NodeTest) -> Result<AxisIter<'a, 't, T>> {
        if !self.is_container() {
            return Err(Error::unsupported_axis("child", self.kind()));
        }
        Ok(self.axis_over(self.tree().children(self.handle()), test))
    }

    /// Attribute axis over the element's whole attribute collection,
    /// namespace declarations included; the node test separates the
    /// chains when the engine asks for one kind only.
    pub fn attributes(&self, test: &NodeTest) -> Result<AxisIter<'a, 't, T>> {
        if self.slot().kind != WrapperKind::Element {
            return Err(Error::unsupported_axis("attribute", self.kind()));
        }
        Ok(self.axis_over(self.tree().attributes(self.handle()), test))
    }

    /// Descendant axis in document order, optionally including self
    pub fn descendants(&self, include_self: bool, test: &NodeTest) -> Result<AxisIter<'a, 't, T>> {
        if !self.is_container() {
            return Err(Error::unsupported_axis("descendant", self.kind()));
        }
        let tree = self.tree();
        let mut seq = Vec::new();
        if include_self {
            seq.push(self.handle());
        }
        seq.extend(tree.descendants(self.handle()));
        Ok(self.axis_over(seq, test))
    }

    /// Sibling axis over the nodes after (or before) this one, in the
    /// foreign model's sibling order; unsupported on attributes.
    pub fn siblings(&self, forwards: bool, test: &NodeTest) -> Result<AxisIter<'a, 't, T>> {
        if self.is_attribute_wrapper() {
            return Err(Error::unsupported_axis("sibling", self.kind()));
        }
        let tree = self.tree();
        let mut seq = Vec::new();
        if forwards {
            let mut n = tree.next_sibling(self.handle());
            while let Some(h) = n {
                seq.push(h);
                n = tree.next_sibling(h);
            }
        } else {
            let mut n = tree.previous_sibling(self.handle());
            while let Some(h) = n {
                seq.push(h);
                n = tree.previous_sibling(h);
            }
            // preceding nodes are presented first-to-last, as the
            // foreign model enumerates them
            seq.reverse();
        }
        Ok(self.axis_over(seq, test))
    }

    // ---- copy ------------------------------------------------------

    /// Deep-copy this node into a sink, normalizing namespace
    /// declarations through a namespace reducer.
    pub fn copy_to<R: Receiver>(&self, receiver: &mut R, options: CopyOptions) -> Result<()> {
        let mut reducer = NamespaceReducer::new(receiver);
        self.copy_into(&mut reducer, options.deep)
    }

    fn copy_into<R: Receiver>(&self, out: &mut R, deep: bool) -> Result<()> {
        let tree = self.tree();
        match self.slot().kind {
            WrapperKind::Document => {
                out.start_document()?;
                if deep {
                    for child in tree.children(self.handle()) {
                        if let Some(c) = self.doc.wrapper_for(child) {
                            c.copy_into(out, deep)?;
                        }
                    }
                }
                out.end_document()
            }
            WrapperKind::Element => {
                out.start_element(&self.qualified_name())?;
                for binding in self.declared_namespaces() {
                    out.namespace(&binding)?;
                }
                for attr in tree.attributes(self.handle()) {
                    if tree.is_namespace_decl(attr) {
                        continue;
                    }
                    if let Some(a) = self.doc.wrapper_for(attr) {
                        out.attribute(&a.qualified_name(), &a.string_value())?;
                    }
                }
                if deep {
                    for child in tree.children(self.handle()) {
                        if let Some(c) = self.doc.wrapper_for(child) {
                            c.copy_into(out, deep)?;
                        }
                    }
                }
                out.end_element()
            }
            WrapperKind::Text | WrapperKind::CData => out.characters(&self.string_value()),
            WrapperKind::Comment => out.comment(&self.string_value()),
            WrapperKind::ProcessingInstruction => {
                out.processing_instruction(&self.local_name(), &self.string_value())
            }
            WrapperKind::Attribute => {
                if tree.is_namespace_decl(self.handle()) {
                    out.namespace(&NamespaceBinding::new(
                        self.local_name(),
                        self.string_value(),
                    ))
                } else {
                    out.attribute(&self.qualified_name(), &self.string_value())
                }
            }
        }
    }
}

impl<'a, 't, T: ForeignTree> PartialEq for NodeRef<'a, 't, T> {
    fn eq(&self, other: &Self) -> bool {
        self.is_same_node(other)
    }
}

impl<'a, 't, T: ForeignTree> Eq for NodeRef<'a, 't, T> {}

impl<'a, 't, T: ForeignTree> Hash for NodeRef<'a, 't, T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // identity hash of the foreign node, never wrapper-local state
        self.doc.document_number().hash(state);
        self.handle().hash(state);
    }
}

impl<'a, 't, T: ForeignTree> std::fmt::Debug for NodeRef<'a, 't, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("kind", &self.kind())
            .field("handle", &self.handle())
            .finish()
    }
}
