//! ForeignTree implementation for xot.
//!
//! Owns the xot arena and presents it through the foreign-tree
//! boundary. Attributes and namespace declarations live in per-element
//! collections in xot, so their handles are synthesized as
//! (owner, name) pairs; namespace declarations are reported as
//! attribute-kind handles flagged via `is_namespace_decl`, matching
//! the sibling-chain model the wrappers expect.

use std::cell::RefCell;
use std::collections::HashSet;

use xot::{NameId, Node, PrefixId, Xot};

use crate::foreign::{ForeignNodeType, ForeignTree};

/// Handle into a [`XotTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XotHandle {
    /// A regular tree node
    Node(Node),
    /// An attribute of an element
    Attr {
        /// Owning element
        owner: Node,
        /// Attribute name
        name: NameId,
    },
    /// A namespace declaration on an element
    Ns {
        /// Owning element
        owner: Node,
        /// Declared prefix
        prefix: PrefixId,
    },
}

/// Wrapper around Xot that implements the foreign-tree boundary
#[derive(Debug)]
pub struct XotTree {
    xot: Xot,
    wrapped: RefCell<HashSet<XotHandle>>,
}

impl XotTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self {
            xot: Xot::new(),
            wrapped: RefCell::new(HashSet::new()),
        }
    }

    /// Parse XML into the arena, returning the document handle
    pub fn parse(&mut self, xml: &str) -> Result<XotHandle, String> {
        self.xot
            .parse(xml)
            .map(XotHandle::Node)
            .map_err(|e| e.to_string())
    }

    /// Get a reference to the underlying Xot
    pub fn xot(&self) -> &Xot {
        &self.xot
    }

    /// Get a mutable reference to the underlying Xot
    pub fn xot_mut(&mut self) -> &mut Xot {
        &mut self.xot
    }

    fn attribute_handles(&self, owner: Node) -> Vec<XotHandle> {
        let mut out: Vec<XotHandle> = self
            .xot
            .namespaces(owner)
            .iter()
            .map(|(prefix, _)| XotHandle::Ns { owner, prefix })
            .collect();
        out.extend(
            self.xot
                .attributes(owner)
                .iter()
                .map(|(name, _)| XotHandle::Attr { owner, name }),
        );
        out
    }

    fn attr_value(&self, owner: Node, name: NameId) -> String {
        self.xot
            .attributes(owner)
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, value)| value.to_string())
            .unwrap_or_default()
    }

    fn ns_uri(&self, owner: Node, prefix: PrefixId) -> String {
        self.xot
            .namespaces(owner)
            .iter()
            .find(|(p, _)| *p == prefix)
            .map(|(_, ns)| self.xot.namespace_str(*ns).to_string())
            .unwrap_or_default()
    }

    // Resolve a prefix bound to a namespace in the context of an
    // element, innermost declaration first. xot names carry no source
    // prefix, so when several in-scope prefixes are bound to one URI
    // they all resolve to the same declaration. The empty prefix is
    // only meaningful for element names.
    fn prefix_in_scope(&self, context: Node, uri: &str, allow_default: bool) -> Option<String> {
        let mut node = Some(context);
        while let Some(n) = node {
            for (prefix, ns) in self.xot.namespaces(n).iter() {
                let p = self.xot.prefix_str(prefix);
                if !allow_default && p.is_empty() {
                    continue;
                }
                if self.xot.namespace_str(*ns) == uri {
                    return Some(p.to_string());
                }
            }
            node = self.xot.parent(n);
        }
        None
    }

    fn node_uri(&self, node: Node) -> Option<String> {
        let name = self.xot.node_name(node)?;
        let (_, uri) = self.xot.name_ns_str(name);
        if uri.is_empty() {
            None
        } else {
            Some(uri.to_string())
        }
    }

    fn text_value(&self, node: Node) -> String {
        // concatenated descendant text, computed without mutating xot
        let mut out = String::new();
        let mut stack: Vec<Node> = self.xot.children(node).collect();
        stack.reverse();
        while let Some(n) = stack.pop() {
            match self.xot.value(n) {
                xot::Value::Text(text) => out.push_str(text.get()),
                xot::Value::Element(_) => {
                    let mut kids: Vec<Node> = self.xot.children(n).collect();
                    kids.reverse();
                    stack.extend(kids);
                }
                _ => {}
            }
        }
        out
    }

    fn sibling_index(&self, handle: XotHandle) -> Option<(Vec<XotHandle>, usize)> {
        let list = match handle {
            XotHandle::Node(n) => {
                let parent = self.xot.parent(n)?;
                self.xot.children(parent).map(XotHandle::Node).collect::<Vec<_>>()
            }
            XotHandle::Attr { owner, .. } | XotHandle::Ns { owner, .. } => {
                self.attribute_handles(owner)
            }
        };
        let idx = list.iter().position(|&h| h == handle)?;
        Some((list, idx))
    }
}

impl Default for XotTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ForeignTree for XotTree {
    type Handle = XotHandle;

    fn node_type(&self, node: XotHandle) -> ForeignNodeType {
        match node {
            XotHandle::Attr { .. } | XotHandle::Ns { .. } => ForeignNodeType::Attribute,
            XotHandle::Node(n) => match self.xot.value(n) {
                xot::Value::Document => ForeignNodeType::Document,
                xot::Value::Element(_) => ForeignNodeType::Element,
                xot::Value::Text(_) => ForeignNodeType::Text,
                xot::Value::Comment(_) => ForeignNodeType::Comment,
                xot::Value::ProcessingInstruction(_) => ForeignNodeType::ProcessingInstruction,
                xot::Value::Attribute(_) => ForeignNodeType::Attribute,
                xot::Value::Namespace(_) => ForeignNodeType::Namespace,
            },
        }
    }

    fn parent(&self, node: XotHandle) -> Option<XotHandle> {
        match node {
            XotHandle::Node(n) => self.xot.parent(n).map(XotHandle::Node),
            XotHandle::Attr { owner, .. } | XotHandle::Ns { owner, .. } => {
                Some(XotHandle::Node(owner))
            }
        }
    }

    fn children(&self, node: XotHandle) -> Vec<XotHandle> {
        match node {
            XotHandle::Node(n) => self.xot.children(n).map(XotHandle::Node).collect(),
            _ => Vec::new(),
        }
    }

    fn attributes(&self, node: XotHandle) -> Vec<XotHandle> {
        match node {
            XotHandle::Node(n) if matches!(self.xot.value(n), xot::Value::Element(_)) => {
                self.attribute_handles(n)
            }
            _ => Vec::new(),
        }
    }

    fn is_namespace_decl(&self, node: XotHandle) -> bool {
        matches!(node, XotHandle::Ns { .. })
    }

    fn next_sibling(&self, node: XotHandle) -> Option<XotHandle> {
        let (list, idx) = self.sibling_index(node)?;
        list.get(idx + 1).copied()
    }

    fn previous_sibling(&self, node: XotHandle) -> Option<XotHandle> {
        let (list, idx) = self.sibling_index(node)?;
        if idx == 0 {
            None
        } else {
            list.get(idx - 1).copied()
        }
    }

    fn local_name(&self, node: XotHandle) -> Option<String> {
        match node {
            XotHandle::Node(n) => match self.xot.value(n) {
                xot::Value::Element(_) => {
                    let name = self.xot.node_name(n)?;
                    Some(self.xot.name_ns_str(name).0.to_string())
                }
                xot::Value::ProcessingInstruction(pi) => {
                    let (local, _) = self.xot.name_ns_str(pi.target());
                    Some(local.to_string())
                }
                _ => None,
            },
            XotHandle::Attr { name, .. } => Some(self.xot.name_ns_str(name).0.to_string()),
            XotHandle::Ns { prefix, .. } => Some(self.xot.prefix_str(prefix).to_string()),
        }
    }

    fn prefix(&self, node: XotHandle) -> Option<String> {
        match node {
            XotHandle::Node(n) => {
                let uri = self.node_uri(n)?;
                self.prefix_in_scope(n, &uri, true)
            }
            XotHandle::Attr { owner, name } => {
                let (_, uri) = self.xot.name_ns_str(name);
                if uri.is_empty() {
                    None
                } else {
                    self.prefix_in_scope(owner, uri, false)
                }
            }
            XotHandle::Ns { .. } => None,
        }
    }

    fn namespace_uri(&self, node: XotHandle) -> Option<String> {
        match node {
            XotHandle::Node(n) => self.node_uri(n),
            XotHandle::Attr { name, .. } => {
                let (_, uri) = self.xot.name_ns_str(name);
                if uri.is_empty() {
                    None
                } else {
                    Some(uri.to_string())
                }
            }
            XotHandle::Ns { owner, prefix } => Some(self.ns_uri(owner, prefix)),
        }
    }

    fn string_value(&self, node: XotHandle) -> String {
        match node {
            XotHandle::Node(n) => match self.xot.value(n) {
                xot::Value::Text(text) => text.get().to_string(),
                xot::Value::Comment(comment) => comment.get().to_string(),
                xot::Value::ProcessingInstruction(pi) => {
                    pi.data().map(str::to_string).unwrap_or_default()
                }
                xot::Value::Element(_) | xot::Value::Document => self.text_value(n),
                _ => String::new(),
            },
            XotHandle::Attr { owner, name } => self.attr_value(owner, name),
            XotHandle::Ns { owner, prefix } => self.ns_uri(owner, prefix),
        }
    }

    fn base_uri(&self, _node: XotHandle) -> Option<String> {
        // xot has no built-in base URI tracking
        None
    }

    fn mark_wrapped(&self, root: XotHandle) -> bool {
        self.wrapped.borrow_mut().insert(root)
    }
}
