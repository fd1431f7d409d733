//! Event sink abstraction for deep copies.
//!
//! Node adapters push a node (and optionally its subtree) into a
//! [`Receiver`] as a stream of structural events. [`NamespaceReducer`]
//! sits between the copy routine and the real sink and drops namespace
//! declarations that are already in scope, so copied subtrees carry an
//! equivalent namespace context without duplicate declarations.

use crate::error::Result;
use crate::node::{NamespaceBinding, QualifiedName};

/// Sink receiving a stream of document structure events
pub trait Receiver {
    /// Start of a document
    fn start_document(&mut self) -> Result<()>;
    /// End of a document
    fn end_document(&mut self) -> Result<()>;
    /// Start of an element; namespace and attribute events follow
    /// before any child content
    fn start_element(&mut self, name: &QualifiedName) -> Result<()>;
    /// A namespace declaration on the current element
    fn namespace(&mut self, binding: &NamespaceBinding) -> Result<()>;
    /// An attribute of the current element
    fn attribute(&mut self, name: &QualifiedName, value: &str) -> Result<()>;
    /// End of the current element
    fn end_element(&mut self) -> Result<()>;
    /// Character content
    fn characters(&mut self, text: &str) -> Result<()>;
    /// A comment
    fn comment(&mut self, text: &str) -> Result<()>;
    /// A processing instruction
    fn processing_instruction(&mut self, target: &str, data: &str) -> Result<()>;
}

impl<R: Receiver + ?Sized> Receiver for &mut R {
    fn start_document(&mut self) -> Result<()> {
        (**self).start_document()
    }
    fn end_document(&mut self) -> Result<()> {
        (**self).end_document()
    }
    fn start_element(&mut self, name: &QualifiedName) -> Result<()> {
        (**self).start_element(name)
    }
    fn namespace(&mut self, binding: &NamespaceBinding) -> Result<()> {
        (**self).namespace(binding)
    }
    fn attribute(&mut self, name: &QualifiedName, value: &str) -> Result<()> {
        (**self).attribute(name, value)
    }
    fn end_element(&mut self) -> Result<()> {
        (**self).end_element()
    }
    fn characters(&mut self, text: &str) -> Result<()> {
        (**self).characters(text)
    }
    fn comment(&mut self, text: &str) -> Result<()> {
        (**self).comment(text)
    }
    fn processing_instruction(&mut self, target: &str, data: &str) -> Result<()> {
        (**self).processing_instruction(target, data)
    }
}

/// Receiver filter suppressing namespace declarations already in scope
/// with the same URI.
#[derive(Debug)]
pub struct NamespaceReducer<R> {
    inner: R,
    // one frame of declarations per open element
    scopes: Vec<Vec<NamespaceBinding>>,
}

impl<R: Receiver> NamespaceReducer<R> {
    /// Wrap a sink in a namespace reducer
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            scopes: Vec::new(),
        }
    }

    /// Unwrap, returning the inner sink
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn in_scope(&self, binding: &NamespaceBinding) -> bool {
        for frame in self.scopes.iter().rev() {
            // innermost declaration for a prefix wins
            if let Some(b) = frame.iter().rev().find(|b| b.prefix == binding.prefix) {
                return b.uri == binding.uri;
            }
        }
        false
    }
}

impl<R: Receiver> Receiver for NamespaceReducer<R> {
    fn start_document(&mut self) -> Result<()> {
        self.inner.start_document()
    }

    fn end_document(&mut self) -> Result<()> {
        self.inner.end_document()
    }

    fn start_element(&mut self, name: &QualifiedName) -> Result<()> {
        self.scopes.push(Vec::new());
        self.inner.start_element(name)
    }

    fn namespace(&mut self, binding: &NamespaceBinding) -> Result<()> {
        if self.in_scope(binding) {
            return Ok(());
        }
        if let Some(frame) = self.scopes.last_mut() {
            frame.push(binding.clone());
        }
        self.inner.namespace(binding)
    }

    fn attribute(&mut self, name: &QualifiedName, value: &str) -> Result<()> {
        self.inner.attribute(name, value)
    }

    fn end_element(&mut self) -> Result<()> {
        self.scopes.pop();
        self.inner.end_element()
    }

    fn characters(&mut self, text: &str) -> Result<()> {
        self.inner.characters(text)
    }

    fn comment(&mut self, text: &str) -> Result<()> {
        self.inner.comment(text)
    }

    fn processing_instruction(&mut self, target: &str, data: &str) -> Result<()> {
        self.inner.processing_instruction(target, data)
    }
}
