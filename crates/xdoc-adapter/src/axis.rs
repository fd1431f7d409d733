//! Axis iterator adapter.
//!
//! Converts an ordered sequence of foreign nodes into the lazy,
//! lookahead cursor protocol the query engine expects. The source
//! sequence is retained behind an `Rc` so [`LookaheadIterator::another`]
//! can hand out a fresh cursor without disturbing the original.

use std::rc::Rc;

use xml_node_traits::{LookaheadIterator, NodeTest};

use crate::foreign::ForeignTree;
use crate::node::NodeRef;
use crate::wrap::WrappedDocument;

/// Raw lookahead cursor over a handle sequence
pub struct AxisIteratorAdapter<'a, 't, T: ForeignTree> {
    doc: &'a WrappedDocument<'t, T>,
    seq: Rc<Vec<T::Handle>>,
    // lookahead of depth 1, computed at construction
    ahead: Option<T::Handle>,
    pos: usize,
}

impl<'a, 't, T: ForeignTree> AxisIteratorAdapter<'a, 't, T> {
    /// Create a cursor; the first item (if any) is buffered immediately
    pub(crate) fn new(doc: &'a WrappedDocument<'t, T>, seq: Rc<Vec<T::Handle>>) -> Self {
        let ahead = seq.first().copied();
        Self {
            doc,
            seq,
            ahead,
            pos: 1,
        }
    }
}

impl<'a, 't, T: ForeignTree> LookaheadIterator for AxisIteratorAdapter<'a, 't, T> {
    type Item = NodeRef<'a, 't, T>;

    fn has_next(&self) -> bool {
        self.ahead.is_some()
    }

    fn next_item(&mut self) -> Option<Self::Item> {
        let handle = self.ahead.take()?;
        self.ahead = self.seq.get(self.pos).copied();
        self.pos += 1;
        self.doc.wrapper_for(handle)
    }

    fn another(&self) -> Self {
        AxisIteratorAdapter::new(self.doc, Rc::clone(&self.seq))
    }
}

/// Node-test filter wrapped around a raw cursor, with its own
/// lookahead so `has_next` stays a pure check.
pub struct AxisFilter<I: LookaheadIterator> {
    inner: I,
    test: NodeTest,
    ahead: Option<I::Item>,
}

impl<'a, 't: 'a, T, I> AxisFilter<I>
where
    T: ForeignTree + 't,
    I: LookaheadIterator<Item = NodeRef<'a, 't, T>>,
{
    pub(crate) fn new(mut inner: I, test: NodeTest) -> Self {
        let ahead = Self::pull(&mut inner, &test);
        Self { inner, test, ahead }
    }

    fn pull(inner: &mut I, test: &NodeTest) -> Option<NodeRef<'a, 't, T>> {
        while let Some(node) = inner.next_item() {
            let name = node.qualified_name();
            if test.matches(node.kind(), &name.uri, &name.local) {
                return Some(node);
            }
        }
        None
    }
}

impl<'a, 't: 'a, T, I> LookaheadIterator for AxisFilter<I>
where
    T: ForeignTree + 't,
    I: LookaheadIterator<Item = NodeRef<'a, 't, T>>,
{
    type Item = NodeRef<'a, 't, T>;

    fn has_next(&self) -> bool {
        self.ahead.is_some()
    }

    fn next_item(&mut self) -> Option<Self::Item> {
        let item = self.ahead.take()?;
        self.ahead = Self::pull(&mut self.inner, &self.test);
        Some(item)
    }

    fn another(&self) -> Self {
        AxisFilter::new(self.inner.another(), self.test.clone())
    }
}

/// An axis cursor as returned by the node wrappers: raw when the node
/// test accepts everything, filtered otherwise.
pub enum AxisIter<'a, 't, T: ForeignTree> {
    /// Unfiltered cursor
    Raw(AxisIteratorAdapter<'a, 't, T>),
    /// Cursor behind a node-test filter
    Filtered(AxisFilter<AxisIteratorAdapter<'a, 't, T>>),
}

impl<'a, 't, T: ForeignTree> AxisIter<'a, 't, T> {
    pub(crate) fn over(raw: AxisIteratorAdapter<'a, 't, T>, test: NodeTest) -> Self {
        if test.is_any() {
            AxisIter::Raw(raw)
        } else {
            AxisIter::Filtered(AxisFilter::new(raw, test))
        }
    }
}

impl<'a, 't, T: ForeignTree> LookaheadIterator for AxisIter<'a, 't, T> {
    type Item = NodeRef<'a, 't, T>;

    fn has_next(&self) -> bool {
        match self {
            AxisIter::Raw(it) => it.has_next(),
            AxisIter::Filtered(it) => it.has_next(),
        }
    }

    fn next_item(&mut self) -> Option<Self::Item> {
        match self {
            AxisIter::Raw(it) => it.next_item(),
            AxisIter::Filtered(it) => it.next_item(),
        }
    }

    fn another(&self) -> Self {
        match self {
            AxisIter::Raw(it) => AxisIter::Raw(it.another()),
            AxisIter::Filtered(it) => AxisIter::Filtered(it.another()),
        }
    }
}

impl<'a, 't, T: ForeignTree> Iterator for AxisIter<'a, 't, T> {
    type Item = NodeRef<'a, 't, T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_item()
    }
}
