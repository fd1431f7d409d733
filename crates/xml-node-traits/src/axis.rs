//! Lazy cursor protocol for axis traversal.
//!
//! Query engines need to ask "is there a next item" without consuming
//! it, so cursors buffer one item ahead: constructing an iterator
//! immediately computes whether a first item exists, `has_next` is a
//! pure read of that flag, and `next_item` hands out the buffered item
//! while advancing the lookahead.

/// Single-pass, lazily-advancing cursor with depth-1 lookahead.
///
/// Cursors are not restartable in place; [`LookaheadIterator::another`]
/// produces an independent fresh cursor over the same logical sequence
/// without disturbing the original.
pub trait LookaheadIterator {
    /// Item yielded by the cursor
    type Item;

    /// Whether a next item exists; repeated calls without an
    /// intervening `next_item` keep returning the same answer.
    fn has_next(&self) -> bool;

    /// Return the lookahead item and advance by one, or None once
    /// exhausted.
    fn next_item(&mut self) -> Option<Self::Item>;

    /// A fresh independent cursor over the same sequence, reset to its
    /// start.
    fn another(&self) -> Self
    where
        Self: Sized;

    /// Release resources. Cursors here hold none, so this is a no-op.
    fn close(&mut self) {}
}
