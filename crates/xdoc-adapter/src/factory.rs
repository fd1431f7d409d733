//! Wrapper factory: classify a foreign node and build its wrapper slot.

use std::cell::Cell;

use xml_node_traits::{error::Result, name::NameCode, Error, NodeKind};

use crate::foreign::{ForeignNodeType, ForeignTree};

/// Which wrapper specialization handles a node.
///
/// The supported kind set is closed; dispatch is resolved here, once,
/// instead of by repeated runtime type inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapperKind {
    /// Document wrapper
    Document,
    /// Element wrapper
    Element,
    /// Attribute wrapper (namespace declarations included)
    Attribute,
    /// Text wrapper
    Text,
    /// CDATA wrapper; reports [`NodeKind::Text`] to the engine
    CData,
    /// Comment wrapper
    Comment,
    /// Processing instruction wrapper
    ProcessingInstruction,
}

impl WrapperKind {
    /// Pick the wrapper specialization for a foreign node kind.
    ///
    /// CDATA is special-cased to its own wrapper even though it is a
    /// kind of text node. Any kind outside the supported set fails
    /// with `UnsupportedNodeKind` carrying the foreign kind name.
    pub fn classify(foreign: ForeignNodeType) -> Result<WrapperKind> {
        match foreign {
            ForeignNodeType::Document => Ok(WrapperKind::Document),
            ForeignNodeType::Element => Ok(WrapperKind::Element),
            ForeignNodeType::Attribute => Ok(WrapperKind::Attribute),
            ForeignNodeType::CData => Ok(WrapperKind::CData),
            ForeignNodeType::Text => Ok(WrapperKind::Text),
            ForeignNodeType::Comment => Ok(WrapperKind::Comment),
            ForeignNodeType::ProcessingInstruction => Ok(WrapperKind::ProcessingInstruction),
            other => Err(Error::UnsupportedNodeKind(other.name().to_string())),
        }
    }
}

/// Per-node wrapper state held in the wrapped document's arena
#[derive(Debug)]
pub(crate) struct WrapperSlot<H> {
    pub(crate) handle: H,
    pub(crate) kind: WrapperKind,
    // memoized name code, computed at most once per wrapper
    pub(crate) name_code: Cell<Option<NameCode>>,
}

/// Build the wrapper slot for one foreign node
pub(crate) fn make_wrapper<T: ForeignTree>(
    tree: &T,
    handle: T::Handle,
) -> Result<WrapperSlot<T::Handle>> {
    let kind = WrapperKind::classify(tree.node_type(handle))?;
    Ok(WrapperSlot {
        handle,
        kind,
        name_code: Cell::new(None),
    })
}

impl WrapperKind {
    /// The engine-facing node kind for this wrapper. CDATA reports
    /// text; namespace-declaration attributes are refined to
    /// [`NodeKind::Namespace`] by the attribute wrapper itself.
    pub(crate) fn node_kind(&self) -> NodeKind {
        match self {
            WrapperKind::Document => NodeKind::Document,
            WrapperKind::Element => NodeKind::Element,
            WrapperKind::Attribute => NodeKind::Attribute,
            WrapperKind::Text | WrapperKind::CData => NodeKind::Text,
            WrapperKind::Comment => NodeKind::Comment,
            WrapperKind::ProcessingInstruction => NodeKind::ProcessingInstruction,
        }
    }
}
