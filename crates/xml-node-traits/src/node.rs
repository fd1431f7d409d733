//! Node kinds, names and node tests

/// Kind of a node as seen by the query engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Document node
    Document,
    /// Element node
    Element,
    /// Attribute node
    Attribute,
    /// Namespace declaration node
    Namespace,
    /// Text node (including CDATA sections)
    Text,
    /// Comment node
    Comment,
    /// Processing instruction node
    ProcessingInstruction,
}

/// A fully expanded node name: prefix, namespace URI and local part.
///
/// Unnamed node kinds use empty strings throughout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct QualifiedName {
    /// Namespace prefix, empty if none
    pub prefix: String,
    /// Namespace URI, empty if the name is in no namespace
    pub uri: String,
    /// Local part of the name
    pub local: String,
}

impl QualifiedName {
    /// Create a qualified name from its three parts
    pub fn new(prefix: impl Into<String>, uri: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            uri: uri.into(),
            local: local.into(),
        }
    }

    /// The display form: `prefix:local` when a non-empty prefix exists,
    /// otherwise just the local part.
    pub fn display(&self) -> String {
        if self.prefix.is_empty() {
            self.local.clone()
        } else {
            format!("{}:{}", self.prefix, self.local)
        }
    }
}

/// A single prefix/URI namespace binding
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespaceBinding {
    /// Declared prefix, empty for the default namespace
    pub prefix: String,
    /// Namespace URI the prefix is bound to
    pub uri: String,
}

impl NamespaceBinding {
    /// Create a new binding
    pub fn new(prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            uri: uri.into(),
        }
    }
}

/// A structural predicate applied by axis iterators.
///
/// This is a pure data match over the node's kind and expanded name, so
/// adapter implementations of any shape can evaluate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeTest {
    /// Matches every node
    Any,
    /// Matches nodes of one kind
    Kind(NodeKind),
    /// Matches nodes by expanded name
    Name {
        /// Required namespace URI, or None to accept any namespace
        uri: Option<String>,
        /// Required local name, or None to accept any local name
        local: Option<String>,
    },
}

impl NodeTest {
    /// Evaluate the test against a node's kind and expanded name
    pub fn matches(&self, kind: NodeKind, uri: &str, local: &str) -> bool {
        match self {
            NodeTest::Any => true,
            NodeTest::Kind(k) => *k == kind,
            NodeTest::Name {
                uri: want_uri,
                local: want_local,
            } => {
                want_uri.as_deref().map_or(true, |u| u == uri)
                    && want_local.as_deref().map_or(true, |l| l == local)
            }
        }
    }

    /// True for the test that matches every node
    pub fn is_any(&self) -> bool {
        matches!(self, NodeTest::Any)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_with_prefix() {
        let name = QualifiedName::new("p", "urn:x", "b");
        assert_eq!(name.display(), "p:b");
    }

    #[test]
    fn display_name_without_prefix() {
        let name = QualifiedName::new("", "urn:x", "b");
        assert_eq!(name.display(), "b");
    }

    #[test]
    fn node_test_kind_match() {
        let test = NodeTest::Kind(NodeKind::Element);
        assert!(test.matches(NodeKind::Element, "", "a"));
        assert!(!test.matches(NodeKind::Text, "", ""));
    }

    #[test]
    fn node_test_name_match_ignores_prefix() {
        let test = NodeTest::Name {
            uri: Some("urn:x".to_string()),
            local: Some("b".to_string()),
        };
        assert!(test.matches(NodeKind::Element, "urn:x", "b"));
        assert!(!test.matches(NodeKind::Element, "urn:y", "b"));
        assert!(!test.matches(NodeKind::Element, "urn:x", "c"));
    }

    #[test]
    fn node_test_wildcard_local() {
        let test = NodeTest::Name {
            uri: Some("urn:x".to_string()),
            local: None,
        };
        assert!(test.matches(NodeKind::Element, "urn:x", "anything"));
    }
}
