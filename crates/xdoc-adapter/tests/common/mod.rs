//! Shared helpers for the adapter integration tests

use std::cell::RefCell;
use std::collections::HashSet;

use xdoc_adapter::{ForeignNodeType, ForeignTree};
use xml_node_traits::{NamespaceBinding, QualifiedName, Receiver, Result};

/// Minimal in-memory foreign tree for kinds the xot binding cannot
/// produce (CDATA sections, bare namespace nodes).
pub struct SimpleTree {
    nodes: Vec<SimpleNode>,
    wrapped: RefCell<HashSet<usize>>,
}

struct SimpleNode {
    kind: ForeignNodeType,
    parent: Option<usize>,
    children: Vec<usize>,
    attrs: Vec<usize>,
    local: Option<String>,
    value: String,
    ns_decl: bool,
}

impl SimpleTree {
    /// A tree holding just a document node (handle 0)
    pub fn document() -> Self {
        Self {
            nodes: vec![SimpleNode {
                kind: ForeignNodeType::Document,
                parent: None,
                children: Vec::new(),
                attrs: Vec::new(),
                local: None,
                value: String::new(),
                ns_decl: false,
            }],
            wrapped: RefCell::new(HashSet::new()),
        }
    }

    fn push(&mut self, node: SimpleNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn add_child(&mut self, parent: usize, kind: ForeignNodeType, value: &str) -> usize {
        let id = self.push(SimpleNode {
            kind,
            parent: Some(parent),
            children: Vec::new(),
            attrs: Vec::new(),
            local: None,
            value: value.to_string(),
            ns_decl: false,
        });
        self.nodes[parent].children.push(id);
        id
    }

    pub fn add_element(&mut self, parent: usize, local: &str) -> usize {
        let id = self.push(SimpleNode {
            kind: ForeignNodeType::Element,
            parent: Some(parent),
            children: Vec::new(),
            attrs: Vec::new(),
            local: Some(local.to_string()),
            value: String::new(),
            ns_decl: false,
        });
        self.nodes[parent].children.push(id);
        id
    }
}

impl ForeignTree for SimpleTree {
    type Handle = usize;

    fn node_type(&self, node: usize) -> ForeignNodeType {
        self.nodes[node].kind
    }

    fn parent(&self, node: usize) -> Option<usize> {
        self.nodes[node].parent
    }

    fn children(&self, node: usize) -> Vec<usize> {
        self.nodes[node].children.clone()
    }

    fn attributes(&self, node: usize) -> Vec<usize> {
        self.nodes[node].attrs.clone()
    }

    fn is_namespace_decl(&self, node: usize) -> bool {
        self.nodes[node].ns_decl
    }

    fn next_sibling(&self, node: usize) -> Option<usize> {
        let parent = self.nodes[node].parent?;
        let sibs = &self.nodes[parent].children;
        let idx = sibs.iter().position(|&s| s == node)?;
        sibs.get(idx + 1).copied()
    }

    fn previous_sibling(&self, node: usize) -> Option<usize> {
        let parent = self.nodes[node].parent?;
        let sibs = &self.nodes[parent].children;
        let idx = sibs.iter().position(|&s| s == node)?;
        if idx == 0 {
            None
        } else {
            sibs.get(idx - 1).copied()
        }
    }

    fn local_name(&self, node: usize) -> Option<String> {
        self.nodes[node].local.clone()
    }

    fn prefix(&self, _node: usize) -> Option<String> {
        None
    }

    fn namespace_uri(&self, _node: usize) -> Option<String> {
        None
    }

    fn string_value(&self, node: usize) -> String {
        self.nodes[node].value.clone()
    }

    fn base_uri(&self, _node: usize) -> Option<String> {
        None
    }

    fn mark_wrapped(&self, root: usize) -> bool {
        self.wrapped.borrow_mut().insert(root)
    }
}

/// Receiver recording events as readable strings
#[derive(Default)]
pub struct EventLog {
    pub events: Vec<String>,
}

impl EventLog {
    pub fn count_prefixed(&self, prefix: &str) -> usize {
        self.events.iter().filter(|e| e.starts_with(prefix)).count()
    }
}

impl Receiver for EventLog {
    fn start_document(&mut self) -> Result<()> {
        self.events.push("start-doc".into());
        Ok(())
    }
    fn end_document(&mut self) -> Result<()> {
        self.events.push("end-doc".into());
        Ok(())
    }
    fn start_element(&mut self, name: &QualifiedName) -> Result<()> {
        self.events.push(format!("elem {}", name.display()));
        Ok(())
    }
    fn namespace(&mut self, binding: &NamespaceBinding) -> Result<()> {
        self.events
            .push(format!("ns {}={}", binding.prefix, binding.uri));
        Ok(())
    }
    fn attribute(&mut self, name: &QualifiedName, value: &str) -> Result<()> {
        self.events.push(format!("attr {}={}", name.display(), value));
        Ok(())
    }
    fn end_element(&mut self) -> Result<()> {
        self.events.push("end".into());
        Ok(())
    }
    fn characters(&mut self, text: &str) -> Result<()> {
        self.events.push(format!("text {text}"));
        Ok(())
    }
    fn comment(&mut self, text: &str) -> Result<()> {
        self.events.push(format!("comment {text}"));
        Ok(())
    }
    fn processing_instruction(&mut self, target: &str, data: &str) -> Result<()> {
        self.events.push(format!("pi {target} {data}"));
        Ok(())
    }
}
