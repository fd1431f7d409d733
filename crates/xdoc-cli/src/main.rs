//! CLI for inspecting XML documents through the adapter

use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};

use xdoc_adapter::{wrap, NodeKind, NodeRef, NodeTest, WrappedDocument, XotHandle, XotTree};
use xml_node_traits::{Configuration, NamespaceBinding, QualifiedName, Receiver};

#[derive(Parser)]
#[command(name = "xdoc-cli", about = "Inspect XML documents through the node adapter")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show wrap statistics for a document
    Info {
        /// XML file to load
        file: PathBuf,
    },
    /// Dump the wrapped node tree with generated identifiers
    Tree {
        /// XML file to load
        file: PathBuf,
    },
    /// Replay the document as a copy event stream
    Events {
        /// XML file to load
        file: PathBuf,
    },
    /// Time repeated full traversals of the wrapped document
    Bench {
        /// XML file to load
        file: PathBuf,
        /// Number of traversal passes
        #[arg(short, long, default_value_t = 100)]
        iterations: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Info { file } => info(&file),
        Command::Tree { file } => dump_tree(&file),
        Command::Events { file } => events(&file),
        Command::Bench { file, iterations } => bench(&file, iterations),
    }
}

fn load(file: &PathBuf) -> Result<(XotTree, XotHandle)> {
    let xml = fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let mut tree = XotTree::new();
    let doc = tree
        .parse(&xml)
        .map_err(|e| anyhow!("parsing {}: {e}", file.display()))?;
    Ok((tree, doc))
}

fn wrap_document(tree: &XotTree, doc: XotHandle) -> Result<WrappedDocument<'_, XotTree>> {
    let config = Rc::new(RefCell::new(Configuration::new()));
    wrap(tree, doc, config).map_err(|e| anyhow!("wrapping document: {e}"))
}

fn info(file: &PathBuf) -> Result<()> {
    let (tree, doc) = load(file)?;
    let wrapped = wrap_document(&tree, doc)?;

    let mut per_kind = [0usize; 7];
    count_kinds(wrapped.root(), &mut per_kind);

    println!("document number: {}", wrapped.document_number());
    println!("wrappers:        {}", wrapped.wrapper_count());
    println!("elements:        {}", per_kind[kind_index(NodeKind::Element)]);
    println!("attributes:      {}", per_kind[kind_index(NodeKind::Attribute)]);
    println!("namespaces:      {}", per_kind[kind_index(NodeKind::Namespace)]);
    println!("text nodes:      {}", per_kind[kind_index(NodeKind::Text)]);
    println!("comments:        {}", per_kind[kind_index(NodeKind::Comment)]);
    println!(
        "proc. instr.:    {}",
        per_kind[kind_index(NodeKind::ProcessingInstruction)]
    );
    Ok(())
}

fn kind_index(kind: NodeKind) -> usize {
    match kind {
        NodeKind::Document => 0,
        NodeKind::Element => 1,
        NodeKind::Attribute => 2,
        NodeKind::Namespace => 3,
        NodeKind::Text => 4,
        NodeKind::Comment => 5,
        NodeKind::ProcessingInstruction => 6,
    }
}

fn count_kinds(node: NodeRef<'_, '_, XotTree>, per_kind: &mut [usize; 7]) {
    per_kind[kind_index(node.kind())] += 1;
    if let Ok(attrs) = node.attributes(&NodeTest::Any) {
        for attr in attrs {
            per_kind[kind_index(attr.kind())] += 1;
        }
    }
    if let Ok(children) = node.children(&NodeTest::Any) {
        for child in children {
            count_kinds(child, per_kind);
        }
    }
}

fn dump_tree(file: &PathBuf) -> Result<()> {
    let (tree, doc) = load(file)?;
    let wrapped = wrap_document(&tree, doc)?;
    dump_node(wrapped.root(), 0);
    Ok(())
}

fn dump_node(node: NodeRef<'_, '_, XotTree>, depth: usize) {
    let indent = "  ".repeat(depth);
    let mut id = String::new();
    node.generate_id(&mut id);
    let label = match node.kind() {
        NodeKind::Document => "document".to_string(),
        NodeKind::Element => format!("element {}", node.display_name()),
        NodeKind::Attribute => {
            format!("attribute {}=\"{}\"", node.display_name(), node.string_value())
        }
        NodeKind::Namespace => {
            format!("namespace {}=\"{}\"", node.local_name(), node.string_value())
        }
        NodeKind::Text => format!("text {:?}", node.string_value()),
        NodeKind::Comment => format!("comment {:?}", node.string_value()),
        NodeKind::ProcessingInstruction => {
            format!("pi {} {:?}", node.display_name(), node.string_value())
        }
    };
    println!("{indent}{label}  [{id}]");
    if let Ok(attrs) = node.attributes(&NodeTest::Any) {
        for attr in attrs {
            dump_node(attr, depth + 1);
        }
    }
    if let Ok(children) = node.children(&NodeTest::Any) {
        for child in children {
            dump_node(child, depth + 1);
        }
    }
}

fn events(file: &PathBuf) -> Result<()> {
    let (tree, doc) = load(file)?;
    let wrapped = wrap_document(&tree, doc)?;
    let mut printer = EventPrinter;
    wrapped
        .root()
        .copy_to(&mut printer, Default::default())
        .map_err(|e| anyhow!("copying document: {e}"))?;
    Ok(())
}

fn bench(file: &PathBuf, iterations: u32) -> Result<()> {
    let (tree, doc) = load(file)?;

    let wrap_start = Instant::now();
    let wrapped = wrap_document(&tree, doc)?;
    let wrap_elapsed = wrap_start.elapsed();

    let mut visited = 0u64;
    let start = Instant::now();
    for _ in 0..iterations {
        for node in wrapped
            .root()
            .descendants(true, &NodeTest::Any)
            .map_err(|e| anyhow!("descendant axis: {e}"))?
        {
            visited += 1;
            if let Ok(attrs) = node.attributes(&NodeTest::Any) {
                visited += attrs.count() as u64;
            }
        }
    }
    let elapsed = start.elapsed();

    println!("wrappers:   {}", wrapped.wrapper_count());
    println!("wrap time:  {wrap_elapsed:?}");
    println!("iterations: {iterations}");
    println!("visited:    {visited}");
    println!("total:      {elapsed:?}");
    if iterations > 0 {
        println!("per pass:   {:?}", elapsed / iterations);
    }
    Ok(())
}

/// Receiver printing one line per event
struct EventPrinter;

impl Receiver for EventPrinter {
    fn start_document(&mut self) -> xml_node_traits::Result<()> {
        println!("start-document");
        Ok(())
    }
    fn end_document(&mut self) -> xml_node_traits::Result<()> {
        println!("end-document");
        Ok(())
    }
    fn start_element(&mut self, name: &QualifiedName) -> xml_node_traits::Result<()> {
        println!("start-element {}", name.display());
        Ok(())
    }
    fn namespace(&mut self, binding: &NamespaceBinding) -> xml_node_traits::Result<()> {
        println!("namespace {}={}", binding.prefix, binding.uri);
        Ok(())
    }
    fn attribute(&mut self, name: &QualifiedName, value: &str) -> xml_node_traits::Result<()> {
        println!("attribute {}={}", name.display(), value);
        Ok(())
    }
    fn end_element(&mut self) -> xml_node_traits::Result<()> {
        println!("end-element");
        Ok(())
    }
    fn characters(&mut self, text: &str) -> xml_node_traits::Result<()> {
        println!("characters {text:?}");
        Ok(())
    }
    fn comment(&mut self, text: &str) -> xml_node_traits::Result<()> {
        println!("comment {text:?}");
        Ok(())
    }
    fn processing_instruction(&mut self, target: &str, data: &str) -> xml_node_traits::Result<()> {
        println!("processing-instruction {target} {data:?}");
        Ok(())
    }
}
