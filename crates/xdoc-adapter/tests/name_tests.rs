//! Name codes, fingerprints and the naming surface

use std::cell::RefCell;
use std::rc::Rc;

use xdoc_adapter::{wrap, Configuration, NodeKind, NodeTest, XotTree};
use xml_node_traits::{NamespaceBinding, FINGERPRINT_MASK, NO_NAME};

fn config() -> Rc<RefCell<Configuration>> {
    Rc::new(RefCell::new(Configuration::new()))
}

#[test]
fn equal_names_get_equal_codes() {
    let mut tree = XotTree::new();
    let doc = tree
        .parse(r#"<a xmlns:p="urn:x"><p:b/><p:b/></a>"#)
        .unwrap();
    let wrapped = wrap(&tree, doc, config()).unwrap();
    let a = wrapped.root().first_child().unwrap();
    let children: Vec<_> = a.children(&NodeTest::Any).unwrap().collect();

    assert_eq!(children[0].name_code(), children[1].name_code());
    assert_ne!(children[0].name_code(), a.name_code());
    // memoized: repeated calls agree
    assert_eq!(children[0].name_code(), children[0].name_code());
}

#[test]
fn fingerprint_ignores_the_prefix() {
    let mut tree = XotTree::new();
    let doc = tree
        .parse(r#"<a><p:b xmlns:p="urn:x"/><q:b xmlns:q="urn:x"/></a>"#)
        .unwrap();
    let wrapped = wrap(&tree, doc, config()).unwrap();
    let a = wrapped.root().first_child().unwrap();
    let children: Vec<_> = a.children(&NodeTest::Any).unwrap().collect();

    assert_eq!(children[0].prefix(), "p");
    assert_eq!(children[1].prefix(), "q");
    assert_ne!(children[0].name_code(), children[1].name_code());
    assert_eq!(children[0].fingerprint(), children[1].fingerprint());
    assert_eq!(
        children[0].fingerprint(),
        children[0].name_code() & FINGERPRINT_MASK
    );
}

#[test]
fn co_bound_prefixes_resolve_to_one_declaration() {
    // the document model records names as (uri, local) only; when two
    // in-scope prefixes are bound to the same URI, both elements
    // resolve to the same declaration and so to the same name code
    let mut tree = XotTree::new();
    let doc = tree
        .parse(r#"<a xmlns:p="urn:x" xmlns:q="urn:x"><p:b/><q:b/></a>"#)
        .unwrap();
    let wrapped = wrap(&tree, doc, config()).unwrap();
    let a = wrapped.root().first_child().unwrap();
    let children: Vec<_> = a.children(&NodeTest::Any).unwrap().collect();

    assert_eq!(children[0].prefix(), children[1].prefix());
    assert_eq!(children[0].name_code(), children[1].name_code());
    assert_eq!(children[0].fingerprint(), children[1].fingerprint());
    assert_eq!(children[0].namespace_uri(), "urn:x");
    assert_eq!(children[1].namespace_uri(), "urn:x");
}

#[test]
fn unnamed_kinds_have_no_name_code() {
    let mut tree = XotTree::new();
    let doc = tree.parse("<a>text<!--c--></a>").unwrap();
    let wrapped = wrap(&tree, doc, config()).unwrap();
    let a = wrapped.root().first_child().unwrap();
    let children: Vec<_> = a.children(&NodeTest::Any).unwrap().collect();

    assert_eq!(wrapped.root().name_code(), NO_NAME);
    assert_eq!(children[0].name_code(), NO_NAME);
    assert_eq!(children[1].name_code(), NO_NAME);
}

#[test]
fn display_names_follow_node_kind() {
    let mut tree = XotTree::new();
    let doc = tree
        .parse(r#"<a xmlns:p="urn:x" c="1"><p:b/><?pi data?>text</a>"#)
        .unwrap();
    let wrapped = wrap(&tree, doc, config()).unwrap();
    let a = wrapped.root().first_child().unwrap();
    let children: Vec<_> = a.children(&NodeTest::Any).unwrap().collect();
    let attrs: Vec<_> = a.attributes(&NodeTest::Any).unwrap().collect();

    assert_eq!(a.display_name(), "a");
    assert_eq!(children[0].display_name(), "p:b");
    assert_eq!(children[0].prefix(), "p");
    assert_eq!(children[0].namespace_uri(), "urn:x");
    // processing instructions display their target
    assert_eq!(children[1].display_name(), "pi");
    assert_eq!(children[2].display_name(), "");
    // the namespace declaration stays nameless, the attribute does not
    assert_eq!(attrs[0].display_name(), "");
    assert_eq!(attrs[1].display_name(), "c");
    assert_eq!(a.string_value(), "text");
}

#[test]
fn attribute_value_looks_past_namespace_declarations() {
    let mut tree = XotTree::new();
    let doc = tree
        .parse(r#"<a xmlns:p="urn:x" c="1" p:d="2"><b/></a>"#)
        .unwrap();
    let wrapped = wrap(&tree, doc, config()).unwrap();
    let a = wrapped.root().first_child().unwrap();

    assert_eq!(a.attribute_value("", "c"), Some("1".to_string()));
    assert_eq!(a.attribute_value("urn:x", "d"), Some("2".to_string()));
    assert_eq!(a.attribute_value("", "missing"), None);
    // the declaration itself is not an attribute
    assert_eq!(a.attribute_value("", "p"), None);
    // non-elements have no attribute values
    assert_eq!(a.first_child().unwrap().attribute_value("", "c"), None);
}

#[test]
fn declared_namespaces_merge_explicit_and_implied_bindings() {
    let mut tree = XotTree::new();
    let doc = tree
        .parse(r#"<p:a xmlns:p="urn:x" xmlns:q="urn:y" q:c="1"/>"#)
        .unwrap();
    let wrapped = wrap(&tree, doc, config()).unwrap();
    let a = wrapped.root().first_child().unwrap();

    let bindings = a.declared_namespaces();
    assert!(bindings.contains(&NamespaceBinding::new("p", "urn:x")));
    assert!(bindings.contains(&NamespaceBinding::new("q", "urn:y")));
    // no duplicates even though q is both declared and used
    assert_eq!(bindings.len(), 2);
}

#[test]
fn ns_declaration_reports_prefix_as_local_name() {
    let mut tree = XotTree::new();
    let doc = tree.parse(r#"<a xmlns:p="urn:x"/>"#).unwrap();
    let wrapped = wrap(&tree, doc, config()).unwrap();
    let a = wrapped.root().first_child().unwrap();
    let ns = a.attributes(&NodeTest::Any).unwrap().next().unwrap();

    assert_eq!(ns.kind(), NodeKind::Namespace);
    assert_eq!(ns.local_name(), "p");
    assert_eq!(ns.prefix(), "");
    assert_eq!(ns.namespace_uri(), "");
    assert_eq!(ns.string_value(), "urn:x");
    assert_ne!(ns.name_code(), NO_NAME);
}
