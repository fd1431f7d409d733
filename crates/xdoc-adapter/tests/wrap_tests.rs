//! Tests for the one-shot whole-tree wrap and the document wrapper

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::SimpleTree;
use xdoc_adapter::{wrap, Configuration, Error, ForeignNodeType, NodeKind, XotTree};

fn config() -> Rc<RefCell<Configuration>> {
    Rc::new(RefCell::new(Configuration::new()))
}

#[test]
fn wrap_attaches_one_wrapper_per_node() {
    let mut tree = XotTree::new();
    let doc = tree
        .parse(r#"<a xmlns:p="urn:x"><p:b/>text<!--c--></a>"#)
        .unwrap();
    let wrapped = wrap(&tree, doc, config()).unwrap();

    // document, <a>, <p:b/>, text, comment, plus the xmlns:p declaration
    assert_eq!(wrapped.wrapper_count(), 6);
}

#[test]
fn rewrap_fails_with_already_wrapped() {
    let mut tree = XotTree::new();
    let doc = tree.parse("<root/>").unwrap();
    let shared = config();

    let _wrapped = wrap(&tree, doc, Rc::clone(&shared)).unwrap();
    let err = wrap(&tree, doc, shared).unwrap_err();
    assert!(matches!(err, Error::AlreadyWrapped(_)), "got {err}");
}

#[test]
fn document_numbers_allocated_once_and_increasing() {
    let shared = config();

    let mut first = XotTree::new();
    let doc1 = first.parse("<a/>").unwrap();
    let wrapped1 = wrap(&first, doc1, Rc::clone(&shared)).unwrap();

    let mut second = XotTree::new();
    let doc2 = second.parse("<b/>").unwrap();
    let wrapped2 = wrap(&second, doc2, shared).unwrap();

    assert!(wrapped2.document_number() > wrapped1.document_number());
    // stable across calls
    assert_eq!(wrapped1.document_number(), wrapped1.document_number());
}

#[test]
fn wrapping_a_non_document_fails() {
    let mut tree = SimpleTree::document();
    let elem = tree.add_element(0, "a");

    let err = wrap(&tree, elem, config()).unwrap_err();
    assert!(matches!(err, Error::UnsupportedNodeKind(_)), "got {err}");
}

#[test]
fn bare_namespace_node_is_rejected_by_the_factory() {
    let mut tree = SimpleTree::document();
    let elem = tree.add_element(0, "a");
    tree.add_child(elem, ForeignNodeType::Namespace, "urn:x");

    let err = wrap(&tree, 0, config()).unwrap_err();
    match err {
        Error::UnsupportedNodeKind(name) => assert_eq!(name, "namespace"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn cdata_is_wrapped_and_reports_text_kind() {
    let mut tree = SimpleTree::document();
    let elem = tree.add_element(0, "a");
    tree.add_child(elem, ForeignNodeType::CData, "raw <data>");

    let wrapped = wrap(&tree, 0, config()).unwrap();
    let cdata = wrapped.root().first_child().unwrap().first_child().unwrap();
    assert_eq!(cdata.kind(), NodeKind::Text);
    assert_eq!(cdata.string_value(), "raw <data>");
}

#[test]
fn user_data_last_write_wins() {
    let mut tree = XotTree::new();
    let doc = tree.parse("<a/>").unwrap();
    let wrapped = wrap(&tree, doc, config()).unwrap();

    assert_eq!(wrapped.user_data("key"), None);
    wrapped.set_user_data("key", Some("one".to_string()));
    wrapped.set_user_data("key", Some("two".to_string()));
    assert_eq!(wrapped.user_data("key"), Some("two".to_string()));
}

#[test]
fn user_data_none_removes_the_key() {
    let mut tree = XotTree::new();
    let doc = tree.parse("<a/>").unwrap();
    let wrapped = wrap(&tree, doc, config()).unwrap();

    wrapped.set_user_data("key", Some("value".to_string()));
    wrapped.set_user_data("key", None);
    assert_eq!(wrapped.user_data("key"), None);
}

#[test]
fn select_id_is_an_acknowledged_gap() {
    let mut tree = XotTree::new();
    let doc = tree.parse("<a/>").unwrap();
    let wrapped = wrap(&tree, doc, config()).unwrap();

    let err = wrapped.select_id("id1", false).unwrap_err();
    assert!(matches!(err, Error::NotImplemented(_)), "got {err}");
}

#[test]
fn no_schema_information_is_reported() {
    let mut tree = XotTree::new();
    let doc = tree.parse("<a/>").unwrap();
    let wrapped = wrap(&tree, doc, config()).unwrap();

    assert!(!wrapped.is_typed());
    assert!(wrapped.unparsed_entity_names().is_empty());
    assert_eq!(wrapped.unparsed_entity("ent"), None);
}
