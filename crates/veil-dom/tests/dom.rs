//! Integration tests for veil-dom
//!
//! Tree structure, shadow roots, scoped queries, and mutation records.

use veil_dom::{
    Document, DomError, MutationObserverInit, MutationType, NodeId, PropertyValue, ShadowRootMode,
};

#[test]
fn test_document_tree_structure() {
    let mut doc = Document::new();
    let div = doc.create_element("div");
    let span = doc.create_element("span");
    let text = doc.create_text("Hello");

    doc.append_child(doc.root(), div);
    doc.append_child(div, span);
    doc.append_child(span, text);

    let tree = doc.tree();
    assert_eq!(tree.get(div).unwrap().parent, doc.root());
    assert_eq!(tree.get(div).unwrap().first_child, span);
    assert_eq!(tree.get(span).unwrap().first_child, text);
}

#[test]
fn test_shadow_attachment() {
    let mut doc = Document::new();
    let host = doc.create_element("x-button");
    doc.append_child(doc.root(), host);

    let shadow = doc.attach_shadow(host, ShadowRootMode::Open).unwrap();
    assert_eq!(doc.shadow_root(host), Some(shadow));
    assert_eq!(doc.shadow_host(shadow), Some(host));

    // One shadow root per host
    assert!(matches!(
        doc.attach_shadow(host, ShadowRootMode::Open),
        Err(DomError::ShadowAlreadyAttached)
    ));

    let text = doc.create_text("nope");
    assert!(matches!(
        doc.attach_shadow(text, ShadowRootMode::Open),
        Err(DomError::NotAnElement)
    ));
}

#[test]
fn test_shadow_boundary_scoping() {
    let mut doc = Document::new();
    let host = doc.create_element("x-field");
    doc.append_child(doc.root(), host);
    let shadow = doc.attach_shadow(host, ShadowRootMode::Open).unwrap();

    let inner = doc.create_element("input");
    doc.append_child(shadow, inner);

    // Shadow content is rooted at the shadow node, not the document
    assert_eq!(doc.containing_shadow_root(inner), Some(shadow));
    assert_eq!(doc.containing_shadow_root(host), None);
    assert_eq!(doc.root_of(inner), shadow);
    assert_eq!(doc.root_of(host), doc.root());
}

#[test]
fn test_scoped_id_lookup() {
    let mut doc = Document::new();
    let label = doc.create_element("label");
    doc.set_attribute(label, "id", "name");
    doc.append_child(doc.root(), label);

    let host = doc.create_element("x-field");
    doc.append_child(doc.root(), host);
    let shadow = doc.attach_shadow(host, ShadowRootMode::Open).unwrap();
    let inner = doc.create_element("span");
    doc.set_attribute(inner, "id", "name");
    doc.append_child(shadow, inner);

    // Same id resolves per root
    assert_eq!(doc.get_element_by_id_in(doc.root(), "name"), Some(label));
    assert_eq!(doc.get_element_by_id_in(shadow, "name"), Some(inner));
    assert_eq!(doc.get_element_by_id_in(shadow, "missing"), None);
}

#[test]
fn test_elements_with_attribute() {
    let mut doc = Document::new();
    let a = doc.create_element("button");
    let b = doc.create_element("button");
    let c = doc.create_element("button");
    doc.set_attribute(a, "delegatedaria", "aria-label");
    doc.set_attribute(c, "delegatedaria", "aria-haspopup");
    doc.append_child(doc.root(), a);
    doc.append_child(doc.root(), b);
    doc.append_child(doc.root(), c);

    let found = doc.elements_with_attribute(doc.root(), "delegatedaria");
    assert_eq!(found, vec![a, c]);
}

#[test]
fn test_clone_subtree_is_detached_copy() {
    let mut doc = Document::new();
    let label = doc.create_element("label");
    doc.set_attribute(label, "id", "src");
    doc.set_attribute(label, "class", "hint");
    let text = doc.create_text("Name");
    doc.append_child(label, text);
    doc.append_child(doc.root(), label);

    let copy = doc.clone_subtree(label);
    assert_ne!(copy, label);
    assert_eq!(doc.attribute(copy, "class"), Some("hint"));
    assert!(!doc.tree().get(copy).unwrap().parent.is_valid());

    // Mutating the copy leaves the source alone
    doc.set_attribute(copy, "id", "copy");
    assert_eq!(doc.attribute(label, "id"), Some("src"));
}

#[test]
fn test_attribute_records_with_filter_and_old_value() {
    let mut doc = Document::new();
    let host = doc.create_element("x-button");
    doc.append_child(doc.root(), host);

    let observer = doc.register_observer();
    doc.observe(
        observer,
        host,
        MutationObserverInit {
            attributes: true,
            attribute_old_value: true,
            attribute_filter: Some(vec!["aria-label".to_string()]),
            ..Default::default()
        },
    );

    doc.set_attribute(host, "aria-label", "Open");
    doc.set_attribute(host, "class", "primary");
    doc.set_attribute(host, "aria-label", "Close");

    let records = doc.take_records(observer);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].old_value, None);
    assert_eq!(records[1].old_value.as_deref(), Some("Open"));
    assert_eq!(records[1].target, host);
}

#[test]
fn test_same_value_writes_are_coalesced() {
    let mut doc = Document::new();
    let host = doc.create_element("x-button");
    doc.append_child(doc.root(), host);

    let observer = doc.register_observer();
    doc.observe(
        observer,
        host,
        MutationObserverInit {
            attributes: true,
            ..Default::default()
        },
    );

    doc.set_attribute(host, "role", "presentation");
    doc.set_attribute(host, "role", "presentation");
    assert_eq!(doc.take_records(observer).len(), 1);

    // Removing an absent attribute records nothing
    doc.remove_attribute(host, "aria-label");
    assert!(doc.take_records(observer).is_empty());
}

#[test]
fn test_subtree_child_list_records() {
    let mut doc = Document::new();
    let host = doc.create_element("x-menu");
    doc.append_child(doc.root(), host);
    let shadow = doc.attach_shadow(host, ShadowRootMode::Open).unwrap();
    let surface = doc.create_element("div");
    doc.append_child(shadow, surface);

    let observer = doc.register_observer();
    doc.observe(
        observer,
        shadow,
        MutationObserverInit {
            child_list: true,
            subtree: true,
            ..Default::default()
        },
    );

    let item = doc.create_element("button");
    doc.append_child(surface, item);
    doc.remove_child(item);

    let records = doc.take_records(observer);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].mutation_type, MutationType::ChildList);
    assert_eq!(records[0].added_nodes, vec![item]);
    assert_eq!(records[1].removed_nodes, vec![item]);
    assert_eq!(records[1].target, surface);
}

#[test]
fn test_records_do_not_cross_shadow_boundary() {
    let mut doc = Document::new();
    let host = doc.create_element("x-outer");
    doc.append_child(doc.root(), host);
    let shadow = doc.attach_shadow(host, ShadowRootMode::Open).unwrap();

    let inner_host = doc.create_element("x-inner");
    doc.append_child(shadow, inner_host);
    let inner_shadow = doc.attach_shadow(inner_host, ShadowRootMode::Open).unwrap();
    let leaf = doc.create_element("span");
    doc.append_child(inner_shadow, leaf);

    let observer = doc.register_observer();
    doc.observe(
        observer,
        shadow,
        MutationObserverInit {
            attributes: true,
            child_list: true,
            subtree: true,
            ..Default::default()
        },
    );

    // Mutations inside the nested shadow tree are invisible to the
    // outer observation
    doc.set_attribute(leaf, "class", "deep");
    let extra = doc.create_element("i");
    doc.append_child(inner_shadow, extra);
    assert!(doc.take_records(observer).is_empty());
}

#[test]
fn test_property_slots() {
    let mut doc = Document::new();
    let button = doc.create_element("button");
    doc.append_child(doc.root(), button);

    doc.set_property(button, "ariaLabel", PropertyValue::Token("Close".into()));
    assert_eq!(
        doc.property(button, "ariaLabel"),
        Some(&PropertyValue::Token("Close".into()))
    );

    doc.set_property(button, "ariaLabelledByElements", PropertyValue::Elements(vec![NodeId(3)]));
    doc.clear_property(button, "ariaLabel");
    assert_eq!(doc.property(button, "ariaLabel"), None);
    assert_eq!(
        doc.property(button, "ariaLabelledByElements"),
        Some(&PropertyValue::Elements(vec![NodeId(3)]))
    );
}

#[test]
fn test_delegates_aria_configuration_is_write_once() {
    let mut doc = Document::new();
    let host = doc.create_element("x-button");
    doc.append_child(doc.root(), host);
    let shadow = doc.attach_shadow(host, ShadowRootMode::Open).unwrap();

    assert_eq!(doc.delegates_aria(shadow), None);
    doc.set_delegates_aria(shadow, "aria-label");
    doc.set_delegates_aria(shadow, "aria-hidden");
    assert_eq!(doc.delegates_aria(shadow), Some("aria-label"));
}
