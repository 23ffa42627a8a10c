use super::*;

fn noop() -> EventHandler {
    EventHandler::new(|_| Ok(()))
}

#[test]
fn same_node_compares_tags_then_keys_when_both_present() {
    let plain = TreeNode::element("li");
    let keyed_a = TreeNode::element("li").key("a");
    let keyed_b = TreeNode::element("li").key("b");

    assert!(same_node(&plain, &TreeNode::element("li")));
    assert!(same_node(&keyed_a, &TreeNode::element("li").key("a")));
    assert!(!same_node(&keyed_a, &keyed_b));
    assert!(same_node(&plain, &keyed_a));
    assert!(!same_node(&keyed_a, &TreeNode::element("p").key("a")));
}

#[test]
fn key_prop_sets_the_node_key() {
    let node = TreeNode::element("li").prop("key", "row-1").attr("class", "row");

    assert_eq!(node.node_key().map(NodeKey::as_str), Some("row-1"));
    assert!(node.props().get(KEY_PROP).is_none());
    assert_eq!(node.props().len(), 1);
}

#[test]
fn node_keys_compare_by_value() {
    let a = NodeKey::new("row-1");
    let b = NodeKey::from(String::from("row-1"));
    assert_eq!(a, b);
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_ne!(a, NodeKey::new("row-2"));
}

#[test]
fn child_after_text_keeps_the_text_as_a_leaf() {
    let node = TreeNode::element("p")
        .with_text("count: ")
        .child(h("strong", "3"));

    match node.child_nodes() {
        Children::Nodes(children) => {
            assert_eq!(children.len(), 2);
            assert!(children[0].is_text());
            assert_eq!(children[0].text_value(), Some("count: "));
            assert_eq!(children[1].tag(), "strong");
        }
        other => panic!("expected child nodes, got {other:?}"),
    }
}

#[test]
fn h_accepts_text_or_children() {
    let text = h("span", "hi");
    assert_eq!(text.text_value(), Some("hi"));

    let list = h("ul", vec![h("li", "a").key("a"), h("li", "b")]);
    assert!(list.has_keyed_children());
    assert!(!text.has_keyed_children());
}

#[test]
fn tree_equality_ignores_host_handles() {
    let a = h("p", "0");
    let b = h("p", "0");
    a.set_host_handle(HostHandle::new(7));
    assert_eq!(a, b);
    assert_ne!(a, h("p", "1"));
}

#[test]
fn props_are_classified_by_value() {
    let handler = noop();
    let props: Props = [
        ("class", PropValue::from("row")),
        ("onClick", PropValue::from(handler.clone())),
        ("title", PropValue::from("")),
    ]
    .into_iter()
    .collect();

    let entries: Vec<PropEntry<'_>> = props.entries().collect();
    assert_eq!(
        entries,
        vec![
            PropEntry::Attribute {
                name: "class",
                value: "row"
            },
            PropEntry::Listener {
                event: "click".to_owned(),
                handler: &handler
            },
        ]
    );
}

#[test]
fn event_names_drop_the_prefix_and_lowercase() {
    assert_eq!(event_name("onClick"), "click");
    assert_eq!(event_name("onmouseover"), "mouseover");
    assert_eq!(event_name("Input"), "input");
    assert_eq!(event_name("on"), "on");
}

#[test]
fn text_values_that_look_like_events_stay_attributes() {
    let value = PropValue::from("alert(1)");
    assert!(matches!(
        classify("onclick", &value),
        PropEntry::Attribute { name: "onclick", .. }
    ));
}

#[test]
fn builder_on_stores_a_prefixed_handler() {
    let node = TreeNode::element("button").on("click", noop());
    assert!(matches!(
        node.props().get("onclick"),
        Some(PropValue::Handler(_))
    ));
}

#[test]
fn handlers_compare_by_identity() {
    let first = noop();
    let second = noop();
    assert_eq!(first, first.clone());
    assert_ne!(first, second);
}
