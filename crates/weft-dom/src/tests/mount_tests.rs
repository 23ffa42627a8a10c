use super::*;

fn host_with_app() -> (MemoryHost, HostHandle) {
    let mut host = MemoryHost::new();
    let app = host.create_container("app");
    (host, app)
}

#[test]
fn mount_builds_and_attaches_the_subtree() {
    let (mut host, app) = host_with_app();
    let tree = TreeNode::element("ul")
        .attr("class", "todo")
        .child(h("li", "one"))
        .child(h("li", "two"));

    let handle = mount(&mut host, &tree, app, None).unwrap();

    assert_eq!(tree.host_handle(), Some(handle));
    assert_eq!(host.parent(handle), Some(app));
    assert_eq!(
        host.to_html(app),
        r#"<div id="app"><ul class="todo"><li>one</li><li>two</li></ul></div>"#
    );
    match tree.child_nodes() {
        Children::Nodes(items) => assert!(items.iter().all(|item| item.host_handle().is_some())),
        other => panic!("unexpected children {other:?}"),
    }
}

#[test]
fn mount_inserts_before_a_sibling() {
    let (mut host, app) = host_with_app();
    let last = h("p", "last");
    mount(&mut host, &last, app, None).unwrap();

    let first = h("p", "first");
    mount(&mut host, &first, app, last.host_handle()).unwrap();

    assert_eq!(host.text_content(app), "firstlast");
}

#[test]
fn falsy_props_are_skipped() {
    let (mut host, app) = host_with_app();
    let tree = TreeNode::element("input").attr("value", "").attr("type", "text");

    let handle = mount(&mut host, &tree, app, None).unwrap();

    assert_eq!(
        host.attributes(handle),
        vec![("type".to_owned(), "text".to_owned())]
    );
}

#[test]
fn handlers_become_listeners() {
    let (mut host, app) = host_with_app();
    let tree = TreeNode::element("button")
        .prop("onClick", EventHandler::new(|_| Ok(())))
        .with_text("+");

    let handle = mount(&mut host, &tree, app, None).unwrap();

    assert_eq!(host.listener_count(handle, "click"), 1);
    assert!(host.attribute(handle, "onClick").is_none());
}

#[test]
fn text_leaves_mount_as_text_nodes() {
    let (mut host, app) = host_with_app();
    let tree = TreeNode::element("p")
        .child(TreeNode::text("count: "))
        .child(h("b", "1"));

    let handle = mount(&mut host, &tree, app, None).unwrap();

    let children = host.children(handle);
    assert_eq!(children.len(), 2);
    assert_eq!(host.tag(children[0]), Some(TEXT_TAG));
    assert_eq!(host.to_html(handle), "<p>count: <b>1</b></p>");
}

#[test]
fn mount_into_a_missing_container_fails() {
    let mut host = MemoryHost::new();
    let ghost = HostHandle::new(99);
    assert_eq!(
        mount(&mut host, &h("p", "x"), ghost, None),
        Err(HostError::Missing { handle: ghost })
    );
}
