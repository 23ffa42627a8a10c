use weft_dom::{h, Children, HostHandle, MemoryHost, TreeNode};

/// A fresh [`MemoryHost`] with an `#app` container.
pub fn container_host() -> (MemoryHost, HostHandle) {
    let mut host = MemoryHost::new();
    let app = host.create_container("app");
    (host, app)
}

/// `<ul>` whose items are keyed by, and display, their key.
pub fn keyed_list(keys: &[&str]) -> TreeNode {
    TreeNode::element("ul").children(keys.iter().map(|key| h("li", *key).key(*key)))
}

/// `<ul>` with unkeyed items.
pub fn plain_list(items: &[&str]) -> TreeNode {
    TreeNode::element("ul").children(items.iter().map(|item| h("li", *item)))
}

/// Element children of `tree`, empty for text or empty content.
pub fn child_nodes(tree: &TreeNode) -> &[TreeNode] {
    match tree.child_nodes() {
        Children::Nodes(nodes) => nodes,
        _ => &[],
    }
}

/// Text content of each host child of `parent`, in host order.
pub fn child_texts(host: &MemoryHost, parent: HostHandle) -> Vec<String> {
    host.children(parent)
        .into_iter()
        .map(|child| host.text_content(child))
        .collect()
}

/// Asserts the serialized host subtree, printing the outline on mismatch.
#[track_caller]
pub fn assert_html(host: &MemoryHost, handle: HostHandle, expected: &str) {
    let actual = host.to_html(handle);
    assert!(
        actual == expected,
        "html mismatch\n  expected: {expected}\n    actual: {actual}\n{}",
        host.dump_tree(handle)
    );
}
