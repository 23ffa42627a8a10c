//! Declarative description of one render pass.

use std::cell::Cell;
use std::fmt;
use std::hash::{Hash, Hasher};

use weft_core::hash::hash_one;

use crate::host::HostHandle;
use crate::props::{EventHandler, PropValue, Props, EVENT_PREFIX};

/// Tag carried by text leaves.
pub const TEXT_TAG: &str = "#text";

/// Prop name that sets the node key instead of a host attribute.
pub const KEY_PROP: &str = "key";

/// Identity of a node among its siblings. The hash is computed once so
/// keyed diffs compare integers before strings.
#[derive(Clone)]
pub struct NodeKey {
    value: String,
    hash: u64,
}

impl NodeKey {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let hash = hash_one(value.as_str());
        Self { value, hash }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn fingerprint(&self) -> u64 {
        self.hash
    }
}

impl PartialEq for NodeKey {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.value == other.value
    }
}

impl Eq for NodeKey {}

impl Hash for NodeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl fmt::Debug for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeKey({:?})", self.value)
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl From<&str> for NodeKey {
    fn from(value: &str) -> Self {
        NodeKey::new(value)
    }
}

impl From<String> for NodeKey {
    fn from(value: String) -> Self {
        NodeKey::new(value)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Children {
    #[default]
    Empty,
    Text(String),
    Nodes(Vec<TreeNode>),
}

impl Children {
    pub fn is_empty(&self) -> bool {
        match self {
            Children::Empty => true,
            Children::Text(text) => text.is_empty(),
            Children::Nodes(nodes) => nodes.is_empty(),
        }
    }
}

impl From<&str> for Children {
    fn from(value: &str) -> Self {
        Children::Text(value.to_owned())
    }
}

impl From<String> for Children {
    fn from(value: String) -> Self {
        Children::Text(value)
    }
}

impl From<Vec<TreeNode>> for Children {
    fn from(value: Vec<TreeNode>) -> Self {
        Children::Nodes(value)
    }
}

impl From<TreeNode> for Children {
    fn from(value: TreeNode) -> Self {
        Children::Nodes(vec![value])
    }
}

/// One element or text leaf.
///
/// Immutable once rendered, except for the host handle which mount and
/// patch fill in so the next render can find the live node.
#[derive(Clone, Debug, Default)]
pub struct TreeNode {
    tag: String,
    key: Option<NodeKey>,
    props: Props,
    children: Children,
    host: Cell<Option<HostHandle>>,
}

impl TreeNode {
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            tag: TEXT_TAG.to_owned(),
            children: Children::Text(text.into()),
            ..Self::default()
        }
    }

    pub fn key(mut self, key: impl Into<NodeKey>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn attr(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.prop(name, PropValue::Text(value.into()))
    }

    /// Adds a prop. A `key` prop sets the node key instead.
    pub fn prop(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        let name = name.into();
        let value = value.into();
        if name == KEY_PROP {
            if let PropValue::Text(key) = value {
                self.key = Some(NodeKey::new(key));
                return self;
            }
        }
        self.props.insert(name, value);
        self
    }

    /// Registers `handler` for `event` (`"click"` is stored as `onclick`).
    pub fn on(self, event: &str, handler: EventHandler) -> Self {
        let name = format!("{EVENT_PREFIX}{event}");
        self.prop(name, PropValue::Handler(handler))
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children = Children::Text(text.into());
        self
    }

    /// Appends a child. Existing text content becomes a leading text leaf.
    pub fn child(mut self, child: TreeNode) -> Self {
        self.children = match std::mem::take(&mut self.children) {
            Children::Empty => Children::Nodes(vec![child]),
            Children::Text(text) => Children::Nodes(vec![TreeNode::text(text), child]),
            Children::Nodes(mut nodes) => {
                nodes.push(child);
                Children::Nodes(nodes)
            }
        };
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = TreeNode>) -> Self {
        for child in children {
            self = self.child(child);
        }
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn node_key(&self) -> Option<&NodeKey> {
        self.key.as_ref()
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    pub fn child_nodes(&self) -> &Children {
        &self.children
    }

    pub fn is_text(&self) -> bool {
        self.tag == TEXT_TAG
    }

    /// The text of a text leaf, or the text-only content of an element.
    pub fn text_value(&self) -> Option<&str> {
        match &self.children {
            Children::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn host_handle(&self) -> Option<HostHandle> {
        self.host.get()
    }

    pub(crate) fn set_host_handle(&self, handle: HostHandle) {
        self.host.set(Some(handle));
    }

    pub fn has_keyed_children(&self) -> bool {
        match &self.children {
            Children::Nodes(nodes) => nodes.iter().any(|node| node.key.is_some()),
            _ => false,
        }
    }
}

/// Structural equality. Host handles are ignored.
impl PartialEq for TreeNode {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag
            && self.key == other.key
            && self.props == other.props
            && self.children == other.children
    }
}

/// Builds an element from a tag and its children.
///
/// ```
/// use weft_dom::{h, Children};
///
/// let list = h("ul", vec![h("li", "one"), h("li", "two")]);
/// assert!(matches!(list.child_nodes(), Children::Nodes(items) if items.len() == 2));
/// ```
pub fn h(tag: &str, children: impl Into<Children>) -> TreeNode {
    TreeNode {
        tag: tag.to_owned(),
        children: children.into(),
        ..TreeNode::default()
    }
}

/// Whether `a` and `b` describe the same logical node: equal tags and, when
/// both carry a key, equal keys.
pub fn same_node(a: &TreeNode, b: &TreeNode) -> bool {
    if a.tag != b.tag {
        return false;
    }
    match (&a.key, &b.key) {
        (Some(left), Some(right)) => left == right,
        _ => true,
    }
}
