//! First-time materialization of a [`TreeNode`] into the host tree.

use crate::host::{HostError, HostHandle, HostRenderer};
use crate::node::{Children, TreeNode};
use crate::props::PropEntry;

/// Creates the host subtree for `node` and attaches it to `container`,
/// before `before` when given, appended otherwise.
///
/// The subtree is fully built before it is attached. Returns the handle of
/// the new host node, which is also stored on `node`.
pub fn mount<H: HostRenderer + ?Sized>(
    host: &mut H,
    node: &TreeNode,
    container: HostHandle,
    before: Option<HostHandle>,
) -> Result<HostHandle, HostError> {
    let handle = if node.is_text() {
        host.create_text(node.text_value().unwrap_or_default())
    } else {
        let handle = host.create_element(node.tag());
        for entry in node.props().entries() {
            apply_prop(host, handle, &entry)?;
        }
        mount_children(host, node.child_nodes(), handle)?;
        handle
    };
    node.set_host_handle(handle);
    match before {
        Some(reference) => host.insert_before(container, handle, Some(reference))?,
        None => host.append_child(container, handle)?,
    }
    log::trace!("mounted <{}> as {handle} under {container}", node.tag());
    Ok(handle)
}

pub(crate) fn mount_children<H: HostRenderer + ?Sized>(
    host: &mut H,
    children: &Children,
    parent: HostHandle,
) -> Result<(), HostError> {
    match children {
        Children::Empty => Ok(()),
        Children::Text(text) if text.is_empty() => Ok(()),
        Children::Text(text) => host.set_text_content(parent, text),
        Children::Nodes(nodes) => {
            for child in nodes {
                mount(host, child, parent, None)?;
            }
            Ok(())
        }
    }
}

pub(crate) fn apply_prop<H: HostRenderer + ?Sized>(
    host: &mut H,
    handle: HostHandle,
    entry: &PropEntry<'_>,
) -> Result<(), HostError> {
    match entry {
        PropEntry::Attribute { name, value } => host.set_attribute(handle, name, value),
        PropEntry::Listener { event, handler } => {
            host.add_event_listener(handle, event, (*handler).clone())
        }
    }
}

pub(crate) fn unapply_prop<H: HostRenderer + ?Sized>(
    host: &mut H,
    handle: HostHandle,
    entry: &PropEntry<'_>,
) -> Result<(), HostError> {
    match entry {
        PropEntry::Attribute { name, .. } => host.remove_attribute(handle, name),
        PropEntry::Listener { event, handler } => host.remove_event_listener(handle, event, handler),
    }
}

/// The host handle of a node that is expected to be mounted already.
pub(crate) fn mounted(node: &TreeNode) -> Result<HostHandle, HostError> {
    node.host_handle().ok_or_else(|| HostError::Unmounted {
        tag: node.tag().to_owned(),
    })
}
