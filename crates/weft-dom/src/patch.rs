//! Reconciliation of two renders that are already reflected in the host.

use crate::host::{HostError, HostHandle, HostRenderer};
use crate::keyed::patch_keyed_children;
use crate::mount::{apply_prop, mount, mount_children, mounted, unapply_prop};
use crate::node::{Children, TreeNode};
use crate::props::{classify, PropEntry, Props};

/// Brings the host subtree of `old` in line with `new`.
///
/// The host node is reused whenever the tags agree and its handle moves
/// onto `new`. A tag mismatch replaces the whole subtree.
pub fn patch<H: HostRenderer + ?Sized>(
    host: &mut H,
    old: &TreeNode,
    new: &TreeNode,
) -> Result<(), HostError> {
    let handle = mounted(old)?;
    if old.tag() != new.tag() {
        return replace(host, handle, old, new);
    }
    patch_node(host, handle, old, new)
}

fn replace<H: HostRenderer + ?Sized>(
    host: &mut H,
    handle: HostHandle,
    old: &TreeNode,
    new: &TreeNode,
) -> Result<(), HostError> {
    let parent = host.parent(handle).ok_or(HostError::Detached { handle })?;
    log::debug!("replacing <{}> with <{}> at {handle}", old.tag(), new.tag());
    mount(host, new, parent, Some(handle))?;
    host.remove_child(parent, handle)
}

/// Patches two nodes with the same tag in place.
pub fn patch_node<H: HostRenderer + ?Sized>(
    host: &mut H,
    handle: HostHandle,
    old: &TreeNode,
    new: &TreeNode,
) -> Result<(), HostError> {
    new.set_host_handle(handle);
    if new.is_text() {
        let (before, after) = (old.text_value(), new.text_value());
        if before != after {
            host.set_text_content(handle, after.unwrap_or_default())?;
        }
        return Ok(());
    }
    patch_props(host, handle, old.props(), new.props())?;
    patch_children(host, handle, old.child_nodes(), new.child_nodes())
}

/// Key-by-key diff. Keys that vanished or turned falsy are removed, keys
/// whose value changed are re-applied.
pub fn patch_props<H: HostRenderer + ?Sized>(
    host: &mut H,
    handle: HostHandle,
    old: &Props,
    new: &Props,
) -> Result<(), HostError> {
    for (key, previous) in old.iter() {
        if previous.is_falsy() {
            continue;
        }
        let gone = new.get(key).map_or(true, |next| next.is_falsy());
        if gone {
            log::trace!("removing prop `{key}` from {handle}");
            unapply_prop(host, handle, &classify(key, previous))?;
        }
    }
    for (key, next) in new.iter() {
        if next.is_falsy() {
            continue;
        }
        match old.get(key) {
            Some(previous) if previous == next => continue,
            Some(previous) if !previous.is_falsy() => {
                let previous = classify(key, previous);
                let next = classify(key, next);
                // Attributes overwrite in place; anything else is swapped out.
                if !matches!(
                    (&previous, &next),
                    (PropEntry::Attribute { .. }, PropEntry::Attribute { .. })
                ) {
                    unapply_prop(host, handle, &previous)?;
                }
                apply_prop(host, handle, &next)?;
            }
            _ => apply_prop(host, handle, &classify(key, next))?,
        }
    }
    Ok(())
}

pub(crate) fn patch_children<H: HostRenderer + ?Sized>(
    host: &mut H,
    handle: HostHandle,
    old: &Children,
    new: &Children,
) -> Result<(), HostError> {
    match (old, new) {
        (Children::Text(before), Children::Text(after)) => {
            if before != after {
                host.set_text_content(handle, after)?;
            }
            Ok(())
        }
        (Children::Empty, Children::Empty) => Ok(()),
        (Children::Empty, next) => mount_children(host, next, handle),
        (Children::Text(_), Children::Empty) => host.set_text_content(handle, ""),
        (Children::Text(_), Children::Nodes(_)) => {
            host.set_text_content(handle, "")?;
            mount_children(host, new, handle)
        }
        (Children::Nodes(_), Children::Text(text)) => host.set_text_content(handle, text),
        (Children::Nodes(previous), Children::Empty) => {
            for child in previous {
                host.remove_child(handle, mounted(child)?)?;
            }
            Ok(())
        }
        (Children::Nodes(previous), Children::Nodes(next)) => {
            let keyed = previous
                .iter()
                .chain(next.iter())
                .any(|child| child.node_key().is_some());
            if keyed {
                patch_keyed_children(host, handle, previous, next).map(|_| ())
            } else {
                patch_positional_children(host, handle, previous, next)
            }
        }
    }
}

/// Index-by-index diff for unkeyed children.
pub fn patch_positional_children<H: HostRenderer + ?Sized>(
    host: &mut H,
    parent: HostHandle,
    old: &[TreeNode],
    new: &[TreeNode],
) -> Result<(), HostError> {
    let shared = old.len().min(new.len());
    for (previous, next) in old.iter().zip(new.iter()) {
        patch(host, previous, next)?;
    }
    for next in &new[shared..] {
        mount(host, next, parent, None)?;
    }
    for previous in &old[shared..] {
        host.remove_child(parent, mounted(previous)?)?;
    }
    log::trace!(
        "positional diff under {parent}: {shared} patched, {} mounted, {} removed",
        new.len() - shared,
        old.len() - shared
    );
    Ok(())
}
