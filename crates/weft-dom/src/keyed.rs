//! Four-pointer diff for keyed child lists.
//!
//! Two cursors converge over the old children and two over the new ones.
//! Each step tries the four end-to-end pairings first, then falls back to a
//! linear scan of the remaining old window. Every match issues whatever move
//! puts its host node into final position, so the host order equals the new
//! order once the loop finishes.

use crate::host::{HostError, HostHandle, HostRenderer};
use crate::mount::{mount, mounted};
use crate::node::{same_node, TreeNode};
use crate::patch::patch;

/// What a keyed diff did to the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyedDiffStats {
    /// Old nodes reused for a new node, moved or not.
    pub patched: usize,
    /// Reused nodes that had to be moved.
    pub moved: usize,
    pub mounted: usize,
    pub removed: usize,
}

pub fn patch_keyed_children<H: HostRenderer + ?Sized>(
    host: &mut H,
    parent: HostHandle,
    old: &[TreeNode],
    new: &[TreeNode],
) -> Result<KeyedDiffStats, HostError> {
    let mut stats = KeyedDiffStats::default();
    // Old children already reused by the scan step.
    let mut consumed = vec![false; old.len()];
    let (mut old_lo, mut old_hi) = (0, old.len());
    let (mut new_lo, mut new_hi) = (0, new.len());

    while old_lo < old_hi && new_lo < new_hi {
        if consumed[old_lo] {
            old_lo += 1;
            continue;
        }
        if consumed[old_hi - 1] {
            old_hi -= 1;
            continue;
        }
        let old_start = &old[old_lo];
        let old_end = &old[old_hi - 1];
        let new_start = &new[new_lo];
        let new_end = &new[new_hi - 1];

        if same_node(old_start, new_start) {
            patch(host, old_start, new_start)?;
            stats.patched += 1;
            old_lo += 1;
            new_lo += 1;
        } else if same_node(old_end, new_end) {
            patch(host, old_end, new_end)?;
            stats.patched += 1;
            old_hi -= 1;
            new_hi -= 1;
        } else if same_node(old_start, new_end) {
            patch(host, old_start, new_end)?;
            let anchor = host.next_sibling(mounted(old_end)?);
            host.insert_before(parent, mounted(new_end)?, anchor)?;
            stats.patched += 1;
            stats.moved += 1;
            old_lo += 1;
            new_hi -= 1;
        } else if same_node(old_end, new_start) {
            patch(host, old_end, new_start)?;
            host.insert_before(parent, mounted(new_start)?, Some(mounted(old_start)?))?;
            stats.patched += 1;
            stats.moved += 1;
            old_hi -= 1;
            new_lo += 1;
        } else {
            let anchor = mounted(old_start)?;
            let found =
                (old_lo..old_hi).find(|&index| !consumed[index] && same_node(&old[index], new_start));
            match found {
                Some(index) => {
                    patch(host, &old[index], new_start)?;
                    host.insert_before(parent, mounted(new_start)?, Some(anchor))?;
                    consumed[index] = true;
                    stats.patched += 1;
                    stats.moved += 1;
                }
                None => {
                    mount(host, new_start, parent, Some(anchor))?;
                    stats.mounted += 1;
                }
            }
            new_lo += 1;
        }
    }

    if old_lo >= old_hi {
        let anchor = new.get(new_hi).and_then(TreeNode::host_handle);
        for next in &new[new_lo..new_hi] {
            mount(host, next, parent, anchor)?;
            stats.mounted += 1;
        }
    } else {
        for index in old_lo..old_hi {
            if !consumed[index] {
                host.remove_child(parent, mounted(&old[index])?)?;
                stats.removed += 1;
            }
        }
    }

    log::debug!(
        "keyed diff under {parent}: {} patched, {} moved, {} mounted, {} removed",
        stats.patched,
        stats.moved,
        stats.mounted,
        stats.removed
    );
    Ok(stats)
}
