//! Tree node model and host reconciliation for Weft.
//!
//! A render produces a [`TreeNode`]. [`mount`] turns the first one into host
//! nodes through a [`HostRenderer`]; [`patch`] turns every later one into the
//! smallest set of host mutations it can find, using the keyed four-pointer
//! diff whenever children carry keys.

pub mod host;
pub mod keyed;
pub mod memory;
pub mod mount;
pub mod node;
pub mod patch;
pub mod props;

pub use host::{dispatch_event, EventSource, HostError, HostHandle, HostRenderer};
pub use keyed::{patch_keyed_children, KeyedDiffStats};
pub use memory::MemoryHost;
pub use mount::mount;
pub use node::{h, same_node, Children, NodeKey, TreeNode, KEY_PROP, TEXT_TAG};
pub use patch::{patch, patch_node, patch_positional_children, patch_props};
pub use props::{classify, event_name, Event, EventHandler, PropEntry, PropValue, Props, EVENT_PREFIX};

#[cfg(test)]
#[path = "tests/node_tests.rs"]
mod node_tests;

#[cfg(test)]
#[path = "tests/memory_tests.rs"]
mod memory_tests;

#[cfg(test)]
#[path = "tests/mount_tests.rs"]
mod mount_tests;

#[cfg(test)]
#[path = "tests/patch_tests.rs"]
mod patch_tests;

#[cfg(test)]
#[path = "tests/keyed_tests.rs"]
mod keyed_tests;
