use std::cell::RefCell;
use std::fmt;

use weft_core::ComputationError;

use crate::props::{Event, EventHandler};

/// Opaque reference to a node living in the host tree.
///
/// Hosts that recycle storage bump `generation` on reuse, so a handle to a
/// removed node never aliases its successor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostHandle {
    index: usize,
    generation: u32,
}

impl HostHandle {
    pub const fn new(index: usize) -> Self {
        Self::with_generation(index, 0)
    }

    pub const fn with_generation(index: usize, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(self) -> usize {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for HostHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.generation {
            0 => write!(f, "node#{}", self.index),
            generation => write!(f, "node#{}v{generation}", self.index),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    ContainerNotFound { selector: String },
    Missing { handle: HostHandle },
    NotAChild { parent: HostHandle, child: HostHandle },
    NotAnElement { handle: HostHandle },
    Detached { handle: HostHandle },
    Unmounted { tag: String },
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::ContainerNotFound { selector } => {
                write!(f, "container `{selector}` not found")
            }
            HostError::Missing { handle } => write!(f, "host node {handle} missing"),
            HostError::NotAChild { parent, child } => {
                write!(f, "host node {child} is not a child of {parent}")
            }
            HostError::NotAnElement { handle } => {
                write!(f, "host node {handle} is not an element")
            }
            HostError::Detached { handle } => write!(f, "host node {handle} has no parent"),
            HostError::Unmounted { tag } => write!(f, "<{tag}> was never mounted"),
        }
    }
}

impl std::error::Error for HostError {}

/// The mutable tree that visible UI lives in.
///
/// Mount and patch only ever talk to the host through this trait. Inserting
/// a node that is already attached somewhere moves it, as in the DOM.
pub trait HostRenderer {
    fn create_element(&mut self, tag: &str) -> HostHandle;
    fn create_text(&mut self, text: &str) -> HostHandle;
    fn set_attribute(&mut self, node: HostHandle, key: &str, value: &str) -> Result<(), HostError>;
    fn remove_attribute(&mut self, node: HostHandle, key: &str) -> Result<(), HostError>;
    fn add_event_listener(
        &mut self,
        node: HostHandle,
        event: &str,
        handler: EventHandler,
    ) -> Result<(), HostError>;
    fn remove_event_listener(
        &mut self,
        node: HostHandle,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), HostError>;
    /// Replaces every child of an element with `text`, or rewrites a text node.
    fn set_text_content(&mut self, node: HostHandle, text: &str) -> Result<(), HostError>;
    fn append_child(&mut self, parent: HostHandle, child: HostHandle) -> Result<(), HostError>;
    /// Inserts `child` before `reference`, or appends when there is no reference.
    fn insert_before(
        &mut self,
        parent: HostHandle,
        child: HostHandle,
        reference: Option<HostHandle>,
    ) -> Result<(), HostError>;
    /// Detaches `child` from `parent` and releases its subtree.
    fn remove_child(&mut self, parent: HostHandle, child: HostHandle) -> Result<(), HostError>;
    fn parent(&self, node: HostHandle) -> Option<HostHandle>;
    fn next_sibling(&self, node: HostHandle) -> Option<HostHandle>;
    fn resolve_container(&self, selector: &str) -> Result<HostHandle, HostError>;
}

/// Hosts that can deliver events to the listeners registered on them.
pub trait EventSource {
    fn listeners(&self, node: HostHandle, event: &str) -> Vec<EventHandler>;
}

/// Delivers `event` to every listener on `target`, in registration order.
///
/// The host is not borrowed while handlers run, so a handler may write
/// reactive state and let the resulting re-render patch the same host.
/// Returns the number of handlers invoked.
pub fn dispatch_event<H: EventSource + ?Sized>(
    host: &RefCell<H>,
    target: HostHandle,
    event: &str,
) -> Result<usize, ComputationError> {
    let handlers = host.borrow().listeners(target, event);
    log::trace!("dispatching `{event}` to {} listener(s) on {target}", handlers.len());
    let event = Event::new(event, target);
    for handler in &handlers {
        handler.call(&event)?;
    }
    Ok(handlers.len())
}
