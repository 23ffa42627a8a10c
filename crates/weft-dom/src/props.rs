//! Node properties and their classification into host operations.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use weft_core::ComputationError;

use crate::host::HostHandle;

/// Prefix marking a handler prop as an event listener (`onClick` listens to `click`).
pub const EVENT_PREFIX: &str = "on";

/// Event delivered to listeners by [`dispatch_event`](crate::dispatch_event).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub name: String,
    pub target: HostHandle,
}

impl Event {
    pub fn new(name: impl Into<String>, target: HostHandle) -> Self {
        Self {
            name: name.into(),
            target,
        }
    }
}

type HandlerFn = dyn Fn(&Event) -> Result<(), ComputationError>;

/// Shared event callback. Two handlers are equal only if they are the same allocation.
#[derive(Clone)]
pub struct EventHandler(Rc<HandlerFn>);

impl EventHandler {
    pub fn new(f: impl Fn(&Event) -> Result<(), ComputationError> + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, event: &Event) -> Result<(), ComputationError> {
        (self.0)(event)
    }
}

impl PartialEq for EventHandler {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventHandler({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PropValue {
    Text(String),
    Handler(EventHandler),
}

impl PropValue {
    /// Falsy values are skipped on mount and removed on patch.
    pub fn is_falsy(&self) -> bool {
        match self {
            PropValue::Text(text) => text.is_empty(),
            PropValue::Handler(_) => false,
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Text(value.to_owned())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Text(value)
    }
}

impl From<EventHandler> for PropValue {
    fn from(value: EventHandler) -> Self {
        PropValue::Handler(value)
    }
}

/// A prop entry after classification, ready to be applied to a host node.
#[derive(Clone, Debug, PartialEq)]
pub enum PropEntry<'a> {
    Attribute { name: &'a str, value: &'a str },
    Listener { event: String, handler: &'a EventHandler },
}

/// Classifies a prop by its value: handlers become listeners, text becomes an attribute.
pub fn classify<'a>(key: &'a str, value: &'a PropValue) -> PropEntry<'a> {
    match value {
        PropValue::Text(text) => PropEntry::Attribute { name: key, value: text },
        PropValue::Handler(handler) => PropEntry::Listener {
            event: event_name(key),
            handler,
        },
    }
}

/// `onClick` -> `click`. Keys without the prefix are only lower-cased.
pub fn event_name(key: &str) -> String {
    key.strip_prefix(EVENT_PREFIX)
        .filter(|rest| !rest.is_empty())
        .unwrap_or(key)
        .to_ascii_lowercase()
}

/// Insertion-ordered prop map.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Props {
    entries: IndexMap<String, PropValue>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.entries.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<PropValue> {
        self.entries.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Classified entries, skipping falsy values.
    pub fn entries(&self) -> impl Iterator<Item = PropEntry<'_>> {
        self.iter()
            .filter(|(_, value)| !value.is_falsy())
            .map(|(key, value)| classify(key, value))
    }
}

impl<K: Into<String>, V: Into<PropValue>> FromIterator<(K, V)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Props::new();
        for (key, value) in iter {
            props.insert(key, value);
        }
        props
    }
}
