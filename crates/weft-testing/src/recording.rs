use weft_dom::{EventHandler, EventSource, HostError, HostHandle, HostRenderer};

/// A host mutation observed by [`RecordingHost`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostOp {
    CreateElement {
        handle: HostHandle,
        tag: String,
    },
    CreateText {
        handle: HostHandle,
        text: String,
    },
    SetAttribute {
        node: HostHandle,
        key: String,
        value: String,
    },
    RemoveAttribute {
        node: HostHandle,
        key: String,
    },
    AddListener {
        node: HostHandle,
        event: String,
    },
    RemoveListener {
        node: HostHandle,
        event: String,
    },
    SetTextContent {
        node: HostHandle,
        text: String,
    },
    AppendChild {
        parent: HostHandle,
        child: HostHandle,
    },
    InsertBefore {
        parent: HostHandle,
        child: HostHandle,
        reference: Option<HostHandle>,
    },
    RemoveChild {
        parent: HostHandle,
        child: HostHandle,
    },
}

impl HostOp {
    pub fn is_create(&self) -> bool {
        matches!(self, HostOp::CreateElement { .. } | HostOp::CreateText { .. })
    }

    pub fn is_remove(&self) -> bool {
        matches!(self, HostOp::RemoveChild { .. })
    }

    /// Attaching or moving a node.
    pub fn is_insert(&self) -> bool {
        matches!(self, HostOp::AppendChild { .. } | HostOp::InsertBefore { .. })
    }
}

/// Wraps a host and records every successful mutation, in call order.
#[derive(Debug, Default)]
pub struct RecordingHost<H> {
    inner: H,
    ops: Vec<HostOp>,
}

impl<H> RecordingHost<H> {
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[HostOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<HostOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    pub fn count(&self, predicate: impl Fn(&HostOp) -> bool) -> usize {
        self.ops.iter().filter(|op| predicate(*op)).count()
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut H {
        &mut self.inner
    }

    pub fn into_inner(self) -> H {
        self.inner
    }

    fn record<T>(&mut self, result: Result<T, HostError>, op: HostOp) -> Result<T, HostError> {
        if result.is_ok() {
            log::trace!("host op {op:?}");
            self.ops.push(op);
        }
        result
    }
}

impl<H: HostRenderer> HostRenderer for RecordingHost<H> {
    fn create_element(&mut self, tag: &str) -> HostHandle {
        let handle = self.inner.create_element(tag);
        self.ops.push(HostOp::CreateElement {
            handle,
            tag: tag.to_owned(),
        });
        handle
    }

    fn create_text(&mut self, text: &str) -> HostHandle {
        let handle = self.inner.create_text(text);
        self.ops.push(HostOp::CreateText {
            handle,
            text: text.to_owned(),
        });
        handle
    }

    fn set_attribute(&mut self, node: HostHandle, key: &str, value: &str) -> Result<(), HostError> {
        let result = self.inner.set_attribute(node, key, value);
        self.record(
            result,
            HostOp::SetAttribute {
                node,
                key: key.to_owned(),
                value: value.to_owned(),
            },
        )
    }

    fn remove_attribute(&mut self, node: HostHandle, key: &str) -> Result<(), HostError> {
        let result = self.inner.remove_attribute(node, key);
        self.record(
            result,
            HostOp::RemoveAttribute {
                node,
                key: key.to_owned(),
            },
        )
    }

    fn add_event_listener(
        &mut self,
        node: HostHandle,
        event: &str,
        handler: EventHandler,
    ) -> Result<(), HostError> {
        let result = self.inner.add_event_listener(node, event, handler);
        self.record(
            result,
            HostOp::AddListener {
                node,
                event: event.to_owned(),
            },
        )
    }

    fn remove_event_listener(
        &mut self,
        node: HostHandle,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), HostError> {
        let result = self.inner.remove_event_listener(node, event, handler);
        self.record(
            result,
            HostOp::RemoveListener {
                node,
                event: event.to_owned(),
            },
        )
    }

    fn set_text_content(&mut self, node: HostHandle, text: &str) -> Result<(), HostError> {
        let result = self.inner.set_text_content(node, text);
        self.record(
            result,
            HostOp::SetTextContent {
                node,
                text: text.to_owned(),
            },
        )
    }

    fn append_child(&mut self, parent: HostHandle, child: HostHandle) -> Result<(), HostError> {
        let result = self.inner.append_child(parent, child);
        self.record(result, HostOp::AppendChild { parent, child })
    }

    fn insert_before(
        &mut self,
        parent: HostHandle,
        child: HostHandle,
        reference: Option<HostHandle>,
    ) -> Result<(), HostError> {
        let result = self.inner.insert_before(parent, child, reference);
        self.record(
            result,
            HostOp::InsertBefore {
                parent,
                child,
                reference,
            },
        )
    }

    fn remove_child(&mut self, parent: HostHandle, child: HostHandle) -> Result<(), HostError> {
        let result = self.inner.remove_child(parent, child);
        self.record(result, HostOp::RemoveChild { parent, child })
    }

    fn parent(&self, node: HostHandle) -> Option<HostHandle> {
        self.inner.parent(node)
    }

    fn next_sibling(&self, node: HostHandle) -> Option<HostHandle> {
        self.inner.next_sibling(node)
    }

    fn resolve_container(&self, selector: &str) -> Result<HostHandle, HostError> {
        self.inner.resolve_container(selector)
    }
}

impl<H: EventSource> EventSource for RecordingHost<H> {
    fn listeners(&self, node: HostHandle, event: &str) -> Vec<EventHandler> {
        self.inner.listeners(node, event)
    }
}
