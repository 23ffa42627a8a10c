//! Arena-backed host tree used by tests, benches and the demo.

use indexmap::IndexMap;

use crate::host::{EventSource, HostError, HostHandle, HostRenderer};
use crate::node::TEXT_TAG;
use crate::props::EventHandler;

#[derive(Debug)]
enum MemoryKind {
    Element {
        tag: String,
        attributes: IndexMap<String, String>,
        listeners: Vec<(String, EventHandler)>,
    },
    Text(String),
}

#[derive(Debug)]
struct MemoryNode {
    kind: MemoryKind,
    parent: Option<HostHandle>,
    children: Vec<HostHandle>,
}

impl MemoryNode {
    fn element(tag: &str) -> Self {
        Self {
            kind: MemoryKind::Element {
                tag: tag.to_owned(),
                attributes: IndexMap::new(),
                listeners: Vec::new(),
            },
            parent: None,
            children: Vec::new(),
        }
    }

    fn text(text: &str) -> Self {
        Self {
            kind: MemoryKind::Text(text.to_owned()),
            parent: None,
            children: Vec::new(),
        }
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<MemoryNode>,
}

/// In-memory host with DOM-like semantics, rooted at a `body` element.
///
/// Slots of removed nodes are reused; their handles stop resolving.
#[derive(Debug)]
pub struct MemoryHost {
    slots: Vec<Slot>,
    free: Vec<usize>,
    root: HostHandle,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    pub fn new() -> Self {
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(MemoryNode::element("body")),
            }],
            free: Vec::new(),
            root: HostHandle::new(0),
        }
    }

    pub fn root(&self) -> HostHandle {
        self.root
    }

    /// Appends `<div id="{id}">` to the root and returns it.
    pub fn create_container(&mut self, id: &str) -> HostHandle {
        let handle = self.create_element("div");
        if let Some(MemoryKind::Element { attributes, .. }) = self.kind_mut(handle) {
            attributes.insert("id".to_owned(), id.to_owned());
        }
        self.link(self.root, handle, None);
        handle
    }

    /// Number of live nodes, the root included.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, handle: HostHandle) -> bool {
        self.node(handle).is_ok()
    }

    pub fn children(&self, handle: HostHandle) -> Vec<HostHandle> {
        self.node(handle)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    pub fn tag(&self, handle: HostHandle) -> Option<&str> {
        match &self.node(handle).ok()?.kind {
            MemoryKind::Element { tag, .. } => Some(tag),
            MemoryKind::Text(_) => Some(TEXT_TAG),
        }
    }

    pub fn attribute(&self, handle: HostHandle, key: &str) -> Option<&str> {
        match &self.node(handle).ok()?.kind {
            MemoryKind::Element { attributes, .. } => attributes.get(key).map(String::as_str),
            MemoryKind::Text(_) => None,
        }
    }

    pub fn attributes(&self, handle: HostHandle) -> Vec<(String, String)> {
        match self.node(handle).map(|node| &node.kind) {
            Ok(MemoryKind::Element { attributes, .. }) => attributes
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn listener_count(&self, handle: HostHandle, event: &str) -> usize {
        self.listeners(handle, event).len()
    }

    /// Concatenated text of `handle` and all its descendants.
    pub fn text_content(&self, handle: HostHandle) -> String {
        let mut output = String::new();
        self.collect_text(handle, &mut output);
        output
    }

    fn collect_text(&self, handle: HostHandle, output: &mut String) {
        let Ok(node) = self.node(handle) else {
            return;
        };
        if let MemoryKind::Text(text) = &node.kind {
            output.push_str(text);
        }
        for child in &node.children {
            self.collect_text(*child, output);
        }
    }

    /// Serializes the subtree under `handle`, attributes in insertion order.
    pub fn to_html(&self, handle: HostHandle) -> String {
        let mut output = String::new();
        self.write_html(handle, &mut output);
        output
    }

    fn write_html(&self, handle: HostHandle, output: &mut String) {
        let Ok(node) = self.node(handle) else {
            return;
        };
        match &node.kind {
            MemoryKind::Text(text) => output.push_str(&escape(text)),
            MemoryKind::Element {
                tag, attributes, ..
            } => {
                output.push('<');
                output.push_str(tag);
                for (key, value) in attributes {
                    output.push_str(&format!(" {key}=\"{}\"", escape(value)));
                }
                output.push('>');
                for child in &node.children {
                    self.write_html(*child, output);
                }
                output.push_str(&format!("</{tag}>"));
            }
        }
    }

    /// Indented outline of the subtree, one node per line.
    pub fn dump_tree(&self, handle: HostHandle) -> String {
        let mut output = String::new();
        self.dump_node(&mut output, handle, 0);
        output
    }

    fn dump_node(&self, output: &mut String, handle: HostHandle, depth: usize) {
        let indent = "  ".repeat(depth);
        match self.node(handle) {
            Ok(node) => {
                match &node.kind {
                    MemoryKind::Element { tag, .. } => {
                        output.push_str(&format!("{indent}[{handle}] <{tag}>\n"))
                    }
                    MemoryKind::Text(text) => {
                        output.push_str(&format!("{indent}[{handle}] {text:?}\n"))
                    }
                }
                for child in &node.children {
                    self.dump_node(output, *child, depth + 1);
                }
            }
            Err(_) => output.push_str(&format!("{indent}[{handle}] (missing)\n")),
        }
    }

    /// Number of slots ever allocated, live or free.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn node(&self, handle: HostHandle) -> Result<&MemoryNode, HostError> {
        self.slots
            .get(handle.index())
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.node.as_ref())
            .ok_or(HostError::Missing { handle })
    }

    fn node_mut(&mut self, handle: HostHandle) -> Result<&mut MemoryNode, HostError> {
        self.slots
            .get_mut(handle.index())
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.node.as_mut())
            .ok_or(HostError::Missing { handle })
    }

    fn kind_mut(&mut self, handle: HostHandle) -> Option<&mut MemoryKind> {
        self.node_mut(handle).ok().map(|node| &mut node.kind)
    }

    fn element_parts(
        &mut self,
        handle: HostHandle,
    ) -> Result<
        (
            &mut IndexMap<String, String>,
            &mut Vec<(String, EventHandler)>,
        ),
        HostError,
    > {
        match &mut self.node_mut(handle)?.kind {
            MemoryKind::Element {
                attributes,
                listeners,
                ..
            } => Ok((attributes, listeners)),
            MemoryKind::Text(_) => Err(HostError::NotAnElement { handle }),
        }
    }

    fn alloc(&mut self, node: MemoryNode) -> HostHandle {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.generation = slot.generation.wrapping_add(1);
                slot.node = Some(node);
                HostHandle::with_generation(index, slot.generation)
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                HostHandle::new(self.slots.len() - 1)
            }
        }
    }

    fn detach(&mut self, child: HostHandle) {
        let parent = self
            .node_mut(child)
            .ok()
            .and_then(|node| node.parent.take());
        if let Some(parent) = parent {
            if let Ok(parent) = self.node_mut(parent) {
                parent.children.retain(|existing| *existing != child);
            }
        }
    }

    /// Links an already validated, detached child under `parent`.
    fn link(&mut self, parent: HostHandle, child: HostHandle, index: Option<usize>) {
        if let Ok(node) = self.node_mut(parent) {
            match index {
                Some(index) => node.children.insert(index, child),
                None => node.children.push(child),
            }
        }
        if let Ok(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
    }

    fn release(&mut self, handle: HostHandle) {
        let Some(node) = self
            .slots
            .get_mut(handle.index())
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.node.take())
        else {
            return;
        };
        self.free.push(handle.index());
        for child in node.children {
            self.release(child);
        }
    }

    fn release_children(&mut self, handle: HostHandle) -> Result<(), HostError> {
        let children = std::mem::take(&mut self.node_mut(handle)?.children);
        for child in children {
            self.release(child);
        }
        Ok(())
    }

    fn is_ancestor(&self, candidate: HostHandle, of: HostHandle) -> bool {
        let mut current = Some(of);
        while let Some(handle) = current {
            if handle == candidate {
                return true;
            }
            current = self.node(handle).ok().and_then(|node| node.parent);
        }
        false
    }

    fn validate_insert(&self, parent: HostHandle, child: HostHandle) -> Result<(), HostError> {
        if let MemoryKind::Text(_) = self.node(parent)?.kind {
            return Err(HostError::NotAnElement { handle: parent });
        }
        self.node(child)?;
        if self.is_ancestor(child, parent) {
            return Err(HostError::NotAChild { parent, child });
        }
        Ok(())
    }
}

impl HostRenderer for MemoryHost {
    fn create_element(&mut self, tag: &str) -> HostHandle {
        self.alloc(MemoryNode::element(tag))
    }

    fn create_text(&mut self, text: &str) -> HostHandle {
        self.alloc(MemoryNode::text(text))
    }

    fn set_attribute(&mut self, node: HostHandle, key: &str, value: &str) -> Result<(), HostError> {
        let (attributes, _) = self.element_parts(node)?;
        attributes.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_attribute(&mut self, node: HostHandle, key: &str) -> Result<(), HostError> {
        let (attributes, _) = self.element_parts(node)?;
        attributes.shift_remove(key);
        Ok(())
    }

    fn add_event_listener(
        &mut self,
        node: HostHandle,
        event: &str,
        handler: EventHandler,
    ) -> Result<(), HostError> {
        let (_, listeners) = self.element_parts(node)?;
        if !listeners
            .iter()
            .any(|(name, existing)| name == event && *existing == handler)
        {
            listeners.push((event.to_owned(), handler));
        }
        Ok(())
    }

    fn remove_event_listener(
        &mut self,
        node: HostHandle,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), HostError> {
        let (_, listeners) = self.element_parts(node)?;
        listeners.retain(|(name, existing)| !(name == event && existing == handler));
        Ok(())
    }

    fn set_text_content(&mut self, node: HostHandle, text: &str) -> Result<(), HostError> {
        if let MemoryKind::Text(current) = &mut self.node_mut(node)?.kind {
            *current = text.to_owned();
            return Ok(());
        }
        self.release_children(node)?;
        if !text.is_empty() {
            let text_node = self.create_text(text);
            self.link(node, text_node, None);
        }
        Ok(())
    }

    fn append_child(&mut self, parent: HostHandle, child: HostHandle) -> Result<(), HostError> {
        self.insert_before(parent, child, None)
    }

    fn insert_before(
        &mut self,
        parent: HostHandle,
        child: HostHandle,
        reference: Option<HostHandle>,
    ) -> Result<(), HostError> {
        self.validate_insert(parent, child)?;
        if reference == Some(child) {
            return Ok(());
        }
        if let Some(reference) = reference {
            if self.node(reference)?.parent != Some(parent) {
                return Err(HostError::NotAChild {
                    parent,
                    child: reference,
                });
            }
        }
        self.detach(child);
        let index = match reference {
            Some(reference) => self
                .node(parent)?
                .children
                .iter()
                .position(|existing| *existing == reference),
            None => None,
        };
        self.link(parent, child, index);
        Ok(())
    }

    fn remove_child(&mut self, parent: HostHandle, child: HostHandle) -> Result<(), HostError> {
        if self.node(child)?.parent != Some(parent) {
            return Err(HostError::NotAChild { parent, child });
        }
        self.detach(child);
        self.release(child);
        Ok(())
    }

    fn parent(&self, node: HostHandle) -> Option<HostHandle> {
        self.node(node).ok()?.parent
    }

    fn next_sibling(&self, node: HostHandle) -> Option<HostHandle> {
        let parent = self.parent(node)?;
        let siblings = &self.node(parent).ok()?.children;
        let index = siblings.iter().position(|existing| *existing == node)?;
        siblings.get(index + 1).copied()
    }

    /// `#id` matches the `id` attribute, anything else matches a tag name.
    /// The first match in document order wins.
    fn resolve_container(&self, selector: &str) -> Result<HostHandle, HostError> {
        let matches = |node: &MemoryNode| match (&node.kind, selector.strip_prefix('#')) {
            (MemoryKind::Element { attributes, .. }, Some(id)) => {
                attributes.get("id").map(String::as_str) == Some(id)
            }
            (MemoryKind::Element { tag, .. }, None) => tag == selector,
            (MemoryKind::Text(_), _) => false,
        };
        let mut stack = vec![self.root];
        while let Some(handle) = stack.pop() {
            let Ok(node) = self.node(handle) else {
                continue;
            };
            if matches(node) {
                return Ok(handle);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        Err(HostError::ContainerNotFound {
            selector: selector.to_owned(),
        })
    }
}

impl EventSource for MemoryHost {
    fn listeners(&self, node: HostHandle, event: &str) -> Vec<EventHandler> {
        match self.node(node).map(|node| &node.kind) {
            Ok(MemoryKind::Element { listeners, .. }) => listeners
                .iter()
                .filter(|(name, _)| name == event)
                .map(|(_, handler)| handler.clone())
                .collect(),
            _ => Vec::new(),
        }
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
