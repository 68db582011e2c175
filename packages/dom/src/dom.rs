use crate::config::DomConfig;
use crate::tags::is_html_tag;
use arbor_common::{Event, EventHandler, HostRenderer, PropValue, ReconcileError, ReconcileResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{error, trace};

/// Tag given to nodes made by [`MemoryDom::create_container`]
pub const CONTAINER_TAG: &str = "#container";

/// Handle of a node in a [`MemoryDom`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// State of one node
#[derive(Debug, Clone)]
pub struct NodeData {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub class_name: Option<String>,
    pub styles: BTreeMap<String, String>,
    pub text: Option<String>,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    pub released: bool,
    listeners: BTreeMap<String, EventHandler>,
}

impl NodeData {
    fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            class_name: None,
            styles: BTreeMap::new(),
            text: None,
            children: Vec::new(),
            parent: None,
            released: false,
            listeners: BTreeMap::new(),
        }
    }

    pub fn is_container(&self) -> bool {
        self.tag == CONTAINER_TAG
    }

    /// Registered event types, sorted
    pub fn listener_types(&self) -> Vec<String> {
        self.listeners.keys().cloned().collect()
    }
}

/// A host operation, recorded in call order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DomOp {
    Create { node: NodeId, tag: String },
    SetProperty { node: NodeId, name: String },
    RemoveProperty { node: NodeId, name: String },
    AppendChild { parent: NodeId, child: NodeId },
    RemoveChild { parent: NodeId, child: NodeId },
    RemoveAllChildren { node: NodeId },
    Replace { old: NodeId, new: NodeId },
    SetText { node: NodeId, text: String },
    Release { node: NodeId },
}

/// In-memory render target.
///
/// Nodes live in an arena and are never freed, so ids stay valid (and
/// inspectable) after a node is detached or released. Every host operation is
/// appended to an operation log.
#[derive(Default)]
pub struct MemoryDom {
    nodes: Vec<NodeData>,
    ops: Vec<DomOp>,
    config: DomConfig,
}

impl MemoryDom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DomConfig) -> Self {
        Self {
            nodes: Vec::new(),
            ops: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &DomConfig {
        &self.config
    }

    /// A node to render into. Containers are not recorded in the op log.
    pub fn create_container(&mut self) -> NodeId {
        self.alloc(NodeData::new(CONTAINER_TAG))
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(data);
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0)
    }

    fn data(&self, id: NodeId) -> ReconcileResult<&NodeData> {
        self.nodes
            .get(id.0)
            .ok_or_else(|| ReconcileError::host(format!("unknown node {}", id)))
    }

    fn data_mut(&mut self, id: NodeId) -> ReconcileResult<&mut NodeData> {
        self.nodes
            .get_mut(id.0)
            .ok_or_else(|| ReconcileError::host(format!("unknown node {}", id)))
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(|node| node.tag.as_str())
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id)?.attributes.get(name).map(String::as_str)
    }

    pub fn class_name(&self, id: NodeId) -> Option<&str> {
        self.node(id)?.class_name.as_deref()
    }

    pub fn style(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id)?.styles.get(name).map(String::as_str)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|node| node.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    pub fn is_released(&self, id: NodeId) -> bool {
        self.node(id).map(|node| node.released).unwrap_or(false)
    }

    pub fn has_listener(&self, id: NodeId, event_type: &str) -> bool {
        self.node(id)
            .map(|node| node.listeners.contains_key(event_type))
            .unwrap_or(false)
    }

    /// Concatenated text of the node and its descendants
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        if let Some(node) = self.node(id) {
            if let Some(text) = &node.text {
                out.push_str(text);
            }
            for child in &node.children {
                self.collect_text(*child, out);
            }
        }
    }

    /// Nodes created through `create_node` and not yet released
    pub fn live_node_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| !node.is_container() && !node.released)
            .count()
    }

    /// Invoke the handler registered for `event.event_type` on `id`.
    /// Returns whether a handler ran.
    pub fn dispatch_event(&self, id: NodeId, event: &Event) -> bool {
        let handler = self
            .node(id)
            .and_then(|node| node.listeners.get(&event.event_type))
            .cloned();

        match handler {
            Some(handler) => {
                trace!(node = %id, event = %event.event_type, "Dispatching event");
                handler.call(event);
                true
            }
            None => false,
        }
    }

    pub fn ops(&self) -> &[DomOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<DomOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    fn detach(&mut self, child: NodeId) -> ReconcileResult<()> {
        if let Some(parent) = self.data(child)?.parent {
            self.data_mut(parent)?.children.retain(|c| *c != child);
            self.data_mut(child)?.parent = None;
        }
        Ok(())
    }

    fn detach_all_children(&mut self, id: NodeId) -> ReconcileResult<()> {
        let children = std::mem::take(&mut self.data_mut(id)?.children);
        for child in children {
            self.data_mut(child)?.parent = None;
        }
        Ok(())
    }
}

impl HostRenderer for MemoryDom {
    type Node = NodeId;

    fn create_node(&mut self, tag: &str) -> ReconcileResult<NodeId> {
        if self.config.strict_tags && !is_html_tag(tag) {
            error!(tag, "Unknown host type");
            return Err(ReconcileError::UnknownHostType {
                tag: tag.to_string(),
            });
        }

        let id = self.alloc(NodeData::new(tag));
        self.ops.push(DomOp::Create {
            node: id,
            tag: tag.to_string(),
        });
        Ok(id)
    }

    fn set_property(&mut self, node: &NodeId, name: &str, value: &PropValue) -> ReconcileResult<()> {
        let event_type = self.config.event_type(name);
        let is_class = name == self.config.class_property;
        let is_style = name == self.config.style_property;
        let data = self.data_mut(*node)?;

        if let Some(event_type) = event_type {
            match value {
                PropValue::Handler(handler) => {
                    data.listeners.insert(event_type, handler.clone());
                }
                PropValue::Null => {
                    data.listeners.remove(&event_type);
                }
                other => {
                    return Err(ReconcileError::host(format!(
                        "event property '{}' expects a handler, got {:?}",
                        name, other
                    )))
                }
            }
        } else if is_class {
            data.class_name = match value {
                PropValue::Null => None,
                other => Some(other.to_text()),
            };
        } else if is_style {
            match value {
                PropValue::Style(styles) => {
                    for (key, value) in styles {
                        data.styles.insert(key.clone(), value.clone());
                    }
                }
                PropValue::Null => data.styles.clear(),
                other => {
                    return Err(ReconcileError::host(format!(
                        "style property expects a style map, got {:?}",
                        other
                    )))
                }
            }
        } else {
            data.attributes.insert(name.to_string(), value.to_text());
        }

        self.ops.push(DomOp::SetProperty {
            node: *node,
            name: name.to_string(),
        });
        Ok(())
    }

    fn remove_property(&mut self, node: &NodeId, name: &str) -> ReconcileResult<()> {
        let event_type = self.config.event_type(name);
        let is_class = name == self.config.class_property;
        let is_style = name == self.config.style_property;
        let data = self.data_mut(*node)?;

        if let Some(event_type) = event_type {
            data.listeners.remove(&event_type);
        } else if is_class {
            data.class_name = None;
        } else if is_style {
            data.styles.clear();
        } else {
            data.attributes.remove(name);
        }

        self.ops.push(DomOp::RemoveProperty {
            node: *node,
            name: name.to_string(),
        });
        Ok(())
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> ReconcileResult<()> {
        self.data(*parent)?;
        self.detach(*child)?;
        self.data_mut(*parent)?.children.push(*child);
        self.data_mut(*child)?.parent = Some(*parent);

        self.ops.push(DomOp::AppendChild {
            parent: *parent,
            child: *child,
        });
        Ok(())
    }

    fn remove_child(&mut self, parent: &NodeId, child: &NodeId) -> ReconcileResult<()> {
        if self.data(*child)?.parent != Some(*parent) {
            return Err(ReconcileError::host(format!(
                "{} is not a child of {}",
                child, parent
            )));
        }
        self.detach(*child)?;

        self.ops.push(DomOp::RemoveChild {
            parent: *parent,
            child: *child,
        });
        Ok(())
    }

    fn remove_all_children(&mut self, node: &NodeId) -> ReconcileResult<()> {
        self.detach_all_children(*node)?;
        self.data_mut(*node)?.text = None;

        self.ops.push(DomOp::RemoveAllChildren { node: *node });
        Ok(())
    }

    fn replace_node(&mut self, old_node: &NodeId, new_node: &NodeId) -> ReconcileResult<()> {
        let parent = self
            .data(*old_node)?
            .parent
            .ok_or_else(|| ReconcileError::host(format!("{} has no parent", old_node)))?;

        self.detach(*new_node)?;
        let siblings = &mut self.data_mut(parent)?.children;
        let position = siblings
            .iter()
            .position(|c| c == old_node)
            .ok_or_else(|| ReconcileError::host(format!("{} missing from its parent", old_node)))?;
        siblings[position] = *new_node;

        self.data_mut(*new_node)?.parent = Some(parent);
        self.data_mut(*old_node)?.parent = None;

        self.ops.push(DomOp::Replace {
            old: *old_node,
            new: *new_node,
        });
        Ok(())
    }

    fn set_text_content(&mut self, node: &NodeId, text: &str) -> ReconcileResult<()> {
        self.detach_all_children(*node)?;
        self.data_mut(*node)?.text = Some(text.to_string());

        self.ops.push(DomOp::SetText {
            node: *node,
            text: text.to_string(),
        });
        Ok(())
    }

    fn release_node(&mut self, node: &NodeId) -> ReconcileResult<()> {
        let data = self.data_mut(*node)?;
        data.listeners.clear();
        data.released = true;

        self.ops.push(DomOp::Release { node: *node });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_unknown_tag_is_rejected_in_strict_mode() {
        let mut dom = MemoryDom::new();
        match dom.create_node("widget") {
            Err(ReconcileError::UnknownHostType { tag }) => assert_eq!(tag, "widget"),
            other => panic!("Expected UnknownHostType, got {:?}", other),
        }

        let mut lenient = MemoryDom::with_config(DomConfig {
            strict_tags: false,
            ..DomConfig::default()
        });
        assert!(lenient.create_node("widget").is_ok());
    }

    #[test]
    fn test_style_is_merged_not_replaced() {
        let mut dom = MemoryDom::new();
        let node = dom.create_node("div").unwrap();

        let first: BTreeMap<String, String> =
            [("color".to_string(), "red".to_string())].into_iter().collect();
        let second: BTreeMap<String, String> =
            [("margin".to_string(), "0".to_string())].into_iter().collect();

        dom.set_property(&node, "style", &PropValue::Style(first)).unwrap();
        dom.set_property(&node, "style", &PropValue::Style(second)).unwrap();

        assert_eq!(dom.style(node, "color"), Some("red"));
        assert_eq!(dom.style(node, "margin"), Some("0"));
    }

    #[test]
    fn test_event_properties_register_handlers() {
        let mut dom = MemoryDom::new();
        let node = dom.create_node("button").unwrap();
        let clicks = Rc::new(Cell::new(0));

        let counter = clicks.clone();
        let handler = EventHandler::new(move |_| counter.set(counter.get() + 1));
        dom.set_property(&node, "onClick", &PropValue::Handler(handler)).unwrap();

        assert!(dom.has_listener(node, "click"));
        assert!(dom.attribute(node, "onClick").is_none());
        assert!(dom.dispatch_event(node, &Event::new("click")));
        assert_eq!(clicks.get(), 1);

        dom.remove_property(&node, "onClick").unwrap();
        assert!(!dom.dispatch_event(node, &Event::new("click")));
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn test_event_property_requires_handler() {
        let mut dom = MemoryDom::new();
        let node = dom.create_node("button").unwrap();
        let result = dom.set_property(&node, "onClick", &PropValue::Text("alert()".into()));
        assert!(matches!(result, Err(ReconcileError::Host { .. })));
    }

    #[test]
    fn test_class_and_attributes() {
        let mut dom = MemoryDom::new();
        let node = dom.create_node("div").unwrap();

        dom.set_property(&node, "className", &"a".into()).unwrap();
        dom.set_property(&node, "id", &"main".into()).unwrap();
        assert_eq!(dom.class_name(node), Some("a"));
        assert_eq!(dom.attribute(node, "id"), Some("main"));
        assert!(dom.attribute(node, "className").is_none());

        dom.remove_property(&node, "className").unwrap();
        dom.remove_property(&node, "id").unwrap();
        assert_eq!(dom.class_name(node), None);
        assert_eq!(dom.attribute(node, "id"), None);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut dom = MemoryDom::new();
        let parent = dom.create_node("ul").unwrap();
        let a = dom.create_node("li").unwrap();
        let b = dom.create_node("li").unwrap();
        let c = dom.create_node("li").unwrap();
        dom.append_children(&parent, &[a, b]).unwrap();

        dom.replace_node(&a, &c).unwrap();

        assert_eq!(dom.children(parent), &[c, b]);
        assert_eq!(dom.parent(a), None);
        assert_eq!(dom.parent(c), Some(parent));
    }

    #[test]
    fn test_replace_detached_node_fails() {
        let mut dom = MemoryDom::new();
        let a = dom.create_node("p").unwrap();
        let b = dom.create_node("p").unwrap();
        assert!(dom.replace_node(&a, &b).is_err());
    }

    #[test]
    fn test_text_content_replaces_children() {
        let mut dom = MemoryDom::new();
        let parent = dom.create_node("div").unwrap();
        let child = dom.create_node("span").unwrap();
        dom.append_child(&parent, &child).unwrap();

        dom.set_text_content(&parent, "hello").unwrap();

        assert!(dom.children(parent).is_empty());
        assert_eq!(dom.parent(child), None);
        assert_eq!(dom.text_content(parent), "hello");
    }

    #[test]
    fn test_release_detaches_listeners() {
        let mut dom = MemoryDom::new();
        let node = dom.create_node("button").unwrap();
        dom.set_property(&node, "onClick", &PropValue::Handler(EventHandler::new(|_| {})))
            .unwrap();

        assert_eq!(dom.live_node_count(), 1);
        dom.release_node(&node).unwrap();

        assert!(dom.is_released(node));
        assert!(!dom.has_listener(node, "click"));
        assert_eq!(dom.live_node_count(), 0);
    }
}
