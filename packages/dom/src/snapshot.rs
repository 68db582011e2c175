use crate::dom::{MemoryDom, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Detached, serializable copy of a subtree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DomSnapshot {
    Element {
        tag: String,
        #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
        attributes: BTreeMap<String, String>,
        #[serde(rename = "className", skip_serializing_if = "Option::is_none", default)]
        class_name: Option<String>,
        #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
        styles: BTreeMap<String, String>,
        /// Event types with a registered handler
        #[serde(skip_serializing_if = "Vec::is_empty", default)]
        listeners: Vec<String>,
        #[serde(skip_serializing_if = "Vec::is_empty", default)]
        children: Vec<DomSnapshot>,
    },
    Text {
        content: String,
    },
}

impl DomSnapshot {
    pub fn text(content: impl Into<String>) -> Self {
        DomSnapshot::Text {
            content: content.into(),
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            DomSnapshot::Element { tag, .. } => Some(tag),
            DomSnapshot::Text { .. } => None,
        }
    }

    pub fn children(&self) -> &[DomSnapshot] {
        match self {
            DomSnapshot::Element { children, .. } => children,
            DomSnapshot::Text { .. } => &[],
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl MemoryDom {
    /// Capture `id` and its descendants. Text content becomes a single text
    /// child.
    pub fn snapshot(&self, id: NodeId) -> Option<DomSnapshot> {
        let node = self.node(id)?;

        let mut children = Vec::new();
        if let Some(text) = &node.text {
            children.push(DomSnapshot::text(text.clone()));
        }
        for child in &node.children {
            if let Some(snapshot) = self.snapshot(*child) {
                children.push(snapshot);
            }
        }

        Some(DomSnapshot::Element {
            tag: node.tag.clone(),
            attributes: node.attributes.clone(),
            class_name: node.class_name.clone(),
            styles: node.styles.clone(),
            listeners: node.listener_types(),
            children,
        })
    }
}
