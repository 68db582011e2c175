use crate::element::Element;
use crate::error::ReconcileError;
use crate::result::ReconcileResult;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Name of the prop that carries nested children.
pub const CHILDREN: &str = "children";

/// Event delivered to a registered handler
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub event_type: String,
    pub payload: PropValue,
}

impl Event {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            payload: PropValue::Null,
        }
    }

    pub fn with_payload(mut self, payload: impl Into<PropValue>) -> Self {
        self.payload = payload.into();
        self
    }
}

/// Shared event callback. Two handlers are equal only if they are the same
/// closure allocation.
#[derive(Clone)]
pub struct EventHandler(Rc<dyn Fn(&Event)>);

impl EventHandler {
    pub fn new(callback: impl Fn(&Event) + 'static) -> Self {
        Self(Rc::new(callback))
    }

    pub fn call(&self, event: &Event) {
        (self.0)(event)
    }

    pub fn ptr_eq(&self, other: &EventHandler) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventHandler({:p})", Rc::as_ptr(&self.0))
    }
}

/// A single prop value
#[derive(Debug, Clone)]
pub enum PropValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// Style declarations, merged onto the node's existing style
    Style(BTreeMap<String, String>),
    Handler(EventHandler),
    Element(Element),
    List(Vec<PropValue>),
}

impl PropValue {
    /// String form used for attribute assignment and text content
    pub fn to_text(&self) -> String {
        match self {
            PropValue::Null => String::new(),
            PropValue::Bool(b) => b.to_string(),
            PropValue::Number(n) => n.to_string(),
            PropValue::Text(s) => s.clone(),
            PropValue::Style(styles) => styles
                .iter()
                .map(|(k, v)| format!("{}: {}", k, v))
                .collect::<Vec<_>>()
                .join("; "),
            PropValue::Handler(_) => "[handler]".to_string(),
            PropValue::Element(element) => format!("[element {}]", element.display_name()),
            PropValue::List(items) => items
                .iter()
                .map(PropValue::to_text)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            PropValue::Element(element) => Some(element),
            _ => None,
        }
    }

    /// True for text and numbers, the values rendered as text content
    pub fn is_primitive_text(&self) -> bool {
        matches!(self, PropValue::Text(_) | PropValue::Number(_))
    }
}

// Elements and handlers compare by identity; everything else by value.
impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropValue::Null, PropValue::Null) => true,
            (PropValue::Bool(a), PropValue::Bool(b)) => a == b,
            (PropValue::Number(a), PropValue::Number(b)) => a == b,
            (PropValue::Text(a), PropValue::Text(b)) => a == b,
            (PropValue::Style(a), PropValue::Style(b)) => a == b,
            (PropValue::Handler(a), PropValue::Handler(b)) => a.ptr_eq(b),
            (PropValue::Element(a), PropValue::Element(b)) => a.ptr_eq(b),
            (PropValue::List(a), PropValue::List(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Text(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Text(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Number(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        PropValue::Number(value as f64)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        PropValue::Number(value as f64)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<Element> for PropValue {
    fn from(value: Element) -> Self {
        PropValue::Element(value)
    }
}

impl From<&Element> for PropValue {
    fn from(value: &Element) -> Self {
        PropValue::Element(value.clone())
    }
}

impl From<Vec<Element>> for PropValue {
    fn from(value: Vec<Element>) -> Self {
        PropValue::List(value.into_iter().map(PropValue::Element).collect())
    }
}

impl From<EventHandler> for PropValue {
    fn from(value: EventHandler) -> Self {
        PropValue::Handler(value)
    }
}

impl From<BTreeMap<String, String>> for PropValue {
    fn from(value: BTreeMap<String, String>) -> Self {
        PropValue::Style(value)
    }
}

/// Property bag of an element. Also used as component state.
///
/// Keys iterate in sorted order so property application is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
    entries: BTreeMap<String, PropValue>,
}

/// Component state shares the property bag representation
pub type State = Props;

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<PropValue> {
        self.entries.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.entries.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(PropValue::as_str)
    }

    pub fn get_number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(PropValue::as_number)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Every entry except `children`
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.iter().filter(|(k, _)| *k != CHILDREN)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Shallow merge: entries from `other` win on key collisions
    pub fn merge(&mut self, other: &Props) {
        for (key, value) in &other.entries {
            self.entries.insert(key.clone(), value.clone());
        }
    }

    pub fn merged(&self, other: &Props) -> Props {
        let mut merged = self.clone();
        merged.merge(other);
        merged
    }

    pub fn children(&self) -> ReconcileResult<Children<'_>> {
        match self.get(CHILDREN) {
            Some(value) => Children::from_value(value),
            None => Ok(Children::None),
        }
    }
}

impl<K: Into<String>, V: Into<PropValue>> FromIterator<(K, V)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Interpretation of a `children` prop
#[derive(Debug, Clone, PartialEq)]
pub enum Children<'a> {
    None,
    /// Literal text set directly as the node's text content
    Text(String),
    /// Nested elements, matched by position across updates
    Elements(Vec<&'a Element>),
}

impl<'a> Children<'a> {
    pub fn from_value(value: &'a PropValue) -> ReconcileResult<Self> {
        match value {
            PropValue::Null | PropValue::Bool(_) => Ok(Children::None),
            PropValue::Text(_) | PropValue::Number(_) => Ok(Children::Text(value.to_text())),
            PropValue::Element(element) => Ok(Children::Elements(vec![element])),
            PropValue::List(items) => {
                let mut elements = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    match item {
                        PropValue::Element(element) => elements.push(element),
                        other => {
                            return Err(ReconcileError::invalid_element(format!(
                                "children[{}] is not an element: {:?}",
                                index, other
                            )))
                        }
                    }
                }
                Ok(Children::Elements(elements))
            }
            PropValue::Style(_) | PropValue::Handler(_) => Err(ReconcileError::invalid_element(
                format!("children cannot be {:?}", value),
            )),
        }
    }

    pub fn elements(&self) -> &[&'a Element] {
        match self {
            Children::Elements(elements) => elements,
            _ => &[],
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Children::Text(_))
    }
}
