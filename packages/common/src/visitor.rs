use crate::element::Element;
use crate::props::{PropValue, CHILDREN};

/// Visitor pattern for traversing element trees
///
/// Only the statically known tree is walked: composite elements are visited
/// with their props (including any children passed to them), but nothing a
/// component would render is. Override specific visit_* methods to perform
/// custom actions on nodes.
pub trait Visitor: Sized {
    fn visit_element(&mut self, element: &Element) {
        walk_element(self, element);
    }

    fn visit_prop(&mut self, _name: &str, _value: &PropValue) {
        // Leaf, no children to walk
    }

    fn visit_children(&mut self, children: &PropValue) {
        walk_children(self, children);
    }

    fn visit_text(&mut self, _text: &str) {
        // Leaf, no children to walk
    }
}

pub fn walk_element<V: Visitor>(visitor: &mut V, element: &Element) {
    for (name, value) in element.props().iter() {
        if name == CHILDREN {
            visitor.visit_children(value);
        } else {
            visitor.visit_prop(name, value);
        }
    }
}

pub fn walk_children<V: Visitor>(visitor: &mut V, children: &PropValue) {
    match children {
        PropValue::Element(element) => visitor.visit_element(element),
        PropValue::List(items) => {
            for item in items {
                match item {
                    PropValue::Element(element) => visitor.visit_element(element),
                    other => visitor.visit_children(other),
                }
            }
        }
        PropValue::Text(_) | PropValue::Number(_) => visitor.visit_text(&children.to_text()),
        PropValue::Null
        | PropValue::Bool(_)
        | PropValue::Style(_)
        | PropValue::Handler(_) => {
            // Nothing to descend into
        }
    }
}

/// Counts the elements of a tree, mostly useful for sizing and benches
#[derive(Debug, Default)]
pub struct ElementCounter {
    pub host: usize,
    pub composite: usize,
    pub text: usize,
}

impl ElementCounter {
    pub fn count(element: &Element) -> Self {
        let mut counter = Self::default();
        counter.visit_element(element);
        counter
    }

    pub fn total(&self) -> usize {
        self.host + self.composite
    }
}

impl Visitor for ElementCounter {
    fn visit_element(&mut self, element: &Element) {
        if element.is_host() {
            self.host += 1;
        } else {
            self.composite += 1;
        }
        walk_element(self, element);
    }

    fn visit_text(&mut self, _text: &str) {
        self.text += 1;
    }
}
