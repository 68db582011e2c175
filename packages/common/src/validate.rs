//! Shape checks run before any reconciliation work touches the host tree
use crate::element::{Element, ElementType};
use crate::error::ReconcileError;
use crate::props::{Children, PropValue};
use crate::result::ReconcileResult;
use crate::visitor::{walk_children, walk_element, Visitor};
use tracing::error;

/// Validate an element and every element statically nested in it.
///
/// Rejects empty or whitespace-containing host tags and `children` values that
/// are neither text, an element, nor a list of elements.
pub fn validate_element(element: &Element) -> ReconcileResult<()> {
    let mut validator = ElementValidator::default();
    validator.visit_element(element);

    match validator.error {
        Some(err) => {
            error!(error = %err, element = element.display_name(), "Element validation failed");
            Err(err)
        }
        None => Ok(()),
    }
}

#[derive(Default)]
struct ElementValidator {
    /// First failure; the walk stops recording after it
    error: Option<ReconcileError>,
    path: Vec<String>,
}

impl ElementValidator {
    fn fail(&mut self, reason: String) {
        if self.error.is_none() {
            let location = if self.path.is_empty() {
                "<root>".to_string()
            } else {
                self.path.join(" > ")
            };
            self.error = Some(ReconcileError::invalid_element(format!(
                "{} (at {})",
                reason, location
            )));
        }
    }
}

impl Visitor for ElementValidator {
    fn visit_element(&mut self, element: &Element) {
        if self.error.is_some() {
            return;
        }

        if let ElementType::Host(tag) = element.ty() {
            if tag.is_empty() {
                self.fail("host element has an empty tag".to_string());
                return;
            }
            if tag.chars().any(char::is_whitespace) {
                self.fail(format!("host tag '{}' contains whitespace", tag));
                return;
            }
        }

        self.path.push(element.display_name().to_string());
        walk_element(self, element);
        self.path.pop();
    }

    fn visit_children(&mut self, children: &PropValue) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = Children::from_value(children) {
            self.fail(err.to_string());
            return;
        }
        walk_children(self, children);
    }
}
