use crate::component::ComponentType;
use crate::props::{PropValue, Props, CHILDREN};
use std::fmt;
use std::rc::Rc;

/// Type tag of an element: a host primitive or a composite component definition
#[derive(Debug, Clone, PartialEq)]
pub enum ElementType {
    /// Primitive render-target kind, e.g. `"div"`
    Host(String),
    /// User-defined component, compared by definition identity
    Composite(ComponentType),
}

impl ElementType {
    pub fn name(&self) -> &str {
        match self {
            ElementType::Host(tag) => tag,
            ElementType::Composite(component) => component.name(),
        }
    }
}

impl From<&str> for ElementType {
    fn from(tag: &str) -> Self {
        ElementType::Host(tag.to_string())
    }
}

impl From<String> for ElementType {
    fn from(tag: String) -> Self {
        ElementType::Host(tag)
    }
}

impl From<ComponentType> for ElementType {
    fn from(component: ComponentType) -> Self {
        ElementType::Composite(component)
    }
}

impl From<&ComponentType> for ElementType {
    fn from(component: &ComponentType) -> Self {
        ElementType::Composite(component.clone())
    }
}

struct ElementData {
    ty: ElementType,
    props: Props,
}

/// Immutable description of the desired UI at one tree position.
///
/// Cloning an element is cheap and yields the *same* element: clones are
/// reference-identical under [`Element::ptr_eq`]. Two separately constructed
/// elements are never identical, even when their contents are equal.
#[derive(Clone)]
pub struct Element {
    data: Rc<ElementData>,
}

impl Element {
    pub fn new(ty: impl Into<ElementType>, props: Props) -> Self {
        Self {
            data: Rc::new(ElementData {
                ty: ty.into(),
                props,
            }),
        }
    }

    pub fn ty(&self) -> &ElementType {
        &self.data.ty
    }

    pub fn props(&self) -> &Props {
        &self.data.props
    }

    pub fn display_name(&self) -> &str {
        self.data.ty.name()
    }

    /// Host tag, or `None` for composite elements
    pub fn tag(&self) -> Option<&str> {
        match &self.data.ty {
            ElementType::Host(tag) => Some(tag),
            ElementType::Composite(_) => None,
        }
    }

    pub fn is_host(&self) -> bool {
        matches!(self.data.ty, ElementType::Host(_))
    }

    /// Reference identity
    pub fn ptr_eq(&self, other: &Element) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    pub fn same_type(&self, other: &Element) -> bool {
        self.data.ty == other.data.ty
    }
}

/// Elements compare by reference identity, never by contents
impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("type", &self.data.ty)
            .field("props", &self.data.props)
            .finish()
    }
}

/// Build an element from a type tag, an optional raw property bag and the
/// trailing child arguments.
///
/// The props are a shallow copy of `config`. With one child argument
/// `children` is that value verbatim; with several it is the ordered list of
/// all of them. With none, `children` is left as `config` had it.
pub fn create_element(
    ty: impl Into<ElementType>,
    config: Option<&Props>,
    children: Vec<PropValue>,
) -> Element {
    let mut props = config.cloned().unwrap_or_default();

    let mut children = children;
    match children.len() {
        0 => {}
        1 => {
            if let Some(child) = children.pop() {
                props.insert(CHILDREN, child);
            }
        }
        _ => props.insert(CHILDREN, PropValue::List(children)),
    }

    Element::new(ty, props)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::Children;

    #[test]
    fn test_no_children_arguments() {
        let element = create_element("div", Some(&Props::new().with("id", "x")), vec![]);
        assert!(!element.props().contains_key(CHILDREN));
        assert_eq!(element.props().get_str("id"), Some("x"));
    }

    #[test]
    fn test_single_child_is_kept_verbatim() {
        let element = create_element("div", None, vec!["hello".into()]);
        assert_eq!(
            element.props().get(CHILDREN),
            Some(&PropValue::Text("hello".to_string()))
        );
    }

    #[test]
    fn test_multiple_children_become_a_list() {
        let a = create_element("span", None, vec![]);
        let b = create_element("em", None, vec![]);
        let element = create_element("p", None, vec![a.clone().into(), b.clone().into()]);

        match element.props().children().unwrap() {
            Children::Elements(children) => {
                assert_eq!(children.len(), 2);
                assert!(children[0].ptr_eq(&a));
                assert!(children[1].ptr_eq(&b));
            }
            other => panic!("Expected element children, got {:?}", other),
        }
    }

    #[test]
    fn test_config_is_copied_not_shared() {
        let config = Props::new().with("className", "a");
        let element = create_element("div", Some(&config), vec!["x".into()]);

        assert!(!config.contains_key(CHILDREN));
        assert_eq!(element.props().get_str("className"), Some("a"));
    }

    #[test]
    fn test_clones_are_identical_but_equal_elements_are_not() {
        let a = create_element("div", None, vec![]);
        let b = create_element("div", None, vec![]);

        assert!(a.ptr_eq(&a.clone()));
        assert!(!a.ptr_eq(&b));
        assert!(a.same_type(&b));
    }
}
