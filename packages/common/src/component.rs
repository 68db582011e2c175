use crate::element::Element;
use crate::error::ReconcileError;
use crate::props::{Props, State};
use crate::result::ReconcileResult;
use std::fmt;
use std::rc::Rc;

/// A user-defined component.
///
/// Only `render` is required. The remaining methods are lifecycle hooks
/// invoked by the composite instance at fixed points of mount and update;
/// their defaults do nothing.
pub trait Component {
    fn render(&self, props: &Props, state: &State) -> Element;

    fn initial_state(&self, _props: &Props) -> State {
        State::new()
    }

    /// Before the first render
    fn will_mount(&mut self, _props: &Props, _state: &State) {}

    /// Parent re-rendered with a new element for this component
    fn will_receive_props(&mut self, _next_props: &Props, _state: &State) {}

    /// Returning `false` stores the next props and state but skips rendering
    fn should_update(&self, _next_props: &Props, _next_state: &State) -> bool {
        true
    }

    fn will_update(&mut self, _next_props: &Props, _next_state: &State) {}

    fn will_unmount(&mut self) {}
}

type Factory = dyn Fn(&Props) -> Box<dyn Component>;
type RenderFn = dyn Fn(&Props, &State) -> Element;

struct ComponentDef {
    name: String,
    factory: Box<Factory>,
}

/// Definition of a composite component.
///
/// Identity is the definition itself: clones of one `ComponentType` are the
/// same type, two separately created definitions never are (even with the
/// same name).
#[derive(Clone)]
pub struct ComponentType {
    def: Rc<ComponentDef>,
}

impl ComponentType {
    pub fn new<C, F>(name: impl Into<String>, factory: F) -> Self
    where
        C: Component + 'static,
        F: Fn(&Props) -> C + 'static,
    {
        Self {
            def: Rc::new(ComponentDef {
                name: name.into(),
                factory: Box::new(move |props| Box::new(factory(props))),
            }),
        }
    }

    /// Closure-based definition; see [`ComponentBuilder`]
    pub fn builder(name: impl Into<String>) -> ComponentBuilder {
        ComponentBuilder {
            name: name.into(),
            initial_state: State::new(),
            render: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    /// Construct a fresh component object for a mount
    pub fn instantiate(&self, props: &Props) -> Box<dyn Component> {
        (self.def.factory)(props)
    }
}

impl PartialEq for ComponentType {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.def, &other.def)
    }
}

impl fmt::Debug for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentType({})", self.def.name)
    }
}

/// Builder for components expressed as a render closure plus initial state
pub struct ComponentBuilder {
    name: String,
    initial_state: State,
    render: Option<Rc<RenderFn>>,
}

impl ComponentBuilder {
    pub fn initial_state(mut self, state: State) -> Self {
        self.initial_state = state;
        self
    }

    pub fn render(mut self, render: impl Fn(&Props, &State) -> Element + 'static) -> Self {
        self.render = Some(Rc::new(render));
        self
    }

    /// Fails with `ComponentContractViolation` when no render function was given
    pub fn build(self) -> ReconcileResult<ComponentType> {
        let render = self
            .render
            .ok_or_else(|| ReconcileError::ComponentContractViolation {
                component: self.name.clone(),
                reason: "render function is missing".to_string(),
            })?;
        let initial_state = self.initial_state;

        Ok(ComponentType::new(self.name, move |_props| FnComponent {
            render: render.clone(),
            initial_state: initial_state.clone(),
        }))
    }
}

struct FnComponent {
    render: Rc<RenderFn>,
    initial_state: State,
}

impl Component for FnComponent {
    fn render(&self, props: &Props, state: &State) -> Element {
        (self.render)(props, state)
    }

    fn initial_state(&self, _props: &Props) -> State {
        self.initial_state.clone()
    }
}
