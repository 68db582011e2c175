use crate::instance::Instance;
use crate::reconciler::{
    mount_component, receive_component, replace_instance, should_update_component,
    unmount_component,
};
use arbor_common::{
    Component, ComponentType, Element, HostRenderer, Props, ReconcileError, ReconcileResult, State,
};
use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::Rc;
use tracing::{debug, warn};

/// Lifecycle of a composite instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Constructed, not yet mounted
    Unmounted,
    Mounted,
    /// Inside an update pass
    Updating,
    /// Torn down; terminal
    Destroyed,
}

/// Instance backing a user-defined component
pub struct CompositeInstance<N> {
    current_element: Element,
    component: Box<dyn Component>,
    state: State,
    /// Next state staged by `set_state`, flushed by the following update
    pending_state: Option<State>,
    rendered: Option<Box<Instance<N>>>,
    /// Shared with every handle so it stays readable mid-pass
    lifecycle: Rc<Cell<Lifecycle>>,
}

impl<N: Clone> CompositeInstance<N> {
    fn new(component_type: &ComponentType, element: Element, lifecycle: Rc<Cell<Lifecycle>>) -> Self {
        let component = component_type.instantiate(element.props());
        let state = component.initial_state(element.props());

        Self {
            current_element: element,
            component,
            state,
            pending_state: None,
            rendered: None,
            lifecycle,
        }
    }

    fn name(&self) -> &str {
        self.current_element.display_name()
    }

    fn mount<R>(&mut self, renderer: &mut R) -> ReconcileResult<N>
    where
        R: HostRenderer<Node = N>,
    {
        let element = self.current_element.clone();
        self.component.will_mount(element.props(), &self.state);

        let rendered_element = self.component.render(element.props(), &self.state);
        debug!(
            component = self.name(),
            rendered = rendered_element.display_name(),
            "Mounting composite"
        );

        let child = mount_component(renderer, &rendered_element)?;
        let node = child.node().ok_or_else(|| {
            ReconcileError::host(format!(
                "'{}' rendered an element that produced no node",
                self.name()
            ))
        })?;

        self.rendered = Some(Box::new(child));
        self.lifecycle.set(Lifecycle::Mounted);
        Ok(node)
    }

    fn update<R>(&mut self, renderer: &mut R, next_element: &Element) -> ReconcileResult<()>
    where
        R: HostRenderer<Node = N>,
    {
        // Same element means the update came from set_state, not a parent render
        if !self.current_element.ptr_eq(next_element) {
            self.component
                .will_receive_props(next_element.props(), &self.state);
        }

        let next_state = self
            .pending_state
            .take()
            .unwrap_or_else(|| self.state.clone());

        let should_update = self.component.should_update(next_element.props(), &next_state);
        if should_update {
            self.component.will_update(next_element.props(), &next_state);
        }

        self.current_element = next_element.clone();
        self.state = next_state;

        if !should_update {
            debug!(component = self.name(), "Update skipped by should_update");
            return Ok(());
        }

        let next_rendered = self
            .component
            .render(self.current_element.props(), &self.state);

        let name = self.current_element.display_name().to_string();
        let rendered = self
            .rendered
            .as_deref_mut()
            .ok_or_else(|| ReconcileError::InstanceUnmounted {
                component: name.clone(),
            })?;

        let prev_rendered = rendered.current_element()?;
        if should_update_component(&prev_rendered, &next_rendered) {
            receive_component(renderer, rendered, &next_rendered)
        } else {
            debug!(
                component = %name,
                from = prev_rendered.display_name(),
                to = next_rendered.display_name(),
                "Rendered type changed, replacing child"
            );
            replace_instance(renderer, rendered, &next_rendered)
        }
    }

    fn unmount<R>(&mut self, renderer: &mut R) -> ReconcileResult<()>
    where
        R: HostRenderer<Node = N>,
    {
        match self.lifecycle.get() {
            Lifecycle::Destroyed => {
                warn!(component = self.name(), "Composite already unmounted");
                return Ok(());
            }
            Lifecycle::Unmounted => {
                self.lifecycle.set(Lifecycle::Destroyed);
                return Ok(());
            }
            Lifecycle::Mounted | Lifecycle::Updating => {}
        }

        debug!(component = self.name(), "Unmounting composite");
        self.component.will_unmount();

        if let Some(mut child) = self.rendered.take() {
            unmount_component(renderer, &mut child)?;
        }

        self.pending_state = None;
        self.state = State::new();
        self.lifecycle.set(Lifecycle::Destroyed);
        Ok(())
    }

    fn stage_state(&mut self, partial: &Props) {
        let base = self
            .pending_state
            .take()
            .unwrap_or_else(|| self.state.clone());
        self.pending_state = Some(base.merged(partial));
    }
}

/// Shared handle to a composite instance.
///
/// The tree owns the instance through one handle; further clones let callers
/// read state and push updates with `set_state`.
///
/// The instance is exclusively borrowed for the whole of a mount, update or
/// unmount. Reads attempted during that window fail with `ReentrantUpdate`
/// instead of panicking; `name` and `lifecycle` are always available.
pub struct CompositeHandle<N> {
    name: Rc<str>,
    lifecycle: Rc<Cell<Lifecycle>>,
    inner: Rc<RefCell<CompositeInstance<N>>>,
}

impl<N> Clone for CompositeHandle<N> {
    fn clone(&self) -> Self {
        Self {
            name: Rc::clone(&self.name),
            lifecycle: Rc::clone(&self.lifecycle),
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<N> CompositeHandle<N> {
    /// Component name; readable even while the instance is mid-update
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ptr_eq(&self, other: &CompositeHandle<N>) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle.get()
    }

    pub fn is_mounted(&self) -> bool {
        matches!(self.lifecycle(), Lifecycle::Mounted | Lifecycle::Updating)
    }
}

impl<N: Clone> CompositeHandle<N> {
    pub(crate) fn new(component_type: &ComponentType, element: Element) -> Self {
        let lifecycle = Rc::new(Cell::new(Lifecycle::Unmounted));
        let instance = CompositeInstance::new(component_type, element, Rc::clone(&lifecycle));

        Self {
            name: Rc::from(component_type.name()),
            lifecycle,
            inner: Rc::new(RefCell::new(instance)),
        }
    }

    fn borrow(&self) -> ReconcileResult<Ref<'_, CompositeInstance<N>>> {
        self.inner
            .try_borrow()
            .map_err(|_| ReconcileError::ReentrantUpdate {
                component: self.name().to_string(),
            })
    }

    fn borrow_mut(&self) -> ReconcileResult<RefMut<'_, CompositeInstance<N>>> {
        self.inner
            .try_borrow_mut()
            .map_err(|_| ReconcileError::ReentrantUpdate {
                component: self.name().to_string(),
            })
    }

    pub fn current_element(&self) -> ReconcileResult<Element> {
        Ok(self.borrow()?.current_element.clone())
    }

    pub fn props(&self) -> ReconcileResult<Props> {
        Ok(self.borrow()?.current_element.props().clone())
    }

    pub fn state(&self) -> ReconcileResult<State> {
        Ok(self.borrow()?.state.clone())
    }

    pub fn has_pending_state(&self) -> ReconcileResult<bool> {
        Ok(self.borrow()?.pending_state.is_some())
    }

    /// The rendered host node. `None` when unmounted or while a pass holds
    /// the instance.
    pub fn node(&self) -> Option<N> {
        self.borrow()
            .ok()?
            .rendered
            .as_ref()
            .and_then(|child| child.node())
    }

    pub fn descendant_count(&self) -> ReconcileResult<usize> {
        match self.borrow()?.rendered.as_ref() {
            Some(child) => Ok(1 + child.descendant_count()?),
            None => Ok(0),
        }
    }

    /// Run `f` against the rendered child. `None` when unmounted or while a
    /// pass holds the instance.
    pub fn with_rendered<T>(&self, f: impl FnOnce(&Instance<N>) -> T) -> Option<T> {
        self.borrow().ok()?.rendered.as_deref().map(f)
    }

    pub(crate) fn mount<R>(&self, renderer: &mut R) -> ReconcileResult<N>
    where
        R: HostRenderer<Node = N>,
    {
        self.borrow_mut()?.mount(renderer)
    }

    pub(crate) fn receive<R>(&self, renderer: &mut R, next_element: &Element) -> ReconcileResult<()>
    where
        R: HostRenderer<Node = N>,
    {
        self.update_component(renderer, next_element)
    }

    pub(crate) fn unmount<R>(&self, renderer: &mut R) -> ReconcileResult<()>
    where
        R: HostRenderer<Node = N>,
    {
        self.borrow_mut()?.unmount(renderer)
    }

    /// Stage `partial` merged over the current state and run one full update
    /// pass before returning. Calls are never batched.
    pub fn set_state<R>(&self, renderer: &mut R, partial: &Props) -> ReconcileResult<()>
    where
        R: HostRenderer<Node = N>,
    {
        {
            let mut instance = self.borrow_mut()?;
            let lifecycle = self.lifecycle();
            if lifecycle != Lifecycle::Mounted {
                warn!(component = instance.name(), lifecycle = ?lifecycle, "set_state on inactive component");
                return Err(ReconcileError::InstanceUnmounted {
                    component: instance.name().to_string(),
                });
            }
            instance.stage_state(partial);
        }

        self.perform_update_if_necessary(renderer)
    }

    /// Flush a staged state, if any
    pub fn perform_update_if_necessary<R>(&self, renderer: &mut R) -> ReconcileResult<()>
    where
        R: HostRenderer<Node = N>,
    {
        let element = {
            let instance = self.borrow()?;
            if instance.pending_state.is_none() {
                return Ok(());
            }
            instance.current_element.clone()
        };

        self.update_component(renderer, &element)
    }

    fn update_component<R>(&self, renderer: &mut R, next_element: &Element) -> ReconcileResult<()>
    where
        R: HostRenderer<Node = N>,
    {
        let mut instance = self.borrow_mut()?;
        if self.lifecycle() != Lifecycle::Mounted {
            return Err(ReconcileError::InstanceUnmounted {
                component: instance.name().to_string(),
            });
        }

        self.lifecycle.set(Lifecycle::Updating);
        let result = instance.update(renderer, next_element);
        self.lifecycle.set(Lifecycle::Mounted);
        result
    }
}
