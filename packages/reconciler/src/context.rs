use crate::composite::CompositeHandle;
use crate::config::ReconcilerConfig;
use crate::instance::Instance;
use crate::reconciler::{
    mount_component, receive_component, should_update_component, unmount_component,
};
use crate::registry::{RootId, RootRegistry};
use arbor_common::{
    validate_element, Element, HostRenderer, PropValue, Props, ReconcileError, ReconcileResult,
};
use tracing::{debug, info, instrument};

/// A reconciliation context: one host renderer plus the registry of roots
/// mounted through it.
///
/// Contexts are fully independent of each other; nothing is process-global.
pub struct ReconcileContext<R: HostRenderer> {
    renderer: R,
    registry: RootRegistry<R::Node>,
    config: ReconcilerConfig,
}

impl<R: HostRenderer> ReconcileContext<R> {
    pub fn new(renderer: R) -> Self {
        Self::with_config(renderer, ReconcilerConfig::default())
    }

    pub fn with_config(renderer: R, config: ReconcilerConfig) -> Self {
        Self {
            renderer,
            registry: RootRegistry::new(config.first_root_id),
            config,
        }
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    pub fn registry(&self) -> &RootRegistry<R::Node> {
        &self.registry
    }

    pub fn root_id(&self, container: &R::Node) -> Option<RootId> {
        self.registry.root_id(container)
    }

    pub fn root_instance(&self, container: &R::Node) -> Option<&Instance<R::Node>> {
        let id = self.registry.root_id(container)?;
        self.registry.instance(id)
    }

    pub fn root_count(&self) -> usize {
        self.registry.len()
    }

    /// Render `element` into `container`.
    ///
    /// The first call for a container mounts a new tree and registers the
    /// container as a root. Later calls update that tree in place when the
    /// top-level type is unchanged, and rebuild it in the same registry slot
    /// otherwise. The element is validated before anything is mutated.
    #[instrument(skip(self, element, container), fields(element = element.display_name()))]
    pub fn render(&mut self, element: &Element, container: &R::Node) -> ReconcileResult<()> {
        validate_element(element)?;

        match self.registry.root_id(container) {
            Some(id) => self.update_root(id, element, container),
            None => self.mount_root(element, container),
        }
    }

    fn mount_root(&mut self, element: &Element, container: &R::Node) -> ReconcileResult<()> {
        let instance = mount_component(&mut self.renderer, element)?;
        let node = root_node(&instance)?;

        let id = self.registry.allocate_id();
        self.registry.register(container.clone(), id, instance);

        if let Some(attribute) = &self.config.root_attribute {
            self.renderer
                .set_property(container, attribute, &PropValue::Number(id.value() as f64))?;
        }
        self.renderer.remove_all_children(container)?;
        self.renderer.append_child(container, &node)?;

        info!(root = %id, "Mounted root");
        Ok(())
    }

    fn update_root(
        &mut self,
        id: RootId,
        element: &Element,
        container: &R::Node,
    ) -> ReconcileResult<()> {
        let instance = self
            .registry
            .instance_mut(id)
            .ok_or_else(|| ReconcileError::NotARoot {
                container: format!("{:?}", container),
            })?;

        let prev_element = instance.current_element()?;
        if should_update_component(&prev_element, element) {
            debug!(root = %id, "Updating root in place");
            return receive_component(&mut self.renderer, instance, element);
        }

        debug!(
            root = %id,
            from = prev_element.display_name(),
            to = element.display_name(),
            "Root type changed, remounting"
        );
        unmount_component(&mut self.renderer, instance)?;
        self.renderer.remove_all_children(container)?;

        let fresh = mount_component(&mut self.renderer, element)?;
        let node = root_node(&fresh)?;
        *instance = fresh;
        self.renderer.append_child(container, &node)?;

        info!(root = %id, "Remounted root");
        Ok(())
    }

    /// Unmount the tree rendered into `container`, empty the container and
    /// forget it as a root.
    #[instrument(skip(self, container))]
    pub fn unmount_root(&mut self, container: &R::Node) -> ReconcileResult<()> {
        let (id, mut instance) =
            self.registry
                .remove(container)
                .ok_or_else(|| ReconcileError::NotARoot {
                    container: format!("{:?}", container),
                })?;

        unmount_component(&mut self.renderer, &mut instance)?;
        self.renderer.remove_all_children(container)?;
        if let Some(attribute) = &self.config.root_attribute {
            self.renderer.remove_property(container, attribute)?;
        }

        info!(root = %id, "Unmounted root");
        Ok(())
    }

    /// Merge `partial` into the component's state and re-render it
    /// synchronously. Each call is its own update pass.
    #[instrument(skip(self, handle, partial), fields(component = handle.name()))]
    pub fn set_state(
        &mut self,
        handle: &CompositeHandle<R::Node>,
        partial: Props,
    ) -> ReconcileResult<()> {
        handle.set_state(&mut self.renderer, &partial)
    }
}

fn root_node<N: Clone>(instance: &Instance<N>) -> ReconcileResult<N> {
    instance.node().ok_or_else(|| {
        ReconcileError::host(format!(
            "root element '{}' produced no node",
            instance.display_name()
        ))
    })
}
