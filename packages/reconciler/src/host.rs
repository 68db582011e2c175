use crate::instance::Instance;
use crate::reconciler::{
    mount_component, receive_component, replace_instance, should_update_component,
    unmount_component,
};
use arbor_common::{Children, Element, HostRenderer, Props, ReconcileError, ReconcileResult};
use tracing::{debug, trace, warn};

/// Instance backing a primitive render-target node
pub struct HostInstance<N> {
    current_element: Element,
    /// Present from mount until unmount
    node: Option<N>,
    /// Empty when the children prop is text or absent
    rendered_children: Vec<Instance<N>>,
}

impl<N> HostInstance<N> {
    pub(crate) fn new(element: Element) -> Self {
        Self {
            current_element: element,
            node: None,
            rendered_children: Vec::new(),
        }
    }

    pub fn current_element(&self) -> &Element {
        &self.current_element
    }

    pub fn node(&self) -> Option<&N> {
        self.node.as_ref()
    }

    pub fn children(&self) -> &[Instance<N>] {
        &self.rendered_children
    }

    pub fn is_mounted(&self) -> bool {
        self.node.is_some()
    }
}

impl<N: Clone> HostInstance<N> {
    pub fn descendant_count(&self) -> ReconcileResult<usize> {
        self.rendered_children
            .iter()
            .map(|child| child.descendant_count().map(|count| count + 1))
            .sum()
    }

    pub(crate) fn mount<R>(&mut self, renderer: &mut R) -> ReconcileResult<N>
    where
        R: HostRenderer<Node = N>,
    {
        let element = self.current_element.clone();
        let tag = element.tag().ok_or_else(|| {
            ReconcileError::invalid_element(format!(
                "'{}' is not a host element",
                element.display_name()
            ))
        })?;
        let node = renderer.create_node(tag)?;
        debug!(tag, "Mounting host node");

        for (name, value) in element.props().attributes() {
            trace!(property = name, "Setting property");
            renderer.set_property(&node, name, value)?;
        }

        match element.props().children()? {
            Children::Text(text) => renderer.set_text_content(&node, &text)?,
            Children::Elements(children) => {
                let mut child_nodes = Vec::with_capacity(children.len());
                for child in children {
                    let instance = mount_component(renderer, child)?;
                    child_nodes.push(mounted_node(&instance)?);
                    self.rendered_children.push(instance);
                }
                renderer.append_children(&node, &child_nodes)?;
            }
            Children::None => {}
        }

        self.node = Some(node.clone());
        Ok(node)
    }

    pub(crate) fn receive<R>(&mut self, renderer: &mut R, next_element: &Element) -> ReconcileResult<()>
    where
        R: HostRenderer<Node = N>,
    {
        let node = self.node.clone().ok_or_else(|| ReconcileError::InstanceUnmounted {
            component: self.current_element.display_name().to_string(),
        })?;

        let prev_element = std::mem::replace(&mut self.current_element, next_element.clone());
        debug!(tag = next_element.display_name(), "Updating host node");

        update_properties(renderer, &node, prev_element.props(), next_element.props())?;
        self.update_children(renderer, &node, prev_element.props(), next_element.props())
    }

    /// Reconcile children by position: index `i` of the previous render is
    /// only ever compared with index `i` of the next one. Reordering siblings
    /// therefore rebuilds every position whose type changed.
    fn update_children<R>(
        &mut self,
        renderer: &mut R,
        node: &N,
        prev_props: &Props,
        next_props: &Props,
    ) -> ReconcileResult<()>
    where
        R: HostRenderer<Node = N>,
    {
        let prev_was_text = prev_props.children()?.is_text();

        match next_props.children()? {
            Children::Text(text) => {
                self.unmount_children(renderer)?;
                renderer.set_text_content(node, &text)?;
            }
            Children::None => {
                if !self.rendered_children.is_empty() || prev_was_text {
                    self.unmount_children(renderer)?;
                    renderer.remove_all_children(node)?;
                }
            }
            Children::Elements(next_children) => {
                if prev_was_text {
                    renderer.remove_all_children(node)?;
                }

                for (index, child) in next_children.iter().enumerate() {
                    match self.rendered_children.get_mut(index) {
                        Some(existing) => {
                            if should_update_component(&existing.current_element()?, child) {
                                receive_component(renderer, existing, child)?;
                            } else {
                                debug!(index, to = child.display_name(), "Child type changed at position");
                                replace_instance(renderer, existing, child)?;
                            }
                        }
                        None => {
                            let instance = mount_component(renderer, child)?;
                            renderer.append_child(node, &mounted_node(&instance)?)?;
                            self.rendered_children.push(instance);
                        }
                    }
                }

                if self.rendered_children.len() > next_children.len() {
                    let stale = self.rendered_children.split_off(next_children.len());
                    for mut instance in stale {
                        let child_node = instance.node();
                        unmount_component(renderer, &mut instance)?;
                        if let Some(child_node) = child_node {
                            renderer.remove_child(node, &child_node)?;
                        }
                    }
                }
            }
        }

        Ok(())
    }

    fn unmount_children<R>(&mut self, renderer: &mut R) -> ReconcileResult<()>
    where
        R: HostRenderer<Node = N>,
    {
        for mut child in std::mem::take(&mut self.rendered_children) {
            unmount_component(renderer, &mut child)?;
        }
        Ok(())
    }

    pub(crate) fn unmount<R>(&mut self, renderer: &mut R) -> ReconcileResult<()>
    where
        R: HostRenderer<Node = N>,
    {
        let Some(node) = self.node.take() else {
            warn!(tag = self.current_element.display_name(), "Host instance already unmounted");
            return Ok(());
        };

        debug!(tag = self.current_element.display_name(), "Unmounting host node");
        // Children go first so nested composites release before the node does
        self.unmount_children(renderer)?;
        renderer.release_node(&node)
    }
}

/// Remove props that disappeared and (re)apply every prop that is present.
/// Value-level comparison is left to the renderer.
fn update_properties<R: HostRenderer>(
    renderer: &mut R,
    node: &R::Node,
    prev_props: &Props,
    next_props: &Props,
) -> ReconcileResult<()> {
    for (name, _) in prev_props.attributes() {
        if !next_props.contains_key(name) {
            trace!(property = name, "Removing property");
            renderer.remove_property(node, name)?;
        }
    }

    for (name, value) in next_props.attributes() {
        trace!(property = name, "Setting property");
        renderer.set_property(node, name, value)?;
    }

    Ok(())
}

fn mounted_node<N: Clone>(instance: &Instance<N>) -> ReconcileResult<N> {
    instance.node().ok_or_else(|| {
        ReconcileError::host(format!(
            "mounted '{}' has no node",
            instance.display_name()
        ))
    })
}
