//! The stateless reconciliation layer.
//!
//! Every function takes the host renderer explicitly and operates on a single
//! instance; none of them touch the root registry.

use crate::composite::CompositeHandle;
use crate::instance::Instance;
use arbor_common::{Element, HostRenderer, ReconcileError, ReconcileResult};
use tracing::{debug, trace};

/// The diffing policy: patch in place iff the type tags are equal.
///
/// Composite types compare by definition identity, host types by tag. Keys
/// are not consulted.
pub fn should_update_component(prev_element: &Element, next_element: &Element) -> bool {
    prev_element.same_type(next_element)
}

/// Instantiate `element` and mount it, producing its render-target node
pub fn mount_component<R: HostRenderer>(
    renderer: &mut R,
    element: &Element,
) -> ReconcileResult<Instance<R::Node>> {
    let mut instance = Instance::instantiate(element);
    match &mut instance {
        Instance::Composite(handle) => handle.mount(renderer)?,
        Instance::Host(host) => host.mount(renderer)?,
    };
    Ok(instance)
}

/// Bring `instance` up to date with `next_element`.
///
/// Receiving the very element the instance already holds is a no-op. Equal
/// but separately built elements always go through the update path.
pub fn receive_component<R: HostRenderer>(
    renderer: &mut R,
    instance: &mut Instance<R::Node>,
    next_element: &Element,
) -> ReconcileResult<()> {
    if instance.current_element()?.ptr_eq(next_element) {
        trace!(element = next_element.display_name(), "Same element received, skipping");
        return Ok(());
    }

    match instance {
        Instance::Composite(handle) => handle.receive(renderer, next_element),
        Instance::Host(host) => host.receive(renderer, next_element),
    }
}

/// Tear down `instance` and everything it owns, children first.
/// A second call on the same instance logs and does nothing.
pub fn unmount_component<R: HostRenderer>(
    renderer: &mut R,
    instance: &mut Instance<R::Node>,
) -> ReconcileResult<()> {
    match instance {
        Instance::Composite(handle) => handle.unmount(renderer),
        Instance::Host(host) => host.unmount(renderer),
    }
}

/// Flush a composite's staged state with one synchronous update pass
pub fn perform_update_if_necessary<R: HostRenderer>(
    renderer: &mut R,
    handle: &CompositeHandle<R::Node>,
) -> ReconcileResult<()> {
    handle.perform_update_if_necessary(renderer)
}

/// Destroy-and-rebuild at one position: unmount `instance` completely, mount
/// `next_element` and put the new node where the old one was.
pub(crate) fn replace_instance<R: HostRenderer>(
    renderer: &mut R,
    instance: &mut Instance<R::Node>,
    next_element: &Element,
) -> ReconcileResult<()> {
    let old_node = instance.node().ok_or_else(|| {
        ReconcileError::host(format!(
            "cannot replace '{}': it has no node",
            instance.display_name()
        ))
    })?;

    unmount_component(renderer, instance)?;
    let fresh = mount_component(renderer, next_element)?;
    let new_node = fresh.node().ok_or_else(|| {
        ReconcileError::host(format!(
            "replacement '{}' produced no node",
            next_element.display_name()
        ))
    })?;

    debug!(
        from = instance.display_name(),
        to = next_element.display_name(),
        "Replacing node"
    );
    renderer.replace_node(&old_node, &new_node)?;
    *instance = fresh;
    Ok(())
}
