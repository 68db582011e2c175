use crate::composite::CompositeHandle;
use crate::host::HostInstance;
use arbor_common::{Element, ElementType, ReconcileResult};

/// Runtime counterpart of an element.
///
/// The reconciler dispatches mount, receive and unmount on the variant tag.
/// Composite instances sit behind a shared handle so state updates can reach
/// them from outside the tree; host instances are owned inline.
pub enum Instance<N> {
    Composite(CompositeHandle<N>),
    Host(HostInstance<N>),
}

impl<N: Clone> Instance<N> {
    /// Create the unmounted instance variant matching the element's type
    pub fn instantiate(element: &Element) -> Self {
        match element.ty() {
            ElementType::Host(_) => Instance::Host(HostInstance::new(element.clone())),
            ElementType::Composite(component_type) => {
                Instance::Composite(CompositeHandle::new(component_type, element.clone()))
            }
        }
    }

    /// The element this instance was last mounted or updated from
    pub fn current_element(&self) -> ReconcileResult<Element> {
        match self {
            Instance::Composite(handle) => handle.current_element(),
            Instance::Host(host) => Ok(host.current_element().clone()),
        }
    }

    /// Externally visible node. Composites delegate to their rendered child.
    pub fn node(&self) -> Option<N> {
        match self {
            Instance::Composite(handle) => handle.node(),
            Instance::Host(host) => host.node().cloned(),
        }
    }

    pub fn is_mounted(&self) -> bool {
        match self {
            Instance::Composite(handle) => handle.is_mounted(),
            Instance::Host(host) => host.is_mounted(),
        }
    }

    /// Number of instances owned below this one
    pub fn descendant_count(&self) -> ReconcileResult<usize> {
        match self {
            Instance::Composite(handle) => handle.descendant_count(),
            Instance::Host(host) => host.descendant_count(),
        }
    }

    pub fn as_composite(&self) -> Option<&CompositeHandle<N>> {
        match self {
            Instance::Composite(handle) => Some(handle),
            Instance::Host(_) => None,
        }
    }

    pub fn as_host(&self) -> Option<&HostInstance<N>> {
        match self {
            Instance::Host(host) => Some(host),
            Instance::Composite(_) => None,
        }
    }
}

impl<N> Instance<N> {
    /// Component name or host tag. Readable at any point, including mid-pass.
    pub fn display_name(&self) -> &str {
        match self {
            Instance::Composite(handle) => handle.name(),
            Instance::Host(host) => host.current_element().display_name(),
        }
    }
}

impl<N> std::fmt::Debug for Instance<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Instance::Composite(_) => write!(f, "Composite({})", self.display_name()),
            Instance::Host(_) => write!(f, "Host({})", self.display_name()),
        }
    }
}
