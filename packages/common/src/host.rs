use crate::props::PropValue;
use crate::result::ReconcileResult;
use std::fmt::Debug;
use std::hash::Hash;

/// Capability set of a rendering backend.
///
/// The reconciler never inspects nodes; it only hands them back to the
/// renderer. Nodes must be cheap handles (ids, shared pointers) because they
/// are cloned freely and used as registry keys for containers.
pub trait HostRenderer {
    type Node: Clone + Eq + Hash + Debug;

    /// Create a node of a primitive type. Fails with `UnknownHostType` for
    /// types the backend cannot create.
    fn create_node(&mut self, tag: &str) -> ReconcileResult<Self::Node>;

    /// Assign a property. Must be idempotent under repeated identical writes.
    fn set_property(&mut self, node: &Self::Node, name: &str, value: &PropValue)
        -> ReconcileResult<()>;

    fn remove_property(&mut self, node: &Self::Node, name: &str) -> ReconcileResult<()>;

    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> ReconcileResult<()>;

    fn append_children(
        &mut self,
        parent: &Self::Node,
        children: &[Self::Node],
    ) -> ReconcileResult<()> {
        for child in children {
            self.append_child(parent, child)?;
        }
        Ok(())
    }

    fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node) -> ReconcileResult<()>;

    fn remove_all_children(&mut self, node: &Self::Node) -> ReconcileResult<()>;

    /// Put `new_node` at the position `old_node` holds in its parent
    fn replace_node(&mut self, old_node: &Self::Node, new_node: &Self::Node)
        -> ReconcileResult<()>;

    fn set_text_content(&mut self, node: &Self::Node, text: &str) -> ReconcileResult<()>;

    /// Called once when the host instance owning `node` is unmounted, after
    /// its children. Backends detach handlers or free resources here.
    fn release_node(&mut self, _node: &Self::Node) -> ReconcileResult<()> {
        Ok(())
    }
}
