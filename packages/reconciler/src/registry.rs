use crate::instance::Instance;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Identifier of a mounted root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RootId(u64);

impl RootId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RootId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maps containers to the instance tree mounted into them.
///
/// Ids are allocated monotonically and never reused, even after a root is
/// unmounted.
pub struct RootRegistry<N> {
    next_id: u64,
    containers: HashMap<N, RootId>,
    roots: HashMap<RootId, Instance<N>>,
}

impl<N: Clone + Eq + Hash> RootRegistry<N> {
    pub fn new(first_id: u64) -> Self {
        Self {
            next_id: first_id,
            containers: HashMap::new(),
            roots: HashMap::new(),
        }
    }

    pub fn root_id(&self, container: &N) -> Option<RootId> {
        self.containers.get(container).copied()
    }

    pub fn is_root(&self, container: &N) -> bool {
        self.containers.contains_key(container)
    }

    pub fn allocate_id(&mut self) -> RootId {
        let id = RootId(self.next_id);
        self.next_id += 1;
        id
    }

    /// The id the next allocation will return
    pub fn peek_next_id(&self) -> RootId {
        RootId(self.next_id)
    }

    /// Tag `container` as a root and store its instance
    pub fn register(&mut self, container: N, id: RootId, instance: Instance<N>) {
        self.containers.insert(container, id);
        self.roots.insert(id, instance);
    }

    pub fn instance(&self, id: RootId) -> Option<&Instance<N>> {
        self.roots.get(&id)
    }

    pub fn instance_mut(&mut self, id: RootId) -> Option<&mut Instance<N>> {
        self.roots.get_mut(&id)
    }

    pub fn remove(&mut self, container: &N) -> Option<(RootId, Instance<N>)> {
        let id = self.containers.remove(container)?;
        self.roots.remove(&id).map(|instance| (id, instance))
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}
