use crate::error::ValidationError;
use crate::{ResourceId, ResourceKind};
use dashmap::DashMap;
use prism_utils::debug_panic;
use std::fmt::Debug;
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::trace;

/// Storage of every payload of one [`ResourceKind`].
///
/// Ids come from a counter that only moves forward, so an id is never handed out twice,
/// not even after its payload was removed. Mutation is crate private: all changes go
/// through [`ResourceStore`](super::ResourceStore), which owns the event dispatch.
pub struct Store<T: StoreType> {
    data: DashMap<ResourceId, T>,
    next_id: AtomicI64,
}

pub trait StoreType: Sized + Clone + Debug + Send + Sync + 'static {
    const KIND: ResourceKind;

    fn validate(&self) -> Result<(), ValidationError>;

    fn name() -> &'static str {
        Self::KIND.name()
    }
}

impl<T: StoreType> Store<T> {
    pub fn empty() -> Self {
        Self {
            data: DashMap::new(),
            next_id: AtomicI64::new(0),
        }
    }

    fn next_id(&self) -> ResourceId {
        ResourceId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    pub(crate) fn add(&self, elem: T) -> ResourceId {
        let id = self.next_id();
        if self.data.insert(id, elem).is_some() {
            debug_panic!("[{} Store] Id {id} was handed out twice", T::name());
        }

        trace!("[{} Store] Added element {id}", T::name());

        id
    }

    pub(crate) fn replace(&self, id: ResourceId, elem: T) -> bool {
        match self.data.get_mut(&id) {
            Some(mut slot) => {
                *slot = elem;
                trace!("[{} Store] Replaced element {id}", T::name());
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove(&self, id: ResourceId) -> Option<T> {
        let (_, item) = self.data.remove(&id)?;
        trace!("[{} Store] Removed element {id}", T::name());
        Some(item)
    }

    /// A copy of the payload stored under `id`.
    pub fn get(&self, id: ResourceId) -> Option<T> {
        let item = self.data.get(&id).map(|r| r.value().clone());
        if item.is_none() {
            trace!("[{} Store] Invalid reference: {id} not found", T::name());
        }
        item
    }

    pub fn contains(&self, id: ResourceId) -> bool {
        self.data.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// All ids currently holding a payload, ascending.
    pub fn ids(&self) -> Vec<ResourceId> {
        let mut ids: Vec<ResourceId> = self.data.iter().map(|e| *e.key()).collect();
        ids.sort_unstable();
        ids
    }
}

impl<T: StoreType> Default for Store<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_not_reused_after_removal() {
        let store = Store::<String>::empty();

        let a = store.add("a".to_string());
        let b = store.add("b".to_string());
        assert!(store.remove(b).is_some());
        let c = store.add("c".to_string());

        assert_eq!(a, ResourceId::new(0));
        assert_eq!(c, ResourceId::new(2));
        assert_eq!(store.ids(), vec![a, c]);
        assert!(!store.replace(b, "b2".to_string()));
    }

    #[test]
    fn get_returns_a_copy() {
        let store = Store::<String>::empty();
        let id = store.add("source".to_string());

        let mut copy = store.get(id).unwrap();
        copy.push_str(" changed");

        assert_eq!(store.get(id).as_deref(), Some("source"));
    }
}
