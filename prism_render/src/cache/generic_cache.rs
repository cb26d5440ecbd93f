use dashmap::DashMap;
use parking_lot::RwLock;
use prism_asset::ResourceId;
use std::sync::Arc;
use tracing::trace;

/// Shared handle to a cached GPU object.
///
/// Re-initialization writes through the lock, so every holder of the slot sees the new
/// contents without re-resolving the id.
pub type Slot<T> = Arc<RwLock<T>>;

pub(crate) struct Cache<T> {
    name: &'static str,
    data: DashMap<ResourceId, Slot<T>>,
}

impl<T> Cache<T> {
    pub(crate) fn new(name: &'static str) -> Self {
        Cache {
            name,
            data: DashMap::new(),
        }
    }

    pub(crate) fn get(&self, id: ResourceId) -> Option<Slot<T>> {
        self.data.get(&id).map(|slot| slot.value().clone())
    }

    pub(crate) fn contains(&self, id: ResourceId) -> bool {
        self.data.contains_key(&id)
    }

    pub(crate) fn insert(&self, id: ResourceId, hot: T) -> Slot<T> {
        let slot = Arc::new(RwLock::new(hot));
        self.data.insert(id, slot.clone());
        trace!("[{} Cache] Inserted {id}", self.name);
        slot
    }

    /// Swaps the contents of an existing slot, or inserts a new one.
    pub(crate) fn replace_or_insert(&self, id: ResourceId, hot: T) {
        match self.get(id) {
            Some(slot) => {
                *slot.write() = hot;
                trace!("[{} Cache] Replaced {id} in place", self.name);
            }
            None => {
                self.insert(id, hot);
            }
        }
    }

    pub(crate) fn remove(&self, id: ResourceId) -> Option<Slot<T>> {
        let (_, slot) = self.data.remove(&id)?;
        trace!("[{} Cache] Evicted {id}", self.name);
        Some(slot)
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn name(&self) -> &'static str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_keeps_the_slot() {
        let cache = Cache::new("Test");
        let id = ResourceId::new(0);

        let slot = cache.insert(id, 1);
        cache.replace_or_insert(id, 2);

        assert!(Arc::ptr_eq(&slot, &cache.get(id).unwrap()));
        assert_eq!(*slot.read(), 2);

        cache.replace_or_insert(ResourceId::new(1), 3);
        assert_eq!(cache.len(), 2);
        assert!(cache.remove(id).is_some());
        assert!(!cache.contains(id));
    }
}
