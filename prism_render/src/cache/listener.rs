use super::resource_cache::GpuResourceCache;
use crate::backend::GraphicsBackend;
use prism_asset::{ResourceEvent, ResourceKind, ResourceListener, ResourceStore};
use std::sync::Arc;
use tracing::debug;

/// Forwards store events to a [`GpuResourceCache`].
///
/// Resources created before the listener was attached are not picked up.
pub struct CacheListener<B: GraphicsBackend> {
    cache: Arc<GpuResourceCache<B>>,
}

impl<B: GraphicsBackend> CacheListener<B> {
    pub fn new(cache: Arc<GpuResourceCache<B>>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<GpuResourceCache<B>> {
        &self.cache
    }
}

impl<B: GraphicsBackend> ResourceListener for CacheListener<B> {
    fn attached(&self, store: &ResourceStore) {
        let existing: usize = ResourceKind::ALL
            .into_iter()
            .map(|kind| store.len(kind))
            .sum();
        debug!("[Resource Cache] Attached to a store holding {existing} resource(s)");
    }

    fn detached(&self, _store: &ResourceStore) {
        debug!("[Resource Cache] Detached from store");
    }

    fn notify(&self, store: &ResourceStore, event: ResourceEvent) {
        self.cache.handle_event(store, event);
    }
}

impl<B: GraphicsBackend> GpuResourceCache<B> {
    /// A listener feeding this cache.
    pub fn listener(self: &Arc<Self>) -> Arc<dyn ResourceListener> {
        Arc::new(CacheListener::new(self.clone()))
    }

    /// Registers a listener for this cache on `store` and returns it, for a later
    /// [`ResourceStore::remove_listener`].
    pub fn attach(self: &Arc<Self>, store: &ResourceStore) -> Arc<dyn ResourceListener> {
        let listener = self.listener();
        store.add_listener(listener.clone());
        listener
    }
}
