//! Subscription side of the [`ResourceStore`].
//!
//! A listener goes `Unattached -> Attached` on [`ResourceStore::add_listener`] and back on
//! [`ResourceStore::remove_listener`]. Only attached listeners are notified, in the order
//! they were registered, synchronously before the mutating call returns.
//!
//! Mutating the store (or its listener list) from inside a callback is not supported and
//! panics.

use super::ResourceStore;
use crate::ResourceEvent;
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{trace, warn};

pub trait ResourceListener: Send + Sync {
    fn attached(&self, _store: &ResourceStore) {}

    fn detached(&self, _store: &ResourceStore) {}

    fn notify(&self, store: &ResourceStore, event: ResourceEvent);
}

#[derive(Default)]
pub(crate) struct ListenerRegistry {
    entries: RwLock<Vec<Arc<dyn ResourceListener>>>,
    dispatch_depth: AtomicUsize,
}

struct DispatchGuard<'a>(&'a AtomicUsize);

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

#[inline]
fn same_listener(a: &Arc<dyn ResourceListener>, b: &Arc<dyn ResourceListener>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

impl ListenerRegistry {
    pub(crate) fn add(&self, store: &ResourceStore, listener: Arc<dyn ResourceListener>) {
        self.assert_idle("add_listener");

        {
            let mut entries = self.entries.write();
            if entries.iter().any(|l| same_listener(l, &listener)) {
                warn!("Listener registered twice, it will receive every event twice");
            }
            entries.push(listener.clone());
        }

        listener.attached(store);
    }

    pub(crate) fn remove(
        &self,
        store: &ResourceStore,
        listener: &Arc<dyn ResourceListener>,
    ) -> bool {
        self.assert_idle("remove_listener");

        let removed = {
            let mut entries = self.entries.write();
            entries
                .iter()
                .position(|l| same_listener(l, listener))
                .map(|pos| entries.remove(pos))
        };

        match removed {
            Some(listener) => {
                listener.detached(store);
                true
            }
            None => false,
        }
    }

    pub(crate) fn dispatch(&self, store: &ResourceStore, event: ResourceEvent) {
        let snapshot = self.entries.read().clone();
        if snapshot.is_empty() {
            return;
        }

        self.dispatch_depth.fetch_add(1, Ordering::AcqRel);
        let _guard = DispatchGuard(&self.dispatch_depth);

        trace!("Dispatching {event} to {} listener(s)", snapshot.len());
        for listener in &snapshot {
            listener.notify(store, event);
        }
    }

    pub(crate) fn assert_idle(&self, operation: &str) {
        assert_eq!(
            self.dispatch_depth.load(Ordering::Acquire),
            0,
            "ResourceStore::{operation} was called from inside a listener callback, \
             re-entrant mutation of the store is not supported"
        );
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.read().len()
    }
}
