use prism_asset::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

type Log = Arc<Mutex<Vec<String>>>;

struct Named {
    name: &'static str,
    log: Log,
    attached: AtomicUsize,
    detached: AtomicUsize,
}

impl Named {
    fn new(name: &'static str, log: &Log) -> Arc<Self> {
        Arc::new(Named {
            name,
            log: log.clone(),
            attached: AtomicUsize::new(0),
            detached: AtomicUsize::new(0),
        })
    }
}

impl ResourceListener for Named {
    fn attached(&self, _store: &ResourceStore) {
        self.attached.fetch_add(1, Ordering::SeqCst);
    }

    fn detached(&self, _store: &ResourceStore) {
        self.detached.fetch_add(1, Ordering::SeqCst);
    }

    fn notify(&self, store: &ResourceStore, event: ResourceEvent) {
        // The payload is already visible while listeners run.
        assert!(store.contains(event.kind, event.id) || event.change == EventKind::Delete);
        self.log
            .lock()
            .unwrap()
            .push(format!("{}: {event}", self.name));
    }
}

fn mesh() -> MeshData {
    MeshData::builder(vec![0.0; 9]).build()
}

#[test]
fn listeners_run_in_registration_order_before_create_returns() {
    let store = ResourceStore::new();
    let log = Log::default();
    let first = Named::new("L1", &log);
    let second = Named::new("L2", &log);

    store.add_listener(first.clone());
    store.add_listener(second.clone());
    assert_eq!(store.listener_count(), 2);

    let id = store.create_mesh(mesh());

    assert_eq!(
        *log.lock().unwrap(),
        vec![
            format!("L1: Create Mesh {id}"),
            format!("L2: Create Mesh {id}")
        ]
    );
    assert_eq!(first.attached.load(Ordering::SeqCst), 1);
}

#[test]
fn removed_listener_is_detached_once_and_no_longer_notified() {
    let store = ResourceStore::new();
    let log = Log::default();
    let listener = Named::new("L", &log);
    let handle: Arc<dyn ResourceListener> = listener.clone();

    store.add_listener(handle.clone());
    store.create_string("before");

    assert!(store.remove_listener(&handle));
    assert!(!store.remove_listener(&handle));
    store.create_string("after");

    assert_eq!(listener.detached.load(Ordering::SeqCst), 1);
    assert_eq!(log.lock().unwrap().len(), 1);
    assert_eq!(store.listener_count(), 0);
}

#[test]
fn duplicate_registration_delivers_twice() {
    let store = ResourceStore::new();
    let log = Log::default();
    let listener: Arc<dyn ResourceListener> = Named::new("L", &log);

    store.add_listener(listener.clone());
    store.add_listener(listener.clone());
    store.create_string("x");
    assert_eq!(log.lock().unwrap().len(), 2);

    // Only the earliest entry goes away.
    assert!(store.remove_listener(&listener));
    store.create_string("y");
    assert_eq!(log.lock().unwrap().len(), 3);
}

struct Meddler;

impl ResourceListener for Meddler {
    fn notify(&self, store: &ResourceStore, event: ResourceEvent) {
        if event.kind == ResourceKind::String {
            store.create_mesh(mesh());
        }
    }
}

struct Subscriber;

impl ResourceListener for Subscriber {
    fn notify(&self, store: &ResourceStore, _event: ResourceEvent) {
        store.add_listener(Arc::new(Subscriber));
    }
}

#[test]
#[should_panic(expected = "re-entrant mutation")]
fn mutating_from_a_callback_panics() {
    let store = ResourceStore::new();
    store.add_listener(Arc::new(Meddler));
    store.create_string("boom");
}

#[test]
#[should_panic(expected = "re-entrant mutation")]
fn subscribing_from_a_callback_panics() {
    let store = ResourceStore::new();
    store.add_listener(Arc::new(Subscriber));
    store.create_string("boom");
}

#[test]
fn store_is_usable_again_after_a_rejected_reentry() {
    let store = Arc::new(ResourceStore::new());
    store.add_listener(Arc::new(Meddler));

    let inner = store.clone();
    let result = std::thread::spawn(move || inner.create_string("boom")).join();
    assert!(result.is_err());

    // The dispatch depth was unwound with the panic.
    let log = Log::default();
    let listener: Arc<dyn ResourceListener> = Named::new("L", &log);
    store.add_listener(listener);
    assert!(store.create_mesh(mesh()).is_valid());
}
