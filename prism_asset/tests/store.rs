use more_asserts::assert_gt;
use prism_asset::*;
use std::sync::Arc;
use std::sync::Mutex;

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<ResourceEvent>>,
}

impl ResourceListener for Recorder {
    fn notify(&self, _store: &ResourceStore, event: ResourceEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn triangle() -> MeshData {
    MeshData::builder(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0])
        .normals(vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0])
        .uvs(vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0])
        .build()
}

fn pixel() -> ImageData {
    ImageData::filled(1, 1, &[10, 20, 30], ColorFormat::Rgb24)
}

#[test]
fn ids_increase_per_kind_and_are_never_reused() {
    let store = ResourceStore::new();

    let m0 = store.create_mesh(triangle());
    let s0 = store.create_string("a");
    let m1 = store.create_mesh(triangle());
    let i0 = store.create_image(pixel());
    assert!(store.remove(ResourceKind::Mesh, m1));
    let m2 = store.create_mesh(triangle());
    let s1 = store.create_string("b");

    assert_eq!(m0, ResourceId::new(0));
    assert_eq!(m1, ResourceId::new(1));
    assert_eq!(m2, ResourceId::new(2));
    assert_eq!(s0, ResourceId::new(0));
    assert_eq!(s1, ResourceId::new(1));
    assert_eq!(i0, ResourceId::new(0));
    assert_gt!(m2, m1);

    assert_eq!(store.ids(ResourceKind::Mesh), vec![m0, m2]);
    assert_eq!(store.len(ResourceKind::Mesh), 2);
    assert!(!store.contains(ResourceKind::Mesh, m1));
}

#[test]
fn mesh_round_trip_returns_a_copy() {
    let store = ResourceStore::new();
    let mesh = triangle();

    let id = store.create_mesh(mesh.clone());
    assert_eq!(store.mesh(id), Some(mesh));
    assert_eq!(store.mesh(ResourceId::new(17)), None);
    assert_eq!(store.mesh(ResourceId::INVALID), None);
}

#[test]
fn invalid_payloads_return_invalid_and_fire_nothing() {
    let store = ResourceStore::new();
    let recorder = Arc::new(Recorder::default());
    store.add_listener(recorder.clone());

    let wrong_length = ImageData::new(vec![0; 5], 2, 2, ColorFormat::Rgb24);
    assert_eq!(store.create_image(wrong_length), ResourceId::INVALID);

    let mut quad = triangle();
    quad.primitive = PrimitiveType::Quad;
    assert_eq!(store.create_mesh(quad), ResourceId::INVALID);

    let no_fragment = ShaderDesc::new(ResourceId::new(0), ResourceId::INVALID);
    assert_eq!(
        store.try_create_shader(no_fragment),
        Err(ValidationError::MissingStage {
            stage: ShaderStage::Fragment
        })
    );

    assert!(recorder.events.lock().unwrap().is_empty());
    assert_eq!(store.len(ResourceKind::Image), 0);

    // The rejected payloads did not consume an id.
    assert_eq!(store.create_image(pixel()), ResourceId::new(0));
}

#[test]
fn materials_accept_dangling_ids() {
    let store = ResourceStore::new();
    let desc = MaterialDesc::builder()
        .diffuse(ResourceId::new(99))
        .shader(ResourceId::new(5))
        .build();

    let id = store.create_material(desc);
    assert!(id.is_valid());
    assert_eq!(store.material(id), Some(desc));
}

#[test]
fn replace_and_remove_fire_change_and_delete() {
    let store = ResourceStore::new();
    let recorder = Arc::new(Recorder::default());
    store.add_listener(recorder.clone());

    let id = store.create_string("old");
    assert!(store.replace_string(id, "new"));
    assert_eq!(store.string(id).as_deref(), Some("new"));

    assert!(!store.replace_string(ResourceId::new(8), "nope"));
    assert!(!store.replace_image(ResourceId::new(0), pixel()));

    assert!(store.remove(ResourceKind::String, id));
    assert!(!store.remove(ResourceKind::String, id));
    assert_eq!(store.string(id), None);

    let events = recorder.events.lock().unwrap();
    assert_eq!(
        *events,
        vec![
            ResourceEvent::new(ResourceKind::String, id, EventKind::Create),
            ResourceEvent::new(ResourceKind::String, id, EventKind::Change),
            ResourceEvent::new(ResourceKind::String, id, EventKind::Delete),
        ]
    );
}

#[test]
fn rejected_replacement_keeps_the_old_payload() {
    let store = ResourceStore::new();
    let id = store.create_image(pixel());

    let broken = ImageData::new(Vec::new(), 1, 1, ColorFormat::Rgba32);
    assert!(!store.replace_image(id, broken));
    assert_eq!(store.image(id), Some(pixel()));
}
