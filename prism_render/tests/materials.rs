use prism_asset::*;
use prism_render::*;
use std::sync::Arc;

type Cache = GpuResourceCache<HeadlessBackend>;

const VERTEX: &str = "#version 450\nvoid main() { gl_Position = vec4(0.0); }\n";
const FRAGMENT: &str =
    "#version 450\nlayout(location = 0) out vec4 color;\nvoid main() { color = vec4(1.0); }\n";

fn attached(settings: CacheSettings) -> (ResourceStore, Arc<Cache>) {
    let store = ResourceStore::new();
    let cache = Arc::new(Cache::new(HeadlessBackend::new(), settings).unwrap());
    cache.attach(&store);
    (store, cache)
}

fn pixel(value: u8, format: ColorFormat) -> ImageData {
    ImageData::filled(1, 1, &vec![value; format.channels()], format)
}

#[test]
fn empty_material_resolves_to_defaults() {
    let (store, cache) = attached(CacheSettings::strict());

    let id = store.create_material(MaterialDesc::default());
    let resolved = cache.resolve_material(id).unwrap();

    for slot in MaterialSlot::ALL {
        assert!(resolved.is_default(slot));
        assert!(Arc::ptr_eq(
            resolved.texture(slot),
            cache.defaults().for_slot(slot)
        ));
    }
    assert!(resolved.program.is_none());
    assert_eq!(
        resolved.texture(MaterialSlot::Diffuse).read().rgba,
        vec![255, 0, 255, 255]
    );
}

#[test]
fn set_slots_use_their_textures() {
    let (store, cache) = attached(CacheSettings::strict());

    let diffuse = store.create_image(pixel(10, ColorFormat::Rgba32));
    let glow = store.create_image(pixel(20, ColorFormat::Rgb24));
    let id = store.create_material(MaterialDesc::builder().diffuse(diffuse).glow(glow).build());

    let resolved = cache.resolve_material(id).unwrap();
    assert!(!resolved.is_default(MaterialSlot::Diffuse));
    assert!(!resolved.is_default(MaterialSlot::Glow));
    assert!(resolved.is_default(MaterialSlot::Normal));
    assert!(Arc::ptr_eq(
        resolved.texture(MaterialSlot::Diffuse),
        &cache.texture(diffuse).unwrap()
    ));

    let material = cache.material(id).unwrap();
    let material = material.read();
    assert!(material.texture(MaterialSlot::Specular).is_none());
    assert_eq!(material.desc().glow, glow);
}

#[test]
fn custom_shader_is_bound() {
    let (store, cache) = attached(CacheSettings::strict());

    let shader = store.create_shader(ShaderDesc::new(
        store.create_string(VERTEX),
        store.create_string(FRAGMENT),
    ));
    let id = store.create_material(MaterialDesc::builder().shader(shader).build());

    let program = cache.program(shader).unwrap();
    let material = cache.material(id).unwrap();
    assert!(Arc::ptr_eq(material.read().program().unwrap(), &program));
}

#[test]
#[should_panic(expected = "Resource protocol violation")]
fn strict_material_with_missing_texture_panics() {
    let (store, _cache) = attached(CacheSettings::strict());
    store.create_material(MaterialDesc::builder().normal(ResourceId::new(9)).build());
}

#[test]
fn relaxed_material_with_missing_texture_is_recorded() {
    let (store, cache) = attached(CacheSettings::relaxed());

    let id = store.create_material(MaterialDesc::builder().normal(ResourceId::new(9)).build());

    assert_eq!(
        cache.violations(),
        vec![ProtocolViolation::MissingDependency {
            kind: ResourceKind::Material,
            id,
            dependency_kind: ResourceKind::Image,
            dependency: ResourceId::new(9),
        }]
    );
    assert!(!cache.is_cached(ResourceKind::Material, id));
}

#[test]
fn material_with_a_failed_shader_is_a_violation() {
    let (store, cache) = attached(CacheSettings::relaxed());

    let shader = store.create_shader(ShaderDesc::new(
        store.create_string(VERTEX),
        store.create_string("not a fragment shader"),
    ));
    let id = store.create_material(MaterialDesc::builder().shader(shader).build());

    assert_eq!(
        cache.violations(),
        vec![ProtocolViolation::MissingDependency {
            kind: ResourceKind::Material,
            id,
            dependency_kind: ResourceKind::Shader,
            dependency: shader,
        }]
    );
}

#[test]
fn texture_change_shows_through_materials() {
    let (store, cache) = attached(CacheSettings::strict());

    let diffuse = store.create_image(pixel(10, ColorFormat::Rgba32));
    let id = store.create_material(MaterialDesc::builder().diffuse(diffuse).build());
    let resolved = cache.resolve_material(id).unwrap();

    assert!(store.replace_image(diffuse, ImageData::filled(3, 1, &[1, 2, 3], ColorFormat::Rgb24)));

    let texture = resolved.texture(MaterialSlot::Diffuse).read();
    assert_eq!(texture.width, 3);
    assert_eq!(texture.format, ColorFormat::Rgb24);
}

#[test]
fn material_change_rebinds_in_place() {
    let (store, cache) = attached(CacheSettings::strict());

    let first = store.create_image(pixel(1, ColorFormat::GreyScale8));
    let second = store.create_image(pixel(2, ColorFormat::GreyScale8));
    let id = store.create_material(MaterialDesc::builder().alpha(first).build());
    let slot = cache.material(id).unwrap();

    assert!(store.replace_material(id, MaterialDesc::builder().alpha(second).build()));

    assert!(Arc::ptr_eq(&slot, &cache.material(id).unwrap()));
    let material = slot.read();
    assert!(Arc::ptr_eq(
        material.texture(MaterialSlot::Alpha).unwrap(),
        &cache.texture(second).unwrap()
    ));
}

#[test]
fn deleted_material_is_retained() {
    let (store, cache) = attached(CacheSettings::strict());

    let id = store.create_material(MaterialDesc::default());
    assert!(store.remove(ResourceKind::Material, id));

    assert!(cache.resolve_material(id).is_some());
}

#[test]
fn resolving_an_invalid_material_yields_nothing() {
    let (_store, cache) = attached(CacheSettings::strict());
    assert!(cache.resolve_material(ResourceId::INVALID).is_none());
}
