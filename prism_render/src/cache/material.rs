use super::generic_cache::Slot;
use super::resource_cache::GpuResourceCache;
use crate::backend::GraphicsBackend;
use crate::error::ProtocolViolation;
use prism_asset::{
    EventKind, MaterialDesc, MaterialSlot, ResourceEvent, ResourceId, ResourceKind, ResourceStore,
};

/// A material as the cache holds it: the textures it names and its optional program.
///
/// Slots left unset in the descriptor stay empty here, defaults are only substituted by
/// [`GpuResourceCache::resolve_material`].
pub struct GpuMaterial<B: GraphicsBackend> {
    textures: [Option<Slot<B::Texture>>; 5],
    program: Option<Slot<B::Program>>,
    desc: MaterialDesc,
}

impl<B: GraphicsBackend> GpuMaterial<B> {
    pub fn texture(&self, slot: MaterialSlot) -> Option<&Slot<B::Texture>> {
        self.textures[slot.index()].as_ref()
    }

    pub fn program(&self) -> Option<&Slot<B::Program>> {
        self.program.as_ref()
    }

    /// The descriptor this material was built from.
    pub fn desc(&self) -> &MaterialDesc {
        &self.desc
    }
}

/// The draw time view of a material, every slot filled.
pub struct ResolvedMaterial<B: GraphicsBackend> {
    textures: [Slot<B::Texture>; 5],
    defaulted: [bool; 5],
    pub program: Option<Slot<B::Program>>,
}

impl<B: GraphicsBackend> ResolvedMaterial<B> {
    pub fn texture(&self, slot: MaterialSlot) -> &Slot<B::Texture> {
        &self.textures[slot.index()]
    }

    /// Whether `slot` holds the fallback texture.
    pub fn is_default(&self, slot: MaterialSlot) -> bool {
        self.defaulted[slot.index()]
    }

    /// All five textures in slot order.
    pub fn textures(&self) -> &[Slot<B::Texture>; 5] {
        &self.textures
    }
}

impl<B: GraphicsBackend> GpuResourceCache<B> {
    pub(crate) fn on_material(&self, store: &ResourceStore, event: ResourceEvent) {
        let id = event.id;

        if event.change == EventKind::Delete {
            self.on_delete(&self.materials, id);
            return;
        }

        let Some(desc) = store.material(id) else {
            self.violation(ProtocolViolation::MissingPayload {
                kind: ResourceKind::Material,
                id,
                change: event.change,
            });
            return;
        };

        if event.change == EventKind::Create && self.materials.contains(id) {
            self.violation(ProtocolViolation::DuplicateCreate {
                kind: ResourceKind::Material,
                id,
            });
            return;
        }

        let Some(material) = self.build_material(id, desc) else {
            return;
        };

        match event.change {
            EventKind::Create => {
                self.materials.insert(id, material);
            }
            _ => self.materials.replace_or_insert(id, material),
        }
    }

    fn missing_dependency(&self, id: ResourceId, kind: ResourceKind, dependency: ResourceId) {
        self.violation(ProtocolViolation::MissingDependency {
            kind: ResourceKind::Material,
            id,
            dependency_kind: kind,
            dependency,
        });
    }

    fn build_material(&self, id: ResourceId, desc: MaterialDesc) -> Option<GpuMaterial<B>> {
        let mut textures: [Option<Slot<B::Texture>>; 5] = Default::default();

        for (slot, image) in desc.images() {
            let Some(texture) = self.textures.get(image) else {
                self.missing_dependency(id, ResourceKind::Image, image);
                return None;
            };
            textures[slot.index()] = Some(texture);
        }

        let program = match desc.custom_shader() {
            Some(shader) => match self.programs.get(shader) {
                Some(program) => Some(program),
                None => {
                    self.missing_dependency(id, ResourceKind::Shader, shader);
                    return None;
                }
            },
            None => None,
        };

        Some(GpuMaterial {
            textures,
            program,
            desc,
        })
    }

    /// The material `id` with every unset slot replaced by its default texture.
    ///
    /// Lookup rules are those of [`GpuResourceCache::material`].
    pub fn resolve_material(&self, id: ResourceId) -> Option<ResolvedMaterial<B>> {
        let material = self.material(id)?;
        let material = material.read();

        let mut defaulted = [false; 5];
        let textures = MaterialSlot::ALL.map(|slot| match material.texture(slot) {
            Some(texture) => texture.clone(),
            None => {
                defaulted[slot.index()] = true;
                self.defaults().for_slot(slot).clone()
            }
        });

        Some(ResolvedMaterial {
            textures,
            defaulted,
            program: material.program().cloned(),
        })
    }
}
