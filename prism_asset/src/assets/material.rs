use crate::error::ValidationError;
use crate::store::StoreType;
use crate::{ResourceId, ResourceKind};
use bon::Builder;

/// The five texture slots of a material, in canonical order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MaterialSlot {
    Diffuse,
    Normal,
    Specular,
    Glow,
    Alpha,
}

impl MaterialSlot {
    pub const ALL: [MaterialSlot; 5] = [
        MaterialSlot::Diffuse,
        MaterialSlot::Normal,
        MaterialSlot::Specular,
        MaterialSlot::Glow,
        MaterialSlot::Alpha,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn key(self) -> &'static str {
        match self {
            MaterialSlot::Diffuse => "diffuse",
            MaterialSlot::Normal => "normal",
            MaterialSlot::Specular => "specular",
            MaterialSlot::Glow => "glow",
            MaterialSlot::Alpha => "alpha",
        }
    }
}

/// Image ids per slot plus an optional custom shader. Unset slots hold [`ResourceId::INVALID`].
///
/// The referenced ids are not checked by the store. They have to exist by the time a GPU
/// cache materializes the material.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Builder)]
pub struct MaterialDesc {
    #[builder(default)]
    pub diffuse: ResourceId,
    #[builder(default)]
    pub normal: ResourceId,
    #[builder(default)]
    pub specular: ResourceId,
    #[builder(default)]
    pub glow: ResourceId,
    #[builder(default)]
    pub alpha: ResourceId,
    #[builder(default)]
    pub shader: ResourceId,
}

impl Default for MaterialDesc {
    fn default() -> Self {
        MaterialDesc::builder().build()
    }
}

impl MaterialDesc {
    pub fn new(
        diffuse: ResourceId,
        normal: ResourceId,
        specular: ResourceId,
        glow: ResourceId,
        alpha: ResourceId,
        shader: ResourceId,
    ) -> Self {
        Self {
            diffuse,
            normal,
            specular,
            glow,
            alpha,
            shader,
        }
    }

    pub fn image(&self, slot: MaterialSlot) -> ResourceId {
        match slot {
            MaterialSlot::Diffuse => self.diffuse,
            MaterialSlot::Normal => self.normal,
            MaterialSlot::Specular => self.specular,
            MaterialSlot::Glow => self.glow,
            MaterialSlot::Alpha => self.alpha,
        }
    }

    pub fn set_image(&mut self, slot: MaterialSlot, id: ResourceId) {
        let field = match slot {
            MaterialSlot::Diffuse => &mut self.diffuse,
            MaterialSlot::Normal => &mut self.normal,
            MaterialSlot::Specular => &mut self.specular,
            MaterialSlot::Glow => &mut self.glow,
            MaterialSlot::Alpha => &mut self.alpha,
        };
        *field = id;
    }

    /// Every slot holding a valid image id.
    pub fn images(&self) -> impl Iterator<Item = (MaterialSlot, ResourceId)> + '_ {
        MaterialSlot::ALL
            .into_iter()
            .filter_map(|slot| self.image(slot).valid().map(|id| (slot, id)))
    }

    pub fn custom_shader(&self) -> Option<ResourceId> {
        self.shader.valid()
    }
}

impl StoreType for MaterialDesc {
    const KIND: ResourceKind = ResourceKind::Material;

    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}
