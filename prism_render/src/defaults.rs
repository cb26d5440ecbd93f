//! Fallback textures bound wherever a material leaves a slot unset.

use crate::backend::GraphicsBackend;
use crate::cache::Slot;
use crate::error::GpuError;
use parking_lot::RwLock;
use prism_asset::{ColorFormat, ImageData, MaterialSlot};
use std::sync::Arc;
use tracing::debug;

const DEFAULT_PIXELS: [(MaterialSlot, [u8; 4]); 5] = [
    (MaterialSlot::Diffuse, [255, 0, 255, 255]),
    (MaterialSlot::Normal, [128, 128, 255, 255]),
    (MaterialSlot::Specular, [0, 0, 0, 255]),
    (MaterialSlot::Glow, [0, 0, 0, 255]),
    (MaterialSlot::Alpha, [255, 255, 255, 255]),
];

/// One 1x1 texture per material slot, uploaded once when a cache is created.
///
/// A magenta diffuse makes missing textures obvious, the normal points straight out of the
/// surface, specular and glow contribute nothing and alpha is fully opaque.
pub struct DefaultAssetSet<B: GraphicsBackend> {
    textures: [Slot<B::Texture>; 5],
}

impl<B: GraphicsBackend> DefaultAssetSet<B> {
    pub fn new(backend: &B) -> Result<Self, GpuError> {
        let diffuse = Self::upload(backend, MaterialSlot::Diffuse)?;
        let normal = Self::upload(backend, MaterialSlot::Normal)?;
        let specular = Self::upload(backend, MaterialSlot::Specular)?;
        let glow = Self::upload(backend, MaterialSlot::Glow)?;
        let alpha = Self::upload(backend, MaterialSlot::Alpha)?;

        debug!("[Default Assets] Uploaded {} fallback textures", DEFAULT_PIXELS.len());

        Ok(Self {
            textures: [diffuse, normal, specular, glow, alpha],
        })
    }

    fn upload(backend: &B, slot: MaterialSlot) -> Result<Slot<B::Texture>, GpuError> {
        let label = format!("Default {}", slot.key());
        let texture = backend.upload_texture(&label, &Self::image(slot))?;
        Ok(Arc::new(RwLock::new(texture)))
    }

    /// The pixel data behind the default of `slot`.
    pub fn image(slot: MaterialSlot) -> ImageData {
        let (_, pixel) = DEFAULT_PIXELS[slot.index()];
        ImageData::filled(1, 1, &pixel, ColorFormat::Rgba32)
    }

    pub fn for_slot(&self, slot: MaterialSlot) -> &Slot<B::Texture> {
        &self.textures[slot.index()]
    }

    pub fn diffuse(&self) -> &Slot<B::Texture> {
        self.for_slot(MaterialSlot::Diffuse)
    }

    pub fn normal(&self) -> &Slot<B::Texture> {
        self.for_slot(MaterialSlot::Normal)
    }

    pub fn specular(&self) -> &Slot<B::Texture> {
        self.for_slot(MaterialSlot::Specular)
    }

    pub fn glow(&self) -> &Slot<B::Texture> {
        self.for_slot(MaterialSlot::Glow)
    }

    pub fn alpha(&self) -> &Slot<B::Texture> {
        self.for_slot(MaterialSlot::Alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::HeadlessBackend;

    #[test]
    fn pixels_follow_slot_order() {
        for (index, (slot, _)) in DEFAULT_PIXELS.iter().enumerate() {
            assert_eq!(slot.index(), index);
        }
    }

    #[test]
    fn uploads_one_rgba_pixel_per_slot() {
        let backend = HeadlessBackend::new();
        let defaults = DefaultAssetSet::new(&backend).unwrap();

        assert_eq!(backend.counters().texture_uploads, 5);

        let diffuse = defaults.diffuse().read();
        assert_eq!((diffuse.width, diffuse.height), (1, 1));
        assert_eq!(diffuse.rgba, vec![255, 0, 255, 255]);
        assert_eq!(diffuse.label, "Default diffuse");

        assert_eq!(defaults.normal().read().rgba, vec![128, 128, 255, 255]);
        assert_eq!(defaults.specular().read().rgba, vec![0, 0, 0, 255]);
        assert_eq!(defaults.glow().read().rgba, vec![0, 0, 0, 255]);
        assert_eq!(defaults.alpha().read().rgba, vec![255, 255, 255, 255]);
    }

    #[test]
    fn failed_upload_is_reported() {
        let backend = HeadlessBackend::new();
        backend.set_fail_uploads(true);

        assert!(matches!(
            DefaultAssetSet::new(&backend),
            Err(GpuError::Upload { .. })
        ));
    }
}
