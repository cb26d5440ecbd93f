//! The seam between the resource caches and a graphics API.
//!
//! A backend turns payloads into GPU objects and knows nothing about ids, events or the
//! store. [`WgpuBackend`] talks to a real device, [`HeadlessBackend`] keeps CPU copies
//! and is what tools and tests run on.

mod glsl;
mod headless;
mod wgpu_backend;

pub use glsl::parse_glsl;
pub use headless::{
    HeadlessBackend, HeadlessCounters, HeadlessMesh, HeadlessProgram, HeadlessStage,
    HeadlessTexture,
};
pub use wgpu_backend::{BackendSetupError, GpuMesh, GpuProgram, GpuStage, GpuTexture, WgpuBackend};

use crate::error::GpuError;
use prism_asset::{ImageData, MeshData, ShaderStage};

pub trait GraphicsBackend: Send + Sync + 'static {
    type Texture: Send + Sync;
    type Mesh: Send + Sync;
    type Stage: Send + Sync;
    type Program: Send + Sync;

    fn upload_texture(&self, label: &str, image: &ImageData) -> Result<Self::Texture, GpuError>;

    /// Re-initializes `texture` from `image`, keeping the object itself alive.
    fn reinit_texture(
        &self,
        texture: &mut Self::Texture,
        image: &ImageData,
    ) -> Result<(), GpuError>;

    fn upload_mesh(&self, label: &str, mesh: &MeshData) -> Result<Self::Mesh, GpuError>;

    fn reinit_mesh(&self, mesh: &mut Self::Mesh, data: &MeshData) -> Result<(), GpuError>;

    fn compile_stage(
        &self,
        label: &str,
        stage: ShaderStage,
        source: &str,
    ) -> Result<Self::Stage, GpuError>;

    fn link_program(
        &self,
        label: &str,
        stages: &StageSet<'_, Self::Stage>,
    ) -> Result<Self::Program, GpuError>;
}

/// Compiled stages handed to [`GraphicsBackend::link_program`], at most one per stage.
pub struct StageSet<'a, S> {
    stages: [Option<&'a S>; 5],
}

fn stage_index(stage: ShaderStage) -> usize {
    match stage {
        ShaderStage::Vertex => 0,
        ShaderStage::TessControl => 1,
        ShaderStage::TessEvaluation => 2,
        ShaderStage::Geometry => 3,
        ShaderStage::Fragment => 4,
    }
}

impl<'a, S> StageSet<'a, S> {
    pub fn new() -> Self {
        Self {
            stages: [None; 5],
        }
    }

    pub fn insert(&mut self, stage: ShaderStage, compiled: &'a S) {
        self.stages[stage_index(stage)] = Some(compiled);
    }

    pub fn get(&self, stage: ShaderStage) -> Option<&'a S> {
        self.stages[stage_index(stage)]
    }

    pub fn contains(&self, stage: ShaderStage) -> bool {
        self.get(stage).is_some()
    }

    /// Set stages in pipeline order.
    pub fn iter(&self) -> impl Iterator<Item = (ShaderStage, &'a S)> + '_ {
        ShaderStage::ALL
            .into_iter()
            .filter_map(|stage| self.get(stage).map(|s| (stage, s)))
    }

    pub fn len(&self) -> usize {
        self.stages.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The first mandatory stage that is not set.
    pub fn missing_mandatory(&self) -> Option<ShaderStage> {
        ShaderStage::ALL
            .into_iter()
            .find(|stage| stage.is_mandatory() && !self.contains(*stage))
    }
}

impl<S> Default for StageSet<'_, S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_set_reports_missing_mandatory_stages() {
        let vertex = "vs";
        let geometry = "gs";

        let mut set = StageSet::new();
        assert_eq!(set.missing_mandatory(), Some(ShaderStage::Vertex));

        set.insert(ShaderStage::Geometry, &geometry);
        set.insert(ShaderStage::Vertex, &vertex);
        assert_eq!(set.missing_mandatory(), Some(ShaderStage::Fragment));
        assert_eq!(
            set.iter().map(|(stage, _)| stage).collect::<Vec<_>>(),
            vec![ShaderStage::Vertex, ShaderStage::Geometry]
        );
        assert_eq!(set.len(), 2);
    }
}
