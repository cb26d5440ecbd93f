//! A backend without a device.
//!
//! Uploads keep CPU copies of what a real backend would send to the GPU. Vertex and
//! fragment stages still go through the naga GLSL front end, so shader errors surface
//! exactly as they would with [`WgpuBackend`](super::WgpuBackend).

use super::{GraphicsBackend, StageSet, parse_glsl};
use crate::error::{CompileSnafu, GpuError, MissingStageSnafu, UnsupportedFormatSnafu, UploadSnafu};
use prism_asset::{ColorFormat, ImageData, MeshBounds, MeshData, ShaderStage};
use snafu::ensure;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessTexture {
    pub label: String,
    pub width: u32,
    pub height: u32,
    pub format: ColorFormat,
    pub rgba: Vec<u8>,
    /// Bumped on every re-initialization.
    pub generation: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessMesh {
    pub label: String,
    pub vertex_count: usize,
    pub index_count: usize,
    pub has_normals: bool,
    pub has_uvs: bool,
    pub bounds: Option<MeshBounds>,
    pub generation: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessStage {
    pub label: String,
    pub stage: ShaderStage,
    pub entry_points: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessProgram {
    pub label: String,
    pub stages: Vec<ShaderStage>,
}

/// Snapshot of what a [`HeadlessBackend`] was asked to do.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct HeadlessCounters {
    pub texture_uploads: usize,
    pub texture_reinits: usize,
    pub mesh_uploads: usize,
    pub mesh_reinits: usize,
    pub compiles: usize,
    pub links: usize,
}

#[derive(Debug, Default)]
pub struct HeadlessBackend {
    texture_uploads: AtomicUsize,
    texture_reinits: AtomicUsize,
    mesh_uploads: AtomicUsize,
    mesh_reinits: AtomicUsize,
    compiles: AtomicUsize,
    links: AtomicUsize,

    fail_uploads: AtomicBool,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counters(&self) -> HeadlessCounters {
        HeadlessCounters {
            texture_uploads: self.texture_uploads.load(Ordering::Relaxed),
            texture_reinits: self.texture_reinits.load(Ordering::Relaxed),
            mesh_uploads: self.mesh_uploads.load(Ordering::Relaxed),
            mesh_reinits: self.mesh_reinits.load(Ordering::Relaxed),
            compiles: self.compiles.load(Ordering::Relaxed),
            links: self.links.load(Ordering::Relaxed),
        }
    }

    /// Makes every following texture and mesh upload fail, as an exhausted device would.
    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::Relaxed);
    }

    fn check_upload(&self, label: &str) -> Result<(), GpuError> {
        ensure!(
            !self.fail_uploads.load(Ordering::Relaxed),
            UploadSnafu {
                label,
                reason: "uploads are disabled on this backend",
            }
        );
        Ok(())
    }

    fn texture_from(label: &str, image: &ImageData) -> Result<HeadlessTexture, GpuError> {
        ensure!(
            image.format != ColorFormat::Invalid,
            UnsupportedFormatSnafu {
                format: image.format
            }
        );

        Ok(HeadlessTexture {
            label: label.to_string(),
            width: image.width,
            height: image.height,
            format: image.format,
            rgba: image.to_rgba(),
            generation: 0,
        })
    }

    fn mesh_from(label: &str, mesh: &MeshData) -> HeadlessMesh {
        HeadlessMesh {
            label: label.to_string(),
            vertex_count: mesh.vertex_count(),
            index_count: mesh.index_count(),
            has_normals: mesh.normals.is_some(),
            has_uvs: mesh.uvs.is_some(),
            bounds: mesh.bounds(),
            generation: 0,
        }
    }
}

impl GraphicsBackend for HeadlessBackend {
    type Texture = HeadlessTexture;
    type Mesh = HeadlessMesh;
    type Stage = HeadlessStage;
    type Program = HeadlessProgram;

    fn upload_texture(&self, label: &str, image: &ImageData) -> Result<Self::Texture, GpuError> {
        self.check_upload(label)?;
        let texture = Self::texture_from(label, image)?;
        self.texture_uploads.fetch_add(1, Ordering::Relaxed);
        Ok(texture)
    }

    fn reinit_texture(
        &self,
        texture: &mut Self::Texture,
        image: &ImageData,
    ) -> Result<(), GpuError> {
        self.check_upload(&texture.label)?;
        let generation = texture.generation + 1;
        *texture = Self::texture_from(&texture.label, image)?;
        texture.generation = generation;
        self.texture_reinits.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn upload_mesh(&self, label: &str, mesh: &MeshData) -> Result<Self::Mesh, GpuError> {
        self.check_upload(label)?;
        self.mesh_uploads.fetch_add(1, Ordering::Relaxed);
        Ok(Self::mesh_from(label, mesh))
    }

    fn reinit_mesh(&self, mesh: &mut Self::Mesh, data: &MeshData) -> Result<(), GpuError> {
        self.check_upload(&mesh.label)?;
        let generation = mesh.generation + 1;
        *mesh = Self::mesh_from(&mesh.label, data);
        mesh.generation = generation;
        self.mesh_reinits.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn compile_stage(
        &self,
        label: &str,
        stage: ShaderStage,
        source: &str,
    ) -> Result<Self::Stage, GpuError> {
        let entry_points = if stage.is_mandatory() {
            let module = parse_glsl(label, stage, source)?;
            module.entry_points.iter().map(|e| e.name.clone()).collect()
        } else {
            ensure!(
                !source.trim().is_empty(),
                CompileSnafu {
                    label,
                    stage,
                    diagnostic: "the source is empty",
                }
            );
            vec!["main".to_string()]
        };

        self.compiles.fetch_add(1, Ordering::Relaxed);
        Ok(HeadlessStage {
            label: label.to_string(),
            stage,
            entry_points,
        })
    }

    fn link_program(
        &self,
        label: &str,
        stages: &StageSet<'_, Self::Stage>,
    ) -> Result<Self::Program, GpuError> {
        if let Some(stage) = stages.missing_mandatory() {
            return MissingStageSnafu { label, stage }.fail();
        }

        self.links.fetch_add(1, Ordering::Relaxed);
        Ok(HeadlessProgram {
            label: label.to_string(),
            stages: stages.iter().map(|(stage, _)| stage).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reinit_bumps_the_generation() {
        let backend = HeadlessBackend::new();
        let image = ImageData::filled(1, 1, &[9], ColorFormat::GreyScale8);

        let mut texture = backend.upload_texture("Image #0", &image).unwrap();
        assert_eq!(texture.rgba, vec![9, 9, 9, 255]);

        let bigger = ImageData::filled(2, 1, &[1, 2, 3, 4], ColorFormat::Rgba32);
        backend.reinit_texture(&mut texture, &bigger).unwrap();

        assert_eq!(texture.generation, 1);
        assert_eq!(texture.width, 2);
        assert_eq!(texture.label, "Image #0");
        assert_eq!(backend.counters().texture_reinits, 1);
    }

    #[test]
    fn failing_uploads() {
        let backend = HeadlessBackend::new();
        backend.set_fail_uploads(true);

        let mesh = MeshData::builder(vec![0.0; 9]).build();
        assert!(matches!(
            backend.upload_mesh("Mesh #0", &mesh),
            Err(GpuError::Upload { .. })
        ));
        assert_eq!(backend.counters().mesh_uploads, 0);
    }

    #[test]
    fn optional_stages_need_a_source() {
        let backend = HeadlessBackend::new();
        assert!(
            backend
                .compile_stage("gs", ShaderStage::Geometry, "layout(points) in;")
                .is_ok()
        );
        assert!(
            backend
                .compile_stage("gs", ShaderStage::Geometry, "  \n")
                .is_err()
        );
    }
}
