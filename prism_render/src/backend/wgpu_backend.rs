use super::{GraphicsBackend, StageSet, parse_glsl};
use crate::error::{GpuError, MissingStageSnafu, UnsupportedFormatSnafu, UnsupportedStageSnafu};
use futures::executor::block_on;
use prism_asset::{ColorFormat, ImageData, MeshData, ShaderStage};
use snafu::{OptionExt, ResultExt, Snafu, ensure};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, info, trace};
use wgpu::util::{BufferInitDescriptor, DeviceExt, TextureDataOrder};
use wgpu::{
    AddressMode, Buffer, BufferUsages, Device, DeviceDescriptor, ExperimentalFeatures, Extent3d,
    Features, FilterMode, Instance, InstanceDescriptor, Limits, MemoryHints, Origin3d,
    PowerPreference, Queue, RequestAdapterError, RequestAdapterOptions, RequestDeviceError,
    Sampler, SamplerDescriptor, ShaderModule, ShaderModuleDescriptor, ShaderSource,
    TexelCopyBufferLayout, TexelCopyTextureInfo, Texture, TextureAspect, TextureDescriptor,
    TextureDimension, TextureFormat, TextureUsages, TextureView, TextureViewDescriptor,
    VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode,
};

#[derive(Debug, Snafu)]
#[snafu(context(suffix(Err)))]
pub enum BackendSetupError {
    #[snafu(display("Unable to find a graphics adapter: {source}"))]
    RequestAdapter { source: RequestAdapterError },

    #[snafu(display("Unable to get device: {source}"))]
    RequestDevice { source: RequestDeviceError },
}

/// The [`GraphicsBackend`] of the renderer, on top of a wgpu device.
pub struct WgpuBackend {
    device: Arc<Device>,
    queue: Arc<Queue>,
}

#[derive(Debug)]
pub struct GpuTexture {
    pub texture: Texture,
    pub view: TextureView,
    pub sampler: Sampler,
    pub format: TextureFormat,
    pub size: Extent3d,
    label: String,
}

#[derive(Debug)]
pub struct GpuMesh {
    pub positions: Buffer,
    pub normals: Option<Buffer>,
    pub uvs: Option<Buffer>,
    pub indices: Option<Buffer>,
    pub vertex_count: u32,
    pub index_count: u32,
    label: String,
}

#[derive(Debug, Clone)]
pub struct GpuStage {
    pub module: ShaderModule,
    pub stage: ShaderStage,
    pub entry_point: String,
}

/// The shader modules of a linked program, ready to be put into a pipeline.
#[derive(Debug, Clone)]
pub struct GpuProgram {
    pub label: String,
    pub vertex: GpuStage,
    pub fragment: GpuStage,
}

const POSITION_ATTRIBUTES: [VertexAttribute; 1] = [VertexAttribute {
    format: VertexFormat::Float32x3,
    offset: 0,
    shader_location: 0,
}];

const NORMAL_ATTRIBUTES: [VertexAttribute; 1] = [VertexAttribute {
    format: VertexFormat::Float32x3,
    offset: 0,
    shader_location: 1,
}];

const UV_ATTRIBUTES: [VertexAttribute; 1] = [VertexAttribute {
    format: VertexFormat::Float32x2,
    offset: 0,
    shader_location: 2,
}];

impl GpuMesh {
    /// One buffer per attribute: position at location 0, normal at 1, uv at 2.
    pub fn vertex_layouts(&self) -> Vec<VertexBufferLayout<'static>> {
        let layout = |stride: usize, attributes: &'static [VertexAttribute]| VertexBufferLayout {
            array_stride: (stride * size_of::<f32>()) as u64,
            step_mode: VertexStepMode::Vertex,
            attributes,
        };

        let mut layouts = vec![layout(3, &POSITION_ATTRIBUTES)];
        if self.normals.is_some() {
            layouts.push(layout(3, &NORMAL_ATTRIBUTES));
        }
        if self.uvs.is_some() {
            layouts.push(layout(2, &UV_ATTRIBUTES));
        }
        layouts
    }
}

/// The texel layout an image is uploaded with and its bytes in that layout.
fn texel_data(image: &ImageData) -> Result<(TextureFormat, u32, Cow<'_, [u8]>), GpuError> {
    match image.format {
        ColorFormat::GreyScale8 => Ok((TextureFormat::R8Unorm, 1, Cow::Borrowed(&image.bytes))),
        ColorFormat::Rgb24 => Ok((TextureFormat::Rgba8Unorm, 4, Cow::Owned(image.to_rgba()))),
        ColorFormat::Rgba32 => Ok((
            TextureFormat::Rgba8UnormSrgb,
            4,
            Cow::Borrowed(&image.bytes),
        )),
        ColorFormat::Invalid => UnsupportedFormatSnafu {
            format: image.format,
        }
        .fail(),
    }
}

impl WgpuBackend {
    pub fn new(device: Arc<Device>, queue: Arc<Queue>) -> Self {
        Self { device, queue }
    }

    /// A backend on the best adapter available, without any surface.
    pub fn request_headless() -> Result<Self, BackendSetupError> {
        block_on(Self::request_headless_async())
    }

    pub async fn request_headless_async() -> Result<Self, BackendSetupError> {
        let instance = Instance::new(&InstanceDescriptor::from_env_or_default());
        let adapter = instance
            .request_adapter(&RequestAdapterOptions {
                power_preference: PowerPreference::HighPerformance,
                compatible_surface: None,
                ..RequestAdapterOptions::default()
            })
            .await
            .context(RequestAdapterErr)?;

        info!("Selected adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&DeviceDescriptor {
                label: Some("Resource Cache Device"),
                required_features: Features::default(),
                required_limits: Limits::default(),
                experimental_features: ExperimentalFeatures::disabled(),
                memory_hints: MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context(RequestDeviceErr)?;

        Ok(Self::new(Arc::new(device), Arc::new(queue)))
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    fn create_texture(
        &self,
        label: &str,
        image: &ImageData,
    ) -> Result<(Texture, TextureView, TextureFormat, Extent3d), GpuError> {
        let (format, _, data) = texel_data(image)?;
        let size = Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };

        let texture = self.device.create_texture_with_data(
            &self.queue,
            &TextureDescriptor {
                label: Some(label),
                size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: TextureDimension::D2,
                format,
                usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
                view_formats: &[],
            },
            TextureDataOrder::LayerMajor,
            &data,
        );
        let view = texture.create_view(&TextureViewDescriptor::default());

        Ok((texture, view, format, size))
    }

    fn vertex_buffer(&self, label: &str, data: &[f32]) -> Buffer {
        self.device.create_buffer_init(&BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(data),
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
        })
    }
}

impl GraphicsBackend for WgpuBackend {
    type Texture = GpuTexture;
    type Mesh = GpuMesh;
    type Stage = GpuStage;
    type Program = GpuProgram;

    fn upload_texture(&self, label: &str, image: &ImageData) -> Result<Self::Texture, GpuError> {
        let (texture, view, format, size) = self.create_texture(label, image)?;
        let sampler = self.device.create_sampler(&SamplerDescriptor {
            label: Some(label),
            address_mode_u: AddressMode::Repeat,
            address_mode_v: AddressMode::Repeat,
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            ..SamplerDescriptor::default()
        });

        trace!("Uploaded texture {label} ({}x{} {format:?})", size.width, size.height);

        Ok(GpuTexture {
            texture,
            view,
            sampler,
            format,
            size,
            label: label.to_string(),
        })
    }

    fn reinit_texture(
        &self,
        texture: &mut Self::Texture,
        image: &ImageData,
    ) -> Result<(), GpuError> {
        let (format, texel_size, data) = texel_data(image)?;
        let size = Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };

        if format == texture.format && size == texture.size {
            self.queue.write_texture(
                TexelCopyTextureInfo {
                    texture: &texture.texture,
                    mip_level: 0,
                    origin: Origin3d::ZERO,
                    aspect: TextureAspect::All,
                },
                &data,
                TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(texel_size * image.width),
                    rows_per_image: Some(image.height),
                },
                size,
            );
            return Ok(());
        }

        debug!("Recreating texture {}, its layout changed", texture.label);
        let (new_texture, view, format, size) = self.create_texture(&texture.label, image)?;
        texture.texture = new_texture;
        texture.view = view;
        texture.format = format;
        texture.size = size;
        Ok(())
    }

    fn upload_mesh(&self, label: &str, mesh: &MeshData) -> Result<Self::Mesh, GpuError> {
        let positions = self.vertex_buffer(label, &mesh.vertices);
        let normals = mesh.normals.as_deref().map(|n| self.vertex_buffer(label, n));
        let uvs = mesh.uvs.as_deref().map(|uv| self.vertex_buffer(label, uv));
        let indices = mesh.indices.as_deref().map(|indices| {
            self.device.create_buffer_init(&BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(indices),
                usage: BufferUsages::INDEX,
            })
        });

        Ok(GpuMesh {
            positions,
            normals,
            uvs,
            indices,
            vertex_count: mesh.vertex_count() as u32,
            index_count: mesh.index_count() as u32,
            label: label.to_string(),
        })
    }

    fn reinit_mesh(&self, mesh: &mut Self::Mesh, data: &MeshData) -> Result<(), GpuError> {
        *mesh = self.upload_mesh(&mesh.label, data)?;
        Ok(())
    }

    fn compile_stage(
        &self,
        label: &str,
        stage: ShaderStage,
        source: &str,
    ) -> Result<Self::Stage, GpuError> {
        ensure!(stage.is_mandatory(), UnsupportedStageSnafu { stage });

        let module = parse_glsl(label, stage, source)?;
        let entry_point = module
            .entry_points
            .first()
            .map_or_else(|| "main".to_string(), |e| e.name.clone());

        let module = self.device.create_shader_module(ShaderModuleDescriptor {
            label: Some(label),
            source: ShaderSource::Naga(Cow::Owned(module)),
        });

        Ok(GpuStage {
            module,
            stage,
            entry_point,
        })
    }

    fn link_program(
        &self,
        label: &str,
        stages: &StageSet<'_, Self::Stage>,
    ) -> Result<Self::Program, GpuError> {
        let vertex = stages.get(ShaderStage::Vertex).context(MissingStageSnafu {
            label,
            stage: ShaderStage::Vertex,
        })?;
        let fragment = stages.get(ShaderStage::Fragment).context(MissingStageSnafu {
            label,
            stage: ShaderStage::Fragment,
        })?;

        Ok(GpuProgram {
            label: label.to_string(),
            vertex: vertex.clone(),
            fragment: fragment.clone(),
        })
    }
}
