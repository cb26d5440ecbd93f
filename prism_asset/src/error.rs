use crate::assets::{ColorFormat, PrimitiveType, ShaderStage};
use snafu::Snafu;

/// Why a payload was rejected by the store.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ValidationError {
    #[snafu(display("The mesh has no vertices"))]
    EmptyVertices,

    #[snafu(display("The vertex list holds {floats} floats, which is not a multiple of 3"))]
    VertexStride { floats: usize },

    #[snafu(display("Primitive type {primitive:?} is not supported"))]
    UnsupportedPrimitive { primitive: PrimitiveType },

    #[snafu(display("Expected {expected} normal floats, got {actual}"))]
    NormalCount { expected: usize, actual: usize },

    #[snafu(display("Expected {expected} uv floats, got {actual}"))]
    UvCount { expected: usize, actual: usize },

    #[snafu(display("Index {index} is out of range for {vertex_count} vertices"))]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[snafu(display("Color format {format:?} cannot hold pixel data"))]
    InvalidFormat { format: ColorFormat },

    #[snafu(display("Image dimensions {width}x{height} are empty"))]
    ZeroSize { width: u32, height: u32 },

    #[snafu(display("Expected {expected} bytes for the image, got {actual}"))]
    ImageSize { expected: usize, actual: usize },

    #[snafu(display("The mandatory {stage:?} stage is not set"))]
    MissingStage { stage: ShaderStage },
}
