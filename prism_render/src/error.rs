use prism_asset::{ColorFormat, EventKind, ResourceId, ResourceKind, ShaderStage};
use snafu::Snafu;

/// Failure reported by a [`GraphicsBackend`](crate::backend::GraphicsBackend).
///
/// These are logged by the cache and never leave event handling.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum GpuError {
    #[snafu(display("Failed to compile the {} stage of {label}:\n{diagnostic}", stage.key()))]
    Compile {
        label: String,
        stage: ShaderStage,
        diagnostic: String,
    },

    #[snafu(display("Failed to link {label}: {reason}"))]
    Link { label: String, reason: String },

    #[snafu(display("{label} has no {} stage", stage.key()))]
    MissingStage { label: String, stage: ShaderStage },

    #[snafu(display("The {} stage is not supported by this backend", stage.key()))]
    UnsupportedStage { stage: ShaderStage },

    #[snafu(display("Color format {format:?} cannot be uploaded"))]
    UnsupportedFormat { format: ColorFormat },

    #[snafu(display("Failed to upload {label}: {reason}"))]
    Upload { label: String, reason: String },
}

/// A broken create-before-reference precondition between the store and a cache.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ProtocolViolation {
    #[snafu(display("Received {change:?} for {kind} {id}, but the store holds no payload for it"))]
    MissingPayload {
        kind: ResourceKind,
        id: ResourceId,
        change: EventKind,
    },

    #[snafu(display("Received a second Create for {kind} {id}"))]
    DuplicateCreate { kind: ResourceKind, id: ResourceId },

    #[snafu(display("{kind} {id} references {dependency_kind} {dependency}, which is not available"))]
    MissingDependency {
        kind: ResourceKind,
        id: ResourceId,
        dependency_kind: ResourceKind,
        dependency: ResourceId,
    },

    #[snafu(display("{kind} {id} was looked up, but it is not cached"))]
    NotCached { kind: ResourceKind, id: ResourceId },
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum LookupError {
    #[snafu(display("{kind} {id} is not cached"))]
    NotFound { kind: ResourceKind, id: ResourceId },
}
