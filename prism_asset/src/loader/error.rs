use super::ini::IniError;
use super::mesh_formats::TriError;
use crate::assets::ShaderStage;
use crate::error::ValidationError;
use obj::ObjError;
use snafu::Snafu;
use std::path::PathBuf;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum LoadError {
    #[snafu(display("Failed to read {}: {source}", path.display()))]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Failed to decode image {}: {source}", path.display()))]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },

    #[snafu(display("Failed to parse OBJ file {}: {source}", path.display()))]
    Obj { path: PathBuf, source: ObjError },

    #[snafu(display("OBJ file {} references missing {attribute} #{index}", path.display()))]
    ObjIndex {
        path: PathBuf,
        attribute: &'static str,
        index: usize,
    },

    #[snafu(display("Failed to parse triangle file {}: {source}", path.display()))]
    Tri { path: PathBuf, source: TriError },

    #[snafu(display("Failed to parse descriptor {}: {source}", path.display()))]
    Ini { path: PathBuf, source: IniError },

    #[snafu(display("Failed to parse descriptor {}: {source}", path.display()))]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[snafu(display("No loader handles the extension of {}", path.display()))]
    UnsupportedExtension { path: PathBuf },

    #[snafu(display("Cannot load {} as an image without a valid color format", path.display()))]
    InvalidFormat { path: PathBuf },

    #[snafu(display("Shader program {} does not name a {} stage", path.display(), stage.key()))]
    MissingStage { path: PathBuf, stage: ShaderStage },

    #[snafu(display("{} depends on {}, which failed to load", path.display(), dependency.display()))]
    Dependency {
        path: PathBuf,
        dependency: PathBuf,
        #[snafu(source(from(LoadError, Box::new)))]
        source: Box<LoadError>,
    },

    #[snafu(display("The store rejected the contents of {}: {source}", path.display()))]
    Rejected {
        path: PathBuf,
        source: ValidationError,
    },
}

impl LoadError {
    /// The file the failure was reported for.
    pub fn path(&self) -> &PathBuf {
        match self {
            LoadError::Io { path, .. }
            | LoadError::Image { path, .. }
            | LoadError::Obj { path, .. }
            | LoadError::ObjIndex { path, .. }
            | LoadError::Tri { path, .. }
            | LoadError::Ini { path, .. }
            | LoadError::Json { path, .. }
            | LoadError::UnsupportedExtension { path }
            | LoadError::InvalidFormat { path }
            | LoadError::MissingStage { path, .. }
            | LoadError::Dependency { path, .. }
            | LoadError::Rejected { path, .. } => path,
        }
    }
}
