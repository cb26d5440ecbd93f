//! Resource side of the prism renderer.
//!
//! Payloads live in a [`ResourceStore`], addressed by [`ResourceId`]s. Every mutation is
//! announced to the registered [`ResourceListener`]s, which is how the GPU caches learn
//! what to build. The [`FileResourceLoader`] fills the store from disk.

pub mod assets;
pub mod error;
pub mod event;
pub mod id;
pub mod loader;
pub mod store;

pub use assets::{
    ColorFormat, ImageData, MaterialDesc, MaterialSlot, MeshBounds, MeshData, PrimitiveType,
    ShaderDesc, ShaderStage,
};
pub use error::ValidationError;
pub use event::{EventKind, ResourceEvent, ResourceKind};
pub use id::ResourceId;
pub use loader::{FileResourceLoader, LoadError};
pub use store::{ResourceListener, ResourceStore, Store, StoreType};
