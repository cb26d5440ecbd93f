//! Filling a [`ResourceStore`](crate::ResourceStore) from disk.
//!
//! The [`FileResourceLoader`] memoizes every path it has loaded successfully, so loading
//! the same file twice hands out the same id and leaves the store untouched.

mod descriptor;
mod error;
mod file_loader;
mod ini;
mod mesh_formats;

pub use descriptor::{MaterialFile, ShaderFile};
pub use error::LoadError;
pub use file_loader::FileResourceLoader;
pub use ini::{IniDocument, IniError};
pub use mesh_formats::{ObjMeshError, TriError, mesh_from_obj, mesh_from_tri};
