//! Plain-old-data payloads held by the [`ResourceStore`](crate::store::ResourceStore).
//!
//! Nothing in here touches the GPU. A payload only references other resources by
//! [`ResourceId`](crate::ResourceId): materials name images and a shader, shaders name
//! the strings holding their stage sources.

pub mod image;
pub mod material;
pub mod mesh;
pub mod shader;

pub use self::image::{ColorFormat, ImageData};
pub use self::material::{MaterialDesc, MaterialSlot};
pub use self::mesh::{MeshBounds, MeshData, PrimitiveType};
pub use self::shader::{ShaderDesc, ShaderStage};
