mod generic_cache;

mod listener;
mod material;
mod mesh;
mod resource_cache;
mod shader;
mod texture;

pub use self::generic_cache::Slot;
pub use self::listener::CacheListener;
pub use self::material::{GpuMaterial, ResolvedMaterial};
pub use self::resource_cache::{CacheStats, GpuResourceCache};
