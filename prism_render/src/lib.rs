//! GPU side of the prism renderer.
//!
//! A [`GpuResourceCache`] listens to a [`ResourceStore`](prism_asset::ResourceStore) and
//! keeps one GPU object per image, mesh, shader and material, built through a
//! [`GraphicsBackend`]. Materials resolve their unset slots against a [`DefaultAssetSet`].

pub mod backend;
pub mod cache;
pub mod defaults;
pub mod error;
pub mod settings;

pub use backend::{GraphicsBackend, HeadlessBackend, StageSet, WgpuBackend};
pub use cache::{CacheListener, CacheStats, GpuMaterial, GpuResourceCache, ResolvedMaterial, Slot};
pub use defaults::DefaultAssetSet;
pub use error::{GpuError, LookupError, ProtocolViolation};
pub use settings::{CacheSettings, DeletePolicy, ProtocolPolicy};

static_assertions::assert_impl_all!(GpuResourceCache<HeadlessBackend>: Send, Sync);
static_assertions::assert_impl_all!(GpuResourceCache<WgpuBackend>: Send, Sync);
static_assertions::assert_impl_all!(CacheListener<HeadlessBackend>: prism_asset::ResourceListener);
