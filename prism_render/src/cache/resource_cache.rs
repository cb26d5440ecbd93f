//! A cache of GPU objects, materialized from [`ResourceStore`] events.
//!
//! The cache never scans the store. It learns about resources through
//! [`GpuResourceCache::handle_event`] (usually via a [`CacheListener`](super::CacheListener))
//! and only queries the store for the payload an event names and that payload's
//! dependencies. Dependencies have to be created before the resources that reference
//! them, anything else is a [`ProtocolViolation`].

use super::generic_cache::{Cache, Slot};
use super::material::GpuMaterial;
use crate::backend::GraphicsBackend;
use crate::defaults::DefaultAssetSet;
use crate::error::{GpuError, LookupError, ProtocolViolation};
use crate::settings::{CacheSettings, DeletePolicy, ProtocolPolicy};
use dashmap::DashMap;
use parking_lot::Mutex;
use prism_asset::{ResourceEvent, ResourceId, ResourceKind, ResourceStore, ShaderStage};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, error, trace};

/// Running totals of the work a cache did.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub uploads: usize,
    pub reinits: usize,
    pub compiles: usize,
    pub links: usize,
    pub failures: usize,
    pub evictions: usize,
}

#[derive(Debug, Default)]
pub(crate) struct StatCounters {
    pub(crate) uploads: AtomicUsize,
    pub(crate) reinits: AtomicUsize,
    pub(crate) compiles: AtomicUsize,
    pub(crate) links: AtomicUsize,
    pub(crate) failures: AtomicUsize,
    pub(crate) evictions: AtomicUsize,
}

impl StatCounters {
    #[inline]
    pub(crate) fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> CacheStats {
        CacheStats {
            uploads: self.uploads.load(Ordering::Relaxed),
            reinits: self.reinits.load(Ordering::Relaxed),
            compiles: self.compiles.load(Ordering::Relaxed),
            links: self.links.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}

pub struct GpuResourceCache<B: GraphicsBackend> {
    pub(crate) backend: B,
    pub(crate) settings: CacheSettings,

    pub(crate) textures: Cache<B::Texture>,
    pub(crate) meshes: Cache<B::Mesh>,
    pub(crate) programs: Cache<B::Program>,
    pub(crate) materials: Cache<GpuMaterial<B>>,
    /// Compiled stages, shared between every program built from the same source.
    pub(crate) stages: DashMap<(ResourceId, ShaderStage), Arc<B::Stage>>,

    defaults: DefaultAssetSet<B>,
    pub(crate) stats: StatCounters,
    violations: Mutex<Vec<ProtocolViolation>>,
}

impl<B: GraphicsBackend> GpuResourceCache<B> {
    /// Creates an empty cache and uploads the default textures.
    pub fn new(backend: B, settings: CacheSettings) -> Result<Self, GpuError> {
        let defaults = settings
            .log_sink
            .scope(|| DefaultAssetSet::new(&backend))?;

        Ok(Self {
            backend,
            settings,
            textures: Cache::new("Texture"),
            meshes: Cache::new("Mesh"),
            programs: Cache::new("Program"),
            materials: Cache::new("Material"),
            stages: DashMap::new(),
            defaults,
            stats: StatCounters::default(),
            violations: Mutex::new(Vec::new()),
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    pub fn defaults(&self) -> &DefaultAssetSet<B> {
        &self.defaults
    }

    /// Builds, re-initializes or drops the GPU object `event` names.
    pub fn handle_event(&self, store: &ResourceStore, event: ResourceEvent) {
        self.settings.log_sink.scope(|| {
            trace!("[Resource Cache] Handling {event}");

            match event.kind {
                ResourceKind::Image => self.on_image(store, event),
                ResourceKind::Mesh => self.on_mesh(store, event),
                ResourceKind::String => self.on_string(event),
                ResourceKind::Shader => self.on_shader(store, event),
                ResourceKind::Material => self.on_material(store, event),
            }
        })
    }

    /// Applies the delete policy to `cache`.
    pub(crate) fn on_delete<T>(&self, cache: &Cache<T>, id: ResourceId) {
        match self.settings.delete_policy {
            DeletePolicy::Retain => {
                debug!("[{} Cache] Retaining {id} after its deletion", cache.name());
            }
            DeletePolicy::Evict => {
                if cache.remove(id).is_some() {
                    StatCounters::bump(&self.stats.evictions);
                }
            }
        }
    }

    pub(crate) fn report_failure(&self, kind: ResourceKind, id: ResourceId, e: &GpuError) {
        StatCounters::bump(&self.stats.failures);
        error!("Failed to materialize {kind} {id}: {e}");
    }

    /// Panics in strict mode, records `violation` otherwise.
    pub(crate) fn violation(&self, violation: ProtocolViolation) {
        match self.settings.protocol {
            ProtocolPolicy::Strict => panic!("Resource protocol violation: {violation}"),
            ProtocolPolicy::Relaxed => {
                error!("Resource protocol violation: {violation}");
                self.violations.lock().push(violation);
            }
        }
    }

    /// Every violation recorded so far. Always empty in strict mode.
    pub fn violations(&self) -> Vec<ProtocolViolation> {
        self.violations.lock().clone()
    }

    pub fn clear_violations(&self) {
        self.violations.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    /// Number of cached GPU objects of `kind`. Strings never have one.
    pub fn len(&self, kind: ResourceKind) -> usize {
        match kind {
            ResourceKind::Image => self.textures.len(),
            ResourceKind::Mesh => self.meshes.len(),
            ResourceKind::Shader => self.programs.len(),
            ResourceKind::Material => self.materials.len(),
            ResourceKind::String => 0,
        }
    }

    pub fn is_cached(&self, kind: ResourceKind, id: ResourceId) -> bool {
        match kind {
            ResourceKind::Image => self.textures.contains(id),
            ResourceKind::Mesh => self.meshes.contains(id),
            ResourceKind::Shader => self.programs.contains(id),
            ResourceKind::Material => self.materials.contains(id),
            ResourceKind::String => false,
        }
    }

    /// Number of compiled stages kept for reuse.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    fn lookup<T>(&self, cache: &Cache<T>, kind: ResourceKind, id: ResourceId) -> Option<Slot<T>> {
        match Self::try_lookup(cache, kind, id) {
            Ok(slot) => slot,
            Err(LookupError::NotFound { kind, id }) => {
                self.settings
                    .log_sink
                    .scope(|| self.violation(ProtocolViolation::NotCached { kind, id }));
                None
            }
        }
    }

    fn try_lookup<T>(
        cache: &Cache<T>,
        kind: ResourceKind,
        id: ResourceId,
    ) -> Result<Option<Slot<T>>, LookupError> {
        if !id.is_valid() {
            return Ok(None);
        }
        cache
            .get(id)
            .map(Some)
            .ok_or(LookupError::NotFound { kind, id })
    }

    /// The texture of Image `id`. [`ResourceId::INVALID`] yields `None`, an uncached id is a
    /// protocol violation.
    pub fn texture(&self, id: ResourceId) -> Option<Slot<B::Texture>> {
        self.lookup(&self.textures, ResourceKind::Image, id)
    }

    pub fn mesh(&self, id: ResourceId) -> Option<Slot<B::Mesh>> {
        self.lookup(&self.meshes, ResourceKind::Mesh, id)
    }

    pub fn program(&self, id: ResourceId) -> Option<Slot<B::Program>> {
        self.lookup(&self.programs, ResourceKind::Shader, id)
    }

    pub fn material(&self, id: ResourceId) -> Option<Slot<GpuMaterial<B>>> {
        self.lookup(&self.materials, ResourceKind::Material, id)
    }

    pub fn try_texture(&self, id: ResourceId) -> Result<Option<Slot<B::Texture>>, LookupError> {
        Self::try_lookup(&self.textures, ResourceKind::Image, id)
    }

    pub fn try_mesh(&self, id: ResourceId) -> Result<Option<Slot<B::Mesh>>, LookupError> {
        Self::try_lookup(&self.meshes, ResourceKind::Mesh, id)
    }

    pub fn try_program(&self, id: ResourceId) -> Result<Option<Slot<B::Program>>, LookupError> {
        Self::try_lookup(&self.programs, ResourceKind::Shader, id)
    }

    pub fn try_material(
        &self,
        id: ResourceId,
    ) -> Result<Option<Slot<GpuMaterial<B>>>, LookupError> {
        Self::try_lookup(&self.materials, ResourceKind::Material, id)
    }
}
