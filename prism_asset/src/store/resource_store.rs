//! The [`ResourceStore`] holds the canonical "raw" data: meshes, images, materials,
//! shaders and text.
//!
//! It exists to cleanly differentiate between GPU state and plain-old-data. Every mutation
//! is announced as a [`ResourceEvent`] to the registered [`ResourceListener`]s. The GPU
//! caches of `prism_render` are such listeners and build their hot data from those events.

use super::listener::{ListenerRegistry, ResourceListener};
use super::{Store, StoreType};
use crate::assets::*;
use crate::error::ValidationError;
use crate::{EventKind, ResourceEvent, ResourceId, ResourceKind};
use prism_utils::LogSink;
use std::sync::Arc;
use tracing::warn;

#[derive(Default)]
pub struct ResourceStore {
    meshes: Store<MeshData>,
    images: Store<ImageData>,
    strings: Store<String>,
    shaders: Store<ShaderDesc>,
    materials: Store<MaterialDesc>,

    listeners: ListenerRegistry,
    log: LogSink,
}

impl ResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log_sink(log: LogSink) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }

    pub fn log_sink(&self) -> &LogSink {
        &self.log
    }

    /// Validates and records `payload` under a fresh id, then fires `Create`.
    pub fn try_create<T: StoreType>(&self, payload: T) -> Result<ResourceId, ValidationError>
    where
        Self: AsRef<Store<T>>,
    {
        self.log.scope(|| {
            self.listeners.assert_idle("create");

            payload.validate()?;
            let id = self.store_of::<T>().add(payload);
            self.listeners
                .dispatch(self, ResourceEvent::new(T::KIND, id, EventKind::Create));

            Ok(id)
        })
    }

    /// Like [`ResourceStore::try_create`], but reports a rejected payload as
    /// [`ResourceId::INVALID`].
    pub fn create<T: StoreType>(&self, payload: T) -> ResourceId
    where
        Self: AsRef<Store<T>>,
    {
        self.try_create(payload).unwrap_or_else(|e| {
            self.log
                .scope(|| warn!("[{} Store] Rejected new payload: {e}", T::name()));
            ResourceId::INVALID
        })
    }

    /// Swaps the payload behind an existing id and fires `Change`.
    ///
    /// Returns `false` without firing anything when the id is unknown or the payload is
    /// rejected.
    pub fn replace<T: StoreType>(&self, id: ResourceId, payload: T) -> bool
    where
        Self: AsRef<Store<T>>,
    {
        self.log.scope(|| {
            self.listeners.assert_idle("replace");

            if let Err(e) = payload.validate() {
                warn!("[{} Store] Rejected replacement for {id}: {e}", T::name());
                return false;
            }

            if !self.store_of::<T>().replace(id, payload) {
                warn!("[{} Store] Cannot replace {id}, it does not exist", T::name());
                return false;
            }

            self.listeners
                .dispatch(self, ResourceEvent::new(T::KIND, id, EventKind::Change));
            true
        })
    }

    /// Erases the payload behind `id` and fires `Delete`. The id is never handed out again.
    pub fn remove(&self, kind: ResourceKind, id: ResourceId) -> bool {
        self.log.scope(|| {
            self.listeners.assert_idle("remove");

            let removed = match kind {
                ResourceKind::Mesh => self.meshes.remove(id).is_some(),
                ResourceKind::Image => self.images.remove(id).is_some(),
                ResourceKind::String => self.strings.remove(id).is_some(),
                ResourceKind::Shader => self.shaders.remove(id).is_some(),
                ResourceKind::Material => self.materials.remove(id).is_some(),
            };

            if removed {
                self.listeners
                    .dispatch(self, ResourceEvent::new(kind, id, EventKind::Delete));
            }
            removed
        })
    }

    /// A copy of the payload behind `id`.
    pub fn get<T: StoreType>(&self, id: ResourceId) -> Option<T>
    where
        Self: AsRef<Store<T>>,
    {
        self.store_of::<T>().get(id)
    }

    fn store_of<T: StoreType>(&self) -> &Store<T>
    where
        Self: AsRef<Store<T>>,
    {
        self.as_ref()
    }

    pub fn contains(&self, kind: ResourceKind, id: ResourceId) -> bool {
        match kind {
            ResourceKind::Mesh => self.meshes.contains(id),
            ResourceKind::Image => self.images.contains(id),
            ResourceKind::String => self.strings.contains(id),
            ResourceKind::Shader => self.shaders.contains(id),
            ResourceKind::Material => self.materials.contains(id),
        }
    }

    pub fn len(&self, kind: ResourceKind) -> usize {
        match kind {
            ResourceKind::Mesh => self.meshes.len(),
            ResourceKind::Image => self.images.len(),
            ResourceKind::String => self.strings.len(),
            ResourceKind::Shader => self.shaders.len(),
            ResourceKind::Material => self.materials.len(),
        }
    }

    pub fn ids(&self, kind: ResourceKind) -> Vec<ResourceId> {
        match kind {
            ResourceKind::Mesh => self.meshes.ids(),
            ResourceKind::Image => self.images.ids(),
            ResourceKind::String => self.strings.ids(),
            ResourceKind::Shader => self.shaders.ids(),
            ResourceKind::Material => self.materials.ids(),
        }
    }

    /// Registers `listener` and calls its `attached` hook.
    ///
    /// Registering the same listener twice delivers every event to it twice.
    pub fn add_listener(&self, listener: Arc<dyn ResourceListener>) {
        self.log.scope(|| self.listeners.add(self, listener));
    }

    /// Unregisters the earliest entry of `listener` and calls its `detached` hook.
    pub fn remove_listener(&self, listener: &Arc<dyn ResourceListener>) -> bool {
        self.log.scope(|| self.listeners.remove(self, listener))
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

/// Named per kind entry points, mirroring the generic ones.
impl ResourceStore {
    pub fn create_mesh(&self, mesh: MeshData) -> ResourceId {
        self.create(mesh)
    }

    pub fn create_image(&self, image: ImageData) -> ResourceId {
        self.create(image)
    }

    pub fn create_material(&self, material: MaterialDesc) -> ResourceId {
        self.create(material)
    }

    pub fn create_shader(&self, shader: ShaderDesc) -> ResourceId {
        self.create(shader)
    }

    pub fn create_string(&self, text: impl Into<String>) -> ResourceId {
        self.create(text.into())
    }

    pub fn try_create_mesh(&self, mesh: MeshData) -> Result<ResourceId, ValidationError> {
        self.try_create(mesh)
    }

    pub fn try_create_image(&self, image: ImageData) -> Result<ResourceId, ValidationError> {
        self.try_create(image)
    }

    pub fn try_create_shader(&self, shader: ShaderDesc) -> Result<ResourceId, ValidationError> {
        self.try_create(shader)
    }

    pub fn replace_mesh(&self, id: ResourceId, mesh: MeshData) -> bool {
        self.replace(id, mesh)
    }

    pub fn replace_image(&self, id: ResourceId, image: ImageData) -> bool {
        self.replace(id, image)
    }

    pub fn replace_material(&self, id: ResourceId, material: MaterialDesc) -> bool {
        self.replace(id, material)
    }

    pub fn replace_shader(&self, id: ResourceId, shader: ShaderDesc) -> bool {
        self.replace(id, shader)
    }

    pub fn replace_string(&self, id: ResourceId, text: impl Into<String>) -> bool {
        self.replace(id, text.into())
    }

    pub fn mesh(&self, id: ResourceId) -> Option<MeshData> {
        self.meshes.get(id)
    }

    pub fn image(&self, id: ResourceId) -> Option<ImageData> {
        self.images.get(id)
    }

    pub fn material(&self, id: ResourceId) -> Option<MaterialDesc> {
        self.materials.get(id)
    }

    pub fn shader(&self, id: ResourceId) -> Option<ShaderDesc> {
        self.shaders.get(id)
    }

    pub fn string(&self, id: ResourceId) -> Option<String> {
        self.strings.get(id)
    }
}

impl AsRef<Store<MeshData>> for ResourceStore {
    fn as_ref(&self) -> &Store<MeshData> {
        &self.meshes
    }
}

impl AsRef<Store<ImageData>> for ResourceStore {
    fn as_ref(&self) -> &Store<ImageData> {
        &self.images
    }
}

impl AsRef<Store<String>> for ResourceStore {
    fn as_ref(&self) -> &Store<String> {
        &self.strings
    }
}

impl AsRef<Store<ShaderDesc>> for ResourceStore {
    fn as_ref(&self) -> &Store<ShaderDesc> {
        &self.shaders
    }
}

impl AsRef<Store<MaterialDesc>> for ResourceStore {
    fn as_ref(&self) -> &Store<MaterialDesc> {
        &self.materials
    }
}
