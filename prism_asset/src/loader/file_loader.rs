use super::descriptor::{MaterialFile, ShaderFile};
use super::error::*;
use super::mesh_formats::{ObjMeshError, mesh_from_obj, mesh_from_tri};
use crate::assets::{ColorFormat, ImageData, MaterialDesc, MaterialSlot, ShaderDesc, ShaderStage};
use crate::{ResourceId, ResourceKind, ResourceStore};
use dashmap::DashMap;
use prism_utils::ResourceArgs;
use snafu::{Report, ResultExt, ensure};
use std::fs;
use std::hash::Hash;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Loads files into a [`ResourceStore`], remembering which path produced which id.
///
/// Paths are joined onto the loader's asset root. Paths inside descriptors are relative
/// to the descriptor itself. Only successful loads are remembered, a failed path is read
/// again on the next attempt. A remembered id whose resource was removed from the store is
/// forgotten and the path is loaded again.
///
/// Material and shader descriptors are re-read on every load that is not remembered yet.
/// Dependencies that were created before a later dependency failed stay in the store and
/// stay remembered, so a retry reuses them instead of creating them twice.
pub struct FileResourceLoader {
    store: Arc<ResourceStore>,
    root: PathBuf,

    meshes: DashMap<PathBuf, ResourceId>,
    images: DashMap<(PathBuf, ColorFormat), ResourceId>,
    strings: DashMap<PathBuf, ResourceId>,
    shaders: DashMap<PathBuf, ResourceId>,
    materials: DashMap<PathBuf, ResourceId>,
}

/// The format a texture slot is decoded into.
const fn slot_format(slot: MaterialSlot) -> ColorFormat {
    match slot {
        MaterialSlot::Diffuse => ColorFormat::Rgba32,
        MaterialSlot::Normal => ColorFormat::Rgb24,
        MaterialSlot::Specular => ColorFormat::GreyScale8,
        MaterialSlot::Glow => ColorFormat::Rgb24,
        MaterialSlot::Alpha => ColorFormat::GreyScale8,
    }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

impl FileResourceLoader {
    pub fn new(store: Arc<ResourceStore>) -> Self {
        Self::with_root(store, PathBuf::new())
    }

    pub fn with_root(store: Arc<ResourceStore>, root: impl Into<PathBuf>) -> Self {
        Self {
            store,
            root: root.into(),
            meshes: DashMap::new(),
            images: DashMap::new(),
            strings: DashMap::new(),
            shaders: DashMap::new(),
            materials: DashMap::new(),
        }
    }

    /// Uses `--asset-root` when given, the working directory otherwise.
    pub fn from_args(store: Arc<ResourceStore>, args: &ResourceArgs) -> Self {
        Self::with_root(store, args.asset_root.clone().unwrap_or_default())
    }

    pub fn store(&self) -> &Arc<ResourceStore> {
        &self.store
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The memo key of `path`.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    pub fn load_mesh(&self, path: impl AsRef<Path>) -> ResourceId {
        self.report(self.try_load_mesh(path))
    }

    pub fn load_image(&self, path: impl AsRef<Path>, format: ColorFormat) -> ResourceId {
        self.report(self.try_load_image(path, format))
    }

    pub fn load_material(&self, path: impl AsRef<Path>) -> ResourceId {
        self.report(self.try_load_material(path))
    }

    pub fn load_shader_program(&self, path: impl AsRef<Path>) -> ResourceId {
        self.report(self.try_load_shader_program(path))
    }

    pub fn load_string(&self, path: impl AsRef<Path>) -> ResourceId {
        self.report(self.try_load_string(path))
    }

    pub fn try_load_mesh(&self, path: impl AsRef<Path>) -> Result<ResourceId, LoadError> {
        let path = self.resolve(path);
        self.store.log_sink().scope(|| self.mesh_at(&path))
    }

    pub fn try_load_image(
        &self,
        path: impl AsRef<Path>,
        format: ColorFormat,
    ) -> Result<ResourceId, LoadError> {
        let path = self.resolve(path);
        self.store.log_sink().scope(|| self.image_at(&path, format))
    }

    pub fn try_load_material(&self, path: impl AsRef<Path>) -> Result<ResourceId, LoadError> {
        let path = self.resolve(path);
        self.store.log_sink().scope(|| self.material_at(&path))
    }

    pub fn try_load_shader_program(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<ResourceId, LoadError> {
        let path = self.resolve(path);
        self.store.log_sink().scope(|| self.shader_at(&path))
    }

    pub fn try_load_string(&self, path: impl AsRef<Path>) -> Result<ResourceId, LoadError> {
        let path = self.resolve(path);
        self.store.log_sink().scope(|| self.string_at(&path))
    }

    /// The remembered id of `key` while the store still holds it, otherwise the id `load`
    /// produces.
    fn memoized<K: Eq + Hash>(
        &self,
        memo: &DashMap<K, ResourceId>,
        kind: ResourceKind,
        key: K,
        path: &Path,
        load: impl FnOnce() -> Result<ResourceId, LoadError>,
    ) -> Result<ResourceId, LoadError> {
        if let Some(id) = memo.get(&key).map(|r| *r.value()) {
            if self.store.contains(kind, id) {
                debug!("{} was already loaded as {id}", path.display());
                return Ok(id);
            }

            debug!(
                "{kind} {id} from {} is gone from the store, loading it again",
                path.display()
            );
            memo.remove(&key);
        }

        let id = load()?;
        memo.insert(key, id);
        Ok(id)
    }

    fn report(&self, result: Result<ResourceId, LoadError>) -> ResourceId {
        result.unwrap_or_else(|e| {
            self.store
                .log_sink()
                .scope(|| error!("{}", Report::from_error(e)));
            ResourceId::INVALID
        })
    }

    fn string_at(&self, path: &Path) -> Result<ResourceId, LoadError> {
        let key = path.to_path_buf();
        self.memoized(&self.strings, ResourceKind::String, key, path, || {
            let text = fs::read_to_string(path).context(IoSnafu { path })?;
            let id = self
                .store
                .try_create(text)
                .context(RejectedSnafu { path })?;

            info!("Loaded String {id} from {}", path.display());
            Ok(id)
        })
    }

    fn image_at(&self, path: &Path, format: ColorFormat) -> Result<ResourceId, LoadError> {
        let key = (path.to_path_buf(), format);
        self.memoized(&self.images, ResourceKind::Image, key, path, || {
            ensure!(format != ColorFormat::Invalid, InvalidFormatSnafu { path });

            let bytes = fs::read(path).context(IoSnafu { path })?;
            let decoded = image::load_from_memory(&bytes).context(ImageSnafu { path })?;
            let (width, height) = (decoded.width(), decoded.height());

            let pixels = match format {
                ColorFormat::GreyScale8 => decoded.into_luma8().into_raw(),
                ColorFormat::Rgb24 => decoded.into_rgb8().into_raw(),
                ColorFormat::Rgba32 | ColorFormat::Invalid => decoded.into_rgba8().into_raw(),
            };

            let image = ImageData::new(pixels, width, height, format);
            let id = self
                .store
                .try_create_image(image)
                .context(RejectedSnafu { path })?;

            info!(
                "Loaded Image {id} ({width}x{height} {format:?}) from {}",
                path.display()
            );
            Ok(id)
        })
    }

    fn mesh_at(&self, path: &Path) -> Result<ResourceId, LoadError> {
        let key = path.to_path_buf();
        self.memoized(&self.meshes, ResourceKind::Mesh, key, path, || {
            let mesh = if has_extension(path, "obj") {
                let bytes = fs::read(path).context(IoSnafu { path })?;
                mesh_from_obj(&bytes).map_err(|e| match e {
                    ObjMeshError::Parse { source } => LoadError::Obj {
                        path: path.to_path_buf(),
                        source,
                    },
                    ObjMeshError::Index { attribute, index } => LoadError::ObjIndex {
                        path: path.to_path_buf(),
                        attribute,
                        index,
                    },
                })?
            } else if has_extension(path, "tri") {
                let text = fs::read_to_string(path).context(IoSnafu { path })?;
                mesh_from_tri(&text).context(TriSnafu { path })?
            } else {
                return UnsupportedExtensionSnafu { path }.fail();
            };

            let id = self
                .store
                .try_create_mesh(mesh)
                .context(RejectedSnafu { path })?;

            info!("Loaded Mesh {id} from {}", path.display());
            Ok(id)
        })
    }

    /// The descriptor text as it is on disk, recorded as a String resource first.
    ///
    /// A descriptor that was recorded before and has been edited since is replaced in
    /// place, so the String id of a path stays the same.
    fn descriptor_text(&self, path: &Path) -> Result<String, LoadError> {
        let text = fs::read_to_string(path).context(IoSnafu { path })?;

        let recorded = self
            .strings
            .get(path)
            .map(|r| *r.value())
            .filter(|id| self.store.contains(ResourceKind::String, *id));

        if let Some(id) = recorded {
            if self.store.string(id).as_deref() == Some(text.as_str()) {
                return Ok(text);
            }
            if self.store.replace_string(id, text.as_str()) {
                debug!("Descriptor {} changed, replaced String {id}", path.display());
                return Ok(text);
            }
        }

        let id = self
            .store
            .try_create(text.clone())
            .context(RejectedSnafu { path })?;
        self.strings.insert(path.to_path_buf(), id);

        info!("Loaded String {id} from {}", path.display());
        Ok(text)
    }

    fn dependency(
        &self,
        descriptor: &Path,
        relative: &str,
        load: impl FnOnce(&Path) -> Result<ResourceId, LoadError>,
    ) -> Result<ResourceId, LoadError> {
        let dir = descriptor.parent().unwrap_or(Path::new(""));
        let dependency = dir.join(relative);

        load(&dependency).context(DependencySnafu {
            path: descriptor,
            dependency: &dependency,
        })
    }

    fn shader_at(&self, path: &Path) -> Result<ResourceId, LoadError> {
        let key = path.to_path_buf();
        self.memoized(&self.shaders, ResourceKind::Shader, key, path, || {
            let text = self.descriptor_text(path)?;
            let file = if has_extension(path, "json") {
                ShaderFile::from_json(&text).context(JsonSnafu { path })?
            } else {
                ShaderFile::from_ini(&text).context(IniSnafu { path })?
            };

            for stage in ShaderStage::ALL.into_iter().filter(|s| s.is_mandatory()) {
                ensure!(file.stage(stage).is_some(), MissingStageSnafu { path, stage });
            }

            let mut desc = ShaderDesc::new(ResourceId::INVALID, ResourceId::INVALID);
            for stage in ShaderStage::ALL {
                let Some(relative) = file.stage(stage) else {
                    continue;
                };
                let id = self.dependency(path, relative, |p| self.string_at(p))?;
                desc.set_stage(stage, id);
            }

            let id = self
                .store
                .try_create_shader(desc)
                .context(RejectedSnafu { path })?;

            info!("Loaded Shader {id} from {}", path.display());
            Ok(id)
        })
    }

    fn material_at(&self, path: &Path) -> Result<ResourceId, LoadError> {
        let key = path.to_path_buf();
        self.memoized(&self.materials, ResourceKind::Material, key, path, || {
            let text = self.descriptor_text(path)?;
            let file = if has_extension(path, "json") {
                MaterialFile::from_json(&text).context(JsonSnafu { path })?
            } else {
                MaterialFile::from_ini(&text).context(IniSnafu { path })?
            };

            let mut desc = MaterialDesc::default();
            for slot in MaterialSlot::ALL {
                let Some(relative) = file.image(slot) else {
                    continue;
                };
                let id =
                    self.dependency(path, relative, |p| self.image_at(p, slot_format(slot)))?;
                desc.set_image(slot, id);
            }

            if let Some(relative) = file.shader() {
                desc.shader = self.dependency(path, relative, |p| self.shader_at(p))?;
            }

            let id = self
                .store
                .try_create(desc)
                .context(RejectedSnafu { path })?;

            info!("Loaded Material {id} from {}", path.display());
            Ok(id)
        })
    }
}

impl FileResourceLoader {
    /// Ids of every successfully loaded path of one kind, for tooling.
    pub fn loaded_meshes(&self) -> Vec<(PathBuf, ResourceId)> {
        Self::collect(&self.meshes)
    }

    pub fn loaded_shaders(&self) -> Vec<(PathBuf, ResourceId)> {
        Self::collect(&self.shaders)
    }

    pub fn loaded_materials(&self) -> Vec<(PathBuf, ResourceId)> {
        Self::collect(&self.materials)
    }

    fn collect(memo: &DashMap<PathBuf, ResourceId>) -> Vec<(PathBuf, ResourceId)> {
        let mut entries: Vec<_> = memo
            .iter()
            .map(|e| (e.key().clone(), *e.value()))
            .collect();
        entries.sort_by_key(|(_, id)| *id);
        entries
    }

    /// Forgets every remembered path. Resources already in the store stay there.
    pub fn clear_memo(&self) {
        self.meshes.clear();
        self.images.clear();
        self.strings.clear();
        self.shaders.clear();
        self.materials.clear();
    }
}
