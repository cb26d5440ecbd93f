use super::resource_cache::{GpuResourceCache, StatCounters};
use crate::backend::{GraphicsBackend, StageSet};
use crate::error::ProtocolViolation;
use itertools::Itertools;
use prism_asset::{
    EventKind, ResourceEvent, ResourceId, ResourceKind, ResourceStore, ShaderDesc, ShaderStage,
};
use std::sync::Arc;
use tracing::debug;

impl<B: GraphicsBackend> GpuResourceCache<B> {
    /// Strings have no GPU object. Changing one invalidates the stages compiled from it.
    pub(crate) fn on_string(&self, event: ResourceEvent) {
        if event.change == EventKind::Create {
            return;
        }

        let before = self.stages.len();
        self.stages.retain(|(source, _), _| *source != event.id);

        let dropped = before - self.stages.len();
        if dropped > 0 {
            debug!(
                "[Shader Cache] Dropped {dropped} compiled stage(s) of String {}",
                event.id
            );
        }
    }

    pub(crate) fn on_shader(&self, store: &ResourceStore, event: ResourceEvent) {
        let id = event.id;

        if event.change == EventKind::Delete {
            self.on_delete(&self.programs, id);
            return;
        }

        let Some(desc) = store.shader(id) else {
            self.violation(ProtocolViolation::MissingPayload {
                kind: ResourceKind::Shader,
                id,
                change: event.change,
            });
            return;
        };

        if event.change == EventKind::Create && self.programs.contains(id) {
            self.violation(ProtocolViolation::DuplicateCreate {
                kind: ResourceKind::Shader,
                id,
            });
            return;
        }

        // A failed rebuild keeps whatever program was linked before.
        let Some(program) = self.build_program(store, id, &desc) else {
            return;
        };

        match event.change {
            EventKind::Create => {
                self.programs.insert(id, program);
            }
            _ => self.programs.replace_or_insert(id, program),
        }
    }

    fn stage(
        &self,
        store: &ResourceStore,
        program: ResourceId,
        stage: ShaderStage,
        source_id: ResourceId,
    ) -> Option<Arc<B::Stage>> {
        if let Some(compiled) = self.stages.get(&(source_id, stage)) {
            debug!("[Shader Cache] Reusing the {} stage from String {source_id}", stage.key());
            return Some(compiled.clone());
        }

        let Some(source) = store.string(source_id) else {
            self.violation(ProtocolViolation::MissingDependency {
                kind: ResourceKind::Shader,
                id: program,
                dependency_kind: ResourceKind::String,
                dependency: source_id,
            });
            return None;
        };

        let label = format!("Shader {program} {} stage", stage.key());
        match self.backend.compile_stage(&label, stage, &source) {
            Ok(compiled) => {
                StatCounters::bump(&self.stats.compiles);
                let compiled = Arc::new(compiled);
                self.stages.insert((source_id, stage), compiled.clone());
                Some(compiled)
            }
            Err(e) => {
                self.report_failure(ResourceKind::Shader, program, &e);
                None
            }
        }
    }

    fn build_program(
        &self,
        store: &ResourceStore,
        id: ResourceId,
        desc: &ShaderDesc,
    ) -> Option<B::Program> {
        let mut compiled = Vec::new();
        for (stage, source_id) in desc.stages() {
            compiled.push((stage, self.stage(store, id, stage, source_id)?));
        }

        let mut set = StageSet::new();
        for (stage, object) in &compiled {
            set.insert(*stage, object.as_ref());
        }

        match self.backend.link_program(&format!("Shader {id}"), &set) {
            Ok(program) => {
                StatCounters::bump(&self.stats.links);
                debug!(
                    "[Shader Cache] Linked Shader {id} from {}",
                    set.iter().map(|(stage, _)| stage.key()).join(", ")
                );
                Some(program)
            }
            Err(e) => {
                self.report_failure(ResourceKind::Shader, id, &e);
                None
            }
        }
    }
}
