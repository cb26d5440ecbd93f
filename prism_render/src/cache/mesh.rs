use super::resource_cache::{GpuResourceCache, StatCounters};
use crate::backend::GraphicsBackend;
use crate::error::ProtocolViolation;
use prism_asset::{EventKind, ResourceEvent, ResourceKind, ResourceStore};

impl<B: GraphicsBackend> GpuResourceCache<B> {
    pub(crate) fn on_mesh(&self, store: &ResourceStore, event: ResourceEvent) {
        let id = event.id;

        if event.change == EventKind::Delete {
            self.on_delete(&self.meshes, id);
            return;
        }

        let Some(mesh) = store.mesh(id) else {
            self.violation(ProtocolViolation::MissingPayload {
                kind: ResourceKind::Mesh,
                id,
                change: event.change,
            });
            return;
        };

        match self.meshes.get(id) {
            Some(_) if event.change == EventKind::Create => {
                self.violation(ProtocolViolation::DuplicateCreate {
                    kind: ResourceKind::Mesh,
                    id,
                });
            }
            Some(slot) => {
                let result = self.backend.reinit_mesh(&mut slot.write(), &mesh);
                match result {
                    Ok(()) => StatCounters::bump(&self.stats.reinits),
                    Err(e) => self.report_failure(ResourceKind::Mesh, id, &e),
                }
            }
            None => match self.backend.upload_mesh(&format!("Mesh {id}"), &mesh) {
                Ok(hot) => {
                    self.meshes.insert(id, hot);
                    StatCounters::bump(&self.stats.uploads);
                }
                Err(e) => self.report_failure(ResourceKind::Mesh, id, &e),
            },
        }
    }
}
