use super::resource_cache::{GpuResourceCache, StatCounters};
use crate::backend::GraphicsBackend;
use crate::error::ProtocolViolation;
use prism_asset::{EventKind, ResourceEvent, ResourceKind, ResourceStore};

impl<B: GraphicsBackend> GpuResourceCache<B> {
    pub(crate) fn on_image(&self, store: &ResourceStore, event: ResourceEvent) {
        let id = event.id;

        if event.change == EventKind::Delete {
            self.on_delete(&self.textures, id);
            return;
        }

        let Some(image) = store.image(id) else {
            self.violation(ProtocolViolation::MissingPayload {
                kind: ResourceKind::Image,
                id,
                change: event.change,
            });
            return;
        };

        match self.textures.get(id) {
            Some(_) if event.change == EventKind::Create => {
                self.violation(ProtocolViolation::DuplicateCreate {
                    kind: ResourceKind::Image,
                    id,
                });
            }
            Some(slot) => {
                let result = self.backend.reinit_texture(&mut slot.write(), &image);
                match result {
                    Ok(()) => StatCounters::bump(&self.stats.reinits),
                    Err(e) => self.report_failure(ResourceKind::Image, id, &e),
                }
            }
            // A Change without a slot means the previous upload failed, try again.
            None => match self.backend.upload_texture(&format!("Image {id}"), &image) {
                Ok(texture) => {
                    self.textures.insert(id, texture);
                    StatCounters::bump(&self.stats.uploads);
                }
                Err(e) => self.report_failure(ResourceKind::Image, id, &e),
            },
        }
    }
}
