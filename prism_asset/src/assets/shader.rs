use crate::error::{MissingStageSnafu, ValidationError};
use crate::store::StoreType;
use crate::{ResourceId, ResourceKind};
use bon::Builder;
use snafu::ensure;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShaderStage {
    Vertex,
    TessControl,
    TessEvaluation,
    Geometry,
    Fragment,
}

impl ShaderStage {
    pub const ALL: [ShaderStage; 5] = [
        ShaderStage::Vertex,
        ShaderStage::TessControl,
        ShaderStage::TessEvaluation,
        ShaderStage::Geometry,
        ShaderStage::Fragment,
    ];

    pub const fn is_mandatory(self) -> bool {
        matches!(self, ShaderStage::Vertex | ShaderStage::Fragment)
    }

    pub const fn key(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::TessControl => "tess_control",
            ShaderStage::TessEvaluation => "tess_evaluation",
            ShaderStage::Geometry => "geometry",
            ShaderStage::Fragment => "fragment",
        }
    }
}

/// String ids of the stage sources of one shader program.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Builder)]
pub struct ShaderDesc {
    pub vertex: ResourceId,
    #[builder(default)]
    pub tess_control: ResourceId,
    #[builder(default)]
    pub tess_evaluation: ResourceId,
    #[builder(default)]
    pub geometry: ResourceId,
    pub fragment: ResourceId,
}

impl ShaderDesc {
    /// A program made of only the mandatory stages.
    pub fn new(vertex: ResourceId, fragment: ResourceId) -> Self {
        ShaderDesc::builder().vertex(vertex).fragment(fragment).build()
    }

    pub fn stage(&self, stage: ShaderStage) -> ResourceId {
        match stage {
            ShaderStage::Vertex => self.vertex,
            ShaderStage::TessControl => self.tess_control,
            ShaderStage::TessEvaluation => self.tess_evaluation,
            ShaderStage::Geometry => self.geometry,
            ShaderStage::Fragment => self.fragment,
        }
    }

    pub fn set_stage(&mut self, stage: ShaderStage, id: ResourceId) {
        let field = match stage {
            ShaderStage::Vertex => &mut self.vertex,
            ShaderStage::TessControl => &mut self.tess_control,
            ShaderStage::TessEvaluation => &mut self.tess_evaluation,
            ShaderStage::Geometry => &mut self.geometry,
            ShaderStage::Fragment => &mut self.fragment,
        };
        *field = id;
    }

    /// Every stage with a source, in pipeline order.
    pub fn stages(&self) -> impl Iterator<Item = (ShaderStage, ResourceId)> + '_ {
        ShaderStage::ALL
            .into_iter()
            .filter_map(|stage| self.stage(stage).valid().map(|id| (stage, id)))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for stage in ShaderStage::ALL.into_iter().filter(|s| s.is_mandatory()) {
            ensure!(self.stage(stage).is_valid(), MissingStageSnafu { stage });
        }
        Ok(())
    }
}

impl StoreType for ShaderDesc {
    const KIND: ResourceKind = ResourceKind::Shader;

    fn validate(&self) -> Result<(), ValidationError> {
        ShaderDesc::validate(self)
    }
}

impl StoreType for String {
    const KIND: ResourceKind = ResourceKind::String;

    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_and_fragment_are_mandatory() {
        let desc = ShaderDesc::new(ResourceId::new(0), ResourceId::INVALID);
        assert_eq!(
            desc.validate(),
            Err(ValidationError::MissingStage {
                stage: ShaderStage::Fragment
            })
        );

        let desc = ShaderDesc::new(ResourceId::new(0), ResourceId::new(1));
        assert_eq!(desc.validate(), Ok(()));
    }

    #[test]
    fn stages_skip_unused_slots() {
        let desc = ShaderDesc::builder()
            .vertex(ResourceId::new(4))
            .geometry(ResourceId::new(6))
            .fragment(ResourceId::new(5))
            .build();

        let stages: Vec<_> = desc.stages().map(|(stage, _)| stage).collect();
        assert_eq!(
            stages,
            vec![
                ShaderStage::Vertex,
                ShaderStage::Geometry,
                ShaderStage::Fragment
            ]
        );
    }
}
