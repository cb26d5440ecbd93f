use crate::error::{GpuError, UnsupportedStageSnafu};
use naga::front::glsl::{Frontend, Options};
use naga::valid::{Capabilities, ValidationFlags, Validator};
use prism_asset::ShaderStage;

/// Parses and validates a GLSL vertex or fragment stage.
///
/// Diagnostics are rendered against `source`, the way naga prints them on the command line.
pub fn parse_glsl(label: &str, stage: ShaderStage, source: &str) -> Result<naga::Module, GpuError> {
    let naga_stage = match stage {
        ShaderStage::Vertex => naga::ShaderStage::Vertex,
        ShaderStage::Fragment => naga::ShaderStage::Fragment,
        ShaderStage::TessControl | ShaderStage::TessEvaluation | ShaderStage::Geometry => {
            return UnsupportedStageSnafu { stage }.fail();
        }
    };

    let compile_error = |diagnostic: String| GpuError::Compile {
        label: label.to_string(),
        stage,
        diagnostic,
    };

    let mut frontend = Frontend::default();
    let module = frontend
        .parse(&Options::from(naga_stage), source)
        .map_err(|e| compile_error(e.emit_to_string(source)))?;

    Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .map_err(|e| compile_error(e.emit_to_string(source)))?;

    Ok(module)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERTEX: &str = "#version 450\nvoid main() { gl_Position = vec4(0.0); }\n";

    #[test]
    fn valid_vertex_stage_parses() {
        let module = parse_glsl("test", ShaderStage::Vertex, VERTEX).unwrap();
        assert_eq!(module.entry_points.len(), 1);
    }

    #[test]
    fn syntax_errors_carry_a_diagnostic() {
        let err = parse_glsl("broken", ShaderStage::Fragment, "#version 450\nvoid main( {\n")
            .unwrap_err();
        let GpuError::Compile {
            label, diagnostic, ..
        } = err
        else {
            panic!("expected a compile error");
        };
        assert_eq!(label, "broken");
        assert!(!diagnostic.is_empty());
    }

    #[test]
    fn geometry_is_unsupported() {
        assert!(matches!(
            parse_glsl("gs", ShaderStage::Geometry, VERTEX),
            Err(GpuError::UnsupportedStage {
                stage: ShaderStage::Geometry
            })
        ));
    }
}
