//! Material and shader program descriptors.
//!
//! Both come in two flavors with the same keys: INI, with a `[material]` or `[shader]`
//! section, and JSON, a flat object. Values are paths relative to the descriptor. An empty
//! value leaves the slot unset.

use super::ini::{IniDocument, IniError};
use crate::assets::{MaterialSlot, ShaderStage};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MaterialFile {
    pub diffuse: Option<String>,
    pub normal: Option<String>,
    pub specular: Option<String>,
    pub glow: Option<String>,
    pub alpha: Option<String>,
    pub shader: Option<String>,
    #[serde(flatten)]
    pub unknown: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShaderFile {
    pub vertex: Option<String>,
    pub tess_control: Option<String>,
    pub tess_evaluation: Option<String>,
    pub geometry: Option<String>,
    pub fragment: Option<String>,
    #[serde(flatten)]
    pub unknown: BTreeMap<String, serde_json::Value>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn log_unknown(kind: &str, unknown: &BTreeMap<String, serde_json::Value>) {
    for key in unknown.keys() {
        debug!("Ignoring unknown {kind} descriptor key `{key}`");
    }
}

impl MaterialFile {
    pub const SECTION: &'static str = "material";

    pub fn from_ini(text: &str) -> Result<Self, IniError> {
        let doc = IniDocument::parse(text)?;
        let mut file = MaterialFile::default();

        for (key, value) in doc.section(Self::SECTION)? {
            let value = Some(value.clone());
            match key.as_str() {
                "diffuse" => file.diffuse = value,
                "normal" => file.normal = value,
                "specular" => file.specular = value,
                "glow" => file.glow = value,
                "alpha" => file.alpha = value,
                "shader" => file.shader = value,
                _ => {
                    file.unknown
                        .insert(key.clone(), serde_json::Value::from(value));
                }
            }
        }

        log_unknown("material", &file.unknown);
        Ok(file)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let file: MaterialFile = serde_json::from_str(text)?;
        log_unknown("material", &file.unknown);
        Ok(file)
    }

    pub fn image(&self, slot: MaterialSlot) -> Option<&str> {
        non_empty(match slot {
            MaterialSlot::Diffuse => &self.diffuse,
            MaterialSlot::Normal => &self.normal,
            MaterialSlot::Specular => &self.specular,
            MaterialSlot::Glow => &self.glow,
            MaterialSlot::Alpha => &self.alpha,
        })
    }

    pub fn shader(&self) -> Option<&str> {
        non_empty(&self.shader)
    }
}

impl ShaderFile {
    pub const SECTION: &'static str = "shader";

    pub fn from_ini(text: &str) -> Result<Self, IniError> {
        let doc = IniDocument::parse(text)?;
        let mut file = ShaderFile::default();

        for (key, value) in doc.section(Self::SECTION)? {
            let value = Some(value.clone());
            match key.as_str() {
                "vertex" => file.vertex = value,
                "tess_control" => file.tess_control = value,
                "tess_evaluation" => file.tess_evaluation = value,
                "geometry" => file.geometry = value,
                "fragment" => file.fragment = value,
                _ => {
                    file.unknown
                        .insert(key.clone(), serde_json::Value::from(value));
                }
            }
        }

        log_unknown("shader", &file.unknown);
        Ok(file)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let file: ShaderFile = serde_json::from_str(text)?;
        log_unknown("shader", &file.unknown);
        Ok(file)
    }

    pub fn stage(&self, stage: ShaderStage) -> Option<&str> {
        non_empty(match stage {
            ShaderStage::Vertex => &self.vertex,
            ShaderStage::TessControl => &self.tess_control,
            ShaderStage::TessEvaluation => &self.tess_evaluation,
            ShaderStage::Geometry => &self.geometry,
            ShaderStage::Fragment => &self.fragment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ini_and_json_agree() {
        let ini = MaterialFile::from_ini(
            "[material]\ndiffuse = wall.png\nnormal =\nshader = lit.shader\nshininess = 4\n",
        )
        .unwrap();
        let json = MaterialFile::from_json(
            r#"{ "diffuse": "wall.png", "normal": "", "shader": "lit.shader", "shininess": 4 }"#,
        )
        .unwrap();

        for file in [&ini, &json] {
            assert_eq!(file.image(MaterialSlot::Diffuse), Some("wall.png"));
            assert_eq!(file.image(MaterialSlot::Normal), None);
            assert_eq!(file.image(MaterialSlot::Alpha), None);
            assert_eq!(file.shader(), Some("lit.shader"));
            assert!(file.unknown.contains_key("shininess"));
        }
    }

    #[test]
    fn shader_stages() {
        let file =
            ShaderFile::from_ini("[shader]\nvertex = a.vert\nfragment = a.frag\ngeometry = \n")
                .unwrap();

        assert_eq!(file.stage(ShaderStage::Vertex), Some("a.vert"));
        assert_eq!(file.stage(ShaderStage::Fragment), Some("a.frag"));
        assert_eq!(file.stage(ShaderStage::Geometry), None);
    }

    #[test]
    fn ini_without_section_is_rejected() {
        assert!(ShaderFile::from_ini("vertex = a.vert\n").is_err());
    }
}
