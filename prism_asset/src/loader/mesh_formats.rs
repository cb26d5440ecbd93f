//! Mesh file formats understood by the loader.
//!
//! - `.obj`, read by the `obj` crate and turned into an indexed triangle mesh.
//! - `.tri`, one triangle per line: 9 floats, or 18 with a normal after each corner.

use crate::assets::MeshData;
use obj::{IndexTuple, ObjData, ObjError};
use snafu::{OptionExt, ResultExt, Snafu, ensure};
use std::collections::HashMap;
use std::num::ParseFloatError;

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum TriError {
    #[snafu(display("Line {line}: expected 9 or 18 floats, found {found}"))]
    FloatCount { line: usize, found: usize },

    #[snafu(display("Line {line}: {source}"))]
    Float {
        line: usize,
        source: ParseFloatError,
    },
}

/// Failure of the OBJ conversion, separated from [`LoadError`](super::LoadError) so the
/// conversion stays usable on in-memory data.
#[derive(Debug, Snafu)]
pub enum ObjMeshError {
    #[snafu(transparent)]
    Parse { source: ObjError },

    #[snafu(display("Reference to missing {attribute} #{index}"))]
    Index {
        attribute: &'static str,
        index: usize,
    },
}

type Corner = (usize, Option<usize>, Option<usize>);

/// Converts OBJ data into one indexed triangle mesh.
///
/// Identical corners are welded into one vertex. Polygons with more than three corners
/// are fan triangulated, points and lines are skipped. Uvs and normals are only kept when
/// every corner carries them.
pub fn mesh_from_obj(bytes: &[u8]) -> Result<MeshData, ObjMeshError> {
    let data = ObjData::load_buf(bytes)?;

    let polys = data
        .objects
        .iter()
        .flat_map(|o| o.groups.iter())
        .flat_map(|g| g.polys.iter())
        .filter(|p| p.0.len() >= 3);

    let corner = |t: &IndexTuple| -> Corner { (t.0, t.1, t.2) };

    let mut triangles: Vec<[Corner; 3]> = Vec::new();
    for poly in polys {
        let corners = &poly.0;
        for i in 1..corners.len() - 1 {
            triangles.push([
                corner(&corners[0]),
                corner(&corners[i]),
                corner(&corners[i + 1]),
            ]);
        }
    }

    let corners = || triangles.iter().flatten();
    let has_uv = corners().all(|c| c.1.is_some());
    let has_normal = corners().all(|c| c.2.is_some());

    let mut welded: HashMap<Corner, u32> = HashMap::new();
    let mut vertices = Vec::new();
    let mut normals = Vec::new();
    let mut uvs = Vec::new();
    let mut indices = Vec::with_capacity(triangles.len() * 3);

    for &(pos, uv, normal) in corners() {
        let uv = uv.filter(|_| has_uv);
        let normal = normal.filter(|_| has_normal);

        if let Some(&index) = welded.get(&(pos, uv, normal)) {
            indices.push(index);
            continue;
        }

        let position = data.position.get(pos).context(IndexSnafu {
            attribute: "position",
            index: pos,
        })?;
        vertices.extend_from_slice(position);

        if let Some(uv) = uv {
            let coords = data.texture.get(uv).context(IndexSnafu {
                attribute: "uv",
                index: uv,
            })?;
            uvs.extend_from_slice(coords);
        }

        if let Some(normal) = normal {
            let n = data.normal.get(normal).context(IndexSnafu {
                attribute: "normal",
                index: normal,
            })?;
            normals.extend_from_slice(n);
        }

        let index = welded.len() as u32;
        welded.insert((pos, uv, normal), index);
        indices.push(index);
    }

    Ok(MeshData::builder(vertices)
        .indices(indices)
        .maybe_normals(has_normal.then_some(normals))
        .maybe_uvs(has_uv.then_some(uvs))
        .build())
}

/// Parses the line based triangle format into a non-indexed triangle mesh.
pub fn mesh_from_tri(text: &str) -> Result<MeshData, TriError> {
    let mut vertices = Vec::new();
    let mut normals = Vec::new();
    let mut with_normals = None;

    for (number, raw) in text.lines().enumerate() {
        let line = number + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let floats = trimmed
            .split_whitespace()
            .map(str::parse::<f32>)
            .collect::<Result<Vec<_>, _>>()
            .context(FloatSnafu { line })?;

        let found = floats.len();
        ensure!(found == 9 || found == 18, FloatCountSnafu { line, found });

        // The first triangle decides the layout of the whole file.
        let has_normals = *with_normals.get_or_insert(found == 18);
        ensure!(
            has_normals == (found == 18),
            FloatCountSnafu { line, found }
        );

        if has_normals {
            for corner in floats.chunks_exact(6) {
                vertices.extend_from_slice(&corner[..3]);
                normals.extend_from_slice(&corner[3..]);
            }
        } else {
            vertices.extend(floats);
        }
    }

    Ok(MeshData::builder(vertices)
        .maybe_normals(with_normals.unwrap_or(false).then_some(normals))
        .build())
}
