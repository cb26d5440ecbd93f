use crate::ResourceKind;
use crate::error::{
    EmptyVerticesSnafu, IndexOutOfRangeSnafu, NormalCountSnafu, UnsupportedPrimitiveSnafu,
    UvCountSnafu, ValidationError, VertexStrideSnafu,
};
use crate::store::StoreType;
use bon::Builder;
use glamx::Vec3;
use itertools::Itertools;
use snafu::ensure;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Point,
    Line,
    Triangle,
    /// Legacy value. It can be named by descriptors but is never accepted by the store.
    Quad,
}

impl PrimitiveType {
    pub const fn is_supported(self) -> bool {
        !matches!(self, PrimitiveType::Quad)
    }
}

/// Axis aligned bounds of a mesh, handed to the culling side.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MeshBounds {
    pub min: Vec3,
    pub max: Vec3,
}

/// CPU side mesh payload. All arrays are flat: 3 floats per position and normal, 2 per uv.
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct MeshData {
    #[builder(start_fn)]
    pub vertices: Vec<f32>,
    pub indices: Option<Vec<u32>>,
    pub normals: Option<Vec<f32>>,
    pub uvs: Option<Vec<f32>>,
    #[builder(default = PrimitiveType::Triangle)]
    pub primitive: PrimitiveType,
}

impl MeshData {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.as_ref().map_or(0, Vec::len)
    }

    #[inline]
    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    /// Number of vertices a draw call consumes.
    pub fn draw_count(&self) -> usize {
        if self.is_indexed() {
            self.index_count()
        } else {
            self.vertex_count()
        }
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices
            .iter()
            .tuples()
            .map(|(x, y, z)| Vec3::new(*x, *y, *z))
    }

    pub fn bounds(&self) -> Option<MeshBounds> {
        let mut positions = self.positions();
        let first = positions.next()?;

        let (min, max) = positions.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(MeshBounds { min, max })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure!(!self.vertices.is_empty(), EmptyVerticesSnafu);
        ensure!(
            self.vertices.len() % 3 == 0,
            VertexStrideSnafu {
                floats: self.vertices.len()
            }
        );
        ensure!(
            self.primitive.is_supported(),
            UnsupportedPrimitiveSnafu {
                primitive: self.primitive
            }
        );

        let vertex_count = self.vertex_count();

        if let Some(normals) = &self.normals {
            ensure!(
                normals.len() == self.vertices.len(),
                NormalCountSnafu {
                    expected: self.vertices.len(),
                    actual: normals.len()
                }
            );
        }

        if let Some(uvs) = &self.uvs {
            ensure!(
                uvs.len() == vertex_count * 2,
                UvCountSnafu {
                    expected: vertex_count * 2,
                    actual: uvs.len()
                }
            );
        }

        if let Some(indices) = &self.indices {
            if let Some(&index) = indices.iter().find(|i| **i as usize >= vertex_count) {
                return IndexOutOfRangeSnafu {
                    index,
                    vertex_count,
                }
                .fail();
            }
        }

        Ok(())
    }
}

impl StoreType for MeshData {
    const KIND: ResourceKind = ResourceKind::Mesh;

    fn validate(&self) -> Result<(), ValidationError> {
        MeshData::validate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> MeshData {
        MeshData::builder(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]).build()
    }

    #[test]
    fn triangle_is_valid() {
        let mesh = triangle();
        assert_eq!(mesh.validate(), Ok(()));
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.draw_count(), 3);
        assert_eq!(mesh.primitive, PrimitiveType::Triangle);
    }

    #[test]
    fn rejects_quads_and_empty_meshes() {
        let mut mesh = triangle();
        mesh.primitive = PrimitiveType::Quad;
        assert!(matches!(
            mesh.validate(),
            Err(ValidationError::UnsupportedPrimitive { .. })
        ));

        let empty = MeshData::builder(Vec::new()).build();
        assert_eq!(empty.validate(), Err(ValidationError::EmptyVertices));
    }

    #[test]
    fn rejects_mismatched_attributes() {
        let mesh = MeshData::builder(vec![0.0; 9]).uvs(vec![0.0; 4]).build();
        assert_eq!(
            mesh.validate(),
            Err(ValidationError::UvCount {
                expected: 6,
                actual: 4
            })
        );

        let mesh = MeshData::builder(vec![0.0; 9]).indices(vec![0, 1, 3]).build();
        assert_eq!(
            mesh.validate(),
            Err(ValidationError::IndexOutOfRange {
                index: 3,
                vertex_count: 3
            })
        );

        let mesh = MeshData::builder(vec![0.0; 8]).build();
        assert_eq!(
            mesh.validate(),
            Err(ValidationError::VertexStride { floats: 8 })
        );
    }

    #[test]
    fn bounds_cover_all_positions() {
        let bounds = triangle().bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(1.0, 1.0, 0.0));
    }
}
