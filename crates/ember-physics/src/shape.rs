// Copyright 2025 the ember authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Collision shape descriptors and the factories deriving them from an
//! object's transform scale.

use ember_core::asset::MeshSource;
use ember_core::math::Vec3;
use rapier3d::prelude::{nalgebra, point, Point, Real, SharedShape};

use crate::error::PhysicsError;

/// Lightweight tag identifying a shape family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// Axis-aligned box.
    Box,
    /// Sphere.
    Sphere,
    /// Y-aligned capsule.
    Capsule,
    /// Static triangle mesh.
    TriangleMesh,
}

/// Immutable geometric descriptor for a collision shape.
///
/// Descriptors are derived once from a game object's scale (and, for meshes,
/// baked geometry) and lowered to a backend shape at body-creation time. A
/// live scale change recreates the descriptor rather than mutating it.
#[derive(Debug, Clone)]
pub enum ShapeDesc {
    /// Box with the given half-extents.
    Box {
        /// Half-extent along each axis.
        half_extents: Vec3,
    },
    /// Sphere with the given radius.
    Sphere {
        /// Sphere radius.
        radius: f32,
    },
    /// Capsule aligned with the Y axis.
    Capsule {
        /// Radius of the capsule's caps and cylinder.
        radius: f32,
        /// Half the height of the cylindrical segment.
        half_height: f32,
    },
    /// Triangle mesh with per-axis-scaled vertices. Static geometry only:
    /// concave, non-uniformly scaled meshes are unsuitable for dynamics.
    TriangleMesh {
        /// Scaled vertex positions.
        vertices: Vec<[f32; 3]>,
        /// Triangle indices, three per triangle.
        indices: Vec<[u32; 3]>,
    },
}

impl ShapeDesc {
    /// Box whose half-extents are the scale components.
    pub fn box_from_scale(scale: Vec3) -> Self {
        ShapeDesc::Box {
            half_extents: scale.abs(),
        }
    }

    /// Sphere whose radius is the largest scale component (uniform-scale
    /// assumption; a non-uniform scale picks the dominant axis).
    pub fn sphere_from_scale(scale: Vec3) -> Self {
        ShapeDesc::Sphere {
            radius: scale.abs().max_element(),
        }
    }

    /// Capsule whose radius is the larger of the X/Z scale components and
    /// whose cylinder height is the Y scale component.
    pub fn capsule_from_scale(scale: Vec3) -> Self {
        let abs = scale.abs();
        ShapeDesc::Capsule {
            radius: abs.x.max(abs.z),
            half_height: abs.y * 0.5,
        }
    }

    /// Bakes a triangle mesh from a mesh provider, scaling vertices per axis
    /// before shape construction.
    ///
    /// Returns [`PhysicsError::InvalidMesh`] for empty or malformed data; the
    /// caller degrades to "no physics body" rather than crashing creation.
    pub fn mesh_from_source(mesh: &dyn MeshSource, scale: Vec3) -> Result<Self, PhysicsError> {
        let positions = mesh.positions();
        let indices = mesh.indices();

        if positions.is_empty() || indices.is_empty() {
            return Err(PhysicsError::InvalidMesh {
                reason: "mesh has no geometry".to_string(),
            });
        }
        if positions.len() % 3 != 0 {
            return Err(PhysicsError::InvalidMesh {
                reason: format!("position buffer length {} is not a multiple of 3", positions.len()),
            });
        }
        if indices.len() % 3 != 0 {
            return Err(PhysicsError::InvalidMesh {
                reason: format!("index buffer length {} is not a multiple of 3", indices.len()),
            });
        }

        let vertex_count = (positions.len() / 3) as u32;
        let vertices: Vec<[f32; 3]> = positions
            .chunks_exact(3)
            .map(|v| [v[0] * scale.x, v[1] * scale.y, v[2] * scale.z])
            .collect();

        let mut triangles = Vec::with_capacity(indices.len() / 3);
        for tri in indices.chunks_exact(3) {
            for &i in tri {
                if i >= vertex_count {
                    return Err(PhysicsError::InvalidMesh {
                        reason: format!("index {i} out of range for {vertex_count} vertices"),
                    });
                }
            }
            triangles.push([tri[0], tri[1], tri[2]]);
        }

        Ok(ShapeDesc::TriangleMesh {
            vertices,
            indices: triangles,
        })
    }

    /// The shape family of this descriptor.
    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeDesc::Box { .. } => ShapeKind::Box,
            ShapeDesc::Sphere { .. } => ShapeKind::Sphere,
            ShapeDesc::Capsule { .. } => ShapeKind::Capsule,
            ShapeDesc::TriangleMesh { .. } => ShapeKind::TriangleMesh,
        }
    }

    /// Lowers the descriptor to a backend shape.
    pub(crate) fn build(&self) -> Result<SharedShape, PhysicsError> {
        match self {
            ShapeDesc::Box { half_extents } => Ok(SharedShape::cuboid(
                half_extents.x,
                half_extents.y,
                half_extents.z,
            )),
            ShapeDesc::Sphere { radius } => Ok(SharedShape::ball(*radius)),
            ShapeDesc::Capsule {
                radius,
                half_height,
            } => Ok(SharedShape::capsule_y(*half_height, *radius)),
            ShapeDesc::TriangleMesh { vertices, indices } => {
                let points: Vec<Point<Real>> = vertices
                    .iter()
                    .map(|v| point![v[0], v[1], v[2]])
                    .collect();
                SharedShape::trimesh(points, indices.clone()).map_err(|e| {
                    PhysicsError::ShapeCreation {
                        details: e.to_string(),
                    }
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::asset::MeshData;

    fn quad() -> MeshData {
        MeshData {
            positions: vec![
                0.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, //
                1.0, 0.0, 1.0, //
                0.0, 0.0, 1.0,
            ],
            indices: vec![0, 1, 2, 0, 2, 3],
        }
    }

    #[test]
    fn box_half_extents_follow_scale() {
        let desc = ShapeDesc::box_from_scale(Vec3::new(1.0, -2.0, 3.0));
        match desc {
            ShapeDesc::Box { half_extents } => {
                assert_eq!(half_extents, Vec3::new(1.0, 2.0, 3.0));
            }
            other => panic!("expected a box, got {other:?}"),
        }
    }

    #[test]
    fn sphere_radius_is_dominant_axis() {
        let desc = ShapeDesc::sphere_from_scale(Vec3::new(1.0, 4.0, 2.0));
        match desc {
            ShapeDesc::Sphere { radius } => assert_eq!(radius, 4.0),
            other => panic!("expected a sphere, got {other:?}"),
        }
    }

    #[test]
    fn capsule_radius_ignores_y() {
        let desc = ShapeDesc::capsule_from_scale(Vec3::new(0.5, 2.0, 0.75));
        match desc {
            ShapeDesc::Capsule {
                radius,
                half_height,
            } => {
                assert_eq!(radius, 0.75);
                assert_eq!(half_height, 1.0);
            }
            other => panic!("expected a capsule, got {other:?}"),
        }
    }

    #[test]
    fn mesh_vertices_are_scaled_per_axis() {
        let desc = ShapeDesc::mesh_from_source(&quad(), Vec3::new(2.0, 1.0, 3.0))
            .expect("valid mesh");
        match desc {
            ShapeDesc::TriangleMesh { vertices, indices } => {
                assert_eq!(vertices.len(), 4);
                assert_eq!(indices.len(), 2);
                assert_eq!(vertices[2], [2.0, 0.0, 3.0]);
            }
            other => panic!("expected a mesh, got {other:?}"),
        }
    }

    #[test]
    fn mesh_descriptor_lowers_to_a_backend_trimesh() {
        let desc = ShapeDesc::mesh_from_source(&quad(), Vec3::ONE).expect("valid mesh");
        let shared = desc.build().expect("trimesh construction");
        assert!(shared.as_trimesh().is_some());
    }

    #[test]
    fn mesh_with_out_of_range_index_is_rejected() {
        let mut mesh = quad();
        mesh.indices[4] = 99;
        let err = ShapeDesc::mesh_from_source(&mesh, Vec3::ONE).unwrap_err();
        assert!(matches!(err, PhysicsError::InvalidMesh { .. }));
    }

    #[test]
    fn empty_mesh_is_rejected() {
        let mesh = MeshData::default();
        let err = ShapeDesc::mesh_from_source(&mesh, Vec3::ONE).unwrap_err();
        assert!(matches!(err, PhysicsError::InvalidMesh { .. }));
    }
}
