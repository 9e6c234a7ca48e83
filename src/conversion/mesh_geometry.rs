use axisfix_scene::mesh::{MeshBuffer, SharedMesh};
use glam::{Quat, Vec3, Vec4};
use log::trace;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};

/// Remembers which buffers (by identity) have been rotated during one walk, so that a buffer shared by
/// several nodes is still rotated exactly once.
#[derive(Debug, Default)]
pub struct RotatedBuffers {
    seen: HashSet<*const RwLock<MeshBuffer>>,
}

impl RotatedBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the buffer was rotated by this call, `false` if it has been rotated before.
    pub fn rotate_once(&mut self, mesh: &SharedMesh, rotation: Quat) -> bool {
        if !self.seen.insert(Arc::as_ptr(mesh)) {
            return false;
        }

        let mut buffer = mesh.write().expect("poisoned mesh lock");
        MeshGeometryTransformer::rotate(&mut buffer, rotation);
        true
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

pub enum MeshGeometryTransformer {}

impl MeshGeometryTransformer {
    /// Rotates the buffer in place. This is destructive and the buffer may be shared, so callers have to make
    /// sure every buffer identity is only passed in once (see [`crate::conversion::hierarchy::HierarchyWalker`]).
    pub fn rotate(mesh: &mut MeshBuffer, rotation: Quat) {
        for position in &mut mesh.positions {
            *position = rotation * *position;
        }

        for normal in &mut mesh.normals {
            *normal = (rotation * *normal).normalize_or_zero();
        }

        mesh.recalculate_bounds();

        if mesh.has_tangents() {
            if mesh.uv0.len() == mesh.positions.len() && mesh.normals.len() == mesh.positions.len() {
                Self::recalculate_tangents(mesh);
            } else {
                // without UVs (or normals) there is no tangent frame to rebuild, so just carry the old one along.
                trace!("Rotating tangents of a mesh without complete uv0/normals: {:?}", mesh);
                for tangent in &mut mesh.tangents {
                    let direction = (rotation * tangent.truncate()).normalize_or_zero();
                    *tangent = direction.extend(tangent.w);
                }
            }
        }
    }

    /// Per-triangle tangent space accumulation: every triangle contributes its UV aligned edge basis
    /// to its three vertices, the sum is then orthonormalized against the vertex normal.
    pub fn recalculate_tangents(mesh: &mut MeshBuffer) {
        let vertex_count = mesh.positions.len();
        let mut tangent_sums = vec![Vec3::ZERO; vertex_count];
        let mut bitangent_sums = vec![Vec3::ZERO; vertex_count];

        for [i0, i1, i2] in mesh.triangles() {
            let (i0, i1, i2) = (i0 as usize, i1 as usize, i2 as usize);
            if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
                continue;
            }

            let edge1 = mesh.positions[i1] - mesh.positions[i0];
            let edge2 = mesh.positions[i2] - mesh.positions[i0];
            let (s1, t1): (f32, f32) = (mesh.uv0[i1] - mesh.uv0[i0]).into();
            let (s2, t2): (f32, f32) = (mesh.uv0[i2] - mesh.uv0[i0]).into();

            let det = s1 * t2 - s2 * t1;
            if det.abs() <= f32::EPSILON {
                // degenerate UV mapping, this triangle has no meaningful tangent direction
                continue;
            }

            let r = 1.0 / det;
            let sdir = (edge1 * t2 - edge2 * t1) * r;
            let tdir = (edge2 * s1 - edge1 * s2) * r;

            for index in [i0, i1, i2] {
                tangent_sums[index] += sdir;
                bitangent_sums[index] += tdir;
            }
        }

        mesh.tangents = (0..vertex_count)
            .map(|index| {
                let normal = mesh.normals[index];
                let tangent = tangent_sums[index];

                // Gram-Schmidt
                let mut orthogonal = (tangent - normal * normal.dot(tangent)).normalize_or_zero();
                if orthogonal == Vec3::ZERO {
                    orthogonal = if normal == Vec3::ZERO {
                        Vec3::X
                    } else {
                        normal.any_orthonormal_vector()
                    };
                }

                let handedness = if normal.cross(orthogonal).dot(bitangent_sums[index]) < 0.0 {
                    -1.0
                } else {
                    1.0
                };

                Vec4::new(orthogonal.x, orthogonal.y, orthogonal.z, handedness)
            })
            .collect();
    }
}
