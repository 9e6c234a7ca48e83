use glam::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};
use std::sync::{Arc, RwLock};

/// Meshes are shared by reference between nodes, instancing is literally "the same Arc".
pub type SharedMesh = Arc<RwLock<MeshBuffer>>;

#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Computes the tightest box around `points`. An empty slice yields a zero sized box at the origin.
    pub fn from_points(points: &[Vec3]) -> Self {
        let Some(first) = points.first() else {
            return Self::default();
        };

        let (min, max) = points
            .iter()
            .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));

        Self { min, max }
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    #[inline]
    pub fn extents(&self) -> Vec3 {
        self.size() * 0.5
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct MeshBuffer {
    pub positions: Vec<Vec3>,
    #[serde(default)]
    pub normals: Vec<Vec3>,
    /// xyz is the tangent direction, w the bitangent sign (+1/-1).
    #[serde(default)]
    pub tangents: Vec<Vec4>,
    #[serde(default)]
    pub uv0: Vec<Vec2>,
    #[serde(default)]
    pub uv1: Vec<Vec2>,
    /// One index list per submesh (material slot).
    #[serde(default)]
    pub submeshes: Vec<Vec<u32>>,
    #[serde(default)]
    pub bounds: Aabb,
}

impl MeshBuffer {
    pub fn new(positions: Vec<Vec3>, normals: Vec<Vec3>, submeshes: Vec<Vec<u32>>) -> Self {
        let mut mesh = Self {
            positions,
            normals,
            submeshes,
            ..Default::default()
        };
        mesh.recalculate_bounds();
        mesh
    }

    pub fn with_uv0(mut self, uv0: Vec<Vec2>) -> Self {
        self.uv0 = uv0;
        self
    }

    pub fn with_uv1(mut self, uv1: Vec<Vec2>) -> Self {
        self.uv1 = uv1;
        self
    }

    pub fn with_tangents(mut self, tangents: Vec<Vec4>) -> Self {
        self.tangents = tangents;
        self
    }

    pub fn into_shared(self) -> SharedMesh {
        Arc::new(RwLock::new(self))
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn has_tangents(&self) -> bool {
        !self.tangents.is_empty()
    }

    pub fn recalculate_bounds(&mut self) {
        self.bounds = Aabb::from_points(&self.positions);
    }

    /// Iterates all triangles of all submeshes. Trailing indices that don't form a full triangle are skipped.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.submeshes
            .iter()
            .flat_map(|indices| indices.chunks_exact(3).map(|tri| [tri[0], tri[1], tri[2]]))
    }
}

impl Debug for MeshBuffer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{ positions: [{}], ", self.positions.len())?;
        write!(f, "normals: [{}], ", self.normals.len())?;
        write!(f, "tangents: [{}], ", self.tangents.len())?;
        write!(f, "uv0: [{}], ", self.uv0.len())?;
        write!(f, "uv1: [{}], ", self.uv1.len())?;
        write!(f, "submeshes: {:?}, ", self.submeshes.iter().map(Vec::len).collect::<Vec<_>>())?;
        write!(f, "bounds: {:?} }}", self.bounds)
    }
}
