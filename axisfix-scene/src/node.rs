use crate::mesh::SharedMesh;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColliderShape {
    /// Collider built from the node's triangle mesh.
    Mesh,
    /// Collider built from the convex hull of the node's mesh.
    ConvexMesh,
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    /// A `None` slot is a mesh filter that lost its mesh, it's kept to mirror the source.
    pub meshes: Vec<Option<SharedMesh>>,
    pub renderer_enabled: bool,
    pub colliders: Vec<ColliderShape>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            meshes: vec![],
            renderer_enabled: true,
            colliders: vec![],
            children: vec![],
        }
    }

    pub fn with_transform(mut self, position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        self.position = position;
        self.rotation = rotation;
        self.scale = scale;
        self
    }

    pub fn with_mesh(mut self, mesh: SharedMesh) -> Self {
        self.meshes.push(Some(mesh));
        self
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = SceneNode>) -> Self {
        self.children.extend(children);
        self
    }

    #[inline]
    pub fn has_mesh(&self) -> bool {
        self.meshes.iter().any(Option::is_some)
    }

    /// Path of a child relative to the hierarchy root, the root itself is `""`.
    pub fn child_path(parent_path: &str, child_name: &str) -> String {
        if parent_path.is_empty() {
            child_name.to_string()
        } else {
            format!("{}/{}", parent_path, child_name)
        }
    }

    /// Depth-first (pre-order) visit of all mesh slots in this subtree.
    pub fn mesh_slots_mut(&mut self) -> Vec<&mut Option<SharedMesh>> {
        let mut slots = Vec::new();
        Self::collect_mesh_slots(self, &mut slots);
        slots
    }

    fn collect_mesh_slots<'a>(node: &'a mut SceneNode, slots: &mut Vec<&'a mut Option<SharedMesh>>) {
        slots.extend(node.meshes.iter_mut());
        for child in &mut node.children {
            Self::collect_mesh_slots(child, slots);
        }
    }

    /// Number of distinct buffers (by identity) referenced in this subtree.
    pub fn distinct_mesh_count(&self) -> usize {
        let mut seen: Vec<*const _> = Vec::new();
        self.visit(&mut |node| {
            for mesh in node.meshes.iter().flatten() {
                let ptr = Arc::as_ptr(mesh);
                if !seen.contains(&ptr) {
                    seen.push(ptr);
                }
            }
        });
        seen.len()
    }

    pub fn visit<F: FnMut(&SceneNode)>(&self, f: &mut F) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }

    pub fn find(&self, path: &str) -> Option<&SceneNode> {
        if path.is_empty() {
            return Some(self);
        }

        let mut node = self;
        for segment in path.split('/') {
            node = node.children.iter().find(|child| child.name == segment)?;
        }
        Some(node)
    }
}
