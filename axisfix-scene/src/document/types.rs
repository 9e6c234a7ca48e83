use crate::animation::AnimationClip;
use crate::mesh::MeshBuffer;
use crate::node::ColliderShape;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDocument {
    #[serde(default)]
    pub meshes: Vec<MeshBuffer>,
    pub root: NodeDocument,
    #[serde(default)]
    pub clips: Vec<AnimationClip>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDocument {
    pub name: String,
    #[serde(default = "default_position")]
    pub position: Vec3,
    #[serde(default = "default_rotation")]
    pub rotation: Quat,
    #[serde(default = "default_scale")]
    pub scale: Vec3,
    /// Indices into [`SceneDocument::meshes`], `None` is a null reference.
    #[serde(default)]
    pub meshes: Vec<Option<usize>>,
    #[serde(default = "default_renderer_enabled")]
    pub renderer_enabled: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colliders: Vec<ColliderShape>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeDocument>,
}

fn default_position() -> Vec3 {
    Vec3::ZERO
}

fn default_rotation() -> Quat {
    Quat::IDENTITY
}

fn default_scale() -> Vec3 {
    Vec3::ONE
}

fn default_renderer_enabled() -> bool {
    true
}
