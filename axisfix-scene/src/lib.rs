use thiserror::Error;

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Node {node} references mesh #{index}, but the document only has {count} meshes")]
    MeshIndexOutOfRange { node: String, index: usize, count: usize },

    #[error("Mesh #{index} is malformed, because: {reason}")]
    MalformedMesh { index: usize, reason: String },

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    /// Represents all other cases of `std::io::Error`.
    #[error(transparent)]
    IOError(#[from] std::io::Error),
}

pub mod animation;
pub mod document;
pub mod mesh;
pub mod node;

/// A full scene: one imported hierarchy and the clips animating it.
#[derive(Debug)]
pub struct Scene {
    pub root: node::SceneNode,
    pub clips: Vec<animation::AnimationClip>,
}
