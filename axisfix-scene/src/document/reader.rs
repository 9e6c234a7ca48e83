use crate::document::types::{NodeDocument, SceneDocument};
use crate::mesh::{MeshBuffer, SharedMesh};
use crate::node::SceneNode;
use crate::{Scene, SceneError};
use log::trace;
use std::io::Read;

pub struct SceneReader {}

impl SceneReader {
    pub fn read_document<R: Read>(rdr: R) -> Result<SceneDocument, SceneError> {
        Ok(serde_json::from_reader(rdr)?)
    }

    pub fn read_scene<R: Read>(rdr: R) -> Result<Scene, SceneError> {
        Self::into_scene(Self::read_document(rdr)?)
    }

    /// Builds the in-memory scene. Every mesh table entry becomes exactly one shared buffer, no matter
    /// how many nodes refer to it.
    pub fn into_scene(document: SceneDocument) -> Result<Scene, SceneError> {
        let meshes = document
            .meshes
            .into_iter()
            .enumerate()
            .map(|(index, mesh)| Self::import_mesh(index, mesh))
            .collect::<Result<Vec<_>, _>>()?;

        trace!("Importing scene with {} mesh buffers", meshes.len());
        let root = Self::import_node(document.root, &meshes)?;

        Ok(Scene {
            root,
            clips: document.clips,
        })
    }

    fn import_mesh(index: usize, mut mesh: MeshBuffer) -> Result<SharedMesh, SceneError> {
        if !mesh.normals.is_empty() && mesh.normals.len() != mesh.positions.len() {
            return Err(SceneError::MalformedMesh {
                index,
                reason: format!(
                    "{} normals for {} vertices",
                    mesh.normals.len(),
                    mesh.positions.len()
                ),
            });
        }

        let vertex_count = mesh.positions.len() as u32;
        if let Some(oob) = mesh.submeshes.iter().flatten().find(|&&i| i >= vertex_count) {
            return Err(SceneError::MalformedMesh {
                index,
                reason: format!("index {} exceeds {} vertices", oob, vertex_count),
            });
        }

        // the stored bounds are not trusted, they have to match the vertices.
        mesh.recalculate_bounds();
        Ok(mesh.into_shared())
    }

    fn import_node(node: NodeDocument, meshes: &[SharedMesh]) -> Result<SceneNode, SceneError> {
        let mesh_refs = node
            .meshes
            .iter()
            .map(|slot| match slot {
                None => Ok(None),
                Some(index) => meshes
                    .get(*index)
                    .cloned()
                    .map(Some)
                    .ok_or_else(|| SceneError::MeshIndexOutOfRange {
                        node: node.name.clone(),
                        index: *index,
                        count: meshes.len(),
                    }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let children = node
            .children
            .into_iter()
            .map(|child| Self::import_node(child, meshes))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SceneNode {
            name: node.name,
            position: node.position,
            rotation: node.rotation,
            scale: node.scale,
            meshes: mesh_refs,
            renderer_enabled: node.renderer_enabled,
            colliders: node.colliders,
            children,
        })
    }
}
