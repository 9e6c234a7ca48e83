use crate::document::types::{NodeDocument, SceneDocument};
use crate::mesh::{MeshBuffer, SharedMesh};
use crate::node::SceneNode;
use crate::{Scene, SceneError};
use std::io::Write;
use std::sync::Arc;

pub struct SceneWriter {}

impl SceneWriter {
    pub fn write_scene<W: Write>(w: W, scene: &Scene) -> Result<(), SceneError> {
        serde_json::to_writer_pretty(w, &Self::to_document(scene))?;
        Ok(())
    }

    /// Flattens the scene back into a mesh table. Buffers are keyed by identity, so deduplicated
    /// meshes are only written once.
    pub fn to_document(scene: &Scene) -> SceneDocument {
        let mut table: Vec<SharedMesh> = Vec::new();
        let root = Self::export_node(&scene.root, &mut table);

        let meshes = table
            .iter()
            .map(|mesh| mesh.read().expect("poisoned mesh lock").clone())
            .collect::<Vec<MeshBuffer>>();

        SceneDocument {
            meshes,
            root,
            clips: scene.clips.clone(),
        }
    }

    fn export_node(node: &SceneNode, table: &mut Vec<SharedMesh>) -> NodeDocument {
        let meshes = node
            .meshes
            .iter()
            .map(|slot| slot.as_ref().map(|mesh| Self::table_index(mesh, table)))
            .collect();

        NodeDocument {
            name: node.name.clone(),
            position: node.position,
            rotation: node.rotation,
            scale: node.scale,
            meshes,
            renderer_enabled: node.renderer_enabled,
            colliders: node.colliders.clone(),
            children: node
                .children
                .iter()
                .map(|child| Self::export_node(child, table))
                .collect(),
        }
    }

    fn table_index(mesh: &SharedMesh, table: &mut Vec<SharedMesh>) -> usize {
        if let Some(index) = table.iter().position(|known| Arc::ptr_eq(known, mesh)) {
            return index;
        }

        table.push(mesh.clone());
        table.len() - 1
    }
}
