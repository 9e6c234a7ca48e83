use crate::instancing::fingerprint::MeshContentHasher;
use crate::report::DedupReport;
use axisfix_scene::mesh::{MeshBuffer, SharedMesh};
use axisfix_scene::node::SceneNode;
use log::{debug, trace};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, RwLock};

pub enum MeshDeduplicator {}

impl MeshDeduplicator {
    /// Points every reference at the first buffer with the same fingerprint, in iteration order.
    /// References that already are the canonical buffer are not counted as instanced.
    pub fn deduplicate<'a>(slots: impl IntoIterator<Item = &'a mut Option<SharedMesh>>) -> DedupReport {
        let mut canonical: HashMap<u64, SharedMesh> = HashMap::new();
        let mut fingerprints: HashMap<*const RwLock<MeshBuffer>, u64> = HashMap::new();
        let mut report = DedupReport::default();

        for slot in slots {
            let Some(mesh) = slot.as_mut() else {
                continue;
            };

            let fingerprint = *fingerprints
                .entry(Arc::as_ptr(mesh))
                .or_insert_with(|| MeshContentHasher::fingerprint(&mesh.read().expect("poisoned mesh lock")));

            match canonical.entry(fingerprint) {
                Entry::Vacant(entry) => {
                    entry.insert(mesh.clone());
                }
                Entry::Occupied(entry) => {
                    if !Arc::ptr_eq(entry.get(), mesh) {
                        trace!("Instancing mesh {:016x}", fingerprint);
                        *mesh = entry.get().clone();
                        report.instanced += 1;
                    }
                }
            }
        }

        report.unique_meshes = canonical.len();
        report
    }

    pub fn deduplicate_hierarchy(root: &mut SceneNode) -> DedupReport {
        let report = Self::deduplicate(root.mesh_slots_mut());
        debug!(
            "{}: {} unique meshes, {} references instanced",
            root.name, report.unique_meshes, report.instanced
        );
        report
    }

    /// Like [`MeshDeduplicator::deduplicate_hierarchy`], but copies are also found across the given roots.
    pub fn deduplicate_scene(roots: &mut [SceneNode]) -> DedupReport {
        Self::deduplicate(roots.iter_mut().flat_map(SceneNode::mesh_slots_mut))
    }
}
