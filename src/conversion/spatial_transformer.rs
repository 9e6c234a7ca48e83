use crate::conversion::coordinate_systems;
use crate::conversion::float_snap::FloatSnapper;
use crate::conversion::mesh_geometry::RotatedBuffers;
use crate::conversion::object_commands::ParsedName;
use crate::conversion::{ConversionOptions, NodeDepth};
use crate::report::ConversionLog;
use axisfix_scene::node::SceneNode;
use glam::{Quat, Vec3};
use log::trace;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LocalTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl From<&SceneNode> for LocalTransform {
    fn from(node: &SceneNode) -> Self {
        Self {
            position: node.position,
            rotation: node.rotation,
            scale: node.scale,
        }
    }
}

impl LocalTransform {
    fn write_to(self, node: &mut SceneNode) {
        node.position = self.position;
        node.rotation = self.rotation;
        node.scale = self.scale;
    }
}

/// Rebases the local transform of a single node, see [`NodeDepth`] for the two flavours.
#[derive(Debug)]
pub struct SpatialTransformer {
    turn_around: bool,
    object_commands: bool,
    snapper: Option<FloatSnapper>,
}

impl SpatialTransformer {
    pub fn new(options: &ConversionOptions) -> Self {
        Self {
            turn_around: options.turn_around,
            object_commands: options.object_commands,
            snapper: options
                .float_fix
                .then(|| FloatSnapper::new(options.snap_epsilon)),
        }
    }

    /// The complete per-node step: transform, geometry, object commands and float snapping.
    /// Returns the node's name after command tokens have been stripped.
    pub fn apply(
        &self,
        node: &mut SceneNode,
        depth: NodeDepth,
        rotated: &mut RotatedBuffers,
        log: &mut ConversionLog,
    ) -> String {
        let rebased = self.rebase(LocalTransform::from(&*node), depth);
        rebased.write_to(node);
        self.rotate_meshes(node, rotated);

        if self.object_commands {
            self.apply_object_commands(node, log);
        }

        if let Some(snapper) = &self.snapper {
            node.position = snapper.snap_vec3(node.position);
            node.rotation = snapper.snap_rotation(node.rotation);
            node.scale = snapper.snap_vec3(node.scale);
        }

        trace!("Rebased {:?} node {}", depth, node.name);
        node.name.clone()
    }

    /// Pure transform part of [`SpatialTransformer::apply`], without geometry, commands and snapping.
    pub fn rebase(&self, transform: LocalTransform, depth: NodeDepth) -> LocalTransform {
        match depth {
            NodeDepth::FirstLevel => self.rebase_first_level(transform),
            NodeDepth::Nested => self.rebase_nested(transform),
        }
    }

    fn rebase_first_level(&self, transform: LocalTransform) -> LocalTransform {
        let mut position = transform.position;
        let mut rotation = transform.rotation * coordinate_systems::first_level_fix();

        if self.turn_around {
            position = coordinate_systems::turn_around() * position;
            rotation = coordinate_systems::turn_around_rotation(rotation);
        }

        LocalTransform {
            position,
            rotation,
            scale: coordinate_systems::swap_yz(transform.scale),
        }
    }

    fn rebase_nested(&self, transform: LocalTransform) -> LocalTransform {
        let mut rotation = coordinate_systems::rh_to_lh(transform.rotation);
        if self.turn_around {
            rotation = coordinate_systems::turn_around_rotation(rotation);
        }

        LocalTransform {
            position: self.mesh_rotation() * transform.position,
            rotation,
            scale: coordinate_systems::swap_yz(transform.scale),
        }
    }

    /// Geometry gets the same rotation on both depths: first-level meshes counter the absorbed fix,
    /// nested meshes live inside the rotated frame of their parent.
    #[inline]
    pub fn mesh_rotation(&self) -> Quat {
        coordinate_systems::compound_rotation(self.turn_around)
    }

    pub fn rotate_meshes(&self, node: &SceneNode, rotated: &mut RotatedBuffers) {
        let rotation = self.mesh_rotation();
        for mesh in node.meshes.iter().flatten() {
            if !rotated.rotate_once(mesh, rotation) {
                trace!("Mesh of {} has already been rotated through another reference", node.name);
            }
        }
    }

    pub fn apply_object_commands(&self, node: &mut SceneNode, log: &mut ConversionLog) {
        if !ParsedName::has_marker(&node.name) {
            return;
        }

        let parsed = ParsedName::parse(&node.name);
        for command in &parsed.commands {
            command.apply(node);
        }

        if parsed.commands.is_empty() {
            trace!("{}: stripped unknown commands, renamed to {}", node.name, parsed.base_name);
        } else {
            log.info(format!(
                "{}: applied [{}], renamed to {}",
                node.name,
                parsed.command_list(),
                parsed.base_name
            ));
        }
        node.name = parsed.base_name;
    }
}
