//! Rebasing of imported hierarchies from the source convention (RHS, Z up) to the engine convention
//! (LHS, Y up). Static transforms and geometry are handled by [`hierarchy::HierarchyWalker`], animation
//! curves by [`animation::rebaser::AnimationCurveRebaser`], both share the same [`NodeDepth`] classification.
pub mod animation;
/// Constants and closed-form conversions between the two coordinate systems.
pub mod coordinate_systems;
pub mod float_snap;
pub mod hierarchy;
pub mod mesh_geometry;
/// `--token` suffixes in object names that ask the importer to modify the object.
pub mod object_commands;
pub mod spatial_transformer;

/// Same default as the importer always used, large enough for the residue of the trigonometric
/// conversions but well below anything an artist would type.
pub const DEFAULT_SNAP_EPSILON: f32 = 1.53e-5;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ConversionOptions {
    /// Rebase transforms and mesh geometry.
    pub geometry_fix: bool,
    /// Deduplicate structurally identical meshes after conversion.
    pub optimize_instances: bool,
    /// Additionally turn everything 180° around the up axis.
    pub turn_around: bool,
    pub animation_fix: bool,
    pub float_fix: bool,
    pub object_commands: bool,
    /// Treat the root as first-level object, even if it has no mesh.
    pub force_fix_root: bool,
    pub snap_epsilon: f32,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            geometry_fix: true,
            optimize_instances: false,
            turn_around: false,
            animation_fix: true,
            float_fix: true,
            object_commands: true,
            force_fix_root: false,
            snap_epsilon: DEFAULT_SNAP_EPSILON,
        }
    }
}

/// Where a node sits relative to the objects that carry the source format's baked rotation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum NodeDepth {
    /// Top-most mesh-bearing object, absorbs the rotation fix directly.
    FirstLevel,
    /// Anything below a first-level object, compensates for the parent's absorbed rotation.
    Nested,
}
