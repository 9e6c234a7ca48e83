use crate::conversion::mesh_geometry::RotatedBuffers;
use crate::conversion::spatial_transformer::SpatialTransformer;
use crate::conversion::{ConversionOptions, NodeDepth};
use crate::report::ConversionLog;
use axisfix_scene::node::SceneNode;
use log::debug;
use std::collections::HashMap;

/// Which node(s) of an imported hierarchy absorb the rotation fix.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum HierarchyCase {
    /// Case A: the root is the first-level object, all its descendants are nested.
    RootIsFirstLevel,
    /// Case B: the root is an empty parent that stays untouched, each direct child is a first-level object.
    ChildrenAreFirstLevel,
}

pub enum HierarchyClassifier {}

impl HierarchyClassifier {
    pub fn classify(root: &SceneNode, force_fix_root: bool) -> HierarchyCase {
        if force_fix_root || root.has_mesh() || Self::is_split_mesh(root) {
            HierarchyCase::RootIsFirstLevel
        } else {
            HierarchyCase::ChildrenAreFirstLevel
        }
    }

    /// Big meshes get split into parts on export (`wheel_MeshPart0`, `wheel_MeshPart1`, ...). Those parts
    /// are really one object and have to stay in the frame of their common parent. A single numbered
    /// child is not a split.
    pub fn is_split_mesh(root: &SceneNode) -> bool {
        if root.children.len() < 2 {
            return false;
        }

        let mut prefixes = root.children.iter().map(|child| Self::split_numeric_suffix(&child.name));

        let Some(Some(first)) = prefixes.next() else {
            return false;
        };

        prefixes.all(|prefix| prefix == Some(first))
    }

    /// Returns the prefix of a name that ends in a pure numeric suffix, if both are non-empty.
    fn split_numeric_suffix(name: &str) -> Option<&str> {
        let prefix = name.trim_end_matches(|c: char| c.is_ascii_digit());
        if prefix.is_empty() || prefix.len() == name.len() {
            None
        } else {
            Some(prefix)
        }
    }
}

/// Depth of every rebased object, keyed by its path before the walk (the paths animation clips refer to).
/// Objects that are left untouched (the root in case B) have no entry.
#[derive(Debug, Default, Clone)]
pub struct DepthMap {
    depths: HashMap<String, NodeDepth>,
    renamed: HashMap<String, String>,
}

impl DepthMap {
    pub fn depth(&self, path: &str) -> Option<NodeDepth> {
        self.depths.get(path).copied()
    }

    pub fn insert(&mut self, path: impl Into<String>, depth: NodeDepth) {
        self.depths.insert(path.into(), depth);
    }

    /// Path after object commands stripped their tokens from the names, if it changed.
    pub fn renamed_path(&self, path: &str) -> Option<&str> {
        self.renamed.get(path).map(String::as_str)
    }

    pub fn renames(&self) -> impl Iterator<Item = (&str, &str)> {
        self.renamed.iter().map(|(from, to)| (from.as_str(), to.as_str()))
    }

    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }
}

pub struct HierarchyWalker<'a> {
    options: &'a ConversionOptions,
    transformer: SpatialTransformer,
}

impl<'a> HierarchyWalker<'a> {
    pub fn new(options: &'a ConversionOptions) -> Self {
        Self {
            options,
            transformer: SpatialTransformer::new(options),
        }
    }

    /// Classification only, without touching the hierarchy. This is what the animation pass needs when
    /// the geometry fix itself is disabled.
    pub fn classify(&self, root: &SceneNode) -> DepthMap {
        let mut map = DepthMap::default();
        let case = HierarchyClassifier::classify(root, self.options.force_fix_root);
        match case {
            HierarchyCase::RootIsFirstLevel => Self::classify_subtree(root, "", NodeDepth::FirstLevel, &mut map),
            HierarchyCase::ChildrenAreFirstLevel => {
                for child in &root.children {
                    Self::classify_subtree(child, &child.name, NodeDepth::FirstLevel, &mut map);
                }
            }
        }
        map
    }

    fn classify_subtree(node: &SceneNode, path: &str, depth: NodeDepth, map: &mut DepthMap) {
        map.insert(path, depth);
        for child in &node.children {
            let child_path = SceneNode::child_path(path, &child.name);
            Self::classify_subtree(child, &child_path, NodeDepth::Nested, map);
        }
    }

    /// Rebases the whole hierarchy in place and returns the depth of every rebased object.
    pub fn walk(&self, root: &mut SceneNode, log: &mut ConversionLog) -> DepthMap {
        let case = HierarchyClassifier::classify(root, self.options.force_fix_root);
        debug!("Hierarchy {} classified as {:?}", root.name, case);

        let mut map = DepthMap::default();
        let mut rotated = RotatedBuffers::new();

        match case {
            HierarchyCase::RootIsFirstLevel => {
                self.walk_subtree(root, "", "", NodeDepth::FirstLevel, &mut rotated, &mut map, log);
            }
            HierarchyCase::ChildrenAreFirstLevel => {
                for child in &mut root.children {
                    let path = child.name.clone();
                    self.walk_subtree(child, &path, "", NodeDepth::FirstLevel, &mut rotated, &mut map, log);
                }
            }
        }

        debug!(
            "Rebased {} objects and {} mesh buffers of {}",
            map.len(),
            rotated.len(),
            root.name
        );
        map
    }

    /// `path` is the node's path before the walk, `new_parent_path` the already renamed path of its parent.
    #[allow(clippy::too_many_arguments)]
    fn walk_subtree(
        &self,
        node: &mut SceneNode,
        path: &str,
        new_parent_path: &str,
        depth: NodeDepth,
        rotated: &mut RotatedBuffers,
        map: &mut DepthMap,
        log: &mut ConversionLog,
    ) {
        map.insert(path, depth);

        let is_root = path.is_empty();
        let new_name = self.transformer.apply(node, depth, rotated, log);
        let new_path = if is_root {
            String::new()
        } else {
            SceneNode::child_path(new_parent_path, &new_name)
        };

        if new_path != path {
            map.renamed.insert(path.to_string(), new_path.clone());
        }

        for child in &mut node.children {
            let child_path = SceneNode::child_path(path, &child.name);
            self.walk_subtree(child, &child_path, &new_path, NodeDepth::Nested, rotated, map, log);
        }
    }
}
