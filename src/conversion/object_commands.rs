use axisfix_scene::node::{ColliderShape, SceneNode};
use itertools::Itertools;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const COMMAND_MARKER: &str = "--";

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ObjectCommand {
    /// `norend`: disable the mesh renderer, e.g. for collision-only geometry.
    RemoveRenderer,
    /// `coll`: add a mesh collider.
    AddCollider,
    /// `convcoll`: add a convex mesh collider.
    AddConvexCollider,
}

impl ObjectCommand {
    pub fn token(&self) -> &'static str {
        match self {
            Self::RemoveRenderer => "norend",
            Self::AddCollider => "coll",
            Self::AddConvexCollider => "convcoll",
        }
    }

    pub fn apply(&self, node: &mut SceneNode) {
        match self {
            Self::RemoveRenderer => node.renderer_enabled = false,
            Self::AddCollider => node.colliders.push(ColliderShape::Mesh),
            Self::AddConvexCollider => node.colliders.push(ColliderShape::ConvexMesh),
        }
    }
}

impl FromStr for ObjectCommand {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "norend" => Ok(Self::RemoveRenderer),
            "coll" => Ok(Self::AddCollider),
            "convcoll" => Ok(Self::AddConvexCollider),
            _ => Err(()),
        }
    }
}

impl Display for ObjectCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ParsedName {
    pub base_name: String,
    /// In the order they appear in the name.
    pub commands: Vec<ObjectCommand>,
}

impl ParsedName {
    /// Strips `--token` suffixes from the end of `name` until no marker is left. Unknown tokens are
    /// stripped as well, but don't show up in [`ParsedName::commands`].
    pub fn parse(name: &str) -> Self {
        let mut rest = name;
        let mut commands = Vec::new();

        while let Some((head, token)) = rest.rsplit_once(COMMAND_MARKER) {
            if let Ok(command) = token.trim().parse::<ObjectCommand>() {
                commands.insert(0, command);
            }
            rest = head;
        }

        ParsedName {
            base_name: rest
                .trim_end_matches(|c: char| c == '_' || c.is_whitespace())
                .to_string(),
            commands,
        }
    }

    pub fn has_marker(name: &str) -> bool {
        name.contains(COMMAND_MARKER)
    }

    pub fn command_list(&self) -> String {
        self.commands.iter().join(", ")
    }
}
