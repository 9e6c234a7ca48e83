use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
    #[serde(default)]
    pub in_tangent: f32,
    #[serde(default)]
    pub out_tangent: f32,
}

impl Keyframe {
    pub fn new(time: f32, value: f32, in_tangent: f32, out_tangent: f32) -> Self {
        Self {
            time,
            value,
            in_tangent,
            out_tangent,
        }
    }

    /// A key without slope, as used for constant curves.
    pub fn flat(time: f32, value: f32) -> Self {
        Self::new(time, value, 0.0, 0.0)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum CurveProperty {
    #[serde(rename = "position.x")]
    PositionX,
    #[serde(rename = "position.y")]
    PositionY,
    #[serde(rename = "position.z")]
    PositionZ,
    #[serde(rename = "rotation.x")]
    RotationX,
    #[serde(rename = "rotation.y")]
    RotationY,
    #[serde(rename = "rotation.z")]
    RotationZ,
    #[serde(rename = "rotation.w")]
    RotationW,
    #[serde(rename = "scale.x")]
    ScaleX,
    #[serde(rename = "scale.y")]
    ScaleY,
    #[serde(rename = "scale.z")]
    ScaleZ,
}

impl CurveProperty {
    pub const POSITION: [CurveProperty; 3] = [Self::PositionX, Self::PositionY, Self::PositionZ];
    pub const ROTATION: [CurveProperty; 4] = [Self::RotationX, Self::RotationY, Self::RotationZ, Self::RotationW];
    pub const SCALE: [CurveProperty; 3] = [Self::ScaleX, Self::ScaleY, Self::ScaleZ];

    pub fn group(&self) -> PropertyGroup {
        match self {
            Self::PositionX | Self::PositionY | Self::PositionZ => PropertyGroup::Position,
            Self::RotationX | Self::RotationY | Self::RotationZ | Self::RotationW => PropertyGroup::Rotation,
            Self::ScaleX | Self::ScaleY | Self::ScaleZ => PropertyGroup::Scale,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::PositionX => "position.x",
            Self::PositionY => "position.y",
            Self::PositionZ => "position.z",
            Self::RotationX => "rotation.x",
            Self::RotationY => "rotation.y",
            Self::RotationZ => "rotation.z",
            Self::RotationW => "rotation.w",
            Self::ScaleX => "scale.x",
            Self::ScaleY => "scale.y",
            Self::ScaleZ => "scale.z",
        }
    }
}

impl Display for CurveProperty {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PropertyGroup {
    Position,
    Rotation,
    Scale,
}

impl Display for PropertyGroup {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Position => f.write_str("position"),
            Self::Rotation => f.write_str("rotation"),
            Self::Scale => f.write_str("scale"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationCurve {
    /// Object path relative to the hierarchy root, `""` being the root.
    pub path: String,
    pub property: CurveProperty,
    pub keys: Vec<Keyframe>,
}

impl AnimationCurve {
    pub fn new(path: impl Into<String>, property: CurveProperty, keys: Vec<Keyframe>) -> Self {
        Self {
            path: path.into(),
            property,
            keys,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    pub curves: Vec<AnimationCurve>,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            curves: vec![],
        }
    }

    pub fn with_curve(mut self, curve: AnimationCurve) -> Self {
        self.curves.push(curve);
        self
    }

    /// Curves are unique per (path, property), the first match wins if a document violates that.
    pub fn curve_index(&self, path: &str, property: CurveProperty) -> Option<usize> {
        self.curves
            .iter()
            .position(|curve| curve.path == path && curve.property == property)
    }

    pub fn curve(&self, path: &str, property: CurveProperty) -> Option<&AnimationCurve> {
        self.curve_index(path, property).map(|index| &self.curves[index])
    }

    /// Distinct object paths in order of first appearance.
    pub fn object_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = Vec::new();
        for curve in &self.curves {
            if !paths.contains(&curve.path) {
                paths.push(curve.path.clone());
            }
        }
        paths
    }
}
