use crate::conversion::animation::curve_set::{CurveSet, CurveSetError};
use crate::conversion::coordinate_systems;
use crate::conversion::float_snap::FloatSnapper;
use crate::conversion::hierarchy::DepthMap;
use crate::conversion::{ConversionOptions, NodeDepth};
use crate::report::ConversionLog;
use axisfix_scene::animation::{AnimationClip, CurveProperty, Keyframe};
use glam::Vec3;
use log::{debug, trace};

/// Splits a frame of `N` keys into the three component vectors that are transformed independently.
fn split<const N: usize>(frame: [Keyframe; N]) -> ([f32; N], [f32; N], [f32; N]) {
    (
        frame.map(|key| key.value),
        frame.map(|key| key.in_tangent),
        frame.map(|key| key.out_tangent),
    )
}

fn join<const N: usize>(
    mut frame: [Keyframe; N],
    (values, in_tangents, out_tangents): ([f32; N], [f32; N], [f32; N]),
) -> [Keyframe; N] {
    for (index, key) in frame.iter_mut().enumerate() {
        key.value = values[index];
        key.in_tangent = in_tangents[index];
        key.out_tangent = out_tangents[index];
    }
    frame
}

/// Re-expresses animation curves in the target convention, mirroring what
/// [`crate::conversion::spatial_transformer::SpatialTransformer`] does to the static transforms.
pub struct AnimationCurveRebaser<'a> {
    depths: &'a DepthMap,
    turn_around: bool,
    snapper: Option<FloatSnapper>,
}

impl<'a> AnimationCurveRebaser<'a> {
    pub fn new(options: &ConversionOptions, depths: &'a DepthMap) -> Self {
        Self {
            depths,
            turn_around: options.turn_around,
            snapper: options
                .float_fix
                .then(|| FloatSnapper::new(options.snap_epsilon)),
        }
    }

    pub fn rebase_clip(&self, clip: &mut AnimationClip, log: &mut ConversionLog) {
        debug!("Rebasing {} curves of clip {}", clip.curves.len(), clip.name);

        for path in clip.object_paths() {
            match self.depths.depth(&path) {
                Some(depth) => self.rebase_object(clip, &path, depth, log),
                None => trace!("{}: {:?} is not a rebased object, curves left as they are", clip.name, path),
            }
        }
    }

    /// Every group is handled on its own, a broken group doesn't keep the other ones from being converted.
    pub fn rebase_object(&self, clip: &mut AnimationClip, path: &str, depth: NodeDepth, log: &mut ConversionLog) {
        let results = [
            self.rebase_rotation(clip, path, depth),
            self.rebase_position(clip, path, depth),
            self.rebase_scale(clip, path),
        ];

        for error in results.into_iter().filter_map(Result::err) {
            log.warn(format!("{}: {}", clip.name, error));
        }
    }

    pub fn rebase_rotation(&self, clip: &mut AnimationClip, path: &str, depth: NodeDepth) -> Result<(), CurveSetError> {
        let Some(set) = CurveSet::fetch(clip, path, CurveProperty::ROTATION)? else {
            return Ok(());
        };

        let convert = |components: [f32; 4]| {
            let converted = match depth {
                NodeDepth::FirstLevel => coordinate_systems::first_level_components(components),
                NodeDepth::Nested => coordinate_systems::rh_to_lh_components(components),
            };

            if self.turn_around {
                coordinate_systems::turn_around_components(converted)
            } else {
                converted
            }
        };
        let convert_tangents = |components: [f32; 4]| {
            let converted = match depth {
                NodeDepth::FirstLevel => coordinate_systems::first_level_tangent_components(components),
                NodeDepth::Nested => coordinate_systems::rh_to_lh_components(components),
            };

            if self.turn_around {
                coordinate_systems::turn_around_components(converted)
            } else {
                converted
            }
        };

        set.map_frames(clip, |frame| {
            let (values, in_tangents, out_tangents) = split(frame);
            join(
                frame,
                (convert(values), convert_tangents(in_tangents), convert_tangents(out_tangents)),
            )
        });

        trace!("{}: rebased {} rotation keys", path, set.key_count());
        Ok(())
    }

    /// Values go through the same quaternion as the static position, tangents through the equivalent
    /// signed permutation so that stepped (infinite) tangents survive. First-level objects without
    /// turn-around keep their positions, but are still snapped like the static position is.
    pub fn rebase_position(&self, clip: &mut AnimationClip, path: &str, depth: NodeDepth) -> Result<(), CurveSetError> {
        let rotation = match (depth, self.turn_around) {
            (NodeDepth::FirstLevel, false) => None,
            (NodeDepth::FirstLevel, true) => Some(coordinate_systems::turn_around()),
            (NodeDepth::Nested, turn_around) => Some(coordinate_systems::compound_rotation(turn_around)),
        };

        if rotation.is_none() && self.snapper.is_none() {
            return Ok(());
        }

        let permute = |components: [f32; 3]| match (depth, rotation) {
            (_, None) => components,
            (NodeDepth::FirstLevel, Some(_)) => coordinate_systems::turn_around_vector_components(components),
            (NodeDepth::Nested, Some(_)) => coordinate_systems::compound_components(components, self.turn_around),
        };

        let Some(set) = CurveSet::fetch(clip, path, CurveProperty::POSITION)? else {
            return Ok(());
        };

        set.map_frames(clip, |frame| {
            let (values, in_tangents, out_tangents) = split(frame);

            let mut value = Vec3::from_array(values);
            if let Some(rotation) = rotation {
                value = rotation * value;
            }
            if let Some(snapper) = &self.snapper {
                value = snapper.snap_vec3(value);
            }

            join(frame, (value.to_array(), permute(in_tangents), permute(out_tangents)))
        });

        trace!("{}: rebased {} position keys", path, set.key_count());
        Ok(())
    }

    /// Scale swaps its Y and Z curves. Values are only touched by the snapper.
    pub fn rebase_scale(&self, clip: &mut AnimationClip, path: &str) -> Result<(), CurveSetError> {
        let Some(set) = CurveSet::fetch(clip, path, CurveProperty::SCALE)? else {
            return Ok(());
        };

        if let Some(snapper) = &self.snapper {
            set.map_frames(clip, |frame| {
                frame.map(|mut key| {
                    key.value = snapper.snap(key.value);
                    key
                })
            });
        }

        let [_, y, z] = set.curve_indices();
        clip.curves[y].property = CurveProperty::ScaleZ;
        clip.curves[z].property = CurveProperty::ScaleY;
        Ok(())
    }

    /// Points curves of renamed objects to their new paths, so the clip keeps binding after the walk.
    pub fn rename_paths(clip: &mut AnimationClip, depths: &DepthMap) -> usize {
        let mut renamed = 0;
        for curve in &mut clip.curves {
            if let Some(new_path) = depths.renamed_path(&curve.path) {
                curve.path = new_path.to_string();
                renamed += 1;
            }
        }
        renamed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axisfix_scene::animation::AnimationCurve;
    use glam::Quat;
    use std::f32::consts::FRAC_PI_2;

    fn depths(path: &str, depth: NodeDepth) -> DepthMap {
        let mut map = DepthMap::default();
        map.insert(path, depth);
        map
    }

    fn options(turn_around: bool) -> ConversionOptions {
        ConversionOptions {
            turn_around,
            float_fix: false,
            ..Default::default()
        }
    }

    fn constant(property: CurveProperty, value: f32) -> AnimationCurve {
        AnimationCurve::new("arm", property, vec![Keyframe::flat(0.0, value), Keyframe::flat(1.0, value)])
    }

    fn rotation_clip(q: Quat) -> AnimationClip {
        CurveProperty::ROTATION
            .iter()
            .zip(q.to_array())
            .fold(AnimationClip::new("swing"), |clip, (property, value)| {
                clip.with_curve(constant(*property, value))
            })
    }

    fn position_clip(values: [f32; 3], tangent: f32) -> AnimationClip {
        CurveProperty::POSITION
            .iter()
            .zip(values)
            .fold(AnimationClip::new("move"), |clip, (property, value)| {
                clip.with_curve(AnimationCurve::new(
                    "arm",
                    *property,
                    vec![Keyframe::new(0.0, value, tangent, tangent)],
                ))
            })
    }

    fn value_of(clip: &AnimationClip, property: CurveProperty) -> f32 {
        clip.curve("arm", property).unwrap().keys[0].value
    }

    #[test]
    fn first_level_rotation_matches_static_rebase() {
        let q = Quat::from_euler(glam::EulerRot::XYZ, 0.4, -0.3, 1.1);
        let map = depths("arm", NodeDepth::FirstLevel);
        let options = options(true);
        let mut clip = rotation_clip(q);

        AnimationCurveRebaser::new(&options, &map).rebase_clip(&mut clip, &mut ConversionLog::new());

        let rebased = Quat::from_array(CurveProperty::ROTATION.map(|p| value_of(&clip, p)));
        let expected = coordinate_systems::turn_around_rotation(q * coordinate_systems::first_level_fix());
        assert!(rebased.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn nested_rotation_flips_handedness() {
        let q = Quat::from_xyzw(0.1, 0.2, 0.3, 0.9).normalize();
        let map = depths("arm", NodeDepth::Nested);
        let options = options(false);
        let mut clip = rotation_clip(q);

        AnimationCurveRebaser::new(&options, &map).rebase_clip(&mut clip, &mut ConversionLog::new());

        let rebased = Quat::from_array(CurveProperty::ROTATION.map(|p| value_of(&clip, p)));
        assert_eq!(rebased, coordinate_systems::rh_to_lh(q));
    }

    #[test]
    fn first_level_position_without_turn_around_is_kept() {
        let map = depths("arm", NodeDepth::FirstLevel);
        let options = options(false);
        let mut clip = position_clip([1.0, 2.0, 3.0], 0.5);
        let before = clip.clone();

        AnimationCurveRebaser::new(&options, &map).rebase_clip(&mut clip, &mut ConversionLog::new());
        assert_eq!(clip, before);
    }

    #[test]
    fn nested_position_is_rotated_and_snapped() {
        let map = depths("arm", NodeDepth::Nested);
        let options = ConversionOptions::default();
        let mut clip = position_clip([1.0, 2.0, 3.0], 4.0);

        AnimationCurveRebaser::new(&options, &map).rebase_clip(&mut clip, &mut ConversionLog::new());

        assert_eq!(value_of(&clip, CurveProperty::PositionX), 1.0);
        assert_eq!(value_of(&clip, CurveProperty::PositionY), 3.0);
        assert_eq!(value_of(&clip, CurveProperty::PositionZ), -2.0);

        let key = clip.curve("arm", CurveProperty::PositionZ).unwrap().keys[0];
        assert_eq!((key.in_tangent, key.out_tangent), (-4.0, -4.0));
    }

    #[test]
    fn stepped_tangents_stay_infinite() {
        let map = depths("arm", NodeDepth::Nested);
        let options = options(true);
        let mut clip = position_clip([0.0, 0.0, 0.0], f32::INFINITY);

        AnimationCurveRebaser::new(&options, &map).rebase_clip(&mut clip, &mut ConversionLog::new());

        for property in CurveProperty::POSITION {
            let key = clip.curve("arm", property).unwrap().keys[0];
            assert!(key.in_tangent.is_infinite());
            assert!(key.out_tangent.is_infinite());
        }
    }

    #[test]
    fn stepped_first_level_rotation_keeps_infinite_tangents() {
        let map = depths("arm", NodeDepth::FirstLevel);
        let options = ConversionOptions::default();
        let mut clip = CurveProperty::ROTATION.iter().zip(Quat::IDENTITY.to_array()).fold(
            AnimationClip::new("snap"),
            |clip, (property, value)| {
                clip.with_curve(AnimationCurve::new(
                    "arm",
                    *property,
                    vec![Keyframe::new(0.0, value, f32::INFINITY, f32::INFINITY)],
                ))
            },
        );

        AnimationCurveRebaser::new(&options, &map).rebase_clip(&mut clip, &mut ConversionLog::new());

        for property in CurveProperty::ROTATION {
            let key = clip.curve("arm", property).unwrap().keys[0];
            assert!(key.in_tangent.is_infinite(), "{}: {}", property, key.in_tangent);
            assert!(key.out_tangent.is_infinite(), "{}: {}", property, key.out_tangent);
        }

        let rebased = Quat::from_array(CurveProperty::ROTATION.map(|p| value_of(&clip, p)));
        assert!(rebased.abs_diff_eq(coordinate_systems::first_level_fix(), 1e-6));
    }

    #[test]
    fn first_level_position_is_snapped_like_the_static_one() {
        let map = depths("arm", NodeDepth::FirstLevel);
        let options = ConversionOptions::default();
        let mut clip = position_clip([0.999988, 2.0, 3.0], 0.5);

        AnimationCurveRebaser::new(&options, &map).rebase_clip(&mut clip, &mut ConversionLog::new());

        assert_eq!(value_of(&clip, CurveProperty::PositionX), 1.0);
        let key = clip.curve("arm", CurveProperty::PositionX).unwrap().keys[0];
        assert_eq!((key.in_tangent, key.out_tangent), (0.5, 0.5));
    }

    #[test]
    fn scale_curves_are_relabelled() {
        let map = depths("arm", NodeDepth::Nested);
        let options = options(false);
        let mut clip = AnimationClip::new("grow")
            .with_curve(constant(CurveProperty::ScaleX, 1.0))
            .with_curve(constant(CurveProperty::ScaleY, 2.0))
            .with_curve(constant(CurveProperty::ScaleZ, 3.0));

        AnimationCurveRebaser::new(&options, &map).rebase_clip(&mut clip, &mut ConversionLog::new());

        assert_eq!(value_of(&clip, CurveProperty::ScaleX), 1.0);
        assert_eq!(value_of(&clip, CurveProperty::ScaleY), 3.0);
        assert_eq!(value_of(&clip, CurveProperty::ScaleZ), 2.0);
    }

    #[test]
    fn broken_groups_warn_without_blocking_others() {
        let map = depths("arm", NodeDepth::Nested);
        let options = options(false);
        let mut clip = AnimationClip::new("broken")
            .with_curve(constant(CurveProperty::RotationX, 0.0))
            .with_curve(constant(CurveProperty::ScaleX, 1.0))
            .with_curve(constant(CurveProperty::ScaleY, 2.0))
            .with_curve(constant(CurveProperty::ScaleZ, 3.0));
        let mut log = ConversionLog::new();

        AnimationCurveRebaser::new(&options, &map).rebase_clip(&mut clip, &mut log);

        let warnings: Vec<_> = log.warnings().collect();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("rotation.y, rotation.z, rotation.w"));
        assert_eq!(value_of(&clip, CurveProperty::ScaleY), 3.0);
    }

    #[test]
    fn unknown_objects_are_ignored() {
        let map = depths("leg", NodeDepth::Nested);
        let options = options(false);
        let mut clip = rotation_clip(Quat::from_rotation_y(FRAC_PI_2));
        let before = clip.clone();

        AnimationCurveRebaser::new(&options, &map).rebase_clip(&mut clip, &mut ConversionLog::new());
        assert_eq!(clip, before);
    }
}
