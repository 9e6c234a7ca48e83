use axisfix::conversion::ConversionOptions;
use axisfix::conversion::coordinate_systems;
use axisfix::pipeline::ImportPipeline;
use axisfix_scene::Scene;
use axisfix_scene::animation::{AnimationClip, AnimationCurve, CurveProperty, Keyframe};
use axisfix_scene::mesh::{MeshBuffer, SharedMesh};
use axisfix_scene::node::{ColliderShape, SceneNode};
use glam::{EulerRot, Mat4, Quat, Vec3};
use std::collections::HashMap;

fn options(turn_around: bool) -> ConversionOptions {
    ConversionOptions {
        turn_around,
        float_fix: false,
        ..Default::default()
    }
}

fn wedge() -> SharedMesh {
    MeshBuffer::new(
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 3.0),
        ],
        vec![Vec3::NEG_Z, Vec3::NEG_Z, Vec3::NEG_Z, Vec3::Z],
        vec![vec![0, 2, 1, 0, 1, 3]],
    )
    .into_shared()
}

/// A first-level object as the source format delivers it: -90° around X baked into the rotation.
fn exported(name: &str, position: Vec3, yaw: f32, scale: Vec3) -> SceneNode {
    let rotation = Quat::from_rotation_y(yaw) * Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2);
    SceneNode::new(name).with_transform(position, rotation, scale).with_mesh(wedge())
}

fn nested(name: &str) -> SceneNode {
    SceneNode::new(name)
        .with_transform(
            Vec3::new(0.5, -1.0, 2.0),
            Quat::from_euler(EulerRot::XYZ, 0.3, -0.6, 1.2),
            Vec3::new(1.0, 0.5, 2.0),
        )
        .with_mesh(wedge())
}

/// World space vertices of every mesh, keyed by node path. Names are compared after conversion, so
/// the fixtures don't use command tokens.
fn world_vertices(root: &SceneNode) -> HashMap<String, Vec<Vec3>> {
    fn collect(node: &SceneNode, path: &str, parent: Mat4, out: &mut HashMap<String, Vec<Vec3>>) {
        let world = parent * Mat4::from_scale_rotation_translation(node.scale, node.rotation, node.position);
        let vertices = node
            .meshes
            .iter()
            .flatten()
            .flat_map(|mesh| mesh.read().unwrap().positions.clone())
            .map(|vertex| world.transform_point3(vertex))
            .collect();
        out.insert(path.to_string(), vertices);

        for child in &node.children {
            collect(child, &SceneNode::child_path(path, &child.name), world, out);
        }
    }

    let mut out = HashMap::new();
    collect(root, "", Mat4::IDENTITY, &mut out);
    out
}

fn assert_world_preserved(before: &HashMap<String, Vec<Vec3>>, after: &HashMap<String, Vec<Vec3>>, turn: Quat) {
    assert_eq!(before.len(), after.len());
    for (path, vertices) in before {
        let converted = &after[path];
        assert_eq!(vertices.len(), converted.len(), "{}", path);
        for (original, converted) in vertices.iter().zip(converted) {
            let expected = turn * *original;
            assert!(
                expected.abs_diff_eq(*converted, 1e-4),
                "{}: expected {}, got {}",
                path,
                expected,
                converted
            );
        }
    }
}

fn case_a() -> SceneNode {
    exported("car", Vec3::new(4.0, 1.0, -2.0), 0.7, Vec3::new(1.0, 2.0, 3.0))
        .with_child(nested("door").with_child(nested("handle")))
        .with_child(nested("wheel"))
}

fn case_b() -> SceneNode {
    SceneNode::new("props")
        .with_child(exported("barrel", Vec3::new(1.0, 2.0, 3.0), 0.2, Vec3::new(2.0, 1.0, 0.5)).with_child(nested("lid")))
        .with_child(exported("crate", Vec3::new(-3.0, 0.0, 1.0), -1.3, Vec3::ONE))
}

fn convert(root: SceneNode, options: ConversionOptions) -> SceneNode {
    let mut scene = Scene { root, clips: vec![] };
    ImportPipeline::new(options).run(&mut scene);
    scene.root
}

#[test_log::test]
fn case_a_keeps_world_space_vertices() {
    for turn_around in [false, true] {
        let root = case_a();
        let before = world_vertices(&root);
        let after = world_vertices(&convert(root, options(turn_around)));

        let turn = if turn_around {
            coordinate_systems::turn_around()
        } else {
            Quat::IDENTITY
        };
        assert_world_preserved(&before, &after, turn);
    }
}

#[test_log::test]
fn case_b_keeps_world_space_vertices() {
    for turn_around in [false, true] {
        let root = case_b();
        let before = world_vertices(&root);
        let converted = convert(root, options(turn_around));

        // the empty parent itself is not touched
        assert_eq!(converted.rotation, Quat::IDENTITY);

        let turn = if turn_around {
            coordinate_systems::turn_around()
        } else {
            Quat::IDENTITY
        };
        assert_world_preserved(&before, &world_vertices(&converted), turn);
    }
}

#[test]
fn first_level_objects_end_up_upright() {
    let converted = convert(case_b(), ConversionOptions::default());
    let barrel = converted.find("barrel").unwrap();

    // the baked rotation is gone, only the yaw around the (new) up axis is left
    let (yaw, pitch, roll) = barrel.rotation.to_euler(EulerRot::YXZ);
    assert!(pitch.abs() < 1e-5 && roll.abs() < 1e-5);
    assert!((yaw.abs() - 0.2).abs() < 1e-5);
    assert_eq!(barrel.scale, Vec3::new(2.0, 0.5, 1.0));
}

#[test]
fn shared_buffer_is_rotated_once() {
    let shared = wedge();
    let original = shared.read().unwrap().positions.clone();
    let root = SceneNode::new("root")
        .with_child(SceneNode::new("a").with_mesh(shared.clone()))
        .with_child(SceneNode::new("b").with_mesh(shared.clone()).with_child(SceneNode::new("c").with_mesh(shared.clone())));

    convert(root, options(false));

    let rotation = coordinate_systems::compound_rotation(false);
    let rotated = shared.read().unwrap();
    for (before, after) in original.iter().zip(&rotated.positions) {
        assert!(after.abs_diff_eq(rotation * *before, 1e-6));
    }
}

#[test]
fn object_commands_are_applied_and_stripped() {
    let root = SceneNode::new("level")
        .with_child(SceneNode::new("_hull --norend--coll").with_mesh(wedge()))
        .with_child(SceneNode::new("rock--convcoll").with_mesh(wedge()))
        .with_child(SceneNode::new("tree--sparkle").with_mesh(wedge()));

    let converted = convert(root, ConversionOptions::default());

    let hull = converted.find("_hull").unwrap();
    assert!(!hull.renderer_enabled);
    assert_eq!(hull.colliders, vec![ColliderShape::Mesh]);

    let rock = converted.find("rock").unwrap();
    assert!(rock.renderer_enabled);
    assert_eq!(rock.colliders, vec![ColliderShape::ConvexMesh]);

    let tree = converted.find("tree").unwrap();
    assert!(tree.colliders.is_empty());
}

#[test]
fn object_commands_can_be_disabled() {
    let root = SceneNode::new("level").with_child(SceneNode::new("hull--norend").with_mesh(wedge()));
    let converted = convert(
        root,
        ConversionOptions {
            object_commands: false,
            ..Default::default()
        },
    );

    let hull = converted.find("hull--norend").unwrap();
    assert!(hull.renderer_enabled);
}

fn constant_curves(path: &str, node: &SceneNode) -> Vec<AnimationCurve> {
    let values = node
        .position
        .to_array()
        .into_iter()
        .chain(node.rotation.to_array())
        .chain(node.scale.to_array());

    CurveProperty::POSITION
        .into_iter()
        .chain(CurveProperty::ROTATION)
        .chain(CurveProperty::SCALE)
        .zip(values)
        .map(|(property, value)| {
            AnimationCurve::new(path, property, vec![Keyframe::flat(0.0, value), Keyframe::flat(1.0, value)])
        })
        .collect()
}

fn animated_transform(clip: &AnimationClip, path: &str) -> (Vec3, Quat, Vec3) {
    let value = |property| clip.curve(path, property).unwrap().keys[1].value;
    (
        Vec3::from_array(CurveProperty::POSITION.map(value)),
        Quat::from_array(CurveProperty::ROTATION.map(value)),
        Vec3::from_array(CurveProperty::SCALE.map(value)),
    )
}

/// An animation that holds an object at its static transform has to keep doing so after conversion.
#[test_log::test]
fn animation_matches_static_transforms() {
    for turn_around in [false, true] {
        let root = case_b();
        let paths = ["barrel", "barrel/lid", "crate"];
        let clip = paths.iter().fold(AnimationClip::new("idle"), |mut clip, path| {
            clip.curves.extend(constant_curves(path, root.find(path).unwrap()));
            clip
        });

        let mut scene = Scene { root, clips: vec![clip] };
        let report = ImportPipeline::new(options(turn_around)).run(&mut scene);
        assert_eq!(report.log.warnings().count(), 0);

        for path in paths {
            let node = scene.root.find(path).unwrap();
            let (position, rotation, scale) = animated_transform(&scene.clips[0], path);

            assert!(position.abs_diff_eq(node.position, 1e-5), "{}: {} vs {}", path, position, node.position);
            assert!(rotation.abs_diff_eq(node.rotation, 1e-5), "{}: {} vs {}", path, rotation, node.rotation);
            assert_eq!(scale, node.scale, "{}", path);
        }
    }
}

#[test]
fn curves_follow_renamed_objects() {
    let root = SceneNode::new("level").with_child(
        SceneNode::new("door--coll")
            .with_mesh(wedge())
            .with_child(nested("hinge")),
    );
    let mut clip = AnimationClip::new("open");
    clip.curves = constant_curves("door--coll/hinge", root.find("door--coll/hinge").unwrap());

    let mut scene = Scene { root, clips: vec![clip] };
    ImportPipeline::new(ConversionOptions::default()).run(&mut scene);

    assert!(scene.clips[0].curves.iter().all(|curve| curve.path == "door/hinge"));
    assert!(scene.root.find("door/hinge").is_some());
}

/// Same as [`animation_matches_static_transforms`], but with snapping on and values that are close
/// enough to integers to be snapped.
#[test_log::test]
fn snapped_animation_matches_snapped_static_transforms() {
    for turn_around in [false, true] {
        let root = SceneNode::new("shelf")
            .with_child(
                SceneNode::new("box")
                    .with_transform(
                        Vec3::new(0.999988, 2.0, 3.0),
                        Quat::from_rotation_y(0.4) * Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2),
                        Vec3::new(1.0, 2.000004, 1.0),
                    )
                    .with_mesh(wedge())
                    .with_child(
                        SceneNode::new("lid")
                            .with_transform(Vec3::new(0.0, 1.000009, -0.999991), Quat::IDENTITY, Vec3::ONE)
                            .with_mesh(wedge()),
                    ),
            )
            .with_child(SceneNode::new("tray").with_mesh(wedge()));

        let paths = ["box", "box/lid"];
        let clip = paths.iter().fold(AnimationClip::new("idle"), |mut clip, path| {
            clip.curves.extend(constant_curves(path, root.find(path).unwrap()));
            clip
        });

        let options = ConversionOptions {
            turn_around,
            ..Default::default()
        };
        let mut scene = Scene { root, clips: vec![clip] };
        ImportPipeline::new(options).run(&mut scene);

        for path in paths {
            let node = scene.root.find(path).unwrap();
            let (position, rotation, scale) = animated_transform(&scene.clips[0], path);

            assert!(position.abs_diff_eq(node.position, 1e-5), "{}: {} vs {}", path, position, node.position);
            assert!(scale.abs_diff_eq(node.scale, 1e-5), "{}: {} vs {}", path, scale, node.scale);
            // snapping may rebuild the static rotation with the opposite sign
            assert!(
                rotation.abs_diff_eq(node.rotation, 1e-5) || rotation.abs_diff_eq(-node.rotation, 1e-5),
                "{}: {} vs {}",
                path,
                rotation,
                node.rotation
            );
        }

        assert_eq!(scene.root.find("box").unwrap().position.x.abs(), 1.0);
    }
}
