use glam::{Quat, Vec3};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

/// The source format bakes -90° around X into first-level objects, this is the inverse that they absorb.
#[inline]
pub fn first_level_fix() -> Quat {
    Quat::from_rotation_x(FRAC_PI_2)
}

/// 180° around the up axis.
#[inline]
pub fn turn_around() -> Quat {
    Quat::from_rotation_y(PI)
}

/// Rotation applied to every rebased mesh buffer and to the local position of nested objects:
/// -90° around X, followed by the turn-around if requested.
#[inline]
pub fn compound_rotation(turn_around: bool) -> Quat {
    let base = Quat::from_rotation_x(-FRAC_PI_2);
    if turn_around {
        self::turn_around() * base
    } else {
        base
    }
}

/// Right- to left-handed quaternion conversion for a frame that swaps Y and Z.
/// Up to the (irrelevant) overall sign this is the conjugation with -90° around X.
#[inline]
pub fn rh_to_lh(q: Quat) -> Quat {
    Quat::from_xyzw(-q.x, -q.z, q.y, -q.w)
}

#[inline]
pub fn lh_to_rh(q: Quat) -> Quat {
    Quat::from_xyzw(-q.x, q.z, -q.y, -q.w)
}

/// Conjugation with the turn-around: 180° around Y flips the X and Z axes of the rotation, Y is kept.
#[inline]
pub fn turn_around_rotation(q: Quat) -> Quat {
    Quat::from_xyzw(-q.x, q.y, -q.z, q.w)
}

/// `q * first_level_fix()` written out in components, with `s = sin(45°)`. Being linear in the
/// components, it applies to quaternion tangents just as well as to values.
#[inline]
pub fn first_level_components([x, y, z, w]: [f32; 4]) -> [f32; 4] {
    let s = FRAC_PI_4.sin();
    [(w + x) * s, (y + z) * s, (z - y) * s, (w - x) * s]
}

/// [`first_level_components`] for curve tangents. Each output channel mixes two input channels, so a
/// stepped (non-finite) input would turn into `inf - inf`. Channels fed by a non-finite input stay
/// stepped instead.
pub fn first_level_tangent_components(components: [f32; 4]) -> [f32; 4] {
    let converted = first_level_components(components);
    if components.iter().all(|c| c.is_finite()) {
        return converted;
    }

    let [x, y, z, w] = components;
    let sources = [(w, x), (y, z), (z, y), (w, x)];
    std::array::from_fn(|channel| {
        let (a, b) = sources[channel];
        if a.is_finite() && b.is_finite() {
            converted[channel]
        } else {
            f32::INFINITY
        }
    })
}

/// See [`rh_to_lh`], component form for curves.
#[inline]
pub fn rh_to_lh_components([x, y, z, w]: [f32; 4]) -> [f32; 4] {
    [-x, -z, y, -w]
}

#[inline]
pub fn turn_around_components([x, y, z, w]: [f32; 4]) -> [f32; 4] {
    [-x, y, -z, w]
}

/// [`compound_rotation`] as exact signed permutation. Used for curve tangents, which may legitimately be
/// infinite (stepped keys) and must not pick up the trigonometric residue of the quaternion.
#[inline]
pub fn compound_components([x, y, z]: [f32; 3], turn_around: bool) -> [f32; 3] {
    if turn_around { [-x, z, y] } else { [x, z, -y] }
}

/// [`turn_around`] as exact signed permutation.
#[inline]
pub fn turn_around_vector_components([x, y, z]: [f32; 3]) -> [f32; 3] {
    [-x, y, -z]
}

/// Scale conversion is a pure relabeling of the axes.
#[inline]
pub fn swap_yz(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.z, v.y)
}
