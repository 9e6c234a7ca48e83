use glam::{EulerRot, Quat, Vec3};

/// Removes floating point residue: values within `epsilon` of an integer become that integer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FloatSnapper {
    epsilon: f32,
}

impl FloatSnapper {
    pub fn new(epsilon: f32) -> Self {
        Self { epsilon }
    }

    #[inline]
    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    #[inline]
    pub fn snap(&self, value: f32) -> f32 {
        let rounded = value.round();
        if (value - rounded).abs() < self.epsilon {
            // -0.0 becomes 0.0
            if rounded == 0.0 { 0.0 } else { rounded }
        } else {
            value
        }
    }

    pub fn snap_vec3(&self, value: Vec3) -> Vec3 {
        Vec3::new(self.snap(value.x), self.snap(value.y), self.snap(value.z))
    }

    /// Snaps the Euler angles (degrees, Y-X-Z order) of `rotation`. The rotation is only rebuilt when an
    /// angle actually snapped.
    pub fn snap_rotation(&self, rotation: Quat) -> Quat {
        let (y, x, z) = rotation.to_euler(EulerRot::YXZ);
        let angles = Vec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees());
        let snapped = self.snap_vec3(angles);

        if snapped == angles {
            return rotation;
        }

        Quat::from_euler(
            EulerRot::YXZ,
            snapped.y.to_radians(),
            snapped.x.to_radians(),
            snapped.z.to_radians(),
        )
    }
}

impl Default for FloatSnapper {
    fn default() -> Self {
        Self::new(super::DEFAULT_SNAP_EPSILON)
    }
}
