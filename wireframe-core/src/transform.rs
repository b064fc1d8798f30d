/// Rotation state and the fixed model rotation used by the projector
use nalgebra::Point3;

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationState {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RotationState {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::default()
    }
}

/// Transform builder for model-space rotations
pub struct Transform;

impl Transform {
    /// Apply the twin-Y rotation to a model-space point.
    ///
    /// This is not a rotation matrix. The point is turned about the vertical axis by
    /// `rotation.x`, the resulting y/z pair is mixed using `rotation.y`, and the x/y pair
    /// is turned in the screen plane by `rotation.z`. The depth component then mixes the
    /// same y/z pair again with `rotation.y` instead of using an independent axis, so the
    /// output is neither orthonormal nor invertible for most angles. Rendered meshes
    /// depend on this exact composition.
    pub fn twin_y_rotate(point: &Point3<f64>, rotation: &RotationState) -> Point3<f64> {
        let (sin_x, cos_x) = rotation.x.sin_cos();
        let (sin_y, cos_y) = rotation.y.sin_cos();
        let (sin_z, cos_z) = rotation.z.sin_cos();

        let x1 = point.x * cos_x - point.z * sin_x;
        let z1 = point.x * sin_x + point.z * cos_x;
        let y1 = point.y * cos_y - z1 * sin_y;

        Point3::new(
            x1 * cos_z - y1 * sin_z,
            x1 * sin_z + y1 * cos_z,
            y1 * cos_y - z1 * sin_y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_zero_rotation_collapses_depth_onto_y() {
        let p = Transform::twin_y_rotate(&Point3::new(1.0, 2.0, 3.0), &RotationState::zero());
        assert_eq!(p, Point3::new(1.0, 2.0, 2.0));
    }

    #[test]
    fn test_quarter_turn_about_x() {
        let rotation = RotationState::new(FRAC_PI_2, 0.0, 0.0);
        let p = Transform::twin_y_rotate(&Point3::new(1.0, 0.0, 0.0), &rotation);
        assert!(p.x.abs() < 1e-12);
        assert!(p.y.abs() < 1e-12);
    }

    #[test]
    fn test_depth_reuses_y_angle() {
        let rotation = RotationState::new(0.0, FRAC_PI_2, 0.0);
        let p = Transform::twin_y_rotate(&Point3::new(0.0, 1.0, 1.0), &rotation);
        // y1 = 1*0 - 1*1 = -1, depth = y1*0 - z1*1 = -1
        assert!((p.y + 1.0).abs() < 1e-12);
        assert!((p.z + 1.0).abs() < 1e-12);
    }
}
