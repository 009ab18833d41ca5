//! Position / rotation / scale decomposition of a model's world matrix.
//!
//! The pipeline only ever sees the resolved [`Mat4`]. [`Transform`] exists so
//! hosts and scene files can describe placement without writing matrices.

use crate::math::{mat4::Mat4, vec3::Vec3};

/// A 3D transform with position, rotation (Euler angles), and scale.
///
/// ```ignore
/// let world = Transform::new()
///     .with_position(Vec3::new(0.0, 1.0, 0.0))
///     .with_rotation_degrees(Vec3::new(0.0, 45.0, 0.0))
///     .to_matrix();
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    position: Vec3,
    rotation: Vec3, // Euler angles in radians: x=pitch, y=yaw, z=roll
    scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Euler angles in radians.
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, radians: Vec3) -> Self {
        self.rotation = radians;
        self
    }

    pub fn with_rotation_degrees(self, degrees: Vec3) -> Self {
        self.with_rotation(Vec3::new(
            degrees.x.to_radians(),
            degrees.y.to_radians(),
            degrees.z.to_radians(),
        ))
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Generate the local-to-world matrix.
    ///
    /// Order: Translation * RotationX * RotationY * RotationZ * Scale
    /// (Scale applied first, then rotations, then translation)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::translation(self.position.x, self.position.y, self.position.z)
            * Mat4::rotation_x(self.rotation.x)
            * Mat4::rotation_y(self.rotation.y)
            * Mat4::rotation_z(self.rotation.z)
            * Mat4::scaling(self.scale.x, self.scale.y, self.scale.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec4;
    use approx::assert_relative_eq;

    #[test]
    fn default_is_identity() {
        assert_eq!(Transform::default().to_matrix(), Mat4::identity());
    }

    #[test]
    fn scale_then_rotate_then_translate() {
        let m = Transform::new()
            .with_position(Vec3::new(0.0, 0.0, 10.0))
            .with_rotation_degrees(Vec3::new(0.0, 90.0, 0.0))
            .with_scale(Vec3::new(2.0, 2.0, 2.0))
            .to_matrix();
        // +X scaled to 2, turned onto +Z, then pushed out to z = 12.
        let p = m * Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(p.z, 12.0, epsilon = 1e-5);
    }

    #[test]
    fn rotation_degrees_convert_to_radians() {
        let t = Transform::new().with_rotation_degrees(Vec3::new(180.0, 0.0, 0.0));
        assert_relative_eq!(t.rotation().x, std::f32::consts::PI, epsilon = 1e-6);
    }
}
