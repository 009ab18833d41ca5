//! 4D vector for homogeneous coordinates.

use super::vec3::Vec3;

/// Homogeneous position. Clip-space vertices are `Vec4`s.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Create a point (w=1) from a position.
    pub const fn point(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z, 1.0)
    }

    /// Convert to Vec3, discarding w.
    pub const fn xyz(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Perspective divide: `(x, y, z) / w`.
    ///
    /// No guard for `w <= 0`. The pipeline performs no clipping, so vertices
    /// behind the eye divide through and produce meaningless coordinates.
    #[inline]
    pub fn perspective_divide(self) -> Vec3 {
        self.xyz() / self.w
    }
}
