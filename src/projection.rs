//! Perspective projection and depth conventions.
//!
//! [`build_projection`] is the single place the projection matrix is
//! assembled. The x/y scale terms are negated and the perspective row is
//! `(0, 0, -1, 0)`, so clip `w` equals `-z_view`. With the camera looking
//! along +Z in view space (see [`Mat4::look_at_lh`]) every visible vertex ends
//! up with a negative `w`; the two negations cancel in the perspective divide
//! and NDC comes out with +X right and +Y up.

use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::error::ConfigError;
use crate::math::mat4::Mat4;

/// How view depth maps onto NDC z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DepthConvention {
    /// near -> 0, far -> 1.
    Standard,
    /// near -> 1, far -> 0. Better precision distribution for `f32` depth.
    #[default]
    Reversed,
}

impl DepthConvention {
    pub fn from_reversed(reversed: bool) -> Self {
        if reversed {
            DepthConvention::Reversed
        } else {
            DepthConvention::Standard
        }
    }

    pub fn is_reversed(self) -> bool {
        matches!(self, DepthConvention::Reversed)
    }

    /// Depth the buffer is cleared to at the start of a pass.
    ///
    /// This is the far value of the *opposite* convention: 0 under reversed-Z
    /// and 1 under standard Z.
    pub fn clear_depth(self) -> f32 {
        match self {
            DepthConvention::Reversed => 0.0,
            DepthConvention::Standard => 1.0,
        }
    }
}

impl std::fmt::Display for DepthConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DepthConvention::Standard => write!(f, "standard"),
            DepthConvention::Reversed => write!(f, "reversed"),
        }
    }
}

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view in degrees.
    fov_y_degrees: f32,
    /// Aspect ratio (width / height).
    aspect_ratio: f32,
    /// Near clipping plane distance.
    z_near: f32,
    /// Far clipping plane distance.
    z_far: f32,
}

impl Projection {
    /// Creates a new projection with the given parameters.
    ///
    /// Nothing is checked here; call [`Projection::validate`] (the pipeline
    /// does) before relying on the matrix.
    ///
    /// # Arguments
    /// * `fov_y_degrees` - Vertical field of view in degrees
    /// * `aspect_ratio` - Width divided by height
    /// * `z_near` - Near clipping plane distance (must be > 0)
    /// * `z_far` - Far clipping plane distance (must be > z_near)
    pub fn new(fov_y_degrees: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        Self {
            fov_y_degrees,
            aspect_ratio,
            z_near,
            z_far,
        }
    }

    pub fn fov_y_degrees(&self) -> f32 {
        self.fov_y_degrees
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn z_near(&self) -> f32 {
        self.z_near
    }

    pub fn z_far(&self) -> f32 {
        self.z_far
    }

    /// Rejects parameters that would make the matrix degenerate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fov_y_degrees > 0.0 && self.fov_y_degrees < 180.0) {
            return Err(ConfigError::InvalidFieldOfView(self.fov_y_degrees));
        }
        if !(self.aspect_ratio > 0.0 && self.aspect_ratio.is_finite()) {
            return Err(ConfigError::InvalidAspect(self.aspect_ratio));
        }
        if !(self.z_near > 0.0 && self.z_far > self.z_near && self.z_far.is_finite()) {
            return Err(ConfigError::InvalidClipPlanes {
                z_near: self.z_near,
                z_far: self.z_far,
            });
        }
        Ok(())
    }

    pub fn matrix(&self, convention: DepthConvention) -> Mat4 {
        build_projection(
            self.fov_y_degrees,
            self.aspect_ratio,
            self.z_near,
            self.z_far,
            convention,
        )
    }
}

/// Builds the projection matrix.
///
/// Degenerate for `z_far == z_near` or `aspect <= 0`; callers guarantee
/// `z_far > z_near > 0`.
pub fn build_projection(
    fov_y_degrees: f32,
    aspect: f32,
    z_near: f32,
    z_far: f32,
    convention: DepthConvention,
) -> Mat4 {
    let half_height = z_near * (fov_y_degrees.to_radians() * 0.5).tan();
    let half_width = half_height * aspect;

    let mut m = Mat4::ZERO;
    m.set(0, 0, -z_near / half_width);
    m.set(1, 1, -z_near / half_height);
    m.set(3, 2, -1.0);

    let depth_range = z_far - z_near;
    match convention {
        // z[near, far] -> ndc[1, 0]
        DepthConvention::Reversed => {
            m.set(2, 2, z_near / depth_range);
            m.set(2, 3, -z_far * z_near / depth_range);
        }
        // z[near, far] -> ndc[0, 1]
        DepthConvention::Standard => {
            m.set(2, 2, -z_far / depth_range);
            m.set(2, 3, z_far * z_near / depth_range);
        }
    }

    m
}

/// `projection * camera.world_to_view`.
pub fn build_view_projection(camera: &Camera, convention: DepthConvention) -> Mat4 {
    camera.projection().matrix(convention) * camera.world_to_view()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Vec3, Vec4};
    use approx::assert_relative_eq;

    const NEAR: f32 = 0.1;
    const FAR: f32 = 100.0;

    fn ndc_z(convention: DepthConvention, view_z: f32) -> f32 {
        let m = build_projection(60.0, 1.0, NEAR, FAR, convention);
        let clip = m * Vec4::new(0.0, 0.0, view_z, 1.0);
        clip.perspective_divide().z
    }

    #[test]
    fn scale_terms_are_negated() {
        let m = build_projection(90.0, 2.0, 1.0, 10.0, DepthConvention::Reversed);
        // tan(45deg) = 1, so half_height = 1 and half_width = 2.
        assert_relative_eq!(m.get(0, 0), -0.5, epsilon = 1e-6);
        assert_relative_eq!(m.get(1, 1), -1.0, epsilon = 1e-6);
        assert_eq!(m.get(3, 2), -1.0);
        assert_eq!(m.get(3, 3), 0.0);
    }

    #[test]
    fn reversed_maps_near_to_one_and_far_to_zero() {
        assert_relative_eq!(ndc_z(DepthConvention::Reversed, NEAR), 1.0, epsilon = 1e-5);
        assert_relative_eq!(ndc_z(DepthConvention::Reversed, FAR), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn standard_maps_near_to_zero_and_far_to_one() {
        assert_relative_eq!(ndc_z(DepthConvention::Standard, NEAR), 0.0, epsilon = 1e-5);
        assert_relative_eq!(ndc_z(DepthConvention::Standard, FAR), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn view_projection_round_trips_near_plane_center() {
        let eye = Vec3::new(0.0, 0.0, -5.0);
        let camera = Camera::look_at(
            eye,
            Vec3::ZERO,
            Vec3::UP,
            Projection::new(60.0, 1.0, NEAR, FAR),
        );
        let near_center = Vec4::point(eye + Vec3::FORWARD * NEAR);
        let far_center = Vec4::point(eye + Vec3::FORWARD * FAR);

        let vp = build_view_projection(&camera, DepthConvention::Reversed);
        assert_relative_eq!((vp * near_center).perspective_divide().z, 1.0, epsilon = 1e-4);
        assert_relative_eq!((vp * far_center).perspective_divide().z, 0.0, epsilon = 1e-4);

        let vp = build_view_projection(&camera, DepthConvention::Standard);
        assert_relative_eq!((vp * near_center).perspective_divide().z, 0.0, epsilon = 1e-4);
        assert_relative_eq!((vp * far_center).perspective_divide().z, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn x_and_y_keep_their_orientation_in_ndc() {
        let m = build_projection(90.0, 1.0, 1.0, 10.0, DepthConvention::Reversed);
        let ndc = (m * Vec4::new(1.0, 2.0, 4.0, 1.0)).perspective_divide();
        assert_relative_eq!(ndc.x, 0.25, epsilon = 1e-6);
        assert_relative_eq!(ndc.y, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn clear_depth_is_opposite_far_value() {
        assert_eq!(DepthConvention::Reversed.clear_depth(), 0.0);
        assert_eq!(DepthConvention::Standard.clear_depth(), 1.0);
        assert_eq!(DepthConvention::from_reversed(true), DepthConvention::Reversed);
    }

    #[test]
    fn validate_rejects_bad_parameters() {
        assert!(Projection::new(60.0, 1.0, 0.1, 100.0).validate().is_ok());
        assert_eq!(
            Projection::new(60.0, 0.0, 0.1, 100.0).validate(),
            Err(ConfigError::InvalidAspect(0.0))
        );
        assert_eq!(
            Projection::new(60.0, 1.0, 1.0, 1.0).validate(),
            Err(ConfigError::InvalidClipPlanes {
                z_near: 1.0,
                z_far: 1.0
            })
        );
        assert_eq!(
            Projection::new(180.0, 1.0, 0.1, 1.0).validate(),
            Err(ConfigError::InvalidFieldOfView(180.0))
        );
    }
}
