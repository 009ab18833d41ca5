//! Camera snapshot consumed by a render pass.
//!
//! The pipeline never moves or mutates a camera. Whatever drives the camera
//! (input handling, animation) lives with the host, which hands over a
//! resolved `world_to_view` matrix at call time.

use crate::color::Color;
use crate::error::ConfigError;
use crate::math::{Mat4, Vec3};
use crate::projection::Projection;

/// Camera intrinsics, world-to-view transform and background color.
///
/// View space is left-handed: +X right, +Y up, +Z forward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    projection: Projection,
    world_to_view: Mat4,
    background: Color,
}

impl Camera {
    pub fn new(projection: Projection, world_to_view: Mat4) -> Self {
        Self {
            projection,
            world_to_view,
            background: Color::BLACK,
        }
    }

    /// Camera at `eye` looking toward `target`.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3, projection: Projection) -> Self {
        Self::new(projection, Mat4::look_at_lh(eye, target, up))
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn world_to_view(&self) -> Mat4 {
        self.world_to_view
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.projection.validate()
    }
}
