//! A CPU software rasterizer with a reversed-Z depth pipeline.
//!
//! Meshes are transformed to clip space with a combined view-projection
//! matrix, rasterized with edge functions and merged into a depth-tested
//! framebuffer. Nothing touches the GPU.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use rasterpipe::prelude::*;
//!
//! let config = RenderConfig::new(64, 64);
//! let camera = Camera::look_at(
//!     Vec3::new(0.0, 0.0, -5.0),
//!     Vec3::ZERO,
//!     Vec3::UP,
//!     Projection::new(60.0, config.aspect_ratio(), 0.1, 100.0),
//! );
//! let quad = Model::new(Arc::new(Mesh::quad()), Mat4::identity(), Color::RED);
//!
//! let framebuffer = draw(&camera, &[quad], config)?;
//! save_color_png(&framebuffer, "quad.png")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod camera;
pub mod color;
pub mod error;
pub mod export;
pub mod logging;
pub mod math;
pub mod mesh;
pub mod model;
pub mod projection;
pub mod render;
pub mod scene;
pub mod transform;

// Re-export commonly needed types at crate root for convenience
pub use camera::Camera;
pub use color::Color;
pub use error::{ConfigError, ExportError, MeshError, SceneError};
pub use mesh::Mesh;
pub use model::Model;
pub use projection::{build_projection, build_view_projection, DepthConvention, Projection};
pub use render::{draw, DepthCompare, FrameBuffer, PassStats, Pipeline, RenderConfig};
pub use scene::{load_scene, load_scene_from_str, Scene};
pub use transform::Transform;

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use rasterpipe::prelude::*;
/// ```
pub mod prelude {
    // Scene setup
    pub use crate::camera::Camera;
    pub use crate::color::Color;
    pub use crate::mesh::Mesh;
    pub use crate::model::Model;
    pub use crate::projection::{DepthConvention, Projection};
    pub use crate::transform::Transform;

    // Math
    pub use crate::math::{Mat4, Vec2, Vec3, Vec4};

    // Rendering
    pub use crate::render::{draw, DepthCompare, FrameBuffer, Pipeline, RenderConfig};

    // Output
    pub use crate::export::{save_color_png, save_depth_png};
}
