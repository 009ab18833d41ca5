//! Minimal linear algebra for the pipeline.
//!
//! Everything is `f32` and `Copy`. Matrices use column vectors on the right,
//! see [`mat4`] for the full convention.

pub mod mat4;
pub mod vec2;
pub mod vec3;
pub mod vec4;

pub use mat4::Mat4;
pub use vec2::Vec2;
pub use vec3::Vec3;
pub use vec4::Vec4;
