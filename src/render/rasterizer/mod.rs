//! Triangle rasterization.
//!
//! The rasterizer consumes clip-space vertices and emits one [`Fragment`] per
//! covered pixel. It never touches the framebuffer; merging is a separate
//! step so fragment generation can run on worker threads while the depth
//! test stays sequential.

mod edgefunction;

pub use edgefunction::{edge_function, EdgeFunctionRasterizer};

/// A covered pixel and its interpolated NDC depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    /// `y * width + x` into the framebuffer arrays.
    pub index: usize,
    pub depth: f32,
}
