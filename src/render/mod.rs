//! The fixed-function stages of a render pass.
//!
//! Data flows strictly forward:
//! 1. [`geometry`] transforms object-space vertices to clip space.
//! 2. [`rasterizer`] turns clip-space triangles into depth [`Fragment`]s.
//! 3. [`framebuffer`] depth-tests fragments into the color/depth arrays.
//!
//! [`pipeline`] drives the three for every active model.

pub mod framebuffer;
pub mod geometry;
pub mod pipeline;
pub mod rasterizer;

pub use framebuffer::{DepthCompare, FrameBuffer};
pub use pipeline::{draw, PassStats, Pipeline, RenderConfig};
pub use rasterizer::{edge_function, EdgeFunctionRasterizer, Fragment};
