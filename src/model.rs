//! Drawable instances: a shared mesh, a world matrix and a flat color.

use std::sync::Arc;

use crate::color::Color;
use crate::math::mat4::Mat4;
use crate::mesh::Mesh;

/// One entry in a render pass.
///
/// The mesh is shared read-only through an `Arc` so many models can reuse it
/// and a parallel pass can hand models to worker threads. The world matrix is
/// resolved by the caller; the pipeline never walks a scene graph.
#[derive(Debug, Clone)]
pub struct Model {
    mesh: Arc<Mesh>,
    world: Mat4,
    color: Color,
    active: bool,
}

impl Model {
    pub fn new(mesh: Arc<Mesh>, world: Mat4, color: Color) -> Self {
        Self {
            mesh,
            world,
            color,
            active: true,
        }
    }

    /// Inactive models are skipped entirely by the pipeline.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn world(&self) -> Mat4 {
        self.world
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_world(&mut self, world: Mat4) {
        self.world = world;
    }
}
