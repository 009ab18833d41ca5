//! One render pass: clear, project, rasterize, merge.
//!
//! A pass is a plain function call. The host decides when to draw and with
//! which camera/model snapshot; nothing is retained between passes except
//! what the caller keeps of the returned [`FrameBuffer`].

use rayon::prelude::*;

use super::framebuffer::{DepthCompare, FrameBuffer};
use super::geometry;
use super::rasterizer::{EdgeFunctionRasterizer, Fragment};
use crate::camera::Camera;
use crate::error::ConfigError;
use crate::math::{Mat4, Vec4};
use crate::model::Model;
use crate::projection::{build_view_projection, DepthConvention};

/// Immutable per-pass settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub depth_convention: DepthConvention,
    pub depth_compare: DepthCompare,
    /// Rasterize models on the rayon pool. Merging stays sequential in model
    /// order, so the output is identical to a serial pass.
    pub parallel: bool,
}

impl RenderConfig {
    /// Reversed-Z, `Greater` merge, single-threaded.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            depth_convention: DepthConvention::default(),
            depth_compare: DepthCompare::default(),
            parallel: false,
        }
    }

    pub fn with_depth_convention(mut self, convention: DepthConvention) -> Self {
        self.depth_convention = convention;
        self
    }

    pub fn with_depth_compare(mut self, compare: DepthCompare) -> Self {
        self.depth_compare = compare;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidResolution {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Counters for one pass, mostly for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    pub models_drawn: usize,
    pub models_skipped: usize,
    pub triangles: usize,
    pub degenerate_triangles: usize,
    pub fragments: usize,
    pub fragments_merged: usize,
}

/// The draw orchestrator.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: RenderConfig,
    rasterizer: EdgeFunctionRasterizer,
}

impl Pipeline {
    pub fn new(config: RenderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            rasterizer: EdgeFunctionRasterizer::new(config.width, config.height),
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Renders `models` as seen by `camera` into a fresh framebuffer.
    pub fn draw(&self, camera: &Camera, models: &[Model]) -> Result<FrameBuffer, ConfigError> {
        self.draw_with_stats(camera, models)
            .map(|(framebuffer, _)| framebuffer)
    }

    pub fn draw_with_stats(
        &self,
        camera: &Camera,
        models: &[Model],
    ) -> Result<(FrameBuffer, PassStats), ConfigError> {
        camera.validate()?;

        let config = &self.config;
        let mut framebuffer = FrameBuffer::new(config.width, config.height, config.depth_compare);
        framebuffer.clear(camera.background(), config.depth_convention.clear_depth());

        let view_projection = build_view_projection(camera, config.depth_convention);
        let mut stats = PassStats::default();

        if config.parallel {
            let active: Vec<&Model> = models.iter().filter(|m| m.is_active()).collect();
            stats.models_skipped = models.len() - active.len();

            let batches: Vec<(Vec<Fragment>, usize)> = active
                .par_iter()
                .map(|model| {
                    let mut clip = Vec::new();
                    let mut fragments = Vec::new();
                    let degenerate =
                        self.rasterize_model(view_projection, model, &mut clip, &mut fragments);
                    (fragments, degenerate)
                })
                .collect();

            for (model, (fragments, degenerate)) in active.iter().zip(&batches) {
                stats.degenerate_triangles += degenerate;
                Self::merge_model(&mut framebuffer, model, fragments, &mut stats);
            }
        } else {
            let mut clip = Vec::new();
            let mut fragments = Vec::new();
            for model in models {
                if !model.is_active() {
                    stats.models_skipped += 1;
                    continue;
                }
                fragments.clear();
                stats.degenerate_triangles +=
                    self.rasterize_model(view_projection, model, &mut clip, &mut fragments);
                Self::merge_model(&mut framebuffer, model, &fragments, &mut stats);
            }
        }

        log::debug!(
            "pass {}x{} ({} z): {} models drawn, {} skipped, {} triangles ({} degenerate), {} fragments, {} merged",
            config.width,
            config.height,
            config.depth_convention,
            stats.models_drawn,
            stats.models_skipped,
            stats.triangles,
            stats.degenerate_triangles,
            stats.fragments,
            stats.fragments_merged,
        );

        Ok((framebuffer, stats))
    }

    /// Geometry processing and rasterization for one model. Returns the
    /// number of degenerate triangles skipped.
    fn rasterize_model(
        &self,
        view_projection: Mat4,
        model: &Model,
        clip: &mut Vec<Vec4>,
        fragments: &mut Vec<Fragment>,
    ) -> usize {
        let mesh = model.mesh();
        let mvp = view_projection * model.world();
        geometry::transform_into(mesh.vertices(), mvp, clip);
        self.rasterizer.rasterize_into(clip, mesh.indices(), fragments)
    }

    fn merge_model(
        framebuffer: &mut FrameBuffer,
        model: &Model,
        fragments: &[Fragment],
        stats: &mut PassStats,
    ) {
        let color = model.color();
        let merged = fragments
            .iter()
            .filter(|f| framebuffer.merge(f.index, f.depth, color))
            .count();

        stats.models_drawn += 1;
        stats.triangles += model.mesh().triangle_count();
        stats.fragments += fragments.len();
        stats.fragments_merged += merged;
    }
}

/// One-shot convenience: build a [`Pipeline`] for `config` and draw.
pub fn draw(
    camera: &Camera,
    models: &[Model],
    config: RenderConfig,
) -> Result<FrameBuffer, ConfigError> {
    Pipeline::new(config)?.draw(camera, models)
}
