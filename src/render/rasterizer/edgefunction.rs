//! Edge function-based triangle rasterization.
//!
//! # Algorithm Overview
//!
//! For each triangle:
//! 1. Perspective-divide the three clip-space vertices into NDC
//! 2. Compute the signed area with the edge function
//! 3. Map the NDC bounds to a clamped pixel bounding box
//! 4. Evaluate the three edge functions at every pixel center in the box
//! 5. Keep pixels where all three are non-negative and interpolate depth
//!
//! # Edge Function
//!
//! ```text
//! E(a, b, c) = (c.x - a.x) * (b.y - a.y) - (c.y - a.y) * (b.x - a.x)
//! ```
//!
//! # Winding Order
//!
//! Only triangles with a positive signed area produce fragments. In NDC
//! (+Y up) that is clockwise. A triangle wound the other way gives
//! non-positive weights everywhere and is silently dropped, so the inside
//! test doubles as one-sided culling.
//!
//! # Depth
//!
//! Depth is interpolated in reciprocal space of the *divided* NDC z:
//!
//! ```text
//! z = 1 / (w0 / z0 + w1 / z1 + w2 / z2)
//! ```
//!
//! This is not the textbook perspective-correct scheme (which reciprocates
//! clip w) and must not be replaced by it; it changes results near edges.

use std::ops::Range;

use super::Fragment;
use crate::math::{Vec2, Vec3, Vec4};

/// Computes the edge function value for point `c` relative to edge `a -> b`.
///
/// Positive on one side of the edge, negative on the other, zero on it.
/// `edge_function(v0, v1, v2)` is twice the signed area of the triangle.
#[inline]
pub fn edge_function(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (c.x - a.x) * (b.y - a.y) - (c.y - a.y) * (b.x - a.x)
}

/// Bounding-box rasterizer with edge-function coverage.
///
/// Stateless apart from the target resolution, so one instance can be shared
/// by any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct EdgeFunctionRasterizer {
    width: u32,
    height: u32,
    pixel_size: Vec2,
}

impl EdgeFunctionRasterizer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixel_size: Vec2::new(1.0 / width as f32, 1.0 / height as f32),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Rasterize every index triple of `indices` against `clip`.
    ///
    /// # Panics
    /// Panics if an index is out of range for `clip`. [`Mesh`](crate::Mesh)
    /// validates its indices, so this only happens with hand-built input.
    pub fn rasterize(&self, clip: &[Vec4], indices: &[u32]) -> Vec<Fragment> {
        let mut fragments = Vec::new();
        self.rasterize_into(clip, indices, &mut fragments);
        fragments
    }

    /// Appends fragments to `out` and returns how many triangles were skipped
    /// as degenerate.
    pub fn rasterize_into(&self, clip: &[Vec4], indices: &[u32], out: &mut Vec<Fragment>) -> usize {
        let mut degenerate = 0;
        for tri in indices.chunks_exact(3) {
            let vertices = [
                clip[tri[0] as usize],
                clip[tri[1] as usize],
                clip[tri[2] as usize],
            ];
            if !self.rasterize_triangle(vertices, out) {
                degenerate += 1;
            }
        }
        degenerate
    }

    /// Rasterize one triangle. Returns `false` if it was skipped because its
    /// projected area is zero (or not finite).
    pub fn rasterize_triangle(&self, clip: [Vec4; 3], out: &mut Vec<Fragment>) -> bool {
        let [v0, v1, v2] = clip.map(Vec4::perspective_divide);

        let area = edge_function(v0.xy(), v1.xy(), v2.xy());
        if area == 0.0 || !area.is_finite() {
            log::trace!("skipping degenerate triangle {:?}", [v0, v1, v2]);
            return false;
        }

        let (xs, ys) = self.bounding_box([v0, v1, v2]);

        let inv_z0 = 1.0 / v0.z;
        let inv_z1 = 1.0 / v1.z;
        let inv_z2 = 1.0 / v2.z;

        for y in ys {
            for x in xs.clone() {
                let p = self.sample_point(x, y);

                let mut w0 = edge_function(v1.xy(), v2.xy(), p);
                let mut w1 = edge_function(v2.xy(), v0.xy(), p);
                let mut w2 = edge_function(v0.xy(), v1.xy(), p);
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    w0 /= area;
                    w1 /= area;
                    w2 /= area;

                    let depth = 1.0 / (inv_z0 * w0 + inv_z1 * w1 + inv_z2 * w2);
                    out.push(Fragment {
                        index: y as usize * self.width as usize + x as usize,
                        depth,
                    });
                }
            }
        }

        true
    }

    /// NDC position of the center of pixel `(x, y)`.
    #[inline]
    fn sample_point(&self, x: u32, y: u32) -> Vec2 {
        let p = Vec2::new(x as f32 * self.pixel_size.x, y as f32 * self.pixel_size.y)
            + self.pixel_size * 0.5;
        p * 2.0 - Vec2::ONE
    }

    /// Pixel ranges covering the triangle, max bound expanded by one pixel
    /// and clamped to the target.
    fn bounding_box(&self, v: [Vec3; 3]) -> (Range<u32>, Range<u32>) {
        let min_x = v[0].x.min(v[1].x).min(v[2].x);
        let max_x = v[0].x.max(v[1].x).max(v[2].x);
        let min_y = v[0].y.min(v[1].y).min(v[2].y);
        let max_y = v[0].y.max(v[1].y).max(v[2].y);

        (
            pixel_span(min_x, max_x, self.pixel_size.x, self.width),
            pixel_span(min_y, max_y, self.pixel_size.y, self.height),
        )
    }
}

/// `[floor(lo), floor(hi) + 1)` in pixels, clamped to `[0, limit)`.
fn pixel_span(lo: f32, hi: f32, pixel_size: f32, limit: u32) -> Range<u32> {
    let to_pixel = |ndc: f32| ((ndc * 0.5 + 0.5) / pixel_size).floor() as i64;
    let limit = i64::from(limit);
    let start = to_pixel(lo).clamp(0, limit);
    let end = to_pixel(hi).saturating_add(1).clamp(0, limit);
    start as u32..end as u32
}
