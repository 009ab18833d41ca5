//! Color and depth storage for one render pass.
//!
//! Both arrays are indexed by `y * width + x` with row 0 at the bottom of the
//! image (NDC +Y is up). They always have exactly `width * height` entries.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::projection::DepthConvention;

/// Which candidate wins the depth test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DepthCompare {
    /// Candidate wins if strictly greater than the stored depth.
    ///
    /// This is the merge rule regardless of convention. It is only physically
    /// right under reversed-Z: with standard Z the buffer clears to 1 and
    /// nothing on screen ever exceeds it, so the pass leaves the cleared image
    /// untouched, and where it does pass the farther surface wins.
    #[default]
    Greater,
    /// Candidate wins if strictly less than the stored depth.
    Less,
}

impl DepthCompare {
    /// The comparison that makes nearer surfaces win under `convention`.
    pub fn for_convention(convention: DepthConvention) -> Self {
        match convention {
            DepthConvention::Reversed => DepthCompare::Greater,
            DepthConvention::Standard => DepthCompare::Less,
        }
    }

    #[inline]
    pub fn passes(self, candidate: f32, stored: f32) -> bool {
        match self {
            DepthCompare::Greater => candidate > stored,
            DepthCompare::Less => candidate < stored,
        }
    }
}

/// Owned color and depth buffers.
///
/// Allocated once per pass and handed to the caller when the pass ends.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    color_buffer: Vec<Color>,
    depth_buffer: Vec<f32>,
    width: u32,
    height: u32,
    compare: DepthCompare,
}

impl FrameBuffer {
    /// Allocates a `width x height` buffer merging with `compare`.
    ///
    /// Contents are unspecified until [`FrameBuffer::clear`] is called.
    pub fn new(width: u32, height: u32, compare: DepthCompare) -> Self {
        let size = width as usize * height as usize;
        Self {
            color_buffer: vec![Color::CLEAR; size],
            depth_buffer: vec![0.0; size],
            width,
            height,
            compare,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.color_buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.color_buffer.is_empty()
    }

    pub fn compare(&self) -> DepthCompare {
        self.compare
    }

    /// Resets every pixel to `color` and `depth`.
    pub fn clear(&mut self, color: Color, depth: f32) {
        self.color_buffer.fill(color);
        self.depth_buffer.fill(depth);
    }

    /// Depth-tested write of one fragment.
    ///
    /// Writes both color and depth iff the candidate passes the depth test.
    /// Equal depths never pass, so on ties the earlier writer stays.
    /// Out-of-range indices are ignored. Returns whether the write happened.
    #[inline]
    pub fn merge(&mut self, index: usize, depth: f32, color: Color) -> bool {
        let Some(stored) = self.depth_buffer.get_mut(index) else {
            return false;
        };
        if !self.compare.passes(depth, *stored) {
            return false;
        }
        *stored = depth;
        self.color_buffer[index] = color;
        true
    }

    #[inline]
    pub fn index_of(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    /// Color at `(x, y)`, or `None` if out of bounds.
    pub fn color_at(&self, x: u32, y: u32) -> Option<Color> {
        self.index_of(x, y).map(|i| self.color_buffer[i])
    }

    /// Depth at `(x, y)`, or `None` if out of bounds.
    pub fn depth_at(&self, x: u32, y: u32) -> Option<f32> {
        self.index_of(x, y).map(|i| self.depth_buffer[i])
    }

    pub fn color_buffer(&self) -> &[Color] {
        &self.color_buffer
    }

    pub fn depth_buffer(&self) -> &[f32] {
        &self.depth_buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleared(compare: DepthCompare, depth: f32) -> FrameBuffer {
        let mut fb = FrameBuffer::new(4, 3, compare);
        fb.clear(Color::BLUE, depth);
        fb
    }

    #[test]
    fn clear_sets_every_pixel() {
        let fb = cleared(DepthCompare::Greater, 0.0);
        assert_eq!(fb.len(), 12);
        assert_eq!(fb.depth_buffer().len(), 12);
        assert!(fb.color_buffer().iter().all(|&c| c == Color::BLUE));
        assert!(fb.depth_buffer().iter().all(|&d| d == 0.0));
    }

    #[test]
    fn greater_depth_wins() {
        let mut fb = cleared(DepthCompare::Greater, 0.0);
        assert!(fb.merge(5, 0.3, Color::RED));
        assert!(!fb.merge(5, 0.2, Color::GREEN));
        assert!(fb.merge(5, 0.4, Color::WHITE));
        assert_eq!(fb.color_buffer()[5], Color::WHITE);
        assert_eq!(fb.depth_buffer()[5], 0.4);
    }

    #[test]
    fn ties_keep_the_first_writer() {
        let mut fb = cleared(DepthCompare::Greater, 0.0);
        assert!(fb.merge(0, 0.5, Color::RED));
        assert!(!fb.merge(0, 0.5, Color::GREEN));
        assert_eq!(fb.color_at(0, 0), Some(Color::RED));
    }

    #[test]
    fn candidate_equal_to_clear_depth_loses() {
        let mut fb = cleared(DepthCompare::Greater, 1.0);
        assert!(!fb.merge(3, 0.5, Color::RED));
        assert!(!fb.merge(3, 1.0, Color::RED));
        assert_eq!(fb.color_buffer()[3], Color::BLUE);
    }

    #[test]
    fn less_compare_keeps_nearer_standard_depth() {
        let mut fb = cleared(DepthCompare::Less, 1.0);
        assert!(fb.merge(2, 0.7, Color::RED));
        assert!(fb.merge(2, 0.3, Color::GREEN));
        assert!(!fb.merge(2, 0.5, Color::WHITE));
        assert_eq!(fb.color_buffer()[2], Color::GREEN);
    }

    #[test]
    fn out_of_range_merge_is_ignored() {
        let mut fb = cleared(DepthCompare::Greater, 0.0);
        assert!(!fb.merge(12, 1.0, Color::RED));
    }

    #[test]
    fn coordinates_are_row_major() {
        let mut fb = cleared(DepthCompare::Greater, 0.0);
        fb.merge(2 * 4 + 1, 0.5, Color::RED);
        assert_eq!(fb.color_at(1, 2), Some(Color::RED));
        assert_eq!(fb.depth_at(1, 2), Some(0.5));
        assert_eq!(fb.color_at(4, 0), None);
    }

    #[test]
    fn for_convention_picks_nearer_wins() {
        assert_eq!(
            DepthCompare::for_convention(DepthConvention::Reversed),
            DepthCompare::Greater
        );
        assert_eq!(
            DepthCompare::for_convention(DepthConvention::Standard),
            DepthCompare::Less
        );
    }
}
