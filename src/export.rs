//! Writing framebuffers out as images.
//!
//! Buffer row 0 is the bottom of the picture, image row 0 is the top, so
//! every export flips vertically.

use std::path::Path;

use image::{ImageFormat, Rgba, RgbaImage};

use crate::color::Color;
use crate::error::ExportError;
use crate::render::FrameBuffer;

/// Color buffer as an 8-bit RGBA image.
pub fn color_image(framebuffer: &FrameBuffer) -> RgbaImage {
    to_image(framebuffer, framebuffer.color_buffer(), |&c| c)
}

/// Depth buffer as a grayscale image, each pixel `(z, z, z, 1)`.
pub fn depth_image(framebuffer: &FrameBuffer) -> RgbaImage {
    to_image(framebuffer, framebuffer.depth_buffer(), |&z| Color::gray(z))
}

pub fn save_color_png<P: AsRef<Path>>(framebuffer: &FrameBuffer, path: P) -> Result<(), ExportError> {
    color_image(framebuffer).save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

pub fn save_depth_png<P: AsRef<Path>>(framebuffer: &FrameBuffer, path: P) -> Result<(), ExportError> {
    depth_image(framebuffer).save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

fn to_image<T>(framebuffer: &FrameBuffer, pixels: &[T], to_color: impl Fn(&T) -> Color) -> RgbaImage {
    let (width, height) = (framebuffer.width(), framebuffer.height());
    RgbaImage::from_fn(width, height, |x, y| {
        let row = height - 1 - y;
        let index = row as usize * width as usize + x as usize;
        Rgba(to_color(&pixels[index]).to_rgba8())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::DepthCompare;

    fn framebuffer() -> FrameBuffer {
        let mut fb = FrameBuffer::new(2, 2, DepthCompare::Greater);
        fb.clear(Color::BLACK, 0.0);
        // Bottom-left pixel of the picture.
        fb.merge(0, 0.5, Color::RED);
        fb
    }

    #[test]
    fn color_export_flips_rows() {
        let img = color_image(&framebuffer());
        assert_eq!(img.dimensions(), (2, 2));
        assert_eq!(img.get_pixel(0, 1).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn depth_export_is_grayscale() {
        let img = depth_image(&framebuffer());
        assert_eq!(img.get_pixel(0, 1).0, [128, 128, 128, 255]);
        assert_eq!(img.get_pixel(1, 1).0, [0, 0, 0, 255]);
    }

    #[test]
    fn save_writes_png_files() {
        let dir = std::env::temp_dir().join(format!("rasterpipe-export-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let color_path = dir.join("color.png");
        let depth_path = dir.join("depth.png");

        let fb = framebuffer();
        save_color_png(&fb, &color_path).unwrap();
        save_depth_png(&fb, &depth_path).unwrap();

        let reloaded = image::open(&color_path).unwrap().to_rgba8();
        assert_eq!(reloaded, color_image(&fb));
        assert!(depth_path.exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
