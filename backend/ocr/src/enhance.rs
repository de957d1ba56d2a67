//! Pixel-level cleanup of photographed essay pages before recognition.
//!
//! Handwriting photos come in with shadows and weak contrast; recognition
//! rates improve a lot once the page is reduced to pure black on white.

use std::io::Cursor;

use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat, Rgba};

/// Contrast stretch factor applied around the channel midpoint.
const CONTRAST_FACTOR: f32 = 1.3;

/// Luminance cutoff between ink and paper.
const BINARIZE_THRESHOLD: f32 = 128.0;

/// Enhance one decoded page for recognition.
///
/// Per pixel: stretch each RGB channel around the midpoint, take the
/// standard weighted luminance, and binarize, so every output channel is
/// either pure black or pure white. Alpha passes through. Output dimensions
/// equal input dimensions.
pub fn enhance(img: &DynamicImage) -> DynamicImage {
    let mut rgba = img.to_rgba8();

    for pixel in rgba.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        let r = stretch(r);
        let g = stretch(g);
        let b = stretch(b);

        let gray = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        let value = if gray > BINARIZE_THRESHOLD { 255 } else { 0 };

        *pixel = Rgba([value, value, value, a]);
    }

    DynamicImage::ImageRgba8(rgba)
}

fn stretch(channel: u8) -> u8 {
    ((channel as f32 - 128.0) * CONTRAST_FACTOR + 128.0)
        .round()
        .clamp(0.0, 255.0) as u8
}

/// Re-encode an enhanced page as PNG for the recognition engine.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .context("PNG encode failed")?;
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(rgba)))
    }

    #[test]
    fn test_dimensions_preserved() {
        let img = solid(7, 3, [120, 130, 140, 255]);
        let out = enhance(&img);
        assert_eq!((out.width(), out.height()), (7, 3));
    }

    #[test]
    fn test_output_is_binary() {
        let mut img = RgbaImage::new(4, 4);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = Rgba([(x * 60) as u8, (y * 60) as u8, 128, 255]);
        }
        let out = enhance(&DynamicImage::ImageRgba8(img)).to_rgba8();
        for pixel in out.pixels() {
            let [r, g, b, a] = pixel.0;
            assert!(r == 0 || r == 255);
            assert_eq!(r, g);
            assert_eq!(g, b);
            assert_eq!(a, 255);
        }
    }

    #[test]
    fn test_light_paper_goes_white_dark_ink_goes_black() {
        let paper = enhance(&solid(1, 1, [200, 200, 200, 255])).to_rgba8();
        assert_eq!(paper.get_pixel(0, 0).0, [255, 255, 255, 255]);

        let ink = enhance(&solid(1, 1, [50, 50, 50, 255])).to_rgba8();
        assert_eq!(ink.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_saturated_red_counts_as_ink() {
        // Stretched red is bright but its luminance share is small
        let out = enhance(&solid(1, 1, [255, 0, 0, 255])).to_rgba8();
        assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_alpha_passes_through() {
        let out = enhance(&solid(1, 1, [10, 10, 10, 77])).to_rgba8();
        assert_eq!(out.get_pixel(0, 0).0[3], 77);
    }

    #[test]
    fn test_encode_png_roundtrip() {
        let img = solid(2, 2, [0, 0, 0, 255]);
        let png = encode_png(&img).unwrap();
        let back = image::load_from_memory(&png).unwrap();
        assert_eq!((back.width(), back.height()), (2, 2));
    }
}
