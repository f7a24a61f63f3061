//! Turning binary masks into pictures and summary numbers.

use image::{GrayImage, Luma, Rgb, RgbImage};
use ndarray::Array2;

/// Default overlay colour and opacity.
pub const OVERLAY_COLOR: Rgb<u8> = Rgb([0, 255, 255]);
pub const OVERLAY_ALPHA: f32 = 0.5;

/// Non-zero → 255, zero → 0.
pub fn mask_to_luma(mask: &Array2<u8>) -> GrayImage {
    let (h, w) = mask.dim();
    GrayImage::from_fn(w as u32, h as u32, |x, y| {
        Luma([if mask[[y as usize, x as usize]] > 0 { 255 } else { 0 }])
    })
}

/// Blends `color` at `alpha` over the foreground pixels of `mask`.
///
/// `mask` must be `(height, width)` of `image`; pixels outside it are left as is.
pub fn overlay(image: &RgbImage, mask: &Array2<u8>, color: Rgb<u8>, alpha: f32) -> RgbImage {
    let alpha = alpha.clamp(0.0, 1.0);
    let mut out = image.clone();
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let inside = mask
            .get([y as usize, x as usize])
            .is_some_and(|&v| v > 0);
        if inside {
            for (channel, tint) in pixel.0.iter_mut().zip(color.0) {
                let blended = f32::from(*channel) * (1.0 - alpha) + f32::from(tint) * alpha;
                *channel = blended.round() as u8;
            }
        }
    }
    out
}

/// Size of the foreground of a mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskStats {
    pub area_px: usize,
    /// Larger side of the foreground bounding box, measured between pixel centres.
    pub diameter_px: usize,
}

impl MaskStats {
    pub fn from_mask(mask: &Array2<u8>) -> Self {
        let mut area_px = 0;
        let mut bounds: Option<(usize, usize, usize, usize)> = None;
        for ((y, x), &v) in mask.indexed_iter() {
            if v == 0 {
                continue;
            }
            area_px += 1;
            bounds = Some(match bounds {
                None => (x, x, y, y),
                Some((x0, x1, y0, y1)) => (x0.min(x), x1.max(x), y0.min(y), y1.max(y)),
            });
        }

        let diameter_px = bounds.map_or(0, |(x0, x1, y0, y1)| (x1 - x0).max(y1 - y0));
        Self {
            area_px,
            diameter_px,
        }
    }

    pub fn summary(&self, prompt: &str) -> String {
        format!(
            "Detected \"{}\" with area {} px². Estimated diameter {} px.",
            prompt, self.area_px, self.diameter_px
        )
    }
}
