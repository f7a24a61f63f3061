//! Collapse intensity rasters, label maps and fragment sets into {0, 1} masks.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma};
use ndarray::{Array2, ArrayView2};
use num_traits::Zero;

/// Intensities strictly above this are foreground.
pub const INTENSITY_THRESHOLD: u8 = 127;

/// Nearest-neighbour resize to `width` x `height`; returns the input untouched when it already fits.
pub fn align(gray: GrayImage, width: u32, height: u32) -> GrayImage {
    if gray.dimensions() == (width, height) {
        gray
    } else {
        imageops::resize(&gray, width, height, FilterType::Nearest)
    }
}

/// `value > 127` rule.
pub fn threshold(gray: &GrayImage) -> Array2<u8> {
    let (w, h) = gray.dimensions();
    Array2::from_shape_fn((h as usize, w as usize), |(y, x)| {
        u8::from(gray.get_pixel(x as u32, y as u32).0[0] > INTENSITY_THRESHOLD)
    })
}

/// `value > 0` rule for instance and type maps.
pub fn labels_to_mask<T>(labels: ArrayView2<T>) -> Array2<u8>
where
    T: Zero + PartialOrd + Copy,
{
    labels.mapv(|v| u8::from(v > T::zero()))
}

/// Nearest-neighbour resize of a binary mask to `(height, width)`.
pub fn align_mask(mask: Array2<u8>, width: u32, height: u32) -> Array2<u8> {
    let (h, w) = mask.dim();
    if (w as u32, h as u32) == (width, height) {
        return mask;
    }
    let gray = GrayImage::from_fn(w as u32, h as u32, |x, y| Luma([mask[[y as usize, x as usize]]]));
    let resized = imageops::resize(&gray, width, height, FilterType::Nearest);
    Array2::from_shape_fn((height as usize, width as usize), |(y, x)| {
        resized.get_pixel(x as u32, y as u32).0[0]
    })
}

/// Pixel-wise union of fragments.
///
/// Each fragment is aligned to `width` x `height` and thresholded on its own; a pixel is
/// foreground when any fragment marks it.
pub fn union<I>(fragments: I, width: u32, height: u32) -> Array2<u8>
where
    I: IntoIterator<Item = GrayImage>,
{
    let mut mask = Array2::<u8>::zeros((height as usize, width as usize));
    for fragment in fragments {
        let fragment = threshold(&align(fragment, width, height));
        mask.zip_mut_with(&fragment, |m, &f| *m |= f);
    }
    mask
}
