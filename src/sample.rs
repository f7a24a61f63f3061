use std::collections::BTreeSet;

use image::RgbImage;
use ndarray::{Array2, Array3};

use crate::dataset::Dataset;
use crate::errors::{MedSegError, Result};

/// One image with its binary ground truth.
///
/// Construction checks that the mask is `(height, width)` of the image and holds only 0 and 1,
/// so every `Sample` handed out by an adapter satisfies both.
#[derive(Debug, Clone)]
pub struct Sample {
    image: RgbImage,
    ground_truth_mask: Array2<u8>,
    dataset: Dataset,
    sample_id: String,
}

impl Sample {
    pub fn new(
        image: RgbImage,
        ground_truth_mask: Array2<u8>,
        dataset: Dataset,
        sample_id: impl Into<String>,
    ) -> Result<Self> {
        let expected = (image.height() as usize, image.width() as usize);
        if ground_truth_mask.dim() != expected {
            return Err(MedSegError::Validation {
                field: "ground_truth_mask".to_string(),
                reason: format!(
                    "has shape {:?} but the image is {:?}",
                    ground_truth_mask.dim(),
                    expected
                ),
            });
        }
        if ground_truth_mask.iter().any(|&v| v > 1) {
            return Err(MedSegError::Validation {
                field: "ground_truth_mask".to_string(),
                reason: "contains values outside {0, 1}".to_string(),
            });
        }

        Ok(Self {
            image,
            ground_truth_mask,
            dataset,
            sample_id: sample_id.into(),
        })
    }

    pub const fn image(&self) -> &RgbImage {
        &self.image
    }

    pub const fn ground_truth_mask(&self) -> &Array2<u8> {
        &self.ground_truth_mask
    }

    pub const fn dataset(&self) -> Dataset {
        self.dataset
    }

    pub const fn dataset_name(&self) -> &'static str {
        self.dataset.name()
    }

    pub fn sample_id(&self) -> &str {
        &self.sample_id
    }

    pub const fn text_prompt(&self) -> &'static str {
        self.dataset.prompt()
    }

    /// `(height, width, 3)`
    pub fn image_shape(&self) -> (usize, usize, usize) {
        (self.image.height() as usize, self.image.width() as usize, 3)
    }

    /// Image as a `(height, width, 3)` array.
    pub fn image_array(&self) -> Array3<u8> {
        let (h, w, _) = self.image_shape();
        Array3::from_shape_fn((h, w, 3), |(y, x, c)| {
            self.image.get_pixel(x as u32, y as u32).0[c]
        })
    }

    pub fn mask_values(&self) -> BTreeSet<u8> {
        self.ground_truth_mask.iter().copied().collect()
    }

    pub fn foreground_pixels(&self) -> usize {
        self.ground_truth_mask.iter().filter(|&&v| v == 1).count()
    }
}
