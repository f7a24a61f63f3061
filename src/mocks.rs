use image::RgbImage;
use ndarray::Array2;

use crate::errors::{MedSegError, Result};
use crate::traits::{Prompt, PromptableSegmenter};

/// What the mock model answers.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Every pixel foreground.
    Full,
    /// Every pixel background.
    Empty,
    /// This mask whatever the image size.
    Fixed(Array2<u8>),
    /// `NoMaskPredicted` for every prompt.
    Refuse,
}

/// Test stand-in for the external segmentation model.
#[derive(Debug, Clone)]
pub struct MockSegmenter {
    pub behavior: MockBehavior,
}

impl MockSegmenter {
    pub const fn new(behavior: MockBehavior) -> Self {
        Self { behavior }
    }
}

impl PromptableSegmenter for MockSegmenter {
    fn segment(&self, image: &RgbImage, prompt: &Prompt) -> Result<Array2<u8>> {
        let shape = (image.height() as usize, image.width() as usize);
        match &self.behavior {
            MockBehavior::Full => Ok(Array2::ones(shape)),
            MockBehavior::Empty => Ok(Array2::zeros(shape)),
            MockBehavior::Fixed(mask) => Ok(mask.clone()),
            MockBehavior::Refuse => Err(MedSegError::NoMaskPredicted {
                prompt: prompt.to_string(),
            }),
        }
    }
}
