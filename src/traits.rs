use std::fmt;
use std::str::FromStr;

use image::RgbImage;
use ndarray::Array2;

use crate::errors::{MedSegError, Result};

/// Pixel box `x_min,y_min,x_max,y_max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x_min: u32,
    pub y_min: u32,
    pub x_max: u32,
    pub y_max: u32,
}

impl FromStr for BoundingBox {
    type Err = MedSegError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: String| MedSegError::Validation {
            field: "box".to_string(),
            reason,
        };

        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [x_min, y_min, x_max, y_max] = parts[..] else {
            return Err(invalid(format!(
                "must be 'x_min,y_min,x_max,y_max', got {:?}",
                s
            )));
        };
        let parse = |v: &str| {
            v.parse::<u32>()
                .map_err(|e| invalid(format!("component {:?}: {}", v, e)))
        };

        Ok(Self {
            x_min: parse(x_min)?,
            y_min: parse(y_min)?,
            x_max: parse(x_max)?,
            y_max: parse(y_max)?,
        })
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x_min, self.y_min, self.x_max, self.y_max)
    }
}

/// What the model is asked to segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    Text(String),
    Box(BoundingBox),
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prompt::Text(text) => f.write_str(text),
            Prompt::Box(bbox) => write!(f, "box({})", bbox),
        }
    }
}

/// Promptable segmentation model, owned outside this crate.
///
/// Implementations return a mask whose non-zero pixels are foreground, or
/// `MedSegError::NoMaskPredicted`. The mask need not match the image resolution;
/// consumers resize it.
pub trait PromptableSegmenter: Send + Sync {
    fn segment(&self, image: &RgbImage, prompt: &Prompt) -> Result<Array2<u8>>;
}
