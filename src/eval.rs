//! Scoring a segmentation model against ground truth samples.

use log::debug;
use ndarray::Array2;

use crate::binarize;
use crate::dataset::Dataset;
use crate::errors::Result;
use crate::sample::Sample;
use crate::traits::{Prompt, PromptableSegmenter};

/// Dice coefficient of two equally shaped masks; non-zero is foreground. 1.0 when both are empty.
pub fn dice(prediction: &Array2<u8>, truth: &Array2<u8>) -> f64 {
    let (intersection, pred, gt) = counts(prediction, truth);
    if pred + gt == 0 {
        return 1.0;
    }
    2.0 * intersection as f64 / (pred + gt) as f64
}

/// Intersection over union; 1.0 when both are empty.
pub fn iou(prediction: &Array2<u8>, truth: &Array2<u8>) -> f64 {
    let (intersection, pred, gt) = counts(prediction, truth);
    let union = pred + gt - intersection;
    if union == 0 {
        return 1.0;
    }
    intersection as f64 / union as f64
}

fn counts(prediction: &Array2<u8>, truth: &Array2<u8>) -> (usize, usize, usize) {
    prediction
        .iter()
        .zip(truth.iter())
        .fold((0, 0, 0), |(i, p, g), (&a, &b)| {
            let (a, b) = (a > 0, b > 0);
            (i + usize::from(a && b), p + usize::from(a), g + usize::from(b))
        })
}

#[derive(Debug, Clone, PartialEq)]
pub struct SampleScore {
    pub dataset: Dataset,
    pub sample_id: String,
    pub dice: f64,
    pub iou: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetScore {
    pub dataset: Dataset,
    pub samples: usize,
    pub mean_dice: f64,
    pub mean_iou: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvalReport {
    pub samples: Vec<SampleScore>,
}

impl EvalReport {
    /// Means per dataset, in the order datasets first appear.
    pub fn per_dataset(&self) -> Vec<DatasetScore> {
        let mut scores: Vec<DatasetScore> = Vec::new();
        for sample in &self.samples {
            let index = match scores.iter().position(|s| s.dataset == sample.dataset) {
                Some(index) => index,
                None => {
                    scores.push(DatasetScore {
                        dataset: sample.dataset,
                        samples: 0,
                        mean_dice: 0.0,
                        mean_iou: 0.0,
                    });
                    scores.len() - 1
                }
            };
            let entry = &mut scores[index];
            entry.samples += 1;
            entry.mean_dice += sample.dice;
            entry.mean_iou += sample.iou;
        }
        for entry in &mut scores {
            entry.mean_dice /= entry.samples as f64;
            entry.mean_iou /= entry.samples as f64;
        }
        scores
    }
}

/// Segments every sample with its dataset's text prompt and scores the result.
///
/// `NoMaskPredicted` and other model errors stop the run and are returned as is.
pub fn evaluate<M, I>(model: &M, samples: I) -> Result<EvalReport>
where
    M: PromptableSegmenter + ?Sized,
    I: IntoIterator<Item = Sample>,
{
    let mut report = EvalReport::default();
    for sample in samples {
        let prompt = Prompt::Text(sample.text_prompt().to_string());
        let prediction = model.segment(sample.image(), &prompt)?;

        let (width, height) = sample.image().dimensions();
        let prediction =
            binarize::align_mask(binarize::labels_to_mask(prediction.view()), width, height);

        let score = SampleScore {
            dataset: sample.dataset(),
            sample_id: sample.sample_id().to_string(),
            dice: dice(&prediction, sample.ground_truth_mask()),
            iou: iou(&prediction, sample.ground_truth_mask()),
        };
        debug!(
            "{} {}: dice {:.4} iou {:.4}",
            score.dataset, score.sample_id, score.dice, score.iou
        );
        report.samples.push(score);
    }
    Ok(report)
}
