//! Per-dataset adapters.
//!
//! An adapter pairs a [`Dataset`] with a [`PairingStrategy`]. The strategy knows the on-disk
//! layout: `discover` lists candidates in a stable order, `pair` locates the annotation
//! artifacts of one candidate. Decoding and binarization are shared and selected by the
//! [`Annotation`] kind the strategy reports.
//!
//! Loading is lazy: nothing touches the filesystem until the first `next()` on [`Samples`].

mod labeled;
mod listing;
mod mirror;
mod nested;
mod split;
mod suffix;

use std::iter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, error, log, Level};

use crate::binarize;
use crate::dataset::Dataset;
use crate::decode;
use crate::errors::{MedSegError, Result};
use crate::sample::Sample;

pub use labeled::LabeledArray;
pub use listing::SortOrder;
pub use mirror::{ExtensionFlexibleMirror, MirrorDirectory};
pub use nested::{FileName, FilePick, NestedSampleDirs};
pub use split::{SplitMerged, Subset};
pub use suffix::SuffixConvention;

/// Log level for a sample dropped by `err`: `Warn` for per-file faults, `Error` otherwise.
fn skip_level(err: &MedSegError) -> Level {
    if err.is_per_sample() {
        Level::Warn
    } else {
        Level::Error
    }
}

/// Where the ground truth of one sample lives and how it is binarized.
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    /// One raster, `> 127` is foreground.
    Raster(PathBuf),
    /// Per-instance rasters under `dir`, unioned. Undecodable fragments are dropped.
    Fragments { dir: PathBuf, files: Vec<PathBuf> },
    /// Scientific array; the first present field of `fields` is used, `> 0` is foreground.
    LabelMatrix {
        path: PathBuf,
        fields: &'static [&'static str],
    },
}

/// An image file found by discovery, before its annotation is looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEntry {
    pub sample_id: String,
    pub file_name: String,
    pub image: PathBuf,
    /// Directory the annotation is expected in.
    pub annotation_dir: PathBuf,
}

/// A located image and its annotation artifacts.
#[derive(Debug, Clone, PartialEq)]
pub struct Pair {
    pub sample_id: String,
    pub image: PathBuf,
    pub annotation: Annotation,
}

impl Pair {
    /// Decodes both sides and builds the sample. The mask is aligned to the image before
    /// the sample is constructed.
    pub fn materialize(self, dataset: Dataset) -> Result<Sample> {
        let image = decode::open_image(&self.image)?;
        let (width, height) = image.dimensions();

        let mask = match &self.annotation {
            Annotation::Raster(path) => {
                let gray = decode::open_annotation(path)?;
                binarize::threshold(&binarize::align(gray, width, height))
            }
            Annotation::Fragments { dir, files } => {
                let mut last_error = None;
                let fragments: Vec<_> = files
                    .iter()
                    .filter_map(|path| match decode::open_annotation(path) {
                        Ok(gray) => Some(gray),
                        Err(e) => {
                            debug!("{}: ignoring fragment: {}", dataset, e);
                            last_error = Some(Box::new(e));
                            None
                        }
                    })
                    .collect();
                if fragments.is_empty() {
                    return Err(MedSegError::UnusableFragments {
                        path: dir.clone(),
                        source: last_error,
                    });
                }
                binarize::union(fragments, width, height)
            }
            Annotation::LabelMatrix { path, fields } => {
                let labels = decode::open_label_matrix(path, fields)?;
                binarize::align_mask(binarize::labels_to_mask(labels.view()), width, height)
            }
        };

        Sample::new(image, mask, dataset, self.sample_id)
    }
}

/// A dataset layout: candidate discovery plus per-candidate pairing.
pub trait PairingStrategy: Send + Sync {
    type Candidate: Send + 'static;

    /// Lists candidates under the dataset root in iteration order.
    ///
    /// Fails with `MissingRoot` when a directory the layout requires is absent.
    fn discover(&self, root: &Path) -> Result<Vec<Self::Candidate>>;

    /// Locates the annotation of a candidate; `None` is a pairing miss.
    fn pair(&self, candidate: Self::Candidate) -> Option<Pair>;
}

/// Lazy, finite stream of samples from one or more adapters.
pub struct Samples {
    inner: Box<dyn Iterator<Item = Sample> + Send>,
}

impl Samples {
    pub fn new<I>(iter: I) -> Self
    where
        I: Iterator<Item = Sample> + Send + 'static,
    {
        Self {
            inner: Box::new(iter),
        }
    }
}

impl Iterator for Samples {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        self.inner.next()
    }
}

/// Dataset-agnostic face of an adapter.
pub trait DatasetAdapter: Send + Sync {
    fn dataset(&self) -> Dataset;

    /// Streams the samples under `root`, stopping after `max_samples` successful ones.
    fn load(&self, root: &Path, max_samples: Option<usize>) -> Samples;
}

/// An adapter built from a pairing strategy.
pub struct Adapter<S> {
    dataset: Dataset,
    strategy: Arc<S>,
}

impl<S: PairingStrategy> Adapter<S> {
    pub fn new(dataset: Dataset, strategy: S) -> Self {
        Self {
            dataset,
            strategy: Arc::new(strategy),
        }
    }
}

impl<S: PairingStrategy + 'static> DatasetAdapter for Adapter<S> {
    fn dataset(&self) -> Dataset {
        self.dataset
    }

    fn load(&self, root: &Path, max_samples: Option<usize>) -> Samples {
        let dataset = self.dataset;
        let discoverer = Arc::clone(&self.strategy);
        let pairer = Arc::clone(&self.strategy);

        let samples = iter::once(root.to_path_buf())
            .flat_map(move |root| match discoverer.discover(&root) {
                Ok(candidates) => candidates,
                Err(e) => {
                    error!("{}: {}", dataset, e);
                    Vec::new()
                }
            })
            .filter_map(move |candidate| {
                let pair = pairer.pair(candidate)?;
                match pair.materialize(dataset) {
                    Ok(sample) => Some(sample),
                    Err(e) => {
                        log!(skip_level(&e), "{}: skipping sample: {}", dataset, e);
                        None
                    }
                }
            })
            .take(max_samples.unwrap_or(usize::MAX));

        Samples::new(samples)
    }
}

const CONSEP_FIELDS: &[&str] = &["inst_map", "type_map"];

/// The adapter registered for `dataset`.
pub fn for_dataset(dataset: Dataset) -> Box<dyn DatasetAdapter> {
    match dataset {
        Dataset::ChaseDb1 => Box::new(Adapter::new(
            dataset,
            SuffixConvention {
                image_extensions: &["jpg"],
                ignore_case: false,
                exclude: &[],
                annotation_suffix: "_1stHO.png",
            },
        )),
        Dataset::Stare => Box::new(Adapter::new(
            dataset,
            SuffixConvention {
                image_extensions: &["ppm"],
                ignore_case: false,
                exclude: &[".ah.", ".vk."],
                annotation_suffix: ".ah.ppm",
            },
        )),
        Dataset::CvcClinicDb => Box::new(Adapter::new(
            dataset,
            MirrorDirectory {
                image_dir: "PNG/Original",
                mask_dir: "PNG/Ground Truth",
                extension: "png",
                order: SortOrder::NumericStem,
            },
        )),
        Dataset::EtisLarib => Box::new(Adapter::new(
            dataset,
            MirrorDirectory {
                image_dir: "images",
                mask_dir: "masks",
                extension: "png",
                order: SortOrder::NumericStem,
            },
        )),
        Dataset::Ph2 => Box::new(Adapter::new(
            dataset,
            NestedSampleDirs {
                samples_dir: "PH2Dataset/PH2 Dataset images",
                dir_prefix: Some("IMD"),
                image: FilePick {
                    dir: "{id}_Dermoscopic_Image",
                    file: FileName::Exact("{id}.bmp"),
                },
                annotations: FilePick {
                    dir: "{id}_lesion",
                    file: FileName::Exact("{id}_lesion.bmp"),
                },
            },
        )),
        Dataset::Tn3k => Box::new(Adapter::new(
            dataset,
            SplitMerged {
                subsets: vec![
                    Subset {
                        name: "test",
                        dir: "",
                        strategy: ExtensionFlexibleMirror::jpg_with_png_masks(
                            "test-image",
                            "test-mask",
                        ),
                    },
                    Subset {
                        name: "trainval",
                        dir: "",
                        strategy: ExtensionFlexibleMirror::jpg_with_png_masks(
                            "trainval-image",
                            "trainval-mask",
                        ),
                    },
                ],
                prefix_ids: true,
            },
        )),
        Dataset::Tg3k => Box::new(Adapter::new(
            dataset,
            ExtensionFlexibleMirror::jpg_with_png_masks("image", "mask"),
        )),
        Dataset::Ddti => Box::new(Adapter::new(
            dataset,
            ExtensionFlexibleMirror {
                image_dir: "image",
                mask_dir: "mask",
                image_extensions: &["png", "PNG"],
                ignore_case: false,
                mask_extensions: &["png", "PNG"],
                order: SortOrder::EmbeddedDigits,
            },
        )),
        Dataset::Hc18 => Box::new(Adapter::new(
            dataset,
            SuffixConvention {
                image_extensions: &["png"],
                ignore_case: true,
                exclude: &["Annotation"],
                annotation_suffix: "_Annotation.png",
            },
        )),
        Dataset::Dsb18 => Box::new(Adapter::new(
            dataset,
            NestedSampleDirs {
                samples_dir: "",
                dir_prefix: None,
                image: FilePick {
                    dir: "images",
                    file: FileName::AnyWithExtension("png"),
                },
                annotations: FilePick {
                    dir: "masks",
                    file: FileName::AnyWithExtension("png"),
                },
            },
        )),
        Dataset::Consep => Box::new(Adapter::new(
            dataset,
            SplitMerged {
                subsets: ["Test", "Train"]
                    .into_iter()
                    .map(|name| Subset {
                        name,
                        dir: name,
                        strategy: LabeledArray {
                            image_dir: "Images",
                            label_dir: "Labels",
                            image_extension: "png",
                            label_extension: "mat",
                            fields: CONSEP_FIELDS,
                        },
                    })
                    .collect(),
                prefix_ids: true,
            },
        )),
    }
}
