//! Uniform loaders for medical image segmentation benchmarks.
//!
//! Each supported dataset has its own directory layout, file formats and naming scheme.
//! The adapters in this crate hide that behind one lazy stream of [`Sample`]s: an RGB image,
//! a {0, 1} ground truth mask of the same size, and the dataset's fixed text prompt.
//!
//! ```no_run
//! use medseg_rs::Registry;
//!
//! let registry = Registry::new("../medsam_data");
//! for sample in registry.load_one("CVC-ClinicDB", Some(10))? {
//!     println!("{} {:?}", sample.sample_id(), sample.image_shape());
//! }
//! # Ok::<(), medseg_rs::MedSegError>(())
//! ```

pub mod adapters;
pub mod binarize;
pub mod config;
pub mod dataset;
pub mod decode;
pub mod errors;
pub mod eval;
pub mod mocks;
pub mod registry;
pub mod render;
pub mod sample;
pub mod traits;

pub use adapters::{DatasetAdapter, Samples};
pub use config::Config;
pub use dataset::Dataset;
pub use errors::{MedSegError, Result};
pub use registry::{DatasetSummary, Registry};
pub use sample::Sample;
pub use traits::*;

#[cfg(test)]
pub use mocks::*;
