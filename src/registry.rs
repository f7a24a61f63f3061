use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::adapters::{self, DatasetAdapter, Samples};
use crate::dataset::Dataset;
use crate::errors::Result;
use crate::sample::Sample;

/// Eager per-dataset statistics from [`Registry::describe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSummary {
    pub dataset: Dataset,
    pub num_samples: usize,
    /// `(height, width, 3)` of the first sample.
    pub image_shape: Option<(usize, usize, usize)>,
    pub text_prompt: &'static str,
}

/// Name → adapter mapping over one data root. Built once, read-only afterwards.
pub struct Registry {
    data_root: PathBuf,
    adapters: Vec<Box<dyn DatasetAdapter>>,
}

impl Registry {
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
            adapters: Dataset::ALL.into_iter().map(adapters::for_dataset).collect(),
        }
    }

    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    /// `<data_root>/<name>`
    pub fn dataset_root(&self, dataset: Dataset) -> PathBuf {
        self.data_root.join(dataset.name())
    }

    pub fn adapter(&self, dataset: Dataset) -> &dyn DatasetAdapter {
        // `adapters` is built from `Dataset::ALL`, so variant order is the index.
        self.adapters[dataset as usize].as_ref()
    }

    /// Fails with `UnknownDataset` listing every valid name.
    pub fn resolve(&self, name: &str) -> Result<&dyn DatasetAdapter> {
        Ok(self.adapter(name.parse()?))
    }

    pub fn load(&self, dataset: Dataset, max_samples: Option<usize>) -> Samples {
        self.adapter(dataset).load(&self.dataset_root(dataset), max_samples)
    }

    pub fn load_one(&self, name: &str, max_samples: Option<usize>) -> Result<Samples> {
        Ok(self.load(name.parse()?, max_samples))
    }

    /// Every dataset in enumeration order, `max_samples_per_dataset` applied to each.
    pub fn load_all(
        &self,
        max_samples_per_dataset: Option<usize>,
    ) -> impl Iterator<Item = Sample> + '_ {
        Dataset::ALL
            .into_iter()
            .flat_map(move |dataset| self.load(dataset, max_samples_per_dataset))
    }

    /// Materializes each of `datasets` to count it. Datasets are walked in parallel; the
    /// summaries come back in the order given.
    pub fn describe(&self, datasets: &[Dataset]) -> Vec<DatasetSummary> {
        datasets
            .par_iter()
            .map(|&dataset| {
                let mut num_samples = 0;
                let mut image_shape = None;
                for sample in self.load(dataset, None) {
                    if image_shape.is_none() {
                        image_shape = Some(sample.image_shape());
                    }
                    num_samples += 1;
                }
                DatasetSummary {
                    dataset,
                    num_samples,
                    image_shape,
                    text_prompt: dataset.prompt(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MedSegError;

    #[test]
    fn test_adapter_index_matches_dataset() {
        let registry = Registry::new("unused");
        for dataset in Dataset::ALL {
            assert_eq!(registry.adapter(dataset).dataset(), dataset);
        }
    }

    #[test]
    fn test_resolve_unknown() {
        let registry = Registry::new("unused");
        match registry.resolve("NOT_A_DATASET") {
            Err(MedSegError::UnknownDataset { available, .. }) => {
                assert_eq!(available, Dataset::names());
            }
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("resolved an unknown dataset"),
        }
    }

    #[test]
    fn test_describe_empty_root() {
        let registry = Registry::new("/nonexistent/medsam_data");
        let summaries = registry.describe(&Dataset::ALL);
        assert_eq!(summaries.len(), Dataset::ALL.len());
        for (summary, dataset) in summaries.iter().zip(Dataset::ALL) {
            assert_eq!(summary.dataset, dataset);
            assert_eq!(summary.num_samples, 0);
            assert_eq!(summary.image_shape, None);
            assert_eq!(summary.text_prompt, dataset.prompt());
        }
    }

    #[test]
    fn test_describe_selected_only() {
        let registry = Registry::new("/nonexistent/medsam_data");
        let summaries = registry.describe(&[Dataset::Ddti, Dataset::ChaseDb1]);
        let order: Vec<Dataset> = summaries.iter().map(|s| s.dataset).collect();
        assert_eq!(order, [Dataset::Ddti, Dataset::ChaseDb1]);
    }
}
