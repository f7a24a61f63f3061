use std::path::Path;

use log::debug;

use super::{Pair, PairingStrategy};
use crate::errors::{MedSegError, Result};

/// One predefined part of a split dataset.
#[derive(Debug, Clone)]
pub struct Subset<S> {
    pub name: &'static str,
    /// Subset root relative to the dataset root; empty when the layout itself names the split.
    pub dir: &'static str,
    pub strategy: S,
}

/// Concatenates subsets, in declaration order, into one iteration.
///
/// An absent subset contributes nothing. With `prefix_ids`, sample ids become
/// `{subset}_{id}` so subsets cannot collide.
#[derive(Debug, Clone)]
pub struct SplitMerged<S> {
    pub subsets: Vec<Subset<S>>,
    pub prefix_ids: bool,
}

impl<S: PairingStrategy> PairingStrategy for SplitMerged<S> {
    type Candidate = (usize, S::Candidate);

    fn discover(&self, root: &Path) -> Result<Vec<Self::Candidate>> {
        if !root.is_dir() {
            return Err(MedSegError::MissingRoot {
                path: root.to_path_buf(),
            });
        }

        let mut candidates = Vec::new();
        for (index, subset) in self.subsets.iter().enumerate() {
            match subset.strategy.discover(&root.join(subset.dir)) {
                Ok(found) => candidates.extend(found.into_iter().map(|c| (index, c))),
                Err(MedSegError::MissingRoot { path }) => {
                    debug!("subset {} absent at {:?}", subset.name, path);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(candidates)
    }

    fn pair(&self, (index, candidate): Self::Candidate) -> Option<Pair> {
        let subset = self.subsets.get(index)?;
        let mut pair = subset.strategy.pair(candidate)?;
        if self.prefix_ids {
            pair.sample_id = format!("{}_{}", subset.name, pair.sample_id);
        }
        Some(pair)
    }
}
