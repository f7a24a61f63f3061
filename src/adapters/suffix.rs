use std::path::Path;

use super::listing::{self, SortOrder};
use super::{Annotation, ImageEntry, Pair, PairingStrategy};
use crate::errors::Result;

/// Images and annotations side by side; the annotation is `{stem}{annotation_suffix}`.
///
/// Datasets with several experts keep only the expert named by the suffix.
#[derive(Debug, Clone)]
pub struct SuffixConvention {
    pub image_extensions: &'static [&'static str],
    pub ignore_case: bool,
    /// Names containing any of these are annotations, not images.
    pub exclude: &'static [&'static str],
    pub annotation_suffix: &'static str,
}

impl SuffixConvention {
    fn is_image(&self, name: &str) -> bool {
        listing::has_extension(name, self.image_extensions, self.ignore_case)
            && !self.exclude.iter().any(|token| name.contains(token))
    }
}

impl PairingStrategy for SuffixConvention {
    type Candidate = ImageEntry;

    fn discover(&self, root: &Path) -> Result<Vec<ImageEntry>> {
        let names = listing::files(root, SortOrder::Lexical, |name| self.is_image(name))?;
        Ok(names
            .into_iter()
            .map(|file_name| ImageEntry {
                sample_id: listing::stem(&file_name).to_string(),
                image: root.join(&file_name),
                annotation_dir: root.to_path_buf(),
                file_name,
            })
            .collect())
    }

    fn pair(&self, entry: ImageEntry) -> Option<Pair> {
        let mask = entry
            .annotation_dir
            .join(format!("{}{}", entry.sample_id, self.annotation_suffix));
        if !mask.is_file() {
            return None;
        }

        Some(Pair {
            sample_id: entry.sample_id,
            image: entry.image,
            annotation: Annotation::Raster(mask),
        })
    }
}
