use std::path::Path;

use super::listing::{self, SortOrder};
use super::{Annotation, ImageEntry, Pair, PairingStrategy};
use crate::errors::Result;

/// Images paired with a scientific-array label file of the same stem.
///
/// `fields` is a priority list: an instance map is preferred over a type map.
#[derive(Debug, Clone)]
pub struct LabeledArray {
    pub image_dir: &'static str,
    pub label_dir: &'static str,
    pub image_extension: &'static str,
    pub label_extension: &'static str,
    pub fields: &'static [&'static str],
}

impl PairingStrategy for LabeledArray {
    type Candidate = ImageEntry;

    fn discover(&self, root: &Path) -> Result<Vec<ImageEntry>> {
        let image_dir = root.join(self.image_dir);
        let label_dir = root.join(self.label_dir);
        let names = listing::files(&image_dir, SortOrder::Lexical, |name| {
            listing::has_extension(name, &[self.image_extension], false)
        })?;

        Ok(names
            .into_iter()
            .map(|file_name| ImageEntry {
                sample_id: listing::stem(&file_name).to_string(),
                image: image_dir.join(&file_name),
                annotation_dir: label_dir.clone(),
                file_name,
            })
            .collect())
    }

    fn pair(&self, entry: ImageEntry) -> Option<Pair> {
        let label = entry
            .annotation_dir
            .join(format!("{}.{}", entry.sample_id, self.label_extension));
        if !label.is_file() {
            return None;
        }

        Some(Pair {
            sample_id: entry.sample_id,
            image: entry.image,
            annotation: Annotation::LabelMatrix {
                path: label,
                fields: self.fields,
            },
        })
    }
}
