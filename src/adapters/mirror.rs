use std::path::Path;

use super::listing::{self, SortOrder};
use super::{Annotation, ImageEntry, Pair, PairingStrategy};
use crate::errors::Result;

fn discover_entries<F>(
    root: &Path,
    image_dir: &str,
    mask_dir: &str,
    order: SortOrder,
    filter: F,
) -> Result<Vec<ImageEntry>>
where
    F: Fn(&str) -> bool,
{
    let image_dir = root.join(image_dir);
    let annotation_dir = root.join(mask_dir);
    let names = listing::files(&image_dir, order, filter)?;

    Ok(names
        .into_iter()
        .map(|file_name| ImageEntry {
            sample_id: listing::stem(&file_name).to_string(),
            image: image_dir.join(&file_name),
            annotation_dir: annotation_dir.clone(),
            file_name,
        })
        .collect())
}

/// Image and mask share a file name and live in sibling directories.
#[derive(Debug, Clone)]
pub struct MirrorDirectory {
    pub image_dir: &'static str,
    pub mask_dir: &'static str,
    pub extension: &'static str,
    pub order: SortOrder,
}

impl PairingStrategy for MirrorDirectory {
    type Candidate = ImageEntry;

    fn discover(&self, root: &Path) -> Result<Vec<ImageEntry>> {
        discover_entries(root, self.image_dir, self.mask_dir, self.order, |name| {
            listing::has_extension(name, &[self.extension], false)
        })
    }

    fn pair(&self, entry: ImageEntry) -> Option<Pair> {
        let mask = entry.annotation_dir.join(&entry.file_name);
        mask.is_file().then(|| Pair {
            sample_id: entry.sample_id,
            image: entry.image,
            annotation: Annotation::Raster(mask),
        })
    }
}

/// Mirror layout whose masks may carry a different or differently-cased extension.
///
/// Candidates are probed in order: the image's own file name, then the stem with each of
/// `mask_extensions`. The first existing file wins.
#[derive(Debug, Clone)]
pub struct ExtensionFlexibleMirror {
    pub image_dir: &'static str,
    pub mask_dir: &'static str,
    pub image_extensions: &'static [&'static str],
    pub ignore_case: bool,
    pub mask_extensions: &'static [&'static str],
    pub order: SortOrder,
}

impl ExtensionFlexibleMirror {
    /// `.jpg` images (any case) whose masks are `.jpg` or `.png`.
    pub const fn jpg_with_png_masks(image_dir: &'static str, mask_dir: &'static str) -> Self {
        Self {
            image_dir,
            mask_dir,
            image_extensions: &["jpg"],
            ignore_case: true,
            mask_extensions: &["png"],
            order: SortOrder::Lexical,
        }
    }

    /// Ordered, de-duplicated mask names to probe for `file_name`.
    pub fn mask_candidates(&self, file_name: &str) -> Vec<String> {
        let stem = listing::stem(file_name);
        let mut names = vec![file_name.to_string()];
        for ext in self.mask_extensions {
            let name = format!("{}.{}", stem, ext);
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}

impl PairingStrategy for ExtensionFlexibleMirror {
    type Candidate = ImageEntry;

    fn discover(&self, root: &Path) -> Result<Vec<ImageEntry>> {
        discover_entries(root, self.image_dir, self.mask_dir, self.order, |name| {
            listing::has_extension(name, self.image_extensions, self.ignore_case)
        })
    }

    fn pair(&self, entry: ImageEntry) -> Option<Pair> {
        let mask = self
            .mask_candidates(&entry.file_name)
            .into_iter()
            .map(|name| entry.annotation_dir.join(name))
            .find(|path| path.is_file())?;

        Some(Pair {
            sample_id: entry.sample_id,
            image: entry.image,
            annotation: Annotation::Raster(mask),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_candidate_order() {
        let ddti = ExtensionFlexibleMirror {
            image_dir: "image",
            mask_dir: "mask",
            image_extensions: &["png", "PNG"],
            ignore_case: false,
            mask_extensions: &["png", "PNG"],
            order: SortOrder::EmbeddedDigits,
        };
        assert_eq!(ddti.mask_candidates("7.png"), ["7.png", "7.PNG"]);
        assert_eq!(ddti.mask_candidates("7.PNG"), ["7.PNG", "7.png"]);

        let tg3k = ExtensionFlexibleMirror::jpg_with_png_masks("image", "mask");
        assert_eq!(tg3k.mask_candidates("0001.jpg"), ["0001.jpg", "0001.png"]);
    }
}
