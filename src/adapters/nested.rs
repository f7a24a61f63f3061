use std::path::{Path, PathBuf};

use super::listing::{self, SortOrder};
use super::{Annotation, Pair, PairingStrategy};
use crate::errors::Result;

/// File selection inside a per-sample directory. `{id}` expands to the sample directory name.
#[derive(Debug, Clone, Copy)]
pub enum FileName {
    Exact(&'static str),
    AnyWithExtension(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct FilePick {
    pub dir: &'static str,
    pub file: FileName,
}

impl FilePick {
    /// Matching files in lexical order, or `None` when the directory is absent.
    fn resolve(&self, sample_dir: &Path, id: &str) -> Option<(PathBuf, Vec<PathBuf>)> {
        let dir = sample_dir.join(self.dir.replace("{id}", id));
        let files = match self.file {
            FileName::Exact(template) => {
                let path = dir.join(template.replace("{id}", id));
                if path.is_file() {
                    vec![path]
                } else {
                    Vec::new()
                }
            }
            FileName::AnyWithExtension(ext) => {
                listing::files(&dir, SortOrder::Lexical, |name| {
                    listing::has_extension(name, &[ext], false)
                })
                .ok()?
                .into_iter()
                .map(|name| dir.join(name))
                .collect()
            }
        };
        Some((dir, files))
    }
}

/// One directory per sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleDir {
    pub sample_id: String,
    pub dir: PathBuf,
}

/// Each sample owns a directory holding an image directory and an annotation directory.
///
/// The first matching image is used. An exact annotation name is a single raster; otherwise
/// every matching annotation is a fragment of the ground truth and they are unioned.
#[derive(Debug, Clone)]
pub struct NestedSampleDirs {
    /// Directory holding the sample directories, relative to the dataset root.
    pub samples_dir: &'static str,
    pub dir_prefix: Option<&'static str>,
    pub image: FilePick,
    pub annotations: FilePick,
}

impl PairingStrategy for NestedSampleDirs {
    type Candidate = SampleDir;

    fn discover(&self, root: &Path) -> Result<Vec<SampleDir>> {
        let base = root.join(self.samples_dir);
        let names = listing::dirs(&base, |name| {
            self.dir_prefix.map_or(true, |prefix| name.starts_with(prefix))
        })?;

        Ok(names
            .into_iter()
            .map(|sample_id| SampleDir {
                dir: base.join(&sample_id),
                sample_id,
            })
            .collect())
    }

    fn pair(&self, candidate: SampleDir) -> Option<Pair> {
        let (_, images) = self.image.resolve(&candidate.dir, &candidate.sample_id)?;
        let image = images.into_iter().next()?;

        let (dir, mut files) = self
            .annotations
            .resolve(&candidate.dir, &candidate.sample_id)?;
        let annotation = match self.annotations.file {
            // a single named file is the whole ground truth
            FileName::Exact(_) => Annotation::Raster(files.pop()?),
            FileName::AnyWithExtension(_) if files.is_empty() => return None,
            FileName::AnyWithExtension(_) => Annotation::Fragments { dir, files },
        };

        Some(Pair {
            sample_id: candidate.sample_id,
            image,
            annotation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::errors::MedSegError;
    use image::{ImageFormat, RgbImage};
    use std::fs;
    use tempfile::TempDir;

    fn ph2() -> NestedSampleDirs {
        NestedSampleDirs {
            samples_dir: "images",
            dir_prefix: Some("IMD"),
            image: FilePick {
                dir: "{id}_Dermoscopic_Image",
                file: FileName::Exact("{id}.bmp"),
            },
            annotations: FilePick {
                dir: "{id}_lesion",
                file: FileName::Exact("{id}_lesion.bmp"),
            },
        }
    }

    #[test]
    fn test_templated_paths() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();
        let sample = root.join("images/IMD002");
        fs::create_dir_all(sample.join("IMD002_Dermoscopic_Image"))?;
        fs::create_dir_all(sample.join("IMD002_lesion"))?;
        fs::create_dir_all(root.join("images/notes"))?;
        fs::write(sample.join("IMD002_Dermoscopic_Image/IMD002.bmp"), b"")?;
        fs::write(sample.join("IMD002_lesion/IMD002_lesion.bmp"), b"")?;

        let candidates = ph2().discover(root)?;
        assert_eq!(candidates.len(), 1);

        let pair = ph2().pair(candidates[0].clone()).expect("paired");
        assert_eq!(pair.sample_id, "IMD002");
        assert_eq!(pair.image, sample.join("IMD002_Dermoscopic_Image/IMD002.bmp"));
        assert_eq!(
            pair.annotation,
            Annotation::Raster(sample.join("IMD002_lesion/IMD002_lesion.bmp"))
        );
        Ok(())
    }

    #[test]
    fn test_corrupt_lesion_reports_the_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();
        let sample = root.join("images/IMD004");
        let image = sample.join("IMD004_Dermoscopic_Image/IMD004.bmp");
        let lesion = sample.join("IMD004_lesion/IMD004_lesion.bmp");
        fs::create_dir_all(image.parent().unwrap())?;
        fs::create_dir_all(lesion.parent().unwrap())?;
        RgbImage::new(3, 3).save_with_format(&image, ImageFormat::Bmp)?;
        fs::write(&lesion, b"not a bitmap")?;

        let candidates = ph2().discover(root)?;
        let pair = ph2().pair(candidates[0].clone()).expect("paired");
        match pair.materialize(Dataset::Ph2) {
            Err(MedSegError::Decode { path, .. }) => assert_eq!(path, lesion),
            other => panic!("unexpected result: {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_missing_lesion_is_pairing_miss() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();
        let sample = root.join("images/IMD003");
        fs::create_dir_all(sample.join("IMD003_Dermoscopic_Image"))?;
        fs::write(sample.join("IMD003_Dermoscopic_Image/IMD003.bmp"), b"")?;

        let candidates = ph2().discover(root)?;
        assert!(ph2().pair(candidates[0].clone()).is_none());
        Ok(())
    }
}
