//! Directory listing and ordering shared by the pairing strategies.

use std::path::Path;

use log::debug;
use walkdir::WalkDir;

use crate::errors::{MedSegError, Result};

/// Iteration order of discovered names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Byte-wise by file name.
    Lexical,
    /// By the integer value of the whole stem (`10.png` after `9.png`).
    NumericStem,
    /// By the integer formed from every digit in the name (`case12_b.png` -> 12).
    EmbeddedDigits,
}

impl SortOrder {
    /// Reorders a lexically sorted list. Falls back to lexical when any name has no usable key.
    pub(crate) fn apply(self, names: &mut Vec<String>) {
        let key: fn(&str) -> Option<u128> = match self {
            SortOrder::Lexical => return,
            SortOrder::NumericStem => |name| stem(name).parse().ok(),
            SortOrder::EmbeddedDigits => |name| {
                let digits: String = name.chars().filter(char::is_ascii_digit).collect();
                digits.parse().ok()
            },
        };

        let keys: Option<Vec<u128>> = names.iter().map(|name| key(name)).collect();
        match keys {
            Some(keys) => {
                let mut keyed: Vec<(u128, String)> = keys.into_iter().zip(names.drain(..)).collect();
                // stable, so equal keys keep their lexical order
                keyed.sort_by_key(|(k, _)| *k);
                names.extend(keyed.into_iter().map(|(_, name)| name));
            }
            None => debug!("{:?} order unavailable, keeping lexical order", self),
        }
    }
}

/// File name without its final extension.
pub(crate) fn stem(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}

pub(crate) fn has_extension(name: &str, extensions: &[&str], ignore_case: bool) -> bool {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => extensions.iter().any(|candidate| {
            if ignore_case {
                ext.eq_ignore_ascii_case(candidate)
            } else {
                ext == *candidate
            }
        }),
        _ => false,
    }
}

fn entries<F>(dir: &Path, want_dirs: bool, filter: F) -> Result<Vec<String>>
where
    F: Fn(&str) -> bool,
{
    if !dir.is_dir() {
        return Err(MedSegError::MissingRoot {
            path: dir.to_path_buf(),
        });
    }

    Ok(WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir() == want_dirs)
        .filter_map(|e| match e.file_name().to_str() {
            Some(name) => Some(name.to_owned()),
            None => {
                debug!("skipping non UTF-8 name {:?}", e.path());
                None
            }
        })
        .filter(|name| filter(name))
        .collect())
}

/// Names of the regular files directly under `dir` accepted by `filter`, in `order`.
pub(crate) fn files<F>(dir: &Path, order: SortOrder, filter: F) -> Result<Vec<String>>
where
    F: Fn(&str) -> bool,
{
    let mut names = entries(dir, false, filter)?;
    order.apply(&mut names);
    Ok(names)
}

/// Names of the subdirectories directly under `dir` accepted by `filter`, lexically.
pub(crate) fn dirs<F>(dir: &Path, filter: F) -> Result<Vec<String>>
where
    F: Fn(&str) -> bool,
{
    entries(dir, true, filter)
}
