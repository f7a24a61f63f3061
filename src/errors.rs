use std::path::PathBuf;
use thiserror::Error;

/// Structured error types for dataset ingestion and the model boundary.
///
/// Per-file variants (`Decode`, `LabelMatrix`, `MissingLabelField`, `UnusableFragments`)
/// are caught inside the adapters and turn into a skipped sample. `UnknownDataset` is the
/// only variant the registry hands back to callers as a hard failure.
#[derive(Error, Debug)]
pub enum MedSegError {
    #[error("Unknown dataset: {name}. Available: {}", .available.join(", "))]
    UnknownDataset {
        name: String,
        available: Vec<&'static str>,
    },

    #[error("Dataset root not found: {path:?}")]
    MissingRoot { path: PathBuf },

    #[error("Filesystem error: {operation} failed for {path:?}")]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Decode error: {operation} failed for {path:?}: {source}")]
    Decode {
        path: PathBuf,
        operation: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Label matrix error: {path:?}: {reason}")]
    LabelMatrix { path: PathBuf, reason: String },

    #[error("Label matrix {path:?} has none of the fields {}", .fields.join(", "))]
    MissingLabelField {
        path: PathBuf,
        fields: Vec<&'static str>,
    },

    #[error(
        "No annotation fragment could be decoded under {path:?}{}",
        .source.as_ref().map_or_else(String::new, |e| format!(" (last: {})", e))
    )]
    UnusableFragments {
        path: PathBuf,
        #[source]
        source: Option<Box<MedSegError>>,
    },

    #[error("No mask predicted for prompt {prompt:?}")]
    NoMaskPredicted { prompt: String },

    #[error("Validation error: {field} {reason}")]
    Validation { field: String, reason: String },
}

pub type Result<T> = std::result::Result<T, MedSegError>;

impl MedSegError {
    /// True for faults that only cost one sample.
    pub const fn is_per_sample(&self) -> bool {
        matches!(
            self,
            Self::Decode { .. }
                | Self::LabelMatrix { .. }
                | Self::MissingLabelField { .. }
                | Self::UnusableFragments { .. }
        )
    }
}

/// Convert I/O errors to filesystem errors.
///
/// Code that knows the path and operation should build `MedSegError::FileSystem`
/// directly; this is the fallback for boundary code.
impl From<std::io::Error> for MedSegError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("unknown"),
            operation: "unknown".to_string(),
            source: err,
        }
    }
}

/// Convert image crate errors to decode errors.
impl From<image::ImageError> for MedSegError {
    fn from(err: image::ImageError) -> Self {
        Self::Decode {
            path: PathBuf::from("unknown"),
            operation: "image decode".to_string(),
            source: Box::new(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_dataset_lists_names() {
        let err = MedSegError::UnknownDataset {
            name: "NOPE".to_string(),
            available: vec!["A", "B"],
        };
        assert_eq!(err.to_string(), "Unknown dataset: NOPE. Available: A, B");
        assert!(!err.is_per_sample());
    }

    #[test]
    fn test_per_sample_classification() {
        let err = MedSegError::UnusableFragments {
            path: PathBuf::from("masks"),
            source: None,
        };
        assert!(err.is_per_sample());

        let err = MedSegError::Validation {
            field: "ground_truth_mask".to_string(),
            reason: "contains values outside {0, 1}".to_string(),
        };
        assert!(!err.is_per_sample());

        let err = MedSegError::MissingRoot {
            path: PathBuf::from("root"),
        };
        assert!(!err.is_per_sample());
    }
}
