use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while building or reading a folder dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("invalid directory \"{}\"", path.display())]
    InvalidDirectory { path: PathBuf },

    /// A frame group holds fewer than the 2 frames a training pair needs.
    #[error("cannot sample 2 frames from \"{}\": only {found} file(s) found", group.display())]
    Sampling { group: PathBuf, found: usize },

    #[error("I/O error on \"{}\"", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode \"{}\"", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("transform failed on \"{}\"", path.display())]
    Transform {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("index {index} out of range for dataset of size {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid catalog: {0}")]
    Catalog(#[from] serde_json::Error),

    #[error("invalid config file \"{}\"", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl DatasetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DatasetError::Io {
            path: path.into(),
            source,
        }
    }

    /// Per-sample failures that a [`FailurePolicy::Skip`](super::fetch::FailurePolicy::Skip)
    /// dataset turns into skipped samples.
    pub fn is_sample_failure(&self) -> bool {
        matches!(
            self,
            DatasetError::Decode { .. } | DatasetError::Transform { .. }
        )
    }
}
