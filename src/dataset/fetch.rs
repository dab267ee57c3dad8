use super::error::DatasetError;
use log::warn;
use serde::{Deserialize, Serialize};

/// What a dataset does when a single sample cannot be decoded or transformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Return the error to the caller.
    Propagate,
    /// Log it and hand back [`Fetched::Skipped`], leaving retry/drop to the caller.
    Skip,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        FailurePolicy::Propagate
    }
}

/// Outcome of a successful `get`: either the sample or an explicit skip.
#[derive(Debug)]
pub enum Fetched<T> {
    Sample(T),
    Skipped { index: usize, reason: DatasetError },
}

impl<T> Fetched<T> {
    pub fn sample(self) -> Option<T> {
        match self {
            Fetched::Sample(sample) => Some(sample),
            Fetched::Skipped { .. } => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Fetched::Skipped { .. })
    }

    pub fn map<U, F>(self, f: F) -> Fetched<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Fetched::Sample(sample) => Fetched::Sample(f(sample)),
            Fetched::Skipped { index, reason } => Fetched::Skipped { index, reason },
        }
    }
}

impl FailurePolicy {
    /// Applies the policy to the result of loading sample `index`.
    pub(crate) fn resolve<T>(
        self,
        index: usize,
        result: Result<T, DatasetError>,
    ) -> Result<Fetched<T>, DatasetError> {
        match (result, self) {
            (Ok(sample), _) => Ok(Fetched::Sample(sample)),
            (Err(reason), FailurePolicy::Skip) if reason.is_sample_failure() => {
                warn!("skipping sample {}: {}", index, error_chain(&reason));
                Ok(Fetched::Skipped { index, reason })
            }
            (Err(err), _) => Err(err),
        }
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
