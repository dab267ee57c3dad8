//! Dataset configuration, read from JSON files.

use super::common_structs::VideoMode;
use super::error::DatasetError;
use super::fetch::FailurePolicy;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SPLIT: &str = "train";
pub const DEFAULT_PAIRS_PER_GROUP: usize = 5;

/// Either kind of folder dataset, selected by the `kind` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DatasetConfig {
    ImageFolder(ImageFolderConfig),
    VideoFolder(VideoFolderConfig),
}

impl DatasetConfig {
    pub fn open<P>(path: P) -> Result<Self, DatasetError>
    where
        P: AsRef<Path>,
    {
        open_json(path.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageFolderConfig {
    pub root: PathBuf,
    #[serde(default = "default_split")]
    pub split: String,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl ImageFolderConfig {
    pub fn new<P>(root: P, split: &str) -> Self
    where
        P: Into<PathBuf>,
    {
        ImageFolderConfig {
            root: root.into(),
            split: split.to_owned(),
            failure_policy: FailurePolicy::default(),
        }
    }

    pub fn open<P>(path: P) -> Result<Self, DatasetError>
    where
        P: AsRef<Path>,
    {
        open_json(path.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoFolderConfig {
    pub root: PathBuf,
    #[serde(default)]
    pub mode: VideoMode,
    /// Pairs drawn from every frame group in train mode.
    #[serde(default = "default_pairs_per_group")]
    pub pairs_per_group: usize,
    /// Seeds pair sampling; entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl VideoFolderConfig {
    pub fn new<P>(root: P, mode: VideoMode) -> Self
    where
        P: Into<PathBuf>,
    {
        VideoFolderConfig {
            root: root.into(),
            mode,
            pairs_per_group: DEFAULT_PAIRS_PER_GROUP,
            seed: None,
            failure_policy: FailurePolicy::default(),
        }
    }

    pub fn open<P>(path: P) -> Result<Self, DatasetError>
    where
        P: AsRef<Path>,
    {
        open_json(path.as_ref())
    }
}

fn open_json<T>(path: &Path) -> Result<T, DatasetError>
where
    T: DeserializeOwned,
{
    let text = fs::read_to_string(path).map_err(|err| DatasetError::io(path, err))?;
    serde_json::from_str(&text).map_err(|source| DatasetError::Config {
        path: path.to_owned(),
        source,
    })
}

fn default_split() -> String {
    DEFAULT_SPLIT.to_owned()
}

fn default_pairs_per_group() -> usize {
    DEFAULT_PAIRS_PER_GROUP
}
