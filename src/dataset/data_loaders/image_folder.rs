use super::load_image;
use crate::dataset::config::ImageFolderConfig;
use crate::dataset::decoding::{ImageDecoder, RgbDecoder};
use crate::dataset::error::DatasetError;
use crate::dataset::fetch::{FailurePolicy, Fetched};
use crate::dataset::listing::{ensure_dir, list_files};
use crate::dataset::transforms::{Identity, Transform};
use crate::dataset::{check_index, Dataset};
use log::info;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Image folder dataset. Training and testing images are stored in separate
/// flat directories:
///
/// ```text
/// root/
///     train/
///         img000.png
///         img001.png
///     test/
///         img000.png
///         img001.png
/// ```
///
/// Files are served in file name order; nested directories are ignored.
#[derive(Clone)]
pub struct ImageFolder<T = Identity> {
    root: PathBuf,
    split: String,
    samples: Vec<PathBuf>,
    transform: T,
    decoder: Arc<dyn ImageDecoder>,
    failure_policy: FailurePolicy,
}

impl ImageFolder<Identity> {
    /// Scans `root/split`, which must be a directory.
    pub fn new<P>(root: P, split: &str) -> Result<Self, DatasetError>
    where
        P: AsRef<Path>,
    {
        let root = root.as_ref();
        let split_dir = root.join(split);
        ensure_dir(&split_dir)?;
        let samples = list_files(&split_dir)?;
        info!("found {} image(s) in {}", samples.len(), split_dir.display());

        Ok(ImageFolder {
            root: root.to_owned(),
            split: split.to_owned(),
            samples,
            transform: Identity,
            decoder: Arc::new(RgbDecoder),
            failure_policy: FailurePolicy::default(),
        })
    }

    pub fn from_config(config: &ImageFolderConfig) -> Result<Self, DatasetError> {
        Ok(Self::new(&config.root, &config.split)?.with_failure_policy(config.failure_policy))
    }
}

impl<T> ImageFolder<T> {
    pub fn with_transform<U>(self, transform: U) -> ImageFolder<U>
    where
        U: Transform,
    {
        ImageFolder {
            root: self.root,
            split: self.split,
            samples: self.samples,
            transform,
            decoder: self.decoder,
            failure_policy: self.failure_policy,
        }
    }

    pub fn with_decoder<D>(mut self, decoder: D) -> Self
    where
        D: ImageDecoder + 'static,
    {
        self.decoder = Arc::new(decoder);
        self
    }

    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn split(&self) -> &str {
        &self.split
    }

    pub fn samples(&self) -> &[PathBuf] {
        &self.samples
    }

    pub fn path(&self, index: usize) -> Option<&Path> {
        self.samples.get(index).map(PathBuf::as_path)
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }
}

impl<T> Dataset for ImageFolder<T>
where
    T: Transform,
{
    type Item = T::Output;

    fn len(&self) -> usize {
        self.samples.len()
    }

    fn get(&self, index: usize) -> Result<Fetched<T::Output>, DatasetError> {
        check_index(index, self.samples.len())?;
        let result = load_image(&*self.decoder, &self.transform, &self.samples[index]);
        self.failure_policy.resolve(index, result)
    }
}
