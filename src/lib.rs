//! Folder-backed datasets for learned image and video compression training.
//!
//! [`ImageFolder`](dataset::data_loaders::ImageFolder) serves the flat files of
//! `root/<split>` and [`VideoFolder`](dataset::data_loaders::VideoFolder) serves
//! either sampled frame pairs (training) or whole frame sequences (evaluation).

pub mod dataset;

pub use dataset::data_loaders::{ImageFolder, VideoFolder};
pub use dataset::error::DatasetError;
pub use dataset::fetch::{FailurePolicy, Fetched};
pub use dataset::Dataset;
