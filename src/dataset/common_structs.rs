//! Sample references shared by the folder datasets. They are built once while
//! scanning the disk and never change afterwards.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Whether a [`VideoFolder`](super::data_loaders::VideoFolder) serves frame pairs or whole videos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoMode {
    Train,
    Eval,
}

impl Default for VideoMode {
    fn default() -> Self {
        VideoMode::Train
    }
}

/// Two distinct frames drawn from the same frame group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FramePair {
    pub group: PathBuf,
    pub frames: [PathBuf; 2],
}

/// A video directory and its frames in file name order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoFrames {
    pub name: String,
    pub frames: Vec<PathBuf>,
}

/// Everything a video dataset serves, detached from decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum VideoCatalog {
    Train { root: PathBuf, pairs: Vec<FramePair> },
    Eval { root: PathBuf, videos: Vec<VideoFrames> },
}

impl VideoCatalog {
    pub fn mode(&self) -> VideoMode {
        match self {
            VideoCatalog::Train { .. } => VideoMode::Train,
            VideoCatalog::Eval { .. } => VideoMode::Eval,
        }
    }

    pub fn root(&self) -> &Path {
        match self {
            VideoCatalog::Train { root, .. } | VideoCatalog::Eval { root, .. } => root,
        }
    }

    /// Pairs in train mode, videos in eval mode.
    pub fn len(&self) -> usize {
        match self {
            VideoCatalog::Train { pairs, .. } => pairs.len(),
            VideoCatalog::Eval { videos, .. } => videos.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One decoded video in eval mode.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalSample<T> {
    pub name: String,
    pub frames: Vec<T>,
}

/// What a video dataset yields for one index.
#[derive(Debug, Clone, PartialEq)]
pub enum VideoSample<T> {
    Pair([T; 2]),
    Video(EvalSample<T>),
}

impl<T> VideoSample<T> {
    pub fn into_pair(self) -> Option<[T; 2]> {
        match self {
            VideoSample::Pair(pair) => Some(pair),
            VideoSample::Video(_) => None,
        }
    }

    pub fn into_video(self) -> Option<EvalSample<T>> {
        match self {
            VideoSample::Video(video) => Some(video),
            VideoSample::Pair(_) => None,
        }
    }
}
