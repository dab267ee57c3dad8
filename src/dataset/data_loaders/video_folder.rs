use super::load_image;
use crate::dataset::common_structs::{
    EvalSample, FramePair, VideoCatalog, VideoFrames, VideoMode, VideoSample,
};
use crate::dataset::config::{VideoFolderConfig, DEFAULT_PAIRS_PER_GROUP};
use crate::dataset::decoding::{ImageDecoder, RgbDecoder};
use crate::dataset::error::DatasetError;
use crate::dataset::fetch::{FailurePolicy, Fetched};
use crate::dataset::listing::{base_name, ensure_dir, list_files, list_subdirs};
use crate::dataset::transforms::{Identity, Transform};
use crate::dataset::{check_index, Dataset};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Video frame dataset.
///
/// Train mode expects `root/<video>/<frame group>/<frame>` and draws random
/// frame pairs from every frame group once, at construction. Eval mode expects
/// `root/<video>/<frame>` and serves one whole video per index.
#[derive(Clone)]
pub struct VideoFolder<T = Identity> {
    catalog: VideoCatalog,
    transform: T,
    decoder: Arc<dyn ImageDecoder>,
    failure_policy: FailurePolicy,
}

impl VideoFolder<Identity> {
    /// Train mode with the default number of pairs per frame group.
    pub fn train<P, R>(root: P, rng: &mut R) -> Result<Self, DatasetError>
    where
        P: AsRef<Path>,
        R: Rng + ?Sized,
    {
        Self::train_with(root, DEFAULT_PAIRS_PER_GROUP, rng)
    }

    pub fn train_with<P, R>(
        root: P,
        pairs_per_group: usize,
        rng: &mut R,
    ) -> Result<Self, DatasetError>
    where
        P: AsRef<Path>,
        R: Rng + ?Sized,
    {
        let root = root.as_ref();
        let pairs = sample_pairs(root, pairs_per_group, rng)?;
        Ok(Self::from_catalog(VideoCatalog::Train {
            root: root.to_owned(),
            pairs,
        }))
    }

    pub fn eval<P>(root: P) -> Result<Self, DatasetError>
    where
        P: AsRef<Path>,
    {
        let root = root.as_ref();
        let videos = scan_videos(root)?;
        Ok(Self::from_catalog(VideoCatalog::Eval {
            root: root.to_owned(),
            videos,
        }))
    }

    pub fn from_config(config: &VideoFolderConfig) -> Result<Self, DatasetError> {
        let dataset = match config.mode {
            VideoMode::Train => {
                let mut rng = match config.seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                Self::train_with(&config.root, config.pairs_per_group, &mut rng)?
            }
            VideoMode::Eval => Self::eval(&config.root)?,
        };
        Ok(dataset.with_failure_policy(config.failure_policy))
    }

    /// Serves an existing catalog as is, without touching the disk.
    pub fn from_catalog(catalog: VideoCatalog) -> Self {
        VideoFolder {
            catalog,
            transform: Identity,
            decoder: Arc::new(RgbDecoder),
            failure_policy: FailurePolicy::default(),
        }
    }

    /// Restores a catalog written by [`VideoFolder::save_catalog`], keeping its sampled pairs.
    pub fn from_catalog_file<P>(path: P) -> Result<Self, DatasetError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| DatasetError::io(path, err))?;
        let catalog: VideoCatalog = serde_json::from_reader(BufReader::new(file))?;
        info!(
            "loaded {:?} catalog of {} sample(s) from {}",
            catalog.mode(),
            catalog.len(),
            path.display()
        );
        Ok(Self::from_catalog(catalog))
    }
}

impl<T> VideoFolder<T> {
    pub fn with_transform<U>(self, transform: U) -> VideoFolder<U>
    where
        U: Transform,
    {
        VideoFolder {
            catalog: self.catalog,
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

    pub fn mode(&self) -> VideoMode {
        self.catalog.mode()
    }

    pub fn root(&self) -> &Path {
        self.catalog.root()
    }

    pub fn catalog(&self) -> &VideoCatalog {
        &self.catalog
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    /// Sampled pairs; empty in eval mode.
    pub fn pairs(&self) -> &[FramePair] {
        match &self.catalog {
            VideoCatalog::Train { pairs, .. } => pairs,
            VideoCatalog::Eval { .. } => &[],
        }
    }

    /// Videos in index order; empty in train mode.
    pub fn videos(&self) -> &[VideoFrames] {
        match &self.catalog {
            VideoCatalog::Eval { videos, .. } => videos,
            VideoCatalog::Train { .. } => &[],
        }
    }

    pub fn video_names(&self) -> Vec<&str> {
        self.videos().iter().map(|video| video.name.as_str()).collect()
    }

    pub fn frame_paths(&self, name: &str) -> Option<&[PathBuf]> {
        self.videos()
            .iter()
            .find(|video| video.name == name)
            .map(|video| video.frames.as_slice())
    }

    /// Frames across all eval videos, or both frames of every pair in train mode.
    pub fn num_frames(&self) -> usize {
        match &self.catalog {
            VideoCatalog::Train { pairs, .. } => pairs.len() * 2,
            VideoCatalog::Eval { videos, .. } => {
                videos.iter().map(|video| video.frames.len()).sum()
            }
        }
    }

    pub fn save_catalog<P>(&self, path: P) -> Result<(), DatasetError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = File::create(path).map_err(|err| DatasetError::io(path, err))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &self.catalog)?;
        Ok(())
    }
}

impl<T> VideoFolder<T>
where
    T: Transform,
{
    fn load_pair(&self, pair: &FramePair) -> Result<[T::Output; 2], DatasetError> {
        let [first, second] = &pair.frames;
        let first = load_image(&*self.decoder, &self.transform, first)?;
        let second = load_image(&*self.decoder, &self.transform, second)?;
        Ok([first, second])
    }

    fn load_video(&self, video: &VideoFrames) -> Result<EvalSample<T::Output>, DatasetError> {
        let frames = video
            .frames
            .iter()
            .map(|frame| load_image(&*self.decoder, &self.transform, frame))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(EvalSample {
            name: video.name.clone(),
            frames,
        })
    }
}

impl<T> Dataset for VideoFolder<T>
where
    T: Transform,
{
    type Item = VideoSample<T::Output>;

    /// Pairs in train mode, videos in eval mode.
    fn len(&self) -> usize {
        self.catalog.len()
    }

    fn get(&self, index: usize) -> Result<Fetched<Self::Item>, DatasetError> {
        check_index(index, self.len())?;
        let result = match &self.catalog {
            VideoCatalog::Train { pairs, .. } => self.load_pair(&pairs[index]).map(VideoSample::Pair),
            VideoCatalog::Eval { videos, .. } => {
                self.load_video(&videos[index]).map(VideoSample::Video)
            }
        };
        self.failure_policy.resolve(index, result)
    }
}

fn sample_pairs<R>(
    root: &Path,
    pairs_per_group: usize,
    rng: &mut R,
) -> Result<Vec<FramePair>, DatasetError>
where
    R: Rng + ?Sized,
{
    ensure_dir(root)?;
    let mut pairs = vec![];
    for video in list_subdirs(root)? {
        let groups = list_subdirs(&video)?;
        debug!("{}: {} frame group(s)", base_name(&video), groups.len());
        for group in groups {
            let frames = list_files(&group)?;
            if frames.len() < 2 {
                return Err(DatasetError::Sampling {
                    group,
                    found: frames.len(),
                });
            }
            for _ in 0..pairs_per_group {
                let picked = index::sample(rng, frames.len(), 2);
                pairs.push(FramePair {
                    group: group.clone(),
                    frames: [
                        frames[picked.index(0)].clone(),
                        frames[picked.index(1)].clone(),
                    ],
                });
            }
        }
    }
    info!("sampled {} frame pair(s) under {}", pairs.len(), root.display());
    Ok(pairs)
}

fn scan_videos(root: &Path) -> Result<Vec<VideoFrames>, DatasetError> {
    ensure_dir(root)?;
    let videos = list_subdirs(root)?
        .into_iter()
        .map(|video| {
            let frames = list_files(&video)?;
            let name = base_name(&video);
            debug!("{}: {} frame(s)", name, frames.len());
            Ok(VideoFrames { name, frames })
        })
        .collect::<Result<Vec<_>, DatasetError>>()?;
    info!("found {} video(s) under {}", videos.len(), root.display());
    Ok(videos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::test_fixtures::{write_garbage, write_png};
    use crate::dataset::transforms::ToTensor;
    use image::RgbImage;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::TempDir;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    /// `root/<video>/<group>/<frame>.png` with `frames` frames per group.
    fn train_root(videos: Vec<(&str, Vec<(&str, usize)>)>) -> TempDir {
        let tmp = TempDir::new().unwrap();
        for (video, groups) in videos {
            for (group, frames) in groups {
                for i in 0..frames {
                    let path = tmp
                        .path()
                        .join(video)
                        .join(group)
                        .join(format!("im{}.png", i + 1));
                    write_png(&path, 2, 2, [i as u8 * 10, 0, 0]);
                }
            }
        }
        tmp
    }

    fn eval_root() -> TempDir {
        let tmp = TempDir::new().unwrap();
        for (video, frames) in &[("v2", 2u8), ("v1", 3u8)] {
            for i in (0..*frames).rev() {
                let path = tmp.path().join(video).join(format!("{:03}.png", i));
                write_png(&path, 1, 1, [i, 0, 0]);
            }
        }
        tmp
    }

    fn pair_set(pair: &FramePair) -> HashSet<PathBuf> {
        pair.frames.iter().cloned().collect()
    }

    #[test]
    fn two_frame_group_yields_five_identical_pairs() {
        let tmp = train_root(vec![("00001", vec![("0001", 2)])]);
        let dataset = VideoFolder::train(tmp.path(), &mut rng()).unwrap();
        assert_eq!(dataset.len(), 5);
        assert_eq!(dataset.mode(), VideoMode::Train);

        let group = tmp.path().join("00001/0001");
        let expected: HashSet<PathBuf> =
            vec![group.join("im1.png"), group.join("im2.png")].into_iter().collect();
        for pair in dataset.pairs() {
            assert_eq!(pair_set(pair), expected);
            assert_eq!(pair.group, group);
        }
    }

    #[test]
    fn pairs_are_distinct_frames_of_one_group() {
        let tmp = train_root(vec![
            ("00001", vec![("0001", 7), ("0002", 3)]),
            ("00002", vec![("0001", 4)]),
        ]);
        let dataset = VideoFolder::train_with(tmp.path(), 10, &mut rng()).unwrap();
        assert_eq!(dataset.len(), 30);
        for pair in dataset.pairs() {
            let [a, b] = &pair.frames;
            assert_ne!(a, b);
            assert_eq!(a.parent().unwrap(), pair.group);
            assert_eq!(b.parent().unwrap(), pair.group);
        }
        // groups are visited in name order
        assert!(dataset.pairs()[0].group.ends_with("00001/0001"));
        assert!(dataset.pairs()[29].group.ends_with("00002/0001"));
    }

    #[test]
    fn same_seed_same_pairs() {
        let tmp = train_root(vec![("00001", vec![("0001", 7)])]);
        let a = VideoFolder::train(tmp.path(), &mut rng()).unwrap();
        let b = VideoFolder::train(tmp.path(), &mut rng()).unwrap();
        assert_eq!(a.pairs(), b.pairs());
    }

    #[test]
    fn single_frame_group_is_a_sampling_error() {
        let tmp = train_root(vec![("00001", vec![("0001", 3), ("0002", 1)])]);
        match VideoFolder::train(tmp.path(), &mut rng()).err().unwrap() {
            DatasetError::Sampling { group, found } => {
                assert!(group.ends_with("00001/0002"));
                assert_eq!(found, 1);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn missing_root_is_rejected_before_scanning() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        assert!(matches!(
            VideoFolder::train(&missing, &mut rng()).err().unwrap(),
            DatasetError::InvalidDirectory { .. }
        ));
        assert!(matches!(
            VideoFolder::eval(&missing).err().unwrap(),
            DatasetError::InvalidDirectory { .. }
        ));
    }

    #[test]
    fn stray_files_beside_groups_are_ignored() {
        let tmp = train_root(vec![("00001", vec![("0001", 2)])]);
        fs::write(tmp.path().join("00001/readme.txt"), b"").unwrap();
        fs::write(tmp.path().join("index.txt"), b"").unwrap();
        let dataset = VideoFolder::train(tmp.path(), &mut rng()).unwrap();
        assert_eq!(dataset.len(), 5);
    }

    #[test]
    fn train_fetch_transforms_both_frames() {
        let tmp = train_root(vec![("00001", vec![("0001", 3)])]);
        let dataset = VideoFolder::train(tmp.path(), &mut rng())
            .unwrap()
            .with_transform(ToTensor);
        let [a, b] = dataset
            .get(4)
            .unwrap()
            .sample()
            .unwrap()
            .into_pair()
            .unwrap();
        assert_eq!(a.shape, [3, 2, 2]);
        assert_eq!(b.shape, [3, 2, 2]);
        assert!(matches!(
            dataset.get(5),
            Err(DatasetError::IndexOutOfRange { index: 5, len: 5 })
        ));
    }

    #[test]
    fn train_decode_failure_follows_policy() {
        let tmp = train_root(vec![]);
        write_garbage(&tmp.path().join("00001/0001/im1.png"));
        write_garbage(&tmp.path().join("00001/0001/im2.png"));

        let dataset = VideoFolder::train(tmp.path(), &mut rng()).unwrap();
        assert!(matches!(dataset.get(0), Err(DatasetError::Decode { .. })));

        let dataset = dataset.with_failure_policy(FailurePolicy::Skip);
        assert!(dataset.get(0).unwrap().is_skipped());
    }

    #[test]
    fn eval_serves_videos_in_name_order() {
        let tmp = eval_root();
        let dataset = VideoFolder::eval(tmp.path()).unwrap();
        assert_eq!(dataset.mode(), VideoMode::Eval);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.video_names(), vec!["v1", "v2"]);
        assert_eq!(dataset.num_frames(), 5);

        let video = dataset
            .get(0)
            .unwrap()
            .sample()
            .unwrap()
            .into_video()
            .unwrap();
        assert_eq!(video.name, "v1");
        let reds: Vec<u8> = video
            .frames
            .iter()
            .map(|frame| frame.get_pixel(0, 0).0[0])
            .collect();
        assert_eq!(reds, vec![0, 1, 2]);
    }

    #[test]
    fn eval_frame_paths_follow_file_order() {
        let tmp = eval_root();
        let dataset = VideoFolder::eval(tmp.path()).unwrap();
        let names: Vec<String> = dataset
            .frame_paths("v2")
            .unwrap()
            .iter()
            .map(|path| base_name(path))
            .collect();
        assert_eq!(names, vec!["000.png", "001.png"]);
        assert!(dataset.frame_paths("v3").is_none());
    }

    #[test]
    fn eval_transform_applies_to_every_frame() {
        let tmp = eval_root();
        let dataset = VideoFolder::eval(tmp.path())
            .unwrap()
            .with_transform(|img: RgbImage| -> anyhow::Result<u32> { Ok(img.width()) });
        let video = dataset.get(1).unwrap().sample().unwrap().into_video().unwrap();
        assert_eq!(video, EvalSample { name: "v2".to_owned(), frames: vec![1, 1] });
    }

    #[test]
    fn catalog_round_trips_through_a_file() {
        let tmp = train_root(vec![("00001", vec![("0001", 6)])]);
        let dataset = VideoFolder::train(tmp.path(), &mut StdRng::from_entropy()).unwrap();
        let catalog_path = tmp.path().join("catalog.json");
        dataset.save_catalog(&catalog_path).unwrap();

        let restored = VideoFolder::from_catalog_file(&catalog_path).unwrap();
        assert_eq!(restored.catalog(), dataset.catalog());
        assert_eq!(restored.root(), tmp.path());
        assert!(!restored.get(3).unwrap().is_skipped());
    }

    #[test]
    fn from_config_honors_seed_and_mode() {
        let tmp = train_root(vec![("00001", vec![("0001", 9)])]);
        let mut config = VideoFolderConfig::new(tmp.path(), VideoMode::Train);
        config.seed = Some(3);
        config.pairs_per_group = 2;
        let a = VideoFolder::from_config(&config).unwrap();
        let b = VideoFolder::from_config(&config).unwrap();
        assert_eq!(a.len(), 2);
        assert_eq!(a.pairs(), b.pairs());

        config.mode = VideoMode::Eval;
        config.failure_policy = FailurePolicy::Skip;
        let eval = VideoFolder::from_config(&config).unwrap();
        assert_eq!(eval.video_names(), vec!["00001"]);
        assert_eq!(eval.failure_policy(), FailurePolicy::Skip);
    }
}
