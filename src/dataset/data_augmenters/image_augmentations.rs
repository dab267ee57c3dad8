use crate::dataset::transforms::Transform;
use anyhow::ensure;
use image::imageops;
use image::RgbImage;
use rand::{thread_rng, Rng};

/// Crops a `width` x `height` window at a uniformly random position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomCrop {
    pub width: u32,
    pub height: u32,
}

impl RandomCrop {
    pub fn new(width: u32, height: u32) -> Self {
        RandomCrop { width, height }
    }
}

impl Transform for RandomCrop {
    type Output = RgbImage;

    fn apply(&self, img: RgbImage) -> anyhow::Result<RgbImage> {
        check_fits(&img, self.width, self.height)?;
        let mut rng = thread_rng();
        let left = rng.gen_range(0..=img.width() - self.width);
        let top = rng.gen_range(0..=img.height() - self.height);
        Ok(imageops::crop_imm(&img, left, top, self.width, self.height).to_image())
    }
}

/// Crops a `width` x `height` window from the middle of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CenterCrop {
    pub width: u32,
    pub height: u32,
}

impl CenterCrop {
    pub fn new(width: u32, height: u32) -> Self {
        CenterCrop { width, height }
    }
}

impl Transform for CenterCrop {
    type Output = RgbImage;

    fn apply(&self, img: RgbImage) -> anyhow::Result<RgbImage> {
        check_fits(&img, self.width, self.height)?;
        let left = (img.width() - self.width) / 2;
        let top = (img.height() - self.height) / 2;
        Ok(imageops::crop_imm(&img, left, top, self.width, self.height).to_image())
    }
}

/// Mirrors the image left to right with the given probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomHorizontalFlip {
    pub probability: f64,
}

impl RandomHorizontalFlip {
    pub fn new(probability: f64) -> Self {
        RandomHorizontalFlip { probability }
    }
}

impl Default for RandomHorizontalFlip {
    fn default() -> Self {
        RandomHorizontalFlip { probability: 0.5 }
    }
}

impl Transform for RandomHorizontalFlip {
    type Output = RgbImage;

    fn apply(&self, img: RgbImage) -> anyhow::Result<RgbImage> {
        // gen::<f64>() is in [0, 1), so 0 never flips and 1 always does
        if thread_rng().gen::<f64>() < self.probability {
            Ok(imageops::flip_horizontal(&img))
        } else {
            Ok(img)
        }
    }
}

fn check_fits(img: &RgbImage, width: u32, height: u32) -> anyhow::Result<()> {
    ensure!(
        img.width() >= width && img.height() >= height,
        "image of size {}x{} is smaller than the {}x{} crop",
        img.width(),
        img.height(),
        width,
        height
    );
    Ok(())
}
