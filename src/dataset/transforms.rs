use image::RgbImage;
use serde::{Deserialize, Serialize};

/// Maps a decoded RGB image to whatever the model consumes.
///
/// Closures taking an `RgbImage` and returning `anyhow::Result<_>` are transforms,
/// so a one-off preprocessing step needs no dedicated type.
pub trait Transform: Send + Sync {
    type Output;

    fn apply(&self, img: RgbImage) -> anyhow::Result<Self::Output>;

    /// Runs `next` on the output of `self`.
    fn then<B>(self, next: B) -> Compose<Self, B>
    where
        Self: Sized,
    {
        Compose {
            first: self,
            second: next,
        }
    }
}

impl<F, O> Transform for F
where
    F: Fn(RgbImage) -> anyhow::Result<O> + Send + Sync,
{
    type Output = O;

    fn apply(&self, img: RgbImage) -> anyhow::Result<O> {
        self(img)
    }
}

/// Hands the decoded image back untouched; the default transform of every dataset.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Transform for Identity {
    type Output = RgbImage;

    fn apply(&self, img: RgbImage) -> anyhow::Result<RgbImage> {
        Ok(img)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Compose<A, B> {
    first: A,
    second: B,
}

impl<A, B> Transform for Compose<A, B>
where
    A: Transform<Output = RgbImage>,
    B: Transform,
{
    type Output = B::Output;

    fn apply(&self, img: RgbImage) -> anyhow::Result<B::Output> {
        let img = self.first.apply(img)?;
        self.second.apply(img)
    }
}

/// A float image in channel-major (CHW) layout with values in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageTensor {
    /// `[channels, height, width]`
    pub shape: [usize; 3],
    pub data: Vec<f32>,
}

impl ImageTensor {
    pub fn from_rgb(img: &RgbImage) -> ImageTensor {
        let (width, height) = (img.width() as usize, img.height() as usize);
        let plane = width * height;
        let mut data = vec![0f32; 3 * plane];
        for (x, y, pixel) in img.enumerate_pixels() {
            let offset = y as usize * width + x as usize;
            for (channel, value) in pixel.0.iter().enumerate() {
                data[channel * plane + offset] = *value as f32 / 255.;
            }
        }
        ImageTensor {
            shape: [3, height, width],
            data,
        }
    }

    pub fn at(&self, channel: usize, y: usize, x: usize) -> f32 {
        let [_, height, width] = self.shape;
        self.data[(channel * height + y) * width + x]
    }
}

/// Converts to an [`ImageTensor`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ToTensor;

impl Transform for ToTensor {
    type Output = ImageTensor;

    fn apply(&self, img: RgbImage) -> anyhow::Result<ImageTensor> {
        Ok(ImageTensor::from_rgb(&img))
    }
}
