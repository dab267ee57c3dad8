use super::error::DatasetError;
use image::RgbImage;
use std::path::Path;

/// Opens an image file and normalizes it to 3-channel RGB.
pub trait ImageDecoder: Send + Sync {
    fn decode(&self, path: &Path) -> Result<RgbImage, DatasetError>;
}

/// Decodes with the `image` crate, whatever format the file is in.
#[derive(Debug, Clone, Copy, Default)]
pub struct RgbDecoder;

impl ImageDecoder for RgbDecoder {
    fn decode(&self, path: &Path) -> Result<RgbImage, DatasetError> {
        let img = image::open(path).map_err(|source| DatasetError::Decode {
            path: path.to_owned(),
            source,
        })?;
        Ok(img.to_rgb8())
    }
}
