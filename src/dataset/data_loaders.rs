pub mod image_folder;
pub mod video_folder;

pub use image_folder::ImageFolder;
pub use video_folder::VideoFolder;

use super::decoding::ImageDecoder;
use super::error::DatasetError;
use super::transforms::Transform;
use std::path::Path;

/// Decodes one file and runs the transform on it.
pub(crate) fn load_image<T>(
    decoder: &dyn ImageDecoder,
    transform: &T,
    path: &Path,
) -> Result<T::Output, DatasetError>
where
    T: Transform,
{
    let img = decoder.decode(path)?;
    transform
        .apply(img)
        .map_err(|source| DatasetError::Transform {
            path: path.to_owned(),
            source,
        })
}
