pub mod image_augmentations;

pub use image_augmentations::{CenterCrop, RandomCrop, RandomHorizontalFlip};
