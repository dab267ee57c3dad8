pub mod common_structs;
pub mod config;
pub mod data_augmenters;
pub mod data_loaders;
pub mod decoding;
pub mod error;
pub mod fetch;
pub mod listing;
pub mod transforms;

#[cfg(test)]
pub(crate) mod test_fixtures;

use self::error::DatasetError;
use self::fetch::Fetched;

/// Indexed access to a catalog that was fixed at construction.
///
/// `get` takes `&self` and never mutates the dataset, so a single instance can
/// serve many loader threads at once.
pub trait Dataset {
    type Item;

    /// Number of indices `get` accepts.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Loads sample `index`, failing with [`DatasetError::IndexOutOfRange`] past the end.
    fn get(&self, index: usize) -> Result<Fetched<Self::Item>, DatasetError>;

    /// Every sample in index order.
    fn iter(&self) -> DatasetIter<'_, Self>
    where
        Self: Sized,
    {
        DatasetIter {
            dataset: self,
            next_element_index: 0,
        }
    }
}

/// Extends the iterator trait to make sure the Dataset has methods display progress
pub trait DataLoader: Iterator {
    /// Returns the next element index, starting from 0
    fn next_element_index(&self) -> usize;
    /// Returns the index of the last element to be loaded
    fn max_elem_index(&self) -> usize;
}

pub struct DatasetIter<'a, D> {
    dataset: &'a D,
    next_element_index: usize,
}

impl<'a, D> Iterator for DatasetIter<'a, D>
where
    D: Dataset,
{
    type Item = Result<Fetched<D::Item>, DatasetError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_element_index >= self.dataset.len() {
            return None;
        }
        let item = self.dataset.get(self.next_element_index);
        self.next_element_index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.dataset.len().saturating_sub(self.next_element_index);
        (remaining, Some(remaining))
    }
}

impl<'a, D> DataLoader for DatasetIter<'a, D>
where
    D: Dataset,
{
    fn next_element_index(&self) -> usize {
        self.next_element_index
    }

    fn max_elem_index(&self) -> usize {
        self.dataset.len()
    }
}

pub(crate) fn check_index(index: usize, len: usize) -> Result<(), DatasetError> {
    if index < len {
        Ok(())
    } else {
        Err(DatasetError::IndexOutOfRange { index, len })
    }
}
