// dataloader.rs
//! # DataLoader
//!
//! Drives a [`Dataset`]: asks a [`Sampler`] for the index order, fetches the
//! items and groups them into batches.
//!
//! ```no_run
//! use gainmap_data::{DataLoader, SequentialSampler, StyleTransferDataset, StyleTransferMode};
//!
//! let dataset = StyleTransferDataset::new("data", "testing", StyleTransferMode::Paired)?;
//! let loader = DataLoader::new(dataset, 1, SequentialSampler::new(), false, None);
//! for batch in loader {
//!     let batch = batch?;
//!     println!("style {:?}, input {:?}", batch[0].style.shape(), batch[0].input.shape());
//! }
//! # Ok::<(), gainmap_core::GainmapError>(())
//! ```

use crate::datasets::Dataset;
use crate::samplers::Sampler;
use gainmap_core::GainmapError;

/// Collate function applied to every batch before it is yielded.
pub type CollateFn<D> = Box<
    dyn Fn(Vec<<D as Dataset>::Item>) -> Result<Vec<<D as Dataset>::Item>, GainmapError>
        + Send
        + Sync,
>;

/// Batching iterator over a dataset.
///
/// # Type parameters
/// - `D`: the dataset, implementing [`Dataset`].
/// - `S`: the sampler producing the index order, implementing [`Sampler`].
pub struct DataLoader<D: Dataset, S: Sampler> {
    /// The source dataset.
    pub dataset: D,
    pub batch_size: usize,
    pub sampler: S,
    /// If true, a trailing incomplete batch is dropped.
    pub drop_last: bool,
    pub collate_fn: Option<CollateFn<D>>,
    indices_iter: Box<dyn Iterator<Item = usize> + Send + Sync>,
}

impl<D: Dataset, S: Sampler> DataLoader<D, S> {
    pub fn new(
        dataset: D,
        batch_size: usize,
        sampler: S,
        drop_last: bool,
        collate_fn: Option<CollateFn<D>>,
    ) -> Self {
        let indices_iter = sampler.iter(dataset.len());
        Self {
            dataset,
            batch_size,
            sampler,
            drop_last,
            collate_fn,
            indices_iter,
        }
    }

    /// Creates a DataLoader whose collate step returns the batch unchanged.
    pub fn with_default_collate(dataset: D, batch_size: usize, sampler: S, drop_last: bool) -> Self {
        let collate_fn: CollateFn<D> = Box::new(|batch: Vec<<D as Dataset>::Item>| Ok::<_, GainmapError>(batch));
        Self::new(dataset, batch_size, sampler, drop_last, Some(collate_fn))
    }

    /// Number of batches one epoch yields.
    pub fn num_batches(&self) -> usize {
        if self.batch_size == 0 {
            return 0;
        }
        let samples = self.sampler.len(self.dataset.len());
        if self.drop_last {
            samples / self.batch_size
        } else {
            samples.div_ceil(self.batch_size)
        }
    }

    /// Starts a new epoch with a fresh index order from the sampler.
    pub fn reset(&mut self) {
        self.indices_iter = self.sampler.iter(self.dataset.len());
        log::debug!("DataLoader: new epoch of {} batches", self.num_batches());
    }
}

impl<D: Dataset, S: Sampler> Iterator for DataLoader<D, S> {
    type Item = Result<Vec<<D as Dataset>::Item>, GainmapError>;

    /// Returns the next batch.
    ///
    /// - `Some(Ok(batch))`: a batch of items.
    /// - `Some(Err(e))`: fetching one of the items failed.
    /// - `None`: the epoch is over.
    fn next(&mut self) -> Option<Self::Item> {
        let mut batch = Vec::with_capacity(self.batch_size);
        for _ in 0..self.batch_size {
            let Some(idx) = self.indices_iter.next() else {
                break;
            };
            match self.dataset.get(idx) {
                Ok(item) => batch.push(item),
                Err(e) => return Some(Err(e)),
            }
        }
        if batch.is_empty() || (self.drop_last && batch.len() < self.batch_size) {
            return None;
        }
        match self.collate_fn {
            Some(ref collate_fn) => Some(collate_fn(batch)),
            None => Some(Ok(batch)),
        }
    }
}

#[cfg(test)]
#[path = "dataloader_test.rs"]
mod tests;
