// gainmap-data/src/datasets/traits.rs

use gainmap_core::GainmapError;

/// Represents a dataset that can be iterated over and accessed by index.
///
/// This is the protocol exposed to the iteration driver: it asks for the
/// length, then requests items by index. Shuffling, batching and worker
/// parallelism are the driver's job.
pub trait Dataset {
    /// The type of a single item returned by the dataset.
    ///
    /// `Send + 'static` so items can be handed to another thread once
    /// loaded.
    type Item: Send + 'static;

    /// Returns the item at the given index.
    ///
    /// # Errors
    ///
    /// Returns `GainmapError` if the item cannot be resolved or loaded. A bad
    /// file aborts the request; nothing is skipped silently.
    fn get(&self, index: usize) -> Result<Self::Item, GainmapError>;

    /// Returns the number of items reported to the driver.
    fn len(&self) -> usize;

    /// Checks if the dataset is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
