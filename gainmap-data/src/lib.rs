//! Image datasets for style-transfer training.
//!
//! Directory scanning, the index-to-sample policies of the style-transfer and
//! reconstruction datasets, image loading, and a small batching `DataLoader`
//! to drive them.

pub mod config;
pub mod dataloader;
pub mod datasets;
pub mod image_io;
pub mod samplers;

pub use config::{ImageConfig, IndexRange, PixelRange, ReconstructionConfig};
pub use dataloader::DataLoader;
pub use datasets::{
    make_dataset, Dataset, ImageCollection, PairedStyleSampler, ReconstructionDataset,
    ReconstructionSampler, SamplePair, Split, StyleTransferDataset, StyleTransferMode,
};
pub use image_io::ImageLoader;
pub use samplers::{RandomSampler, Sampler, SequentialSampler};
