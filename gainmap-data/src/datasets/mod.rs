pub mod folder;
pub mod reconstruction;
pub mod style_transfer;
pub mod traits;

use std::path::PathBuf;

pub use folder::{is_image_file, make_dataset, ImageCollection, IMG_EXTENSIONS};
pub use reconstruction::{ReconstructionDataset, ReconstructionItem, ReconstructionSampler, Split};
pub use style_transfer::{
    PairedStyleSampler, StyleTransferDataset, StyleTransferItem, StyleTransferMode,
};
pub use traits::Dataset;

/// The two files resolved for one request index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplePair {
    pub style: PathBuf,
    /// Content image: the input for style transfer, the face for
    /// reconstruction.
    pub input: PathBuf,
}
