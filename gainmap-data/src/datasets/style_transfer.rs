// gainmap-data/src/datasets/style_transfer.rs
//! Style-transfer dataset: one style collection, one input collection.
//!
//! Layout on disk: `root/{name}/style` and `root/{name}/input`.

use super::folder::{make_dataset, ImageCollection};
use super::traits::Dataset;
use super::SamplePair;
use crate::config::ImageConfig;
use crate::image_io::ImageLoader;
use gainmap_core::{GainmapError, Tensor};
use std::convert::Infallible;
use std::path::Path;
use std::str::FromStr;

/// Sub-directory name used when none is given.
pub const DEFAULT_NAME: &str = "testing";

/// How request indices map onto the two collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StyleTransferMode {
    /// Styles cycle with the index; the input is always the first one.
    #[default]
    Paired,
    /// The style is always the first one; inputs cycle with the index.
    Unpaired,
}

impl StyleTransferMode {
    /// `"paired"` selects [`StyleTransferMode::Paired`]; every other name is
    /// treated as unpaired.
    pub fn from_name(name: &str) -> Self {
        if name == "paired" {
            StyleTransferMode::Paired
        } else {
            StyleTransferMode::Unpaired
        }
    }
}

impl FromStr for StyleTransferMode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

/// Resolves request indices to (style, input) paths.
///
/// The reported length is the number of styles, whatever the number of
/// inputs.
#[derive(Debug, Clone)]
pub struct PairedStyleSampler {
    feat: ImageCollection,
    input: ImageCollection,
    mode: StyleTransferMode,
}

impl PairedStyleSampler {
    pub fn new(feat: ImageCollection, input: ImageCollection, mode: StyleTransferMode) -> Self {
        PairedStyleSampler { feat, input, mode }
    }

    pub fn len(&self) -> usize {
        self.feat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feat.is_empty()
    }

    pub fn mode(&self) -> StyleTransferMode {
        self.mode
    }

    pub fn styles(&self) -> &ImageCollection {
        &self.feat
    }

    pub fn inputs(&self) -> &ImageCollection {
        &self.input
    }

    /// Returns the pair of paths for request `index`.
    ///
    /// * `Paired`: style `feat[index % len(feat)]`, input `input[index % 1]`.
    ///   The input modulus is 1, so every request gets `input[0]`. Training
    ///   runs were made with this mapping and it is kept as is.
    /// * `Unpaired`: style `feat[0]`, input `input[index % len(feat)]`. The
    ///   modulus is the style count, so with fewer inputs than styles some
    ///   indices fall outside the input collection and fail.
    ///
    /// # Errors
    ///
    /// * `GainmapError::EmptyCollection` if either collection is empty.
    /// * `GainmapError::IndexOutOfBounds` if the computed input index is past
    ///   the end of the input collection.
    pub fn resolve(&self, index: usize) -> Result<SamplePair, GainmapError> {
        if self.feat.is_empty() {
            return Err(GainmapError::EmptyCollection {
                name: "style".to_string(),
            });
        }
        if self.input.is_empty() {
            return Err(GainmapError::EmptyCollection {
                name: "input".to_string(),
            });
        }

        let (style_idx, input_idx) = match self.mode {
            // The input index is `index % 1`.
            StyleTransferMode::Paired => (index % self.feat.len(), 0),
            StyleTransferMode::Unpaired => (0, index % self.feat.len()),
        };
        log::debug!(
            "PairedStyleSampler({:?}): index {} -> style {}, input {}",
            self.mode,
            index,
            style_idx,
            input_idx
        );

        Ok(SamplePair {
            style: self.feat.get(style_idx)?.to_path_buf(),
            input: self.input.get(input_idx)?.to_path_buf(),
        })
    }
}

/// A loaded style-transfer sample.
#[derive(Debug, Clone)]
pub struct StyleTransferItem {
    /// Style image, `requires_grad = false`.
    pub style: Tensor,
    /// Input image, `requires_grad = true`; it is optimized directly.
    pub input: Tensor,
}

/// Dataset yielding normalized (style, input) tensors.
#[derive(Debug, Clone)]
pub struct StyleTransferDataset {
    sampler: PairedStyleSampler,
    loader: ImageLoader,
}

impl StyleTransferDataset {
    /// Scans `root/{name}/style` and `root/{name}/input` and loads images at
    /// 500x660.
    pub fn new<P: AsRef<Path>>(
        root: P,
        name: &str,
        mode: StyleTransferMode,
    ) -> Result<Self, GainmapError> {
        Self::with_image_config(root, name, mode, ImageConfig::style_transfer())
    }

    /// Paired dataset over `root/testing`.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, GainmapError> {
        Self::new(root, DEFAULT_NAME, StyleTransferMode::default())
    }

    pub fn with_image_config<P: AsRef<Path>>(
        root: P,
        name: &str,
        mode: StyleTransferMode,
        image_config: ImageConfig,
    ) -> Result<Self, GainmapError> {
        image_config.validate()?;
        let base = root.as_ref().join(name);
        let feat = make_dataset(base.join("style"))?;
        let input = make_dataset(base.join("input"))?;
        log::info!(
            "StyleTransferDataset '{}': {} styles, {} inputs, mode {:?}",
            name,
            feat.len(),
            input.len(),
            mode
        );
        Ok(Self::from_parts(
            PairedStyleSampler::new(feat, input, mode),
            ImageLoader::new(image_config),
        ))
    }

    pub fn from_parts(sampler: PairedStyleSampler, loader: ImageLoader) -> Self {
        StyleTransferDataset { sampler, loader }
    }

    pub fn sampler(&self) -> &PairedStyleSampler {
        &self.sampler
    }

    pub fn loader(&self) -> &ImageLoader {
        &self.loader
    }
}

impl Dataset for StyleTransferDataset {
    type Item = StyleTransferItem;

    fn get(&self, index: usize) -> Result<Self::Item, GainmapError> {
        let pair = self.sampler.resolve(index)?;
        Ok(StyleTransferItem {
            style: self.loader.load(&pair.style, false)?,
            input: self.loader.load(&pair.input, true)?,
        })
    }

    fn len(&self) -> usize {
        self.sampler.len()
    }
}

#[cfg(test)]
#[path = "style_transfer_test.rs"]
mod tests;
