// gainmap-data/src/datasets/reconstruction.rs
//! Dataset for the reconstruction network.
//!
//! Styles come from `root/styles`, faces from `root/ffhq`. The training
//! split cycles through all but the held-out tail of the styles and draws a
//! random face from the training face range; the test split draws both the
//! style (from the held-out tail) and the face (from the test face range) at
//! random.

use super::folder::{make_dataset, ImageCollection};
use super::traits::Dataset;
use super::SamplePair;
use crate::config::{ImageConfig, IndexRange, ReconstructionConfig};
use crate::image_io::ImageLoader;
use gainmap_core::{GainmapError, Tensor};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Train,
    Test,
}

impl Split {
    /// Derives the split from a dataset name such as `"train"` or
    /// `"ffhq_test"`. `"train"` is checked first.
    pub fn from_name(name: &str) -> Result<Self, GainmapError> {
        if name.contains("train") {
            Ok(Split::Train)
        } else if name.contains("test") {
            Ok(Split::Test)
        } else {
            Err(GainmapError::InvalidConfiguration(format!(
                "dataset name '{name}' contains neither 'train' nor 'test'"
            )))
        }
    }
}

impl FromStr for Split {
    type Err = GainmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Split::from_name(s)
    }
}

/// Resolves request indices to (style, face) paths.
///
/// Draws come from a generator owned by the sampler, so two calls with the
/// same index may return different faces (and, for the test split,
/// different styles). Seed it through [`ReconstructionConfig::seed`] to get a
/// reproducible sequence. The generator sits behind a mutex; `resolve` can be
/// called from several loader threads at once.
#[derive(Debug)]
pub struct ReconstructionSampler {
    feat: ImageCollection,
    input: ImageCollection,
    split: Split,
    config: ReconstructionConfig,
    rng: Mutex<StdRng>,
}

impl ReconstructionSampler {
    /// Creates a sampler, seeding the generator from `config.seed` (or from
    /// OS entropy when unset).
    ///
    /// # Errors
    ///
    /// Returns `GainmapError::InvalidConfiguration` if the collections are too
    /// small for the configured ranges.
    pub fn new(
        feat: ImageCollection,
        input: ImageCollection,
        split: Split,
        config: ReconstructionConfig,
    ) -> Result<Self, GainmapError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(feat, input, split, config, rng)
    }

    /// Creates a sampler around an existing generator. `config.seed` is
    /// ignored.
    pub fn with_rng(
        feat: ImageCollection,
        input: ImageCollection,
        split: Split,
        config: ReconstructionConfig,
        rng: StdRng,
    ) -> Result<Self, GainmapError> {
        validate_sizes(&feat, &input, split, &config)?;
        Ok(ReconstructionSampler {
            feat,
            input,
            split,
            config,
            rng: Mutex::new(rng),
        })
    }

    /// `len(feat) - held_out_style_count` for training, the fixed
    /// `test_set_size` for testing.
    pub fn len(&self) -> usize {
        match self.split {
            Split::Train => self.feat.len() - self.config.held_out_style_count,
            Split::Test => self.config.test_set_size,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn split(&self) -> Split {
        self.split
    }

    pub fn config(&self) -> &ReconstructionConfig {
        &self.config
    }

    pub fn styles(&self) -> &ImageCollection {
        &self.feat
    }

    pub fn faces(&self) -> &ImageCollection {
        &self.input
    }

    /// Range the test split draws style indices from: the held-out tail
    /// minus its first entry.
    pub fn test_style_range(&self) -> IndexRange {
        let n = self.feat.len();
        IndexRange::new(n + 1 - self.config.held_out_style_count, n - 1)
    }

    /// Returns the (style, face) paths for request `index`. The face is in
    /// `SamplePair::input`.
    pub fn resolve(&self, index: usize) -> Result<SamplePair, GainmapError> {
        let (style_idx, face_idx) = match self.split {
            Split::Train => {
                let cycle = self.feat.len() - self.config.held_out_style_count;
                let face_idx = self.draw(self.config.train_face_range);
                (index % cycle, face_idx)
            }
            Split::Test => {
                let style_idx = self.draw(self.test_style_range());
                let face_idx = self.draw(self.config.test_face_range);
                (style_idx, face_idx)
            }
        };
        log::debug!(
            "ReconstructionSampler({:?}): index {} -> style {}, face {}",
            self.split,
            index,
            style_idx,
            face_idx
        );

        Ok(SamplePair {
            style: self.feat.get(style_idx)?.to_path_buf(),
            input: self.input.get(face_idx)?.to_path_buf(),
        })
    }

    /// Uniform draw from the inclusive range.
    fn draw(&self, range: IndexRange) -> usize {
        self.lock_rng().gen_range(range.min..=range.max)
    }

    fn lock_rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(|poisoned| {
            log::warn!("ReconstructionSampler generator lock was poisoned. Recovering.");
            poisoned.into_inner()
        })
    }
}

fn validate_sizes(
    feat: &ImageCollection,
    input: &ImageCollection,
    split: Split,
    config: &ReconstructionConfig,
) -> Result<(), GainmapError> {
    config.validate()?;

    let held_out = config.held_out_style_count;
    let face_range = match split {
        Split::Train => {
            if feat.len() <= held_out {
                return Err(GainmapError::InvalidConfiguration(format!(
                    "{} style images, need more than the {} held out",
                    feat.len(),
                    held_out
                )));
            }
            config.train_face_range
        }
        Split::Test => {
            if held_out < 2 {
                return Err(GainmapError::InvalidConfiguration(format!(
                    "test split needs held_out_style_count >= 2, got {held_out}"
                )));
            }
            // Style draws cover [len + 1 - held_out, len - 1].
            if feat.len() + 1 < held_out {
                return Err(GainmapError::InvalidConfiguration(format!(
                    "{} style images, test split needs at least {}",
                    feat.len(),
                    held_out - 1
                )));
            }
            config.test_face_range
        }
    };
    if input.len() <= face_range.max {
        return Err(GainmapError::InvalidConfiguration(format!(
            "{:?} split draws faces up to index {}, but only {} faces exist",
            split,
            face_range.max,
            input.len()
        )));
    }
    Ok(())
}

/// A loaded reconstruction sample. Neither tensor requires gradients.
#[derive(Debug, Clone)]
pub struct ReconstructionItem {
    pub face: Tensor,
    pub style: Tensor,
}

/// Dataset yielding normalized (face, style) tensors at 512x512.
#[derive(Debug)]
pub struct ReconstructionDataset {
    sampler: ReconstructionSampler,
    loader: ImageLoader,
}

impl ReconstructionDataset {
    /// Scans `root/styles` and `root/ffhq`. The split is derived from `name`.
    pub fn new<P: AsRef<Path>>(
        root: P,
        name: &str,
        config: ReconstructionConfig,
    ) -> Result<Self, GainmapError> {
        Self::with_image_config(root, name, config, ImageConfig::reconstruction())
    }

    pub fn with_image_config<P: AsRef<Path>>(
        root: P,
        name: &str,
        config: ReconstructionConfig,
        image_config: ImageConfig,
    ) -> Result<Self, GainmapError> {
        let split = Split::from_name(name)?;
        image_config.validate()?;
        let root = root.as_ref();
        let feat = make_dataset(root.join("styles"))?;
        let input = make_dataset(root.join("ffhq"))?;
        log::info!(
            "ReconstructionDataset '{}': {} styles, {} faces, split {:?}",
            name,
            feat.len(),
            input.len(),
            split
        );
        let sampler = ReconstructionSampler::new(feat, input, split, config)?;
        Ok(Self::from_parts(sampler, ImageLoader::new(image_config)))
    }

    pub fn from_parts(sampler: ReconstructionSampler, loader: ImageLoader) -> Self {
        ReconstructionDataset { sampler, loader }
    }

    pub fn sampler(&self) -> &ReconstructionSampler {
        &self.sampler
    }

    pub fn loader(&self) -> &ImageLoader {
        &self.loader
    }
}

impl Dataset for ReconstructionDataset {
    type Item = ReconstructionItem;

    fn get(&self, index: usize) -> Result<Self::Item, GainmapError> {
        let pair = self.sampler.resolve(index)?;
        Ok(ReconstructionItem {
            face: self.loader.load(&pair.input, false)?,
            style: self.loader.load(&pair.style, false)?,
        })
    }

    fn len(&self) -> usize {
        self.sampler.len()
    }
}

#[cfg(test)]
#[path = "reconstruction_test.rs"]
mod tests;
