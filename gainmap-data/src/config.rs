// gainmap-data/src/config.rs
//! Policy knobs for the datasets, loadable from JSON.

use gainmap_core::GainmapError;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::Path;

/// An inclusive range of collection indices, `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRange {
    pub min: usize,
    pub max: usize,
}

impl IndexRange {
    pub const fn new(min: usize, max: usize) -> Self {
        IndexRange { min, max }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.min <= index && index <= self.max
    }

    fn validate(&self, name: &str) -> Result<(), GainmapError> {
        if self.min > self.max {
            return Err(GainmapError::InvalidConfiguration(format!(
                "{name}: min {} is greater than max {}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Numeric ranges used by the reconstruction dataset.
///
/// The defaults reproduce the layout the reconstruction network was trained
/// with: the last 100 styles are held out, training faces come from
/// `[0, 67000]` and test faces from `[68000, 69000]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructionConfig {
    /// Number of trailing style images reserved for the test split.
    pub held_out_style_count: usize,
    /// Length reported for the test split. Not derived from the data.
    pub test_set_size: usize,
    pub train_face_range: IndexRange,
    pub test_face_range: IndexRange,
    /// Seed for the sampler's generator. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for ReconstructionConfig {
    fn default() -> Self {
        ReconstructionConfig {
            held_out_style_count: 100,
            test_set_size: 10,
            train_face_range: IndexRange::new(0, 67_000),
            test_face_range: IndexRange::new(68_000, 69_000),
            seed: None,
        }
    }
}

impl ReconstructionConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks the ranges on their own, independent of any collection.
    pub fn validate(&self) -> Result<(), GainmapError> {
        self.train_face_range.validate("train_face_range")?;
        self.test_face_range.validate("test_face_range")?;
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, GainmapError> {
        let config: Self = parse_json(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, GainmapError> {
        let config: Self = read_json_file(path)?;
        config.validate()?;
        Ok(config)
    }
}

/// Scale applied to 8-bit pixel values before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelRange {
    /// Keep values in `[0, 255]`. This is what the pretrained networks saw.
    #[default]
    Raw,
    /// Divide by 255 into `[0, 1]`.
    Unit,
}

impl PixelRange {
    pub fn scale(self) -> f32 {
        match self {
            PixelRange::Raw => 1.0,
            PixelRange::Unit => 1.0 / 255.0,
        }
    }
}

/// Target size and pixel scaling for loaded images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageConfig {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub pixel_range: PixelRange,
}

impl ImageConfig {
    pub fn new(width: u32, height: u32) -> Self {
        ImageConfig {
            width,
            height,
            pixel_range: PixelRange::default(),
        }
    }

    /// 500 wide by 660 high.
    pub fn style_transfer() -> Self {
        Self::new(500, 660)
    }

    pub fn reconstruction() -> Self {
        Self::new(512, 512)
    }

    pub fn validate(&self) -> Result<(), GainmapError> {
        if self.width == 0 || self.height == 0 {
            return Err(GainmapError::InvalidConfiguration(format!(
                "image size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width.checked_mul(self.height).is_none() {
            return Err(GainmapError::InvalidConfiguration(format!(
                "image size {}x{} has too many pixels",
                self.width, self.height
            )));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, GainmapError> {
        let config: Self = parse_json(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, GainmapError> {
        let config: Self = read_json_file(path)?;
        config.validate()?;
        Ok(config)
    }
}

fn parse_json<T: DeserializeOwned>(json: &str) -> Result<T, GainmapError> {
    serde_json::from_str(json).map_err(|e| GainmapError::Config(e.to_string()))
}

fn read_json_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, GainmapError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .map_err(|e| GainmapError::Config(format!("{}: {}", path.display(), e)))?;
    parse_json(&contents)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
