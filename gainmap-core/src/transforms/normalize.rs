// gainmap-core/src/transforms/normalize.rs

use super::{Compose, Transform};
use crate::error::GainmapError;
use crate::tensor::Tensor;

/// ImageNet channel means, as expected by VGG-style feature extractors.
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
/// ImageNet channel standard deviations.
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Per-channel normalization of a `[C, H, W]` tensor:
/// `out[c] = (in[c] - mean[c]) / std[c]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalize {
    mean: Vec<f32>,
    std: Vec<f32>,
}

impl Normalize {
    /// Creates a new per-channel normalization.
    ///
    /// # Errors
    ///
    /// Returns `GainmapError::ShapeMismatch` if `mean` and `std` have different
    /// lengths, and `GainmapError::DivisionByZero` if any `std` entry is zero.
    pub fn new(mean: Vec<f32>, std: Vec<f32>) -> Result<Self, GainmapError> {
        if mean.len() != std.len() {
            return Err(GainmapError::ShapeMismatch {
                expected: format!("{} std values", mean.len()),
                actual: format!("{} std values", std.len()),
                operation: "Normalize::new".to_string(),
            });
        }
        if std.iter().any(|s| *s == 0.0) {
            return Err(GainmapError::DivisionByZero);
        }
        Ok(Normalize { mean, std })
    }

    /// The normalization applied before images are fed to the network.
    pub fn imagenet() -> Self {
        Normalize {
            mean: IMAGENET_MEAN.to_vec(),
            std: IMAGENET_STD.to_vec(),
        }
    }

    pub fn mean(&self) -> &[f32] {
        &self.mean
    }

    pub fn std(&self) -> &[f32] {
        &self.std
    }

    /// Returns the transform undoing this normalization.
    ///
    /// Built as two chained normalizations, first scaling by `std` (mean 0,
    /// std `1/std`) then shifting by `mean` (mean `-mean`, std 1).
    pub fn inverse(&self) -> Compose {
        let channels = self.mean.len();
        let unscale = Normalize {
            mean: vec![0.0; channels],
            std: self.std.iter().map(|s| 1.0 / s).collect(),
        };
        let unshift = Normalize {
            mean: self.mean.iter().map(|m| -m).collect(),
            std: vec![1.0; channels],
        };
        Compose::new(vec![Box::new(unscale), Box::new(unshift)])
    }
}

impl Transform for Normalize {
    /// Normalizes every channel plane. The result keeps the input's
    /// `requires_grad` flag.
    fn apply(&self, tensor: &Tensor) -> Result<Tensor, GainmapError> {
        let shape = tensor.shape();
        if shape.len() != 3 || shape[0] != self.mean.len() {
            return Err(GainmapError::ShapeMismatch {
                expected: format!("[{}, H, W]", self.mean.len()),
                actual: format!("{:?}", shape),
                operation: "Normalize::apply".to_string(),
            });
        }

        let plane = shape[1] * shape[2];
        let mut data = tensor.get_f32_data()?;
        if plane > 0 {
            for (c, channel) in data.chunks_mut(plane).enumerate() {
                let (mean, std) = (self.mean[c], self.std[c]);
                for value in channel.iter_mut() {
                    *value = (*value - mean) / std;
                }
            }
        }

        let output = Tensor::new(data, shape)?;
        output.set_requires_grad(tensor.requires_grad());
        Ok(output)
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
