//! Tensor-to-tensor preprocessing steps.

use crate::error::GainmapError;
use crate::tensor::Tensor;

pub mod normalize;

pub use normalize::Normalize;

/// A preprocessing step applied to a single tensor.
pub trait Transform: Send + Sync {
    /// Applies the transform, returning a new tensor.
    fn apply(&self, tensor: &Tensor) -> Result<Tensor, GainmapError>;
}

/// Applies a sequence of transforms in order.
pub struct Compose {
    transforms: Vec<Box<dyn Transform>>,
}

impl Compose {
    pub fn new(transforms: Vec<Box<dyn Transform>>) -> Self {
        Compose { transforms }
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

impl Transform for Compose {
    fn apply(&self, tensor: &Tensor) -> Result<Tensor, GainmapError> {
        let mut current = tensor.clone();
        for transform in &self.transforms {
            current = transform.apply(&current)?;
        }
        Ok(current)
    }
}
