// src/tensor_data.rs
use std::sync::Arc;

use crate::error::GainmapError;
use crate::tensor::utils::calculate_strides;

/// Internal storage and metadata for a Tensor.
///
/// Holds a contiguous CPU `f32` buffer together with its shape, strides and
/// the gradient-tracking flag. Wrapped in `Arc<RwLock<TensorData>>` by
/// `Tensor` so clones share the same storage.
#[derive(Debug)]
pub struct TensorData {
    /// Row-major element storage, shared between clones.
    pub(crate) buffer: Arc<Vec<f32>>,
    /// The shape (dimensions) of the tensor.
    pub(crate) shape: Vec<usize>,
    /// Jump in elements required to move one step along each dimension.
    pub(crate) strides: Vec<usize>,
    /// Whether downstream consumers should track gradients for this tensor.
    pub(crate) requires_grad: bool,
}

impl TensorData {
    /// Creates a new `TensorData` from row-major `f32` data.
    ///
    /// # Errors
    /// Returns `GainmapError::TensorCreationError` if the length of `data_vec`
    /// does not match the number of elements described by `shape`.
    pub fn new(data_vec: Vec<f32>, shape: Vec<usize>) -> Result<Self, GainmapError> {
        let numel: usize = shape.iter().product();
        let data_len = data_vec.len();
        if data_len != numel {
            return Err(GainmapError::TensorCreationError { data_len, shape });
        }

        let strides = calculate_strides(&shape);

        Ok(TensorData {
            buffer: Arc::new(data_vec),
            shape,
            strides,
            requires_grad: false,
        })
    }

    /// Provides immutable access to the underlying buffer.
    pub fn buffer(&self) -> &Arc<Vec<f32>> {
        &self.buffer
    }

    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }

    /// Linear offset into the buffer for the given multi-dimensional index.
    ///
    /// # Errors
    /// Returns `GainmapError::IndexOutOfBounds` if the rank differs or any
    /// coordinate exceeds its dimension.
    pub fn get_offset(&self, indices: &[usize]) -> Result<usize, GainmapError> {
        if indices.len() != self.shape.len()
            || indices.iter().zip(&self.shape).any(|(i, d)| i >= d)
        {
            return Err(GainmapError::IndexOutOfBounds {
                index: indices.to_vec(),
                shape: self.shape.clone(),
            });
        }
        Ok(indices
            .iter()
            .zip(&self.strides)
            .map(|(i, s)| i * s)
            .sum())
    }
}
