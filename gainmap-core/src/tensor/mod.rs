// src/tensor/mod.rs

use crate::error::GainmapError;
use crate::tensor_data::TensorData;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

mod debug;
pub mod utils;

/// Represents a multi-dimensional `f32` array stored on the CPU.
///
/// `Tensor` uses `Arc<RwLock<TensorData>>` internally to allow for:
/// 1.  **Shared Ownership:** clones point to the same underlying data.
/// 2.  **Interior Mutability:** metadata such as `requires_grad` can be changed
///     through an immutable reference.
pub struct Tensor {
    pub(crate) data: Arc<RwLock<TensorData>>,
}

impl Tensor {
    /// Creates a new Tensor with the given row-major data and shape.
    /// `requires_grad` defaults to false.
    pub fn new(data_vec: Vec<f32>, shape: Vec<usize>) -> Result<Self, GainmapError> {
        let tensor_data = TensorData::new(data_vec, shape)?;
        Ok(Tensor {
            data: Arc::new(RwLock::new(tensor_data)),
        })
    }

    /// Acquires a read lock on the tensor's data.
    ///
    /// A poisoned lock is recovered; tensor metadata has no invariants that a
    /// panicking writer could break halfway.
    pub fn read_data(&self) -> RwLockReadGuard<'_, TensorData> {
        self.data.read().unwrap_or_else(|poisoned| {
            log::warn!("Tensor RwLock was poisoned on read. Recovering guard.");
            poisoned.into_inner()
        })
    }

    /// Acquires a write lock on the tensor's data.
    pub fn write_data(&self) -> RwLockWriteGuard<'_, TensorData> {
        self.data.write().unwrap_or_else(|poisoned| {
            log::warn!("Tensor RwLock was poisoned on write. Recovering guard.");
            poisoned.into_inner()
        })
    }

    /// Returns a clone of the tensor's shape.
    pub fn shape(&self) -> Vec<usize> {
        self.read_data().shape.clone()
    }

    /// Returns a clone of the tensor's strides.
    pub fn strides(&self) -> Vec<usize> {
        self.read_data().strides.clone()
    }

    /// Returns the rank (number of dimensions) of the tensor.
    pub fn rank(&self) -> usize {
        self.read_data().shape.len()
    }

    /// Returns the number of elements in the tensor.
    pub fn numel(&self) -> usize {
        self.read_data().numel()
    }

    pub fn requires_grad(&self) -> bool {
        self.read_data().requires_grad
    }

    /// Marks the tensor as (not) requiring gradient tracking.
    pub fn set_requires_grad(&self, requires_grad: bool) {
        self.write_data().requires_grad = requires_grad;
    }

    /// Returns an owned copy of the tensor data in row-major order.
    pub fn get_f32_data(&self) -> Result<Vec<f32>, GainmapError> {
        Ok(self.read_data().buffer().as_ref().clone())
    }

    /// Reads the element at the given multi-dimensional index.
    pub fn at(&self, indices: &[usize]) -> Result<f32, GainmapError> {
        let guard = self.read_data();
        let offset = guard.get_offset(indices)?;
        Ok(guard.buffer[offset])
    }
}

impl Clone for Tensor {
    /// Shares the underlying storage; no data is copied.
    fn clone(&self) -> Self {
        Tensor {
            data: Arc::clone(&self.data),
        }
    }
}
