// src/tensor/debug.rs
use crate::tensor::Tensor;
use std::fmt;

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data.read() {
            Ok(guard) => write!(
                f,
                "Tensor(shape={:?}, strides={:?}, requires_grad={})",
                guard.shape, guard.strides, guard.requires_grad
            ),
            Err(_) => write!(f, "Tensor(Error: RwLock poisoned)"),
        }
    }
}
