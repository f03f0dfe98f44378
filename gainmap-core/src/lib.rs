//! Core types for the gainmap style-transfer datasets: a small CPU tensor,
//! the shared error type and per-channel normalization.

pub mod error;
pub mod tensor;
pub mod tensor_data;
pub mod transforms;
pub mod utils;

pub use error::GainmapError;
pub use tensor::Tensor;
pub use transforms::{Compose, Normalize, Transform};
