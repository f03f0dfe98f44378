use thiserror::Error;

/// Error type shared by the gainmap crates.
#[derive(Error, Debug, PartialEq, Clone)] // PartialEq for easier testing
pub enum GainmapError {
    #[error("{path} is not a valid directory")]
    NotADirectory { path: String },

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Failed to decode image {path}: {message}")]
    ImageDecode { path: String, message: String },

    #[error("Index out of bounds: index {index:?} for shape {shape:?}")]
    IndexOutOfBounds {
        index: Vec<usize>,
        shape: Vec<usize>,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Cannot sample from empty collection '{name}'")]
    EmptyCollection { name: String },

    #[error("Division by zero error")]
    DivisionByZero,

    #[error("Tensor creation error: data length {data_len} does not match shape {shape:?}")]
    TensorCreationError { data_len: usize, shape: Vec<usize> },

    #[error("Shape mismatch: expected {expected}, got {actual} during operation {operation}")]
    ShapeMismatch {
        expected: String,
        actual: String,
        operation: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<std::io::Error> for GainmapError {
    fn from(err: std::io::Error) -> Self {
        GainmapError::Io(err.to_string())
    }
}
