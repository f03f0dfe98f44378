// src/tensor/utils.rs

/// Calculates the strides required for a contiguous (row-major) tensor of the
/// given shape.
pub fn calculate_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![0; shape.len()];
    if shape.is_empty() {
        return strides;
    }
    strides[shape.len() - 1] = 1;
    for i in (0..shape.len() - 1).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

#[cfg(test)]
#[path = "utils_test.rs"]
mod tests;
