// gainmap-data/src/image_io.rs
//! Decoding image files into normalized `[3, H, W]` tensors, and back.

use crate::config::ImageConfig;
use gainmap_core::transforms::Transform;
use gainmap_core::{GainmapError, Normalize, Tensor};
use image::imageops::FilterType;
use image::RgbImage;
use std::path::Path;

/// Loads images from disk as normalized RGB tensors of a fixed size.
#[derive(Debug, Clone)]
pub struct ImageLoader {
    config: ImageConfig,
    normalize: Normalize,
}

impl ImageLoader {
    /// Creates a loader using ImageNet normalization.
    pub fn new(config: ImageConfig) -> Self {
        ImageLoader {
            config,
            normalize: Normalize::imagenet(),
        }
    }

    pub fn with_normalize(mut self, normalize: Normalize) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn config(&self) -> &ImageConfig {
        &self.config
    }

    pub fn normalize(&self) -> &Normalize {
        &self.normalize
    }

    /// Reads `path`, converts it to RGB, resizes it to the configured
    /// `width x height` (bilinear) and normalizes it.
    ///
    /// The returned tensor has shape `[3, height, width]`.
    ///
    /// # Errors
    ///
    /// Returns `GainmapError::ImageDecode` if the file cannot be read or is
    /// not a valid image.
    pub fn load(&self, path: &Path, requires_grad: bool) -> Result<Tensor, GainmapError> {
        let decoded = image::open(path).map_err(|e| GainmapError::ImageDecode {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let rgb = decoded.to_rgb8();
        let resized = image::imageops::resize(
            &rgb,
            self.config.width,
            self.config.height,
            FilterType::Triangle,
        );

        let raw = rgb_to_tensor(&resized, self.config.pixel_range.scale())?;
        let tensor = self.normalize.apply(&raw)?;
        tensor.set_requires_grad(requires_grad);
        log::debug!(
            "Loaded {} as {:?} (requires_grad={})",
            path.display(),
            tensor.shape(),
            requires_grad
        );
        Ok(tensor)
    }

    /// Converts a tensor produced by [`ImageLoader::load`] back into an 8-bit
    /// image, for visual inspection.
    pub fn to_rgb_image(&self, tensor: &Tensor) -> Result<RgbImage, GainmapError> {
        let shape = tensor.shape();
        if shape.len() != 3 || shape[0] != 3 {
            return Err(GainmapError::ShapeMismatch {
                expected: "[3, H, W]".to_string(),
                actual: format!("{:?}", shape),
                operation: "ImageLoader::to_rgb_image".to_string(),
            });
        }
        let (height, width) = (shape[1], shape[2]);
        let plane = height * width;

        let restored = self.normalize.inverse().apply(tensor)?.get_f32_data()?;
        let scale = self.config.pixel_range.scale();

        let mut pixels = Vec::with_capacity(3 * plane);
        for i in 0..plane {
            for c in 0..3 {
                let value = restored[c * plane + i] / scale;
                pixels.push(value.round().clamp(0.0, 255.0) as u8);
            }
        }

        RgbImage::from_raw(width as u32, height as u32, pixels).ok_or_else(|| {
            GainmapError::ShapeMismatch {
                expected: format!("{} bytes", 3 * plane),
                actual: "buffer too small".to_string(),
                operation: "ImageLoader::to_rgb_image".to_string(),
            }
        })
    }
}

/// Lays an interleaved RGB image out as a planar `[3, H, W]` tensor.
fn rgb_to_tensor(img: &RgbImage, scale: f32) -> Result<Tensor, GainmapError> {
    let (width, height) = img.dimensions();
    let plane = width as usize * height as usize;
    let mut data = vec![0.0f32; 3 * plane];

    for (i, pixel) in img.pixels().enumerate() {
        for c in 0..3 {
            data[c * plane + i] = pixel[c] as f32 * scale;
        }
    }

    Tensor::new(data, vec![3, height as usize, width as usize])
}

#[cfg(test)]
#[path = "image_io_test.rs"]
mod tests;
