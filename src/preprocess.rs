//! Image preprocessing for the fundus classifier.
//!
//! Uploaded bytes are decoded (PNG/JPEG), resized to the network's fixed
//! input resolution, converted to 3-channel RGB, and normalized with the
//! per-channel mean/std the checkpoint was trained with.

use tract_onnx::prelude::*;

use crate::error::ScanError;

/// Side length of the square network input.
pub const INPUT_SIZE: u32 = 224;

/// Per-channel normalization constants (R, G, B), matching training.
pub const CHANNEL_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
pub const CHANNEL_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Decodes image bytes and produces the `1×3×224×224` NCHW input tensor.
///
/// Fails with [`ScanError::Decode`] when the bytes are not a decodable image.
pub fn preprocess_image(bytes: &[u8]) -> Result<tract_ndarray::Array4<f32>, ScanError> {
    let img = image::load_from_memory(bytes).map_err(|e| ScanError::Decode(e.to_string()))?;
    let resized = img.resize_exact(INPUT_SIZE, INPUT_SIZE, image::imageops::FilterType::Lanczos3);
    let rgb = resized.to_rgb8();

    let side = INPUT_SIZE as usize;
    Ok(tract_ndarray::Array4::from_shape_fn(
        (1, 3, side, side),
        |(_, c, y, x)| {
            let p = rgb.get_pixel(x as u32, y as u32);
            (p[c] as f32 / 255.0 - CHANNEL_MEAN[c]) / CHANNEL_STD[c]
        },
    ))
}
