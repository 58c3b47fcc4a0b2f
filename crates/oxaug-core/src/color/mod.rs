//! RGB ↔ HLS colorspace conversion
//!
//! Two independent implementations live here:
//!
//! - [`array`]: per-pixel kernels over interleaved (H, W, 3) buffers. This is
//!   the reference conversion.
//! - [`tensor`]: row-parallel kernels over planar (3, H, W) tensors, required
//!   to agree with the reference.
//!
//! # Value ranges
//!
//! | Kind        | H                   | L, S     |
//! |-------------|---------------------|----------|
//! | Continuous  | degrees, [0, 360)   | [0, 1]   |
//! | Quantized   | H / 2, [0, 180)     | [0, 255] |
//! | Quantized, full | H · 256/360, [0, 255] | [0, 255] |
//!
//! Continuous outputs of the two backends agree to floating-point round-off.
//! Quantized RGB → HLS agrees within 1 per channel, quantized HLS → RGB is
//! identical.

pub mod array;
pub mod tensor;

use serde::{Deserialize, Serialize};

use crate::image::ImageArray;
use crate::tensor::Tensor;
use crate::types::ImageBuffer;
use crate::{Error, Result};

/// Hue range of quantized HLS bytes (H is stored halved)
pub const HUE_RANGE_HALF: f32 = 180.0;

/// Hue range of quantized HLS bytes using the whole byte
pub const HUE_RANGE_FULL: f32 = 256.0;

/// Hue range of continuous HLS values (degrees)
pub const HUE_RANGE_DEGREES: f32 = 360.0;

/// A colorspace conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorConversion {
    /// RGB → HLS, quantized hue stored as H/2
    RgbToHls,
    /// HLS → RGB, quantized hue read as H/2
    HlsToRgb,
    /// RGB → HLS, quantized hue scaled to the whole byte
    RgbToHlsFull,
    /// HLS → RGB, quantized hue read over the whole byte
    HlsToRgbFull,
}

impl ColorConversion {
    /// Range that the quantized hue byte covers
    pub fn quantized_hue_range(&self) -> f32 {
        match self {
            Self::RgbToHls | Self::HlsToRgb => HUE_RANGE_HALF,
            Self::RgbToHlsFull | Self::HlsToRgbFull => HUE_RANGE_FULL,
        }
    }

    /// Check if this converts RGB into HLS
    pub fn is_forward(&self) -> bool {
        matches!(self, Self::RgbToHls | Self::RgbToHlsFull)
    }

    /// Operation name used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            Self::RgbToHls => "rgb_to_hls",
            Self::HlsToRgb => "hls_to_rgb",
            Self::RgbToHlsFull => "rgb_to_hls_full",
            Self::HlsToRgbFull => "hls_to_rgb_full",
        }
    }

    /// Apply to an array-backend image
    pub fn apply_array(&self, image: &ImageArray) -> Result<ImageArray> {
        if self.is_forward() {
            array::rgb_to_hls_with_range(image, self.quantized_hue_range(), self.name())
        } else {
            array::hls_to_rgb_with_range(image, self.quantized_hue_range(), self.name())
        }
    }

    /// Apply to a tensor
    pub fn apply_tensor(&self, tensor: &Tensor) -> Result<Tensor> {
        if self.is_forward() {
            tensor::rgb_to_hls_with_range(tensor, self.quantized_hue_range(), self.name())
        } else {
            tensor::hls_to_rgb_with_range(tensor, self.quantized_hue_range(), self.name())
        }
    }
}

/// Convert an RGB image to HLS (reference conversion)
pub fn rgb_to_hls(image: &ImageArray) -> Result<ImageArray> {
    ColorConversion::RgbToHls.apply_array(image)
}

/// Convert an HLS image to RGB (reference conversion)
pub fn hls_to_rgb(image: &ImageArray) -> Result<ImageArray> {
    ColorConversion::HlsToRgb.apply_array(image)
}

pub(crate) fn ensure_three_channels<B: ImageBuffer>(
    image: &B,
    operation: &'static str,
) -> Result<()> {
    if image.channels() != 3 {
        return Err(Error::ChannelMismatch {
            operation,
            expected: 3,
            actual: image.channels(),
        });
    }
    Ok(())
}
