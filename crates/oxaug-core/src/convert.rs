//! Lossless conversion between the array and tensor backends
//!
//! Only the memory layout changes: (H, W, C) interleaved samples become
//! (C, H, W) planes and back. Element types are preserved.

use crate::image::{ImageArray, PixelData};
use crate::tensor::{DType, Tensor, TensorData};
use crate::types::ImageBuffer;
use crate::{Error, Result};

fn interleaved_to_planar<T: Copy + Default>(src: &[T], channels: usize) -> Vec<T> {
    if channels == 1 {
        return src.to_vec();
    }
    let plane = src.len() / channels;
    let mut dst = vec![T::default(); src.len()];
    for (i, px) in src.chunks_exact(channels).enumerate() {
        for (c, &v) in px.iter().enumerate() {
            dst[c * plane + i] = v;
        }
    }
    dst
}

fn planar_to_interleaved<T: Copy + Default>(src: &[T], channels: usize) -> Vec<T> {
    if channels == 1 {
        return src.to_vec();
    }
    let plane = src.len() / channels;
    let mut dst = vec![T::default(); src.len()];
    for (i, px) in dst.chunks_exact_mut(channels).enumerate() {
        for (c, v) in px.iter_mut().enumerate() {
            *v = src[c * plane + i];
        }
    }
    dst
}

/// Convert an array-backend image to a tensor
pub fn to_tensor(image: &ImageArray) -> Tensor {
    let channels = image.channels();
    let data = match image.data() {
        PixelData::U8(d) => TensorData::U8(interleaved_to_planar(d, channels)),
        PixelData::F32(d) => TensorData::F32(interleaved_to_planar(d, channels)),
    };
    Tensor::from_parts([channels, image.height(), image.width()], data)
}

/// Convert a tensor to an array-backend image
///
/// Single-channel tensors become (H, W) images.
pub fn from_tensor(tensor: &Tensor) -> Result<ImageArray> {
    let [channels, height, width] = tensor.shape();
    let data = match tensor.data() {
        TensorData::U8(d) => PixelData::U8(planar_to_interleaved(d, channels)),
        TensorData::F32(d) => PixelData::F32(planar_to_interleaved(d, channels)),
        TensorData::I32(_) => {
            return Err(Error::UnsupportedDType(format!(
                "{:?} has no array-backend representation",
                DType::Int32
            )));
        }
    };
    if channels == 1 {
        ImageArray::new_gray(height, width, data)
    } else {
        ImageArray::new(height, width, channels, data)
    }
}
