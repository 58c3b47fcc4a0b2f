//! Tensor backend buffer
//!
//! [`Tensor`] stores pixels channel-first: one contiguous (H, W) plane per
//! channel. Grayscale images are (1, H, W).

use crate::types::{ImageBuffer, Layout, PixelKind};
use crate::{Error, Result};

/// Native element type of a tensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// Unsigned 8-bit
    Uint8,
    /// Signed 32-bit
    Int32,
    /// 32-bit float
    Float32,
}

/// Samples of a [`Tensor`]
#[derive(Debug, Clone, PartialEq)]
pub enum TensorData {
    U8(Vec<u8>),
    I32(Vec<i32>),
    F32(Vec<f32>),
}

impl TensorData {
    /// Number of elements
    pub fn len(&self) -> usize {
        match self {
            TensorData::U8(d) => d.len(),
            TensorData::I32(d) => d.len(),
            TensorData::F32(d) => d.len(),
        }
    }

    /// Check if there are no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element type
    pub fn dtype(&self) -> DType {
        match self {
            TensorData::U8(_) => DType::Uint8,
            TensorData::I32(_) => DType::Int32,
            TensorData::F32(_) => DType::Float32,
        }
    }
}

/// Channel-first image tensor with shape (C, H, W)
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: [usize; 3],
    data: TensorData,
}

impl Tensor {
    /// Create a tensor with shape (C, H, W)
    pub fn new(shape: [usize; 3], data: TensorData) -> Result<Self> {
        if shape.contains(&0) {
            return Err(Error::Shape(format!(
                "dimensions must be non-zero, got {shape:?}"
            )));
        }
        let expected = shape.iter().product::<usize>();
        if data.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Assemble a tensor whose geometry was already validated elsewhere
    pub(crate) fn from_parts(shape: [usize; 3], data: TensorData) -> Self {
        debug_assert_eq!(shape.iter().product::<usize>(), data.len());
        Self { shape, data }
    }

    /// Create a byte tensor
    pub fn from_u8(shape: [usize; 3], data: Vec<u8>) -> Result<Self> {
        Self::new(shape, TensorData::U8(data))
    }

    /// Create a float tensor
    pub fn from_f32(shape: [usize; 3], data: Vec<f32>) -> Result<Self> {
        Self::new(shape, TensorData::F32(data))
    }

    /// Create an integer tensor
    pub fn from_i32(shape: [usize; 3], data: Vec<i32>) -> Result<Self> {
        Self::new(shape, TensorData::I32(data))
    }

    /// Shape as (C, H, W)
    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    /// Element type
    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    /// Elements
    pub fn data(&self) -> &TensorData {
        &self.data
    }

    /// Consume the tensor and return its elements
    pub fn into_data(self) -> TensorData {
        self.data
    }

    /// Elements in a plane
    pub fn plane_len(&self) -> usize {
        self.shape[1] * self.shape[2]
    }

    /// Float elements, if the tensor is `Float32`
    pub fn as_f32(&self) -> Option<&[f32]> {
        match &self.data {
            TensorData::F32(d) => Some(d),
            _ => None,
        }
    }

    /// Byte elements, if the tensor is `Uint8`
    pub fn as_u8(&self) -> Option<&[u8]> {
        match &self.data {
            TensorData::U8(d) => Some(d),
            _ => None,
        }
    }

    /// Same shape with new elements
    pub(crate) fn with_data(&self, data: TensorData) -> Result<Self> {
        Self::new(self.shape, data)
    }
}

impl ImageBuffer for Tensor {
    fn height(&self) -> usize {
        self.shape[1]
    }

    fn width(&self) -> usize {
        self.shape[2]
    }

    fn channels(&self) -> usize {
        self.shape[0]
    }

    fn layout(&self) -> Layout {
        Layout::ChannelFirst
    }

    fn pixel_kind(&self) -> Result<PixelKind> {
        match self.data {
            TensorData::U8(_) => Ok(PixelKind::Quantized),
            TensorData::F32(_) => Ok(PixelKind::Continuous),
            TensorData::I32(_) => Err(Error::UnsupportedDType(format!("{:?}", DType::Int32))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tensor_shape() {
        let t = Tensor::from_f32([3, 2, 4], vec![0.0; 24]).unwrap();
        assert_eq!(t.channels(), 3);
        assert_eq!(t.height(), 2);
        assert_eq!(t.width(), 4);
        assert_eq!(t.plane_len(), 8);
        assert_eq!(t.layout(), Layout::ChannelFirst);
    }

    #[test]
    fn test_tensor_size_mismatch() {
        assert!(matches!(
            Tensor::from_u8([3, 2, 2], vec![0; 10]),
            Err(Error::BufferSize {
                expected: 12,
                actual: 10
            })
        ));
    }

    #[test]
    fn test_int_tensor_has_no_pixel_kind() {
        let t = Tensor::from_i32([1, 1, 2], vec![1, 2]).unwrap();
        assert_eq!(t.dtype(), DType::Int32);
        assert!(matches!(t.pixel_kind(), Err(Error::UnsupportedDType(_))));
    }
}
