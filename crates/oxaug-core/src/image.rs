//! Array backend buffer
//!
//! [`ImageArray`] stores pixels channel-last: a row-major (H, W, C) grid with
//! interleaved samples, or (H, W) for single-channel images.

use crate::types::{ImageBuffer, Layout, PixelKind};
use crate::{Error, Result};

/// Pixel samples of an [`ImageArray`]
#[derive(Debug, Clone, PartialEq)]
pub enum PixelData {
    /// Quantized samples
    U8(Vec<u8>),
    /// Continuous samples
    F32(Vec<f32>),
}

impl PixelData {
    /// Number of samples
    pub fn len(&self) -> usize {
        match self {
            PixelData::U8(d) => d.len(),
            PixelData::F32(d) => d.len(),
        }
    }

    /// Check if there are no samples
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pixel kind of these samples
    pub fn kind(&self) -> PixelKind {
        match self {
            PixelData::U8(_) => PixelKind::Quantized,
            PixelData::F32(_) => PixelKind::Continuous,
        }
    }

    /// Raw bytes of the samples (native endianness)
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            PixelData::U8(d) => d,
            PixelData::F32(d) => bytemuck::cast_slice(d),
        }
    }
}

/// Channel-last image buffer
#[derive(Debug, Clone, PartialEq)]
pub struct ImageArray {
    height: usize,
    width: usize,
    channels: usize,
    /// `true` for (H, W) images without a channel axis
    planar_gray: bool,
    data: PixelData,
}

impl ImageArray {
    /// Create an (H, W, C) image
    pub fn new(height: usize, width: usize, channels: usize, data: PixelData) -> Result<Self> {
        Self::build(height, width, channels, false, data)
    }

    /// Create an (H, W) single-channel image
    pub fn new_gray(height: usize, width: usize, data: PixelData) -> Result<Self> {
        Self::build(height, width, 1, true, data)
    }

    /// Create an (H, W, C) image from bytes
    pub fn from_u8(height: usize, width: usize, channels: usize, data: Vec<u8>) -> Result<Self> {
        Self::new(height, width, channels, PixelData::U8(data))
    }

    /// Create an (H, W, C) image from floats
    pub fn from_f32(height: usize, width: usize, channels: usize, data: Vec<f32>) -> Result<Self> {
        Self::new(height, width, channels, PixelData::F32(data))
    }

    fn build(
        height: usize,
        width: usize,
        channels: usize,
        planar_gray: bool,
        data: PixelData,
    ) -> Result<Self> {
        if height == 0 || width == 0 || channels == 0 {
            return Err(Error::Shape(format!(
                "dimensions must be non-zero, got ({height}, {width}, {channels})"
            )));
        }
        let expected = height * width * channels;
        if data.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            height,
            width,
            channels,
            planar_gray,
            data,
        })
    }

    /// Shape as (H, W, C), or (H, W) for images without a channel axis
    pub fn shape(&self) -> Vec<usize> {
        if self.planar_gray {
            vec![self.height, self.width]
        } else {
            vec![self.height, self.width, self.channels]
        }
    }

    /// Check if the image has no channel axis
    pub fn is_planar_gray(&self) -> bool {
        self.planar_gray
    }

    /// Pixel samples
    pub fn data(&self) -> &PixelData {
        &self.data
    }

    /// Mutable pixel samples
    pub fn data_mut(&mut self) -> &mut PixelData {
        &mut self.data
    }

    /// Consume the image and return its samples
    pub fn into_data(self) -> PixelData {
        self.data
    }

    /// Byte samples, if quantized
    pub fn as_u8(&self) -> Option<&[u8]> {
        match &self.data {
            PixelData::U8(d) => Some(d),
            PixelData::F32(_) => None,
        }
    }

    /// Float samples, if continuous
    pub fn as_f32(&self) -> Option<&[f32]> {
        match &self.data {
            PixelData::F32(d) => Some(d),
            PixelData::U8(_) => None,
        }
    }

    /// Samples at (y, x), one per channel, widened to f32
    pub fn pixel(&self, y: usize, x: usize) -> Option<Vec<f32>> {
        if y >= self.height || x >= self.width {
            return None;
        }
        let start = (y * self.width + x) * self.channels;
        let range = start..start + self.channels;
        Some(match &self.data {
            PixelData::U8(d) => d[range].iter().map(|&v| v as f32).collect(),
            PixelData::F32(d) => d[range].to_vec(),
        })
    }

    /// Same geometry with new samples
    pub(crate) fn with_data(&self, data: PixelData) -> Result<Self> {
        Self::build(self.height, self.width, self.channels, self.planar_gray, data)
    }
}

impl ImageBuffer for ImageArray {
    fn height(&self) -> usize {
        self.height
    }

    fn width(&self) -> usize {
        self.width
    }

    fn channels(&self) -> usize {
        self.channels
    }

    fn layout(&self) -> Layout {
        Layout::ChannelLast
    }

    fn pixel_kind(&self) -> Result<PixelKind> {
        Ok(self.data.kind())
    }
}
