//! Shared buffer types
//!
//! Both backends describe their buffers through [`ImageBuffer`], which lets
//! transforms and the pipeline stay generic over the storage layout.

use crate::Result;

/// Semantic kind of pixel samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelKind {
    /// Unsigned 8-bit samples in [0, 255]
    Quantized,
    /// Floating point samples
    Continuous,
}

impl PixelKind {
    /// Check if samples are 8-bit integers
    pub fn is_quantized(&self) -> bool {
        matches!(self, Self::Quantized)
    }
}

/// Storage layout of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    /// (H, W, C) interleaved, used by the array backend
    ChannelLast,
    /// (C, H, W) planar, used by the tensor backend
    ChannelFirst,
}

/// Common view over image buffers of either backend
pub trait ImageBuffer: Clone + Send + Sync {
    /// Number of rows
    fn height(&self) -> usize;

    /// Number of columns
    fn width(&self) -> usize;

    /// Number of channels (1 for grayscale)
    fn channels(&self) -> usize;

    /// Memory layout of this buffer
    fn layout(&self) -> Layout;

    /// Pixel kind, or an error for element types that have none
    fn pixel_kind(&self) -> Result<PixelKind>;

    /// Number of pixels (height * width)
    fn pixel_count(&self) -> usize {
        self.height() * self.width()
    }
}
