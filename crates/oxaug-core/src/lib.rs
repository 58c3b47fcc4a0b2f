//! # oxaug - image augmentation with two consistent backends
//!
//! Stochastic image transforms implemented twice: once over channel-last
//! [`ImageArray`] buffers (the reference) and once over channel-first
//! [`Tensor`] buffers. Both implementations draw from the same explicit
//! [`Generator`], so a seeded pipeline makes the same decisions in either
//! backend and the outputs agree within floating-point tolerance.
//!
//! ## Contents
//!
//! - **Colorspace**: RGB ↔ HLS for quantized and continuous pixels
//!   ([`color`])
//! - **Transforms**: `Normalize`, `CoarseDropout` and `ConvertColor`, one
//!   type per backend ([`transforms`])
//! - **Pipelines**: [`Compose`] with shared parameters across targets, and
//!   [`PipelineConfig`] to build one from JSON
//!
//! ## Quick Start
//!
//! ```
//! use oxaug_core::{
//!     to_tensor, CoarseDropout, CoarseDropoutConfig, CoarseDropoutTensor, Generator,
//!     ImageArray, Transform,
//! };
//!
//! let image = ImageArray::from_u8(64, 64, 3, vec![200; 64 * 64 * 3]).unwrap();
//! let config = CoarseDropoutConfig::default().with_probability(1.0);
//!
//! let array = CoarseDropout::new(config.clone()).unwrap();
//! let tensor = CoarseDropoutTensor::new(config).unwrap();
//!
//! let a = array.apply(image.clone(), &mut Generator::seeded(0)).unwrap();
//! let t = tensor.apply(to_tensor(&image), &mut Generator::seeded(0)).unwrap();
//! assert_eq!(to_tensor(&a), t);
//! ```

pub mod color;
pub mod compose;
pub mod config;
pub mod convert;
pub mod error;
pub mod image;
pub mod quantize;
pub mod random;
pub mod tensor;
pub mod transforms;
pub mod types;

pub use color::{hls_to_rgb, rgb_to_hls, ColorConversion};
pub use compose::{Compose, Sample};
pub use config::{PipelineConfig, TransformConfig};
pub use convert::{from_tensor, to_tensor};
pub use error::{Error, Result};
pub use image::{ImageArray, PixelData};
pub use random::Generator;
pub use tensor::{DType, Tensor, TensorData};
pub use transforms::{
    ChannelValues, CoarseDropout, CoarseDropoutConfig, CoarseDropoutTensor, ConvertColor,
    ConvertColorConfig, ConvertColorTensor, HoleExtent, Normalize, NormalizeConfig,
    NormalizeTensor, Params, Transform,
};
pub use types::{ImageBuffer, Layout, PixelKind};

/// Version of oxaug
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
