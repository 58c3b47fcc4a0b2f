//! Per-channel normalization
//!
//! `out = (x - mean * max_pixel_value) / (std * max_pixel_value)`, computed
//! in f32. The output is always continuous, whatever the input kind.

use multiversion::multiversion;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{validate_probability, Params, Transform};
use crate::image::{ImageArray, PixelData};
use crate::tensor::{DType, Tensor, TensorData};
use crate::types::ImageBuffer;
use crate::{Error, Result};

/// One value for every channel, or one value per channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChannelValues {
    Scalar(f32),
    PerChannel(Vec<f32>),
}

impl ChannelValues {
    /// Expand to exactly `channels` values
    pub fn broadcast(&self, channels: usize) -> Result<Vec<f32>> {
        match self {
            ChannelValues::Scalar(v) => Ok(vec![*v; channels]),
            ChannelValues::PerChannel(values) if values.len() == 1 => Ok(vec![values[0]; channels]),
            ChannelValues::PerChannel(values) if values.len() == channels => Ok(values.clone()),
            ChannelValues::PerChannel(values) => Err(Error::ChannelMismatch {
                operation: "Normalize",
                expected: values.len(),
                actual: channels,
            }),
        }
    }

    fn values(&self) -> &[f32] {
        match self {
            ChannelValues::Scalar(v) => std::slice::from_ref(v),
            ChannelValues::PerChannel(values) => values,
        }
    }
}

impl From<f32> for ChannelValues {
    fn from(v: f32) -> Self {
        ChannelValues::Scalar(v)
    }
}

impl From<Vec<f32>> for ChannelValues {
    fn from(values: Vec<f32>) -> Self {
        ChannelValues::PerChannel(values)
    }
}

/// Normalization settings shared by both backends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Channel means, in units of `max_pixel_value`
    pub mean: ChannelValues,
    /// Channel standard deviations, in units of `max_pixel_value`
    pub std: ChannelValues,
    /// Value that `mean` and `std` are scaled by
    pub max_pixel_value: f32,
    /// Probability of applying
    pub p: f64,
    /// Apply regardless of `p`
    pub always_apply: bool,
}

impl Default for NormalizeConfig {
    /// ImageNet statistics
    fn default() -> Self {
        Self {
            mean: ChannelValues::PerChannel(vec![0.485, 0.456, 0.406]),
            std: ChannelValues::PerChannel(vec![0.229, 0.224, 0.225]),
            max_pixel_value: 255.0,
            p: 1.0,
            always_apply: false,
        }
    }
}

impl NormalizeConfig {
    /// Custom statistics with the default pixel scale
    pub fn with_stats(mean: impl Into<ChannelValues>, std: impl Into<ChannelValues>) -> Self {
        Self {
            mean: mean.into(),
            std: std.into(),
            ..Self::default()
        }
    }

    /// Set the probability
    pub fn with_probability(mut self, p: f64) -> Self {
        self.p = p;
        self
    }

    fn validate(&self) -> Result<()> {
        validate_probability(self.p)?;
        if !(self.max_pixel_value > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "max_pixel_value must be positive, got {}",
                self.max_pixel_value
            )));
        }
        if self.std.values().iter().any(|s| !(*s > 0.0)) {
            return Err(Error::InvalidParameter(format!(
                "std must be positive, got {:?}",
                self.std
            )));
        }
        if self.mean.values().is_empty() || self.std.values().is_empty() {
            return Err(Error::InvalidParameter("mean and std must not be empty".into()));
        }
        Ok(())
    }

    /// Mean and std scaled by `max_pixel_value`, one per channel
    fn scaled(&self, channels: usize) -> Result<(Vec<f32>, Vec<f32>)> {
        let mean = self.mean.broadcast(channels)?;
        let std = self.std.broadcast(channels)?;
        let mpv = self.max_pixel_value;
        Ok((
            mean.iter().map(|m| m * mpv).collect(),
            std.iter().map(|s| s * mpv).collect(),
        ))
    }
}

/// Normalize for the array backend
#[derive(Debug, Clone)]
pub struct Normalize {
    config: NormalizeConfig,
}

impl Normalize {
    /// Create from a validated config
    pub fn new(config: NormalizeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Settings of this transform
    pub fn config(&self) -> &NormalizeConfig {
        &self.config
    }
}

/// Subtract the mean, then multiply by the reciprocal std
#[multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon",))]
fn normalize_interleaved(data: &mut [f32], mean: &[f32], denominator: &[f32]) {
    let channels = mean.len();
    for px in data.chunks_exact_mut(channels) {
        for ((v, m), d) in px.iter_mut().zip(mean).zip(denominator) {
            *v -= m;
            *v *= d;
        }
    }
}

impl Transform<ImageArray> for Normalize {
    fn name(&self) -> &'static str {
        "Normalize"
    }

    fn probability(&self) -> f64 {
        self.config.p
    }

    fn always_apply(&self) -> bool {
        self.config.always_apply
    }

    fn apply_with_params(&self, image: ImageArray, _params: &Params) -> Result<ImageArray> {
        let (mean, std) = self.config.scaled(image.channels())?;
        let denominator: Vec<f32> = std.iter().map(|s| 1.0 / s).collect();

        let mut data: Vec<f32> = match image.data() {
            PixelData::U8(d) => d.iter().map(|&v| v as f32).collect(),
            PixelData::F32(d) => d.clone(),
        };
        normalize_interleaved(&mut data, &mean, &denominator);
        image.with_data(PixelData::F32(data))
    }
}

/// Normalize for the tensor backend
#[derive(Debug, Clone)]
pub struct NormalizeTensor {
    config: NormalizeConfig,
}

impl NormalizeTensor {
    /// Create from a validated config
    pub fn new(config: NormalizeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Settings of this transform
    pub fn config(&self) -> &NormalizeConfig {
        &self.config
    }
}

impl Transform<Tensor> for NormalizeTensor {
    fn name(&self) -> &'static str {
        "NormalizeTensor"
    }

    fn probability(&self) -> f64 {
        self.config.p
    }

    fn always_apply(&self) -> bool {
        self.config.always_apply
    }

    fn apply_with_params(&self, tensor: Tensor, _params: &Params) -> Result<Tensor> {
        let (mean, std) = self.config.scaled(tensor.channels())?;
        let plane = tensor.plane_len();

        let mut data: Vec<f32> = match tensor.data() {
            TensorData::U8(d) => d.iter().map(|&v| v as f32).collect(),
            TensorData::F32(d) => d.clone(),
            TensorData::I32(_) => {
                return Err(Error::UnsupportedDType(format!(
                    "NormalizeTensor is undefined for {:?} tensors",
                    DType::Int32
                )));
            }
        };

        data.par_chunks_mut(plane)
            .zip(mean.par_iter().zip(std.par_iter()))
            .for_each(|(channel, (m, s))| {
                for v in channel.iter_mut() {
                    *v = (*v - m) / s;
                }
            });
        tensor.with_data(TensorData::F32(data))
    }
}
