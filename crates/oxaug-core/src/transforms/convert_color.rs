//! Colorspace conversion as a pipeline step

use serde::{Deserialize, Serialize};

use super::{default_probability, validate_probability, Params, Transform};
use crate::color::ColorConversion;
use crate::image::ImageArray;
use crate::tensor::Tensor;
use crate::Result;

/// Conversion settings shared by both backends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertColorConfig {
    /// Conversion to run
    pub conversion: ColorConversion,
    /// Probability of applying
    #[serde(default = "default_probability")]
    pub p: f64,
    /// Apply regardless of `p`
    #[serde(default)]
    pub always_apply: bool,
}

impl ConvertColorConfig {
    /// Always-applied conversion
    pub fn new(conversion: ColorConversion) -> Self {
        Self {
            conversion,
            p: default_probability(),
            always_apply: false,
        }
    }
}

/// Colorspace conversion for the array backend
#[derive(Debug, Clone)]
pub struct ConvertColor {
    config: ConvertColorConfig,
}

impl ConvertColor {
    /// Create from a validated config
    pub fn new(config: ConvertColorConfig) -> Result<Self> {
        validate_probability(config.p)?;
        Ok(Self { config })
    }

    /// Settings of this transform
    pub fn config(&self) -> &ConvertColorConfig {
        &self.config
    }
}

impl Transform<ImageArray> for ConvertColor {
    fn name(&self) -> &'static str {
        self.config.conversion.name()
    }

    fn probability(&self) -> f64 {
        self.config.p
    }

    fn always_apply(&self) -> bool {
        self.config.always_apply
    }

    fn apply_with_params(&self, image: ImageArray, _params: &Params) -> Result<ImageArray> {
        self.config.conversion.apply_array(&image)
    }
}

/// Colorspace conversion for the tensor backend
#[derive(Debug, Clone)]
pub struct ConvertColorTensor {
    config: ConvertColorConfig,
}

impl ConvertColorTensor {
    /// Create from a validated config
    pub fn new(config: ConvertColorConfig) -> Result<Self> {
        validate_probability(config.p)?;
        Ok(Self { config })
    }

    /// Settings of this transform
    pub fn config(&self) -> &ConvertColorConfig {
        &self.config
    }
}

impl Transform<Tensor> for ConvertColorTensor {
    fn name(&self) -> &'static str {
        self.config.conversion.name()
    }

    fn probability(&self) -> f64 {
        self.config.p
    }

    fn always_apply(&self) -> bool {
        self.config.always_apply
    }

    fn apply_with_params(&self, tensor: Tensor, _params: &Params) -> Result<Tensor> {
        self.config.conversion.apply_tensor(&tensor)
    }
}
