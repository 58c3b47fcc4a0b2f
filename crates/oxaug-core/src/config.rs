//! JSON pipeline descriptions
//!
//! A [`PipelineConfig`] describes a pipeline independently of the backend and
//! builds an equivalent [`Compose`] for either one:
//!
//! ```
//! use oxaug_core::{Generator, ImageArray, PipelineConfig};
//!
//! let config = PipelineConfig::from_json(r#"{
//!     "transforms": [
//!         {"type": "CoarseDropout", "max_holes": 2, "p": 1.0},
//!         {"type": "Normalize"}
//!     ]
//! }"#).unwrap();
//!
//! let pipeline = config.build_array().unwrap();
//! let image = ImageArray::from_u8(32, 32, 3, vec![128; 32 * 32 * 3]).unwrap();
//! let out = pipeline.call_image(image, &mut Generator::seeded(0)).unwrap();
//! assert!(out.as_f32().is_some());
//! ```

use serde::{Deserialize, Serialize};

use crate::compose::Compose;
use crate::image::ImageArray;
use crate::tensor::Tensor;
use crate::transforms::{
    CoarseDropout, CoarseDropoutConfig, CoarseDropoutTensor, ConvertColor, ConvertColorConfig,
    ConvertColorTensor, Normalize, NormalizeConfig, NormalizeTensor, Transform,
};
use crate::Result;

/// One pipeline step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TransformConfig {
    Normalize(NormalizeConfig),
    CoarseDropout(CoarseDropoutConfig),
    ConvertColor(ConvertColorConfig),
}

impl TransformConfig {
    fn build_array(&self) -> Result<Box<dyn Transform<ImageArray>>> {
        Ok(match self {
            Self::Normalize(c) => Box::new(Normalize::new(c.clone())?),
            Self::CoarseDropout(c) => Box::new(CoarseDropout::new(c.clone())?),
            Self::ConvertColor(c) => Box::new(ConvertColor::new(c.clone())?),
        })
    }

    fn build_tensor(&self) -> Result<Box<dyn Transform<Tensor>>> {
        Ok(match self {
            Self::Normalize(c) => Box::new(NormalizeTensor::new(c.clone())?),
            Self::CoarseDropout(c) => Box::new(CoarseDropoutTensor::new(c.clone())?),
            Self::ConvertColor(c) => Box::new(ConvertColorTensor::new(c.clone())?),
        })
    }
}

/// Backend-independent pipeline description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Steps in order
    pub transforms: Vec<TransformConfig>,
    /// Probability of running the pipeline
    #[serde(default = "crate::transforms::default_probability")]
    pub p: f64,
    /// Extra targets transformed like `"image"`
    #[serde(default)]
    pub additional_targets: Vec<String>,
}

impl PipelineConfig {
    /// Parse from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build the array-backend pipeline
    pub fn build_array(&self) -> Result<Compose<ImageArray>> {
        let transforms = self
            .transforms
            .iter()
            .map(TransformConfig::build_array)
            .collect::<Result<Vec<_>>>()?;
        self.finish(Compose::new(transforms), "array")
    }

    /// Build the tensor-backend pipeline
    pub fn build_tensor(&self) -> Result<Compose<Tensor>> {
        let transforms = self
            .transforms
            .iter()
            .map(TransformConfig::build_tensor)
            .collect::<Result<Vec<_>>>()?;
        self.finish(Compose::new(transforms), "tensor")
    }

    fn finish<B: crate::types::ImageBuffer>(
        &self,
        pipeline: Compose<B>,
        backend: &str,
    ) -> Result<Compose<B>> {
        let pipeline = self
            .additional_targets
            .iter()
            .fold(pipeline.with_probability(self.p)?, |c, name| {
                c.with_additional_target(name.clone())
            });
        tracing::debug!(backend, transforms = ?pipeline.names(), "built pipeline");
        Ok(pipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorConversion;
    use crate::convert::{from_tensor, to_tensor};
    use crate::random::Generator;
    use crate::transforms::HoleExtent;
    use crate::Error;

    const PIPELINE: &str = r#"{
        "p": 1.0,
        "additional_targets": ["image2"],
        "transforms": [
            {"type": "ConvertColor", "conversion": "RgbToHls"},
            {"type": "CoarseDropout", "max_holes": 4, "min_holes": 1, "max_height": 0.25, "max_width": 3, "min_height": 0.1, "min_width": 1, "p": 1.0},
            {"type": "Normalize", "mean": [0.5, 0.5, 0.5], "std": 0.2}
        ]
    }"#;

    #[test]
    fn test_parse() {
        let config = PipelineConfig::from_json(PIPELINE).unwrap();
        assert_eq!(config.transforms.len(), 3);
        assert_eq!(config.additional_targets, vec!["image2".to_string()]);
        match &config.transforms[1] {
            TransformConfig::CoarseDropout(c) => {
                assert_eq!(c.max_height, HoleExtent::Fraction(0.25));
                assert_eq!(c.max_width, HoleExtent::Pixels(3));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            config.transforms[0],
            TransformConfig::ConvertColor(ConvertColorConfig::new(ColorConversion::RgbToHls))
        );
    }

    #[test]
    fn test_json_roundtrip() {
        let config = PipelineConfig::from_json(PIPELINE).unwrap();
        let again = PipelineConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(config, again);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let err = PipelineConfig::from_json(r#"{"transforms": [{"type": "Blur"}]}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_invalid_values_rejected_on_build() {
        let config = PipelineConfig::from_json(
            r#"{"transforms": [{"type": "Normalize", "std": 0.0}]}"#,
        )
        .unwrap();
        assert!(config.build_array().is_err());
        assert!(config.build_tensor().is_err());
    }

    #[test]
    fn test_backends_agree() {
        let config = PipelineConfig::from_json(PIPELINE).unwrap();
        let array = config.build_array().unwrap();
        let tensor = config.build_tensor().unwrap();
        assert_eq!(array.names(), vec!["rgb_to_hls", "CoarseDropout", "Normalize"]);

        let data: Vec<u8> = (0..20 * 24 * 3).map(|i| (i * 7 % 256) as u8).collect();
        let img = ImageArray::from_u8(20, 24, 3, data).unwrap();

        let a = array.call_image(img.clone(), &mut Generator::seeded(0)).unwrap();
        let t = tensor.call_image(to_tensor(&img), &mut Generator::seeded(0)).unwrap();
        let t = from_tensor(&t).unwrap();

        // u8 hue may differ by one step before normalization
        let tolerance = 1.0 / (0.2 * 255.0) + 1e-4;
        for (x, y) in a.as_f32().unwrap().iter().zip(t.as_f32().unwrap()) {
            assert!((x - y).abs() <= tolerance, "{} vs {}", x, y);
        }
    }
}
