//! Ordered transform pipelines
//!
//! A [`Compose`] runs its transforms in order over a [`Sample`]. Parameters
//! are sampled once per transform from the `"image"` target and reused for
//! every additional target, so paired images receive identical holes.

use std::collections::BTreeMap;

use crate::random::Generator;
use crate::transforms::Transform;
use crate::types::ImageBuffer;
use crate::{Error, Result};

/// Name of the primary target
pub const IMAGE_TARGET: &str = "image";

/// Named images flowing through a pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct Sample<B> {
    targets: BTreeMap<String, B>,
}

impl<B: ImageBuffer> Sample<B> {
    /// Sample with only the primary image
    pub fn new(image: B) -> Self {
        let mut targets = BTreeMap::new();
        targets.insert(IMAGE_TARGET.to_string(), image);
        Self { targets }
    }

    /// Add or replace a named target
    pub fn with_target(mut self, name: impl Into<String>, image: B) -> Self {
        self.targets.insert(name.into(), image);
        self
    }

    /// The primary image
    pub fn image(&self) -> Result<&B> {
        self.get(IMAGE_TARGET)
    }

    /// A named target
    pub fn get(&self, name: &str) -> Result<&B> {
        self.targets
            .get(name)
            .ok_or_else(|| Error::MissingTarget(name.to_string()))
    }

    /// Names of all targets
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }

    /// Take the primary image out
    pub fn into_image(mut self) -> Result<B> {
        self.targets
            .remove(IMAGE_TARGET)
            .ok_or_else(|| Error::MissingTarget(IMAGE_TARGET.to_string()))
    }
}

/// Ordered list of transforms applied under one generator
pub struct Compose<B: ImageBuffer> {
    transforms: Vec<Box<dyn Transform<B>>>,
    p: f64,
    additional_targets: Vec<String>,
}

impl<B: ImageBuffer> Compose<B> {
    /// Pipeline that always runs
    pub fn new(transforms: Vec<Box<dyn Transform<B>>>) -> Self {
        Self {
            transforms,
            p: 1.0,
            additional_targets: Vec::new(),
        }
    }

    /// Set the probability of running the pipeline at all
    pub fn with_probability(mut self, p: f64) -> Result<Self> {
        crate::transforms::validate_probability(p)?;
        self.p = p;
        Ok(self)
    }

    /// Also transform the named target with the image's parameters
    pub fn with_additional_target(mut self, name: impl Into<String>) -> Self {
        self.additional_targets.push(name.into());
        self
    }

    /// Append a transform
    pub fn push(&mut self, transform: Box<dyn Transform<B>>) {
        self.transforms.push(transform);
    }

    /// Number of transforms
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Check if there are no transforms
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Pipeline probability
    pub fn probability(&self) -> f64 {
        self.p
    }

    /// Names of the additional targets
    pub fn additional_targets(&self) -> &[String] {
        &self.additional_targets
    }

    /// Transform names in order
    pub fn names(&self) -> Vec<&'static str> {
        self.transforms.iter().map(|t| t.name()).collect()
    }

    /// Run the pipeline over `sample`
    pub fn call(&self, mut sample: Sample<B>, rng: &mut Generator) -> Result<Sample<B>> {
        let (height, width) = {
            let image = sample.image()?;
            let kind = image.pixel_kind()?;
            tracing::debug!(
                ?kind,
                layout = ?image.layout(),
                height = image.height(),
                width = image.width(),
                "pipeline input"
            );
            (image.height(), image.width())
        };

        // params come from the image, so additional targets must match its height and width
        for name in &self.additional_targets {
            if let Ok(target) = sample.get(name) {
                if (target.height(), target.width()) != (height, width) {
                    return Err(Error::Shape(format!(
                        "target {name:?} is {}x{}, image is {height}x{width}",
                        target.height(),
                        target.width()
                    )));
                }
            }
        }

        if rng.random() >= self.p {
            tracing::debug!(p = self.p, "pipeline skipped");
            return Ok(sample);
        }

        for transform in &self.transforms {
            if !transform.should_apply(rng) {
                tracing::debug!(transform = transform.name(), "transform skipped");
                continue;
            }
            let params = transform.sample_params(height, width, rng)?;
            tracing::debug!(transform = transform.name(), "transform applied");

            let names = std::iter::once(IMAGE_TARGET)
                .chain(self.additional_targets.iter().map(String::as_str));
            for name in names {
                if let Some(target) = sample.targets.remove(name) {
                    let out = transform.apply_with_params(target, &params)?;
                    sample.targets.insert(name.to_string(), out);
                }
            }
        }
        Ok(sample)
    }

    /// Run the pipeline over a single image
    pub fn call_image(&self, image: B, rng: &mut Generator) -> Result<B> {
        self.call(Sample::new(image), rng)?.into_image()
    }
}

impl<B: ImageBuffer> std::fmt::Debug for Compose<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compose")
            .field("transforms", &self.names())
            .field("p", &self.p)
            .field("additional_targets", &self.additional_targets)
            .finish()
    }
}
