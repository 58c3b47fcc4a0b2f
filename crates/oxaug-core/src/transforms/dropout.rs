//! Coarse dropout: fill randomly placed rectangles with a constant

use serde::{Deserialize, Serialize};

use super::{validate_probability, Hole, Params, Transform};
use crate::image::{ImageArray, PixelData};
use crate::quantize::saturate_u8;
use crate::random::Generator;
use crate::tensor::{DType, Tensor, TensorData};
use crate::types::ImageBuffer;
use crate::{Error, Result};

/// Size of a hole side
///
/// Integers are pixel counts, floats are fractions of the image side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HoleExtent {
    Pixels(usize),
    Fraction(f32),
}

impl HoleExtent {
    fn validate(&self, what: &str) -> Result<()> {
        match *self {
            HoleExtent::Pixels(0) => Err(Error::InvalidParameter(format!(
                "{what} must be at least one pixel"
            ))),
            HoleExtent::Fraction(f) if !(f > 0.0 && f <= 1.0) => Err(Error::InvalidParameter(
                format!("{what} fraction must be in (0, 1], got {f}"),
            )),
            _ => Ok(()),
        }
    }
}

/// Draw one side length between `min` and `max` for an image side of `side`
fn sample_extent(min: HoleExtent, max: HoleExtent, side: usize, rng: &mut Generator) -> usize {
    let extent = match (min, max) {
        (HoleExtent::Pixels(lo), HoleExtent::Pixels(hi)) => rng.randint(lo, hi),
        (HoleExtent::Fraction(lo), HoleExtent::Fraction(hi)) => {
            (side as f64 * rng.uniform(lo as f64, hi as f64)) as usize
        }
        // mixed kinds are rejected on construction
        _ => 0,
    };
    extent.min(side)
}

/// Dropout settings shared by both backends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoarseDropoutConfig {
    /// Maximum number of holes
    pub max_holes: usize,
    /// Maximum hole height
    pub max_height: HoleExtent,
    /// Maximum hole width
    pub max_width: HoleExtent,
    /// Minimum number of holes, defaults to `max_holes`
    pub min_holes: Option<usize>,
    /// Minimum hole height, defaults to `max_height`
    pub min_height: Option<HoleExtent>,
    /// Minimum hole width, defaults to `max_width`
    pub min_width: Option<HoleExtent>,
    /// Value written into holes
    pub fill_value: f32,
    /// Probability of applying
    pub p: f64,
    /// Apply regardless of `p`
    pub always_apply: bool,
}

impl Default for CoarseDropoutConfig {
    fn default() -> Self {
        Self {
            max_holes: 8,
            max_height: HoleExtent::Pixels(8),
            max_width: HoleExtent::Pixels(8),
            min_holes: None,
            min_height: None,
            min_width: None,
            fill_value: 0.0,
            p: 0.5,
            always_apply: false,
        }
    }
}

impl CoarseDropoutConfig {
    /// Set the probability
    pub fn with_probability(mut self, p: f64) -> Self {
        self.p = p;
        self
    }

    fn min_holes(&self) -> usize {
        self.min_holes.unwrap_or(self.max_holes)
    }

    fn min_height(&self) -> HoleExtent {
        self.min_height.unwrap_or(self.max_height)
    }

    fn min_width(&self) -> HoleExtent {
        self.min_width.unwrap_or(self.max_width)
    }

    fn validate(&self) -> Result<()> {
        validate_probability(self.p)?;
        if self.max_holes == 0 {
            return Err(Error::InvalidParameter("max_holes must be at least 1".into()));
        }
        if self.min_holes() == 0 || self.min_holes() > self.max_holes {
            return Err(Error::InvalidParameter(format!(
                "min_holes must be in [1, {}], got {}",
                self.max_holes,
                self.min_holes()
            )));
        }
        for (what, lo, hi) in [
            ("height", self.min_height(), self.max_height),
            ("width", self.min_width(), self.max_width),
        ] {
            lo.validate(what)?;
            hi.validate(what)?;
            let ordered = match (lo, hi) {
                (HoleExtent::Pixels(a), HoleExtent::Pixels(b)) => a <= b,
                (HoleExtent::Fraction(a), HoleExtent::Fraction(b)) => a <= b,
                _ => {
                    return Err(Error::InvalidParameter(format!(
                        "min and max {what} must both be pixels or both be fractions"
                    )));
                }
            };
            if !ordered {
                return Err(Error::InvalidParameter(format!(
                    "min {what} {lo:?} exceeds max {what} {hi:?}"
                )));
            }
        }
        Ok(())
    }

    /// Sample hole rectangles for an image of `height` x `width`
    ///
    /// Draw order: hole count, then per hole height, width, y1, x1.
    pub fn sample_holes(&self, height: usize, width: usize, rng: &mut Generator) -> Vec<Hole> {
        let count = rng.randint(self.min_holes(), self.max_holes);
        let holes: Vec<Hole> = (0..count)
            .map(|_| {
                let hole_height = sample_extent(self.min_height(), self.max_height, height, rng);
                let hole_width = sample_extent(self.min_width(), self.max_width, width, rng);
                let y1 = rng.randint(0, height - hole_height);
                let x1 = rng.randint(0, width - hole_width);
                Hole {
                    x1,
                    y1,
                    x2: x1 + hole_width,
                    y2: y1 + hole_height,
                }
            })
            .collect();
        tracing::trace!(count = holes.len(), "sampled dropout holes");
        holes
    }
}

fn holes_of(params: &Params) -> &[Hole] {
    match params {
        Params::Holes(holes) => holes,
        Params::None => &[],
    }
}

/// Fill holes in an interleaved (H, W, C) buffer, clipped to its bounds
fn fill_interleaved<T: Copy>(
    data: &mut [T],
    width: usize,
    channels: usize,
    holes: &[Hole],
    value: T,
) {
    let row_len = width * channels;
    for hole in holes {
        let (x1, x2) = (hole.x1.min(width), hole.x2.min(width));
        for row in data.chunks_exact_mut(row_len).skip(hole.y1).take(hole.height()) {
            row[x1 * channels..x2 * channels].fill(value);
        }
    }
}

/// Fill holes in every plane of a (C, H, W) buffer, clipped to its bounds
fn fill_planar<T: Copy>(data: &mut [T], height: usize, width: usize, holes: &[Hole], value: T) {
    for plane in data.chunks_exact_mut(height * width) {
        for hole in holes {
            let (x1, x2) = (hole.x1.min(width), hole.x2.min(width));
            for y in hole.y1.min(height)..hole.y2.min(height) {
                plane[y * width + x1..y * width + x2].fill(value);
            }
        }
    }
}

/// Coarse dropout for the array backend
#[derive(Debug, Clone)]
pub struct CoarseDropout {
    config: CoarseDropoutConfig,
}

impl CoarseDropout {
    /// Create from a validated config
    pub fn new(config: CoarseDropoutConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Settings of this transform
    pub fn config(&self) -> &CoarseDropoutConfig {
        &self.config
    }
}

impl Transform<ImageArray> for CoarseDropout {
    fn name(&self) -> &'static str {
        "CoarseDropout"
    }

    fn probability(&self) -> f64 {
        self.config.p
    }

    fn always_apply(&self) -> bool {
        self.config.always_apply
    }

    fn sample_params(&self, height: usize, width: usize, rng: &mut Generator) -> Result<Params> {
        Ok(Params::Holes(self.config.sample_holes(height, width, rng)))
    }

    fn apply_with_params(&self, mut image: ImageArray, params: &Params) -> Result<ImageArray> {
        let holes = holes_of(params);
        let (width, channels) = (image.width(), image.channels());
        let fill = self.config.fill_value;
        match image.data_mut() {
            PixelData::U8(d) => fill_interleaved(d, width, channels, holes, saturate_u8(fill)),
            PixelData::F32(d) => fill_interleaved(d, width, channels, holes, fill),
        }
        Ok(image)
    }
}

/// Coarse dropout for the tensor backend
#[derive(Debug, Clone)]
pub struct CoarseDropoutTensor {
    config: CoarseDropoutConfig,
}

impl CoarseDropoutTensor {
    /// Create from a validated config
    pub fn new(config: CoarseDropoutConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Settings of this transform
    pub fn config(&self) -> &CoarseDropoutConfig {
        &self.config
    }
}

impl Transform<Tensor> for CoarseDropoutTensor {
    fn name(&self) -> &'static str {
        "CoarseDropoutTensor"
    }

    fn probability(&self) -> f64 {
        self.config.p
    }

    fn always_apply(&self) -> bool {
        self.config.always_apply
    }

    fn sample_params(&self, height: usize, width: usize, rng: &mut Generator) -> Result<Params> {
        Ok(Params::Holes(self.config.sample_holes(height, width, rng)))
    }

    fn apply_with_params(&self, tensor: Tensor, params: &Params) -> Result<Tensor> {
        let holes = holes_of(params);
        let (height, width) = (tensor.height(), tensor.width());
        let fill = self.config.fill_value;
        let shape = tensor.shape();
        let data = match tensor.into_data() {
            TensorData::U8(mut d) => {
                fill_planar(&mut d, height, width, holes, saturate_u8(fill));
                TensorData::U8(d)
            }
            TensorData::F32(mut d) => {
                fill_planar(&mut d, height, width, holes, fill);
                TensorData::F32(d)
            }
            TensorData::I32(_) => {
                return Err(Error::UnsupportedDType(format!(
                    "CoarseDropoutTensor is undefined for {:?} tensors",
                    DType::Int32
                )));
            }
        };
        Tensor::new(shape, data)
    }
}
