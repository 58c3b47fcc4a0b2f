//! Stochastic image transforms
//!
//! Every transform exists once per backend: `Normalize` works on
//! [`ImageArray`](crate::ImageArray), `NormalizeTensor` on
//! [`Tensor`](crate::Tensor), and so on. Both variants share their
//! configuration and their parameter sampling, so the same generator state
//! yields the same decisions in either backend; only the pixel arithmetic is
//! written per layout.
//!
//! # Application protocol
//!
//! 1. Draw one uniform value. The transform runs if it is below `p`, or if
//!    `always_apply` is set. The draw happens either way.
//! 2. Sample parameters from the image dimensions (for example dropout
//!    holes).
//! 3. Apply the parameters to every target of the sample.

mod convert_color;
mod dropout;
mod normalize;

pub use convert_color::{ConvertColor, ConvertColorConfig, ConvertColorTensor};
pub use dropout::{CoarseDropout, CoarseDropoutConfig, CoarseDropoutTensor, HoleExtent};
pub use normalize::{ChannelValues, Normalize, NormalizeConfig, NormalizeTensor};

use crate::random::Generator;
use crate::types::ImageBuffer;
use crate::Result;

/// Rectangular region in pixel coordinates, `[x1, x2) × [y1, y2)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hole {
    pub x1: usize,
    pub y1: usize,
    pub x2: usize,
    pub y2: usize,
}

impl Hole {
    /// Width in pixels
    pub fn width(&self) -> usize {
        self.x2 - self.x1
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.y2 - self.y1
    }
}

/// Parameters sampled for one transform call
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Params {
    /// Deterministic transform, nothing sampled
    #[default]
    None,
    /// Regions to fill
    Holes(Vec<Hole>),
}

/// A stochastic transform over one buffer type
pub trait Transform<B: ImageBuffer>: Send + Sync {
    /// Transform name used in logs
    fn name(&self) -> &'static str;

    /// Probability of being applied
    fn probability(&self) -> f64;

    /// Apply regardless of the probability roll
    fn always_apply(&self) -> bool {
        false
    }

    /// Sample parameters for an image of the given size
    fn sample_params(&self, _height: usize, _width: usize, _rng: &mut Generator) -> Result<Params> {
        Ok(Params::None)
    }

    /// Apply with already-sampled parameters
    fn apply_with_params(&self, image: B, params: &Params) -> Result<B>;

    /// Roll the probability
    fn should_apply(&self, rng: &mut Generator) -> bool {
        let roll = rng.random();
        roll < self.probability() || self.always_apply()
    }

    /// Roll, sample and apply in one call
    fn apply(&self, image: B, rng: &mut Generator) -> Result<B> {
        if !self.should_apply(rng) {
            return Ok(image);
        }
        let params = self.sample_params(image.height(), image.width(), rng)?;
        self.apply_with_params(image, &params)
    }
}

pub(crate) fn validate_probability(p: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(crate::Error::InvalidParameter(format!(
            "probability must be in [0, 1], got {p}"
        )));
    }
    Ok(())
}

pub(crate) fn default_probability() -> f64 {
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageArray;

    struct Identity {
        p: f64,
        always: bool,
    }

    impl Transform<ImageArray> for Identity {
        fn name(&self) -> &'static str {
            "Identity"
        }

        fn probability(&self) -> f64 {
            self.p
        }

        fn always_apply(&self) -> bool {
            self.always
        }

        fn apply_with_params(&self, image: ImageArray, _params: &Params) -> Result<ImageArray> {
            let data = image.as_u8().unwrap().iter().map(|v| v + 1).collect();
            ImageArray::from_u8(image.height(), image.width(), image.channels(), data)
        }
    }

    fn tiny() -> ImageArray {
        ImageArray::from_u8(1, 1, 1, vec![0]).unwrap()
    }

    #[test]
    fn test_probability_zero_skips() {
        let t = Identity { p: 0.0, always: false };
        let mut rng = Generator::seeded(0);
        let out = t.apply(tiny(), &mut rng).unwrap();
        assert_eq!(out.as_u8().unwrap(), &[0]);
    }

    #[test]
    fn test_always_apply_overrides() {
        let t = Identity { p: 0.0, always: true };
        let mut rng = Generator::seeded(0);
        let out = t.apply(tiny(), &mut rng).unwrap();
        assert_eq!(out.as_u8().unwrap(), &[1]);
    }

    #[test]
    fn test_roll_consumed_even_when_forced() {
        let forced = Identity { p: 0.0, always: true };
        let mut a = Generator::seeded(3);
        let mut b = Generator::seeded(3);
        forced.apply(tiny(), &mut a).unwrap();
        b.random();
        assert_eq!(a.random(), b.random());
    }

    #[test]
    fn test_hole_dims() {
        let hole = Hole {
            x1: 2,
            y1: 3,
            x2: 7,
            y2: 4,
        };
        assert_eq!(hole.width(), 5);
        assert_eq!(hole.height(), 1);
    }

    #[test]
    fn test_validate_probability() {
        assert!(validate_probability(0.5).is_ok());
        assert!(validate_probability(1.5).is_err());
        assert!(validate_probability(-0.1).is_err());
    }
}
