//! Parity testing framework
//!
//! Runs the same transform through both backends under the same seed and
//! compares the tensor output against the array output.

use std::fmt;

use anyhow::{bail, Context};
use oxaug_core::{from_tensor, to_tensor, Generator, ImageArray, PixelData, Tensor, Transform};
use serde::Serialize;

use crate::accuracy::{compare_f32, compare_u8, first_mismatch, DiffStats, ATOL, RTOL};

/// How close two outputs must be
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Tolerance {
    /// Bit-identical samples
    Exact,
    /// Quantized samples may differ by this many steps
    Steps(u8),
    /// `|a - b| <= atol + rtol * |b|`
    AllClose { rtol: f64, atol: f64 },
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance::AllClose {
            rtol: RTOL,
            atol: ATOL,
        }
    }
}

/// Result of a parity test
#[derive(Debug, Clone, Serialize)]
pub struct ParityResult {
    /// Name of the test
    pub test_name: String,
    /// Tolerance the test was judged by
    pub tolerance: Tolerance,
    /// Sample-wise difference statistics
    pub stats: DiffStats,
    /// Whether the test passed
    pub passed: bool,
    /// Optional notes about differences
    pub notes: Option<String>,
}

impl ParityResult {
    /// Check if this result indicates exact match
    pub fn is_exact(&self) -> bool {
        self.stats.is_exact()
    }
}

impl fmt::Display for ParityResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (max {:.3e}, mean {:.3e}, {} of {} differ)",
            self.test_name,
            if self.passed { "PASS" } else { "FAIL" },
            self.stats.max,
            self.stats.mean,
            self.stats.differing,
            self.stats.count
        )?;
        if let Some(notes) = &self.notes {
            write!(f, " [{notes}]")?;
        }
        Ok(())
    }
}

/// A parity test comparing the tensor backend to the array backend
#[derive(Debug, Clone)]
pub struct ParityTest {
    /// Test name
    pub name: String,
    /// Test description
    pub description: String,
    /// Required closeness
    pub tolerance: Tolerance,
    /// Whether this test is expected to fail
    pub expected_fail: bool,
    /// Reason for expected failure
    pub expected_fail_reason: Option<String>,
}

impl ParityTest {
    /// Create a new parity test
    pub fn new(name: impl Into<String>, tolerance: Tolerance) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            tolerance,
            expected_fail: false,
            expected_fail_reason: None,
        }
    }

    /// Add a description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Mark as expected to fail
    pub fn expected_fail(mut self, reason: impl Into<String>) -> Self {
        self.expected_fail = true;
        self.expected_fail_reason = Some(reason.into());
        self
    }

    /// Judge `result` against `reference`
    pub fn run(&self, reference: &ImageArray, result: &ImageArray) -> anyhow::Result<ParityResult> {
        if reference.shape() != result.shape() {
            bail!(
                "{}: shape {:?} != {:?}",
                self.name,
                result.shape(),
                reference.shape()
            );
        }

        let (stats, within, mut notes) = match (reference.data(), result.data()) {
            (PixelData::U8(r), PixelData::U8(a)) => {
                let stats = compare_u8(r, a);
                let within = match self.tolerance {
                    Tolerance::Exact => stats.is_exact(),
                    Tolerance::Steps(n) => stats.within(n as f64),
                    Tolerance::AllClose { rtol, atol } => r
                        .iter()
                        .zip(a)
                        .all(|(&x, &y)| (y as f64 - x as f64).abs() <= atol + rtol * x as f64),
                };
                (stats, within, None)
            }
            (PixelData::F32(r), PixelData::F32(a)) => {
                let stats = compare_f32(r, a);
                let mismatch = match self.tolerance {
                    Tolerance::Exact => bitwise_mismatch(r, a),
                    Tolerance::Steps(n) => first_mismatch(a, r, 0.0, n as f64),
                    Tolerance::AllClose { rtol, atol } => first_mismatch(a, r, rtol, atol),
                };
                let notes =
                    mismatch.map(|i| format!("first mismatch at {i}: {} vs {}", a[i], r[i]));
                (stats, mismatch.is_none(), notes)
            }
            _ => bail!("{}: pixel kinds differ between backends", self.name),
        };

        let passed = within != self.expected_fail;
        if self.expected_fail {
            notes = self.expected_fail_reason.clone().or(notes);
        }

        Ok(ParityResult {
            test_name: self.name.clone(),
            tolerance: self.tolerance,
            stats,
            passed,
            notes,
        })
    }
}

/// Index of the first sample whose bit pattern differs
fn bitwise_mismatch(reference: &[f32], result: &[f32]) -> Option<usize> {
    reference
        .iter()
        .zip(result)
        .position(|(r, a)| r.to_bits() != a.to_bits())
}

/// Outputs of both backends for one input
pub struct BackendOutputs {
    /// Array backend output
    pub array: ImageArray,
    /// Tensor backend output, converted back to channel-last
    pub tensor: ImageArray,
}

/// Apply `array` and `tensor` to the same image, each under a fresh generator
/// seeded with `seed`
pub fn run_both(
    array: &dyn Transform<ImageArray>,
    tensor: &dyn Transform<Tensor>,
    image: &ImageArray,
    seed: u64,
) -> anyhow::Result<BackendOutputs> {
    let a = array
        .apply(image.clone(), &mut Generator::seeded(seed))
        .with_context(|| format!("{} on {:?}", array.name(), image.shape()))?;
    let t = tensor
        .apply(to_tensor(image), &mut Generator::seeded(seed))
        .with_context(|| format!("{} on {:?}", tensor.name(), image.shape()))?;
    Ok(BackendOutputs {
        array: a,
        tensor: from_tensor(&t)?,
    })
}

/// Collection of parity results
#[derive(Debug, Default, Serialize)]
pub struct ParitySuite {
    results: Vec<ParityResult>,
}

impl ParitySuite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, result: ParityResult) {
        self.results.push(result);
    }

    pub fn results(&self) -> &[ParityResult] {
        &self.results
    }

    /// Check if every result passed
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    /// Print one line per result to stderr
    pub fn report(&self) {
        for result in &self.results {
            eprintln!("  {result}");
        }
        let passed = self.results.iter().filter(|r| r.passed).count();
        eprintln!("  {passed}/{} passed", self.results.len());
    }

    /// Results as pretty JSON
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_u8() {
        let a = ImageArray::from_u8(1, 2, 1, vec![1, 2]).unwrap();
        let result = ParityTest::new("same", Tolerance::Exact).run(&a, &a).unwrap();
        assert!(result.passed);
        assert!(result.is_exact());
    }

    #[test]
    fn test_steps_u8() {
        let a = ImageArray::from_u8(1, 2, 1, vec![1, 2]).unwrap();
        let b = ImageArray::from_u8(1, 2, 1, vec![2, 2]).unwrap();
        assert!(ParityTest::new("one", Tolerance::Steps(1)).run(&a, &b).unwrap().passed);
        assert!(!ParityTest::new("zero", Tolerance::Exact).run(&a, &b).unwrap().passed);
    }

    #[test]
    fn test_allclose_f32_reports_mismatch() {
        let a = ImageArray::from_f32(1, 2, 1, vec![1.0, 2.0]).unwrap();
        let b = ImageArray::from_f32(1, 2, 1, vec![1.0, 2.5]).unwrap();
        let result = ParityTest::new("far", Tolerance::default()).run(&a, &b).unwrap();
        assert!(!result.passed);
        assert!(result.notes.unwrap().contains("at 1"));
    }

    #[test]
    fn test_allclose_u8_scales_with_reference() {
        let a = ImageArray::from_u8(1, 2, 1, vec![10, 200]).unwrap();
        let b = ImageArray::from_u8(1, 2, 1, vec![10, 202]).unwrap();
        let relative = Tolerance::AllClose { rtol: 0.01, atol: 0.0 };
        assert!(ParityTest::new("relative", relative).run(&a, &b).unwrap().passed);

        let c = ImageArray::from_u8(1, 2, 1, vec![12, 200]).unwrap();
        assert!(!ParityTest::new("small", relative).run(&a, &c).unwrap().passed);
    }

    #[test]
    fn test_expected_fail_inverts() {
        let a = ImageArray::from_f32(1, 1, 1, vec![0.0]).unwrap();
        let b = ImageArray::from_f32(1, 1, 1, vec![1.0]).unwrap();
        let result = ParityTest::new("known", Tolerance::Exact)
            .expected_fail("differs on purpose")
            .run(&a, &b)
            .unwrap();
        assert!(result.passed);
    }

    #[test]
    fn test_kind_mismatch_is_error() {
        let a = ImageArray::from_f32(1, 1, 1, vec![0.0]).unwrap();
        let b = ImageArray::from_u8(1, 1, 1, vec![0]).unwrap();
        assert!(ParityTest::new("kinds", Tolerance::Exact).run(&a, &b).is_err());
    }

    #[test]
    fn test_shape_mismatch_is_error() {
        let a = ImageArray::from_u8(1, 2, 1, vec![0, 0]).unwrap();
        let b = ImageArray::from_u8(2, 1, 1, vec![0, 0]).unwrap();
        assert!(ParityTest::new("shapes", Tolerance::Exact).run(&a, &b).is_err());
    }
}
