//! Accuracy measurement between two sample buffers
//!
//! Differences are absolute per sample. Continuous buffers are judged with
//! an allclose check, quantized buffers by their largest step difference.

use rayon::prelude::*;

/// Relative tolerance for continuous comparisons
pub const RTOL: f64 = 1.3e-6;

/// Absolute tolerance for continuous comparisons
pub const ATOL: f64 = 1e-5;

/// Statistics from a sample-wise comparison
#[derive(Debug, Clone, serde::Serialize)]
pub struct DiffStats {
    /// Mean absolute difference
    pub mean: f64,
    /// Maximum absolute difference
    pub max: f64,
    /// 95th percentile absolute difference
    pub p95: f64,
    /// Number of samples that differ at all
    pub differing: usize,
    /// Number of samples
    pub count: usize,
}

impl DiffStats {
    /// Check if both buffers are identical
    pub fn is_exact(&self) -> bool {
        self.differing == 0
    }

    /// Check if no sample differs by more than `tolerance`
    pub fn within(&self, tolerance: f64) -> bool {
        self.max <= tolerance
    }

    fn from_diffs(mut diffs: Vec<f64>) -> Self {
        let count = diffs.len();
        let differing = diffs.iter().filter(|d| **d != 0.0).count();
        diffs.par_sort_unstable_by(|a, b| a.total_cmp(b));

        let mean = if count == 0 {
            0.0
        } else {
            diffs.iter().sum::<f64>() / count as f64
        };
        let max = diffs.last().copied().unwrap_or(0.0);
        let p95 = diffs.get((count as f64 * 0.95) as usize).copied().unwrap_or(max);

        Self {
            mean,
            max,
            p95,
            differing,
            count,
        }
    }
}

/// Compare two quantized buffers
pub fn compare_u8(reference: &[u8], result: &[u8]) -> DiffStats {
    assert_eq!(reference.len(), result.len());
    let diffs = reference
        .par_iter()
        .zip(result.par_iter())
        .map(|(a, b)| (*a as f64 - *b as f64).abs())
        .collect();
    DiffStats::from_diffs(diffs)
}

/// Compare two continuous buffers
pub fn compare_f32(reference: &[f32], result: &[f32]) -> DiffStats {
    assert_eq!(reference.len(), result.len());
    let diffs = reference
        .par_iter()
        .zip(result.par_iter())
        .map(|(a, b)| (*a as f64 - *b as f64).abs())
        .collect();
    DiffStats::from_diffs(diffs)
}

/// `|actual - expected| <= atol + rtol * |expected|` for every sample
///
/// NaN never compares close.
pub fn allclose(actual: &[f32], expected: &[f32], rtol: f64, atol: f64) -> bool {
    actual.len() == expected.len()
        && actual.par_iter().zip(expected.par_iter()).all(|(a, e)| {
            let (a, e) = (*a as f64, *e as f64);
            (a - e).abs() <= atol + rtol * e.abs()
        })
}

/// First index that fails the allclose check, for reporting
pub fn first_mismatch(actual: &[f32], expected: &[f32], rtol: f64, atol: f64) -> Option<usize> {
    actual
        .iter()
        .zip(expected)
        .position(|(a, e)| !((*a as f64 - *e as f64).abs() <= atol + rtol * (*e as f64).abs()))
}
