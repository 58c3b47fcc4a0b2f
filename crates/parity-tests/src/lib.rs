//! # parity-tests
//!
//! Cross-backend parity testing framework for oxaug.
//!
//! This crate provides:
//! - Parity tests comparing tensor-backend output against the array backend
//! - Difference statistics and allclose checks
//! - Seeded test image generation
//! - A third-party HSL reference (`palette`) for the colorspace kernels
//!
//! ## Tolerances
//!
//! - **Continuous**: `|a - b| <= 1e-5 + 1.3e-6 * |b|`
//! - **Quantized RGB → HLS**: at most one step per channel
//! - **Quantized HLS → RGB**: identical
//!
//! ## Test Categories
//!
//! 1. **Colorspace**: RGB ↔ HLS round trips and backend parity
//! 2. **Transforms**: Normalize and CoarseDropout under seed 0
//! 3. **Pipelines**: JSON-built pipelines on both backends
//! 4. **Reference**: agreement with `palette`

pub mod accuracy;
pub mod parity;
pub mod patterns;
pub mod reference;

pub use accuracy::{allclose, compare_f32, compare_u8, DiffStats, ATOL, RTOL};
pub use parity::{run_both, BackendOutputs, ParityResult, ParitySuite, ParityTest, Tolerance};
