//! 8-bit quantization helpers shared by both backends

/// Scale from a byte to the unit interval
pub const UNIT_SCALE: f32 = 1.0 / 255.0;

/// Convert a byte sample to the unit interval
#[inline(always)]
pub fn dequantize(v: u8) -> f32 {
    v as f32 * UNIT_SCALE
}

/// Round to nearest (ties to even) and saturate into a byte
///
/// NaN saturates to 0.
#[inline(always)]
pub fn saturate_u8(v: f32) -> u8 {
    v.round_ties_even().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dequantize_endpoints() {
        assert_eq!(dequantize(0), 0.0);
        assert!((dequantize(255) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_saturate_rounding() {
        assert_eq!(saturate_u8(0.4), 0);
        assert_eq!(saturate_u8(0.5), 0);
        assert_eq!(saturate_u8(1.5), 2);
        assert_eq!(saturate_u8(2.5), 2);
        assert_eq!(saturate_u8(254.6), 255);
    }

    #[test]
    fn test_saturate_clamps() {
        assert_eq!(saturate_u8(-3.0), 0);
        assert_eq!(saturate_u8(300.0), 255);
        assert_eq!(saturate_u8(f32::NAN), 0);
    }

    #[test]
    fn test_roundtrip_every_byte() {
        for v in 0..=255u8 {
            assert_eq!(saturate_u8(dequantize(v) * 255.0), v);
        }
    }
}
