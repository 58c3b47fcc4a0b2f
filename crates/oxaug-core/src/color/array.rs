//! Reference RGB ↔ HLS conversion over interleaved buffers
//!
//! Kernels walk (H, W, 3) samples pixel by pixel. Quantized inputs are
//! dequantized with [`dequantize`], converted in f32, and written back with
//! [`saturate_u8`].

use multiversion::multiversion;

use super::{ensure_three_channels, HUE_RANGE_DEGREES};
use crate::image::{ImageArray, PixelData};
use crate::quantize::{dequantize, saturate_u8};
use crate::Result;

/// (b, g, r) indices into `[p2, p1, rising, falling]` per hue sector
const SECTOR_DATA: [[usize; 3]; 6] = [
    [1, 3, 0],
    [1, 0, 2],
    [3, 0, 1],
    [0, 2, 1],
    [0, 1, 3],
    [2, 1, 0],
];

/// RGB in [0, 1] to (H · hscale, L, S)
#[inline(always)]
pub fn rgb_to_hls_pixel(r: f32, g: f32, b: f32, hscale: f32) -> [f32; 3] {
    let vmax = r.max(g).max(b);
    let vmin = r.min(g).min(b);
    let mut diff = vmax - vmin;
    let l = (vmax + vmin) * 0.5;
    let mut h = 0.0f32;
    let mut s = 0.0f32;

    if diff > f32::EPSILON {
        s = if l < 0.5 {
            diff / (vmax + vmin)
        } else {
            diff / (2.0 - vmax - vmin)
        };
        diff = 60.0 / diff;

        h = if vmax == r {
            (g - b) * diff
        } else if vmax == g {
            (b - r) * diff + 120.0
        } else {
            (r - g) * diff + 240.0
        };
        if h < 0.0 {
            h += 360.0;
        }
    }

    [h * hscale, l, s]
}

/// (H · hscale in sectors, L, S) to RGB in [0, 1]
#[inline(always)]
pub fn hls_to_rgb_pixel(h: f32, l: f32, s: f32, hscale: f32) -> [f32; 3] {
    if s == 0.0 {
        return [l, l, l];
    }

    let p2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p1 = 2.0 * l - p2;

    let h = (h * hscale).rem_euclid(6.0);
    let sector = (h.floor() as usize).min(5);
    let h = h - sector as f32;

    let tab = [p2, p1, p1 + (p2 - p1) * (1.0 - h), p1 + (p2 - p1) * h];
    let [bi, gi, ri] = SECTOR_DATA[sector];
    [tab[ri], tab[gi], tab[bi]]
}

/// RGB → HLS over interleaved f32 samples
#[multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon",))]
pub fn rgb_to_hls_f32_batch(src: &[f32], dst: &mut [f32]) {
    assert!(src.len() % 3 == 0);
    assert!(dst.len() >= src.len());

    for (s, d) in src.chunks_exact(3).zip(dst.chunks_exact_mut(3)) {
        d.copy_from_slice(&rgb_to_hls_pixel(s[0], s[1], s[2], 1.0));
    }
}

/// RGB → HLS over interleaved bytes
#[multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon",))]
pub fn rgb_to_hls_u8_batch(src: &[u8], dst: &mut [u8], hue_range: f32) {
    assert!(src.len() % 3 == 0);
    assert!(dst.len() >= src.len());

    let hscale = hue_range / HUE_RANGE_DEGREES;
    for (s, d) in src.chunks_exact(3).zip(dst.chunks_exact_mut(3)) {
        let [r, g, b] = [dequantize(s[0]), dequantize(s[1]), dequantize(s[2])];
        let [h, l, sat] = rgb_to_hls_pixel(r, g, b, hscale);
        d[0] = saturate_u8(h);
        d[1] = saturate_u8(l * 255.0);
        d[2] = saturate_u8(sat * 255.0);
    }
}

/// HLS → RGB over interleaved f32 samples (H in degrees)
#[multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon",))]
pub fn hls_to_rgb_f32_batch(src: &[f32], dst: &mut [f32]) {
    assert!(src.len() % 3 == 0);
    assert!(dst.len() >= src.len());

    let hscale = 6.0 / HUE_RANGE_DEGREES;
    for (s, d) in src.chunks_exact(3).zip(dst.chunks_exact_mut(3)) {
        d.copy_from_slice(&hls_to_rgb_pixel(s[0], s[1], s[2], hscale));
    }
}

/// HLS → RGB over interleaved bytes
#[multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon",))]
pub fn hls_to_rgb_u8_batch(src: &[u8], dst: &mut [u8], hue_range: f32) {
    assert!(src.len() % 3 == 0);
    assert!(dst.len() >= src.len());

    let hscale = 6.0 / hue_range;
    for (s, d) in src.chunks_exact(3).zip(dst.chunks_exact_mut(3)) {
        let [r, g, b] = hls_to_rgb_pixel(s[0] as f32, dequantize(s[1]), dequantize(s[2]), hscale);
        d[0] = saturate_u8(r * 255.0);
        d[1] = saturate_u8(g * 255.0);
        d[2] = saturate_u8(b * 255.0);
    }
}

pub(crate) fn rgb_to_hls_with_range(
    image: &ImageArray,
    hue_range: f32,
    operation: &'static str,
) -> Result<ImageArray> {
    ensure_three_channels(image, operation)?;
    let data = match image.data() {
        PixelData::U8(src) => {
            let mut dst = vec![0u8; src.len()];
            rgb_to_hls_u8_batch(src, &mut dst, hue_range);
            PixelData::U8(dst)
        }
        PixelData::F32(src) => {
            let mut dst = vec![0.0f32; src.len()];
            rgb_to_hls_f32_batch(src, &mut dst);
            PixelData::F32(dst)
        }
    };
    image.with_data(data)
}

pub(crate) fn hls_to_rgb_with_range(
    image: &ImageArray,
    hue_range: f32,
    operation: &'static str,
) -> Result<ImageArray> {
    ensure_three_channels(image, operation)?;
    let data = match image.data() {
        PixelData::U8(src) => {
            let mut dst = vec![0u8; src.len()];
            hls_to_rgb_u8_batch(src, &mut dst, hue_range);
            PixelData::U8(dst)
        }
        PixelData::F32(src) => {
            let mut dst = vec![0.0f32; src.len()];
            hls_to_rgb_f32_batch(src, &mut dst);
            PixelData::F32(dst)
        }
    };
    image.with_data(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{hls_to_rgb, rgb_to_hls};
    use crate::Error;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_primaries() {
        let red = rgb_to_hls_pixel(1.0, 0.0, 0.0, 1.0);
        assert_eq!(red, [0.0, 0.5, 1.0]);

        let green = rgb_to_hls_pixel(0.0, 1.0, 0.0, 1.0);
        assert_eq!(green, [120.0, 0.5, 1.0]);

        let blue = rgb_to_hls_pixel(0.0, 0.0, 1.0, 1.0);
        assert_eq!(blue, [240.0, 0.5, 1.0]);
    }

    #[test]
    fn test_achromatic() {
        let gray = rgb_to_hls_pixel(0.3, 0.3, 0.3, 1.0);
        assert_eq!(gray, [0.0, 0.3, 0.0]);
    }

    #[test]
    fn test_magenta_wraps_hue() {
        // max is red, g < b so the raw hue is negative
        let [h, l, s] = rgb_to_hls_pixel(1.0, 0.0, 0.5, 1.0);
        assert!((h - 330.0).abs() < 1e-4, "h = {}", h);
        assert!((l - 0.5).abs() < EPSILON);
        assert!((s - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_light_saturation_branch() {
        // l > 0.5 uses diff / (2 - max - min)
        let [_, l, s] = rgb_to_hls_pixel(1.0, 0.8, 0.6, 1.0);
        assert!((l - 0.8).abs() < EPSILON);
        assert!((s - 0.4 / 0.4).abs() < 1e-5);
    }

    #[test]
    fn test_zero_saturation_ignores_hue() {
        for h in [0.0, 59.0, 123.4, 300.0, 359.9, 720.0, -45.0] {
            assert_eq!(hls_to_rgb_pixel(h, 0.42, 0.0, 1.0 / 60.0), [0.42, 0.42, 0.42]);
        }
    }

    #[test]
    fn test_inverse_sectors() {
        let hscale = 6.0 / 360.0;
        let cases: [(f32, [f32; 3]); 6] = [
            (0.0, [1.0, 0.0, 0.0]),
            (60.0, [1.0, 1.0, 0.0]),
            (120.0, [0.0, 1.0, 0.0]),
            (180.0, [0.0, 1.0, 1.0]),
            (240.0, [0.0, 0.0, 1.0]),
            (300.0, [1.0, 0.0, 1.0]),
        ];
        for (h, expected) in cases {
            let rgb = hls_to_rgb_pixel(h, 0.5, 1.0, hscale);
            for c in 0..3 {
                assert!(
                    (rgb[c] - expected[c]).abs() < 1e-5,
                    "h={}: {:?} != {:?}",
                    h,
                    rgb,
                    expected
                );
            }
        }
    }

    #[test]
    fn test_hue_reduced_modulo() {
        let hscale = 6.0 / 360.0;
        let a = hls_to_rgb_pixel(30.0, 0.4, 0.7, hscale);
        let b = hls_to_rgb_pixel(390.0, 0.4, 0.7, hscale);
        for c in 0..3 {
            assert!((a[c] - b[c]).abs() < 1e-5);
        }
    }

    #[test]
    fn test_hue_360_is_sector_zero() {
        let hscale = 6.0 / 360.0;
        for (l, s) in [(0.4, 0.7), (0.5, 1.0), (0.8, 0.3)] {
            let wrapped = hls_to_rgb_pixel(360.0, l, s, hscale);
            let zero = hls_to_rgb_pixel(0.0, l, s, hscale);
            for c in 0..3 {
                assert!((wrapped[c] - zero[c]).abs() < 1e-5, "{wrapped:?} vs {zero:?}");
            }
        }
        let red = hls_to_rgb_pixel(360.0, 0.5, 1.0, hscale);
        assert!((red[0] - 1.0).abs() < 1e-5 && red[1].abs() < 1e-5 && red[2].abs() < 1e-5);
    }

    #[test]
    fn test_f32_roundtrip() {
        let mut src = Vec::new();
        for r in 0..8 {
            for g in 0..8 {
                for b in 0..8 {
                    src.extend_from_slice(&[r as f32 / 7.0, g as f32 / 7.0, b as f32 / 7.0]);
                }
            }
        }
        let img = ImageArray::from_f32(8, 64, 3, src.clone()).unwrap();
        let back = hls_to_rgb(&rgb_to_hls(&img).unwrap()).unwrap();
        for (a, b) in src.iter().zip(back.as_f32().unwrap()) {
            assert!((a - b).abs() < 1e-5, "{} != {}", a, b);
        }
    }

    #[test]
    fn test_u8_red() {
        let img = ImageArray::from_u8(1, 1, 3, vec![255, 0, 0]).unwrap();
        let hls = rgb_to_hls(&img).unwrap();
        assert_eq!(hls.as_u8().unwrap(), &[0, 128, 255]);
    }

    #[test]
    fn test_u8_blue_half_hue() {
        let img = ImageArray::from_u8(1, 1, 3, vec![0, 0, 255]).unwrap();
        let hls = rgb_to_hls(&img).unwrap();
        assert_eq!(hls.as_u8().unwrap()[0], 120);

        let full = crate::color::ColorConversion::RgbToHlsFull
            .apply_array(&img)
            .unwrap();
        // 240 * 256 / 360 = 170.67
        assert_eq!(full.as_u8().unwrap()[0], 171);
    }

    #[test]
    fn test_u8_gray_inverse_exact() {
        for v in [0u8, 1, 77, 128, 254, 255] {
            for h in [0u8, 90, 179, 255] {
                let img = ImageArray::from_u8(1, 1, 3, vec![h, v, 0]).unwrap();
                let rgb = hls_to_rgb(&img).unwrap();
                assert_eq!(rgb.as_u8().unwrap(), &[v, v, v]);
            }
        }
    }

    #[test]
    fn test_rejects_gray_image() {
        let img = ImageArray::new_gray(2, 2, PixelData::U8(vec![0; 4])).unwrap();
        match rgb_to_hls(&img) {
            Err(Error::ChannelMismatch {
                expected: 3,
                actual: 1,
                ..
            }) => {}
            other => panic!("expected channel mismatch, got {:?}", other),
        }
    }
}
