//! Third-party reference conversions
//!
//! `palette` implements HSL independently of oxaug. Its hue is returned in
//! (-180, 180] and normalized here to [0, 360). Continuous buffers only.

use anyhow::{bail, ensure};
use oxaug_core::{ImageArray, ImageBuffer, PixelData};
use palette::{FromColor, Hsl, Srgb};

/// Continuous (H, W, 3) samples of `image`
fn rgb_samples(image: &ImageArray) -> anyhow::Result<&[f32]> {
    ensure!(
        image.channels() == 3 && !image.is_planar_gray(),
        "reference conversion needs 3 channels, got shape {:?}",
        image.shape()
    );
    match image.data() {
        PixelData::F32(data) => Ok(data),
        PixelData::U8(_) => bail!("reference conversion needs continuous samples"),
    }
}

/// RGB in [0, 1] to (H degrees, L, S)
pub fn rgb_to_hls_pixel(r: f32, g: f32, b: f32) -> [f32; 3] {
    let hsl: Hsl = Hsl::from_color(Srgb::new(r, g, b));
    [
        hsl.hue.into_positive_degrees(),
        hsl.lightness,
        hsl.saturation,
    ]
}

/// (H degrees, L, S) to RGB in [0, 1]
pub fn hls_to_rgb_pixel(h: f32, l: f32, s: f32) -> [f32; 3] {
    let hsl: Hsl = Hsl::new(h, s, l);
    let rgb: Srgb = Srgb::from_color(hsl);
    [rgb.red, rgb.green, rgb.blue]
}

/// Convert a continuous RGB image to HLS with `palette`
pub fn rgb_to_hls(image: &ImageArray) -> anyhow::Result<ImageArray> {
    let src = rgb_samples(image)?;
    let data = src
        .chunks_exact(3)
        .flat_map(|px| rgb_to_hls_pixel(px[0], px[1], px[2]))
        .collect();
    Ok(ImageArray::from_f32(image.height(), image.width(), 3, data)?)
}

/// Convert a continuous HLS image to RGB with `palette`
pub fn hls_to_rgb(image: &ImageArray) -> anyhow::Result<ImageArray> {
    let src = rgb_samples(image)?;
    let data = src
        .chunks_exact(3)
        .flat_map(|px| hls_to_rgb_pixel(px[0], px[1], px[2]))
        .collect();
    Ok(ImageArray::from_f32(image.height(), image.width(), 3, data)?)
}

/// Smallest distance between two hues in degrees
pub fn hue_distance(a: f32, b: f32) -> f32 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primaries() {
        let [h, l, s] = rgb_to_hls_pixel(0.0, 0.0, 1.0);
        assert!((h - 240.0).abs() < 1e-3);
        assert!((l - 0.5).abs() < 1e-6);
        assert!((s - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_inverse_primary() {
        let rgb = hls_to_rgb_pixel(120.0, 0.5, 1.0);
        for (a, e) in rgb.iter().zip([0.0, 1.0, 0.0]) {
            assert!((a - e).abs() < 1e-5);
        }
    }

    #[test]
    fn test_hue_distance_wraps() {
        assert_eq!(hue_distance(359.0, 1.0), 2.0);
        assert_eq!(hue_distance(10.0, 30.0), 20.0);
    }

    #[test]
    fn test_rejects_u8() {
        let img = ImageArray::from_u8(1, 1, 3, vec![0, 0, 0]).unwrap();
        assert!(rgb_to_hls(&img).is_err());
    }
}
