//! Test image generation
//!
//! Every generator is seeded so a failing parity case can be reproduced.

use oxaug_core::{ImageArray, PixelData};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Test pattern types
#[derive(Debug, Clone, Copy)]
pub enum TestPattern {
    /// Uniform random bytes with seed
    Random(u64),
    /// RGB color cube corners (8 colors)
    ColorCube,
    /// Hue ramp at full saturation
    HueRamp,
    /// Equal channels, ramp 0-255
    Grayscale,
}

/// Generate an interleaved RGB8 buffer
pub fn generate_pattern(pattern: TestPattern, width: usize, height: usize) -> Vec<u8> {
    let pixel_count = width * height;
    let mut data = vec![0u8; pixel_count * 3];

    match pattern {
        TestPattern::Random(seed) => {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            rng.fill_bytes(&mut data);
        }
        TestPattern::ColorCube => {
            let corners: [[u8; 3]; 8] = [
                [0, 0, 0],
                [255, 0, 0],
                [0, 255, 0],
                [0, 0, 255],
                [255, 255, 0],
                [255, 0, 255],
                [0, 255, 255],
                [255, 255, 255],
            ];
            for (i, chunk) in data.chunks_exact_mut(3).enumerate() {
                chunk.copy_from_slice(&corners[i % 8]);
            }
        }
        TestPattern::HueRamp => {
            for (i, chunk) in data.chunks_exact_mut(3).enumerate() {
                let hue = (i as f32 / pixel_count as f32) * 360.0;
                chunk.copy_from_slice(&saturated_hue(hue));
            }
        }
        TestPattern::Grayscale => {
            for (i, chunk) in data.chunks_exact_mut(3).enumerate() {
                let v = ((i as f32 / pixel_count as f32) * 255.0) as u8;
                chunk.fill(v);
            }
        }
    }

    data
}

/// Fully saturated, mid-lightness color at `h` degrees
fn saturated_hue(h: f32) -> [u8; 3] {
    let x = 1.0 - ((h / 60.0) % 2.0 - 1.0).abs();
    let (r, g, b) = if h < 60.0 {
        (1.0, x, 0.0)
    } else if h < 120.0 {
        (x, 1.0, 0.0)
    } else if h < 180.0 {
        (0.0, 1.0, x)
    } else if h < 240.0 {
        (0.0, x, 1.0)
    } else if h < 300.0 {
        (x, 0.0, 1.0)
    } else {
        (1.0, 0.0, x)
    };
    [(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8]
}

/// Random quantized image with `channels` channels, (H, W) when 1
pub fn random_u8(height: usize, width: usize, channels: usize, seed: u64) -> ImageArray {
    let mut data = vec![0u8; height * width * channels];
    ChaCha8Rng::seed_from_u64(seed).fill_bytes(&mut data);
    build(height, width, channels, PixelData::U8(data))
}

/// Random continuous image with samples uniform in [0, 1)
pub fn random_f32(height: usize, width: usize, channels: usize, seed: u64) -> ImageArray {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let data = (0..height * width * channels)
        .map(|_| rng.r#gen::<f32>())
        .collect();
    build(height, width, channels, PixelData::F32(data))
}

/// Random continuous HLS image: H in [0, 360), L and S in [0, 1)
pub fn random_hls_f32(height: usize, width: usize, seed: u64) -> ImageArray {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(height * width * 3);
    for _ in 0..height * width {
        data.push(rng.r#gen::<f32>() * 360.0);
        data.push(rng.r#gen::<f32>());
        data.push(rng.r#gen::<f32>());
    }
    build(height, width, 3, PixelData::F32(data))
}

/// Random quantized HLS image with H bytes below `hue_range`
pub fn random_hls_u8(height: usize, width: usize, hue_range: u16, seed: u64) -> ImageArray {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(height * width * 3);
    for _ in 0..height * width {
        data.push(rng.gen_range(0..hue_range.min(256)) as u8);
        data.push(rng.r#gen::<u8>());
        data.push(rng.r#gen::<u8>());
    }
    build(height, width, 3, PixelData::U8(data))
}

/// Wrap an RGB8 pattern as an image
pub fn pattern_image(pattern: TestPattern, width: usize, height: usize) -> ImageArray {
    let data = generate_pattern(pattern, width, height);
    build(height, width, 3, PixelData::U8(data))
}

fn build(height: usize, width: usize, channels: usize, data: PixelData) -> ImageArray {
    let image = if channels == 1 {
        ImageArray::new_gray(height, width, data)
    } else {
        ImageArray::new(height, width, channels, data)
    };
    image.unwrap_or_else(|e| panic!("generated {height}x{width}x{channels} image: {e}"))
}

/// Standard test sizes (height, width)
pub mod sizes {
    pub const TINY: (usize, usize) = (8, 8);
    /// Odd width exercises row remainders
    pub const RGB_U8: (usize, usize) = (128, 323);
    pub const RGB_F32: (usize, usize) = (256, 111);
    pub const LARGE: (usize, usize) = (1000, 1000);
}
