//! RGB ↔ HLS conversion over planar tensors
//!
//! The three input planes are read side by side and the three output planes
//! are written row by row in parallel. Byte tensors are widened to float the
//! way a tensor framework does it (`x as f32 / 255`) before conversion.

use rayon::prelude::*;

use super::{ensure_three_channels, HUE_RANGE_DEGREES};
use crate::quantize::{dequantize, saturate_u8};
use crate::tensor::{DType, Tensor, TensorData};
use crate::{Error, Result};

/// Channel picked from `[max, min, rising, falling]` for r, g and b
const SECTOR_PICK: [[usize; 3]; 6] = [
    [0, 2, 1],
    [3, 0, 1],
    [1, 0, 2],
    [1, 3, 0],
    [2, 1, 0],
    [0, 1, 3],
];

/// Convert an RGB tensor to HLS
pub fn rgb_to_hls(tensor: &Tensor) -> Result<Tensor> {
    rgb_to_hls_with_range(tensor, super::HUE_RANGE_HALF, "rgb_to_hls")
}

/// Convert an HLS tensor to RGB
pub fn hls_to_rgb(tensor: &Tensor) -> Result<Tensor> {
    hls_to_rgb_with_range(tensor, super::HUE_RANGE_HALF, "hls_to_rgb")
}

fn unsupported(operation: &'static str, dtype: DType) -> Error {
    Error::UnsupportedDType(format!("{operation} is undefined for {dtype:?} tensors"))
}

pub(crate) fn rgb_to_hls_with_range(
    tensor: &Tensor,
    hue_range: f32,
    operation: &'static str,
) -> Result<Tensor> {
    ensure_three_channels(tensor, operation)?;
    let width = tensor.shape()[2];
    let data = match tensor.data() {
        TensorData::F32(src) => {
            TensorData::F32(map_planes(src, width, |r, g, b| hls_from_rgb(r, g, b, 1.0)))
        }
        TensorData::U8(src) => {
            let hscale = hue_range / HUE_RANGE_DEGREES;
            let hls = map_planes(src, width, |r, g, b| {
                let [h, l, s] = hls_from_rgb(
                    r as f32 / 255.0,
                    g as f32 / 255.0,
                    b as f32 / 255.0,
                    hscale,
                );
                [saturate_u8(h), saturate_u8(l * 255.0), saturate_u8(s * 255.0)]
            });
            TensorData::U8(hls)
        }
        TensorData::I32(_) => return Err(unsupported(operation, DType::Int32)),
    };
    tensor.with_data(data)
}

pub(crate) fn hls_to_rgb_with_range(
    tensor: &Tensor,
    hue_range: f32,
    operation: &'static str,
) -> Result<Tensor> {
    ensure_three_channels(tensor, operation)?;
    let width = tensor.shape()[2];
    let data = match tensor.data() {
        TensorData::F32(src) => {
            let hscale = 6.0 / HUE_RANGE_DEGREES;
            TensorData::F32(map_planes(src, width, |h, l, s| rgb_from_hls(h, l, s, hscale)))
        }
        TensorData::U8(src) => {
            let hscale = 6.0 / hue_range;
            let rgb = map_planes(src, width, |h, l, s| {
                let rgb = rgb_from_hls(h as f32, dequantize(l), dequantize(s), hscale);
                rgb.map(|v| saturate_u8(v * 255.0))
            });
            TensorData::U8(rgb)
        }
        TensorData::I32(_) => return Err(unsupported(operation, DType::Int32)),
    };
    tensor.with_data(data)
}

/// Apply `f` to every (c0, c1, c2) triple of a (3, H, W) buffer
fn map_planes<T, F>(src: &[T], width: usize, f: F) -> Vec<T>
where
    T: Copy + Default + Send + Sync,
    F: Fn(T, T, T) -> [T; 3] + Send + Sync,
{
    let plane = src.len() / 3;
    let (p0, rest) = src.split_at(plane);
    let (p1, p2) = rest.split_at(plane);

    let mut dst = vec![T::default(); src.len()];
    let (o0, rest) = dst.split_at_mut(plane);
    let (o1, o2) = rest.split_at_mut(plane);

    o0.par_chunks_mut(width)
        .zip(o1.par_chunks_mut(width))
        .zip(o2.par_chunks_mut(width))
        .enumerate()
        .for_each(|(row, ((r0, r1), r2))| {
            let base = row * width;
            for x in 0..r0.len() {
                let i = base + x;
                let [a, b, c] = f(p0[i], p1[i], p2[i]);
                r0[x] = a;
                r1[x] = b;
                r2[x] = c;
            }
        });
    dst
}

#[inline]
fn hls_from_rgb(r: f32, g: f32, b: f32, hscale: f32) -> [f32; 3] {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let lightness = (max + min) * 0.5;
    let chroma = max - min;

    if chroma <= f32::EPSILON {
        return [0.0, lightness, 0.0];
    }

    let saturation = if lightness < 0.5 {
        chroma / (max + min)
    } else {
        chroma / (2.0 - max - min)
    };

    let k = 60.0 / chroma;
    let hue = if max == r {
        (g - b) * k
    } else if max == g {
        (b - r) * k + 120.0
    } else {
        (r - g) * k + 240.0
    };
    let hue = if hue < 0.0 { hue + 360.0 } else { hue };

    [hue * hscale, lightness, saturation]
}

#[inline]
fn rgb_from_hls(h: f32, l: f32, s: f32, hscale: f32) -> [f32; 3] {
    if s == 0.0 {
        return [l; 3];
    }

    let max = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let min = 2.0 * l - max;

    let h = (h * hscale).rem_euclid(6.0);
    let sector = (h.floor() as usize).min(5);
    let frac = h - sector as f32;

    let values = [
        max,
        min,
        min + (max - min) * frac,
        min + (max - min) * (1.0 - frac),
    ];
    SECTOR_PICK[sector].map(|i| values[i])
}
