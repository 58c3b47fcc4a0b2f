//! Colorspace and Transform Benchmarks
//!
//! Compares the interleaved reference kernels against the planar tensor
//! kernels on the same images.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use oxaug_core::color::{array, tensor};
use oxaug_core::{
    to_tensor, CoarseDropout, CoarseDropoutConfig, CoarseDropoutTensor, Generator, ImageArray,
    Normalize, NormalizeConfig, NormalizeTensor, Transform,
};

fn generate_rgb8_image(side: usize) -> ImageArray {
    let data = (0..side * side * 3).map(|i| ((i * 37) % 256) as u8).collect();
    ImageArray::from_u8(side, side, 3, data).unwrap()
}

fn generate_rgbf_image(side: usize) -> ImageArray {
    let n = side * side * 3;
    let data = (0..n).map(|i| ((i * 37) % 256) as f32 / 255.0).collect();
    ImageArray::from_f32(side, side, 3, data).unwrap()
}

// ============================================================================
// RGB -> HLS
// ============================================================================

fn bench_rgb_to_hls(c: &mut Criterion) {
    let mut group = c.benchmark_group("rgb_to_hls");

    for side in [64, 256, 1024].iter() {
        let pixels = side * side;
        group.throughput(Throughput::Elements(pixels as u64));

        let img8 = generate_rgb8_image(*side);
        let t8 = to_tensor(&img8);
        let imgf = generate_rgbf_image(*side);
        let tf = to_tensor(&imgf);

        group.bench_with_input(BenchmarkId::new("array_u8", side), &img8, |b, img| {
            b.iter(|| oxaug_core::rgb_to_hls(black_box(img)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("tensor_u8", side), &t8, |b, t| {
            b.iter(|| tensor::rgb_to_hls(black_box(t)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("array_f32", side), &imgf, |b, img| {
            b.iter(|| oxaug_core::rgb_to_hls(black_box(img)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("tensor_f32", side), &tf, |b, t| {
            b.iter(|| tensor::rgb_to_hls(black_box(t)).unwrap())
        });
    }

    group.finish();
}

// ============================================================================
// HLS -> RGB
// ============================================================================

fn bench_hls_to_rgb(c: &mut Criterion) {
    let mut group = c.benchmark_group("hls_to_rgb");

    for side in [64, 256, 1024].iter() {
        let pixels = side * side;
        group.throughput(Throughput::Elements(pixels as u64));

        let img8 = generate_rgb8_image(*side);
        let src = img8.as_u8().unwrap().to_vec();
        let t8 = to_tensor(&img8);

        group.bench_with_input(BenchmarkId::new("array_u8_batch", side), &src, |b, src| {
            let mut dst = vec![0u8; src.len()];
            b.iter(|| array::hls_to_rgb_u8_batch(black_box(src), &mut dst, 180.0))
        });
        group.bench_with_input(BenchmarkId::new("tensor_u8", side), &t8, |b, t| {
            b.iter(|| tensor::hls_to_rgb(black_box(t)).unwrap())
        });
    }

    group.finish();
}

// ============================================================================
// Transforms
// ============================================================================

fn bench_transforms(c: &mut Criterion) {
    let mut group = c.benchmark_group("transforms");
    let side = 512;
    group.throughput(Throughput::Elements((side * side) as u64));

    let img = generate_rgb8_image(side);
    let t = to_tensor(&img);

    let normalize = Normalize::new(NormalizeConfig::default()).unwrap();
    let normalize_t = NormalizeTensor::new(NormalizeConfig::default()).unwrap();
    let dropout_config = CoarseDropoutConfig::default().with_probability(1.0);
    let dropout = CoarseDropout::new(dropout_config.clone()).unwrap();
    let dropout_t = CoarseDropoutTensor::new(dropout_config).unwrap();

    group.bench_function("normalize_array", |b| {
        let mut rng = Generator::seeded(0);
        b.iter(|| normalize.apply(black_box(img.clone()), &mut rng).unwrap())
    });
    group.bench_function("normalize_tensor", |b| {
        let mut rng = Generator::seeded(0);
        b.iter(|| normalize_t.apply(black_box(t.clone()), &mut rng).unwrap())
    });
    group.bench_function("coarse_dropout_array", |b| {
        let mut rng = Generator::seeded(0);
        b.iter(|| dropout.apply(black_box(img.clone()), &mut rng).unwrap())
    });
    group.bench_function("coarse_dropout_tensor", |b| {
        let mut rng = Generator::seeded(0);
        b.iter(|| dropout_t.apply(black_box(t.clone()), &mut rng).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_rgb_to_hls, bench_hls_to_rgb, bench_transforms);
criterion_main!(benches);
