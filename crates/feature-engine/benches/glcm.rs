use criterion::{black_box, criterion_group, criterion_main, Criterion};
use feature_engine::{texture_features, GlcmConfig};
use image::{GrayImage, Luma};

fn bench_texture_features(c: &mut Criterion) {
    let img = GrayImage::from_fn(128, 128, |x, y| Luma([((x * 7 + y * 13) % 256) as u8]));
    let config = GlcmConfig::default();

    c.bench_function("glcm_128x128_12_offsets", |b| {
        b.iter(|| texture_features(black_box(&img), &config))
    });
}

criterion_group!(benches, bench_texture_features);
criterion_main!(benches);
