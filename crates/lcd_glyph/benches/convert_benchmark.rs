use criterion::{criterion_group, criterion_main, Criterion};
use lcd_glyph::{convert, Orientation, PixelBuffer, SurfaceProfile};
use std::hint::black_box;

fn load_primaries_png() -> PixelBuffer {
    let img =
        image::open("tests/data/primaries_4x2.png").expect("Failed to load primaries_4x2.png");
    let rgb_img = img.to_rgb8();
    let (width, height) = rgb_img.dimensions();
    PixelBuffer::from_rgb8(width as usize, height as usize, rgb_img.as_raw())
        .expect("decoded dimensions")
}

fn generate_gradient(width: usize, height: usize) -> PixelBuffer {
    let mut pixels = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            pixels.push(((x * 255) / width.max(1)) as u8);
            pixels.push(((y * 255) / height.max(1)) as u8);
            pixels.push(128);
        }
    }
    PixelBuffer::from_rgb8(width, height, &pixels).expect("gradient dimensions")
}

fn bench_convert_png_upscale(c: &mut Criterion) {
    let image = load_primaries_png();

    c.bench_function("convert_png_4x2_upscale_wide", |b| {
        b.iter(|| {
            let result = convert(
                black_box(image.clone()),
                SurfaceProfile::LargeLcdPanelWide,
                Orientation::NONE,
            );
            assert!(result.is_ok());
            result
        })
    });
}

fn bench_convert_small(c: &mut Criterion) {
    let image = generate_gradient(64, 64);

    c.bench_function("convert_gradient_64x64_square", |b| {
        b.iter(|| {
            let result = convert(
                black_box(image.clone()),
                SurfaceProfile::Default,
                Orientation::NONE,
            );
            assert!(result.is_ok());
            result
        })
    });
}

fn bench_convert_photo(c: &mut Criterion) {
    let image = generate_gradient(1920, 1080);

    c.bench_function("convert_gradient_1920x1080_wide", |b| {
        b.iter(|| {
            let result = convert(
                black_box(image.clone()),
                SurfaceProfile::LargeLcdPanelWide,
                Orientation::NONE,
            );
            assert!(result.is_ok());
            result
        })
    });
}

fn bench_convert_huge(c: &mut Criterion) {
    let image = generate_gradient(4096, 4096);

    c.bench_function("convert_gradient_4096x4096_rotated", |b| {
        b.iter(|| {
            let result = convert(
                black_box(image.clone()),
                SurfaceProfile::LargeTextPanel,
                Orientation::from_steps(1),
            );
            assert!(result.is_ok());
            result
        })
    });
}

criterion_group!(
    benches,
    bench_convert_png_upscale,
    bench_convert_small,
    bench_convert_photo,
    bench_convert_huge,
);
criterion_main!(benches);
