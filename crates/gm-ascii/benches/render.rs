use criterion::{Criterion, black_box, criterion_group, criterion_main};
use gm_ascii::luminance::render_text;
use gm_ascii::parallel::{default_worker_count, render_parallel};
use gm_core::charset::{CharsetPreset, Palette};
use gm_core::frame::LuminanceGrid;

fn gradient(width: usize, height: usize) -> LuminanceGrid {
    let data = (0..width * height).map(|i| (i % 256) as u8).collect();
    LuminanceGrid::new(width, height, data).unwrap_or_else(|_| LuminanceGrid::filled(width, height, 0))
}

fn bench_render(c: &mut Criterion) {
    let grid = gradient(480, 360);
    let palette = Palette::preset(CharsetPreset::Detailed);
    let workers = default_worker_count();

    c.bench_function("render_text_480x360", |b| {
        b.iter(|| render_text(black_box(&grid), black_box(&palette)));
    });
    c.bench_function("render_parallel_480x360", |b| {
        b.iter(|| render_parallel(black_box(&grid), black_box(&palette), workers));
    });
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
