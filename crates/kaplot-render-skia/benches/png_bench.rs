// File: crates/kaplot-render-skia/benches/png_bench.rs
// Summary: Full render + rasterize + PNG encode for line figures of growing size.

use anyhow::Result;
use kaplot_core::{Plot, SaveOptions, Series};
use kaplot_render_skia::SkiaBackend;
use criterion::{criterion_group, criterion_main, Criterion, black_box};

fn build_plot(n: usize) -> Plot {
    let x: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let y: Vec<f64> = x.iter().map(|v| (v * 0.01).sin() * 10.0 + v * 0.0001).collect();
    let mut plot = Plot::new();
    plot.layer("main").expect("main layer").add_plotdata(Series::new(x, y));
    plot
}

fn bench_png(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_png_bytes");
    let opts = SaveOptions { dpi: 100.0, transparent: false, width: 8.0, height: 5.0 };
    for &n in &[10_000usize, 50_000usize] {
        group.bench_function(format!("xy_{n}"), |b| {
            let mut plot = build_plot(n);
            let mut backend = SkiaBackend::new().without_text();
            if let Err(e) = plot.render(&mut backend) {
                panic!("render failed: {e}");
            }
            b.iter(|| -> Result<()> {
                let bytes = backend.render_png_bytes(&opts)?;
                black_box(bytes);
                Ok(())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_png);
criterion_main!(benches);
