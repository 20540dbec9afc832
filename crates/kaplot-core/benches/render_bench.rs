// File: crates/kaplot-core/benches/render_bench.rs
// Summary: Render-pass throughput against the recording backend (no rasterization).

use kaplot_core::{Plot, RecordingBackend, Series, StyleMap};
use criterion::{criterion_group, criterion_main, Criterion, black_box};

fn build_plot(series: usize, n: usize) -> Plot {
    let mut plot = Plot::new();
    {
        let mut main = plot.layer("main").expect("main layer");
        for s in 0..series {
            let x: Vec<f64> = (0..n).map(|i| i as f64).collect();
            let y: Vec<f64> = x.iter().map(|v| (v * 0.01 + s as f64).sin() * 10.0).collect();
            main.add_plotdata(Series::new(x, y).with("label", format!("s{s}")));
        }
        main.set_legend(true, &StyleMap::new());
    }
    plot
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_recording");
    for &(series, n) in &[(4usize, 10_000usize), (40, 1_000)] {
        group.bench_function(format!("lines_{series}x{n}"), |b| {
            let mut plot = build_plot(series, n);
            b.iter(|| {
                let mut rec = RecordingBackend::new();
                plot.render(&mut rec).expect("render");
                black_box(rec.calls.len());
            });
        });
    }
    group.bench_function("spline_1k_points", |b| {
        let mut plot = Plot::new();
        let x: Vec<f64> = (0..200).map(|i| i as f64 * 0.1).collect();
        let y: Vec<f64> = x.iter().map(|v| v.cos()).collect();
        plot.layer("main").expect("main layer").add_plotdata(Series::new(x, y).with("spline", true));
        b.iter(|| {
            let mut rec = RecordingBackend::new();
            plot.render(&mut rec).expect("render");
            black_box(rec.calls.len());
        });
    });
    group.finish();
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
