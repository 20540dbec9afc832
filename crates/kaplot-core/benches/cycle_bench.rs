// File: crates/kaplot-core/benches/cycle_bench.rs
// Summary: Style assignment and settings resolution micro-benchmarks.

use kaplot_core::cycle::{assign, Palette};
use kaplot_core::{resolve, Config, Feature, StyleMap};
use criterion::{criterion_group, criterion_main, Criterion, black_box};

fn bench_cycle(c: &mut Criterion) {
    let config = Config::default();
    let p = &config.palettes;
    let palette = Palette { colors: &p.colors, marks: &p.markers, fills: &p.marker_fills };
    let increments: Vec<bool> = (0..1_000).map(|i| i % 7 != 0).collect();
    c.bench_function("assign_1000", |b| b.iter(|| black_box(assign(&increments, &palette, None))));

    let overrides = StyleMap::new().with("color", "red").with("lw", 2).with("marker", "o");
    c.bench_function("resolve_line", |b| {
        b.iter(|| black_box(resolve(config.defaults(Feature::Line), &overrides)))
    });
}

criterion_group!(benches, bench_cycle);
criterion_main!(benches);
