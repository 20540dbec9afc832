// File: crates/kaplot-render-skia/tests/smoke.rs
// Purpose: End-to-end render smoke tests writing PNG and SVG files through save_figure.

use kaplot_core::{Axis, Plot, Series, StyleMap};
use kaplot_render_skia::SkiaBackend;

fn sample_plot() -> Plot {
    let mut plot = Plot::new();
    plot.layer("main")
        .unwrap()
        .set_title("Smoke", &StyleMap::new())
        .set_xlabel("X", Some("m"), &StyleMap::new())
        .add_plotdata(Series::new(vec![0.0, 1.0, 2.0, 3.0, 4.0], vec![0.0, 2.0, 1.0, 3.5, 2.5]).with("label", "data"))
        .set_legend(true, &StyleMap::new());
    plot
}

#[test]
fn render_smoke_png() {
    let mut plot = sample_plot();
    let mut backend = SkiaBackend::new();
    plot.render(&mut backend).expect("render should succeed");

    let out = std::path::PathBuf::from("target/test_out/smoke.png");
    let small = StyleMap::new().with("dpi", 50).with("width", 4).with("height", 3);
    plot.save_figure(&mut backend, &out, &small).expect("save should succeed");
    let bytes = std::fs::read(&out).expect("output exists");
    assert!(bytes.starts_with(&[137, 80, 78, 71]), "should be PNG header");

    let img = image::load_from_memory(&bytes).expect("decode png").to_rgba8();
    assert_eq!(img.dimensions(), (200, 150));
}

#[test]
fn render_smoke_svg() {
    let mut plot = sample_plot();
    let mut backend = SkiaBackend::new();
    plot.render(&mut backend).unwrap();
    let out = std::path::PathBuf::from("target/test_out/smoke.svg");
    plot.save_figure(&mut backend, &out, &StyleMap::new()).unwrap();
    let text = std::fs::read_to_string(&out).expect("svg exists");
    assert!(text.contains("<svg"), "should be an SVG document");
}

#[test]
fn every_plot_type_renders() {
    let mut plot = Plot::new();
    plot.layer("main")
        .unwrap()
        .set_plot_type("boxscatter")
        .add_plotdata(Series::samples(vec![1.0, 2.0, 3.0, 4.0, 100.0]))
        .add_plotdata(Series::samples(vec![2.0, 2.5, 3.0]).with("label", "b"));
    plot.add_twin_layer("counts", Axis::X, "main")
        .unwrap()
        .set_plot_type("hist")
        .add_plotdata(Series::samples(vec![1.0, 1.5, 2.0, 2.0, 3.0]));
    plot.add_layer_at("inset", [0.6, 0.6, 0.25, 0.25])
        .unwrap()
        .set_plot_type("bar")
        .set_axes_type("semilog-y")
        .add_plotdata(Series::new(vec![1.0, 2.0], vec![10.0, 1000.0]).with("hatch", "//"));

    let mut backend = SkiaBackend::new().without_text();
    plot.render(&mut backend).expect("render");
    assert_eq!(backend.axes_count(), 3);
    let png = backend.render_png_bytes(&kaplot_core::SaveOptions::default()).expect("png bytes");
    assert!(!png.is_empty());
}
