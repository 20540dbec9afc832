// File: crates/kaplot-render-skia/tests/pixels.rs
// Purpose: Decode rendered PNGs and check pixel colors at known data positions.

use kaplot_core::{Plot, SaveOptions, Series, StyleMap};
use kaplot_render_skia::SkiaBackend;

// 200 x 150 px; default axes span x 25..180 and y 18..133
const SMALL: SaveOptions = SaveOptions { dpi: 50.0, transparent: false, width: 4.0, height: 3.0 };

fn rgba(plot: &mut Plot, backend: SkiaBackend, opts: &SaveOptions) -> image::RgbaImage {
    let mut backend = backend;
    plot.render(&mut backend).expect("render");
    let bytes = backend.render_png_bytes(opts).expect("png");
    image::load_from_memory(&bytes).expect("decode").to_rgba8()
}

fn one_bar(color: &str) -> Plot {
    let mut plot = Plot::new();
    plot.layer("main")
        .unwrap()
        .set_plot_type("bar")
        .add_plotdata(Series::new(vec![1.0], vec![10.0]).with("color", color).with("fill", true))
        .set_xlim(Some(0.0), Some(2.0))
        .set_ylim(Some(0.0), Some(10.0));
    plot
}

#[test]
fn bar_fills_its_data_rectangle() {
    let img = rgba(&mut one_bar("red"), SkiaBackend::new().without_text(), &SMALL);
    assert_eq!(img.get_pixel(102, 75).0, [255, 0, 0, 255], "bar center is red");
    assert_eq!(img.get_pixel(35, 75).0, [255, 255, 255, 255], "left of the bar is axes face");
    assert_eq!(img.get_pixel(2, 2).0, [255, 255, 255, 255], "figure background");
}

#[test]
fn transparent_export_clears_figure() {
    let opts = SaveOptions { transparent: true, ..SMALL };
    let img = rgba(&mut one_bar("blue"), SkiaBackend::new().without_text(), &opts);
    assert_eq!(img.get_pixel(2, 2).0[3], 0);
    assert_eq!(img.get_pixel(102, 75).0, [0, 0, 255, 255]);
}

#[test]
fn dark_style_changes_axes_face() {
    let mut plot = one_bar("red");
    plot.set_style(Some("dark"));
    let img = rgba(&mut plot, SkiaBackend::new().without_text(), &SMALL);
    let face = img.get_pixel(35, 75).0;
    assert!(face[0] < 128 && face[1] < 128 && face[2] < 128, "dark face, got {face:?}");
}

#[test]
fn rectangle_spans_axes_fraction() {
    let mut plot = Plot::new();
    plot.layer("main")
        .unwrap()
        .set_xlim(Some(0.0), Some(10.0))
        .set_ylim(Some(0.0), Some(10.0))
        .add_rectangle((0.0, 10.0), (5.0, 0.0), &StyleMap::new().with("color", "lime").with("fill", true));
    let img = rgba(&mut plot, SkiaBackend::new().without_text(), &SMALL);
    assert_eq!(img.get_pixel(60, 75).0, [0, 255, 0, 255], "left half covered");
    assert_eq!(img.get_pixel(150, 75).0, [255, 255, 255, 255], "right half free");
}
