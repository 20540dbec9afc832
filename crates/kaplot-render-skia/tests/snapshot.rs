// File: crates/kaplot-render-skia/tests/snapshot.rs
// Purpose: Golden snapshot harness with bless flow.
// Behavior:
// - Renders a deterministic small figure without text to PNG bytes.
// - If env UPDATE_SNAPSHOTS=1, (re)writes the snapshot file.
// - Else, if snapshot exists, compares decoded pixels for exact match.
// - Else, logs a note and returns (skips) without failing to ease first run.

use kaplot_core::{Plot, SaveOptions, Series, StyleMap};
use kaplot_render_skia::SkiaBackend;

fn render_bytes() -> Vec<u8> {
    let mut plot = Plot::new();
    plot.layer("main")
        .unwrap()
        .set_grid(true, &StyleMap::new())
        .add_plotdata(Series::new(vec![0.0, 1.0, 2.0, 3.0, 4.0], vec![0.0, 1.0, 0.0, 1.5, 1.0]))
        .add_plotdata(Series::new(vec![0.0, 2.0, 4.0], vec![0.5, 0.5, 0.5]).with("ls", "--"))
        .add_axvline(2.0, &StyleMap::new().with("color", "blue"));

    // text shaping depends on installed fonts
    let mut backend = SkiaBackend::new().without_text();
    plot.render(&mut backend).expect("render");
    backend
        .render_png_bytes(&SaveOptions { dpi: 40.0, transparent: false, width: 5.0, height: 4.0 })
        .expect("render to bytes")
}

#[test]
fn golden_basic_figure() {
    let bytes = render_bytes();
    let snap_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/__snapshots__");
    let snap_path = snap_dir.join("basic_figure.png");

    let update = std::env::var("UPDATE_SNAPSHOTS").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    if update {
        std::fs::create_dir_all(&snap_dir).expect("create snapshots dir");
        std::fs::write(&snap_path, &bytes).expect("write snapshot");
        eprintln!("[snapshot] Updated {} ({} bytes)", snap_path.display(), bytes.len());
        return;
    }

    if snap_path.exists() {
        let want = std::fs::read(&snap_path).expect("read snapshot");
        let got_img = image::load_from_memory(&bytes).expect("decode got").to_rgba8();
        let want_img = image::load_from_memory(&want).expect("decode want").to_rgba8();
        assert_eq!(got_img.as_raw(), want_img.as_raw(), "rendered pixels differ from golden snapshot: {}", snap_path.display());
    } else {
        eprintln!("[snapshot] Missing snapshot {}; set UPDATE_SNAPSHOTS=1 to bless.", snap_path.display());
    }
}

#[test]
fn rendering_is_repeatable() {
    assert_eq!(render_bytes(), render_bytes());
}
