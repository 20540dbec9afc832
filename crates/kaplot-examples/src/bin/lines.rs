// File: crates/kaplot-examples/src/bin/lines.rs
// Summary: Minimal example that renders two line series with a legend to PNG.

use anyhow::Result;
use kaplot_core::{Plot, Series, StyleMap};
use kaplot_render_skia::SkiaBackend;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let x: Vec<f64> = (0..=50).map(|i| i as f64 * 0.2).collect();
    let sin: Vec<f64> = x.iter().map(|v| v.sin()).collect();
    let cos: Vec<f64> = x.iter().map(|v| v.cos()).collect();

    let mut plot = Plot::new();
    plot.layer("main")?
        .set_title("Waves", &StyleMap::new())
        .set_xlabel("Time", Some("s"), &StyleMap::new())
        .set_ylabel("Amplitude", None, &StyleMap::new())
        .set_grid(true, &StyleMap::new())
        .add_plotdata(Series::new(x.clone(), sin).with("label", "sin"))
        .add_plotdata(Series::new(x, cos).with("label", "cos"))
        .set_legend(true, &StyleMap::new());

    let mut backend = SkiaBackend::new();
    plot.render(&mut backend)?;
    let out = std::path::PathBuf::from("target/out/example_lines.png");
    plot.save_figure(&mut backend, &out, &StyleMap::new())?;
    log::info!("wrote {}", out.display());
    Ok(())
}
