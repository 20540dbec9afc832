// File: crates/kaplot-examples/src/bin/gallery.rs
// Summary: Renders one figure per plot type (bars, histogram, boxes, twin axes, log axes)
//          to PNG and SVG under target/out/gallery.

use anyhow::{Context, Result};
use kaplot_core::{Axis, Corner, Number, Plot, Series, StyleMap, TickSpec};
use kaplot_render_skia::SkiaBackend;

fn save(plot: &mut Plot, name: &str) -> Result<()> {
    for ext in ["png", "svg"] {
        let mut backend = SkiaBackend::new();
        plot.render(&mut backend).with_context(|| format!("render {name}"))?;
        let out = format!("target/out/gallery/{name}.{ext}");
        plot.save_figure(&mut backend, &out, &StyleMap::new())?;
        log::info!("wrote {out}");
    }
    Ok(())
}

fn bars() -> Result<Plot> {
    let mut plot = Plot::new();
    let ticks = TickSpec::labeled(vec![Number::Int(1), Number::Int(2), Number::Int(3)], vec!["low".into(), "mid".into(), "high".into()]);
    plot.layer("main")?
        .set_plot_type("bar")
        .set_title("Bars with errors", &StyleMap::new())
        .add_plotdata(Series::new(vec![1.0, 2.0, 3.0], vec![3.0, 5.0, 2.0]).with_yerr(vec![0.3, 0.5, 0.2]).with("label", "run a"))
        .set_xticks(Some(ticks), &StyleMap::new())
        .add_axhline(4.0, &StyleMap::new().with("ls", "--").with("color", "grey"))
        .set_legend(true, &StyleMap::new().with("loc", "upper left"));
    Ok(plot)
}

fn histogram() -> Result<Plot> {
    let a: Vec<f64> = (0..200).map(|i| ((i * 37) % 101) as f64 / 10.0).collect();
    let b: Vec<f64> = (0..200).map(|i| 3.0 + ((i * 53) % 61) as f64 / 10.0).collect();
    let mut plot = Plot::new();
    plot.layer("main")?
        .set_plot_type("hist")
        .add_plotdata(Series::samples(a).with("label", "first").with("bins", 15))
        .add_plotdata(Series::samples(b).with("label", "second"))
        .set_legend(true, &StyleMap::new());
    Ok(plot)
}

fn boxes() -> Result<Plot> {
    let mut plot = Plot::new();
    plot.set_jitter_seed(7);
    let mut main = plot.layer("main")?;
    main.set_plot_type("boxscatter");
    for k in 0..3 {
        let data: Vec<f64> = (0..40).map(|i| k as f64 + ((i * 29 + k * 7) % 23) as f64 / 5.0).collect();
        main.add_plotdata(Series::samples(data).with("label", format!("group {}", k + 1)));
    }
    main.add_plotdata(Series::samples(vec![1.0, 2.0, 3.0, 4.0, 100.0]).with("label", "outlier"));
    main.set_axes_type("semilog-y");
    Ok(plot)
}

fn twins() -> Result<Plot> {
    let x: Vec<f64> = (0..24).map(f64::from).collect();
    let temp: Vec<f64> = x.iter().map(|h| 12.0 + 6.0 * (h / 24.0 * std::f64::consts::TAU).sin()).collect();
    let rain: Vec<f64> = x.iter().map(|h| (h * 0.7).cos().abs() * 4.0).collect();
    let mut plot = Plot::new();
    plot.layer("main")?
        .set_ylabel("Temperature", Some("°C"), &StyleMap::new())
        .add_plotdata(Series::new(x.clone(), temp).with("label", "temperature"));
    plot.add_twin_layer("rain", Axis::X, "main")?
        .set_plot_type("bar")
        .set_ylabel("Rain", Some("mm"), &StyleMap::new())
        .add_plotdata(Series::new(x, rain).with("alpha", 0.4));
    plot.add_layer_at("inset", Corner::UpperLeft)?
        .set_frames(&StyleMap::new().with("top", false).with("right", false))
        .add_plotdata(Series::new(vec![0.0, 1.0, 2.0], vec![1.0, 0.0, 1.0]).with("spline", true));
    Ok(plot)
}

fn decades() -> Result<Plot> {
    let x: Vec<f64> = (1..=40).map(|i| i as f64 * 25.0).collect();
    let y: Vec<f64> = x.iter().map(|v| v.powf(1.5)).collect();
    let mut plot = Plot::new();
    plot.set_style(Some("ggplot"));
    plot.layer("main")?
        .set_axes_type("log-log")
        .set_tick_format("y", &StyleMap::new().with("style", "sci"))
        .add_plotdata(Series::new(x, y).with("marker", "o").with("markevery", 4))
        .add_rectangle((50.0, 3000.0), (150.0, 300.0), &StyleMap::new().with("alpha", 0.3))
        .add_arrow((30.0, 20_000.0), (100.0, 1100.0), &StyleMap::new())
        .add_text("knee", 25.0, 25_000.0, &StyleMap::new());
    Ok(plot)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    save(&mut bars()?, "bars")?;
    save(&mut histogram()?, "histogram")?;
    save(&mut boxes()?, "boxes")?;
    save(&mut twins()?, "twins")?;
    save(&mut decades()?, "decades")?;
    Ok(())
}
