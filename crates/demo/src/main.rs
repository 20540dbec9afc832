// File: crates/demo/src/main.rs
// Summary: Demo loads a CSV whose first column is x and plots every other numeric column
//          as lines, bars of the column means, a histogram and a box scatter, and saves
//          the line plot description as JSON.

use anyhow::{Context, Result};
use kaplot_core::{Config, Number, Plot, Series, StyleMap, TickSpec};
use kaplot_render_skia::SkiaBackend;
use std::path::{Path, PathBuf};

/// One numeric column of the input.
struct Column {
    name: String,
    values: Vec<f64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let raw = std::env::args().nth(1).context("usage: kaplot-demo <file.csv> [style]")?;
    let style = std::env::args().nth(2);
    let path = PathBuf::from(raw);

    let (x, columns) = load_columns(&path).with_context(|| format!("failed to load CSV '{}'", path.display()))?;
    if columns.is_empty() {
        anyhow::bail!("no numeric y columns in {}", path.display());
    }
    log::info!("loaded {} rows and {} series", x.len(), columns.len());

    // KAPLOT_DEFAULTS may point at a JSON file of user defaults
    let config = Config::from_env().context("loading user defaults")?;

    // 1) Lines
    let mut lines = Plot::with_config(config.clone());
    lines.set_style(style.as_deref());
    {
        let mut main = lines.layer("main")?;
        main.set_title(&stem(&path), &StyleMap::new())
            .set_xlabel(&x.name, None, &StyleMap::new())
            .set_grid(true, &StyleMap::new());
        for c in &columns {
            main.add_plotdata(Series::new(x.values.clone(), c.values.clone()).with("label", c.name.as_str()));
        }
        main.set_legend(true, &StyleMap::new());
    }
    render_to(&mut lines, &out_name_with(&path, "lines", "png"))?;
    render_to(&mut lines, &out_name_with(&path, "lines", "svg"))?;
    lines.save_state(out_name_with(&path, "lines", "json")).context("saving plot state")?;

    // 2) Distribution of every column
    let mut hist = Plot::with_config(config.clone());
    hist.set_style(style.as_deref());
    {
        let mut main = hist.layer("main")?;
        main.set_plot_type("hist").set_ylabel("Count", None, &StyleMap::new());
        for c in &columns {
            main.add_plotdata(Series::samples(c.values.clone()).with("label", c.name.as_str()).with("alpha", 0.7));
        }
        main.set_legend(true, &StyleMap::new());
    }
    render_to(&mut hist, &out_name_with(&path, "hist", "png"))?;

    // 3) Column means with their standard deviation
    let mut bars = Plot::with_config(config.clone());
    bars.set_style(style.as_deref());
    {
        let (pos, (means, spread)): (Vec<f64>, (Vec<f64>, Vec<f64>)) =
            columns.iter().enumerate().map(|(i, c)| ((i + 1) as f64, mean_std(&c.values))).unzip();
        let names = columns.iter().map(|c| c.name.clone()).collect();
        let ticks = TickSpec::labeled(pos.iter().map(|p| Number::coerce(*p)).collect(), names);
        bars.layer("main")?
            .set_plot_type("bar")
            .set_ylabel("Mean", None, &StyleMap::new())
            .set_xticks(Some(ticks), &StyleMap::new())
            .add_plotdata(Series::new(pos, means).with_yerr(spread).with("capsize", 4));
    }
    render_to(&mut bars, &out_name_with(&path, "bars", "png"))?;

    // 4) Spread of every column with the raw points on top
    let mut boxes = Plot::with_config(config);
    boxes.set_style(style.as_deref());
    {
        let mut main = boxes.layer("main")?;
        main.set_plot_type("boxscatter");
        for c in &columns {
            let finite: Vec<f64> = c.values.iter().copied().filter(|v| v.is_finite()).collect();
            main.add_plotdata(Series::samples(finite).with("label", c.name.as_str()));
        }
    }
    render_to(&mut boxes, &out_name_with(&path, "boxes", "png"))?;
    Ok(())
}

fn render_to(plot: &mut Plot, out: &Path) -> Result<()> {
    let mut backend = SkiaBackend::new();
    plot.render(&mut backend)?;
    plot.save_figure(&mut backend, out, &StyleMap::new())?;
    log::info!("wrote {}", out.display());
    Ok(())
}

/// Mean and population standard deviation of the finite values.
fn mean_std(values: &[f64]) -> (f64, f64) {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return (0.0, 0.0);
    }
    let n = finite.len() as f64;
    let mean = finite.iter().sum::<f64>() / n;
    let var = finite.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

fn stem(path: &Path) -> String {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("data").to_string()
}

/// Produce output file name like target/out/kaplot_<stem>_<suffix>.<ext>
fn out_name_with(input: &Path, suffix: &str, ext: &str) -> PathBuf {
    let mut out = PathBuf::from("target/out");
    out.push(format!("kaplot_{}_{}.{}", stem(input), suffix, ext));
    out
}

/// First column is x (row index when it does not parse); the rest are kept when every
/// non-empty cell parses as a number.
fn load_columns(path: &Path) -> Result<(Column, Vec<Column>)> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    log::debug!("headers: {headers:?}");
    let mut cells: Vec<Vec<Option<f64>>> = vec![Vec::new(); headers.len()];
    for rec in rdr.records() {
        let rec = rec?;
        for (i, col) in cells.iter_mut().enumerate() {
            col.push(rec.get(i).and_then(|s| s.parse::<f64>().ok()));
        }
    }

    let mut cols = headers.into_iter().zip(cells);
    let Some((x_name, x_cells)) = cols.next() else { anyhow::bail!("empty header row") };
    let x_values = x_cells
        .iter()
        .enumerate()
        .map(|(i, v)| v.unwrap_or(i as f64))
        .collect();
    let x = Column { name: x_name, values: x_values };

    let mut ys = Vec::new();
    for (name, col) in cols {
        if col.iter().all(Option::is_none) {
            log::warn!("skipping non-numeric column '{name}'");
            continue;
        }
        ys.push(Column { name, values: col.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect() });
    }
    Ok((x, ys))
}
