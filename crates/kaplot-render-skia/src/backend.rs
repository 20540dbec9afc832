// File: crates/kaplot-render-skia/src/backend.rs
// Summary: `SkiaBackend`; records backend calls into per-axes scenes and rasterizes them
//          with Skia CPU surfaces (PNG) or the Skia SVG canvas on export.

use std::path::Path;

use anyhow::{Context, Result};
use skia_safe as skia;

use kaplot_core::backend::{Backend, SaveOptions, Spine};
use kaplot_core::layer::Axis;
use kaplot_core::range::Ticks;
use kaplot_core::scale::Scale;
use kaplot_core::value::{StyleMap, Value};
use kaplot_core::view::{AxesId, AxesPlacement, AxesRegistry, AxesView};

use crate::draw::Figure;
use crate::scene::{axis_index, bin_counts, bin_edges, AxesScene, BoxStats, EntryKind, Mark, DEFAULT_BINS};
use crate::text::TextShaper;
use crate::theme::{self, StyleSheet};

/// Default bar width in data units.
pub const DEFAULT_BAR_WIDTH: f64 = 0.8;
/// Default box width in data units.
pub const DEFAULT_BOX_WIDTH: f64 = 0.5;

/// Image format chosen from the export path's extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref() {
            Some("svg") => ImageFormat::Svg,
            Some("png") | None => ImageFormat::Png,
            Some(other) => {
                log::warn!("kaplot: unsupported image extension '{other}', writing PNG");
                ImageFormat::Png
            }
        }
    }
}

pub struct SkiaBackend {
    pub(crate) views: AxesRegistry,
    pub(crate) scenes: Vec<AxesScene>,
    pub(crate) placements: Vec<AxesPlacement>,
    pub(crate) sheet: StyleSheet,
    pub(crate) sketch: bool,
    pub(crate) tight_pad: Option<f64>,
    pub(crate) draw_text: bool,
    pub(crate) shaper: TextShaper,
}

impl Default for SkiaBackend {
    fn default() -> Self { Self::new() }
}

impl SkiaBackend {
    pub fn new() -> Self {
        Self {
            views: AxesRegistry::new(),
            scenes: Vec::new(),
            placements: Vec::new(),
            sheet: StyleSheet::default(),
            sketch: false,
            tight_pad: None,
            draw_text: true,
            shaper: TextShaper::new(),
        }
    }

    /// Skip all text; output then no longer depends on installed fonts.
    pub fn without_text(mut self) -> Self {
        self.draw_text = false;
        self
    }

    pub fn axes_count(&self) -> usize { self.scenes.len() }
    pub fn style_sheet(&self) -> &StyleSheet { &self.sheet }

    fn scene(&mut self, ax: AxesId) -> Option<&mut AxesScene> {
        let scene = self.scenes.get_mut(ax);
        if scene.is_none() {
            log::warn!("kaplot: call on unknown axes {ax}");
        }
        scene
    }

    /// Rasterize the figure and encode it as PNG.
    pub fn render_png_bytes(&self, opts: &SaveOptions) -> Result<Vec<u8>> {
        let (w, h) = opts.pixel_size();
        let mut surface = skia::surfaces::raster_n32_premul((w, h))
            .ok_or_else(|| anyhow::anyhow!("failed to create raster surface {w}x{h}"))?;
        Figure::new(self, opts).paint(surface.canvas());
        let image = surface.image_snapshot();
        #[allow(deprecated)]
        let data = image
            .encode_to_data(skia::EncodedImageFormat::PNG)
            .ok_or_else(|| anyhow::anyhow!("encode PNG failed"))?;
        Ok(data.as_bytes().to_vec())
    }

    /// Paint the figure onto the Skia SVG canvas.
    pub fn render_svg_bytes(&self, opts: &SaveOptions) -> Result<Vec<u8>> {
        let (w, h) = opts.pixel_size();
        let canvas = skia::svg::Canvas::new(skia::Rect::from_iwh(w, h), None);
        Figure::new(self, opts).paint(&canvas);
        let data = canvas.end();
        Ok(data.as_bytes().to_vec())
    }
}

fn err_extent(v: &[f64], err: Option<&[f64]>) -> Vec<f64> {
    match err {
        Some(e) => v.iter().zip(e).flat_map(|(a, d)| [a - d.abs(), a + d.abs()]).collect(),
        None => Vec::new(),
    }
}

fn per_bar(opts: &StyleMap, key: &str, n: usize, default: f64) -> Vec<f64> {
    match opts.get(key) {
        Some(Value::List(l)) => (0..n).map(|i| l.get(i).and_then(Value::as_f64).unwrap_or(default)).collect(),
        Some(v) => vec![v.as_f64().unwrap_or(default); n],
        None => vec![default; n],
    }
}

impl Backend for SkiaBackend {
    fn create_axes(&mut self, placement: AxesPlacement) -> AxesId {
        let id = self.views.create(&placement);
        self.scenes.push(AxesScene::default());
        self.placements.push(placement);
        id
    }

    fn set_scale(&mut self, ax: AxesId, axis: Axis, scale: Scale) {
        self.views.set_scale(ax, axis, scale);
    }

    fn set_title(&mut self, ax: AxesId, text: &str, font: &StyleMap) {
        if let Some(s) = self.scene(ax) { s.title = Some((text.to_string(), font.clone())); }
    }

    fn grid(&mut self, ax: AxesId, opts: &StyleMap) {
        if let Some(s) = self.scene(ax) { s.grid = Some(opts.clone()); }
    }

    fn errorbar(&mut self, ax: AxesId, x: &[f64], y: &[f64], xerr: Option<&[f64]>, yerr: Option<&[f64]>, opts: &StyleMap) {
        self.views.extend_xy(ax, x, y);
        self.views.extend(ax, Axis::X, err_extent(x, xerr));
        self.views.extend(ax, Axis::Y, err_extent(y, yerr));
        let Some(s) = self.scene(ax) else { return };
        let markers_only = matches!(opts.get_str("ls"), Some("") | Some("None") | Some("none"))
            || opts.get_f64("lw") == Some(0.0);
        let kind = if markers_only { EntryKind::Marker } else { EntryKind::Line };
        s.add_entry(opts.get_str("label"), opts, kind);
        s.marks.push(Mark::Errorbar {
            x: x.to_vec(),
            y: y.to_vec(),
            xerr: xerr.map(<[f64]>::to_vec),
            yerr: yerr.map(<[f64]>::to_vec),
            opts: opts.clone(),
        });
    }

    fn bar(&mut self, ax: AxesId, left: &[f64], height: &[f64], xerr: Option<&[f64]>, yerr: Option<&[f64]>, opts: &StyleMap) {
        let n = left.len().min(height.len());
        let width = per_bar(opts, "width", n, DEFAULT_BAR_WIDTH);
        let bottom = per_bar(opts, "bottom", n, 0.0);
        let centered = opts.get_str("align").map_or(true, |a| a.eq_ignore_ascii_case("center"));
        let starts: Vec<f64> = (0..n).map(|i| if centered { left[i] - width[i] / 2.0 } else { left[i] }).collect();
        self.views.extend(ax, Axis::X, (0..n).flat_map(|i| [starts[i], starts[i] + width[i]]));
        self.views.extend(ax, Axis::Y, (0..n).flat_map(|i| [bottom[i], bottom[i] + height[i]]));
        let Some(s) = self.scene(ax) else { return };
        s.add_entry(opts.get_str("label"), opts, EntryKind::Patch);
        s.marks.push(Mark::Bars {
            left: starts,
            width,
            bottom,
            height: height[..n].to_vec(),
            xerr: xerr.map(<[f64]>::to_vec),
            yerr: yerr.map(<[f64]>::to_vec),
            opts: opts.clone(),
        });
    }

    fn hist(&mut self, ax: AxesId, datasets: &[Vec<f64>], labels: &[String], colors: &[Value], opts: &StyleMap) {
        let bins = opts.get_f64("bins").map(|b| b.max(1.0) as usize).unwrap_or(DEFAULT_BINS);
        let range = match opts.get("range") {
            Some(Value::List(l)) => (l.first().and_then(Value::as_f64), l.get(1).and_then(Value::as_f64)),
            _ => (None, None),
        };
        let edges = bin_edges(datasets, bins, range);
        let bin_w = edges.get(1).zip(edges.first()).map(|(b, a)| b - a).unwrap_or(1.0);
        let density = opts.get_bool("density").unwrap_or(false);
        let cumulative = opts.get_bool("cumulative").unwrap_or(false);
        let stacked = opts.get_bool("stacked").unwrap_or(false)
            || opts.get_str("histtype").is_some_and(|t| t.eq_ignore_ascii_case("barstacked"));

        let k = datasets.len().max(1);
        let mut base = vec![0.0; edges.len().saturating_sub(1)];
        let mut bars = Vec::with_capacity(datasets.len());
        for (i, data) in datasets.iter().enumerate() {
            let mut counts = bin_counts(data, &edges);
            if density {
                let total: f64 = counts.iter().sum();
                if total > 0.0 {
                    counts.iter_mut().for_each(|c| *c /= total * bin_w);
                }
            }
            if cumulative {
                let mut acc = 0.0;
                counts.iter_mut().for_each(|c| {
                    acc += *c;
                    *c = acc;
                });
            }
            let (width, offset) = if stacked { (bin_w * 0.8, bin_w * 0.1) } else { (bin_w * 0.8 / k as f64, bin_w * 0.1 + i as f64 * bin_w * 0.8 / k as f64) };
            let left: Vec<f64> = edges.iter().take(counts.len()).map(|e| e + offset).collect();
            let bottom = if stacked { base.clone() } else { vec![0.0; counts.len()] };
            if stacked {
                base.iter_mut().zip(&counts).for_each(|(b, c)| *b += c);
            }
            let mut bar_opts = StyleMap::new();
            for key in ["edgecolor", "facecolor", "fill", "hatch", "ls", "lw", "alpha", "log"] {
                if let Some(v) = opts.get(key) { bar_opts.insert(key, v.clone()); }
            }
            if let Some(c) = colors.get(i) { bar_opts.insert("color", c.clone()); }
            if let Some(l) = labels.get(i) { bar_opts.insert("label", l.as_str()); }
            self.views.extend(ax, Axis::X, [edges[0], edges[edges.len() - 1]]);
            self.views.extend(ax, Axis::Y, bottom.iter().zip(&counts).flat_map(|(b, c)| [*b, b + c]));
            bars.push((left, width, bottom, counts, bar_opts));
        }
        let Some(s) = self.scene(ax) else { return };
        for (left, width, bottom, counts, bar_opts) in bars {
            s.add_entry(bar_opts.get_str("label"), &bar_opts, EntryKind::Patch);
            let n = left.len();
            s.marks.push(Mark::Bars { left, width: vec![width; n], bottom, height: counts, xerr: None, yerr: None, opts: bar_opts });
        }
    }

    fn boxplot(&mut self, ax: AxesId, datasets: &[Vec<f64>], labels: &[Option<String>], positions: &[f64], fills: &[Option<Value>], opts: &StyleMap) {
        let whis = opts.get_f64("whis").unwrap_or(1.5);
        let vert = opts.get_bool("vert").unwrap_or(true);
        let width = opts.get_f64("widths").unwrap_or(DEFAULT_BOX_WIDTH);
        // empty datasets draw no box; their fill goes with them
        let (boxes, box_fills): (Vec<BoxStats>, Vec<Option<Value>>) = datasets
            .iter()
            .zip(positions)
            .enumerate()
            .filter_map(|(i, (d, &p))| Some((BoxStats::compute(d, p, whis)?, fills.get(i).cloned().flatten())))
            .unzip();
        let (pos_axis, val_axis) = if vert { (Axis::X, Axis::Y) } else { (Axis::Y, Axis::X) };
        self.views.extend(ax, pos_axis, positions.iter().flat_map(|p| [p - width / 2.0, p + width / 2.0]));
        self.views.extend(ax, val_axis, boxes.iter().flat_map(|b| {
            let (lo, hi) = b.extent();
            [lo, hi]
        }));
        let Some(s) = self.scene(ax) else { return };
        if labels.iter().any(Option::is_some) {
            let tick_labels = labels
                .iter()
                .zip(positions)
                .map(|(l, p)| l.clone().unwrap_or_else(|| p.to_string()))
                .collect();
            s.ticks[axis_index(pos_axis)] = Some(Ticks { values: positions.to_vec(), labels: tick_labels });
        }
        s.marks.push(Mark::Boxes { boxes, vert, width, fills: box_fills, opts: opts.clone() });
    }

    fn scatter(&mut self, ax: AxesId, x: &[f64], y: &[f64], opts: &StyleMap) {
        self.views.extend_xy(ax, x, y);
        let Some(s) = self.scene(ax) else { return };
        s.add_entry(opts.get_str("label"), opts, EntryKind::Marker);
        s.marks.push(Mark::Scatter { x: x.to_vec(), y: y.to_vec(), opts: opts.clone() });
    }

    fn set_label(&mut self, ax: AxesId, axis: Axis, text: &str, font: &StyleMap) {
        if let Some(s) = self.scene(ax) { s.labels[axis_index(axis)] = Some((text.to_string(), font.clone())); }
    }

    fn set_ticks(&mut self, ax: AxesId, axis: Axis, ticks: &Ticks, font: &StyleMap) {
        if let Some(s) = self.scene(ax) {
            s.ticks[axis_index(axis)] = Some(ticks.clone());
            s.tick_fonts[axis_index(axis)] = font.clone();
        }
    }

    fn restyle_tick_labels(&mut self, ax: AxesId, axis: Axis, font: &StyleMap) {
        if let Some(s) = self.scene(ax) { s.tick_fonts[axis_index(axis)] = font.clone(); }
    }

    fn set_tick_format(&mut self, ax: AxesId, axis: Axis, opts: &StyleMap) {
        if let Some(s) = self.scene(ax) { s.tick_formats[axis_index(axis)] = opts.clone(); }
    }

    fn set_locator(&mut self, ax: AxesId, axis: Axis, max_ticks: &Value) {
        let Some(n) = max_ticks.as_f64().filter(|n| n.is_finite() && *n >= 1.0) else {
            log::warn!("kaplot: maxticks must be a positive number, got {max_ticks}");
            return;
        };
        if let Some(s) = self.scene(ax) { s.max_ticks[axis_index(axis)] = Some((n as usize).max(2)); }
    }

    fn tick_params(&mut self, ax: AxesId, axis: Axis, opts: &StyleMap) {
        if let Some(s) = self.scene(ax) { s.tick_params[axis_index(axis)].extend_from(opts); }
    }

    fn set_limits(&mut self, ax: AxesId, axis: Axis, min: Option<f64>, max: Option<f64>) {
        self.views.set_limits(ax, axis, min, max);
    }

    fn hide_spine(&mut self, ax: AxesId, spine: Spine) {
        if let Some(s) = self.scene(ax) {
            if !s.hidden.contains(&spine) { s.hidden.push(spine); }
        }
    }

    fn axes_view(&self, ax: AxesId) -> AxesView { self.views.view(ax) }

    fn axhline(&mut self, ax: AxesId, y: f64, opts: &StyleMap) {
        self.views.extend(ax, Axis::Y, [y]);
        if let Some(s) = self.scene(ax) {
            s.add_entry(opts.get_str("label"), opts, EntryKind::Line);
            s.marks.push(Mark::HLine { y, opts: opts.clone() });
        }
    }

    fn axvline(&mut self, ax: AxesId, x: f64, opts: &StyleMap) {
        self.views.extend(ax, Axis::X, [x]);
        if let Some(s) = self.scene(ax) {
            s.add_entry(opts.get_str("label"), opts, EntryKind::Line);
            s.marks.push(Mark::VLine { x, opts: opts.clone() });
        }
    }

    fn text(&mut self, ax: AxesId, x: f64, y: f64, text: &str, font: &StyleMap) {
        if let Some(s) = self.scene(ax) { s.marks.push(Mark::Text { x, y, s: text.to_string(), font: font.clone() }); }
    }

    fn axhspan(&mut self, ax: AxesId, ymin: f64, ymax: f64, opts: &StyleMap) {
        self.views.extend(ax, Axis::Y, [ymin, ymax]);
        if let Some(s) = self.scene(ax) {
            s.add_entry(opts.get_str("label"), opts, EntryKind::Patch);
            s.marks.push(Mark::HSpan { ymin, ymax, opts: opts.clone() });
        }
    }

    fn arrow(&mut self, ax: AxesId, x: f64, y: f64, dx: f64, dy: f64, opts: &StyleMap) {
        self.views.extend_xy(ax, &[x, x + dx], &[y, y + dy]);
        if let Some(s) = self.scene(ax) { s.marks.push(Mark::Arrow { x, y, dx, dy, opts: opts.clone() }); }
    }

    fn legend(&mut self, ax: AxesId, opts: &StyleMap, font: &StyleMap) {
        if let Some(s) = self.scene(ax) { s.legend = Some((opts.clone(), font.clone())); }
    }

    fn restyle_legend_title(&mut self, ax: AxesId, font: &StyleMap) {
        if let Some(s) = self.scene(ax) { s.legend_title_font = Some(font.clone()); }
    }

    fn use_style(&mut self, name: &str) {
        match theme::find(name) {
            Some(sheet) => self.sheet = sheet,
            None => log::warn!("kaplot: unknown style sheet '{name}'"),
        }
    }

    fn sketch(&mut self) { self.sketch = true; }

    fn tight_layout(&mut self, pad: f64) { self.tight_pad = Some(pad); }

    fn export(&mut self, path: &Path, opts: &SaveOptions) -> Result<()> {
        let bytes = match ImageFormat::from_path(path) {
            ImageFormat::Png => self.render_png_bytes(opts)?,
            ImageFormat::Svg => self.render_svg_bytes(opts)?,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        std::fs::write(path, bytes).with_context(|| format!("write {}", path.display()))?;
        log::debug!("kaplot: wrote {} ({}x{} px)", path.display(), opts.pixel_size().0, opts.pixel_size().1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(ImageFormat::from_path(Path::new("a/b.SVG")), ImageFormat::Svg);
        assert_eq!(ImageFormat::from_path(Path::new("plot")), ImageFormat::Png);
        assert_eq!(ImageFormat::from_path(Path::new("plot.jpg")), ImageFormat::Png);
    }

    #[test]
    fn centered_bars_extend_by_half_width() {
        let mut b = SkiaBackend::new();
        let ax = b.create_axes(AxesPlacement::Default);
        b.bar(ax, &[1.0, 2.0], &[3.0, 4.0], None, None, &StyleMap::new());
        let v = b.axes_view(ax);
        // data x in [0.6, 2.4], y in [0, 4], plus 5% margins
        assert!((v.x.vmin - 0.51).abs() < 1e-9);
        assert!((v.y.vmin + 0.2).abs() < 1e-9);
    }

    #[test]
    fn boxplot_labels_become_ticks() {
        let mut b = SkiaBackend::new();
        let ax = b.create_axes(AxesPlacement::Default);
        b.boxplot(ax, &[vec![1.0, 2.0, 3.0], vec![2.0, 5.0]], &[Some("a".into()), None], &[1.0, 2.0], &[None, None], &StyleMap::new());
        let ticks = b.scenes[ax].ticks[0].clone().unwrap();
        assert_eq!(ticks.labels, vec!["a".to_string(), "2".to_string()]);
    }

    #[test]
    fn empty_box_does_not_shift_fills() {
        let mut b = SkiaBackend::new();
        let ax = b.create_axes(AxesPlacement::Default);
        let fills = [Some(Value::from("red")), None];
        b.boxplot(ax, &[vec![], vec![1.0, 2.0, 3.0]], &[None, None], &[1.0, 2.0], &fills, &StyleMap::new());
        match &b.scenes[ax].marks[..] {
            [Mark::Boxes { boxes, fills, .. }] => {
                assert_eq!(boxes.len(), 1);
                assert_eq!(boxes[0].position, 2.0);
                assert_eq!(fills, &vec![None]);
            }
            other => panic!("unexpected marks: {other:?}"),
        }
    }

    #[test]
    fn unknown_style_keeps_current() {
        let mut b = SkiaBackend::new();
        b.use_style("dark");
        b.use_style("nope");
        assert_eq!(b.style_sheet().name, "dark");
    }
}
