// File: crates/kaplot-core/src/render.rs
// Summary: Render pass; walks the layers in order and issues backend calls for axes,
//          scales, data series, decorations, annotations and legends.

use crate::backend::{Backend, Spine};
use crate::cycle::{assign, increment_count, Palette, Style};
use crate::defaults::{Config, Feature, PlotSettings};
use crate::error::{PlotError, PlotResult};
use crate::layer::{Axis, Layer, LayerName, Location, PlotType, TickLabels};
use crate::normalize::to_axes_fraction;
use crate::plot::Plot;
use crate::range::linspace;
use crate::scale::Scale;
use crate::series::Series;
use crate::settings::resolve;
use crate::spline;
use crate::stats::{iqr_trim, Jitter};
use crate::value::{StyleMap, Value};
use crate::view::{AxesId, AxesPlacement};

/// Label value that keeps an element out of the legend.
pub const NO_LEGEND: &str = "_nolegend_";

/// Default whisker reach for box scatter trimming.
pub const DEFAULT_WHIS: f64 = 1.5;

/// Line options consumed by the pipeline itself.
const LINE_ONLY_KEYS: [&str; 5] = ["increment", "spline", "sp_order", "sp_smooth", "sp_points"];

/// Element options the spline overlay inherits.
const SPLINE_KEYS: [&str; 3] = ["color", "lw", "ls"];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderState {
    #[default]
    Unrendered,
    /// Drawing the layer at this index.
    Rendering(usize),
    Rendered,
}

pub(crate) fn render(plot: &Plot, backend: &mut dyn Backend, state: &mut RenderState) -> PlotResult<()> {
    let settings = plot.settings();
    if let Some(style) = &settings.style {
        backend.use_style(style);
    }
    if settings.xkcd {
        backend.sketch();
    }

    let mut rendered: Vec<(&LayerName, AxesId)> = Vec::with_capacity(plot.layers().len());
    for (i, layer) in plot.layers().iter().enumerate() {
        *state = RenderState::Rendering(i);
        log::debug!("kaplot: rendering layer {i} '{}' ({} pending)", layer.name, layer.pending_len());
        let placement = placement(plot.config(), settings, layer, &rendered)?;
        let ax = backend.create_axes(placement);
        LayerPass { config: plot.config(), settings, layer, ax }.draw(backend);
        rendered.push((&layer.name, ax));
    }
    *state = RenderState::Rendered;
    Ok(())
}

fn placement(config: &Config, settings: &PlotSettings, layer: &Layer, rendered: &[(&LayerName, AxesId)]) -> PlotResult<AxesPlacement> {
    if let Some(twin) = &layer.twin {
        return match rendered.iter().find(|(name, _)| **name == twin.of) {
            Some(&(_, of)) => Ok(AxesPlacement::Twin { of, share: twin.share }),
            None => {
                log::warn!("kaplot: layer '{}' twins '{}', which is not rendered before it", layer.name, twin.of);
                Err(PlotError::UnknownLayer(twin.of.to_string()))
            }
        };
    }
    Ok(match layer.location {
        Some(Location::Corner(c)) => AxesPlacement::Rect(config.locations.rect(c, settings.tight_layout)),
        Some(Location::Rect(r)) => AxesPlacement::Rect(r),
        None => AxesPlacement::Default,
    })
}

fn fill_missing(opts: &mut StyleMap, key: &str, v: Value) {
    if !opts.contains(key) && !v.is_none() {
        opts.insert(key, v);
    }
}

fn legend_label(opts: &mut StyleMap) -> Option<String> {
    opts.remove("label")
        .and_then(|v| v.as_str().map(str::to_string))
        .filter(|l| l != NO_LEGEND)
}

/// One layer's drawing pass against its axes.
struct LayerPass<'a> {
    config: &'a Config,
    settings: &'a PlotSettings,
    layer: &'a Layer,
    ax: AxesId,
}

impl LayerPass<'_> {
    fn draw(&self, backend: &mut dyn Backend) {
        self.scales(backend);
        if let Some(title) = &self.layer.title {
            backend.set_title(self.ax, &title.text, &title.font);
        }
        if let Some(grid) = &self.layer.grid {
            backend.grid(self.ax, grid);
        }
        if !self.layer.series.is_empty() {
            match self.layer.plot_type {
                PlotType::Line => self.lines(backend),
                PlotType::Bar => self.bars(backend),
                PlotType::Hist => self.hist(backend),
                PlotType::Boxplot | PlotType::BoxScatter => self.boxes(backend),
            }
        }
        self.axes_decorations(backend);
        self.annotations(backend);
        self.legend(backend);
    }

    fn scales(&self, backend: &mut dyn Backend) {
        let l = self.layer;
        if l.axes_type.log_x() {
            backend.set_scale(self.ax, Axis::X, Scale::Log { base: l.x_base });
        }
        if l.axes_type.log_y() {
            backend.set_scale(self.ax, Axis::Y, Scale::Log { base: l.y_base });
        }
        if !l.axes_type.log_x() && !l.axes_type.log_y() {
            let plain = StyleMap::new().with("style", "plain").with("useoffset", false);
            for axis in [Axis::X, Axis::Y] {
                backend.set_scale(self.ax, axis, Scale::Linear);
                backend.set_tick_format(self.ax, axis, &plain);
            }
        }
    }

    fn resolved(&self, feature: Feature) -> Vec<StyleMap> {
        let defaults = self.config.defaults(feature);
        self.layer.series.iter().map(|s| resolve(defaults, &s.options)).collect()
    }

    /// Cycled styles for elements with the given increment flags.
    fn styles(&self, backend: &mut dyn Backend, increments: &[bool], palette: Palette<'_>) -> Vec<Style> {
        let unique: Option<Vec<Value>> = self.layer.unique_colors.then(|| {
            backend
                .sample_colormap(&self.layer.color_map, increment_count(increments) + 1)
                .into_iter()
                .map(Value::Rgba)
                .collect()
        });
        assign(increments, &palette, unique.as_deref())
    }

    fn hatch_palette(&self) -> Palette<'_> {
        let p = &self.config.palettes;
        Palette { colors: &p.colors, marks: &p.hatches, fills: &p.hatch_fills }
    }

    fn lines(&self, backend: &mut dyn Backend) {
        let resolved = self.resolved(Feature::Line);
        let increments: Vec<bool> = resolved.iter().map(|o| o.get_bool("increment").unwrap_or(true)).collect();
        let p = &self.config.palettes;
        let palette = Palette { colors: &p.colors, marks: &p.markers, fills: &p.marker_fills };
        let styles = self.styles(backend, &increments, palette);

        for ((series, mut opts), style) in self.layer.series.iter().zip(resolved).zip(styles) {
            fill_missing(&mut opts, "color", style.color);
            fill_missing(&mut opts, "marker", style.mark);
            fill_missing(&mut opts, "mfc", style.fill);
            let spline = opts.get_bool("spline").unwrap_or(false);
            let order = opts.get_f64("sp_order").unwrap_or(3.0).max(1.0) as usize;
            let smooth = opts.get_f64("sp_smooth").unwrap_or(0.0);
            let points = opts.get_f64("sp_points").unwrap_or(1000.0).max(2.0) as usize;
            for key in LINE_ONLY_KEYS {
                opts.remove(key);
            }
            if spline && self.spline(backend, series, order, smooth, points, &opts) {
                opts.insert("lw", 0);
                opts.insert("ls", "");
            }
            backend.errorbar(self.ax, &series.x, &series.y, series.xerr.as_deref(), series.yerr.as_deref(), &opts);
        }
    }

    /// Draw the fitted curve; false when the series cannot be fitted.
    fn spline(&self, backend: &mut dyn Backend, series: &Series, order: usize, smooth: f64, points: usize, opts: &StyleMap) -> bool {
        let (Some(&first), Some(&last)) = (series.x.first(), series.x.last()) else {
            return false;
        };
        let at = linspace(first, last, points);
        let Some(fitted) = spline::fit(&series.x, &series.y, order, smooth, &at) else {
            log::warn!("kaplot: layer '{}': not enough distinct points for a spline", self.layer.name);
            return false;
        };
        let sp_opts: StyleMap = SPLINE_KEYS
            .iter()
            .filter_map(|k| opts.get(k).map(|v| (*k, v.clone())))
            .collect();
        backend.errorbar(self.ax, &at, &fitted, None, None, &sp_opts);
        true
    }

    fn bars(&self, backend: &mut dyn Backend) {
        let resolved = self.resolved(Feature::Bar);
        let increments: Vec<bool> = resolved.iter().map(|o| o.get_bool("increment").unwrap_or(true)).collect();
        let styles = self.styles(backend, &increments, self.hatch_palette());

        for ((series, mut opts), style) in self.layer.series.iter().zip(resolved).zip(styles) {
            fill_missing(&mut opts, "color", style.color);
            fill_missing(&mut opts, "hatch", style.mark);
            fill_missing(&mut opts, "fill", style.fill);
            opts.remove("increment");
            backend.bar(self.ax, &series.x, &series.y, series.xerr.as_deref(), series.yerr.as_deref(), &opts);
        }
    }

    /// Every series of the layer goes into a single histogram call.
    fn hist(&self, backend: &mut dyn Backend) {
        let resolved = self.resolved(Feature::Hist);
        let increments: Vec<bool> = resolved.iter().map(|o| o.get_bool("increment").unwrap_or(true)).collect();
        let styles = self.styles(backend, &increments, self.hatch_palette());

        let n = resolved.len();
        let (mut datasets, mut labels, mut colors) = (Vec::with_capacity(n), Vec::with_capacity(n), Vec::with_capacity(n));
        let mut merged = StyleMap::new();
        for ((series, mut opts), style) in self.layer.series.iter().zip(resolved).zip(styles) {
            opts.remove("increment");
            colors.push(opts.remove("color").unwrap_or(style.color));
            datasets.push(series.y.clone());
            labels.push(legend_label(&mut opts).unwrap_or_default());
            let (min, max) = (opts.remove("min"), opts.remove("max"));
            if min.is_some() || max.is_some() {
                opts.insert("range", Value::List(vec![min.unwrap_or(Value::None), max.unwrap_or(Value::None)]));
            }
            merged.extend_from(&opts);
        }
        backend.hist(self.ax, &datasets, &labels, &colors, &merged);
    }

    fn boxes(&self, backend: &mut dyn Backend) {
        let resolved = self.resolved(Feature::Boxplot);
        let n = resolved.len();
        let (mut datasets, mut labels, mut positions, mut fills) =
            (Vec::with_capacity(n), Vec::with_capacity(n), Vec::with_capacity(n), Vec::with_capacity(n));
        let mut merged = StyleMap::new();
        for (i, (series, mut opts)) in self.layer.series.iter().zip(resolved).enumerate() {
            opts.remove("increment");
            datasets.push(series.y.clone());
            fills.push(opts.remove("box_fill_color").filter(|v| !v.is_none()));
            labels.push(legend_label(&mut opts));
            positions.push(opts.remove("loc").and_then(|v| v.as_f64()).unwrap_or((i + 1) as f64));
            for (key, v) in opts.iter() {
                match key {
                    "width" | "showmean" | "showcap" => merged.insert(&format!("{key}s"), v.clone()),
                    _ => merged.insert(key, v.clone()),
                };
            }
        }
        backend.boxplot(self.ax, &datasets, &labels, &positions, &fills, &merged);

        if self.layer.plot_type == PlotType::BoxScatter {
            let whis = merged.get_f64("whis").unwrap_or(DEFAULT_WHIS);
            let vert = merged.get_bool("vert").unwrap_or(true);
            let mut jitter = Jitter::new(self.settings.jitter_seed);
            let (mut pos, mut vals) = (Vec::new(), Vec::new());
            for (data, &p) in datasets.iter().zip(&positions) {
                for v in iqr_trim(data, whis) {
                    pos.push(p + jitter.next_offset());
                    vals.push(v);
                }
            }
            let opts = resolve(self.config.defaults(Feature::BoxScatter), &StyleMap::new());
            if vert {
                backend.scatter(self.ax, &pos, &vals, &opts);
            } else {
                backend.scatter(self.ax, &vals, &pos, &opts);
            }
        }
    }

    fn axes_decorations(&self, backend: &mut dyn Backend) {
        let l = self.layer;
        if let Some(label) = &l.x_label {
            backend.set_label(self.ax, Axis::X, &label.text, &label.font);
        }
        if let Some(label) = &l.y_label {
            backend.set_label(self.ax, Axis::Y, &label.text, &label.font);
        }
        for (axis, ticks) in [(Axis::X, &l.x_ticks), (Axis::Y, &l.y_ticks)] {
            match ticks {
                Some(TickLabels { ticks: Some(t), font }) => backend.set_ticks(self.ax, axis, t, font),
                Some(TickLabels { ticks: None, font }) => backend.restyle_tick_labels(self.ax, axis, font),
                None => {}
            }
        }
        for (axis, format) in [(Axis::X, &l.x_tick_format), (Axis::Y, &l.y_tick_format)] {
            if let Some(f) = format {
                backend.set_tick_format(self.ax, axis, f);
            }
        }
        for (axis, params) in [(Axis::X, &l.x_tick_params), (Axis::Y, &l.y_tick_params)] {
            if let Some(p) = params {
                let mut p = p.clone();
                if let Some(max_ticks) = p.remove("maxticks") {
                    backend.set_locator(self.ax, axis, &max_ticks);
                }
                backend.tick_params(self.ax, axis, &p);
            }
        }
        for (axis, limits) in [(Axis::X, &l.x_limits), (Axis::Y, &l.y_limits)] {
            if let Some(lim) = limits.filter(|lim| lim.min.is_some() || lim.max.is_some()) {
                backend.set_limits(self.ax, axis, lim.min, lim.max);
            }
        }
        let f = &l.frames;
        for (visible, spine) in [(f.top, Spine::Top), (f.bottom, Spine::Bottom), (f.right, Spine::Right), (f.left, Spine::Left)] {
            if !visible {
                backend.hide_spine(self.ax, spine);
            }
        }
    }

    fn annotations(&self, backend: &mut dyn Backend) {
        let l = self.layer;
        let view = backend.axes_view(self.ax);
        // bounds arrive in data units and the backend wants axes fractions
        let frac_x = |opts: &mut StyleMap, key: &str| {
            if let Some(v) = opts.get_f64(key) {
                opts.insert(key, to_axes_fraction(&view, v, 0.0).0);
            }
        };
        let frac_y = |opts: &mut StyleMap, key: &str| {
            if let Some(v) = opts.get_f64(key) {
                opts.insert(key, to_axes_fraction(&view, 0.0, v).1);
            }
        };

        for line in &l.hlines {
            let mut opts = line.options.clone();
            frac_x(&mut opts, "xmin");
            frac_x(&mut opts, "xmax");
            backend.axhline(self.ax, line.at, &opts);
        }
        for line in &l.vlines {
            let mut opts = line.options.clone();
            frac_y(&mut opts, "ymin");
            frac_y(&mut opts, "ymax");
            backend.axvline(self.ax, line.at, &opts);
        }
        for note in &l.notes {
            backend.text(self.ax, note.x, note.y, &note.text, &note.font);
        }

        if !l.spans.is_empty() {
            let increments: Vec<bool> = l.spans.iter().map(|s| s.options.get_bool("increment").unwrap_or(true)).collect();
            let styles = self.styles(backend, &increments, self.hatch_palette());
            for (span, style) in l.spans.iter().zip(styles) {
                let mut opts = span.options.clone();
                fill_missing(&mut opts, "color", style.color);
                fill_missing(&mut opts, "hatch", style.mark);
                fill_missing(&mut opts, "fill", style.fill);
                opts.remove("increment");
                opts.insert("xmin", to_axes_fraction(&view, span.xmin, 0.0).0);
                opts.insert("xmax", to_axes_fraction(&view, span.xmax, 0.0).0);
                backend.axhspan(self.ax, span.ymin, span.ymax, &opts);
            }
        }

        for a in &l.arrows {
            backend.arrow(self.ax, a.x, a.y, a.dx, a.dy, &a.options);
        }
    }

    fn legend(&self, backend: &mut dyn Backend) {
        let Some(legend) = self.layer.legend.as_ref().filter(|l| l.enabled) else {
            return;
        };
        backend.legend(self.ax, &legend.options, &legend.font);
        if legend.options.get("title").is_some_and(|t| !t.is_none()) {
            backend.restyle_legend_title(self.ax, &legend.font);
        }
    }
}
