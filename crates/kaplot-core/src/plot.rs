// File: crates/kaplot-core/src/plot.rs
// Summary: `Plot` (ordered, name-keyed layers plus figure settings) and the per-layer
//          configuration calls, export and JSON persistence.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::backend::{Backend, SaveOptions};
use crate::defaults::{Config, Feature, PlotSettings};
use crate::error::{PlotError, PlotResult};
use crate::layer::{
    Arrow, Axis, AxesType, Caption, Layer, LayerName, Legend, Limits, Location, Note, PlotType, RefLine, Span,
    TickLabels, Twin,
};
use crate::range::TickSpec;
use crate::render::{self, RenderState};
use crate::series::Series;
use crate::settings::resolve;
use crate::value::{StyleMap, Value};

/// Padding used when tight layout is applied at export.
pub const TIGHT_LAYOUT_PAD: f64 = 0.75;

/// A figure made of named layers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Plot {
    config: Config,
    settings: PlotSettings,
    layers: Vec<Layer>,
    #[serde(skip)]
    state: RenderState,
}

impl Default for Plot {
    fn default() -> Self { Self::new() }
}

impl Plot {
    pub fn new() -> Self { Self::with_config(Config::default()) }

    /// Build with an explicit configuration; the `main` layer always exists.
    pub fn with_config(config: Config) -> Self {
        let settings = config.plot.clone();
        let main = Layer::new(LayerName::main(), &settings.color_map);
        Self { config, settings, layers: vec![main], state: RenderState::default() }
    }

    pub fn config(&self) -> &Config { &self.config }
    pub fn settings(&self) -> &PlotSettings { &self.settings }
    pub fn layers(&self) -> &[Layer] { &self.layers }
    pub fn state(&self) -> RenderState { self.state }

    pub fn layer_names(&self) -> impl Iterator<Item = &LayerName> {
        self.layers.iter().map(|l| &l.name)
    }

    pub fn get(&self, name: &str) -> Option<&Layer> {
        let key = LayerName::new(name);
        self.layers.iter().find(|l| l.name == key)
    }

    /// Style sheet applied before any layer is drawn; `None` clears it.
    pub fn set_style(&mut self, name: Option<&str>) -> &mut Self {
        self.settings.style = name.map(str::to_string);
        self
    }

    pub fn set_tight(&mut self, tight: bool) -> &mut Self {
        self.settings.tight_layout = tight;
        self
    }

    pub fn set_xkcd(&mut self, xkcd: bool) -> &mut Self {
        self.settings.xkcd = xkcd;
        self
    }

    pub fn set_jitter_seed(&mut self, seed: u64) -> &mut Self {
        self.settings.jitter_seed = seed;
        self
    }

    /// Editor for an existing layer.
    pub fn layer(&mut self, name: &str) -> PlotResult<LayerEditor<'_>> {
        let key = LayerName::new(name);
        let Plot { config, settings, layers, .. } = self;
        match layers.iter_mut().find(|l| l.name == key) {
            Some(layer) => Ok(LayerEditor { config, settings, layer }),
            None => {
                log::warn!("kaplot: no layer named '{key}'");
                Err(PlotError::UnknownLayer(key.to_string()))
            }
        }
    }

    fn push_layer(&mut self, name: &str, location: Option<Location>, twin: Option<Twin>) -> PlotResult<LayerEditor<'_>> {
        let key = LayerName::new(name);
        if self.layers.iter().any(|l| l.name == key) {
            log::warn!("kaplot: layer '{key}' already exists");
            return Err(PlotError::DuplicateLayer(key.to_string()));
        }
        let mut layer = Layer::new(key.clone(), &self.settings.color_map);
        layer.location = location;
        layer.twin = twin;
        log::debug!("kaplot: added layer '{key}'");
        self.layers.push(layer);
        self.layer(key.as_str())
    }

    /// New layer on the default axes.
    pub fn add_layer(&mut self, name: &str) -> PlotResult<LayerEditor<'_>> {
        self.push_layer(name, None, None)
    }

    /// New layer placed at a named corner or explicit figure rectangle.
    pub fn add_layer_at(&mut self, name: &str, location: impl Into<Location>) -> PlotResult<LayerEditor<'_>> {
        self.push_layer(name, Some(location.into()), None)
    }

    /// New layer sharing the `share` axis of the existing layer `of`.
    pub fn add_twin_layer(&mut self, name: &str, share: Axis, of: &str) -> PlotResult<LayerEditor<'_>> {
        let of = LayerName::new(of);
        if self.get(of.as_str()).is_none() {
            log::warn!("kaplot: twin reference '{of}' does not exist");
            return Err(PlotError::UnknownLayer(of.to_string()));
        }
        self.push_layer(name, None, Some(Twin { share, of }))
    }

    /// Issue every backend call describing this plot. Layers are read, never modified,
    /// so rendering twice produces the same call sequence.
    pub fn render(&mut self, backend: &mut dyn Backend) -> PlotResult<()> {
        let mut state = RenderState::Unrendered;
        let res = render::render(self, backend, &mut state);
        self.state = state;
        res
    }

    /// Export through `backend` with save settings resolved over the configured defaults.
    pub fn save_figure(&self, backend: &mut dyn Backend, path: impl AsRef<Path>, overrides: &StyleMap) -> anyhow::Result<()> {
        let resolved = resolve(self.config.defaults(Feature::SaveFig), overrides);
        let opts = SaveOptions::from_map(&resolved);
        if self.settings.tight_layout {
            backend.tight_layout(TIGHT_LAYOUT_PAD);
        }
        log::info!("kaplot: saving figure to {}", path.as_ref().display());
        backend
            .export(path.as_ref(), &opts)
            .with_context(|| format!("export figure to {}", path.as_ref().display()))
    }

    pub fn to_json(&self) -> PlotResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> PlotResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Write the whole plot description for later editing.
    pub fn save_state(&self, path: impl AsRef<Path>) -> PlotResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load_state(path: impl AsRef<Path>) -> PlotResult<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}

/// Which axes a tick call applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axes {
    X,
    Y,
    Both,
}

fn parse_axes(s: &str) -> Option<Axes> {
    match s.trim().to_ascii_lowercase().as_str() {
        "x" => Some(Axes::X),
        "y" => Some(Axes::Y),
        "both" => Some(Axes::Both),
        _ => None,
    }
}

/// Configuration calls for one layer. Invalid names and numbers are logged and ignored.
pub struct LayerEditor<'a> {
    config: &'a Config,
    settings: &'a PlotSettings,
    layer: &'a mut Layer,
}

impl LayerEditor<'_> {
    pub fn layer(&self) -> &Layer { self.layer }
    pub fn name(&self) -> &LayerName { &self.layer.name }

    fn resolve(&self, feature: Feature, opts: &StyleMap) -> StyleMap {
        resolve(self.config.defaults(feature), opts)
    }

    /// `line`, `bar`, `hist`/`histogram`, `box`/`boxplot` or `boxscatter`.
    pub fn set_plot_type(&mut self, ptype: &str) -> &mut Self {
        match ptype.parse::<PlotType>() {
            Ok(t) => self.layer.plot_type = t,
            Err(e) => log::warn!("kaplot: set_plot_type: {e}"),
        }
        self
    }

    /// `linear`, `log-log`, `semilog-x` or `semilog-y`.
    pub fn set_axes_type(&mut self, atype: &str) -> &mut Self {
        match atype.parse::<AxesType>() {
            Ok(t) => self.layer.axes_type = t,
            Err(e) => log::warn!("kaplot: set_axes_type: {e}"),
        }
        self
    }

    /// Log bases; numbers or numeric strings.
    pub fn set_base(&mut self, basex: impl Into<Value>, basey: impl Into<Value>) -> &mut Self {
        let parse = |v: Value| match v.as_f64() {
            Some(b) if b.is_finite() && b > 0.0 && b != 1.0 => Ok(b),
            _ => Err(PlotError::InvalidNumber(v.to_string())),
        };
        match (parse(basex.into()), parse(basey.into())) {
            (Ok(x), Ok(y)) => {
                self.layer.x_base = x;
                self.layer.y_base = y;
            }
            (Err(e), _) | (_, Err(e)) => log::warn!("kaplot: set_base: {e}"),
        }
        self
    }

    pub fn set_title(&mut self, title: &str, font: &StyleMap) -> &mut Self {
        let font = self.resolve(Feature::TitleFont, font);
        self.layer.title = Some(Caption { text: title.to_string(), font });
        self
    }

    pub fn set_grid(&mut self, enabled: bool, opts: &StyleMap) -> &mut Self {
        self.layer.grid = enabled.then(|| self.resolve(Feature::Grid, opts));
        self
    }

    /// Axis label; with a unit the text becomes `label + sep_l + unit + sep_r`.
    pub fn set_xlabel(&mut self, label: &str, unit: Option<&str>, font: &StyleMap) -> &mut Self {
        let text = match unit {
            Some(u) => format!("{label}{}{u}{}", self.settings.x_label_sep_l, self.settings.x_label_sep_r),
            None => label.to_string(),
        };
        let font = self.resolve(Feature::XLabelFont, font);
        self.layer.x_label = Some(Caption { text, font });
        self
    }

    pub fn set_ylabel(&mut self, label: &str, unit: Option<&str>, font: &StyleMap) -> &mut Self {
        let text = match unit {
            Some(u) => format!("{label}{}{u}{}", self.settings.y_label_sep_l, self.settings.y_label_sep_r),
            None => label.to_string(),
        };
        let font = self.resolve(Feature::YLabelFont, font);
        self.layer.y_label = Some(Caption { text, font });
        self
    }

    fn tick_labels(&self, feature: Feature, spec: Option<&TickSpec>, font: &StyleMap, previous: Option<&TickLabels>) -> TickLabels {
        let ticks = match spec.map(TickSpec::resolve) {
            Some(t) if !t.values.is_empty() => Some(t),
            // an empty tick list keeps whatever was set before
            _ => previous.and_then(|p| p.ticks.clone()),
        };
        TickLabels { ticks, font: self.resolve(feature, font) }
    }

    /// Explicit ticks (`None` restyles the backend's own tick labels with `font`).
    pub fn set_xticks(&mut self, spec: Option<TickSpec>, font: &StyleMap) -> &mut Self {
        let t = self.tick_labels(Feature::XTickFont, spec.as_ref(), font, self.layer.x_ticks.as_ref());
        self.layer.x_ticks = Some(t);
        self
    }

    pub fn set_yticks(&mut self, spec: Option<TickSpec>, font: &StyleMap) -> &mut Self {
        let t = self.tick_labels(Feature::YTickFont, spec.as_ref(), font, self.layer.y_ticks.as_ref());
        self.layer.y_ticks = Some(t);
        self
    }

    pub fn set_xlim(&mut self, min: Option<f64>, max: Option<f64>) -> &mut Self {
        self.layer.x_limits = Some(Limits { min, max });
        self
    }

    pub fn set_ylim(&mut self, min: Option<f64>, max: Option<f64>) -> &mut Self {
        self.layer.y_limits = Some(Limits { min, max });
        self
    }

    /// Tick mark parameters for `x`, `y` or `both` (x keys to x, y keys to y).
    pub fn set_tick_params(&mut self, axis: &str, opts: &StyleMap) -> &mut Self {
        let Some(which) = parse_axes(axis) else {
            log::warn!("kaplot: set_tick_params: '{axis}' is not x, y or both");
            return self;
        };
        if which != Axes::Y {
            self.layer.x_tick_params = Some(self.resolve(Feature::XTickParams, opts));
        }
        if which != Axes::X {
            self.layer.y_tick_params = Some(self.resolve(Feature::YTickParams, opts));
        }
        self
    }

    /// Number format (`style`, `sci_min`/`sci_max`, `useoffset`) for `x`, `y` or `both`.
    pub fn set_tick_format(&mut self, axis: &str, opts: &StyleMap) -> &mut Self {
        let Some(which) = parse_axes(axis) else {
            log::warn!("kaplot: set_tick_format: '{axis}' is not x, y or both");
            return self;
        };
        let format = |m: StyleMap| {
            let mut out = StyleMap::new();
            if let Some(style) = m.get("style") { out.insert("style", style.clone()); }
            let lim = |k: &str| m.get(k).cloned().unwrap_or(Value::Int(0));
            out.insert("scilimits", Value::List(vec![lim("sci_min"), lim("sci_max")]));
            if let Some(off) = m.get("useoffset") { out.insert("useoffset", off.clone()); }
            out
        };
        if which != Axes::Y {
            self.layer.x_tick_format = Some(format(self.resolve(Feature::XTickFormat, opts)));
        }
        if which != Axes::X {
            self.layer.y_tick_format = Some(format(self.resolve(Feature::YTickFormat, opts)));
        }
        self
    }

    /// Frame edge visibility; keys `top`, `bottom`, `left`, `right`.
    pub fn set_frames(&mut self, opts: &StyleMap) -> &mut Self {
        let f = &mut self.layer.frames;
        for (key, slot) in [("top", &mut f.top), ("bottom", &mut f.bottom), ("left", &mut f.left), ("right", &mut f.right)] {
            match opts.get(key) {
                Some(v) => match v.as_bool() {
                    Some(b) => *slot = b,
                    None => log::warn!("kaplot: set_frames: '{key}' must be true or false, got {v}"),
                },
                None => {}
            }
        }
        self
    }

    /// Sample colors from `cmap` (plot colormap when `None`) instead of cycling the palette.
    pub fn set_unique_colors(&mut self, enabled: bool, cmap: Option<&str>) -> &mut Self {
        self.layer.unique_colors = enabled;
        self.layer.color_map = cmap.unwrap_or(&self.settings.color_map).to_string();
        self
    }

    /// Legend; placement/style keys and font keys are read from the same map.
    pub fn set_legend(&mut self, enabled: bool, opts: &StyleMap) -> &mut Self {
        let options = self.resolve(Feature::Legend, opts);
        let font = self.resolve(Feature::LegendFont, opts);
        self.layer.legend = Some(Legend { enabled, options, font });
        self
    }

    fn ref_line(&self, at: f64, opts: &StyleMap, lo: &str, hi: &str) -> RefLine {
        let mut options = self.resolve(Feature::AxLine, opts);
        if let Some(v) = options.remove("min") { options.insert(lo, v); }
        if let Some(v) = options.remove("max") { options.insert(hi, v); }
        RefLine { at, options }
    }

    /// Horizontal line at `y`; `min`/`max` bound it in data x.
    pub fn add_axhline(&mut self, y: f64, opts: &StyleMap) -> &mut Self {
        let line = self.ref_line(y, opts, "xmin", "xmax");
        self.layer.hlines.push(line);
        self
    }

    /// Vertical line at `x`; `min`/`max` bound it in data y.
    pub fn add_axvline(&mut self, x: f64, opts: &StyleMap) -> &mut Self {
        let line = self.ref_line(x, opts, "ymin", "ymax");
        self.layer.vlines.push(line);
        self
    }

    pub fn add_text(&mut self, text: &str, x: f64, y: f64, font: &StyleMap) -> &mut Self {
        let font = self.resolve(Feature::TextFont, font);
        self.layer.notes.push(Note { text: text.to_string(), x, y, font });
        self
    }

    /// Data series; its options are resolved at render time against the layer's plot type.
    pub fn add_plotdata(&mut self, series: Series) -> &mut Self {
        self.layer.series.push(series);
        self
    }

    /// Band between two corners given in data coordinates.
    pub fn add_rectangle(&mut self, top: (f64, f64), bottom: (f64, f64), opts: &StyleMap) -> &mut Self {
        let options = self.resolve(Feature::Rectangle, opts);
        self.layer.spans.push(Span::from_corners(top, bottom, options));
        self
    }

    /// Arrow from `start` (tail) to `finish` (head).
    pub fn add_arrow(&mut self, start: (f64, f64), finish: (f64, f64), opts: &StyleMap) -> &mut Self {
        let options = self.resolve(Feature::Arrow, opts);
        self.layer.arrows.push(Arrow::between(start, finish, options));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_layer_exists() {
        let p = Plot::new();
        assert_eq!(p.layer_names().map(LayerName::as_str).collect::<Vec<_>>(), vec!["main"]);
        assert!(p.get("MAIN").is_some());
    }

    #[test]
    fn invalid_names_are_noops() {
        let mut p = Plot::new();
        p.layer("main").unwrap().set_plot_type("pie").set_axes_type("polar").set_base("ten", 2.0);
        let l = p.get("main").unwrap();
        assert_eq!(l.plot_type, PlotType::Line);
        assert_eq!(l.axes_type, AxesType::Linear);
        assert_eq!((l.x_base, l.y_base), (10.0, 10.0));
        assert!(matches!(p.layer("nope"), Err(PlotError::UnknownLayer(_))));
    }

    #[test]
    fn label_units_use_separators() {
        let mut p = Plot::new();
        p.layer("main").unwrap().set_xlabel("Time", Some("s"), &StyleMap::new());
        assert_eq!(p.get("main").unwrap().x_label.as_ref().unwrap().text, "Time , s");
    }

    #[test]
    fn both_axes_get_their_own_params() {
        let mut p = Plot::new();
        let opts = StyleMap::new().with("labelleft", false).with("labelbottom", false).with("length", 4);
        p.layer("main").unwrap().set_tick_params("both", &opts);
        let l = p.get("main").unwrap();
        let x = l.x_tick_params.as_ref().unwrap();
        let y = l.y_tick_params.as_ref().unwrap();
        assert!(x.contains("labelbottom") && !x.contains("labelleft"));
        assert!(y.contains("labelleft") && !y.contains("labelbottom"));
        assert_eq!(x.get_f64("length"), Some(4.0));
    }

    #[test]
    fn axline_min_max_are_renamed() {
        let mut p = Plot::new();
        p.layer("main").unwrap().add_axhline(1.0, &StyleMap::new().with("min", 2.0).with("color", "red"));
        let line = &p.get("main").unwrap().hlines[0];
        assert_eq!(line.options.get_f64("xmin"), Some(2.0));
        assert!(!line.options.contains("min"));
        assert!(!line.options.contains("xmax"));
    }
}
