// File: crates/kaplot-core/src/record.rs
// Summary: Recording backend; captures every backend call as a `Call` value while keeping
//          a real view registry so coordinate conversion behaves like a drawing backend.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::backend::{Backend, SaveOptions, Spine};
use crate::layer::Axis;
use crate::range::Ticks;
use crate::scale::Scale;
use crate::value::{StyleMap, Value};
use crate::view::{AxesId, AxesPlacement, AxesRegistry, AxesView};

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    CreateAxes { id: AxesId, placement: AxesPlacement },
    SetScale { ax: AxesId, axis: Axis, scale: Scale },
    SetTitle { ax: AxesId, text: String, font: StyleMap },
    Grid { ax: AxesId, opts: StyleMap },
    Errorbar { ax: AxesId, x: Vec<f64>, y: Vec<f64>, xerr: Option<Vec<f64>>, yerr: Option<Vec<f64>>, opts: StyleMap },
    Bar { ax: AxesId, left: Vec<f64>, height: Vec<f64>, xerr: Option<Vec<f64>>, yerr: Option<Vec<f64>>, opts: StyleMap },
    Hist { ax: AxesId, datasets: Vec<Vec<f64>>, labels: Vec<String>, colors: Vec<Value>, opts: StyleMap },
    Boxplot {
        ax: AxesId,
        datasets: Vec<Vec<f64>>,
        labels: Vec<Option<String>>,
        positions: Vec<f64>,
        fills: Vec<Option<Value>>,
        opts: StyleMap,
    },
    Scatter { ax: AxesId, x: Vec<f64>, y: Vec<f64>, opts: StyleMap },
    SetLabel { ax: AxesId, axis: Axis, text: String, font: StyleMap },
    SetTicks { ax: AxesId, axis: Axis, ticks: Ticks, font: StyleMap },
    RestyleTickLabels { ax: AxesId, axis: Axis, font: StyleMap },
    SetTickFormat { ax: AxesId, axis: Axis, opts: StyleMap },
    SetLocator { ax: AxesId, axis: Axis, max_ticks: Value },
    TickParams { ax: AxesId, axis: Axis, opts: StyleMap },
    SetLimits { ax: AxesId, axis: Axis, min: Option<f64>, max: Option<f64> },
    HideSpine { ax: AxesId, spine: Spine },
    Axhline { ax: AxesId, y: f64, opts: StyleMap },
    Axvline { ax: AxesId, x: f64, opts: StyleMap },
    Text { ax: AxesId, x: f64, y: f64, s: String, font: StyleMap },
    Axhspan { ax: AxesId, ymin: f64, ymax: f64, opts: StyleMap },
    Arrow { ax: AxesId, x: f64, y: f64, dx: f64, dy: f64, opts: StyleMap },
    Legend { ax: AxesId, opts: StyleMap, font: StyleMap },
    RestyleLegendTitle { ax: AxesId, font: StyleMap },
    UseStyle { name: String },
    Sketch,
    TightLayout { pad: f64 },
    Export { path: PathBuf, opts: SaveOptions },
}

impl Call {
    /// Short name for logs and assertions.
    pub fn name(&self) -> &'static str {
        match self {
            Call::CreateAxes { .. } => "create_axes",
            Call::SetScale { .. } => "set_scale",
            Call::SetTitle { .. } => "set_title",
            Call::Grid { .. } => "grid",
            Call::Errorbar { .. } => "errorbar",
            Call::Bar { .. } => "bar",
            Call::Hist { .. } => "hist",
            Call::Boxplot { .. } => "boxplot",
            Call::Scatter { .. } => "scatter",
            Call::SetLabel { .. } => "set_label",
            Call::SetTicks { .. } => "set_ticks",
            Call::RestyleTickLabels { .. } => "restyle_tick_labels",
            Call::SetTickFormat { .. } => "set_tick_format",
            Call::SetLocator { .. } => "set_locator",
            Call::TickParams { .. } => "tick_params",
            Call::SetLimits { .. } => "set_limits",
            Call::HideSpine { .. } => "hide_spine",
            Call::Axhline { .. } => "axhline",
            Call::Axvline { .. } => "axvline",
            Call::Text { .. } => "text",
            Call::Axhspan { .. } => "axhspan",
            Call::Arrow { .. } => "arrow",
            Call::Legend { .. } => "legend",
            Call::RestyleLegendTitle { .. } => "restyle_legend_title",
            Call::UseStyle { .. } => "use_style",
            Call::Sketch => "sketch",
            Call::TightLayout { .. } => "tight_layout",
            Call::Export { .. } => "export",
        }
    }
}

/// Backend that draws nothing and remembers everything.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub calls: Vec<Call>,
    views: AxesRegistry,
}

impl RecordingBackend {
    pub fn new() -> Self { Self::default() }

    pub fn names(&self) -> Vec<&'static str> {
        self.calls.iter().map(Call::name).collect()
    }

    /// Calls whose name is `name`, in order.
    pub fn find<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Call> + 'a {
        self.calls.iter().filter(move |c| c.name() == name)
    }

    pub fn axes_count(&self) -> usize { self.views.len() }
    pub fn registry(&self) -> &AxesRegistry { &self.views }

    fn push(&mut self, call: Call) {
        log::trace!("kaplot: {}", call.name());
        self.calls.push(call);
    }
}

fn owned(v: Option<&[f64]>) -> Option<Vec<f64>> { v.map(<[f64]>::to_vec) }

impl Backend for RecordingBackend {
    fn create_axes(&mut self, placement: AxesPlacement) -> AxesId {
        let id = self.views.create(&placement);
        self.push(Call::CreateAxes { id, placement });
        id
    }

    fn set_scale(&mut self, ax: AxesId, axis: Axis, scale: Scale) {
        self.views.set_scale(ax, axis, scale);
        self.push(Call::SetScale { ax, axis, scale });
    }

    fn set_title(&mut self, ax: AxesId, text: &str, font: &StyleMap) {
        self.push(Call::SetTitle { ax, text: text.to_string(), font: font.clone() });
    }

    fn grid(&mut self, ax: AxesId, opts: &StyleMap) {
        self.push(Call::Grid { ax, opts: opts.clone() });
    }

    fn errorbar(&mut self, ax: AxesId, x: &[f64], y: &[f64], xerr: Option<&[f64]>, yerr: Option<&[f64]>, opts: &StyleMap) {
        self.views.extend_xy(ax, x, y);
        self.push(Call::Errorbar { ax, x: x.to_vec(), y: y.to_vec(), xerr: owned(xerr), yerr: owned(yerr), opts: opts.clone() });
    }

    fn bar(&mut self, ax: AxesId, left: &[f64], height: &[f64], xerr: Option<&[f64]>, yerr: Option<&[f64]>, opts: &StyleMap) {
        self.views.extend_xy(ax, left, height);
        self.views.extend(ax, Axis::Y, [0.0]);
        self.push(Call::Bar { ax, left: left.to_vec(), height: height.to_vec(), xerr: owned(xerr), yerr: owned(yerr), opts: opts.clone() });
    }

    fn hist(&mut self, ax: AxesId, datasets: &[Vec<f64>], labels: &[String], colors: &[Value], opts: &StyleMap) {
        for d in datasets {
            self.views.extend(ax, Axis::X, d.iter().copied());
        }
        self.views.extend(ax, Axis::Y, [0.0]);
        self.push(Call::Hist { ax, datasets: datasets.to_vec(), labels: labels.to_vec(), colors: colors.to_vec(), opts: opts.clone() });
    }

    fn boxplot(
        &mut self,
        ax: AxesId,
        datasets: &[Vec<f64>],
        labels: &[Option<String>],
        positions: &[f64],
        fills: &[Option<Value>],
        opts: &StyleMap,
    ) {
        let (pos_axis, val_axis) = if opts.get_bool("vert").unwrap_or(true) { (Axis::X, Axis::Y) } else { (Axis::Y, Axis::X) };
        self.views.extend(ax, pos_axis, positions.iter().copied());
        for d in datasets {
            self.views.extend(ax, val_axis, d.iter().copied());
        }
        self.push(Call::Boxplot {
            ax,
            datasets: datasets.to_vec(),
            labels: labels.to_vec(),
            positions: positions.to_vec(),
            fills: fills.to_vec(),
            opts: opts.clone(),
        });
    }

    fn scatter(&mut self, ax: AxesId, x: &[f64], y: &[f64], opts: &StyleMap) {
        self.views.extend_xy(ax, x, y);
        self.push(Call::Scatter { ax, x: x.to_vec(), y: y.to_vec(), opts: opts.clone() });
    }

    fn set_label(&mut self, ax: AxesId, axis: Axis, text: &str, font: &StyleMap) {
        self.push(Call::SetLabel { ax, axis, text: text.to_string(), font: font.clone() });
    }

    fn set_ticks(&mut self, ax: AxesId, axis: Axis, ticks: &Ticks, font: &StyleMap) {
        self.push(Call::SetTicks { ax, axis, ticks: ticks.clone(), font: font.clone() });
    }

    fn restyle_tick_labels(&mut self, ax: AxesId, axis: Axis, font: &StyleMap) {
        self.push(Call::RestyleTickLabels { ax, axis, font: font.clone() });
    }

    fn set_tick_format(&mut self, ax: AxesId, axis: Axis, opts: &StyleMap) {
        self.push(Call::SetTickFormat { ax, axis, opts: opts.clone() });
    }

    fn set_locator(&mut self, ax: AxesId, axis: Axis, max_ticks: &Value) {
        self.push(Call::SetLocator { ax, axis, max_ticks: max_ticks.clone() });
    }

    fn tick_params(&mut self, ax: AxesId, axis: Axis, opts: &StyleMap) {
        self.push(Call::TickParams { ax, axis, opts: opts.clone() });
    }

    fn set_limits(&mut self, ax: AxesId, axis: Axis, min: Option<f64>, max: Option<f64>) {
        self.views.set_limits(ax, axis, min, max);
        self.push(Call::SetLimits { ax, axis, min, max });
    }

    fn hide_spine(&mut self, ax: AxesId, spine: Spine) {
        self.push(Call::HideSpine { ax, spine });
    }

    fn axes_view(&self, ax: AxesId) -> AxesView { self.views.view(ax) }

    fn axhline(&mut self, ax: AxesId, y: f64, opts: &StyleMap) {
        self.push(Call::Axhline { ax, y, opts: opts.clone() });
    }

    fn axvline(&mut self, ax: AxesId, x: f64, opts: &StyleMap) {
        self.push(Call::Axvline { ax, x, opts: opts.clone() });
    }

    fn text(&mut self, ax: AxesId, x: f64, y: f64, s: &str, font: &StyleMap) {
        self.push(Call::Text { ax, x, y, s: s.to_string(), font: font.clone() });
    }

    fn axhspan(&mut self, ax: AxesId, ymin: f64, ymax: f64, opts: &StyleMap) {
        self.push(Call::Axhspan { ax, ymin, ymax, opts: opts.clone() });
    }

    fn arrow(&mut self, ax: AxesId, x: f64, y: f64, dx: f64, dy: f64, opts: &StyleMap) {
        self.push(Call::Arrow { ax, x, y, dx, dy, opts: opts.clone() });
    }

    fn legend(&mut self, ax: AxesId, opts: &StyleMap, font: &StyleMap) {
        self.push(Call::Legend { ax, opts: opts.clone(), font: font.clone() });
    }

    fn restyle_legend_title(&mut self, ax: AxesId, font: &StyleMap) {
        self.push(Call::RestyleLegendTitle { ax, font: font.clone() });
    }

    fn use_style(&mut self, name: &str) {
        self.push(Call::UseStyle { name: name.to_string() });
    }

    fn sketch(&mut self) { self.push(Call::Sketch); }

    fn tight_layout(&mut self, pad: f64) {
        self.push(Call::TightLayout { pad });
    }

    fn export(&mut self, path: &Path, opts: &SaveOptions) -> Result<()> {
        self.push(Call::Export { path: path.to_path_buf(), opts: opts.clone() });
        Ok(())
    }
}
