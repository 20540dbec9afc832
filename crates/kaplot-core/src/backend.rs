// File: crates/kaplot-core/src/backend.rs
// Summary: Drawing backend seam. The render pipeline only talks to a backend through
//          this trait, passing flat option maps.

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::colormap::{sample_evenly, ColorMap};
use crate::layer::Axis;
use crate::range::Ticks;
use crate::scale::Scale;
use crate::value::{StyleMap, Value};
use crate::view::{AxesId, AxesPlacement, AxesView};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Spine {
    Top,
    Bottom,
    Left,
    Right,
}

/// Export settings resolved from the plot's save defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveOptions {
    pub dpi: f64,
    pub transparent: bool,
    /// Figure size in inches.
    pub width: f64,
    pub height: f64,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self { dpi: 100.0, transparent: false, width: 8.0, height: 6.0 }
    }
}

impl SaveOptions {
    /// Build from a resolved save-settings map; missing or non-numeric entries keep their defaults.
    pub fn from_map(m: &StyleMap) -> Self {
        let d = Self::default();
        Self {
            dpi: m.get_f64("dpi").unwrap_or(d.dpi),
            transparent: m.get_bool("transparent").unwrap_or(d.transparent),
            width: m.get_f64("width").unwrap_or(d.width),
            height: m.get_f64("height").unwrap_or(d.height),
        }
    }

    pub fn pixel_size(&self) -> (i32, i32) {
        ((self.width * self.dpi).round().max(1.0) as i32, (self.height * self.dpi).round().max(1.0) as i32)
    }
}

/// Operations a drawing backend provides.
///
/// Options arrive already resolved: keys whose default is "auto" are absent and
/// the backend applies its own defaults for them.
pub trait Backend {
    fn create_axes(&mut self, placement: AxesPlacement) -> AxesId;
    fn set_scale(&mut self, ax: AxesId, axis: Axis, scale: Scale);
    fn set_title(&mut self, ax: AxesId, text: &str, font: &StyleMap);
    fn grid(&mut self, ax: AxesId, opts: &StyleMap);

    /// Line/marker series with optional error bars.
    fn errorbar(&mut self, ax: AxesId, x: &[f64], y: &[f64], xerr: Option<&[f64]>, yerr: Option<&[f64]>, opts: &StyleMap);
    fn bar(&mut self, ax: AxesId, left: &[f64], height: &[f64], xerr: Option<&[f64]>, yerr: Option<&[f64]>, opts: &StyleMap);
    fn hist(&mut self, ax: AxesId, datasets: &[Vec<f64>], labels: &[String], colors: &[Value], opts: &StyleMap);
    /// `fills[i] == None` means the box is left unfilled.
    fn boxplot(
        &mut self,
        ax: AxesId,
        datasets: &[Vec<f64>],
        labels: &[Option<String>],
        positions: &[f64],
        fills: &[Option<Value>],
        opts: &StyleMap,
    );
    fn scatter(&mut self, ax: AxesId, x: &[f64], y: &[f64], opts: &StyleMap);

    fn set_label(&mut self, ax: AxesId, axis: Axis, text: &str, font: &StyleMap);
    fn set_ticks(&mut self, ax: AxesId, axis: Axis, ticks: &Ticks, font: &StyleMap);
    /// Restyle the backend's own tick labels.
    fn restyle_tick_labels(&mut self, ax: AxesId, axis: Axis, font: &StyleMap);
    fn set_tick_format(&mut self, ax: AxesId, axis: Axis, opts: &StyleMap);
    /// Cap the number of automatically placed ticks.
    fn set_locator(&mut self, ax: AxesId, axis: Axis, max_ticks: &Value);
    fn tick_params(&mut self, ax: AxesId, axis: Axis, opts: &StyleMap);
    fn set_limits(&mut self, ax: AxesId, axis: Axis, min: Option<f64>, max: Option<f64>);
    fn hide_spine(&mut self, ax: AxesId, spine: Spine);

    /// Current visible ranges and scales of `ax`.
    fn axes_view(&self, ax: AxesId) -> AxesView;

    /// Horizontal line at data `y`; `xmin`/`xmax` in `opts` are axes fractions.
    fn axhline(&mut self, ax: AxesId, y: f64, opts: &StyleMap);
    /// Vertical line at data `x`; `ymin`/`ymax` in `opts` are axes fractions.
    fn axvline(&mut self, ax: AxesId, x: f64, opts: &StyleMap);
    fn text(&mut self, ax: AxesId, x: f64, y: f64, s: &str, font: &StyleMap);
    /// Horizontal band between data `ymin`/`ymax`; `xmin`/`xmax` in `opts` are axes fractions.
    fn axhspan(&mut self, ax: AxesId, ymin: f64, ymax: f64, opts: &StyleMap);
    fn arrow(&mut self, ax: AxesId, x: f64, y: f64, dx: f64, dy: f64, opts: &StyleMap);
    fn legend(&mut self, ax: AxesId, opts: &StyleMap, font: &StyleMap);
    fn restyle_legend_title(&mut self, ax: AxesId, font: &StyleMap);

    /// `n` evenly spaced samples (`i / n`) from the named colormap.
    fn sample_colormap(&mut self, name: &str, n: usize) -> Vec<Rgba> {
        sample_evenly(ColorMap::lookup(name), n)
    }

    fn use_style(&mut self, name: &str);
    /// Hand-drawn look for everything drawn afterwards.
    fn sketch(&mut self);
    fn tight_layout(&mut self, pad: f64);
    fn export(&mut self, path: &Path, opts: &SaveOptions) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_options_fall_back_per_key() {
        let m = StyleMap::new().with("dpi", 200).with("width", "wide");
        let o = SaveOptions::from_map(&m);
        assert_eq!(o.dpi, 200.0);
        assert_eq!(o.width, 8.0);
        assert_eq!(o.pixel_size(), (1600, 1200));
    }
}
