// File: crates/kaplot-core/src/layer.rs
// Summary: Layer model; one axes region with its pending settings and element lists.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlotError;
use crate::range::Ticks;
use crate::series::Series;
use crate::value::StyleMap;

/// Layer key; always lower case so lookups are case-insensitive.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerName(String);

impl LayerName {
    pub const MAIN: &'static str = "main";

    pub fn new(name: &str) -> Self { Self(name.trim().to_lowercase()) }
    pub fn main() -> Self { Self(Self::MAIN.to_string()) }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for LayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for LayerName {
    fn from(s: &str) -> Self { LayerName::new(s) }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotType {
    #[default]
    Line,
    Bar,
    Hist,
    Boxplot,
    BoxScatter,
}

impl PlotType {
    pub fn is_boxplot(self) -> bool { matches!(self, PlotType::Boxplot | PlotType::BoxScatter) }
}

impl FromStr for PlotType {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "line" => Ok(PlotType::Line),
            "bar" => Ok(PlotType::Bar),
            "hist" | "histogram" => Ok(PlotType::Hist),
            "box" | "boxplot" => Ok(PlotType::Boxplot),
            "boxscatter" => Ok(PlotType::BoxScatter),
            _ => Err(PlotError::UnknownPlotType(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AxesType {
    #[default]
    Linear,
    LogLog,
    SemilogX,
    SemilogY,
}

impl AxesType {
    pub fn log_x(self) -> bool { matches!(self, AxesType::LogLog | AxesType::SemilogX) }
    pub fn log_y(self) -> bool { matches!(self, AxesType::LogLog | AxesType::SemilogY) }
}

impl FromStr for AxesType {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(AxesType::Linear),
            "log-log" => Ok(AxesType::LogLog),
            "semilog-x" => Ok(AxesType::SemilogX),
            "semilog-y" => Ok(AxesType::SemilogY),
            _ => Err(PlotError::UnknownAxesType(s.to_string())),
        }
    }
}

/// Named inset positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    UpperLeft,
    UpperRight,
    LowerLeft,
    LowerRight,
}

impl FromStr for Corner {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        match norm.as_str() {
            "upper left" => Ok(Corner::UpperLeft),
            "upper right" => Ok(Corner::UpperRight),
            "lower left" => Ok(Corner::LowerLeft),
            "lower right" => Ok(Corner::LowerRight),
            _ => Err(PlotError::UnknownLocation(s.to_string())),
        }
    }
}

/// Where a layer's axes are placed on the figure.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Location {
    Corner(Corner),
    /// `[left, bottom, width, height]` in figure fractions.
    Rect([f64; 4]),
}

impl FromStr for Location {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> { s.parse().map(Location::Corner) }
}

impl From<Corner> for Location {
    fn from(c: Corner) -> Self { Location::Corner(c) }
}

impl From<[f64; 4]> for Location {
    fn from(r: [f64; 4]) -> Self { Location::Rect(r) }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl FromStr for Axis {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            _ => Err(PlotError::UnknownTwinAxis(s.to_string())),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self { Axis::X => "x", Axis::Y => "y" })
    }
}

/// A layer drawn on a secondary axes sharing `share` with the layer `of`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Twin {
    pub share: Axis,
    pub of: LayerName,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frames {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl Default for Frames {
    fn default() -> Self { Self { top: true, bottom: true, left: true, right: true } }
}

/// Title or axis label with its resolved font options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Caption {
    pub text: String,
    pub font: StyleMap,
}

/// Explicit ticks and/or tick label font for one axis.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TickLabels {
    pub ticks: Option<Ticks>,
    pub font: StyleMap,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub enabled: bool,
    pub options: StyleMap,
    pub font: StyleMap,
}

/// Horizontal (`at` is y) or vertical (`at` is x) reference line. `min`/`max` bounds
/// are kept in data space and converted at render time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RefLine {
    pub at: f64,
    pub options: StyleMap,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font: StyleMap,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    pub options: StyleMap,
}

impl Span {
    /// Rectangle spanned by two opposite corners, in data coordinates.
    pub fn from_corners(top: (f64, f64), bottom: (f64, f64), options: StyleMap) -> Self {
        Self {
            xmin: top.0.min(bottom.0),
            xmax: top.0.max(bottom.0),
            ymin: top.1.min(bottom.1),
            ymax: top.1.max(bottom.1),
            options,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
    pub options: StyleMap,
}

impl Arrow {
    pub fn between(start: (f64, f64), finish: (f64, f64), options: StyleMap) -> Self {
        Self { x: start.0, y: start.1, dx: finish.0 - start.0, dy: finish.1 - start.1, options }
    }
}

/// One axes region and everything pending on it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub name: LayerName,
    pub plot_type: PlotType,
    pub axes_type: AxesType,
    pub x_base: f64,
    pub y_base: f64,
    pub location: Option<Location>,
    pub twin: Option<Twin>,
    pub title: Option<Caption>,
    pub grid: Option<StyleMap>,
    pub x_label: Option<Caption>,
    pub y_label: Option<Caption>,
    pub x_ticks: Option<TickLabels>,
    pub y_ticks: Option<TickLabels>,
    pub x_limits: Option<Limits>,
    pub y_limits: Option<Limits>,
    pub frames: Frames,
    pub x_tick_params: Option<StyleMap>,
    pub y_tick_params: Option<StyleMap>,
    pub x_tick_format: Option<StyleMap>,
    pub y_tick_format: Option<StyleMap>,
    pub unique_colors: bool,
    pub color_map: String,
    pub legend: Option<Legend>,
    pub series: Vec<Series>,
    pub hlines: Vec<RefLine>,
    pub vlines: Vec<RefLine>,
    pub notes: Vec<Note>,
    pub spans: Vec<Span>,
    pub arrows: Vec<Arrow>,
}

impl Layer {
    pub fn new(name: LayerName, color_map: &str) -> Self {
        Self {
            name,
            plot_type: PlotType::Line,
            axes_type: AxesType::Linear,
            x_base: 10.0,
            y_base: 10.0,
            location: None,
            twin: None,
            title: None,
            grid: None,
            x_label: None,
            y_label: None,
            x_ticks: None,
            y_ticks: None,
            x_limits: None,
            y_limits: None,
            frames: Frames::default(),
            x_tick_params: None,
            y_tick_params: None,
            x_tick_format: None,
            y_tick_format: None,
            unique_colors: false,
            color_map: color_map.to_string(),
            legend: None,
            series: Vec::new(),
            hlines: Vec::new(),
            vlines: Vec::new(),
            notes: Vec::new(),
            spans: Vec::new(),
            arrows: Vec::new(),
        }
    }

    /// Number of pending drawable elements of every kind.
    pub fn pending_len(&self) -> usize {
        self.series.len() + self.hlines.len() + self.vlines.len() + self.notes.len() + self.spans.len() + self.arrows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_with_aliases() {
        assert_eq!("Histogram".parse::<PlotType>().unwrap(), PlotType::Hist);
        assert_eq!("box".parse::<PlotType>().unwrap(), PlotType::Boxplot);
        assert!("pie".parse::<PlotType>().is_err());
        assert_eq!("Semilog-Y".parse::<AxesType>().unwrap(), AxesType::SemilogY);
        assert_eq!("upper right".parse::<Location>().unwrap(), Location::Corner(Corner::UpperRight));
        assert!("middle".parse::<Location>().is_err());
        assert!("z".parse::<Axis>().is_err());
    }

    #[test]
    fn span_corners_are_sorted() {
        let s = Span::from_corners((4.0, 1.0), (2.0, 3.0), StyleMap::new());
        assert_eq!((s.xmin, s.xmax, s.ymin, s.ymax), (2.0, 4.0, 1.0, 3.0));
    }

    #[test]
    fn layer_names_fold_case() {
        assert_eq!(LayerName::new("  Secondary "), LayerName::new("secondary"));
    }
}
