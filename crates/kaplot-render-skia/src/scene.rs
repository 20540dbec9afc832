// File: crates/kaplot-render-skia/src/scene.rs
// Summary: Retained per-axes scene filled by backend calls and painted on export.
//          Histogram bins and box statistics are computed when the call arrives.

use kaplot_core::backend::Spine;
use kaplot_core::range::Ticks;
use kaplot_core::stats::percentile;
use kaplot_core::value::{StyleMap, Value};

pub const DEFAULT_BINS: usize = 10;

/// Something drawn inside the axes rectangle, in data coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum Mark {
    Errorbar { x: Vec<f64>, y: Vec<f64>, xerr: Option<Vec<f64>>, yerr: Option<Vec<f64>>, opts: StyleMap },
    /// Rectangles `[left, left + width] x [bottom, bottom + height]`.
    Bars { left: Vec<f64>, width: Vec<f64>, bottom: Vec<f64>, height: Vec<f64>, xerr: Option<Vec<f64>>, yerr: Option<Vec<f64>>, opts: StyleMap },
    /// `fills[i]` belongs to `boxes[i]`.
    Boxes { boxes: Vec<BoxStats>, vert: bool, width: f64, fills: Vec<Option<Value>>, opts: StyleMap },
    Scatter { x: Vec<f64>, y: Vec<f64>, opts: StyleMap },
    /// `xmin`/`xmax` in opts are axes fractions.
    HLine { y: f64, opts: StyleMap },
    VLine { x: f64, opts: StyleMap },
    Text { x: f64, y: f64, s: String, font: StyleMap },
    HSpan { ymin: f64, ymax: f64, opts: StyleMap },
    Arrow { x: f64, y: f64, dx: f64, dy: f64, opts: StyleMap },
}

/// One legend row.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub opts: StyleMap,
    pub kind: EntryKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    Line,
    Patch,
    Marker,
}

/// Everything recorded for one axes.
#[derive(Clone, Debug, Default)]
pub struct AxesScene {
    pub marks: Vec<Mark>,
    pub legend_entries: Vec<LegendEntry>,
    pub title: Option<(String, StyleMap)>,
    /// Indexed by `axis_index`.
    pub labels: [Option<(String, StyleMap)>; 2],
    pub ticks: [Option<Ticks>; 2],
    pub tick_fonts: [StyleMap; 2],
    pub tick_formats: [StyleMap; 2],
    pub max_ticks: [Option<usize>; 2],
    pub tick_params: [StyleMap; 2],
    pub grid: Option<StyleMap>,
    pub hidden: Vec<Spine>,
    pub legend: Option<(StyleMap, StyleMap)>,
    pub legend_title_font: Option<StyleMap>,
}

pub fn axis_index(axis: kaplot_core::layer::Axis) -> usize {
    match axis {
        kaplot_core::layer::Axis::X => 0,
        kaplot_core::layer::Axis::Y => 1,
    }
}

impl AxesScene {
    /// Record a legend row when `label` is present and not hidden.
    pub fn add_entry(&mut self, label: Option<&str>, opts: &StyleMap, kind: EntryKind) {
        if let Some(label) = label.filter(|l| !l.is_empty() && !l.starts_with('_')) {
            self.legend_entries.push(LegendEntry { label: label.to_string(), opts: opts.clone(), kind });
        }
    }
}

/// Equal-width bin edges over `range` (or the data extent).
pub fn bin_edges(datasets: &[Vec<f64>], bins: usize, range: (Option<f64>, Option<f64>)) -> Vec<f64> {
    let finite = || datasets.iter().flatten().copied().filter(|v| v.is_finite());
    let lo = range.0.or_else(|| finite().reduce(f64::min)).unwrap_or(0.0);
    let hi = range.1.or_else(|| finite().reduce(f64::max)).unwrap_or(1.0);
    let (lo, hi) = if hi > lo { (lo, hi) } else { (lo - 0.5, lo + 0.5) };
    let bins = bins.max(1);
    let w = (hi - lo) / bins as f64;
    (0..=bins).map(|i| lo + w * i as f64).collect()
}

/// Counts per bin; the last bin includes its right edge, values outside are ignored.
pub fn bin_counts(data: &[f64], edges: &[f64]) -> Vec<f64> {
    let n = edges.len().saturating_sub(1);
    let mut counts = vec![0.0; n];
    let (Some(&lo), Some(&hi)) = (edges.first(), edges.last()) else { return counts };
    if n == 0 { return counts; }
    let w = (hi - lo) / n as f64;
    for &v in data {
        if !(v >= lo && v <= hi) { continue; }
        let i = (((v - lo) / w).floor() as usize).min(n - 1);
        counts[i] += 1.0;
    }
    counts
}

/// Five-number summary for one box.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxStats {
    pub position: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub mean: f64,
    pub whisker_lo: f64,
    pub whisker_hi: f64,
    pub fliers: Vec<f64>,
}

impl BoxStats {
    /// Whiskers reach the furthest data inside `whis * IQR` of the quartiles.
    pub fn compute(data: &[f64], position: f64, whis: f64) -> Option<Self> {
        let values: Vec<f64> = data.iter().copied().filter(|v| v.is_finite()).collect();
        let q1 = percentile(&values, 25.0)?;
        let median = percentile(&values, 50.0)?;
        let q3 = percentile(&values, 75.0)?;
        let iqr = q3 - q1;
        let (lo, hi) = (q1 - whis * iqr, q3 + whis * iqr);
        let inside = values.iter().copied().filter(|v| *v >= lo && *v <= hi);
        let whisker_lo = inside.clone().fold(q1, f64::min);
        let whisker_hi = inside.fold(q3, f64::max);
        let fliers = values.iter().copied().filter(|v| *v < lo || *v > hi).collect();
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        Some(Self { position, q1, median, q3, mean, whisker_lo, whisker_hi, fliers })
    }

    pub fn extent(&self) -> (f64, f64) {
        let lo = self.fliers.iter().copied().fold(self.whisker_lo, f64::min);
        let hi = self.fliers.iter().copied().fold(self.whisker_hi, f64::max);
        (lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bins_cover_range_inclusive() {
        let data = vec![0.0, 0.5, 1.0, 2.0];
        let edges = bin_edges(std::slice::from_ref(&data), 2, (None, None));
        assert_eq!(edges, vec![0.0, 1.0, 2.0]);
        assert_eq!(bin_counts(&data, &edges), vec![2.0, 2.0]);
    }

    #[test]
    fn explicit_range_drops_outside() {
        let data = vec![-5.0, 0.2, 0.7, 9.0];
        let edges = bin_edges(std::slice::from_ref(&data), 2, (Some(0.0), Some(1.0)));
        assert_eq!(bin_counts(&data, &edges), vec![1.0, 1.0]);
    }

    #[test]
    fn box_stats_flag_outliers() {
        let b = BoxStats::compute(&[1.0, 2.0, 3.0, 4.0, 100.0], 1.0, 1.5).unwrap();
        assert_eq!((b.q1, b.median, b.q3), (2.0, 3.0, 4.0));
        assert_eq!(b.whisker_hi, 4.0);
        assert_eq!(b.fliers, vec![100.0]);
        assert_eq!(b.extent(), (1.0, 100.0));
    }

    #[test]
    fn hidden_labels_are_not_legend_entries() {
        let mut s = AxesScene::default();
        s.add_entry(Some("_nolegend_"), &StyleMap::new(), EntryKind::Line);
        s.add_entry(None, &StyleMap::new(), EntryKind::Line);
        s.add_entry(Some("a"), &StyleMap::new(), EntryKind::Patch);
        assert_eq!(s.legend_entries.len(), 1);
    }
}
