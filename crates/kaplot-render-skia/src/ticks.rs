// File: crates/kaplot-render-skia/src/ticks.rs
// Summary: Automatic tick placement and tick label number formatting.

use kaplot_core::range::{coerce_float, srange};
use kaplot_core::scale::{AxisScale, Scale};
use kaplot_core::value::{StyleMap, Value};

pub const DEFAULT_MAX_TICKS: usize = 9;

/// Smallest of 1, 2, 2.5, 5, 10 (times a power of ten) giving at most `max_ticks` ticks over `span`.
pub fn nice_step(span: f64, max_ticks: usize) -> f64 {
    let raw = span.abs() / (max_ticks.max(2) - 1) as f64;
    if !raw.is_finite() || raw <= 0.0 {
        return 1.0;
    }
    let mag = 10f64.powf(raw.log10().floor());
    [1.0, 2.0, 2.5, 5.0, 10.0]
        .into_iter()
        .map(|m| m * mag)
        .find(|s| *s >= raw * (1.0 - 1e-9))
        .unwrap_or(10.0 * mag)
}

fn linear_ticks(vmin: f64, vmax: f64, max_ticks: usize) -> Vec<f64> {
    let (lo, hi) = (vmin.min(vmax), vmin.max(vmax));
    let step = nice_step(hi - lo, max_ticks);
    let start = (lo / step).ceil() * step;
    let slack = step * 1e-9;
    coerce_float(&srange(start, hi + slack, step, false)).into_iter().map(|n| n.as_f64()).collect()
}

/// Tick positions inside the visible range of `axis`.
pub fn auto_ticks(axis: &AxisScale, max_ticks: usize) -> Vec<f64> {
    match axis.scale {
        Scale::Linear => linear_ticks(axis.vmin, axis.vmax, max_ticks),
        Scale::Log { base } => {
            let (lo, hi) = (axis.vmin.min(axis.vmax), axis.vmin.max(axis.vmax));
            let kmin = (lo.ln() / base.ln() - 1e-9).ceil() as i32;
            let kmax = (hi.ln() / base.ln() + 1e-9).floor() as i32;
            if kmax < kmin {
                return linear_ticks(lo, hi, max_ticks);
            }
            let count = (kmax - kmin + 1) as usize;
            let stride = count.div_ceil(max_ticks.max(1)).max(1);
            (kmin..=kmax).step_by(stride).map(|k| base.powi(k)).collect()
        }
    }
}

/// Number format for tick labels.
#[derive(Clone, Debug, PartialEq)]
pub struct TickFormat {
    pub scientific: bool,
    /// Exponents outside `[lo, hi)` switch to scientific notation; `(0, 0)` always does.
    pub sci_limits: (i32, i32),
}

impl Default for TickFormat {
    fn default() -> Self { Self { scientific: false, sci_limits: (-5, 6) } }
}

impl TickFormat {
    /// Read `style` and `scilimits` from a resolved tick-format map.
    pub fn from_map(m: &StyleMap) -> Self {
        let mut f = Self::default();
        if let Some(style) = m.get_str("style") {
            f.scientific = matches!(style.to_ascii_lowercase().as_str(), "sci" | "scientific");
        }
        if let Some(Value::List(l)) = m.get("scilimits") {
            if let (Some(lo), Some(hi)) = (l.first().and_then(Value::as_f64), l.get(1).and_then(Value::as_f64)) {
                f.sci_limits = (lo as i32, hi as i32);
            }
        }
        f
    }

    fn use_sci(&self, exp: i32) -> bool {
        if !self.scientific {
            return false;
        }
        let (lo, hi) = self.sci_limits;
        (lo == 0 && hi == 0) || exp < lo || exp >= hi
    }

    pub fn labels(&self, values: &[f64], scale: Scale) -> Vec<String> {
        if let Scale::Log { base } = scale {
            let plain = values.iter().all(|v| (1e-4..1e6).contains(&v.abs()));
            if !plain || self.scientific {
                return values.iter().map(|v| format!("{}^{}", trim_number(base), (v.ln() / base.ln()).round() as i32)).collect();
            }
        }
        let biggest = values.iter().fold(0.0f64, |m, v| m.max(v.abs()));
        let exp = if biggest > 0.0 { biggest.log10().floor() as i32 } else { 0 };
        if self.use_sci(exp) {
            let scale = 10f64.powi(exp);
            let mantissas: Vec<f64> = values.iter().map(|v| v / scale).collect();
            let d = decimals(&mantissas);
            return mantissas.iter().map(|m| format!("{}e{exp}", fixed(*m, d))).collect();
        }
        let d = decimals(values);
        values.iter().map(|v| fixed(*v, d)).collect()
    }
}

/// Fewest decimals (up to 6) that print every value exactly.
fn decimals(values: &[f64]) -> usize {
    values
        .iter()
        .map(|v| {
            (0..=6)
                .find(|&d| {
                    let p = 10f64.powi(d as i32);
                    ((v * p).round() / p - v).abs() <= 1e-9 * v.abs().max(1.0)
                })
                .unwrap_or(6)
        })
        .max()
        .unwrap_or(0)
}

fn fixed(v: f64, d: usize) -> String {
    let v = if v.abs() < 1e-12 { 0.0 } else { v };
    format!("{v:.d$}")
}

fn trim_number(v: f64) -> String {
    fixed(v, decimals(&[v]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nice_steps() {
        assert_eq!(nice_step(10.0, 11), 1.0);
        assert_eq!(nice_step(10.0, 6), 2.0);
        assert_eq!(nice_step(1.0, 5), 0.25);
    }

    #[test]
    fn linear_ticks_stay_inside_range() {
        let t = auto_ticks(&AxisScale::new(-0.3, 2.1, Scale::Linear), 9);
        assert_eq!(t, vec![0.0, 0.5, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn log_ticks_are_powers() {
        let t = auto_ticks(&AxisScale::new(0.5, 2000.0, Scale::Log { base: 10.0 }), 9);
        assert_eq!(t, vec![1.0, 10.0, 100.0, 1000.0]);
    }

    #[test]
    fn plain_labels_share_decimals() {
        let f = TickFormat::default();
        assert_eq!(f.labels(&[0.0, 0.5, 1.0], Scale::Linear), vec!["0.0", "0.5", "1.0"]);
        assert_eq!(f.labels(&[0.0, 10.0, 20.0], Scale::Linear), vec!["0", "10", "20"]);
    }

    #[test]
    fn sci_labels_with_zero_limits() {
        let m = StyleMap::new().with("style", "sci").with("scilimits", vec![0, 0]);
        let f = TickFormat::from_map(&m);
        assert_eq!(f.labels(&[1000.0, 2000.0], Scale::Linear), vec!["1e3", "2e3"]);
    }
}
