// File: crates/kaplot-core/src/scale.rs
// Summary: Linear and logarithmic axis transforms between data values, unit fractions and pixels.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Scale {
    Linear,
    Log { base: f64 },
}

impl Default for Scale {
    fn default() -> Self { Scale::Linear }
}

impl Scale {
    pub fn is_log(self) -> bool { matches!(self, Scale::Log { .. }) }

    /// Value in transformed space (identity for linear, log_base for log).
    #[inline]
    pub fn forward(self, v: f64) -> f64 {
        match self {
            Scale::Linear => v,
            Scale::Log { base } => v.max(1e-300).ln() / base.ln(),
        }
    }

    #[inline]
    pub fn inverse(self, t: f64) -> f64 {
        match self {
            Scale::Linear => t,
            Scale::Log { base } => base.powf(t),
        }
    }
}

/// One axis of a view: visible range plus transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisScale {
    pub vmin: f64,
    pub vmax: f64,
    pub scale: Scale,
    // cached transformed endpoints
    t_min: f64,
    t_max: f64,
}

impl AxisScale {
    pub fn new(vmin: f64, vmax: f64, scale: Scale) -> Self {
        let (vmin, vmax) = match scale {
            Scale::Linear => {
                if (vmax - vmin).abs() < 1e-12 { (vmin, vmin + 1.0) } else { (vmin, vmax) }
            }
            Scale::Log { base } => {
                // strictly positive range for log scale
                let lo = if vmin <= 1e-300 { 1e-300 } else { vmin };
                let hi = if vmax <= lo { lo * base } else { vmax };
                (lo, hi)
            }
        };
        Self { vmin, vmax, scale, t_min: scale.forward(vmin), t_max: scale.forward(vmax) }
    }

    /// Position of `v` along the axis, 0 at `vmin` and 1 at `vmax`; not clamped.
    #[inline]
    pub fn to_unit(&self, v: f64) -> f64 {
        let span = self.t_max - self.t_min;
        if span.abs() < 1e-300 { return 0.0; }
        (self.scale.forward(v) - self.t_min) / span
    }

    #[inline]
    pub fn from_unit(&self, u: f64) -> f64 {
        self.scale.inverse(self.t_min + u * (self.t_max - self.t_min))
    }

    /// Map `v` onto the pixel interval `[p0, p1]` (p1 may be smaller than p0 for a y axis).
    #[inline]
    pub fn to_px(&self, v: f64, p0: f32, p1: f32) -> f32 {
        p0 + (self.to_unit(v) as f32) * (p1 - p0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_unit_round_trip() {
        let s = AxisScale::new(-2.0, 8.0, Scale::Linear);
        assert_eq!(s.to_unit(3.0), 0.5);
        assert!((s.from_unit(0.25) - 0.5).abs() < 1e-12);
        assert_eq!(s.to_px(8.0, 100.0, 0.0), 0.0);
    }

    #[test]
    fn log_decades_are_even() {
        let s = AxisScale::new(1.0, 1000.0, Scale::Log { base: 10.0 });
        assert!((s.to_unit(10.0) - 1.0 / 3.0).abs() < 1e-12);
        assert!((s.to_unit(100.0) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_ranges_are_widened() {
        let s = AxisScale::new(5.0, 5.0, Scale::Linear);
        assert_eq!(s.vmax, 6.0);
        let l = AxisScale::new(-1.0, 0.0, Scale::Log { base: 2.0 });
        assert!(l.vmin > 0.0 && l.vmax > l.vmin);
    }
}
