// File: crates/kaplot-core/src/normalize.rs
// Summary: Data-space to axes-fraction conversion for annotation bounds.

use crate::view::AxesView;

/// Convert data point `(x, y)` to axes fractions of `view`.
/// `(0, 0)` is the lower-left corner of the visible range; results may fall outside `[0, 1]`.
pub fn to_axes_fraction(view: &AxesView, x: f64, y: f64) -> (f64, f64) {
    (view.x.to_unit(x), view.y.to_unit(y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::{AxisScale, Scale};

    fn view(x: (f64, f64), y: (f64, f64), scale: Scale) -> AxesView {
        AxesView { rect: [0.0, 0.0, 1.0, 1.0], x: AxisScale::new(x.0, x.1, scale), y: AxisScale::new(y.0, y.1, Scale::Linear) }
    }

    #[test]
    fn linear_fractions() {
        let v = view((0.0, 10.0), (-1.0, 1.0), Scale::Linear);
        assert_eq!(to_axes_fraction(&v, 2.5, 0.0), (0.25, 0.5));
        let (fx, _) = to_axes_fraction(&v, 20.0, 0.0);
        assert_eq!(fx, 2.0);
    }

    #[test]
    fn log_fractions_use_base() {
        let v = view((1.0, 16.0), (0.0, 1.0), Scale::Log { base: 2.0 });
        let (fx, _) = to_axes_fraction(&v, 4.0, 0.0);
        assert!((fx - 0.5).abs() < 1e-12);
    }
}
