// File: crates/kaplot-core/src/view.rs
// Summary: Per-axes view state for backends: data extents, explicit limits, scales and
//          twin sharing, resolved into visible ranges with autoscale margins.

use crate::layer::Axis;
use crate::scale::{AxisScale, Scale};

/// Fraction of the data span added on each side when autoscaling.
pub const AUTOSCALE_MARGIN: f64 = 0.05;

pub type AxesId = usize;

/// Where new axes go.
#[derive(Clone, Debug, PartialEq)]
pub enum AxesPlacement {
    /// Main plotting area of the figure.
    Default,
    /// `[left, bottom, width, height]` in figure fractions.
    Rect([f64; 4]),
    /// Overlay on `of` sharing its `share` axis.
    Twin { of: AxesId, share: Axis },
}

/// Default figure rectangle for `AxesPlacement::Default`.
pub const DEFAULT_RECT: [f64; 4] = [0.125, 0.11, 0.775, 0.77];

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct AxisState {
    data: Option<(f64, f64)>,
    min: Option<f64>,
    max: Option<f64>,
    scale: Scale,
}

impl AxisState {
    fn extend(&mut self, v: f64) {
        if !v.is_finite() { return; }
        if self.scale.is_log() && v <= 0.0 { return; }
        self.data = Some(match self.data {
            Some((lo, hi)) => (lo.min(v), hi.max(v)),
            None => (v, v),
        });
    }

    fn resolve(&self) -> AxisScale {
        let (lo, hi) = match self.data {
            Some((lo, hi)) => {
                let (tlo, thi) = (self.scale.forward(lo), self.scale.forward(hi));
                let span = thi - tlo;
                let pad = if span.abs() < 1e-12 { 0.5 } else { span * AUTOSCALE_MARGIN };
                (self.scale.inverse(tlo - pad), self.scale.inverse(thi + pad))
            }
            None => match self.scale {
                Scale::Linear => (0.0, 1.0),
                Scale::Log { base } => (1.0, base),
            },
        };
        AxisScale::new(self.min.unwrap_or(lo), self.max.unwrap_or(hi), self.scale)
    }
}

/// Resolved view of one axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxesView {
    pub rect: [f64; 4],
    pub x: AxisScale,
    pub y: AxisScale,
}

#[derive(Clone, Debug)]
struct AxesState {
    rect: [f64; 4],
    x: AxisState,
    y: AxisState,
    twin: Option<(AxesId, Axis)>,
}

/// Tracks every axes a backend created. Shared axes keep their state on the
/// axes they were twinned from.
#[derive(Clone, Debug, Default)]
pub struct AxesRegistry {
    axes: Vec<AxesState>,
}

impl AxesRegistry {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.axes.len() }
    pub fn is_empty(&self) -> bool { self.axes.is_empty() }

    pub fn create(&mut self, placement: &AxesPlacement) -> AxesId {
        let (rect, twin) = match *placement {
            AxesPlacement::Default => (DEFAULT_RECT, None),
            AxesPlacement::Rect(r) => (r, None),
            AxesPlacement::Twin { of, share } => match self.axes.get(of) {
                Some(base) => (base.rect, Some((of, share))),
                None => {
                    log::warn!("kaplot: twin of unknown axes {of}, creating default axes");
                    (DEFAULT_RECT, None)
                }
            },
        };
        self.axes.push(AxesState { rect, x: AxisState::default(), y: AxisState::default(), twin });
        self.axes.len() - 1
    }

    /// Axes holding the state of `axis` for `id` (follows twin links for the shared axis).
    pub fn owner(&self, mut id: AxesId, axis: Axis) -> AxesId {
        while let Some((of, share)) = self.axes.get(id).and_then(|a| a.twin) {
            if share != axis { break; }
            id = of;
        }
        id
    }

    pub fn twin_of(&self, id: AxesId) -> Option<(AxesId, Axis)> {
        self.axes.get(id).and_then(|a| a.twin)
    }

    pub fn rect(&self, id: AxesId) -> Option<[f64; 4]> {
        self.axes.get(id).map(|a| a.rect)
    }

    fn axis_mut(&mut self, id: AxesId, axis: Axis) -> Option<&mut AxisState> {
        let owner = self.owner(id, axis);
        self.axes.get_mut(owner).map(|a| match axis { Axis::X => &mut a.x, Axis::Y => &mut a.y })
    }

    fn axis(&self, id: AxesId, axis: Axis) -> Option<&AxisState> {
        let owner = self.owner(id, axis);
        self.axes.get(owner).map(|a| match axis { Axis::X => &a.x, Axis::Y => &a.y })
    }

    pub fn set_scale(&mut self, id: AxesId, axis: Axis, scale: Scale) {
        if let Some(s) = self.axis_mut(id, axis) { s.scale = scale; }
    }

    pub fn scale(&self, id: AxesId, axis: Axis) -> Scale {
        self.axis(id, axis).map(|s| s.scale).unwrap_or_default()
    }

    /// Explicit limits; `None` leaves that end as it was.
    pub fn set_limits(&mut self, id: AxesId, axis: Axis, min: Option<f64>, max: Option<f64>) {
        if let Some(s) = self.axis_mut(id, axis) {
            if min.is_some() { s.min = min; }
            if max.is_some() { s.max = max; }
        }
    }

    pub fn extend(&mut self, id: AxesId, axis: Axis, values: impl IntoIterator<Item = f64>) {
        if let Some(s) = self.axis_mut(id, axis) {
            for v in values { s.extend(v); }
        }
    }

    pub fn extend_xy(&mut self, id: AxesId, x: &[f64], y: &[f64]) {
        self.extend(id, Axis::X, x.iter().copied());
        self.extend(id, Axis::Y, y.iter().copied());
    }

    pub fn view(&self, id: AxesId) -> AxesView {
        let x = self.axis(id, Axis::X).copied().unwrap_or_default();
        let y = self.axis(id, Axis::Y).copied().unwrap_or_default();
        AxesView { rect: self.rect(id).unwrap_or(DEFAULT_RECT), x: x.resolve(), y: y.resolve() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn autoscale_adds_margins() {
        let mut r = AxesRegistry::new();
        let a = r.create(&AxesPlacement::Default);
        r.extend_xy(a, &[0.0, 10.0], &[0.0, 100.0]);
        let v = r.view(a);
        assert!((v.x.vmin + 0.5).abs() < 1e-9 && (v.x.vmax - 10.5).abs() < 1e-9);
        assert!((v.y.vmax - 105.0).abs() < 1e-9);
    }

    #[test]
    fn explicit_limits_override_one_end() {
        let mut r = AxesRegistry::new();
        let a = r.create(&AxesPlacement::Default);
        r.extend_xy(a, &[0.0, 10.0], &[0.0, 10.0]);
        r.set_limits(a, Axis::Y, Some(0.0), None);
        let v = r.view(a);
        assert_eq!(v.y.vmin, 0.0);
        assert!((v.y.vmax - 10.5).abs() < 1e-9);
    }

    #[test]
    fn twins_share_one_axis_only() {
        let mut r = AxesRegistry::new();
        let a = r.create(&AxesPlacement::Default);
        let b = r.create(&AxesPlacement::Twin { of: a, share: Axis::X });
        r.extend_xy(a, &[0.0, 1.0], &[0.0, 1.0]);
        r.extend_xy(b, &[0.0, 3.0], &[50.0, 60.0]);
        r.set_limits(b, Axis::Y, Some(40.0), Some(70.0));
        let (va, vb) = (r.view(a), r.view(b));
        assert_eq!(va.x, vb.x);
        assert_eq!((vb.y.vmin, vb.y.vmax), (40.0, 70.0));
        assert_ne!(va.y, vb.y);
        assert_eq!(r.owner(b, Axis::X), a);
        assert_eq!(r.owner(b, Axis::Y), b);
    }
}
