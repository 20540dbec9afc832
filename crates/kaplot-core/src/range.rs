// File: crates/kaplot-core/src/range.rs
// Summary: Additive/multiplicative tick ranges, explicit tick specs and the `linspace` helper.

use serde::{Deserialize, Serialize};

use crate::value::Number;

/// Hard cap on generated values; multiplicative ranges with |step| <= 1 never reach `end`.
pub const MAX_RANGE_LEN: usize = 10_000;

/// Inclusive range from `start` while `value <= end`, stepping by `+ step` or `* step`.
/// Degenerate inputs (`step == 0` or `start == end`) give an empty range.
pub fn srange(start: f64, end: f64, step: f64, multiplicative: bool) -> Vec<Number> {
    let mut out = Vec::new();
    if step == 0.0 || start == end || !start.is_finite() || !end.is_finite() || !step.is_finite() {
        return out;
    }
    let mut cur = start;
    while cur <= end {
        out.push(Number::coerce(cur));
        if out.len() >= MAX_RANGE_LEN {
            log::warn!("kaplot: range({start}, {end}, {step}) stopped after {MAX_RANGE_LEN} values");
            break;
        }
        let next = if multiplicative { cur * step } else { cur + step };
        // no progress possible (e.g. step < 0 additive, or |step| <= 1 multiplicative from a fixed point)
        if next == cur { break; }
        cur = next;
    }
    out
}

/// Round every value to 12 decimal places so accumulated float error does not leak
/// into tick labels (`0.30000000000000004` becomes `0.3`).
pub fn coerce_float(values: &[Number]) -> Vec<Number> {
    values
        .iter()
        .map(|n| match *n {
            Number::Int(_) => *n,
            Number::Float(f) => Number::coerce((f * 1e12).round() / 1e12),
        })
        .collect()
}

/// `steps` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (steps as f64 - 1.0);
            (0..steps).map(|i| start + step * i as f64).collect()
        }
    }
}

/// How tick positions for one axis are obtained.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TickSpec {
    /// Explicit values with optional parallel labels.
    Values { values: Vec<Number>, labels: Option<Vec<String>> },
    /// Generated with `srange`; `substitutions` pairs a value with the label that replaces it.
    /// `coerce_float` rounds the generated values with [`coerce_float`].
    Range {
        start: f64,
        end: f64,
        step: f64,
        multiplicative: bool,
        substitutions: Vec<(Number, String)>,
        #[serde(default)]
        coerce_float: bool,
    },
}

/// Resolved ticks: positions and their labels, same length.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ticks {
    pub values: Vec<f64>,
    pub labels: Vec<String>,
}

impl TickSpec {
    pub fn values(values: Vec<Number>) -> Self {
        TickSpec::Values { values, labels: None }
    }

    pub fn labeled(values: Vec<Number>, labels: Vec<String>) -> Self {
        TickSpec::Values { values, labels: Some(labels) }
    }

    pub fn range(start: f64, end: f64, step: f64, multiplicative: bool) -> Self {
        TickSpec::Range { start, end, step, multiplicative, substitutions: Vec::new(), coerce_float: false }
    }

    /// Round generated values to 12 decimal places before labelling them.
    pub fn coerce_floats(mut self) -> Self {
        if let TickSpec::Range { coerce_float, .. } = &mut self {
            *coerce_float = true;
        }
        self
    }

    /// Replace the label of `value` once the range is generated.
    pub fn substitute(mut self, value: impl Into<f64>, label: impl Into<String>) -> Self {
        if let TickSpec::Range { substitutions, .. } = &mut self {
            substitutions.push((Number::coerce(value.into()), label.into()));
        }
        self
    }

    pub fn resolve(&self) -> Ticks {
        match self {
            TickSpec::Values { values, labels } => {
                let labels = match labels {
                    Some(l) => {
                        if l.len() != values.len() {
                            log::warn!("kaplot: {} tick labels for {} tick values", l.len(), values.len());
                        }
                        l.clone()
                    }
                    None => values.iter().map(Number::to_string).collect(),
                };
                Ticks { values: values.iter().map(|n| n.as_f64()).collect(), labels }
            }
            TickSpec::Range { start, end, step, multiplicative, substitutions, coerce_float: round } => {
                let generated = srange(*start, *end, *step, *multiplicative);
                let generated = if *round { coerce_float(&generated) } else { generated };
                let mut labels: Vec<String> = generated.iter().map(Number::to_string).collect();
                for (value, label) in substitutions {
                    match generated.iter().position(|g| g.as_f64() == value.as_f64()) {
                        Some(i) => labels[i] = label.clone(),
                        None => log::warn!("kaplot: tick value {value} is not in the generated range, label '{label}' ignored"),
                    }
                }
                Ticks { values: generated.iter().map(|n| n.as_f64()).collect(), labels }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn additive_range_is_inclusive() {
        let r = srange(0.0, 10.0, 2.5, false);
        assert_eq!(r.iter().map(|n| n.to_string()).collect::<Vec<_>>(), vec!["0", "2.5", "5", "7.5", "10"]);
    }

    #[test]
    fn multiplicative_range() {
        let r: Vec<f64> = srange(1.0, 1000.0, 10.0, true).iter().map(|n| n.as_f64()).collect();
        assert_eq!(r, vec![1.0, 10.0, 100.0, 1000.0]);
    }

    #[test]
    fn stalled_multiplicative_range_terminates() {
        assert_eq!(srange(0.0, 5.0, 3.0, true).len(), 1);
        assert!(srange(1.0, 5.0, 0.5, true).len() <= MAX_RANGE_LEN);
    }

    #[test]
    fn float_artefacts_are_rounded() {
        let r = coerce_float(&srange(0.0, 0.35, 0.1, false));
        assert_eq!(r.last().map(|n| n.to_string()), Some("0.3".to_string()));
    }

    #[test]
    fn substitution_misses_are_not_fatal() {
        let t = TickSpec::range(0.0, 4.0, 2.0, false).substitute(2.0, "two").substitute(3.0, "three").resolve();
        assert_eq!(t.values, vec![0.0, 2.0, 4.0]);
        assert_eq!(t.labels, vec!["0", "two", "4"]);
    }

    #[test]
    fn linspace_endpoints() {
        let v = linspace(0.0, 1.0, 5);
        assert_eq!(v.len(), 5);
        assert_eq!(v[0], 0.0);
        assert_eq!(v[4], 1.0);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }
}
