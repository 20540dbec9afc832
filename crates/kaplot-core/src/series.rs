// File: crates/kaplot-core/src/series.rs
// Summary: Series model; data arrays plus the caller's per-series option overrides.

use serde::{Deserialize, Serialize};

use crate::value::{nonfinite, StyleMap, Value};

/// One pending data entry. `x`/`y` are used as-is by line and bar layers;
/// histogram and boxplot layers only read `y`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    #[serde(with = "nonfinite::vec")]
    pub x: Vec<f64>,
    #[serde(with = "nonfinite::vec")]
    pub y: Vec<f64>,
    #[serde(default, with = "nonfinite::opt_vec")]
    pub xerr: Option<Vec<f64>>,
    #[serde(default, with = "nonfinite::opt_vec")]
    pub yerr: Option<Vec<f64>>,
    pub options: StyleMap,
}

impl Series {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Self {
        if x.len() != y.len() {
            log::warn!("kaplot: series x has {} values, y has {}", x.len(), y.len());
        }
        Self { x, y, ..Self::default() }
    }

    /// Samples for histogram/boxplot layers; `x` is the 1-based sample index.
    pub fn samples(values: Vec<f64>) -> Self {
        let x = (1..=values.len()).map(|i| i as f64).collect();
        Self { x, y: values, ..Self::default() }
    }

    pub fn with_xerr(mut self, err: Vec<f64>) -> Self {
        self.xerr = Some(err);
        self
    }

    pub fn with_yerr(mut self, err: Vec<f64>) -> Self {
        self.yerr = Some(err);
        self
    }

    /// Builder-style option override (`label`, `color`, `increment`, ...).
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.options.insert(key, value);
        self
    }

    pub fn with_options(mut self, options: &StyleMap) -> Self {
        self.options.extend_from(options);
        self
    }

    pub fn len(&self) -> usize { self.y.len() }
    pub fn is_empty(&self) -> bool { self.y.is_empty() }

    /// Paired points, truncated to the shorter array.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}
