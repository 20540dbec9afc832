// File: crates/kaplot-core/src/cycle.rs
// Summary: Style cycler; assigns (color, marker-or-hatch, fill) to incrementing elements.

use crate::value::Value;

/// Palette indices for `index`: color changes fastest, then marker/hatch, fill slowest.
/// Empty lists are treated as length one.
pub fn style_index(index: usize, n_colors: usize, n_marks: usize, n_fills: usize) -> (usize, usize, usize) {
    let (c, m, f) = (n_colors.max(1), n_marks.max(1), n_fills.max(1));
    (index % c, (index / c) % m, (index / (c * m)) % f)
}

/// One cycled style. `mark` is a marker for line layers and a hatch for bar-like layers.
#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    pub color: Value,
    pub mark: Value,
    pub fill: Value,
}

/// Lists a layer cycles through.
#[derive(Clone, Copy, Debug)]
pub struct Palette<'a> {
    pub colors: &'a [Value],
    pub marks: &'a [Value],
    pub fills: &'a [Value],
}

impl Palette<'_> {
    pub fn style(&self, index: usize) -> Style {
        let (ci, mi, fi) = style_index(index, self.colors.len(), self.marks.len(), self.fills.len());
        let pick = |list: &[Value], i: usize| list.get(i).cloned().unwrap_or(Value::None);
        Style { color: pick(self.colors, ci), mark: pick(self.marks, mi), fill: pick(self.fills, fi) }
    }

    /// Number of distinct styles before the cycle repeats.
    pub fn period(&self) -> usize {
        self.colors.len().max(1) * self.marks.len().max(1) * self.fills.len().max(1)
    }
}

/// Number of elements that advance the cycle.
pub fn increment_count(increments: &[bool]) -> usize {
    increments.iter().filter(|&&i| i).count()
}

/// Two-pass assignment over one layer's elements.
///
/// Each element takes the style at the running index, which only advances after an
/// element whose flag is `true`. With `unique` colors (sampled `N + 1` evenly from a
/// colormap, N = incrementing elements), every element gets `(color, None, None)`.
pub fn assign(increments: &[bool], palette: &Palette<'_>, unique: Option<&[Value]>) -> Vec<Style> {
    let mut index = 0usize;
    let mut out = Vec::with_capacity(increments.len());
    for &inc in increments {
        let style = match unique {
            Some(colors) => Style {
                color: colors.get(index).cloned().unwrap_or(Value::None),
                mark: Value::None,
                fill: Value::None,
            },
            None => palette.style(index),
        };
        out.push(style);
        if inc { index += 1; }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(items: &[&str]) -> Vec<Value> { items.iter().map(|s| Value::from(*s)).collect() }

    #[test]
    fn color_fastest_fill_slowest() {
        assert_eq!(style_index(0, 3, 2, 2), (0, 0, 0));
        assert_eq!(style_index(2, 3, 2, 2), (2, 0, 0));
        assert_eq!(style_index(3, 3, 2, 2), (0, 1, 0));
        assert_eq!(style_index(6, 3, 2, 2), (0, 0, 1));
        assert_eq!(style_index(12, 3, 2, 2), (0, 0, 0));
    }

    #[test]
    fn non_incrementing_elements_share_the_next_style() {
        let colors = texts(&["a", "b", "c"]);
        let marks = texts(&["m"]);
        let fills = vec![Value::None];
        let p = Palette { colors: &colors, marks: &marks, fills: &fills };
        let styles = assign(&[false, true, true, false, true], &p, None);
        let got: Vec<_> = styles.iter().map(|s| s.color.to_string()).collect();
        assert_eq!(got, vec!["a", "a", "b", "c", "c"]);
    }

    #[test]
    fn unique_mode_drops_marks() {
        let colors = texts(&["a"]);
        let p = Palette { colors: &colors, marks: &colors, fills: &colors };
        let sampled = vec![Value::Rgba([1.0, 0.0, 0.0, 1.0]), Value::Rgba([0.0, 1.0, 0.0, 1.0]), Value::Rgba([0.0, 0.0, 1.0, 1.0])];
        let styles = assign(&[true, true], &p, Some(&sampled));
        assert_eq!(styles[1].color, sampled[1]);
        assert_eq!(styles[1].mark, Value::None);
    }
}
