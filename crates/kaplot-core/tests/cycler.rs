// File: crates/kaplot-core/tests/cycler.rs
// Purpose: Style cycling over the shipped palettes: full period without repeats.

use std::collections::HashSet;

use kaplot_core::cycle::{assign, Palette};
use kaplot_core::{Config, Value};

#[test]
fn marker_cycle_has_no_repeats_within_period() {
    let p = Config::default().palettes;
    let palette = Palette { colors: &p.colors, marks: &p.markers, fills: &p.marker_fills };
    let period = palette.period();
    assert_eq!(period, p.colors.len() * p.markers.len() * p.marker_fills.len());

    let styles = assign(&vec![true; period + 1], &palette, None);
    let seen: HashSet<String> = styles[..period]
        .iter()
        .map(|s| format!("{}|{}|{}", s.color, s.mark, s.fill))
        .collect();
    assert_eq!(seen.len(), period);
    assert_eq!(styles[period], styles[0], "wraps after one period");
}

#[test]
fn colors_change_fastest() {
    let p = Config::default().palettes;
    let palette = Palette { colors: &p.colors, marks: &p.hatches, fills: &p.hatch_fills };
    let styles = assign(&[true, true, true], &palette, None);
    assert_eq!(styles[0].color, p.colors[0]);
    assert_eq!(styles[1].color, p.colors[1]);
    assert_eq!(styles[1].mark, styles[0].mark);
}

#[test]
fn unique_colors_replace_the_palette() {
    let p = Config::default().palettes;
    let palette = Palette { colors: &p.colors, marks: &p.markers, fills: &p.marker_fills };
    let unique = vec![Value::from("a"), Value::from("b")];
    let styles = assign(&[true, false, true], &palette, Some(&unique));
    let colors: Vec<String> = styles.iter().map(|s| s.color.to_string()).collect();
    assert_eq!(colors, vec!["a", "b", "b"]);
    assert!(styles.iter().all(|s| s.mark.is_none()));
}
