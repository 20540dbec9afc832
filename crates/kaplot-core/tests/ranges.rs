// File: crates/kaplot-core/tests/ranges.rs
// Purpose: Tick range generation properties and explicit tick specs.

use kaplot_core::range::{coerce_float, linspace, MAX_RANGE_LEN};
use kaplot_core::{srange, Number, TickSpec};

#[test]
fn additive_ranges_stay_within_bounds() {
    for (start, end, step) in [(0.0, 1.0, 0.1), (-5.0, 5.0, 0.7), (2.0, 3.0, 0.25)] {
        let r: Vec<f64> = srange(start, end, step, false).iter().map(|n| n.as_f64()).collect();
        assert_eq!(r[0], start);
        assert!(r.iter().all(|v| *v <= end));
        assert!(r.windows(2).all(|w| w[1] > w[0]));
        let expected = ((end - start) / step + 1e-9).floor() as usize + 1;
        assert!(r.len() == expected || r.len() == expected + 1, "({start}, {end}, {step}) gave {}", r.len());
    }
}

#[test]
fn float_noise_is_rounded_away() {
    let r = coerce_float(&srange(0.0, 1.0, 0.1, false));
    assert_eq!(r[3].to_string(), "0.3");
    assert_eq!(r[0], Number::Int(0));
}

#[test]
fn multiplicative_range_decades() {
    let r = srange(1.0, 1000.0, 10.0, true);
    assert_eq!(r, vec![Number::Int(1), Number::Int(10), Number::Int(100), Number::Int(1000)]);
}

#[test]
fn degenerate_ranges_are_empty() {
    assert!(srange(1.0, 5.0, 0.0, false).is_empty());
    assert!(srange(3.0, 3.0, 1.0, false).is_empty());
    assert!(srange(f64::NAN, 3.0, 1.0, false).is_empty());
}

#[test]
fn runaway_ranges_are_capped() {
    // ratio 1 never progresses; ratio 0.5 from 1 approaches zero forever
    assert_eq!(srange(1.0, 2.0, 1.0, true).len(), 1);
    assert!(srange(1.0, 2.0, 0.5, true).len() <= MAX_RANGE_LEN);
}

#[test]
fn substituted_labels() {
    let t = TickSpec::range(0.0, 4.0, 1.0, false).substitute(2.0, "two").substitute(9.0, "missing").resolve();
    assert_eq!(t.values, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    assert_eq!(t.labels, vec!["0", "1", "two", "3", "4"]);
}

#[test]
fn float_rounding_is_opt_in() {
    let raw = TickSpec::range(0.0, 0.5, 0.1, false).resolve();
    assert_eq!(raw.labels[3], "0.30000000000000004");
    let rounded = TickSpec::range(0.0, 0.5, 0.1, false).coerce_floats().resolve();
    assert_eq!(rounded.labels, vec!["0", "0.1", "0.2", "0.3", "0.4", "0.5"]);
}

#[test]
fn explicit_values_label_themselves() {
    let t = TickSpec::values(vec![Number::Int(1), Number::Float(2.5)]).resolve();
    assert_eq!(t.labels, vec!["1", "2.5"]);
}

#[test]
fn linspace_hits_both_ends() {
    let v = linspace(-1.0, 1.0, 5);
    assert_eq!(v, vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
    assert!(linspace(0.0, 1.0, 0).is_empty());
}
