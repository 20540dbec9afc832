// File: crates/kaplot-core/tests/resolver.rs
// Purpose: Settings resolver laws checked against every registered feature table.

use kaplot_core::{resolve, Config, Feature, Setting, StyleMap, Value};

#[test]
fn empty_overrides_give_concrete_defaults() {
    let config = Config::default();
    for feature in Feature::ALL {
        let defaults = config.defaults(feature);
        let got = resolve(defaults, &StyleMap::new());
        for (key, setting) in defaults.iter() {
            match setting {
                Setting::Auto => assert!(!got.contains(key), "{}: auto key '{key}' leaked", feature.name()),
                Setting::Value(v) => assert_eq!(got.get(key), Some(v), "{}: '{key}'", feature.name()),
            }
        }
    }
}

#[test]
fn unknown_keys_never_pass() {
    let config = Config::default();
    let junk = StyleMap::new().with("not_an_option", 1).with("another", "x");
    for feature in Feature::ALL {
        let got = resolve(config.defaults(feature), &junk);
        assert!(!got.contains("not_an_option") && !got.contains("another"), "{}", feature.name());
    }
}

#[test]
fn overrides_win_even_when_none() {
    let d = Config::default();
    let line = d.defaults(Feature::Line);
    let got = resolve(line, &StyleMap::new().with("label", Value::None).with("color", "red"));
    assert_eq!(got.get("label"), Some(&Value::None));
    assert_eq!(got.get_str("color"), Some("red"));
    assert_eq!(got.get_bool("increment"), Some(true));
}

#[test]
fn resolve_is_idempotent() {
    let d = Config::default();
    let bar = d.defaults(Feature::Bar);
    let once = resolve(bar, &StyleMap::new().with("hatch", "//").with("lw", 2));
    assert_eq!(resolve(bar, &once), once);
}
