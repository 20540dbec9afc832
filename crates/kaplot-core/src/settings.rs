// File: crates/kaplot-core/src/settings.rs
// Summary: Settings resolver; merges caller overrides over a feature's defaults (allow-list).

use crate::defaults::{Defaults, Setting};
use crate::value::StyleMap;

/// Merge `overrides` over `defaults`.
///
/// Contract:
/// - every key in `defaults` takes the override value when one is present;
/// - otherwise the default value, unless the default is `Setting::Auto`, in which case the key is omitted;
/// - keys only present in `overrides` never reach the result.
pub fn resolve(defaults: &Defaults, overrides: &StyleMap) -> StyleMap {
    let mut out = StyleMap::new();
    for (key, setting) in defaults.iter() {
        match (overrides.get(key), setting) {
            (Some(v), _) => { out.insert(key, v.clone()); }
            (None, Setting::Value(v)) => { out.insert(key, v.clone()); }
            (None, Setting::Auto) => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn sample() -> Defaults {
        Defaults::new().value("a", 1).auto("b").value("c", "x")
    }

    #[test]
    fn empty_overrides_keep_concrete_defaults_only() {
        let r = resolve(&sample(), &StyleMap::new());
        assert_eq!(r.keys().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn overrides_win_and_unknown_keys_drop() {
        let o = StyleMap::new().with("B", 2.5).with("zzz", true).with("a", Value::None);
        let r = resolve(&sample(), &o);
        assert_eq!(r.get("a"), Some(&Value::None));
        assert_eq!(r.get_f64("b"), Some(2.5));
        assert_eq!(r.get_str("c"), Some("x"));
        assert!(!r.contains("zzz"));
    }
}
