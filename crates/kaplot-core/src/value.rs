// File: crates/kaplot-core/src/value.rs
// Summary: Option values and flat option maps that cross the backend seam.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A numeric value that remembers whether it is integral.
/// Integral values print without a decimal point (tick labels rely on this).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Number {
    Int(i64),
    Float(#[serde(with = "nonfinite")] f64),
}

impl Number {
    /// Coerce `v` to `Int` when it is integral, `Float` otherwise.
    pub fn coerce(v: f64) -> Self {
        if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
            Number::Int(v as i64)
        } else {
            Number::Float(v)
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }
}

impl From<i32> for Number { fn from(v: i32) -> Self { Number::Int(v as i64) } }
impl From<i64> for Number { fn from(v: i64) -> Self { Number::Int(v) } }
impl From<f64> for Number { fn from(v: f64) -> Self { Number::Float(v) } }

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{i}"),
            Number::Float(v) => write!(f, "{v}"),
        }
    }
}

/// A single option value passed to the drawing backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(#[serde(with = "nonfinite")] f64),
    Text(String),
    /// Color produced by colormap sampling, components in 0..=1.
    Rgba(#[serde(with = "nonfinite::array4")] [f64; 4]),
    List(Vec<Value>),
    /// Nested option map (boxplot `boxprops`, `flierprops`, ...).
    Map(StyleMap),
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Int(i) => Some(i as f64),
            Value::Float(f) => Some(f),
            Value::Text(ref s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Convert a JSON value (user defaults files) into an option value.
    pub fn from_json(v: &serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::None,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Text(s.clone()),
            serde_json::Value::Array(items) => Value::List(items.iter().map(Value::from_json).collect()),
            serde_json::Value::Object(obj) => {
                Value::Map(obj.iter().map(|(k, v)| (k.as_str(), Value::from_json(v))).collect())
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Rgba([r, g, b, a]) => write!(f, "({r:.3}, {g:.3}, {b:.3}, {a:.3})"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            Value::Map(m) => {
                write!(f, "{{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for Value { fn from(v: bool) -> Self { Value::Bool(v) } }
impl From<i32> for Value { fn from(v: i32) -> Self { Value::Int(v as i64) } }
impl From<i64> for Value { fn from(v: i64) -> Self { Value::Int(v) } }
impl From<usize> for Value { fn from(v: usize) -> Self { Value::Int(v as i64) } }
impl From<f32> for Value { fn from(v: f32) -> Self { Value::Float(v as f64) } }
impl From<f64> for Value { fn from(v: f64) -> Self { Value::Float(v) } }
impl From<&str> for Value { fn from(v: &str) -> Self { Value::Text(v.to_string()) } }
impl From<String> for Value { fn from(v: String) -> Self { Value::Text(v) } }
impl From<[f64; 4]> for Value { fn from(v: [f64; 4]) -> Self { Value::Rgba(v) } }
impl From<StyleMap> for Value { fn from(v: StyleMap) -> Self { Value::Map(v) } }

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        match n {
            Number::Int(i) => Value::Int(i),
            Number::Float(f) => Value::Float(f),
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::None)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

/// Flat option map. Keys are lower-cased on insertion, matching how option
/// names are compared everywhere else.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleMap(BTreeMap<String, Value>);

impl StyleMap {
    pub fn new() -> Self { Self(BTreeMap::new()) }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.to_ascii_lowercase(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Copy every entry of `other` over `self`.
    pub fn extend_from(&mut self, other: &StyleMap) {
        for (k, v) in other.iter() {
            self.0.insert(k.to_string(), v.clone());
        }
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }
}

impl<K: AsRef<str>, V: Into<Value>> FromIterator<(K, V)> for StyleMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut m = StyleMap::new();
        for (k, v) in iter {
            m.insert(k.as_ref(), v);
        }
        m
    }
}

/// Serde helpers for floats that may be NaN or infinite. JSON has no literal for
/// either, so NaN is written as `null` and infinities as `"inf"` / `"-inf"`.
pub mod nonfinite {
    use serde::ser::SerializeSeq;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Finite(f64),
        Tagged(Option<String>),
    }

    fn to_repr(v: f64) -> Repr {
        if v.is_finite() {
            Repr::Finite(v)
        } else if v.is_nan() {
            Repr::Tagged(None)
        } else if v > 0.0 {
            Repr::Tagged(Some("inf".into()))
        } else {
            Repr::Tagged(Some("-inf".into()))
        }
    }

    fn from_repr<E: de::Error>(r: Repr) -> Result<f64, E> {
        match r {
            Repr::Finite(v) => Ok(v),
            Repr::Tagged(None) => Ok(f64::NAN),
            Repr::Tagged(Some(s)) => match s.as_str() {
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                "nan" => Ok(f64::NAN),
                other => Err(E::custom(format!("expected a number, null, \"inf\" or \"-inf\", got {other:?}"))),
            },
        }
    }

    fn write_seq<S: Serializer>(values: &[f64], s: S) -> Result<S::Ok, S::Error> {
        let mut seq = s.serialize_seq(Some(values.len()))?;
        for v in values {
            seq.serialize_element(&to_repr(*v))?;
        }
        seq.end()
    }

    fn read_seq<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<f64>, D::Error> {
        Vec::<Repr>::deserialize(d)?.into_iter().map(from_repr).collect()
    }

    pub fn serialize<S: Serializer>(v: &f64, s: S) -> Result<S::Ok, S::Error> {
        to_repr(*v).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        from_repr(Repr::deserialize(d)?)
    }

    pub mod vec {
        use serde::{Deserializer, Serializer};

        pub fn serialize<S: Serializer>(v: &[f64], s: S) -> Result<S::Ok, S::Error> {
            super::write_seq(v, s)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<f64>, D::Error> {
            super::read_seq(d)
        }
    }

    pub mod opt_vec {
        use serde::{Deserialize, Deserializer, Serialize, Serializer};

        struct Seq<'a>(&'a [f64]);

        impl Serialize for Seq<'_> {
            fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                super::write_seq(self.0, s)
            }
        }

        pub fn serialize<S: Serializer>(v: &Option<Vec<f64>>, s: S) -> Result<S::Ok, S::Error> {
            match v {
                Some(values) => s.serialize_some(&Seq(values)),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<f64>>, D::Error> {
            Option::<Vec<super::Repr>>::deserialize(d)?
                .map(|items| items.into_iter().map(super::from_repr).collect::<Result<Vec<f64>, D::Error>>())
                .transpose()
        }
    }

    pub mod array4 {
        use serde::{de, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(v: &[f64; 4], s: S) -> Result<S::Ok, S::Error> {
            super::write_seq(v, s)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[f64; 4], D::Error> {
            let values = super::read_seq(d)?;
            let n = values.len();
            <[f64; 4]>::try_from(values).map_err(|_| de::Error::invalid_length(n, &"4 color components"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_numbers_print_without_decimal_point() {
        assert_eq!(Number::coerce(3.0).to_string(), "3");
        assert_eq!(Number::coerce(0.5).to_string(), "0.5");
        assert_eq!(Number::coerce(-2.0), Number::Int(-2));
    }

    #[test]
    fn style_map_keys_are_lower_cased() {
        let m = StyleMap::new().with("Color", "red").with("LW", 2.0);
        assert_eq!(m.get_str("color"), Some("red"));
        assert_eq!(m.get_f64("lw"), Some(2.0));
        assert!(!m.contains("Color"));
    }

    #[test]
    fn non_finite_floats_survive_json() {
        let v = Value::List(vec![Value::Float(f64::NAN), Value::Float(f64::NEG_INFINITY), Value::Rgba([0.0, 0.5, 1.0, 1.0])]);
        let text = serde_json::to_string(&v).unwrap();
        assert!(text.contains("null") && text.contains("\"-inf\""));
        match serde_json::from_str::<Value>(&text).unwrap() {
            Value::List(items) => {
                assert!(matches!(items[0], Value::Float(f) if f.is_nan()));
                assert_eq!(items[1], Value::Float(f64::NEG_INFINITY));
                assert_eq!(items[2], Value::Rgba([0.0, 0.5, 1.0, 1.0]));
            }
            other => panic!("unexpected value: {other:?}"),
        }
        assert!(serde_json::from_str::<Value>(r#"{"Float":"lots"}"#).is_err());
    }
}
