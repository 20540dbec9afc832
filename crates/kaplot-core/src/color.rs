// File: crates/kaplot-core/src/color.rs
// Summary: Color parsing for option values: named colors, grey-level strings, hex and sampled RGBA.

use crate::value::Value;

/// RGBA with components in 0..=1.
pub type Rgba = [f64; 4];

pub const BLACK: Rgba = [0.0, 0.0, 0.0, 1.0];
pub const WHITE: Rgba = [1.0, 1.0, 1.0, 1.0];

/// Parse `#rrggbb` / `#rrggbbaa` (leading '#' optional).
pub fn from_hex(hex: &str) -> Option<Rgba> {
    let hex = hex.trim_start_matches('#');
    if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() { return None; }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok().map(|c| c as f64 / 255.0);
    let a = if hex.len() == 8 { channel(6)? } else { 1.0 };
    Some([channel(0)?, channel(2)?, channel(4)?, a])
}

fn named(name: &str) -> Option<&'static str> {
    let hex = match name {
        "black" | "k" => "#000000",
        "white" | "w" => "#ffffff",
        "red" | "r" => "#ff0000",
        "green" | "g" => "#008000",
        "blue" | "b" => "#0000ff",
        "yellow" | "y" => "#ffff00",
        "cyan" | "aqua" | "c" => "#00ffff",
        "magenta" | "fuchsia" | "m" => "#ff00ff",
        "orange" => "#ffa500",
        "purple" => "#800080",
        "gray" | "grey" => "#808080",
        "lightgray" | "lightgrey" => "#d3d3d3",
        "darkgray" | "darkgrey" => "#a9a9a9",
        "pink" => "#ffc0cb",
        "brown" => "#a52a2a",
        "navy" => "#000080",
        "teal" => "#008080",
        "olive" => "#808000",
        "maroon" => "#800000",
        "lime" => "#00ff00",
        "silver" => "#c0c0c0",
        "gold" => "#ffd700",
        "indigo" => "#4b0082",
        "crimson" => "#dc143c",
        "darkblue" => "#00008b",
        "darkgreen" => "#006400",
        "darkred" => "#8b0000",
        "steelblue" => "#4682b4",
        _ => return None,
    };
    Some(hex)
}

/// Parse a color string: a name, a grey level in `"0".."1"`, or hex.
pub fn parse(s: &str) -> Option<Rgba> {
    let s = s.trim().to_ascii_lowercase();
    if let Some(hex) = named(&s) { return from_hex(hex); }
    if s.starts_with('#') { return from_hex(&s); }
    match s.parse::<f64>() {
        Ok(level) if (0.0..=1.0).contains(&level) => Some([level, level, level, 1.0]),
        _ => None,
    }
}

/// Color carried by an option value (`Text` or `Rgba`). `None` and unparsable values give `None`.
pub fn of_value(v: &Value) -> Option<Rgba> {
    match v {
        Value::Rgba(c) => Some(*c),
        Value::Text(s) => parse(s),
        _ => None,
    }
}

/// Scale the color's own alpha by `alpha`.
pub fn with_alpha(c: Rgba, alpha: Option<f64>) -> Rgba {
    match alpha {
        Some(a) => [c[0], c[1], c[2], c[3] * a.clamp(0.0, 1.0)],
        None => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grey_level_strings() {
        assert_eq!(parse("0.40"), Some([0.4, 0.4, 0.4, 1.0]));
        assert_eq!(parse("1.5"), None);
    }

    #[test]
    fn names_and_hex() {
        assert_eq!(parse("Fuchsia"), Some([1.0, 0.0, 1.0, 1.0]));
        assert_eq!(parse("#00000080").map(|c| (c[3] * 255.0).round()), Some(128.0));
        assert_eq!(parse("nonsense"), None);
    }
}
