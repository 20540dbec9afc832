// File: crates/kaplot-render-skia/src/theme.rs
// Summary: Named style sheets selected through `Backend::use_style`.

use skia_safe as skia;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StyleSheet {
    pub name: &'static str,
    /// Figure background.
    pub figure: skia::Color,
    /// Inside of each axes rectangle.
    pub axes_face: skia::Color,
    pub frame: skia::Color,
    pub grid: skia::Color,
    pub text: skia::Color,
    pub tick: skia::Color,
    pub legend_face: skia::Color,
    pub legend_edge: skia::Color,
    /// Color used by a series whose `color` option is absent.
    pub default_ink: skia::Color,
}

impl Default for StyleSheet {
    fn default() -> Self { Self::classic() }
}

impl StyleSheet {
    pub fn classic() -> Self {
        Self {
            name: "classic",
            figure: skia::Color::from_argb(255, 255, 255, 255),
            axes_face: skia::Color::from_argb(255, 255, 255, 255),
            frame: skia::Color::from_argb(255, 0, 0, 0),
            grid: skia::Color::from_argb(255, 176, 176, 176),
            text: skia::Color::from_argb(255, 0, 0, 0),
            tick: skia::Color::from_argb(255, 0, 0, 0),
            legend_face: skia::Color::from_argb(255, 255, 255, 255),
            legend_edge: skia::Color::from_argb(255, 0, 0, 0),
            default_ink: skia::Color::from_argb(255, 0, 0, 0),
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark",
            figure: skia::Color::from_argb(255, 18, 18, 20),
            axes_face: skia::Color::from_argb(255, 18, 18, 20),
            frame: skia::Color::from_argb(255, 180, 180, 190),
            grid: skia::Color::from_argb(255, 60, 60, 66),
            text: skia::Color::from_argb(255, 235, 235, 245),
            tick: skia::Color::from_argb(255, 150, 150, 160),
            legend_face: skia::Color::from_argb(255, 30, 30, 34),
            legend_edge: skia::Color::from_argb(255, 180, 180, 190),
            default_ink: skia::Color::from_argb(255, 235, 235, 245),
        }
    }

    pub fn ggplot() -> Self {
        Self {
            name: "ggplot",
            figure: skia::Color::from_argb(255, 255, 255, 255),
            axes_face: skia::Color::from_argb(255, 0xe5, 0xe5, 0xe5),
            frame: skia::Color::from_argb(255, 0xe5, 0xe5, 0xe5),
            grid: skia::Color::from_argb(255, 255, 255, 255),
            text: skia::Color::from_argb(255, 0x55, 0x55, 0x55),
            tick: skia::Color::from_argb(255, 0x55, 0x55, 0x55),
            legend_face: skia::Color::from_argb(255, 0xe5, 0xe5, 0xe5),
            legend_edge: skia::Color::from_argb(255, 0xe5, 0xe5, 0xe5),
            default_ink: skia::Color::from_argb(255, 0x34, 0x8a, 0xbd),
        }
    }

    pub fn solarized_light() -> Self {
        Self {
            name: "solarized-light",
            figure: skia::Color::from_argb(255, 0xfd, 0xf6, 0xe3), // base3
            axes_face: skia::Color::from_argb(255, 0xfd, 0xf6, 0xe3),
            frame: skia::Color::from_argb(255, 0x65, 0x7b, 0x83), // base00
            grid: skia::Color::from_argb(255, 0xee, 0xe8, 0xd5),  // base2
            text: skia::Color::from_argb(255, 0x00, 0x2b, 0x36),  // base03
            tick: skia::Color::from_argb(255, 0x58, 0x6e, 0x75),  // base01
            legend_face: skia::Color::from_argb(255, 0xee, 0xe8, 0xd5),
            legend_edge: skia::Color::from_argb(255, 0x65, 0x7b, 0x83),
            default_ink: skia::Color::from_argb(255, 0x26, 0x8b, 0xd2),
        }
    }

    pub fn solarized_dark() -> Self {
        Self {
            name: "solarized-dark",
            figure: skia::Color::from_argb(255, 0x00, 0x2b, 0x36), // base03
            axes_face: skia::Color::from_argb(255, 0x00, 0x2b, 0x36),
            frame: skia::Color::from_argb(255, 0x93, 0xa1, 0xa1), // base1
            grid: skia::Color::from_argb(255, 0x07, 0x36, 0x42),  // base02
            text: skia::Color::from_argb(255, 0xee, 0xe8, 0xd5),  // base2
            tick: skia::Color::from_argb(255, 0x83, 0x94, 0x96),  // base0
            legend_face: skia::Color::from_argb(255, 0x07, 0x36, 0x42),
            legend_edge: skia::Color::from_argb(255, 0x93, 0xa1, 0xa1),
            default_ink: skia::Color::from_argb(255, 0xee, 0xe8, 0xd5),
        }
    }
}

/// Every built-in style sheet.
pub fn presets() -> Vec<StyleSheet> {
    vec![
        StyleSheet::classic(),
        StyleSheet::dark(),
        StyleSheet::ggplot(),
        StyleSheet::solarized_light(),
        StyleSheet::solarized_dark(),
    ]
}

/// Style sheet named `name` (case-insensitive; `default` is an alias of `classic`).
pub fn find(name: &str) -> Option<StyleSheet> {
    if name.eq_ignore_ascii_case("default") {
        return Some(StyleSheet::classic());
    }
    presets().into_iter().find(|s| s.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(find("Dark").map(|s| s.name), Some("dark"));
        assert_eq!(find("default").map(|s| s.name), Some("classic"));
        assert!(find("seaborn").is_none());
    }
}
