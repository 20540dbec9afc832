// File: crates/kaplot-render-skia/src/text.rs
// Summary: Text shaping with Skia textlayout; font options come from resolved font maps.

use skia_safe as skia;
use skia::textlayout::{FontCollection, Paragraph, ParagraphBuilder, ParagraphStyle, TextStyle};

use kaplot_core::color;
use kaplot_core::value::{StyleMap, Value};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
    #[default]
    Baseline,
    Bottom,
}

/// Named font sizes, in points.
pub fn named_size(name: &str) -> Option<f32> {
    Some(match name.trim().to_ascii_lowercase().as_str() {
        "xx-small" => 5.79,
        "x-small" => 6.94,
        "small" => 8.33,
        "medium" => 10.0,
        "large" => 12.0,
        "x-large" => 14.4,
        "xx-large" => 17.28,
        "larger" => 12.0,
        "smaller" => 8.33,
        _ => return None,
    })
}

/// Size in points from a number or a size name.
pub fn size_of(v: &Value) -> Option<f32> {
    match v {
        Value::Text(s) => named_size(s).or_else(|| s.trim().parse().ok()),
        other => other.as_f64().map(|f| f as f32),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    pub size_pt: f32,
    pub bold: bool,
    pub italic: bool,
    pub family: Option<String>,
    pub color: Option<skia::Color>,
    /// Degrees, counter-clockwise.
    pub rotation: f32,
    pub ha: HAlign,
    pub va: VAlign,
}

impl FontSpec {
    pub fn new(size_pt: f32) -> Self {
        Self { size_pt, bold: false, italic: false, family: None, color: None, rotation: 0.0, ha: HAlign::Left, va: VAlign::Baseline }
    }

    /// Read `family`, `style`, `weight`, `size`, `color`, `alpha`, `ha`, `va` and `rotation`.
    /// Absent or unreadable keys keep the values of `base`.
    pub fn from_map(m: &StyleMap, base: FontSpec) -> Self {
        let mut f = base;
        if let Some(size) = m.get("size").and_then(size_of) {
            f.size_pt = size;
        }
        if let Some(w) = m.get("weight") {
            f.bold = match w {
                Value::Text(s) => matches!(s.to_ascii_lowercase().as_str(), "bold" | "heavy" | "black" | "semibold" | "demibold" | "extra bold"),
                other => other.as_f64().is_some_and(|n| n >= 600.0),
            };
        }
        if let Some(s) = m.get_str("style") {
            f.italic = matches!(s.to_ascii_lowercase().as_str(), "italic" | "oblique");
        }
        if let Some(fam) = m.get_str("family") {
            f.family = Some(fam.to_string());
        }
        if let Some(c) = m.get("color").and_then(color::of_value) {
            f.color = Some(crate::paint::to_skia(color::with_alpha(c, m.get_f64("alpha"))));
        }
        match m.get("rotation") {
            Some(Value::Text(s)) if s.eq_ignore_ascii_case("vertical") => f.rotation = 90.0,
            Some(Value::Text(s)) if s.eq_ignore_ascii_case("horizontal") => f.rotation = 0.0,
            Some(v) => {
                if let Some(deg) = v.as_f64() { f.rotation = deg as f32; }
            }
            None => {}
        }
        if let Some(ha) = m.get_str("ha") {
            f.ha = match ha.to_ascii_lowercase().as_str() {
                "center" => HAlign::Center,
                "right" => HAlign::Right,
                _ => HAlign::Left,
            };
        }
        if let Some(va) = m.get_str("va") {
            f.va = match va.to_ascii_lowercase().as_str() {
                "top" => VAlign::Top,
                "center" | "center_baseline" => VAlign::Center,
                "bottom" => VAlign::Bottom,
                _ => VAlign::Baseline,
            };
        }
        f
    }

    pub fn aligned(mut self, ha: HAlign, va: VAlign) -> Self {
        self.ha = ha;
        self.va = va;
        self
    }

    fn families(&self) -> Vec<String> {
        let generic: &[&str] = match self.family.as_deref().map(str::to_ascii_lowercase).as_deref() {
            Some("serif") => &["Times New Roman", "DejaVu Serif", "Liberation Serif", "serif"],
            Some("monospace") => &["Consolas", "Menlo", "DejaVu Sans Mono", "monospace"],
            Some("cursive") | Some("fantasy") => &["Comic Sans MS", "Humor Sans", "DejaVu Sans", "sans-serif"],
            _ => &["Arial", "Helvetica", "DejaVu Sans", "Liberation Sans", "sans-serif"],
        };
        let mut out: Vec<String> = Vec::with_capacity(generic.len() + 1);
        if let Some(fam) = &self.family {
            if !matches!(fam.to_ascii_lowercase().as_str(), "serif" | "sans-serif" | "monospace" | "cursive" | "fantasy") {
                out.push(fam.clone());
            }
        }
        out.extend(generic.iter().map(|s| s.to_string()));
        out
    }
}

pub struct TextShaper {
    fonts: FontCollection,
}

impl Default for TextShaper {
    fn default() -> Self { Self::new() }
}

impl TextShaper {
    pub fn new() -> Self {
        let mut fc = FontCollection::new();
        // system font manager for fallback
        fc.set_default_font_manager(skia::FontMgr::default(), None);
        Self { fonts: fc }
    }

    fn make_style(spec: &FontSpec, px: f32, color: skia::Color) -> TextStyle {
        let mut ts = TextStyle::new();
        ts.set_font_size(px.max(1.0));
        ts.set_color(spec.color.unwrap_or(color));
        let weight = if spec.bold { skia::font_style::Weight::BOLD } else { skia::font_style::Weight::NORMAL };
        let slant = if spec.italic { skia::font_style::Slant::Italic } else { skia::font_style::Slant::Upright };
        ts.set_font_style(skia::FontStyle::new(weight, skia::font_style::Width::NORMAL, slant));
        let families = spec.families();
        ts.set_font_families(&families);
        ts
    }

    /// Shape `text` at `px` pixels (already scaled from points).
    pub fn layout(&self, text: &str, spec: &FontSpec, px: f32, color: skia::Color) -> Paragraph {
        let mut pstyle = ParagraphStyle::new();
        pstyle.set_text_align(skia::textlayout::TextAlign::Left);
        let mut builder = ParagraphBuilder::new(&pstyle, &self.fonts);
        let style = Self::make_style(spec, px, color);
        builder.push_style(&style);
        builder.add_text(text);
        let mut paragraph = builder.build();
        paragraph.layout(10_000.0);
        paragraph
    }

    /// Width and height in pixels.
    pub fn measure(&self, text: &str, spec: &FontSpec, px: f32) -> (f32, f32) {
        let p = self.layout(text, spec, px, skia::Color::from_argb(0, 0, 0, 0));
        (p.longest_line(), p.height())
    }

    /// Draw `text` anchored at `(x, y)` using the alignment and rotation in `spec`.
    pub fn draw(&self, canvas: &skia::Canvas, text: &str, x: f32, y: f32, spec: &FontSpec, px: f32, color: skia::Color) {
        let mut p = self.layout(text, spec, px, color);
        let (w, h) = (p.longest_line(), p.height());
        let dx = match spec.ha {
            HAlign::Left => 0.0,
            HAlign::Center => -w * 0.5,
            HAlign::Right => -w,
        };
        // paragraphs paint from their top-left corner
        let dy = match spec.va {
            VAlign::Top => 0.0,
            VAlign::Center => -h * 0.5,
            VAlign::Baseline => -p.alphabetic_baseline(),
            VAlign::Bottom => -h,
        };
        canvas.save();
        canvas.translate((x, y));
        if spec.rotation != 0.0 {
            canvas.rotate(-spec.rotation, None);
        }
        p.paint(canvas, (dx, dy));
        canvas.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_map_overrides_base() {
        let m = StyleMap::new().with("size", "large").with("weight", "bold").with("rotation", "vertical").with("ha", "center");
        let f = FontSpec::from_map(&m, FontSpec::new(10.0));
        assert_eq!(f.size_pt, 12.0);
        assert!(f.bold && !f.italic);
        assert_eq!(f.rotation, 90.0);
        assert_eq!(f.ha, HAlign::Center);
        assert_eq!(f.va, VAlign::Baseline);
    }

    #[test]
    fn numeric_sizes_and_weights() {
        let m = StyleMap::new().with("size", 14).with("weight", 700);
        let f = FontSpec::from_map(&m, FontSpec::new(10.0));
        assert_eq!(f.size_pt, 14.0);
        assert!(f.bold);
        assert_eq!(size_of(&Value::from("9.5")), Some(9.5));
    }

    #[test]
    fn specific_family_goes_first() {
        let mut f = FontSpec::new(10.0);
        f.family = Some("Fira Sans".into());
        assert_eq!(f.families()[0], "Fira Sans");
        f.family = Some("serif".into());
        assert_eq!(f.families()[0], "Times New Roman");
    }
}
