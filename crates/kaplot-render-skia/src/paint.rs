// File: crates/kaplot-render-skia/src/paint.rs
// Summary: Option-map to Skia paint conversion: colors, line styles, markers and hatches.

use skia_safe as skia;

use kaplot_core::color::{self, Rgba};
use kaplot_core::value::{StyleMap, Value};

/// Points to pixels at `dpi`.
pub fn pt(dpi: f64) -> f32 { (dpi / 72.0) as f32 }

pub fn to_skia(c: Rgba) -> skia::Color {
    let ch = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    skia::Color::from_argb(ch(c[3]), ch(c[0]), ch(c[1]), ch(c[2]))
}

/// Color under `key` with the map's `alpha` applied; `none` means transparent.
pub fn color_opt(opts: &StyleMap, key: &str) -> Option<skia::Color> {
    let v = opts.get(key)?;
    if let Value::Text(s) = v {
        if s.eq_ignore_ascii_case("none") {
            return Some(skia::Color::TRANSPARENT);
        }
    }
    color::of_value(v).map(|c| to_skia(color::with_alpha(c, opts.get_f64("alpha"))))
}

pub fn with_alpha(c: skia::Color, alpha: Option<f64>) -> skia::Color {
    match alpha {
        Some(a) => c.with_a((a.clamp(0.0, 1.0) * 255.0).round() as u8),
        None => c,
    }
}

/// Dash intervals in points for a line style; `None` draws solid, `Some(empty)` draws nothing.
pub fn dash_pattern(ls: Option<&str>) -> Option<Vec<f32>> {
    match ls?.trim() {
        "" | "None" | "none" | " " => Some(Vec::new()),
        "--" | "dashed" => Some(vec![3.7, 1.6]),
        ":" | "dotted" => Some(vec![1.0, 1.65]),
        "-." | "dashdot" => Some(vec![6.4, 1.6, 1.0, 1.6]),
        _ => None,
    }
}

/// Stroke settings shared by lines, frames and edges.
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    pub color: skia::Color,
    pub width: f32,
    pub dash: Option<Vec<f32>>,
}

impl Stroke {
    /// Read `color` (or `key`), `lw` and `ls` from `opts`; widths are in points.
    pub fn from_opts(opts: &StyleMap, color_key: &str, default_color: skia::Color, default_lw: f32) -> Self {
        let color = color_opt(opts, color_key).unwrap_or_else(|| with_alpha(default_color, opts.get_f64("alpha")));
        let width = opts.get_f64("lw").map(|w| w as f32).unwrap_or(default_lw);
        let dash = dash_pattern(opts.get_str("ls"));
        Self { color, width, dash }
    }

    pub fn visible(&self) -> bool {
        self.width > 0.0 && self.color.a() > 0 && !matches!(&self.dash, Some(d) if d.is_empty())
    }

    pub fn paint(&self, scale: f32, sketch: bool) -> skia::Paint {
        let mut p = skia::Paint::default();
        p.set_anti_alias(true);
        p.set_style(skia::paint::Style::Stroke);
        p.set_color(self.color);
        let w = self.width * scale;
        p.set_stroke_width(w);
        if let Some(d) = self.dash.as_ref().filter(|d| !d.is_empty()) {
            let px: Vec<f32> = d.iter().map(|v| v * w.max(1.0)).collect();
            if let Some(effect) = skia::PathEffect::dash(&px, 0.0) {
                p.set_path_effect(effect);
            }
        } else if sketch {
            if let Some(effect) = skia::PathEffect::discrete(8.0 * scale, 1.2 * scale, 7) {
                p.set_path_effect(effect);
            }
        }
        p
    }
}

pub fn fill_paint(color: skia::Color) -> skia::Paint {
    let mut p = skia::Paint::default();
    p.set_anti_alias(true);
    p.set_style(skia::paint::Style::Fill);
    p.set_color(color);
    p
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    Point,
    Circle,
    Square,
    TriangleUp,
    TriangleDown,
    Diamond,
    Plus,
    Cross,
    Star,
}

impl Marker {
    /// Marker for an option value; `None`, `""` and unknown names draw nothing.
    pub fn parse(v: Option<&Value>) -> Option<Marker> {
        Some(match v?.as_str()?.trim() {
            "." => Marker::Point,
            "o" => Marker::Circle,
            "s" => Marker::Square,
            "^" => Marker::TriangleUp,
            "v" => Marker::TriangleDown,
            "D" | "d" => Marker::Diamond,
            "+" => Marker::Plus,
            "x" => Marker::Cross,
            "*" => Marker::Star,
            _ => return None,
        })
    }

    fn is_open(self) -> bool { matches!(self, Marker::Plus | Marker::Cross) }

    fn path(self, (x, y): (f32, f32), size: f32) -> skia::Path {
        let r = size * 0.5;
        let mut path = skia::Path::new();
        match self {
            Marker::Point => {
                path.add_circle((x, y), r * 0.4, None);
            }
            Marker::Circle => {
                path.add_circle((x, y), r, None);
            }
            Marker::Square => {
                path.add_rect(skia::Rect::from_ltrb(x - r, y - r, x + r, y + r), None);
            }
            Marker::TriangleUp | Marker::TriangleDown => {
                let s = if self == Marker::TriangleUp { 1.0 } else { -1.0 };
                path.move_to((x, y - s * r));
                path.line_to((x + r, y + s * r));
                path.line_to((x - r, y + s * r));
                path.close();
            }
            Marker::Diamond => {
                path.move_to((x, y - r));
                path.line_to((x + r * 0.75, y));
                path.line_to((x, y + r));
                path.line_to((x - r * 0.75, y));
                path.close();
            }
            Marker::Plus => {
                path.move_to((x - r, y));
                path.line_to((x + r, y));
                path.move_to((x, y - r));
                path.line_to((x, y + r));
            }
            Marker::Cross => {
                path.move_to((x - r, y - r));
                path.line_to((x + r, y + r));
                path.move_to((x - r, y + r));
                path.line_to((x + r, y - r));
            }
            Marker::Star => {
                for i in 0..10 {
                    let rad = if i % 2 == 0 { r } else { r * 0.4 };
                    let a = std::f32::consts::FRAC_PI_2 + i as f32 * std::f32::consts::PI / 5.0;
                    let p = (x + rad * a.cos(), y - rad * a.sin());
                    if i == 0 { path.move_to(p); } else { path.line_to(p); }
                }
                path.close();
            }
        }
        path
    }

    /// Draw at pixel `at`; `size` in pixels.
    pub fn draw(self, canvas: &skia::Canvas, at: (f32, f32), size: f32, face: Option<skia::Color>, edge: skia::Color, edge_width: f32) {
        let path = self.path(at, size);
        if let Some(face) = face.filter(|_| !self.is_open()) {
            canvas.draw_path(&path, &fill_paint(face));
        }
        let mut stroke = fill_paint(edge);
        stroke.set_style(skia::paint::Style::Stroke);
        stroke.set_stroke_width(edge_width.max(0.5));
        canvas.draw_path(&path, &stroke);
    }
}

/// Fill `rect` with a hatch pattern made of the characters `/ \ | - + x o O . *`.
/// Repeating a character makes the pattern denser.
pub fn draw_hatch(canvas: &skia::Canvas, rect: skia::Rect, pattern: &str, color: skia::Color, scale: f32) {
    if pattern.trim().is_empty() {
        return;
    }
    // only the visible part; log axes can push edges far outside the canvas
    let mut rect = rect;
    if let Some(clip) = canvas.local_clip_bounds() {
        if !rect.intersect(clip) {
            return;
        }
    }
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return;
    }
    let density = |c: char| pattern.chars().filter(|&p| p == c).count() as f32;
    let mut line = fill_paint(color);
    line.set_style(skia::paint::Style::Stroke);
    line.set_stroke_width(1.0 * scale);

    canvas.save();
    canvas.clip_rect(rect, skia::ClipOp::Intersect, true);
    let (l, t, r, b) = (rect.left, rect.top, rect.right, rect.bottom);
    let span = (r - l) + (b - t);
    let lines = |canvas: &skia::Canvas, n: f32, f: &dyn Fn(f32) -> ((f32, f32), (f32, f32))| {
        if n <= 0.0 { return; }
        let step = (8.0 * scale / n).max(2.0);
        let mut o = 0.0;
        while o <= span {
            let (a, z) = f(o);
            canvas.draw_line(a, z, &line);
            o += step;
        }
    };
    let fwd = density('/') + density('x');
    let back = density('\\') + density('x');
    let vert = density('|') + density('+');
    let horiz = density('-') + density('+');
    let x0 = l - (b - t);
    lines(canvas, fwd, &|o| ((x0 + o, b), (x0 + o + span, b - span)));
    lines(canvas, back, &|o| ((x0 + o, t), (x0 + o + span, t + span)));
    lines(canvas, vert, &|o| ((l + o, t), (l + o, b)));
    lines(canvas, horiz, &|o| ((l, t + o), (r, t + o)));

    let dots = [('o', 0.35, false), ('O', 0.6, false), ('.', 0.15, true), ('*', 0.3, true)];
    for (c, frac, filled) in dots {
        let n = density(c);
        if n <= 0.0 { continue; }
        let step = (8.0 * scale / n).max(3.0);
        let mut paint = if filled { fill_paint(color) } else { line.clone() };
        paint.set_anti_alias(true);
        let mut y = t + step * 0.5;
        while y < b {
            let mut x = l + step * 0.5;
            while x < r {
                canvas.draw_circle((x, y), step * frac * 0.5, &paint);
                x += step;
            }
            y += step;
        }
    }
    canvas.restore();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_convert_with_alpha() {
        let m = StyleMap::new().with("color", "red").with("alpha", 0.5);
        let c = color_opt(&m, "color").unwrap();
        assert_eq!((c.r(), c.g(), c.b(), c.a()), (255, 0, 0, 128));
        assert_eq!(color_opt(&StyleMap::new().with("fc", "none"), "fc"), Some(skia::Color::TRANSPARENT));
    }

    #[test]
    fn empty_line_style_hides_stroke() {
        let m = StyleMap::new().with("ls", "").with("lw", 2);
        let s = Stroke::from_opts(&m, "color", skia::Color::BLACK, 1.5);
        assert!(!s.visible());
        let solid = Stroke::from_opts(&StyleMap::new(), "color", skia::Color::BLACK, 1.5);
        assert!(solid.visible());
        assert_eq!(solid.dash, None);
    }

    #[test]
    fn marker_names() {
        assert_eq!(Marker::parse(Some(&Value::from("D"))), Some(Marker::Diamond));
        assert_eq!(Marker::parse(Some(&Value::None)), None);
        assert_eq!(Marker::parse(None), None);
    }
}
