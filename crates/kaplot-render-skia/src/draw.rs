// File: crates/kaplot-render-skia/src/draw.rs
// Summary: Paints recorded axes scenes onto a Skia canvas: frames, grid, marks, ticks,
//          labels, titles and legends.

use skia_safe as skia;

use kaplot_core::backend::{SaveOptions, Spine};
use kaplot_core::layer::Axis;
use kaplot_core::range::Ticks;
use kaplot_core::scale::AxisScale;
use kaplot_core::value::{StyleMap, Value};
use kaplot_core::view::{AxesPlacement, AxesView};

use crate::backend::SkiaBackend;
use crate::paint::{color_opt, draw_hatch, fill_paint, pt, with_alpha, Marker, Stroke};
use crate::scene::{axis_index, AxesScene, BoxStats, EntryKind, LegendEntry, Mark};
use crate::text::{size_of, FontSpec, HAlign, VAlign};
use crate::ticks::{auto_ticks, TickFormat, DEFAULT_MAX_TICKS};

const DEFAULT_LW: f32 = 1.5;
const DEFAULT_MS: f32 = 6.0;
const FONT_PT: f32 = 10.0;
const TITLE_PT: f32 = 12.0;
const TICK_LEN: f32 = 3.5;
const TICK_PAD: f32 = 3.5;
const LABEL_PAD: f32 = 4.0;
const MEDIAN: skia::Color = skia::Color::new(0xffff_7f0e);
const MEAN: skia::Color = skia::Color::new(0xff2c_a02c);

/// Pixel rectangle of one axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Frame {
    fn rect(&self) -> skia::Rect { skia::Rect::from_ltrb(self.left, self.top, self.right, self.bottom) }
}

/// Which sides of an axes carry its own tick labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Role {
    Primary,
    /// Twin sharing x: own y axis on the right.
    TwinX,
    /// Twin sharing y: own x axis on the top.
    TwinY,
}

pub(crate) struct Figure<'a> {
    b: &'a SkiaBackend,
    width: f32,
    height: f32,
    scale: f32,
    transparent: bool,
}

impl<'a> Figure<'a> {
    pub(crate) fn new(b: &'a SkiaBackend, opts: &SaveOptions) -> Self {
        let (w, h) = opts.pixel_size();
        Self { b, width: w as f32, height: h as f32, scale: pt(opts.dpi), transparent: opts.transparent }
    }

    fn role(&self, ax: usize) -> Role {
        match self.b.views.twin_of(ax) {
            Some((_, Axis::X)) => Role::TwinX,
            Some((_, Axis::Y)) => Role::TwinY,
            None => Role::Primary,
        }
    }

    /// Root axes of `ax` following twin links.
    fn root(&self, mut ax: usize) -> usize {
        while let Some((of, _)) = self.b.views.twin_of(ax) {
            ax = of;
        }
        ax
    }

    fn frame(&self, ax: usize) -> Frame {
        let tight = self.b.tight_pad.filter(|_| matches!(self.b.placements.get(self.root(ax)), Some(AxesPlacement::Default)));
        if let Some(pad) = tight {
            return self.tight_frame(pad as f32);
        }
        let [l, b, w, h] = self.b.views.rect(ax).unwrap_or(kaplot_core::view::DEFAULT_RECT);
        let (l, b, w, h) = (l as f32, b as f32, w as f32, h as f32);
        Frame {
            left: l * self.width,
            right: (l + w) * self.width,
            top: self.height - (b + h) * self.height,
            bottom: self.height - b * self.height,
        }
    }

    /// Figure area minus room for ticks, labels and titles of the default-placed axes.
    fn tight_frame(&self, pad: f32) -> Frame {
        let s = self.scale;
        let edge = pad * FONT_PT * s;
        let defaults: Vec<usize> = (0..self.b.scenes.len())
            .filter(|&i| matches!(self.b.placements.get(self.root(i)), Some(AxesPlacement::Default)))
            .collect();
        let has = |f: &dyn Fn(usize, &AxesScene) -> bool| defaults.iter().any(|&i| f(i, &self.b.scenes[i]));
        let text_row = (FONT_PT * 1.4) * s;
        let left = edge + TICK_LEN * s + 4.0 * FONT_PT * s + if has(&|_, sc| sc.labels[1].is_some()) { text_row } else { 0.0 };
        let bottom = edge + TICK_LEN * s + text_row + if has(&|_, sc| sc.labels[0].is_some()) { text_row } else { 0.0 };
        let right = edge + if has(&|i, _| self.role(i) == Role::TwinX) { TICK_LEN * s + 4.0 * FONT_PT * s + text_row } else { FONT_PT * s };
        let top = edge
            + if has(&|_, sc| sc.title.is_some()) { TITLE_PT * 1.6 * s } else { FONT_PT * 0.5 * s }
            + if has(&|i, _| self.role(i) == Role::TwinY) { TICK_LEN * s + text_row } else { 0.0 };
        Frame { left, top, right: (self.width - right).max(left + 1.0), bottom: (self.height - bottom).max(top + 1.0) }
    }

    pub(crate) fn paint(&self, canvas: &skia::Canvas) {
        let bg = if self.transparent { skia::Color::TRANSPARENT } else { self.b.sheet.figure };
        canvas.clear(bg);
        for (ax, scene) in self.b.scenes.iter().enumerate() {
            let view = self.b.views.view(ax);
            let frame = self.frame(ax);
            AxesPainter { fig: self, canvas, scene, view, frame, role: self.role(ax) }.paint();
        }
    }

    fn text(&self, canvas: &skia::Canvas, s: &str, x: f32, y: f32, spec: &FontSpec) {
        if self.b.draw_text && !s.is_empty() {
            self.b.shaper.draw(canvas, s, x, y, spec, spec.size_pt * self.scale, self.b.sheet.text);
        }
    }

    fn text_size(&self, s: &str, spec: &FontSpec) -> (f32, f32) {
        if !self.b.draw_text || s.is_empty() {
            return (0.0, 0.0);
        }
        self.b.shaper.measure(s, spec, spec.size_pt * self.scale)
    }
}

struct AxesPainter<'f, 'a> {
    fig: &'f Figure<'a>,
    canvas: &'f skia::Canvas,
    scene: &'f AxesScene,
    view: AxesView,
    frame: Frame,
    role: Role,
}

impl AxesPainter<'_, '_> {
    fn s(&self) -> f32 { self.fig.scale }

    fn px(&self, x: f64, y: f64) -> (f32, f32) {
        let f = &self.frame;
        (self.view.x.to_px(x, f.left, f.right), self.view.y.to_px(y, f.bottom, f.top))
    }

    fn axis(&self, axis: Axis) -> &AxisScale {
        match axis {
            Axis::X => &self.view.x,
            Axis::Y => &self.view.y,
        }
    }

    /// Tick values and labels in effect for `axis`.
    fn ticks(&self, axis: Axis) -> Ticks {
        let i = axis_index(axis);
        if let Some(t) = &self.scene.ticks[i] {
            return t.clone();
        }
        let scale = self.axis(axis);
        let values = auto_ticks(scale, self.scene.max_ticks[i].unwrap_or(DEFAULT_MAX_TICKS));
        let labels = TickFormat::from_map(&self.scene.tick_formats[i]).labels(&values, scale.scale);
        Ticks { values, labels }
    }

    fn owns(&self, axis: Axis) -> bool {
        !matches!((self.role, axis), (Role::TwinX, Axis::X) | (Role::TwinY, Axis::Y))
    }

    fn paint(&self) {
        let canvas = self.canvas;
        if self.role == Role::Primary {
            canvas.draw_rect(self.frame.rect(), &fill_paint(self.fig.b.sheet.axes_face));
        }
        if let Some(grid) = &self.scene.grid {
            self.grid(grid);
        }
        canvas.save();
        canvas.clip_rect(self.frame.rect(), skia::ClipOp::Intersect, true);
        for mark in &self.scene.marks {
            if !matches!(mark, Mark::Text { .. }) {
                self.mark(mark);
            }
        }
        canvas.restore();
        for mark in &self.scene.marks {
            if let Mark::Text { x, y, s, font } = mark {
                let (px, py) = self.px(*x, *y);
                self.fig.text(canvas, s, px, py, &FontSpec::from_map(font, FontSpec::new(FONT_PT)));
            }
        }
        self.spines();
        let x_extent = if self.owns(Axis::X) { self.axis_ticks(Axis::X) } else { 0.0 };
        let y_extent = if self.owns(Axis::Y) { self.axis_ticks(Axis::Y) } else { 0.0 };
        self.axis_labels(x_extent, y_extent);
        self.title(if self.role == Role::TwinY { x_extent } else { 0.0 });
        if let Some((opts, font)) = &self.scene.legend {
            self.legend(opts, font);
        }
    }

    fn grid(&self, opts: &StyleMap) {
        let stroke = Stroke::from_opts(opts, "color", self.fig.b.sheet.grid, 0.8);
        if !stroke.visible() {
            return;
        }
        let paint = stroke.paint(self.s(), false);
        let f = self.frame;
        if self.owns(Axis::X) {
            for v in self.ticks(Axis::X).values {
                let (x, _) = self.px(v, 0.0);
                if x >= f.left - 0.5 && x <= f.right + 0.5 {
                    self.canvas.draw_line((x, f.top), (x, f.bottom), &paint);
                }
            }
        }
        if self.owns(Axis::Y) {
            for v in self.ticks(Axis::Y).values {
                let (_, y) = self.px(0.0, v);
                if y >= f.top - 0.5 && y <= f.bottom + 0.5 {
                    self.canvas.draw_line((f.left, y), (f.right, y), &paint);
                }
            }
        }
    }

    fn polyline(&self, x: &[f64], y: &[f64]) -> skia::Path {
        let mut path = skia::Path::new();
        let mut pen_down = false;
        for (&xv, &yv) in x.iter().zip(y) {
            let ok = xv.is_finite() && yv.is_finite() && (!self.view.x.scale.is_log() || xv > 0.0) && (!self.view.y.scale.is_log() || yv > 0.0);
            if !ok {
                pen_down = false;
                continue;
            }
            let p = self.px(xv, yv);
            if pen_down { path.line_to(p); } else { path.move_to(p); }
            pen_down = true;
        }
        path
    }

    fn mark(&self, mark: &Mark) {
        let ink = self.fig.b.sheet.default_ink;
        let s = self.s();
        let sketch = self.fig.b.sketch;
        match mark {
            Mark::Errorbar { x, y, xerr, yerr, opts } => {
                let stroke = Stroke::from_opts(opts, "color", ink, DEFAULT_LW);
                if stroke.visible() && x.len() > 1 {
                    self.canvas.draw_path(&self.polyline(x, y), &stroke.paint(s, sketch));
                }
                self.error_bars(x, y, xerr.as_deref(), yerr.as_deref(), opts, stroke.color);
                if let Some(marker) = Marker::parse(opts.get("marker")) {
                    let size = opts.get_f64("ms").map(|m| m as f32).unwrap_or(DEFAULT_MS) * s;
                    let face = color_opt(opts, "mfc").or(Some(stroke.color));
                    let edge = color_opt(opts, "mec").unwrap_or(stroke.color);
                    let every = opts.get_f64("markevery").map(|n| n.max(1.0) as usize).unwrap_or(1);
                    for (i, (&xv, &yv)) in x.iter().zip(y).enumerate() {
                        if i % every == 0 && xv.is_finite() && yv.is_finite() {
                            marker.draw(self.canvas, self.px(xv, yv), size, face, edge, 1.0 * s);
                        }
                    }
                }
            }
            Mark::Bars { left, width, bottom, height, xerr, yerr, opts } => {
                let face = color_opt(opts, "facecolor").or_else(|| color_opt(opts, "color")).unwrap_or(ink);
                let filled = opts.get_bool("fill").unwrap_or(true);
                let edge = color_opt(opts, "edgecolor");
                let lw = opts.get_f64("lw").map(|w| w as f32).unwrap_or(if edge.is_some() { 1.0 } else { 0.0 });
                let hatch = opts.get_str("hatch").unwrap_or("");
                let mut centers = (Vec::with_capacity(left.len()), Vec::with_capacity(left.len()));
                for i in 0..left.len().min(height.len()) {
                    let (x0, y0) = self.px(left[i], bottom[i]);
                    let (x1, y1) = self.px(left[i] + width[i], bottom[i] + height[i]);
                    let rect = skia::Rect::from_ltrb(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1));
                    if filled {
                        self.canvas.draw_rect(rect, &fill_paint(face));
                    }
                    let line_color = edge.unwrap_or(if filled { self.fig.b.sheet.frame } else { face });
                    draw_hatch(self.canvas, rect, hatch, line_color, s);
                    if lw > 0.0 || !filled {
                        let outline = Stroke { color: edge.unwrap_or(face), width: lw.max(1.0), dash: crate::paint::dash_pattern(opts.get_str("ls")) };
                        self.canvas.draw_rect(rect, &outline.paint(s, sketch));
                    }
                    centers.0.push(left[i] + width[i] / 2.0);
                    centers.1.push(bottom[i] + height[i]);
                }
                self.error_bars(&centers.0, &centers.1, xerr.as_deref(), yerr.as_deref(), opts, self.fig.b.sheet.frame);
            }
            Mark::Boxes { boxes, vert, width, fills, opts } => {
                for (i, b) in boxes.iter().enumerate() {
                    let fill = fills.get(i).and_then(|f| f.as_ref()).and_then(kaplot_core::color::of_value).map(crate::paint::to_skia);
                    self.box_glyph(b, *vert, *width, fill, opts);
                }
            }
            Mark::Scatter { x, y, opts } => {
                let marker = Marker::parse(opts.get("marker")).unwrap_or(Marker::Circle);
                let area = opts.get_f64("s").unwrap_or(36.0).max(0.0);
                let size = (area.sqrt() as f32) * s;
                let face = color_opt(opts, "color").unwrap_or(ink);
                let edge = color_opt(opts, "edgecolors").unwrap_or(face);
                for (&xv, &yv) in x.iter().zip(y) {
                    if xv.is_finite() && yv.is_finite() {
                        marker.draw(self.canvas, self.px(xv, yv), size, Some(face), edge, 0.5 * s);
                    }
                }
            }
            Mark::HLine { y, opts } => {
                let stroke = Stroke::from_opts(opts, "color", ink, DEFAULT_LW);
                let f = self.frame;
                let (x0, x1) = (opts.get_f64("xmin").unwrap_or(0.0) as f32, opts.get_f64("xmax").unwrap_or(1.0) as f32);
                let (_, py) = self.px(0.0, *y);
                let a = (f.left + x0 * (f.right - f.left), py);
                let b = (f.left + x1 * (f.right - f.left), py);
                if stroke.visible() { self.canvas.draw_line(a, b, &stroke.paint(s, sketch)); }
            }
            Mark::VLine { x, opts } => {
                let stroke = Stroke::from_opts(opts, "color", ink, DEFAULT_LW);
                let f = self.frame;
                let (y0, y1) = (opts.get_f64("ymin").unwrap_or(0.0) as f32, opts.get_f64("ymax").unwrap_or(1.0) as f32);
                let (px, _) = self.px(*x, 0.0);
                let a = (px, f.bottom - y0 * (f.bottom - f.top));
                let b = (px, f.bottom - y1 * (f.bottom - f.top));
                if stroke.visible() { self.canvas.draw_line(a, b, &stroke.paint(s, sketch)); }
            }
            Mark::HSpan { ymin, ymax, opts } => {
                let f = self.frame;
                let (fx0, fx1) = (opts.get_f64("xmin").unwrap_or(0.0) as f32, opts.get_f64("xmax").unwrap_or(1.0) as f32);
                let (_, y0) = self.px(0.0, *ymin);
                let (_, y1) = self.px(0.0, *ymax);
                let (xa, xb) = (f.left + fx0 * (f.right - f.left), f.left + fx1 * (f.right - f.left));
                let rect = skia::Rect::from_ltrb(xa.min(xb), y0.min(y1), xa.max(xb), y0.max(y1));
                let face = color_opt(opts, "fc").or_else(|| color_opt(opts, "color")).unwrap_or(ink);
                let filled = opts.get_bool("fill").unwrap_or(true);
                let edge = color_opt(opts, "ec");
                if filled {
                    self.canvas.draw_rect(rect, &fill_paint(face));
                }
                draw_hatch(self.canvas, rect, opts.get_str("hatch").unwrap_or(""), edge.unwrap_or(if filled { self.fig.b.sheet.frame } else { face }), s);
                if edge.is_some() || !filled {
                    let outline = Stroke::from_opts(opts, "ec", face, 1.0);
                    if outline.visible() { self.canvas.draw_rect(rect, &outline.paint(s, sketch)); }
                }
            }
            Mark::Arrow { x, y, dx, dy, opts } => self.arrow(*x, *y, *dx, *dy, opts),
            Mark::Text { .. } => {}
        }
    }

    fn error_bars(&self, x: &[f64], y: &[f64], xerr: Option<&[f64]>, yerr: Option<&[f64]>, opts: &StyleMap, line_color: skia::Color) {
        if xerr.is_none() && yerr.is_none() {
            return;
        }
        let s = self.s();
        let color = color_opt(opts, "ecolor").unwrap_or(line_color);
        let width = opts.get_f64("elinewidth").or_else(|| opts.get_f64("lw")).map(|w| w as f32).unwrap_or(DEFAULT_LW).max(0.5);
        let cap = opts.get_f64("capsize").unwrap_or(0.0) as f32 * s;
        let paint = Stroke { color, width, dash: None }.paint(s, false);
        for (i, (&xv, &yv)) in x.iter().zip(y).enumerate() {
            if let Some(e) = yerr.and_then(|e| e.get(i)) {
                let (a, b) = (self.px(xv, yv - e), self.px(xv, yv + e));
                self.canvas.draw_line(a, b, &paint);
                if cap > 0.0 {
                    for p in [a, b] { self.canvas.draw_line((p.0 - cap, p.1), (p.0 + cap, p.1), &paint); }
                }
            }
            if let Some(e) = xerr.and_then(|e| e.get(i)) {
                let (a, b) = (self.px(xv - e, yv), self.px(xv + e, yv));
                self.canvas.draw_line(a, b, &paint);
                if cap > 0.0 {
                    for p in [a, b] { self.canvas.draw_line((p.0, p.1 - cap), (p.0, p.1 + cap), &paint); }
                }
            }
        }
    }

    fn box_glyph(&self, b: &BoxStats, vert: bool, width: f64, fill: Option<skia::Color>, opts: &StyleMap) {
        let s = self.s();
        let ink = self.fig.b.sheet.default_ink;
        // (position, value) to pixels for either orientation
        let at = |pos: f64, val: f64| if vert { self.px(pos, val) } else { self.px(val, pos) };
        let props = |key: &str| match opts.get(key) {
            Some(Value::Map(m)) => m.clone(),
            _ => StyleMap::new(),
        };
        let line = |key: &str, color: skia::Color| Stroke::from_opts(&props(key), "color", color, 1.0).paint(s, self.fig.b.sketch);
        let half = width / 2.0;
        let (p0, p1) = (at(b.position - half, b.q1), at(b.position + half, b.q3));
        let rect = skia::Rect::from_ltrb(p0.0.min(p1.0), p0.1.min(p1.1), p0.0.max(p1.0), p0.1.max(p1.1));
        if let Some(face) = fill {
            self.canvas.draw_rect(rect, &fill_paint(face));
        }
        if opts.get_bool("showbox").unwrap_or(true) {
            self.canvas.draw_rect(rect, &line("boxprops", ink));
        }
        let whisker = line("whiskerprops", ink);
        self.canvas.draw_line(at(b.position, b.q1), at(b.position, b.whisker_lo), &whisker);
        self.canvas.draw_line(at(b.position, b.q3), at(b.position, b.whisker_hi), &whisker);
        if opts.get_bool("showcaps").unwrap_or(true) {
            let cap = line("capprops", ink);
            for v in [b.whisker_lo, b.whisker_hi] {
                self.canvas.draw_line(at(b.position - half / 2.0, v), at(b.position + half / 2.0, v), &cap);
            }
        }
        self.canvas.draw_line(at(b.position - half, b.median), at(b.position + half, b.median), &line("medianprops", MEDIAN));
        if opts.get_bool("showmeans").unwrap_or(false) {
            if opts.get_bool("meanline").unwrap_or(false) {
                let mean_line = line("meanprops", MEAN);
                self.canvas.draw_line(at(b.position - half, b.mean), at(b.position + half, b.mean), &mean_line);
            } else {
                Marker::TriangleUp.draw(self.canvas, at(b.position, b.mean), DEFAULT_MS * s, Some(MEAN), MEAN, 0.5 * s);
            }
        }
        if opts.get_bool("showfliers").unwrap_or(true) {
            for &v in &b.fliers {
                Marker::Circle.draw(self.canvas, at(b.position, v), DEFAULT_MS * s, None, ink, 1.0 * s);
            }
        }
    }

    fn arrow(&self, x: f64, y: f64, dx: f64, dy: f64, opts: &StyleMap) {
        let s = self.s();
        let ink = self.fig.b.sheet.default_ink;
        let face = color_opt(opts, "fc").or_else(|| color_opt(opts, "color")).unwrap_or(ink);
        let edge = color_opt(opts, "ec").unwrap_or(face);
        let tail = self.px(x, y);
        let tip = self.px(x + dx, y + dy);
        let (vx, vy) = (tip.0 - tail.0, tip.1 - tail.1);
        let len = (vx * vx + vy * vy).sqrt();
        if len < 1e-3 {
            return;
        }
        let (ux, uy) = (vx / len, vy / len);
        // head sizes are given in data units of y and x respectively
        let data_px = |v: Option<f64>, axis: &AxisScale, span: f32| v.map(|d| (d / (axis.vmax - axis.vmin)).abs() as f32 * span);
        let f = self.frame;
        let head_w = data_px(opts.get_f64("head_width"), &self.view.y, f.bottom - f.top).unwrap_or(8.0 * s);
        let head_l = data_px(opts.get_f64("head_length"), &self.view.x, f.right - f.left).unwrap_or(head_w * 1.5).min(len);
        let shaft_w = data_px(opts.get_f64("width"), &self.view.y, f.bottom - f.top).unwrap_or(1.0 * s).max(0.5);
        let base = (tip.0 - ux * head_l, tip.1 - uy * head_l);
        let mut shaft = Stroke { color: face, width: 1.0, dash: crate::paint::dash_pattern(opts.get_str("ls")) }.paint(1.0, self.fig.b.sketch);
        shaft.set_stroke_width(shaft_w);
        self.canvas.draw_line(tail, base, &shaft);
        let mut head = skia::Path::new();
        let (nx, ny) = (-uy * head_w / 2.0, ux * head_w / 2.0);
        head.move_to(tip);
        head.line_to((base.0 + nx, base.1 + ny));
        head.line_to((base.0 - nx, base.1 - ny));
        head.close();
        if opts.get_bool("fill").unwrap_or(true) {
            self.canvas.draw_path(&head, &fill_paint(face));
        }
        let mut outline = fill_paint(edge);
        outline.set_style(skia::paint::Style::Stroke);
        outline.set_stroke_width(opts.get_f64("lw").map(|w| w as f32).unwrap_or(0.5) * s);
        self.canvas.draw_path(&head, &outline);
    }

    fn spines(&self) {
        let sheet = &self.fig.b.sheet;
        let mut paint = Stroke { color: sheet.frame, width: 0.8, dash: None }.paint(self.s(), self.fig.b.sketch);
        paint.set_stroke_cap(skia::paint::Cap::Square);
        let f = self.frame;
        for (spine, a, b) in [
            (Spine::Top, (f.left, f.top), (f.right, f.top)),
            (Spine::Bottom, (f.left, f.bottom), (f.right, f.bottom)),
            (Spine::Left, (f.left, f.top), (f.left, f.bottom)),
            (Spine::Right, (f.right, f.top), (f.right, f.bottom)),
        ] {
            if !self.scene.hidden.contains(&spine) {
                self.canvas.draw_line(a, b, &paint);
            }
        }
    }

    /// Draw ticks and tick labels of `axis`; returns the space they take outside the frame.
    fn axis_ticks(&self, axis: Axis) -> f32 {
        let s = self.s();
        let sheet = &self.fig.b.sheet;
        let i = axis_index(axis);
        let params = &self.scene.tick_params[i];
        let flag = |key: &str, default: bool| params.get_bool(key).unwrap_or(default);
        // (near side, far side) in the axis's natural orientation
        let (near, far, label_near, label_far) = match (axis, self.role) {
            (Axis::X, Role::TwinY) => (flag("bottom", false), flag("top", true), flag("labelbottom", false), flag("labeltop", true)),
            (Axis::X, _) => (flag("bottom", true), flag("top", false), flag("labelbottom", true), flag("labeltop", false)),
            (Axis::Y, Role::TwinX) => (flag("left", false), flag("right", true), flag("labelleft", false), flag("labelright", true)),
            (Axis::Y, _) => (flag("left", true), flag("right", false), flag("labelleft", true), flag("labelright", false)),
        };
        let len = params.get_f64("length").map(|v| v as f32).unwrap_or(TICK_LEN) * s;
        let pad = params.get_f64("pad").map(|v| v as f32).unwrap_or(TICK_PAD) * s;
        let (inward, outward) = match params.get_str("direction") {
            Some("in") => (len, 0.0),
            Some("inout") => (len / 2.0, len / 2.0),
            _ => (0.0, len),
        };
        let tick_paint = Stroke {
            color: color_opt(params, "color").unwrap_or(sheet.tick),
            width: params.get_f64("width").map(|v| v as f32).unwrap_or(0.8),
            dash: None,
        }
        .paint(s, false);

        let mut font = FontSpec::from_map(&self.scene.tick_fonts[i], FontSpec::new(FONT_PT));
        if let Some(size) = params.get("labelsize").and_then(size_of) {
            font.size_pt = size;
        }
        if let Some(c) = color_opt(params, "labelcolor") {
            font.color = Some(c);
        }

        let ticks = self.ticks(axis);
        let f = self.frame;
        let mut extent: f32 = 0.0;
        for (k, &v) in ticks.values.iter().enumerate() {
            let label = ticks.labels.get(k).map(String::as_str).unwrap_or("");
            match axis {
                Axis::X => {
                    let (x, _) = self.px(v, self.view.y.vmin);
                    if x < f.left - 0.5 || x > f.right + 0.5 { continue; }
                    if near { self.canvas.draw_line((x, f.bottom - inward), (x, f.bottom + outward), &tick_paint); }
                    if far { self.canvas.draw_line((x, f.top + inward), (x, f.top - outward), &tick_paint); }
                    if label_near {
                        let spec = font.clone().aligned(HAlign::Center, VAlign::Top);
                        self.fig.text(self.canvas, label, x, f.bottom + outward + pad, &spec);
                        extent = extent.max(outward + pad + self.fig.text_size(label, &spec).1);
                    }
                    if label_far {
                        let spec = font.clone().aligned(HAlign::Center, VAlign::Bottom);
                        self.fig.text(self.canvas, label, x, f.top - outward - pad, &spec);
                        extent = extent.max(outward + pad + self.fig.text_size(label, &spec).1);
                    }
                }
                Axis::Y => {
                    let (_, y) = self.px(self.view.x.vmin, v);
                    if y < f.top - 0.5 || y > f.bottom + 0.5 { continue; }
                    if near { self.canvas.draw_line((f.left + inward, y), (f.left - outward, y), &tick_paint); }
                    if far { self.canvas.draw_line((f.right - inward, y), (f.right + outward, y), &tick_paint); }
                    if label_near {
                        let spec = font.clone().aligned(HAlign::Right, VAlign::Center);
                        self.fig.text(self.canvas, label, f.left - outward - pad, y, &spec);
                        extent = extent.max(outward + pad + self.fig.text_size(label, &spec).0);
                    }
                    if label_far {
                        let spec = font.clone().aligned(HAlign::Left, VAlign::Center);
                        self.fig.text(self.canvas, label, f.right + outward + pad, y, &spec);
                        extent = extent.max(outward + pad + self.fig.text_size(label, &spec).0);
                    }
                }
            }
        }
        extent
    }

    fn axis_labels(&self, x_extent: f32, y_extent: f32) {
        let s = self.s();
        let f = self.frame;
        if let Some((text, font)) = &self.scene.labels[0] {
            let base = FontSpec::new(FONT_PT);
            if self.role == Role::TwinY {
                let spec = FontSpec::from_map(font, base).aligned(HAlign::Center, VAlign::Bottom);
                self.fig.text(self.canvas, text, (f.left + f.right) / 2.0, f.top - x_extent - LABEL_PAD * s, &spec);
            } else {
                let spec = FontSpec::from_map(font, base).aligned(HAlign::Center, VAlign::Top);
                self.fig.text(self.canvas, text, (f.left + f.right) / 2.0, f.bottom + x_extent + LABEL_PAD * s, &spec);
            }
        }
        if let Some((text, font)) = &self.scene.labels[1] {
            let mut spec = FontSpec::from_map(font, FontSpec::new(FONT_PT)).aligned(HAlign::Center, VAlign::Bottom);
            if spec.rotation == 0.0 && font.get("rotation").is_none() {
                spec.rotation = 90.0;
            }
            let mid = (f.top + f.bottom) / 2.0;
            if self.role == Role::TwinX {
                spec.rotation = -spec.rotation;
                self.fig.text(self.canvas, text, f.right + y_extent + LABEL_PAD * s, mid, &spec);
            } else {
                self.fig.text(self.canvas, text, f.left - y_extent - LABEL_PAD * s, mid, &spec);
            }
        }
    }

    fn title(&self, above: f32) {
        if let Some((text, font)) = &self.scene.title {
            let spec = FontSpec::from_map(font, FontSpec::new(TITLE_PT)).aligned(HAlign::Center, VAlign::Bottom);
            let f = self.frame;
            self.fig.text(self.canvas, text, (f.left + f.right) / 2.0, f.top - above - 6.0 * self.s(), &spec);
        }
    }

    fn legend(&self, opts: &StyleMap, font: &StyleMap) {
        let entries = &self.scene.legend_entries;
        let title = opts.get_str("title").filter(|t| !t.is_empty());
        if entries.is_empty() && title.is_none() {
            log::debug!("kaplot: legend requested with no labelled elements");
            return;
        }
        let s = self.s();
        let sheet = &self.fig.b.sheet;
        let mut spec = FontSpec::from_map(font, FontSpec::new(FONT_PT)).aligned(HAlign::Left, VAlign::Center);
        if let Some(size) = opts.get("fontsize").and_then(size_of) {
            spec.size_pt = size;
        }
        let em = spec.size_pt * s;
        let get = |k: &str, d: f32| opts.get_f64(k).map(|v| v as f32).unwrap_or(d);
        let (border, spacing, text_pad, col_gap) = (get("borderpad", 0.4) * em, get("labelspacing", 0.5) * em, get("handletextpad", 0.8) * em, get("columnspacing", 2.0) * em);
        let handle = 2.0 * em;
        let ncol = opts.get_f64("ncol").map(|n| n.max(1.0) as usize).unwrap_or(1);
        let rows = entries.len().div_ceil(ncol).max(1);

        let label_w = entries.iter().map(|e| self.fig.text_size(&e.label, &spec).0).fold(0.0f32, f32::max);
        let col_w = handle + text_pad + label_w;
        let title_spec = self.scene.legend_title_font.as_ref().map(|m| FontSpec::from_map(m, spec.clone())).unwrap_or_else(|| spec.clone());
        let (title_w, title_h) = title.map(|t| self.fig.text_size(t, &title_spec)).unwrap_or((0.0, 0.0));
        let title_h = if title.is_some() { title_h.max(em) + spacing } else { 0.0 };
        let width = (col_w * ncol as f32 + col_gap * (ncol - 1) as f32).max(title_w) + 2.0 * border;
        let height = rows as f32 * em + (rows - 1) as f32 * spacing + title_h + 2.0 * border;

        let f = self.frame;
        let inset = 0.5 * em;
        let loc = opts.get_str("loc").unwrap_or("upper right").to_ascii_lowercase();
        let x = if loc.contains("left") {
            f.left + inset
        } else if loc.contains("right") || loc == "best" {
            f.right - inset - width
        } else {
            (f.left + f.right - width) / 2.0
        };
        let y = if loc.starts_with("upper") || loc == "best" {
            f.top + inset
        } else if loc.starts_with("lower") {
            f.bottom - inset - height
        } else {
            (f.top + f.bottom - height) / 2.0
        };
        let boxr = skia::Rect::from_xywh(x, y, width, height);
        let radius = if opts.get_bool("fancybox").unwrap_or(false) { 0.4 * em } else { 0.0 };
        if opts.get_bool("shadow").unwrap_or(false) {
            let shadow = fill_paint(skia::Color::from_argb(96, 0, 0, 0));
            self.canvas.draw_round_rect(boxr.with_offset((3.0 * s, 3.0 * s)), radius, radius, &shadow);
        }
        if opts.get_bool("frameon").unwrap_or(true) {
            let alpha = opts.get_f64("framealpha");
            self.canvas.draw_round_rect(boxr, radius, radius, &fill_paint(with_alpha(sheet.legend_face, alpha)));
            let edge = Stroke { color: with_alpha(sheet.legend_edge, alpha), width: 0.8, dash: None }.paint(s, false);
            self.canvas.draw_round_rect(boxr, radius, radius, &edge);
        }
        let mut top = y + border;
        if let Some(t) = title {
            let spec = title_spec.clone().aligned(HAlign::Center, VAlign::Top);
            self.fig.text(self.canvas, t, x + width / 2.0, top, &spec);
            top += title_h;
        }
        for (k, entry) in entries.iter().enumerate() {
            let (col, row) = (k / rows, k % rows);
            let ex = x + border + col as f32 * (col_w + col_gap);
            let cy = top + row as f32 * (em + spacing) + em / 2.0;
            self.legend_handle(entry, (ex, cy), handle, em, opts.get_f64("markerscale").unwrap_or(1.0) as f32);
            self.fig.text(self.canvas, &entry.label, ex + handle + text_pad, cy, &spec);
        }
    }

    fn legend_handle(&self, entry: &LegendEntry, (x, cy): (f32, f32), len: f32, em: f32, marker_scale: f32) {
        let s = self.s();
        let ink = self.fig.b.sheet.default_ink;
        let o = &entry.opts;
        match entry.kind {
            EntryKind::Patch => {
                let face = color_opt(o, "facecolor").or_else(|| color_opt(o, "fc")).or_else(|| color_opt(o, "color")).unwrap_or(ink);
                let rect = skia::Rect::from_ltrb(x, cy - em * 0.35, x + len, cy + em * 0.35);
                let filled = o.get_bool("fill").unwrap_or(true);
                if filled { self.canvas.draw_rect(rect, &fill_paint(face)); }
                draw_hatch(self.canvas, rect, o.get_str("hatch").unwrap_or(""), if filled { self.fig.b.sheet.frame } else { face }, s);
                if !filled {
                    self.canvas.draw_rect(rect, &Stroke { color: face, width: 1.0, dash: None }.paint(s, false));
                }
            }
            EntryKind::Line | EntryKind::Marker => {
                let stroke = Stroke::from_opts(o, "color", ink, DEFAULT_LW);
                if entry.kind == EntryKind::Line && stroke.visible() {
                    self.canvas.draw_line((x, cy), (x + len, cy), &stroke.paint(s, false));
                }
                let marker = Marker::parse(o.get("marker")).or((entry.kind == EntryKind::Marker).then_some(Marker::Circle));
                if let Some(m) = marker {
                    let size = o.get_f64("ms").map(|v| v as f32).unwrap_or(DEFAULT_MS) * s * marker_scale;
                    let face = color_opt(o, "mfc").unwrap_or(stroke.color);
                    let edge = color_opt(o, "mec").unwrap_or(stroke.color);
                    m.draw(self.canvas, (x + len / 2.0, cy), size, Some(face), edge, 1.0 * s);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kaplot_core::backend::Backend;

    #[test]
    fn frames_follow_figure_fractions() {
        let mut b = SkiaBackend::new();
        b.create_axes(AxesPlacement::Rect([0.25, 0.5, 0.5, 0.25]));
        let fig = Figure::new(&b, &SaveOptions { dpi: 100.0, transparent: false, width: 4.0, height: 4.0 });
        assert_eq!(fig.frame(0), Frame { left: 100.0, right: 300.0, top: 100.0, bottom: 200.0 });
    }

    #[test]
    fn twins_draw_their_own_side() {
        let mut b = SkiaBackend::new();
        let a = b.create_axes(AxesPlacement::Default);
        let t = b.create_axes(AxesPlacement::Twin { of: a, share: Axis::X });
        let fig = Figure::new(&b, &SaveOptions::default());
        assert_eq!(fig.role(a), Role::Primary);
        assert_eq!(fig.role(t), Role::TwinX);
        assert_eq!(fig.frame(a), fig.frame(t));
    }

    #[test]
    fn tight_layout_only_moves_default_axes() {
        let mut b = SkiaBackend::new();
        b.create_axes(AxesPlacement::Default);
        b.create_axes(AxesPlacement::Rect([0.6, 0.6, 0.2, 0.2]));
        let opts = SaveOptions::default();
        let before = (Figure::new(&b, &opts).frame(0), Figure::new(&b, &opts).frame(1));
        b.tight_layout(0.75);
        let fig = Figure::new(&b, &opts);
        assert_ne!(fig.frame(0), before.0);
        assert_eq!(fig.frame(1), before.1);
        assert!(fig.frame(0).left < before.0.left);
    }
}
