// File: crates/kaplot-render-skia/src/lib.rs
// Summary: Skia drawing backend for kaplot. Backend calls build a retained scene per
//          axes which is painted to a raster or SVG canvas on export.

pub mod backend;
mod draw;
pub mod paint;
pub mod scene;
pub mod text;
pub mod theme;
pub mod ticks;

pub use backend::{ImageFormat, SkiaBackend};
pub use theme::StyleSheet;
