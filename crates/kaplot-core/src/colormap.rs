// File: crates/kaplot-core/src/colormap.rs
// Summary: Named continuous colormaps as color stops with linear interpolation.

use crate::color::{self, Rgba};

type Stop = (f64, &'static str);

const GIST_RAINBOW: &[Stop] = &[
    (0.000, "#ff0028"),
    (0.030, "#ff0000"),
    (0.215, "#ffff00"),
    (0.400, "#00ff00"),
    (0.586, "#00ffff"),
    (0.770, "#0000ff"),
    (0.954, "#ff00ff"),
    (1.000, "#ff00bf"),
];

const VIRIDIS: &[Stop] = &[
    (0.00, "#440154"),
    (0.25, "#3b528b"),
    (0.50, "#21918c"),
    (0.75, "#5ec962"),
    (1.00, "#fde725"),
];

const JET: &[Stop] = &[
    (0.000, "#000080"),
    (0.125, "#0000ff"),
    (0.375, "#00ffff"),
    (0.625, "#ffff00"),
    (0.875, "#ff0000"),
    (1.000, "#800000"),
];

const GRAY: &[Stop] = &[(0.0, "#000000"), (1.0, "#ffffff")];
const GREYS: &[Stop] = &[(0.0, "#ffffff"), (1.0, "#000000")];
const HOT: &[Stop] = &[(0.0, "#0b0000"), (0.365, "#ff0000"), (0.746, "#ffff00"), (1.0, "#ffffff")];
const COOL: &[Stop] = &[(0.0, "#00ffff"), (1.0, "#ff00ff")];

/// Built-in colormap selector.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColorMap {
    GistRainbow,
    Viridis,
    Jet,
    Gray,
    Greys,
    Hot,
    Cool,
}

impl ColorMap {
    pub const ALL: [ColorMap; 7] =
        [ColorMap::GistRainbow, ColorMap::Viridis, ColorMap::Jet, ColorMap::Gray, ColorMap::Greys, ColorMap::Hot, ColorMap::Cool];

    pub fn name(self) -> &'static str {
        match self {
            ColorMap::GistRainbow => "gist_rainbow",
            ColorMap::Viridis => "viridis",
            ColorMap::Jet => "jet",
            ColorMap::Gray => "gray",
            ColorMap::Greys => "greys",
            ColorMap::Hot => "hot",
            ColorMap::Cool => "cool",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        let name = if name == "grey" { "gray".to_string() } else { name };
        ColorMap::ALL.into_iter().find(|m| m.name() == name)
    }

    /// Look up `name`, falling back to `gist_rainbow` with a warning.
    pub fn lookup(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            log::warn!("kaplot: unknown colormap '{name}', using gist_rainbow");
            ColorMap::GistRainbow
        })
    }

    fn stops(self) -> &'static [Stop] {
        match self {
            ColorMap::GistRainbow => GIST_RAINBOW,
            ColorMap::Viridis => VIRIDIS,
            ColorMap::Jet => JET,
            ColorMap::Gray => GRAY,
            ColorMap::Greys => GREYS,
            ColorMap::Hot => HOT,
            ColorMap::Cool => COOL,
        }
    }

    /// Color at `x` in `0..=1`; values outside are clamped to the end stops.
    pub fn sample(self, x: f64) -> Rgba {
        let stops = self.stops();
        let rgb = |hex: &str| color::from_hex(hex).unwrap_or(color::BLACK);
        let x = if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) };
        let hi = stops.iter().position(|(f, _)| *f >= x).unwrap_or(stops.len() - 1);
        if hi == 0 { return rgb(stops[0].1); }
        let (fa, ca) = stops[hi - 1];
        let (fb, cb) = stops[hi];
        let (a, b) = (rgb(ca), rgb(cb));
        let t = if fb > fa { (x - fa) / (fb - fa) } else { 0.0 };
        [a[0] + (b[0] - a[0]) * t, a[1] + (b[1] - a[1]) * t, a[2] + (b[2] - a[2]) * t, 1.0]
    }
}

/// `n` colors sampled at `i / n` for `i in 0..n`.
pub fn sample_evenly(map: ColorMap, n: usize) -> Vec<Rgba> {
    (0..n).map(|i| map.sample(i as f64 / n as f64)).collect()
}
