// File: crates/kaplot-core/src/defaults.rs
// Summary: Default registry (per-feature option defaults), palettes, location presets and
//          the immutable `Config` value a `Plot` is built with.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PlotError, PlotResult};
use crate::layer::Corner;
use crate::value::Value;

/// A registry default: either a concrete value or "leave it to the backend".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Setting {
    Auto,
    Value(Value),
}

/// Option defaults for one feature.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Defaults(BTreeMap<String, Setting>);

static EMPTY: Defaults = Defaults(BTreeMap::new());

impl Defaults {
    pub fn new() -> Self { Self::default() }

    pub fn auto(mut self, key: &str) -> Self {
        self.0.insert(key.to_string(), Setting::Auto);
        self
    }

    pub fn value(mut self, key: &str, v: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), Setting::Value(v.into()));
        self
    }

    pub fn set(&mut self, key: &str, setting: Setting) {
        self.0.insert(key.to_ascii_lowercase(), setting);
    }

    pub fn get(&self, key: &str) -> Option<&Setting> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Setting)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

/// Every configurable feature with its own defaults table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    TitleFont,
    XLabelFont,
    YLabelFont,
    XTickFont,
    YTickFont,
    TextFont,
    Grid,
    XTickParams,
    YTickParams,
    XTickFormat,
    YTickFormat,
    AxLine,
    Line,
    Bar,
    Hist,
    Boxplot,
    BoxScatter,
    Legend,
    LegendFont,
    Rectangle,
    Arrow,
    SaveFig,
}

impl Feature {
    pub const ALL: [Feature; 22] = [
        Feature::TitleFont, Feature::XLabelFont, Feature::YLabelFont, Feature::XTickFont,
        Feature::YTickFont, Feature::TextFont, Feature::Grid, Feature::XTickParams,
        Feature::YTickParams, Feature::XTickFormat, Feature::YTickFormat, Feature::AxLine,
        Feature::Line, Feature::Bar, Feature::Hist, Feature::Boxplot, Feature::BoxScatter,
        Feature::Legend, Feature::LegendFont, Feature::Rectangle, Feature::Arrow, Feature::SaveFig,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Feature::TitleFont => "title_font",
            Feature::XLabelFont => "x_label_font",
            Feature::YLabelFont => "y_label_font",
            Feature::XTickFont => "x_tick_font",
            Feature::YTickFont => "y_tick_font",
            Feature::TextFont => "text_font",
            Feature::Grid => "grid",
            Feature::XTickParams => "x_tick_params",
            Feature::YTickParams => "y_tick_params",
            Feature::XTickFormat => "x_tick_format",
            Feature::YTickFormat => "y_tick_format",
            Feature::AxLine => "ax_line",
            Feature::Line => "line",
            Feature::Bar => "bar",
            Feature::Hist => "hist",
            Feature::Boxplot => "boxplot",
            Feature::BoxScatter => "box_scatter",
            Feature::Legend => "legend",
            Feature::LegendFont => "legend_font",
            Feature::Rectangle => "rectangle",
            Feature::Arrow => "arrow",
            Feature::SaveFig => "save_fig",
        }
    }
}

impl FromStr for Feature {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let want = s.trim().to_ascii_lowercase();
        Feature::ALL
            .into_iter()
            .find(|f| f.name() == want)
            .ok_or_else(|| PlotError::Config(format!("unknown feature '{s}'")))
    }
}

fn font() -> Defaults {
    ["family", "style", "weight", "size", "color", "alpha", "va", "ha", "rotation"]
        .into_iter()
        .fold(Defaults::new(), Defaults::auto)
}

fn autos(d: Defaults, keys: &[&str]) -> Defaults {
    keys.iter().fold(d, |d, k| d.auto(k))
}

fn registry() -> BTreeMap<Feature, Defaults> {
    let mut r = BTreeMap::new();
    r.insert(Feature::TitleFont, font());
    r.insert(Feature::XLabelFont, font());
    r.insert(Feature::YLabelFont, font());
    r.insert(Feature::XTickFont, font());
    r.insert(Feature::YTickFont, font());
    r.insert(Feature::TextFont, font());
    r.insert(Feature::Grid, autos(Defaults::new(), &["alpha", "color", "ls", "lw"]));

    let tick_common = ["direction", "length", "width", "color", "pad", "labelsize", "labelcolor", "maxticks"];
    r.insert(
        Feature::XTickParams,
        autos(autos(Defaults::new(), &tick_common), &["labeltop", "labelbottom", "top", "bottom"]),
    );
    r.insert(
        Feature::YTickParams,
        autos(autos(Defaults::new(), &tick_common), &["labelleft", "labelright", "left", "right"]),
    );
    let fmt = Defaults::new().value("style", "plain").value("sci_min", 0).value("sci_max", 0).auto("useoffset");
    r.insert(Feature::XTickFormat, fmt.clone());
    r.insert(Feature::YTickFormat, fmt);
    r.insert(Feature::AxLine, autos(Defaults::new(), &["min", "max", "alpha", "ls", "lw", "color"]));

    r.insert(
        Feature::Line,
        autos(
            Defaults::new().value("label", "_nolegend_").value("increment", true),
            &["color", "lw", "ls", "marker", "mec", "ms", "markevery", "mfc", "ecolor", "elinewidth", "capsize", "alpha"],
        )
        .value("spline", false)
        .value("sp_order", 3)
        .value("sp_smooth", 0)
        .value("sp_points", 1000),
    );
    r.insert(
        Feature::Bar,
        autos(
            Defaults::new().value("label", "_nolegend_").value("increment", true).value("align", "center"),
            &["color", "lw", "ls", "ecolor", "elinewidth", "capsize", "edgecolor", "width", "fill", "hatch", "facecolor", "bottom", "log"],
        ),
    );
    r.insert(
        Feature::Hist,
        autos(
            Defaults::new().value("label", "_nolegend_").value("increment", true),
            &["color", "bins", "min", "max", "density", "cumulative", "histtype", "align", "orientation", "log", "stacked", "alpha", "edgecolor", "facecolor", "fill", "hatch", "ls", "lw"],
        ),
    );
    r.insert(
        Feature::Boxplot,
        autos(
            Defaults::new().value("label", "_nolegend_").value("increment", true),
            &["vert", "whis", "loc", "width", "box_fill_color", "meanline", "showmean", "showcap", "showbox", "showfliers", "boxprops", "flierprops", "medianprops", "meanprops", "capprops", "whiskerprops", "manage_xticks"],
        ),
    );
    r.insert(
        Feature::BoxScatter,
        Defaults::new().value("color", "black").value("marker", "o").value("alpha", 0.6).value("s", 12).auto("edgecolors"),
    );
    r.insert(
        Feature::Legend,
        Defaults::new()
            .value("loc", "upper right")
            .value("numpoints", 1)
            .value("markerscale", 1)
            .value("frameon", true)
            .value("fancybox", false)
            .value("shadow", false)
            .value("framealpha", 1.0)
            .value("ncol", 1)
            .value("title", Value::None)
            .value("fontsize", "medium")
            .value("borderpad", 0.1)
            .value("labelspacing", 0.1)
            .value("handletextpad", 0.25)
            .value("columnspacing", 0.1),
    );
    r.insert(
        Feature::LegendFont,
        Defaults::new().value("family", "sans-serif").value("style", "normal").value("weight", "normal").value("size", "medium"),
    );
    r.insert(
        Feature::Rectangle,
        autos(Defaults::new().value("increment", true), &["color", "ec", "fc", "fill", "hatch", "ls", "lw", "alpha"]),
    );
    r.insert(
        Feature::Arrow,
        autos(
            Defaults::new(),
            &["width", "length_includes_head", "head_width", "head_length", "shape", "overhang", "alpha", "ec", "fc", "fill", "hatch", "ls", "lw"],
        ),
    );
    r.insert(
        Feature::SaveFig,
        Defaults::new().value("dpi", 100).value("transparent", false).value("width", 8).value("height", 6),
    );
    r
}

/// Cycled style lists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Palettes {
    pub colors: Vec<Value>,
    pub markers: Vec<Value>,
    pub marker_fills: Vec<Value>,
    pub hatches: Vec<Value>,
    pub hatch_fills: Vec<Value>,
}

impl Default for Palettes {
    fn default() -> Self {
        let text = |items: &[&str]| items.iter().map(|s| Value::from(*s)).collect::<Vec<_>>();
        let mut markers = vec![Value::None];
        markers.extend(text(&["s", "o", "^", "D"]));
        let mut hatches = vec![Value::None];
        hatches.extend(text(&["/", "\\", "|", "-", "+", "x", "o", "O", ".", "*"]));
        Self {
            colors: text(&["black", "red", "blue", "fuchsia", "orange", "lime", "aqua", "maroon", "0.40", "0.85"]),
            markers,
            marker_fills: vec![Value::None, Value::from("white")],
            hatches,
            hatch_fills: vec![Value::Bool(false), Value::Bool(true)],
        }
    }
}

/// Figure-fraction rectangles `[left, bottom, width, height]` for the named layer locations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationTable {
    pub normal: BTreeMap<Corner, [f64; 4]>,
    pub tight: BTreeMap<Corner, [f64; 4]>,
}

impl LocationTable {
    pub fn rect(&self, corner: Corner, tight: bool) -> [f64; 4] {
        let table = if tight { &self.tight } else { &self.normal };
        table.get(&corner).copied().unwrap_or_else(|| Self::default().normal[&corner])
    }
}

impl Default for LocationTable {
    fn default() -> Self {
        let normal = BTreeMap::from([
            (Corner::UpperLeft, [0.22, 0.595, 0.25, 0.25]),
            (Corner::UpperRight, [0.63, 0.595, 0.25, 0.25]),
            (Corner::LowerRight, [0.63, 0.180, 0.25, 0.25]),
            (Corner::LowerLeft, [0.22, 0.180, 0.25, 0.25]),
        ]);
        let tight = BTreeMap::from([
            (Corner::UpperLeft, [0.18, 0.595, 0.25, 0.25]),
            (Corner::UpperRight, [0.70, 0.595, 0.25, 0.25]),
            (Corner::LowerRight, [0.70, 0.195, 0.25, 0.25]),
            (Corner::LowerLeft, [0.18, 0.195, 0.25, 0.25]),
        ]);
        Self { normal, tight }
    }
}

/// Figure-wide settings a new `Plot` starts from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotSettings {
    pub tight_layout: bool,
    pub xkcd: bool,
    pub x_label_sep_l: String,
    pub x_label_sep_r: String,
    pub y_label_sep_l: String,
    pub y_label_sep_r: String,
    pub color_map: String,
    pub style: Option<String>,
    pub jitter_seed: u64,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            tight_layout: false,
            xkcd: false,
            x_label_sep_l: " , ".to_string(),
            x_label_sep_r: String::new(),
            y_label_sep_l: " , ".to_string(),
            y_label_sep_r: String::new(),
            color_map: "gist_rainbow".to_string(),
            style: None,
            jitter_seed: 0x6b61_706c_6f74,
        }
    }
}

/// Named palette overlays shipped with the library.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    Greyscale,
    BlackAndWhite,
    Markers,
}

impl FromStr for Preset {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "greyscale" | "grayscale" => Ok(Preset::Greyscale),
            "blackandwhite" | "bw" => Ok(Preset::BlackAndWhite),
            "markers" => Ok(Preset::Markers),
            _ => Err(PlotError::UnknownPreset(s.to_string())),
        }
    }
}

/// Immutable configuration handed to a `Plot` at construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub features: BTreeMap<Feature, Defaults>,
    pub palettes: Palettes,
    pub locations: LocationTable,
    pub plot: PlotSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            features: registry(),
            palettes: Palettes::default(),
            locations: LocationTable::default(),
            plot: PlotSettings::default(),
        }
    }
}

/// Environment variable naming a JSON user-defaults file.
pub const DEFAULTS_ENV: &str = "KAPLOT_DEFAULTS";

impl Config {
    pub fn defaults(&self, feature: Feature) -> &Defaults {
        self.features.get(&feature).unwrap_or(&EMPTY)
    }

    pub fn with_preset(mut self, preset: Preset) -> Self {
        match preset {
            Preset::Greyscale => self.palettes.colors = vec!["black".into(), "0.40".into()],
            Preset::BlackAndWhite => self.palettes.colors = vec!["black".into()],
            Preset::Markers => {
                self.palettes.markers = ["s", "o", "^", "D"].into_iter().map(Value::from).collect()
            }
        }
        self
    }

    /// Apply presets by name, in order.
    pub fn with_presets(self, names: &[&str]) -> PlotResult<Self> {
        names.iter().try_fold(self, |cfg, name| Ok(cfg.with_preset(name.parse()?)))
    }

    /// Overlay a JSON user-defaults document. Feature tables merge key by key,
    /// palettes and location tables are replaced wholesale.
    ///
    /// ```json
    /// { "features": { "line": { "lw": 2 } }, "colors": ["black", "red"], "plot": { "tight_layout": true } }
    /// ```
    pub fn overlay_json(mut self, text: &str) -> PlotResult<Self> {
        let doc: serde_json::Value = serde_json::from_str(text)?;
        let obj = doc
            .as_object()
            .ok_or_else(|| PlotError::Config("user defaults must be a JSON object".into()))?;

        for (key, val) in obj {
            match key.as_str() {
                "features" => {
                    let tables = val
                        .as_object()
                        .ok_or_else(|| PlotError::Config("'features' must be an object".into()))?;
                    for (name, table) in tables {
                        let feature: Feature = name.parse()?;
                        let entries = table
                            .as_object()
                            .ok_or_else(|| PlotError::Config(format!("feature '{name}' must be an object")))?;
                        let defaults = self.features.entry(feature).or_default();
                        for (opt, v) in entries {
                            defaults.set(opt, Setting::Value(Value::from_json(v)));
                        }
                    }
                }
                "colors" => self.palettes.colors = json_list(key, val)?,
                "markers" => self.palettes.markers = json_list(key, val)?,
                "marker_fills" => self.palettes.marker_fills = json_list(key, val)?,
                "hatches" => self.palettes.hatches = json_list(key, val)?,
                "hatch_fills" => self.palettes.hatch_fills = json_list(key, val)?,
                "locations" => self.locations = serde_json::from_value(val.clone())?,
                "plot" => {
                    let mut merged = serde_json::to_value(&self.plot)?;
                    if let (Some(dst), Some(src)) = (merged.as_object_mut(), val.as_object()) {
                        for (k, v) in src {
                            dst.insert(k.clone(), v.clone());
                        }
                    }
                    self.plot = serde_json::from_value(merged)?;
                }
                "presets" => {
                    let names = json_list(key, val)?;
                    for n in names {
                        let name = n.as_str().ok_or_else(|| PlotError::Config("preset names must be strings".into()))?;
                        self = self.with_preset(name.parse()?);
                    }
                }
                other => log::warn!("kaplot: ignoring unknown user-defaults key '{other}'"),
            }
        }
        Ok(self)
    }

    pub fn load_user_defaults(self, path: impl AsRef<Path>) -> PlotResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        log::debug!("kaplot: loading user defaults from {}", path.as_ref().display());
        self.overlay_json(&text)
    }

    /// Default configuration, overlaid with the file named by `KAPLOT_DEFAULTS` when set.
    pub fn from_env() -> PlotResult<Self> {
        match std::env::var_os(DEFAULTS_ENV) {
            Some(path) => Config::default().load_user_defaults(path),
            None => Ok(Config::default()),
        }
    }
}

fn json_list(key: &str, val: &serde_json::Value) -> PlotResult<Vec<Value>> {
    let items = val
        .as_array()
        .ok_or_else(|| PlotError::Config(format!("'{key}' must be a list")))?;
    if items.is_empty() {
        return Err(PlotError::Config(format!("'{key}' must not be empty")));
    }
    Ok(items.iter().map(Value::from_json).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_covers_every_feature() {
        let cfg = Config::default();
        for f in Feature::ALL {
            assert!(!cfg.defaults(f).is_empty(), "{f:?} has no defaults");
            assert_eq!(f.name().parse::<Feature>().unwrap(), f);
        }
    }

    #[test]
    fn default_palette_sizes() {
        let p = Palettes::default();
        assert_eq!(p.colors.len(), 10);
        assert_eq!(p.markers.len(), 5);
        assert_eq!(p.marker_fills.len(), 2);
        assert_eq!(p.hatches.len(), 11);
        assert_eq!(p.hatch_fills.len(), 2);
    }

    #[test]
    fn presets_replace_lists() {
        let cfg = Config::default().with_presets(&["grayscale", "markers"]).unwrap();
        assert_eq!(cfg.palettes.colors, vec![Value::from("black"), Value::from("0.40")]);
        assert_eq!(cfg.palettes.markers.len(), 4);
        assert!(Config::default().with_presets(&["sepia"]).is_err());
    }

    #[test]
    fn json_overlay_merges_feature_tables() {
        let cfg = Config::default()
            .overlay_json(r#"{ "features": { "line": { "LW": 2.5 } }, "colors": ["navy"], "plot": { "tight_layout": true } }"#)
            .unwrap();
        assert_eq!(cfg.defaults(Feature::Line).get("lw"), Some(&Setting::Value(Value::Float(2.5))));
        // untouched keys keep their defaults
        assert_eq!(cfg.defaults(Feature::Line).get("sp_points"), Some(&Setting::Value(Value::Int(1000))));
        assert_eq!(cfg.palettes.colors, vec![Value::from("navy")]);
        assert!(cfg.plot.tight_layout);
        assert_eq!(cfg.plot.color_map, "gist_rainbow");
    }

    #[test]
    fn json_overlay_rejects_bad_shapes() {
        assert!(Config::default().overlay_json("[1, 2]").is_err());
        assert!(Config::default().overlay_json(r#"{ "colors": [] }"#).is_err());
        assert!(Config::default().overlay_json(r#"{ "features": { "nope": {} } }"#).is_err());
    }
}
