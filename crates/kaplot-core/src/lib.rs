// File: crates/kaplot-core/src/lib.rs
// Summary: Core library entry point; exports the plot description API, defaults, the
//          backend seam and the recording backend used by tests.

pub mod backend;
pub mod color;
pub mod colormap;
pub mod cycle;
pub mod defaults;
pub mod error;
pub mod layer;
pub mod normalize;
pub mod plot;
pub mod range;
pub mod record;
pub mod render;
pub mod scale;
pub mod series;
pub mod settings;
pub mod spline;
pub mod stats;
pub mod value;
pub mod view;

pub use backend::{Backend, SaveOptions, Spine};
pub use colormap::ColorMap;
pub use defaults::{Config, Defaults, Feature, Palettes, PlotSettings, Preset, Setting, DEFAULTS_ENV};
pub use error::{PlotError, PlotResult};
pub use layer::{AxesType, Axis, Corner, Layer, LayerName, Location, PlotType};
pub use plot::{LayerEditor, Plot};
pub use range::{srange, TickSpec, Ticks};
pub use record::{Call, RecordingBackend};
pub use render::RenderState;
pub use scale::{AxisScale, Scale};
pub use series::Series;
pub use settings::resolve;
pub use value::{Number, StyleMap, Value};
pub use view::{AxesId, AxesPlacement, AxesRegistry, AxesView};
