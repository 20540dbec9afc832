// File: crates/kaplot-core/tests/pipeline.rs
// Purpose: End-to-end render scenarios against the recording backend.

use kaplot_core::{
    AxesPlacement, Axis, Call, Plot, PlotError, RecordingBackend, RenderState, Series, StyleMap,
};

fn rendered(plot: &mut Plot) -> RecordingBackend {
    let mut rec = RecordingBackend::new();
    plot.render(&mut rec).expect("render");
    rec
}

#[test]
fn box_scatter_drops_outliers_and_jitters() {
    let mut plot = Plot::new();
    plot.set_jitter_seed(11);
    plot.layer("main")
        .unwrap()
        .set_plot_type("boxscatter")
        .add_plotdata(Series::samples(vec![1.0, 2.0, 3.0, 4.0, 100.0]));
    let rec = rendered(&mut plot);

    let Some(Call::Scatter { x, y, opts, .. }) = rec.find("scatter").next() else { panic!("no scatter") };
    assert_eq!(y, &vec![1.0, 2.0, 3.0, 4.0]);
    assert!(x.iter().all(|p| (p - 1.0).abs() <= 0.04 + 1e-12), "jitter within 0.04 of position 1: {x:?}");
    assert_eq!(opts.get_str("color"), Some("black"));
    assert_eq!(opts.get_f64("s"), Some(12.0));
    assert!(!opts.contains("edgecolors"));

    // boxplot comes first and still holds the outlier
    let names = rec.names();
    let bp = names.iter().position(|n| *n == "boxplot").unwrap();
    let sc = names.iter().position(|n| *n == "scatter").unwrap();
    assert!(bp < sc);
    let Some(Call::Boxplot { datasets, .. }) = rec.find("boxplot").next() else { unreachable!() };
    assert_eq!(datasets[0].len(), 5);
}

#[test]
fn jitter_is_reproducible_per_seed() {
    let build = |seed| {
        let mut plot = Plot::new();
        plot.set_jitter_seed(seed);
        plot.layer("main").unwrap().set_plot_type("boxscatter").add_plotdata(Series::samples((0..30).map(f64::from).collect()));
        rendered(&mut plot).calls
    };
    assert_eq!(build(1), build(1));
    assert_ne!(build(1), build(2));
}

#[test]
fn twin_x_layer_shares_x_range() {
    let mut plot = Plot::new();
    plot.layer("main").unwrap().add_plotdata(Series::new(vec![0.0, 10.0], vec![0.0, 1.0]));
    plot.add_twin_layer("Right", Axis::X, "MAIN")
        .unwrap()
        .set_ylabel("Rate", Some("Hz"), &StyleMap::new())
        .add_plotdata(Series::new(vec![0.0, 20.0], vec![100.0, 200.0]));
    let rec = rendered(&mut plot);

    let placements: Vec<&AxesPlacement> = rec
        .find("create_axes")
        .map(|c| match c {
            Call::CreateAxes { placement, .. } => placement,
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(placements, vec![&AxesPlacement::Default, &AxesPlacement::Twin { of: 0, share: Axis::X }]);

    let (main, twin) = (rec.registry().view(0), rec.registry().view(1));
    assert_eq!(main.x, twin.x, "x shared");
    assert_ne!(main.y, twin.y, "y independent");
    assert!(twin.x.vmax >= 20.0);

    let labels: Vec<&str> = rec
        .find("set_label")
        .filter_map(|c| match c {
            Call::SetLabel { ax: 1, text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(labels, vec!["Rate , Hz"]);
}

#[test]
fn main_layer_cannot_be_added_again() {
    let mut plot = Plot::new();
    plot.layer("main").unwrap().add_plotdata(Series::new(vec![0.0], vec![1.0])).add_text("t", 0.0, 0.0, &StyleMap::new());
    let before = plot.get("main").unwrap().clone();
    assert!(matches!(plot.add_layer("main"), Err(PlotError::DuplicateLayer(_))));
    assert!(matches!(plot.add_layer(" Main "), Err(PlotError::DuplicateLayer(_))));
    assert_eq!(plot.layers().len(), 1);
    assert_eq!(plot.get("main").unwrap(), &before);
}

#[test]
fn twin_of_missing_layer_is_rejected() {
    let mut plot = Plot::new();
    assert!(matches!(plot.add_twin_layer("t", Axis::Y, "ghost"), Err(PlotError::UnknownLayer(_))));
    assert!(plot.get("t").is_none());
}

#[test]
fn rendering_twice_repeats_the_same_calls() {
    let mut plot = Plot::new();
    plot.layer("main")
        .unwrap()
        .set_plot_type("bar")
        .add_plotdata(Series::new(vec![1.0, 2.0], vec![3.0, 4.0]).with("label", "a"))
        .add_axhline(2.0, &StyleMap::new().with("min", 0.1))
        .set_legend(true, &StyleMap::new());
    let first = rendered(&mut plot).calls;
    let second = rendered(&mut plot).calls;
    assert_eq!(first, second);
    assert_eq!(plot.state(), RenderState::Rendered);
}

#[test]
fn json_round_trip_renders_identically() {
    let mut plot = Plot::new();
    plot.set_tight(true).set_jitter_seed(5);
    plot.layer("main")
        .unwrap()
        .set_title("T", &StyleMap::new().with("size", 14))
        .set_axes_type("semilog-y")
        .add_plotdata(Series::new(vec![1.0, 2.0, 3.0], vec![1.0, 10.0, 100.0]).with_yerr(vec![0.1, 1.0, 10.0]));
    plot.add_layer_at("inset", kaplot_core::Corner::LowerRight)
        .unwrap()
        .set_plot_type("boxscatter")
        .add_plotdata(Series::samples(vec![1.0, 2.0, 2.0, 3.0]))
        .add_rectangle((0.0, 1.0), (1.0, 0.0), &StyleMap::new());

    let json = plot.to_json().unwrap();
    let mut back = Plot::from_json(&json).unwrap();
    assert_eq!(back.state(), RenderState::Unrendered);
    assert_eq!(rendered(&mut plot).calls, rendered(&mut back).calls);
}

#[test]
fn unknown_twin_reference_stops_rendering_at_that_layer() {
    let mut plot = Plot::new();
    plot.add_twin_layer("t", Axis::X, "main").unwrap();
    // hand-edited state file pointing at a layer that is gone
    let mut doc: serde_json::Value = serde_json::from_str(&plot.to_json().unwrap()).unwrap();
    doc["layers"][1]["twin"]["of"] = serde_json::Value::from("ghost");
    let mut broken = Plot::from_json(&doc.to_string()).unwrap();

    let mut rec = RecordingBackend::new();
    let err = broken.render(&mut rec).unwrap_err();
    assert!(matches!(err, PlotError::UnknownLayer(ref n) if n == "ghost"));
    assert_eq!(broken.state(), RenderState::Rendering(1));
    assert_eq!(rec.axes_count(), 1);
}

#[test]
fn save_figure_applies_tight_layout_then_exports() {
    let mut plot = Plot::new();
    plot.set_tight(true);
    let mut rec = rendered(&mut plot);
    plot.save_figure(&mut rec, "out/fig.png", &StyleMap::new().with("dpi", 300)).unwrap();
    let tail: Vec<&Call> = rec.calls.iter().rev().take(2).collect();
    match (tail[1], tail[0]) {
        (Call::TightLayout { pad }, Call::Export { opts, path }) => {
            assert_eq!(*pad, 0.75);
            assert_eq!(opts.dpi, 300.0);
            assert_eq!(opts.width, 8.0);
            assert_eq!(path, &std::path::PathBuf::from("out/fig.png"));
        }
        other => panic!("unexpected tail {other:?}"),
    }
}

#[test]
fn invalid_editor_calls_leave_layer_untouched() {
    let mut plot = Plot::new();
    let before = plot.get("main").unwrap().clone();
    plot.layer("main")
        .unwrap()
        .set_plot_type("pie")
        .set_axes_type("polar")
        .set_base(0, "ten")
        .set_tick_params("z", &StyleMap::new().with("length", 3));
    assert_eq!(plot.get("main").unwrap(), &before);
    assert!(matches!(plot.layer("nope"), Err(PlotError::UnknownLayer(_))));
}
