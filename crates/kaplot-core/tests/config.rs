// File: crates/kaplot-core/tests/config.rs
// Purpose: User-defaults overlays loaded from JSON files and named presets.

use std::io::Write;

use kaplot_core::{Call, Config, Feature, Plot, PlotError, RecordingBackend, Series, Setting, StyleMap, Value};

fn write_tmp(text: &str) -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().expect("tmp file");
    f.write_all(text.as_bytes()).expect("write tmp");
    f
}

#[test]
fn user_defaults_reach_the_backend() {
    let f = write_tmp(r#"{
        "features": { "line": { "lw": 3, "ls": "--" } },
        "colors": ["green", "purple"],
        "plot": { "tight_layout": true }
    }"#);
    let config = Config::default().load_user_defaults(f.path()).unwrap();
    assert_eq!(config.defaults(Feature::Line).get("lw"), Some(&Setting::Value(Value::Int(3))));
    assert!(config.plot.tight_layout);

    let mut plot = Plot::with_config(config);
    plot.layer("main")
        .unwrap()
        .add_plotdata(Series::new(vec![0.0, 1.0], vec![0.0, 1.0]))
        .add_plotdata(Series::new(vec![0.0, 1.0], vec![1.0, 0.0]).with("lw", 1));
    let mut rec = RecordingBackend::new();
    plot.render(&mut rec).unwrap();

    let lines: Vec<&StyleMap> = rec
        .find("errorbar")
        .map(|c| match c {
            Call::Errorbar { opts, .. } => opts,
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(lines[0].get_f64("lw"), Some(3.0));
    assert_eq!(lines[0].get_str("color"), Some("green"));
    assert_eq!(lines[1].get_f64("lw"), Some(1.0));
    assert_eq!(lines[1].get_str("color"), Some("purple"));
    assert_eq!(lines[1].get_str("ls"), Some("--"));
}

#[test]
fn unknown_feature_is_an_error() {
    let f = write_tmp(r#"{ "features": { "pie": { "lw": 1 } } }"#);
    assert!(matches!(Config::default().load_user_defaults(f.path()), Err(PlotError::Config(_))));
}

#[test]
fn malformed_json_is_an_error() {
    let f = write_tmp("{ not json");
    assert!(matches!(Config::default().load_user_defaults(f.path()), Err(PlotError::Serde(_))));
    assert!(matches!(Config::default().load_user_defaults("/definitely/missing.json"), Err(PlotError::Io(_))));
}

#[test]
fn presets_replace_palettes() {
    let c = Config::default().with_presets(&["greyscale", "markers"]).unwrap();
    assert_eq!(c.palettes.colors, vec![Value::from("black"), Value::from("0.40")]);
    assert!(c.palettes.markers.iter().all(|m| !m.is_none()));
    assert!(matches!(Config::default().with_presets(&["sepia"]), Err(PlotError::UnknownPreset(_))));
}

#[test]
fn plot_state_survives_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plot.json");
    let mut plot = Plot::new();
    plot.layer("main").unwrap().set_title("saved", &StyleMap::new()).add_text("hi", 1.0, 2.0, &StyleMap::new());
    plot.save_state(&path).unwrap();
    let back = Plot::load_state(&path).unwrap();
    assert_eq!(back.layers(), plot.layers());
    assert_eq!(back.config(), plot.config());
}

#[test]
fn gaps_in_data_survive_a_state_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gaps.json");
    let mut plot = Plot::new();
    plot.layer("main")
        .unwrap()
        .add_plotdata(Series::new(vec![0.0, 1.0, 2.0], vec![1.0, f64::NAN, 3.0]).with_yerr(vec![0.1, f64::INFINITY, 0.1]));
    let mut before = RecordingBackend::new();
    plot.render(&mut before).unwrap();
    plot.save_state(&path).unwrap();

    let mut back = Plot::load_state(&path).unwrap();
    let series = &back.layers()[0].series[0];
    assert!(series.y[1].is_nan());
    assert_eq!(series.yerr.as_ref().map(|e| e[1]), Some(f64::INFINITY));

    let mut after = RecordingBackend::new();
    back.render(&mut after).unwrap();
    // NaN != NaN, so compare the debug form
    assert_eq!(format!("{:?}", after.calls), format!("{:?}", before.calls));
}
