//! End-to-end pipeline tests: model source to exported figure

mod common;

use common::fixtures::{load_model_fixture, model_with_variables, quiet_config, three_case_model, two_class_model};
use implore_mixture::{
    plot_density, ExportConfig, Geometry, LinePattern, MixtureError, ModelCollection, PlotConfig,
    RenderMode,
};
use rstest::rstest;

#[test]
fn test_three_case_scenario_renders_every_class() {
    let plot = plot_density(&three_case_model(), &quiet_config()).unwrap();

    assert_eq!(plot.panels.len(), 1);
    assert_eq!(plot.legend_labels(), vec!["Total", "A", "B"]);

    let layers = &plot.panels[0].layers;
    assert_eq!(layers.len(), 3);
    assert_eq!(layers.last().map(|l| l.label.as_str()), Some("Total"));
    assert!(layers
        .iter()
        .all(|l| matches!(&l.geometry, Geometry::Area { points } if !points.is_empty())));
}

#[test]
fn test_nonexistent_variable_aborts() {
    let config = quiet_config().with_variables(["nonexistent"]);
    let err = plot_density(&model_with_variables("m", &["x1", "x2"]), &config).unwrap_err();
    assert!(matches!(err, MixtureError::NoVariables { .. }));
}

#[test]
fn test_empty_collection_has_nothing_to_plot() {
    let err = plot_density(&ModelCollection::new(), &quiet_config()).unwrap_err();
    assert!(matches!(err, MixtureError::NoVariables { .. }));
}

#[test]
fn test_collection_facets_rows_by_title() {
    let collection = ModelCollection::new()
        .with("lpa_2", load_model_fixture("lpa_2class"))
        .with("lpa_3", load_model_fixture("lpa_3class"));
    let config = quiet_config().with_facet_label("LPA 3", "Three profiles");
    let plot = plot_density(&collection, &config).unwrap();

    assert_eq!(plot.grid.rows(), 2);
    assert_eq!(plot.grid.cols(), 2);
    assert!(plot.grid.show_row_strips && plot.grid.show_col_strips);
    assert_eq!(plot.grid.row_labels, vec!["lpa 2", "Three profiles"]);
    assert_eq!(plot.grid.col_labels, vec!["x2", "x3"]);

    // Union of class levels, Total first
    assert_eq!(
        plot.legend_labels(),
        vec!["Total", "class1", "class2", "class3"]
    );
    // The two-class model never draws class3
    let first_row = plot.panel(0, 0).unwrap();
    assert!(first_row.layers.iter().all(|l| l.label != "class3"));
}

#[test]
fn test_conditional_mode_stacks_to_one() {
    let plot = plot_density(&two_class_model(50), &quiet_config().conditional()).unwrap();

    assert_eq!(plot.mode, RenderMode::Conditional);
    assert_eq!(plot.legend_labels(), vec!["A", "B"]);

    let layers = &plot.panels[0].layers;
    let (x, top) = match &layers[layers.len() - 1].geometry {
        Geometry::Band { x, upper, .. } => (x.clone(), upper.clone()),
        other => panic!("expected a band, got {:?}", other),
    };
    for i in [0, 100, 255, 400, x.len() - 1] {
        let stacked: f64 = layers
            .iter()
            .map(|l| match &l.geometry {
                Geometry::Band { lower, upper, .. } => upper[i] - lower[i],
                _ => 0.0,
            })
            .sum();
        assert!((stacked - 1.0).abs() < 1e-9);
        assert_eq!(top[i], 1.0);
    }
}

#[rstest]
#[case(false, false)]
#[case(true, false)]
#[case(false, true)]
#[case(true, true)]
fn test_svg_export(#[case] black_and_white: bool, #[case] conditional: bool) {
    let config = PlotConfig {
        black_and_white,
        conditional,
        ..quiet_config()
    };
    let plot = plot_density(&load_model_fixture("lpa_2class"), &config).unwrap();
    let svg = plot.to_svg(&ExportConfig::svg(640, 480)).unwrap();

    assert!(svg.contains("<svg"));
    assert!(svg.contains("x1"));
    assert!(svg.contains("Total") != conditional);
}

#[test]
fn test_black_and_white_patterns() {
    let plot = plot_density(&load_model_fixture("lpa_3class"), &quiet_config().black_and_white())
        .unwrap();

    let patterns: Vec<LinePattern> = plot.legend.iter().map(|e| e.style.pattern).collect();
    assert_eq!(patterns[0], LinePattern::Solid);
    for (i, a) in patterns.iter().enumerate().skip(1) {
        assert_ne!(*a, LinePattern::Solid);
        assert!(patterns[i + 1..].iter().all(|b| b != a));
    }
}

#[test]
fn test_save_svg_and_json() {
    let dir = tempfile::tempdir().unwrap();
    let plot = plot_density(&load_model_fixture("lpa_2class"), &quiet_config()).unwrap();

    let svg_path = dir.path().join("density.svg");
    plot.save_svg(&svg_path, &ExportConfig::default().with_caption("Two profiles"))
        .unwrap();
    let svg = std::fs::read_to_string(&svg_path).unwrap();
    assert!(svg.contains("Two profiles"));

    let json = plot.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["mode"], "classic");
    assert_eq!(value["panels"].as_array().map(Vec::len), Some(3));
}

#[test]
fn test_config_file_drives_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plot.toml");
    std::fs::write(
        &path,
        "display = false\nvariables = [\"x2\"]\nalpha = 0.5\n\n[facet_labels]\nx2 = \"Score\"\n",
    )
    .unwrap();

    let config = PlotConfig::load(&path).unwrap();
    let plot = plot_density(&load_model_fixture("lpa_2class"), &config).unwrap();

    assert_eq!(plot.grid.col_labels, vec!["Score"]);
    let fill = plot.panels[0].layers[0].style.fill.unwrap();
    assert_eq!(fill.a, 0.5);
}
