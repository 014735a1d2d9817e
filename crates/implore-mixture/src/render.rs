//! Renderer: long table + densities to a faceted chart
//!
//! Classic mode overlays one area per class with the Total curve on top.
//! Conditional mode stacks kernel-smoothed class shares into bands that
//! fill [0, 1]. Colours come from [`get_palette`]; black stays reserved
//! for Total.

use crate::chart::{
    DensityPlot, Geometry, Layer, LayerStyle, LegendEntry, Panel, PlotStyle, RenderMode,
};
use crate::config::PlotConfig;
use crate::density::{compute_conditional_with, compute_densities_with, ConditionalSet, DensitySet};
use crate::error::{MixtureError, MixtureResult};
use crate::facet::FacetGrid;
use crate::palette::{get_palette, Color, LinePattern};
use crate::reshape::LongTable;

/// Headroom above the tallest curve
const Y_PADDING: f64 = 1.05;

/// Estimate densities and compose the chart for the configured mode
pub fn render(table: &LongTable, config: &PlotConfig) -> MixtureResult<DensityPlot> {
    match config.mode() {
        RenderMode::Classic => {
            let densities = compute_densities_with(table, &config.density);
            render_classic(table, &densities, config)
        }
        RenderMode::Conditional => {
            let shares = compute_conditional_with(table, &config.density);
            render_conditional(table, &shares, config)
        }
    }
}

/// Style of class level `class` (0 = Total)
pub fn layer_style(class: usize, style: PlotStyle, palette: &[Color], alpha: f32) -> LayerStyle {
    if class == 0 {
        return LayerStyle::total();
    }
    let i = class - 1;
    match style {
        PlotStyle::Color => {
            let color = palette.get(i).copied().unwrap_or(Color::rgb(0.5, 0.5, 0.5));
            LayerStyle {
                stroke: color,
                fill: Some(color.with_alpha(alpha)),
                pattern: LinePattern::Solid,
            }
        }
        PlotStyle::BlackAndWhite => LayerStyle {
            stroke: Color::BLACK,
            fill: None,
            pattern: LinePattern::for_class(i),
        },
    }
}

/// Overlaid weighted densities
pub fn render_classic(
    table: &LongTable,
    densities: &DensitySet,
    config: &PlotConfig,
) -> MixtureResult<DensityPlot> {
    let grid = FacetGrid::new(table, &config.facet_labels);
    let palette = get_palette(table.latent_class_count());
    let style = config.style();
    let alpha = config.effective_alpha();

    let mut panels = empty_panels(&grid);
    let mut drawn = vec![false; table.classes().len()];

    for curve in &densities.curves {
        drawn[curve.class] = true;
        panels[curve.title * grid.cols() + curve.variable]
            .layers
            .push(Layer {
                class: curve.class,
                label: table.classes()[curve.class].label().to_string(),
                geometry: Geometry::Area {
                    points: curve.points.clone(),
                },
                style: layer_style(curve.class, style, &palette, alpha),
            });
    }

    // Classes in level order, Total drawn over them
    for panel in &mut panels {
        panel.layers.sort_by_key(|l| (l.class == 0, l.class));
    }

    let y_max = panels
        .iter()
        .flat_map(|p| p.layers.iter())
        .map(|l| l.geometry.max_y())
        .fold(0.0, f64::max);
    let y_range = (0.0, if y_max > 0.0 { y_max * Y_PADDING } else { 1.0 });

    finish(
        table,
        config,
        grid,
        panels,
        legend(table, &drawn, style, &palette, alpha),
        y_range,
        "density",
    )
}

/// Stacked class shares conditional on the observed value
pub fn render_conditional(
    table: &LongTable,
    shares: &ConditionalSet,
    config: &PlotConfig,
) -> MixtureResult<DensityPlot> {
    let grid = FacetGrid::new(table, &config.facet_labels);
    let palette = get_palette(table.latent_class_count());
    let style = config.style();
    let alpha = config.effective_alpha();

    let mut panels = empty_panels(&grid);
    let mut drawn = vec![false; table.classes().len()];

    for bands in &shares.bands {
        let n = bands.grid.len();
        let mut lower = vec![0.0; n];
        let last = bands.shares.len().saturating_sub(1);

        for (k, (class, share)) in bands.shares.iter().enumerate() {
            let upper: Vec<f64> = if k == last {
                vec![1.0; n]
            } else {
                lower.iter().zip(share).map(|(lo, s)| lo + s).collect()
            };

            drawn[*class] = true;
            panels[bands.title * grid.cols() + bands.variable]
                .layers
                .push(Layer {
                    class: *class,
                    label: table.classes()[*class].label().to_string(),
                    geometry: Geometry::Band {
                        x: bands.grid.clone(),
                        lower: lower.clone(),
                        upper: upper.clone(),
                    },
                    style: layer_style(*class, style, &palette, alpha),
                });
            lower = upper;
        }
    }

    finish(
        table,
        config,
        grid,
        panels,
        legend(table, &drawn, style, &palette, alpha),
        (0.0, 1.0),
        "probability",
    )
}

fn empty_panels(grid: &FacetGrid) -> Vec<Panel> {
    (0..grid.rows())
        .flat_map(|row| {
            (0..grid.cols()).map(move |col| Panel {
                row,
                col,
                layers: Vec::new(),
            })
        })
        .collect()
}

/// Total first, then drawn classes in level order
fn legend(
    table: &LongTable,
    drawn: &[bool],
    style: PlotStyle,
    palette: &[Color],
    alpha: f32,
) -> Vec<LegendEntry> {
    table
        .classes()
        .iter()
        .enumerate()
        .filter(|(class, _)| drawn[*class])
        .map(|(class, level)| LegendEntry {
            label: level.label().to_string(),
            style: layer_style(class, style, palette, alpha),
        })
        .collect()
}

fn finish(
    table: &LongTable,
    config: &PlotConfig,
    grid: FacetGrid,
    panels: Vec<Panel>,
    legend: Vec<LegendEntry>,
    y_range: (f64, f64),
    y_label: &str,
) -> MixtureResult<DensityPlot> {
    if panels.iter().all(|p| p.layers.is_empty()) {
        return Err(MixtureError::NoVariables {
            requested: config.variables.clone().unwrap_or_default(),
            available: table.variables().to_vec(),
        });
    }

    let x_ranges = (0..grid.cols())
        .map(|col| column_range(&panels, col))
        .collect();

    let plot = DensityPlot {
        mode: config.mode(),
        style: config.style(),
        grid,
        panels,
        legend,
        x_ranges,
        y_range,
        y_label: y_label.to_string(),
    };

    tracing::debug!(
        "Rendered {} layers in a {}x{} facet grid",
        plot.layer_count(),
        plot.grid.rows(),
        plot.grid.cols()
    );

    Ok(plot)
}

/// Shared x range of one facet column
fn column_range(panels: &[Panel], col: usize) -> (f64, f64) {
    let (lo, hi) = panels
        .iter()
        .filter(|p| p.col == col)
        .flat_map(|p| p.layers.iter())
        .filter_map(|l| l.geometry.x_range())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (a, b)| {
            (lo.min(a), hi.max(b))
        });

    if lo > hi {
        (0.0, 1.0)
    } else if lo == hi {
        (lo - 0.5, hi + 0.5)
    } else {
        (lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelResult;
    use crate::reshape::extract_long_table;
    use implore_io::DataTable;

    fn long_table() -> LongTable {
        let model = ModelResult::new(
            "m",
            DataTable::from_columns(vec![
                ("x1", vec![1.0, 2.0, 3.0, 4.0]),
                ("x2", vec![0.5, 0.1, 0.9, 0.3]),
            ])
            .unwrap(),
            DataTable::from_columns(vec![
                ("A", vec![0.9, 0.7, 0.2, 0.1]),
                ("B", vec![0.1, 0.3, 0.8, 0.9]),
            ])
            .unwrap(),
        )
        .unwrap();
        extract_long_table(&[model], None).unwrap()
    }

    fn config() -> PlotConfig {
        PlotConfig::new().without_display()
    }

    #[test]
    fn test_classic_layers_put_total_last() {
        let plot = render(&long_table(), &config()).unwrap();

        assert_eq!(plot.mode, RenderMode::Classic);
        assert_eq!(plot.panels.len(), 2);
        let classes: Vec<usize> = plot.panels[0].layers.iter().map(|l| l.class).collect();
        assert_eq!(classes, vec![1, 2, 0]);
        assert_eq!(plot.legend_labels(), vec!["Total", "A", "B"]);
    }

    #[test]
    fn test_color_style() {
        let plot = render(&long_table(), &config().with_alpha(0.4)).unwrap();
        let layers = &plot.panels[0].layers;

        let total = &layers[2].style;
        assert_eq!(total.stroke, Color::BLACK);
        assert!(total.fill.is_none());
        assert_eq!(total.pattern, LinePattern::Solid);

        let a = &layers[0].style;
        let fill = a.fill.unwrap();
        assert_eq!(fill.a, 0.4);
        assert_eq!(fill.to_hex(), a.stroke.to_hex());
        assert!(!a.stroke.is_black());
    }

    #[test]
    fn test_black_and_white_style() {
        let plot = render(&long_table(), &config().black_and_white()).unwrap();

        for layer in plot.layers() {
            assert!(layer.style.fill.is_none());
            assert_eq!(layer.style.stroke, Color::BLACK);
            if layer.class == 0 {
                assert_eq!(layer.style.pattern, LinePattern::Solid);
            } else {
                assert_ne!(layer.style.pattern, LinePattern::Solid);
            }
        }
        let layers = &plot.panels[0].layers;
        assert_ne!(layers[0].style.pattern, layers[1].style.pattern);
    }

    #[test]
    fn test_single_model_has_no_row_strips() {
        let plot = render(&long_table(), &config()).unwrap();
        assert!(!plot.grid.show_row_strips);
        assert!(plot.grid.show_col_strips);
        assert_eq!(plot.grid.strip(0, 1), Some("x2".to_string()));
    }

    #[test]
    fn test_facet_label_override() {
        let plot = render(&long_table(), &config().with_facet_label("X2", "Depression")).unwrap();
        assert_eq!(plot.grid.col_labels, vec!["x1", "Depression"]);
    }

    #[test]
    fn test_conditional_bands_stack_to_one() {
        let plot = render(&long_table(), &config().conditional()).unwrap();

        assert_eq!(plot.mode, RenderMode::Conditional);
        assert_eq!(plot.y_range, (0.0, 1.0));
        assert_eq!(plot.legend_labels(), vec!["A", "B"]);

        let layers = &plot.panels[0].layers;
        assert_eq!(layers.len(), 2);
        match (&layers[0].geometry, &layers[1].geometry) {
            (
                Geometry::Band { lower: l0, upper: u0, .. },
                Geometry::Band { lower: l1, upper: u1, .. },
            ) => {
                assert!(l0.iter().all(|v| *v == 0.0));
                assert_eq!(u0, l1);
                assert!(u1.iter().all(|v| *v == 1.0));
            }
            _ => panic!("expected bands"),
        }
    }

    #[test]
    fn test_x_range_is_shared_per_column() {
        let plot = render(&long_table(), &config()).unwrap();
        let (lo, hi) = plot.x_ranges[0];
        assert!(lo < 1.0 && hi > 4.0);
        assert!(plot.y_range.1 > 0.0);
    }

    #[test]
    fn test_nothing_plottable_is_no_variables() {
        let model = ModelResult::new(
            "m",
            DataTable::from_columns(vec![("x", vec![5.0, 5.0])]).unwrap(),
            DataTable::from_columns(vec![("A", vec![1.0, 1.0])]).unwrap(),
        )
        .unwrap();
        let table = extract_long_table(&[model], None).unwrap();

        let err = render(&table, &config()).unwrap_err();
        assert!(matches!(err, MixtureError::NoVariables { .. }));
    }
}
