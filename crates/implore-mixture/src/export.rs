//! Figure export
//!
//! Draws a [`DensityPlot`] through plotters' SVG backend. Each facet cell
//! becomes one cartesian chart; the legend sits in a strip on the right.

use std::path::Path;

use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::Color as _;
use serde::{Deserialize, Serialize};

use crate::chart::{DensityPlot, Geometry, Layer, LegendEntry, Panel};
use crate::error::{MixtureError, MixtureResult};
use crate::palette::Color;

/// Export configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Figure width in pixels
    pub width: u32,
    /// Figure height in pixels
    pub height: u32,
    /// Base font size for strips, axes and legend
    pub font_size: u32,
    /// Width of the legend strip
    pub legend_width: u32,
    /// Optional figure title
    pub caption: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            font_size: 14,
            legend_width: 120,
            caption: None,
        }
    }
}

impl ExportConfig {
    /// Create config with a figure size
    pub fn svg(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Set title
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

impl DensityPlot {
    /// Render to an SVG document
    pub fn to_svg(&self, config: &ExportConfig) -> MixtureResult<String> {
        to_svg(self, config)
    }

    /// Render and write an SVG file
    pub fn save_svg(&self, path: impl AsRef<Path>, config: &ExportConfig) -> MixtureResult<()> {
        save_svg(self, path, config)
    }
}

fn rgb(color: &Color) -> RGBColor {
    let [r, g, b] = color.to_rgb8();
    RGBColor(r, g, b)
}

/// Render a plot to an SVG document
pub fn to_svg(plot: &DensityPlot, config: &ExportConfig) -> MixtureResult<String> {
    if config.width == 0 || config.height == 0 {
        return Err(MixtureError::render(format!(
            "figure size {}x{} is empty",
            config.width, config.height
        )));
    }

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (config.width, config.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(MixtureError::render)?;

        let root = match &config.caption {
            Some(caption) => root
                .titled(caption, ("sans-serif", config.font_size + 4).into_font())
                .map_err(MixtureError::render)?,
            None => root,
        };

        let legend_width = if plot.legend.is_empty() {
            0
        } else {
            config.legend_width.min(config.width / 2)
        };
        let (plot_area, legend_area) =
            root.split_horizontally(config.width.saturating_sub(legend_width));

        let cells = plot_area.split_evenly((plot.grid.rows(), plot.grid.cols()));
        for panel in &plot.panels {
            let cell = &cells[panel.row * plot.grid.cols() + panel.col];
            draw_panel(cell, plot, panel, config)?;
        }

        draw_legend(&legend_area, &plot.legend, config)?;
        root.present().map_err(MixtureError::render)?;
    }

    Ok(svg)
}

/// Render a plot and write it to `path`
pub fn save_svg(
    plot: &DensityPlot,
    path: impl AsRef<Path>,
    config: &ExportConfig,
) -> MixtureResult<()> {
    let path = path.as_ref();
    let svg = to_svg(plot, config)?;
    std::fs::write(path, svg)?;
    tracing::info!("Wrote density plot to {}", path.display());
    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    plot: &DensityPlot,
    panel: &Panel,
    config: &ExportConfig,
) -> MixtureResult<()> {
    let (x_lo, x_hi) = plot.x_ranges[panel.col];
    let (y_lo, y_hi) = plot.y_range;

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(8)
        .x_label_area_size(config.font_size * 2)
        .y_label_area_size(config.font_size * 3);
    if let Some(strip) = plot.grid.strip(panel.row, panel.col) {
        builder.caption(strip, ("sans-serif", config.font_size).into_font());
    }

    let mut chart = builder
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(MixtureError::render)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(5)
        .y_labels(5)
        .y_desc(plot.y_label.as_str())
        .label_style(("sans-serif", config.font_size.saturating_sub(2)).into_font())
        .draw()
        .map_err(MixtureError::render)?;

    for layer in &panel.layers {
        draw_layer(&mut chart, layer)?;
    }

    Ok(())
}

fn draw_layer<DB: DrawingBackend>(
    chart: &mut ChartContext<DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    layer: &Layer,
) -> MixtureResult<()> {
    if let Some(fill) = &layer.style.fill {
        let fill_style = rgb(fill).mix(fill.a as f64);
        match &layer.geometry {
            Geometry::Area { points } => {
                chart
                    .draw_series(AreaSeries::new(points.iter().copied(), 0.0, fill_style))
                    .map_err(MixtureError::render)?;
            }
            Geometry::Band { x, lower, upper } => {
                let outline: Vec<(f64, f64)> = x
                    .iter()
                    .copied()
                    .zip(upper.iter().copied())
                    .chain(x.iter().copied().zip(lower.iter().copied()).rev())
                    .collect();
                chart
                    .draw_series(std::iter::once(Polygon::new(outline, fill_style.filled())))
                    .map_err(MixtureError::render)?;
            }
        }
    }

    let stroke = rgb(&layer.style.stroke).stroke_width(1);
    let outline = layer.geometry.outline();
    match layer.style.pattern.dash() {
        None => {
            chart
                .draw_series(LineSeries::new(outline, stroke))
                .map_err(MixtureError::render)?;
        }
        Some((size, spacing)) => {
            chart
                .draw_series(DashedLineSeries::new(outline, size, spacing, stroke))
                .map_err(MixtureError::render)?;
        }
    }

    Ok(())
}

fn draw_legend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    legend: &[LegendEntry],
    config: &ExportConfig,
) -> MixtureResult<()> {
    let font = ("sans-serif", config.font_size).into_font();
    let row_height = config.font_size as i32 + 8;
    let (x0, x1) = (8, 32);

    for (i, entry) in legend.iter().enumerate() {
        let y = 24 + i as i32 * row_height;

        if let Some(fill) = &entry.style.fill {
            area.draw(&Rectangle::new(
                [(x0, y - 6), (x1, y + 6)],
                rgb(fill).mix(fill.a as f64).filled(),
            ))
            .map_err(MixtureError::render)?;
        }

        let stroke = rgb(&entry.style.stroke).stroke_width(2);
        let (dash, gap) = entry
            .style
            .pattern
            .dash()
            .map(|(d, g)| (d as i32, g as i32))
            .unwrap_or((x1 - x0, 0));
        let mut x = x0;
        while x < x1 {
            let end = (x + dash.max(1)).min(x1);
            area.draw(&PathElement::new(vec![(x, y), (end, y)], stroke))
                .map_err(MixtureError::render)?;
            x = end + gap;
        }

        area.draw(&Text::new(
            entry.label.clone(),
            (x1 + 6, y - config.font_size as i32 / 2),
            font.clone(),
        ))
        .map_err(MixtureError::render)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlotConfig;
    use crate::model::ModelResult;
    use crate::render::render;
    use crate::reshape::extract_long_table;
    use implore_io::DataTable;

    fn plot(config: &PlotConfig) -> DensityPlot {
        let model = ModelResult::new(
            "m",
            DataTable::from_columns(vec![("x1", vec![1.0, 2.0, 3.0, 4.0, 6.0])]).unwrap(),
            DataTable::from_columns(vec![
                ("A", vec![0.9, 0.7, 0.4, 0.2, 0.1]),
                ("B", vec![0.1, 0.3, 0.6, 0.8, 0.9]),
            ])
            .unwrap(),
        )
        .unwrap();
        let table = extract_long_table(&[model], None).unwrap();
        render(&table, config).unwrap()
    }

    #[test]
    fn test_export_config_defaults() {
        let config = ExportConfig::default();
        assert_eq!(config.width, 800);
        assert_eq!(config.height, 600);
        assert!(config.caption.is_none());
    }

    #[test]
    fn test_export_config_svg() {
        let config = ExportConfig::svg(400, 300).with_caption("Latent profiles");
        assert_eq!((config.width, config.height), (400, 300));
        assert_eq!(config.caption.as_deref(), Some("Latent profiles"));
    }

    #[test]
    fn test_partial_config_from_toml() {
        let config: ExportConfig = toml::from_str("width = 1024").unwrap();
        assert_eq!(config.width, 1024);
        assert_eq!(config.height, 600);
    }

    #[test]
    fn test_filled_and_dashed_layers_reach_svg() {
        let base = PlotConfig::new().without_display();
        for config in [
            base.clone(),
            base.clone().black_and_white(),
            base.clone().conditional(),
            base.conditional().black_and_white(),
        ] {
            let svg = to_svg(&plot(&config), &ExportConfig::svg(400, 300)).unwrap();
            assert!(svg.contains("<svg"));
            assert!(svg.contains("x1"));
        }
    }
}
