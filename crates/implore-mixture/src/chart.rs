//! Backend-independent chart description
//!
//! A [`DensityPlot`] is a fully resolved faceted figure: every layer carries
//! its data and style, so it can be inspected, serialized, or drawn.

use serde::Serialize;

use crate::error::{MixtureError, MixtureResult};
use crate::facet::FacetGrid;
use crate::palette::{Color, LinePattern};

/// Which kind of figure is drawn
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Overlaid weighted densities with a Total curve
    #[default]
    Classic,
    /// Stacked class shares conditional on the observed value
    Conditional,
}

/// Colour policy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotStyle {
    #[default]
    Color,
    BlackAndWhite,
}

/// Shape of a layer's data
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Geometry {
    /// Curve filled down to zero
    Area { points: Vec<(f64, f64)> },
    /// Region between two curves over a shared grid
    Band {
        x: Vec<f64>,
        lower: Vec<f64>,
        upper: Vec<f64>,
    },
}

impl Geometry {
    /// Smallest and largest x
    pub fn x_range(&self) -> Option<(f64, f64)> {
        let xs: Vec<f64> = match self {
            Geometry::Area { points } => points.iter().map(|p| p.0).collect(),
            Geometry::Band { x, .. } => x.clone(),
        };
        let lo = xs.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (lo <= hi).then_some((lo, hi))
    }

    /// Largest y
    pub fn max_y(&self) -> f64 {
        match self {
            Geometry::Area { points } => points.iter().map(|p| p.1).fold(0.0, f64::max),
            Geometry::Band { upper, .. } => upper.iter().copied().fold(0.0, f64::max),
        }
    }

    /// The outline drawn for this geometry (the upper edge of a band)
    pub fn outline(&self) -> Vec<(f64, f64)> {
        match self {
            Geometry::Area { points } => points.clone(),
            Geometry::Band { x, upper, .. } => x.iter().copied().zip(upper.iter().copied()).collect(),
        }
    }
}

/// Stroke and fill of a layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayerStyle {
    pub stroke: Color,
    /// Fill colour with its opacity in `a`; `None` draws the outline only
    pub fill: Option<Color>,
    pub pattern: LinePattern,
}

impl LayerStyle {
    /// Black solid outline, no fill
    pub fn total() -> Self {
        Self {
            stroke: Color::BLACK,
            fill: None,
            pattern: LinePattern::Solid,
        }
    }
}

/// One class drawn in one panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    /// Class level index
    pub class: usize,
    pub label: String,
    pub geometry: Geometry,
    pub style: LayerStyle,
}

/// One facet cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    /// Title level index (facet row)
    pub row: usize,
    /// Variable level index (facet column)
    pub col: usize,
    /// Layers in drawing order
    pub layers: Vec<Layer>,
}

/// Legend item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub style: LayerStyle,
}

/// A complete faceted density figure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityPlot {
    pub mode: RenderMode,
    pub style: PlotStyle,
    pub grid: FacetGrid,
    /// Row-major panels, `rows * cols` of them
    pub panels: Vec<Panel>,
    pub legend: Vec<LegendEntry>,
    /// Shared x range per facet column
    pub x_ranges: Vec<(f64, f64)>,
    /// Y range shared by every panel
    pub y_range: (f64, f64),
    pub y_label: String,
}

impl DensityPlot {
    /// Panel at (row, col)
    pub fn panel(&self, row: usize, col: usize) -> Option<&Panel> {
        self.panels.iter().find(|p| p.row == row && p.col == col)
    }

    /// Every layer across all panels
    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.panels.iter().flat_map(|p| p.layers.iter())
    }

    /// Total number of layers
    pub fn layer_count(&self) -> usize {
        self.panels.iter().map(|p| p.layers.len()).sum()
    }

    /// Legend labels in order
    pub fn legend_labels(&self) -> Vec<&str> {
        self.legend.iter().map(|e| e.label.as_str()).collect()
    }

    /// Serialize the chart description
    pub fn to_json(&self) -> MixtureResult<String> {
        serde_json::to_string_pretty(self).map_err(MixtureError::render)
    }
}
