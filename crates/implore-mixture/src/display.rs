//! Showing a rendered figure
//!
//! There is no interactive viewer; the figure is written to a persistent
//! temporary SVG file whose path is logged and returned.

use std::path::PathBuf;

use crate::chart::DensityPlot;
use crate::error::MixtureResult;
use crate::export::ExportConfig;

/// Write the figure to a temporary SVG file and return its path
pub fn show(plot: &DensityPlot, config: &ExportConfig) -> MixtureResult<PathBuf> {
    let svg = plot.to_svg(config)?;

    let file = tempfile::Builder::new()
        .prefix("implore-mixture-")
        .suffix(".svg")
        .tempfile()?;
    let (_, path) = file.keep().map_err(|e| e.error)?;
    std::fs::write(&path, svg)?;

    tracing::info!("Density plot available at {}", path.display());
    Ok(path)
}
