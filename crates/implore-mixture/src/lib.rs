//! implore-mixture - Density plots for finite mixture models
//!
//! Turns fitted latent class / mixture model results into faceted density
//! figures: for every observed variable an overall "Total" density plus one
//! density per latent class, each case weighted by its posterior
//! class-membership probability.
//!
//! # Pipeline
//!
//! - **Data Reshaper** ([`extract_long_table`]): model results to a long
//!   table of (title, variable, class, value, probability) records
//! - **Density Estimator** ([`compute_densities`], [`compute_conditional`]):
//!   weighted Gaussian KDE per group, or kernel-smoothed class shares
//! - **Renderer** ([`render`]): faceted [`DensityPlot`] with palette, line
//!   patterns and legend, exportable to SVG or JSON
//!
//! [`plot_density`] runs all three stages for anything implementing
//! [`ModelSource`].
//!
//! # Example
//!
//! ```no_run
//! use implore_mixture::{plot_density, ModelResult, PlotConfig};
//!
//! let observed = implore_io::read_table("observed.csv")?;
//! let posterior = implore_io::read_table("posterior.csv")?;
//! let model = ModelResult::new("lpa_3", observed, posterior)?;
//!
//! let plot = plot_density(&model, &PlotConfig::new().with_variables(["x1", "x2"]))?;
//! plot.save_svg("density.svg", &Default::default())?;
//! # Ok::<(), implore_mixture::MixtureError>(())
//! ```

pub mod chart;
pub mod config;
pub mod density;
pub mod display;
pub mod error;
pub mod export;
pub mod facet;
pub mod model;
pub mod palette;
pub mod render;
pub mod reshape;

pub use chart::*;
pub use config::{PlotConfig, DEFAULT_ALPHA};
pub use density::*;
pub use error::{MixtureError, MixtureResult};
pub use export::{save_svg, to_svg, ExportConfig};
pub use facet::{resolve_label, FacetGrid};
pub use model::{ModelCollection, ModelResult, ModelSource};
pub use palette::{get_palette, Color, LinePattern};
pub use render::{layer_style, render, render_classic, render_conditional};
pub use reshape::*;

/// Reshape, estimate and render a model source in one call.
///
/// When `config.display` is set the figure is also shown; a failure to
/// show it is logged and does not fail the call. Showing keeps a new SVG
/// file in the system temp directory on every call and never removes it,
/// so batch callers should pass a config built with
/// [`PlotConfig::without_display`].
pub fn plot_density<S>(source: &S, config: &PlotConfig) -> MixtureResult<DensityPlot>
where
    S: ModelSource + ?Sized,
{
    let models = source.to_model_results();
    let table = extract_long_table(&models, config.variables.as_deref())?;
    let plot = render(&table, config)?;

    if config.display {
        if let Err(e) = display::show(&plot, &config.export) {
            tracing::warn!("Could not display density plot: {}", e);
        }
    }

    Ok(plot)
}
