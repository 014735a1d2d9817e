//! Mixture model density plot binary
//!
//! Usage:
//!   implore-mixture --model NAME=OBSERVED.csv:POSTERIOR.csv [OPTIONS]
//!
//! Options:
//!   --model <SPEC>             Model tables, repeat for a multi-model figure
//!   --variables <A,B>          Variables to plot, default: all shared
//!   --conditional              Stacked class shares instead of densities
//!   --black-and-white          Patterned outlines instead of coloured fills
//!   --alpha <A>                Fill opacity, default 0.2
//!   --facet-label <KEY=LABEL>  Rename a facet strip, repeatable
//!   --config <PATH>            TOML plot configuration
//!   --width <PX>, --height <PX> Figure size, default 800x600
//!   --output <PATH>            SVG output file
//!   --json <PATH>              Also write the chart description as JSON

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use implore_mixture::{plot_density, ModelCollection, ModelResult, PlotConfig};

#[derive(Parser, Debug)]
#[command(name = "implore-mixture")]
#[command(about = "Weighted density plots for finite mixture models")]
struct Args {
    /// Model as NAME=OBSERVED.csv:POSTERIOR.csv
    #[arg(long = "model", required = true)]
    models: Vec<String>,

    /// Comma-separated variables to plot
    #[arg(long, value_delimiter = ',')]
    variables: Vec<String>,

    /// Plot class shares conditional on the observed value
    #[arg(long)]
    conditional: bool,

    /// Black-and-white style
    #[arg(long)]
    black_and_white: bool,

    /// Fill opacity in [0, 1]
    #[arg(long)]
    alpha: Option<f64>,

    /// Facet label override as KEY=LABEL
    #[arg(long = "facet-label")]
    facet_labels: Vec<String>,

    /// TOML plot configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Figure width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Figure height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// SVG output path
    #[arg(long)]
    output: PathBuf,

    /// JSON chart description output path
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("implore_mixture=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => PlotConfig::load(path)?,
        None => PlotConfig::default(),
    };
    apply_overrides(&mut config, &args)?;

    let mut models = ModelCollection::new();
    for spec in &args.models {
        let (name, model) = load_model(spec)?;
        tracing::info!("Loaded model '{}' with {} cases", name, model.num_cases());
        models.insert(name, model);
    }

    let plot = plot_density(&models, &config)?;
    plot.save_svg(&args.output, &config.export)?;

    if let Some(path) = &args.json {
        std::fs::write(path, plot.to_json()?)
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!("Wrote chart description to {}", path.display());
    }

    Ok(())
}

/// Command-line flags win over the configuration file
fn apply_overrides(config: &mut PlotConfig, args: &Args) -> anyhow::Result<()> {
    // Figures go to --output, never to a temporary file
    config.display = false;

    if !args.variables.is_empty() {
        config.variables = Some(args.variables.clone());
    }
    if args.conditional {
        config.conditional = true;
    }
    if args.black_and_white {
        config.black_and_white = true;
    }
    if let Some(alpha) = args.alpha {
        config.alpha = alpha;
    }
    if let Some(width) = args.width {
        config.export.width = width;
    }
    if let Some(height) = args.height {
        config.export.height = height;
    }
    for pair in &args.facet_labels {
        let (key, label) = pair
            .split_once('=')
            .with_context(|| format!("facet label '{}' is not KEY=LABEL", pair))?;
        config.facet_labels.insert(key.to_string(), label.to_string());
    }
    config.validate().map_err(anyhow::Error::msg)
}

fn load_model(spec: &str) -> anyhow::Result<(String, ModelResult)> {
    let (name, paths) = spec
        .split_once('=')
        .with_context(|| format!("model '{}' is not NAME=OBSERVED:POSTERIOR", spec))?;
    let (observed, posterior) = paths
        .rsplit_once(':')
        .with_context(|| format!("model '{}' is missing the posterior table", spec))?;

    let observed = implore_io::read_table(observed)
        .with_context(|| format!("reading observed data for '{}'", name))?;
    let posterior = implore_io::read_table(posterior)
        .with_context(|| format!("reading posterior probabilities for '{}'", name))?;

    Ok((name.to_string(), ModelResult::new(name, observed, posterior)?))
}
