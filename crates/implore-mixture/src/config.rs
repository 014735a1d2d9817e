//! Plot configuration
//!
//! Every field is optional in TOML; missing fields take their defaults.
//!
//! ```toml
//! variables = ["x1", "x2"]
//! black_and_white = false
//! conditional = false
//! alpha = 0.2
//!
//! [facet_labels]
//! x1 = "Anxiety"
//!
//! [export]
//! width = 1024
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chart::{PlotStyle, RenderMode};
use crate::density::DensityOptions;
use crate::error::{MixtureError, MixtureResult};
use crate::export::ExportConfig;

/// Default fill opacity of class areas
pub const DEFAULT_ALPHA: f64 = 0.2;

/// Density plot configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Variables to plot (`None` = all shared numeric variables)
    pub variables: Option<Vec<String>>,
    /// Patterned outlines instead of coloured fills
    pub black_and_white: bool,
    /// Stacked class shares instead of overlaid densities
    pub conditional: bool,
    /// Fill opacity, clamped into [0, 1]
    pub alpha: f64,
    /// Show the figure after rendering
    pub display: bool,
    /// Facet label overrides, keyed case-insensitively by variable or title
    pub facet_labels: BTreeMap<String, String>,
    /// Density evaluation grid
    pub density: DensityOptions,
    /// Figure size and fonts
    pub export: ExportConfig,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            variables: None,
            black_and_white: false,
            conditional: false,
            alpha: DEFAULT_ALPHA,
            display: true,
            facet_labels: BTreeMap::new(),
            density: DensityOptions::default(),
            export: ExportConfig::default(),
        }
    }
}

impl PlotConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load and validate a TOML configuration file
    pub fn load(path: impl AsRef<Path>) -> MixtureResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content).map_err(|e| MixtureError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate().map_err(|message| MixtureError::Config {
            path: path.to_path_buf(),
            message,
        })?;
        tracing::debug!("Loaded plot configuration from {}", path.display());
        Ok(config)
    }

    /// Check values that cannot be clamped into range
    pub fn validate(&self) -> Result<(), String> {
        if self.export.width == 0 || self.export.height == 0 {
            return Err("export width and height must be positive".to_string());
        }
        if self.density.grid_points < 2 {
            return Err("density grid_points must be at least 2".to_string());
        }
        if !self.density.cut.is_finite() || self.density.cut < 0.0 {
            return Err("density cut must be a non-negative number".to_string());
        }
        Ok(())
    }

    /// Fill opacity actually used
    pub fn effective_alpha(&self) -> f32 {
        if self.alpha.is_nan() {
            return DEFAULT_ALPHA as f32;
        }
        self.alpha.clamp(0.0, 1.0) as f32
    }

    pub fn mode(&self) -> RenderMode {
        if self.conditional {
            RenderMode::Conditional
        } else {
            RenderMode::Classic
        }
    }

    pub fn style(&self) -> PlotStyle {
        if self.black_and_white {
            PlotStyle::BlackAndWhite
        } else {
            PlotStyle::Color
        }
    }

    /// Restrict to these variables
    pub fn with_variables<I, S>(mut self, variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variables = Some(variables.into_iter().map(Into::into).collect());
        self
    }

    /// Use the black-and-white style
    pub fn black_and_white(mut self) -> Self {
        self.black_and_white = true;
        self
    }

    /// Use the conditional (stacked share) mode
    pub fn conditional(mut self) -> Self {
        self.conditional = true;
        self
    }

    /// Set fill opacity
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Override one facet label
    pub fn with_facet_label(mut self, key: impl Into<String>, label: impl Into<String>) -> Self {
        self.facet_labels.insert(key.into(), label.into());
        self
    }

    /// Skip showing the figure
    pub fn without_display(mut self) -> Self {
        self.display = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = PlotConfig::default();
        assert!(config.variables.is_none());
        assert!(!config.black_and_white);
        assert!(!config.conditional);
        assert_eq!(config.alpha, 0.2);
        assert!(config.facet_labels.is_empty());
        assert!(config.display);
        assert_eq!(config.mode(), RenderMode::Classic);
        assert_eq!(config.style(), PlotStyle::Color);
    }

    #[test]
    fn test_without_display_for_batch_use() {
        let config = PlotConfig::new().without_display();
        assert!(!config.display);
        assert_eq!(config, PlotConfig { display: false, ..PlotConfig::default() });
    }

    #[test]
    fn test_alpha_is_clamped() {
        assert_eq!(PlotConfig::new().with_alpha(1.7).effective_alpha(), 1.0);
        assert_eq!(PlotConfig::new().with_alpha(-0.3).effective_alpha(), 0.0);
        assert_eq!(PlotConfig::new().with_alpha(f64::NAN).effective_alpha(), 0.2);
    }

    #[test]
    fn test_partial_toml() {
        let config = PlotConfig::from_toml(
            r#"
            conditional = true
            variables = ["x2"]

            [facet_labels]
            x2 = "Depression"

            [export]
            height = 400
            "#,
        )
        .unwrap();

        assert!(config.conditional);
        assert_eq!(config.variables, Some(vec!["x2".to_string()]));
        assert_eq!(config.facet_labels["x2"], "Depression");
        assert_eq!(config.export.height, 400);
        assert_eq!(config.export.width, 800);
        assert_eq!(config.alpha, 0.2);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = PlotConfig::new()
            .black_and_white()
            .with_facet_label("x1", "Anxiety");
        let parsed = PlotConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_reports_path() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "alpha = \"opaque\"").unwrap();

        let err = PlotConfig::load(file.path()).unwrap_err();
        match err {
            MixtureError::Config { path, .. } => assert_eq!(path, file.path()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_rejects_empty_figure() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[export]\nwidth = 0").unwrap();
        assert!(PlotConfig::load(file.path()).is_err());
    }
}
