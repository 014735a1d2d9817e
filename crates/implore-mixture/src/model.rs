//! Fitted mixture model inputs
//!
//! A [`ModelResult`] pairs a model's observed data with its posterior
//! class-membership probabilities. Anything that can produce model results
//! implements [`ModelSource`]; the plotting pipeline only ever sees a slice
//! of `ModelResult`s.

use implore_io::DataTable;

use crate::error::{MixtureError, MixtureResult};
use crate::reshape::TOTAL_LABEL;

/// Tolerance for posterior probabilities slightly outside [0, 1]
const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Tolerance before a posterior row sum is reported
const ROW_SUM_TOLERANCE: f64 = 1e-3;

/// One fitted mixture model (or one group of a multi-group model)
#[derive(Debug, Clone, PartialEq)]
pub struct ModelResult {
    name: String,
    observed: DataTable,
    posterior: DataTable,
}

impl ModelResult {
    /// Create a model result, validating that the tables line up.
    ///
    /// `observed` holds one row per case and one column per variable;
    /// `posterior` holds one row per case and one numeric column per latent
    /// class, in class order.
    pub fn new(
        name: impl Into<String>,
        observed: DataTable,
        posterior: DataTable,
    ) -> MixtureResult<Self> {
        let name = name.into();

        if posterior.num_columns() == 0 {
            return Err(MixtureError::invalid_model(&name, "posterior has no class columns"));
        }
        if observed.num_rows() != posterior.num_rows() {
            return Err(MixtureError::invalid_model(
                &name,
                format!(
                    "posterior has {} rows, observed has {}",
                    posterior.num_rows(),
                    observed.num_rows()
                ),
            ));
        }
        if posterior.num_rows() == 0 {
            return Err(MixtureError::invalid_model(&name, "no cases"));
        }

        let mut row_sums = vec![0.0; posterior.num_rows()];
        for (class, column) in posterior.iter() {
            if class.eq_ignore_ascii_case(TOTAL_LABEL) {
                return Err(MixtureError::invalid_model(
                    &name,
                    format!("class column '{}' clashes with the Total level", class),
                ));
            }
            let probabilities = column.to_f64().ok_or_else(|| {
                MixtureError::invalid_model(&name, format!("class column '{}' is not numeric", class))
            })?;
            for (case, p) in probabilities.iter().enumerate() {
                if !p.is_finite()
                    || *p < -PROBABILITY_TOLERANCE
                    || *p > 1.0 + PROBABILITY_TOLERANCE
                {
                    return Err(MixtureError::invalid_model(
                        &name,
                        format!("probability {} for case {} in class '{}'", p, case + 1, class),
                    ));
                }
                row_sums[case] += p;
            }
        }

        let off = row_sums
            .iter()
            .filter(|s| (*s - 1.0).abs() > ROW_SUM_TOLERANCE)
            .count();
        if off > 0 {
            tracing::warn!(
                "Model '{}': {} of {} posterior rows do not sum to 1",
                name,
                off,
                row_sums.len()
            );
        }

        Ok(Self {
            name,
            observed,
            posterior,
        })
    }

    /// Model label
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw observed data (rows = cases)
    pub fn observed(&self) -> &DataTable {
        &self.observed
    }

    /// Posterior class probabilities (rows = cases, columns = classes)
    pub fn posterior(&self) -> &DataTable {
        &self.posterior
    }

    /// Number of cases
    pub fn num_cases(&self) -> usize {
        self.posterior.num_rows()
    }

    /// Latent class names in column order
    pub fn class_names(&self) -> Vec<&str> {
        self.posterior.column_names()
    }

    /// Same model under another label
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Anything that can be turned into model results for plotting
pub trait ModelSource {
    /// The model results to plot, in display order
    fn to_model_results(&self) -> Vec<ModelResult>;
}

impl ModelSource for ModelResult {
    fn to_model_results(&self) -> Vec<ModelResult> {
        vec![self.clone()]
    }
}

impl ModelSource for [ModelResult] {
    fn to_model_results(&self) -> Vec<ModelResult> {
        self.to_vec()
    }
}

impl ModelSource for Vec<ModelResult> {
    fn to_model_results(&self) -> Vec<ModelResult> {
        self.clone()
    }
}

/// Named, insertion-ordered collection of fitted models
///
/// Each entry is plotted under its collection key rather than the model's
/// own name.
#[derive(Debug, Clone, Default)]
pub struct ModelCollection {
    entries: Vec<(String, ModelResult)>,
}

impl ModelCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a model, replacing any entry with the same name in place
    pub fn insert(&mut self, name: impl Into<String>, model: ModelResult) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = model,
            None => self.entries.push((name, model)),
        }
    }

    /// Builder-style [`ModelCollection::insert`]
    pub fn with(mut self, name: impl Into<String>, model: ModelResult) -> Self {
        self.insert(name, model);
        self
    }

    /// Look up a model by name
    pub fn get(&self, name: &str) -> Option<&ModelResult> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, model)| model)
    }

    /// Entry names in order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Number of models
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, ModelResult)> for ModelCollection {
    fn from_iter<I: IntoIterator<Item = (String, ModelResult)>>(iter: I) -> Self {
        let mut collection = Self::new();
        for (name, model) in iter {
            collection.insert(name, model);
        }
        collection
    }
}

impl ModelSource for ModelCollection {
    fn to_model_results(&self) -> Vec<ModelResult> {
        self.entries
            .iter()
            .map(|(name, model)| model.clone().renamed(name.clone()))
            .collect()
    }
}
