//! Wide-to-long reshaping of model results
//!
//! Each model contributes its observed variables and its posterior class
//! probabilities. The probabilities, plus a synthetic `Total` column of
//! ones, are divided by the model's case count and pivoted together with
//! the observed values into one record per (case, class, variable).
//!
//! Title, variable, and class are categorical: records hold level indices
//! into the owning [`LongTable`], and `Total` is always class level 0.

use std::fmt;

use serde::Serialize;

use crate::error::{MixtureError, MixtureResult};
use crate::model::ModelResult;

/// Label of the synthetic all-cases class
pub const TOTAL_LABEL: &str = "Total";

/// One level of the class factor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum ClassLevel {
    /// Every case with equal weight
    Total,
    /// A latent class, named after its posterior column
    Latent(String),
}

impl ClassLevel {
    /// Display label
    pub fn label(&self) -> &str {
        match self {
            ClassLevel::Total => TOTAL_LABEL,
            ClassLevel::Latent(name) => name,
        }
    }

    /// Whether this is the synthetic Total level
    pub fn is_total(&self) -> bool {
        matches!(self, ClassLevel::Total)
    }
}

impl fmt::Display for ClassLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the long table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LongRecord {
    /// Title level index
    pub title: usize,
    /// Variable level index
    pub variable: usize,
    /// Class level index (0 = Total)
    pub class: usize,
    /// Case index within its model
    pub case: usize,
    /// Raw observation
    pub value: f64,
    /// Case weight, already divided by the model's case count
    pub probability: f64,
}

/// Long-form table with its categorical levels
#[derive(Debug, Clone, Default, Serialize)]
pub struct LongTable {
    titles: Vec<String>,
    variables: Vec<String>,
    classes: Vec<ClassLevel>,
    records: Vec<LongRecord>,
}

impl LongTable {
    /// Title levels, one per model (all `""` for a single model)
    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// Variable levels in plotting order
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Class levels, `Total` first
    pub fn classes(&self) -> &[ClassLevel] {
        &self.classes
    }

    /// All records
    pub fn records(&self) -> &[LongRecord] {
        &self.records
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if there are no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Title label of a record
    pub fn title_of(&self, record: &LongRecord) -> &str {
        &self.titles[record.title]
    }

    /// Variable label of a record
    pub fn variable_of(&self, record: &LongRecord) -> &str {
        &self.variables[record.variable]
    }

    /// Class level of a record
    pub fn class_of(&self, record: &LongRecord) -> &ClassLevel {
        &self.classes[record.class]
    }

    /// Number of latent classes (excluding Total)
    pub fn latent_class_count(&self) -> usize {
        self.classes.len().saturating_sub(1)
    }

    /// Whether more than one model contributed
    pub fn is_multi_group(&self) -> bool {
        self.titles.len() > 1
    }
}

/// Display form of a model name
pub fn display_title(name: &str) -> String {
    name.replace('_', " ")
}

/// Numeric observed variables shared by every model, in the first model's
/// column order
pub fn available_variables(models: &[ModelResult]) -> Vec<String> {
    let Some((first, rest)) = models.split_first() else {
        return Vec::new();
    };

    first
        .observed()
        .numeric_column_names()
        .into_iter()
        .filter(|name| {
            rest.iter()
                .all(|m| m.observed().numeric_column_names().contains(name))
        })
        .map(String::from)
        .collect()
}

/// Resolve the variables to plot.
///
/// `None` selects every available variable. An explicit list keeps its own
/// order, drops duplicates, and drops names that are not available.
pub fn select_variables(
    models: &[ModelResult],
    requested: Option<&[String]>,
) -> MixtureResult<Vec<String>> {
    let available = available_variables(models);

    let selected: Vec<String> = match requested {
        None => available.clone(),
        Some(requested) => {
            let mut selected: Vec<String> = Vec::new();
            for name in requested {
                if available.contains(name) && !selected.contains(name) {
                    selected.push(name.clone());
                }
            }
            selected
        }
    };

    if selected.is_empty() {
        return Err(MixtureError::NoVariables {
            requested: requested.map(<[String]>::to_vec).unwrap_or_default(),
            available,
        });
    }

    Ok(selected)
}

/// Pivot model results into a [`LongTable`].
///
/// Non-finite observations produce no record; the `1 / N` scaling still
/// counts every case.
pub fn extract_long_table(
    models: &[ModelResult],
    variables: Option<&[String]>,
) -> MixtureResult<LongTable> {
    let variables = select_variables(models, variables)?;

    let multi_group = models.len() > 1;
    let titles: Vec<String> = models
        .iter()
        .map(|m| {
            if multi_group {
                display_title(m.name())
            } else {
                String::new()
            }
        })
        .collect();

    let mut classes = vec![ClassLevel::Total];
    for model in models {
        for name in model.class_names() {
            let level = ClassLevel::Latent(name.to_string());
            if !classes.contains(&level) {
                classes.push(level);
            }
        }
    }

    let mut records = Vec::new();

    for (title, model) in models.iter().enumerate() {
        let n = model.num_cases();
        let scale = 1.0 / n as f64;

        // (class level, scaled weight per case), Total first
        let mut weights: Vec<(usize, Vec<f64>)> = vec![(0, vec![scale; n])];
        for (name, column) in model.posterior().iter() {
            let level = ClassLevel::Latent(name.to_string());
            let class = classes.iter().position(|c| *c == level).ok_or_else(|| {
                MixtureError::invalid_model(model.name(), format!("unknown class '{}'", name))
            })?;
            let probabilities = column.to_f64().ok_or_else(|| {
                MixtureError::invalid_model(
                    model.name(),
                    format!("class column '{}' is not numeric", name),
                )
            })?;
            weights.push((
                class,
                probabilities.into_iter().map(|p| p.max(0.0) * scale).collect(),
            ));
        }

        let observed = variables
            .iter()
            .map(|v| {
                model.observed().column_f64(v).ok_or_else(|| {
                    MixtureError::invalid_model(model.name(), format!("variable '{}' is not numeric", v))
                })
            })
            .collect::<MixtureResult<Vec<Vec<f64>>>>()?;

        let before = records.len();
        records.reserve(n * weights.len() * observed.len());

        for case in 0..n {
            for (class, class_weights) in &weights {
                for (variable, values) in observed.iter().enumerate() {
                    let value = values[case];
                    if !value.is_finite() {
                        continue;
                    }
                    records.push(LongRecord {
                        title,
                        variable,
                        class: *class,
                        case,
                        value,
                        probability: class_weights[case],
                    });
                }
            }
        }

        tracing::debug!(
            "Reshaped model '{}': {} cases, {} classes, {} variables -> {} records",
            model.name(),
            n,
            weights.len() - 1,
            observed.len(),
            records.len() - before
        );
    }

    Ok(LongTable {
        titles,
        variables,
        classes,
        records,
    })
}
