//! Weighted density estimation over a long table
//!
//! Classic mode fits one weighted KDE per (title, variable, class) group.
//! Conditional mode smooths the latent class weights of each
//! (title, variable) pair into shares that partition 1 at every grid point.
//!
//! Degenerate groups never abort: they are returned as [`SkippedGroup`]s
//! next to the groups that did estimate.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use implore_stats::{
    bandwidth_nrd0, kernel_shares, linspace, KdeError, SummaryStats, WeightedKde, DEFAULT_CUT,
    DEFAULT_GRID_POINTS,
};

use crate::reshape::LongTable;

/// Density evaluation settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DensityOptions {
    /// Number of evaluation points per curve
    pub grid_points: usize,
    /// Grid extension beyond the data range, in bandwidths (classic mode)
    pub cut: f64,
}

impl Default for DensityOptions {
    fn default() -> Self {
        Self {
            grid_points: DEFAULT_GRID_POINTS,
            cut: DEFAULT_CUT,
        }
    }
}

/// Density of one (title, variable, class) group
#[derive(Debug, Clone, Serialize)]
pub struct DensityCurve {
    /// Title level index
    pub title: usize,
    /// Variable level index
    pub variable: usize,
    /// Class level index
    pub class: usize,
    /// Kernel bandwidth
    pub bandwidth: f64,
    /// Sum of the group's weights
    pub mass: f64,
    /// `(x, density * mass)` pairs in increasing x
    pub points: Vec<(f64, f64)>,
}

impl DensityCurve {
    /// Smallest and largest x
    pub fn x_range(&self) -> (f64, f64) {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (first.0, last.0),
            _ => (f64::NAN, f64::NAN),
        }
    }

    /// Largest y
    pub fn max_y(&self) -> f64 {
        self.points.iter().map(|p| p.1).fold(0.0, f64::max)
    }

    /// Trapezoidal area under the curve (close to `mass`)
    pub fn area(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| (w[1].0 - w[0].0) * (w[1].1 + w[0].1) / 2.0)
            .sum()
    }
}

/// A group that could not be estimated
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedGroup {
    /// Title level index
    pub title: usize,
    /// Variable level index
    pub variable: usize,
    /// Class level index (`None` for a conditional-mode pair)
    pub class: Option<usize>,
    /// Why estimation failed
    pub reason: KdeError,
}

/// Classic-mode estimation output
#[derive(Debug, Clone, Default)]
pub struct DensitySet {
    pub curves: Vec<DensityCurve>,
    pub skipped: Vec<SkippedGroup>,
}

impl DensitySet {
    /// Find the curve of a group
    pub fn curve(&self, title: usize, variable: usize, class: usize) -> Option<&DensityCurve> {
        self.curves
            .iter()
            .find(|c| c.title == title && c.variable == variable && c.class == class)
    }
}

/// Kernel-smoothed class shares of one (title, variable) pair
#[derive(Debug, Clone, Serialize)]
pub struct ConditionalBands {
    /// Title level index
    pub title: usize,
    /// Variable level index
    pub variable: usize,
    /// Shared kernel bandwidth
    pub bandwidth: f64,
    /// Evaluation grid over the observed range
    pub grid: Vec<f64>,
    /// `(class level, share at each grid point)` in class level order
    pub shares: Vec<(usize, Vec<f64>)>,
}

impl ConditionalBands {
    /// Sum of all class shares at grid point `i`
    pub fn total_at(&self, i: usize) -> f64 {
        self.shares.iter().map(|(_, s)| s[i]).sum()
    }
}

/// Conditional-mode estimation output
#[derive(Debug, Clone, Default)]
pub struct ConditionalSet {
    pub bands: Vec<ConditionalBands>,
    pub skipped: Vec<SkippedGroup>,
}

/// Weighted density per (title, variable, class) with default options
pub fn compute_densities(table: &LongTable) -> DensitySet {
    compute_densities_with(table, &DensityOptions::default())
}

/// Weighted density per (title, variable, class).
///
/// Curves are scaled by their group's weight sum, so with `1 / N` case
/// weights the Total curve integrates to 1 and each class curve to its
/// estimated proportion.
pub fn compute_densities_with(table: &LongTable, options: &DensityOptions) -> DensitySet {
    let mut groups: BTreeMap<(usize, usize, usize), (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for record in table.records() {
        let (values, weights) = groups
            .entry((record.title, record.variable, record.class))
            .or_default();
        values.push(record.value);
        weights.push(record.probability);
    }

    let mut set = DensitySet::default();

    for ((title, variable, class), (values, weights)) in groups {
        match WeightedKde::fit(&values, &weights) {
            Ok(kde) => {
                let mass = kde.mass();
                let points = kde
                    .curve(options.grid_points, options.cut)
                    .into_iter()
                    .map(|(x, density)| (x, density * mass))
                    .collect();
                set.curves.push(DensityCurve {
                    title,
                    variable,
                    class,
                    bandwidth: kde.bandwidth(),
                    mass,
                    points,
                });
            }
            Err(reason) => {
                tracing::debug!(
                    "Skipping density for {:?} / {} / {}: {}",
                    table.titles()[title],
                    table.variables()[variable],
                    table.classes()[class],
                    reason
                );
                set.skipped.push(SkippedGroup {
                    title,
                    variable,
                    class: Some(class),
                    reason,
                });
            }
        }
    }

    set
}

/// Conditional class shares with default options
pub fn compute_conditional(table: &LongTable) -> ConditionalSet {
    compute_conditional_with(table, &DensityOptions::default())
}

/// Kernel-smoothed latent class shares per (title, variable).
///
/// Total is excluded. All classes of a pair share one bandwidth and one
/// grid spanning the observed values, and their shares sum to 1 at every
/// grid point.
pub fn compute_conditional_with(table: &LongTable, options: &DensityOptions) -> ConditionalSet {
    let k = table.latent_class_count();

    // (title, variable) -> case -> (value, weight per latent class)
    let mut pairs: BTreeMap<(usize, usize), BTreeMap<usize, (f64, Vec<f64>)>> = BTreeMap::new();
    let mut present: BTreeMap<(usize, usize), BTreeSet<usize>> = BTreeMap::new();

    for record in table.records().iter().filter(|r| r.class != 0) {
        let key = (record.title, record.variable);
        let (_, weights) = pairs
            .entry(key)
            .or_default()
            .entry(record.case)
            .or_insert_with(|| (record.value, vec![0.0; k]));
        weights[record.class - 1] = record.probability;
        present.entry(key).or_default().insert(record.class);
    }

    let mut set = ConditionalSet::default();

    for ((title, variable), cases) in pairs {
        let classes: Vec<usize> = present
            .get(&(title, variable))
            .map(|c| c.iter().copied().collect())
            .unwrap_or_default();

        let values: Vec<f64> = cases.values().map(|(value, _)| *value).collect();
        let class_weights: Vec<Vec<f64>> = classes
            .iter()
            .map(|&class| cases.values().map(|(_, w)| w[class - 1]).collect())
            .collect();

        match conditional_shares(&values, &class_weights, options.grid_points) {
            Ok((bandwidth, grid, shares)) => set.bands.push(ConditionalBands {
                title,
                variable,
                bandwidth,
                grid,
                shares: classes.into_iter().zip(shares).collect(),
            }),
            Err(reason) => {
                tracing::debug!(
                    "Skipping conditional density for {:?} / {}: {}",
                    table.titles()[title],
                    table.variables()[variable],
                    reason
                );
                set.skipped.push(SkippedGroup {
                    title,
                    variable,
                    class: None,
                    reason,
                });
            }
        }
    }

    set
}

type Shares = (f64, Vec<f64>, Vec<Vec<f64>>);

fn conditional_shares(
    values: &[f64],
    class_weights: &[Vec<f64>],
    grid_points: usize,
) -> Result<Shares, KdeError> {
    let stats = SummaryStats::from_data(values);
    if stats.distinct < 2 {
        return Err(KdeError::TooFewDistinctValues {
            distinct: stats.distinct,
        });
    }
    let bandwidth = bandwidth_nrd0(values)?;
    let grid = linspace(stats.min, stats.max, grid_points);
    let shares = kernel_shares(values, class_weights, bandwidth, &grid)?;
    Ok((bandwidth, grid, shares))
}
