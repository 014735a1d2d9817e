//! Weighted Gaussian kernel density estimation
//!
//! Two estimators share one kernel and one bandwidth rule:
//!
//! - [`WeightedKde`]: a density over a weighted sample. Weights are
//!   normalized internally, the raw weight sum is kept as the sample's
//!   `mass` so callers can scale curves to a common total.
//! - [`kernel_shares`]: kernel-smoothed proportions of several weight
//!   vectors over the same sample (the "fill" stacking transform).
//!
//! Bandwidths follow R's `bw.nrd0` rule of thumb and are computed from the
//! sample values alone, so every weighting of the same values gets the same
//! bandwidth.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::summary::SummaryStats;

/// Number of evaluation points used by default
pub const DEFAULT_GRID_POINTS: usize = 512;

/// Default grid extension beyond the data range, in bandwidths
pub const DEFAULT_CUT: f64 = 3.0;

const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Reasons a sample cannot be turned into a density
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KdeError {
    /// Fewer than two distinct finite values
    #[error("need at least 2 distinct finite values, got {distinct}")]
    TooFewDistinctValues { distinct: usize },

    /// Weights sum to zero
    #[error("weights sum to zero")]
    ZeroWeight,

    /// Negative or non-finite weight
    #[error("invalid weight {weight} at index {index}")]
    InvalidWeight { index: usize, weight: f64 },

    /// Values and weights differ in length
    #[error("{values} values but {weights} weights")]
    LengthMismatch { values: usize, weights: usize },

    /// Bandwidth is not a positive finite number
    #[error("invalid bandwidth {0}")]
    InvalidBandwidth(f64),
}

/// Result type for density estimation
pub type KdeResult<T> = Result<T, KdeError>;

/// Rule-of-thumb bandwidth, `0.9 * min(sd, IQR / 1.34) * n^(-1/5)`.
///
/// When the robust spread is zero the rule falls back to the standard
/// deviation, then to `|x[0]|`, then to 1. Non-finite values are ignored.
pub fn bandwidth_nrd0(data: &[f64]) -> KdeResult<f64> {
    let stats = SummaryStats::from_data(data);
    if stats.count < 2 {
        return Err(KdeError::TooFewDistinctValues {
            distinct: stats.distinct,
        });
    }

    let hi = stats.std_dev;
    let mut lo = hi.min(stats.iqr() / 1.34);
    if lo <= 0.0 {
        lo = hi;
    }
    if lo <= 0.0 {
        lo = data
            .iter()
            .copied()
            .find(|x| x.is_finite())
            .map(f64::abs)
            .unwrap_or(0.0);
    }
    if lo <= 0.0 {
        lo = 1.0;
    }

    Ok(0.9 * lo * (stats.count as f64).powf(-0.2))
}

/// Evenly spaced points from `lo` to `hi` inclusive
pub fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (n - 1) as f64;
            (0..n).map(|i| lo + step * i as f64).collect()
        }
    }
}

/// Standard normal kernel
#[inline]
fn gaussian(u: f64) -> f64 {
    INV_SQRT_2PI * (-0.5 * u * u).exp()
}

/// Drop non-finite values, validating the weights that remain
fn clean_sample(values: &[f64], weights: &[f64]) -> KdeResult<(Vec<f64>, Vec<f64>)> {
    if values.len() != weights.len() {
        return Err(KdeError::LengthMismatch {
            values: values.len(),
            weights: weights.len(),
        });
    }

    let mut xs = Vec::with_capacity(values.len());
    let mut ws = Vec::with_capacity(values.len());
    for (index, (&x, &w)) in values.iter().zip(weights).enumerate() {
        if !x.is_finite() {
            continue;
        }
        if !w.is_finite() || w < 0.0 {
            return Err(KdeError::InvalidWeight { index, weight: w });
        }
        xs.push(x);
        ws.push(w);
    }
    Ok((xs, ws))
}

/// A fitted weighted Gaussian kernel density estimate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightedKde {
    values: Vec<f64>,
    /// Normalized weights (sum to 1)
    weights: Vec<f64>,
    bandwidth: f64,
    mass: f64,
    min: f64,
    max: f64,
}

impl WeightedKde {
    /// Fit with the `bw.nrd0` bandwidth of the values
    pub fn fit(values: &[f64], weights: &[f64]) -> KdeResult<Self> {
        let (xs, ws) = clean_sample(values, weights)?;
        let bandwidth = bandwidth_nrd0(&xs)?;
        Self::from_clean(xs, ws, bandwidth)
    }

    /// Fit with a caller-chosen bandwidth
    pub fn with_bandwidth(values: &[f64], weights: &[f64], bandwidth: f64) -> KdeResult<Self> {
        let (xs, ws) = clean_sample(values, weights)?;
        Self::from_clean(xs, ws, bandwidth)
    }

    fn from_clean(values: Vec<f64>, weights: Vec<f64>, bandwidth: f64) -> KdeResult<Self> {
        if !bandwidth.is_finite() || bandwidth <= 0.0 {
            return Err(KdeError::InvalidBandwidth(bandwidth));
        }

        let stats = SummaryStats::from_data(&values);
        if stats.distinct < 2 {
            return Err(KdeError::TooFewDistinctValues {
                distinct: stats.distinct,
            });
        }

        let mass: f64 = weights.iter().sum();
        if mass <= 0.0 {
            return Err(KdeError::ZeroWeight);
        }

        let weights = weights.into_iter().map(|w| w / mass).collect();

        Ok(Self {
            values,
            weights,
            bandwidth,
            mass,
            min: stats.min,
            max: stats.max,
        })
    }

    /// Density at `x` (integrates to 1 over the real line)
    pub fn evaluate(&self, x: f64) -> f64 {
        let h = self.bandwidth;
        self.values
            .iter()
            .zip(&self.weights)
            .filter(|(_, w)| **w > 0.0)
            .map(|(&xi, &w)| w * gaussian((x - xi) / h))
            .sum::<f64>()
            / h
    }

    /// Evaluation grid over the data range extended by `cut` bandwidths
    pub fn grid(&self, n: usize, cut: f64) -> Vec<f64> {
        let pad = cut * self.bandwidth;
        linspace(self.min - pad, self.max + pad, n)
    }

    /// `(x, density)` pairs over [`WeightedKde::grid`]
    pub fn curve(&self, n: usize, cut: f64) -> Vec<(f64, f64)> {
        self.grid(n, cut)
            .into_iter()
            .map(|x| (x, self.evaluate(x)))
            .collect()
    }

    /// Kernel bandwidth
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Sum of the raw (un-normalized) weights
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Smallest and largest sample value
    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// Number of sample values (including zero-weight ones)
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the sample is empty (never true for a fitted estimate)
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Kernel-smoothed share of each weight vector at each grid point.
///
/// `class_weights[c][i]` is the weight of sample `i` in group `c`. For each
/// grid point `x` the result holds, per group,
/// `sum_i w_ci K((x - x_i) / h) / sum_c sum_i w_ci K((x - x_i) / h)`,
/// so the shares at every grid point sum to 1. The kernel is evaluated
/// relative to the nearest sample, which keeps the ratio well defined far
/// from the data. Where every nearby weight is zero the shares are split
/// evenly.
pub fn kernel_shares(
    values: &[f64],
    class_weights: &[Vec<f64>],
    bandwidth: f64,
    grid: &[f64],
) -> KdeResult<Vec<Vec<f64>>> {
    if !bandwidth.is_finite() || bandwidth <= 0.0 {
        return Err(KdeError::InvalidBandwidth(bandwidth));
    }
    for weights in class_weights {
        if weights.len() != values.len() {
            return Err(KdeError::LengthMismatch {
                values: values.len(),
                weights: weights.len(),
            });
        }
        if let Some((index, &weight)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(KdeError::InvalidWeight { index, weight });
        }
    }

    let total_mass: f64 = class_weights.iter().flatten().sum();
    if total_mass <= 0.0 {
        return Err(KdeError::ZeroWeight);
    }

    let k = class_weights.len();
    let mut shares = vec![Vec::with_capacity(grid.len()); k];
    let mut exponents = vec![0.0; values.len()];

    for &x in grid {
        let mut nearest = f64::INFINITY;
        for (z, &xi) in exponents.iter_mut().zip(values) {
            let u = (x - xi) / bandwidth;
            *z = 0.5 * u * u;
            nearest = nearest.min(*z);
        }

        let sums: Vec<f64> = class_weights
            .iter()
            .map(|weights| {
                weights
                    .iter()
                    .zip(&exponents)
                    .map(|(&w, &z)| w * (nearest - z).exp())
                    .sum()
            })
            .collect();
        let total: f64 = sums.iter().sum();

        for (class_shares, s) in shares.iter_mut().zip(sums) {
            class_shares.push(if total > 0.0 { s / total } else { 1.0 / k as f64 });
        }
    }

    Ok(shares)
}
