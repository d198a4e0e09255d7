//! Global Moran's I with analytical inference
//!
//! For a grid flattened to values x₁…xₙ with deviations zᵢ = xᵢ − x̄ and lattice
//! weights wᵢⱼ summing to S0:
//!
//! ```text
//! I = (n / S0) · Σᵢⱼ wᵢⱼ zᵢ zⱼ / Σᵢ zᵢ²
//! ```
//!
//! Inference follows the classical moments of I under the normality and
//! randomization null hypotheses (Cliff and Ord).

use serde::Serialize;

use crate::analysis::permutation::{PermutationInference, permutation_test};
use crate::analysis::weights::LatticeWeights;
use crate::io::error::{MoranError, Result, computation_error};
use crate::math::probability::two_tailed_p_value;
use crate::spatial::Grid;

/// Moments and significance of I under one null hypothesis
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Inference {
    /// Variance of I under the null hypothesis
    pub variance: f64,
    /// Standardized deviation of the observed I from its expectation
    pub z_score: f64,
    /// Two-tailed p-value of `z_score`
    pub p_value: f64,
}

// Relative size below which E[I²] − E[I]² is cancellation residue
const VARIANCE_FLOOR: f64 = 64.0 * f64::EPSILON;

impl Inference {
    // Variance is E[I²] − E[I]²; a difference lost in the rounding of its terms
    // means I does not vary under the null (e.g. the complete graph of a 2x2
    // queen lattice), so no inference is reported.
    fn from_moments(i: f64, expected: f64, second_moment: f64) -> Option<Self> {
        let expected_sq = expected * expected;
        let variance = second_moment - expected_sq;
        let floor = VARIANCE_FLOOR * second_moment.abs().max(expected_sq);

        (variance.is_finite() && variance > floor).then(|| {
            let z_score = (i - expected) / variance.sqrt();
            Self {
                variance,
                z_score,
                p_value: two_tailed_p_value(z_score),
            }
        })
    }
}

/// Global Moran's I of one grid together with its inference
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Moran {
    /// Observed statistic
    pub i: f64,
    /// Expectation of I under spatial randomness, −1/(n−1)
    pub expected: f64,
    /// Inference assuming normally distributed values
    pub normal: Option<Inference>,
    /// Inference assuming random relabelling of the observed values
    pub randomization: Option<Inference>,
    /// Conditional permutation inference, when requested
    pub permutation: Option<PermutationInference>,
}

impl Moran {
    /// Compute I and its analytical inference
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The weights were built for a different side length (`DimensionMismatch`)
    /// - Every cell holds the same value (`DegenerateInput`)
    /// - The statistic overflows (`Computation`)
    pub fn compute(grid: &Grid, weights: &LatticeWeights) -> Result<Self> {
        let centered = Centered::new(grid, weights)?;
        let i = centered.statistic(weights)?;

        let n = centered.len() as f64;
        let s0 = weights.total_weight();
        let s1 = weights.s1();
        let s2 = weights.s2();
        let s0_sq = s0 * s0;
        let n_sq = n * n;

        let expected = -1.0 / (n - 1.0);

        let moment_normal = (n_sq * s1 - n * s2 + 3.0 * s0_sq) / ((n_sq - 1.0) * s0_sq);

        let kurtosis = n * centered.fourth_moment_sum() / (centered.sum_sq * centered.sum_sq);
        let a = n * ((n_sq - 3.0 * n + 3.0) * s1 - n * s2 + 3.0 * s0_sq);
        let b = kurtosis * ((n_sq - n) * s1 - 2.0 * n * s2 + 6.0 * s0_sq);
        let moment_randomization = (a - b) / ((n - 1.0) * (n - 2.0) * (n - 3.0) * s0_sq);

        Ok(Self {
            i,
            expected,
            normal: Inference::from_moments(i, expected, moment_normal),
            randomization: Inference::from_moments(i, expected, moment_randomization),
            permutation: None,
        })
    }

    /// Compute I, its analytical inference and a seeded permutation test
    ///
    /// # Errors
    ///
    /// Same conditions as [`Moran::compute`], plus `InvalidParameter` when
    /// `permutations` is zero
    pub fn compute_with_permutations(
        grid: &Grid,
        weights: &LatticeWeights,
        permutations: usize,
        seed: u64,
    ) -> Result<Self> {
        let mut moran = Self::compute(grid, weights)?;
        moran.permutation = Some(permutation_test(grid, weights, permutations, seed)?);
        Ok(moran)
    }
}

/// Global Moran's I of `grid` under `weights`
///
/// # Errors
///
/// Returns an error if:
/// - The weights were built for a different side length (`DimensionMismatch`)
/// - Every cell holds the same value (`DegenerateInput`)
/// - The statistic overflows (`Computation`)
pub fn moran_i(grid: &Grid, weights: &LatticeWeights) -> Result<f64> {
    Centered::new(grid, weights)?.statistic(weights)
}

/// Grid values centered on their mean, aligned with lattice indexing
pub(crate) struct Centered {
    pub(crate) deviations: Vec<f64>,
    pub(crate) sum_sq: f64,
}

impl Centered {
    pub(crate) fn new(grid: &Grid, weights: &LatticeWeights) -> Result<Self> {
        if grid.side() != weights.side() {
            return Err(MoranError::DimensionMismatch {
                expected: weights.side(),
                found: grid.side(),
            });
        }

        let values = grid.row_major();
        let mean = grid.mean();
        let deviations: Vec<f64> = values.iter().map(|v| v - mean).collect();
        let sum_sq: f64 = deviations.iter().map(|z| z * z).sum();

        if is_constant(&values) || sum_sq <= rounding_floor(&values) {
            return Err(MoranError::DegenerateInput {
                cells: values.len(),
            });
        }

        Ok(Self { deviations, sum_sq })
    }

    pub(crate) fn len(&self) -> usize {
        self.deviations.len()
    }

    fn fourth_moment_sum(&self) -> f64 {
        self.deviations.iter().map(|z| z.powi(4)).sum()
    }

    pub(crate) fn statistic(&self, weights: &LatticeWeights) -> Result<f64> {
        let i = statistic_of(&self.deviations, self.sum_sq, weights);
        if i.is_finite() {
            Ok(i)
        } else {
            Err(computation_error(
                "moran's i",
                &format!("non-finite result {i} (sum of squares {})", self.sum_sq),
            ))
        }
    }
}

/// I for already-centered values; the sum of squares is permutation invariant
pub(crate) fn statistic_of(deviations: &[f64], sum_sq: f64, weights: &LatticeWeights) -> f64 {
    let lag = weights.lag(deviations);
    let cross: f64 = deviations.iter().zip(&lag).map(|(z, l)| z * l).sum();
    (deviations.len() as f64 / weights.total_weight()) * (cross / sum_sq)
}

// Exact comparison: a constant grid must be rejected even when its mean rounds
#[allow(clippy::float_cmp)]
fn is_constant(values: &[f64]) -> bool {
    values
        .first()
        .is_some_and(|&first| values.iter().all(|&v| v == first))
}

// Variance indistinguishable from accumulated rounding of the mean
fn rounding_floor(values: &[f64]) -> f64 {
    let max_abs = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    values.len() as f64 * (f64::EPSILON * max_abs).powi(2)
}
