//! Statistic evaluation over batches of same-sized grids
//!
//! One immutable `LatticeWeights` is shared by every grid of a batch, so the
//! parallel path needs no locking. Results always come back in input order.

use rayon::prelude::*;

use crate::analysis::statistics::{Moran, moran_i};
use crate::analysis::weights::{Contiguity, LatticeWeights, WeightTransform};
use crate::io::configuration::DEFAULT_SEED;
use crate::io::error::{MoranError, Result};
use crate::spatial::Grid;

/// How a batch of grids is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// Evaluate grids on the rayon thread pool
    pub parallel: bool,
    /// Permutations drawn per grid, zero to skip the permutation test
    pub permutations: usize,
    /// Base seed; grid `k` of the batch uses `seed + k`
    pub seed: u64,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            parallel: false,
            permutations: 0,
            seed: DEFAULT_SEED,
        }
    }
}

/// Fail with `DimensionMismatch` at the first grid whose side differs from `side`
///
/// # Errors
///
/// Returns `DimensionMismatch` naming the first offending side length
pub fn check_uniform_side(grids: &[Grid], side: usize) -> Result<()> {
    grids
        .iter()
        .find(|grid| grid.side() != side)
        .map_or(Ok(()), |grid| {
            Err(MoranError::DimensionMismatch {
                expected: side,
                found: grid.side(),
            })
        })
}

/// Moran's I of every grid under one shared weights structure
///
/// # Errors
///
/// Aborts on the first failing grid (in parallel mode, whichever failure is
/// observed first) with the error of [`moran_i`]
pub fn moran_batch(grids: &[Grid], weights: &LatticeWeights, parallel: bool) -> Result<Vec<f64>> {
    check_uniform_side(grids, weights.side())?;

    if parallel {
        grids.par_iter().map(|grid| moran_i(grid, weights)).collect()
    } else {
        grids.iter().map(|grid| moran_i(grid, weights)).collect()
    }
}

/// Full statistic with inference for every grid under one shared weights structure
///
/// # Errors
///
/// Aborts on the first failing grid with the error of [`Moran::compute`] or
/// [`Moran::compute_with_permutations`]
pub fn summarize_batch(
    grids: &[Grid],
    weights: &LatticeWeights,
    options: BatchOptions,
) -> Result<Vec<Moran>> {
    check_uniform_side(grids, weights.side())?;

    let summarize = |(index, grid): (usize, &Grid)| {
        if options.permutations == 0 {
            Moran::compute(grid, weights)
        } else {
            Moran::compute_with_permutations(
                grid,
                weights,
                options.permutations,
                options.seed.wrapping_add(index as u64),
            )
        }
    };

    if options.parallel {
        grids.par_iter().enumerate().map(summarize).collect()
    } else {
        grids.iter().enumerate().map(summarize).collect()
    }
}

/// Size the weights from the first grid, then compute I for every grid
///
/// An empty batch yields an empty result.
///
/// # Errors
///
/// Returns `DimensionMismatch` if any grid differs in side from the first,
/// `InvalidDimension` if the first side is unsupported, or the first
/// per-grid error of [`moran_i`]
pub fn analyze_grids(
    grids: &[Grid],
    contiguity: Contiguity,
    transform: WeightTransform,
    parallel: bool,
) -> Result<Vec<f64>> {
    let Some(first) = grids.first() else {
        return Ok(Vec::new());
    };

    check_uniform_side(grids, first.side())?;
    let weights = LatticeWeights::with_options(first.side(), contiguity, transform)?;
    moran_batch(grids, &weights, parallel)
}
