//! Spatial weights and autocorrelation statistics

/// Order-preserving evaluation over batches of same-sized grids
pub mod batch;
/// Memoization of lattice weights keyed by side length
pub mod cache;
/// Permutation inference for Moran's I
pub mod permutation;
/// Global Moran's I and its analytical inference
pub mod statistics;
/// Contiguity weights for square lattices
pub mod weights;
