//! Global Moran's I spatial autocorrelation for square lattice images
//!
//! Simulation runs write their food landscapes as square images. The crate
//! decodes one channel of each image into a grid, builds contiguity weights for
//! the lattice once per side length, and measures how strongly similar values
//! cluster, with analytical and permutation inference.

#![forbid(unsafe_code)]

/// Lattice weights, Moran's I, permutation inference and batch evaluation
pub mod analysis;
/// Input/output operations and error handling
pub mod io;
/// Normal distribution utilities for significance testing
pub mod math;
/// Validated square grids
pub mod spatial;

pub use analysis::statistics::{Moran, moran_i};
pub use analysis::weights::LatticeWeights;
pub use io::error::{MoranError, Result};
pub use spatial::Grid;
