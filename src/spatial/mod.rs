//! Spatial data structures
//!
//! This module contains the validated square grid every statistic consumes.

/// Square grids of channel intensities
pub mod grid;

pub use grid::Grid;
