//! Mathematical utilities for inference

/// Normal distribution functions used for significance testing
pub mod probability;
