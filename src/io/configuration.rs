//! Analysis constants and runtime configuration defaults

// File selection and identifier parsing
/// Substring every landscape file name contains
pub const DEFAULT_MARKER: &str = "foodlandscape";
/// Separator between the generation and simulation tokens
pub const DEFAULT_DELIMITER: &str = "sim";

// Lattice limits
/// Smallest lattice side for which Moran's I is defined
pub const MIN_LATTICE_SIDE: usize = 2;

// Safety limit to prevent excessive adjacency allocation
/// Largest accepted lattice side
pub const MAX_LATTICE_SIDE: usize = 4096;

// Default values for configurable parameters
/// Fixed seed for reproducible permutation inference
pub const DEFAULT_SEED: u64 = 42;

/// Permutations drawn per grid unless requested otherwise
pub const DEFAULT_PERMUTATIONS: usize = 0;

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;

/// Log filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info";
/// Log filter used with `--quiet` when `RUST_LOG` is unset
pub const QUIET_LOG_FILTER: &str = "warn";
