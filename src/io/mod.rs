/// Command-line parsing and batch orchestration
pub mod cli;
/// Analysis constants and runtime defaults
pub mod configuration;
/// Recursive discovery of landscape images
pub mod discovery;
/// Error types and path context
pub mod error;
/// Channel extraction from decoded images
pub mod image;
/// Generation and simulation identifiers in file names
pub mod naming;
/// Terminal progress display
pub mod progress;
/// CSV and JSON result reports
pub mod report;
