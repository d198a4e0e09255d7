//! Generation and simulation identifiers encoded in landscape file names
//!
//! The simulation writes files such as `foodlandscape120sim3.png`: a marker,
//! the generation token, a delimiter and the simulation token, followed by the
//! extension.

use crate::io::configuration::{DEFAULT_DELIMITER, DEFAULT_MARKER};
use crate::io::error::{MoranError, Result, invalid_parameter};
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Labels one result with the simulation run that produced its image
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ImageIdentifier {
    /// Generation token
    pub generation: String,
    /// Simulation token
    pub simulation: String,
}

impl fmt::Display for ImageIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "generation {} / simulation {}",
            self.generation, self.simulation
        )
    }
}

/// Marker and delimiter describing the landscape file name layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePattern {
    marker: String,
    delimiter: String,
}

impl Default for NamePattern {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            delimiter: DEFAULT_DELIMITER.to_string(),
        }
    }
}

impl NamePattern {
    /// Create a pattern from a marker and a token delimiter
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if either string is empty
    pub fn new(marker: impl Into<String>, delimiter: impl Into<String>) -> Result<Self> {
        let marker = marker.into();
        let delimiter = delimiter.into();

        if marker.is_empty() {
            return Err(invalid_parameter("marker", &marker, &"must not be empty"));
        }
        if delimiter.is_empty() {
            return Err(invalid_parameter(
                "delimiter",
                &delimiter,
                &"must not be empty",
            ));
        }

        Ok(Self { marker, delimiter })
    }

    /// Substring selecting landscape files
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Separator between the generation and simulation tokens
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Whether the file name of `path` contains the marker
    pub fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.contains(self.marker.as_str()))
    }

    /// Extract the identifier from the file name of `path`
    ///
    /// # Errors
    ///
    /// Returns `PatternMismatch` if the file name lacks the marker, does not
    /// contain exactly one delimiter after it, or leaves a token empty
    pub fn parse(&self, path: &Path) -> Result<ImageIdentifier> {
        let mismatch = |reason: String| MoranError::PatternMismatch {
            path: path.to_path_buf(),
            reason,
        };

        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| mismatch("file name is missing or not valid UTF-8".to_string()))?;

        let tail = name
            .split(self.marker.as_str())
            .nth(1)
            .ok_or_else(|| mismatch(format!("no '{}' marker", self.marker)))?;

        let stem = tail.split('.').next().unwrap_or_default();
        let mut tokens = stem.split(self.delimiter.as_str());

        let (Some(generation), Some(simulation), None) =
            (tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(mismatch(format!(
                "expected exactly one '{}' delimiter in '{stem}'",
                self.delimiter
            )));
        };

        if generation.is_empty() || simulation.is_empty() {
            return Err(mismatch(format!(
                "empty generation or simulation token in '{stem}'"
            )));
        }

        Ok(ImageIdentifier {
            generation: generation.to_string(),
            simulation: simulation.to_string(),
        })
    }
}
