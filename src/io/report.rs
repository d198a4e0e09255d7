//! Tabular output of per-image results

use crate::analysis::statistics::Moran;
use crate::io::error::{MoranError, Result, WithPath};
use crate::io::naming::ImageIdentifier;
use serde::Serialize;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Column header of CSV reports
pub const CSV_HEADER: &str =
    "generation,simulation,path,moran_i,expected,z_norm,p_norm,z_rand,p_rand,p_sim";

/// One analyzed image
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRecord {
    /// Generation and simulation the image belongs to
    pub identifier: ImageIdentifier,
    /// Image the grid was decoded from
    pub path: PathBuf,
    /// Statistic with its inference
    pub statistic: Moran,
}

impl ResultRecord {
    /// Observed Moran's I
    pub const fn value(&self) -> f64 {
        self.statistic.i
    }
}

/// Serialization used for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Comma-separated values with a header row
    #[default]
    Csv,
    /// Pretty-printed JSON array
    Json,
}

/// Write `records` to `writer` in input order
///
/// # Errors
///
/// Returns `FileSystem` if writing fails or `Report` if JSON serialization fails
pub fn write_records<W: Write>(
    records: &[ResultRecord],
    format: OutputFormat,
    mut writer: W,
) -> Result<()> {
    match format {
        OutputFormat::Csv => write_csv(records, &mut writer)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, records)?;
            writeln!(writer)?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Write `records` to `output`, or to standard output when no path is given
///
/// # Errors
///
/// Returns `FileSystem` if the file or its parent directory cannot be created
/// or written, or `Report` if JSON serialization fails
pub fn write_report(
    records: &[ResultRecord],
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    let Some(path) = output else {
        return write_records(records, format, std::io::stdout().lock());
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| MoranError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    let file = File::create(path).map_err(|e| MoranError::FileSystem {
        path: path.to_path_buf(),
        operation: "create report",
        source: e,
    })?;

    write_records(records, format, BufWriter::new(file)).with_path(path)
}

fn write_csv<W: Write>(records: &[ResultRecord], writer: &mut W) -> Result<()> {
    writeln!(writer, "{CSV_HEADER}")?;

    for record in records {
        let statistic = &record.statistic;
        let path = record.path.display().to_string();
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{},{},{}",
            csv_field(&record.identifier.generation),
            csv_field(&record.identifier.simulation),
            csv_field(&path),
            statistic.i,
            statistic.expected,
            optional(statistic.normal.map(|n| n.z_score)),
            optional(statistic.normal.map(|n| n.p_value)),
            optional(statistic.randomization.map(|r| r.z_score)),
            optional(statistic.randomization.map(|r| r.p_value)),
            optional(statistic.permutation.map(|p| p.p_value)),
        )?;
    }

    Ok(())
}

// Quote fields holding separators, quotes or line breaks
fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
