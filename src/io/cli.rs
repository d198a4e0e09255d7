//! Command-line interface for batch Moran's I over landscape image folders

use crate::analysis::batch::{BatchOptions, summarize_batch};
use crate::analysis::cache::WeightsCache;
use crate::analysis::weights::{Contiguity, WeightTransform};
use crate::io::configuration::{
    DEFAULT_DELIMITER, DEFAULT_LOG_FILTER, DEFAULT_MARKER, DEFAULT_PERMUTATIONS, DEFAULT_SEED,
    QUIET_LOG_FILTER,
};
use crate::io::discovery::collect_images;
use crate::io::error::{MoranError, Result};
use crate::io::image::{Channel, ChannelDecoder};
use crate::io::naming::{ImageIdentifier, NamePattern};
use crate::io::progress::ProgressManager;
use crate::io::report::{OutputFormat, ResultRecord, write_report};
use crate::spatial::Grid;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "moranscape")]
#[command(
    author,
    version,
    about = "Measure spatial autocorrelation (Moran's I) of simulated food landscapes"
)]
/// Command-line arguments for the landscape analysis tool
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Output directories (searched recursively) or single image files
    #[arg(value_name = "TARGET", required = true)]
    pub targets: Vec<PathBuf>,

    /// Substring selecting landscape images by file name
    #[arg(short, long, default_value = DEFAULT_MARKER)]
    pub marker: String,

    /// Separator between generation and simulation in file names
    #[arg(short, long, default_value = DEFAULT_DELIMITER)]
    pub delimiter: String,

    /// Image channel holding the landscape values
    #[arg(short, long, value_enum, default_value_t = Channel::Green)]
    pub channel: Channel,

    /// Analyze at most this many images per target (after sorting)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Neighbor relation of the lattice
    #[arg(long, value_enum, default_value_t = Contiguity::Rook)]
    pub contiguity: Contiguity,

    /// Weight scaling of the lattice
    #[arg(short, long, value_enum, default_value_t = WeightTransform::Binary)]
    pub transform: WeightTransform,

    /// Random permutations per image for the pseudo p-value (0 disables)
    #[arg(short, long, default_value_t = DEFAULT_PERMUTATIONS)]
    pub permutations: usize,

    /// Seed for the permutation test
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// Write the report to this file instead of standard output
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Abort on undecodable images and unparsable names instead of skipping them
    #[arg(long)]
    pub strict: bool,

    /// Compute each batch on all cores
    #[arg(long)]
    pub parallel: bool,

    /// Suppress progress output and informational logs
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Log filter used when `RUST_LOG` is not set
    pub const fn log_filter(&self) -> &'static str {
        if self.quiet {
            QUIET_LOG_FILTER
        } else {
            DEFAULT_LOG_FILTER
        }
    }

    /// File name layout from `--marker` and `--delimiter`
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if either string is empty
    pub fn pattern(&self) -> Result<NamePattern> {
        NamePattern::new(self.marker.as_str(), self.delimiter.as_str())
    }

    /// Batch evaluation settings from `--parallel`, `--permutations` and `--seed`
    pub const fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            parallel: self.parallel,
            permutations: self.permutations,
            seed: self.seed,
        }
    }
}

/// Orchestrates discovery, decoding and analysis of every target
pub struct BatchProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
    cache: WeightsCache,
    decoder: ChannelDecoder,
}

impl BatchProcessor {
    /// Create a new batch processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);
        let decoder = ChannelDecoder::new(cli.channel);

        Self {
            cli,
            progress_manager,
            cache: WeightsCache::new(),
            decoder,
        }
    }

    /// Weights built so far, shared across targets of equal side length
    pub const fn cache(&self) -> &WeightsCache {
        &self.cache
    }

    /// Analyze every target and return the records in target then path order
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The name pattern or a parameter is invalid (`InvalidParameter`)
    /// - A target cannot be read (`FileSystem`)
    /// - An image is not a square lattice of a supported size, or differs in
    ///   side from the rest of its batch (structural errors)
    /// - An image has constant values (`DegenerateInput`)
    /// - `--strict` is set and an image cannot be decoded or its name parsed
    pub fn process(&mut self) -> Result<Vec<ResultRecord>> {
        let pattern = self.cli.pattern()?;
        let targets = self.cli.targets.clone();
        let mut records = Vec::new();

        for target in &targets {
            records.extend(self.process_target(target, &pattern)?);
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }

        tracing::debug!(
            hits = self.cache.stats.hits,
            misses = self.cache.stats.misses,
            "weights cache"
        );

        Ok(records)
    }

    /// Analyze every target and write the report
    ///
    /// # Errors
    ///
    /// Returns the errors of [`BatchProcessor::process`], or `FileSystem` and
    /// `Report` errors from writing the output
    pub fn run(&mut self) -> Result<()> {
        let records = self.process()?;
        write_report(&records, self.cli.format, self.cli.output.as_deref())
    }

    fn process_target(
        &mut self,
        target: &Path,
        pattern: &NamePattern,
    ) -> Result<Vec<ResultRecord>> {
        let start_time = Instant::now();
        let files = collect_images(target, pattern, self.cli.limit)?;

        if files.is_empty() {
            tracing::warn!(
                directory = %target.display(),
                marker = pattern.marker(),
                "no matching images"
            );
            return Ok(Vec::new());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.begin_batch(target, files.len());
        }

        let mut loaded: Vec<(ImageIdentifier, PathBuf)> = Vec::with_capacity(files.len());
        let mut grids: Vec<Grid> = Vec::with_capacity(files.len());

        for file in files {
            if let Some(ref pm) = self.progress_manager {
                pm.start_file(&file);
            }

            match self.load(&file, pattern) {
                Ok((identifier, grid)) => {
                    if let Some(first) = grids.first()
                        && first.side() != grid.side()
                    {
                        tracing::error!(path = %file.display(), "side differs from batch");
                        return Err(MoranError::DimensionMismatch {
                            expected: first.side(),
                            found: grid.side(),
                        });
                    }
                    if let Some(ref pm) = self.progress_manager {
                        pm.complete_file();
                    }
                    loaded.push((identifier, file));
                    grids.push(grid);
                }
                Err(error) if error.is_structural() || self.cli.strict => {
                    tracing::error!(path = %file.display(), "batch aborted");
                    return Err(error);
                }
                Err(error) => {
                    tracing::warn!("skipping: {error}");
                    if let Some(ref pm) = self.progress_manager {
                        pm.skip_file(&file);
                    }
                }
            }
        }

        let Some(side) = grids.first().map(Grid::side) else {
            tracing::warn!(directory = %target.display(), "every image was skipped");
            return Ok(Vec::new());
        };

        let cached = self.cache.len();
        let weights = self
            .cache
            .get_or_build(side, self.cli.contiguity, self.cli.transform)?;
        if self.cache.len() == cached {
            tracing::info!(side, "reusing lattice weights");
        }

        if let Some(ref pm) = self.progress_manager {
            pm.computing(grids.len());
        }

        let statistics = summarize_batch(&grids, &weights, self.cli.batch_options())?;

        let records: Vec<ResultRecord> = loaded
            .into_iter()
            .zip(statistics)
            .map(|((identifier, path), statistic)| {
                tracing::debug!(
                    %identifier,
                    i = statistic.i,
                    path = %path.display(),
                    "moran"
                );
                ResultRecord {
                    identifier,
                    path,
                    statistic,
                }
            })
            .collect();

        tracing::info!(
            directory = %target.display(),
            images = records.len(),
            side,
            elapsed = ?start_time.elapsed(),
            "batch complete"
        );

        Ok(records)
    }

    fn load(&self, path: &Path, pattern: &NamePattern) -> Result<(ImageIdentifier, Grid)> {
        let identifier = pattern.parse(path)?;
        let grid = self.decoder.decode(path)?;
        Ok((identifier, grid))
    }
}
