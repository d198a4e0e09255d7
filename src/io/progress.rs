//! Per-batch progress display over the files of each target

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    let template = format!(
        "{{prefix}} [{{elapsed_precise}}] [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}"
    );
    ProgressStyle::default_bar()
        .template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Coordinates progress display for batch operations
///
/// Each target directory gets its own bar; finished bars stay visible until
/// [`ProgressManager::finish`] clears the display.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
        }
    }

    /// Start a bar for a target holding `file_count` files
    pub fn begin_batch(&mut self, target: &Path, file_count: usize) {
        if let Some(previous) = self.batch_bar.take() {
            previous.finish();
        }

        let bar = ProgressBar::new(file_count as u64);
        bar.set_style(BATCH_STYLE.clone());
        bar.set_prefix(target.display().to_string());
        self.batch_bar = Some(self.multi_progress.add(bar));
    }

    /// Show the file currently being decoded
    pub fn start_file(&self, path: &Path) {
        if let Some(ref bar) = self.batch_bar {
            let display_name = path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();
            bar.set_message(display_name);
        }
    }

    /// Mark the current file as loaded
    pub fn complete_file(&self) {
        if let Some(ref bar) = self.batch_bar {
            bar.inc(1);
        }
    }

    /// Mark the current file as skipped
    pub fn skip_file(&self, path: &Path) {
        if let Some(ref bar) = self.batch_bar {
            bar.println(format!("skipped {}", path.display()));
            bar.inc(1);
        }
    }

    /// Report the computation phase of the current batch
    pub fn computing(&self, grid_count: usize) {
        if let Some(ref bar) = self.batch_bar {
            bar.set_message(format!("computing Moran's I for {grid_count} grids"));
        }
    }

    /// Clean up all progress displays
    pub fn finish(&mut self) {
        if let Some(bar) = self.batch_bar.take() {
            bar.finish_with_message("done");
        }
        let _ = self.multi_progress.clear();
    }
}
