//! Progress display for the pairwise lag pass of one or more intensity runs

use crate::io::configuration::{PROGRESS_BAR_WIDTH, PROGRESS_UPDATE_INTERVAL};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::LazyLock;

/// Coordinates progress display for a batch of Flow-LISA runs
///
/// Shows one bar for the rows of the current run and, when more than one
/// intensity column is analysed, an extra bar counting finished runs
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    row_bar: Option<ProgressBar>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

static ROW_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{prefix}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} flows ({{eta}})"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Intensity columns: [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            row_bar: None,
        }
    }

    /// Prepare bars for the given number of runs
    pub fn initialize(&mut self, run_count: usize) {
        if run_count > 1 {
            let batch_bar = ProgressBar::new(run_count as u64);
            batch_bar.set_style(BATCH_STYLE.clone());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
        }
    }

    /// Start the row bar for a run over `flow_count` flows
    pub fn start_run(&mut self, name: &str, flow_count: usize) {
        let bar = ProgressBar::new(flow_count as u64);
        bar.set_style(ROW_STYLE.clone());
        bar.set_prefix(name.to_string());
        self.row_bar = Some(self.multi_progress.add(bar));
    }

    /// Report the number of finished lag rows
    pub fn update_rows(&self, rows_done: usize) {
        if let Some(ref bar) = self.row_bar {
            let length = bar.length().unwrap_or(0) as usize;
            // Throttled; the final row always lands
            if rows_done % PROGRESS_UPDATE_INTERVAL == 0 || rows_done == length {
                bar.set_position(rows_done as u64);
            }
        }
    }

    /// Mark the current run as completed
    pub fn complete_run(&mut self) {
        if let Some(bar) = self.row_bar.take() {
            bar.finish_and_clear();
            self.multi_progress.remove(&bar);
        }
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }
    }

    /// Position of the row bar while a run is active
    pub fn row_position(&self) -> Option<u64> {
        self.row_bar.as_ref().map(ProgressBar::position)
    }

    /// Runs counted as finished, when more than one run was announced
    pub fn completed_runs(&self) -> Option<u64> {
        self.batch_bar.as_ref().map(ProgressBar::position)
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message("All intensity columns processed");
        }
        let _ = self.multi_progress.clear();
    }
}
