// file: src/pipeline/progress.rs
// description: progress tracking and statistics reporting for a classification run
// reference: uses indicatif for progress bars and tracks processing metrics

use crate::models::ClassificationResult;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub records_processed: usize,
    pub classification_failures: usize,
    pub duplicates_skipped: usize,
    pub duration_secs: u64,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records_per_minute(&self) -> f64 {
        if self.duration_secs == 0 {
            return 0.0;
        }
        self.records_processed as f64 * 60.0 / self.duration_secs as f64
    }

    /// Share of processed records that received a model label.
    pub fn success_rate(&self) -> f64 {
        if self.records_processed == 0 {
            return 0.0;
        }
        let labeled = self
            .records_processed
            .saturating_sub(self.classification_failures);
        (labeled as f64 / self.records_processed as f64) * 100.0
    }
}

pub struct ProgressTracker {
    multi_progress: MultiProgress,
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    records_processed: AtomicUsize,
    classification_failures: AtomicUsize,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn new(total_records: usize, visible: bool, colored: bool) -> Self {
        let multi_progress = if visible {
            MultiProgress::new()
        } else {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        };

        let main_bar = create_progress_bar(&multi_progress, total_records as u64, colored);
        let detail_bar = create_detail_bar(&multi_progress);

        Self {
            multi_progress,
            main_bar,
            detail_bar,
            records_processed: AtomicUsize::new(0),
            classification_failures: AtomicUsize::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn hidden(total_records: usize) -> Self {
        Self::new(total_records, false, false)
    }

    pub fn record(&self, result: &ClassificationResult) {
        self.records_processed.fetch_add(1, Ordering::SeqCst);
        if result.is_fallback() {
            self.classification_failures.fetch_add(1, Ordering::SeqCst);
        }
        self.main_bar.inc(1);
        self.update_detail_bar(result);
    }

    pub fn set_message(&self, message: String) {
        self.main_bar.set_message(message);
    }

    /// Run `f` with the bars hidden so log lines do not tear them.
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.multi_progress.suspend(f)
    }

    pub fn finish(&self) {
        self.main_bar.finish_with_message("Categorization complete");
        self.detail_bar.finish_and_clear();
    }

    pub fn get_stats(&self) -> RunStats {
        RunStats {
            records_processed: self.records_processed.load(Ordering::SeqCst),
            classification_failures: self.classification_failures.load(Ordering::SeqCst),
            duplicates_skipped: 0,
            duration_secs: self.start_time.elapsed().as_secs(),
        }
    }

    fn update_detail_bar(&self, last: &ClassificationResult) {
        let failures = self.classification_failures.load(Ordering::SeqCst);
        let message = format!("Last: {} | Uncategorized by failure: {}", last, failures);
        self.detail_bar.set_message(message);
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

fn create_progress_bar(multi_progress: &MultiProgress, total: u64, colored: bool) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(total));
    if colored {
        bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
                )
                .expect("Failed to create progress bar template")
                .progress_chars("█▓▒░"),
        );
    } else {
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({eta}) {msg}")
                .expect("Failed to create progress bar template")
                .progress_chars("=>-"),
        );
    }
    bar
}

fn create_detail_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(0));
    let style = ProgressStyle::default_bar()
        .template("{msg}")
        .expect("Failed to create detail bar template");
    bar.set_style(style);
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_stats_calculations() {
        let mut stats = RunStats::new();
        stats.records_processed = 120;
        stats.classification_failures = 12;
        stats.duration_secs = 60;

        assert_eq!(stats.records_per_minute(), 120.0);
        assert!((stats.success_rate() - 90.0).abs() < 0.01);
    }

    #[test]
    fn test_run_stats_zero() {
        let stats = RunStats::new();
        assert_eq!(stats.records_per_minute(), 0.0);
        assert_eq!(stats.success_rate(), 0.0);
    }

    #[test]
    fn test_progress_tracker_counts_fallbacks() {
        let tracker = ProgressTracker::hidden(3);

        tracker.record(&ClassificationResult::Labeled("AI / Tools".to_string()));
        tracker.record(&ClassificationResult::Fallback);
        tracker.record(&ClassificationResult::Labeled("DSA / Blogs".to_string()));

        let stats = tracker.get_stats();
        assert_eq!(stats.records_processed, 3);
        assert_eq!(stats.classification_failures, 1);
    }

    #[test]
    fn test_suspend_returns_value() {
        let tracker = ProgressTracker::hidden(1);
        assert_eq!(tracker.suspend(|| 42), 42);
    }
}
