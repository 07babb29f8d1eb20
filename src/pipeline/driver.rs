// file: src/pipeline/driver.rs
// description: sequential batch classification with resumable, per-record persistence
// reference: orchestrates load, filter, classify, append and summary steps

use crate::classifier::{Classifier, PromptBuilder};
use crate::config::{Config, PipelineConfig};
use crate::error::{PipelineError, Result};
use crate::models::{BookmarkRecord, ClassificationResult};
use crate::pipeline::progress::{ProgressTracker, RunStats};
use crate::pipeline::summary::{CategoryDistribution, RunSummary};
use crate::storage::{InputTable, OutputWriter, ResumeTracker};
use crate::utils::Validator;
use crate::utils::logging::{format_info, format_step, format_success, format_warning};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

const TITLE_DISPLAY_CHARS: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Loading,
    Filtering,
    Iterating,
    Done,
    Failed,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::Loading => "loading",
            RunPhase::Filtering => "filtering",
            RunPhase::Iterating => "iterating",
            RunPhase::Done => "done",
            RunPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub enum RunOutcome {
    /// Every input url was already in the output store.
    NothingToDo { already_processed: usize },
    Completed(RunReport),
}

#[derive(Debug)]
pub struct RunReport {
    pub stats: RunStats,
    pub summary: RunSummary,
}

pub struct BatchDriver {
    classifier: Arc<dyn Classifier>,
    prompt: PromptBuilder,
    pipeline: PipelineConfig,
    colored: bool,
}

impl BatchDriver {
    pub fn new(classifier: Arc<dyn Classifier>, config: &Config) -> Self {
        Self {
            classifier,
            prompt: PromptBuilder::new(&config.taxonomy, &config.classifier),
            pipeline: config.pipeline.clone(),
            colored: true,
        }
    }

    pub fn with_color(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// Classify every input bookmark not yet present in the output store.
    ///
    /// Classification failures never end the run. Any other error does, and
    /// comes back as [`PipelineError::RunFailed`] naming the phase; rows
    /// appended before it stay on disk.
    pub async fn run(&self) -> Result<RunOutcome> {
        let mut phase = RunPhase::Loading;
        let result = self.execute(&mut phase).await;

        result.map_err(|source| {
            debug!("Run phase {} -> {}", phase, RunPhase::Failed);
            PipelineError::RunFailed {
                phase,
                source: Box::new(source),
            }
        })
    }

    async fn execute(&self, phase: &mut RunPhase) -> Result<RunOutcome> {
        debug!("Run phase -> {}", phase);
        let input = InputTable::load(&self.pipeline.input_file)?;
        let tracker = ResumeTracker::new(&self.pipeline.output_file);
        let mut ledger = tracker.open(&input.schema)?;
        info!(
            "Loaded {} bookmarks from {}",
            input.len(),
            self.pipeline.input_file.display()
        );

        enter(phase, RunPhase::Filtering);
        let InputTable { schema, records } = input;
        let (remaining, duplicates) = ledger.filter_remaining(records);

        if duplicates > 0 {
            warn!(
                "{} bookmarks repeat a url earlier in the input and will be skipped",
                duplicates
            );
        }

        if remaining.is_empty() {
            info!("{}", format_info("All bookmarks have already been processed!"));
            enter(phase, RunPhase::Done);
            return Ok(RunOutcome::NothingToDo {
                already_processed: ledger.len(),
            });
        }

        let total = remaining.len();
        info!("Processing {} remaining bookmarks...", total);

        enter(phase, RunPhase::Iterating);
        let mut writer = OutputWriter::open_append(tracker.output_path(), &schema)?;
        let progress = ProgressTracker::new(total, self.pipeline.show_progress, self.colored);
        let throttle = Duration::from_millis(self.pipeline.throttle_ms);

        for (idx, mut record) in remaining.into_iter().enumerate() {
            let position = idx + 1;
            let title = Validator::truncate_text(&record.title, TITLE_DISPLAY_CHARS);

            progress.set_message(title.clone());
            progress.suspend(|| info!("{}", format_step(position, total, &title)));

            let result = self.classify(&record).await;

            record.assign_folder(result.label());
            writer.append(&record)?;
            ledger.record(&record.url, result.label());
            progress.record(&result);

            progress.suspend(|| {
                if result.is_fallback() {
                    warn!("{}", format_warning(&format!("Categorized as: {}", result)));
                } else {
                    info!("{}", format_success(&format!("Categorized as: {}", result)));
                }
            });

            if position < total && !throttle.is_zero() {
                tokio::time::sleep(throttle).await;
            }
        }

        progress.finish();
        let mut stats = progress.get_stats();
        stats.duplicates_skipped = duplicates;

        enter(phase, RunPhase::Done);
        info!(
            "Categorization complete. {} rows appended to {}",
            writer.rows_written(),
            writer.path().display()
        );

        let distribution = CategoryDistribution::from_output(tracker.output_path())?;
        let summary = RunSummary::new(distribution, ledger.labels().iter().cloned());

        Ok(RunOutcome::Completed(RunReport { stats, summary }))
    }

    async fn classify(&self, record: &BookmarkRecord) -> ClassificationResult {
        let request = self.prompt.build(record);

        match self.classifier.classify(&request).await {
            Ok(label) => ClassificationResult::Labeled(label),
            Err(e) => {
                warn!(
                    "Error getting category for bookmark {} via {}: {}",
                    record.title,
                    self.classifier.name(),
                    e
                );
                ClassificationResult::Fallback
            }
        }
    }
}

fn enter(phase: &mut RunPhase, next: RunPhase) {
    debug!("Run phase {} -> {}", phase, next);
    *phase = next;
}
