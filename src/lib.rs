// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod classifier;
pub mod config;
pub mod error;
pub mod exporter;
pub mod models;
pub mod pipeline;
pub mod storage;
pub mod utils;

pub use classifier::{
    ClassificationRequest, Classifier, MockClassifier, OpenAiClassifier, PromptBuilder,
};
pub use config::{ClassifierConfig, Config, EnvOverrides, PipelineConfig};
pub use error::{ClassifierError, PipelineError, Result};
pub use exporter::{JsonExporter, SummaryExport};
pub use models::{BookmarkRecord, Category, CategoryTaxonomy, ClassificationResult, UNCATEGORIZED};
pub use pipeline::{
    BatchDriver, CategoryCount, CategoryDistribution, ProgressTracker, RunOutcome, RunPhase,
    RunReport, RunStats, RunSummary,
};
pub use storage::{InputTable, OutputWriter, ProcessingLedger, ResumeTracker, TableSchema};
pub use utils::Validator;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let config = Config::default_config();
        let _builder = PromptBuilder::new(&config.taxonomy, &config.classifier);
        assert_eq!(UNCATEGORIZED, "Uncategorized");
    }
}
