// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

mod driver;
mod progress;
mod summary;

pub use driver::{BatchDriver, RunOutcome, RunPhase, RunReport};
pub use progress::{ProgressTracker, RunStats};
pub use summary::{CategoryCount, CategoryDistribution, RunSummary};
