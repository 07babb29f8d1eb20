// file: src/storage/mod.rs
// description: tabular input and append-only output store exports
// reference: internal module structure

pub mod ledger;
pub mod reader;
pub mod schema;
pub mod writer;

pub use ledger::{ProcessingLedger, ResumeTracker};
pub use reader::InputTable;
pub use schema::TableSchema;
pub use writer::OutputWriter;
