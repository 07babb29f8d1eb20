// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod bookmark;
pub mod label;
pub mod taxonomy;

pub use bookmark::BookmarkRecord;
pub use label::{ClassificationResult, UNCATEGORIZED, main_category};
pub use taxonomy::{Category, CategoryTaxonomy};
