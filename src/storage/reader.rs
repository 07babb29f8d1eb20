// file: src/storage/reader.rs
// description: loads the input bookmark table into memory
// reference: https://docs.rs/csv

use crate::error::Result;
use crate::models::BookmarkRecord;
use crate::storage::schema::TableSchema;
use crate::utils::Validator;
use csv::ReaderBuilder;
use std::path::Path;
use tracing::{debug, warn};

pub struct InputTable {
    pub schema: TableSchema,
    pub records: Vec<BookmarkRecord>,
}

impl InputTable {
    /// Read the whole input table.
    ///
    /// Rows without a url cannot be tracked across runs and are skipped.
    pub fn load(path: &Path) -> Result<Self> {
        Validator::validate_file_path(path)?;

        let mut reader = ReaderBuilder::new().flexible(true).from_path(path)?;
        let schema = TableSchema::from_input_headers(reader.headers()?)?;

        let mut records = Vec::new();
        for (line, row) in reader.records().enumerate() {
            let record = schema.record_from_row(&row?);

            if Validator::validate_content_not_empty(&record.url).is_err() {
                warn!("Skipping row {} without a url: {}", line + 2, record.title);
                continue;
            }

            records.push(record);
        }

        debug!(
            "Loaded {} bookmarks from {} ({} columns)",
            records.len(),
            path.display(),
            schema.headers().len()
        );

        Ok(Self { schema, records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
