// file: src/storage/ledger.rs
// description: resume support, tracking which urls already have a stored label
// reference: hash-based filtering of already processed inputs

use crate::error::{PipelineError, Result};
use crate::models::BookmarkRecord;
use crate::storage::schema::{TableSchema, column_index, FOLDER_COLUMN, URL_COLUMN};
use crate::storage::writer::OutputWriter;
use csv::ReaderBuilder;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Urls and labels already present in the output store.
///
/// Only grows during a run.
#[derive(Debug, Clone, Default)]
pub struct ProcessingLedger {
    urls: HashSet<String>,
    labels: BTreeSet<String>,
    stored_rows: usize,
}

impl ProcessingLedger {
    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Note a record that has just been appended to the store.
    pub fn record(&mut self, url: &str, label: &str) {
        self.urls.insert(url.to_string());
        if !label.trim().is_empty() {
            self.labels.insert(label.to_string());
        }
    }

    /// Keep records whose url is not yet stored, in input order.
    ///
    /// Repeated urls within the input are kept once (first occurrence).
    /// Returns the worklist and the number of in-input duplicates dropped.
    pub fn filter_remaining(&self, records: Vec<BookmarkRecord>) -> (Vec<BookmarkRecord>, usize) {
        let mut queued = HashSet::new();
        let mut duplicates = 0;

        let remaining = records
            .into_iter()
            .filter(|record| !self.contains(&record.url))
            .filter(|record| {
                let first = queued.insert(record.url.clone());
                if !first {
                    duplicates += 1;
                }
                first
            })
            .collect();

        (remaining, duplicates)
    }

    pub fn labels(&self) -> &BTreeSet<String> {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Rows found in the store when the ledger was opened.
    pub fn stored_rows(&self) -> usize {
        self.stored_rows
    }
}

pub struct ResumeTracker {
    output_path: PathBuf,
}

impl ResumeTracker {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    /// Build the ledger from the output store.
    ///
    /// A missing or zero-length store is created with the header row, so
    /// later appends share one layout. An existing store whose header does
    /// not match `schema` is rejected.
    pub fn open(&self, schema: &TableSchema) -> Result<ProcessingLedger> {
        if !self.has_store()? {
            OutputWriter::create_with_header(&self.output_path, schema)?;
            return Ok(ProcessingLedger::default());
        }

        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.output_path)?;
        let headers = reader.headers()?.clone();

        if !schema.matches(&headers) {
            return Err(PipelineError::Schema(format!(
                "output {} has columns [{}] but input expects [{}]",
                self.output_path.display(),
                headers.iter().collect::<Vec<_>>().join(", "),
                schema.headers().join(", ")
            )));
        }

        let url_idx = schema.url_index();
        let folder_idx = schema.folder_index();
        let mut ledger = ProcessingLedger::default();

        for row in reader.records() {
            let row = row?;
            ledger.stored_rows += 1;

            let url = row.get(url_idx).unwrap_or_default().trim();
            if !url.is_empty() {
                ledger.urls.insert(url.to_string());
            }

            let label = row.get(folder_idx).unwrap_or_default();
            if !label.trim().is_empty() {
                ledger.labels.insert(label.to_string());
            }
        }

        info!(
            "Found {} already processed bookmarks in {}",
            ledger.len(),
            self.output_path.display()
        );
        Ok(ledger)
    }

    fn has_store(&self) -> Result<bool> {
        match std::fs::metadata(&self.output_path) {
            Ok(meta) if meta.len() > 0 => Ok(true),
            Ok(_) => {
                debug!("Output store {} is empty", self.output_path.display());
                Ok(false)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(PipelineError::FileOperation {
                path: self.output_path.clone(),
                source,
            }),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

/// Index of the url and folder columns in an arbitrary stored table.
pub(crate) fn stored_columns(headers: &csv::StringRecord) -> Result<(usize, usize)> {
    let names: Vec<&str> = headers.iter().collect();
    let url = column_index(&names, URL_COLUMN);
    let folder = column_index(&names, FOLDER_COLUMN);

    match (url, folder) {
        (Some(url), Some(folder)) => Ok((url, folder)),
        _ => Err(PipelineError::Schema(format!(
            "output store needs '{}' and '{}' columns (found: {})",
            URL_COLUMN,
            FOLDER_COLUMN,
            names.join(", ")
        ))),
    }
}
