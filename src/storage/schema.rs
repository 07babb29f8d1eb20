// file: src/storage/schema.rs
// description: column layout shared by the input and output stores
// reference: schema management for the record store

use crate::error::{PipelineError, Result};
use crate::models::BookmarkRecord;
use csv::StringRecord;
use tracing::warn;

pub const TITLE_COLUMN: &str = "title";
pub const EXCERPT_COLUMN: &str = "excerpt";
pub const URL_COLUMN: &str = "url";
pub const FOLDER_COLUMN: &str = "folder";

/// Column layout of a bookmark table.
///
/// The output store always uses the input's columns, in input order, with
/// `folder` appended when the input lacks it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    headers: Vec<String>,
    input_columns: usize,
    title: usize,
    excerpt: Option<usize>,
    url: usize,
    folder: usize,
}

impl TableSchema {
    pub fn from_input_headers(headers: &StringRecord) -> Result<Self> {
        let mut headers: Vec<String> = headers.iter().map(str::to_string).collect();
        let input_columns = headers.len();

        let title = require_column(&headers, TITLE_COLUMN)?;
        let url = require_column(&headers, URL_COLUMN)?;
        let excerpt = column_index(&headers, EXCERPT_COLUMN);
        let folder = match column_index(&headers, FOLDER_COLUMN) {
            Some(idx) => idx,
            None => {
                headers.push(FOLDER_COLUMN.to_string());
                headers.len() - 1
            }
        };

        Ok(Self {
            headers,
            input_columns,
            title,
            excerpt,
            url,
            folder,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn url_index(&self) -> usize {
        self.url
    }

    pub fn folder_index(&self) -> usize {
        self.folder
    }

    /// True when an existing table's header row lines up with this layout.
    pub fn matches(&self, headers: &StringRecord) -> bool {
        headers.len() == self.headers.len()
            && headers
                .iter()
                .zip(&self.headers)
                .all(|(found, expected)| found.trim() == expected.trim())
    }

    /// Map a raw row onto a record. Short rows are padded with blanks;
    /// fields beyond the header are dropped with a warning.
    pub fn record_from_row(&self, row: &StringRecord) -> BookmarkRecord {
        if row.len() > self.input_columns {
            warn!(
                "Row {} has {} fields but the table has {} columns; dropping the extra fields",
                row.position().map(|p| p.line()).unwrap_or_default(),
                row.len(),
                self.input_columns
            );
        }

        let mut fields: Vec<String> = row
            .iter()
            .take(self.input_columns)
            .map(str::to_string)
            .collect();
        fields.resize(self.headers.len(), String::new());

        let title = fields[self.title].clone();
        let excerpt = self
            .excerpt
            .map(|idx| fields[idx].clone())
            .unwrap_or_default();
        let url = fields[self.url].trim().to_string();

        BookmarkRecord::from_fields(title, excerpt, url, fields)
    }

    /// Output row for a record: original values with `folder` filled in.
    pub fn row_for(&self, record: &BookmarkRecord) -> Vec<String> {
        let mut row = record.fields().to_vec();
        row.resize(self.headers.len(), String::new());
        if let Some(folder) = &record.folder {
            row[self.folder] = folder.clone();
        }
        row
    }
}

pub fn column_index<S: AsRef<str>>(headers: &[S], name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.as_ref().trim().eq_ignore_ascii_case(name))
}

fn require_column(headers: &[String], name: &str) -> Result<usize> {
    column_index(headers, name).ok_or_else(|| {
        PipelineError::Schema(format!(
            "missing required column '{}' (found: {})",
            name,
            headers.join(", ")
        ))
    })
}
