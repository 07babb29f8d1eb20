// file: src/storage/writer.rs
// description: append-only output store, one durable row per classified bookmark
// reference: https://docs.rs/csv

use crate::error::{PipelineError, Result};
use crate::models::BookmarkRecord;
use crate::storage::schema::TableSchema;
use csv::{Writer, WriterBuilder};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub struct OutputWriter {
    path: PathBuf,
    schema: TableSchema,
    writer: Writer<File>,
    rows_written: usize,
}

impl OutputWriter {
    /// Create (or truncate) the output store holding only the header row.
    pub fn create_with_header(path: &Path, schema: &TableSchema) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| PipelineError::FileOperation {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let file = File::create(path).map_err(|source| PipelineError::FileOperation {
            path: path.to_path_buf(),
            source,
        })?;

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        writer.write_record(schema.headers())?;
        writer.flush()?;
        writer.get_ref().sync_all()?;

        info!("Created output store {}", path.display());
        Ok(())
    }

    /// Open an existing output store for appending rows.
    ///
    /// A store whose last line lacks its newline (a torn write, or a file
    /// saved by another tool) is terminated first, so the next row never
    /// merges into the previous one.
    pub fn open_append(path: &Path, schema: &TableSchema) -> Result<Self> {
        let file_error = |source| PipelineError::FileOperation {
            path: path.to_path_buf(),
            source,
        };

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .open(path)
            .map_err(file_error)?;

        if terminate_last_line(&mut file).map_err(file_error)? {
            warn!(
                "Output store {} did not end with a newline; terminated its last row",
                path.display()
            );
        }

        Ok(Self {
            path: path.to_path_buf(),
            schema: schema.clone(),
            writer: WriterBuilder::new().has_headers(false).from_writer(file),
            rows_written: 0,
        })
    }

    /// Write one labeled record and push it to disk before returning.
    pub fn append(&mut self, record: &BookmarkRecord) -> Result<()> {
        self.writer.write_record(self.schema.row_for(record))?;
        self.writer.flush()?;
        self.writer.get_ref().sync_data()?;
        self.rows_written += 1;

        debug!("Appended {} to {}", record.url, self.path.display());
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Append a newline when a non-empty file does not already end with one.
fn terminate_last_line(file: &mut File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }

    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    if last[0] == b'\n' {
        return Ok(false);
    }

    file.write_all(b"\n")?;
    file.sync_data()?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use csv::StringRecord;
    use std::fs;
    use tempfile::TempDir;

    fn schema() -> TableSchema {
        TableSchema::from_input_headers(&StringRecord::from(vec!["title", "excerpt", "url"]))
            .unwrap()
    }

    #[test]
    fn test_header_only_store() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/out.csv");

        OutputWriter::create_with_header(&path, &schema()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "title,excerpt,url,folder\n");
    }

    #[test]
    fn test_each_append_is_visible_immediately() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.csv");
        let schema = schema();
        OutputWriter::create_with_header(&path, &schema).unwrap();

        let mut writer = OutputWriter::open_append(&path, &schema).unwrap();
        let mut record = schema.record_from_row(&StringRecord::from(vec![
            "Intro to Big-O",
            "",
            "https://a.example/x",
        ]));
        record.assign_folder("DSA / Tutorials");
        writer.append(&record).unwrap();

        assert_eq!(writer.rows_written(), 1);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "title,excerpt,url,folder\nIntro to Big-O,,https://a.example/x,DSA / Tutorials\n"
        );
    }

    #[test]
    fn test_append_after_unterminated_last_row() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.csv");
        let schema = schema();
        fs::write(&path, "title,excerpt,url,folder\nA,,https://a.example,AI / Tools").unwrap();

        let mut writer = OutputWriter::open_append(&path, &schema).unwrap();
        let mut record =
            schema.record_from_row(&StringRecord::from(vec!["B", "", "https://b.example"]));
        record.assign_folder("Cloud / Tools");
        writer.append(&record).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "title,excerpt,url,folder\n\
             A,,https://a.example,AI / Tools\n\
             B,,https://b.example,Cloud / Tools\n"
        );
    }

    #[test]
    fn test_terminated_store_is_left_unchanged() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.csv");
        OutputWriter::create_with_header(&path, &schema()).unwrap();

        OutputWriter::open_append(&path, &schema()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "title,excerpt,url,folder\n");
    }

    #[test]
    fn test_open_append_requires_existing_store() {
        let temp = TempDir::new().unwrap();
        assert!(OutputWriter::open_append(&temp.path().join("missing.csv"), &schema()).is_err());
    }
}
