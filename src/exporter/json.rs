// file: src/exporter/json.rs
// description: json export of category summaries

use crate::error::{PipelineError, Result};
use crate::pipeline::RunSummary;
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct JsonExporter {
    output_path: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct SummaryExport<'a> {
    pub exported_at: String,
    pub source: String,
    #[serde(flatten)]
    pub summary: &'a RunSummary,
}

impl JsonExporter {
    pub fn new(output_path: impl Into<PathBuf>) -> Result<Self> {
        let output_path = output_path.into();
        if let Some(parent) = output_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { output_path })
    }

    pub fn export_summary(&self, summary: &RunSummary, source: &Path, pretty: bool) -> Result<()> {
        let export = SummaryExport {
            exported_at: Utc::now().to_rfc3339(),
            source: source.display().to_string(),
            summary,
        };

        let contents = if pretty {
            serde_json::to_string_pretty(&export)
        } else {
            serde_json::to_string(&export)
        }
        .map_err(|e| PipelineError::Serialization(e.to_string()))?;

        fs::write(&self.output_path, contents).map_err(|source| PipelineError::FileOperation {
            path: self.output_path.clone(),
            source,
        })?;

        info!(
            "Exported summary of {} bookmarks to {}",
            summary.distribution.total_rows,
            self.output_path.display()
        );
        Ok(())
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}
