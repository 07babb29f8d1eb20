// file: src/pipeline/summary.rs
// description: label distribution computed from the output store
// reference: end-of-run statistics reporting

use crate::error::Result;
use crate::models::main_category;
use crate::storage::ledger::stored_columns;
use csv::ReaderBuilder;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

/// Per-label counts, largest first, ties broken alphabetically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryDistribution {
    pub total_rows: usize,
    pub counts: Vec<CategoryCount>,
}

impl CategoryDistribution {
    /// Blank labels count toward `total_rows` only.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut total_rows = 0;
        let mut tally: HashMap<String, usize> = HashMap::new();

        for label in labels {
            total_rows += 1;
            let label = label.as_ref().trim();
            if !label.is_empty() {
                *tally.entry(label.to_string()).or_default() += 1;
            }
        }

        Self {
            total_rows,
            counts: sorted_counts(tally),
        }
    }

    /// Re-read the whole output store and count its `folder` column.
    pub fn from_output(path: &Path) -> Result<Self> {
        let mut reader = ReaderBuilder::new().flexible(true).from_path(path)?;
        let (_, folder_idx) = stored_columns(reader.headers()?)?;

        let mut labels = Vec::new();
        for row in reader.records() {
            labels.push(row?.get(folder_idx).unwrap_or_default().to_string());
        }

        Ok(Self::from_labels(labels))
    }

    pub fn count_for(&self, label: &str) -> usize {
        self.counts
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.count)
            .unwrap_or(0)
    }

    pub fn labels(&self) -> BTreeSet<String> {
        self.counts.iter().map(|c| c.label.clone()).collect()
    }

    /// Counts rolled up to the first segment of each "Main / Sub" label.
    pub fn by_main_category(&self) -> Vec<CategoryCount> {
        let mut tally: HashMap<String, usize> = HashMap::new();
        for entry in &self.counts {
            *tally
                .entry(main_category(&entry.label).to_string())
                .or_default() += entry.count;
        }
        sorted_counts(tally)
    }
}

fn sorted_counts(tally: HashMap<String, usize>) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = tally
        .into_iter()
        .map(|(label, count)| CategoryCount { label, count })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    counts
}

/// What a finished run reports.
///
/// `categories` comes from the labels seen before and during the run,
/// while `distribution` is recounted from the store on disk.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub distribution: CategoryDistribution,
    pub categories: Vec<String>,
}

impl RunSummary {
    pub fn new<I>(distribution: CategoryDistribution, labels: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let categories: BTreeSet<String> = labels
            .into_iter()
            .filter(|l| !l.trim().is_empty())
            .collect();

        Self {
            distribution,
            categories: categories.into_iter().collect(),
        }
    }

    /// Summary of a store without a run, e.g. for `stats`.
    pub fn from_output(path: &Path) -> Result<Self> {
        let distribution = CategoryDistribution::from_output(path)?;
        let labels = distribution.labels();
        Ok(Self::new(distribution, labels))
    }

    pub fn log(&self) {
        info!("=== Category Distribution ===");
        info!("Total bookmarks: {}", self.distribution.total_rows);
        for entry in &self.distribution.counts {
            info!("  {:<45} {}", entry.label, entry.count);
        }

        info!("=== By Main Category ===");
        for entry in self.distribution.by_main_category() {
            info!("  {:<45} {}", entry.label, entry.count);
        }

        info!("=== Unique Categories Generated ===");
        for category in &self.categories {
            info!("- {}", category);
        }
        info!("=============================");
    }
}
