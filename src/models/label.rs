// file: src/models/label.rs
// description: classification outcome and the fallback label
// reference: internal data structures

use std::fmt;

/// Label recorded when the classifier cannot produce one.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Label attached to a record after one classification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationResult {
    /// Text returned by the model, expected to look like "Category / Subcategory".
    Labeled(String),
    /// The call failed; the record is filed under [`UNCATEGORIZED`].
    Fallback,
}

impl ClassificationResult {
    pub fn label(&self) -> &str {
        match self {
            Self::Labeled(label) => label,
            Self::Fallback => UNCATEGORIZED,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback)
    }
}

/// First segment of a "Main / Sub" label, trimmed.
///
/// Only a spaced separator splits, so names such as
/// "Boilerplate/Starter Kits" stay whole.
pub fn main_category(label: &str) -> &str {
    label.split(" / ").next().unwrap_or(label).trim()
}

impl fmt::Display for ClassificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
