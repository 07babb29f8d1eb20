// file: src/models/bookmark.rs
// description: bookmark record keyed by url, carrying its full source row
// reference: internal data structures

use serde::Serialize;

/// One bookmark row.
///
/// `fields` holds every column of the source row in schema order, so that
/// columns this tool does not interpret are written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookmarkRecord {
    pub title: String,
    pub excerpt: String,
    pub url: String,
    pub folder: Option<String>,
    #[serde(skip)]
    pub(crate) fields: Vec<String>,
}

impl BookmarkRecord {
    pub(crate) fn from_fields(
        title: String,
        excerpt: String,
        url: String,
        fields: Vec<String>,
    ) -> Self {
        Self {
            title,
            excerpt,
            url,
            folder: None,
            fields,
        }
    }

    /// Attach the classifier's label. A record is labeled exactly once.
    pub fn assign_folder(&mut self, label: impl Into<String>) {
        debug_assert!(self.folder.is_none(), "record {} already labeled", self.url);
        self.folder = Some(label.into());
    }

    pub fn is_labeled(&self) -> bool {
        self.folder.is_some()
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> BookmarkRecord {
        BookmarkRecord::from_fields(
            "Intro to Big-O".to_string(),
            String::new(),
            "https://a.example/x".to_string(),
            vec![
                "Intro to Big-O".to_string(),
                String::new(),
                "https://a.example/x".to_string(),
                String::new(),
            ],
        )
    }

    #[test]
    fn test_new_record_is_unlabeled() {
        let record = record();
        assert!(!record.is_labeled());
        assert_eq!(record.fields().len(), 4);
    }

    #[test]
    fn test_assign_folder() {
        let mut record = record();
        record.assign_folder("DSA / Tutorials");
        assert_eq!(record.folder.as_deref(), Some("DSA / Tutorials"));
        assert!(record.is_labeled());
    }
}
