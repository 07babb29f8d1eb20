// file: src/models/taxonomy.rs
// description: category tree offered to the classifier and its prompt rendering
// reference: configurable category rules

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub subcategories: Vec<String>,
    /// Free-text guidance rendered in parentheses after the name.
    #[serde(default)]
    pub note: Option<String>,
}

impl Category {
    fn new(name: &str, subcategories: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            subcategories: subcategories.iter().map(|s| s.to_string()).collect(),
            note: None,
        }
    }

    fn with_note(mut self, note: &str) -> Self {
        self.note = Some(note.to_string());
        self
    }
}

/// Ordered, read-only tree of category names.
///
/// It is serialized into the prompt once per request and never checked
/// against what the model answers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CategoryTaxonomy {
    pub categories: Vec<Category>,
}

const STANDARD: &[&str] = &["Blogs", "Tutorials", "Resources", "Tools"];

const RENDER_INDENT: &str = "    ";

fn push_line(out: &mut String, line: &str) {
    out.push_str(RENDER_INDENT);
    out.push_str(line);
    out.push('\n');
}

impl CategoryTaxonomy {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn builtin() -> Self {
        Self::new(vec![
            Category::new("DSA", &["Blogs", "Tutorials", "Resources"]),
            Category::new("Mobile Development", STANDARD),
            Category::new("UI Libraries", &[]),
            Category::new("UI Inspiration", &["General", "Aggregators"]),
            Category::new("Icon Libraries", &[]),
            Category::new("AI", STANDARD),
            Category::new("Frontend", STANDARD),
            Category::new("Backend", STANDARD),
            Category::new("Databases", STANDARD),
            Category::new("Cloud", STANDARD),
            Category::new("General", STANDARD),
            Category::new("System Design", STANDARD),
            Category::new(
                "Career",
                &["Blogs", "Tutorials", "Resources", "Job Platforms"],
            ),
            Category::new("Boilerplate/Starter Kits", &[]),
            Category::new("News Aggregators", &[]),
            Category::new("General JS", STANDARD),
            Category::new("Community", &["Profiles (e.g. LinkedIn, X, Github, etc.)"]),
            Category::new("Uncategorized", &[]).with_note(
                "Anything that doesn't fit into the other categories, but first try to find \
                 a category that is close, then if it doesn't fit into any category, then it \
                 is Uncategorized",
            ),
        ])
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Render the numbered tree listing embedded in every prompt.
    ///
    /// The block opens with a newline, every line is indented by four
    /// spaces and the text ends on a bare indent.
    pub fn render(&self) -> String {
        let mut out = String::from("\n");
        push_line(&mut out, "Categories:");

        for (idx, category) in self.categories.iter().enumerate() {
            if idx > 0 {
                out.push('\n');
            }

            let heading = match &category.note {
                Some(note) => format!("{}. {} ({})", idx + 1, category.name, note),
                None => format!("{}. {}", idx + 1, category.name),
            };
            push_line(&mut out, &heading);

            let last = category.subcategories.len().saturating_sub(1);
            for (sub_idx, sub) in category.subcategories.iter().enumerate() {
                let branch = if sub_idx == last { "└──" } else { "├──" };
                push_line(&mut out, &format!("{}{} {}", RENDER_INDENT, branch, sub));
            }
        }

        out.push_str(RENDER_INDENT);
        out
    }

    pub fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            return Err(PipelineError::Config(
                "taxonomy must contain at least one category".to_string(),
            ));
        }

        for category in &self.categories {
            if category.name.trim().is_empty() {
                return Err(PipelineError::Config(
                    "taxonomy category names cannot be empty".to_string(),
                ));
            }
            if category.subcategories.iter().any(|s| s.trim().is_empty()) {
                return Err(PipelineError::Config(format!(
                    "category '{}' has an empty subcategory",
                    category.name
                )));
            }
        }

        Ok(())
    }
}

impl Default for CategoryTaxonomy {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_taxonomy_shape() {
        let taxonomy = CategoryTaxonomy::builtin();
        assert_eq!(taxonomy.len(), 18);
        assert_eq!(taxonomy.categories[0].name, "DSA");
        assert_eq!(taxonomy.categories[17].name, "Uncategorized");
        assert!(taxonomy.validate().is_ok());
    }

    #[test]
    fn test_render_tree() {
        let taxonomy = CategoryTaxonomy::new(vec![
            Category::new("DSA", &["Blogs", "Tutorials"]),
            Category::new("UI Libraries", &[]),
        ]);

        let expected = "\n    Categories:\n    \
                        1. DSA\n        \
                        ├── Blogs\n        \
                        └── Tutorials\n\
                        \n    \
                        2. UI Libraries\n    ";
        assert_eq!(taxonomy.render(), expected);
    }

    #[test]
    fn test_builtin_render_layout() {
        let rendered = CategoryTaxonomy::builtin().render();
        assert!(rendered.starts_with(
            "\n    Categories:\n    1. DSA\n        ├── Blogs\n        ├── Tutorials\n        └── Resources\n\n    2. Mobile Development\n"
        ));
        assert!(rendered.contains("\n    3. UI Libraries\n\n    4. UI Inspiration\n"));
        assert!(rendered.contains(
            "    18. Uncategorized (Anything that doesn't fit into the other categories, but first try to find a category that is close, then if it doesn't fit into any category, then it is Uncategorized)\n    "
        ));
        assert!(rendered.ends_with("it is Uncategorized)\n    "));
        assert!(rendered.contains("        └── Profiles (e.g. LinkedIn, X, Github, etc.)\n"));
    }

    #[test]
    fn test_validate_rejects_empty() {
        assert!(CategoryTaxonomy::new(vec![]).validate().is_err());

        let blank = CategoryTaxonomy::new(vec![Category::new(" ", &[])]);
        assert!(blank.validate().is_err());

        let blank_sub = CategoryTaxonomy::new(vec![Category::new("AI", &["Blogs", ""])]);
        assert!(blank_sub.validate().is_err());
    }

    #[test]
    fn test_deserialize_from_toml_like_value() {
        let json = r#"{"categories":[{"name":"AI","subcategories":["Tools"]},{"name":"Career"}]}"#;
        let taxonomy: CategoryTaxonomy = serde_json::from_str(json).unwrap();
        assert_eq!(taxonomy.categories[1].subcategories.len(), 0);
        assert_eq!(taxonomy.categories[1].note, None);
    }
}
