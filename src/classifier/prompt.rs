// file: src/classifier/prompt.rs
// description: renders the taxonomy and one bookmark into a classification prompt
// reference: placeholder templates in the style of file header templates

use crate::classifier::ClassificationRequest;
use crate::config::ClassifierConfig;
use crate::models::{BookmarkRecord, CategoryTaxonomy};
use std::collections::HashMap;

pub const SYSTEM_INSTRUCTION: &str = "You are a bookmark categorization assistant. \
Analyze the content and suggest an appropriate hierarchical category. \
Respond only with the category path in the format 'Main Category / Subcategory'.";

const CLASSIFICATION_TEMPLATE: &str = "Please analyze the following bookmark and suggest an appropriate hierarchical category path based on the provided category structure.

Category Structure:
{taxonomy}

Consider the content, purpose, and target audience of the resource.

Title: {title}
Excerpt: {excerpt}
URL: {url}

Suggest a category path in the format \"Main Category / Subcategory\" that best describes this resource.
If the bookmark does not fit into any of the predefined categories, assign it to \"Others\".
Return only the category path without any additional text or explanation.
";

pub struct PromptBuilder {
    taxonomy_text: String,
    temperature: f32,
    max_tokens: u32,
}

impl PromptBuilder {
    /// The taxonomy is rendered once here and reused for every record.
    pub fn new(taxonomy: &CategoryTaxonomy, config: &ClassifierConfig) -> Self {
        Self {
            taxonomy_text: taxonomy.render(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    pub fn taxonomy_text(&self) -> &str {
        &self.taxonomy_text
    }

    pub fn render(&self, record: &BookmarkRecord) -> String {
        let mut values = HashMap::new();
        values.insert("taxonomy", self.taxonomy_text.as_str());
        values.insert("title", record.title.as_str());
        values.insert("excerpt", record.excerpt.as_str());
        values.insert("url", record.url.as_str());

        fill_placeholders(CLASSIFICATION_TEMPLATE, &values)
    }

    pub fn build(&self, record: &BookmarkRecord) -> ClassificationRequest {
        ClassificationRequest {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            prompt: self.render(record),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

/// Substitute `{key}` placeholders in a single left-to-right pass.
///
/// Substituted text is never rescanned, so a title containing `{url}` stays
/// literal. Unknown placeholders are left as written.
fn fill_placeholders(template: &str, values: &HashMap<&str, &str>) -> String {
    let mut out = String::with_capacity(template.len() + 256);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        match after.find('}') {
            Some(close) if values.contains_key(&after[..close]) => {
                out.push_str(values[&after[..close]]);
                rest = &after[close + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::Category;

    fn record(title: &str, excerpt: &str, url: &str) -> BookmarkRecord {
        BookmarkRecord::from_fields(
            title.to_string(),
            excerpt.to_string(),
            url.to_string(),
            vec![title.to_string(), excerpt.to_string(), url.to_string()],
        )
    }

    fn builder() -> PromptBuilder {
        let config = Config::default_config();
        PromptBuilder::new(&CategoryTaxonomy::builtin(), &config.classifier)
    }

    #[test]
    fn test_prompt_embeds_record_fields() {
        let prompt = builder().render(&record(
            "Intro to Big-O",
            "Complexity basics",
            "https://a.example/x",
        ));

        assert!(prompt.contains("Title: Intro to Big-O\n"));
        assert!(prompt.contains("Excerpt: Complexity basics\n"));
        assert!(prompt.contains("URL: https://a.example/x\n"));
        assert!(prompt.contains("1. DSA"));
        assert!(prompt.contains("assign it to \"Others\""));
    }

    #[test]
    fn test_blank_excerpt_renders_empty() {
        let prompt = builder().render(&record("Intro to Big-O", "", "https://a.example/x"));
        assert!(prompt.contains("Excerpt: \nURL: https://a.example/x"));
    }

    #[test]
    fn test_placeholders_in_fields_are_not_expanded() {
        let prompt = builder().render(&record("{url} and {excerpt}", "", "https://a.example/x"));
        assert!(prompt.contains("Title: {url} and {excerpt}\n"));
    }

    #[test]
    fn test_fill_placeholders_keeps_unknown_and_stray_braces() {
        let mut values = HashMap::new();
        values.insert("name", "Ada");
        assert_eq!(
            fill_placeholders("{name} {other} { x", &values),
            "Ada {other} { x"
        );
    }

    #[test]
    fn test_build_request_carries_sampling_settings() {
        let mut config = Config::default_config();
        config.classifier.temperature = 0.1;
        config.classifier.max_tokens = 20;
        let taxonomy = CategoryTaxonomy::new(vec![Category {
            name: "AI".to_string(),
            subcategories: vec![],
            note: None,
        }]);

        let request = PromptBuilder::new(&taxonomy, &config.classifier)
            .build(&record("t", "e", "https://u.example"));

        assert_eq!(request.system_instruction, SYSTEM_INSTRUCTION);
        assert_eq!(request.temperature, 0.1);
        assert_eq!(request.max_tokens, 20);
        assert!(request.prompt.contains("1. AI\n"));
    }
}
