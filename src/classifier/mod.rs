// file: src/classifier/mod.rs
// description: classifier abstraction over text-generation services
// reference: https://platform.openai.com/docs/api-reference/chat

pub mod mock;
pub mod openai;
pub mod prompt;

pub use mock::MockClassifier;
pub use openai::OpenAiClassifier;
pub use prompt::{PromptBuilder, SYSTEM_INSTRUCTION};

use crate::error::ClassifierError;
use async_trait::async_trait;

/// One classification exchange, independent of the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationRequest {
    pub system_instruction: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// A service that turns a rendered prompt into a short label.
///
/// Implementations return the trimmed label text or a [`ClassifierError`];
/// they never retry. Used as `Arc<dyn Classifier>`.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> std::result::Result<String, ClassifierError>;

    /// Name used in log lines.
    fn name(&self) -> &'static str;
}
