// file: src/classifier/openai.rs
// description: chat completions client used as the bookmark classifier
// reference: https://platform.openai.com/docs/api-reference/chat/create

use crate::classifier::{ClassificationRequest, Classifier};
use crate::config::ClassifierConfig;
use crate::error::{ClassifierError, PipelineError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Classifier backed by any OpenAI-compatible `/chat/completions` endpoint.
///
/// Built once at startup from configuration and shared read-only.
pub struct OpenAiClassifier {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl fmt::Debug for OpenAiClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClassifier")
            .field("api_key", &crate::config::redact(&self.api_key))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl OpenAiClassifier {
    pub fn new(api_key: String, model: String, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
        }
    }

    pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            PipelineError::Config(
                "classifier api key is not set (OPENAI_API_KEY or classifier.api_key)".to_string(),
            )
        })?;

        Ok(Self::new(api_key, config.model.clone(), &config.base_url))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_body<'a>(&'a self, request: &'a ClassificationRequest) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system_instruction,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }

    fn extract_label(response: ChatCompletionResponse) -> std::result::Result<String, ClassifierError> {
        let choice = response.choices.into_iter().next().ok_or_else(|| {
            ClassifierError::MalformedResponse("response contained no choices".to_string())
        })?;

        let label = choice
            .message
            .content
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        if label.is_empty() {
            return Err(ClassifierError::EmptyResponse);
        }

        Ok(label)
    }
}

#[async_trait]
impl Classifier for OpenAiClassifier {
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> std::result::Result<String, ClassifierError> {
        let body = self.build_body(request);

        debug!(
            "Requesting classification from {} ({} prompt chars)",
            self.model,
            request.prompt.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClassifierError::from_status(status, error_text));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ClassifierError::MalformedResponse(e.to_string()))?;

        let label = Self::extract_label(completion)?;
        debug!("Received label: {}", label);
        Ok(label)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::SYSTEM_INSTRUCTION;

    fn request() -> ClassificationRequest {
        ClassificationRequest {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            prompt: "Title: Intro to Big-O".to_string(),
            temperature: 0.2,
            max_tokens: 50,
        }
    }

    fn parse(json: &str) -> ChatCompletionResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let classifier =
            OpenAiClassifier::new("sk-test".into(), "gpt-4o-mini".into(), "https://api.example/v1");
        let request = request();
        let body = serde_json::to_value(classifier.build_body(&request)).unwrap();

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["max_tokens"], 50);
        assert!((body["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);

        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"], SYSTEM_INSTRUCTION);
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[1]["content"], "Title: Intro to Big-O");
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let classifier = OpenAiClassifier::new("k".into(), "m".into(), "http://localhost:8080/v1/");
        assert_eq!(classifier.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_extract_label_trims_first_choice() {
        let response = parse(
            r#"{"choices":[{"message":{"content":"  DSA / Tutorials\n"}},{"message":{"content":"AI"}}]}"#,
        );
        assert_eq!(
            OpenAiClassifier::extract_label(response).unwrap(),
            "DSA / Tutorials"
        );
    }

    #[test]
    fn test_extract_label_errors() {
        let no_choices = parse(r#"{"choices":[]}"#);
        assert!(matches!(
            OpenAiClassifier::extract_label(no_choices),
            Err(ClassifierError::MalformedResponse(_))
        ));

        let null_content = parse(r#"{"choices":[{"message":{"content":null}}]}"#);
        assert!(matches!(
            OpenAiClassifier::extract_label(null_content),
            Err(ClassifierError::EmptyResponse)
        ));

        let blank = parse(r#"{"choices":[{"message":{"content":"   "}}]}"#);
        assert!(matches!(
            OpenAiClassifier::extract_label(blank),
            Err(ClassifierError::EmptyResponse)
        ));
    }

    #[test]
    fn test_from_config_requires_api_key() {
        let mut config = crate::config::Config::default_config().classifier;
        config.api_key = None;
        assert!(OpenAiClassifier::from_config(&config).is_err());

        config.api_key = Some("sk-abcdef123456".into());
        let classifier = OpenAiClassifier::from_config(&config).unwrap();
        assert_eq!(classifier.name(), "openai");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let classifier =
            OpenAiClassifier::new("sk-1234567890abcdef".into(), "m".into(), "http://x");
        let output = format!("{:?}", classifier);
        assert!(!output.contains("1234567890abcdef"));
        assert!(output.contains("***"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let classifier = OpenAiClassifier::new("k".into(), "m".into(), "http://127.0.0.1:9/v1");
        let result = classifier.classify(&request()).await;
        assert!(matches!(result, Err(ClassifierError::Transport(_))));
    }
}
