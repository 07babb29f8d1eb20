// file: src/config.rs
// description: application configuration management with toml and environment support
// reference: https://docs.rs/config

use crate::error::{PipelineError, Result};
use crate::models::CategoryTaxonomy;
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "BOOKMARKS";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub classifier: ClassifierConfig,
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub taxonomy: CategoryTaxonomy,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct ClassifierConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl fmt::Debug for ClassifierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierConfig")
            .field("api_key", &self.api_key.as_deref().map(redact))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    pub input_file: PathBuf,
    pub output_file: PathBuf,
    pub throttle_ms: u64,
    pub show_progress: bool,
}

/// Unprefixed variables understood for compatibility with plain `.env` files.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub input_file: Option<String>,
    pub output_file: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        let read = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        Self {
            api_key: read("OPENAI_API_KEY"),
            model: read("MODEL_NAME"),
            base_url: read("OPENAI_BASE_URL"),
            input_file: read("INPUT_FILE"),
            output_file: read("OUTPUT_FILE"),
        }
    }
}

impl Config {
    /// Load `.env`, then layer defaults, the optional file, prefixed
    /// environment variables and the plain compatibility variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();
        Self::from_sources(path, EnvOverrides::from_env())
    }

    pub fn from_sources(path: Option<&Path>, overrides: EnvOverrides) -> Result<Self> {
        let defaults = Self::default_config();
        let to_config_err = |e: config::ConfigError| PipelineError::Config(e.to_string());

        let mut builder = config::Config::builder()
            .set_default("classifier.model", defaults.classifier.model.as_str())
            .and_then(|b| b.set_default("classifier.base_url", defaults.classifier.base_url.as_str()))
            .and_then(|b| {
                b.set_default("classifier.temperature", f64::from(defaults.classifier.temperature))
            })
            .and_then(|b| {
                b.set_default("classifier.max_tokens", i64::from(defaults.classifier.max_tokens))
            })
            .and_then(|b| {
                b.set_default(
                    "pipeline.input_file",
                    defaults.pipeline.input_file.to_string_lossy().into_owned(),
                )
            })
            .and_then(|b| {
                b.set_default(
                    "pipeline.output_file",
                    defaults.pipeline.output_file.to_string_lossy().into_owned(),
                )
            })
            .and_then(|b| b.set_default("pipeline.throttle_ms", defaults.pipeline.throttle_ms as i64))
            .and_then(|b| b.set_default("pipeline.show_progress", defaults.pipeline.show_progress))
            .map_err(to_config_err)?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        builder = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("classifier.api_key", overrides.api_key)
            .and_then(|b| b.set_override_option("classifier.model", overrides.model))
            .and_then(|b| b.set_override_option("classifier.base_url", overrides.base_url))
            .and_then(|b| b.set_override_option("pipeline.input_file", overrides.input_file))
            .and_then(|b| b.set_override_option("pipeline.output_file", overrides.output_file))
            .map_err(to_config_err)?;

        let settings = builder.build().map_err(to_config_err)?;

        let config: Config = settings.try_deserialize().map_err(to_config_err)?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            classifier: ClassifierConfig {
                api_key: None,
                model: "gpt-4o-mini".to_string(),
                base_url: "https://api.openai.com/v1".to_string(),
                temperature: 0.2,
                max_tokens: 50,
            },
            pipeline: PipelineConfig {
                input_file: PathBuf::from("bookmarks.csv"),
                output_file: PathBuf::from("categorized_bookmarks.csv"),
                throttle_ms: 1000,
                show_progress: true,
            },
            taxonomy: CategoryTaxonomy::builtin(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.classifier.model.trim().is_empty() {
            return Err(PipelineError::Config("model must not be empty".to_string()));
        }

        if !(0.0..=2.0).contains(&self.classifier.temperature) {
            return Err(PipelineError::Config(format!(
                "temperature must be between 0 and 2, got {}",
                self.classifier.temperature
            )));
        }

        if self.classifier.max_tokens == 0 {
            return Err(PipelineError::Config(
                "max_tokens must be greater than 0".to_string(),
            ));
        }

        Validator::validate_url(&self.classifier.base_url)
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        if self.pipeline.input_file == self.pipeline.output_file {
            return Err(PipelineError::Config(format!(
                "input and output must be different files: {}",
                self.pipeline.input_file.display()
            )));
        }

        self.taxonomy.validate()
    }
}

/// Mask a secret, keeping a short prefix for identification.
pub fn redact(secret: &str) -> String {
    match secret.get(..6) {
        Some(prefix) if secret.len() > 6 => format!("{}***", prefix),
        _ => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.classifier.max_tokens, 50);
        assert_eq!(config.pipeline.throttle_ms, 1000);
    }

    #[test]
    fn test_load_from_file_with_overrides() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
[classifier]
model = "from-file"
temperature = 0.0

[pipeline]
input_file = "in.csv"
throttle_ms = 250

[[taxonomy.categories]]
name = "AI"
subcategories = ["Tools"]
"#,
        )
        .unwrap();

        let overrides = EnvOverrides {
            api_key: Some("sk-from-env".to_string()),
            output_file: Some("out.csv".to_string()),
            ..Default::default()
        };

        let config = Config::from_sources(Some(&path), overrides).unwrap();
        assert_eq!(config.classifier.model, "from-file");
        assert_eq!(config.classifier.temperature, 0.0);
        assert_eq!(config.classifier.api_key.as_deref(), Some("sk-from-env"));
        assert_eq!(config.pipeline.input_file, PathBuf::from("in.csv"));
        assert_eq!(config.pipeline.output_file, PathBuf::from("out.csv"));
        assert_eq!(config.pipeline.throttle_ms, 250);
        assert_eq!(config.taxonomy.len(), 1);
    }

    #[test]
    fn test_defaults_without_file() {
        let overrides = EnvOverrides {
            model: Some("gpt-test".to_string()),
            ..Default::default()
        };
        let config = Config::from_sources(None, overrides).unwrap();
        assert_eq!(config.classifier.model, "gpt-test");
        assert_eq!(config.taxonomy.len(), 18);
    }

    #[test]
    fn test_validation_failures() {
        let mut config = Config::default_config();
        config.classifier.temperature = 3.0;
        assert!(config.validate().is_err());

        let mut config = Config::default_config();
        config.classifier.max_tokens = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default_config();
        config.classifier.base_url = "api.openai.com".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default_config();
        config.pipeline.output_file = config.pipeline.input_file.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let mut config = Config::default_config();
        config.classifier.api_key = Some("sk-1234567890abcdef".to_string());
        let output = format!("{:?}", config);
        assert!(!output.contains("1234567890abcdef"));
        assert!(output.contains("sk-123***"));
    }

    #[test]
    fn test_redact_short_secret() {
        assert_eq!(redact("abc"), "***");
    }
}
