//! Configuration loading and collaborator factories.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use cardforge_core::pipeline::{CardGenerator, GeneratorConfig};
use cardforge_core::traits::{Analyzer, AnswerExtractor};

use crate::analyzer::RuleAnalyzer;
use crate::extractor::{LexicalExtractor, QaServiceExtractor};

/// Configuration for the answer-extraction backend.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExtractorConfig {
    /// Built-in lexical-overlap extractor; runs in process.
    Lexical,
    /// Remote QA inference endpoint.
    QaService {
        endpoint: String,
        #[serde(default)]
        api_key: Option<String>,
    },
}

impl std::fmt::Debug for ExtractorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractorConfig::Lexical => f.debug_struct("Lexical").finish(),
            ExtractorConfig::QaService {
                endpoint,
                api_key: _,
            } => f
                .debug_struct("QaService")
                .field("endpoint", endpoint)
                .field("api_key", &"***")
                .finish(),
        }
    }
}

/// Top-level cardforge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardforgeConfig {
    /// Pipeline thresholds and bounds.
    #[serde(default)]
    pub generator: GeneratorConfig,
    /// Which extractor backend to use.
    #[serde(default = "default_extractor")]
    pub extractor: ExtractorConfig,
}

fn default_extractor() -> ExtractorConfig {
    ExtractorConfig::Lexical
}

impl Default for CardforgeConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            extractor: default_extractor(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `cardforge.toml` in the current directory
/// 2. `~/.config/cardforge/config.toml`
///
/// Environment variable overrides: `CARDFORGE_QA_ENDPOINT` switches the
/// extractor to the QA service, `CARDFORGE_QA_KEY` sets its API key.
pub fn load_config() -> Result<CardforgeConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<CardforgeConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("cardforge.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<CardforgeConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => CardforgeConfig::default(),
    };

    // Apply env var overrides
    if let Ok(endpoint) = std::env::var("CARDFORGE_QA_ENDPOINT") {
        let api_key = match &config.extractor {
            ExtractorConfig::QaService { api_key, .. } => api_key.clone(),
            ExtractorConfig::Lexical => None,
        };
        config.extractor = ExtractorConfig::QaService { endpoint, api_key };
    }
    if let Ok(key) = std::env::var("CARDFORGE_QA_KEY") {
        if let ExtractorConfig::QaService { api_key, .. } = &mut config.extractor {
            *api_key = Some(key);
        }
    }

    // Resolve env vars in the extractor config
    if let ExtractorConfig::QaService { endpoint, api_key } = &mut config.extractor {
        *endpoint = resolve_env_vars(endpoint);
        *api_key = api_key.as_ref().map(|k| resolve_env_vars(k));
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("cardforge"))
}

/// Create an extractor instance from its configuration.
pub fn create_extractor(config: &ExtractorConfig) -> Arc<dyn AnswerExtractor> {
    match config {
        ExtractorConfig::Lexical => Arc::new(LexicalExtractor::new()),
        ExtractorConfig::QaService { endpoint, api_key } => {
            Arc::new(QaServiceExtractor::new(endpoint, api_key.clone()))
        }
    }
}

/// Create the default rule-based analyzer.
pub fn create_analyzer() -> Arc<dyn Analyzer> {
    Arc::new(RuleAnalyzer::new())
}

/// Assemble a ready-to-use generator from a loaded configuration.
pub fn create_generator(config: &CardforgeConfig) -> CardGenerator {
    CardGenerator::new(
        create_analyzer(),
        create_extractor(&config.extractor),
        config.generator.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = CardforgeConfig::default();
        assert!(matches!(config.extractor, ExtractorConfig::Lexical));
        assert_eq!(config.generator.max_cards, 10);
        assert_eq!(config.generator.min_cards, 5);
        assert!((config.generator.entity_confidence - 0.70).abs() < f32::EPSILON);
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
[generator]
max_cards = 8
entity_confidence = 0.8

[extractor]
type = "qa_service"
endpoint = "http://localhost:9000/qa"
api_key = "sk-test"
"#;
        let config: CardforgeConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.generator.max_cards, 8);
        // Unspecified generator fields keep their defaults.
        assert_eq!(config.generator.min_cards, 5);
        assert!(matches!(
            config.extractor,
            ExtractorConfig::QaService { .. }
        ));
    }

    #[test]
    fn parse_minimal_config() {
        let config: CardforgeConfig = toml::from_str("").unwrap();
        assert!(matches!(config.extractor, ExtractorConfig::Lexical));
        assert_eq!(config.generator.max_cards, 10);
    }

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_CARDFORGE_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_CARDFORGE_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_CARDFORGE_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        std::env::remove_var("_CARDFORGE_TEST_VAR");
    }

    #[test]
    fn debug_masks_api_key() {
        let config = ExtractorConfig::QaService {
            endpoint: "http://localhost:9000/qa".to_string(),
            api_key: Some("sk-secret".to_string()),
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn explicit_missing_path_fails() {
        let result = load_config_from(Some(Path::new("/nonexistent/cardforge.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cardforge.toml");
        std::fs::write(
            &path,
            "[extractor]\ntype = \"qa_service\"\nendpoint = \"http://qa.local\"\n",
        )
        .unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        match config.extractor {
            ExtractorConfig::QaService { endpoint, .. } => {
                assert_eq!(endpoint, "http://qa.local")
            }
            ExtractorConfig::Lexical => panic!("expected qa_service extractor"),
        }
    }
}
