//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly; the key itself is never stored here,
//! only the name of the environment variable holding it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("provider base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("agent name cannot be empty")]
    EmptyAgentName,

    #[error("max_chunk_len cannot be 0")]
    InvalidChunkLen,
}

/// Raw provider configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// OpenAI-compatible endpoint base URL
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Default model id for agents that don't set one
    pub model: String,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            model: "gpt-4o-mini".to_string(),
        }
    }
}

/// One roster entry from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentProfileConfig {
    /// Display name, also used for speaker resolution
    pub name: String,
    /// Persona text injected into the system prompt
    pub persona: String,
    /// Model override; falls back to the provider default
    #[serde(default)]
    pub model: Option<String>,
}

/// Raw focus-session configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileFocusConfig {
    /// Chunk length threshold in characters
    pub max_chunk_len: usize,
}

impl Default for FileFocusConfig {
    fn default() -> Self {
        Self {
            max_chunk_len: scholar_domain::DEFAULT_MAX_CHUNK_LEN,
        }
    }
}

/// Raw storage configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// SQLite database file path
    pub db_path: String,
    /// Conversation log file path; empty disables logging
    pub log_path: Option<String>,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            db_path: "scholar.db".to_string(),
            log_path: None,
        }
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Provider settings
    pub provider: FileProviderConfig,
    /// Meeting roster
    pub roster: Vec<AgentProfileConfig>,
    /// Focus-session settings
    pub focus: FileFocusConfig,
    /// Storage settings
    pub storage: FileStorageConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.provider.base_url.trim().is_empty() {
            return Err(ConfigValidationError::EmptyBaseUrl);
        }

        for agent in &self.roster {
            if agent.name.trim().is_empty() {
                return Err(ConfigValidationError::EmptyAgentName);
            }
        }

        if self.focus.max_chunk_len == 0 {
            return Err(ConfigValidationError::InvalidChunkLen);
        }

        Ok(())
    }

    /// Resolve the model for a roster entry, falling back to the provider default.
    pub fn model_for(&self, agent: &AgentProfileConfig) -> String {
        agent
            .model
            .clone()
            .unwrap_or_else(|| self.provider.model.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[provider]
base_url = "https://dashscope.aliyuncs.com/compatible-mode/v1"
api_key_env = "DASHSCOPE_API_KEY"
model = "qwen-plus"

[[roster]]
name = "Prof. Chen"
persona = "A skeptical statistician"

[[roster]]
name = "Dr. Sato"
persona = "An optimistic systems builder"
model = "qwen-max"

[focus]
max_chunk_len = 200

[storage]
db_path = "sessions.db"
log_path = "scholar.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.provider.api_key_env, "DASHSCOPE_API_KEY");
        assert_eq!(config.roster.len(), 2);
        assert_eq!(config.roster[0].model, None);
        assert_eq!(config.model_for(&config.roster[0]), "qwen-plus");
        assert_eq!(config.model_for(&config.roster[1]), "qwen-max");
        assert_eq!(config.focus.max_chunk_len, 200);
        assert_eq!(config.storage.log_path.as_deref(), Some("scholar.jsonl"));
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[provider]
model = "deepseek-chat"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.provider.model, "deepseek-chat");
        // Defaults should apply
        assert_eq!(config.provider.base_url, "https://api.openai.com/v1");
        assert!(config.roster.is_empty());
        assert_eq!(config.focus.max_chunk_len, scholar_domain::DEFAULT_MAX_CHUNK_LEN);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(FileConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_agent_name() {
        let toml_str = r#"
[[roster]]
name = "  "
persona = "p"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::EmptyAgentName)
        ));
    }

    #[test]
    fn test_validate_zero_chunk_len() {
        let toml_str = r#"
[focus]
max_chunk_len = 0
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidChunkLen)
        ));
    }
}
