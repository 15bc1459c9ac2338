//! Optional configuration loaded from a TOML file
//!
//! Every field is optional; environment variables take precedence over
//! whatever the file sets.
//!
//! ```toml
//! [llm]
//! base_url = "https://api.groq.com/openai/v1"
//! model = "meta-llama/llama-4-scout-17b-16e-instruct"
//! api_key_env = "GROQ_API_KEY"
//! max_tokens = 1000
//! temperature = 0.7
//!
//! [chat]
//! default_persona = "custom"
//! custom_character = "a wise wizard"
//! record_failed_replies = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::ConfigError;

/// Root of the TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    /// Completion endpoint settings
    #[serde(default)]
    pub llm: LlmSection,

    /// Session behavior
    #[serde(default)]
    pub chat: ChatSection,
}

impl FileConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig = toml::from_str(content)?;
        Ok(config)
    }
}

/// Completion endpoint settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmSection {
    /// Base URL of the OpenAI-compatible API
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub model: Option<String>,

    /// Environment variable holding the API key
    #[serde(default)]
    pub api_key_env: Option<String>,

    #[serde(default)]
    pub max_tokens: Option<u32>,

    #[serde(default)]
    pub temperature: Option<f32>,

    /// Overrides the HTTP client's default timeout
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Session behavior
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatSection {
    /// Persona selected at startup
    #[serde(default)]
    pub default_persona: Option<String>,

    /// Character description for the custom persona
    #[serde(default)]
    pub custom_character: Option<String>,

    /// Whether failed completions are kept in the transcript
    #[serde(default)]
    pub record_failed_replies: Option<bool>,
}
