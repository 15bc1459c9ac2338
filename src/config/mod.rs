//! Application configuration

pub mod file;
pub mod prompts;

use std::env;
use std::path::PathBuf;

pub use file::FileConfig;
pub use prompts::{Persona, PersonaSelection, PromptError};

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";
pub const DEFAULT_API_KEY_ENV: &str = "GROQ_API_KEY";
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: Option<u64>,
    pub persona: Persona,
    pub record_failed_replies: bool,
}

impl Config {
    /// Read `.env`-backed environment variables, layered over the optional
    /// TOML file named by `PERSONA_CHAT_CONFIG`. A missing API key is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        let file = match env::var("PERSONA_CHAT_CONFIG") {
            Ok(path) => FileConfig::from_file(&PathBuf::from(path))?,
            Err(_) => FileConfig::default(),
        };
        Self::from_sources(file, |key| env::var(key).ok())
    }

    pub fn from_sources(
        file: FileConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key_env = file
            .llm
            .api_key_env
            .clone()
            .unwrap_or_else(|| DEFAULT_API_KEY_ENV.to_string());
        let api_key = var(&api_key_env).ok_or(ConfigError::MissingApiKey(api_key_env))?;

        let persona_id = var("CHAT_PERSONA")
            .or(file.chat.default_persona)
            .unwrap_or_else(|| "friend".to_string());
        let custom_character = var("CHAT_CUSTOM_CHARACTER").or(file.chat.custom_character);
        let persona = Persona::from_parts(&persona_id, custom_character.as_deref())?;

        let config = Self {
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".into()),
            port: parse_var(&var, "PORT")?.unwrap_or(3000),
            api_key,
            base_url: var("GROQ_API_URL")
                .or(file.llm.base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: var("GROQ_MODEL")
                .or(file.llm.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens: parse_var(&var, "CHAT_MAX_TOKENS")?
                .or(file.llm.max_tokens)
                .unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: parse_var(&var, "CHAT_TEMPERATURE")?
                .or(file.llm.temperature)
                .unwrap_or(DEFAULT_TEMPERATURE),
            timeout_secs: parse_var(&var, "CHAT_TIMEOUT_SECS")?.or(file.llm.timeout_secs),
            persona,
            record_failed_replies: parse_var(&var, "RECORD_FAILED_REPLIES")?
                .or(file.chat.record_failed_replies)
                .unwrap_or(true),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_tokens == 0 {
            return Err(ConfigError::Validation("max_tokens must be positive".into()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Validation(format!(
                "temperature {} is outside 0.0..=2.0",
                self.temperature
            )));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    match var(key) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid {
                key: key.to_string(),
                value,
            }),
        None => Ok(None),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Missing API key: set {0}")]
    MissingApiKey(String),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: String, value: String },

    #[error(transparent)]
    Persona(#[from] PromptError),

    #[error("Validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tokio_test::{assert_err, assert_ok};

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = assert_ok!(Config::from_sources(
            FileConfig::default(),
            lookup(&[("GROQ_API_KEY", "gsk-test")])
        ));

        assert_eq!(config.api_key, "gsk-test");
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, 1000);
        assert_eq!(config.temperature, 0.7);
        assert!(config.timeout_secs.is_none());
        assert_eq!(config.persona, Persona::Friend);
        assert!(config.record_failed_replies);
    }

    #[test]
    fn test_missing_api_key_fails_fast() {
        let err = assert_err!(Config::from_sources(FileConfig::default(), lookup(&[])));
        assert!(matches!(err, ConfigError::MissingApiKey(ref name) if name == "GROQ_API_KEY"));

        let err = Config::from_sources(FileConfig::default(), lookup(&[("GROQ_API_KEY", "  ")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey(_)));
    }

    #[test]
    fn test_env_overrides_file() {
        let file = FileConfig::from_str(
            r#"
[llm]
model = "from-file"
api_key_env = "OTHER_KEY"
max_tokens = 256

[chat]
default_persona = "teacher"
record_failed_replies = false
"#,
        )
        .unwrap();

        let config = Config::from_sources(
            file,
            lookup(&[
                ("OTHER_KEY", "k"),
                ("GROQ_MODEL", "from-env"),
                ("PORT", "8080"),
                ("CHAT_PERSONA", "custom"),
                ("CHAT_CUSTOM_CHARACTER", "a wise wizard"),
            ]),
        )
        .unwrap();

        assert_eq!(config.api_key, "k");
        assert_eq!(config.model, "from-env");
        assert_eq!(config.max_tokens, 256);
        assert_eq!(config.port, 8080);
        assert_eq!(config.persona, Persona::Custom("a wise wizard".into()));
        assert!(!config.record_failed_replies);
    }

    #[test]
    fn test_invalid_values() {
        let err = Config::from_sources(
            FileConfig::default(),
            lookup(&[("GROQ_API_KEY", "k"), ("PORT", "eighty")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "PORT"));

        let err = Config::from_sources(
            FileConfig::default(),
            lookup(&[("GROQ_API_KEY", "k"), ("CHAT_TEMPERATURE", "3.5")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));

        let err = Config::from_sources(
            FileConfig::default(),
            lookup(&[("GROQ_API_KEY", "k"), ("CHAT_PERSONA", "pirate")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Persona(PromptError::InvalidPersona(_))));
    }
}
