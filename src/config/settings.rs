use anyhow::Result;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub llm: LLMConfig,
    pub storage: StorageConfig,
    pub consult: ConsultConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub db_path: PathBuf,
}

/// What declining to save does to the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscardPolicy {
    /// Start over from the system prompt.
    ResetConversation,
    /// Only drop the save state; the chat history stays on screen.
    #[default]
    KeepHistory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsultConfig {
    pub discard_policy: DiscardPolicy,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config_env = env::var("CONFIG_ENV").unwrap_or_else(|_| "default".to_string());

        let config = Config::builder()
            .set_default("llm.model", "gpt-4o")?
            .set_default("llm.max_tokens", 1024)?
            .set_default("llm.temperature", 0.7)?
            .set_default("llm.base_url", "https://api.openai.com/v1")?
            .set_default("llm.timeout_secs", 60)?
            .set_default("storage.db_path", "chat_records.db")?
            .set_default("consult.discard_policy", "keep_history")?
            .set_default("logging.level", "warn")?
            .add_source(File::with_name(&format!("config/{}", config_env)).required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    pub fn api_key() -> Result<String> {
        env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY environment variable not set"))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            llm: LLMConfig {
                model: "gpt-4o".to_string(),
                max_tokens: 1024,
                temperature: 0.7,
                base_url: "https://api.openai.com/v1".to_string(),
                timeout_secs: 60,
            },
            storage: StorageConfig {
                db_path: PathBuf::from("chat_records.db"),
            },
            consult: ConsultConfig {
                discard_policy: DiscardPolicy::default(),
                system_prompt: None,
                keywords: None,
            },
            logging: LoggingConfig {
                level: "warn".to_string(),
            },
        }
    }
}
