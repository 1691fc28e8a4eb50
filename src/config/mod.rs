mod settings;

pub use settings::{
    ConsultConfig, DiscardPolicy, LLMConfig, LoggingConfig, Settings, StorageConfig,
};
