//! VetQuick Buddy - pet symptom triage chat
//!
//! This library provides the consultation core: the chat transcript,
//! the triage classifier, the save workflow and the local record log.
//! The model call and the terminal UI sit on top of it.

pub mod cli;
pub mod config;
pub mod core;
pub mod session;
pub mod storage;
pub mod utils;

pub use self::config::{DiscardPolicy, Settings};
pub use self::core::conversation::{ConversationState, Role, Turn};
pub use self::core::llm::{ChatBackend, LLMClient, LlmError};
pub use self::core::triage::{Classification, Classifier, KeywordClassifier, TriageCard};
pub use session::{ConsultSession, Notice, SessionError, SessionEvent};
pub use storage::{Record, RecordStore, StoreError};
