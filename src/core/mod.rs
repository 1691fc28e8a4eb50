pub mod conversation;
pub mod llm;
pub mod prompt;
pub mod triage;
