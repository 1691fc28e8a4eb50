//! Consultation Session
//!
//! Information Hiding:
//! - Conversation transcript and per-turn save state are owned here and only
//!   changed through `apply` / the event methods
//! - The model backend and classifier are injected, so the same session runs
//!   against the HTTP client or a scripted backend
//! - Rendering is the caller's job; every handler returns a `Notice` and the
//!   caller re-renders from `conversation()` / `workflows()`

pub mod workflow;

use crate::config::{DiscardPolicy, Settings};
use crate::core::conversation::ConversationState;
use crate::core::llm::{ChatBackend, LlmError};
use crate::core::prompt::SYSTEM_PROMPT;
use crate::core::triage::{Classification, Classifier, KeywordClassifier};
use crate::storage::{Record, RecordStore};
use std::sync::Arc;
use workflow::{ConfirmOutcome, SaveChoice, SaveMode, SaveWorkflows, WorkflowError};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("API 호출 오류: {0}")]
    Model(#[from] LlmError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// A user action from the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Send(String),
    ChooseSave { index: usize, choice: SaveChoice },
    ConfirmSave { index: usize },
    ChooseMode { index: usize, mode: SaveMode },
    Submit { index: usize, text: String },
}

/// What an event changed, for the caller to report before re-rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// Blank input; nothing changed.
    Ignored,
    Reply {
        index: usize,
        classification: Classification,
    },
    Updated,
    ModeSelect {
        index: usize,
    },
    Discarded {
        index: usize,
        conversation_reset: bool,
    },
    Saved {
        index: usize,
        record: Record,
    },
}

/// Everything one user's consultation owns.
pub struct ConsultSession {
    conversation: ConversationState,
    workflows: SaveWorkflows,
    current_symptom: String,
    backend: Arc<dyn ChatBackend>,
    classifier: Arc<dyn Classifier>,
    store: RecordStore,
    discard_policy: DiscardPolicy,
}

impl ConsultSession {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        classifier: Arc<dyn Classifier>,
        store: RecordStore,
        discard_policy: DiscardPolicy,
    ) -> Self {
        Self::with_prompt(SYSTEM_PROMPT, backend, classifier, store, discard_policy)
    }

    pub fn with_prompt(
        system_prompt: impl Into<String>,
        backend: Arc<dyn ChatBackend>,
        classifier: Arc<dyn Classifier>,
        store: RecordStore,
        discard_policy: DiscardPolicy,
    ) -> Self {
        Self {
            conversation: ConversationState::initialize(system_prompt),
            workflows: SaveWorkflows::new(),
            current_symptom: String::new(),
            backend,
            classifier,
            store,
            discard_policy,
        }
    }

    /// Session wired from configuration: prompt and keyword overrides applied.
    pub fn from_settings(
        settings: &Settings,
        backend: Arc<dyn ChatBackend>,
        store: RecordStore,
    ) -> Self {
        let classifier: Arc<dyn Classifier> = match &settings.consult.keywords {
            Some(keywords) => Arc::new(KeywordClassifier::new(keywords.clone())),
            None => Arc::new(KeywordClassifier::default()),
        };
        let prompt = settings
            .consult
            .system_prompt
            .clone()
            .unwrap_or_else(|| SYSTEM_PROMPT.to_string());

        Self::with_prompt(
            prompt,
            backend,
            classifier,
            store,
            settings.consult.discard_policy,
        )
    }

    pub fn conversation(&self) -> &ConversationState {
        &self.conversation
    }

    pub fn workflows(&self) -> &SaveWorkflows {
        &self.workflows
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn discard_policy(&self) -> DiscardPolicy {
        self.discard_policy
    }

    /// Symptom text a memo is saved against: the latest user message.
    pub fn current_symptom(&self) -> &str {
        &self.current_symptom
    }

    pub fn classify(&self, reply: &str) -> Classification {
        self.classifier.classify(reply)
    }

    /// Most recent turn with a save in progress.
    pub fn pending_save(&self) -> Option<usize> {
        self.workflows.active().last().copied()
    }

    pub async fn apply(&mut self, event: SessionEvent) -> Result<Notice> {
        match event {
            SessionEvent::Send(text) => self.send(&text).await,
            SessionEvent::ChooseSave { index, choice } => {
                self.workflows.choose(index, choice)?;
                Ok(Notice::Updated)
            }
            SessionEvent::ConfirmSave { index } => self.confirm_save(index),
            SessionEvent::ChooseMode { index, mode } => {
                self.workflows.select_mode(index, mode)?;
                Ok(Notice::Updated)
            }
            SessionEvent::Submit { index, text } => self.submit(index, &text),
        }
    }

    /// Sends a user message and records the model's reply.
    ///
    /// On a model failure the user turn stays in the transcript so the next
    /// send carries it again.
    pub async fn send(&mut self, text: &str) -> Result<Notice> {
        if self.conversation.append_user(text).is_none() {
            return Ok(Notice::Ignored);
        }
        self.current_symptom = text.to_string();

        let reply = match self.backend.complete(self.conversation.turns()).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!("[Session] Model call failed: {}", e);
                return Err(e.into());
            }
        };

        let index = self.conversation.append_assistant(reply);
        let classification = self.classify(&self.conversation.turns()[index].content);
        if classification.is_result() {
            self.workflows.offer(index);
        }

        tracing::debug!(
            "[Session] Reply at turn {} classified as {}",
            index,
            if classification.is_result() { "result" } else { "plain" }
        );
        Ok(Notice::Reply {
            index,
            classification,
        })
    }

    fn confirm_save(&mut self, index: usize) -> Result<Notice> {
        match self.workflows.confirm(index)? {
            ConfirmOutcome::ModeSelect => Ok(Notice::ModeSelect { index }),
            ConfirmOutcome::Discarded => {
                let conversation_reset = self.discard_policy == DiscardPolicy::ResetConversation;
                if conversation_reset {
                    self.conversation.reset();
                    // Indices restart, so no other turn's state can stay valid.
                    self.workflows.clear();
                }
                Ok(Notice::Discarded {
                    index,
                    conversation_reset,
                })
            }
        }
    }

    fn submit(&mut self, index: usize, text: &str) -> Result<Notice> {
        let record = self
            .workflows
            .submit(index, text, &self.current_symptom, &self.store)?;
        Ok(Notice::Saved { index, record })
    }
}
