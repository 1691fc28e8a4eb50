//! Save Workflow
//!
//! Per result turn: choose yes/no → confirm → pick a mode → enter text →
//! persist. State for a turn exists only between the moment the turn is
//! classified as a result and the moment it is discarded or persisted.

use crate::storage::{Record, RecordStore, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveChoice {
    #[default]
    Unset,
    Yes,
    No,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveMode {
    #[default]
    Unset,
    /// Save a freshly typed symptom with no memo.
    Symptom,
    /// Save the consultation's symptom with a memo.
    Memo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveState {
    pub choice: SaveChoice,
    pub confirmed: bool,
    pub mode: SaveMode,
}

/// Where a turn's workflow currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No state for the turn: never offered, discarded or already saved.
    Idle,
    /// Yes/no offered; the choice may or may not be made yet.
    AwaitingChoice,
    ModeSelect,
    Entering(SaveMode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    ModeSelect,
    Discarded,
}

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("no save in progress for turn {0}")]
    NoState(usize),

    #[error("choose yes or no before confirming (turn {0})")]
    NoChoice(usize),

    #[error("save not confirmed for turn {0}")]
    NotConfirmed(usize),

    #[error("no save mode selected for turn {0}")]
    NoMode(usize),

    #[error("failed to save record: {0}")]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, WorkflowError>;

/// Workflow sub-states keyed by assistant turn index.
#[derive(Debug, Default)]
pub struct SaveWorkflows {
    states: HashMap<usize, SaveState>,
}

impl SaveWorkflows {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a workflow for `index` unless one already exists.
    pub fn offer(&mut self, index: usize) -> &SaveState {
        self.states.entry(index).or_insert_with(|| {
            tracing::debug!("[SaveWorkflow] Offering save for turn {}", index);
            SaveState::default()
        })
    }

    pub fn state(&self, index: usize) -> Option<&SaveState> {
        self.states.get(&index)
    }

    pub fn phase(&self, index: usize) -> Phase {
        match self.states.get(&index) {
            None => Phase::Idle,
            Some(state) if !state.confirmed => Phase::AwaitingChoice,
            Some(state) if state.mode == SaveMode::Unset => Phase::ModeSelect,
            Some(state) => Phase::Entering(state.mode),
        }
    }

    /// Turn indices with a workflow in progress, oldest first.
    pub fn active(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.states.keys().copied().collect();
        indices.sort_unstable();
        indices
    }

    pub fn choose(&mut self, index: usize, choice: SaveChoice) -> Result<()> {
        let state = self.state_mut(index)?;
        state.choice = choice;
        Ok(())
    }

    /// Acts on the current choice: "yes" opens mode selection, "no" drops the state.
    pub fn confirm(&mut self, index: usize) -> Result<ConfirmOutcome> {
        let choice = self.state_mut(index)?.choice;
        match choice {
            SaveChoice::Unset => Err(WorkflowError::NoChoice(index)),
            SaveChoice::Yes => {
                self.state_mut(index)?.confirmed = true;
                tracing::debug!("[SaveWorkflow] Turn {} confirmed", index);
                Ok(ConfirmOutcome::ModeSelect)
            }
            SaveChoice::No => {
                self.discard(index);
                Ok(ConfirmOutcome::Discarded)
            }
        }
    }

    pub fn select_mode(&mut self, index: usize, mode: SaveMode) -> Result<()> {
        let state = self.state_mut(index)?;
        if !state.confirmed {
            return Err(WorkflowError::NotConfirmed(index));
        }
        state.mode = mode;
        Ok(())
    }

    /// Persists the entry and clears the turn's state.
    ///
    /// In symptom mode `text` is the symptom; in memo mode it is the memo and
    /// `current_symptom` supplies the symptom. On a store failure the state is
    /// left as it was.
    pub fn submit(
        &mut self,
        index: usize,
        text: &str,
        current_symptom: &str,
        store: &RecordStore,
    ) -> Result<Record> {
        let state = self.state_mut(index)?;
        if !state.confirmed {
            return Err(WorkflowError::NotConfirmed(index));
        }

        let record = match state.mode {
            SaveMode::Unset => return Err(WorkflowError::NoMode(index)),
            SaveMode::Symptom => store.append(text, "")?,
            SaveMode::Memo => store.append(current_symptom, text)?,
        };

        self.states.remove(&index);
        tracing::debug!("[SaveWorkflow] Turn {} saved", index);
        Ok(record)
    }

    /// Drops all state for `index`. Returns whether anything was removed.
    pub fn discard(&mut self, index: usize) -> bool {
        let removed = self.states.remove(&index).is_some();
        if removed {
            tracing::debug!("[SaveWorkflow] Turn {} discarded", index);
        }
        removed
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }

    fn state_mut(&mut self, index: usize) -> Result<&mut SaveState> {
        self.states
            .get_mut(&index)
            .ok_or(WorkflowError::NoState(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, RecordStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::open(temp_dir.path().join("records.db")).unwrap();
        (temp_dir, store)
    }

    #[test]
    fn test_offer_starts_unset() {
        let mut workflows = SaveWorkflows::new();
        assert_eq!(workflows.phase(2), Phase::Idle);

        let state = workflows.offer(2).clone();
        assert_eq!(state, SaveState::default());
        assert_eq!(state.choice, SaveChoice::Unset);
        assert_eq!(workflows.phase(2), Phase::AwaitingChoice);
    }

    #[test]
    fn test_offer_keeps_existing_state() {
        let mut workflows = SaveWorkflows::new();
        workflows.offer(2);
        workflows.choose(2, SaveChoice::Yes).unwrap();
        workflows.offer(2);
        assert_eq!(workflows.state(2).unwrap().choice, SaveChoice::Yes);
    }

    #[test]
    fn test_confirm_without_choice_is_rejected() {
        let mut workflows = SaveWorkflows::new();
        workflows.offer(2);

        let err = workflows.confirm(2).unwrap_err();
        assert!(matches!(err, WorkflowError::NoChoice(2)));
        assert_eq!(workflows.phase(2), Phase::AwaitingChoice);
    }

    #[test]
    fn test_no_discards_everything() {
        let mut workflows = SaveWorkflows::new();
        workflows.offer(2);
        workflows.choose(2, SaveChoice::No).unwrap();

        assert_eq!(workflows.confirm(2).unwrap(), ConfirmOutcome::Discarded);
        assert!(workflows.state(2).is_none());
        assert!(workflows.active().is_empty());

        workflows.offer(4);
        assert_eq!(workflows.state(4), Some(&SaveState::default()));
    }

    #[test]
    fn test_mode_requires_confirmation() {
        let mut workflows = SaveWorkflows::new();
        workflows.offer(2);
        workflows.choose(2, SaveChoice::Yes).unwrap();

        let err = workflows.select_mode(2, SaveMode::Memo).unwrap_err();
        assert!(matches!(err, WorkflowError::NotConfirmed(2)));

        assert_eq!(workflows.confirm(2).unwrap(), ConfirmOutcome::ModeSelect);
        assert_eq!(workflows.phase(2), Phase::ModeSelect);
        workflows.select_mode(2, SaveMode::Memo).unwrap();
        assert_eq!(workflows.phase(2), Phase::Entering(SaveMode::Memo));
    }

    #[test]
    fn test_symptom_submit_persists_and_clears() {
        let (_dir, store) = temp_store();
        let mut workflows = SaveWorkflows::new();
        workflows.offer(2);
        workflows.choose(2, SaveChoice::Yes).unwrap();
        workflows.confirm(2).unwrap();
        workflows.select_mode(2, SaveMode::Symptom).unwrap();

        let record = workflows.submit(2, "구토", "unused", &store).unwrap();

        assert_eq!(record.symptom, "구토");
        assert_eq!(record.memo, "");
        assert_eq!(workflows.phase(2), Phase::Idle);
        assert_eq!(store.list(false).unwrap(), vec![record]);
    }

    #[test]
    fn test_memo_submit_uses_current_symptom() {
        let (_dir, store) = temp_store();
        let mut workflows = SaveWorkflows::new();
        workflows.offer(4);
        workflows.choose(4, SaveChoice::Yes).unwrap();
        workflows.confirm(4).unwrap();
        workflows.select_mode(4, SaveMode::Memo).unwrap();

        let record = workflows
            .submit(4, "저녁에 다시 확인", "우리 강아지가 구토를 해요", &store)
            .unwrap();

        assert_eq!(record.symptom, "우리 강아지가 구토를 해요");
        assert_eq!(record.memo, "저녁에 다시 확인");
        assert!(workflows.state(4).is_none());
    }

    #[test]
    fn test_submit_without_mode() {
        let (_dir, store) = temp_store();
        let mut workflows = SaveWorkflows::new();
        workflows.offer(2);
        workflows.choose(2, SaveChoice::Yes).unwrap();
        workflows.confirm(2).unwrap();

        let err = workflows.submit(2, "구토", "", &store).unwrap_err();
        assert!(matches!(err, WorkflowError::NoMode(2)));
        assert!(store.list(false).unwrap().is_empty());
    }

    #[test]
    fn test_store_failure_keeps_state() {
        let temp_dir = TempDir::new().unwrap();
        // A directory cannot be opened as a database file.
        let store = RecordStore::new(temp_dir.path());
        let mut workflows = SaveWorkflows::new();
        workflows.offer(2);
        workflows.choose(2, SaveChoice::Yes).unwrap();
        workflows.confirm(2).unwrap();
        workflows.select_mode(2, SaveMode::Symptom).unwrap();

        let err = workflows.submit(2, "구토", "", &store).unwrap_err();
        assert!(matches!(err, WorkflowError::Store(_)));
        assert_eq!(workflows.phase(2), Phase::Entering(SaveMode::Symptom));
    }

    #[test]
    fn test_unknown_index() {
        let mut workflows = SaveWorkflows::new();
        assert!(matches!(
            workflows.choose(9, SaveChoice::Yes),
            Err(WorkflowError::NoState(9))
        ));
        assert!(!workflows.discard(9));
    }
}
