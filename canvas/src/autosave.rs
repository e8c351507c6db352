//! Debounced save scheduling.
//!
//! Every document change re-arms a deadline. Once it passes, [`AutoSave::poll`]
//! hands the host a snapshot to persist, unless nothing changed since the last
//! confirmed save or the board is brand new and still empty. The host reports
//! success through [`AutoSave::mark_saved`]; a failed save simply leaves the
//! board dirty for the next change.

#[cfg(test)]
#[path = "autosave_test.rs"]
mod autosave_test;

use serde::Serialize;

use crate::doc::{Board, Snapshot};

/// A snapshot ready to be written by the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    /// `None` for a board that has never been saved.
    pub document_id: Option<String>,
    pub snapshot: Snapshot,
    /// Serialized snapshot; pass back to [`AutoSave::mark_saved`] on success.
    pub fingerprint: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoSave {
    document_id: Option<String>,
    delay_ms: u64,
    new_delay_ms: u64,
    deadline: Option<u64>,
    last_saved: Option<String>,
}

impl AutoSave {
    #[must_use]
    pub fn new(delay_ms: u64, new_delay_ms: u64) -> Self {
        Self { document_id: None, delay_ms, new_delay_ms, deadline: None, last_saved: None }
    }

    /// Attach (or detach) the persisted document this board saves to.
    pub fn set_document_id(&mut self, document_id: Option<String>) {
        self.document_id = document_id;
    }

    /// Re-arm the debounce from `now_ms`.
    pub fn mark_changed(&mut self, now_ms: u64) {
        let delay = if self.document_id.is_some() { self.delay_ms } else { self.new_delay_ms };
        self.deadline = Some(now_ms.saturating_add(delay));
    }

    /// Drop any pending save.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Emit a save once the deadline has passed.
    pub fn poll(&mut self, now_ms: u64, board: &Board) -> Option<SaveRequest> {
        let deadline = self.deadline?;
        if now_ms < deadline {
            return None;
        }
        self.deadline = None;

        if self.document_id.is_none() && board.is_empty() {
            tracing::debug!("auto-save skipped: new board is empty");
            return None;
        }
        let snapshot = board.snapshot();
        let fingerprint = match serde_json::to_string(&snapshot) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(error = %err, "auto-save skipped: snapshot did not serialize");
                return None;
            }
        };
        if self.last_saved.as_deref() == Some(fingerprint.as_str()) {
            tracing::debug!("auto-save skipped: unchanged since last save");
            return None;
        }
        tracing::debug!(document_id = ?self.document_id, bytes = fingerprint.len(), "auto-save requested");
        Some(SaveRequest { document_id: self.document_id.clone(), snapshot, fingerprint })
    }

    /// Record a confirmed save.
    pub fn mark_saved(&mut self, fingerprint: String) {
        self.last_saved = Some(fingerprint);
    }
}
