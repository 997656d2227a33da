//! Trading notes journal
//!
//! Free-form per-trade annotations, kept separate from the challenge state:
//! notes reference trades the user made, not ladder entries, and deleting or
//! resetting the challenge does not touch them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Validation failures for note operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NoteError {
    #[error("note amount must be provided and finite")]
    InvalidAmount,
    #[error("position cannot be empty")]
    EmptyPosition,
    #[error("no note with id {0}")]
    NotFound(String),
}

/// Whether a note annotates a winning or losing trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeType {
    Profit,
    Loss,
}

impl fmt::Display for TradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeType::Profit => write!(f, "profit"),
            TradeType::Loss => write!(f, "loss"),
        }
    }
}

/// One journal entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    /// Unique note identifier (UUID v4)
    pub id: String,
    /// Profit or loss annotation
    pub trade_type: TradeType,
    /// Trade amount the note refers to
    pub amount: f64,
    /// Position description (e.g. "EURUSD long")
    pub position: String,
    /// Free-form comment
    pub comment: String,
    /// When the note was created
    pub date: DateTime<Utc>,
    /// UI toggle: whether the comment is expanded
    pub comment_visible: bool,
}

/// In-memory note collection, newest first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoteBook {
    notes: Vec<Note>,
}

impl NoteBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notes, newest first.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Add a note. Amount must be finite, position non-blank.
    /// Returns the new note's id.
    pub fn add(
        &mut self,
        trade_type: TradeType,
        amount: f64,
        position: &str,
        comment: &str,
    ) -> Result<String, NoteError> {
        if !amount.is_finite() {
            return Err(NoteError::InvalidAmount);
        }
        let position = position.trim();
        if position.is_empty() {
            return Err(NoteError::EmptyPosition);
        }

        let note = Note {
            id: Uuid::new_v4().to_string(),
            trade_type,
            amount,
            position: position.to_string(),
            comment: comment.trim().to_string(),
            date: Utc::now(),
            comment_visible: false,
        };
        let id = note.id.clone();
        self.notes.insert(0, note);
        Ok(id)
    }

    /// Remove a note by id.
    pub fn delete(&mut self, id: &str) -> Result<(), NoteError> {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        if self.notes.len() == before {
            return Err(NoteError::NotFound(id.to_string()));
        }
        Ok(())
    }

    /// Replace a note's position description. Blank input is rejected.
    pub fn update_position(&mut self, id: &str, new_position: &str) -> Result<(), NoteError> {
        let new_position = new_position.trim();
        if new_position.is_empty() {
            return Err(NoteError::EmptyPosition);
        }
        let note = self
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| NoteError::NotFound(id.to_string()))?;
        note.position = new_position.to_string();
        Ok(())
    }

    /// Flip a note's comment visibility.
    pub fn toggle_comment(&mut self, id: &str) -> Result<bool, NoteError> {
        let note = self
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| NoteError::NotFound(id.to_string()))?;
        note.comment_visible = !note.comment_visible;
        Ok(note.comment_visible)
    }
}
