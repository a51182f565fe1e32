//! Snapshot history: bounded undo, symmetric redo.
//!
//! Every mutating operation calls [`Piece::checkpoint`] after its
//! validation passes and before its first write. A checkpoint deep-copies
//! the document (minus the history stacks themselves), trims the undo
//! stack from the bottom to [`MAX_UNDO_DEPTH`], and invalidates redo.

use crate::error::ScoreError;
use crate::piece::{Chord, Note, Piece, Section, Track};

/// Upper bound on stored undo snapshots. Trimming discards the oldest.
pub const MAX_UNDO_DEPTH: usize = 10;

/// A structurally independent copy of the document, minus history.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    title: String,
    tracks: Vec<Track>,
    notes: Vec<Note>,
    sections: Vec<Section>,
    progression: Vec<Chord>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    undo: Vec<Snapshot>,
    redo: Vec<Snapshot>,
}

impl History {
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }
}

impl Piece {
    /// Capture the current document state, excluding history.
    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            title: self.title.clone(),
            tracks: self.tracks.clone(),
            notes: self.notes.clone(),
            sections: self.sections.clone(),
            progression: self.progression.clone(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.title = snapshot.title;
        self.tracks = snapshot.tracks;
        self.notes = snapshot.notes;
        self.sections = snapshot.sections;
        self.progression = snapshot.progression;
    }

    /// Push an undo snapshot. Must be called by every mutator after its
    /// validation succeeds and before its first write, so that a failing
    /// call never consumes an undo slot.
    pub(crate) fn checkpoint(&mut self) {
        self.history.undo.push(self.snapshot());
        while self.history.undo.len() > MAX_UNDO_DEPTH {
            self.history.undo.remove(0);
        }
        self.history.redo.clear();
    }

    /// Restore the state prior to the most recent checkpointed mutation.
    pub fn undo(&mut self) -> Result<(), ScoreError> {
        let previous = self.history.undo.pop().ok_or(ScoreError::NothingToUndo)?;
        let current = self.snapshot();
        self.history.redo.push(current);
        self.restore(previous);
        Ok(())
    }

    /// Reapply the most recently undone state.
    pub fn redo(&mut self) -> Result<(), ScoreError> {
        let next = self.history.redo.pop().ok_or(ScoreError::NothingToRedo)?;
        let current = self.snapshot();
        self.history.undo.push(current);
        self.restore(next);
        Ok(())
    }

    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }
}
