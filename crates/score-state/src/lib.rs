//! In-memory symbolic-music document with undoable CRUD operations.
//!
//! The document (a [`Piece`]) holds a title, named instrument tracks, an
//! ordered note list, a sorted non-overlapping section layout, and a
//! sorted non-overlapping chord progression. Every mutating operation
//! validates first, then checkpoints a deep snapshot onto a bounded undo
//! stack, then writes — so a failed call leaves the document untouched
//! and never consumes an undo slot.

pub mod chord;
pub mod error;
mod harmony;
pub mod history;
mod notes;
mod piece;
mod sections;
pub mod timing;

pub use chord::{parse_chord_symbol, pitch_class_of_name, supported_qualities, ChordQuality, ParsedChord};
pub use error::ScoreError;
pub use history::MAX_UNDO_DEPTH;
pub use notes::{ChordSpec, NoteSpec};
pub use piece::{Chord, Note, Piece, Section, TimeSignature, Track};
pub use sections::SectionPatch;
pub use timing::{eval_expression, BeatValue};
