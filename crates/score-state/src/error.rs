//! Typed errors for document operations.
//!
//! Every predictable failure surfaces as one of these variants; the server
//! maps them onto wire error envelopes by `kind()`. Batch operations wrap
//! the underlying failure together with the offending entry index.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    #[error("malformed expression {expr:?}: {reason}")]
    MalformedExpression { expr: String, reason: String },

    #[error("unknown chord symbol {symbol:?}")]
    UnknownChordSymbol { symbol: String },

    #[error("{entity} {name:?} already exists")]
    DuplicateName { entity: &'static str, name: String },

    #[error("{entity} {name:?} not found")]
    NotFound { entity: &'static str, name: String },

    #[error("invalid range: {reason}")]
    InvalidRange { reason: String },

    #[error("section {name:?} overlaps existing section {other:?}")]
    SectionOverlap { name: String, other: String },

    #[error("editing section {name:?} would swallow section {neighbor:?}")]
    SectionWouldSwallow { name: String, neighbor: String },

    #[error("pitch {pitch} is outside the MIDI range 0-127")]
    PitchOutOfRange { pitch: i64 },

    #[error("duration must be positive, got {value}")]
    DurationNonPositive { value: f64 },

    #[error("track {name:?} does not exist")]
    TrackMissing { name: String },

    #[error("no chord progression defined; add chords first")]
    NoProgression,

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,

    #[error("note {index}: {source}")]
    NoteBatch {
        index: usize,
        #[source]
        source: Box<ScoreError>,
    },

    #[error("chord {index}: {source}")]
    ChordBatch {
        index: usize,
        #[source]
        source: Box<ScoreError>,
    },
}

impl ScoreError {
    /// Stable snake_case identifier for the wire `data.kind` field.
    ///
    /// Batch wrappers report the kind of the underlying failure; the index
    /// travels separately via [`ScoreError::batch_index`].
    pub fn kind(&self) -> &'static str {
        match self {
            ScoreError::MalformedExpression { .. } => "malformed_expression",
            ScoreError::UnknownChordSymbol { .. } => "unknown_chord_symbol",
            ScoreError::DuplicateName { .. } => "duplicate_name",
            ScoreError::NotFound { .. } => "not_found",
            ScoreError::InvalidRange { .. } => "invalid_range",
            ScoreError::SectionOverlap { .. } => "section_overlap",
            ScoreError::SectionWouldSwallow { .. } => "section_would_swallow",
            ScoreError::PitchOutOfRange { .. } => "pitch_out_of_range",
            ScoreError::DurationNonPositive { .. } => "duration_non_positive",
            ScoreError::TrackMissing { .. } => "track_missing",
            ScoreError::NoProgression => "no_progression",
            ScoreError::NothingToUndo => "nothing_to_undo",
            ScoreError::NothingToRedo => "nothing_to_redo",
            ScoreError::NoteBatch { source, .. } => source.kind(),
            ScoreError::ChordBatch { source, .. } => source.kind(),
        }
    }

    /// The offending entry index for batch failures.
    pub fn batch_index(&self) -> Option<usize> {
        match self {
            ScoreError::NoteBatch { index, .. } | ScoreError::ChordBatch { index, .. } => {
                Some(*index)
            }
            _ => None,
        }
    }
}
