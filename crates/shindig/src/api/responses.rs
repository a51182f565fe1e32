//! Typed response payloads for the tool catalog.
//!
//! Serialized into the JSON-RPC `result` field. Document entities
//! (notes, sections, chords) reuse their score-state serde forms so the
//! wire shape always matches what the document holds.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use score_state::{Chord, Note, Section};

/// Plain acknowledgement for mutators with nothing else to report.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Ack {
    pub ok: bool,
}

impl Ack {
    pub fn ok() -> Self {
        Ack { ok: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionSummary {
    pub name: String,
    /// Inclusive measure span, e.g. "1-8".
    pub measures: String,
    pub tempo: u32,
    pub time_signature: String,
    pub key: String,
}

impl From<&Section> for SectionSummary {
    fn from(section: &Section) -> Self {
        SectionSummary {
            name: section.name.clone(),
            measures: format!("{}-{}", section.start_measure, section.end_measure),
            tempo: section.tempo,
            time_signature: section.time_signature.to_string(),
            key: section.key.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PieceInfoResponse {
    pub title: String,
    pub sections: Vec<SectionSummary>,
    /// Track names in declaration order.
    pub tracks: Vec<String>,
    pub note_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackInfo {
    pub name: String,
    pub instrument: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveTrackResponse {
    pub removed_notes_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddNotesResponse {
    pub added_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveNotesResponse {
    pub removed_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddChordsResponse {
    pub chords_added: Vec<Chord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveChordsResponse {
    pub ok: bool,
    pub removed_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlagNotesResponse {
    pub flagged_count: usize,
}

/// A deleted note, minus the flag that doomed it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemovedNote {
    pub track: String,
    pub pitch: u8,
    pub start: score_state::BeatValue,
    pub duration: score_state::BeatValue,
}

impl From<Note> for RemovedNote {
    fn from(note: Note) -> Self {
        RemovedNote {
            track: note.track,
            pitch: note.pitch,
            start: note.start,
            duration: note.duration,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveFlaggedResponse {
    pub removed: Vec<RemovedNote>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMidiResponse {
    /// The path actually written, after extension handling.
    pub filepath: String,
}
