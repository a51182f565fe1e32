//! Request types for the tool catalog.
//!
//! One struct per tool, deserialized straight from the request's `params`
//! object. Unknown fields are rejected so that a misspelled argument
//! surfaces as a schema violation instead of being silently dropped. The
//! schemars derives feed the registry's generated input schemas.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use score_state::timing::BeatValue;

/// A beat quantity on the wire: a number, or an expression string such as
/// `"9 + 1/3"` for arithmetic the client prefers to defer to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum BeatArg {
    Number(f64),
    Expression(String),
}

impl From<BeatArg> for BeatValue {
    fn from(arg: BeatArg) -> Self {
        match arg {
            BeatArg::Number(n) => BeatValue::Number(n),
            BeatArg::Expression(e) => BeatValue::Expression(e),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SetTitleRequest {
    #[schemars(description = "The title for the piece")]
    pub title: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct EmptyRequest {}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct AddSectionRequest {
    #[schemars(description = "Section name (must be unique)")]
    pub name: String,

    #[schemars(description = "Starting measure, 1-indexed, inclusive")]
    pub start_measure: u32,

    #[schemars(description = "Ending measure, inclusive")]
    pub end_measure: u32,

    #[schemars(description = "Tempo in BPM (1-300)")]
    pub tempo: u32,

    #[schemars(description = "Time signature such as \"4/4\" or \"6/8\"")]
    pub time_signature: String,

    #[schemars(description = "Key signature such as \"C\", \"Am\", \"F#m\" (not validated)")]
    pub key: String,

    #[schemars(description = "Optional free-text description")]
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct EditSectionRequest {
    #[schemars(description = "Name of the section to edit")]
    pub name: String,

    #[schemars(description = "New starting measure")]
    pub start_measure: Option<u32>,

    #[schemars(description = "New ending measure")]
    pub end_measure: Option<u32>,

    #[schemars(description = "New tempo in BPM (1-300)")]
    pub tempo: Option<u32>,

    #[schemars(description = "New time signature")]
    pub time_signature: Option<String>,

    #[schemars(description = "New key signature")]
    pub key: Option<String>,

    #[schemars(description = "New description")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct AddTrackRequest {
    #[schemars(description = "Track name (must be unique, non-empty)")]
    pub name: String,

    #[schemars(description = "Instrument name, e.g. \"piano\", \"violin\", \"drums\"")]
    pub instrument: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RemoveTrackRequest {
    #[schemars(description = "Name of the track to remove; its notes go with it")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct NoteEntry {
    #[schemars(description = "Track name (must exist)")]
    pub track: String,

    #[schemars(description = "MIDI note number (0-127)")]
    pub pitch: i64,

    #[schemars(description = "Start in quarter-note beats: number or expression like \"9 + 1/3\"")]
    pub start: BeatArg,

    #[schemars(description = "Duration in beats: number or expression")]
    pub duration: BeatArg,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct AddNotesRequest {
    #[schemars(description = "Notes to add; the batch is all-or-nothing")]
    pub notes: Vec<NoteEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RemoveNotesInRangeRequest {
    #[schemars(description = "Track name, or \"all\" for every track")]
    pub track: String,

    #[schemars(description = "Range start in beats, inclusive")]
    pub start_time: f64,

    #[schemars(description = "Range end in beats, exclusive")]
    pub end_time: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GetNotesRequest {
    #[schemars(description = "Only notes on this track")]
    pub track: Option<String>,

    #[schemars(description = "Only notes starting at or after this beat")]
    pub start_time: Option<f64>,

    #[schemars(description = "Only notes starting before this beat")]
    pub end_time: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ChordEntry {
    #[schemars(description = "Beat where the chord starts (>= 0)")]
    pub beat: f64,

    #[schemars(description = "Chord symbol, e.g. \"C\", \"Cm7\", \"G7\", \"Bbmaj9\"")]
    pub chord: String,

    #[schemars(description = "Duration in beats (> 0)")]
    pub duration: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct AddChordsRequest {
    #[schemars(description = "Chords to add; overlapping chords are split around the new ones")]
    pub chords: Vec<ChordEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct BeatRangeRequest {
    #[schemars(description = "Range start in beats, inclusive")]
    pub start_beat: f64,

    #[schemars(description = "Range end in beats, exclusive")]
    pub end_beat: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FlagNotesRequest {
    #[schemars(description = "Tracks whose notes should be checked")]
    pub tracks: Vec<String>,

    #[schemars(description = "Range start in beats, inclusive")]
    pub start_beat: f64,

    #[schemars(description = "Range end in beats, exclusive")]
    pub end_beat: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ExportMidiRequest {
    #[schemars(description = "Output path; \".mid\" is appended when missing")]
    pub filepath: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_fields_are_rejected() {
        let raw = r#"{"title": "x", "subtitle": "y"}"#;
        assert!(serde_json::from_str::<SetTitleRequest>(raw).is_err());
    }

    #[test]
    fn beat_args_accept_numbers_and_strings() {
        let note: NoteEntry = serde_json::from_str(
            r#"{"track":"p","pitch":60,"start":"9 + 1/3","duration":0.5}"#,
        )
        .unwrap();
        assert_eq!(note.start, BeatArg::Expression("9 + 1/3".into()));
        assert_eq!(note.duration, BeatArg::Number(0.5));
    }

    #[test]
    fn section_description_defaults_to_empty() {
        let request: AddSectionRequest = serde_json::from_str(
            r#"{"name":"A","start_measure":1,"end_measure":8,"tempo":120,"time_signature":"4/4","key":"C"}"#,
        )
        .unwrap();
        assert_eq!(request.description, "");
    }

    #[test]
    fn empty_request_rejects_stray_params() {
        assert!(serde_json::from_str::<EmptyRequest>("{}").is_ok());
        assert!(serde_json::from_str::<EmptyRequest>(r#"{"x":1}"#).is_err());
    }
}
