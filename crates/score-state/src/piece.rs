//! The document model: one in-memory musical piece.
//!
//! The piece is the unit of state the whole server mediates. Entities are
//! plain owned data with serde derives; cloning any of them yields a
//! structurally independent copy, which is what the snapshot engine relies
//! on.

use num_rational::Rational64;
use serde::{Deserialize, Serialize};

use crate::error::ScoreError;
use crate::history::History;
use crate::timing::BeatValue;

/// A named instrument lane. `name` is the primary key; `instrument` is a
/// free-form name resolved to a General MIDI program at export time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub instrument: String,
}

/// A single note event. `start` and `duration` keep their authored form
/// (number or expression string); `flagged` is transient validator output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub track: String,
    pub pitch: u8,
    pub start: BeatValue,
    pub duration: BeatValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flagged: Option<bool>,
}

/// A time signature of the form `n/d` with `d` a power of two up to 16.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSignature {
    pub numerator: u8,
    pub denominator: u8,
}

impl TimeSignature {
    pub const COMMON: TimeSignature = TimeSignature {
        numerator: 4,
        denominator: 4,
    };

    /// Quarter-note beats per measure: `numerator * 4 / denominator`.
    pub fn beats_per_measure(&self) -> Rational64 {
        Rational64::new(self.numerator as i64 * 4, self.denominator as i64)
    }
}

impl std::fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl std::str::FromStr for TimeSignature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (n, d) = s
            .split_once('/')
            .ok_or_else(|| format!("time signature {:?} is not of the form n/d", s))?;
        let numerator: u8 = n
            .parse()
            .map_err(|_| format!("bad time signature numerator {:?}", n))?;
        let denominator: u8 = d
            .parse()
            .map_err(|_| format!("bad time signature denominator {:?}", d))?;
        if numerator == 0 {
            return Err(format!("time signature numerator must be >= 1 in {:?}", s));
        }
        if !matches!(denominator, 1 | 2 | 4 | 8 | 16) {
            return Err(format!(
                "time signature denominator must be one of 1, 2, 4, 8, 16 in {:?}",
                s
            ));
        }
        Ok(TimeSignature {
            numerator,
            denominator,
        })
    }
}

impl TryFrom<String> for TimeSignature {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TimeSignature> for String {
    fn from(ts: TimeSignature) -> Self {
        ts.to_string()
    }
}

/// A contiguous span of measures with its own tempo, meter, and key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub start_measure: u32,
    pub end_measure: u32,
    pub tempo: u32,
    pub time_signature: TimeSignature,
    pub key: String,
    #[serde(default)]
    pub description: String,
}

impl Section {
    /// Inclusive measure-range intersection test.
    pub fn overlaps(&self, other: &Section) -> bool {
        self.start_measure <= other.end_measure && other.start_measure <= self.end_measure
    }
}

/// One chord in the planned progression, with the pitch-class names the
/// parser derived from its symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chord {
    pub beat: f64,
    pub chord: String,
    pub duration: f64,
    pub chord_tones: Vec<String>,
}

impl Chord {
    pub fn end(&self) -> f64 {
        self.beat + self.duration
    }
}

/// The singleton document. All mutation goes through the operation methods
/// spread across this crate's modules; each one checkpoints history before
/// its first write and validates before checkpointing, so a failed call
/// neither changes the document nor consumes an undo slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub(crate) title: String,
    pub(crate) tracks: Vec<Track>,
    pub(crate) notes: Vec<Note>,
    pub(crate) sections: Vec<Section>,
    pub(crate) progression: Vec<Chord>,
    pub(crate) history: History,
}

impl Default for Piece {
    fn default() -> Self {
        Piece {
            title: "Untitled".to_string(),
            tracks: Vec::new(),
            notes: Vec::new(),
            sections: Vec::new(),
            progression: Vec::new(),
            history: History::default(),
        }
    }
}

impl Piece {
    pub fn new() -> Self {
        Piece::default()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.checkpoint();
        self.title = title.into();
    }

    /// Tracks in declaration order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, name: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.name == name)
    }

    pub fn has_track(&self, name: &str) -> bool {
        self.track(name).is_some()
    }

    pub fn add_track(
        &mut self,
        name: impl Into<String>,
        instrument: impl Into<String>,
    ) -> Result<(), ScoreError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ScoreError::InvalidRange {
                reason: "track name must be non-empty".into(),
            });
        }
        if self.has_track(&name) {
            return Err(ScoreError::DuplicateName {
                entity: "track",
                name,
            });
        }
        self.checkpoint();
        self.tracks.push(Track {
            name,
            instrument: instrument.into(),
        });
        Ok(())
    }

    /// Remove a track and every note referencing it. Returns the number of
    /// cascaded note deletions.
    pub fn remove_track(&mut self, name: &str) -> Result<usize, ScoreError> {
        if !self.has_track(name) {
            return Err(ScoreError::NotFound {
                entity: "track",
                name: name.to_string(),
            });
        }
        self.checkpoint();
        self.tracks.retain(|t| t.name != name);
        let before = self.notes.len();
        self.notes.retain(|n| n.track != name);
        Ok(before - self.notes.len())
    }

    /// Notes in insertion order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    /// Sections sorted by `start_measure`.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Chord progression sorted by `beat`.
    pub fn progression(&self) -> &[Chord] {
        &self.progression
    }
}
