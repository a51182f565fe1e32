//! Note and chord-progression operations.
//!
//! Batch adds are atomic: every entry validates before anything is
//! written, and a failure names the offending index. Range operations use
//! half-open `[start, end)` intervals over note start positions. Chord
//! inserts resolve overlap by splitting: the incoming chord claims its
//! interval and existing chords are trimmed to whatever lies outside it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chord::parse_chord_symbol;
use crate::error::ScoreError;
use crate::piece::{Chord, Note, Piece};
use crate::timing::BeatValue;

/// One entry of an `add_notes` batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteSpec {
    pub track: String,
    pub pitch: i64,
    pub start: BeatValue,
    pub duration: BeatValue,
}

/// One entry of an `add_chords` batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordSpec {
    pub beat: f64,
    pub chord: String,
    pub duration: f64,
}

impl Piece {
    /// Add a batch of notes atomically. Returns the number added.
    pub fn add_notes(&mut self, batch: Vec<NoteSpec>) -> Result<usize, ScoreError> {
        let mut validated = Vec::with_capacity(batch.len());
        for (index, spec) in batch.into_iter().enumerate() {
            let note = self.validate_note(spec).map_err(|source| {
                ScoreError::NoteBatch {
                    index,
                    source: Box::new(source),
                }
            })?;
            validated.push(note);
        }

        self.checkpoint();
        let added = validated.len();
        debug!(count = added, "add notes");
        self.notes.extend(validated);
        Ok(added)
    }

    fn validate_note(&self, spec: NoteSpec) -> Result<Note, ScoreError> {
        if !self.has_track(&spec.track) {
            return Err(ScoreError::TrackMissing { name: spec.track });
        }
        if !(0..=127).contains(&spec.pitch) {
            return Err(ScoreError::PitchOutOfRange { pitch: spec.pitch });
        }
        let start = spec.start.eval_f64()?;
        if start < 0.0 {
            return Err(ScoreError::InvalidRange {
                reason: format!("note start must be non-negative, got {}", start),
            });
        }
        let duration = spec.duration.eval_f64()?;
        if duration <= 0.0 {
            return Err(ScoreError::DurationNonPositive { value: duration });
        }
        Ok(Note {
            track: spec.track,
            pitch: spec.pitch as u8,
            start: spec.start,
            duration: spec.duration,
            flagged: None,
        })
    }

    /// Delete notes with `start <= note.start < end` on one track, or on
    /// every track when `track` is the sentinel `"all"`.
    pub fn remove_notes_in_range(
        &mut self,
        track: &str,
        start: f64,
        end: f64,
    ) -> Result<usize, ScoreError> {
        let all = track == "all";
        if !all && !self.has_track(track) {
            return Err(ScoreError::TrackMissing {
                name: track.to_string(),
            });
        }

        self.checkpoint();
        let before = self.notes.len();
        // Stored starts were validated at add time, so evaluation cannot
        // fail here; an unevaluable start keeps its note.
        self.notes.retain(|n| {
            if !all && n.track != track {
                return true;
            }
            match n.start.eval_f64() {
                Ok(s) => !(start <= s && s < end),
                Err(_) => true,
            }
        });
        let removed = before - self.notes.len();
        debug!(track, removed, "remove notes in range");
        Ok(removed)
    }

    /// Query notes, filtered by any combination of track and half-open
    /// start range. Insertion order is preserved.
    pub fn get_notes(
        &self,
        track: Option<&str>,
        start: Option<f64>,
        end: Option<f64>,
    ) -> Result<Vec<Note>, ScoreError> {
        let mut result = Vec::new();
        for note in &self.notes {
            if let Some(t) = track {
                if note.track != t {
                    continue;
                }
            }
            if start.is_some() || end.is_some() {
                let s = note.start.eval_f64()?;
                if let Some(lo) = start {
                    if s < lo {
                        continue;
                    }
                }
                if let Some(hi) = end {
                    if s >= hi {
                        continue;
                    }
                }
            }
            result.push(note.clone());
        }
        Ok(result)
    }

    /// Add chords atomically, resolving overlap by split-on-insert.
    /// Returns the chords as stored, with their derived tones.
    pub fn add_chords(&mut self, batch: Vec<ChordSpec>) -> Result<Vec<Chord>, ScoreError> {
        let mut incoming = Vec::with_capacity(batch.len());
        for (index, spec) in batch.into_iter().enumerate() {
            let chord = validate_chord(spec).map_err(|source| ScoreError::ChordBatch {
                index,
                source: Box::new(source),
            })?;
            incoming.push(chord);
        }

        self.checkpoint();
        for chord in &incoming {
            debug!(symbol = %chord.chord, beat = chord.beat, "add chord");
            splice_chord(&mut self.progression, chord.clone());
        }
        self.progression
            .sort_by(|a, b| a.beat.total_cmp(&b.beat));
        Ok(incoming)
    }

    /// Chords whose interval intersects `[start, end)`.
    pub fn chords_in_range(&self, start: f64, end: f64) -> Vec<Chord> {
        self.progression
            .iter()
            .filter(|c| c.beat < end && c.end() > start)
            .cloned()
            .collect()
    }

    /// Remove chords intersecting `[start, end)`. Clears the `flagged`
    /// mark on every note, since the harmony the flags were computed
    /// against is now stale.
    pub fn remove_chords_in_range(&mut self, start: f64, end: f64) -> Result<usize, ScoreError> {
        self.checkpoint();
        let before = self.progression.len();
        self.progression.retain(|c| !(c.beat < end && c.end() > start));
        let removed = before - self.progression.len();

        for note in &mut self.notes {
            note.flagged = None;
        }
        debug!(removed, "remove chords in range");
        Ok(removed)
    }
}

fn validate_chord(spec: ChordSpec) -> Result<Chord, ScoreError> {
    if !spec.beat.is_finite() || spec.beat < 0.0 {
        return Err(ScoreError::InvalidRange {
            reason: format!("chord beat must be non-negative, got {}", spec.beat),
        });
    }
    if !spec.duration.is_finite() || spec.duration <= 0.0 {
        return Err(ScoreError::DurationNonPositive {
            value: spec.duration,
        });
    }
    let parsed = parse_chord_symbol(&spec.chord)?;
    Ok(Chord {
        beat: spec.beat,
        chord: spec.chord,
        duration: spec.duration,
        chord_tones: parsed.tones,
    })
}

/// Insert `incoming`, trimming every existing chord to the part of its
/// interval outside `[incoming.beat, incoming.end())`. A fully covered
/// chord is dropped.
fn splice_chord(progression: &mut Vec<Chord>, incoming: Chord) {
    let (new_start, new_end) = (incoming.beat, incoming.end());
    let mut updated = Vec::with_capacity(progression.len() + 1);

    for existing in progression.drain(..) {
        let (start, end) = (existing.beat, existing.end());
        if end <= new_start || start >= new_end {
            updated.push(existing);
            continue;
        }
        // Keep the untouched part before the incoming chord.
        if start < new_start {
            updated.push(Chord {
                beat: start,
                duration: new_start - start,
                chord: existing.chord.clone(),
                chord_tones: existing.chord_tones.clone(),
            });
        }
        // And the untouched part after it.
        if end > new_end {
            updated.push(Chord {
                beat: new_end,
                duration: end - new_end,
                chord: existing.chord,
                chord_tones: existing.chord_tones,
            });
        }
    }

    updated.push(incoming);
    *progression = updated;
}
