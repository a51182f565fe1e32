//! Harmony validation: marking notes that clash with the planned chords.
//!
//! A note is flagged when its pitch class is absent from the tones of the
//! chord active at its start beat. Flags are transient: every validation
//! pass starts by clearing all of them, and removing chords clears them
//! too. Tone names are compared as 0-11 integers, so a `C#` chord tone
//! matches a `Db` note.

use tracing::debug;

use crate::chord::pitch_class_of_name;
use crate::error::ScoreError;
use crate::piece::{Chord, Note, Piece};

impl Piece {
    /// Flag notes in `tracks` whose start lies in `[start, end)` and whose
    /// pitch class is not among the active chord's tones. Returns how many
    /// were flagged.
    ///
    /// Notes with no chord underneath are left alone: missing harmony is
    /// not an error. An empty progression only fails when the range
    /// actually contains candidate notes.
    pub fn flag_notes(
        &mut self,
        tracks: &[String],
        start: f64,
        end: f64,
    ) -> Result<usize, ScoreError> {
        let candidates: Vec<usize> = self
            .notes
            .iter()
            .enumerate()
            .filter_map(|(i, note)| {
                if !tracks.iter().any(|t| *t == note.track) {
                    return None;
                }
                let s = note.start.eval_f64().ok()?;
                (start <= s && s < end).then_some(i)
            })
            .collect();

        if self.progression.is_empty() && !candidates.is_empty() {
            return Err(ScoreError::NoProgression);
        }

        self.checkpoint();
        for note in &mut self.notes {
            note.flagged = None;
        }

        let mut flagged = 0;
        for idx in candidates {
            let note = &self.notes[idx];
            // Candidate starts evaluated above, so this cannot fail.
            let Ok(s) = note.start.eval_f64() else { continue };
            let Some(chord) = chord_at(&self.progression, s) else {
                continue;
            };
            if !chord_contains_pitch(chord, note.pitch) {
                self.notes[idx].flagged = Some(true);
                flagged += 1;
            }
        }
        debug!(flagged, "flag notes");
        Ok(flagged)
    }

    /// Delete every flagged note, returning the deleted notes for audit.
    pub fn remove_flagged_notes(&mut self) -> Vec<Note> {
        self.checkpoint();
        let mut removed = Vec::new();
        self.notes.retain(|note| {
            if note.flagged == Some(true) {
                removed.push(note.clone());
                false
            } else {
                true
            }
        });
        debug!(removed = removed.len(), "remove flagged notes");
        removed
    }
}

/// The unique chord whose interval contains `beat`, if any.
fn chord_at(progression: &[Chord], beat: f64) -> Option<&Chord> {
    progression
        .iter()
        .find(|c| c.beat <= beat && beat < c.end())
}

fn chord_contains_pitch(chord: &Chord, pitch: u8) -> bool {
    let pc = pitch % 12;
    chord
        .chord_tones
        .iter()
        .filter_map(|name| pitch_class_of_name(name))
        .any(|tone| tone == pc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::{ChordSpec, NoteSpec};

    fn melody_piece() -> Piece {
        let mut piece = Piece::new();
        piece.add_track("m", "piano").unwrap();
        // C D E F on beats 0..4.
        piece
            .add_notes(
                [(60, 0.0), (62, 1.0), (64, 2.0), (65, 3.0)]
                    .iter()
                    .map(|&(pitch, start)| NoteSpec {
                        track: "m".into(),
                        pitch,
                        start: start.into(),
                        duration: 1.0.into(),
                    })
                    .collect(),
            )
            .unwrap();
        piece
    }

    fn c_major(piece: &mut Piece) {
        piece
            .add_chords(vec![ChordSpec {
                beat: 0.0,
                chord: "C".into(),
                duration: 4.0,
            }])
            .unwrap();
    }

    #[test]
    fn flags_non_chord_tones() {
        let mut piece = melody_piece();
        c_major(&mut piece);

        let flagged = piece.flag_notes(&["m".to_string()], 0.0, 4.0).unwrap();
        assert_eq!(flagged, 2); // D and F are outside {C, E, G}

        let marked: Vec<u8> = piece
            .notes()
            .iter()
            .filter(|n| n.flagged == Some(true))
            .map(|n| n.pitch)
            .collect();
        assert_eq!(marked, [62, 65]);
    }

    #[test]
    fn flagging_is_idempotent() {
        let mut piece = melody_piece();
        c_major(&mut piece);
        assert_eq!(piece.flag_notes(&["m".to_string()], 0.0, 4.0).unwrap(), 2);
        assert_eq!(piece.flag_notes(&["m".to_string()], 0.0, 4.0).unwrap(), 2);
    }

    #[test]
    fn each_pass_clears_all_previous_flags() {
        let mut piece = melody_piece();
        c_major(&mut piece);
        piece.flag_notes(&["m".to_string()], 0.0, 4.0).unwrap();

        // A narrower pass over beats [0, 2) only re-flags D; the old F
        // flag must be gone even though F is outside the new range.
        let flagged = piece.flag_notes(&["m".to_string()], 0.0, 2.0).unwrap();
        assert_eq!(flagged, 1);
        let marked: Vec<u8> = piece
            .notes()
            .iter()
            .filter(|n| n.flagged == Some(true))
            .map(|n| n.pitch)
            .collect();
        assert_eq!(marked, [62]);
    }

    #[test]
    fn notes_without_harmony_are_left_alone() {
        let mut piece = melody_piece();
        // Chord covers beats [0, 2) only; E and F at 2 and 3 have no chord.
        piece
            .add_chords(vec![ChordSpec {
                beat: 0.0,
                chord: "C".into(),
                duration: 2.0,
            }])
            .unwrap();

        let flagged = piece.flag_notes(&["m".to_string()], 0.0, 4.0).unwrap();
        assert_eq!(flagged, 1); // only D
    }

    #[test]
    fn empty_progression_with_candidates_is_an_error() {
        let mut piece = melody_piece();
        let err = piece.flag_notes(&["m".to_string()], 0.0, 4.0).unwrap_err();
        assert_eq!(err, ScoreError::NoProgression);
    }

    #[test]
    fn empty_progression_without_candidates_returns_zero() {
        let mut piece = melody_piece();
        assert_eq!(piece.flag_notes(&["m".to_string()], 50.0, 60.0).unwrap(), 0);
        assert_eq!(
            piece.flag_notes(&["other".to_string()], 0.0, 4.0).unwrap(),
            0
        );
    }

    #[test]
    fn enharmonic_chord_tones_match() {
        let mut piece = Piece::new();
        piece.add_track("m", "piano").unwrap();
        // C# major spelled as Db: tones Db F Ab. A note on C# (61) matches.
        piece
            .add_chords(vec![ChordSpec {
                beat: 0.0,
                chord: "Db".into(),
                duration: 4.0,
            }])
            .unwrap();
        piece
            .add_notes(vec![NoteSpec {
                track: "m".into(),
                pitch: 61,
                start: 0.0.into(),
                duration: 1.0.into(),
            }])
            .unwrap();

        assert_eq!(piece.flag_notes(&["m".to_string()], 0.0, 4.0).unwrap(), 0);
    }

    #[test]
    fn remove_flagged_returns_the_removed_notes() {
        let mut piece = melody_piece();
        c_major(&mut piece);
        piece.flag_notes(&["m".to_string()], 0.0, 4.0).unwrap();

        let removed = piece.remove_flagged_notes();
        assert_eq!(removed.len(), 2);
        assert_eq!(removed[0].pitch, 62);
        assert_eq!(removed[1].pitch, 65);
        assert_eq!(piece.note_count(), 2);

        // Nothing left to flag afterwards.
        assert_eq!(piece.flag_notes(&["m".to_string()], 0.0, 4.0).unwrap(), 0);
        assert!(piece.remove_flagged_notes().is_empty());
    }
}
