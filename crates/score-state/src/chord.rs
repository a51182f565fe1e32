//! Chord-symbol parsing.
//!
//! Maps a symbol such as `"Cm7"` or `"Bbmaj9"` to a root pitch class, a
//! quality, and the set of pitch-class names the chord implies. Tone names
//! use the accidental spelling of the root (`Db9` yields flats, `C#9`
//! sharps); enharmonics are not normalized here, so consumers that compare
//! tones must reduce names to 0-11 integers first.

use serde::{Deserialize, Serialize};

use crate::error::ScoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
    Augmented,
    Suspended2,
    Suspended4,
    Major6,
    Minor6,
    Dominant7,
    Major7,
    Minor7,
    Diminished7,
    HalfDiminished7,
    Add9,
    Dominant9,
    Minor9,
    Major9,
    Dominant11,
    Dominant13,
}

/// Quality suffix table, matched exactly against the symbol remainder
/// after the root. Intervals are semitones from the root and may exceed an
/// octave; tone names reduce them mod 12.
struct Quality {
    suffix: &'static str,
    quality: ChordQuality,
    intervals: &'static [u8],
}

static QUALITIES: &[Quality] = &[
    Quality { suffix: "m7b5", quality: ChordQuality::HalfDiminished7, intervals: &[0, 3, 6, 10] },
    Quality { suffix: "add9", quality: ChordQuality::Add9, intervals: &[0, 4, 7, 14] },
    Quality { suffix: "maj7", quality: ChordQuality::Major7, intervals: &[0, 4, 7, 11] },
    Quality { suffix: "maj9", quality: ChordQuality::Major9, intervals: &[0, 4, 7, 11, 14] },
    Quality { suffix: "dim7", quality: ChordQuality::Diminished7, intervals: &[0, 3, 6, 9] },
    Quality { suffix: "sus2", quality: ChordQuality::Suspended2, intervals: &[0, 2, 7] },
    Quality { suffix: "sus4", quality: ChordQuality::Suspended4, intervals: &[0, 5, 7] },
    Quality { suffix: "dim", quality: ChordQuality::Diminished, intervals: &[0, 3, 6] },
    Quality { suffix: "aug", quality: ChordQuality::Augmented, intervals: &[0, 4, 8] },
    Quality { suffix: "m6", quality: ChordQuality::Minor6, intervals: &[0, 3, 7, 9] },
    Quality { suffix: "m7", quality: ChordQuality::Minor7, intervals: &[0, 3, 7, 10] },
    Quality { suffix: "m9", quality: ChordQuality::Minor9, intervals: &[0, 3, 7, 10, 14] },
    Quality { suffix: "13", quality: ChordQuality::Dominant13, intervals: &[0, 4, 7, 10, 14, 21] },
    Quality { suffix: "11", quality: ChordQuality::Dominant11, intervals: &[0, 4, 7, 10, 14, 17] },
    Quality { suffix: "9", quality: ChordQuality::Dominant9, intervals: &[0, 4, 7, 10, 14] },
    Quality { suffix: "7", quality: ChordQuality::Dominant7, intervals: &[0, 4, 7, 10] },
    Quality { suffix: "6", quality: ChordQuality::Major6, intervals: &[0, 4, 7, 9] },
    Quality { suffix: "m", quality: ChordQuality::Minor, intervals: &[0, 3, 7] },
    Quality { suffix: "", quality: ChordQuality::Major, intervals: &[0, 4, 7] },
];

const NOTE_NAMES_SHARP: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];
const NOTE_NAMES_FLAT: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// Human-readable quality list for `UnknownChordSymbol` payloads.
pub fn supported_qualities() -> Vec<&'static str> {
    vec![
        "major", "minor (m)", "diminished (dim)", "augmented (aug)", "sus2", "sus4",
        "6th (6)", "m6", "dominant 7th (7)", "major 7th (maj7)", "minor 7th (m7)",
        "dim7", "m7b5", "add9", "9th (9)", "m9", "maj9", "11th (11)", "13th (13)",
    ]
}

/// A successfully parsed chord symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedChord {
    /// Root as a 0-11 pitch class (C = 0).
    pub root: u8,
    pub quality: ChordQuality,
    /// Pitch-class names in interval order, spelled per the root accidental.
    pub tones: Vec<String>,
}

/// Parse a chord symbol into root, quality, and tone names.
pub fn parse_chord_symbol(symbol: &str) -> Result<ParsedChord, ScoreError> {
    let unknown = || ScoreError::UnknownChordSymbol {
        symbol: symbol.to_string(),
    };

    let mut chars = symbol.chars();
    let letter = chars.next().ok_or_else(unknown)?;
    let natural: i8 = match letter {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return Err(unknown()),
    };

    let rest = chars.as_str();
    let (accidental, suffix) = match rest.as_bytes().first() {
        Some(b'#') => (1i8, &rest[1..]),
        Some(b'b') => (-1i8, &rest[1..]),
        _ => (0i8, rest),
    };
    let root = (natural + accidental).rem_euclid(12) as u8;
    let use_flats = accidental < 0;

    let quality = QUALITIES
        .iter()
        .find(|q| q.suffix == suffix)
        .ok_or_else(unknown)?;

    let names = if use_flats { &NOTE_NAMES_FLAT } else { &NOTE_NAMES_SHARP };
    let tones = quality
        .intervals
        .iter()
        .map(|&iv| names[((root as usize) + iv as usize) % 12].to_string())
        .collect();

    Ok(ParsedChord {
        root,
        quality: quality.quality,
        tones,
    })
}

/// Resolve a pitch-class name to its 0-11 integer. Accepts both sharp and
/// flat spellings.
pub fn pitch_class_of_name(name: &str) -> Option<u8> {
    let mut chars = name.chars();
    let natural: i8 = match chars.next()? {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };
    let accidental: i8 = match chars.next() {
        None => 0,
        Some('#') => 1,
        Some('b') => -1,
        Some(_) => return None,
    };
    if chars.next().is_some() {
        return None;
    }
    Some((natural + accidental).rem_euclid(12) as u8)
}
