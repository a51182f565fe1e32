//! Standard MIDI File synthesis.
//!
//! Rendering is a pure function of the document: the same piece always
//! yields the same bytes. Output is a format 1 file at 480 ticks per
//! quarter note. Track 0 carries the tempo map and time signatures derived
//! from the section layout; each document track becomes one instrument
//! track with a name event, a program change, and its note events.

use std::path::{Path, PathBuf};

use num_rational::Rational64;
use num_traits::CheckedMul;
use thiserror::Error;
use tracing::info;

use score_state::{Note, Piece, Section, TimeSignature};

use crate::gm;

/// MIDI resolution: one quarter-note beat is 480 ticks.
pub const TICKS_PER_BEAT: i64 = 480;

/// Fixed note-on velocity; performance expression is out of scope.
pub const VELOCITY: u8 = 64;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Score(#[from] score_state::ScoreError),

    #[error("tick position out of range")]
    TickOverflow,

    #[error("failed to write MIDI file: {0}")]
    Io(#[from] std::io::Error),
}

/// Event ordering rank at equal ticks: meta/setup events first, then
/// note-offs, then note-ons. Off-before-on prevents zero-length release
/// artifacts when a note ends exactly where another begins on the same
/// pitch.
const RANK_SETUP: u8 = 0;
const RANK_NOTE_OFF: u8 = 1;
const RANK_NOTE_ON: u8 = 2;

type Event = (i64, u8, Vec<u8>);

/// Render the piece to Standard MIDI File bytes.
pub fn render(piece: &Piece) -> Result<Vec<u8>, RenderError> {
    let mut tracks = Vec::with_capacity(1 + piece.tracks().len());
    tracks.push(build_conductor_track(piece.sections()));

    let mut melodic_channel: u8 = 0;
    for track in piece.tracks() {
        let channel = if gm::is_percussion(&track.instrument) || gm::is_percussion(&track.name) {
            9
        } else {
            let ch = melodic_channel;
            melodic_channel += 1;
            if melodic_channel == 9 {
                melodic_channel += 1;
            }
            if melodic_channel > 15 {
                melodic_channel = 0;
            }
            ch
        };

        let notes: Vec<&Note> = piece
            .notes()
            .iter()
            .filter(|n| n.track == track.name)
            .collect();
        tracks.push(build_instrument_track(
            &track.name,
            gm::program_for(&track.instrument),
            channel,
            &notes,
        )?);
    }

    Ok(assemble_file(&tracks))
}

/// Render and write to `path`, appending a `.mid` extension when missing.
/// Returns the path actually written.
pub fn write_midi(piece: &Piece, path: &Path) -> Result<PathBuf, RenderError> {
    let bytes = render(piece)?;
    let path = ensure_mid_extension(path);
    std::fs::write(&path, &bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "wrote MIDI file");
    Ok(path)
}

fn ensure_mid_extension(path: &Path) -> PathBuf {
    let s = path.to_string_lossy();
    if s.ends_with(".mid") {
        path.to_path_buf()
    } else {
        PathBuf::from(format!("{}.mid", s))
    }
}

/// Track 0: one tempo and one time-signature event per section, at the
/// tick where the section's first measure begins. Measures are converted
/// to beats through each preceding section's meter; gaps continue the
/// previous meter, and measures before the first section count as 4/4.
/// With no sections at all, the defaults are 120 BPM and 4/4 at tick 0.
fn build_conductor_track(sections: &[Section]) -> Vec<u8> {
    let mut events: Vec<Event> = Vec::new();

    if sections.is_empty() {
        events.push((0, RANK_SETUP, tempo_event(120)));
        events.push((0, RANK_SETUP, time_signature_event(TimeSignature::COMMON)));
    } else {
        let mut measure: u32 = 1;
        let mut offset_beats = Rational64::from_integer(0);
        let mut meter = TimeSignature::COMMON;

        for section in sections {
            offset_beats += Rational64::from_integer((section.start_measure - measure) as i64)
                * meter.beats_per_measure();
            let tick = beats_to_ticks(offset_beats);
            events.push((tick, RANK_SETUP, tempo_event(section.tempo)));
            events.push((tick, RANK_SETUP, time_signature_event(section.time_signature)));
            measure = section.start_measure;
            meter = section.time_signature;
        }
    }

    finish_track(events)
}

fn build_instrument_track(
    name: &str,
    program: u8,
    channel: u8,
    notes: &[&Note],
) -> Result<Vec<u8>, RenderError> {
    let mut events: Vec<Event> = Vec::new();
    events.push((0, RANK_SETUP, track_name_event(name)));
    events.push((0, RANK_SETUP, vec![0xC0 | (channel & 0x0F), program & 0x7F]));

    for note in notes {
        let start = note.start.eval()?;
        let duration = note.duration.eval()?;
        let on_tick = checked_ticks(start)?;
        let off_tick = checked_ticks(start + duration)?;
        events.push((
            on_tick,
            RANK_NOTE_ON,
            vec![0x90 | (channel & 0x0F), note.pitch & 0x7F, VELOCITY],
        ));
        events.push((
            off_tick,
            RANK_NOTE_OFF,
            vec![0x80 | (channel & 0x0F), note.pitch & 0x7F, 0],
        ));
    }

    Ok(finish_track(events))
}

/// Sort by (tick, rank), convert to delta times, append end-of-track.
fn finish_track(mut events: Vec<Event>) -> Vec<u8> {
    events.sort_by_key(|e| (e.0, e.1));

    let mut data = Vec::new();
    let mut last_tick = 0i64;
    for (tick, _, bytes) in events {
        write_vlq(&mut data, (tick - last_tick) as u32);
        data.extend_from_slice(&bytes);
        last_tick = tick;
    }

    write_vlq(&mut data, 0);
    data.extend_from_slice(&[0xFF, 0x2F, 0x00]);
    data
}

fn beats_to_ticks(beats: Rational64) -> i64 {
    (beats * Rational64::from_integer(TICKS_PER_BEAT))
        .round()
        .to_integer()
}

fn checked_ticks(beats: Rational64) -> Result<i64, RenderError> {
    let ticks = beats
        .checked_mul(&Rational64::from_integer(TICKS_PER_BEAT))
        .ok_or(RenderError::TickOverflow)?
        .round()
        .to_integer();
    if !(0..=u32::MAX as i64).contains(&ticks) {
        return Err(RenderError::TickOverflow);
    }
    Ok(ticks)
}

fn tempo_event(bpm: u32) -> Vec<u8> {
    let usec_per_beat: u32 = 60_000_000 / bpm.max(1);
    vec![
        0xFF,
        0x51,
        0x03,
        (usec_per_beat >> 16) as u8,
        (usec_per_beat >> 8) as u8,
        usec_per_beat as u8,
    ]
}

fn time_signature_event(ts: TimeSignature) -> Vec<u8> {
    let denom_pow = ts.denominator.trailing_zeros() as u8;
    vec![0xFF, 0x58, 0x04, ts.numerator, denom_pow, 0x18, 0x08]
}

fn track_name_event(name: &str) -> Vec<u8> {
    let bytes = name.as_bytes();
    let mut event = vec![0xFF, 0x03];
    write_vlq(&mut event, bytes.len() as u32);
    event.extend_from_slice(bytes);
    event
}

/// Assemble MThd + MTrk chunks (format 1).
fn assemble_file(tracks: &[Vec<u8>]) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(b"MThd");
    buf.extend_from_slice(&6u32.to_be_bytes());
    buf.extend_from_slice(&1u16.to_be_bytes());
    buf.extend_from_slice(&(tracks.len() as u16).to_be_bytes());
    buf.extend_from_slice(&(TICKS_PER_BEAT as u16).to_be_bytes());

    for track in tracks {
        buf.extend_from_slice(b"MTrk");
        buf.extend_from_slice(&(track.len() as u32).to_be_bytes());
        buf.extend_from_slice(track);
    }
    buf
}

/// Write a MIDI variable-length quantity.
fn write_vlq(buf: &mut Vec<u8>, mut value: u32) {
    if value == 0 {
        buf.push(0);
        return;
    }

    let mut bytes = Vec::new();
    bytes.push((value & 0x7F) as u8);
    value >>= 7;
    while value > 0 {
        bytes.push((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }
    bytes.reverse();
    buf.extend_from_slice(&bytes);
}
