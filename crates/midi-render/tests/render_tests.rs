//! Parse-back tests for the MIDI renderer, using midly as the reference
//! reader.

use midly::{MetaMessage, MidiMessage, Smf, TrackEventKind};
use score_state::{NoteSpec, Piece, Section, TimeSignature};

fn note(track: &str, pitch: i64, start: impl Into<score_state::BeatValue>, duration: impl Into<score_state::BeatValue>) -> NoteSpec {
    NoteSpec {
        track: track.to_string(),
        pitch,
        start: start.into(),
        duration: duration.into(),
    }
}

fn section(name: &str, start: u32, end: u32, tempo: u32, ts: &str) -> Section {
    Section {
        name: name.to_string(),
        start_measure: start,
        end_measure: end,
        tempo,
        time_signature: ts.parse::<TimeSignature>().unwrap(),
        key: "C".to_string(),
        description: String::new(),
    }
}

/// Absolute-tick event list for one parsed track.
fn absolute_events<'a>(track: &'a [midly::TrackEvent<'a>]) -> Vec<(u32, TrackEventKind<'a>)> {
    let mut at = 0u32;
    track
        .iter()
        .map(|e| {
            at += e.delta.as_int();
            (at, e.kind)
        })
        .collect()
}

#[test]
fn header_is_format_1_at_480_ppq() {
    let piece = Piece::new();
    let bytes = midi_render::render(&piece).unwrap();
    let smf = Smf::parse(&bytes).unwrap();

    assert_eq!(smf.header.format, midly::Format::Parallel);
    match smf.header.timing {
        midly::Timing::Metrical(ppq) => assert_eq!(ppq.as_int(), 480),
        other => panic!("unexpected timing {:?}", other),
    }
    // No document tracks: just the conductor track.
    assert_eq!(smf.tracks.len(), 1);
}

#[test]
fn empty_piece_gets_default_tempo_and_meter() {
    let piece = Piece::new();
    let bytes = midi_render::render(&piece).unwrap();
    let smf = Smf::parse(&bytes).unwrap();

    let events = absolute_events(&smf.tracks[0]);
    assert!(events.iter().any(|(tick, kind)| {
        *tick == 0
            && matches!(
                kind,
                TrackEventKind::Meta(MetaMessage::Tempo(t)) if t.as_int() == 500_000
            )
    }));
    assert!(events.iter().any(|(tick, kind)| {
        *tick == 0
            && matches!(
                kind,
                TrackEventKind::Meta(MetaMessage::TimeSignature(4, 2, _, _))
            )
    }));
}

#[test]
fn expression_timed_note_lands_on_exact_ticks() {
    let mut piece = Piece::new();
    piece.add_track("p", "piano").unwrap();
    piece
        .add_notes(vec![note("p", 60, "9 + 1/3", "1/3")])
        .unwrap();

    let bytes = midi_render::render(&piece).unwrap();
    let smf = Smf::parse(&bytes).unwrap();
    assert_eq!(smf.tracks.len(), 2);

    let events = absolute_events(&smf.tracks[1]);
    let note_on = events
        .iter()
        .find(|(_, kind)| {
            matches!(
                kind,
                TrackEventKind::Midi {
                    message: MidiMessage::NoteOn { key, .. },
                    ..
                } if key.as_int() == 60
            )
        })
        .expect("note_on present");
    assert_eq!(note_on.0, 4480);

    let note_off = events
        .iter()
        .find(|(_, kind)| {
            matches!(
                kind,
                TrackEventKind::Midi {
                    message: MidiMessage::NoteOff { key, .. },
                    ..
                } if key.as_int() == 60
            )
        })
        .expect("note_off present");
    assert_eq!(note_off.0, 4640);
}

#[test]
fn note_off_precedes_note_on_at_shared_tick() {
    let mut piece = Piece::new();
    piece.add_track("p", "piano").unwrap();
    // Two abutting notes on the same pitch: off at tick 480 must come
    // before the second on at tick 480.
    piece
        .add_notes(vec![note("p", 60, 0.0, 1.0), note("p", 60, 1.0, 1.0)])
        .unwrap();

    let bytes = midi_render::render(&piece).unwrap();
    let smf = Smf::parse(&bytes).unwrap();
    let events = absolute_events(&smf.tracks[1]);

    let boundary: Vec<&TrackEventKind> = events
        .iter()
        .filter(|(tick, _)| *tick == 480)
        .map(|(_, kind)| kind)
        .collect();
    assert_eq!(boundary.len(), 2);
    assert!(matches!(
        boundary[0],
        TrackEventKind::Midi {
            message: MidiMessage::NoteOff { .. },
            ..
        }
    ));
    assert!(matches!(
        boundary[1],
        TrackEventKind::Midi {
            message: MidiMessage::NoteOn { .. },
            ..
        }
    ));
}

#[test]
fn conductor_track_places_section_changes_by_accumulated_meter() {
    let mut piece = Piece::new();
    // 8 measures of 4/4 (32 beats), then 6/8 from measure 9.
    piece.add_section(section("A", 1, 8, 120, "4/4")).unwrap();
    piece.add_section(section("B", 9, 16, 90, "6/8")).unwrap();

    let bytes = midi_render::render(&piece).unwrap();
    let smf = Smf::parse(&bytes).unwrap();
    let events = absolute_events(&smf.tracks[0]);

    let tempos: Vec<(u32, u32)> = events
        .iter()
        .filter_map(|(tick, kind)| match kind {
            TrackEventKind::Meta(MetaMessage::Tempo(t)) => Some((*tick, t.as_int())),
            _ => None,
        })
        .collect();
    assert_eq!(tempos, vec![(0, 500_000), (32 * 480, 666_666)]);

    let meters: Vec<(u32, u8, u8)> = events
        .iter()
        .filter_map(|(tick, kind)| match kind {
            TrackEventKind::Meta(MetaMessage::TimeSignature(n, d, _, _)) => {
                Some((*tick, *n, *d))
            }
            _ => None,
        })
        .collect();
    assert_eq!(meters, vec![(0, 4, 2), (32 * 480, 6, 3)]);
}

#[test]
fn instrument_tracks_carry_name_and_program() {
    let mut piece = Piece::new();
    piece.add_track("melody", "violin").unwrap();
    piece.add_track("low", "acoustic_bass").unwrap();

    let bytes = midi_render::render(&piece).unwrap();
    let smf = Smf::parse(&bytes).unwrap();
    assert_eq!(smf.tracks.len(), 3);

    let names: Vec<String> = smf.tracks[1..]
        .iter()
        .filter_map(|track| {
            track.iter().find_map(|e| match e.kind {
                TrackEventKind::Meta(MetaMessage::TrackName(name)) => {
                    Some(String::from_utf8_lossy(name).into_owned())
                }
                _ => None,
            })
        })
        .collect();
    assert_eq!(names, ["melody", "low"]);

    let programs: Vec<u8> = smf.tracks[1..]
        .iter()
        .filter_map(|track| {
            track.iter().find_map(|e| match e.kind {
                TrackEventKind::Midi {
                    message: MidiMessage::ProgramChange { program },
                    ..
                } => Some(program.as_int()),
                _ => None,
            })
        })
        .collect();
    assert_eq!(programs, [40, 32]);
}

#[test]
fn drum_tracks_use_channel_nine() {
    let mut piece = Piece::new();
    piece.add_track("kit", "drums").unwrap();
    piece.add_notes(vec![note("kit", 36, 0.0, 0.5)]).unwrap();

    let bytes = midi_render::render(&piece).unwrap();
    let smf = Smf::parse(&bytes).unwrap();

    let channels: Vec<u8> = smf.tracks[1]
        .iter()
        .filter_map(|e| match e.kind {
            TrackEventKind::Midi { channel, .. } => Some(channel.as_int()),
            _ => None,
        })
        .collect();
    assert!(!channels.is_empty());
    assert!(channels.iter().all(|&c| c == 9));
}

#[test]
fn melodic_channel_allocation_skips_nine() {
    let mut piece = Piece::new();
    for i in 0..11 {
        piece
            .add_track(format!("t{}", i), "piano")
            .unwrap();
    }
    piece.add_notes(vec![note("t9", 60, 0.0, 1.0)]).unwrap();
    piece.add_notes(vec![note("t10", 60, 0.0, 1.0)]).unwrap();

    let bytes = midi_render::render(&piece).unwrap();
    let smf = Smf::parse(&bytes).unwrap();

    // Tracks t0..t8 take channels 0..8; t9 skips percussion and lands on
    // 10, t10 on 11.
    let channel_of = |track: &[midly::TrackEvent]| {
        track.iter().find_map(|e| match e.kind {
            TrackEventKind::Midi { channel, .. } => Some(channel.as_int()),
            _ => None,
        })
    };
    assert_eq!(channel_of(&smf.tracks[10]), Some(10));
    assert_eq!(channel_of(&smf.tracks[11]), Some(11));
}

#[test]
fn render_is_deterministic_and_file_writes_match() {
    let mut piece = Piece::new();
    piece.add_track("p", "piano").unwrap();
    piece.add_section(section("A", 1, 4, 100, "3/4")).unwrap();
    piece
        .add_notes(vec![note("p", 60, 0.0, 1.0), note("p", 64, "1/3", "2/3")])
        .unwrap();

    let first = midi_render::render(&piece).unwrap();
    let second = midi_render::render(&piece).unwrap();
    assert_eq!(first, second);

    let dir = tempfile::tempdir().unwrap();
    let a = midi_render::write_midi(&piece, &dir.path().join("a.mid")).unwrap();
    let b = midi_render::write_midi(&piece, &dir.path().join("b")).unwrap();
    assert!(b.to_string_lossy().ends_with("b.mid"));
    assert_eq!(std::fs::read(a).unwrap(), std::fs::read(b).unwrap());
}
