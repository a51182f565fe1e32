//! Cross-operation invariant checks: every reachable state keeps the
//! document's ordering/uniqueness guarantees, failed calls change
//! nothing, and undo/redo round-trips every successful mutation.

use score_state::{ChordSpec, NoteSpec, Piece, Section, SectionPatch, TimeSignature};

fn section(name: &str, start: u32, end: u32) -> Section {
    Section {
        name: name.to_string(),
        start_measure: start,
        end_measure: end,
        tempo: 120,
        time_signature: TimeSignature::COMMON,
        key: "C".to_string(),
        description: String::new(),
    }
}

fn note(track: &str, pitch: i64, start: f64) -> NoteSpec {
    NoteSpec {
        track: track.to_string(),
        pitch,
        start: start.into(),
        duration: 1.0.into(),
    }
}

fn chord(beat: f64, symbol: &str, duration: f64) -> ChordSpec {
    ChordSpec {
        beat,
        chord: symbol.to_string(),
        duration,
    }
}

/// A busy but valid document for mutation tests.
fn populated() -> Piece {
    let mut piece = Piece::new();
    piece.set_title("Workbench");
    piece.add_track("lead", "piano").unwrap();
    piece.add_track("low", "acoustic_bass").unwrap();
    piece.add_section(section("A", 1, 8)).unwrap();
    piece.add_section(section("B", 9, 16)).unwrap();
    piece
        .add_notes(vec![note("lead", 60, 0.0), note("low", 36, 0.0)])
        .unwrap();
    piece
        .add_chords(vec![chord(0.0, "C", 4.0), chord(4.0, "G7", 4.0)])
        .unwrap();
    piece
}

fn assert_invariants(piece: &Piece) {
    // Track and section names unique.
    for (i, t) in piece.tracks().iter().enumerate() {
        assert!(
            piece.tracks()[i + 1..].iter().all(|u| u.name != t.name),
            "duplicate track {}",
            t.name
        );
    }
    for (i, s) in piece.sections().iter().enumerate() {
        assert!(
            piece.sections()[i + 1..].iter().all(|u| u.name != s.name),
            "duplicate section {}",
            s.name
        );
    }
    // Sections sorted and disjoint.
    for pair in piece.sections().windows(2) {
        assert!(pair[0].start_measure <= pair[1].start_measure);
        assert!(pair[0].end_measure < pair[1].start_measure);
    }
    // Chords sorted and disjoint over half-open intervals.
    for pair in piece.progression().windows(2) {
        assert!(pair[0].beat <= pair[1].beat);
        assert!(pair[0].end() <= pair[1].beat + 1e-9);
    }
    // Notes reference live tracks.
    for n in piece.notes() {
        assert!(piece.has_track(&n.track), "orphan note on {}", n.track);
    }
}

#[test]
fn invariants_hold_across_a_long_session() {
    let mut piece = populated();
    assert_invariants(&piece);

    piece
        .edit_section(
            "A",
            SectionPatch {
                end_measure: Some(10),
                ..Default::default()
            },
        )
        .unwrap();
    assert_invariants(&piece);

    piece.add_chords(vec![chord(2.0, "Am", 4.0)]).unwrap();
    assert_invariants(&piece);

    piece.remove_track("low").unwrap();
    assert_invariants(&piece);

    piece.flag_notes(&["lead".to_string()], 0.0, 8.0).unwrap();
    piece.remove_flagged_notes();
    assert_invariants(&piece);

    while piece.undo().is_ok() {
        assert_invariants(&piece);
    }
    while piece.redo().is_ok() {
        assert_invariants(&piece);
    }
}

#[test]
fn failed_mutators_leave_the_document_identical() {
    let mut piece = populated();

    let failures: Vec<Box<dyn Fn(&mut Piece) -> bool>> = vec![
        Box::new(|p| p.add_track("lead", "violin").is_err()),
        Box::new(|p| p.remove_track("ghost").is_err()),
        Box::new(|p| p.add_section(section("A", 20, 24)).is_err()),
        Box::new(|p| p.add_section(section("C", 4, 12)).is_err()),
        Box::new(|p| {
            p.edit_section(
                "A",
                SectionPatch {
                    end_measure: Some(16),
                    ..Default::default()
                },
            )
            .is_err()
        }),
        Box::new(|p| p.add_notes(vec![note("ghost", 60, 0.0)]).is_err()),
        Box::new(|p| p.add_notes(vec![note("lead", 300, 0.0)]).is_err()),
        Box::new(|p| p.add_chords(vec![chord(0.0, "Quux", 4.0)]).is_err()),
        Box::new(|p| p.remove_notes_in_range("ghost", 0.0, 4.0).is_err()),
    ];

    for (i, attempt) in failures.iter().enumerate() {
        let before = piece.clone();
        assert!(attempt(&mut piece), "case {} unexpectedly succeeded", i);
        assert_eq!(piece, before, "case {} mutated the document", i);
    }
}

#[test]
fn undo_then_redo_round_trips_every_mutator() {
    type Mutation = (&'static str, Box<dyn Fn(&mut Piece)>);
    let mutations: Vec<Mutation> = vec![
        ("set_title", Box::new(|p: &mut Piece| p.set_title("Renamed"))),
        (
            "add_track",
            Box::new(|p: &mut Piece| p.add_track("extra", "cello").unwrap()),
        ),
        (
            "remove_track",
            Box::new(|p: &mut Piece| {
                p.remove_track("low").unwrap();
            }),
        ),
        (
            "add_section",
            Box::new(|p: &mut Piece| p.add_section(section("C", 17, 24)).unwrap()),
        ),
        (
            "edit_section",
            Box::new(|p: &mut Piece| {
                p.edit_section(
                    "A",
                    SectionPatch {
                        tempo: Some(90),
                        ..Default::default()
                    },
                )
                .unwrap()
            }),
        ),
        (
            "add_notes",
            Box::new(|p: &mut Piece| {
                p.add_notes(vec![note("lead", 72, 8.0)]).unwrap();
            }),
        ),
        (
            "remove_notes_in_range",
            Box::new(|p: &mut Piece| {
                p.remove_notes_in_range("all", 0.0, 1.0).unwrap();
            }),
        ),
        (
            "add_chords",
            Box::new(|p: &mut Piece| {
                p.add_chords(vec![chord(8.0, "F", 4.0)]).unwrap();
            }),
        ),
        (
            "remove_chords_in_range",
            Box::new(|p: &mut Piece| {
                p.remove_chords_in_range(0.0, 4.0).unwrap();
            }),
        ),
        (
            "flag_notes",
            Box::new(|p: &mut Piece| {
                p.flag_notes(&["lead".to_string()], 0.0, 8.0).unwrap();
            }),
        ),
        (
            "remove_flagged_notes",
            Box::new(|p: &mut Piece| {
                p.remove_flagged_notes();
            }),
        ),
    ];

    for (name, mutate) in mutations {
        let mut piece = populated();
        mutate(&mut piece);
        let after = piece.clone();

        piece.undo().unwrap_or_else(|e| panic!("{}: undo failed: {}", name, e));
        piece.redo().unwrap_or_else(|e| panic!("{}: redo failed: {}", name, e));

        // History stacks differ after the round trip; the document body
        // must not.
        assert_eq!(piece.title(), after.title(), "{}", name);
        assert_eq!(piece.tracks(), after.tracks(), "{}", name);
        assert_eq!(piece.notes(), after.notes(), "{}", name);
        assert_eq!(piece.sections(), after.sections(), "{}", name);
        assert_eq!(piece.progression(), after.progression(), "{}", name);
    }
}
