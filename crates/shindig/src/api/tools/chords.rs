//! Chord-progression tools.

use score_state::{Chord, ChordSpec, Piece};

use crate::api::errors;
use crate::api::responses::{AddChordsResponse, RemoveChordsResponse};
use crate::api::schema::{AddChordsRequest, BeatRangeRequest};
use crate::jsonrpc::ErrorData;

pub fn add_chords(
    piece: &mut Piece,
    request: AddChordsRequest,
) -> Result<AddChordsResponse, ErrorData> {
    let batch: Vec<ChordSpec> = request
        .chords
        .into_iter()
        .map(|c| ChordSpec {
            beat: c.beat,
            chord: c.chord,
            duration: c.duration,
        })
        .collect();

    let chords_added = piece.add_chords(batch).map_err(errors::from_score)?;
    Ok(AddChordsResponse { chords_added })
}

pub fn get_chords_in_range(piece: &Piece, request: BeatRangeRequest) -> Vec<Chord> {
    piece.chords_in_range(request.start_beat, request.end_beat)
}

pub fn remove_chords_in_range(
    piece: &mut Piece,
    request: BeatRangeRequest,
) -> Result<RemoveChordsResponse, ErrorData> {
    let removed_count = piece
        .remove_chords_in_range(request.start_beat, request.end_beat)
        .map_err(errors::from_score)?;
    Ok(RemoveChordsResponse {
        ok: true,
        removed_count,
    })
}
