//! Note tools: batch add, range delete, range query.

use score_state::{Note, NoteSpec, Piece};

use crate::api::errors;
use crate::api::responses::{AddNotesResponse, RemoveNotesResponse};
use crate::api::schema::{AddNotesRequest, GetNotesRequest, RemoveNotesInRangeRequest};
use crate::jsonrpc::ErrorData;

pub fn add_notes(piece: &mut Piece, request: AddNotesRequest) -> Result<AddNotesResponse, ErrorData> {
    let batch: Vec<NoteSpec> = request
        .notes
        .into_iter()
        .map(|n| NoteSpec {
            track: n.track,
            pitch: n.pitch,
            start: n.start.into(),
            duration: n.duration.into(),
        })
        .collect();

    let added_count = piece.add_notes(batch).map_err(errors::from_score)?;
    Ok(AddNotesResponse { added_count })
}

pub fn remove_notes_in_range(
    piece: &mut Piece,
    request: RemoveNotesInRangeRequest,
) -> Result<RemoveNotesResponse, ErrorData> {
    let removed_count = piece
        .remove_notes_in_range(&request.track, request.start_time, request.end_time)
        .map_err(errors::from_score)?;
    Ok(RemoveNotesResponse { removed_count })
}

pub fn get_notes(piece: &Piece, request: GetNotesRequest) -> Result<Vec<Note>, ErrorData> {
    piece
        .get_notes(
            request.track.as_deref(),
            request.start_time,
            request.end_time,
        )
        .map_err(errors::from_score)
}
