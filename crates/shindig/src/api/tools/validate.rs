//! Harmony validation tools.

use score_state::Piece;

use crate::api::errors;
use crate::api::responses::{FlagNotesResponse, RemoveFlaggedResponse, RemovedNote};
use crate::api::schema::FlagNotesRequest;
use crate::jsonrpc::ErrorData;

pub fn flag_notes(
    piece: &mut Piece,
    request: FlagNotesRequest,
) -> Result<FlagNotesResponse, ErrorData> {
    let flagged_count = piece
        .flag_notes(&request.tracks, request.start_beat, request.end_beat)
        .map_err(errors::from_score)?;
    Ok(FlagNotesResponse { flagged_count })
}

pub fn remove_flagged_notes(piece: &mut Piece) -> RemoveFlaggedResponse {
    let removed: Vec<RemovedNote> = piece
        .remove_flagged_notes()
        .into_iter()
        .map(RemovedNote::from)
        .collect();
    RemoveFlaggedResponse {
        count: removed.len(),
        removed,
    }
}
