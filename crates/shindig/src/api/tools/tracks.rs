//! Track management tools.

use score_state::Piece;

use crate::api::errors;
use crate::api::responses::{Ack, RemoveTrackResponse, TrackInfo};
use crate::api::schema::{AddTrackRequest, RemoveTrackRequest};
use crate::jsonrpc::ErrorData;

pub fn add_track(piece: &mut Piece, request: AddTrackRequest) -> Result<Ack, ErrorData> {
    if request.name.is_empty() {
        return Err(errors::schema_violation("track name must be non-empty"));
    }
    piece
        .add_track(request.name, request.instrument)
        .map_err(errors::from_score)?;
    Ok(Ack::ok())
}

pub fn remove_track(
    piece: &mut Piece,
    request: RemoveTrackRequest,
) -> Result<RemoveTrackResponse, ErrorData> {
    let removed_notes_count = piece
        .remove_track(&request.name)
        .map_err(errors::from_score)?;
    Ok(RemoveTrackResponse {
        removed_notes_count,
    })
}

pub fn get_tracks(piece: &Piece) -> Vec<TrackInfo> {
    piece
        .tracks()
        .iter()
        .map(|t| TrackInfo {
            name: t.name.clone(),
            instrument: t.instrument.clone(),
        })
        .collect()
}
