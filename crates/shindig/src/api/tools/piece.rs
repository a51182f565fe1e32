//! Title and overview tools.

use score_state::Piece;

use crate::api::responses::{Ack, PieceInfoResponse, SectionSummary};
use crate::api::schema::SetTitleRequest;

pub fn set_title(piece: &mut Piece, request: SetTitleRequest) -> Ack {
    piece.set_title(request.title);
    Ack::ok()
}

pub fn get_piece_info(piece: &Piece) -> PieceInfoResponse {
    PieceInfoResponse {
        title: piece.title().to_string(),
        sections: piece.sections().iter().map(SectionSummary::from).collect(),
        tracks: piece.tracks().iter().map(|t| t.name.clone()).collect(),
        note_count: piece.note_count(),
    }
}
