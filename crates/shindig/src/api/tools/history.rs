//! Undo/redo tools.

use score_state::Piece;

use crate::api::errors;
use crate::api::responses::Ack;
use crate::jsonrpc::ErrorData;

pub fn undo(piece: &mut Piece) -> Result<Ack, ErrorData> {
    piece.undo().map_err(errors::from_score)?;
    Ok(Ack::ok())
}

pub fn redo(piece: &mut Piece) -> Result<Ack, ErrorData> {
    piece.redo().map_err(errors::from_score)?;
    Ok(Ack::ok())
}
