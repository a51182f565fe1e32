//! MIDI export tool.

use std::path::Path;

use midi_render::RenderError;
use score_state::Piece;

use crate::api::errors;
use crate::api::responses::ExportMidiResponse;
use crate::api::schema::ExportMidiRequest;
use crate::jsonrpc::ErrorData;

pub fn export_midi(
    piece: &Piece,
    request: ExportMidiRequest,
) -> Result<ExportMidiResponse, ErrorData> {
    let written = midi_render::write_midi(piece, Path::new(&request.filepath)).map_err(
        |err| match err {
            RenderError::Score(inner) => errors::from_score(inner),
            RenderError::TickOverflow => errors::from_score(score_state::ScoreError::InvalidRange {
                reason: "note position exceeds the MIDI tick range".into(),
            }),
            RenderError::Io(inner) => errors::io_error(inner),
        },
    )?;
    Ok(ExportMidiResponse {
        filepath: written.to_string_lossy().into_owned(),
    })
}
