//! Tool dispatch: name + JSON arguments in, JSON result or wire error out.
//!
//! Arguments are validated against the typed request structs before any
//! component runs; mutators checkpoint inside score-state, so dispatch
//! itself never touches history.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use score_state::Piece;

use crate::api::schema::*;
use crate::api::{errors, registry, tools};
use crate::jsonrpc::ErrorData;

pub fn dispatch(piece: &mut Piece, method: &str, params: Option<Value>) -> Result<Value, ErrorData> {
    debug!(tool = method, "dispatch");
    let args = params.unwrap_or_else(|| json!({}));

    match method {
        "set_title" => {
            let request: SetTitleRequest = parse_args(args)?;
            to_result(tools::piece::set_title(piece, request))
        }
        "get_piece_info" => {
            let _: EmptyRequest = parse_args(args)?;
            to_result(tools::piece::get_piece_info(piece))
        }

        "add_section" => {
            let request: AddSectionRequest = parse_args(args)?;
            to_result(tools::sections::add_section(piece, request)?)
        }
        "edit_section" => {
            let request: EditSectionRequest = parse_args(args)?;
            to_result(tools::sections::edit_section(piece, request)?)
        }
        "get_sections" => {
            let _: EmptyRequest = parse_args(args)?;
            to_result(tools::sections::get_sections(piece))
        }

        "add_track" => {
            let request: AddTrackRequest = parse_args(args)?;
            to_result(tools::tracks::add_track(piece, request)?)
        }
        "remove_track" => {
            let request: RemoveTrackRequest = parse_args(args)?;
            to_result(tools::tracks::remove_track(piece, request)?)
        }
        "get_tracks" => {
            let _: EmptyRequest = parse_args(args)?;
            to_result(tools::tracks::get_tracks(piece))
        }

        "add_notes" => {
            let request: AddNotesRequest = parse_args(args)?;
            to_result(tools::notes::add_notes(piece, request)?)
        }
        "remove_notes_in_range" => {
            let request: RemoveNotesInRangeRequest = parse_args(args)?;
            to_result(tools::notes::remove_notes_in_range(piece, request)?)
        }
        "get_notes" => {
            let request: GetNotesRequest = parse_args(args)?;
            to_result(tools::notes::get_notes(piece, request)?)
        }

        "add_chords" => {
            let request: AddChordsRequest = parse_args(args)?;
            to_result(tools::chords::add_chords(piece, request)?)
        }
        "get_chords_in_range" => {
            let request: BeatRangeRequest = parse_args(args)?;
            to_result(tools::chords::get_chords_in_range(piece, request))
        }
        "remove_chords_in_range" => {
            let request: BeatRangeRequest = parse_args(args)?;
            to_result(tools::chords::remove_chords_in_range(piece, request)?)
        }

        "flag_notes" => {
            let request: FlagNotesRequest = parse_args(args)?;
            to_result(tools::validate::flag_notes(piece, request)?)
        }
        "remove_flagged_notes" => {
            let _: EmptyRequest = parse_args(args)?;
            to_result(tools::validate::remove_flagged_notes(piece))
        }

        "undo" => {
            let _: EmptyRequest = parse_args(args)?;
            to_result(tools::history::undo(piece)?)
        }
        "redo" => {
            let _: EmptyRequest = parse_args(args)?;
            to_result(tools::history::redo(piece)?)
        }

        "export_midi" => {
            let request: ExportMidiRequest = parse_args(args)?;
            to_result(tools::export::export_midi(piece, request)?)
        }

        other => Err(errors::unknown_tool(other, &registry::TOOL_NAMES)),
    }
}

fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, ErrorData> {
    serde_json::from_value(args).map_err(errors::schema_violation)
}

fn to_result<T: Serialize>(payload: T) -> Result<Value, ErrorData> {
    serde_json::to_value(payload).map_err(|e| ErrorData::internal_error(e.to_string()))
}
