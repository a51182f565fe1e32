//! Mapping from domain failures to wire error envelopes.
//!
//! Domain errors ride code -32000 with a stable snake_case `data.kind`;
//! schema and catalog problems use the standard JSON-RPC codes. Batch
//! failures carry the offending entry index, and unknown chord symbols
//! carry the supported-quality list so the client can self-correct.

use serde_json::{json, Value};

use score_state::{supported_qualities, ScoreError};

use crate::jsonrpc::ErrorData;

pub fn from_score(err: ScoreError) -> ErrorData {
    let mut data = json!({ "kind": err.kind() });
    if let Some(index) = err.batch_index() {
        data["index"] = json!(index);
    }
    attach_details(&err, &mut data);
    ErrorData::with_data(ErrorData::TOOL_ERROR, err.to_string(), data)
}

fn attach_details(err: &ScoreError, data: &mut Value) {
    match err {
        ScoreError::NoteBatch { source, .. } | ScoreError::ChordBatch { source, .. } => {
            attach_details(source, data)
        }
        ScoreError::UnknownChordSymbol { symbol } => {
            data["symbol"] = json!(symbol);
            data["supported_qualities"] = json!(supported_qualities());
        }
        ScoreError::DuplicateName { name, .. }
        | ScoreError::NotFound { name, .. }
        | ScoreError::TrackMissing { name } => {
            data["name"] = json!(name);
        }
        ScoreError::SectionWouldSwallow { neighbor, .. } => {
            data["neighbor"] = json!(neighbor);
        }
        _ => {}
    }
}

pub fn schema_violation(message: impl std::fmt::Display) -> ErrorData {
    ErrorData::with_data(
        ErrorData::INVALID_PARAMS,
        format!("invalid parameters: {}", message),
        json!({ "kind": "schema_violation" }),
    )
}

pub fn unknown_tool(name: &str, catalog: &[&str]) -> ErrorData {
    ErrorData::with_data(
        ErrorData::METHOD_NOT_FOUND,
        format!("unknown tool: {}", name),
        json!({ "kind": "unknown_tool", "tools": catalog }),
    )
}

pub fn io_error(err: impl std::fmt::Display) -> ErrorData {
    ErrorData::with_data(
        ErrorData::TOOL_ERROR,
        err.to_string(),
        json!({ "kind": "io_error" }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_errors_surface_index_and_inner_kind() {
        let err = ScoreError::ChordBatch {
            index: 2,
            source: Box::new(ScoreError::UnknownChordSymbol {
                symbol: "Xyz".into(),
            }),
        };
        let data = from_score(err).data.unwrap();
        assert_eq!(data["kind"], "unknown_chord_symbol");
        assert_eq!(data["index"], 2);
        assert_eq!(data["symbol"], "Xyz");
        assert!(data["supported_qualities"].as_array().unwrap().len() > 5);
    }

    #[test]
    fn plain_errors_carry_only_a_kind() {
        let data = from_score(ScoreError::NothingToUndo).data.unwrap();
        assert_eq!(data["kind"], "nothing_to_undo");
        assert!(data.get("index").is_none());
    }
}
