//! Section structure tools.

use score_state::{Piece, Section, SectionPatch, TimeSignature};

use crate::api::errors;
use crate::api::responses::Ack;
use crate::api::schema::{AddSectionRequest, EditSectionRequest};
use crate::jsonrpc::ErrorData;

/// BPM bounds enforced at the schema boundary.
const TEMPO_RANGE: std::ops::RangeInclusive<u32> = 1..=300;

fn check_tempo(tempo: u32) -> Result<u32, ErrorData> {
    if TEMPO_RANGE.contains(&tempo) {
        Ok(tempo)
    } else {
        Err(errors::schema_violation(format!(
            "tempo must be between 1 and 300 BPM, got {}",
            tempo
        )))
    }
}

fn parse_time_signature(raw: &str) -> Result<TimeSignature, ErrorData> {
    raw.parse().map_err(errors::schema_violation)
}

pub fn add_section(piece: &mut Piece, request: AddSectionRequest) -> Result<Ack, ErrorData> {
    let section = Section {
        name: request.name,
        start_measure: request.start_measure,
        end_measure: request.end_measure,
        tempo: check_tempo(request.tempo)?,
        time_signature: parse_time_signature(&request.time_signature)?,
        key: request.key,
        description: request.description,
    };
    piece.add_section(section).map_err(errors::from_score)?;
    Ok(Ack::ok())
}

pub fn edit_section(piece: &mut Piece, request: EditSectionRequest) -> Result<Ack, ErrorData> {
    let patch = SectionPatch {
        start_measure: request.start_measure,
        end_measure: request.end_measure,
        tempo: request.tempo.map(check_tempo).transpose()?,
        time_signature: request
            .time_signature
            .as_deref()
            .map(parse_time_signature)
            .transpose()?,
        key: request.key,
        description: request.description,
    };
    piece
        .edit_section(&request.name, patch)
        .map_err(errors::from_score)?;
    Ok(Ack::ok())
}

pub fn get_sections(piece: &Piece) -> Vec<Section> {
    piece.sections().to_vec()
}
