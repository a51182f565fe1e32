//! The closed tool catalog.
//!
//! Pairs every tool name with a description and a generated input schema.
//! Dispatch rejects anything not listed here; the name list also rides
//! along in `unknown_tool` error payloads.

use serde_json::Value;

use crate::api::schema::*;

/// Every tool the server answers to, in catalog order.
pub const TOOL_NAMES: [&str; 19] = [
    "set_title",
    "get_piece_info",
    "add_section",
    "edit_section",
    "get_sections",
    "add_track",
    "remove_track",
    "get_tracks",
    "add_notes",
    "remove_notes_in_range",
    "get_notes",
    "add_chords",
    "get_chords_in_range",
    "remove_chords_in_range",
    "flag_notes",
    "remove_flagged_notes",
    "undo",
    "redo",
    "export_midi",
];

pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

/// Generate a JSON schema for a request type, with subschemas inlined so
/// the output has no `$defs`/`$ref` indirection.
fn schema_for<T: schemars::JsonSchema>() -> Value {
    let settings = schemars::generate::SchemaSettings::draft07().with(|s| {
        s.inline_subschemas = true;
    });
    let generator = settings.into_generator();
    let schema = generator.into_root_schema_for::<T>();
    serde_json::to_value(&schema).unwrap_or_default()
}

pub fn catalog() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: "set_title",
            description: "Set the title of the piece",
            input_schema: schema_for::<SetTitleRequest>(),
        },
        ToolSpec {
            name: "get_piece_info",
            description: "Overview of the piece: title, sections, tracks, note count",
            input_schema: schema_for::<EmptyRequest>(),
        },
        ToolSpec {
            name: "add_section",
            description: "Add a section; its measure range must not overlap existing sections",
            input_schema: schema_for::<AddSectionRequest>(),
        },
        ToolSpec {
            name: "edit_section",
            description: "Edit section fields; boundary changes shrink neighbors but never delete them",
            input_schema: schema_for::<EditSectionRequest>(),
        },
        ToolSpec {
            name: "get_sections",
            description: "All sections, sorted by start measure",
            input_schema: schema_for::<EmptyRequest>(),
        },
        ToolSpec {
            name: "add_track",
            description: "Add a named instrument track",
            input_schema: schema_for::<AddTrackRequest>(),
        },
        ToolSpec {
            name: "remove_track",
            description: "Remove a track and every note on it",
            input_schema: schema_for::<RemoveTrackRequest>(),
        },
        ToolSpec {
            name: "get_tracks",
            description: "All tracks with their instruments",
            input_schema: schema_for::<EmptyRequest>(),
        },
        ToolSpec {
            name: "add_notes",
            description: "Add a batch of notes atomically; timing accepts expressions like \"9 + 1/3\"",
            input_schema: schema_for::<AddNotesRequest>(),
        },
        ToolSpec {
            name: "remove_notes_in_range",
            description: "Delete notes starting in [start_time, end_time) on one track or \"all\"",
            input_schema: schema_for::<RemoveNotesInRangeRequest>(),
        },
        ToolSpec {
            name: "get_notes",
            description: "Query notes, filtered by track and/or start range",
            input_schema: schema_for::<GetNotesRequest>(),
        },
        ToolSpec {
            name: "add_chords",
            description: "Add chords to the progression; overlapped chords are split or replaced",
            input_schema: schema_for::<AddChordsRequest>(),
        },
        ToolSpec {
            name: "get_chords_in_range",
            description: "Chords whose interval intersects [start_beat, end_beat)",
            input_schema: schema_for::<BeatRangeRequest>(),
        },
        ToolSpec {
            name: "remove_chords_in_range",
            description: "Delete chords in a beat range; clears all harmony flags",
            input_schema: schema_for::<BeatRangeRequest>(),
        },
        ToolSpec {
            name: "flag_notes",
            description: "Flag notes that clash with the chord progression",
            input_schema: schema_for::<FlagNotesRequest>(),
        },
        ToolSpec {
            name: "remove_flagged_notes",
            description: "Delete every flagged note and report what was removed",
            input_schema: schema_for::<EmptyRequest>(),
        },
        ToolSpec {
            name: "undo",
            description: "Undo the most recent mutation",
            input_schema: schema_for::<EmptyRequest>(),
        },
        ToolSpec {
            name: "redo",
            description: "Redo the most recently undone mutation",
            input_schema: schema_for::<EmptyRequest>(),
        },
        ToolSpec {
            name: "export_midi",
            description: "Write the piece to a Standard MIDI File",
            input_schema: schema_for::<ExportMidiRequest>(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_matches_the_name_list() {
        let names: Vec<&str> = catalog().iter().map(|t| t.name).collect();
        assert_eq!(names, TOOL_NAMES);
    }

    #[test]
    fn every_tool_has_an_object_schema() {
        for tool in catalog() {
            let ty = tool.input_schema["type"]
                .as_str()
                .unwrap_or_else(|| panic!("{} schema has no type", tool.name));
            assert_eq!(ty, "object", "{}", tool.name);
            assert!(!tool.description.is_empty());
        }
    }

    #[test]
    fn schemas_are_fully_inlined() {
        for tool in catalog() {
            let raw = tool.input_schema.to_string();
            assert!(!raw.contains("$ref"), "{} leaks a $ref", tool.name);
        }
    }
}
