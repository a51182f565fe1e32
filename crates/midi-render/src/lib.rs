//! Standard MIDI File output for `score-state` documents.
//!
//! `render` turns a piece into SMF bytes deterministically; `write_midi`
//! puts them on disk. See `render` for the track layout.

mod gm;
mod render;

pub use gm::{is_percussion, program_for};
pub use render::{render, write_midi, RenderError, TICKS_PER_BEAT, VELOCITY};
