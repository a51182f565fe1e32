//! Tool implementations, grouped by the part of the document they touch.
//!
//! Each function is a thin typed bridge: request struct in, response
//! struct (or wire error) out, with the actual semantics living in
//! `score-state` and `midi-render`.

pub mod chords;
pub mod export;
pub mod history;
pub mod notes;
pub mod piece;
pub mod sections;
pub mod tracks;
pub mod validate;
