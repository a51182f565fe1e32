//! shindig: a stateful MIDI composition tool server.
//!
//! Exposes a closed catalog of CRUD tools over an in-memory musical piece
//! via line-framed JSON-RPC 2.0 on stdio. The reasoning lives in the
//! client; the server's job is a consistent, queryable, undoable document
//! and deterministic MIDI export.

pub mod api;
pub mod jsonrpc;
pub mod server;
