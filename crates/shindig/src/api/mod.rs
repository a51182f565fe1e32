//! The tool surface: typed schemas, the closed catalog, and dispatch.

pub mod dispatch;
pub mod errors;
pub mod registry;
pub mod responses;
pub mod schema;
pub mod tools;

pub use dispatch::dispatch;
