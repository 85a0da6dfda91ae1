//! sheetql_engine - Tabular view engine: queries and edit plans over a sheet snapshot.

pub mod engine;
pub mod error;

pub use error::{EngineError, Result};
