//! Error types for sheetql core.

use crate::client::ClientError;
use sheetql_engine::EngineError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading, querying or writing a spreadsheet
#[derive(Error, Debug)]
pub enum SheetqlError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error in {sheet} at line {line}: {message}")]
    Parse {
        sheet: String,
        line: usize,
        message: String,
    },

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Spreadsheet request failed: {0}")]
    Client(#[from] ClientError),

    #[error("Sheet has no header row: {0}")]
    EmptySheet(String),

    #[error("Not a workbook directory: {}", .0.display())]
    NotAWorkbook(PathBuf),

    #[error("Invalid sheet name: {0:?}")]
    InvalidSheetName(String),
}

impl SheetqlError {
    /// The diagnostic string to show a caller. Client failures are passed
    /// through verbatim; everything else uses its display form.
    pub fn message(&self) -> String {
        match self {
            SheetqlError::Client(err) => err.message.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SheetqlError>;
