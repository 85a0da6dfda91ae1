//! The spreadsheet client capability.
//!
//! A [`SheetClient`] owns authentication and transport; sheetql only shapes
//! requests for it and reads counts back out of its responses. Clients are
//! always passed in explicitly, never reached through global state.
//!
//! Writes use RAW input semantics: a present cell overwrites whatever is at
//! its position, an absent cell leaves existing content alone.

use serde::Serialize;
use sheetql_engine::engine::{Row, SheetRange};
use thiserror::Error;

/// A failed client request. `message` is the backend's own error text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ClientError {
    pub message: String,
}

impl ClientError {
    pub fn new(message: impl Into<String>) -> Self {
        ClientError {
            message: message.into(),
        }
    }
}

/// Per-sheet metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SheetProperties {
    pub title: String,
    pub index: usize,
    pub row_count: usize,
    pub column_count: usize,
}

/// Spreadsheet title and its sheets, in index order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SpreadsheetInfo {
    pub title: String,
    pub sheets: Vec<SheetProperties>,
}

/// Result of a single values write.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UpdateResponse {
    pub updated_range: String,
    pub updated_rows: usize,
    pub updated_columns: usize,
    pub updated_cells: usize,
}

/// One range/values pair of a batch write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueRange {
    pub range: SheetRange,
    pub values: Vec<Row>,
}

/// Result of a batch write.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BatchUpdateResponse {
    pub total_updated_rows: usize,
    pub total_updated_cells: usize,
    pub responses: Vec<UpdateResponse>,
}

impl BatchUpdateResponse {
    pub fn from_responses(responses: Vec<UpdateResponse>) -> Self {
        BatchUpdateResponse {
            total_updated_rows: responses.iter().map(|r| r.updated_rows).sum(),
            total_updated_cells: responses.iter().map(|r| r.updated_cells).sum(),
            responses,
        }
    }
}

/// Access to one spreadsheet.
pub trait SheetClient {
    fn spreadsheet_info(&self) -> Result<SpreadsheetInfo, ClientError>;

    /// Read a range. Trailing empty cells and rows are not returned.
    fn get_values(&self, range: &SheetRange) -> Result<Vec<Vec<String>>, ClientError>;

    /// Overwrite a range starting at its top-left corner.
    fn update_values(&self, range: &SheetRange, values: &[Row]) -> Result<UpdateResponse, ClientError>;

    /// Append rows after the last row of the table found in `range`.
    fn append_values(&self, range: &SheetRange, values: &[Row]) -> Result<UpdateResponse, ClientError>;

    /// Several writes in one request. The default sends them one at a time.
    fn batch_update(&self, data: &[ValueRange]) -> Result<BatchUpdateResponse, ClientError> {
        let responses = data
            .iter()
            .map(|vr| self.update_values(&vr.range, &vr.values))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(BatchUpdateResponse::from_responses(responses))
    }
}
