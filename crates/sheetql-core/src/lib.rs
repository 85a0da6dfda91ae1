//! sheetql-core - Spreadsheet client capability, CSV workbook storage and the query facade.

pub mod client;
pub mod error;
pub mod memory;
pub mod spreadsheet;
pub mod storage;

pub use client::{
    BatchUpdateResponse, ClientError, SheetClient, SheetProperties, SpreadsheetInfo,
    UpdateResponse, ValueRange,
};
pub use error::{Result, SheetqlError};
pub use memory::MemoryClient;
pub use spreadsheet::{ApplyReport, Spreadsheet};

pub use sheetql_engine::engine::{
    Condition, EditPlan, Grid, MissingColumn, Projection, Record, Row, SheetRange, Table,
};
