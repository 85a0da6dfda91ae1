//! Tabular view engine API.
//!
//! This module holds the pure, I/O-free core that sits between a spreadsheet
//! read and a spreadsheet write:
//!
//! - [`Grid`], [`Condition`], [`Projection`], [`Table`] - Data structures for a sheet snapshot
//! - [`select`] - Column projection and substring filtering
//! - [`plan_insert`], [`plan_update`], [`plan_append_columns`] - Edit planning
//! - [`EditPlan`] - Planned writes, addressed by location
//! - [`column_letter`], [`SheetRange`] - A1 notation

mod grid;
mod notation;
mod plan;
mod query;

pub use grid::{Cell, Condition, Grid, Projection, Record, Row, Table, column_index};
pub use notation::{MAX_COLUMNS, SheetRange, column_letter, column_position, notation_for_column};
pub use plan::{
    ColumnSpan, Edit, EditPlan, Location, RowUpdate, matching_row_numbers, plan_append_columns,
    plan_insert, plan_update, record_to_row,
};
pub use query::{MissingColumn, select, select_records, select_with};
