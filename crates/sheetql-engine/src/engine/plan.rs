//! Edit planning for insert, conditional update and column append.
//!
//! Nothing here performs I/O. Each planner returns the rows or column span
//! that must be written, and [`EditPlan`] bundles them with their target
//! location so a client can persist them.

use super::grid::{Cell, Condition, Grid, Record, Row};
use super::notation::{SheetRange, column_letter};
use crate::error::{EngineError, Result};
use serde::Serialize;

/// A data row to overwrite, addressed by its 1-based sheet row number
/// (the header is row 1, so the first data row is row 2).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RowUpdate {
    pub row_number: usize,
    pub row: Row,
}

/// Contiguous header positions for new columns, inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ColumnSpan {
    pub start: usize,
    pub end: usize,
}

impl ColumnSpan {
    pub fn start_letter(&self) -> Result<char> {
        column_letter(self.start)
    }

    pub fn end_letter(&self) -> Result<char> {
        column_letter(self.end)
    }

    /// The header cells covered by this span (`Sheet!D1:E1`).
    pub fn header_range(&self, sheet: &str) -> SheetRange {
        SheetRange::Cells {
            sheet: sheet.to_string(),
            start_col: self.start,
            start_row: 1,
            end_col: self.end,
            end_row: 1,
        }
    }
}

/// Align a record to header order. Unmatched headers stay absent.
pub fn record_to_row(headers: &[String], record: &Record) -> Row {
    let mut row: Row = headers.iter().map(|h| record.get(h).cloned()).collect();
    trim_absent(&mut row);
    row
}

fn trim_absent(row: &mut Row) {
    while matches!(row.last(), Some(None)) {
        row.pop();
    }
}

/// Rows to append for `records`, one per record, in header order.
///
/// A record with no key matching a header yields an empty row rather than an
/// error. Absent cells are never filled, so they cannot overwrite anything.
pub fn plan_insert(headers: &[String], records: &[Record]) -> Vec<Row> {
    records.iter().map(|r| record_to_row(headers, r)).collect()
}

/// Rows to overwrite for `UPDATE ... SET column_values WHERE conditions`.
///
/// Each condition is matched on its own with exact equality and contributes
/// its matches independently: the sets are not intersected and a row matched
/// by two conditions is planned twice. Every planned row is `column_values`
/// laid over that row's original cells.
pub fn plan_update(grid: &Grid, column_values: &Record, conditions: &[Condition]) -> Vec<RowUpdate> {
    let headers = grid.header();
    let new_values = headers
        .iter()
        .map(|h| column_values.get(h).cloned())
        .collect::<Row>();

    let mut updates = Vec::new();
    for condition in conditions {
        let matched = matching_row_numbers(grid, condition);
        if matched.is_empty() {
            tracing::debug!(column = %condition.header, value = %condition.value, "no row found");
        } else {
            tracing::debug!(column = %condition.header, rows = ?matched, "matched rows");
        }
        for row_number in matched {
            let original = &grid.rows()[row_number - 1];
            updates.push(RowUpdate {
                row_number,
                row: merge_row(&new_values, original),
            });
        }
    }
    updates
}

/// 1-based sheet row numbers whose cell under `condition.header` equals
/// `condition.value` exactly. An unknown column matches nothing.
pub fn matching_row_numbers(grid: &Grid, condition: &Condition) -> Vec<usize> {
    let Some(col) = grid.column_index(&condition.header) else {
        return Vec::new();
    };
    grid.data_rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| row.get(col).is_some_and(|cell| *cell == condition.value))
        .map(|(idx, _)| idx + 2)
        .collect()
}

/// New values win; absent new cells fall back to the original cell.
fn merge_row(new_values: &[Cell], original: &[String]) -> Row {
    let mut row: Row = new_values
        .iter()
        .enumerate()
        .map(|(i, cell)| cell.clone().or_else(|| original.get(i).cloned()))
        .collect();
    trim_absent(&mut row);
    row
}

/// Header positions for appending `names` after `current_header_count` columns.
pub fn plan_append_columns(current_header_count: usize, names: &[String]) -> Result<ColumnSpan> {
    if names.is_empty() {
        return Err(EngineError::NoColumns);
    }
    let span = ColumnSpan {
        start: current_header_count,
        end: current_header_count + names.len() - 1,
    };
    let (first, last) = (span.start_letter()?, span.end_letter()?);
    tracing::debug!(%first, %last, "planned column append");
    Ok(span)
}

/// Where an [`Edit`] lands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Location {
    /// After the last row of the table.
    AppendRows,
    /// One whole data row, by 1-based sheet row number.
    Row(usize),
    /// Cells of the header row.
    HeaderColumns(ColumnSpan),
}

/// One write: a location and the rows to put there.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Edit {
    pub location: Location,
    pub values: Vec<Row>,
}

impl Edit {
    /// The A1 range this edit writes to on `sheet`.
    pub fn range(&self, sheet: &str) -> SheetRange {
        match &self.location {
            Location::AppendRows => SheetRange::column(sheet, 0),
            Location::Row(n) => SheetRange::row(sheet, *n),
            Location::HeaderColumns(span) => span.header_range(sheet),
        }
    }
}

/// The full set of writes for one mutation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EditPlan {
    pub edits: Vec<Edit>,
}

impl EditPlan {
    pub fn insert(headers: &[String], records: &[Record]) -> Self {
        let rows = plan_insert(headers, records);
        if rows.is_empty() {
            return EditPlan::default();
        }
        EditPlan {
            edits: vec![Edit {
                location: Location::AppendRows,
                values: rows,
            }],
        }
    }

    pub fn update(grid: &Grid, column_values: &Record, conditions: &[Condition]) -> Self {
        EditPlan {
            edits: plan_update(grid, column_values, conditions)
                .into_iter()
                .map(|u| Edit {
                    location: Location::Row(u.row_number),
                    values: vec![u.row],
                })
                .collect(),
        }
    }

    pub fn append_columns(current_header_count: usize, names: &[String]) -> Result<Self> {
        let span = plan_append_columns(current_header_count, names)?;
        Ok(EditPlan {
            edits: vec![Edit {
                location: Location::HeaderColumns(span),
                values: vec![names.iter().cloned().map(Some).collect()],
            }],
        })
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}
