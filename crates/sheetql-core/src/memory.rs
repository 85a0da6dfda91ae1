//! In-memory spreadsheet client.
//!
//! Sheets live in a [`DashMap`] keyed by title so a [`MemoryClient`] can be
//! shared and written through `&self`, the same way a remote client is used.
//! Stored rows are ragged string rows; reads trim trailing empty cells and
//! trailing empty rows like a values read from a hosted sheet.

use crate::client::{ClientError, SheetClient, SheetProperties, SpreadsheetInfo, UpdateResponse};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use sheetql_engine::engine::{Row, SheetRange};
use std::collections::BTreeSet;

#[derive(Clone, Debug, Default)]
struct Sheet {
    index: usize,
    rows: Vec<Vec<String>>,
}

/// Inclusive zero-based (first, last) bounds; `None` means unbounded.
type Span = Option<(usize, usize)>;

/// How far a single write may grow a sheet past its current extent.
const GRID_ROW_HEADROOM: usize = 100_000;
const GRID_COLUMN_HEADROOM: usize = 1_000;

/// A spreadsheet held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryClient {
    title: String,
    sheets: DashMap<String, Sheet>,
}

impl MemoryClient {
    pub fn new(title: impl Into<String>) -> Self {
        MemoryClient {
            title: title.into(),
            sheets: DashMap::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Add a sheet, or replace the rows of an existing one (keeping its index).
    pub fn add_sheet(&self, title: impl Into<String>, rows: Vec<Vec<String>>) {
        let next_index = self.sheets.len();
        match self.sheets.entry(title.into()) {
            Entry::Occupied(mut e) => e.get_mut().rows = rows,
            Entry::Vacant(e) => {
                e.insert(Sheet {
                    index: next_index,
                    rows,
                });
            }
        }
    }

    /// Sheet titles in index order.
    pub fn sheet_titles(&self) -> Vec<String> {
        let mut titles: Vec<(usize, String)> = self
            .sheets
            .iter()
            .map(|e| (e.value().index, e.key().clone()))
            .collect();
        titles.sort();
        titles.into_iter().map(|(_, t)| t).collect()
    }

    /// Trimmed contents of a whole sheet.
    pub fn sheet_values(&self, title: &str) -> Option<Vec<Vec<String>>> {
        self.sheets
            .get(title)
            .map(|sheet| read_span(&sheet.rows, None, None))
    }

    fn missing_sheet(range: &SheetRange) -> ClientError {
        ClientError::new(format!("Unable to parse range: {}", range))
    }

    fn checked(range: &SheetRange) -> Result<(), ClientError> {
        range
            .validate()
            .map_err(|_| ClientError::new(format!("Unable to parse range: {}", range)))
    }
}

fn spans(range: &SheetRange) -> (Span, Span) {
    match *range {
        SheetRange::Sheet(_) => (None, None),
        SheetRange::Rows { first, last, .. } => (Some((first - 1, last - 1)), None),
        SheetRange::Columns { first, last, .. } => (None, Some((first, last))),
        SheetRange::Cells {
            start_col,
            start_row,
            end_col,
            end_row,
            ..
        } => (Some((start_row - 1, end_row - 1)), Some((start_col, end_col))),
    }
}

fn trim_row(mut row: Vec<String>) -> Vec<String> {
    while row.last().is_some_and(|c| c.is_empty()) {
        row.pop();
    }
    row
}

fn read_span(rows: &[Vec<String>], row_span: Span, col_span: Span) -> Vec<Vec<String>> {
    let mut out: Vec<Vec<String>> = rows
        .iter()
        .enumerate()
        .filter(|(r, _)| row_span.is_none_or(|(a, b)| *r >= a && *r <= b))
        .map(|(_, row)| {
            let cells = match col_span {
                None => row.clone(),
                Some((a, b)) => row.iter().skip(a).take(b - a + 1).cloned().collect(),
            };
            trim_row(cells)
        })
        .collect();
    while out.last().is_some_and(|r| r.is_empty()) {
        out.pop();
    }
    out
}

/// Write present cells with `values[0][0]` landing on (`top`, `left`).
fn write_cells(rows: &mut Vec<Vec<String>>, top: usize, left: usize, values: &[Row]) -> (usize, usize, usize) {
    let mut updated_rows = 0;
    let mut updated_cells = 0;
    let mut columns = BTreeSet::new();

    for (r, row) in values.iter().enumerate() {
        let mut touched = false;
        for (c, cell) in row.iter().enumerate() {
            let Some(value) = cell else { continue };
            let (ri, ci) = (top + r, left + c);
            if rows.len() <= ri {
                rows.resize_with(ri + 1, Vec::new);
            }
            let target = &mut rows[ri];
            if target.len() <= ci {
                target.resize(ci + 1, String::new());
            }
            target[ci] = value.clone();
            touched = true;
            updated_cells += 1;
            columns.insert(ci);
        }
        if touched {
            updated_rows += 1;
        }
    }

    (updated_rows, columns.len(), updated_cells)
}

fn check_extent(range: &SheetRange, row_span: Span, col_span: Span, values: &[Row]) -> Result<(), ClientError> {
    if let Some((a, b)) = row_span
        && values.len() > b - a + 1
    {
        return Err(ClientError::new(format!(
            "Requested writing within range [{}], but tried writing to row [{}]",
            range,
            a + values.len()
        )));
    }
    if let Some((a, b)) = col_span
        && let Some(widest) = values.iter().map(|r| r.len()).max()
        && widest > b - a + 1
    {
        return Err(ClientError::new(format!(
            "Requested writing within range [{}], but tried writing to column [{}]",
            range,
            sheetql_engine::engine::column_letter(a + widest - 1)
                .map(String::from)
                .unwrap_or_else(|_| (a + widest).to_string())
        )));
    }
    Ok(())
}

/// Reject writes that would land past the sheet's grid limits.
fn check_grid_limits(
    range: &SheetRange,
    rows: &[Vec<String>],
    top: usize,
    left: usize,
    values: &[Row],
) -> Result<(), ClientError> {
    let max_rows = rows.len().saturating_add(GRID_ROW_HEADROOM);
    let max_columns = rows
        .iter()
        .map(|r| r.len())
        .max()
        .unwrap_or(0)
        .saturating_add(GRID_COLUMN_HEADROOM);
    let widest = values.iter().map(|r| r.len()).max().unwrap_or(0);
    let rows_fit = top.checked_add(values.len()).is_some_and(|end| end <= max_rows);
    let columns_fit = left.checked_add(widest).is_some_and(|end| end <= max_columns);
    if rows_fit && columns_fit {
        return Ok(());
    }
    Err(ClientError::new(format!(
        "Range ({}) exceeds grid limits. Max rows: {}, max columns: {}",
        range, max_rows, max_columns
    )))
}

impl SheetClient for MemoryClient {
    fn spreadsheet_info(&self) -> Result<SpreadsheetInfo, ClientError> {
        let sheets = self
            .sheet_titles()
            .into_iter()
            .filter_map(|title| {
                let sheet = self.sheets.get(&title)?;
                let rows = read_span(&sheet.rows, None, None);
                Some(SheetProperties {
                    index: sheet.index,
                    row_count: rows.len(),
                    column_count: rows.iter().map(|r| r.len()).max().unwrap_or(0),
                    title,
                })
            })
            .collect();
        Ok(SpreadsheetInfo {
            title: self.title.clone(),
            sheets,
        })
    }

    fn get_values(&self, range: &SheetRange) -> Result<Vec<Vec<String>>, ClientError> {
        Self::checked(range)?;
        let sheet = self
            .sheets
            .get(range.sheet_name())
            .ok_or_else(|| Self::missing_sheet(range))?;
        let (row_span, col_span) = spans(range);
        Ok(read_span(&sheet.rows, row_span, col_span))
    }

    fn update_values(&self, range: &SheetRange, values: &[Row]) -> Result<UpdateResponse, ClientError> {
        Self::checked(range)?;
        let (row_span, col_span) = spans(range);
        check_extent(range, row_span, col_span, values)?;

        let mut sheet = self
            .sheets
            .get_mut(range.sheet_name())
            .ok_or_else(|| Self::missing_sheet(range))?;
        let top = row_span.map(|(a, _)| a).unwrap_or(0);
        let left = col_span.map(|(a, _)| a).unwrap_or(0);
        check_grid_limits(range, &sheet.rows, top, left, values)?;
        let (updated_rows, updated_columns, updated_cells) = write_cells(&mut sheet.rows, top, left, values);

        tracing::debug!(range = %range, updated_rows, updated_cells, "values updated");
        Ok(UpdateResponse {
            updated_range: range.to_string(),
            updated_rows,
            updated_columns,
            updated_cells,
        })
    }

    fn append_values(&self, range: &SheetRange, values: &[Row]) -> Result<UpdateResponse, ClientError> {
        Self::checked(range)?;
        let (_, col_span) = spans(range);

        let mut sheet = self
            .sheets
            .get_mut(range.sheet_name())
            .ok_or_else(|| Self::missing_sheet(range))?;
        let top = read_span(&sheet.rows, None, None).len();
        sheet.rows.truncate(top);
        let left = col_span.map(|(a, _)| a).unwrap_or(0);
        check_grid_limits(range, &sheet.rows, top, left, values)?;
        let (updated_rows, updated_columns, updated_cells) = write_cells(&mut sheet.rows, top, left, values);

        let width = values.iter().map(|r| r.len()).max().unwrap_or(0);
        let updated_range = if values.is_empty() || width == 0 {
            range.to_string()
        } else {
            SheetRange::Cells {
                sheet: range.sheet_name().to_string(),
                start_col: left,
                start_row: top + 1,
                end_col: left + width - 1,
                end_row: top + values.len(),
            }
            .to_string()
        };

        tracing::debug!(range = %updated_range, updated_rows, "values appended");
        Ok(UpdateResponse {
            updated_range,
            updated_rows,
            updated_columns,
            updated_cells,
        })
    }
}
