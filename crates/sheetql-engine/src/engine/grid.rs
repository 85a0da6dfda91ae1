//! Grid model: a header row followed by data rows of string cells.
//!
//! Rows coming back from a spreadsheet are ragged: trailing empty cells are
//! simply missing. A missing cell is *absent*, which is different from a cell
//! holding the empty string, so everything downstream works with
//! [`Cell`] (`Option<String>`) once a value leaves the grid.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single cell value. `None` means the cell is absent.
pub type Cell = Option<String>;

/// One row of cells, aligned to header order.
pub type Row = Vec<Cell>;

/// A key-value view of one data row (column name -> cell text).
pub type Record = BTreeMap<String, String>;

/// Header row plus data rows, as returned by a values read.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Grid { rows }
    }

    /// Build a grid from string literals; handy for fixtures.
    pub fn from_rows<R, S>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Grid {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// The header row, or an empty slice when the grid has no rows at all.
    pub fn header(&self) -> &[String] {
        self.rows.first().map(|r| r.as_slice()).unwrap_or(&[])
    }

    /// All rows after the header.
    pub fn data_rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// Every row including the header.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Position of the first header cell equal to `name`.
    ///
    /// Recomputed on every call; the header row is authoritative per query.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        column_index(self.header(), name)
    }

    /// Cell text at a grid position (row 0 is the header). `None` when absent.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(|s| s.as_str())
    }
}

/// Position of the first header equal to `name`.
pub fn column_index(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

/// A `{header, value}` filter.
///
/// Selection treats `value` as a substring to look for; update planning
/// treats it as the exact cell text to match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub header: String,
    pub value: String,
}

impl Condition {
    pub fn new(header: impl Into<String>, value: impl Into<String>) -> Self {
        Condition {
            header: header.into(),
            value: value.into(),
        }
    }
}

/// Which columns a query returns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Projection {
    /// Every header column, in header order (`*`).
    All,
    /// Named columns in request order. Duplicates are kept.
    Columns(Vec<String>),
}

impl Projection {
    pub fn columns<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Projection::Columns(names.into_iter().map(Into::into).collect())
    }

    /// Parse the list form used by callers: a lone `"*"` means all columns.
    pub fn from_names(names: &[String]) -> Self {
        match names {
            [only] if only == "*" => Projection::All,
            _ => Projection::Columns(names.to_vec()),
        }
    }

    /// Resolve to header positions. Unknown names are skipped.
    pub fn resolve(&self, headers: &[String]) -> Vec<usize> {
        match self {
            Projection::All => (0..headers.len()).collect(),
            Projection::Columns(names) => names
                .iter()
                .filter_map(|name| {
                    let idx = column_index(headers, name);
                    if idx.is_none() {
                        tracing::debug!(column = %name, "projection column not in header, skipping");
                    }
                    idx
                })
                .collect(),
        }
    }
}

/// A query result: projected header plus projected data rows.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    /// Number of data rows (the header is not counted).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// One record per data row. Absent cells are left out of the record.
    pub fn into_records(self) -> Vec<Record> {
        let header = self.header;
        self.rows
            .into_iter()
            .map(|row| {
                header
                    .iter()
                    .zip(row)
                    .filter_map(|(name, cell)| cell.map(|value| (name.clone(), value)))
                    .collect::<Record>()
            })
            .collect()
    }

    /// Render back to plain string rows, header first. Absent cells become "".
    pub fn to_string_rows(&self) -> Vec<Vec<String>> {
        std::iter::once(self.header.clone())
            .chain(
                self.rows
                    .iter()
                    .map(|row| row.iter().map(|c| c.clone().unwrap_or_default()).collect::<Vec<String>>()),
            )
            .collect()
    }
}
