//! A1 notation: column letters and sheet ranges.
//!
//! Columns are addressed by a single uppercase letter, so only positions
//! 0..=25 (`A`..=`Z`) are representable. Anything past `Z` is rejected with
//! [`EngineError::OutOfRange`] instead of wrapping into punctuation.
//!
//! # Examples
//!
//! ```ignore
//! assert_eq!(column_letter(3)?, 'D');
//! let range: SheetRange = "People!D1:E1".parse()?;
//! assert_eq!(range.to_string(), "People!D1:E1");
//! ```

use crate::error::{EngineError, Result};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Number of addressable single-letter columns.
pub const MAX_COLUMNS: usize = 26;

/// Map a zero-based column position to its letter (0 -> 'A', 25 -> 'Z').
pub fn column_letter(position: usize) -> Result<char> {
    if position >= MAX_COLUMNS {
        return Err(EngineError::OutOfRange(position));
    }
    Ok((b'A' + position as u8) as char)
}

/// Inverse of [`column_letter`]. Accepts lower case.
pub fn column_position(letter: char) -> Result<usize> {
    let upper = letter.to_ascii_uppercase();
    if upper.is_ascii_uppercase() {
        Ok((upper as u8 - b'A') as usize)
    } else {
        Err(EngineError::InvalidLetter(letter))
    }
}

/// Letter of the column named `name` in `headers`.
pub fn notation_for_column(headers: &[String], name: &str) -> Result<char> {
    let position = super::grid::column_index(headers, name)
        .ok_or_else(|| EngineError::ColumnNotFound(name.to_string()))?;
    column_letter(position)
}

/// A range of a named sheet in A1 notation.
///
/// Row numbers are 1-based like the sheet itself; columns are zero-based
/// positions rendered as letters.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SheetRange {
    /// The whole sheet (`People`).
    Sheet(String),
    /// Whole rows (`People!3:3`).
    Rows {
        sheet: String,
        first: usize,
        last: usize,
    },
    /// Whole columns (`People!A:A`).
    Columns {
        sheet: String,
        first: usize,
        last: usize,
    },
    /// A rectangle of cells (`People!D1:E1`).
    Cells {
        sheet: String,
        start_col: usize,
        start_row: usize,
        end_col: usize,
        end_row: usize,
    },
}

impl SheetRange {
    pub fn sheet(name: impl Into<String>) -> Self {
        SheetRange::Sheet(name.into())
    }

    pub fn row(sheet: impl Into<String>, number: usize) -> Self {
        SheetRange::Rows {
            sheet: sheet.into(),
            first: number,
            last: number,
        }
    }

    pub fn column(sheet: impl Into<String>, position: usize) -> Self {
        SheetRange::Columns {
            sheet: sheet.into(),
            first: position,
            last: position,
        }
    }

    /// The header row of a sheet (`Sheet!1:1`).
    pub fn header(sheet: impl Into<String>) -> Self {
        SheetRange::row(sheet, 1)
    }

    pub fn sheet_name(&self) -> &str {
        match self {
            SheetRange::Sheet(sheet)
            | SheetRange::Rows { sheet, .. }
            | SheetRange::Columns { sheet, .. }
            | SheetRange::Cells { sheet, .. } => sheet,
        }
    }

    /// Check the range is well-formed: 1-based rows, ordered bounds, columns within A-Z.
    pub fn validate(&self) -> Result<()> {
        let bad = || EngineError::InvalidRange(self.to_string());
        match *self {
            SheetRange::Sheet(_) => Ok(()),
            SheetRange::Rows { first, last, .. } => {
                if first == 0 || last < first {
                    return Err(bad());
                }
                Ok(())
            }
            SheetRange::Columns { first, last, .. } => {
                if last < first {
                    return Err(bad());
                }
                column_letter(last).map(|_| ())
            }
            SheetRange::Cells {
                start_col,
                start_row,
                end_col,
                end_row,
                ..
            } => {
                if start_row == 0 || end_row < start_row || end_col < start_col {
                    return Err(bad());
                }
                column_letter(end_col).map(|_| ())
            }
        }
    }

    /// Parse `Sheet`, `Sheet!3:4`, `Sheet!A:B`, `Sheet!D1:E1` or `Sheet!C2`.
    pub fn parse(input: &str) -> Result<SheetRange> {
        let bad = || EngineError::InvalidRange(input.to_string());
        let caps = range_re().captures(input.trim()).ok_or_else(bad)?;
        let sheet = match (caps.name("quoted"), caps.name("plain")) {
            (Some(q), _) => q.as_str().replace("''", "'"),
            (_, Some(p)) => p.as_str().to_string(),
            _ => return Err(bad()),
        };
        let Some(a1) = caps.name("a1") else {
            return Ok(SheetRange::Sheet(sheet));
        };

        let number = |s: &str| s.parse::<usize>().map_err(|_| bad());
        let letter = |s: &str| {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => column_position(c),
                _ => Err(bad()),
            }
        };

        let (start, end) = a1.as_str().split_once(':').unwrap_or((a1.as_str(), a1.as_str()));
        let start = split_a1(start).ok_or_else(bad)?;
        let end = split_a1(end).ok_or_else(bad)?;

        let range = match (start, end) {
            (("", r1), ("", r2)) => SheetRange::Rows {
                sheet,
                first: number(r1)?,
                last: number(r2)?,
            },
            ((c1, ""), (c2, "")) => SheetRange::Columns {
                sheet,
                first: letter(c1)?,
                last: letter(c2)?,
            },
            ((c1, r1), (c2, r2)) if !c1.is_empty() && !r1.is_empty() && !c2.is_empty() && !r2.is_empty() => {
                SheetRange::Cells {
                    sheet,
                    start_col: letter(c1)?,
                    start_row: number(r1)?,
                    end_col: letter(c2)?,
                    end_row: number(r2)?,
                }
            }
            _ => return Err(bad()),
        };
        range.validate()?;
        Ok(range)
    }
}

/// Split `D12` into (`D`, `12`). Either half may be empty.
fn split_a1(part: &str) -> Option<(&str, &str)> {
    let idx = part
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(part.len());
    let (letters, digits) = part.split_at(idx);
    if !digits.chars().all(|c| c.is_ascii_digit()) || part.is_empty() {
        return None;
    }
    Some((letters, digits))
}

fn range_re() -> &'static Regex {
    static RANGE_RE: OnceLock<Regex> = OnceLock::new();
    RANGE_RE.get_or_init(|| {
        Regex::new(r"^(?:'(?<quoted>(?:[^']|'')+)'|(?<plain>[^!']+))(?:!(?<a1>[A-Za-z0-9:]+))?$")
            .expect("sheet range regex must compile")
    })
}

fn write_sheet_name(f: &mut fmt::Formatter<'_>, sheet: &str) -> fmt::Result {
    if sheet.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        write!(f, "{}", sheet)
    } else {
        write!(f, "'{}'", sheet.replace('\'', "''"))
    }
}

/// Letter for display; positions past `Z` fall back to `?` since a range
/// holding them never passes [`SheetRange::validate`].
fn display_letter(position: usize) -> char {
    column_letter(position).unwrap_or('?')
}

impl fmt::Display for SheetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_sheet_name(f, self.sheet_name())?;
        match *self {
            SheetRange::Sheet(_) => Ok(()),
            SheetRange::Rows { first, last, .. } => write!(f, "!{}:{}", first, last),
            SheetRange::Columns { first, last, .. } => {
                write!(f, "!{}:{}", display_letter(first), display_letter(last))
            }
            SheetRange::Cells {
                start_col,
                start_row,
                end_col,
                end_row,
                ..
            } => write!(
                f,
                "!{}{}:{}{}",
                display_letter(start_col),
                start_row,
                display_letter(end_col),
                end_row
            ),
        }
    }
}

impl std::str::FromStr for SheetRange {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        SheetRange::parse(s)
    }
}
