//! Workbook storage: a directory of CSV files, one per sheet.

mod csv;
mod workbook;

pub use csv::{parse_csv_content, write_csv_content};
pub use workbook::{load_workbook, save_workbook, sheet_path};
