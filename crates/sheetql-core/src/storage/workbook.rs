//! Load and save a [`MemoryClient`] as a directory of `<sheet>.csv` files.

use super::csv::{parse_csv_content, write_csv_content};
use crate::error::{Result, SheetqlError};
use crate::memory::MemoryClient;
use std::path::{Path, PathBuf};

const MAX_SHEET_FILE_BYTES: u64 = 16 * 1_048_576; // 16 MiB
const SHEET_EXTENSION: &str = "csv";

fn read_sheet_file(path: &Path) -> Result<String> {
    let meta = std::fs::metadata(path)?;
    if meta.len() > MAX_SHEET_FILE_BYTES {
        return Err(SheetqlError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!(
                "Refusing to read {}: sheet file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_SHEET_FILE_BYTES
            ),
        )));
    }
    Ok(std::fs::read_to_string(path)?)
}

fn check_sheet_name(title: &str) -> Result<()> {
    let bad = title.is_empty()
        || title == "."
        || title == ".."
        || title.contains(['/', '\\', '\0']);
    if bad {
        return Err(SheetqlError::InvalidSheetName(title.to_string()));
    }
    Ok(())
}

/// File backing sheet `title` inside workbook `dir`.
pub fn sheet_path(dir: &Path, title: &str) -> Result<PathBuf> {
    check_sheet_name(title)?;
    Ok(dir.join(format!("{}.{}", title, SHEET_EXTENSION)))
}

/// Load every `*.csv` file in `dir` as a sheet, in file-name order.
/// The spreadsheet title is the directory name.
pub fn load_workbook(dir: &Path) -> Result<MemoryClient> {
    if !dir.is_dir() {
        return Err(SheetqlError::NotAWorkbook(dir.to_path_buf()));
    }
    let title = dir
        .canonicalize()?
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == SHEET_EXTENSION))
        .collect();
    files.sort();

    let client = MemoryClient::new(title);
    for path in files {
        let Some(sheet) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };
        let rows = parse_csv_content(&read_sheet_file(&path)?);
        tracing::debug!(sheet = %sheet, rows = rows.len(), "loaded sheet");
        client.add_sheet(sheet, rows);
    }
    Ok(client)
}

/// Write every sheet of `client` to `dir`, creating the directory if needed.
pub fn save_workbook(dir: &Path, client: &MemoryClient) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    for title in client.sheet_titles() {
        let path = sheet_path(dir, &title)?;
        let rows = client.sheet_values(&title).unwrap_or_default();
        std::fs::write(&path, write_csv_content(&rows))?;
        tracing::debug!(sheet = %title, path = %path.display(), "saved sheet");
    }
    Ok(())
}
