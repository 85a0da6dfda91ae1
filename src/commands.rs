//! Command execution against a CSV workbook.

use crate::cli::Commands;
use anyhow::{Context, Result, anyhow, bail};
use sheetql_core::storage::{load_workbook, save_workbook, write_csv_content};
use sheetql_core::{MemoryClient, MissingColumn, Projection, Record, Row, SheetRange, Spreadsheet};
use sheetql_engine::engine::{column_letter, notation_for_column};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Settings shared by every command, after merging flags over config.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub workbook: Option<PathBuf>,
    pub default_sheet: Option<String>,
    pub missing_column: MissingColumn,
}

impl Session {
    fn workbook(&self) -> Result<&Path> {
        self.workbook
            .as_deref()
            .context("No workbook given: pass --workbook or set `workbook` in config.toml")
    }

    fn sheet_name(&self, sheet: Option<String>) -> Result<String> {
        sheet
            .or_else(|| self.default_sheet.clone())
            .context("No sheet given: pass a sheet name or set `default_sheet` in config.toml")
    }

    fn open(&self) -> Result<Spreadsheet<MemoryClient>> {
        let dir = self.workbook()?;
        let client = load_workbook(dir)
            .with_context(|| format!("Failed to open workbook {}", dir.display()))?;
        Ok(Spreadsheet::new(client).with_missing_column(self.missing_column))
    }

    fn save(&self, spreadsheet: Spreadsheet<MemoryClient>) -> Result<()> {
        let dir = self.workbook()?;
        save_workbook(dir, spreadsheet.client())
            .with_context(|| format!("Failed to save workbook {}", dir.display()))?;
        tracing::info!(workbook = %dir.display(), "workbook saved");
        Ok(())
    }
}

/// Run one command, writing its output to `out`.
pub fn run(command: Commands, session: &Session, out: &mut dyn Write) -> Result<()> {
    match command {
        Commands::Info => {
            let info = session.open()?.info()?;
            writeln!(out, "{}", info.title)?;
            for sheet in info.sheets {
                writeln!(
                    out,
                    "  {}\t{} rows\t{} columns",
                    sheet.title, sheet.row_count, sheet.column_count
                )?;
            }
        }
        Commands::Headers { sheet } => {
            let name = session.sheet_name(sheet)?;
            let headers = session.open()?.headers(&name)?;
            write!(out, "{}", write_csv_content(&[headers]))?;
        }
        Commands::Select {
            sheet,
            columns,
            conditions,
            json,
        } => {
            let name = session.sheet_name(sheet)?;
            let projection = Projection::from_names(&columns);
            let table = session.open()?.select(&name, &projection, &conditions)?;
            if json {
                let records = table.into_records();
                writeln!(out, "{}", serde_json::to_string_pretty(&records)?)?;
            } else {
                write!(out, "{}", write_csv_content(&table.to_string_rows()))?;
            }
        }
        Commands::Insert { sheet, set, records } => {
            let name = session.sheet_name(sheet)?;
            let mut to_insert: Vec<Record> = Vec::new();
            if !set.is_empty() {
                to_insert.push(set.into_iter().collect());
            }
            for raw in records {
                let record: Record = serde_json::from_str(&raw)
                    .with_context(|| format!("Invalid record {:?}: expected a JSON object of strings", raw))?;
                to_insert.push(record);
            }
            if to_insert.is_empty() {
                bail!("Nothing to insert: pass --set COLUMN=VALUE or --record JSON");
            }
            let spreadsheet = session.open()?;
            let count = spreadsheet.insert(&name, &to_insert)?;
            session.save(spreadsheet)?;
            writeln!(out, "Inserted {} row(s)", count)?;
        }
        Commands::Update {
            sheet,
            set,
            conditions,
        } => {
            let name = session.sheet_name(sheet)?;
            let values: Record = set.into_iter().collect();
            let spreadsheet = session.open()?;
            let count = spreadsheet.update_where(&name, &values, &conditions)?;
            if count > 0 {
                session.save(spreadsheet)?;
            }
            writeln!(out, "Updated {} row(s)", count)?;
        }
        Commands::AddColumns { sheet, columns } => {
            let name = session.sheet_name(sheet)?;
            let spreadsheet = session.open()?;
            let count = spreadsheet.add_columns(&name, &columns)?;
            session.save(spreadsheet)?;
            writeln!(out, "Added {} column(s)", count)?;
        }
        Commands::Write { range, values } => {
            let range: SheetRange = range.parse()?;
            let rows: Vec<Row> = serde_json::from_str(&values)
                .context("Invalid values: expected a JSON array of rows of strings or null")?;
            let spreadsheet = session.open()?;
            let count = spreadsheet.update_range(&range, &rows)?;
            session.save(spreadsheet)?;
            writeln!(out, "Updated {} row(s)", count)?;
        }
        Commands::Letter { position } => {
            writeln!(out, "{}", column_letter(position)?)?;
        }
        Commands::Notation { column, sheet } => {
            let name = session.sheet_name(sheet)?;
            let headers = session.open()?.headers(&name)?;
            let letter = notation_for_column(&headers, &column)
                .map_err(|e| anyhow!("{} (sheet {})", e, name))?;
            writeln!(out, "{}", letter)?;
        }
    }
    Ok(())
}
