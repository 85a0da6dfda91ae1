//! SQL-shaped operations over one spreadsheet.
//!
//! [`Spreadsheet`] reads a snapshot through its [`SheetClient`], hands it to
//! the engine, and sends the resulting [`EditPlan`] back through the same
//! client. Counts reported to the caller come from the client's responses.

use crate::client::{ClientError, SheetClient, SpreadsheetInfo, ValueRange};
use crate::error::{Result, SheetqlError};
use serde::Serialize;
use sheetql_engine::engine::{
    Condition, EditPlan, Grid, Location, MissingColumn, Projection, Record, Row, SheetRange, Table,
    select_with,
};

/// Totals reported back after applying an [`EditPlan`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    pub updated_rows: usize,
    pub updated_columns: usize,
}

/// A spreadsheet reached through an injected client.
pub struct Spreadsheet<C> {
    client: C,
    missing_column: MissingColumn,
}

/// Log a failed request and pass its error through unchanged.
fn logged<T>(result: std::result::Result<T, ClientError>) -> Result<T> {
    result.map_err(|err| {
        tracing::error!(error = %err.message, "spreadsheet request failed");
        SheetqlError::Client(err)
    })
}

impl<C: SheetClient> Spreadsheet<C> {
    pub fn new(client: C) -> Self {
        Spreadsheet {
            client,
            missing_column: MissingColumn::default(),
        }
    }

    /// How `select` treats conditions on columns missing from the header.
    pub fn with_missing_column(mut self, policy: MissingColumn) -> Self {
        self.missing_column = policy;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Spreadsheet title and sheet list.
    pub fn info(&self) -> Result<SpreadsheetInfo> {
        logged(self.client.spreadsheet_info())
    }

    /// All values of a sheet, header first.
    pub fn sheet(&self, name: &str) -> Result<Grid> {
        let rows = logged(self.client.get_values(&SheetRange::sheet(name)))?;
        Ok(Grid::new(rows))
    }

    /// The header row of a sheet. Empty when the sheet has no rows.
    pub fn headers(&self, name: &str) -> Result<Vec<String>> {
        let rows = logged(self.client.get_values(&SheetRange::header(name)))?;
        Ok(rows.into_iter().next().unwrap_or_default())
    }

    /// `SELECT projection FROM name WHERE conditions`.
    pub fn select(&self, name: &str, projection: &Projection, conditions: &[Condition]) -> Result<Table> {
        let grid = self.sheet(name)?;
        Ok(select_with(&grid, projection, conditions, self.missing_column))
    }

    /// Like [`Spreadsheet::select`], one record per matching row.
    pub fn select_records(
        &self,
        name: &str,
        projection: &Projection,
        conditions: &[Condition],
    ) -> Result<Vec<Record>> {
        Ok(self.select(name, projection, conditions)?.into_records())
    }

    /// `INSERT INTO name VALUES records`. Returns the number of rows appended.
    pub fn insert(&self, name: &str, records: &[Record]) -> Result<usize> {
        let headers = self.headers(name)?;
        if headers.is_empty() {
            return Err(SheetqlError::EmptySheet(name.to_string()));
        }
        let plan = EditPlan::insert(&headers, records);
        Ok(self.apply(name, &plan)?.updated_rows)
    }

    /// `UPDATE name SET column_values WHERE conditions`.
    ///
    /// Each condition selects rows on its own (see [`sheetql_engine::engine::plan_update`]).
    /// All matched rows go out in a single batch. Returns the rows updated.
    pub fn update_where(&self, name: &str, column_values: &Record, conditions: &[Condition]) -> Result<usize> {
        let grid = self.sheet(name)?;
        let plan = EditPlan::update(&grid, column_values, conditions);
        if plan.is_empty() {
            tracing::warn!(sheet = %name, "no row found");
            return Ok(0);
        }
        Ok(self.apply(name, &plan)?.updated_rows)
    }

    /// `ALTER TABLE name ADD columns`. Returns the columns written.
    pub fn add_columns(&self, name: &str, columns: &[String]) -> Result<usize> {
        let headers = self.headers(name)?;
        let plan = EditPlan::append_columns(headers.len(), columns)?;
        Ok(self.apply(name, &plan)?.updated_columns)
    }

    /// Overwrite an arbitrary range. Returns the rows updated.
    pub fn update_range(&self, range: &SheetRange, values: &[Row]) -> Result<usize> {
        range.validate()?;
        let response = logged(self.client.update_values(range, values))?;
        tracing::info!(range = %response.updated_range, rows = response.updated_rows, "range updated");
        Ok(response.updated_rows)
    }

    /// Send every edit of `plan` to sheet `name`, in plan order.
    ///
    /// Appends and header writes are sent one request each; runs of
    /// consecutive row overwrites are grouped into one batch request.
    pub fn apply(&self, name: &str, plan: &EditPlan) -> Result<ApplyReport> {
        let mut report = ApplyReport::default();
        let mut batch = Vec::new();

        for edit in &plan.edits {
            let range = edit.range(name);
            match edit.location {
                Location::Row(_) => batch.push(ValueRange {
                    range,
                    values: edit.values.clone(),
                }),
                Location::AppendRows => {
                    self.flush_rows(&mut batch, &mut report)?;
                    let response = logged(self.client.append_values(&range, &edit.values))?;
                    tracing::info!(range = %response.updated_range, rows = response.updated_rows, "rows appended");
                    report.updated_rows += response.updated_rows;
                }
                Location::HeaderColumns(_) => {
                    self.flush_rows(&mut batch, &mut report)?;
                    let response = logged(self.client.update_values(&range, &edit.values))?;
                    tracing::info!(range = %response.updated_range, columns = response.updated_columns, "columns added");
                    report.updated_columns += response.updated_columns;
                }
            }
        }

        self.flush_rows(&mut batch, &mut report)?;
        Ok(report)
    }

    fn flush_rows(&self, batch: &mut Vec<ValueRange>, report: &mut ApplyReport) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }
        tracing::debug!(ranges = batch.len(), "sending batch update");
        let response = logged(self.client.batch_update(batch.as_slice()))?;
        tracing::info!(rows = response.total_updated_rows, "rows updated");
        report.updated_rows += response.total_updated_rows;
        batch.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryClient;
    use sheetql_engine::engine::Edit;

    fn strings(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    fn record(pairs: &[(&str, &str)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn club() -> Spreadsheet<MemoryClient> {
        let client = MemoryClient::new("Club");
        client.add_sheet(
            "People",
            strings(&[
                &["name", "age", "city"],
                &["Alice", "30", "Oslo"],
                &["Bob", "25", "Bergen"],
                &["Carol", "35"],
            ]),
        );
        client.add_sheet("Blank", Vec::new());
        Spreadsheet::new(client)
    }

    #[test]
    fn test_info_and_headers() {
        let sheet = club();
        let info = sheet.info().unwrap();
        assert_eq!(info.title, "Club");
        assert_eq!(info.sheets.len(), 2);
        assert_eq!(sheet.headers("People").unwrap(), vec!["name", "age", "city"]);
        assert!(sheet.headers("Blank").unwrap().is_empty());
    }

    #[test]
    fn test_select_records() {
        let records = club()
            .select_records("People", &Projection::columns(["name"]), &[Condition::new("age", "25")])
            .unwrap();
        assert_eq!(records, vec![record(&[("name", "Bob")])]);
    }

    #[test]
    fn test_select_missing_column_policy() {
        let conditions = [Condition::new("email", "Oslo")];
        let strict = club().select("People", &Projection::All, &conditions).unwrap();
        assert!(strict.is_empty());

        let broad = club()
            .with_missing_column(MissingColumn::MatchAnyColumn)
            .select("People", &Projection::All, &conditions)
            .unwrap();
        assert_eq!(broad.len(), 1);
    }

    #[test]
    fn test_insert_appends_aligned_rows() {
        let sheet = club();
        let appended = sheet
            .insert("People", &[record(&[("name", "Dan"), ("city", "Rome")]), record(&[("name", "Eve")])])
            .unwrap();
        assert_eq!(appended, 2);
        let grid = sheet.sheet("People").unwrap();
        assert_eq!(grid.data_rows().len(), 5);
        assert_eq!(grid.rows()[4], vec!["Dan", "", "Rome"]);
        assert_eq!(grid.rows()[5], vec!["Eve"]);
    }

    #[test]
    fn test_insert_into_sheet_without_header() {
        let err = club().insert("Blank", &[record(&[("a", "b")])]).unwrap_err();
        assert!(matches!(err, SheetqlError::EmptySheet(_)));
    }

    #[test]
    fn test_update_where_merges_and_persists() {
        let sheet = club();
        let updated = sheet
            .update_where("People", &record(&[("city", "Paris")]), &[Condition::new("age", "35")])
            .unwrap();
        assert_eq!(updated, 1);
        let grid = sheet.sheet("People").unwrap();
        assert_eq!(grid.rows()[3], vec!["Carol", "35", "Paris"]);
        assert_eq!(grid.rows()[1], vec!["Alice", "30", "Oslo"]);
    }

    #[test]
    fn test_update_where_conditions_are_independent() {
        let sheet = club();
        let updated = sheet
            .update_where(
                "People",
                &record(&[("age", "40")]),
                &[Condition::new("name", "Alice"), Condition::new("city", "Bergen")],
            )
            .unwrap();
        assert_eq!(updated, 2);
        let ages: Vec<_> = sheet
            .select("People", &Projection::columns(["age"]), &[])
            .unwrap()
            .rows
            .into_iter()
            .map(|r| r[0].clone().unwrap_or_default())
            .collect();
        assert_eq!(ages, vec!["40", "40", "35"]);
    }

    #[test]
    fn test_update_where_without_match_sends_nothing() {
        let sheet = club();
        let updated = sheet
            .update_where("People", &record(&[("age", "1")]), &[Condition::new("name", "Zed")])
            .unwrap();
        assert_eq!(updated, 0);
    }

    #[test]
    fn test_add_columns() {
        let sheet = club();
        let added = sheet
            .add_columns("People", &["email".to_string(), "phone".to_string()])
            .unwrap();
        assert_eq!(added, 2);
        assert_eq!(
            sheet.headers("People").unwrap(),
            vec!["name", "age", "city", "email", "phone"]
        );
    }

    #[test]
    fn test_add_columns_past_z_fails_before_writing() {
        let client = MemoryClient::new("Wide");
        let header: Vec<String> = (0..25).map(|i| format!("c{}", i)).collect();
        client.add_sheet("Wide", vec![header]);
        let sheet = Spreadsheet::new(client);
        let err = sheet
            .add_columns("Wide", &["y".to_string(), "z".to_string()])
            .unwrap_err();
        assert!(matches!(err, SheetqlError::Engine(sheetql_engine::EngineError::OutOfRange(26))));
        assert_eq!(sheet.headers("Wide").unwrap().len(), 25);
    }

    #[test]
    fn test_update_range() {
        let sheet = club();
        let range: SheetRange = "People!B2:B3".parse().unwrap();
        let updated = sheet
            .update_range(&range, &[vec![Some("31".into())], vec![Some("26".into())]])
            .unwrap();
        assert_eq!(updated, 2);
        assert_eq!(sheet.sheet("People").unwrap().cell(2, 1), Some("26"));
    }

    #[test]
    fn test_client_errors_pass_through() {
        let err = club().sheet("Missing").unwrap_err();
        assert_eq!(err.message(), "Unable to parse range: Missing");
    }

    #[test]
    fn test_apply_reports_totals() {
        let sheet = club();
        let grid = sheet.sheet("People").unwrap();
        let mut plan = EditPlan::update(&grid, &record(&[("age", "1")]), &[Condition::new("city", "Oslo")]);
        plan.edits
            .extend(EditPlan::append_columns(3, &["email".to_string()]).unwrap().edits);
        let report = sheet.apply("People", &plan).unwrap();
        assert_eq!(report, ApplyReport { updated_rows: 1, updated_columns: 1 });
    }

    #[test]
    fn test_apply_keeps_plan_order() {
        let sheet = club();
        let plan = EditPlan {
            edits: vec![
                Edit {
                    location: Location::Row(5),
                    values: vec![vec![Some("Dan".into())]],
                },
                Edit {
                    location: Location::AppendRows,
                    values: vec![vec![Some("Eve".into())]],
                },
            ],
        };
        let report = sheet.apply("People", &plan).unwrap();
        assert_eq!(report.updated_rows, 2);
        let grid = sheet.sheet("People").unwrap();
        assert_eq!(grid.rows()[4], vec!["Dan"]);
        assert_eq!(grid.rows()[5], vec!["Eve"]);
    }

    #[test]
    fn test_update_range_far_past_the_grid_is_an_error() {
        let sheet = club();
        let range: SheetRange = "People!18446744073709551615:18446744073709551615"
            .parse()
            .unwrap();
        let err = sheet.update_range(&range, &[vec![Some("x".into())]]).unwrap_err();
        assert!(matches!(err, SheetqlError::Client(_)));
        assert!(err.message().contains("exceeds grid limits"));
    }
}
