//! `SELECT columns WHERE conditions` over a [`Grid`].
//!
//! Conditions are ANDed and each one keeps the data rows whose cell in the
//! named column *contains* the condition value. Matching is case-sensitive
//! and an absent cell never matches. The input grid is only borrowed; the
//! result is a freshly built [`Table`].

use super::grid::{Condition, Grid, Projection, Record, Row, Table};
use serde::{Deserialize, Serialize};

/// What a condition does when its column is not in the header row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingColumn {
    /// The condition matches no rows.
    #[default]
    MatchNothing,
    /// The condition keeps rows where any present cell contains the value.
    MatchAnyColumn,
}

/// Run a query with the default [`MissingColumn::MatchNothing`] policy.
pub fn select(grid: &Grid, projection: &Projection, conditions: &[Condition]) -> Table {
    select_with(grid, projection, conditions, MissingColumn::default())
}

/// Run a query, choosing how conditions on unknown columns behave.
pub fn select_with(
    grid: &Grid,
    projection: &Projection,
    conditions: &[Condition],
    missing: MissingColumn,
) -> Table {
    let headers = grid.header();
    let columns = projection.resolve(headers);

    let mut kept: Vec<&Vec<String>> = grid.data_rows().iter().collect();
    for condition in conditions {
        let index = grid.column_index(&condition.header);
        if index.is_none() {
            tracing::debug!(
                column = %condition.header,
                policy = ?missing,
                "condition column not in header"
            );
        }
        kept.retain(|row| row_matches(row, index, &condition.value, missing));
    }

    Table {
        header: columns.iter().map(|&c| headers[c].clone()).collect(),
        rows: kept.into_iter().map(|row| project(row, &columns)).collect(),
    }
}

/// Same query, returned as one record per matching row.
pub fn select_records(
    grid: &Grid,
    projection: &Projection,
    conditions: &[Condition],
    missing: MissingColumn,
) -> Vec<Record> {
    select_with(grid, projection, conditions, missing).into_records()
}

fn row_matches(row: &[String], index: Option<usize>, needle: &str, missing: MissingColumn) -> bool {
    match (index, missing) {
        (Some(col), _) => row.get(col).is_some_and(|cell| cell.contains(needle)),
        (None, MissingColumn::MatchNothing) => false,
        (None, MissingColumn::MatchAnyColumn) => row.iter().any(|cell| cell.contains(needle)),
    }
}

fn project(row: &[String], columns: &[usize]) -> Row {
    columns.iter().map(|&c| row.get(c).cloned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Grid {
        Grid::from_rows([
            vec!["name", "age", "city"],
            vec!["Alice", "30", "Oslo"],
            vec!["Bob", "25", "Bergen"],
            vec!["Carol", "35"],
            vec!["dave", "250", "Oslo"],
        ])
    }

    fn cells(values: &[&str]) -> Row {
        values.iter().map(|v| Some(v.to_string())).collect()
    }

    #[test]
    fn test_select_single_column_with_condition() {
        let grid = Grid::from_rows([vec!["name", "age"], vec!["Alice", "30"], vec!["Bob", "25"]]);
        let result = select(
            &grid,
            &Projection::columns(["name"]),
            &[Condition::new("age", "25")],
        );
        assert_eq!(result.header, vec!["name"]);
        assert_eq!(result.rows, vec![cells(&["Bob"])]);
    }

    #[test]
    fn test_condition_is_substring_match() {
        let result = select(&people(), &Projection::All, &[Condition::new("age", "25")]);
        let names: Vec<_> = result.rows.iter().map(|r| r[0].clone().unwrap()).collect();
        assert_eq!(names, vec!["Bob", "dave"]);
    }

    #[test]
    fn test_condition_is_case_sensitive() {
        let result = select(&people(), &Projection::All, &[Condition::new("name", "Dave")]);
        assert!(result.is_empty());
        let result = select(&people(), &Projection::All, &[Condition::new("name", "dave")]);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_conditions_are_anded() {
        let result = select(
            &people(),
            &Projection::columns(["name"]),
            &[Condition::new("city", "Oslo"), Condition::new("age", "3")],
        );
        assert_eq!(result.rows, vec![cells(&["Alice"])]);
    }

    #[test]
    fn test_no_conditions_returns_every_data_row() {
        let result = select(&people(), &Projection::All, &[]);
        assert_eq!(result.header, vec!["name", "age", "city"]);
        assert_eq!(result.len(), 4);
        assert_eq!(result.rows[2], vec![Some("Carol".to_string()), Some("35".to_string()), None]);
    }

    #[test]
    fn test_filtering_never_adds_rows() {
        let grid = people();
        let all = select(&grid, &Projection::All, &[]).len();
        for value in ["", "a", "Oslo", "zzz", "3"] {
            for header in ["name", "age", "city", "missing"] {
                let filtered = select(&grid, &Projection::All, &[Condition::new(header, value)]);
                assert!(filtered.len() <= all);
            }
        }
    }

    #[test]
    fn test_empty_value_matches_every_present_cell() {
        let grid = Grid::from_rows([vec!["name", "age"], vec!["Alice", "30"], vec!["Bob", "25"]]);
        let result = select(&grid, &Projection::All, &[Condition::new("age", "")]);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_absent_cell_never_matches() {
        let result = select(&people(), &Projection::All, &[Condition::new("city", "")]);
        assert_eq!(result.len(), 3);
        assert!(result.rows.iter().all(|r| r[0] != Some("Carol".to_string())));
    }

    #[test]
    fn test_unmatched_value_yields_header_only() {
        let result = select(&people(), &Projection::columns(["name", "age"]), &[Condition::new("name", "Zed")]);
        assert_eq!(result.header, vec!["name", "age"]);
        assert!(result.rows.is_empty());
    }

    #[test]
    fn test_empty_projection_yields_empty_rows() {
        let result = select(&people(), &Projection::Columns(vec![]), &[Condition::new("city", "Oslo")]);
        assert!(result.header.is_empty());
        assert_eq!(result.rows, vec![Row::new(), Row::new()]);
    }

    #[test]
    fn test_projection_order_and_duplicates() {
        let result = select(
            &people(),
            &Projection::columns(["city", "name", "city"]),
            &[Condition::new("name", "Bob")],
        );
        assert_eq!(result.header, vec!["city", "name", "city"]);
        assert_eq!(result.rows, vec![cells(&["Bergen", "Bob", "Bergen"])]);
    }

    #[test]
    fn test_unknown_projection_column_is_skipped() {
        let result = select(&people(), &Projection::columns(["name", "email"]), &[]);
        assert_eq!(result.header, vec!["name"]);
        assert_eq!(result.rows[0], cells(&["Alice"]));
    }

    #[test]
    fn test_missing_condition_column_matches_nothing_by_default() {
        let result = select(&people(), &Projection::All, &[Condition::new("email", "a")]);
        assert_eq!(result.header.len(), 3);
        assert!(result.rows.is_empty());
    }

    #[test]
    fn test_missing_condition_column_can_match_any_column() {
        let result = select_with(
            &people(),
            &Projection::columns(["name"]),
            &[Condition::new("email", "Oslo")],
            MissingColumn::MatchAnyColumn,
        );
        assert_eq!(result.rows, vec![cells(&["Alice"]), cells(&["dave"])]);
    }

    #[test]
    fn test_select_does_not_mutate_input() {
        let grid = people();
        let before = grid.clone();
        let _ = select(&grid, &Projection::All, &[Condition::new("name", "Bob")]);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_select_on_empty_grid() {
        let result = select(&Grid::default(), &Projection::All, &[Condition::new("a", "b")]);
        assert!(result.header.is_empty());
        assert!(result.rows.is_empty());
    }

    #[test]
    fn test_select_records() {
        let records = select_records(
            &people(),
            &Projection::columns(["name", "city"]),
            &[Condition::new("age", "35")],
            MissingColumn::MatchNothing,
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["name"], "Carol");
        assert!(!records[0].contains_key("city"));
    }

    #[test]
    fn test_missing_column_policy_deserializes_kebab_case() {
        let policy: MissingColumn = serde_json::from_str("\"match-any-column\"").unwrap();
        assert_eq!(policy, MissingColumn::MatchAnyColumn);
    }
}
