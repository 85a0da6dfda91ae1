//! Command line definition.

use clap::{Parser, Subcommand, ValueEnum};
use sheetql_core::{Condition, MissingColumn};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sheetql")]
#[command(version, about = "SQL-style select, insert and update over spreadsheet sheets", long_about = None)]
pub struct Cli {
    /// Workbook directory (one CSV file per sheet)
    #[arg(short, long, global = true)]
    pub workbook: Option<PathBuf>,

    /// Config file to use instead of the user config
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Ignore every config file
    #[arg(long, global = true)]
    pub no_config: bool,

    /// What a WHERE condition on an unknown column matches
    #[arg(long, global = true, value_enum)]
    pub missing_column: Option<MissingColumnArg>,

    /// More logging (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the spreadsheet title and its sheets
    Info,

    /// Print the header row of a sheet
    Headers {
        /// Sheet name (defaults to default_sheet from the config)
        sheet: Option<String>,
    },

    /// SELECT columns FROM sheet WHERE conditions
    Select {
        sheet: Option<String>,

        /// Columns to return, comma separated; `*` for all
        #[arg(short, long, default_value = "*", value_delimiter = ',')]
        columns: Vec<String>,

        /// Keep rows whose column contains the value (repeatable, ANDed)
        #[arg(short = 'W', long = "where", value_parser = parse_condition)]
        conditions: Vec<Condition>,

        /// Print one JSON object per row instead of CSV
        #[arg(long)]
        json: bool,
    },

    /// INSERT INTO sheet VALUES records
    Insert {
        sheet: Option<String>,

        /// A column value of a single record to insert (repeatable)
        #[arg(short, long = "set", value_parser = parse_assignment)]
        set: Vec<(String, String)>,

        /// A whole record as a JSON object (repeatable)
        #[arg(short, long = "record")]
        records: Vec<String>,
    },

    /// UPDATE sheet SET values WHERE conditions (each condition matches exactly, on its own)
    Update {
        sheet: Option<String>,

        /// Column value to write (repeatable)
        #[arg(short, long = "set", value_parser = parse_assignment, required = true)]
        set: Vec<(String, String)>,

        /// Rows whose column equals the value (repeatable)
        #[arg(short = 'W', long = "where", value_parser = parse_condition, required = true)]
        conditions: Vec<Condition>,
    },

    /// ALTER TABLE sheet ADD columns
    AddColumns {
        /// Sheet name
        #[arg(short, long)]
        sheet: Option<String>,

        /// Column names to append after the last header
        #[arg(required = true)]
        columns: Vec<String>,
    },

    /// Overwrite a range in A1 notation with a JSON array of rows (null leaves a cell alone)
    Write {
        /// Range such as `People!B2:C3`
        range: String,

        /// Rows as JSON, e.g. `[["a", null, "c"]]`
        values: String,
    },

    /// Print the column letter for a zero-based position
    Letter { position: usize },

    /// Print the column letter of a named column
    Notation {
        /// Column name
        column: String,

        #[arg(short, long)]
        sheet: Option<String>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum MissingColumnArg {
    MatchNothing,
    MatchAnyColumn,
}

impl From<MissingColumnArg> for MissingColumn {
    fn from(arg: MissingColumnArg) -> Self {
        match arg {
            MissingColumnArg::MatchNothing => MissingColumn::MatchNothing,
            MissingColumnArg::MatchAnyColumn => MissingColumn::MatchAnyColumn,
        }
    }
}

/// Parse `column=value`. The value may itself contain `=`.
pub fn parse_assignment(input: &str) -> Result<(String, String), String> {
    let (column, value) = input
        .split_once('=')
        .ok_or_else(|| format!("expected COLUMN=VALUE, got {:?}", input))?;
    let column = column.trim();
    if column.is_empty() {
        return Err(format!("missing column name in {:?}", input));
    }
    Ok((column.to_string(), value.to_string()))
}

pub fn parse_condition(input: &str) -> Result<Condition, String> {
    parse_assignment(input).map(|(header, value)| Condition::new(header, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(parse_assignment("age=25"), Ok(("age".to_string(), "25".to_string())));
        assert_eq!(parse_assignment("expr=a=b"), Ok(("expr".to_string(), "a=b".to_string())));
        assert_eq!(parse_assignment("note="), Ok(("note".to_string(), "".to_string())));
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("=x").is_err());
    }

    #[test]
    fn test_select_arguments() {
        let cli = Cli::try_parse_from([
            "sheetql", "select", "People", "-c", "name,age", "-W", "age=25", "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Select {
                sheet,
                columns,
                conditions,
                json,
            } => {
                assert_eq!(sheet.as_deref(), Some("People"));
                assert_eq!(columns, vec!["name", "age"]);
                assert_eq!(conditions, vec![Condition::new("age", "25")]);
                assert!(json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_update_requires_set_and_where() {
        assert!(Cli::try_parse_from(["sheetql", "update", "People", "-s", "age=1"]).is_err());
        assert!(
            Cli::try_parse_from(["sheetql", "update", "People", "-s", "age=1", "-W", "name=Bob"])
                .is_ok()
        );
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "sheetql",
            "info",
            "--workbook",
            "/tmp/book",
            "--missing-column",
            "match-any-column",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.workbook, Some(PathBuf::from("/tmp/book")));
        assert_eq!(cli.missing_column, Some(MissingColumnArg::MatchAnyColumn));
        assert_eq!(cli.verbose, 2);
    }
}
