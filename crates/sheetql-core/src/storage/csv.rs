//! CSV encoding for sheet rows

/// Parse CSV content into ragged string rows.
///
/// Quoted fields may contain commas, doubled quotes and line breaks.
/// Unquoted fields are trimmed; quoted fields keep their whitespace.
pub fn parse_csv_content(content: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut field_was_quoted = false;
    let mut chars = content.chars().peekable();

    let finish_field = |fields: &mut Vec<String>, current: &mut String, quoted: bool| {
        let field = std::mem::take(current);
        if quoted {
            fields.push(field);
        } else {
            fields.push(field.trim().to_string());
        }
    };

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                // Check for escaped quote
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
            continue;
        }
        match c {
            '"' => {
                in_quotes = true;
                field_was_quoted = true;
            }
            ',' => {
                finish_field(&mut fields, &mut current, field_was_quoted);
                field_was_quoted = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                finish_field(&mut fields, &mut current, field_was_quoted);
                field_was_quoted = false;
                rows.push(trim_trailing_empty(std::mem::take(&mut fields)));
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() || field_was_quoted || !fields.is_empty() {
        finish_field(&mut fields, &mut current, field_was_quoted);
        rows.push(trim_trailing_empty(fields));
    }
    rows
}

fn trim_trailing_empty(mut row: Vec<String>) -> Vec<String> {
    while row.last().is_some_and(|f| f.is_empty()) {
        row.pop();
    }
    row
}

/// Render rows as CSV, one line per row.
pub fn write_csv_content(rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    for row in rows {
        let fields: Vec<String> = row.iter().map(|f| escape_csv_field(f)).collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

/// Escape a field for CSV output
fn escape_csv_field(field: &str) -> String {
    let needs_quotes = field.contains(',')
        || field.contains('"')
        || field.contains('\n')
        || field.contains('\r')
        || field.trim() != field;
    if needs_quotes {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        assert_eq!(parse_csv_content("a,b,c\n1,2,3\n"), vec![vec!["a", "b", "c"], vec!["1", "2", "3"]]);
    }

    #[test]
    fn test_parse_quoted() {
        assert_eq!(
            parse_csv_content(r#"a,"hello, world",c"#),
            vec![vec!["a", "hello, world", "c"]]
        );
    }

    #[test]
    fn test_parse_quoted_preserves_whitespace() {
        assert_eq!(parse_csv_content(r#""  keep me  ",x"#), vec![vec!["  keep me  ", "x"]]);
    }

    #[test]
    fn test_parse_escaped_quotes() {
        assert_eq!(
            parse_csv_content(r#"a,"say ""hello""",c"#),
            vec![vec!["a", r#"say "hello""#, "c"]]
        );
    }

    #[test]
    fn test_parse_multiline_field_and_crlf() {
        let rows = parse_csv_content("note,n\r\n\"line one\nline two\",2\r\n");
        assert_eq!(rows, vec![vec!["note", "n"], vec!["line one\nline two", "2"]]);
    }

    #[test]
    fn test_parse_trims_trailing_empty_cells() {
        let rows = parse_csv_content("name,age\nBob,,\n,\n");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], vec!["Bob"]);
        assert!(rows[2].is_empty());
    }

    #[test]
    fn test_parse_keeps_interior_empty_cells() {
        assert_eq!(parse_csv_content("a,,c"), vec![vec!["a", "", "c"]]);
    }

    #[test]
    fn test_escape_csv_field() {
        assert_eq!(escape_csv_field("simple"), "simple");
        assert_eq!(escape_csv_field("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv_field("with\"quote"), "\"with\"\"quote\"");
        assert_eq!(escape_csv_field(" padded"), "\" padded\"");
    }

    #[test]
    fn test_write_then_parse_preserves_values() {
        let rows = vec![
            vec!["name".to_string(), "note".to_string()],
            vec!["Bob".to_string(), "  \"hi\",\nthere ".to_string()],
        ];
        assert_eq!(parse_csv_content(&write_csv_content(&rows)), rows);
    }
}
