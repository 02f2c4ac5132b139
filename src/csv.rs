// src/csv.rs
use std::io::{self, Write};
use std::mem::take;

/* ---------------- Parsing ---------------- */

/// Minimal delimited-text parser (quotes + CRLF tolerant). std-only.
/// Used with ',' / '\t' for our own exports and '|' for the stats dumps.
pub fn parse_rows(text: &str, sep: char) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut field = s!();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if matches!(chars.peek(), Some('"')) {
                        chars.next(); // double-quote escape
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            c if c == sep && !in_quotes => {
                // move the field without cloning
                row.push(take(&mut field));
            }
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) { chars.next(); }
                row.push(take(&mut field));
                if !row.is_empty() && !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    // Flush any trailing field/row even if quotes were unterminated.
    row.push(field);
    if !(row.len() == 1 && row[0].is_empty()) {
        rows.push(row);
    }

    rows
}

/* ---------------- Writing ---------------- */

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single delimited row to any writer.
pub fn write_row<W: Write>(mut w: W, row: &[String], sep: char) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first { write!(w, "{}", sep)?; } else { first = false; }
        if needs_quotes(cell, sep) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{}\"", escaped)?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Stringify a whole table, optionally with its header line.
pub fn rows_to_string(
    headers: &Option<Vec<String>>,
    rows: &[Vec<String>],
    include_headers: bool,
    sep: char,
) -> String {
    let mut buf: Vec<u8> = Vec::new();

    if include_headers {
        if let Some(h) = headers {
            let _ = write_row(&mut buf, h, sep);
        }
    }
    for r in rows {
        let _ = write_row(&mut buf, r, sep);
    }

    match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipe_rows_parse_without_quoting() {
        let rows = parse_rows("Nation ID|Alliance\n1002|Global Order\n", '|');
        assert_eq!(rows, vec![
            vec![s!("Nation ID"), s!("Alliance")],
            vec![s!("1002"), s!("Global Order")],
        ]);
    }

    #[test]
    fn quoted_fields_keep_separator_and_quotes() {
        let rows = parse_rows("a,\"b,\"\"c\"\"\"\n", ',');
        assert_eq!(rows, vec![vec![s!("a"), s!("b,\"c\"")]]);
    }

    #[test]
    fn write_round_trips_awkward_cells() {
        let row = vec![s!("plain"), s!("with,comma"), s!("with\"quote")];
        let mut buf = Vec::new();
        write_row(&mut buf, &row, ',').unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(parse_rows(&text, ',')[0], row);
    }

    #[test]
    fn header_toggle_respected() {
        let headers = Some(vec![s!("A"), s!("B")]);
        let rows = vec![vec![s!("1"), s!("2")]];
        assert_eq!(rows_to_string(&headers, &rows, true, ','), "A,B\n1,2\n");
        assert_eq!(rows_to_string(&headers, &rows, false, ','), "1,2\n");
    }
}
