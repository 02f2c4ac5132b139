// src/decode.rs
//
// Tabular Decoder: raw page payloads in, ordered Datasets out. Pure; the
// same payload always decodes to the same table. "No table on this page" is
// an empty Dataset, not an error; callers must distinguish that from a
// transport failure themselves.

use std::error::Error;

use crate::core::html::{inner_after_open_tag, next_tag_block_ci, slice_between_ci, strip_tags};
use crate::core::sanitize::normalize_entities;
use crate::csv::parse_rows;
use crate::data::Dataset;

/// The history mirror renders one striped table per page.
const HISTORY_TABLE_OPEN: &str = r#"<table class="table-striped""#;

/// Decode a nation-history page. Absent table / thead → empty Dataset.
/// A body row whose cell count disagrees with the header row is a decode
/// error the caller gets to see.
pub fn history_table(doc: &str) -> Result<Dataset, Box<dyn Error>> {
    let Some(table) = slice_between_ci(doc, HISTORY_TABLE_OPEN, "</table>") else {
        return Ok(Dataset::empty());
    };
    let Some(thead) = slice_between_ci(table, "<thead", "</thead>") else {
        return Ok(Dataset::empty());
    };

    let headers = read_cells(thead, "<th", "</th>");
    if headers.is_empty() {
        return Ok(Dataset::empty());
    }

    let mut rows_out = Vec::new();
    if let Some(tbody) = slice_between_ci(table, "<tbody", "</tbody>") {
        let mut pos = 0usize;
        while let Some((tr_s, tr_e)) = next_tag_block_ci(tbody, "<tr", "</tr>", pos) {
            let tr = &tbody[tr_s..tr_e];
            pos = tr_e;

            let cells = read_cells(tr, "<td", "</td>");
            if cells.is_empty() { continue; } // spacer/annotation row
            if cells.len() != headers.len() {
                return Err(format!(
                    "history table row has {} cells, header has {}",
                    cells.len(),
                    headers.len()
                )
                .into());
            }
            rows_out.push(cells);
        }
    }

    Ok(Dataset { headers, rows: rows_out })
}

/// Decode a delimited text table (header row first). Used with '|' for the
/// nation-stats dumps. Same column-count rule as the HTML path.
pub fn delimited_table(text: &str, sep: char) -> Result<Dataset, Box<dyn Error>> {
    let mut rows = parse_rows(text, sep);
    if rows.is_empty() {
        return Ok(Dataset::empty());
    }

    let headers: Vec<String> = rows.remove(0).iter().map(|c| s!(c.trim())).collect();
    let mut rows_out = Vec::with_capacity(rows.len());
    for row in rows {
        let row: Vec<String> = row.iter().map(|c| s!(c.trim())).collect();
        if row.len() != headers.len() {
            return Err(format!(
                "delimited row has {} fields, header has {}",
                row.len(),
                headers.len()
            )
            .into());
        }
        rows_out.push(row);
    }

    Ok(Dataset { headers, rows: rows_out })
}

/// Walk consecutive cell blocks and clean their inner text.
fn read_cells(scope: &str, open: &str, close: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some((c_s, c_e)) = next_tag_block_ci(scope, open, close, pos) {
        let inner = inner_after_open_tag(&scope[c_s..c_e]);
        out.push(strip_tags(normalize_entities(&inner)));
        pos = c_e;
    }
    out
}
