// src/batch.rs
//
// Batch Orchestrator: raw id lines + two dates in, two sorted tables out.
// One nation at a time, strictly sequential; nothing a single nation does
// can abort the batch except the up-front "no valid ids at all" check.

use std::error::Error;

use chrono::NaiveDate;

use crate::core::sanitize::is_all_digits;
use crate::data::Dataset;
use crate::delta::{self, ComparisonRow, DeltaRow};
use crate::fetch::Fetch;
use crate::progress::Progress;
use crate::resolver;
use crate::snapshot::{Snapshot, COLUMNS};

#[derive(Debug)]
pub struct BatchOutput {
    pub snapshots: Dataset,
    pub deltas: Dataset,
    /// Rejected identifier tokens, reported but never fetched.
    pub invalid: Vec<String>,
    /// Per-nation trouble that degraded a result without aborting the run.
    pub warnings: Vec<String>,
}

/// Split the raw input on lines, trim, drop blanks, and partition into
/// all-digit ids vs everything else.
pub fn partition_ids(input: &str) -> (Vec<String>, Vec<String>) {
    let mut valid = Vec::new();
    let mut invalid = Vec::new();
    for line in input.lines() {
        let tok = line.trim();
        if tok.is_empty() { continue; }
        if is_all_digits(tok) {
            valid.push(s!(tok));
        } else {
            invalid.push(s!(tok));
        }
    }
    (valid, invalid)
}

pub fn run(
    fetch: &dyn Fetch,
    input: &str,
    date1: NaiveDate,
    date2: NaiveDate,
    max_pages: u32,
    mut progress: Option<&mut dyn Progress>,
) -> Result<BatchOutput, Box<dyn Error>> {
    let (valid, invalid) = partition_ids(input);
    if valid.is_empty() {
        return Err("no valid nation ids in input".into());
    }

    if let Some(p) = progress.as_deref_mut() {
        p.begin(valid.len());
    }

    let mut warnings = Vec::new();
    let mut rows: Vec<(ComparisonRow, DeltaRow)> = Vec::with_capacity(valid.len());

    for id in &valid {
        let ruler = resolver::ruler_name(fetch, id);
        let snap1 = resolve_or_warn(fetch, id, date1, max_pages, &mut warnings);
        let snap2 = resolve_or_warn(fetch, id, date2, max_pages, &mut warnings);

        let cmp = ComparisonRow {
            nation_id: id.clone(),
            ruler,
            date1,
            date2,
            snap1,
            snap2,
        };
        let dlt = delta::compute_delta(&cmp);

        if let Some(p) = progress.as_deref_mut() {
            p.item_done(id);
        }
        rows.push((cmp, dlt));
    }

    // Named rows first, by case-insensitive ruler then id; nameless rows
    // last, by numeric id. Explicit so reruns are stable.
    rows.sort_by(|(a, _), (b, _)| sort_key(a).cmp(&sort_key(b)));

    let snapshots = snapshot_table(rows.iter().map(|(c, _)| c));
    let deltas = delta_table(rows.iter().map(|(_, d)| d));

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }

    Ok(BatchOutput { snapshots, deltas, invalid, warnings })
}

fn resolve_or_warn(
    fetch: &dyn Fetch,
    id: &str,
    date: NaiveDate,
    max_pages: u32,
    warnings: &mut Vec<String>,
) -> Snapshot {
    match resolver::resolve(fetch, id, date, max_pages) {
        Ok(snap) => snap,
        Err(e) => {
            loge!("nation {} at {}: {}", id, date, e);
            warnings.push(format!("nation {} at {}: {}", id, date, e));
            Snapshot::absent()
        }
    }
}

fn sort_key(row: &ComparisonRow) -> (bool, String, u64) {
    match &row.ruler {
        Some(name) => (false, name.to_lowercase(), id_ord(&row.nation_id)),
        None => (true, s!(), id_ord(&row.nation_id)),
    }
}

fn id_ord(id: &str) -> u64 {
    id.parse().unwrap_or(u64::MAX)
}

/* ---------------- Table assembly ---------------- */

pub fn snapshot_headers() -> Vec<String> {
    let mut h = vec![s!("Nation ID"), s!("Ruler"), s!("Date 1")];
    h.extend(COLUMNS.iter().map(|c| format!("{} (D1)", c)));
    h.push(s!("Date 2"));
    h.extend(COLUMNS.iter().map(|c| format!("{} (D2)", c)));
    h
}

fn snapshot_table<'a>(rows: impl Iterator<Item = &'a ComparisonRow>) -> Dataset {
    let headers = snapshot_headers();
    let rows = rows
        .map(|c| {
            let mut row = vec![
                c.nation_id.clone(),
                c.ruler.clone().unwrap_or_default(),
                c.date1.to_string(),
            ];
            row.extend(c.snap1.cells());
            row.push(c.date2.to_string());
            row.extend(c.snap2.cells());
            row
        })
        .collect();
    Dataset { headers, rows }
}

pub fn delta_table_headers() -> Vec<String> {
    let mut h = vec![s!("Nation ID"), s!("Ruler"), s!("Date 1"), s!("Date 2")];
    h.extend(delta::delta_headers());
    h
}

fn delta_table<'a>(rows: impl Iterator<Item = &'a DeltaRow>) -> Dataset {
    let headers = delta_table_headers();
    let rows = rows
        .map(|d| {
            let mut row = vec![
                d.nation_id.clone(),
                d.ruler.clone().unwrap_or_default(),
                d.date1.to_string(),
                d.date2.to_string(),
            ];
            row.extend(d.metric_cells());
            row
        })
        .collect();
    Dataset { headers, rows }
}
