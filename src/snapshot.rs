// src/snapshot.rs
//
// The fixed field set carried per history record, and the locator that picks
// the record for a target calendar date. Values stay opaque strings here;
// numeric coercion is the delta engine's business.

use std::error::Error;

use chrono::{NaiveDate, NaiveDateTime};

use crate::data::Dataset;

pub const LAST_UPDATED: &str = "Last Updated";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The tracked columns, in output order.
pub const COLUMNS: [&str; 19] = [
    "Alliance", "Alliance Rank", "Gov", "Team", "Tech", "Infra", "Land", "Mode",
    "NS", "Defcon", "Soldiers", "Tanks", "Cruise", "Nukes",
    "Off. Casualties", "Def. Casualties", "Votes", "Resource1", "Resource2",
];

/// One nation's tracked fields at one observed timestamp, or all-absent when
/// no record matched. Parallel to `COLUMNS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    values: Vec<Option<String>>,
}

impl Snapshot {
    /// The "not found" value: every field absent.
    pub fn absent() -> Self {
        Self { values: vec![None; COLUMNS.len()] }
    }

    pub fn is_absent(&self) -> bool {
        self.values.iter().all(|v| v.is_none())
    }

    /// Restrict a located history record to the tracked column set. Columns
    /// the page doesn't carry stay absent.
    pub fn from_record(table: &Dataset, row_idx: usize) -> Self {
        let row = &table.rows[row_idx];
        let values = COLUMNS
            .iter()
            .map(|c| table.field(row, c).map(|v| s!(v)))
            .collect();
        Self { values }
    }

    pub fn get(&self, col: &str) -> Option<&str> {
        COLUMNS
            .iter()
            .position(|c| *c == col)
            .and_then(|i| self.values[i].as_deref())
    }

    /// Values in `COLUMNS` order; absent fields become empty cells.
    pub fn cells(&self) -> Vec<String> {
        self.values
            .iter()
            .map(|v| v.clone().unwrap_or_default())
            .collect()
    }
}

/// First record (document order) whose `Last Updated` falls on `target`.
/// Hour/minute/second are ignored. A missing timestamp column on a non-empty
/// table, or a timestamp that won't parse, is a decode error and surfaces to
/// the caller.
pub fn locate(table: &Dataset, target: NaiveDate) -> Result<Option<usize>, Box<dyn Error>> {
    if table.is_empty() {
        return Ok(None);
    }
    let ts_col = table
        .col(LAST_UPDATED)
        .ok_or("history table has no 'Last Updated' column")?;

    for (i, row) in table.rows.iter().enumerate() {
        let raw = row.get(ts_col).map(|s| s.as_str()).unwrap_or("");
        let ts = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
            .map_err(|e| format!("bad '{}' value {:?}: {}", LAST_UPDATED, raw, e))?;
        if ts.date() == target {
            return Ok(Some(i));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[&[&str]]) -> Dataset {
        Dataset {
            headers: vec![s!(LAST_UPDATED), s!("Alliance"), s!("Tech")],
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| s!(*c)).collect())
                .collect(),
        }
    }

    #[test]
    fn first_match_wins_with_duplicate_dates() {
        let t = table(&[
            &["2024-01-01 23:59:59", "A", "100"],
            &["2024-01-01 00:00:01", "B", "200"],
        ]);
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        // deterministic across repeated calls
        for _ in 0..3 {
            assert_eq!(locate(&t, d).unwrap(), Some(0));
        }
    }

    #[test]
    fn time_of_day_is_ignored() {
        let t = table(&[&["2024-02-01 14:03:22", "A", "550"]]);
        let d = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert_eq!(locate(&t, d).unwrap(), Some(0));
    }

    #[test]
    fn no_match_is_none_not_error() {
        let t = table(&[&["2024-01-02 00:00:00", "A", "1"]]);
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(locate(&t, d).unwrap(), None);
    }

    #[test]
    fn malformed_timestamp_surfaces_as_error() {
        let t = table(&[&["yesterday-ish", "A", "1"]]);
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(locate(&t, d).is_err());
    }

    #[test]
    fn missing_timestamp_column_is_an_error() {
        let t = Dataset {
            headers: vec![s!("Alliance")],
            rows: vec![vec![s!("A")]],
        };
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(locate(&t, d).is_err());
    }

    #[test]
    fn empty_table_locates_nothing() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(locate(&Dataset::empty(), d).unwrap(), None);
    }

    #[test]
    fn snapshot_restricts_to_tracked_columns() {
        let t = table(&[&["2024-01-01 00:00:00", "Global Order", "500"]]);
        let snap = Snapshot::from_record(&t, 0);
        assert_eq!(snap.get("Alliance"), Some("Global Order"));
        assert_eq!(snap.get("Tech"), Some("500"));
        assert_eq!(snap.get("Land"), None); // page didn't carry it
        assert!(!snap.is_absent());
        assert!(Snapshot::absent().is_absent());
    }
}
