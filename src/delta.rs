// src/delta.rs
//
// Delta Engine: two snapshots in, signed net changes out. Pure arithmetic,
// no I/O. Cumulative metrics get a gain/loss pair under a fixed sign
// convention (gain = max(delta, 0), loss = min(delta, 0), so
// gain + loss == delta always holds and the columns sum cleanly across
// nations). Casualty counters stay single signed deltas.

use chrono::NaiveDate;

use crate::snapshot::Snapshot;

/// Cumulative metrics that get the gain/loss split.
pub const DELTA_METRICS: [&str; 5] = ["Tech", "Infra", "Land", "NS", "Nukes"];

/// Emitted as single signed deltas, no split.
pub const CASUALTY_METRICS: [&str; 2] = ["Off. Casualties", "Def. Casualties"];

/// One nation's resolved pair of snapshots, assembled by the batch driver.
#[derive(Debug, Clone)]
pub struct ComparisonRow {
    pub nation_id: String,
    pub ruler: Option<String>,
    pub date1: NaiveDate,
    pub date2: NaiveDate,
    pub snap1: Snapshot,
    pub snap2: Snapshot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDelta {
    pub name: &'static str,
    pub gain: i64, // >= 0
    pub loss: i64, // <= 0
}

#[derive(Debug, Clone)]
pub struct DeltaRow {
    pub nation_id: String,
    pub ruler: Option<String>,
    pub date1: NaiveDate,
    pub date2: NaiveDate,
    pub metrics: Vec<MetricDelta>,
    pub casualties: Vec<(&'static str, i64)>,
}

/// The permissive conversion the whole engine leans on: trim, drop thousands
/// separators, take integers as-is, truncate floats, and let anything else
/// (including a missing field) count as zero. Never an error; the zero
/// fallback is part of the contract and feeds straight into the deltas.
pub fn coerce_metric(v: Option<&str>) -> i64 {
    let Some(v) = v else { return 0 };
    let cleaned: String = v.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return 0;
    }
    if let Ok(i) = cleaned.parse::<i64>() {
        return i;
    }
    if let Ok(f) = cleaned.parse::<f64>() {
        return f.trunc() as i64;
    }
    0
}

pub fn compute_delta(row: &ComparisonRow) -> DeltaRow {
    let metrics = DELTA_METRICS
        .iter()
        .map(|m| {
            let v1 = coerce_metric(row.snap1.get(m));
            let v2 = coerce_metric(row.snap2.get(m));
            let delta = v2 - v1;
            MetricDelta { name: *m, gain: delta.max(0), loss: delta.min(0) }
        })
        .collect();

    let casualties = CASUALTY_METRICS
        .iter()
        .map(|m| {
            let delta = coerce_metric(row.snap2.get(m)) - coerce_metric(row.snap1.get(m));
            (*m, delta)
        })
        .collect();

    DeltaRow {
        nation_id: row.nation_id.clone(),
        ruler: row.ruler.clone(),
        date1: row.date1,
        date2: row.date2,
        metrics,
        casualties,
    }
}

/// Column headers for the delta table, minus the leading identity columns.
pub fn delta_headers() -> Vec<String> {
    let mut out = Vec::with_capacity(DELTA_METRICS.len() * 2 + CASUALTY_METRICS.len());
    for m in DELTA_METRICS {
        out.push(format!("Net {} Gain", m));
        out.push(format!("Net {} Loss", m));
    }
    for m in CASUALTY_METRICS {
        out.push(format!("{} Delta", m));
    }
    out
}

impl DeltaRow {
    /// Metric cells in header order.
    pub fn metric_cells(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.metrics.len() * 2 + self.casualties.len());
        for m in &self.metrics {
            out.push(m.gain.to_string());
            out.push(m.loss.to_string());
        }
        for (_, delta) in &self.casualties {
            out.push(delta.to_string());
        }
        out
    }
}
