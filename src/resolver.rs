// src/resolver.rs
//
// Paginated Snapshot Resolver: walk a nation's history pages in order until
// the target date shows up, the feed runs dry, the transport dies, or the
// page budget runs out. A failed resolution is an absent snapshot, never a
// crash. The feed is roughly chronological across pages, but nothing here
// relies on that; every fetched page is scanned and the first in-page match
// wins.

use std::error::Error;

use chrono::NaiveDate;

use crate::config::consts::{HISTORY_HOST, HISTORY_PREFIX};
use crate::core::html::{inner_after_open_tag, next_tag_block_ci, strip_tags};
use crate::core::sanitize::normalize_entities;
use crate::decode;
use crate::fetch::{Fetch, FetchError};
use crate::snapshot::{self, Snapshot};

fn page_path(nation_id: &str, page: u32) -> String {
    if page <= 1 {
        join!(HISTORY_PREFIX, nation_id)
    } else {
        format!("{}{}?page={}", HISTORY_PREFIX, nation_id, page)
    }
}

fn fetch_history_page(
    fetch: &dyn Fetch,
    nation_id: &str,
    page: u32,
) -> Result<String, FetchError> {
    let body = fetch.get(HISTORY_HOST, &page_path(nation_id, page))?;
    Ok(String::from_utf8_lossy(&body).into_owned())
}

/// Resolve one (nation, date) pair to a snapshot.
///
/// Terminal conditions, in the order they can occur per page:
/// - transport error → absent, immediately (no retry, no further pages)
/// - page decodes to zero records → feed exhausted → absent
/// - date located → that record, restricted to the tracked columns
/// - `max_pages` scanned without a match → absent
///
/// Decode errors (cell-count mismatch, bad timestamp) propagate to the
/// caller instead of being folded into "not found".
pub fn resolve(
    fetch: &dyn Fetch,
    nation_id: &str,
    target: NaiveDate,
    max_pages: u32,
) -> Result<Snapshot, Box<dyn Error>> {
    for page in 1..=max_pages {
        let doc = match fetch_history_page(fetch, nation_id, page) {
            Ok(doc) => doc,
            Err(e) => {
                logd!("nation {}: page {} fetch failed, stopping: {}", nation_id, page, e);
                return Ok(Snapshot::absent());
            }
        };

        let table = decode::history_table(&doc)?;
        if table.is_empty() {
            logd!("nation {}: page {} has no records, feed exhausted", nation_id, page);
            return Ok(Snapshot::absent());
        }

        if let Some(row) = snapshot::locate(&table, target)? {
            return Ok(Snapshot::from_record(&table, row));
        }
    }

    logd!("nation {}: no record for {} within {} pages", nation_id, target, max_pages);
    Ok(Snapshot::absent())
}

/// Best-effort ruler/display name from the first history page's metadata.
/// Any failure along the way is simply "no name".
pub fn ruler_name(fetch: &dyn Fetch, nation_id: &str) -> Option<String> {
    let doc = fetch_history_page(fetch, nation_id, 1).ok()?;
    extract_ruler(&doc)
}

/// Prefer the page heading; fall back to the lead segment of the title
/// (the tail carries the site name).
fn extract_ruler(doc: &str) -> Option<String> {
    if let Some((h_s, h_e)) = next_tag_block_ci(doc, "<h1", "</h1>", 0) {
        let txt = strip_tags(normalize_entities(&inner_after_open_tag(&doc[h_s..h_e])));
        if !txt.is_empty() {
            return Some(txt);
        }
    }
    if let Some((t_s, t_e)) = next_tag_block_ci(doc, "<title", "</title>", 0) {
        let clean = strip_tags(normalize_entities(&inner_after_open_tag(&doc[t_s..t_e])));
        let lead = clean.split(" - ").next().unwrap_or("").trim();
        if !lead.is_empty() {
            return Some(s!(lead));
        }
    }
    None
}
