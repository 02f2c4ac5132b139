// tests/batch_e2e.rs
//
// Full batch runs against a scripted transport. Covers the spec scenarios:
// id partitioning, page-3/page-1 two-date resolution, early exhaustion,
// sorting, and cache-transparency.

use std::cell::RefCell;
use std::collections::HashMap;

use chrono::NaiveDate;

use cn_scrape::batch;
use cn_scrape::data::Dataset;
use cn_scrape::fetch::{CachedFetch, Fetch, FetchError};

struct Scripted {
    pages: HashMap<String, Result<String, u16>>,
    hits: RefCell<Vec<String>>,
}

impl Scripted {
    fn new() -> Self {
        Self { pages: HashMap::new(), hits: RefCell::new(Vec::new()) }
    }
    fn page(mut self, path: &str, body: String) -> Self {
        self.pages.insert(path.to_string(), Ok(body));
        self
    }
}

impl Fetch for Scripted {
    fn get(&self, _host: &str, path: &str) -> Result<Vec<u8>, FetchError> {
        self.hits.borrow_mut().push(path.to_string());
        match self.pages.get(path) {
            Some(Ok(body)) => Ok(body.clone().into_bytes()),
            Some(Err(code)) => Err(FetchError::Status(*code, path.to_string())),
            None => Err(FetchError::Status(404, path.to_string())),
        }
    }
}

fn history_page(ruler: &str, records: &[(&str, &str, &str)]) -> String {
    let mut body = String::new();
    for (ts, tech, ns) in records {
        body.push_str(&format!(
            "<tr><td>{ts}</td><td>Global Order</td><td>{tech}</td><td>{ns}</td></tr>"
        ));
    }
    format!(
        r#"<html><head><title>{ruler} - Cyber Nations History</title></head>
        <body><h1>{ruler}</h1>
        <table class="table-striped">
        <thead><tr><th>Last Updated</th><th>Alliance</th><th>Tech</th><th>NS</th></tr></thead>
        <tbody>{body}</tbody></table></body></html>"#
    )
}

fn empty_page() -> String {
    String::from(
        r#"<html><body><table class="table-striped">
        <thead><tr><th>Last Updated</th><th>Alliance</th><th>Tech</th><th>NS</th></tr></thead>
        <tbody></tbody></table></body></html>"#,
    )
}

fn scripted_site() -> Scripted {
    Scripted::new()
        // Nation 527097: date2 sits on page 1, date1 three pages deep.
        .page(
            "/nation/527097",
            history_page("Lord Snapshot", &[
                ("2024-02-01 10:00:00", "550", "9100"),
                ("2024-01-28 22:10:05", "541", "9020"),
            ]),
        )
        .page(
            "/nation/527097?page=2",
            history_page("Lord Snapshot", &[("2024-01-15 12:00:00", "520", "8800")]),
        )
        .page(
            "/nation/527097?page=3",
            history_page("Lord Snapshot", &[("2024-01-01 08:30:00", "500", "8500")]),
        )
        // Nation 456: feed is empty from the start.
        .page("/nation/456", empty_page())
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn col(ds: &Dataset, header: &str) -> usize {
    ds.headers.iter().position(|h| h == header).unwrap()
}

#[test]
fn batch_resolves_compares_and_sorts() {
    let site = scripted_site();
    let out = batch::run(&site, "527097\nabc\n456", d(2024, 1, 1), d(2024, 2, 1), 5, None)
        .unwrap();

    assert_eq!(out.invalid, ["abc"]);
    assert!(out.warnings.is_empty());

    // Named nation sorts first, nameless one last.
    let snaps = &out.snapshots;
    assert_eq!(snaps.rows.len(), 2);
    assert_eq!(snaps.rows[0][col(snaps, "Nation ID")], "527097");
    assert_eq!(snaps.rows[0][col(snaps, "Ruler")], "Lord Snapshot");
    assert_eq!(snaps.rows[1][col(snaps, "Nation ID")], "456");
    assert_eq!(snaps.rows[1][col(snaps, "Ruler")], "");

    // Wide table carries both dates' values.
    assert_eq!(snaps.rows[0][col(snaps, "Date 1")], "2024-01-01");
    assert_eq!(snaps.rows[0][col(snaps, "Tech (D1)")], "500");
    assert_eq!(snaps.rows[0][col(snaps, "Tech (D2)")], "550");
    assert_eq!(snaps.rows[0][col(snaps, "NS (D1)")], "8500");
    // Columns the page never carried stay blank, found-or-not.
    assert_eq!(snaps.rows[0][col(snaps, "Land (D1)")], "");
    // The not-found nation is blank across the board.
    assert_eq!(snaps.rows[1][col(snaps, "Tech (D1)")], "");
    assert_eq!(snaps.rows[1][col(snaps, "Tech (D2)")], "");

    // Deltas: Tech 500 → 550.
    let deltas = &out.deltas;
    assert_eq!(deltas.rows[0][col(deltas, "Net Tech Gain")], "50");
    assert_eq!(deltas.rows[0][col(deltas, "Net Tech Loss")], "0");
    assert_eq!(deltas.rows[0][col(deltas, "Net NS Gain")], "600");
    // Absent snapshots coerce to zero on both sides.
    assert_eq!(deltas.rows[1][col(deltas, "Net Tech Gain")], "0");
    assert_eq!(deltas.rows[1][col(deltas, "Net Tech Loss")], "0");
    assert_eq!(deltas.rows[1][col(deltas, "Off. Casualties Delta")], "0");
}

#[test]
fn empty_first_page_costs_exactly_one_fetch_per_resolution() {
    let site = Scripted::new().page("/nation/123", empty_page());
    let out = batch::run(&site, "123", d(2024, 1, 1), d(2024, 2, 1), 5, None).unwrap();

    assert_eq!(out.snapshots.rows.len(), 1);
    // name probe + two resolutions, one page each; never maxPages fetches
    assert_eq!(site.hits.borrow().len(), 3);
    assert!(site.hits.borrow().iter().all(|p| p == "/nation/123"));
}

#[test]
fn zero_valid_ids_is_a_hard_stop() {
    let site = Scripted::new();
    let err = batch::run(&site, "abc\n\nx9y", d(2024, 1, 1), d(2024, 2, 1), 5, None)
        .unwrap_err();
    assert!(err.to_string().contains("no valid nation ids"));
    // Nothing was fetched for the rejects.
    assert!(site.hits.borrow().is_empty());
}

#[test]
fn transport_failures_degrade_to_blank_rows() {
    // No pages scripted at all: every fetch 404s.
    let site = Scripted::new();
    let out = batch::run(&site, "777", d(2024, 1, 1), d(2024, 2, 1), 5, None).unwrap();
    let snaps = &out.snapshots;
    assert_eq!(snaps.rows.len(), 1);
    assert_eq!(snaps.rows[0][col(snaps, "Ruler")], "");
    assert_eq!(snaps.rows[0][col(snaps, "Tech (D1)")], "");
    assert!(out.warnings.is_empty()); // not-found is not a warning condition
}

#[test]
fn decode_trouble_warns_but_does_not_abort_the_batch() {
    let bad = String::from(
        r#"<table class="table-striped">
        <thead><tr><th>Last Updated</th><th>Tech</th></tr></thead>
        <tbody><tr><td>garbage stamp</td><td>5</td></tr></tbody></table>"#,
    );
    let site = scripted_site().page("/nation/31", bad);
    let out = batch::run(&site, "31\n527097", d(2024, 1, 1), d(2024, 2, 1), 5, None).unwrap();

    assert_eq!(out.snapshots.rows.len(), 2);
    assert_eq!(out.warnings.len(), 2); // both dates for nation 31
    assert!(out.warnings[0].contains("nation 31"));

    // The healthy nation still resolved normally.
    let deltas = &out.deltas;
    assert_eq!(deltas.rows[0][col(deltas, "Net Tech Gain")], "50");
}

#[test]
fn results_are_identical_with_and_without_the_page_cache() {
    let plain = batch::run(
        &scripted_site(),
        "527097\n456",
        d(2024, 1, 1),
        d(2024, 2, 1),
        5,
        None,
    )
    .unwrap();

    let cached_site = CachedFetch::new(scripted_site());
    let cached = batch::run(&cached_site, "527097\n456", d(2024, 1, 1), d(2024, 2, 1), 5, None)
        .unwrap();

    assert_eq!(plain.snapshots, cached.snapshots);
    assert_eq!(plain.deltas, cached.deltas);
}
