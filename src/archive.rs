// src/archive.rs
//
// Archive Resolver: the daily nation-stats dump is a zip with one
// pipe-delimited Latin-1 text file inside, published under a date-stamped
// name with one of two filename tokens. Publish time jitters across time
// zones, so today, yesterday and tomorrow are all fair candidates. First
// candidate that downloads and decodes wins; the rest are never touched.

use std::collections::BTreeMap;
use std::error::Error;
use std::io::{Cursor, Read};

use chrono::{Datelike, Days, NaiveDate};

use crate::config::consts::{ARCHIVE_HOST, ARCHIVE_PREFIX, ARCHIVE_SUFFIXES, DEFAULT_ALLIANCE};
use crate::core::sanitize::latin1_to_string;
use crate::data::Dataset;
use crate::decode;
use crate::fetch::Fetch;

const ID_COL: &str = "Nation ID";
const ALLIANCE_COL: &str = "Alliance";

/// Dump filenames carry the date as MDDYYYY: month unpadded, day
/// zero-padded, four-digit year.
fn archive_path(date: NaiveDate, suffix: &str) -> String {
    format!(
        "{}{}{:02}{}{}.zip",
        ARCHIVE_PREFIX,
        date.month(),
        date.day(),
        date.year(),
        suffix
    )
}

fn candidate_dates(today: NaiveDate) -> Vec<NaiveDate> {
    let mut out = vec![today];
    if let Some(d) = today.checked_sub_days(Days::new(1)) { out.push(d); }
    if let Some(d) = today.checked_add_days(Days::new(1)) { out.push(d); }
    out
}

/// Probe the candidate (date, token) grid and return the first dump that
/// downloads and decodes. Failures along the way are logged and skipped;
/// `None` means every candidate was exhausted.
pub fn resolve_archive(fetch: &dyn Fetch, today: NaiveDate) -> Option<Dataset> {
    for date in candidate_dates(today) {
        for suffix in ARCHIVE_SUFFIXES {
            let path = archive_path(date, suffix);
            let bytes = match fetch.get(ARCHIVE_HOST, &path) {
                Ok(b) => b,
                Err(e) => {
                    logd!("archive candidate {} failed: {}", path, e);
                    continue;
                }
            };
            match decode_dump(&bytes) {
                Ok(ds) if !ds.is_empty() => {
                    logf!("archive resolved: {}", path);
                    return Some(ds);
                }
                Ok(_) => logd!("archive candidate {} decoded empty", path),
                Err(e) => logd!("archive candidate {} undecodable: {}", path, e),
            }
        }
    }
    None
}

/// Unzip the single contained text file and parse it.
fn decode_dump(bytes: &[u8]) -> Result<Dataset, Box<dyn Error>> {
    let mut zip = zip::ZipArchive::new(Cursor::new(bytes))?;
    if zip.len() == 0 {
        return Err("zip archive contains no files".into());
    }
    let mut file = zip.by_index(0)?;
    let mut raw = Vec::new();
    file.read_to_end(&mut raw)?;
    decode::delimited_table(&latin1_to_string(&raw), '|')
}

/* ---------------- Roster ---------------- */

/// Where the roster came from. `Fallback` means the archive never loaded,
/// distinct from an archive that loaded but listed nobody.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterSource {
    Archive,
    Fallback,
}

/// Alliance name → member nation ids, in dump order. Read-only once built.
pub struct Roster {
    pub source: RosterSource,
    by_alliance: BTreeMap<String, Vec<String>>,
}

impl Roster {
    /// Group the dump by alliance. Requires the id and alliance columns.
    pub fn from_archive(ds: &Dataset) -> Result<Self, Box<dyn Error>> {
        let id_col = ds.col(ID_COL).ok_or("dump has no 'Nation ID' column")?;
        let al_col = ds.col(ALLIANCE_COL).ok_or("dump has no 'Alliance' column")?;

        let mut by_alliance: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for row in &ds.rows {
            let (Some(id), Some(alliance)) = (row.get(id_col), row.get(al_col)) else {
                continue;
            };
            if id.is_empty() { continue; }
            by_alliance.entry(alliance.clone()).or_default().push(id.clone());
        }

        Ok(Self { source: RosterSource::Archive, by_alliance })
    }

    /// Degraded default when no archive candidate loaded: the one hard-coded
    /// alliance, no pre-populated members.
    pub fn fallback() -> Self {
        let mut by_alliance = BTreeMap::new();
        by_alliance.insert(s!(DEFAULT_ALLIANCE), Vec::new());
        Self { source: RosterSource::Fallback, by_alliance }
    }

    pub fn members(&self, alliance: &str) -> Option<&[String]> {
        self.by_alliance.get(alliance).map(|v| v.as_slice())
    }

    /// (alliance, member count) pairs, alphabetical.
    pub fn alliances(&self) -> impl Iterator<Item = (&str, usize)> {
        self.by_alliance.iter().map(|(k, v)| (k.as_str(), v.len()))
    }
}

/// Load the roster, degrading to the fallback when the archive is absent.
pub fn load_roster(fetch: &dyn Fetch, today: NaiveDate) -> Roster {
    match resolve_archive(fetch, today) {
        Some(ds) => match Roster::from_archive(&ds) {
            Ok(r) => r,
            Err(e) => {
                loge!("archive loaded but unusable: {}", e);
                Roster::fallback()
            }
        },
        None => Roster::fallback(),
    }
}
