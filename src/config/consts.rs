// src/config/consts.rs

// Net config
pub const HISTORY_HOST: &str = "cybernations.lyricalz.com";
pub const HISTORY_PREFIX: &str = "/nation/";

pub const ARCHIVE_HOST: &str = "www.cybernations.net";
pub const ARCHIVE_PREFIX: &str = "/assets/CyberNations_SE_Nation_Stats_";
// Daily stats dumps are published under two alternating filename tokens.
pub const ARCHIVE_SUFFIXES: [&str; 2] = ["510001", "510002"];

pub const TIMEOUT_SECS: u64 = 10;

// Scrape
// Safety limit on the paginated history walk, not a site contract.
pub const MAX_HISTORY_PAGES: u32 = 5;

// Roster
pub const DEFAULT_ALLIANCE: &str = "Freehold of The Wolves";

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const SNAPSHOTS_FILE_STEM: &str = "snapshots";
pub const DELTAS_FILE_STEM: &str = "deltas";
pub const DEFAULT_SINGLE_STEM: &str = "cn_compare";
