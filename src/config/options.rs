// src/config/options.rs
use std::path::PathBuf;

use chrono::NaiveDate;

use super::consts::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Tsv,
}

impl ExportFormat {
    pub fn ext(&self) -> &'static str {
        match self { ExportFormat::Csv => "csv", ExportFormat::Tsv => "tsv" }
    }
    pub fn delim(&self) -> char {
        match self { ExportFormat::Csv => ',', ExportFormat::Tsv => '\t' }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub out_dir: PathBuf,
    pub include_headers: bool,
    /// One file with both tables stacked, instead of one file per table.
    pub single_file: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            include_headers: true,
            single_file: false,
        }
    }
}

/// Everything the CLI collects for one comparison run.
#[derive(Clone, Debug)]
pub struct RunOptions {
    pub date1: Option<NaiveDate>,
    pub date2: Option<NaiveDate>,
    pub ids_inline: Option<String>,     // raw text, one id per line/comma
    pub ids_file: Option<PathBuf>,
    pub alliance: Option<String>,       // pre-populate ids from the roster
    pub list_alliances: bool,
    pub max_pages: u32,
    pub export: ExportOptions,
}

impl RunOptions {
    pub fn new() -> Self {
        Self {
            date1: None,
            date2: None,
            ids_inline: None,
            ids_file: None,
            alliance: None,
            list_alliances: false,
            max_pages: MAX_HISTORY_PAGES,
            export: ExportOptions::default(),
        }
    }
}

impl Default for RunOptions {
    fn default() -> Self { Self::new() }
}
