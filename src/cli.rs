// src/cli.rs
use std::{env, error::Error, io::Read, path::PathBuf};

use chrono::{Local, NaiveDate};

use crate::archive::{self, RosterSource};
use crate::batch;
use crate::config::options::{ExportFormat, RunOptions};
use crate::fetch::{CachedFetch, Fetch, HttpFetch};
use crate::file;
use crate::progress::Progress;

pub fn run() -> Result<(), Box<dyn Error>> {
    let mut opts = RunOptions::new();
    parse_cli(&mut opts)?;

    // One memoizing transport for the whole run; the two per-nation date
    // resolutions then share page fetches.
    let fetch = CachedFetch::new(HttpFetch);

    if opts.list_alliances {
        return list_alliances(&fetch);
    }

    let date1 = opts.date1.ok_or("Missing --date1")?;
    let date2 = opts.date2.ok_or("Missing --date2")?;

    let input = gather_ids(&opts, &fetch)?;

    let mut progress = CliProgress { done: 0, total: 0 };
    let out = batch::run(&fetch, &input, date1, date2, opts.max_pages, Some(&mut progress))?;

    for tok in &out.invalid {
        eprintln!("Warning: ignoring invalid nation id: {}", tok);
    }
    for w in &out.warnings {
        eprintln!("Warning: {}", w);
    }

    let written = file::write_export(&opts.export, &out.snapshots, &out.deltas)?;
    for p in &written {
        println!("Wrote {}", p.display());
    }
    Ok(())
}

fn list_alliances(fetch: &dyn Fetch) -> Result<(), Box<dyn Error>> {
    let roster = archive::load_roster(fetch, Local::now().date_naive());
    if roster.source == RosterSource::Fallback {
        eprintln!("Warning: no nation-stats archive found; roster is the built-in default.");
    }
    for (name, count) in roster.alliances() {
        println!("{},{}", name, count);
    }
    Ok(())
}

/// Collect nation ids from every requested source. Reads stdin only when no
/// other source was given at all.
fn gather_ids(opts: &RunOptions, fetch: &dyn Fetch) -> Result<String, Box<dyn Error>> {
    let mut input = s!();

    if let Some(text) = &opts.ids_inline {
        for tok in text.split([',', '\n']) {
            input.push_str(tok.trim());
            input.push('\n');
        }
    }
    if let Some(path) = &opts.ids_file {
        input.push_str(&std::fs::read_to_string(path)?);
        input.push('\n');
    }
    if let Some(alliance) = &opts.alliance {
        let roster = archive::load_roster(fetch, Local::now().date_naive());
        match roster.members(alliance) {
            Some(members) if !members.is_empty() => {
                for id in members {
                    input.push_str(id);
                    input.push('\n');
                }
            }
            _ => {
                if roster.source == RosterSource::Fallback {
                    eprintln!(
                        "Warning: no nation-stats archive found; cannot pre-populate '{}'.",
                        alliance
                    );
                } else {
                    eprintln!("Warning: alliance '{}' not present in the archive.", alliance);
                }
            }
        }
    }

    if opts.ids_inline.is_none() && opts.ids_file.is_none() && opts.alliance.is_none() {
        std::io::stdin().read_to_string(&mut input)?;
    }

    Ok(input)
}

fn parse_cli(opts: &mut RunOptions) -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    while let Some(a) = args.next() {
        match a.as_str()
        {
            "--date1" => {
                let v = args.next().ok_or("Missing value for --date1")?;
                opts.date1 = Some(parse_date(&v, "--date1")?);}
            "--date2" => {
                let v = args.next().ok_or("Missing value for --date2")?;
                opts.date2 = Some(parse_date(&v, "--date2")?);}
            "--ids" => opts.ids_inline = Some(args.next().ok_or("Missing value for --ids")?),
            "--ids-file" => {
                opts.ids_file = Some(PathBuf::from(args.next().ok_or("Missing value for --ids-file")?));}
            "--alliance" => opts.alliance = Some(args.next().ok_or("Missing value for --alliance")?),
            "--list-alliances" => opts.list_alliances = true,
            "-o" | "--out" => {
                opts.export.out_dir = PathBuf::from(args.next().ok_or("Missing output directory")?);}
            "--format" => {
                let v = args.next().ok_or("Missing value for --format")?;
                opts.export.format = match v.to_ascii_lowercase().as_str() {
                    "csv" => ExportFormat::Csv,
                    "tsv" => ExportFormat::Tsv,
                    other => return Err(format!("Unknown format: {}", other).into()),
                };}
            "--no-headers" => opts.export.include_headers = false,
            "--single" => opts.export.single_file = true,
            "--max-pages" => {
                let v: u32 = args.next().ok_or("Missing value for --max-pages")?.parse()?;
                if v == 0 { return Err("--max-pages must be at least 1".into()); }
                opts.max_pages = v;}
            "-h" | "--help" => {
                eprintln!(include_str!("cli_help.txt"));
                std::process::exit(0);
            }
            _ => return Err(format!("Unknown arg: {}", a).into()),
        }
    }

    Ok(())
}

fn parse_date(v: &str, flag: &str) -> Result<NaiveDate, Box<dyn Error>> {
    NaiveDate::parse_from_str(v, "%Y-%m-%d")
        .map_err(|_| format!("Invalid {} value {:?} (expected YYYY-MM-DD)", flag, v).into())
}

/* ---------------- CLI progress sink ---------------- */

struct CliProgress {
    done: usize,
    total: usize,
}

impl Progress for CliProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        eprintln!("Comparing {} nation(s)…", total);
    }
    fn item_done(&mut self, nation_id: &str) {
        self.done += 1;
        eprintln!("[{}/{}] nation {}", self.done, self.total, nation_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_parse_iso_only() {
        assert_eq!(
            parse_date("2024-02-01", "--date1").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
        assert!(parse_date("02/01/2024", "--date1").is_err());
    }
}
