// src/file.rs

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::config::consts::{DEFAULT_SINGLE_STEM, DELTAS_FILE_STEM, SNAPSHOTS_FILE_STEM};
use crate::config::options::ExportOptions;
use crate::csv::rows_to_string;
use crate::data::Dataset;

pub fn ensure_directory(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if dir.exists() && !dir.is_dir() {
        return Err(format!("Path exists but is not a directory: {}", dir.display()).into());
    }
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Write the snapshot and delta tables per `ExportOptions`. Two files by
/// default; with `single_file`, one file holding the snapshot section first,
/// then a blank line, then the delta section. Returns the paths written.
pub fn write_export(
    export: &ExportOptions,
    snapshots: &Dataset,
    deltas: &Dataset,
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    ensure_directory(&export.out_dir)?;
    let sep = export.format.delim();
    let ext = export.format.ext();

    if export.single_file {
        let path = export.out_dir.join(join!(DEFAULT_SINGLE_STEM, ".", ext));
        let mut contents = table_string(snapshots, export.include_headers, sep);
        contents.push('\n');
        contents.push_str(&table_string(deltas, export.include_headers, sep));
        fs::write(&path, contents)?;
        Ok(vec![path])
    } else {
        let snap_path = export.out_dir.join(join!(SNAPSHOTS_FILE_STEM, ".", ext));
        let delta_path = export.out_dir.join(join!(DELTAS_FILE_STEM, ".", ext));
        fs::write(&snap_path, table_string(snapshots, export.include_headers, sep))?;
        fs::write(&delta_path, table_string(deltas, export.include_headers, sep))?;
        Ok(vec![snap_path, delta_path])
    }
}

fn table_string(ds: &Dataset, include_headers: bool, sep: char) -> String {
    rows_to_string(&Some(ds.headers.clone()), &ds.rows, include_headers, sep)
}
