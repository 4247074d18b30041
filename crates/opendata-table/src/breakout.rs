//! Splitting a table into one folder per key.

use crate::error::{Result, TableError};
use crate::io::{column_index, open_reader, open_writer, read_headers};
use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes the records of `input` into `output_folder/<value>/<file name>`,
/// one folder per distinct value of `column`.
///
/// The table must already be grouped by `column`: the sweep is linear and a
/// value which shows up again after its run has ended is an error. Records
/// with an empty value are skipped.
pub fn table_breakout(input: &Path, output_folder: &Path, column: &str) -> Result<Vec<PathBuf>> {
    let mut reader = open_reader(input)?;
    let headers = read_headers(&mut reader, input)?;
    let idx = column_index(&headers, column, input)?;
    let file_name = input
        .file_name()
        .map(|n| n.to_os_string())
        .ok_or_else(|| TableError::InvalidKey(input.display().to_string()))?;

    sweep(input, output_folder, idx, column, Path::new(&file_name))
}

/// Splits a table sorted by its first column into `output_folder/<key>/main.csv`.
pub fn table_grouped_key_subsets(main_table: &Path, output_folder: &Path) -> Result<Vec<PathBuf>> {
    let mut reader = open_reader(main_table)?;
    let headers = read_headers(&mut reader, main_table)?;
    let column = headers.get(0).unwrap_or_default().to_string();

    sweep(main_table, output_folder, 0, &column, Path::new("main.csv"))
}

fn sweep(
    input: &Path,
    output_folder: &Path,
    idx: usize,
    column: &str,
    file_name: &Path,
) -> Result<Vec<PathBuf>> {
    let mut reader = open_reader(input)?;
    let headers = read_headers(&mut reader, input)?;

    let mut written = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut current: Option<(String, csv::Writer<File>, PathBuf)> = None;

    for record in reader.records() {
        let record = record.map_err(TableError::csv(input))?;
        let value = record.get(idx).unwrap_or_default();
        if value.is_empty() {
            continue;
        }

        let same_key = current.as_ref().is_some_and(|(key, _, _)| key == value);
        if !same_key {
            if let Some((_, mut writer, path)) = current.take() {
                writer.flush().map_err(TableError::io(&path))?;
                written.push(path);
            }
            if !seen.insert(value.to_string()) {
                return Err(TableError::NotGrouped {
                    path: input.to_path_buf(),
                    column: column.to_string(),
                    value: value.to_string(),
                });
            }
            check_key(value)?;

            let path = output_folder.join(value).join(file_name);
            let mut writer = open_writer(&path)?;
            writer.write_record(&headers).map_err(TableError::csv(&path))?;
            current = Some((value.to_string(), writer, path));
        }

        if let Some((_, writer, path)) = current.as_mut() {
            writer.write_record(&record).map_err(TableError::csv(path))?;
        }
    }

    if let Some((_, mut writer, path)) = current.take() {
        writer.flush().map_err(TableError::io(&path))?;
        written.push(path);
    }

    debug!(table = %input.display(), groups = written.len(), "Breakout complete");
    Ok(written)
}

/// Keys become folder names, so they must stay inside the output folder.
fn check_key(value: &str) -> Result<()> {
    if value == "." || value == ".." || value.contains(['/', '\\']) {
        return Err(TableError::InvalidKey(value.to_string()));
    }
    Ok(())
}
