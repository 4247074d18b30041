//! Flat "main" tables: every table joined onto a location × date grid.

use crate::error::{PublishError, Result};
use crate::files::{list_tables, table_name};
use chrono::{Days, Local, NaiveDate};
use opendata_config::PublishSettings;
use opendata_table::{
    JoinHow, date_range, table_columns, table_cross_product, table_drop_empty_columns, table_join,
    table_read_column, table_sort, table_write_column,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tracing::{debug, info};

/// Inclusive date span of the location × date grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateGrid {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateGrid {
    /// From the configured start date up to tomorrow.
    pub fn from_settings(settings: &PublishSettings) -> Result<Self> {
        let start = settings.start_date()?;
        let today = Local::now().date_naive();
        let end = today.checked_add_days(Days::new(1)).unwrap_or(today);
        Ok(Self { start, end })
    }
}

fn temp_workdir() -> Result<TempDir> {
    tempfile::tempdir().map_err(|source| PublishError::Io {
        path: std::env::temp_dir(),
        source,
    })
}

/// Writes every combination of the `key_column` values of `index.csv` and
/// the grid dates into `output`.
fn make_key_and_date_table(
    tables_folder: &Path,
    key_column: &str,
    output: &Path,
    grid: &DateGrid,
    workdir: &Path,
) -> Result<()> {
    let index_table = tables_folder.join("index.csv");
    if !index_table.exists() {
        return Err(PublishError::MissingIndex(index_table));
    }

    let keys_path = workdir.join(format!("{}s.csv", key_column));
    table_write_column(&keys_path, key_column, &table_read_column(&index_table, key_column)?)?;

    let dates_path = workdir.join("dates.csv");
    table_write_column(&dates_path, "date", &date_range(grid.start, grid.end))?;

    table_cross_product(&keys_path, &dates_path, output)?;
    Ok(())
}

/// Key columns used to join a table: `[key, date]` for dated tables,
/// `[key]` otherwise.
fn join_columns(table: &Path, key_column: &str) -> Result<Vec<String>> {
    let columns = table_columns(table)?;
    if columns.iter().any(|c| c == "date") {
        Ok(vec![key_column.to_string(), "date".to_string()])
    } else {
        Ok(vec![key_column.to_string()])
    }
}

/// Builds the v2 flat view of all tables, joined by `key` or `<key, date>`.
///
/// Tables listed in `exclude_from_main_table` are skipped. The result is
/// lexically sorted.
pub fn make_main_table(
    tables_folder: &Path,
    output_path: &Path,
    settings: &PublishSettings,
    grid: &DateGrid,
) -> Result<()> {
    let workdir = temp_workdir()?;
    let workdir = workdir.path();

    let grid_path = workdir.join("grid.csv");
    make_key_and_date_table(tables_folder, "key", &grid_path, grid, workdir)?;
    info!("Created key x date table");

    let main_path = workdir.join("main.csv");
    table_join(
        &grid_path,
        &tables_folder.join("index.csv"),
        &["key".to_string()],
        &main_path,
        JoinHow::LeftOuter,
    )?;
    info!("Joined with table index");

    let temp_path = workdir.join("main.tmp.csv");
    for table in list_tables(tables_folder)? {
        let name = table_name(&table);
        if name == "index" || settings.exclude_from_main_table.contains(&name) {
            continue;
        }

        let on = join_columns(&table, "key")?;
        table_join(&main_path, &table, &on, &temp_path, JoinHow::LeftOuter)?;
        fs::rename(&temp_path, &main_path).map_err(PublishError::io(&main_path))?;
        info!(table = %name, "Joined with table");
    }

    table_sort(&main_path, output_path, None)?;
    info!(output = %output_path.display(), "Sorted main table");
    Ok(())
}

/// Writes every `<location_key, date>` combination of the index into `output`.
pub fn make_location_key_and_date_table(
    tables_folder: &Path,
    output: &Path,
    grid: &DateGrid,
) -> Result<()> {
    let workdir = temp_workdir()?;
    make_key_and_date_table(tables_folder, "location_key", output, grid, workdir.path())
}

/// Builds the v3 flat view of all tables in `tables_folder`, joined by
/// `location_key` or `<location_key, date>`.
///
/// Temporary files are flip-flopped between joins instead of copied. When
/// `drop_empty_columns` is set, columns without any value are removed.
pub fn make_main_table_v3(
    tables_folder: &Path,
    output_path: &Path,
    drop_empty_columns: bool,
    grid: &DateGrid,
) -> Result<()> {
    let workdir = temp_workdir()?;
    let mut temp_input = workdir.path().join("tmp.1.csv");
    let mut temp_output = workdir.path().join("tmp.2.csv");

    make_location_key_and_date_table(tables_folder, &temp_output, grid)?;
    std::mem::swap(&mut temp_input, &mut temp_output);

    for table in list_tables(tables_folder)? {
        if table_name(&table) == "main" {
            continue;
        }

        let on = join_columns(&table, "location_key")?;
        table_join(&temp_input, &table, &on, &temp_output, JoinHow::LeftOuter)?;
        std::mem::swap(&mut temp_input, &mut temp_output);
        debug!(table = %table.display(), "Joined table");
    }

    if drop_empty_columns {
        table_drop_empty_columns(&temp_input, &temp_output)?;
        std::mem::swap(&mut temp_input, &mut temp_output);
    }

    table_sort(&temp_input, output_path, None)?;
    Ok(())
}
