//! The v2 and v3 publishing pipelines.

use crate::concurrent::parallel_map;
use crate::error::{PublishError, Result};
use crate::files::{file_name, list_tables};
use crate::main_table::{DateGrid, make_main_table, make_main_table_v3};
use crate::subsets::{convert_tables_to_json, create_table_subsets};
use opendata_config::PublishSettings;
use opendata_table::{TableProgress, table_breakout, table_read_column, table_rename, table_sort};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Options shared by both pipelines.
#[derive(Debug, Clone)]
pub struct PublishOptions {
    pub settings: PublishSettings,
    pub grid: DateGrid,
    pub show_progress: bool,
    /// Log wall-clock time of every step.
    pub profile: bool,
}

impl PublishOptions {
    pub fn new(settings: PublishSettings) -> Result<Self> {
        let grid = DateGrid::from_settings(&settings)?;
        Ok(Self {
            settings,
            grid,
            show_progress: true,
            profile: false,
        })
    }
}

/// What a pipeline run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishSummary {
    /// `v2` or `v3`
    pub version: &'static str,
    pub folder: PathBuf,
    pub tables: usize,
    pub locations: usize,
    pub json_files: usize,
}

/// Log target of the per-step timings.
pub const PROFILE_TARGET: &str = "opendata_publish::profile";

struct StepTimer {
    enabled: bool,
    started: Instant,
}

impl StepTimer {
    fn new(enabled: bool) -> Self {
        Self {
            enabled,
            started: Instant::now(),
        }
    }

    fn lap(&mut self, step: &str) {
        if self.enabled {
            info!(
                target: PROFILE_TARGET,
                step,
                elapsed_ms = self.started.elapsed().as_millis() as u64,
                "Step finished"
            );
        }
        self.started = Instant::now();
    }
}

/// Empties `output_folder`, keeping hidden entries such as `.gitignore`.
pub fn wipe_output_folder(output_folder: &Path) -> Result<()> {
    std::fs::create_dir_all(output_folder).map_err(PublishError::io(output_folder))?;

    let entries = std::fs::read_dir(output_folder).map_err(PublishError::io(output_folder))?;
    for entry in entries {
        let entry = entry.map_err(PublishError::io(output_folder))?;
        let path = entry.path();
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        if path.is_dir() {
            std::fs::remove_dir_all(&path).map_err(PublishError::io(&path))?;
        } else {
            std::fs::remove_file(&path).map_err(PublishError::io(&path))?;
        }
    }
    Ok(())
}

/// Copies every table of `tables_folder` into `public_folder` as-is.
pub fn copy_tables(tables_folder: &Path, public_folder: &Path, show_progress: bool) -> Result<usize> {
    let tables = list_tables(tables_folder)?;
    let progress = TableProgress::new(tables.len(), "Copy tables", show_progress);
    for table in &tables {
        let target = public_folder.join(file_name(table)?);
        std::fs::copy(table, &target).map_err(PublishError::io(&target))?;
        progress.inc();
    }
    progress.finish();
    Ok(tables.len())
}

/// Copies every table into `output_folder`, renaming columns to the latest
/// schema and sorting by `location_key` so that breakouts can sweep linearly.
///
/// No main table is built for the global tables.
pub fn publish_global_tables(
    tables_folder: &Path,
    output_folder: &Path,
    settings: &PublishSettings,
) -> Result<usize> {
    let workdir = tempfile::tempdir().map_err(PublishError::io(output_folder))?;
    let sort_columns = ["location_key".to_string()];

    let tables = list_tables(tables_folder)?;
    for table in &tables {
        let name = file_name(table)?;
        let renamed = workdir.path().join(name);
        info!(table = %name.to_string_lossy(), "Renaming columns");
        table_rename(table, &renamed, &settings.column_adapter)?;

        info!(table = %name.to_string_lossy(), "Sorting");
        table_sort(&renamed, &output_folder.join(name), Some(&sort_columns))?;
    }
    Ok(tables.len())
}

/// Breaks out every table of `tables_folder` into
/// `output_folder/<location_key>/<table>.csv`.
pub fn publish_location_breakouts(tables_folder: &Path, output_folder: &Path) -> Result<()> {
    for table in list_tables(tables_folder)? {
        info!(table = %table.display(), "Breaking out table");
        table_breakout(&table, output_folder, "location_key")?;
    }
    Ok(())
}

/// Joins the tables of each location folder into its own `main.csv`, in
/// parallel. Columns without data are dropped.
///
/// Empty and repeated keys are skipped: breakouts write no folder for an
/// empty key, and the global folder never gets a main table.
pub async fn publish_location_aggregates(
    tables_folder: &Path,
    output_folder: &Path,
    location_keys: Vec<String>,
    options: &PublishOptions,
) -> Result<usize> {
    let tables_folder = Arc::new(tables_folder.to_path_buf());
    let output_folder = Arc::new(output_folder.to_path_buf());
    let grid = options.grid;

    let mut seen = HashSet::new();
    let location_keys: Vec<String> = location_keys
        .into_iter()
        .filter(|key| !key.is_empty() && seen.insert(key.clone()))
        .collect();
    let count = location_keys.len();

    let progress = TableProgress::new(count, "Creating location subsets", options.show_progress);
    let results = parallel_map(
        location_keys,
        options.settings.worker_count(),
        &progress,
        move |key| {
            let output = output_folder.join(&key).join("main.csv");
            make_main_table_v3(&tables_folder.join(&key), &output, true, &grid)
        },
    )
    .await?;

    results.into_iter().collect::<Result<Vec<_>>>()?;
    Ok(count)
}

/// Publishes the v3 layout into `output_folder/v3`:
///
/// 1. copy every table, renaming fields to the latest schema
/// 2. break out each table per location key
/// 3. join the tables of every location into its own `main.csv`
pub async fn publish_v3(
    output_folder: &Path,
    tables_folder: &Path,
    options: &PublishOptions,
) -> Result<PublishSummary> {
    let mut timer = StepTimer::new(options.profile);

    wipe_output_folder(output_folder)?;
    let v3_folder = output_folder.join("v3");
    std::fs::create_dir_all(&v3_folder).map_err(PublishError::io(&v3_folder))?;
    timer.lap("wipe");

    let tables = publish_global_tables(tables_folder, &v3_folder, &options.settings)?;
    timer.lap("global tables");

    publish_location_breakouts(&v3_folder, &v3_folder)?;
    timer.lap("location breakouts");

    let location_keys = table_read_column(&v3_folder.join("index.csv"), "location_key")?;
    let locations = publish_location_aggregates(&v3_folder, &v3_folder, location_keys, options).await?;
    timer.lap("location aggregates");

    Ok(PublishSummary {
        version: "v3",
        folder: v3_folder,
        tables,
        locations,
        json_files: 0,
    })
}

/// Publishes the v2 layout into `output_folder/v2`:
///
/// 1. copy every table as-is
/// 2. build the main table from left outer joins of all other tables
/// 3. slice the data into latest records and per-key folders
/// 4. convert every CSV file to JSON
pub async fn publish_v2(
    output_folder: &Path,
    tables_folder: &Path,
    options: &PublishOptions,
) -> Result<PublishSummary> {
    let mut timer = StepTimer::new(options.profile);

    wipe_output_folder(output_folder)?;
    let v2_folder = output_folder.join("v2");
    std::fs::create_dir_all(&v2_folder).map_err(PublishError::io(&v2_folder))?;
    timer.lap("wipe");

    let tables = copy_tables(tables_folder, &v2_folder, options.show_progress)?;
    timer.lap("copy tables");

    let main_table_path = v2_folder.join("main.csv");
    make_main_table(tables_folder, &main_table_path, &options.settings, &options.grid)?;
    timer.lap("main table");

    let subsets = create_table_subsets(
        &main_table_path,
        &v2_folder,
        options.settings.worker_count(),
        options.show_progress,
    )
    .await?;
    let locations = subsets
        .iter()
        .filter(|p| p.file_name().is_some_and(|n| n == "main.csv"))
        .filter(|p| p.parent().and_then(|d| d.file_name()).is_some_and(|d| d != "latest"))
        .count();
    timer.lap("subsets");

    let json = convert_tables_to_json(&v2_folder, &v2_folder, &options.settings, options.show_progress)
        .await?;
    timer.lap("json");

    Ok(PublishSummary {
        version: "v2",
        folder: v2_folder,
        tables,
        locations,
        json_files: json.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;

    fn options() -> PublishOptions {
        PublishOptions {
            settings: PublishSettings {
                workers: Some(2),
                ..Default::default()
            },
            grid: DateGrid {
                start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2020, 1, 3).unwrap(),
            },
            show_progress: false,
            profile: true,
        }
    }

    /// Processed tables with v2 column names.
    fn write_tables(folder: &Path) {
        fs::create_dir_all(folder).unwrap();
        fs::write(
            folder.join("index.csv"),
            "key,country_name,openstreetmap\nUS_FL_12001,United States,1\nAD,Andorra,2\nAU_NSW,Australia,3\n",
        )
        .unwrap();
        fs::write(
            folder.join("epidemiology.csv"),
            "date,key,new_confirmed,total_confirmed\n\
             2020-01-02,AD,1,1\n\
             2020-01-03,AD,2,3\n\
             2020-01-02,AU_NSW,4,4\n\
             2020-01-03,US_FL_12001,5,5\n",
        )
        .unwrap();
        fs::write(
            folder.join("demographics.csv"),
            "key,population\nAD,77000\nAU_NSW,8000000\n",
        )
        .unwrap();
    }

    #[test]
    fn test_wipe_output_folder_keeps_hidden_entries() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".gitignore"), "*\n").unwrap();
        fs::write(dir.path().join("old.csv"), "x\n").unwrap();
        fs::create_dir_all(dir.path().join("v3").join("AD")).unwrap();

        wipe_output_folder(dir.path()).unwrap();

        let remaining: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(remaining, vec![std::ffi::OsString::from(".gitignore")]);
    }

    #[test]
    fn test_copy_tables() {
        let dir = tempfile::tempdir().unwrap();
        let tables = dir.path().join("tables");
        write_tables(&tables);
        let public = dir.path().join("public");
        fs::create_dir_all(&public).unwrap();

        assert_eq!(copy_tables(&tables, &public, false).unwrap(), 3);
        assert_eq!(
            fs::read_to_string(public.join("demographics.csv")).unwrap(),
            fs::read_to_string(tables.join("demographics.csv")).unwrap()
        );
    }

    #[test]
    fn test_publish_global_tables_renames_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let tables = dir.path().join("tables");
        write_tables(&tables);
        let output = dir.path().join("v3");
        fs::create_dir_all(&output).unwrap();

        publish_global_tables(&tables, &output, &PublishSettings::default()).unwrap();

        assert_eq!(
            fs::read_to_string(output.join("index.csv")).unwrap(),
            "location_key,country_name\nAD,Andorra\nAU_NSW,Australia\nUS_FL_12001,United States\n"
        );
        let epi = fs::read_to_string(output.join("epidemiology.csv")).unwrap();
        assert!(epi.starts_with("date,location_key,new_confirmed,cumulative_confirmed\n"));
    }

    #[tokio::test]
    async fn test_publish_v3() {
        let dir = tempfile::tempdir().unwrap();
        let tables = dir.path().join("tables");
        write_tables(&tables);
        let output = dir.path().join("public");

        let summary = publish_v3(&output, &tables, &options()).await.unwrap();
        assert_eq!(summary.version, "v3");
        assert_eq!(summary.tables, 3);
        assert_eq!(summary.locations, 3);

        let v3 = output.join("v3");
        assert!(v3.join("AD").join("epidemiology.csv").exists());
        assert!(v3.join("AU_NSW").join("demographics.csv").exists());
        // US_FL_12001 の人口データはないので demographics は作られない
        assert!(!v3.join("US_FL_12001").join("demographics.csv").exists());

        assert_eq!(
            fs::read_to_string(v3.join("AD").join("main.csv")).unwrap(),
            "location_key,date,population,new_confirmed,cumulative_confirmed,country_name\n\
             AD,2020-01-01,77000,,,Andorra\n\
             AD,2020-01-02,77000,1,1,Andorra\n\
             AD,2020-01-03,77000,2,3,Andorra\n"
        );

        let us_main = fs::read_to_string(v3.join("US_FL_12001").join("main.csv")).unwrap();
        assert!(us_main.starts_with("location_key,date,new_confirmed,cumulative_confirmed,country_name\n"));
    }

    #[tokio::test]
    async fn test_publish_v3_skips_empty_and_repeated_keys() {
        let dir = tempfile::tempdir().unwrap();
        let tables = dir.path().join("tables");
        fs::create_dir_all(&tables).unwrap();
        fs::write(
            tables.join("index.csv"),
            "key,country_name\nAD,Andorra\n,Unknown\nAD,Andorra\n",
        )
        .unwrap();
        fs::write(
            tables.join("epidemiology.csv"),
            "date,key,new_confirmed\n2020-01-01,AD,1\n",
        )
        .unwrap();
        let output = dir.path().join("public");

        let summary = publish_v3(&output, &tables, &options()).await.unwrap();
        assert_eq!(summary.locations, 1);

        let v3 = output.join("v3");
        assert!(v3.join("AD").join("main.csv").exists());
        // グローバルなメインテーブルは作らない
        assert!(!v3.join("main.csv").exists());
    }

    #[tokio::test]
    async fn test_publish_v2() {
        let dir = tempfile::tempdir().unwrap();
        let tables = dir.path().join("tables");
        write_tables(&tables);
        let output = dir.path().join("public");
        fs::create_dir_all(&output).unwrap();
        fs::write(output.join("stale.csv"), "x\n").unwrap();

        let summary = publish_v2(&output, &tables, &options()).await.unwrap();
        assert_eq!(summary.version, "v2");
        assert_eq!(summary.tables, 3);
        assert_eq!(summary.locations, 3);
        assert!(!output.join("stale.csv").exists());

        let v2 = output.join("v2");
        let main = fs::read_to_string(v2.join("main.csv")).unwrap();
        let mut lines = main.lines();
        assert_eq!(
            lines.next().unwrap(),
            "key,date,country_name,openstreetmap,population,new_confirmed,total_confirmed"
        );
        let records: Vec<&str> = lines.collect();
        assert_eq!(records.len(), 9);
        let mut sorted = records.clone();
        sorted.sort();
        assert_eq!(records, sorted);

        assert_eq!(
            fs::read_to_string(v2.join("latest").join("main.csv")).unwrap(),
            "key,date,country_name,openstreetmap,population,new_confirmed,total_confirmed\n\
             AD,2020-01-03,Andorra,2,77000,2,3\n\
             AU_NSW,2020-01-03,Australia,3,8000000,,\n\
             US_FL_12001,2020-01-03,United States,1,,5,5\n"
        );
        assert!(v2.join("latest").join("epidemiology.csv").exists());
        assert!(v2.join("AD").join("main.csv").exists());
        assert!(v2.join("main.json").exists());
        assert!(v2.join("latest").join("main.json").exists());
        assert!(v2.join("AU_NSW").join("main.json").exists());

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(v2.join("AD").join("main.json")).unwrap())
                .unwrap();
        assert_eq!(json["data"][1][5], serde_json::json!(1));
    }
}
