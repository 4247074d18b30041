//! Slices of the published tables: latest records, per-key subsets and JSON
//! copies.

use crate::concurrent::parallel_map;
use crate::error::{PublishError, Result};
use crate::files::{file_name, list_tables, list_tables_recursive};
use opendata_config::PublishSettings;
use opendata_table::{
    TableProgress, convert_csv_to_json_records, table_group_tail, table_grouped_key_subsets,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Writes `latest/<table>.csv` with the last known record of every key for
/// each table in `output_path`, then one `<key>/main.csv` per key of the main
/// table.
pub async fn create_table_subsets(
    main_table_path: &Path,
    output_path: &Path,
    workers: usize,
    show_progress: bool,
) -> Result<Vec<PathBuf>> {
    let latest_path = output_path.join("latest");
    std::fs::create_dir_all(&latest_path).map_err(PublishError::io(&latest_path))?;

    let tables = list_tables(output_path)?;
    let jobs = tables
        .into_iter()
        .map(|csv_file| {
            let output_file = latest_path.join(file_name(&csv_file)?);
            Ok((csv_file, output_file))
        })
        .collect::<Result<Vec<_>>>()?;

    let progress = TableProgress::new(jobs.len(), "Latest subset", show_progress);
    let latest = parallel_map(jobs, workers, &progress, |(csv_file, output_file)| {
        table_group_tail(&csv_file, &output_file).map(|_| output_file)
    })
    .await?
    .into_iter()
    .collect::<std::result::Result<Vec<_>, _>>()?;
    info!(tables = latest.len(), "Created latest subsets");

    let main_table = main_table_path.to_path_buf();
    let output = output_path.to_path_buf();
    let grouped = tokio::task::spawn_blocking(move || table_grouped_key_subsets(&main_table, &output))
        .await??;
    info!(keys = grouped.len(), "Created grouped key subsets");

    Ok(latest.into_iter().chain(grouped).collect())
}

/// Converts every CSV file under `csv_folder` into JSON under
/// `output_folder`, keeping the relative layout.
///
/// Conversion is best-effort: a file which fails is logged and left out of
/// the returned list.
pub async fn convert_tables_to_json(
    csv_folder: &Path,
    output_folder: &Path,
    settings: &PublishSettings,
    show_progress: bool,
) -> Result<Vec<PathBuf>> {
    let jobs: Vec<(PathBuf, PathBuf)> = list_tables_recursive(csv_folder)?
        .into_iter()
        .filter_map(|csv_file| {
            let relative = csv_file.strip_prefix(csv_folder).ok()?.to_path_buf();
            let json_file = output_folder.join(relative).with_extension("json");
            Some((csv_file, json_file))
        })
        .collect();

    let schema = Arc::new(settings.schema.clone());
    let progress = TableProgress::new(jobs.len(), "JSON conversion", show_progress);
    let results = parallel_map(jobs, settings.json_workers, &progress, move |(csv_file, json_file)| {
        debug!(file = %csv_file.display(), "Converting to JSON");
        match convert_csv_to_json_records(&schema, &csv_file, &json_file) {
            Ok(()) => Some(json_file),
            Err(e) => {
                error!(file = %csv_file.display(), error = %e, "Unable to convert CSV file to JSON");
                None
            }
        }
    })
    .await?;

    Ok(results.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn test_create_table_subsets() {
        let dir = tempfile::tempdir().unwrap();
        let main = dir.path().join("main.csv");
        fs::write(
            &main,
            "key,date,new_confirmed\nAD,2020-01-01,1\nAD,2020-01-02,2\nUS,2020-01-01,3\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("epidemiology.csv"),
            "key,date,new_confirmed\nAD,2020-01-01,1\nAD,2020-01-02,2\n",
        )
        .unwrap();

        let written = create_table_subsets(&main, dir.path(), 2, false).await.unwrap();

        assert!(written.contains(&dir.path().join("latest").join("main.csv")));
        assert!(written.contains(&dir.path().join("latest").join("epidemiology.csv")));
        assert!(written.contains(&dir.path().join("AD").join("main.csv")));
        assert!(written.contains(&dir.path().join("US").join("main.csv")));
        assert_eq!(
            fs::read_to_string(dir.path().join("latest").join("main.csv")).unwrap(),
            "key,date,new_confirmed\nAD,2020-01-02,2\nUS,2020-01-01,3\n"
        );
    }

    #[tokio::test]
    async fn test_convert_tables_to_json_keeps_layout() {
        let dir = tempfile::tempdir().unwrap();
        let csv_folder = dir.path().join("csv");
        fs::create_dir_all(csv_folder.join("latest")).unwrap();
        fs::write(csv_folder.join("index.csv"), "location_key\nAD\n").unwrap();
        fs::write(
            csv_folder.join("latest").join("index.csv"),
            "location_key\nAD\n",
        )
        .unwrap();
        let json_folder = dir.path().join("json");

        let written =
            convert_tables_to_json(&csv_folder, &json_folder, &PublishSettings::default(), false)
                .await
                .unwrap();

        assert_eq!(written.len(), 2);
        assert!(json_folder.join("index.json").exists());
        assert!(json_folder.join("latest").join("index.json").exists());
    }

    #[tokio::test]
    async fn test_convert_tables_to_json_skips_failures() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("good.csv"), "location_key,new_confirmed\nAD,1\n").unwrap();
        fs::write(dir.path().join("bad.csv"), "location_key,new_confirmed\nAD,lots\n").unwrap();
        let json_folder = dir.path().join("json");

        let written =
            convert_tables_to_json(dir.path(), &json_folder, &PublishSettings::default(), false)
                .await
                .unwrap();

        assert_eq!(written, vec![json_folder.join("good.json")]);
    }
}
