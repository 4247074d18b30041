//! Single-table transformations: renaming, sorting, column pruning and
//! per-key tail extraction.

use crate::ColumnAdapter;
use crate::error::{Result, TableError};
use crate::io::{column_index, open_reader, open_writer, read_headers, read_records};
use csv::StringRecord;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Renames columns according to `adapter`.
///
/// Columns mapped to `None` are dropped, columns absent from the adapter are
/// written unchanged.
pub fn table_rename(input: &Path, output: &Path, adapter: &ColumnAdapter) -> Result<()> {
    let mut reader = open_reader(input)?;
    let headers = read_headers(&mut reader, input)?;

    let mut keep = Vec::with_capacity(headers.len());
    let mut renamed = Vec::with_capacity(headers.len());
    for (idx, name) in headers.iter().enumerate() {
        match adapter.get(name) {
            Some(None) => debug!(column = name, "Dropping column"),
            Some(Some(new_name)) => {
                keep.push(idx);
                renamed.push(new_name.as_str());
            }
            None => {
                keep.push(idx);
                renamed.push(name);
            }
        }
    }

    let mut writer = open_writer(output)?;
    writer.write_record(&renamed).map_err(TableError::csv(output))?;
    for record in reader.records() {
        let record = record.map_err(TableError::csv(input))?;
        writer
            .write_record(keep.iter().map(|&i| record.get(i).unwrap_or_default()))
            .map_err(TableError::csv(output))?;
    }
    writer.flush().map_err(TableError::io(output))?;
    Ok(())
}

/// Sorts the data records of a table.
///
/// Without `sort_columns` records are ordered by their CSV line as written,
/// so the file is lexically sorted line by line below the header. With
/// `sort_columns` the sort is stable and only looks at the named columns.
pub fn table_sort(input: &Path, output: &Path, sort_columns: Option<&[String]>) -> Result<()> {
    let (headers, mut records) = read_records(input)?;

    match sort_columns {
        None => {
            let mut lines = records
                .into_iter()
                .map(|record| Ok((serialized_line(&record, input)?, record)))
                .collect::<Result<Vec<_>>>()?;
            lines.sort_by(|a, b| a.0.cmp(&b.0));
            records = lines.into_iter().map(|(_, record)| record).collect();
        }
        Some(columns) => {
            let indices = columns
                .iter()
                .map(|c| column_index(&headers, c, input))
                .collect::<Result<Vec<_>>>()?;
            records.sort_by(|a, b| {
                let ka = indices.iter().map(|&i| a.get(i).unwrap_or_default());
                let kb = indices.iter().map(|&i| b.get(i).unwrap_or_default());
                ka.cmp(kb)
            });
        }
    }

    write_all(output, &headers, &records)
}

fn serialized_line(record: &StringRecord, path: &Path) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(record).map_err(TableError::csv(path))?;
    let mut line = writer
        .into_inner()
        .map_err(|e| TableError::io(path)(e.into_error()))?;
    while matches!(line.last(), Some(b'\n' | b'\r')) {
        line.pop();
    }
    Ok(line)
}

/// Removes columns which have no value in any record.
pub fn table_drop_empty_columns(input: &Path, output: &Path) -> Result<()> {
    let has_data = {
        let mut reader = open_reader(input)?;
        let headers = read_headers(&mut reader, input)?;
        let mut has_data = vec![false; headers.len()];
        for record in reader.records() {
            let record = record.map_err(TableError::csv(input))?;
            for (idx, value) in record.iter().enumerate() {
                if !value.is_empty() {
                    has_data[idx] = true;
                }
            }
        }
        has_data
    };

    let mut reader = open_reader(input)?;
    let headers = read_headers(&mut reader, input)?;
    // a table without any data keeps its header
    let keep: Vec<usize> = if has_data.iter().any(|d| *d) {
        (0..headers.len()).filter(|&i| has_data[i]).collect()
    } else {
        (0..headers.len()).collect()
    };
    debug!(
        dropped = headers.len() - keep.len(),
        table = %input.display(),
        "Dropping empty columns"
    );

    let mut writer = open_writer(output)?;
    writer
        .write_record(keep.iter().map(|&i| &headers[i]))
        .map_err(TableError::csv(output))?;
    for record in reader.records() {
        let record = record.map_err(TableError::csv(input))?;
        writer
            .write_record(keep.iter().map(|&i| record.get(i).unwrap_or_default()))
            .map_err(TableError::csv(output))?;
    }
    writer.flush().map_err(TableError::io(output))?;
    Ok(())
}

/// Keeps the last record seen for each key of the first column, ordered by key.
pub fn table_group_tail(input: &Path, output: &Path) -> Result<()> {
    let mut reader = open_reader(input)?;
    let headers = read_headers(&mut reader, input)?;

    let mut latest: BTreeMap<String, StringRecord> = BTreeMap::new();
    for record in reader.records() {
        let record = record.map_err(TableError::csv(input))?;
        let key = record.get(0).unwrap_or_default().to_string();
        latest.insert(key, record);
    }

    let records: Vec<StringRecord> = latest.into_values().collect();
    write_all(output, &headers, &records)
}

pub(crate) fn write_all(output: &Path, headers: &StringRecord, records: &[StringRecord]) -> Result<()> {
    let mut writer = open_writer(output)?;
    writer.write_record(headers).map_err(TableError::csv(output))?;
    for record in records {
        writer.write_record(record).map_err(TableError::csv(output))?;
    }
    writer.flush().map_err(TableError::io(output))?;
    Ok(())
}
