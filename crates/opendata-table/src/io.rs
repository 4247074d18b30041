//! Reading and writing CSV tables.

use crate::error::{Result, TableError};
use csv::{Reader, StringRecord, Writer};
use std::fs::File;
use std::path::Path;

pub(crate) fn open_reader(path: &Path) -> Result<Reader<File>> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(TableError::csv(path))
}

pub(crate) fn open_writer(path: &Path) -> Result<Writer<File>> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(TableError::io(parent))?;
    }
    Writer::from_path(path).map_err(TableError::csv(path))
}

pub(crate) fn read_headers(reader: &mut Reader<File>, path: &Path) -> Result<StringRecord> {
    Ok(reader.headers().map_err(TableError::csv(path))?.clone())
}

/// Reads every data record of a table into memory.
pub(crate) fn read_records(path: &Path) -> Result<(StringRecord, Vec<StringRecord>)> {
    let mut reader = open_reader(path)?;
    let headers = read_headers(&mut reader, path)?;
    let records = reader
        .records()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(TableError::csv(path))?;
    Ok((headers, records))
}

pub(crate) fn column_index(headers: &StringRecord, column: &str, path: &Path) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| TableError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        })
}

/// Column names from the header row.
pub fn table_columns(path: &Path) -> Result<Vec<String>> {
    let mut reader = open_reader(path)?;
    let headers = read_headers(&mut reader, path)?;
    Ok(headers.iter().map(str::to_string).collect())
}

/// All values of a single column, in file order.
pub fn table_read_column(path: &Path, column: &str) -> Result<Vec<String>> {
    let mut reader = open_reader(path)?;
    let headers = read_headers(&mut reader, path)?;
    let idx = column_index(&headers, column, path)?;

    let mut values = Vec::new();
    for record in reader.records() {
        let record = record.map_err(TableError::csv(path))?;
        values.push(record.get(idx).unwrap_or_default().to_string());
    }
    Ok(values)
}

/// Writes a single-column table.
pub fn table_write_column(path: &Path, header: &str, values: &[String]) -> Result<()> {
    let mut writer = open_writer(path)?;
    writer.write_record([header]).map_err(TableError::csv(path))?;
    for value in values {
        writer.write_record([value]).map_err(TableError::csv(path))?;
    }
    writer.flush().map_err(TableError::io(path))?;
    Ok(())
}
