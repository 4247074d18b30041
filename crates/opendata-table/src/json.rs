//! CSV to JSON records conversion.
//!
//! Output layout:
//! ```json
//! {"columns": ["location_key", "date", "new_confirmed"], "data": [["AD", "2020-01-01", 1]]}
//! ```

use crate::error::{Result, TableError};
use crate::io::{open_reader, read_headers};
use opendata_config::ColumnType;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Converts a CSV table into a JSON document of typed records.
///
/// Empty cells become `null`. Columns typed `int` or `float` in `schema` are
/// parsed as numbers; other columns stay strings. Rows are streamed to the
/// output so the whole table is never held in memory.
pub fn convert_csv_to_json_records(
    schema: &BTreeMap<String, ColumnType>,
    input: &Path,
    output: &Path,
) -> Result<()> {
    let mut reader = open_reader(input)?;
    let headers = read_headers(&mut reader, input)?;
    let types: Vec<ColumnType> = headers
        .iter()
        .map(|h| schema.get(h).copied().unwrap_or_default())
        .collect();

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent).map_err(TableError::io(parent))?;
    }
    let file = File::create(output).map_err(TableError::io(output))?;
    let mut out = BufWriter::new(file);

    let columns: Vec<&str> = headers.iter().collect();
    out.write_all(b"{\"columns\":").map_err(TableError::io(output))?;
    serde_json::to_writer(&mut out, &columns)?;
    out.write_all(b",\"data\":[").map_err(TableError::io(output))?;

    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(TableError::csv(input))?;
        let values = record
            .iter()
            .zip(&types)
            .zip(headers.iter())
            .map(|((value, ty), column)| typed_value(value, *ty, column, input))
            .collect::<Result<Vec<Value>>>()?;

        if row > 0 {
            out.write_all(b",").map_err(TableError::io(output))?;
        }
        serde_json::to_writer(&mut out, &values)?;
    }

    out.write_all(b"]}").map_err(TableError::io(output))?;
    out.flush().map_err(TableError::io(output))?;
    Ok(())
}

fn typed_value(value: &str, ty: ColumnType, column: &str, path: &Path) -> Result<Value> {
    if value.is_empty() {
        return Ok(Value::Null);
    }

    let invalid = |expected: &'static str| TableError::InvalidValue {
        path: path.to_path_buf(),
        column: column.to_string(),
        value: value.to_string(),
        expected,
    };

    match ty {
        ColumnType::Str => Ok(Value::String(value.to_string())),
        ColumnType::Int => {
            if let Ok(v) = value.parse::<i64>() {
                return Ok(Value::from(v));
            }
            // int columns sometimes carry values like "12.0"
            match value.parse::<f64>() {
                // i64::MAX as f64 rounds up to 2^63, which is already out of range
                Ok(v) if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 => {
                    Ok(Value::from(v as i64))
                }
                _ => Err(invalid("int")),
            }
        }
        ColumnType::Float => {
            let v = value.parse::<f64>().map_err(|_| invalid("float"))?;
            Ok(serde_json::Number::from_f64(v)
                .map(Value::Number)
                .unwrap_or(Value::Null))
        }
    }
}
