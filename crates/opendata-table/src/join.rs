//! Joins and cross products between two tables.

use crate::error::{Result, TableError};
use crate::io::{column_index, open_reader, open_writer, read_headers, read_records};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::debug;

/// How unmatched records of the left table are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinHow {
    /// Unmatched left records are kept with empty right-hand cells.
    #[default]
    LeftOuter,
    /// Unmatched left records are dropped.
    Inner,
}

/// Joins `right` onto `left` using the `on` columns.
///
/// The right table is loaded into memory and the left table is streamed, so
/// the left side should be the larger one. Output keeps the left record
/// order. Right-hand columns already present on the left are ignored, and a
/// left record matching several right records is emitted once per match.
pub fn table_join(
    left: &Path,
    right: &Path,
    on: &[String],
    output: &Path,
    how: JoinHow,
) -> Result<()> {
    let (right_headers, right_records) = read_records(right)?;
    let right_keys = on
        .iter()
        .map(|c| column_index(&right_headers, c, right))
        .collect::<Result<Vec<_>>>()?;

    let mut reader = open_reader(left)?;
    let left_headers = read_headers(&mut reader, left)?;
    let left_keys = on
        .iter()
        .map(|c| column_index(&left_headers, c, left))
        .collect::<Result<Vec<_>>>()?;

    let left_names: HashSet<&str> = left_headers.iter().collect();
    let extra: Vec<usize> = right_headers
        .iter()
        .enumerate()
        .filter(|(idx, name)| !right_keys.contains(idx) && !left_names.contains(name))
        .map(|(idx, _)| idx)
        .collect();

    let mut lookup: HashMap<Vec<&str>, Vec<Vec<&str>>> = HashMap::new();
    for record in &right_records {
        let key = right_keys.iter().map(|&i| record.get(i).unwrap_or_default()).collect();
        let values = extra.iter().map(|&i| record.get(i).unwrap_or_default()).collect();
        lookup.entry(key).or_default().push(values);
    }
    debug!(
        left = %left.display(),
        right = %right.display(),
        keys = lookup.len(),
        added_columns = extra.len(),
        "Joining tables"
    );

    let empty = vec![""; extra.len()];
    let mut writer = open_writer(output)?;
    writer
        .write_record(left_headers.iter().chain(extra.iter().map(|&i| &right_headers[i])))
        .map_err(TableError::csv(output))?;

    for record in reader.records() {
        let record = record.map_err(TableError::csv(left))?;
        let key: Vec<&str> = left_keys.iter().map(|&i| record.get(i).unwrap_or_default()).collect();
        match lookup.get(&key) {
            Some(matches) => {
                for values in matches {
                    writer
                        .write_record(record.iter().chain(values.iter().copied()))
                        .map_err(TableError::csv(output))?;
                }
            }
            None if how == JoinHow::LeftOuter => {
                writer
                    .write_record(record.iter().chain(empty.iter().copied()))
                    .map_err(TableError::csv(output))?;
            }
            None => {}
        }
    }
    writer.flush().map_err(TableError::io(output))?;
    Ok(())
}

/// Writes every combination of `left` and `right` records, left-major.
pub fn table_cross_product(left: &Path, right: &Path, output: &Path) -> Result<()> {
    let (right_headers, right_records) = read_records(right)?;

    let mut reader = open_reader(left)?;
    let left_headers = read_headers(&mut reader, left)?;

    let mut writer = open_writer(output)?;
    writer
        .write_record(left_headers.iter().chain(right_headers.iter()))
        .map_err(TableError::csv(output))?;
    for record in reader.records() {
        let record = record.map_err(TableError::csv(left))?;
        for other in &right_records {
            writer
                .write_record(record.iter().chain(other.iter()))
                .map_err(TableError::csv(output))?;
        }
    }
    writer.flush().map_err(TableError::io(output))?;
    Ok(())
}
