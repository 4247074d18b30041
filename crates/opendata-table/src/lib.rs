//! Streaming CSV table operations for opendata
//!
//! Every table is a CSV file with a header row, and empty cells stand for
//! missing values. Operations read from one path and write to another so
//! callers can flip-flop between temporary files instead of holding whole
//! tables in memory. Only the smaller side of a join or a cross product and
//! the input of a sort are loaded in full.

pub mod breakout;
pub mod dates;
pub mod error;
pub mod io;
pub mod join;
pub mod json;
pub mod progress;
pub mod transform;

use std::collections::BTreeMap;

/// Column rename map: `None` drops the column.
pub type ColumnAdapter = BTreeMap<String, Option<String>>;

pub use breakout::{table_breakout, table_grouped_key_subsets};
pub use dates::date_range;
pub use error::{Result, TableError};
pub use io::{table_columns, table_read_column, table_write_column};
pub use join::{JoinHow, table_cross_product, table_join};
pub use json::convert_csv_to_json_records;
pub use progress::TableProgress;
pub use transform::{table_drop_empty_columns, table_group_tail, table_rename, table_sort};
