//! Publishing pipeline for opendata tables
//!
//! Turns a folder of processed tables into the public `v2` and `v3`
//! layouts: flat main tables, per-location breakouts, latest-record subsets
//! and JSON copies. Blocking table work runs on tokio's blocking pool.

pub mod concurrent;
pub mod error;
pub mod files;
pub mod main_table;
pub mod pipeline;
pub mod subsets;

pub use concurrent::parallel_map;
pub use error::{PublishError, Result};
pub use files::{list_tables, list_tables_recursive, table_name};
pub use main_table::{DateGrid, make_location_key_and_date_table, make_main_table, make_main_table_v3};
pub use pipeline::{
    PROFILE_TARGET, PublishOptions, PublishSummary, copy_tables, publish_global_tables,
    publish_location_aggregates, publish_location_breakouts, publish_v2, publish_v3,
    wipe_output_folder,
};
pub use subsets::{convert_tables_to_json, create_table_subsets};
