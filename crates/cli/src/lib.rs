//! Library half of the `report-counts` command-line tool.

pub mod config;
pub mod replay;
