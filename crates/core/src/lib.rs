//! Report summaries: total and itemized counts over external reports, and
//! drag-and-drop ordering of the summary list.

pub mod aggregator;
pub mod dictionary;
pub mod error;
pub mod grouping;
pub mod reorder;
pub mod service;
pub mod store;
pub mod strategy;
pub mod summary_config;
pub mod summary_list;
pub mod types;

pub use aggregator::{compute_summary, SummaryResult, SummaryStatus};
pub use grouping::{group_and_count, Bucket, BucketLabel};
pub use reorder::{ReorderController, ReorderOutcome};
pub use strategy::Strategy;
pub use summary_config::{SummaryConfig, SummaryDraft};
