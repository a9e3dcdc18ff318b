//! Feed ingestion layer for the merge-o-matic importer.
//!
//! Retrieves a team's statistics feed, keeps the trailing window of non-empty
//! lines and folds the `main` component entries into status counters.

pub mod aggregator;
pub mod reader;

pub use mom_core as core;
