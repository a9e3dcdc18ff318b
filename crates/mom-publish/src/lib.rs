//! Metrics publishing layer for the merge-o-matic importer.
//!
//! Turns an aggregation result into Prometheus gauges and pushes them to a
//! push gateway under a per-team job.

pub mod gateway;
pub mod registry;

pub use mom_core as core;
