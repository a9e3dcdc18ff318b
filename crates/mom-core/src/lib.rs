//! Shared types for the merge-o-matic metrics importer.
//!
//! Holds the status vocabulary and counter maps produced by aggregation, the
//! error taxonomy used by every crate in the workspace, command-line settings
//! and the team-name directory used to build feed URLs.

pub mod error;
pub mod models;
pub mod settings;
pub mod teams;

pub use error::{MomError, Result};
