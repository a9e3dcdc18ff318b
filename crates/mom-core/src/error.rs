use std::path::PathBuf;
use thiserror::Error;

use crate::models::StatusKey;

/// All errors produced by the merge-o-matic importer.
#[derive(Error, Debug)]
pub enum MomError {
    /// The feed could not be retrieved or its body could not be decoded.
    #[error("Failed to fetch feed {url}: {message}")]
    Fetch { url: String, message: String },

    /// The feed service answered with a non-success status.
    #[error("Feed {url} returned HTTP {status}")]
    FetchStatus { url: String, status: u16 },

    /// A feed line has too few space-separated fields to carry a component.
    #[error("Malformed entry (expected at least 3 fields, found {fields}): {line}")]
    MalformedEntry { line: String, fields: usize },

    /// A counter field is not of the form `key=value`.
    #[error("Malformed counter pair: {0:?}")]
    MalformedPair(String),

    /// A counter value is not a non-negative base-10 integer.
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    /// A counter key outside the fixed status vocabulary.
    #[error("Unknown status key: {0}")]
    UnknownStatus(String),

    /// Summing a counter across entries exceeded `u64::MAX`.
    #[error("Counter {key} overflowed when adding {value}")]
    CounterOverflow { key: StatusKey, value: u64 },

    /// Building or pushing the metrics failed.
    #[error("Failed to publish metrics: {0}")]
    Publish(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The team override file could not be read.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

}

impl MomError {
    /// `true` for failures while retrieving the feed.
    pub fn is_fetch(&self) -> bool {
        matches!(self, MomError::Fetch { .. } | MomError::FetchStatus { .. })
    }

    /// `true` for failures while parsing feed entries.
    pub fn is_parse(&self) -> bool {
        matches!(
            self,
            MomError::MalformedEntry { .. }
                | MomError::MalformedPair(_)
                | MomError::InvalidValue { .. }
                | MomError::UnknownStatus(_)
                | MomError::CounterOverflow { .. }
        )
    }

    /// `true` for failures on the push-gateway side.
    pub fn is_publish(&self) -> bool {
        matches!(self, MomError::Publish(_))
    }
}

/// Convenience alias used throughout the importer crates.
pub type Result<T> = std::result::Result<T, MomError>;
