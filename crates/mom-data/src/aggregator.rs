//! Status aggregation over the selected feed window.
//!
//! Each feed line looks like
//! `<date> <field> <component> <status>=<count> <status>=<count> ...`.
//! Only lines for [`AGGREGATED_COMPONENT`] contribute to the result.

use mom_core::error::{MomError, Result};
use mom_core::models::{AggregationResult, StatusKey, AGGREGATED_COMPONENT};
use tracing::debug;

// ── Entry ─────────────────────────────────────────────────────────────────────

/// One feed line split into its component and raw counter fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<'a> {
    pub component: &'a str,
    pub fields: Vec<&'a str>,
}

impl<'a> Entry<'a> {
    /// Split `line` on single spaces. Fewer than three fields is an error.
    pub fn parse(line: &'a str) -> Result<Self> {
        let parts: Vec<&str> = line.trim().split(' ').collect();
        if parts.len() < 3 {
            return Err(MomError::MalformedEntry {
                line: line.to_string(),
                fields: parts.len(),
            });
        }
        Ok(Self {
            component: parts[2],
            fields: parts[3..].to_vec(),
        })
    }

    /// Parse the `key=value` fields into typed counters.
    pub fn counters(&self) -> Result<Vec<(StatusKey, u64)>> {
        self.fields.iter().map(|field| parse_pair(field)).collect()
    }
}

/// Parse a single `status=count` field.
pub fn parse_pair(field: &str) -> Result<(StatusKey, u64)> {
    let (key, value) = field
        .split_once('=')
        .ok_or_else(|| MomError::MalformedPair(field.to_string()))?;
    let status: StatusKey = key.parse()?;
    let count = value.parse::<u64>().map_err(|_| MomError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })?;
    Ok((status, count))
}

// ── MergeAggregator ───────────────────────────────────────────────────────────

/// Stateless helper that folds feed lines into status counters.
pub struct MergeAggregator;

impl MergeAggregator {
    /// Aggregate the `main` entries of `lines`.
    ///
    /// Any malformed line aborts the whole run; no partial result is returned.
    pub fn aggregate<S: AsRef<str>>(lines: &[S]) -> Result<AggregationResult> {
        let mut result = AggregationResult::default();

        for line in lines {
            let entry = Entry::parse(line.as_ref())?;
            if entry.component != AGGREGATED_COMPONENT {
                debug!("Skipping entry for component {}", entry.component);
                continue;
            }

            let counters = entry.counters()?;
            if counters.is_empty() {
                continue;
            }
            let by_component = result
                .by_component
                .entry(entry.component.to_string())
                .or_default();

            // Totals are summed across lines while the per-component view
            // keeps only the last value seen for each status.
            for (status, count) in counters {
                result.totals.add(status, count)?;
                by_component.set(status, count);
            }
        }

        Ok(result)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
