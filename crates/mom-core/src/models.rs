use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::MomError;

/// Number of trailing non-empty feed lines considered for aggregation.
pub const WINDOW_SIZE: usize = 4;

/// The only component whose entries are aggregated.
pub const AGGREGATED_COMPONENT: &str = "main";

/// Feed location; `{team}` is replaced by the resolved Launchpad team name.
pub const FEED_URL_TEMPLATE: &str = "https://merges.ubuntu.com/stats-{team}.txt";

/// Merge state of a package as reported by merge-o-matic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusKey {
    Local,
    Modified,
    NeedsMerge,
    NeedsSync,
    Repackaged,
    Total,
    Unmodified,
}

impl StatusKey {
    /// Every key of the vocabulary, in feed order.
    pub const ALL: [StatusKey; 7] = [
        StatusKey::Local,
        StatusKey::Modified,
        StatusKey::NeedsMerge,
        StatusKey::NeedsSync,
        StatusKey::Repackaged,
        StatusKey::Total,
        StatusKey::Unmodified,
    ];

    /// Spelling used in the feed and in metric labels.
    pub fn as_str(self) -> &'static str {
        match self {
            StatusKey::Local => "local",
            StatusKey::Modified => "modified",
            StatusKey::NeedsMerge => "needs-merge",
            StatusKey::NeedsSync => "needs-sync",
            StatusKey::Repackaged => "repackaged",
            StatusKey::Total => "total",
            StatusKey::Unmodified => "unmodified",
        }
    }

    /// Spelling usable inside a Prometheus metric name.
    pub fn metric_name(self) -> String {
        self.as_str().replace('-', "_")
    }
}

impl fmt::Display for StatusKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusKey {
    type Err = MomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatusKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| MomError::UnknownStatus(s.to_string()))
    }
}

/// Status counts keyed by [`StatusKey`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Counters(BTreeMap<StatusKey, u64>);

impl Counters {
    /// A map holding every status key at zero.
    pub fn seeded() -> Self {
        Self(StatusKey::ALL.into_iter().map(|key| (key, 0)).collect())
    }

    /// Add `value` to the running count for `key`.
    ///
    /// Fails instead of wrapping when the sum does not fit in a `u64`.
    pub fn add(&mut self, key: StatusKey, value: u64) -> Result<(), MomError> {
        let count = self.0.entry(key).or_insert(0);
        *count = count
            .checked_add(value)
            .ok_or(MomError::CounterOverflow { key, value })?;
        Ok(())
    }

    /// Replace the count for `key` with `value`.
    pub fn set(&mut self, key: StatusKey, value: u64) {
        self.0.insert(key, value);
    }

    pub fn get(&self, key: StatusKey) -> Option<u64> {
        self.0.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatusKey, u64)> + '_ {
        self.0.iter().map(|(key, value)| (*key, *value))
    }
}

/// Output of one aggregation run.
///
/// `totals` is summed across every aggregated entry; `by_component` holds the
/// last value observed per status for each component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregationResult {
    pub totals: Counters,
    pub by_component: BTreeMap<String, Counters>,
}

impl Default for AggregationResult {
    fn default() -> Self {
        Self {
            totals: Counters::seeded(),
            by_component: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── StatusKey ─────────────────────────────────────────────────────────────

    #[test]
    fn test_status_key_parse_all() {
        for key in StatusKey::ALL {
            assert_eq!(key.as_str().parse::<StatusKey>().unwrap(), key);
        }
    }

    #[test]
    fn test_status_key_parse_unknown() {
        let err = "needs_merge".parse::<StatusKey>().unwrap_err();
        assert!(matches!(err, MomError::UnknownStatus(ref s) if s == "needs_merge"));
    }

    #[test]
    fn test_status_key_metric_name() {
        assert_eq!(StatusKey::NeedsMerge.metric_name(), "needs_merge");
        assert_eq!(StatusKey::NeedsSync.metric_name(), "needs_sync");
        assert_eq!(StatusKey::Local.metric_name(), "local");
    }

    // ── Counters ──────────────────────────────────────────────────────────────

    #[test]
    fn test_counters_seeded_has_all_keys_at_zero() {
        let counters = Counters::seeded();
        assert_eq!(counters.len(), 7);
        assert!(counters.iter().all(|(_, value)| value == 0));
    }

    #[test]
    fn test_counters_add_accumulates_and_set_overwrites() {
        let mut counters = Counters::default();
        counters.add(StatusKey::Total, 3).unwrap();
        counters.add(StatusKey::Total, 2).unwrap();
        assert_eq!(counters.get(StatusKey::Total), Some(5));

        counters.set(StatusKey::Modified, 4);
        counters.set(StatusKey::Modified, 7);
        assert_eq!(counters.get(StatusKey::Modified), Some(7));
        assert_eq!(counters.get(StatusKey::Local), None);
    }

    #[test]
    fn test_counters_add_rejects_overflow() {
        let mut counters = Counters::default();
        counters.add(StatusKey::Total, u64::MAX).unwrap();
        let err = counters.add(StatusKey::Total, 1).unwrap_err();
        assert!(matches!(
            err,
            MomError::CounterOverflow {
                key: StatusKey::Total,
                value: 1
            }
        ));
        assert_eq!(counters.get(StatusKey::Total), Some(u64::MAX));
    }

    #[test]
    fn test_aggregation_result_serializes_with_feed_spelling() {
        let mut result = AggregationResult::default();
        result.totals.add(StatusKey::NeedsMerge, 1).unwrap();
        let mut main = Counters::default();
        main.set(StatusKey::NeedsSync, 2);
        result.by_component.insert("main".to_string(), main);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["totals"]["needs-merge"], 1);
        assert_eq!(json["totals"]["unmodified"], 0);
        assert_eq!(json["by_component"]["main"]["needs-sync"], 2);
        assert!(json["by_component"]["main"].get("local").is_none());
    }
}
