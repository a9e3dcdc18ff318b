mod bootstrap;

use std::time::Duration;

use anyhow::{Context, Result};
use mom_core::models::{AggregationResult, WINDOW_SIZE};
use mom_core::settings::Settings;
use mom_data::aggregator::MergeAggregator;
use mom_data::reader::{fetch_window, FeedSource, HttpFeedSource};
use mom_publish::gateway::PushGateway;
use mom_publish::registry::MergeMetrics;

/// Fetch the team's feed and aggregate its trailing window.
fn collect(source: &dyn FeedSource, launchpad_team: &str) -> Result<AggregationResult> {
    let window = fetch_window(source, launchpad_team, WINDOW_SIZE)?;
    let result = MergeAggregator::aggregate(&window)?;
    Ok(result)
}

fn main() -> Result<()> {
    let settings = Settings::load()?;
    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("mom-metrics v{} starting", env!("CARGO_PKG_VERSION"));

    let timeout = Duration::from_secs(settings.timeout_secs);
    let launchpad_team = settings.launchpad_team()?;
    let source = HttpFeedSource::new(settings.feed_url_template.clone(), timeout)?;

    let result = collect(&source, &launchpad_team)
        .with_context(|| format!("collecting merge statistics for {}", settings.team_name))?;

    println!("{}", serde_json::to_string(&result.totals)?);
    println!("{}", serde_json::to_string(&result.by_component)?);

    if settings.dryrun {
        tracing::info!("Dry run, not pushing metrics");
        return Ok(());
    }

    let metrics = MergeMetrics::build(&settings.team_name, &result)?;
    let gateway = PushGateway::new(&settings.gateway, settings.gateway_auth(), timeout)?;
    gateway.push(&settings.job_name(), &metrics)?;

    tracing::info!("Pushed merge metrics for {}", settings.team_name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mom_core::error::MomError;
    use mom_core::models::StatusKey;

    struct StaticFeed(&'static str);

    impl FeedSource for StaticFeed {
        fn fetch(&self, _launchpad_team: &str) -> mom_core::Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingFeed;

    impl FeedSource for FailingFeed {
        fn fetch(&self, launchpad_team: &str) -> mom_core::Result<String> {
            Err(MomError::FetchStatus {
                url: format!("https://merges.ubuntu.com/stats-{launchpad_team}.txt"),
                status: 503,
            })
        }
    }

    #[test]
    fn test_collect_uses_only_the_trailing_window() {
        let feed = StaticFeed(
            "2024-01-01 0 main total=50\n\
             \n\
             2024-01-01 0 main local=1 total=3\n\
             2024-01-01 0 universe total=7\n\
             2024-01-01 0 restricted total=1\n\
             2024-01-01 0 main local=2 total=4\n",
        );
        let result = collect(&feed, "ubuntu-server").expect("collect");
        assert_eq!(result.totals.get(StatusKey::Total), Some(7));
        assert_eq!(result.totals.get(StatusKey::Local), Some(3));
        assert_eq!(result.by_component["main"].get(StatusKey::Total), Some(4));
    }

    #[test]
    fn test_collect_propagates_fetch_failure() {
        let err = collect(&FailingFeed, "ubuntu-server").unwrap_err();
        let mom = err.downcast_ref::<MomError>().expect("MomError");
        assert!(mom.is_fetch());
    }

    #[test]
    fn test_collect_propagates_parse_failure() {
        let err = collect(&StaticFeed("x y main total=abc\n"), "ubuntu-server").unwrap_err();
        let mom = err.downcast_ref::<MomError>().expect("MomError");
        assert!(mom.is_parse());
    }
}
