//! Feed retrieval and window selection.
//!
//! The merge-o-matic statistics feed is a multi-section plaintext report; only
//! its last few non-empty lines carry the current totals. The whole body is
//! read, but only a fixed-size trailing window of lines is retained.

use std::collections::VecDeque;
use std::time::Duration;

use mom_core::error::{MomError, Result};
use reqwest::blocking::Client;
use tracing::{debug, info};

// ── FeedSource ────────────────────────────────────────────────────────────────

/// Anything that can produce the raw feed body for a Launchpad team.
pub trait FeedSource {
    fn fetch(&self, launchpad_team: &str) -> Result<String>;
}

/// Blocking HTTP retrieval of the feed.
pub struct HttpFeedSource {
    client: Client,
    url_template: String,
}

impl HttpFeedSource {
    /// Build a source for `url_template`, in which `{team}` is substituted.
    pub fn new(url_template: impl Into<String>, timeout: Duration) -> Result<Self> {
        let url_template = url_template.into();
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mom-metrics/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(client_error)?;
        Ok(Self {
            client,
            url_template,
        })
    }

    /// The feed URL for `launchpad_team`.
    pub fn feed_url(&self, launchpad_team: &str) -> String {
        feed_url(&self.url_template, launchpad_team)
    }
}

impl FeedSource for HttpFeedSource {
    fn fetch(&self, launchpad_team: &str) -> Result<String> {
        let url = self.feed_url(launchpad_team);
        info!("Fetching merge-o-matic feed from {}", url);

        let response = self.client.get(&url).send().map_err(|e| MomError::Fetch {
            url: url.clone(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MomError::FetchStatus {
                url,
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().map_err(|e| MomError::Fetch {
            url: url.clone(),
            message: e.to_string(),
        })?;
        let body = String::from_utf8(bytes.to_vec()).map_err(|e| MomError::Fetch {
            url: url.clone(),
            message: format!("body is not valid UTF-8: {e}"),
        })?;

        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

fn client_error(e: reqwest::Error) -> MomError {
    MomError::Config(format!("failed to build HTTP client: {e}"))
}

// ── Window selection ──────────────────────────────────────────────────────────

/// Substitute `launchpad_team` into a `{team}` URL template.
pub fn feed_url(template: &str, launchpad_team: &str) -> String {
    template.replace("{team}", launchpad_team)
}

/// Keep the last `capacity` non-empty lines of `body`, oldest first.
///
/// Lines are split on `\n`; a line that is empty after trimming never takes a
/// slot in the window.
pub fn select_window(body: &str, capacity: usize) -> Vec<String> {
    if capacity == 0 {
        return Vec::new();
    }

    let mut window: VecDeque<&str> = VecDeque::with_capacity(capacity);

    for line in body.split('\n') {
        if line.trim().is_empty() {
            continue;
        }
        if window.len() == capacity {
            window.pop_front();
        }
        window.push_back(line);
    }

    window.into_iter().map(str::to_string).collect()
}

/// Fetch the feed for `launchpad_team` and return its trailing window.
pub fn fetch_window(
    source: &dyn FeedSource,
    launchpad_team: &str,
    capacity: usize,
) -> Result<Vec<String>> {
    let body = source.fetch(launchpad_team)?;
    let window = select_window(&body, capacity);
    debug!("Selected {} of the trailing feed lines", window.len());
    Ok(window)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
