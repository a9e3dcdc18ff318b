//! Push-gateway transport.

use std::time::Duration;

use mom_core::error::{MomError, Result};
use prometheus::{Encoder, TextEncoder};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use tracing::{debug, info};

use crate::registry::MergeMetrics;

/// Blocking client for a Prometheus push gateway.
pub struct PushGateway {
    client: Client,
    base_url: Url,
    auth: Option<(String, Option<String>)>,
}

impl PushGateway {
    /// Build a client for the gateway at `base_url`.
    pub fn new(
        base_url: &str,
        auth: Option<(String, Option<String>)>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| MomError::Config(format!("invalid push gateway URL {base_url}: {e}")))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MomError::Publish(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url,
            auth,
        })
    }

    /// URL of the job group `job` on this gateway.
    pub fn job_url(&self, job: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                MomError::Config(format!("push gateway URL cannot be a base: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(["metrics", "job", job]);
        Ok(url)
    }

    /// Replace every metric of `job` on the gateway with `metrics`.
    pub fn push(&self, job: &str, metrics: &MergeMetrics) -> Result<()> {
        let url = self.job_url(job)?;
        let body = metrics.encode()?;
        info!("Pushing {} bytes of metrics to {}", body.len(), url);

        let mut request = self
            .client
            .put(url.clone())
            .header(CONTENT_TYPE, TextEncoder::new().format_type())
            .body(body);
        if let Some((user, password)) = &self.auth {
            request = request.basic_auth(user, password.as_ref());
        }

        let response = request
            .send()
            .map_err(|e| MomError::Publish(format!("{url}: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(MomError::Publish(format!(
                "{url} returned HTTP {}: {}",
                status.as_u16(),
                detail.trim()
            )));
        }

        debug!("Push gateway accepted job {}", job);
        Ok(())
    }
}
