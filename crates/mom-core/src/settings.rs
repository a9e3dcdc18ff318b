use clap::Parser;
use std::path::PathBuf;

use crate::error::{MomError, Result};
use crate::models::FEED_URL_TEMPLATE;
use crate::teams::{TeamDirectory, TeamResolver};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Submit merge-o-matic statistics to a Prometheus push gateway
#[derive(Parser, Debug, Clone)]
#[command(
    name = "mom-metrics",
    about = "Submit merge-o-matic statistics to a Prometheus push gateway",
    version
)]
pub struct Settings {
    /// Team name
    pub team_name: String,

    /// Aggregate and print the results without pushing them
    #[arg(long, alias = "dry-run")]
    pub dryrun: bool,

    /// Launchpad team name (skips the team directory lookup)
    #[arg(long)]
    pub launchpad_team: Option<String>,

    /// JSON file mapping team names to Launchpad team names
    #[arg(long, env = "MOM_TEAMS_FILE")]
    pub teams_file: Option<PathBuf>,

    /// Feed URL template, `{team}` is replaced by the Launchpad team name
    #[arg(long, env = "MOM_FEED_URL_TEMPLATE", default_value = FEED_URL_TEMPLATE)]
    pub feed_url_template: String,

    /// Push gateway base URL
    #[arg(long, env = "PUSHGATEWAY_URL", default_value = "http://localhost:9091")]
    pub gateway: String,

    /// Push gateway basic-auth user
    #[arg(long, env = "PUSHGATEWAY_USER")]
    pub gateway_user: Option<String>,

    /// Push gateway basic-auth password
    #[arg(long, env = "PUSHGATEWAY_PASSWORD", hide_env_values = true)]
    pub gateway_password: Option<String>,

    /// HTTP timeout in seconds (1-300)
    #[arg(long, default_value = "30", value_parser = clap::value_parser!(u64).range(1..=300))]
    pub timeout_secs: u64,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments and apply derived values.
    pub fn load() -> Result<Self> {
        Self::load_from(std::env::args_os())
    }

    /// Same as [`Settings::load`] but accepts an explicit argument list.
    pub fn load_from<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut settings = Settings::parse_from(args);

        // --debug overrides log level.
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.team_name.trim().is_empty() {
            return Err(MomError::Config("team name must not be empty".to_string()));
        }
        if !self.feed_url_template.contains("{team}") {
            return Err(MomError::Config(format!(
                "feed URL template has no {{team}} placeholder: {}",
                self.feed_url_template
            )));
        }
        if self.gateway_password.is_some() && self.gateway_user.is_none() {
            return Err(MomError::Config(
                "a push gateway password requires a user".to_string(),
            ));
        }
        Ok(())
    }

    /// The Launchpad team name whose feed should be fetched.
    pub fn launchpad_team(&self) -> Result<String> {
        if let Some(lp) = &self.launchpad_team {
            return Ok(lp.clone());
        }
        let directory = TeamDirectory::load(self.teams_file.as_deref())?;
        Ok(directory.resolve(&self.team_name))
    }

    /// Job name under which the metrics are pushed.
    pub fn job_name(&self) -> String {
        format!("{}-merge", self.team_name)
    }

    /// Basic-auth credentials for the push gateway, when configured.
    pub fn gateway_auth(&self) -> Option<(String, Option<String>)> {
        self.gateway_user
            .clone()
            .map(|user| (user, self.gateway_password.clone()))
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["mom-metrics", "server"]);

        assert_eq!(settings.team_name, "server");
        assert!(!settings.dryrun);
        assert!(settings.launchpad_team.is_none());
        assert_eq!(settings.timeout_secs, 30);
        assert_eq!(settings.log_level, "INFO");
        assert!(!settings.debug);
    }

    #[test]
    fn test_settings_dryrun_flag_and_alias() {
        let settings = Settings::parse_from(["mom-metrics", "server", "--dryrun"]);
        assert!(settings.dryrun);
        let settings = Settings::parse_from(["mom-metrics", "--dry-run", "server"]);
        assert!(settings.dryrun);
    }

    #[test]
    fn test_settings_team_name_is_required() {
        let result = Settings::try_parse_from(["mom-metrics"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_debug_overrides_log_level() {
        let settings = Settings::load_from(["mom-metrics", "server", "--debug"]).expect("load");
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_load_rejects_template_without_placeholder() {
        let err = Settings::load_from([
            "mom-metrics",
            "server",
            "--feed-url-template",
            "http://localhost/stats.txt",
        ])
        .unwrap_err();
        assert!(matches!(err, MomError::Config(_)));
    }

    #[test]
    fn test_load_rejects_password_without_user() {
        let err = Settings::load_from(["mom-metrics", "server", "--gateway-password", "secret"])
            .unwrap_err();
        assert!(matches!(err, MomError::Config(_)));
    }

    #[test]
    fn test_job_name() {
        let settings = Settings::parse_from(["mom-metrics", "server"]);
        assert_eq!(settings.job_name(), "server-merge");
    }

    #[test]
    fn test_launchpad_team_explicit_flag_wins() {
        let settings =
            Settings::parse_from(["mom-metrics", "server", "--launchpad-team", "my-team"]);
        assert_eq!(settings.launchpad_team().expect("resolve"), "my-team");
    }

    #[test]
    fn test_launchpad_team_from_teams_file() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("teams.json");
        std::fs::write(&path, r#"{"server": "server-override"}"#).expect("write");

        let settings = Settings::parse_from([
            "mom-metrics".into(),
            "server".into(),
            "--teams-file".into(),
            path.into_os_string(),
        ]);
        assert_eq!(settings.launchpad_team().expect("resolve"), "server-override");
    }

    #[test]
    fn test_gateway_auth() {
        let settings = Settings::parse_from([
            "mom-metrics",
            "server",
            "--gateway-user",
            "bot",
            "--gateway-password",
            "pw",
        ]);
        assert_eq!(
            settings.gateway_auth(),
            Some(("bot".to_string(), Some("pw".to_string())))
        );
    }
}
