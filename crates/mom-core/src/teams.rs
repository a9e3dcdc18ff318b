//! Mapping from human-facing team names to Launchpad team names.
//!
//! The merge-o-matic feed is published per Launchpad team, while the importer
//! is invoked with the short name a team uses for itself (`server`,
//! `foundations`, ...). A JSON override file can extend or replace the
//! built-in table without a rebuild.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{MomError, Result};

/// Built-in short name → Launchpad team name pairs.
const BUILTIN_TEAMS: &[(&str, &str)] = &[
    ("desktop", "desktop-packages"),
    ("foundations", "foundations-bugs"),
    ("server", "ubuntu-server"),
];

/// Resolves a team name into the identifier expected by the feed service.
pub trait TeamResolver {
    fn resolve(&self, team_name: &str) -> String;
}

// ── TeamDirectory ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct TeamDirectory {
    teams: BTreeMap<String, String>,
}

impl Default for TeamDirectory {
    fn default() -> Self {
        Self {
            teams: BUILTIN_TEAMS
                .iter()
                .map(|(name, lp)| (name.to_string(), lp.to_string()))
                .collect(),
        }
    }
}

impl TeamDirectory {
    /// Return the default path of the override file.
    /// Uses `~/.config/mom-metrics/teams.json`.
    pub fn default_overrides_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("mom-metrics").join("teams.json"))
    }

    /// Build the directory from the built-ins plus the override file, if any.
    ///
    /// An explicit `path` must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut directory = Self::default();
        match path {
            Some(p) => directory.merge_file(p)?,
            None => {
                if let Some(p) = Self::default_overrides_path().filter(|p| p.exists()) {
                    directory.merge_file(&p)?;
                }
            }
        }
        Ok(directory)
    }

    /// Merge a JSON object of `name → launchpad name` into the directory.
    /// Entries from the file take precedence over existing ones.
    pub fn merge_file(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path).map_err(|source| MomError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let overrides: BTreeMap<String, String> =
            serde_json::from_str(&content).map_err(|e| {
                MomError::Config(format!("invalid team overrides in {}: {e}", path.display()))
            })?;
        if let Some((name, _)) = overrides.iter().find(|(_, lp)| lp.trim().is_empty()) {
            return Err(MomError::Config(format!(
                "empty Launchpad team name for {name:?} in {}",
                path.display()
            )));
        }
        debug!("Loaded {} team overrides from {}", overrides.len(), path.display());
        self.teams.extend(overrides);
        Ok(())
    }
}

impl TeamResolver for TeamDirectory {
    fn resolve(&self, team_name: &str) -> String {
        let resolved = self
            .teams
            .get(team_name)
            .cloned()
            .unwrap_or_else(|| team_name.to_string());
        debug!("Resolved team {} to Launchpad team {}", team_name, resolved);
        resolved
    }
}
