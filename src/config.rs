//! User configuration at `~/.jobtrail/config.json`.
//!
//! Missing file → defaults. A parse error is logged and falls back to
//! defaults rather than aborting, so a broken config never blocks ingestion.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::pipeline::extract::ExtractStrategy;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Identity under which applications are stored.
    pub user_id: String,
    /// Recency window for the mailbox query, in days.
    pub days: u32,
    /// Requested batch size (capped at 600 by the orchestrator).
    pub limit: u32,
    /// Field-extraction strategy.
    pub extractor: ExtractStrategy,
    /// Override for the database location.
    pub db_path: Option<PathBuf>,
    /// Optional JSON file overriding the built-in rule tables.
    pub rules_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_id: "local".to_string(),
            days: 180,
            limit: 300,
            extractor: ExtractStrategy::default(),
            db_path: None,
            rules_path: None,
        }
    }
}

/// Location of the config file.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".jobtrail").join("config.json"))
}

/// Load the configuration, falling back to defaults.
pub fn load_config() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    if !path.exists() {
        return Config::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                log::warn!(
                    "config parse failed ({}), using defaults: {}",
                    path.display(),
                    e
                );
                Config::default()
            }
        },
        Err(e) => {
            log::warn!(
                "config read failed ({}), using defaults: {}",
                path.display(),
                e
            );
            Config::default()
        }
    }
}
