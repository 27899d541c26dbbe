use std::path::PathBuf;
use std::time::Duration;

use tracing::Level;

use crate::error::Error;
use crate::template::manager::FEATURED_TEMPLATES;

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(300);

const BIND_VAR: &str = "CAMPAIGN_HUB_BIND";
const LATENCY_VAR: &str = "CAMPAIGN_HUB_LATENCY_MS";
const SEED_DIR_VAR: &str = "CAMPAIGN_HUB_SEED_DIR";
const FEATURED_VAR: &str = "CAMPAIGN_HUB_FEATURED";
const LOG_VAR: &str = "CAMPAIGN_HUB_LOG";

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub bind_address: String,
    /// Artificial delay before every store operation resolves.
    pub latency: Duration,
    /// Directory holding `campaigns.json` and `templates.json`. The embedded
    /// seed is used when unset.
    pub seed_dir: Option<PathBuf>,
    pub featured_templates: Vec<String>,
    pub log_level: Level,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            latency: DEFAULT_LATENCY,
            seed_dir: None,
            featured_templates: FEATURED_TEMPLATES.iter().map(|s| s.to_string()).collect(),
            log_level: Level::DEBUG,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Config, Error> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(bind_address) = lookup(BIND_VAR) {
            config.bind_address = bind_address;
        }

        if let Some(value) = lookup(LATENCY_VAR) {
            let millis = value.trim().parse().map_err(|_| Error::InvalidConfig {
                key: LATENCY_VAR,
                value: value.clone(),
            })?;
            config.latency = Duration::from_millis(millis);
        }

        if let Some(seed_dir) = lookup(SEED_DIR_VAR) {
            config.seed_dir = Some(PathBuf::from(seed_dir));
        }

        if let Some(value) = lookup(FEATURED_VAR) {
            config.featured_templates = value
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(value) = lookup(LOG_VAR) {
            config.log_level = value.trim().parse().map_err(|_| Error::InvalidConfig {
                key: LOG_VAR,
                value: value.clone(),
            })?;
        }

        Ok(config)
    }
}
