use std::{path::PathBuf, time::Duration};

use anyhow::Context as _;

use maneki_utils::menu::DEFAULT_TIMEOUT;

const DEFAULT_LOG_DIR: &str = "data/logs";

/// Runtime settings read from the environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BotConfig {
    pub token: String,
    pub giphy_api_key: Option<String>,
    /// Users allowed to run admin commands.
    pub guardians: Vec<u64>,
    /// Initial "Playing" status.
    pub activity: Option<String>,
    pub menu_timeout: Duration,
    /// Directory for the daily log files.
    pub log_dir: PathBuf,
}

impl BotConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let token = non_empty("DISCORD_TOKEN").context("DISCORD_TOKEN is not set")?;

        let guardians = match non_empty("BOT_GUARDIANS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(|id| {
                    id.parse::<u64>()
                        .with_context(|| format!("BOT_GUARDIANS entry `{id}` is not a user id"))
                })
                .collect::<anyhow::Result<Vec<_>>>()?,
            None => Vec::new(),
        };

        let menu_timeout = match non_empty("MENU_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw
                    .parse::<u64>()
                    .with_context(|| format!("MENU_TIMEOUT_SECS `{raw}` is not a number"))?;
                anyhow::ensure!(secs > 0, "MENU_TIMEOUT_SECS must be positive");
                Duration::from_secs(secs)
            }
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            token,
            giphy_api_key: non_empty("GIPHY_API_KEY"),
            guardians,
            activity: non_empty("BOT_ACTIVITY"),
            menu_timeout,
            log_dir: non_empty("BOT_LOG_DIR")
                .map_or_else(|| PathBuf::from(DEFAULT_LOG_DIR), PathBuf::from),
        })
    }

    pub fn is_guardian(&self, user_id: u64) -> bool {
        self.guardians.contains(&user_id)
    }
}
