use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use tracing::warn;

use crate::milestones::StreakCadence;

const DEFAULT_QUEUE_DIR: &str = "./data";
const DEFAULT_PROBE_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    /// Directory holding the persisted offline queue.
    pub queue_dir: PathBuf,
    pub probe_interval: Duration,
    pub streak_cadence: StreakCadence,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        let queue_dir = lookup("QUEUE_DIR")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_QUEUE_DIR.into())
            .into();

        let probe_secs = match lookup("CONNECTIVITY_PROBE_SECS") {
            None => DEFAULT_PROBE_SECS,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs >= 1 => secs,
                _ => {
                    warn!(value = %raw, "invalid CONNECTIVITY_PROBE_SECS; using {DEFAULT_PROBE_SECS}");
                    DEFAULT_PROBE_SECS
                }
            },
        };

        let streak_cadence = match lookup("STREAK_CADENCE") {
            None => StreakCadence::default(),
            Some(raw) => raw.parse().unwrap_or_else(|e: String| {
                warn!(error = %e, "invalid STREAK_CADENCE; using weekly");
                StreakCadence::default()
            }),
        };

        Ok(Self {
            database_url,
            queue_dir,
            probe_interval: Duration::from_secs(probe_secs),
            streak_cadence,
        })
    }
}
