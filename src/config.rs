use clap::Parser;
use std::time::Duration;

use crate::analytics::AnalyticsConfig;

/// Live match analytics monitor
#[derive(Parser, Debug, Clone)]
#[command(name = "match-analytics", version, about)]
pub struct Config {
    /// Base URL of the public match API
    #[arg(
        long,
        env = "MATCH_API_URL",
        default_value = "http://localhost:8080/api/public"
    )]
    pub api_url: String,

    /// Match ids to track (repeat the flag or separate with commas)
    #[arg(long = "match-id", env = "MATCH_IDS", value_delimiter = ',')]
    pub match_ids: Vec<String>,

    /// Refetch interval for live matches, in seconds
    #[arg(long, env = "POLL_INTERVAL_SECS", default_value = "15")]
    pub poll_interval_secs: u64,

    /// Per-request timeout for the match API, in seconds
    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value = "10")]
    pub fetch_timeout_secs: u64,

    /// Match length in minutes (80 for fifteen-a-side)
    #[arg(long, env = "MATCH_LENGTH", default_value = "80")]
    pub match_length: u32,

    /// Width of a momentum bucket, in minutes
    #[arg(long, env = "BUCKET_SIZE", default_value = "5")]
    pub bucket_size: u32,

    /// Analytics API listen address
    #[arg(long, env = "DASHBOARD_ADDR", default_value = "0.0.0.0:8090")]
    pub dashboard_addr: String,

    /// Fetch this match once, play it back minute by minute and exit
    #[arg(long, env = "REPLAY_MATCH_ID")]
    pub replay: Option<String>,

    /// Playback tick period, in milliseconds (one match minute per tick)
    #[arg(long, env = "REPLAY_TICK_MS", default_value = "200")]
    pub replay_tick_ms: u64,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.replay.is_none() && self.match_ids.iter().all(|id| id.trim().is_empty()) {
            anyhow::bail!("at least one --match-id (or MATCH_IDS) is required unless --replay is used");
        }
        if self.match_length == 0 {
            anyhow::bail!("match_length must be positive");
        }
        if self.bucket_size == 0 {
            anyhow::bail!("bucket_size must be positive");
        }
        if self.bucket_size > self.match_length {
            anyhow::bail!("bucket_size cannot exceed match_length");
        }
        if self.poll_interval_secs == 0 {
            anyhow::bail!("poll_interval_secs must be positive");
        }
        if self.fetch_timeout_secs == 0 {
            anyhow::bail!("fetch_timeout_secs must be positive");
        }
        if self.replay_tick_ms == 0 {
            anyhow::bail!("replay_tick_ms must be positive");
        }
        Ok(())
    }

    pub fn analytics(&self) -> AnalyticsConfig {
        AnalyticsConfig {
            match_length: self.match_length,
            bucket_size: self.bucket_size,
        }
    }

    /// Tracked ids with blanks removed.
    pub fn tracked_matches(&self) -> Vec<String> {
        self.match_ids
            .iter()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect()
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn replay_tick(&self) -> Duration {
        Duration::from_millis(self.replay_tick_ms)
    }
}
