use anyhow::Result;
use async_trait::async_trait;

use crate::models::Match;

/// Source of match records (the public match-detail endpoint in production).
#[async_trait]
pub trait MatchFeed: Send + Sync {
    /// Fetch the current record for one match.
    async fn fetch_match(&self, match_id: &str) -> Result<Match>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
