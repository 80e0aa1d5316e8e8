use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::provider::MatchFeed;
use crate::error::IngestError;
use crate::models::{Branding, EventType, Match, MatchEvent, MatchStatus};

/// Match feed backed by the public REST API (`GET {base}/matches/{id}`).
pub struct RestMatchFeed {
    http: Client,
    base_url: Url,
}

impl RestMatchFeed {
    pub fn new(base_url: &str, timeout: std::time::Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid match API URL '{}'", base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Match API URL '{}' cannot be used as a base", base_url);
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(RestMatchFeed { http, base_url })
    }

    fn match_url(&self, match_id: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("matches").push(match_id);
        }
        url
    }
}

#[async_trait]
impl MatchFeed for RestMatchFeed {
    fn name(&self) -> &str {
        "PublicMatchApi"
    }

    async fn fetch_match(&self, match_id: &str) -> Result<Match> {
        let url = self.match_url(match_id);
        debug!("Fetching match record from {}", url);

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .context("Match API request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Match API error {}: {}", status, body);
        }

        let body = resp.text().await.context("Failed to read match API response")?;
        let record = parse_match_record(match_id, &body)
            .with_context(|| format!("Rejected record for match {}", match_id))?;
        Ok(record)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMatch {
    id: Option<String>,
    #[serde(default)]
    home_team_name: String,
    #[serde(default)]
    away_team_name: String,
    home_score: Option<u32>,
    away_score: Option<u32>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    events: Vec<RawEvent>,
    organiser_branding: Option<Branding>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvent {
    minute: Option<i64>,
    #[serde(default)]
    team_name: String,
    player_name: Option<String>,
    event_type: String,
    points: Option<i64>,
}

/// Decode and validate a match-detail payload.
///
/// A missing event minute is read as minute 0. Negative minutes or points
/// reject the whole record.
pub fn parse_match_record(match_id: &str, body: &str) -> Result<Match, IngestError> {
    let raw: RawMatch = serde_json::from_str(body)?;

    if raw.home_team_name.trim().is_empty() {
        return Err(IngestError::MissingTeamName { side: "home" });
    }
    if raw.away_team_name.trim().is_empty() {
        return Err(IngestError::MissingTeamName { side: "away" });
    }
    if raw.home_team_name == raw.away_team_name {
        return Err(IngestError::SameTeamNames(raw.home_team_name));
    }

    let events = raw
        .events
        .into_iter()
        .enumerate()
        .map(|(index, ev)| -> Result<MatchEvent, IngestError> {
            let minute = ev.minute.unwrap_or(0);
            let minute = u32::try_from(minute)
                .map_err(|_| IngestError::NegativeMinute { index, minute })?;
            let points = ev
                .points
                .map(|p| u32::try_from(p).map_err(|_| IngestError::NegativePoints { index, points: p }))
                .transpose()?;
            Ok(MatchEvent {
                minute,
                team_name: ev.team_name,
                event_type: EventType::from(ev.event_type),
                points,
                player_name: ev.player_name,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Match {
        id: raw.id.unwrap_or_else(|| match_id.to_string()),
        home_team_name: raw.home_team_name,
        away_team_name: raw.away_team_name,
        home_score: raw.home_score,
        away_score: raw.away_score,
        status: MatchStatus::from(raw.status.unwrap_or_default()),
        events,
        branding: raw.organiser_branding,
    })
}
