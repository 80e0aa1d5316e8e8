//! Pure derivations over a match event log.
//!
//! Every derivation takes the full log and recomputes from scratch; nothing
//! is cached between calls and the input is never mutated, so the same
//! snapshot may be analysed concurrently from any number of tasks.

pub mod audit;
pub mod breakdown;
pub mod classifier;
pub mod discipline;
pub mod momentum;
pub mod replay;

pub use audit::{audit_events, EventAudit};
pub use breakdown::{scoring_breakdown, ScoringBreakdown};
pub use discipline::{discipline_impact, DisciplineImpact};
pub use momentum::{momentum_series, split_offset, MomentumBucket};
pub use replay::{replay_frame, score_at, ReplayFrame, ScoreLine};

use serde::Serialize;

use crate::models::{Branding, Match};

pub const DEFAULT_MATCH_LENGTH: u32 = 80;
pub const DEFAULT_BUCKET_SIZE: u32 = 5;

const DEFAULT_HOME_COLOR: &str = "#3b82f6";
const DEFAULT_AWAY_COLOR: &str = "#ef4444";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsConfig {
    pub match_length: u32,
    pub bucket_size: u32,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        AnalyticsConfig {
            match_length: DEFAULT_MATCH_LENGTH,
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

/// Plain colour values for the presentation layer to bind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamColors {
    pub home: String,
    pub away: String,
}

impl TeamColors {
    pub fn from_branding(branding: Option<&Branding>) -> Self {
        let pick = |c: Option<&String>, default: &str| {
            c.filter(|s| !s.trim().is_empty())
                .cloned()
                .unwrap_or_else(|| default.to_string())
        };
        TeamColors {
            home: pick(branding.and_then(|b| b.primary_color.as_ref()), DEFAULT_HOME_COLOR),
            away: pick(branding.and_then(|b| b.secondary_color.as_ref()), DEFAULT_AWAY_COLOR),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MomentumReport {
    pub buckets: Vec<MomentumBucket>,
    /// Where the home/away gradient splits, as a fraction of chart height
    pub split_offset: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DisciplineReport {
    pub home: DisciplineImpact,
    pub away: DisciplineImpact,
}

impl DisciplineReport {
    /// False when neither side spent any time short-handed; the card is hidden then.
    pub fn is_relevant(&self) -> bool {
        self.home.disadvantage_minutes > 0 || self.away.disadvantage_minutes > 0
    }
}

/// All derivations for one snapshot of a match.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchAnalytics {
    pub match_id: String,
    pub home_team_name: String,
    pub away_team_name: String,
    /// `score_at(match_length)`; may legitimately differ from the official score
    pub computed_score: ScoreLine,
    pub official_score: Option<ScoreLine>,
    pub momentum: MomentumReport,
    pub discipline: DisciplineReport,
    pub show_discipline: bool,
    pub breakdown: ScoringBreakdown,
    pub audit: EventAudit,
    pub colors: TeamColors,
}

impl MatchAnalytics {
    pub fn compute(record: &Match, config: AnalyticsConfig) -> Self {
        let home = record.home_team_name.as_str();
        let away = record.away_team_name.as_str();
        let events = record.events.as_slice();

        let buckets = momentum_series(events, home, away, config.match_length, config.bucket_size);
        let discipline = DisciplineReport {
            home: discipline_impact(events, home, home, away, config.match_length),
            away: discipline_impact(events, away, home, away, config.match_length),
        };

        MatchAnalytics {
            match_id: record.id.clone(),
            home_team_name: record.home_team_name.clone(),
            away_team_name: record.away_team_name.clone(),
            computed_score: score_at(events, home, away, config.match_length),
            official_score: match (record.home_score, record.away_score) {
                (Some(h), Some(a)) => Some(ScoreLine { home: h, away: a }),
                _ => None,
            },
            momentum: MomentumReport {
                split_offset: split_offset(&buckets),
                buckets,
            },
            show_discipline: discipline.is_relevant(),
            discipline,
            breakdown: scoring_breakdown(events, home, away),
            audit: audit_events(events, home, away),
            colors: TeamColors::from_branding(record.branding.as_ref()),
        }
    }

    /// True when the event log does not add up to the official score.
    pub fn score_mismatch(&self) -> bool {
        self.official_score
            .map(|s| s != self.computed_score)
            .unwrap_or(false)
    }
}
