//! Signed "dominance" series over fixed-width time buckets.
//!
//! This is a heuristic, not a conservation law: bucket values do not sum to
//! anything meaningful, so only individual buckets should be asserted on.
//!
//! Weights:
//!   - TRY 5, PENALTY 3, CONVERSION 2, signed toward the scoring side
//!   - YELLOW_CARD 5, RED_CARD 10, signed toward the *opponent* of the carded side
//!   - everything else 1, signed toward the event's side
//!
//! DROP_GOAL and PENALTY_TRY have no dedicated weight and fall into the
//! generic bucket of 1.

use serde::Serialize;

use crate::models::{EventType, MatchEvent, TeamSide};

/// One `bucket_size`-minute window of the momentum series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MomentumBucket {
    pub bucket_start: u32,
    /// Positive = home dominance, negative = away dominance
    pub value: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dominance {
    Home,
    Away,
    Neutral,
}

impl Dominance {
    pub fn of(value: i32) -> Self {
        match value.signum() {
            1 => Dominance::Home,
            -1 => Dominance::Away,
            _ => Dominance::Neutral,
        }
    }
}

/// Unsigned weight and whether the sign is inverted relative to the event's team.
fn weight(event_type: &EventType) -> (i32, bool) {
    match event_type {
        EventType::Try => (5, false),
        EventType::Penalty => (3, false),
        EventType::Conversion => (2, false),
        EventType::YellowCard => (5, true),
        EventType::RedCard => (10, true),
        _ => (1, false),
    }
}

/// Signed contribution of one event, or `None` when its team is neither side.
fn signed_weight(event: &MatchEvent, home_team: &str, away_team: &str) -> Option<i32> {
    let side = TeamSide::of(&event.team_name, home_team, away_team)?;
    let (magnitude, inverted) = weight(&event.event_type);
    let toward = if inverted { side.opponent() } else { side };
    Some(magnitude * toward.sign())
}

/// Momentum series with `floor(match_length / bucket_size) + 1` buckets.
///
/// Events falling past the last bucket are dropped rather than extending the
/// series. A zero `bucket_size` yields an empty series.
pub fn momentum_series(
    events: &[MatchEvent],
    home_team: &str,
    away_team: &str,
    match_length: u32,
    bucket_size: u32,
) -> Vec<MomentumBucket> {
    if bucket_size == 0 {
        return Vec::new();
    }

    let mut buckets: Vec<MomentumBucket> = (0..=match_length / bucket_size)
        .map(|i| MomentumBucket {
            bucket_start: i * bucket_size,
            value: 0,
        })
        .collect();

    for ev in events {
        let idx = (ev.minute / bucket_size) as usize;
        let Some(bucket) = buckets.get_mut(idx) else {
            continue;
        };
        if let Some(w) = signed_weight(ev, home_team, away_team) {
            bucket.value += w;
        }
    }

    buckets
}

/// Vertical fraction at which a home/away split gradient changes colour.
///
/// 0 when nothing is above the axis, 1 when nothing is below it.
pub fn split_offset(buckets: &[MomentumBucket]) -> f64 {
    let max = buckets.iter().map(|b| b.value).max().unwrap_or(0);
    let min = buckets.iter().map(|b| b.value).min().unwrap_or(0);
    if max <= 0 {
        return 0.0;
    }
    if min >= 0 {
        return 1.0;
    }
    max as f64 / (max - min) as f64
}
