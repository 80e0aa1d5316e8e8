//! Score reconstruction at an arbitrary elapsed minute.

use serde::Serialize;

use crate::models::{Match, MatchEvent, TeamSide};

use super::classifier::replay_points;

/// Cumulative score of both sides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreLine {
    pub home: u32,
    pub away: u32,
}

impl ScoreLine {
    /// Saturates at `u32::MAX`; explicit points come straight from the feed.
    fn add(&mut self, side: TeamSide, points: u32) {
        match side {
            TeamSide::Home => self.home = self.home.saturating_add(points),
            TeamSide::Away => self.away = self.away.saturating_add(points),
        }
    }
}

/// Score as of `cursor_minute` (inclusive).
///
/// Events whose team matches neither side count for nobody. Monotone in
/// `cursor_minute` since points are never negative.
pub fn score_at(events: &[MatchEvent], home_team: &str, away_team: &str, cursor_minute: u32) -> ScoreLine {
    let mut score = ScoreLine::default();
    for ev in events.iter().filter(|e| e.minute <= cursor_minute) {
        let points = replay_points(ev);
        if points == 0 {
            continue;
        }
        if let Some(side) = TeamSide::of(&ev.team_name, home_team, away_team) {
            score.add(side, points);
        }
    }
    score
}

/// Events up to and including `cursor_minute`, newest first.
pub fn timeline_at(events: &[MatchEvent], cursor_minute: u32) -> Vec<MatchEvent> {
    let mut shown: Vec<MatchEvent> = events
        .iter()
        .filter(|e| e.minute <= cursor_minute)
        .cloned()
        .collect();
    // stable: equal minutes keep log order
    shown.sort_by(|a, b| b.minute.cmp(&a.minute));
    shown
}

/// Everything a scrubbing UI needs for one cursor position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayFrame {
    pub minute: u32,
    pub score: ScoreLine,
    pub events: Vec<MatchEvent>,
}

/// Clamp a caller-supplied cursor into `[0, match_length]`.
pub fn clamp_cursor(cursor: i64, match_length: u32) -> u32 {
    cursor.clamp(0, match_length as i64) as u32
}

pub fn replay_frame(record: &Match, cursor: i64, match_length: u32) -> ReplayFrame {
    let minute = clamp_cursor(cursor, match_length);
    ReplayFrame {
        minute,
        score: score_at(
            &record.events,
            &record.home_team_name,
            &record.away_team_name,
            minute,
        ),
        events: timeline_at(&record.events, minute),
    }
}
