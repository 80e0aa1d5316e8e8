//! Card-disadvantage windows and the points conceded inside them.
//!
//! A yellow card at minute `m` opens `[m, m + 10]`, a red card opens
//! `[m, match_length]`. Windows are merged only on genuine overlap
//! (`next.start < current.end`); back-to-back windows stay separate.

use serde::Serialize;

use crate::models::{EventType, MatchEvent, TeamSide};

use super::classifier::canonical_points;

/// Minutes a yellow card keeps a player off the field.
pub const SIN_BIN_MINUTES: u32 = 10;

/// Closed interval `[start, end]` during which a side played short-handed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisadvantageWindow {
    pub start: u32,
    pub end: u32,
}

impl DisadvantageWindow {
    pub fn minutes(&self) -> u32 {
        self.end - self.start
    }

    pub fn contains(&self, minute: u32) -> bool {
        minute >= self.start && minute <= self.end
    }
}

/// Disadvantage summary for one side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisciplineImpact {
    pub disadvantage_minutes: u32,
    pub points_conceded: u32,
    pub windows: Vec<DisadvantageWindow>,
}

/// Raw windows opened by the cards shown to `team_name`, in log order.
///
/// Cards shown after `match_length` open nothing.
fn card_windows(events: &[MatchEvent], team_name: &str, match_length: u32) -> Vec<DisadvantageWindow> {
    events
        .iter()
        .filter(|e| e.team_name == team_name && e.minute <= match_length)
        .filter_map(|e| match e.event_type {
            EventType::YellowCard => Some(DisadvantageWindow {
                start: e.minute,
                end: e.minute.saturating_add(SIN_BIN_MINUTES),
            }),
            EventType::RedCard => Some(DisadvantageWindow {
                start: e.minute,
                end: match_length,
            }),
            _ => None,
        })
        .collect()
}

/// Sort by start and fold overlapping windows together.
pub fn merge_windows(mut windows: Vec<DisadvantageWindow>) -> Vec<DisadvantageWindow> {
    windows.sort_by_key(|w| w.start);

    let mut merged: Vec<DisadvantageWindow> = Vec::with_capacity(windows.len());
    let mut iter = windows.into_iter();
    let Some(mut current) = iter.next() else {
        return merged;
    };
    for next in iter {
        if next.start < current.end {
            current.end = current.end.max(next.end);
        } else {
            merged.push(current);
            current = next;
        }
    }
    merged.push(current);
    merged
}

/// Disadvantage windows, minutes and points conceded for `team_name`.
///
/// Only scoring events of the opposing side count as conceded; events whose
/// team matches neither side are ignored. The returned windows and minutes
/// are capped at `match_length`, but conceded points are tested against the
/// uncapped windows. Points are canonical, so an
/// explicit `points` value on an event has no effect here.
pub fn discipline_impact(
    events: &[MatchEvent],
    team_name: &str,
    home_team: &str,
    away_team: &str,
    match_length: u32,
) -> DisciplineImpact {
    let Some(side) = TeamSide::of(team_name, home_team, away_team) else {
        return DisciplineImpact::default();
    };
    let opponent = match side.opponent() {
        TeamSide::Home => home_team,
        TeamSide::Away => away_team,
    };

    let merged = merge_windows(card_windows(events, team_name, match_length));

    // Injury-time scores still land in a window that runs past full time.
    let points_conceded = events
        .iter()
        .filter(|e| e.team_name == opponent)
        .map(|e| (e.minute, canonical_points(&e.event_type)))
        .filter(|(minute, pts)| *pts > 0 && merged.iter().any(|w| w.contains(*minute)))
        .map(|(_, pts)| pts)
        .sum();

    let windows: Vec<DisadvantageWindow> = merged
        .into_iter()
        .map(|w| DisadvantageWindow {
            start: w.start,
            end: w.end.min(match_length),
        })
        .collect();

    let disadvantage_minutes = windows.iter().map(DisadvantageWindow::minutes).sum();

    DisciplineImpact {
        disadvantage_minutes,
        points_conceded,
        windows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn impact(events: &[MatchEvent], team: &str) -> DisciplineImpact {
        discipline_impact(events, team, "Lions", "Sharks", 80)
    }

    #[test]
    fn test_no_cards_is_zero() {
        let events = vec![MatchEvent::new(10, "Sharks", EventType::Try)];
        assert_eq!(impact(&events, "Lions"), DisciplineImpact::default());
        assert_eq!(impact(&[], "Lions"), DisciplineImpact::default());
    }

    #[test]
    fn test_overlapping_yellows_merge() {
        let events = vec![
            MatchEvent::new(15, "Lions", EventType::YellowCard),
            MatchEvent::new(10, "Lions", EventType::YellowCard),
        ];
        let result = impact(&events, "Lions");
        assert_eq!(result.windows, vec![DisadvantageWindow { start: 10, end: 25 }]);
        assert_eq!(result.disadvantage_minutes, 15);
    }

    #[test]
    fn test_red_card_runs_to_full_time() {
        let events = vec![MatchEvent::new(30, "Lions", EventType::RedCard)];
        let result = impact(&events, "Lions");
        assert_eq!(result.windows, vec![DisadvantageWindow { start: 30, end: 80 }]);
        assert_eq!(result.disadvantage_minutes, 50);
    }

    #[test]
    fn test_back_to_back_windows_do_not_merge() {
        let events = vec![
            MatchEvent::new(10, "Lions", EventType::YellowCard),
            MatchEvent::new(20, "Lions", EventType::YellowCard),
            MatchEvent::new(20, "Sharks", EventType::Penalty),
        ];
        let result = impact(&events, "Lions");
        assert_eq!(
            result.windows,
            vec![
                DisadvantageWindow { start: 10, end: 20 },
                DisadvantageWindow { start: 20, end: 30 },
            ]
        );
        assert_eq!(result.disadvantage_minutes, 20);
        // minute 20 sits in both windows but is attributed once
        assert_eq!(result.points_conceded, 3);
    }

    #[test]
    fn test_late_yellow_is_clamped() {
        let events = vec![MatchEvent::new(75, "Lions", EventType::YellowCard)];
        let result = impact(&events, "Lions");
        assert_eq!(result.windows, vec![DisadvantageWindow { start: 75, end: 80 }]);
        assert_eq!(result.disadvantage_minutes, 5);
    }

    #[test]
    fn test_injury_time_score_counts_against_late_yellow() {
        let events = vec![
            MatchEvent::new(75, "Lions", EventType::YellowCard),
            MatchEvent::new(83, "Sharks", EventType::Try),
            MatchEvent::new(86, "Sharks", EventType::Penalty),
        ];
        let result = impact(&events, "Lions");
        assert_eq!(result.windows, vec![DisadvantageWindow { start: 75, end: 80 }]);
        assert_eq!(result.disadvantage_minutes, 5);
        // 83 is inside [75, 85]; 86 is not
        assert_eq!(result.points_conceded, 5);
    }

    #[test]
    fn test_card_after_full_time_opens_nothing() {
        let events = vec![MatchEvent::new(82, "Lions", EventType::YellowCard)];
        assert_eq!(impact(&events, "Lions"), DisciplineImpact::default());
    }

    #[test]
    fn test_red_card_swallows_later_yellow() {
        let events = vec![
            MatchEvent::new(50, "Lions", EventType::YellowCard),
            MatchEvent::new(40, "Lions", EventType::RedCard),
        ];
        let result = impact(&events, "Lions");
        assert_eq!(result.windows, vec![DisadvantageWindow { start: 40, end: 80 }]);
        assert_eq!(result.disadvantage_minutes, 40);
    }

    #[test]
    fn test_points_conceded_only_from_opponent_inside_window() {
        let events = vec![
            MatchEvent::new(10, "Lions", EventType::YellowCard),
            MatchEvent::new(10, "Sharks", EventType::Try),
            MatchEvent::new(12, "Sharks", EventType::Conversion),
            MatchEvent::new(14, "Lions", EventType::Penalty),
            MatchEvent::new(16, "Bulls", EventType::Try),
            MatchEvent::new(20, "Sharks", EventType::PenaltyTry),
            MatchEvent::new(21, "Sharks", EventType::DropGoal),
        ];
        let result = impact(&events, "Lions");
        assert_eq!(result.points_conceded, 5 + 2 + 7);
    }

    #[test]
    fn test_conceded_uses_canonical_points() {
        let events = vec![
            MatchEvent::new(10, "Lions", EventType::YellowCard),
            MatchEvent::new(12, "Sharks", EventType::Try).with_points(99),
            MatchEvent::new(13, "Sharks", EventType::Other).with_points(4),
        ];
        assert_eq!(impact(&events, "Lions").points_conceded, 5);
    }

    #[test]
    fn test_sides_are_independent() {
        let events = vec![
            MatchEvent::new(10, "Lions", EventType::YellowCard),
            MatchEvent::new(60, "Sharks", EventType::YellowCard),
            MatchEvent::new(62, "Lions", EventType::Try),
        ];
        assert_eq!(impact(&events, "Lions").points_conceded, 0);
        let away = impact(&events, "Sharks");
        assert_eq!(away.disadvantage_minutes, 10);
        assert_eq!(away.points_conceded, 5);
    }

    #[test]
    fn test_merged_windows_sorted_and_disjoint() {
        let events: Vec<MatchEvent> = [3, 70, 8, 40, 45, 12, 66]
            .iter()
            .map(|m| MatchEvent::new(*m, "Lions", EventType::YellowCard))
            .collect();
        let result = impact(&events, "Lions");
        for pair in result.windows.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
        assert!(result.windows.iter().all(|w| w.end <= 80 && w.end >= w.start));
    }

    #[test]
    fn test_unknown_team_is_zero() {
        let events = vec![MatchEvent::new(10, "Bulls", EventType::RedCard)];
        assert_eq!(impact(&events, "Bulls"), DisciplineImpact::default());
    }
}
