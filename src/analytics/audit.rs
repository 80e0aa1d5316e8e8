use serde::Serialize;

use crate::models::{EventType, MatchEvent, TeamSide};

/// Events the derivations had to ignore, surfaced for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAudit {
    /// Team name matches neither side
    pub unmatched_team: usize,
    /// Event type string the engine does not know
    pub unrecognized_type: usize,
}

impl EventAudit {
    pub fn is_clean(&self) -> bool {
        self.unmatched_team == 0 && self.unrecognized_type == 0
    }
}

pub fn audit_events(events: &[MatchEvent], home_team: &str, away_team: &str) -> EventAudit {
    events.iter().fold(EventAudit::default(), |mut acc, ev| {
        if TeamSide::of(&ev.team_name, home_team, away_team).is_none() {
            acc.unmatched_team += 1;
        }
        if matches!(ev.event_type, EventType::Unrecognized(_)) {
            acc.unrecognized_type += 1;
        }
        acc
    })
}
