//! Per-event lookups shared by every derivation.
//!
//! | type          | points | family |
//! |---------------|--------|--------|
//! | TRY           | 5      | try    |
//! | PENALTY_TRY   | 7      | try    |
//! | CONVERSION    | 2      | kick   |
//! | PENALTY       | 3      | kick   |
//! | DROP_GOAL     | 3      | kick   |
//! | anything else | 0      | none   |

use serde::Serialize;

use crate::models::{EventType, MatchEvent};

/// Scoring family an event type belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringFamily {
    TryFamily,
    KickFamily,
    None,
}

/// Broad category of an event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Scoring,
    Discipline,
    Ancillary,
}

/// Canonical points for an event type. Fixed constants, never taken from the payload.
pub fn canonical_points(event_type: &EventType) -> u32 {
    match event_type {
        EventType::Try => 5,
        EventType::PenaltyTry => 7,
        EventType::Conversion => 2,
        EventType::Penalty | EventType::DropGoal => 3,
        _ => 0,
    }
}

/// Points for an event, letting an explicit value override the canonical one.
pub fn points_of(event_type: &EventType, explicit_points: Option<u32>) -> u32 {
    explicit_points.unwrap_or_else(|| canonical_points(event_type))
}

pub fn family_of(event_type: &EventType) -> ScoringFamily {
    match event_type {
        EventType::Try | EventType::PenaltyTry => ScoringFamily::TryFamily,
        EventType::Conversion | EventType::Penalty | EventType::DropGoal => {
            ScoringFamily::KickFamily
        }
        _ => ScoringFamily::None,
    }
}

pub fn is_discipline(event_type: &EventType) -> bool {
    matches!(event_type, EventType::YellowCard | EventType::RedCard)
}

pub fn category_of(event_type: &EventType) -> EventCategory {
    if is_discipline(event_type) {
        EventCategory::Discipline
    } else if family_of(event_type) != ScoringFamily::None {
        EventCategory::Scoring
    } else {
        EventCategory::Ancillary
    }
}

/// Points an event is worth for replay purposes (explicit wins over canonical).
pub fn replay_points(event: &MatchEvent) -> u32 {
    points_of(&event.event_type, event.points)
}
