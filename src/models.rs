use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of in-match event as recorded by the match officials.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    Try,
    Conversion,
    Penalty,
    DropGoal,
    PenaltyTry,
    YellowCard,
    RedCard,
    Substitution,
    Other,
    /// A type string the engine does not know. Kept verbatim for diagnostics.
    Unrecognized(String),
}

impl EventType {
    pub fn as_str(&self) -> &str {
        match self {
            EventType::Try => "TRY",
            EventType::Conversion => "CONVERSION",
            EventType::Penalty => "PENALTY",
            EventType::DropGoal => "DROP_GOAL",
            EventType::PenaltyTry => "PENALTY_TRY",
            EventType::YellowCard => "YELLOW_CARD",
            EventType::RedCard => "RED_CARD",
            EventType::Substitution => "SUBSTITUTION",
            EventType::Other => "OTHER",
            EventType::Unrecognized(raw) => raw,
        }
    }
}

impl From<&str> for EventType {
    fn from(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "TRY" => EventType::Try,
            "CONVERSION" => EventType::Conversion,
            "PENALTY" => EventType::Penalty,
            "DROP_GOAL" => EventType::DropGoal,
            "PENALTY_TRY" => EventType::PenaltyTry,
            "YELLOW_CARD" => EventType::YellowCard,
            "RED_CARD" => EventType::RedCard,
            "SUBSTITUTION" => EventType::Substitution,
            "OTHER" => EventType::Other,
            _ => EventType::Unrecognized(s.to_string()),
        }
    }
}

impl From<String> for EventType {
    fn from(s: String) -> Self {
        EventType::from(s.as_str())
    }
}

impl From<EventType> for String {
    fn from(t: EventType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One occurrence in the match event log. Immutable once ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchEvent {
    /// Elapsed match minute
    pub minute: u32,
    pub team_name: String,
    pub event_type: EventType,
    /// Explicit points as recorded; only the score replay honours it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,
    /// Display only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
}

impl MatchEvent {
    pub fn new(minute: u32, team_name: impl Into<String>, event_type: EventType) -> Self {
        MatchEvent {
            minute,
            team_name: team_name.into(),
            event_type,
            points: None,
            player_name: None,
        }
    }

    pub fn with_points(mut self, points: u32) -> Self {
        self.points = Some(points);
        self
    }
}

/// Lifecycle status reported by the match-record provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MatchStatus {
    Scheduled,
    Live,
    Ongoing,
    Completed,
    Other(String),
}

impl MatchStatus {
    /// Live matches keep being refetched; everything else is frozen after one fetch.
    pub fn is_live(&self) -> bool {
        matches!(self, MatchStatus::Live | MatchStatus::Ongoing)
    }
}

impl From<String> for MatchStatus {
    fn from(s: String) -> Self {
        match s.trim().to_uppercase().as_str() {
            "SCHEDULED" => MatchStatus::Scheduled,
            "LIVE" => MatchStatus::Live,
            "ONGOING" => MatchStatus::Ongoing,
            "COMPLETED" => MatchStatus::Completed,
            _ => MatchStatus::Other(s),
        }
    }
}

impl From<MatchStatus> for String {
    fn from(s: MatchStatus) -> Self {
        match s {
            MatchStatus::Scheduled => "SCHEDULED".into(),
            MatchStatus::Live => "LIVE".into(),
            MatchStatus::Ongoing => "ONGOING".into(),
            MatchStatus::Completed => "COMPLETED".into(),
            MatchStatus::Other(raw) => raw,
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from(self.clone()))
    }
}

/// Organiser colours used to tint each side in the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branding {
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
}

/// Read-only match aggregate handed to the analytics engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: String,
    pub home_team_name: String,
    pub away_team_name: String,
    /// Official score; independent of the event log and never reconciled with it
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub status: MatchStatus,
    pub events: Vec<MatchEvent>,
    pub branding: Option<Branding>,
}

impl Match {
    /// Which side an event's team name belongs to, if any (case-sensitive).
    pub fn side_of(&self, team_name: &str) -> Option<TeamSide> {
        TeamSide::of(team_name, &self.home_team_name, &self.away_team_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    pub fn of(team_name: &str, home: &str, away: &str) -> Option<TeamSide> {
        if team_name == home {
            Some(TeamSide::Home)
        } else if team_name == away {
            Some(TeamSide::Away)
        } else {
            None
        }
    }

    pub fn opponent(self) -> TeamSide {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }

    /// +1 for home, -1 for away: the sign convention of every home-vs-away series.
    pub fn sign(self) -> i32 {
        match self {
            TeamSide::Home => 1,
            TeamSide::Away => -1,
        }
    }
}
