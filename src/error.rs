use thiserror::Error;

/// Reasons a fetched match record is refused at the ingestion boundary.
///
/// The analytics engine never sees a rejected record; the previous snapshot
/// (if any) keeps being served.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("malformed match payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("event #{index} has negative minute {minute}")]
    NegativeMinute { index: usize, minute: i64 },

    #[error("event #{index} has negative points {points}")]
    NegativePoints { index: usize, points: i64 },

    #[error("{side} team name is missing")]
    MissingTeamName { side: &'static str },

    #[error("home and away team are both named '{0}'")]
    SameTeamNames(String),
}
