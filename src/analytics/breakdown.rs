use serde::Serialize;

use crate::models::{MatchEvent, TeamSide};

use super::classifier::{canonical_points, family_of, ScoringFamily};

/// Last minute that still belongs to the first half.
pub const HALF_TIME_MINUTE: u32 = 40;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FamilyTotals {
    pub tries: u32,
    pub kicks: u32,
}

impl FamilyTotals {
    pub fn total(&self) -> u32 {
        self.tries + self.kicks
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SideTotals {
    pub home: u32,
    pub away: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ByFamily {
    pub home: FamilyTotals,
    pub away: FamilyTotals,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ByHalf {
    pub first_half: SideTotals,
    pub second_half: SideTotals,
}

/// Points split by scoring family and by half, per side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringBreakdown {
    pub by_family: ByFamily,
    pub by_half: ByHalf,
}

impl ScoringBreakdown {
    pub fn team_total(&self, side: TeamSide) -> u32 {
        match side {
            TeamSide::Home => self.by_family.home.total(),
            TeamSide::Away => self.by_family.away.total(),
        }
    }
}

pub fn scoring_breakdown(events: &[MatchEvent], home_team: &str, away_team: &str) -> ScoringBreakdown {
    let mut out = ScoringBreakdown::default();

    for ev in events {
        let Some(side) = TeamSide::of(&ev.team_name, home_team, away_team) else {
            continue;
        };
        let points = canonical_points(&ev.event_type);
        if points == 0 {
            continue;
        }

        let family = match side {
            TeamSide::Home => &mut out.by_family.home,
            TeamSide::Away => &mut out.by_family.away,
        };
        match family_of(&ev.event_type) {
            ScoringFamily::TryFamily => family.tries += points,
            ScoringFamily::KickFamily => family.kicks += points,
            ScoringFamily::None => {}
        }

        let half = if ev.minute <= HALF_TIME_MINUTE {
            &mut out.by_half.first_half
        } else {
            &mut out.by_half.second_half
        };
        match side {
            TeamSide::Home => half.home += points,
            TeamSide::Away => half.away += points,
        }
    }

    out
}
