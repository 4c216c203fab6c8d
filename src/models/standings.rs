//! League table rows, consumed for upset detection.

use serde::{Deserialize, Serialize};

use super::lenient::{f64_or_zero, null_as_default, string_or_empty, u32_or_zero};
use super::TeamId;

/// Team reference inside a standings row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandingsTeam {
    #[serde(default)]
    pub id: TeamId,

    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,
}

/// One row of a league table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandingsRow {
    #[serde(default, deserialize_with = "null_as_default")]
    pub team: StandingsTeam,

    /// Table position, 1 = top. 0 means unknown.
    #[serde(default, deserialize_with = "u32_or_zero")]
    pub position: u32,

    #[serde(default, deserialize_with = "u32_or_zero")]
    pub played: u32,

    #[serde(default, deserialize_with = "u32_or_zero")]
    pub won: u32,

    #[serde(default, deserialize_with = "u32_or_zero")]
    pub lost: u32,

    #[serde(default, deserialize_with = "u32_or_zero")]
    pub points: u32,

    /// Net run rate
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub nrr: f64,
}

impl StandingsRow {
    pub fn new(team_id: &str, name: &str, position: u32) -> Self {
        Self {
            team: StandingsTeam {
                id: TeamId::from(team_id),
                name: name.to_string(),
            },
            position,
            ..Self::default()
        }
    }
}

/// Table position of a team; `None` when absent or recorded as 0.
///
/// When a team appears more than once the last row wins.
pub fn position_of(standings: &[StandingsRow], team_id: &TeamId) -> Option<u32> {
    if team_id.is_empty() {
        return None;
    }
    standings
        .iter()
        .rev()
        .find(|row| row.team.id == *team_id)
        .map(|row| row.position)
        .filter(|&p| p > 0)
}
