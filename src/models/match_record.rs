//! Canonical match record, as produced by the normalization layer.

use serde::{Deserialize, Deserializer, Serialize};

use super::lenient::{
    bool_or_false, f64_or_none, f64_or_zero, null_as_default, string_or_empty, u32_or_zero,
};
use super::{LeagueId, Margin, MatchId, PlayerId, TeamId};

/// Lifecycle state of a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    #[default]
    Upcoming,
    Live,
    Completed,
}

impl MatchStatus {
    /// Map a status string; anything unrecognized is treated as upcoming.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "completed" => MatchStatus::Completed,
            "live" => MatchStatus::Live,
            _ => MatchStatus::Upcoming,
        }
    }
}

impl<'de> Deserialize<'de> for MatchStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = string_or_empty(deserializer)?;
        Ok(Self::from_label(&label))
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStatus::Upcoming => write!(f, "upcoming"),
            MatchStatus::Live => write!(f, "live"),
            MatchStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Which side of the fixture a team occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

/// A team as it appears on a fixture.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    #[serde(default)]
    pub id: TeamId,

    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,

    #[serde(default, deserialize_with = "string_or_empty")]
    pub short_name: String,

    #[serde(default, deserialize_with = "string_or_empty")]
    pub logo: String,
}

impl Team {
    /// Short name, else full name, else the given placeholder.
    pub fn label<'a>(&'a self, fallback: &'a str) -> &'a str {
        if !self.short_name.is_empty() {
            &self.short_name
        } else if !self.name.is_empty() {
            &self.name
        } else {
            fallback
        }
    }
}

/// Home and away teams.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Teams {
    #[serde(default, deserialize_with = "null_as_default")]
    pub home: Team,

    #[serde(default, deserialize_with = "null_as_default")]
    pub away: Team,
}

/// One team's total for the match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InningsScore {
    #[serde(default, deserialize_with = "u32_or_zero")]
    pub runs: u32,

    #[serde(default, deserialize_with = "u32_or_zero")]
    pub wickets: u32,

    /// Overs faced, `19.4` meaning 19 overs and 4 balls.
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub overs: f64,
}

impl InningsScore {
    pub fn new(runs: u32, wickets: u32, overs: f64) -> Self {
        Self {
            runs,
            wickets,
            overs,
        }
    }
}

/// Home and away totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scoreboard {
    #[serde(default, deserialize_with = "null_as_default")]
    pub home: InningsScore,

    #[serde(default, deserialize_with = "null_as_default")]
    pub away: InningsScore,
}

/// Match outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    /// Winning team id; empty when there was no winner
    #[serde(default)]
    pub winner: TeamId,

    /// Free-text margin, e.g. "5 runs", "3 wickets", "Super Over"
    #[serde(default, deserialize_with = "string_or_empty")]
    pub margin: String,

    /// Free-text method, e.g. "Super Over" or "D/L"
    #[serde(default, deserialize_with = "string_or_empty")]
    pub method: String,

    /// Structured margin, when the source provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_detail: Option<Margin>,
}

/// Competition context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct League {
    #[serde(default)]
    pub id: LeagueId,

    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,

    #[serde(default, deserialize_with = "string_or_empty")]
    pub season: String,
}

/// Minimal player reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerRef {
    #[serde(default)]
    pub id: PlayerId,

    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,
}

/// Venue details; carried through, not analyzed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,

    #[serde(default, deserialize_with = "string_or_empty")]
    pub city: String,

    #[serde(default, deserialize_with = "string_or_empty")]
    pub country: String,
}

/// One batter's line on a scorecard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattingEntry {
    #[serde(default)]
    pub player_id: PlayerId,

    #[serde(default, deserialize_with = "string_or_empty")]
    pub player_name: String,

    /// Batting side; makes the innings/team association explicit
    #[serde(default)]
    pub team_id: TeamId,

    #[serde(default, deserialize_with = "u32_or_zero")]
    pub runs: u32,

    #[serde(default, deserialize_with = "u32_or_zero")]
    pub balls: u32,

    #[serde(default, deserialize_with = "u32_or_zero")]
    pub fours: u32,

    #[serde(default, deserialize_with = "u32_or_zero")]
    pub sixes: u32,

    #[serde(default, deserialize_with = "f64_or_none")]
    pub strike_rate: Option<f64>,

    #[serde(default, deserialize_with = "bool_or_false")]
    pub out: bool,

    #[serde(default, deserialize_with = "string_or_empty")]
    pub how_out: String,
}

/// One bowler's line on a scorecard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BowlingEntry {
    #[serde(default)]
    pub player_id: PlayerId,

    #[serde(default, deserialize_with = "string_or_empty")]
    pub player_name: String,

    /// Bowling side
    #[serde(default)]
    pub team_id: TeamId,

    #[serde(default, deserialize_with = "f64_or_zero")]
    pub overs: f64,

    #[serde(default, deserialize_with = "u32_or_zero")]
    pub maidens: u32,

    #[serde(default, deserialize_with = "u32_or_zero")]
    pub runs: u32,

    #[serde(default, deserialize_with = "u32_or_zero")]
    pub wickets: u32,

    #[serde(default, deserialize_with = "f64_or_none")]
    pub economy: Option<f64>,
}

/// A single delivery.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ball {
    /// Zero-based over number. Fractional upstream values truncate.
    #[serde(default, deserialize_with = "u32_or_zero")]
    pub over: u32,

    /// Ball within the over; frequently unpopulated upstream
    #[serde(default, deserialize_with = "u32_or_zero")]
    pub ball: u32,

    #[serde(default, deserialize_with = "u32_or_zero")]
    pub runs: u32,

    /// 1 when the delivery took a wicket
    #[serde(default, deserialize_with = "u32_or_zero")]
    pub wickets: u32,

    #[serde(default, deserialize_with = "string_or_empty")]
    pub batsman_name: String,

    #[serde(default, deserialize_with = "string_or_empty")]
    pub bowler_name: String,

    #[serde(default, deserialize_with = "string_or_empty")]
    pub extras: String,
}

impl Ball {
    pub fn new(over: u32, runs: u32, wickets: u32) -> Self {
        Self {
            over,
            runs,
            wickets,
            ..Self::default()
        }
    }

    /// Builder method to set the ball number within the over.
    pub fn with_ball(mut self, ball: u32) -> Self {
        self.ball = ball;
        self
    }

    /// Builder method to set the batter's name.
    pub fn with_batsman(mut self, name: &str) -> Self {
        self.batsman_name = name.to_string();
        self
    }
}

/// A normalized fixture.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    #[serde(default)]
    pub id: MatchId,

    #[serde(default)]
    pub status: MatchStatus,

    /// ISO-8601 start time, kept verbatim
    #[serde(default, deserialize_with = "string_or_empty")]
    pub date: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub teams: Teams,

    #[serde(default, deserialize_with = "null_as_default")]
    pub score: Scoreboard,

    #[serde(default, deserialize_with = "null_as_default")]
    pub result: MatchResult,

    #[serde(default, deserialize_with = "null_as_default")]
    pub league: League,

    #[serde(default)]
    pub man_of_match: Option<PlayerRef>,

    /// Per-innings batting cards, in scorecard order
    #[serde(default, deserialize_with = "null_as_default")]
    pub batting: Vec<Vec<BattingEntry>>,

    /// Per-innings bowling cards
    #[serde(default, deserialize_with = "null_as_default")]
    pub bowling: Vec<Vec<BowlingEntry>>,

    /// Deliveries with no innings discriminator
    #[serde(default, deserialize_with = "null_as_default")]
    pub balls: Vec<Ball>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub venue: Venue,

    #[serde(default, deserialize_with = "string_or_empty")]
    pub round: String,

    #[serde(default, rename = "type", deserialize_with = "string_or_empty")]
    pub match_type: String,

    #[serde(default, deserialize_with = "string_or_empty")]
    pub toss_winner: String,

    #[serde(default, deserialize_with = "string_or_empty")]
    pub toss_decision: String,
}

impl Match {
    /// Create a fixture between two teams with everything else defaulted.
    pub fn new(id: &str, status: MatchStatus, home: Team, away: Team) -> Self {
        Self {
            id: MatchId::from(id),
            status,
            teams: Teams { home, away },
            ..Self::default()
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    pub fn team(&self, side: Side) -> &Team {
        match side {
            Side::Home => &self.teams.home,
            Side::Away => &self.teams.away,
        }
    }

    pub fn score_of(&self, side: Side) -> &InningsScore {
        match side {
            Side::Home => &self.score.home,
            Side::Away => &self.score.away,
        }
    }

    /// Which side the given team occupies, if it plays in this match.
    pub fn side_of(&self, team_id: &TeamId) -> Option<Side> {
        if team_id.is_empty() {
            None
        } else if self.teams.home.id == *team_id {
            Some(Side::Home)
        } else if self.teams.away.id == *team_id {
            Some(Side::Away)
        } else {
            None
        }
    }

    pub fn involves(&self, team_id: &TeamId) -> bool {
        self.side_of(team_id).is_some()
    }

    /// Recorded winner, if any.
    pub fn winner(&self) -> Option<&TeamId> {
        let winner = &self.result.winner;
        (!winner.is_empty()).then_some(winner)
    }

    /// Side of the recorded winner, if it is one of the two teams.
    pub fn winning_side(&self) -> Option<Side> {
        self.winner().and_then(|w| self.side_of(w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(id: &str, name: &str, short: &str) -> Team {
        Team {
            id: TeamId::from(id),
            name: name.to_string(),
            short_name: short.to_string(),
            logo: String::new(),
        }
    }

    #[test]
    fn test_match_deserializes_normalized_shape() {
        let json = r#"{
            "id": "sm-101",
            "status": "completed",
            "date": "2024-04-02T14:00:00.000000Z",
            "teams": {
                "home": {"id": "1", "name": "Mumbai Indians", "shortName": "MI", "logo": ""},
                "away": {"id": "2", "name": "Chennai Super Kings", "shortName": "CSK", "logo": ""}
            },
            "score": {
                "home": {"runs": 180, "wickets": 4, "overs": 20},
                "away": {"runs": 182, "wickets": 6, "overs": 19.4}
            },
            "result": {"winner": "2", "margin": "Chennai won by 4 wickets", "method": ""},
            "league": {"id": "1", "name": "IPL", "season": "2024"},
            "manOfMatch": {"id": "99", "name": "R Jadeja"},
            "batting": [[{"playerId": "5", "playerName": "Rohit", "teamId": "1",
                          "runs": 45, "balls": 30, "strikeRate": "150.0", "out": true}]],
            "bowling": [[{"playerName": "Bumrah", "overs": 4, "runs": 28, "wickets": 2, "economy": "-"}]],
            "balls": [{"over": 0, "ball": 0, "runs": 4, "wickets": 0, "batsmanName": "Rohit"}],
            "type": "T20"
        }"#;

        let m: Match = serde_json::from_str(json).unwrap();
        assert!(m.is_completed());
        assert_eq!(m.teams.away.label("Team B"), "CSK");
        assert_eq!(m.score.away.runs, 182);
        assert!((m.score.away.overs - 19.4).abs() < 1e-9);
        assert_eq!(m.winning_side(), Some(Side::Away));
        assert_eq!(m.batting[0][0].strike_rate, Some(150.0));
        assert_eq!(m.bowling[0][0].economy, None);
        assert_eq!(m.balls[0].runs, 4);
        assert_eq!(m.match_type, "T20");
        assert_eq!(m.man_of_match.unwrap().name, "R Jadeja");
    }

    #[test]
    fn test_match_tolerates_missing_and_null_sections() {
        let json = r#"{"id": 7, "status": "Finished", "score": null, "result": {"winner": null}}"#;
        let m: Match = serde_json::from_str(json).unwrap();

        assert_eq!(m.id.as_str(), "7");
        assert_eq!(m.status, MatchStatus::Upcoming);
        assert_eq!(m.score.home.runs, 0);
        assert!(m.winner().is_none());
        assert!(m.balls.is_empty());
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(MatchStatus::from_label("completed"), MatchStatus::Completed);
        assert_eq!(MatchStatus::from_label("LIVE"), MatchStatus::Live);
        assert_eq!(MatchStatus::from_label("postponed"), MatchStatus::Upcoming);
        assert_eq!(
            serde_json::to_string(&MatchStatus::Completed).unwrap(),
            "\"completed\""
        );
    }

    #[test]
    fn test_team_label_fallbacks() {
        assert_eq!(team("1", "Mumbai Indians", "MI").label("Team A"), "MI");
        assert_eq!(team("1", "Mumbai Indians", "").label("Team A"), "Mumbai Indians");
        assert_eq!(team("1", "", "").label("Team A"), "Team A");
    }

    #[test]
    fn test_side_lookup() {
        let m = Match::new(
            "m1",
            MatchStatus::Completed,
            team("1", "Home", ""),
            team("2", "Away", ""),
        );

        assert_eq!(m.side_of(&TeamId::from("1")), Some(Side::Home));
        assert_eq!(m.side_of(&TeamId::from("2")), Some(Side::Away));
        assert_eq!(m.side_of(&TeamId::from("3")), None);
        assert_eq!(m.side_of(&TeamId::default()), None);
        assert_eq!(Side::Home.other(), Side::Away);
    }
}
