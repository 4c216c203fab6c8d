//! Classification primitives over a single completed match.

use crate::models::{position_of, FinishType, MarginKind, Match, Side, StandingsRow};

use super::margin::MarginSource;

/// Either team reaching this total makes a high-scoring match.
pub const HIGH_TOTAL: u32 = 180;
/// Both teams at or below this total makes a low-scoring match.
pub const LOW_TOTAL: u32 = 120;
pub const CLOSE_RUN_MARGIN: u32 = 15;
pub const CLOSE_WICKET_MARGIN: u32 = 2;
pub const BIG_WIN_RUN_MARGIN: u32 = 50;
/// Minimum table-position gap for a win to count as an upset.
pub const UPSET_POSITION_GAP: u32 = 2;
/// Chasing side overs at which a win counts as a last-over finish (T20).
pub const LAST_OVER_THRESHOLD: f64 = 19.0;

/// Classify how the match finished from its margin.
pub fn classify_finish(m: &Match) -> FinishType {
    let Some(margin) = m.margin() else {
        return FinishType::Standard;
    };
    match margin.kind {
        MarginKind::SuperOver => FinishType::SuperOver,
        MarginKind::Tie => FinishType::Tie,
        MarginKind::Runs if margin.value <= CLOSE_RUN_MARGIN => FinishType::CloseRuns,
        MarginKind::Wickets if margin.value <= CLOSE_WICKET_MARGIN => FinishType::CloseWickets,
        MarginKind::Runs if margin.value > BIG_WIN_RUN_MARGIN => FinishType::BigWin,
        _ => FinishType::Standard,
    }
}

pub fn is_close_match(m: &Match) -> bool {
    classify_finish(m).is_close()
}

pub fn is_high_scoring(m: &Match) -> bool {
    m.score.home.runs >= HIGH_TOTAL || m.score.away.runs >= HIGH_TOTAL
}

/// Both totals at or below [`LOW_TOTAL`], with the lower total above zero so
/// an unplayed innings on either side does not count.
pub fn is_low_scoring(m: &Match) -> bool {
    let home = m.score.home.runs;
    let away = m.score.away.runs;
    home <= LOW_TOTAL && away <= LOW_TOTAL && home.min(away) > 0
}

/// The winner sat more than [`UPSET_POSITION_GAP`] places below the loser.
///
/// False without standings, without a winner, or when either team has no
/// resolvable table position.
pub fn is_upset(m: &Match, standings: &[StandingsRow]) -> bool {
    if standings.is_empty() {
        return false;
    }
    let Some(winner) = m.winner() else {
        return false;
    };
    let (Some(home_pos), Some(away_pos)) = (
        position_of(standings, &m.teams.home.id),
        position_of(standings, &m.teams.away.id),
    ) else {
        return false;
    };
    let (winner_pos, loser_pos) = if *winner == m.teams.home.id {
        (home_pos, away_pos)
    } else {
        (away_pos, home_pos)
    };
    winner_pos > loser_pos.saturating_add(UPSET_POSITION_GAP)
}

/// Best-effort guess at which side batted first.
///
/// Needs overs recorded for both sides; then it is home when home scored,
/// otherwise away. Interrupted matches and incomplete run data can fool it.
pub fn batting_first(m: &Match) -> Option<Side> {
    if m.score.home.overs > 0.0 && m.score.away.overs > 0.0 {
        if m.score.home.runs > 0 {
            Some(Side::Home)
        } else {
            Some(Side::Away)
        }
    } else {
        None
    }
}

/// Side that batted second, per [`batting_first`].
pub fn chasing_side(m: &Match) -> Option<Side> {
    batting_first(m).map(Side::other)
}

pub fn was_successful_chase(m: &Match) -> bool {
    let Some(winner) = m.winner() else {
        return false;
    };
    chasing_side(m).is_some_and(|side| m.team(side).id == *winner)
}

/// A successful chase completed in the final over.
pub fn last_over_finish(m: &Match) -> bool {
    if !was_successful_chase(m) {
        return false;
    }
    chasing_side(m).is_some_and(|side| m.score_of(side).overs >= LAST_OVER_THRESHOLD)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::{InningsScore, Match, MatchStatus, StandingsRow, Team, TeamId};

    pub fn team(id: &str, name: &str) -> Team {
        Team {
            id: TeamId::from(id),
            name: name.to_string(),
            short_name: String::new(),
            logo: String::new(),
        }
    }

    /// Completed home-vs-away match with the given totals and margin text.
    pub fn completed(
        id: &str,
        home: InningsScore,
        away: InningsScore,
        winner: &str,
        margin: &str,
    ) -> Match {
        let mut m = Match::new(id, MatchStatus::Completed, team("H", "Home XI"), team("A", "Away XI"));
        m.score.home = home;
        m.score.away = away;
        m.result.winner = TeamId::from(winner);
        m.result.margin = margin.to_string();
        m
    }

    /// Home 180/4 (20), away 182/6 (19.4), away won by 4 wickets.
    pub fn chase_scenario() -> Match {
        completed(
            "e2e",
            InningsScore::new(180, 4, 20.0),
            InningsScore::new(182, 6, 19.4),
            "A",
            "4 wickets",
        )
    }

    /// Away ranked 7th, home ranked 1st.
    pub fn table() -> Vec<StandingsRow> {
        vec![StandingsRow::new("H", "Home XI", 1), StandingsRow::new("A", "Away XI", 7)]
    }

    pub fn with_margin(margin: &str) -> Match {
        completed("m", InningsScore::default(), InningsScore::default(), "", margin)
    }
}
