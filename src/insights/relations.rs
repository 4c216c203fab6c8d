//! Cross-match relationships: related-match ranking and head-to-head records.

use crate::models::{HeadToHead, Match, TeamId};

use super::classify::classify_finish;

/// Default number of related matches returned.
pub const DEFAULT_RELATED_LIMIT: usize = 6;
/// Number of recent meetings kept in a head-to-head record.
pub const RECENT_MEETINGS: usize = 5;

const SAME_FIXTURE_SCORE: u32 = 50;
const SHARED_TEAM_SCORE: u32 = 20;
const SAME_SEASON_SCORE: u32 = 15;
const SAME_LEAGUE_SCORE: u32 = 10;
const SAME_FINISH_SCORE: u32 = 10;

/// Similarity of `candidate` to `target`; 0 means unrelated.
pub fn relatedness(target: &Match, candidate: &Match) -> u32 {
    let (t_home, t_away) = (&target.teams.home.id, &target.teams.away.id);
    let (c_home, c_away) = (&candidate.teams.home.id, &candidate.teams.away.id);

    let same_home = c_home == t_home;
    let same_away = c_away == t_away;
    let home_is_their_away = c_home == t_away;
    let away_is_their_home = c_away == t_home;

    let mut score = 0;
    if (same_home && same_away) || (home_is_their_away && away_is_their_home) {
        score += SAME_FIXTURE_SCORE;
    } else if same_home || same_away || home_is_their_away || away_is_their_home {
        score += SHARED_TEAM_SCORE;
    }

    if candidate.league.season == target.league.season {
        score += SAME_SEASON_SCORE;
    }
    if candidate.league.id == target.league.id {
        score += SAME_LEAGUE_SCORE;
    }
    // Finish type only exists for completed matches.
    if target.is_completed() && classify_finish(candidate) == classify_finish(target) {
        score += SAME_FINISH_SCORE;
    }
    score
}

/// Completed matches from `pool` most similar to `target`, best first.
///
/// The target itself is never returned. Equal scores keep pool order.
pub fn find_related_matches<'a, M: AsRef<Match>>(
    target: &Match,
    pool: &'a [M],
    limit: usize,
) -> Vec<&'a M> {
    let mut scored: Vec<(u32, &'a M)> = pool
        .iter()
        .filter(|m| {
            let m: &Match = (*m).as_ref();
            m.id != target.id && m.is_completed()
        })
        .map(|m| (relatedness(target, m.as_ref()), m))
        .filter(|(score, _)| *score > 0)
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().take(limit).map(|(_, m)| m).collect()
}

/// Head-to-head record of `team_a` against `team_b` over completed meetings.
///
/// Runs are attributed by which side of each fixture a team occupied.
/// `matches` is expected oldest first; `recent` is returned newest first.
pub fn compute_head_to_head<'a, M: AsRef<Match>>(
    team_a: &TeamId,
    team_b: &TeamId,
    matches: &'a [M],
) -> HeadToHead<'a, M> {
    compute_head_to_head_with_recent(team_a, team_b, matches, RECENT_MEETINGS)
}

/// [`compute_head_to_head`] keeping `recent_limit` recent meetings.
pub fn compute_head_to_head_with_recent<'a, M: AsRef<Match>>(
    team_a: &TeamId,
    team_b: &TeamId,
    matches: &'a [M],
    recent_limit: usize,
) -> HeadToHead<'a, M> {
    let meetings: Vec<&'a M> = matches
        .iter()
        .filter(|m| {
            let m: &Match = (*m).as_ref();
            m.is_completed() && m.involves(team_a) && m.involves(team_b)
        })
        .collect();

    let mut a_wins = 0u32;
    let mut b_wins = 0u32;
    let mut total_a = 0u64;
    let mut total_b = 0u64;

    for m in meetings.iter().map(|m| -> &Match { (*m).as_ref() }) {
        match m.winner() {
            Some(w) if w == team_a => a_wins += 1,
            Some(w) if w == team_b => b_wins += 1,
            _ => {}
        }

        let a_is_home = m.teams.home.id == *team_a;
        let (a_runs, b_runs) = if a_is_home {
            (m.score.home.runs, m.score.away.runs)
        } else {
            (m.score.away.runs, m.score.home.runs)
        };
        total_a += u64::from(a_runs);
        total_b += u64::from(b_runs);
    }

    let total = meetings.len() as u32;
    let average = |sum: u64| -> u32 {
        if total == 0 {
            0
        } else {
            (sum as f64 / f64::from(total)).round() as u32
        }
    };

    let skip = meetings.len().saturating_sub(recent_limit);
    let recent: Vec<&'a M> = meetings[skip..].iter().rev().copied().collect();

    HeadToHead {
        total,
        a_wins,
        b_wins,
        draws: total - a_wins - b_wins,
        avg_score_a: average(total_a),
        avg_score_b: average(total_b),
        recent,
    }
}
