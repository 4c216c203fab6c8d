//! Ball-by-ball key moment detection.
//!
//! Deliveries carry no innings discriminator, so every analysis here runs
//! over whatever slice the caller hands in (normally the whole match).

use std::collections::BTreeMap;

use crate::models::{
    Ball, BattingEntry, DeathOversSummary, KeyMoments, Match, Partnership, PowerplaySummary,
    TurningPoint, WicketCluster,
};

/// Overs `0..POWERPLAY_OVERS` form the powerplay.
pub const POWERPLAY_OVERS: u32 = 6;
/// Overs from this one onwards are the death overs.
pub const DEATH_OVER_START: u32 = 16;
/// Maximum over gap between successive wickets in one cluster.
pub const CLUSTER_OVER_GAP: u32 = 2;
/// Smallest reported cluster.
pub const MIN_CLUSTER_WICKETS: usize = 2;

const WICKET_IMPACT: u32 = 15;
const BIG_OVER_RUNS: u32 = 15;
const QUIET_OVER_RUNS: u32 = 2;
const QUIET_OVER_IMPACT: u32 = 5;

/// Runs and wickets for one over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverTotals {
    pub runs: u32,
    pub wickets: u32,
}

/// Per-over totals in ascending over order.
pub fn totals_by_over(balls: &[Ball]) -> BTreeMap<u32, OverTotals> {
    let mut by_over: BTreeMap<u32, OverTotals> = BTreeMap::new();
    for b in balls {
        let totals = by_over.entry(b.over).or_default();
        totals.runs = totals.runs.saturating_add(b.runs);
        totals.wickets = totals.wickets.saturating_add(b.wickets);
    }
    by_over
}

fn sum_where(balls: &[Ball], keep: impl Fn(&Ball) -> bool) -> Option<OverTotals> {
    let mut matched = false;
    let mut totals = OverTotals::default();
    for b in balls.iter().filter(|b| keep(b)) {
        matched = true;
        totals.runs = totals.runs.saturating_add(b.runs);
        totals.wickets = totals.wickets.saturating_add(b.wickets);
    }
    matched.then_some(totals)
}

/// Powerplay runs and wickets. `None` only when there are no deliveries at
/// all; a delivery list with nothing in the first six overs scores 0/0.
pub fn powerplay_score(balls: &[Ball]) -> Option<PowerplaySummary> {
    if balls.is_empty() {
        return None;
    }
    let totals = sum_where(balls, |b| b.over < POWERPLAY_OVERS).unwrap_or_default();
    Some(PowerplaySummary {
        runs: totals.runs,
        wickets: totals.wickets,
        overs: POWERPLAY_OVERS,
    })
}

/// Groups of wickets falling within [`CLUSTER_OVER_GAP`] overs of each other.
///
/// Wickets are taken in delivery order as given, not re-sorted.
pub fn wicket_clusters(balls: &[Ball]) -> Vec<WicketCluster> {
    let wickets: Vec<u32> = balls.iter().filter(|b| b.wickets > 0).map(|b| b.over).collect();
    if wickets.len() < MIN_CLUSTER_WICKETS {
        return Vec::new();
    }

    let mut groups: Vec<&[u32]> = Vec::new();
    let mut start = 0;
    for i in 1..wickets.len() {
        let gap = i64::from(wickets[i]) - i64::from(wickets[i - 1]);
        if gap > i64::from(CLUSTER_OVER_GAP) {
            groups.push(&wickets[start..i]);
            start = i;
        }
    }
    groups.push(&wickets[start..]);

    groups
        .into_iter()
        .filter(|g| g.len() >= MIN_CLUSTER_WICKETS)
        .map(|g| {
            let from_over = g[0];
            let to_over = g[g.len() - 1];
            WicketCluster {
                wickets: g.len() as u32,
                from_over,
                to_over,
                description: format!("{} wickets in overs {}-{}", g.len(), from_over, to_over),
            }
        })
        .collect()
}

/// Largest combined score of two batters adjacent in a lineup, across all
/// innings. The first maximum found wins ties.
pub fn biggest_partnership(batting: &[Vec<BattingEntry>]) -> Option<Partnership> {
    let mut best: Option<Partnership> = None;
    for pair in batting.iter().flat_map(|innings| innings.windows(2)) {
        let runs = pair[0].runs.saturating_add(pair[1].runs);
        if best.as_ref().map_or(true, |b| runs > b.runs) {
            best = Some(Partnership {
                runs,
                player1: pair[0].player_name.clone(),
                player2: pair[1].player_name.clone(),
            });
        }
    }
    best
}

/// Death-overs runs and wickets; `None` when no delivery reached over 16.
pub fn death_overs_score(balls: &[Ball]) -> Option<DeathOversSummary> {
    let totals = sum_where(balls, |b| b.over >= DEATH_OVER_START)?;
    Some(DeathOversSummary {
        runs: totals.runs,
        wickets: totals.wickets,
        overs: format!("{}-20", DEATH_OVER_START),
    })
}

/// Impact score of a single over: wickets weigh heaviest, then big overs,
/// with a small bonus for a quiet over that built pressure.
pub fn over_impact(totals: OverTotals) -> u32 {
    let mut impact = totals.wickets.saturating_mul(WICKET_IMPACT);
    if totals.runs >= BIG_OVER_RUNS {
        impact = impact.saturating_add(totals.runs);
    }
    if totals.runs <= QUIET_OVER_RUNS && totals.wickets == 0 {
        impact = impact.saturating_add(QUIET_OVER_IMPACT);
    }
    impact
}

/// The over with the strictly highest impact; the earliest over wins ties.
pub fn turning_point_over(balls: &[Ball]) -> Option<TurningPoint> {
    let mut best: Option<(u32, u32, OverTotals)> = None;
    for (over, totals) in totals_by_over(balls) {
        let impact = over_impact(totals);
        let best_impact = best.map_or(0, |(_, i, _)| i);
        if impact > best_impact {
            best = Some((over, impact, totals));
        }
    }

    best.map(|(over, _, t)| TurningPoint {
        over,
        runs: t.runs,
        wickets: t.wickets,
        description: describe_turning_point(over, t),
    })
}

fn describe_turning_point(over: u32, t: OverTotals) -> String {
    if t.wickets > 0 {
        format!(
            "Over {}: {} wicket{} and {} runs, momentum shifted",
            over,
            t.wickets,
            if t.wickets > 1 { "s" } else { "" },
            t.runs
        )
    } else {
        format!("Over {}: {} runs scored, big over changed the game", over, t.runs)
    }
}

/// All key moments for a match.
pub fn generate_key_moments(m: &Match) -> KeyMoments {
    KeyMoments {
        powerplay: powerplay_score(&m.balls),
        wicket_clusters: wicket_clusters(&m.balls),
        biggest_partnership: biggest_partnership(&m.batting),
        death_overs: death_overs_score(&m.balls),
        turning_point: turning_point_over(&m.balls),
    }
}
