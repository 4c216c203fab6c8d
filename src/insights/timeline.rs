//! Chart series derived from ball-by-ball data.

use crate::models::{Ball, FallOfWicket, OverMomentum, Phase};

use super::key_moments::{totals_by_over, DEATH_OVER_START, POWERPLAY_OVERS};

/// Phase an over belongs to.
pub fn phase_of(over: u32) -> Phase {
    if over < POWERPLAY_OVERS {
        Phase::Powerplay
    } else if over >= DEATH_OVER_START {
        Phase::Death
    } else {
        Phase::Middle
    }
}

/// One entry per wicket-taking delivery, with the running total at the time.
///
/// Deliveries are ordered by `(over, ball)`; ties keep input order.
pub fn compute_fall_of_wickets(balls: &[Ball]) -> Vec<FallOfWicket> {
    let mut sorted: Vec<&Ball> = balls.iter().collect();
    sorted.sort_by_key(|b| (b.over, b.ball));

    let mut total_runs = 0u32;
    let mut fallen = Vec::new();
    for b in sorted {
        total_runs = total_runs.saturating_add(b.runs);
        if b.wickets > 0 {
            fallen.push(FallOfWicket {
                wicket_num: fallen.len() as u32 + 1,
                over: b.over,
                ball: b.ball,
                runs: total_runs,
                batsman_name: b.batsman_name.clone(),
            });
        }
    }
    fallen
}

/// Runs and wickets per over, ascending, tagged with the innings phase.
pub fn compute_momentum_data(balls: &[Ball]) -> Vec<OverMomentum> {
    totals_by_over(balls)
        .into_iter()
        .map(|(over, totals)| OverMomentum {
            over,
            runs: totals.runs,
            wickets: totals.wickets,
            phase: phase_of(over),
        })
        .collect()
}
