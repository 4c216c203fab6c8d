//! Highlight chips, the three-beat story arc and the thirty-second summary.

use crate::models::{
    AnalyzedMatch, FinishType, Highlight, MarginKind, Match, StandingsRow, Story,
};

use super::classify::{
    classify_finish, is_high_scoring, is_low_scoring, is_upset, last_over_finish,
    was_successful_chase,
};
use super::margin::MarginSource;

/// Maximum number of chips shown per match.
pub const MAX_HIGHLIGHTS: usize = 3;
/// Wicket margin at which a chase is called one-sided.
pub const ONE_SIDED_WICKETS: u32 = 8;
/// Runs margin under which the story calls the chase a nail-biter.
const WIRE_RUN_MARGIN: u32 = 10;

const HOME_PLACEHOLDER: &str = "Team A";
const AWAY_PLACEHOLDER: &str = "Team B";

/// Highlight chips in priority order, capped at [`MAX_HIGHLIGHTS`].
pub fn generate_highlights(m: &Match, standings: &[StandingsRow]) -> Vec<Highlight> {
    let finish = classify_finish(m);
    let margin = m.margin();

    let candidates = [
        match finish {
            FinishType::SuperOver => Some(Highlight::SuperOver),
            FinishType::Tie => Some(Highlight::Tie),
            f if f.is_close() => Some(Highlight::CloseFinish),
            _ => None,
        },
        was_successful_chase(m).then_some(Highlight::SuccessfulChase),
        last_over_finish(m).then_some(Highlight::LastOverFinish),
        is_high_scoring(m).then_some(Highlight::HighScoring),
        is_low_scoring(m).then_some(Highlight::LowScoring),
        is_upset(m, standings).then_some(Highlight::Upset),
        (finish == FinishType::BigWin).then_some(Highlight::DominantWin),
        margin
            .filter(|mg| mg.kind == MarginKind::Wickets && mg.value >= ONE_SIDED_WICKETS)
            .map(|_| Highlight::OneSided),
    ];

    candidates
        .into_iter()
        .flatten()
        .take(MAX_HIGHLIGHTS)
        .collect()
}

/// First innings, turning point and finish, as short sentences.
pub fn generate_story(m: &Match) -> Story {
    let home = m.teams.home.label(HOME_PLACEHOLDER);
    let away = m.teams.away.label(AWAY_PLACEHOLDER);

    let first_innings = format!(
        "{} posted {}/{}",
        home, m.score.home.runs, m.score.home.wickets
    );

    let turning_point = match m.margin() {
        Some(mg) if mg.kind == MarginKind::Runs && mg.value <= WIRE_RUN_MARGIN => {
            "The chase went down to the wire".to_string()
        }
        Some(mg) if mg.kind == MarginKind::Wickets && mg.value <= 2 => {
            "Wickets fell in a cluster during the chase".to_string()
        }
        Some(mg) if mg.kind == MarginKind::SuperOver => {
            "Scores level, Super Over decided it".to_string()
        }
        _ if was_successful_chase(m) => format!("{} chased it down", away),
        _ => format!("{} defended their total", home),
    };

    Story {
        first_innings,
        turning_point,
        finish: m.result.margin.clone(),
    }
}

/// Up to three lines summarizing a completed, analyzed match.
///
/// Returns `None` for matches that are not completed or carry no insights.
pub fn summarize_for_thirty_seconds(analyzed: &AnalyzedMatch) -> Option<Vec<String>> {
    let m = &analyzed.record;
    if !m.is_completed() {
        return None;
    }
    let insights = analyzed.insights.as_ref()?;

    let home = m.teams.home.label(HOME_PLACEHOLDER);
    let away = m.teams.away.label(AWAY_PLACEHOLDER);
    let scores = format!(
        "{} posted {}/{}. {} replied with {}/{}.",
        home,
        m.score.home.runs,
        m.score.home.wickets,
        away,
        m.score.away.runs,
        m.score.away.wickets
    );

    let turning = if !insights.story.turning_point.is_empty() {
        insights.story.turning_point.clone()
    } else {
        insights
            .key_moments
            .turning_point
            .as_ref()
            .map(|tp| tp.description.clone())
            .unwrap_or_default()
    };

    let mut finish = m.result.margin.clone();
    if let Some(mom) = m.man_of_match.as_ref().filter(|p| !p.name.is_empty()) {
        if finish.is_empty() {
            finish = format!("MoM: {}", mom.name);
        } else {
            finish.push_str(&format!(" · MoM: {}", mom.name));
        }
    }

    Some(
        [scores, turning, finish]
            .into_iter()
            .filter(|line| !line.is_empty())
            .collect(),
    )
}
