//! Derived insight models.
//!
//! Everything here is computed from a [`Match`]; none of it is persisted
//! independently of the record it describes.

use serde::{Deserialize, Serialize};

use super::Match;

/// Kind of result margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarginKind {
    Runs,
    Wickets,
    SuperOver,
    Tie,
}

impl std::fmt::Display for MarginKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarginKind::Runs => write!(f, "runs"),
            MarginKind::Wickets => write!(f, "wickets"),
            MarginKind::SuperOver => write!(f, "superOver"),
            MarginKind::Tie => write!(f, "tie"),
        }
    }
}

/// Structured result margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margin {
    #[serde(rename = "type")]
    pub kind: MarginKind,

    /// Runs or wickets; 0 for super overs and ties
    #[serde(default)]
    pub value: u32,
}

impl Margin {
    pub fn runs(value: u32) -> Self {
        Self {
            kind: MarginKind::Runs,
            value,
        }
    }

    pub fn wickets(value: u32) -> Self {
        Self {
            kind: MarginKind::Wickets,
            value,
        }
    }

    pub fn super_over() -> Self {
        Self {
            kind: MarginKind::SuperOver,
            value: 0,
        }
    }

    pub fn tie() -> Self {
        Self {
            kind: MarginKind::Tie,
            value: 0,
        }
    }
}

/// How a completed match finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum FinishType {
    #[default]
    Standard,
    CloseRuns,
    CloseWickets,
    BigWin,
    SuperOver,
    Tie,
}

impl FinishType {
    pub fn is_close(&self) -> bool {
        matches!(
            self,
            FinishType::CloseRuns | FinishType::CloseWickets | FinishType::SuperOver | FinishType::Tie
        )
    }
}

impl std::fmt::Display for FinishType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FinishType::Standard => write!(f, "standard"),
            FinishType::CloseRuns => write!(f, "closeRuns"),
            FinishType::CloseWickets => write!(f, "closeWickets"),
            FinishType::BigWin => write!(f, "bigWin"),
            FinishType::SuperOver => write!(f, "superOver"),
            FinishType::Tie => write!(f, "tie"),
        }
    }
}

/// Highlight chip shown on a match card. Serialized as its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Highlight {
    #[serde(rename = "Super Over")]
    SuperOver,
    #[serde(rename = "Tie")]
    Tie,
    #[serde(rename = "Close finish")]
    CloseFinish,
    #[serde(rename = "Successful chase")]
    SuccessfulChase,
    #[serde(rename = "Last over finish")]
    LastOverFinish,
    #[serde(rename = "High scoring")]
    HighScoring,
    #[serde(rename = "Low scoring")]
    LowScoring,
    #[serde(rename = "Upset")]
    Upset,
    #[serde(rename = "Dominant win")]
    DominantWin,
    #[serde(rename = "One-sided")]
    OneSided,
}

impl Highlight {
    pub fn label(&self) -> &'static str {
        match self {
            Highlight::SuperOver => "Super Over",
            Highlight::Tie => "Tie",
            Highlight::CloseFinish => "Close finish",
            Highlight::SuccessfulChase => "Successful chase",
            Highlight::LastOverFinish => "Last over finish",
            Highlight::HighScoring => "High scoring",
            Highlight::LowScoring => "Low scoring",
            Highlight::Upset => "Upset",
            Highlight::DominantWin => "Dominant win",
            Highlight::OneSided => "One-sided",
        }
    }
}

impl std::fmt::Display for Highlight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Filterable match tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tag {
    Close,
    HighScoring,
    LowScoring,
    Upset,
    Chase,
    SuperOver,
    Dominant,
}

impl Tag {
    pub const ALL: [Tag; 7] = [
        Tag::Close,
        Tag::HighScoring,
        Tag::LowScoring,
        Tag::Upset,
        Tag::Chase,
        Tag::SuperOver,
        Tag::Dominant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Close => "close",
            Tag::HighScoring => "high-scoring",
            Tag::LowScoring => "low-scoring",
            Tag::Upset => "upset",
            Tag::Chase => "chase",
            Tag::SuperOver => "super-over",
            Tag::Dominant => "dominant",
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Tag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Tag::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| format!("unknown tag: {}", s))
    }
}

/// Three-beat narrative of a match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub first_innings: String,
    pub turning_point: String,
    pub finish: String,
}

/// Runs and wickets in the first six overs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerplaySummary {
    pub runs: u32,
    pub wickets: u32,
    pub overs: u32,
}

/// Runs and wickets from over 16 onwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathOversSummary {
    pub runs: u32,
    pub wickets: u32,
    /// Window label, e.g. "16-20"
    pub overs: String,
}

/// A run of wickets falling close together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WicketCluster {
    pub wickets: u32,
    pub from_over: u32,
    pub to_over: u32,
    pub description: String,
}

/// Best combined score of two adjacent batters in a lineup.
///
/// This is a lineup-order approximation, not a crease partnership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partnership {
    pub runs: u32,
    pub player1: String,
    pub player2: String,
}

/// The single over with the greatest impact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurningPoint {
    pub over: u32,
    pub runs: u32,
    pub wickets: u32,
    pub description: String,
}

/// Key moments of a match; each piece is `None` when data is insufficient.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMoments {
    pub powerplay: Option<PowerplaySummary>,
    pub wicket_clusters: Vec<WicketCluster>,
    pub biggest_partnership: Option<Partnership>,
    pub death_overs: Option<DeathOversSummary>,
    pub turning_point: Option<TurningPoint>,
}

/// Numeric bundle used by the sort modes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortMetrics {
    /// Lower is closer. Wicket margins are scaled by 10 to rank against runs;
    /// 999 when the margin could not be read.
    pub closeness: u32,
    pub total_runs: u32,
    pub total_wickets: u32,
    pub highest_chase: u32,
    pub margin_value: u32,
    /// Margin kind name, empty when unknown
    pub margin_type: String,
}

/// All insights derived for a completed match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInsights {
    pub highlights: Vec<Highlight>,
    pub story: Story,
    pub finish_type: FinishType,
    pub tags: Vec<Tag>,
    pub sort_metrics: SortMetrics,
    pub key_moments: KeyMoments,
}

impl MatchInsights {
    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }
}

/// A match record with its insights attached (`None` unless completed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedMatch {
    #[serde(flatten)]
    pub record: Match,

    #[serde(default)]
    pub insights: Option<MatchInsights>,
}

impl AsRef<Match> for Match {
    fn as_ref(&self) -> &Match {
        self
    }
}

impl AsRef<Match> for AnalyzedMatch {
    fn as_ref(&self) -> &Match {
        &self.record
    }
}

/// Score at the fall of each wicket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallOfWicket {
    pub wicket_num: u32,
    pub over: u32,
    pub ball: u32,
    /// Cumulative runs when the wicket fell
    pub runs: u32,
    pub batsman_name: String,
}

/// Phase of an innings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Powerplay,
    Middle,
    Death,
}

/// Per-over aggregate for momentum charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverMomentum {
    pub over: u32,
    pub runs: u32,
    pub wickets: u32,
    pub phase: Phase,
}

/// Head-to-head record between two teams.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadToHead<'a, M> {
    pub total: u32,
    pub a_wins: u32,
    pub b_wins: u32,
    /// Meetings without a winner among the two teams
    pub draws: u32,
    pub avg_score_a: u32,
    pub avg_score_b: u32,
    /// Most recent meetings, newest first
    pub recent: Vec<&'a M>,
}
