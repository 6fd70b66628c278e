//! Formatting of classifier output and selection of the chart variant.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::features::FeatureRecord;
use super::match_state::{MatchState, Team};
use super::projection::{project_runs, ProjectionChart, RunRateComparison};

/// Probability → whole percent, ties to even.
///
/// Each side is rounded on its own, so 0.505 / 0.495 displays as 50% / 50%
/// and 0.125 / 0.875 as 12% / 88%. The pair is not forced to sum to 100.
pub fn whole_percent(probability: f64) -> i64 {
    (probability * 100.0).round_ties_even() as i64
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamOdds {
    pub team: Team,
    pub probability: f64,
    pub percent: i64,
}

impl TeamOdds {
    fn new(team: Team, probability: f64) -> Self {
        TeamOdds {
            team,
            probability,
            percent: whole_percent(probability),
        }
    }

    /// e.g. `"Mumbai Indians - 62%"`
    pub fn header(&self) -> String {
        format!("{} - {}%", self.team, self.percent)
    }
}

/// Batting side paired with the win probability, bowling side with the loss
/// probability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityDisplay {
    pub batting: TeamOdds,
    pub bowling: TeamOdds,
}

impl ProbabilityDisplay {
    pub fn new(batting_team: Team, bowling_team: Team, loss_prob: f64, win_prob: f64) -> Self {
        ProbabilityDisplay {
            batting: TeamOdds::new(batting_team, win_prob),
            bowling: TeamOdds::new(bowling_team, loss_prob),
        }
    }
}

// ── Chart selection ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    /// Projected runs per two-over step.
    #[default]
    Projection,
    /// Current vs required run rate.
    RunRate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Chart {
    Projection(ProjectionChart),
    RunRate(RunRateComparison),
}

impl Chart {
    pub fn build(kind: ChartKind, state: &MatchState, features: &FeatureRecord) -> Self {
        match kind {
            ChartKind::Projection => Chart::Projection(ProjectionChart::new(project_runs(
                f64::from(state.score),
                features.current_run_rate,
                state.overs_completed,
            ))),
            ChartKind::RunRate => Chart::RunRate(RunRateComparison::new(
                features.current_run_rate,
                features.required_run_rate,
            )),
        }
    }
}
