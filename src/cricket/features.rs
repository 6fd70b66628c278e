//! Match state → classifier feature row.
//!
//! A T20 chase has 120 legal deliveries and 10 wickets. Everything the model
//! sees is derived from those two constants plus the user's inputs:
//!
//! ```text
//! runs_left    = target − score
//! balls_left   = 120 − floor(overs × 6)
//! wickets      = 10 − wickets_lost
//! cur_run_rate = score / overs
//! req_run_rate = runs_left × 6 / balls_left
//! ```
//!
//! `overs × 6` is floored, never rounded: 4.1 and 4.15 both map to 24 balls
//! bowled. Nothing is clamped, so a chase that is already won yields a
//! negative `runs_left`.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::match_state::{City, MatchState, Team};

pub const BALLS_PER_INNINGS: i64 = 120;
pub const BALLS_PER_OVER: f64 = 6.0;
pub const WICKETS_PER_INNINGS: i32 = 10;

/// Column names of the feature row, in the order the classifier was fitted on.
pub const FEATURE_COLUMNS: [&str; 9] = [
    "batting_team",
    "bowling_team",
    "city",
    "runs_left",
    "balls_left",
    "wickets",
    "total_runs_x",
    "cur_run_rate",
    "req_run_rate",
];

/// How the two run-rate divisions behave when their denominator is not
/// positive. One policy always governs both rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RatePolicy {
    /// Substitute 0.0 for the rate.
    #[default]
    Guarded,
    /// Refuse to derive a record.
    Strict,
}

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum DeriveError {
    #[error("current run rate undefined: {overs} overs bowled")]
    NoOversBowled { overs: f64 },
    #[error("required run rate undefined: {balls_left} balls left")]
    NoBallsLeft { balls_left: i64 },
}

/// The single row handed to the classifier. Field names serialize to the
/// exact column names in [`FEATURE_COLUMNS`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureRecord {
    pub batting_team: Team,
    pub bowling_team: Team,
    pub city: City,
    pub runs_left: i64,
    pub balls_left: i64,
    /// Wickets in hand.
    #[serde(rename = "wickets")]
    pub wickets_left: i32,
    /// The chase target.
    #[serde(rename = "total_runs_x")]
    pub target: u32,
    #[serde(rename = "cur_run_rate")]
    pub current_run_rate: f64,
    #[serde(rename = "req_run_rate")]
    pub required_run_rate: f64,
}

impl FeatureRecord {
    /// Label of a categorical column, `None` for numeric or unknown columns.
    pub fn categorical(&self, column: &str) -> Option<&'static str> {
        match column {
            "batting_team" => Some(self.batting_team.name()),
            "bowling_team" => Some(self.bowling_team.name()),
            "city" => Some(self.city.name()),
            _ => None,
        }
    }

    /// Value of a numeric column, `None` for categorical or unknown columns.
    pub fn numeric(&self, column: &str) -> Option<f64> {
        match column {
            "runs_left" => Some(self.runs_left as f64),
            "balls_left" => Some(self.balls_left as f64),
            "wickets" => Some(self.wickets_left as f64),
            "total_runs_x" => Some(self.target as f64),
            "cur_run_rate" => Some(self.current_run_rate),
            "req_run_rate" => Some(self.required_run_rate),
            _ => None,
        }
    }
}

/// Derive the classifier row for `state` under `policy`.
pub fn derive_features(state: &MatchState, policy: RatePolicy) -> Result<FeatureRecord, DeriveError> {
    let runs_left = i64::from(state.target) - i64::from(state.score);
    let balls_bowled = (state.overs_completed * BALLS_PER_OVER).floor() as i64;
    let balls_left = BALLS_PER_INNINGS - balls_bowled;
    let wickets_left = WICKETS_PER_INNINGS - i32::from(state.wickets_lost);

    let current_run_rate = if state.overs_completed > 0.0 {
        f64::from(state.score) / state.overs_completed
    } else {
        match policy {
            RatePolicy::Guarded => 0.0,
            RatePolicy::Strict => {
                return Err(DeriveError::NoOversBowled {
                    overs: state.overs_completed,
                })
            }
        }
    };

    let required_run_rate = if balls_left > 0 {
        (runs_left as f64 * BALLS_PER_OVER) / balls_left as f64
    } else {
        match policy {
            RatePolicy::Guarded => 0.0,
            RatePolicy::Strict => return Err(DeriveError::NoBallsLeft { balls_left }),
        }
    };

    Ok(FeatureRecord {
        batting_team: state.batting_team,
        bowling_team: state.bowling_team,
        city: state.city,
        runs_left,
        balls_left,
        wickets_left,
        target: state.target,
        current_run_rate,
        required_run_rate,
    })
}
