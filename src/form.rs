//! Raw form input and its bounds.
//!
//! The deriver trusts whatever it is given, so the limits a user can enter
//! live here: overs in [0, 20], wickets in [0, 10], non-negative whole runs.

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::cricket::{ChartKind, City, MatchState, Team, UnknownName};

const MAX_OVERS: f64 = 20.0;
const MAX_WICKETS: f64 = 10.0;

#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error(transparent)]
    UnknownName(#[from] UnknownName),
    #[error("{field} must be a whole number of runs ≥ 0, got {value}")]
    Runs { field: &'static str, value: f64 },
    #[error("overs must be between 0 and 20, got {0}")]
    Overs(f64),
    #[error("wickets must be a whole number between 0 and 10, got {0}")]
    Wickets(f64),
}

/// One submission of the prediction form, as typed by the user.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchInput {
    pub batting_team: String,
    pub bowling_team: String,
    pub city: String,
    pub target: f64,
    pub score: f64,
    pub overs: f64,
    pub wickets: f64,
    #[serde(default)]
    pub chart: Option<ChartKind>,
}

impl MatchInput {
    pub fn validate(&self) -> Result<MatchState, InputError> {
        let batting_team: Team = self.batting_team.parse()?;
        let bowling_team: Team = self.bowling_team.parse()?;
        let city: City = self.city.parse()?;

        let target = whole_runs("target", self.target)?;
        let score = whole_runs("score", self.score)?;

        if !(0.0..=MAX_OVERS).contains(&self.overs) {
            return Err(InputError::Overs(self.overs));
        }
        if !(0.0..=MAX_WICKETS).contains(&self.wickets) || self.wickets.fract() != 0.0 {
            return Err(InputError::Wickets(self.wickets));
        }

        if batting_team == bowling_team {
            warn!("Batting and bowling team are both {}", batting_team);
        }

        Ok(MatchState {
            batting_team,
            bowling_team,
            city,
            target,
            score,
            overs_completed: self.overs,
            wickets_lost: self.wickets as u8,
        })
    }
}

fn whole_runs(field: &'static str, value: f64) -> Result<u32, InputError> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX) {
        Ok(value as u32)
    } else {
        Err(InputError::Runs { field, value })
    }
}
