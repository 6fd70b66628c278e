use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write;
use thiserror::Error;
use tracing::info;

use crate::classifier::{Classifier, ClassifierError, PredictionResult};
use crate::cricket::{derive_features, Chart, ChartKind, DeriveError, FeatureRecord, MatchState, ProbabilityDisplay, RatePolicy};

#[derive(Debug, Error)]
pub enum PredictError {
    #[error(transparent)]
    Derive(#[from] DeriveError),
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}

/// Everything shown for one press of "predict".
#[derive(Debug, Clone, Serialize)]
pub struct PredictionReport {
    pub match_state: MatchState,
    pub features: FeatureRecord,
    pub prediction: PredictionResult,
    pub display: ProbabilityDisplay,
    pub chart: Chart,
    pub predicted_at: DateTime<Utc>,
}

/// Derive features, score them and assemble the display.
///
/// The classifier handle is borrowed: it was built once at startup and is
/// shared by every request.
pub async fn run_prediction(
    classifier: &dyn Classifier,
    state: &MatchState,
    policy: RatePolicy,
    chart: ChartKind,
) -> Result<PredictionReport, PredictError> {
    let features = derive_features(state, policy)?;
    let prediction = classifier.predict_proba(&features).await?;
    let odds = ProbabilityDisplay::new(
        state.batting_team,
        state.bowling_team,
        prediction.loss_prob,
        prediction.win_prob,
    );

    info!(
        "{} vs {} at {}: {}/{} after {} ov chasing {} → win {}%",
        state.batting_team,
        state.bowling_team,
        state.city,
        state.score,
        state.wickets_lost,
        state.overs_completed,
        state.target,
        odds.batting.percent
    );

    Ok(PredictionReport {
        match_state: *state,
        chart: Chart::build(chart, state, &features),
        features,
        prediction,
        display: odds,
        predicted_at: Utc::now(),
    })
}

/// Widest bar drawn by the text renderer.
const MAX_BAR: usize = 50;

/// Plain-text rendering for the terminal.
pub fn render_text(report: &PredictionReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", report.display.batting.header());
    let _ = writeln!(out, "{}", report.display.bowling.header());
    let _ = writeln!(out);

    match &report.chart {
        Chart::Projection(chart) => {
            let _ = writeln!(out, "{}", chart.title);
            let _ = writeln!(out, "{:>5}  {:>7}", chart.x_label, chart.y_label);
            for p in &chart.series.points {
                let _ = writeln!(out, "{:>5}  {:>7.1}", p.over, p.runs);
            }
        }
        Chart::RunRate(cmp) => {
            let _ = writeln!(out, "{}", cmp.title);
            for bar in &cmp.bars {
                let width = (bar.runs.max(0.0).round() as usize).min(MAX_BAR);
                let _ = writeln!(out, "{:<18} {:>6.2} {}", bar.label, bar.runs, "█".repeat(width));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::tests::{DownClassifier, StubClassifier};
    use crate::cricket::{City, Team};

    fn state() -> MatchState {
        MatchState {
            batting_team: Team::MumbaiIndians,
            bowling_team: Team::ChennaiSuperKings,
            city: City::Mumbai,
            target: 180,
            score: 90,
            overs_completed: 10.0,
            wickets_lost: 3,
        }
    }

    #[tokio::test]
    async fn report_pairs_win_with_batting_side() {
        let stub = StubClassifier { win_prob: 0.75 };
        let report = run_prediction(&stub, &state(), RatePolicy::Guarded, ChartKind::Projection)
            .await
            .unwrap();
        assert_eq!(report.features.runs_left, 90);
        assert_eq!(report.display.batting.percent, 75);
        assert_eq!(report.display.bowling.percent, 25);
        assert!(matches!(report.chart, Chart::Projection(_)));
    }

    #[tokio::test]
    async fn report_logs_and_keeps_odds_for_both_sides() {
        let stub = StubClassifier { win_prob: 0.25 };
        let report = run_prediction(&stub, &state(), RatePolicy::Guarded, ChartKind::RunRate)
            .await
            .unwrap();
        assert_eq!(report.display.batting.team, Team::MumbaiIndians);
        assert_eq!(report.display.batting.percent, 25);
        assert_eq!(report.display.bowling.team, Team::ChennaiSuperKings);
        assert_eq!(report.display.bowling.percent, 75);
    }

    #[tokio::test]
    async fn strict_policy_fails_before_scoring() {
        let mut s = state();
        s.overs_completed = 0.0;
        let err = run_prediction(&DownClassifier, &s, RatePolicy::Strict, ChartKind::Projection)
            .await
            .unwrap_err();
        assert!(matches!(err, PredictError::Derive(DeriveError::NoOversBowled { .. })));
    }

    #[tokio::test]
    async fn classifier_failure_is_surfaced() {
        let err = run_prediction(&DownClassifier, &state(), RatePolicy::Guarded, ChartKind::RunRate)
            .await
            .unwrap_err();
        assert!(matches!(err, PredictError::Classifier(ClassifierError::Unavailable(_))));
    }

    #[tokio::test]
    async fn text_report_projection() {
        let stub = StubClassifier { win_prob: 0.5 };
        let report = run_prediction(&stub, &state(), RatePolicy::Guarded, ChartKind::Projection)
            .await
            .unwrap();
        let text = render_text(&report);
        assert!(text.starts_with("Mumbai Indians - 50%\nChennai Super Kings - 50%\n"));
        assert!(text.contains("Expected Runs vs Overs"));
        // over 10: 90 + 9 × 2 = 108
        assert!(text.contains("   10    108.0"), "{}", text);
        assert!(text.contains("   20    211.5"), "{}", text);
    }

    #[tokio::test]
    async fn text_report_run_rate() {
        let stub = StubClassifier { win_prob: 0.5 };
        let report = run_prediction(&stub, &state(), RatePolicy::Guarded, ChartKind::RunRate)
            .await
            .unwrap();
        let text = render_text(&report);
        assert!(text.contains("Run Rate Comparison"));
        assert!(text.contains("Current Run Rate     9.00 █████████"), "{}", text);
    }
}
