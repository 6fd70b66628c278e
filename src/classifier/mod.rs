pub mod pipeline;
pub mod remote;

pub use pipeline::LogisticPipeline;
pub use remote::RemoteClassifier;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::cricket::FeatureRecord;

/// Rows may drift from 1.0 by float error, never by more than this.
const SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier unavailable: {0}")]
    Unavailable(String),

    #[error("classifier request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("classifier schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("invalid classifier artifact: {0}")]
    InvalidArtifact(String),

    #[error("failed to read classifier artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode classifier payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Two-class probability row, interpreted as `[loss, win]` for the batting
/// side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    pub loss_prob: f64,
    pub win_prob: f64,
}

impl PredictionResult {
    /// Interpret one `predict_proba` row. Index 0 is loss, index 1 is win.
    pub fn from_row(row: &[f64]) -> Result<Self, ClassifierError> {
        let [loss_prob, win_prob] = row else {
            return Err(ClassifierError::SchemaMismatch(format!(
                "expected 2 class probabilities, got {}",
                row.len()
            )));
        };
        for p in [*loss_prob, *win_prob] {
            if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                return Err(ClassifierError::SchemaMismatch(format!(
                    "probability {} outside [0, 1]",
                    p
                )));
            }
        }
        if ((loss_prob + win_prob) - 1.0).abs() > SUM_TOLERANCE {
            return Err(ClassifierError::SchemaMismatch(format!(
                "class probabilities sum to {}, not 1",
                loss_prob + win_prob
            )));
        }
        Ok(PredictionResult {
            loss_prob: *loss_prob,
            win_prob: *win_prob,
        })
    }
}

/// A pre-trained win/loss classifier. Implementations are read-only once
/// built and shared across requests.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Class probabilities for a single feature row.
    async fn predict_proba(&self, features: &FeatureRecord) -> Result<PredictionResult, ClassifierError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

/// Build the process-wide classifier handle: the remote scorer when a URL is
/// configured, the local artifact otherwise.
pub fn load_classifier(config: &Config) -> Result<Arc<dyn Classifier>> {
    let timeout = Duration::from_secs(config.classifier_timeout_secs);
    let classifier: Arc<dyn Classifier> = match &config.classifier_url {
        Some(url) => {
            let url = url::Url::parse(url).context("Invalid CLASSIFIER_URL")?;
            Arc::new(RemoteClassifier::new(url, timeout)?)
        }
        None => Arc::new(
            LogisticPipeline::load(&config.model_path)
                .with_context(|| format!("Failed to load model artifact {}", config.model_path))?,
        ),
    };
    info!("Classifier ready: {}", classifier.name());
    Ok(classifier)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Deterministic stand-in for a trained model.
    pub(crate) struct StubClassifier {
        pub win_prob: f64,
    }

    #[async_trait]
    impl Classifier for StubClassifier {
        async fn predict_proba(&self, _features: &FeatureRecord) -> Result<PredictionResult, ClassifierError> {
            PredictionResult::from_row(&[1.0 - self.win_prob, self.win_prob])
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    /// Always fails, as an unreachable scoring service would.
    pub(crate) struct DownClassifier;

    #[async_trait]
    impl Classifier for DownClassifier {
        async fn predict_proba(&self, _features: &FeatureRecord) -> Result<PredictionResult, ClassifierError> {
            Err(ClassifierError::Unavailable("connection refused".into()))
        }

        fn name(&self) -> &str {
            "down"
        }
    }

    #[test]
    fn row_index_zero_is_loss() {
        let r = PredictionResult::from_row(&[0.25, 0.75]).unwrap();
        assert_eq!(r.loss_prob, 0.25);
        assert_eq!(r.win_prob, 0.75);
        assert_eq!(r.loss_prob + r.win_prob, 1.0);
    }

    #[test]
    fn wrong_width_is_schema_mismatch() {
        let err = PredictionResult::from_row(&[0.2, 0.3, 0.5]).unwrap_err();
        assert!(matches!(err, ClassifierError::SchemaMismatch(_)));
        assert!(PredictionResult::from_row(&[1.0]).is_err());
    }

    #[test]
    fn rejects_non_probabilities() {
        assert!(PredictionResult::from_row(&[f64::NAN, 0.5]).is_err());
        assert!(PredictionResult::from_row(&[-0.1, 1.1]).is_err());
        assert!(PredictionResult::from_row(&[0.6, 0.6]).is_err());
    }

    #[tokio::test]
    async fn stub_pairs_sum_to_one() {
        use crate::cricket::{derive_features, City, MatchState, RatePolicy, Team};
        let state = MatchState {
            batting_team: Team::KolkataKnightRiders,
            bowling_team: Team::DelhiCapitals,
            city: City::Kolkata,
            target: 171,
            score: 64,
            overs_completed: 8.3,
            wickets_lost: 2,
        };
        let features = derive_features(&state, RatePolicy::Guarded).unwrap();
        for win in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let r = StubClassifier { win_prob: win }.predict_proba(&features).await.unwrap();
            assert_eq!(r.loss_prob + r.win_prob, 1.0);
        }
    }
}
