//! Local classifier: a one-hot encoder followed by logistic regression,
//! exported from the training pipeline as JSON.
//!
//! The encoded vector is laid out the way the exporting column transformer
//! emits it: every categorical block in artifact order (one slot per
//! category), then the numeric passthrough columns in artifact order.
//!
//! ```json
//! {
//!   "name": "ipl-chase-logreg",
//!   "categorical": [{ "column": "city", "categories": ["Abu Dhabi", "..."] }],
//!   "numeric": ["runs_left", "balls_left"],
//!   "coefficients": [0.01, -0.02, 0.3],
//!   "intercept": 0.1
//! }
//! ```

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

use super::{Classifier, ClassifierError, PredictionResult};
use crate::cricket::{FeatureRecord, FEATURE_COLUMNS};

#[derive(Debug, Clone, Deserialize)]
pub struct CategoricalColumn {
    pub column: String,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineArtifact {
    #[serde(default = "default_name")]
    pub name: String,
    pub categorical: Vec<CategoricalColumn>,
    pub numeric: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

fn default_name() -> String {
    "logistic-pipeline".to_string()
}

#[derive(Debug, Clone)]
pub struct LogisticPipeline {
    artifact: PipelineArtifact,
}

impl LogisticPipeline {
    /// Read and validate an artifact from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ClassifierError> {
        let artifact: PipelineArtifact = serde_json::from_str(raw)?;
        Self::from_artifact(artifact)
    }

    /// The artifact must cover the feature schema exactly once per column and
    /// carry one coefficient per encoded slot.
    pub fn from_artifact(artifact: PipelineArtifact) -> Result<Self, ClassifierError> {
        let mut seen = HashSet::new();
        let columns = artifact
            .categorical
            .iter()
            .map(|c| c.column.as_str())
            .chain(artifact.numeric.iter().map(String::as_str));
        for column in columns {
            if !FEATURE_COLUMNS.contains(&column) {
                return Err(ClassifierError::InvalidArtifact(format!(
                    "unknown column '{}'",
                    column
                )));
            }
            if !seen.insert(column) {
                return Err(ClassifierError::InvalidArtifact(format!(
                    "column '{}' listed twice",
                    column
                )));
            }
        }
        if let Some(missing) = FEATURE_COLUMNS.iter().find(|c| !seen.contains(*c)) {
            return Err(ClassifierError::InvalidArtifact(format!(
                "column '{}' missing",
                missing
            )));
        }

        let width: usize = artifact
            .categorical
            .iter()
            .map(|c| c.categories.len())
            .sum::<usize>()
            + artifact.numeric.len();
        if artifact.coefficients.len() != width {
            return Err(ClassifierError::InvalidArtifact(format!(
                "{} coefficients for {} encoded features",
                artifact.coefficients.len(),
                width
            )));
        }
        if artifact.coefficients.iter().any(|w| !w.is_finite()) || !artifact.intercept.is_finite() {
            return Err(ClassifierError::InvalidArtifact(
                "non-finite model weights".into(),
            ));
        }

        Ok(LogisticPipeline { artifact })
    }

    /// One-hot + passthrough encoding of a feature row.
    fn encode(&self, features: &FeatureRecord) -> Result<Vec<f64>, ClassifierError> {
        let mut x = Vec::with_capacity(self.artifact.coefficients.len());

        for block in &self.artifact.categorical {
            let label = features.categorical(&block.column).ok_or_else(|| {
                ClassifierError::SchemaMismatch(format!("'{}' is not categorical", block.column))
            })?;
            let slot = block.categories.iter().position(|c| c == label).ok_or_else(|| {
                ClassifierError::SchemaMismatch(format!(
                    "unknown category '{}' for column '{}'",
                    label, block.column
                ))
            })?;
            x.extend((0..block.categories.len()).map(|i| if i == slot { 1.0 } else { 0.0 }));
        }

        for column in &self.artifact.numeric {
            let value = features.numeric(column).ok_or_else(|| {
                ClassifierError::SchemaMismatch(format!("'{}' is not numeric", column))
            })?;
            x.push(value);
        }

        Ok(x)
    }
}

#[async_trait]
impl Classifier for LogisticPipeline {
    async fn predict_proba(&self, features: &FeatureRecord) -> Result<PredictionResult, ClassifierError> {
        let x = self.encode(features)?;
        let z = self.artifact.intercept
            + x.iter()
                .zip(&self.artifact.coefficients)
                .map(|(xi, wi)| xi * wi)
                .sum::<f64>();
        let win = sigmoid(z);
        debug!("{}: logit {:.4} → win {:.4}", self.artifact.name, z, win);
        PredictionResult::from_row(&[1.0 - win, win])
    }

    fn name(&self) -> &str {
        &self.artifact.name
    }
}

/// Overflow-safe logistic function.
fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        let z = (-x).exp();
        1.0 / (1.0 + z)
    } else {
        let z = x.exp();
        z / (1.0 + z)
    }
}
