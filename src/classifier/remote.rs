use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::{Classifier, ClassifierError, PredictionResult};
use crate::cricket::FeatureRecord;

/// Classifier hosted behind an HTTP scoring endpoint.
///
/// Request: `POST <url>` with `{"instances": [<feature row>]}`.
/// Response: `{"probabilities": [[loss, win]]}`.
pub struct RemoteClassifier {
    http: Client,
    url: Url,
    name: String,
}

#[derive(Serialize)]
struct ScoreRequest<'a> {
    instances: [&'a FeatureRecord; 1],
}

#[derive(Debug, Deserialize)]
struct ScoreResponse {
    probabilities: Vec<Vec<f64>>,
}

impl RemoteClassifier {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, ClassifierError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(RemoteClassifier {
            http,
            name: format!("remote({})", url),
            url,
        })
    }
}

#[async_trait]
impl Classifier for RemoteClassifier {
    async fn predict_proba(&self, features: &FeatureRecord) -> Result<PredictionResult, ClassifierError> {
        debug!("Scoring feature row at {}", self.url);

        let resp = self
            .http
            .post(self.url.clone())
            .json(&ScoreRequest { instances: [features] })
            .send()
            .await
            .map_err(|e| ClassifierError::Unavailable(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ClassifierError::Unavailable(format!(
                "scoring service returned {}",
                resp.status()
            )));
        }

        let body = resp.text().await?;
        parse_score_response(&body)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn parse_score_response(body: &str) -> Result<PredictionResult, ClassifierError> {
    let parsed: ScoreResponse = serde_json::from_str(body)?;
    match parsed.probabilities.as_slice() {
        [row] => PredictionResult::from_row(row),
        rows => Err(ClassifierError::SchemaMismatch(format!(
            "expected 1 probability row, got {}",
            rows.len()
        ))),
    }
}
