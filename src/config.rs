use clap::{Args, Parser, Subcommand};

use crate::cricket::{ChartKind, RatePolicy};

/// IPL chase win-probability predictor
#[derive(Parser, Debug, Clone)]
#[command(name = "ipl-win-predictor", version, about)]
pub struct Config {
    /// Local classifier artifact (JSON logistic pipeline export)
    #[arg(
        long,
        global = true,
        env = "MODEL_PATH",
        default_value = "models/sample_pipeline.json"
    )]
    pub model_path: String,

    /// Remote scoring endpoint; overrides the local artifact when set
    #[arg(long, global = true, env = "CLASSIFIER_URL")]
    pub classifier_url: Option<String>,

    /// Timeout for remote scoring requests in seconds
    #[arg(long, global = true, env = "CLASSIFIER_TIMEOUT_SECS", default_value = "10")]
    pub classifier_timeout_secs: u64,

    /// Behaviour of the run-rate divisions at 0 overs / 0 balls left
    #[arg(long, global = true, env = "RATE_POLICY", value_enum, default_value_t = RatePolicy::Guarded)]
    pub rate_policy: RatePolicy,

    /// Chart shown alongside the probabilities
    #[arg(long, global = true, env = "CHART", value_enum, default_value_t = ChartKind::Projection)]
    pub chart: ChartKind,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Serve the prediction form over HTTP
    Serve {
        /// Listen address
        #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8501")]
        listen_addr: String,
    },
    /// Predict a single match state and print the result
    Predict(PredictArgs),
}

#[derive(Args, Debug, Clone)]
pub struct PredictArgs {
    #[arg(long)]
    pub batting_team: String,
    #[arg(long)]
    pub bowling_team: String,
    #[arg(long)]
    pub city: String,
    /// Runs required to win
    #[arg(long)]
    pub target: f64,
    /// Current score
    #[arg(long)]
    pub score: f64,
    /// Overs completed, e.g. 12.3
    #[arg(long)]
    pub overs: f64,
    /// Wickets fallen
    #[arg(long)]
    pub wickets: f64,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.classifier_timeout_secs == 0 {
            anyhow::bail!("classifier_timeout_secs must be positive");
        }
        if let Some(raw) = &self.classifier_url {
            let url = url::Url::parse(raw)
                .map_err(|e| anyhow::anyhow!("CLASSIFIER_URL '{}' is not a valid URL: {}", raw, e))?;
            if !matches!(url.scheme(), "http" | "https") {
                anyhow::bail!("CLASSIFIER_URL must use http or https, got '{}'", url.scheme());
            }
        } else if self.model_path.trim().is_empty() {
            anyhow::bail!("MODEL_PATH is required when CLASSIFIER_URL is not set");
        }
        if let Command::Serve { listen_addr } = &self.command {
            listen_addr
                .parse::<std::net::SocketAddr>()
                .map_err(|e| anyhow::anyhow!("LISTEN_ADDR '{}' is invalid: {}", listen_addr, e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("ipl-win-predictor").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn defaults() {
        let c = parse(&["serve"]);
        assert_eq!(c.rate_policy, RatePolicy::Guarded);
        assert_eq!(c.chart, ChartKind::Projection);
        assert_eq!(c.classifier_timeout_secs, 10);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn predict_subcommand_with_global_flags() {
        let c = parse(&[
            "predict",
            "--batting-team", "Mumbai Indians",
            "--bowling-team", "Chennai Super Kings",
            "--city", "Mumbai",
            "--target", "180",
            "--score", "90",
            "--overs", "10",
            "--wickets", "3",
            "--rate-policy", "strict",
            "--chart", "run-rate",
        ]);
        assert_eq!(c.rate_policy, RatePolicy::Strict);
        assert_eq!(c.chart, ChartKind::RunRate);
        match c.command {
            Command::Predict(args) => {
                assert_eq!(args.city, "Mumbai");
                assert_eq!(args.overs, 10.0);
            }
            other => panic!("expected predict, got {:?}", other),
        }
    }

    #[test]
    fn rejects_bad_classifier_url() {
        let c = parse(&["--classifier-url", "ftp://scorer/predict", "serve"]);
        assert!(c.validate().is_err());
        let c = parse(&["--classifier-url", "not a url", "serve"]);
        assert!(c.validate().is_err());
        let c = parse(&["--classifier-url", "http://localhost:9000/score", "serve"]);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn rejects_zero_timeout_and_bad_listen_addr() {
        let c = parse(&["--classifier-timeout-secs", "0", "serve"]);
        assert!(c.validate().is_err());
        let c = parse(&["serve", "--listen-addr", "localhost"]);
        assert!(c.validate().is_err());
    }
}
