use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use tracing::info;

mod classifier;
mod config;
mod cricket;
mod dashboard;
mod form;
mod report;

use config::{Command, Config};
use dashboard::AppState;
use form::MatchInput;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    info!(
        "Rate policy: {:?}, default chart: {:?}",
        config.rate_policy, config.chart
    );

    // Loaded once; every prediction borrows this handle.
    let classifier = classifier::load_classifier(&config)?;

    match &config.command {
        Command::Serve { listen_addr } => {
            let state = AppState {
                classifier,
                rate_policy: config.rate_policy,
                default_chart: config.chart,
            };
            let app = dashboard::router(state);
            let addr: SocketAddr = listen_addr.parse()?;
            info!("Prediction form listening on http://{}", addr);
            let listener = tokio::net::TcpListener::bind(addr).await?;

            // Run form server (blocks until shutdown)
            axum::serve(listener, app).await?;
        }
        Command::Predict(args) => {
            let input = MatchInput {
                batting_team: args.batting_team.clone(),
                bowling_team: args.bowling_team.clone(),
                city: args.city.clone(),
                target: args.target,
                score: args.score,
                overs: args.overs,
                wickets: args.wickets,
                chart: None,
            };
            let state = input.validate()?;
            let report =
                report::run_prediction(classifier.as_ref(), &state, config.rate_policy, config.chart)
                    .await?;
            print!("{}", report::render_text(&report));
        }
    }

    Ok(())
}
