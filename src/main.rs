mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use config::AppConfig;
use serde_json::json;
use statsapp_ml::{BaselineModel, MatchStatistics, TeamRecord};
use statsapp_models::{DateRange, FormattedMatch, PredictionParams};
use statsapp_services::{gather_history, MatchLookup, OfflineMatchStore, PredictorService, UnconfiguredRemote};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, clap::Parser, Clone)]
#[command(name = "statsapp", about = "Baseline outcome predictions for a football fixture")]
struct Args {
    /// home team name
    #[clap(long)]
    home: String,

    /// away team name
    #[clap(long)]
    away: String,

    /// league the fixture belongs to
    #[clap(short = 'l', long)]
    league: Option<String>,

    /// also print head-to-head statistics and both teams' records
    #[clap(long)]
    stats: bool,

    /// first match date (YYYY-MM-DD) of a prediction accuracy report
    #[clap(long, requires = "accuracy_to")]
    accuracy_from: Option<NaiveDate>,

    /// last match date (YYYY-MM-DD) of a prediction accuracy report
    #[clap(long, requires = "accuracy_from")]
    accuracy_to: Option<NaiveDate>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "statsapp=info,statsapp_services=info,statsapp_stream=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    debug!("args: {args:?}");

    let config = AppConfig::new().context("failed to load configuration")?;
    info!("✅ Configuration loaded");

    let model = BaselineModel::with_params(config.model.clone())?;
    let lookup = OfflineMatchStore::new();
    info!("📚 Using offline match store ({} matches)", lookup.len());

    let predictor = PredictorService::new(
        Arc::new(model),
        Arc::new(UnconfiguredRemote),
        config.predictor_config(),
    );

    let cancel = CancellationToken::new();
    let sweeper = predictor
        .cache()
        .spawn_sweeper(config.sweep_interval(), cancel.clone());

    let params = PredictionParams {
        home_team: args.home.clone(),
        away_team: args.away.clone(),
        league: args
            .league
            .clone()
            .or_else(|| Some(config.lookup.default_league.clone())),
    };

    let history = gather_history(&lookup, &params, config.lookup.history_limit).await?;
    let prediction = predictor.predict(&params, history.clone()).await?;

    let mut output = json!({
        "home_team": params.home_team,
        "away_team": params.away_team,
        "league": params.league_or_default(),
        "prediction": prediction,
    });

    if args.stats {
        let home_matches = lookup.search_by_team(&params.home_team, config.lookup.history_limit).await?;
        let away_matches = lookup.search_by_team(&params.away_team, config.lookup.history_limit).await?;

        let meetings: Vec<FormattedMatch> = history.head_to_head.iter().map(FormattedMatch::from).collect();

        output["head_to_head_matches"] = serde_json::to_value(meetings)?;
        output["head_to_head"] = serde_json::to_value(MatchStatistics::from_matches(&history.head_to_head))?;
        output["home_record"] = serde_json::to_value(TeamRecord::from_matches(&params.home_team, &home_matches))?;
        output["away_record"] = serde_json::to_value(TeamRecord::from_matches(&params.away_team, &away_matches))?;
    }

    if let (Some(from), Some(to)) = (args.accuracy_from, args.accuracy_to) {
        let range = DateRange::new(from, to)?;
        output["accuracy"] = serde_json::to_value(predictor.accuracy_stats(range).await)?;
    }

    println!("{}", serde_json::to_string_pretty(&output)?);

    predictor.metrics().log_performance_summary().await;

    // Clean shutdown
    cancel.cancel();
    predictor.shutdown().await;
    sweeper.await?;
    info!("👋 Shutting down gracefully");

    Ok(())
}
