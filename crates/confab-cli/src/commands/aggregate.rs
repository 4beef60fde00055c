use std::collections::BTreeMap;

use anyhow::Context;

use confab_core::{snapshot, AppError, CitySummary, Config, EventRecord};
use confab_sources::{aggregate, SourceClient};
use confab_travel::{detect_origin, summarize, DistanceClient};

use crate::cli::AggregateArgs;

pub async fn run(args: AggregateArgs) -> Result<(), AppError> {
    let mut config = super::load_config(args.config.as_deref())?;
    if let Some(dir) = &args.output {
        config.output.dir = dir.clone();
    }

    let sources = config.source_refs();
    tracing::info!(sources = sources.len(), "Starting aggregation");

    let client =
        SourceClient::new(config.bounds).context("Failed to build the source client")?;
    let outcome = aggregate(&client, &sources).await;

    if outcome.dropped_records > 0 {
        tracing::info!(
            dropped = outcome.dropped_records,
            "Dropped records without a parseable start timestamp"
        );
    }

    // Partial failure is reported, not fatal; only a completely empty run is.
    if outcome.is_empty() {
        return Err(AppError::NoEventsProduced);
    }

    let events_path = config.combined_events_path();
    snapshot::write_events(&events_path, &outcome.events)?;
    println!(
        "Wrote {} events to {}",
        outcome.events.len(),
        events_path.display()
    );

    let summary = build_summary(&config, &args, &outcome.events).await;
    let summary_path = config.city_summary_path();
    snapshot::write_summary(&summary_path, &summary)?;
    println!(
        "Wrote summary for {} cities to {}",
        summary.len(),
        summary_path.display()
    );

    if !outcome.failed_sources.is_empty() {
        let names: Vec<&str> = outcome
            .failed_sources
            .iter()
            .map(|f| f.source.as_str())
            .collect();
        println!(
            "{} source(s) contributed no events: {}",
            names.len(),
            names.join(", ")
        );
    }

    Ok(())
}

async fn build_summary(
    config: &Config,
    args: &AggregateArgs,
    events: &[EventRecord],
) -> BTreeMap<String, CitySummary> {
    if args.no_travel {
        tracing::info!("Travel enrichment disabled by flag");
        return summarize(events, None, None).await;
    }

    let client = match DistanceClient::from_env() {
        Ok(client) => Some(client),
        Err(error) => {
            tracing::warn!(error = %error, "Travel enrichment disabled");
            None
        }
    };

    let origin = match &client {
        None => None,
        Some(_) => match args.origin.clone().or_else(|| config.travel.origin.clone()) {
            Some(origin) => Some(origin),
            None => detect_origin().await,
        },
    };

    if client.is_some() && origin.is_none() {
        tracing::warn!("No origin available; city summary will not include distances");
    }

    summarize(events, origin.as_deref(), client.as_ref()).await
}
