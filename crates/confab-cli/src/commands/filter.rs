use std::collections::{BTreeSet, HashSet};

use anyhow::Context;

use confab_core::filter::{parse_date, parse_timezone, parse_weekday};
use confab_core::{snapshot, AppError, EventRecord, FilterSpec};

use crate::cli::FilterArgs;

pub fn run(args: FilterArgs) -> Result<(), AppError> {
    let config = super::load_config(args.config.as_deref())?;

    let input = args
        .input
        .unwrap_or_else(|| config.combined_events_path());
    let events = snapshot::load_events(&input)?;

    let mut dates = BTreeSet::new();
    for raw in &args.dates {
        dates.insert(parse_date(raw)?);
    }

    let mut weekdays = HashSet::new();
    for raw in &args.weekdays {
        weekdays.insert(parse_weekday(raw)?);
    }

    let spec = FilterSpec {
        location: args.location,
        dates,
        weekdays,
    };

    let tz = parse_timezone(args.timezone.as_deref().unwrap_or(&config.filter.timezone))?;

    let matches = spec.apply(&events, tz);

    for event in &matches {
        println!(
            "- {} | Start: {} | City: {}",
            display_name(event),
            event.start_at.to_rfc3339(),
            event.city
        );
    }
    println!("{} of {} events matched.", matches.len(), events.len());

    if let Some(path) = &args.output {
        let contents = serde_json::to_string_pretty(&matches)
            .context("Failed to serialize filtered events")?;
        std::fs::write(path, contents)?;
        println!("Wrote matching events to {}", path.display());
    }

    Ok(())
}

fn display_name(event: &EventRecord) -> &str {
    if event.name.is_empty() {
        "(untitled)"
    } else {
        &event.name
    }
}
