use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "confab")]
#[command(about = "Aggregate public calendar listings into one snapshot and filter the results")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch every configured source, merge and summarize, write snapshots
    Aggregate(AggregateArgs),
    /// Filter a combined-events snapshot by location, dates, and weekdays
    Filter(FilterArgs),
}

#[derive(Args)]
pub struct AggregateArgs {
    /// Path to an alternate config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Origin for travel lookups (overrides config and IP detection)
    #[arg(long)]
    pub origin: Option<String>,

    /// Directory to write the snapshot documents into
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip travel enrichment entirely
    #[arg(long)]
    pub no_travel: bool,
}

#[derive(Args)]
pub struct FilterArgs {
    /// Path to an alternate config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Combined-events snapshot to read (defaults to the configured output)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// City substring to match, case-insensitive
    #[arg(short, long)]
    pub location: Option<String>,

    /// Calendar date(s) to keep (YYYY-MM-DD)
    #[arg(long, num_args = 1..)]
    pub dates: Vec<String>,

    /// Weekday name(s) to keep (e.g. Monday Friday)
    #[arg(long, num_args = 1..)]
    pub weekdays: Vec<String>,

    /// IANA time zone used for date/weekday matching
    #[arg(long)]
    pub timezone: Option<String>,

    /// Write the matching subset to this file as JSON
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
