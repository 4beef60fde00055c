mod cli;
mod commands;

use clap::Parser;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    // Pick up GOOGLE_MAPS_API_KEY and friends from a local .env, if any.
    let _ = dotenvy::dotenv();

    if let Err(error) = confab_core::init() {
        eprintln!("error: failed to initialize logging: {error:#}");
        std::process::exit(1);
    }

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Aggregate(args) => commands::aggregate::run(args).await,
        Commands::Filter(args) => commands::filter::run(args),
    };

    if let Err(error) = result {
        tracing::error!(error = %error, "Command failed");
        eprintln!("error: {}", error.user_message());
        std::process::exit(1);
    }
}
