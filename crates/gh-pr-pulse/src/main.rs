use clap::Parser;

mod cli;
mod collector;
mod commands;
mod logger;
mod report;
mod scenarios;
mod score_log;

use cli::{Cli, Command};
use commands::RunOptions;
use gh_pr_pulse_config::AppConfig;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logger::init();
    logger::load_dotenv();

    log::info!("Starting gh-pr-pulse");

    if let Err(err) = run(cli).await {
        log::error!("{:#}", err);
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    match cli.selected_command() {
        Command::Run => {
            let options = RunOptions {
                append_to_log: !cli.no_log,
                interval_minutes: cli.interval,
            };
            commands::run(&config, options).await
        }
        Command::Scenarios => commands::show_scenarios(&config),
        Command::History { limit } => commands::show_history(&config, limit),
    }
}
