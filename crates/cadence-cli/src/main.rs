use cadence_core::error::CoreError;
use cadence_core::recurrence::RecurrenceEngine;
use chrono::Local;
use clap::Parser;
use owo_colors::{OwoColorize, Style};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod parser;
mod views;

fn main() {
    // Logs go to stderr so --json output stays clean. RUST_LOG overrides.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    let config = config::Config::new(cli.config.as_deref()).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "could not load configuration, using defaults");
        config::Config::default()
    });
    let engine = RecurrenceEngine::new(config.expansion());
    let now = Local::now();

    let result = match cli.command {
        cli::Commands::Preview(command) => {
            commands::preview::preview_rule(&engine, &config, command, now)
        }
        cli::Commands::Check(command) => commands::check::check_rule(command, now),
        cli::Commands::Encode(command) => commands::encode::encode_rule(command, now),
    };

    if let Err(e) = result {
        handle_error(e);
        std::process::exit(1);
    }
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    match err.downcast_ref::<CoreError>() {
        Some(CoreError::InvalidRule(s)) => {
            eprintln!("{} Invalid recurrence rule: {}", "Error:".style(error_style), s);
        }
        Some(CoreError::ValidationFailed(errors)) => {
            eprintln!("{}", "Error: Rule is not valid.".style(error_style));
            eprintln!("{}", views::table::field_errors_table(errors));
        }
        Some(CoreError::Codec(s)) => {
            eprintln!(
                "{} Could not read stored rule: {}",
                "Error:".style(error_style),
                s.yellow()
            );
        }
        None => eprintln!("{} {:#}", "Error:".style(error_style), err),
    }
}
