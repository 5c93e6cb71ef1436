// Copyright 2026 Broiler Rates Contributors
// SPDX-License-Identifier: Apache-2.0

//! Broiler rates server — entry point.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::sync::Arc;

use broiler_rates_server::config::{EngineArgs, DEFAULT_ADDR};
use broiler_rates_server::state::{build_engine, build_renderer, AppState};
use broiler_rates_server::{logging, rest};

#[derive(Parser)]
#[command(
    name = "broiler-rates",
    about = "Broiler rates — today's and yesterday's broiler rate per city over HTTP",
    version
)]
struct Cli {
    /// Listen address (host:port).
    #[arg(long, global = true, env = "BROILER_ADDR", default_value = DEFAULT_ADDR)]
    addr: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(flatten)]
    engine: EngineArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API (default).
    Serve,

    /// Extract rates for one city and print the record as JSON.
    Fetch {
        /// City name, any case.
        city: String,
    },

    /// List the cities that wait for real values.
    Cities,

    /// Generate shell completion scripts.
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log_level, cli.log_json);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let config = cli.engine.engine_config()?;
            tracing::info!("starting broiler-rates v{}", env!("CARGO_PKG_VERSION"));
            let renderer = build_renderer(cli.engine.chromium_path.clone());
            let state = Arc::new(AppState::new(build_engine(renderer, config)));
            rest::start(&cli.addr, state).await?;
        }

        Commands::Fetch { city } => {
            let config = cli.engine.engine_config()?;
            let renderer = build_renderer(cli.engine.chromium_path.clone());
            let engine = build_engine(renderer, config);
            let record = engine.extract(&city).await;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }

        Commands::Cities => {
            let config = cli.engine.engine_config()?;
            for city in config.policy_set.cities() {
                println!("{city}");
            }
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "broiler-rates", &mut std::io::stdout());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["broiler-rates", "--addr", "127.0.0.1:9000"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.addr, "127.0.0.1:9000");
    }

    #[test]
    fn test_fetch_takes_city() {
        let cli = Cli::try_parse_from(["broiler-rates", "fetch", "rahim yar khan"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Fetch { city }) if city == "rahim yar khan"));
    }
}
