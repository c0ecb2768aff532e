// SPDX-FileCopyrightText: 2026 Advo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Advo - AI chat assistant backend for law practices.
//!
//! This is the binary entry point for the Advo server.

use clap::{Parser, Subcommand};

mod provision;
mod serve;

/// Advo - AI chat assistant backend for law practices.
#[derive(Parser, Debug)]
#[command(name = "advo", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the chat API server.
    Serve,
    /// Provision a lawyer tenant with a default chat configuration.
    Provision(provision::ProvisionArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match advo_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            advo_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Provision(args)) => provision::run_provision(config, args).await,
        None => {
            println!("advo: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        super::Cli::command().debug_assert();
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = advo_config::load_config_from_str("").expect("default config should be valid");
        assert_eq!(config.server.port, 8787);
        assert_eq!(config.deepseek.default_model, "deepseek-chat");
    }
}
