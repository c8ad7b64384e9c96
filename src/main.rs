mod client;
mod commands;
mod config;
mod controller;
mod directory;
mod feedback;
mod models;
#[cfg(test)]
mod test_support;
mod web;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Browse extracurricular activities and manage who is signed up.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to config file
    #[arg(short = 'c', long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Activities service base URL (overrides the config file)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Print detailed API responses
    #[arg(short = 'v', long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the web front end
    Serve {
        /// Listen address (e.g. "0.0.0.0:3010")
        #[arg(short = 'a', long, default_value = "0.0.0.0:3010")]
        addr: String,
    },

    /// Show all activities and their participants
    List,

    /// Sign an email up for an activity
    Signup {
        /// Activity name, e.g. "Chess Club"
        activity: String,
        /// Participant email
        email: String,
    },

    /// Remove an email from an activity
    Unregister {
        /// Activity name, e.g. "Chess Club"
        activity: String,
        /// Participant email
        email: String,

        /// Do not ask for confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let cfg = config::resolve_config(&cli.config, cli.base_url.as_deref())?;

    match &cli.command {
        Command::Serve { addr } => {
            web::serve(cfg, addr).await?;
        }
        Command::List => {
            commands::run_list(&cfg).await?;
        }
        Command::Signup { activity, email } => {
            commands::run_signup(&cfg, activity, email).await?;
        }
        Command::Unregister {
            activity,
            email,
            yes,
        } => {
            commands::run_unregister(&cfg, activity, email, *yes).await?;
        }
    }

    Ok(())
}
