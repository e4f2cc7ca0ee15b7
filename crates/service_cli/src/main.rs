//! mna CLI - Command Line Operations for M&A Projection and Valuation
//!
//! This is the operational entry point for the projection and valuation
//! engine.
//!
//! # Commands
//!
//! - `mna project <company.json>` - Normalise and project one company
//! - `mna value <request.json>` - Run DCF, LBO, CCA and merger analysis
//! - `mna check [--request <request.json>]` - Show the resolved configuration
//!
//! # Architecture
//!
//! As the **S**ervice layer, this crate is the only place that touches
//! files, environment variables and the tracing subscriber. The engine
//! crates below it stay pure.

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use mna_model::{PlugPolicy, Scenario};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod output;
mod request;

pub use error::{CliError, Result};

use commands::project::ProjectOptions;
use config::{build_config, CliArgs, LogLevel};
use output::OutputFormat;

/// M&A projection and valuation engine CLI
#[derive(Parser)]
#[command(name = "mna")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (TOML); mna.toml is used when present
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG wins when set
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Output format (json, csv, table)
    #[arg(short, long, global = true)]
    format: Option<String>,

    /// Projection horizon in years
    #[arg(long, global = true)]
    horizon: Option<usize>,

    /// Balance-sheet plug policy (cash_then_debt, debt, equity)
    #[arg(long, global = true)]
    plug_policy: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalise a company's financials and project the three statements
    Project {
        /// Company file (JSON)
        input: PathBuf,

        /// Scenario (base, upside, downside)
        #[arg(short, long)]
        scenario: Option<String>,

        /// Fiscal year end of the historical period (YYYY-MM-DD)
        #[arg(long)]
        fiscal_year_end: Option<String>,

        /// Output file; stdout when absent
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Value a company with the methods named in a request file
    Value {
        /// Valuation request file (JSON)
        request: PathBuf,

        /// Output file; stdout when absent
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check configuration and, optionally, a request file
    Check {
        /// Valuation request file to project without valuing
        #[arg(short, long)]
        request: Option<PathBuf>,
    },
}

impl Cli {
    fn config_args(&self) -> Result<CliArgs> {
        let plug_policy = self
            .plug_policy
            .as_deref()
            .map(PlugPolicy::from_str)
            .transpose()
            .map_err(CliError::InvalidArgument)?;
        let format = self
            .format
            .as_deref()
            .map(OutputFormat::from_str)
            .transpose()?;
        Ok(CliArgs {
            config_file: self.config.clone(),
            log_level: self.log_level.clone(),
            verbose: self.verbose,
            horizon: self.horizon,
            plug_policy,
            format,
        })
    }
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| {
        CliError::InvalidArgument(format!("Invalid date '{}': {}. Expected YYYY-MM-DD", value, e))
    })
}

fn init_tracing(log_level: LogLevel) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(LevelFilter::from(log_level).into())
                .from_env_lossy(),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = build_config(&cli.config_args()?).context("failed to build configuration")?;

    init_tracing(config.log_level);
    debug!(?config, "configuration resolved");

    match cli.command {
        Commands::Project {
            input,
            scenario,
            fiscal_year_end,
            output,
        } => {
            let options = ProjectOptions {
                scenario: scenario
                    .as_deref()
                    .map(Scenario::from_str)
                    .transpose()
                    .map_err(CliError::InvalidArgument)?,
                fiscal_year_end: fiscal_year_end.as_deref().map(parse_date).transpose()?,
                output: output.as_deref(),
                ..ProjectOptions::new(&input)
            };
            commands::project::run(&config, &options)?
        }
        Commands::Value { request, output } => {
            commands::value::run(&config, &request, output.as_deref())?
        }
        Commands::Check { request } => commands::check::run(&config, request.as_deref())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_reach_config_args() {
        let cli = Cli::parse_from([
            "mna",
            "value",
            "request.json",
            "--format",
            "csv",
            "--horizon",
            "7",
            "--plug-policy",
            "debt",
        ]);
        let args = cli.config_args().unwrap();
        assert_eq!(args.format, Some(OutputFormat::Csv));
        assert_eq!(args.horizon, Some(7));
        assert_eq!(args.plug_policy, Some(PlugPolicy::Debt));
        assert!(!args.verbose);
    }

    #[test]
    fn test_unknown_plug_policy_rejected() {
        let cli = Cli::parse_from(["mna", "check", "--plug-policy", "magic"]);
        assert!(matches!(
            cli.config_args(),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-03-31").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()
        );
        assert!(parse_date("31/03/2025").is_err());
    }
}
