//! CLI configuration management
//!
//! Settings come from `mna.toml`, `MNA_*` environment variables and
//! command-line flags, in increasing priority.

use mna_core::types::EngineError;
use mna_model::projection::{PlugPolicy, ProjectionConfig};
use mna_valuation::MarketAssumptions;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing::Level;

use crate::output::OutputFormat;

/// Config file read when `--config` is not given and the file exists.
pub const DEFAULT_CONFIG_FILE: &str = "mna.toml";

/// Errors raised while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },

    #[error("Cannot load {path}: {reason}")]
    File { path: String, reason: String },

    #[error("Engine settings rejected: {0}")]
    Engine(#[from] EngineError),
}

impl ConfigError {
    fn invalid_value(name: &str, value: &str) -> Self {
        ConfigError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    fn file(path: &Path, reason: impl std::fmt::Display) -> Self {
        ConfigError::File {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Default verbosity when `RUST_LOG` is unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl From<Level> for LogLevel {
    fn from(level: Level) -> Self {
        if level == Level::TRACE {
            LogLevel::Trace
        } else if level == Level::DEBUG {
            LogLevel::Debug
        } else if level == Level::INFO {
            LogLevel::Info
        } else if level == Level::WARN {
            LogLevel::Warn
        } else {
            LogLevel::Error
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::from_str(s.trim())
            .map(LogLevel::from)
            .map_err(|_| ConfigError::invalid_value("log level", s))
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = format!("{:?}", self).to_lowercase();
        f.write_str(&name)
    }
}

/// Resolved CLI configuration.
///
/// ```toml
/// log_level = "info"
/// format = "table"
///
/// [projection]
/// horizon = 7
/// plug_policy = "debt"
///
/// [market]
/// risk_free_rate = 0.04
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MnaConfig {
    /// Log level, unless `RUST_LOG` is set
    pub log_level: LogLevel,
    /// Default output format
    pub format: OutputFormat,
    /// Projector settings
    pub projection: ProjectionConfig,
    /// Market rates for the DCF
    pub market: MarketAssumptions,
}

impl Default for MnaConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            format: OutputFormat::default(),
            projection: ProjectionConfig::default(),
            market: MarketAssumptions::default(),
        }
    }
}

impl MnaConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::file(path, e))?;
        let config: MnaConfig = toml::from_str(&content).map_err(|e| ConfigError::file(path, e))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `MNA_*` overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("MNA_LOG_LEVEL") {
            self.log_level = LogLevel::from_str(&level)?;
        }
        if let Some(format) = lookup("MNA_FORMAT") {
            self.format = OutputFormat::from_str(&format)
                .map_err(|_| ConfigError::invalid_value("MNA_FORMAT", &format))?;
        }
        if let Some(horizon) = lookup("MNA_HORIZON") {
            self.projection.horizon = horizon
                .parse()
                .map_err(|_| ConfigError::invalid_value("MNA_HORIZON", &horizon))?;
        }
        if let Some(policy) = lookup("MNA_PLUG_POLICY") {
            self.projection.plug_policy = PlugPolicy::from_str(&policy)
                .map_err(|_| ConfigError::invalid_value("MNA_PLUG_POLICY", &policy))?;
        }
        if let Some(capacity) = lookup("MNA_DEBT_CAPACITY") {
            self.projection.debt_capacity =
                Some(parse_decimal("MNA_DEBT_CAPACITY", &capacity)?);
        }
        if let Some(rate) = lookup("MNA_RISK_FREE_RATE") {
            self.market.risk_free_rate = parse_decimal("MNA_RISK_FREE_RATE", &rate)?;
        }
        if let Some(premium) = lookup("MNA_EQUITY_RISK_PREMIUM") {
            self.market.equity_risk_premium =
                parse_decimal("MNA_EQUITY_RISK_PREMIUM", &premium)?;
        }
        if let Some(rate) = lookup("MNA_COST_OF_DEBT") {
            self.market.pre_tax_cost_of_debt = parse_decimal("MNA_COST_OF_DEBT", &rate)?;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.projection.validate()?;
        self.market.validate()?;
        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        if let Some(level) = &cli.log_level {
            self.log_level = LogLevel::from_str(level)?;
        } else if cli.verbose {
            self.log_level = LogLevel::Debug;
        }
        if let Some(horizon) = cli.horizon {
            self.projection.horizon = horizon;
        }
        if let Some(policy) = cli.plug_policy {
            self.projection.plug_policy = policy;
        }
        if let Some(format) = cli.format {
            self.format = format;
        }
        Ok(())
    }
}

fn parse_decimal(name: &str, value: &str) -> Result<Decimal, ConfigError> {
    Decimal::from_str(value.trim()).map_err(|_| ConfigError::invalid_value(name, value))
}

/// Overrides taken from the command line
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Config file path
    pub config_file: Option<PathBuf>,
    /// Log level override
    pub log_level: Option<String>,
    /// Debug logging unless a level is given
    pub verbose: bool,
    /// Projection horizon override
    pub horizon: Option<usize>,
    /// Plug policy override
    pub plug_policy: Option<PlugPolicy>,
    /// Output format override
    pub format: Option<OutputFormat>,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file (`--config`, else `mna.toml` when present)
/// 4. Default values
pub fn build_config(cli: &CliArgs) -> Result<MnaConfig, ConfigError> {
    build_config_with(cli, |name| std::env::var(name).ok())
}

/// [`build_config`] with an explicit environment lookup.
pub fn build_config_with<F>(cli: &CliArgs, lookup: F) -> Result<MnaConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match &cli.config_file {
        Some(path) => MnaConfig::from_file(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            MnaConfig::from_file(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => MnaConfig::default(),
    };

    config.apply_env(lookup)?;
    config.merge_with_cli(cli)?;

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    // ========================================
    // Defaults and parsing
    // ========================================

    #[test]
    fn test_default_config() {
        let config = MnaConfig::default();
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.format, OutputFormat::Table);
        assert_eq!(config.projection.horizon, 5);
        assert_eq!(config.projection.plug_policy, PlugPolicy::CashThenDebt);
        assert_eq!(config.market.risk_free_rate, dec!(0.045));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("Info").unwrap(), LogLevel::Info);
        assert!(matches!(
            LogLevel::from_str("loud"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(format!("{}", LogLevel::Warn), "warn");
        assert_eq!(LevelFilter::from(LogLevel::Info), LevelFilter::INFO);
    }

    #[test]
    fn test_partial_toml_deserialization() {
        let config: MnaConfig = toml::from_str(
            r#"
            [projection]
            horizon = 7
            plug_policy = "equity"
        "#,
        )
        .unwrap();
        assert_eq!(config.projection.horizon, 7);
        assert_eq!(config.projection.plug_policy, PlugPolicy::Equity);
        assert_eq!(config.projection.interest_rate, dec!(0.05));
        assert_eq!(config.market, MarketAssumptions::default());
    }

    // ========================================
    // Files
    // ========================================

    #[test]
    fn test_from_file() {
        let file = write_config(
            r#"
            log_level = "info"
            format = "json"

            [projection]
            horizon = 10
            debt_capacity = 4

            [market]
            risk_free_rate = 0.04
        "#,
        );
        let config = MnaConfig::from_file(file.path()).unwrap();
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.projection.horizon, 10);
        assert_eq!(config.projection.debt_capacity, Some(dec!(4)));
        assert_eq!(config.market.risk_free_rate, dec!(0.04));
        assert_eq!(config.market.equity_risk_premium, dec!(0.055));
    }

    #[test]
    fn test_file_with_bad_horizon_rejected() {
        let file = write_config("[projection]\nhorizon = 40\n");
        let err = MnaConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Engine(e) if e.is_configuration()));
    }

    #[test]
    fn test_malformed_toml_is_file_error() {
        let file = write_config("[projection\nhorizon = 7\n");
        let err = MnaConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::File { .. }));
    }

    #[test]
    fn test_missing_file_is_file_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = MnaConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::File { .. }));
        assert!(err.to_string().contains("absent.toml"));
    }

    // ========================================
    // Precedence
    // ========================================

    #[test]
    fn test_env_overrides_file() {
        let file = write_config("[projection]\nhorizon = 10\n");
        let cli = CliArgs {
            config_file: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let config = build_config_with(
            &cli,
            env(&[("MNA_HORIZON", "8"), ("MNA_RISK_FREE_RATE", "0.03")]),
        )
        .unwrap();
        assert_eq!(config.projection.horizon, 8);
        assert_eq!(config.market.risk_free_rate, dec!(0.03));
    }

    #[test]
    fn test_cli_overrides_env() {
        let cli = CliArgs {
            config_file: None,
            log_level: Some("error".to_string()),
            verbose: true,
            horizon: Some(3),
            plug_policy: Some(PlugPolicy::Debt),
            format: Some(OutputFormat::Csv),
        };
        let config = build_config_with(
            &cli,
            env(&[
                ("MNA_HORIZON", "8"),
                ("MNA_LOG_LEVEL", "info"),
                ("MNA_PLUG_POLICY", "equity"),
            ]),
        )
        .unwrap();
        assert_eq!(config.projection.horizon, 3);
        assert_eq!(config.projection.plug_policy, PlugPolicy::Debt);
        assert_eq!(config.log_level, LogLevel::Error);
        assert_eq!(config.format, OutputFormat::Csv);
    }

    #[test]
    fn test_verbose_means_debug() {
        let mut config = MnaConfig::default();
        let cli = CliArgs {
            verbose: true,
            ..Default::default()
        };
        config.merge_with_cli(&cli).unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_bad_env_value_rejected() {
        let mut config = MnaConfig::default();
        let err = config
            .apply_env(env(&[("MNA_EQUITY_RISK_PREMIUM", "lots")]))
            .unwrap_err();
        assert!(err.to_string().contains("MNA_EQUITY_RISK_PREMIUM"));
    }

    #[test]
    fn test_out_of_range_market_rate_rejected() {
        let cli = CliArgs::default();
        let mut config = MnaConfig::default();
        config.apply_env(no_env).unwrap();
        assert!(config.merge_with_cli(&cli).is_ok());

        config.market.risk_free_rate = dec!(1.5);
        assert!(matches!(config.validate(), Err(ConfigError::Engine(_))));
    }
}
