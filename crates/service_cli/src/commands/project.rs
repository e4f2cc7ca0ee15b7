//! Project command implementation
//!
//! Normalises one company's financials and writes the linked
//! three-statement projection.

use chrono::NaiveDate;
use mna_model::Scenario;
use std::path::Path;
use tracing::{info, warn};

use super::emit;
use crate::config::MnaConfig;
use crate::output::{write_model, OutputFormat};
use crate::request::{read_json, CompanyInput};
use crate::Result;

/// Options for the project command
#[derive(Debug, Clone)]
pub struct ProjectOptions<'a> {
    /// Company request file
    pub input: &'a Path,
    /// Scenario replacing the one in the file
    pub scenario: Option<Scenario>,
    /// Fiscal year end replacing the one in the file
    pub fiscal_year_end: Option<NaiveDate>,
    /// Destination file; stdout when absent
    pub output: Option<&'a Path>,
}

impl<'a> ProjectOptions<'a> {
    /// Project `input` as written, to stdout.
    pub fn new(input: &'a Path) -> Self {
        Self {
            input,
            scenario: None,
            fiscal_year_end: None,
            output: None,
        }
    }
}

/// Run the project command
pub fn run(config: &MnaConfig, options: &ProjectOptions<'_>) -> Result<()> {
    info!("Starting projection...");
    info!("  Input: {}", options.input.display());
    info!("  Horizon: {}", config.projection.horizon);
    info!("  Plug policy: {}", config.projection.plug_policy);

    let mut company: CompanyInput = read_json(options.input)?;
    if options.scenario.is_some() {
        company.scenario = options.scenario;
    }
    if options.fiscal_year_end.is_some() {
        company.financials.fiscal_year_end = options.fiscal_year_end;
    }

    let model = company.build_model(&config.projection)?;
    if let Some(restatement) = model.restatement() {
        warn!(
            amount = %restatement.amount,
            "reported opening balance sheet did not balance; equity restated"
        );
    }

    emit(options.output, |out| write_model(out, &model, config.format))?;
    if config.format != OutputFormat::Json {
        info!("Use --format json for the full statements and ratios");
    }
    info!("Projection complete");
    Ok(())
}
