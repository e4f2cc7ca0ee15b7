//! Value command implementation
//!
//! Projects the company (and a merger target when one is given), runs the
//! requested valuation methods concurrently and writes the report.

use mna_valuation::ValuationEngine;
use std::path::Path;
use tracing::{info, warn};

use super::emit;
use crate::config::MnaConfig;
use crate::output::write_report;
use crate::request::{read_json, ValuationInput};
use crate::Result;

/// Run the value command
pub fn run(config: &MnaConfig, request: &Path, output: Option<&Path>) -> Result<()> {
    info!("Starting valuation...");
    info!("  Request: {}", request.display());

    let input: ValuationInput = read_json(request)?;
    let model = input.company.build_model(&config.projection)?;
    let target = match &input.merger {
        Some(merger) => Some(merger.target.build_model(&config.projection)?),
        None => None,
    };

    let request = input.to_request(config.market, target.as_ref())?;
    let report = ValuationEngine::new().run(&model, &request);
    for (method, error) in report.failures() {
        warn!(method = %method, "{}", error);
    }

    emit(output, |out| write_report(out, &report, config.format))?;
    info!(
        "Valuation complete: {} of {} methods succeeded",
        report.completed_count(),
        request.methods().len()
    );
    Ok(())
}
