//! Check command implementation
//!
//! Prints the resolved configuration and, given a request file, projects
//! every company in it without valuing anything.

use mna_model::FinancialModel;
use std::path::Path;
use tracing::info;

use crate::config::MnaConfig;
use crate::request::{read_json, ValuationInput};
use crate::Result;

/// Run the check command
pub fn run(config: &MnaConfig, request: Option<&Path>) -> Result<()> {
    info!("Checking configuration...");
    for line in summarize(config, request)? {
        println!("{}", line);
    }
    info!("Check complete");
    Ok(())
}

fn summarize(config: &MnaConfig, request: Option<&Path>) -> Result<Vec<String>> {
    let projection = &config.projection;
    let market = &config.market;
    let mut lines = vec![
        format!("log level:        {}", config.log_level),
        format!("horizon:          {} years", projection.horizon),
        format!("plug policy:      {}", projection.plug_policy),
        format!("interest rate:    {}", projection.interest_rate),
        format!(
            "debt capacity:    {}",
            projection
                .debt_capacity
                .map(|m| format!("{}x EBITDA", m))
                .unwrap_or_else(|| "unlimited".to_string())
        ),
        format!("risk-free rate:   {}", market.risk_free_rate),
        format!("equity premium:   {}", market.equity_risk_premium),
        format!("cost of debt:     {}", market.pre_tax_cost_of_debt),
    ];

    if let Some(path) = request {
        let input: ValuationInput = read_json(path)?;
        let company = input.company.build_model(projection)?;
        lines.push(model_line("company", &company));
        if let Some(merger) = &input.merger {
            let target = merger.target.build_model(projection)?;
            lines.push(model_line("merger target", &target));
        }
        if let Some(cca) = &input.cca {
            lines.push(format!("peers:            {}", cca.peers.len()));
        }
    }
    Ok(lines)
}

fn model_line(role: &str, model: &FinancialModel) -> String {
    let restated = match model.restatement() {
        Some(r) => format!(", opening equity restated by {}", r.amount),
        None => String::new(),
    };
    format!(
        "{:<17} {} projected {} years, balanced and tied{}",
        format!("{}:", role),
        model.historical().company,
        model.horizon(),
        restated
    )
}
