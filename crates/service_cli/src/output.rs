//! Rendering of models and valuation reports.
//!
//! JSON carries every intermediate figure. CSV and the table are summaries.

use mna_model::ratios::{ratios_for_model, FinancialRatios};
use mna_model::FinancialModel;
use mna_valuation::{Outcome, ValuationMethod, ValuationReport};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::str::FromStr;

use crate::{CliError, Result};

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Csv,
    #[default]
    Table,
}

impl FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "table" => Ok(OutputFormat::Table),
            other => Err(CliError::InvalidArgument(format!(
                "Unknown format: {}. Supported: json, csv, table",
                other
            ))),
        }
    }
}

// ========================================
// Projection output
// ========================================

#[derive(Serialize)]
struct ProjectionDocument<'a> {
    model: &'a FinancialModel,
    ratios: Vec<FinancialRatios>,
}

/// One CSV row per projected year.
#[derive(Debug, Serialize)]
struct StatementRow {
    year: u32,
    period_end: Option<String>,
    revenue: Decimal,
    gross_profit: Decimal,
    ebitda: Decimal,
    operating_income: Decimal,
    net_income: Decimal,
    eps: Decimal,
    cash: Decimal,
    total_assets: Decimal,
    total_debt: Decimal,
    total_equity: Decimal,
    operating_cash_flow: Decimal,
    capex: Decimal,
    free_cash_flow: Decimal,
    net_change_in_cash: Decimal,
    plug_imbalance: Decimal,
}

fn statement_rows(model: &FinancialModel) -> Vec<StatementRow> {
    model
        .periods()
        .iter()
        .map(|p| StatementRow {
            year: p.year,
            period_end: p.period_end.map(|d| d.format("%Y-%m-%d").to_string()),
            revenue: p.income.revenue,
            gross_profit: p.income.gross_profit,
            ebitda: p.income.ebitda,
            operating_income: p.income.operating_income,
            net_income: p.income.net_income,
            eps: p.income.eps,
            cash: p.balance.cash,
            total_assets: p.balance.total_assets(),
            total_debt: p.balance.total_debt(),
            total_equity: p.balance.total_equity(),
            operating_cash_flow: p.cash_flow.operating_cash_flow,
            capex: p.cash_flow.capex,
            free_cash_flow: p.cash_flow.free_cash_flow,
            net_change_in_cash: p.cash_flow.net_change_in_cash,
            plug_imbalance: p.plug.imbalance,
        })
        .collect()
}

/// Write a projected model in `format`.
pub fn write_model<W: Write + ?Sized>(
    out: &mut W,
    model: &FinancialModel,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let document = ProjectionDocument {
                model,
                ratios: ratios_for_model(model),
            };
            serde_json::to_writer_pretty(&mut *out, &document)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(&mut *out);
            for row in statement_rows(model) {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
        OutputFormat::Table => {
            let reference = model.reference();
            writeln!(
                out,
                "{} ({}-year projection, plug: {})",
                reference.company,
                reference.horizon,
                model.config().plug_policy
            )?;
            if let Some(restatement) = model.restatement() {
                writeln!(
                    out,
                    "Opening equity restated by {}",
                    money(restatement.amount)
                )?;
            }
            writeln!(out, "┌──────┬──────────────┬──────────────┬──────────────┬──────────────┬──────────────┬──────────────┐")?;
            writeln!(out, "│ Year │      Revenue │       EBITDA │   Net income │          FCF │         Cash │         Debt │")?;
            writeln!(out, "├──────┼──────────────┼──────────────┼──────────────┼──────────────┼──────────────┼──────────────┤")?;
            for p in model.periods() {
                writeln!(
                    out,
                    "│ {:>4} │ {:>12} │ {:>12} │ {:>12} │ {:>12} │ {:>12} │ {:>12} │",
                    p.year,
                    money(p.income.revenue),
                    money(p.income.ebitda),
                    money(p.income.net_income),
                    money(p.cash_flow.free_cash_flow),
                    money(p.balance.cash),
                    money(p.balance.total_debt()),
                )?;
            }
            writeln!(out, "└──────┴──────────────┴──────────────┴──────────────┴──────────────┴──────────────┴──────────────┘")?;
        }
    }
    Ok(())
}

// ========================================
// Valuation output
// ========================================

/// One CSV row per requested method.
#[derive(Debug, Serialize)]
struct MethodRow {
    method: String,
    status: &'static str,
    low: Option<Decimal>,
    mid: Option<Decimal>,
    high: Option<Decimal>,
    upside: Option<Decimal>,
    error: Option<String>,
}

fn method_rows(report: &ValuationReport) -> Vec<MethodRow> {
    let mut rows = Vec::with_capacity(4);
    let mut push = |method: ValuationMethod, error: Option<String>, requested: bool| {
        if !requested {
            return;
        }
        let bar = report.summary.bar(method);
        rows.push(MethodRow {
            method: method.code().to_string(),
            status: if error.is_some() { "failed" } else { "completed" },
            low: bar.map(|b| b.range.low),
            mid: bar.map(|b| b.range.mid),
            high: bar.map(|b| b.range.high),
            upside: bar.and_then(|b| b.upside),
            error,
        });
    };
    push(
        ValuationMethod::Dcf,
        failure(report.dcf.as_ref()),
        report.dcf.is_some(),
    );
    push(
        ValuationMethod::Lbo,
        failure(report.lbo.as_ref()),
        report.lbo.is_some(),
    );
    push(
        ValuationMethod::Cca,
        failure(report.cca.as_ref()),
        report.cca.is_some(),
    );
    push(
        ValuationMethod::Merger,
        failure(report.merger.as_ref()),
        report.merger.is_some(),
    );
    rows
}

fn failure<T>(outcome: Option<&Outcome<T>>) -> Option<String> {
    outcome.and_then(Outcome::error).map(|e| e.to_string())
}

/// Write a valuation report in `format`.
pub fn write_report<W: Write + ?Sized>(
    out: &mut W,
    report: &ValuationReport,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(&mut *out);
            for row in method_rows(report) {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
        OutputFormat::Table => write_report_table(out, report)?,
    }
    Ok(())
}

fn write_report_table<W: Write + ?Sized>(out: &mut W, report: &ValuationReport) -> Result<()> {
    writeln!(
        out,
        "{} (market price {})",
        report.model.company,
        money(report.summary.market_price)
    )?;
    writeln!(out, "┌────────┬───────────┬────────────┬────────────┬────────────┬──────────┐")?;
    writeln!(out, "│ Method │ Status    │        Low │        Mid │       High │   Upside │")?;
    writeln!(out, "├────────┼───────────┼────────────┼────────────┼────────────┼──────────┤")?;
    for row in method_rows(report) {
        writeln!(
            out,
            "│ {:<6} │ {:<9} │ {:>10} │ {:>10} │ {:>10} │ {:>8} │",
            row.method,
            row.status,
            row.low.map(money).unwrap_or_else(|| "-".to_string()),
            row.mid.map(money).unwrap_or_else(|| "-".to_string()),
            row.high.map(money).unwrap_or_else(|| "-".to_string()),
            row.upside.map(percent).unwrap_or_else(|| "-".to_string()),
        )?;
    }
    writeln!(out, "└────────┴───────────┴────────────┴────────────┴────────────┴──────────┘")?;

    if let Some(dcf) = report.dcf.as_ref().and_then(Outcome::result) {
        writeln!(
            out,
            "DCF: WACC {}, EV {}, terminal value {}",
            percent(dcf.wacc),
            money(dcf.enterprise_value),
            money(dcf.terminal.blended)
        )?;
    }
    if let Some(lbo) = report.lbo.as_ref().and_then(Outcome::result) {
        writeln!(
            out,
            "LBO: IRR {}, MOIC {}x over {} years, leverage risk {}",
            percent(lbo.exit.irr),
            lbo.exit.moic.round_dp(2),
            lbo.exit.holding_years,
            lbo.risk.leverage
        )?;
    }
    if let Some(cca) = report.cca.as_ref().and_then(Outcome::result) {
        writeln!(
            out,
            "CCA: {} multiples used, {} peers excluded, dispersion {}",
            cca.valuations.len(),
            cca.excluded.len(),
            money(cca.dispersion)
        )?;
    }
    if let Some(merger) = report.merger.as_ref().and_then(Outcome::result) {
        let accretion: Vec<String> = merger
            .years
            .iter()
            .map(|y| format!("Y{} {}", y.year, percent(y.accretion)))
            .collect();
        writeln!(
            out,
            "Merger vs {}: {}, deal risk {}",
            merger.target.company,
            accretion.join(", "),
            merger.risk.level
        )?;
    }
    for (method, error) in report.failures() {
        writeln!(out, "{} failed: {}", method.code(), error)?;
    }
    Ok(())
}

fn money(value: Decimal) -> String {
    value.round_dp(2).to_string()
}

fn percent(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).round_dp(1))
}
