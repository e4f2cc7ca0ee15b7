//! Concurrent fan-out of the valuers over one model.
//!
//! Each requested method runs as its own rayon task. A failing method is
//! reported as [`Outcome::Failed`] next to the others; it never aborts the
//! run.

use crate::cca::{CcaParams, CcaResult, CcaValuer};
use crate::dcf::{DcfParams, DcfResult, DcfValuer};
use crate::lbo::{LboParams, LboResult, LboValuer};
use crate::merger::{MergerParams, MergerResult, MergerValuer};
use crate::method::{Valuation, ValuationMethod};
use crate::outcome::Outcome;
use crate::summary::FootballField;
use mna_core::types::{EngineError, EngineResult};
use mna_model::{FinancialModel, ModelReference};
use serde::Serialize;

/// Target side of a merger request.
#[derive(Debug, Clone)]
pub struct MergerRequest<'a> {
    /// Target company model
    pub target: &'a FinancialModel,
    /// Deal terms
    pub params: MergerParams,
}

/// Methods to run and their parameters. Absent entries are skipped.
#[derive(Debug, Clone, Default)]
pub struct ValuationRequest<'a> {
    /// DCF parameters
    pub dcf: Option<DcfParams>,
    /// LBO parameters
    pub lbo: Option<LboParams>,
    /// CCA parameters
    pub cca: Option<CcaParams>,
    /// Merger target and terms; the valued model is the acquirer
    pub merger: Option<MergerRequest<'a>>,
}

impl<'a> ValuationRequest<'a> {
    /// Empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a DCF.
    pub fn with_dcf(mut self, params: DcfParams) -> Self {
        self.dcf = Some(params);
        self
    }

    /// Run an LBO.
    pub fn with_lbo(mut self, params: LboParams) -> Self {
        self.lbo = Some(params);
        self
    }

    /// Run a CCA.
    pub fn with_cca(mut self, params: CcaParams) -> Self {
        self.cca = Some(params);
        self
    }

    /// Run a merger analysis against `target`.
    pub fn with_merger(mut self, target: &'a FinancialModel, params: MergerParams) -> Self {
        self.merger = Some(MergerRequest { target, params });
        self
    }

    /// Methods requested.
    pub fn methods(&self) -> Vec<ValuationMethod> {
        let mut methods = Vec::with_capacity(4);
        if self.dcf.is_some() {
            methods.push(ValuationMethod::Dcf);
        }
        if self.lbo.is_some() {
            methods.push(ValuationMethod::Lbo);
        }
        if self.cca.is_some() {
            methods.push(ValuationMethod::Cca);
        }
        if self.merger.is_some() {
            methods.push(ValuationMethod::Merger);
        }
        methods
    }
}

/// Everything one run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuationReport {
    /// Model valued
    pub model: ModelReference,
    /// DCF outcome, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dcf: Option<Outcome<DcfResult>>,
    /// LBO outcome, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lbo: Option<Outcome<LboResult>>,
    /// CCA outcome, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cca: Option<Outcome<CcaResult>>,
    /// Merger outcome, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merger: Option<Outcome<MergerResult>>,
    /// Per-share ranges of the completed methods
    pub summary: FootballField,
}

impl ValuationReport {
    /// Failed methods with their errors.
    pub fn failures(&self) -> Vec<(ValuationMethod, &EngineError)> {
        let entries = [
            (ValuationMethod::Dcf, self.dcf.as_ref().and_then(Outcome::error)),
            (ValuationMethod::Lbo, self.lbo.as_ref().and_then(Outcome::error)),
            (ValuationMethod::Cca, self.cca.as_ref().and_then(Outcome::error)),
            (
                ValuationMethod::Merger,
                self.merger.as_ref().and_then(Outcome::error),
            ),
        ];
        entries
            .into_iter()
            .filter_map(|(method, error)| error.map(|e| (method, e)))
            .collect()
    }

    /// Number of methods that completed.
    pub fn completed_count(&self) -> usize {
        [
            self.dcf.as_ref().is_some_and(Outcome::is_completed),
            self.lbo.as_ref().is_some_and(Outcome::is_completed),
            self.cca.as_ref().is_some_and(Outcome::is_completed),
            self.merger.as_ref().is_some_and(Outcome::is_completed),
        ]
        .iter()
        .filter(|c| **c)
        .count()
    }
}

/// Stateless valuation engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValuationEngine;

impl ValuationEngine {
    /// Create an engine.
    pub fn new() -> Self {
        Self
    }

    /// Run every requested method on `model` concurrently.
    pub fn run(&self, model: &FinancialModel, request: &ValuationRequest<'_>) -> ValuationReport {
        let reference = model.reference();
        tracing::info!(
            company = %reference.company,
            methods = ?request.methods(),
            "valuation started"
        );

        let ((dcf, lbo), (cca, merger)) = rayon::join(
            || {
                rayon::join(
                    || {
                        request.dcf.as_ref().map(|p| {
                            record(ValuationMethod::Dcf, DcfValuer::new(p.clone()).value(model))
                        })
                    },
                    || {
                        request.lbo.as_ref().map(|p| {
                            record(ValuationMethod::Lbo, LboValuer::new(p.clone()).value(model))
                        })
                    },
                )
            },
            || {
                rayon::join(
                    || {
                        request.cca.as_ref().map(|p| {
                            record(ValuationMethod::Cca, CcaValuer::new(p.clone()).value(model))
                        })
                    },
                    || {
                        request.merger.as_ref().map(|m| {
                            record(
                                ValuationMethod::Merger,
                                MergerValuer::new(m.params.clone()).value(model, m.target),
                            )
                        })
                    },
                )
            },
        );

        let mut completed: Vec<&dyn Valuation> = Vec::with_capacity(4);
        if let Some(r) = dcf.as_ref().and_then(Outcome::result) {
            completed.push(r);
        }
        if let Some(r) = lbo.as_ref().and_then(Outcome::result) {
            completed.push(r);
        }
        if let Some(r) = cca.as_ref().and_then(Outcome::result) {
            completed.push(r);
        }
        if let Some(r) = merger.as_ref().and_then(Outcome::result) {
            completed.push(r);
        }
        let summary = FootballField::from_valuations(model.historical().market_price, &completed);

        let report = ValuationReport {
            model: reference,
            dcf,
            lbo,
            cca,
            merger,
            summary,
        };
        tracing::info!(
            company = %report.model.company,
            completed = report.completed_count(),
            failed = report.failures().len(),
            "valuation finished"
        );
        report
    }
}

fn record<T>(method: ValuationMethod, result: EngineResult<T>) -> Outcome<T> {
    match &result {
        Ok(_) => tracing::debug!(method = %method, "valuation method completed"),
        Err(err) => tracing::warn!(method = %method, kind = err.kind(), error = %err, "valuation method failed"),
    }
    result.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cca::Peer;
    use crate::test_support::{acme_model, mature_other, scaled_model};
    use rust_decimal_macros::dec;

    fn peers() -> Vec<Peer> {
        ["A", "B", "C"]
            .iter()
            .zip([dec!(1000), dec!(2000), dec!(3000)])
            .map(|(name, cap)| Peer {
                name: name.to_string(),
                market_cap: cap,
                revenue: cap / dec!(2),
                ebitda: cap / dec!(10),
                net_income: cap / dec!(20),
                net_debt: None,
            })
            .collect()
    }

    #[test]
    fn test_all_methods_complete() {
        let model = acme_model(5);
        let target = scaled_model("Target", dec!(0.2), 5);
        let request = ValuationRequest::new()
            .with_dcf(DcfParams::new(mature_other()))
            .with_lbo(LboParams::new(mature_other()))
            .with_cca(CcaParams::new(mature_other(), peers()))
            .with_merger(&target, MergerParams::default());

        let report = ValuationEngine::new().run(&model, &request);
        assert_eq!(report.completed_count(), 4);
        assert!(report.failures().is_empty());
        // DCF, LBO and CCA bars; the merger has no per-share value
        assert_eq!(report.summary.bars.len(), 3);
        assert_eq!(report.model.company, "Acme");
    }

    #[test]
    fn test_failure_is_isolated() {
        let model = acme_model(5);
        let request = ValuationRequest::new()
            .with_dcf(DcfParams::new(mature_other()).with_terminal_growth(dec!(0.5)))
            .with_cca(CcaParams::new(mature_other(), peers()));

        let report = ValuationEngine::new().run(&model, &request);
        assert!(report.dcf.as_ref().unwrap().is_failed());
        assert!(report.cca.as_ref().unwrap().is_completed());
        assert!(report.lbo.is_none());
        let failures = report.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, ValuationMethod::Dcf);
        assert!(failures[0].1.is_configuration());
        assert_eq!(report.summary.bars.len(), 1);
    }

    #[test]
    fn test_report_serialises_outcomes() {
        let model = acme_model(5);
        let request = ValuationRequest::new()
            .with_dcf(DcfParams::new(mature_other()).with_terminal_growth(dec!(0.5)));
        let report = ValuationEngine::new().run(&model, &request);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["dcf"]["status"], "failed");
        assert_eq!(json["dcf"]["error"]["kind"], "configuration");
        assert!(json.get("lbo").is_none());
    }

    #[test]
    fn test_empty_request() {
        let report = ValuationEngine::new().run(&acme_model(5), &ValuationRequest::new());
        assert_eq!(report.completed_count(), 0);
        assert!(report.summary.bars.is_empty());
        assert!(ValuationRequest::new().methods().is_empty());
    }
}
