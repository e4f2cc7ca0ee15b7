//! JSON request files.
//!
//! A company entry carries the provider payload, the classifier tags and,
//! optionally, an explicit assumption set. Without one the growth-stage rule
//! table supplies the assumptions for the configured horizon.

use mna_core::types::Classification;
use mna_model::assumptions::defaults::for_stage;
use mna_model::{
    normalize, AssumptionSet, FinancialModel, ProjectionConfig, Projector, RawFinancials, Scenario,
};
use mna_valuation::{
    CcaParams, DcfParams, FinancingMix, LboParams, MarketAssumptions, MergerParams, MetricBasis,
    Peer, ValuationRequest,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

use crate::{CliError, Result};

/// One company to project.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompanyInput {
    /// Provider payload
    pub financials: RawFinancials,
    /// Classifier tags
    pub classification: Classification,
    /// Explicit assumptions; the stage table when absent
    #[serde(default)]
    pub assumptions: Option<AssumptionSet>,
    /// Scenario applied on top of the assumptions
    #[serde(default)]
    pub scenario: Option<Scenario>,
}

impl CompanyInput {
    /// Normalise, resolve assumptions and project.
    pub fn build_model(&self, config: &ProjectionConfig) -> Result<FinancialModel> {
        let historical = normalize(&self.financials)?;
        let base = match &self.assumptions {
            Some(set) => set.clone(),
            None => {
                debug!(
                    company = %self.financials.company,
                    stage = %self.classification.growth_stage,
                    "using growth-stage assumption table"
                );
                for_stage(self.classification.growth_stage, config.horizon)?
            }
        };
        let assumptions = match self.scenario {
            Some(scenario) => base.for_scenario(scenario),
            None => base,
        };
        let model = Projector::new(config.clone()).project(&historical, &assumptions)?;
        info!(
            company = %self.financials.company,
            horizon = model.horizon(),
            "model projected"
        );
        Ok(model)
    }
}

/// DCF overrides.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DcfInput {
    pub beta: Option<Decimal>,
    pub terminal_growth: Option<Decimal>,
    pub exit_multiple: Option<Decimal>,
}

impl DcfInput {
    fn params(&self, classification: Classification, market: MarketAssumptions) -> DcfParams {
        let mut params = DcfParams::new(classification).with_market(market);
        params.beta = self.beta;
        params.terminal_growth = self.terminal_growth;
        params.exit_multiple = self.exit_multiple;
        params
    }
}

/// LBO overrides.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LboInput {
    pub purchase_price: Option<Decimal>,
    pub financing: Option<FinancingMix>,
    pub holding_years: Option<usize>,
    pub exit_multiple: Option<Decimal>,
}

impl LboInput {
    fn params(&self, classification: Classification) -> LboParams {
        let mut params = LboParams::new(classification);
        params.purchase_price = self.purchase_price;
        params.financing = self.financing;
        params.exit_multiple = self.exit_multiple;
        if let Some(years) = self.holding_years {
            params = params.with_holding_years(years);
        }
        params
    }
}

/// Peer set for the CCA.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CcaInput {
    pub peers: Vec<Peer>,
    #[serde(default)]
    pub basis: MetricBasis,
}

/// Merger target and deal terms.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MergerInput {
    pub target: CompanyInput,
    #[serde(default)]
    pub terms: MergerParams,
}

/// Contents of a `value` request file.
///
/// Each method section present is run. A file with no method section runs
/// the DCF and the LBO on table defaults, the two methods that need no
/// further input.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ValuationInput {
    /// Company valued (the acquirer in a merger)
    pub company: CompanyInput,
    #[serde(default)]
    pub dcf: Option<DcfInput>,
    #[serde(default)]
    pub lbo: Option<LboInput>,
    #[serde(default)]
    pub cca: Option<CcaInput>,
    #[serde(default)]
    pub merger: Option<MergerInput>,
}

impl ValuationInput {
    fn has_methods(&self) -> bool {
        self.dcf.is_some() || self.lbo.is_some() || self.cca.is_some() || self.merger.is_some()
    }

    /// Engine request for this input. `target` must be the projected merger
    /// target when a merger section is present.
    pub fn to_request<'a>(
        &self,
        market: MarketAssumptions,
        target: Option<&'a FinancialModel>,
    ) -> Result<ValuationRequest<'a>> {
        let tags = self.company.classification;
        let mut request = ValuationRequest::new();

        if !self.has_methods() {
            return Ok(request
                .with_dcf(DcfInput::default().params(tags, market))
                .with_lbo(LboInput::default().params(tags)));
        }
        if let Some(dcf) = &self.dcf {
            request = request.with_dcf(dcf.params(tags, market));
        }
        if let Some(lbo) = &self.lbo {
            request = request.with_lbo(lbo.params(tags));
        }
        if let Some(cca) = &self.cca {
            request = request
                .with_cca(CcaParams::new(tags, cca.peers.clone()).with_basis(cca.basis));
        }
        if let Some(merger) = &self.merger {
            let target = target.ok_or_else(|| {
                CliError::InvalidArgument("merger section requires a projected target".to_string())
            })?;
            request = request.with_merger(target, merger.terms.clone());
        }
        Ok(request)
    }
}

/// Read and parse a JSON file.
pub fn read_json<T>(path: &Path) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    if !path.exists() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
