//! Comparable company analysis.
//!
//! Peer trading multiples (EV/Revenue, EV/EBITDA, P/E) are summarised,
//! a base multiple is chosen per metric, adjusted for the target's growth
//! stage, size and profitability, and applied to the target's metrics.
//! The blended value is the mean of the per-share estimates that could be
//! formed.

use crate::method::{Valuation, ValuationMethod, ValueRange};
use crate::parallel::parallel_map;
use crate::tables;
use mna_core::math::statistics::{mean, SummaryStatistics};
use mna_core::types::{
    checked_ratio, divide, Classification, EngineError, EngineResult, Money, Rate, MAX_AMOUNT,
};
use mna_model::{FinancialModel, ModelReference};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Peer count at which the peer median replaces the industry table.
pub const MIN_PEERS_FOR_MEDIAN: usize = 3;
/// Multiplier steps for the implied-price sensitivity.
pub const MULTIPLE_FACTORS: [Decimal; 5] = [dec!(0.8), dec!(0.9), dec!(1.0), dec!(1.1), dec!(1.2)];

const LARGE_CAP: Money = dec!(10000000000);
const SMALL_CAP: Money = dec!(500000000);

/// A comparable listed company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Peer {
    /// Company name
    pub name: String,
    /// Equity market value
    pub market_cap: Money,
    /// Trailing revenue
    pub revenue: Money,
    /// Trailing EBITDA
    pub ebitda: Money,
    /// Trailing net income
    pub net_income: Money,
    /// Net debt; treated as zero when absent
    #[serde(default)]
    pub net_debt: Option<Money>,
}

impl Peer {
    /// Market cap plus net debt.
    pub fn enterprise_value(&self) -> Money {
        self.market_cap + self.net_debt.unwrap_or(Decimal::ZERO)
    }
}

/// Trading multiple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Multiple {
    /// Enterprise value over revenue
    EvRevenue,
    /// Enterprise value over EBITDA
    EvEbitda,
    /// Market cap over net income
    PriceEarnings,
}

impl Multiple {
    /// All multiples, table order.
    pub fn all() -> [Self; 3] {
        [Self::EvRevenue, Self::EvEbitda, Self::PriceEarnings]
    }

    /// Short label.
    pub fn name(&self) -> &'static str {
        match self {
            Self::EvRevenue => "EV/Revenue",
            Self::EvEbitda => "EV/EBITDA",
            Self::PriceEarnings => "P/E",
        }
    }

    fn index(&self) -> usize {
        match self {
            Self::EvRevenue => 0,
            Self::EvEbitda => 1,
            Self::PriceEarnings => 2,
        }
    }

    /// Whether the multiple values the enterprise rather than the equity.
    pub fn is_enterprise(&self) -> bool {
        !matches!(self, Self::PriceEarnings)
    }

    /// The peer's multiple; `None` when the denominator is not positive.
    pub fn of_peer(&self, peer: &Peer) -> Option<Decimal> {
        let (numerator, denominator) = match self {
            Self::EvRevenue => (peer.enterprise_value(), peer.revenue),
            Self::EvEbitda => (peer.enterprise_value(), peer.ebitda),
            Self::PriceEarnings => (peer.market_cap, peer.net_income),
        };
        if denominator <= Decimal::ZERO {
            None
        } else {
            checked_ratio(numerator, denominator)
        }
    }
}

impl fmt::Display for Multiple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Which target metrics the multiples are applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricBasis {
    /// Historical year
    #[default]
    Trailing,
    /// First projected year
    Forward,
}

/// CCA inputs beyond the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CcaParams {
    /// Classifier tags keying the stage premium and industry table
    pub classification: Classification,
    /// Peer set
    pub peers: Vec<Peer>,
    /// Target metric basis
    #[serde(default)]
    pub basis: MetricBasis,
}

impl CcaParams {
    /// Trailing-basis parameters over `peers`.
    pub fn new(classification: Classification, peers: Vec<Peer>) -> Self {
        Self {
            classification,
            peers,
            basis: MetricBasis::Trailing,
        }
    }

    /// Apply multiples to `basis` metrics.
    pub fn with_basis(mut self, basis: MetricBasis) -> Self {
        self.basis = basis;
        self
    }
}

/// Peer whose multiple could not be formed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exclusion {
    /// Peer name
    pub peer: String,
    /// Multiple that was not meaningful
    pub multiple: Multiple,
}

/// Where a base multiple came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MultipleSource {
    /// Median of at least three peers
    PeerMedian,
    /// Industry-average table (one or two peers)
    IndustryAverage,
}

/// Additive adjustments to a base multiple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MultipleAdjustments {
    /// Growth-stage premium or discount
    pub growth_stage: Rate,
    /// Size premium or discount
    pub size: Rate,
    /// Net-margin premium or discount
    pub profitability: Rate,
}

impl MultipleAdjustments {
    /// Sum of the three.
    pub fn total(&self) -> Rate {
        self.growth_stage + self.size + self.profitability
    }
}

/// One multiple applied to the target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultipleValuation {
    /// Multiple
    pub multiple: Multiple,
    /// Peer statistics over meaningful peers
    pub statistics: Option<SummaryStatistics>,
    /// Peers with a meaningful multiple
    pub coverage: usize,
    /// Base multiple source; `None` without peer coverage
    pub source: Option<MultipleSource>,
    /// Base multiple
    pub base: Option<Decimal>,
    /// `base × (1 + adjustments.total())`
    pub adjusted: Option<Decimal>,
    /// Target metric the multiple applies to
    pub target_metric: Money,
    /// Implied enterprise value (EV multiples only)
    pub implied_enterprise_value: Option<Money>,
    /// Implied equity value
    pub implied_equity_value: Option<Money>,
    /// Implied value per share; `None` when the multiple is unused or the
    /// target metric is not positive
    pub per_share: Option<Money>,
}

/// Implied prices across multiplier steps for one multiple.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultipleSensitivity {
    /// Multiple varied
    pub multiple: Multiple,
    /// (multiplier, implied per-share price)
    pub points: Vec<(Decimal, Money)>,
}

/// Full CCA output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CcaResult {
    /// Model valued
    pub model: ModelReference,
    /// Classifier tags used
    pub classification: Classification,
    /// Target metric basis
    pub basis: MetricBasis,
    /// Adjustments applied to every base multiple
    pub adjustments: MultipleAdjustments,
    /// One entry per multiple
    pub valuations: Vec<MultipleValuation>,
    /// Peers excluded per multiple
    pub excluded: Vec<Exclusion>,
    /// Mean of the per-share estimates formed
    pub blended_per_share: Money,
    /// Sample standard deviation of those estimates
    pub dispersion: Decimal,
    /// Lowest estimate
    pub low: Money,
    /// Highest estimate
    pub high: Money,
    /// Market price per share
    pub market_price: Money,
    /// `blended / market − 1`
    pub upside: Option<Rate>,
    /// Implied price sensitivity per multiple used
    pub sensitivity: Vec<MultipleSensitivity>,
}

impl CcaResult {
    /// Valuation for `multiple`.
    pub fn valuation(&self, multiple: Multiple) -> Option<&MultipleValuation> {
        self.valuations.iter().find(|v| v.multiple == multiple)
    }

    /// Per-share estimates that were formed.
    pub fn estimates(&self) -> Vec<Money> {
        self.valuations.iter().filter_map(|v| v.per_share).collect()
    }
}

impl Valuation for CcaResult {
    fn method(&self) -> ValuationMethod {
        ValuationMethod::Cca
    }

    fn model(&self) -> &ModelReference {
        &self.model
    }

    fn value_range(&self) -> Option<ValueRange> {
        Some(ValueRange::new(self.low, self.blended_per_share, self.high))
    }
}

/// CCA valuer.
#[derive(Debug, Clone)]
pub struct CcaValuer {
    params: CcaParams,
}

struct TargetMetrics {
    revenue: Money,
    ebitda: Money,
    net_income: Money,
}

impl TargetMetrics {
    fn get(&self, multiple: Multiple) -> Money {
        match multiple {
            Multiple::EvRevenue => self.revenue,
            Multiple::EvEbitda => self.ebitda,
            Multiple::PriceEarnings => self.net_income,
        }
    }
}

impl CcaValuer {
    /// Valuer with `params`.
    pub fn new(params: CcaParams) -> Self {
        Self { params }
    }

    /// Parameters in use.
    pub fn params(&self) -> &CcaParams {
        &self.params
    }

    /// Value the company in `model` against its peers.
    ///
    /// # Errors
    ///
    /// `Configuration` for a peer with non-positive market cap, or when no
    /// multiple yields a per-share estimate.
    pub fn value(&self, model: &FinancialModel) -> EngineResult<CcaResult> {
        let params = &self.params;
        for peer in &params.peers {
            if peer.market_cap <= Decimal::ZERO {
                return Err(EngineError::configuration(format!(
                    "peer '{}' has non-positive market cap {}",
                    peer.name, peer.market_cap
                )));
            }
            let figures = [
                peer.market_cap,
                peer.revenue,
                peer.ebitda,
                peer.net_income,
                peer.net_debt.unwrap_or(Decimal::ZERO),
            ];
            if figures.iter().any(|v| v.abs() > MAX_AMOUNT) {
                return Err(EngineError::configuration(format!(
                    "peer '{}' reports a figure above the supported magnitude {MAX_AMOUNT}",
                    peer.name
                )));
            }
        }

        let historical = model.historical();
        let target = match params.basis {
            MetricBasis::Trailing => TargetMetrics {
                revenue: historical.revenue,
                ebitda: historical.ebitda,
                net_income: historical.net_income,
            },
            MetricBasis::Forward => {
                let year1 = model
                    .period(1)
                    .ok_or_else(|| EngineError::configuration("model has no first projected year"))?;
                TargetMetrics {
                    revenue: year1.income.revenue,
                    ebitda: year1.income.ebitda,
                    net_income: year1.income.net_income,
                }
            }
        };

        let adjustments = adjustments(params.classification, historical.market_cap, &target);
        let net_debt = historical.net_debt();
        let shares = historical.shares_outstanding;

        let mut excluded = Vec::new();
        let mut valuations = Vec::with_capacity(3);
        for multiple in Multiple::all() {
            let mut values = Vec::with_capacity(params.peers.len());
            for peer in &params.peers {
                match multiple.of_peer(peer) {
                    Some(value) => values.push(value),
                    None => excluded.push(Exclusion {
                        peer: peer.name.clone(),
                        multiple,
                    }),
                }
            }
            valuations.push(self.apply(
                multiple,
                &values,
                &adjustments,
                target.get(multiple),
                net_debt,
                shares,
            )?);
        }
        if !excluded.is_empty() {
            tracing::debug!(count = excluded.len(), "peer multiples not meaningful");
        }

        let estimates: Vec<Money> = valuations.iter().filter_map(|v| v.per_share).collect();
        let stats = SummaryStatistics::from_values(&estimates).ok_or_else(|| {
            EngineError::configuration("no multiple produced a per-share estimate")
        })?;
        let blended_per_share = mean(&estimates).unwrap_or(stats.mean);

        let used: Vec<&MultipleValuation> = valuations
            .iter()
            .filter(|v| v.per_share.is_some())
            .collect();
        let sensitivity = parallel_map(&used, |v| sensitivity(v, net_debt, shares));

        tracing::debug!(
            company = %historical.company,
            estimates = estimates.len(),
            blended = %blended_per_share,
            "cca valued"
        );

        Ok(CcaResult {
            model: model.reference(),
            classification: params.classification,
            basis: params.basis,
            adjustments,
            valuations,
            excluded,
            blended_per_share,
            dispersion: stats.std_dev,
            low: stats.min,
            high: stats.max,
            market_price: historical.market_price,
            upside: checked_ratio(blended_per_share, historical.market_price)
                .map(|r| r - Decimal::ONE),
            sensitivity,
        })
    }

    fn apply(
        &self,
        multiple: Multiple,
        values: &[Decimal],
        adjustments: &MultipleAdjustments,
        target_metric: Money,
        net_debt: Money,
        shares: Decimal,
    ) -> EngineResult<MultipleValuation> {
        let statistics = SummaryStatistics::from_values(values);
        let coverage = values.len();
        let (source, base) = match &statistics {
            None => (None, None),
            Some(stats) if coverage >= MIN_PEERS_FOR_MEDIAN => {
                (Some(MultipleSource::PeerMedian), Some(stats.median))
            }
            Some(_) => {
                let table = tables::industry_multiples(self.params.classification.industry);
                (Some(MultipleSource::IndustryAverage), Some(table[multiple.index()]))
            }
        };
        let adjusted = base.and_then(|b| b.checked_mul(Decimal::ONE + adjustments.total()));

        let (implied_enterprise_value, implied_equity_value, per_share) = match adjusted {
            Some(m) if target_metric > Decimal::ZERO => {
                let overflow = || {
                    EngineError::configuration(format!(
                        "{multiple} implied value overflowed the decimal range"
                    ))
                };
                let implied = m.checked_mul(target_metric).ok_or_else(overflow)?;
                let (ev, equity) = if multiple.is_enterprise() {
                    (Some(implied), implied.checked_sub(net_debt).ok_or_else(overflow)?)
                } else {
                    (None, implied)
                };
                (ev, Some(equity), Some(divide(equity, shares, "shares outstanding")?))
            }
            _ => (None, None, None),
        };

        Ok(MultipleValuation {
            multiple,
            statistics,
            coverage,
            source,
            base,
            adjusted,
            target_metric,
            implied_enterprise_value,
            implied_equity_value,
            per_share,
        })
    }
}

fn adjustments(
    classification: Classification,
    market_cap: Money,
    target: &TargetMetrics,
) -> MultipleAdjustments {
    let size = if market_cap > LARGE_CAP {
        dec!(0.10)
    } else if market_cap < SMALL_CAP {
        dec!(-0.15)
    } else {
        Decimal::ZERO
    };

    let profitability = match checked_ratio(target.net_income, target.revenue) {
        Some(m) if m >= dec!(0.20) => dec!(0.10),
        Some(m) if m >= dec!(0.10) => dec!(0.05),
        Some(m) if m >= Decimal::ZERO => Decimal::ZERO,
        Some(_) => dec!(-0.10),
        None => Decimal::ZERO,
    };

    MultipleAdjustments {
        growth_stage: tables::stage_multiple_premium(classification.growth_stage),
        size,
        profitability,
    }
}

fn sensitivity(valuation: &MultipleValuation, net_debt: Money, shares: Decimal) -> MultipleSensitivity {
    let points = match valuation.adjusted {
        Some(m) => MULTIPLE_FACTORS
            .iter()
            .filter_map(|factor| {
                let implied = m.checked_mul(*factor)?.checked_mul(valuation.target_metric)?;
                let equity = if valuation.multiple.is_enterprise() {
                    implied.checked_sub(net_debt)?
                } else {
                    implied
                };
                checked_ratio(equity, shares).map(|price| (*factor, price))
            })
            .collect(),
        None => Vec::new(),
    };
    MultipleSensitivity {
        multiple: valuation.multiple,
        points,
    }
}
