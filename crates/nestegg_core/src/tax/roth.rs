//! Roth conversion bracket-space analysis and optimal-conversion search
//!
//! A conversion is extra ordinary income in the conversion year traded
//! for tax-free growth afterwards. The cost has two parts: the federal
//! marginal tax on the converted amount and any IRMAA tier the higher
//! Modified AGI triggers two years later.

use serde::{Deserialize, Serialize};

use crate::model::FilingStatus;
use crate::tax::brackets::TaxBracketTable;
use crate::tax::federal::marginal_tax;
use crate::tax::irmaa;

/// Remaining room below one bounded bracket's ceiling
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BracketRoom {
    pub rate: f64,
    pub ceiling: f64,
    /// Income that can still be added before crossing the ceiling
    pub room: f64,
    /// Federal tax cost of filling that room
    pub tax_to_fill: f64,
}

/// Room analysis for every bounded bracket at or above the current
/// income. The top unbounded bracket is excluded; there is no ceiling
/// to convert up to.
#[must_use]
pub fn bracket_space(taxable_income: f64, status: FilingStatus) -> Vec<BracketRoom> {
    let income = taxable_income.max(0.0);
    TaxBracketTable::federal(status)
        .iter()
        .filter(|b| b.upper.is_finite() && b.upper > income)
        .map(|b| {
            let room = b.upper - income;
            BracketRoom {
                rate: b.rate,
                ceiling: b.upper,
                room,
                tax_to_fill: marginal_tax(room, income, status),
            }
        })
        .collect()
}

/// Cost breakdown of a proposed conversion amount
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConversionAnalysis {
    pub conversion: f64,
    pub federal_tax_delta: f64,
    pub irmaa_delta: f64,
    pub total_cost: f64,
    /// Total cost as a fraction of the converted amount
    pub effective_rate: f64,
}

/// Tax and IRMAA consequences of converting `conversion` dollars on top
/// of `taxable_income`. The same income figure serves as Modified AGI
/// for the IRMAA comparison.
#[must_use]
pub fn analyze_conversion(
    taxable_income: f64,
    conversion: f64,
    status: FilingStatus,
) -> ConversionAnalysis {
    let conversion = conversion.max(0.0);
    let federal_tax_delta = marginal_tax(conversion, taxable_income, status);
    let irmaa_delta = irmaa::surcharge(taxable_income + conversion, status).annual_surcharge
        - irmaa::surcharge(taxable_income, status).annual_surcharge;
    let total_cost = federal_tax_delta + irmaa_delta;

    ConversionAnalysis {
        conversion,
        federal_tax_delta,
        irmaa_delta,
        total_cost,
        effective_rate: if conversion > 0.0 {
            total_cost / conversion
        } else {
            0.0
        },
    }
}

/// A conversion sized to fill brackets up to an acceptable rate
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OptimalConversion {
    pub amount: f64,
    /// Rate of the bracket whose ceiling the conversion fills to
    pub target_bracket_rate: f64,
    pub ceiling: f64,
    pub analysis: ConversionAnalysis,
}

/// Largest conversion that stays at or below `max_marginal_rate`,
/// bounded by the available pre-tax balance. None when the current
/// income already exceeds every acceptable ceiling or nothing is
/// available to convert.
#[must_use]
pub fn optimal_conversion(
    taxable_income: f64,
    available_balance: f64,
    max_marginal_rate: f64,
    status: FilingStatus,
) -> Option<OptimalConversion> {
    if available_balance <= 0.0 {
        return None;
    }

    // Highest bounded bracket whose rate is acceptable
    let target = TaxBracketTable::federal(status)
        .iter()
        .filter(|b| b.upper.is_finite() && b.rate <= max_marginal_rate)
        .last()?;

    let room = target.upper - taxable_income.max(0.0);
    if room <= 0.0 {
        return None;
    }

    let amount = room.min(available_balance);
    Some(OptimalConversion {
        amount,
        target_bracket_rate: target.rate,
        ceiling: target.upper,
        analysis: analyze_conversion(taxable_income, amount, status),
    })
}
