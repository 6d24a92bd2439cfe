//! Progressive federal tax calculation with per-bracket breakdown
//!
//! The ordinary-income walk visits brackets in ascending order and
//! taxes `min(remaining_income, bracket_width)` at each rate. Capital
//! gains use a separate stacking rule: gains sit conceptually on top of
//! ordinary income, never below it.

use serde::{Deserialize, Serialize};

use crate::model::FilingStatus;
use crate::tax::brackets::TaxBracketTable;

/// Tax contributed by one bracket of the walk
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BracketContribution {
    pub rate: f64,
    pub lower: f64,
    /// Upper end of the income actually taxed in this bracket
    pub upper: f64,
    pub tax: f64,
}

/// Total tax, the breakdown that produced it, and the top marginal rate
/// actually reached
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FederalTaxResult {
    pub total_tax: f64,
    pub marginal_rate: f64,
    pub brackets: Vec<BracketContribution>,
}

/// Federal tax on ordinary taxable income (after deductions).
/// Negative income is treated as zero.
#[must_use]
pub fn federal_tax(taxable_income: f64, status: FilingStatus) -> FederalTaxResult {
    let mut result = FederalTaxResult {
        total_tax: 0.0,
        marginal_rate: 0.0,
        brackets: Vec::new(),
    };
    if taxable_income <= 0.0 {
        return result;
    }

    let mut remaining = taxable_income;
    for bracket in TaxBracketTable::federal(status) {
        if remaining <= 0.0 {
            break;
        }
        let in_bracket = remaining.min(bracket.width());
        if in_bracket <= 0.0 {
            // Zero-width bracket contributes nothing
            continue;
        }
        let tax = in_bracket * bracket.rate;
        result.brackets.push(BracketContribution {
            rate: bracket.rate,
            lower: bracket.lower,
            upper: bracket.lower + in_bracket,
            tax,
        });
        result.total_tax += tax;
        result.marginal_rate = bracket.rate;
        remaining -= in_bracket;
    }

    result
}

/// Tax on `additional` ordinary income stacked on top of `base_income`
#[must_use]
pub fn marginal_tax(additional: f64, base_income: f64, status: FilingStatus) -> f64 {
    federal_tax(base_income + additional, status).total_tax
        - federal_tax(base_income, status).total_tax
}

/// Long-term capital-gains tax with ordinary income stacking.
///
/// Ordinary taxable income fills the bottom of the capital-gains
/// schedule first; each bracket then taxes the portion of
/// (ordinary + gains) above its lower bound, capped at the gains amount
/// and the bracket ceiling.
#[must_use]
pub fn capital_gains_tax(ordinary_income: f64, gains: f64, status: FilingStatus) -> f64 {
    if gains <= 0.0 {
        return 0.0;
    }
    let ordinary = ordinary_income.max(0.0);
    let stacked_top = ordinary + gains;

    let mut tax = 0.0;
    for bracket in TaxBracketTable::capital_gains(status) {
        let taxed_from = ordinary.max(bracket.lower);
        let taxed_to = stacked_top.min(bracket.upper);
        if taxed_to > taxed_from {
            tax += (taxed_to - taxed_from) * bracket.rate;
        }
    }
    tax
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_100k() {
        // 11,600 @10% + 35,550 @12% + 52,850 @22% = 17,053
        let result = federal_tax(100_000.0, FilingStatus::Single);
        assert!(
            (result.total_tax - 17_053.0).abs() < 0.5,
            "Expected ~17,053, got {}",
            result.total_tax
        );
        assert_eq!(result.marginal_rate, 0.22);
        assert_eq!(result.brackets.len(), 3);
    }

    #[test]
    fn test_married_joint_100k() {
        // 23,200 @10% + 71,100 @12% + 5,700 @22% = 12,106
        let result = federal_tax(100_000.0, FilingStatus::MarriedJoint);
        assert!(
            (result.total_tax - 12_106.0).abs() < 0.5,
            "Expected ~12,106, got {}",
            result.total_tax
        );
    }

    #[test]
    fn test_zero_and_negative_income() {
        assert_eq!(federal_tax(0.0, FilingStatus::Single).total_tax, 0.0);
        assert_eq!(federal_tax(-500.0, FilingStatus::Single).total_tax, 0.0);
    }

    #[test]
    fn test_continuous_at_bracket_boundaries() {
        // Tax at an exact boundary equals the sum of all lower-bracket
        // contributions, and approaching income from below converges to it
        for boundary in [11_600.0, 47_150.0, 100_525.0, 191_950.0] {
            let at = federal_tax(boundary, FilingStatus::Single).total_tax;
            let below = federal_tax(boundary - 0.01, FilingStatus::Single).total_tax;
            let expected: f64 = federal_tax(boundary, FilingStatus::Single)
                .brackets
                .iter()
                .map(|b| b.tax)
                .sum();
            assert!((at - expected).abs() < 1e-9);
            assert!((at - below).abs() < 0.01, "discontinuity at {boundary}");
        }
    }

    #[test]
    fn test_breakdown_sums_to_total() {
        let result = federal_tax(250_000.0, FilingStatus::Single);
        let sum: f64 = result.brackets.iter().map(|b| b.tax).sum();
        assert!((sum - result.total_tax).abs() < 1e-9);
        assert_eq!(result.marginal_rate, 0.35);
    }

    #[test]
    fn test_marginal_tax() {
        // 10,000 on top of 40,000 single: 7,150 @12% + 2,850 @22% = 1,485
        let tax = marginal_tax(10_000.0, 40_000.0, FilingStatus::Single);
        assert!((tax - 1_485.0).abs() < 0.5, "Expected ~1,485, got {tax}");
    }

    #[test]
    fn test_gains_entirely_in_zero_bracket() {
        // Ordinary 20,000 + gains 20,000 stays under the 47,025 ceiling
        let tax = capital_gains_tax(20_000.0, 20_000.0, FilingStatus::Single);
        assert_eq!(tax, 0.0);
    }

    #[test]
    fn test_gains_straddle_zero_and_fifteen() {
        // Ordinary 40,000: 7,025 of gains at 0%, the rest at 15%
        let tax = capital_gains_tax(40_000.0, 20_000.0, FilingStatus::Single);
        let expected = (20_000.0 - 7_025.0) * 0.15;
        assert!((tax - expected).abs() < 0.01, "Expected {expected}, got {tax}");
    }

    #[test]
    fn test_gains_stack_on_top_never_below() {
        // High ordinary income pushes all gains into the 15% bracket even
        // though the gains amount alone would fit the 0% bracket
        let tax = capital_gains_tax(200_000.0, 30_000.0, FilingStatus::Single);
        assert!((tax - 30_000.0 * 0.15).abs() < 0.01);
    }

    #[test]
    fn test_no_gains_no_tax() {
        assert_eq!(capital_gains_tax(500_000.0, 0.0, FilingStatus::Single), 0.0);
        assert_eq!(
            capital_gains_tax(500_000.0, -10.0, FilingStatus::Single),
            0.0
        );
    }
}
