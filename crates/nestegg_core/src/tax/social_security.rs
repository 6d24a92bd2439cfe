//! Social Security benefit taxability and claiming-age analysis
//!
//! Taxability follows the three-tier statutory formula on combined
//! income, including the "lesser of" caps at each tier. Claiming-age
//! analysis adjusts the Primary Insurance Amount for early claiming
//! (two-tier monthly reduction) or delayed credits (8% per year).

use serde::{Deserialize, Serialize};

use crate::model::FilingStatus;
use crate::tax::brackets::TaxBracketTable;

/// Full retirement age for the cohorts this engine models
pub const FULL_RETIREMENT_AGE: u8 = 67;

/// Earliest and latest claiming ages
pub const EARLIEST_CLAIM_AGE: u8 = 62;
pub const LATEST_CLAIM_AGE: u8 = 70;

/// Taxable portion of an annual Social Security benefit.
///
/// Combined income = other taxable income + tax-exempt interest + half
/// the benefit. Below the first threshold nothing is taxable; between
/// the thresholds up to 50% is; above the second threshold up to 85% is.
#[must_use]
pub fn taxable_benefit(
    other_income: f64,
    tax_exempt_interest: f64,
    annual_benefit: f64,
    status: FilingStatus,
) -> f64 {
    if annual_benefit <= 0.0 {
        return 0.0;
    }
    let (first, second) = TaxBracketTable::ss_thresholds(status);
    let combined = other_income.max(0.0) + tax_exempt_interest.max(0.0) + 0.5 * annual_benefit;

    if combined <= first {
        return 0.0;
    }

    if combined <= second {
        // Middle tier: lesser of half the benefit or half the excess
        return (0.5 * annual_benefit).min(0.5 * (combined - first));
    }

    // Top tier: the capped middle-tier amount plus 85% of the excess
    // over the second threshold, capped at 85% of the benefit
    let middle_tier_base = (0.5 * annual_benefit).min(0.5 * (second - first));
    let top = middle_tier_base + 0.85 * (combined - second);
    top.min(0.85 * annual_benefit)
}

/// Monthly benefit for a claiming age, as a multiple of the PIA.
///
/// Early claiming reduces 5/9 of 1% per month for the first 36 months
/// before full retirement age and 5/12 of 1% per month beyond that.
/// Delayed claiming credits 8% per year after full retirement age,
/// and stop accruing at 70; ages outside 62-70 clamp to the nearest
/// statutory bound.
#[must_use]
pub fn benefit_factor(claim_age: u8) -> f64 {
    let claim_age = claim_age.clamp(EARLIEST_CLAIM_AGE, LATEST_CLAIM_AGE);
    let fra_months = i32::from(FULL_RETIREMENT_AGE) * 12;
    let claim_months = i32::from(claim_age) * 12;

    if claim_months < fra_months {
        let months_early = fra_months - claim_months;
        let first_36 = months_early.min(36);
        let beyond = (months_early - 36).max(0);
        1.0 - f64::from(first_36) * (5.0 / 900.0) - f64::from(beyond) * (5.0 / 1200.0)
    } else {
        let years_late = f64::from(claim_months - fra_months) / 12.0;
        1.0 + 0.08 * years_late
    }
}

/// One candidate claiming age in the analysis grid
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClaimingAgePoint {
    pub age: u8,
    pub monthly_benefit: f64,
    pub annual_benefit: f64,
    /// Undiscounted benefit total through life expectancy
    pub lifetime_benefit: f64,
    /// Present value of the benefit stream at the configured discount rate
    pub discounted_lifetime: f64,
    /// Age at which delaying from the prior age pays for itself, if the
    /// benefit increase is positive
    pub break_even_age: Option<f64>,
}

/// Claiming grid across ages 62-70 plus the lifetime-maximizing age
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimingAnalysis {
    pub points: Vec<ClaimingAgePoint>,
    pub optimal_age: u8,
}

/// Build the claiming-age grid for a worker with Primary Insurance
/// Amount `pia_monthly`, assuming benefits run through `life_expectancy`.
#[must_use]
pub fn claiming_analysis(
    pia_monthly: f64,
    life_expectancy: u8,
    discount_rate: f64,
) -> ClaimingAnalysis {
    let mut points = Vec::with_capacity(usize::from(LATEST_CLAIM_AGE - EARLIEST_CLAIM_AGE) + 1);

    for age in EARLIEST_CLAIM_AGE..=LATEST_CLAIM_AGE {
        let monthly = pia_monthly * benefit_factor(age);
        let annual = monthly * 12.0;
        let years_of_benefit = f64::from(life_expectancy.saturating_sub(age));
        let lifetime = annual * years_of_benefit;

        // Discount each benefit year back to the claiming decision
        let mut discounted = 0.0;
        for year in 0..years_of_benefit as u32 {
            discounted += annual / (1.0 + discount_rate).powi(year as i32);
        }

        let break_even_age = if age > EARLIEST_CLAIM_AGE {
            let prior_annual = pia_monthly * benefit_factor(age - 1) * 12.0;
            let increase = annual - prior_annual;
            if increase > 0.0 {
                // Delaying one year forgoes a year of the prior benefit;
                // the raise repays it over foregone/increase years
                Some(f64::from(age) + prior_annual / increase)
            } else {
                None
            }
        } else {
            None
        };

        points.push(ClaimingAgePoint {
            age,
            monthly_benefit: monthly,
            annual_benefit: annual,
            lifetime_benefit: lifetime,
            discounted_lifetime: discounted,
            break_even_age,
        });
    }

    let optimal_age = points
        .iter()
        .max_by(|a, b| {
            a.lifetime_benefit
                .partial_cmp(&b.lifetime_benefit)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map_or(FULL_RETIREMENT_AGE, |p| p.age);

    ClaimingAnalysis {
        points,
        optimal_age,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_first_threshold_nothing_taxable() {
        // MFJ: combined = 20,000 + 10,000 = 30,000, under 32,000
        let taxable = taxable_benefit(20_000.0, 0.0, 20_000.0, FilingStatus::MarriedJoint);
        assert_eq!(taxable, 0.0);
    }

    #[test]
    fn test_top_tier_caps_at_85_percent() {
        // MFJ: combined = 100,000 + 20,000 = 120,000, far above 44,000
        let taxable = taxable_benefit(100_000.0, 0.0, 40_000.0, FilingStatus::MarriedJoint);
        assert!(
            (taxable - 40_000.0 * 0.85).abs() < 0.01,
            "Expected 34,000, got {taxable}"
        );
    }

    #[test]
    fn test_middle_tier_lesser_of_cap() {
        // MFJ: combined = 30,000 + 10,000 = 40,000, between thresholds.
        // Half the excess (4,000) is less than half the benefit (10,000)
        let taxable = taxable_benefit(30_000.0, 0.0, 20_000.0, FilingStatus::MarriedJoint);
        assert!((taxable - 4_000.0).abs() < 0.01, "Expected 4,000, got {taxable}");
    }

    #[test]
    fn test_tax_exempt_interest_counts_toward_combined() {
        let without = taxable_benefit(30_000.0, 0.0, 20_000.0, FilingStatus::MarriedJoint);
        let with = taxable_benefit(30_000.0, 5_000.0, 20_000.0, FilingStatus::MarriedJoint);
        assert!(with > without);
    }

    #[test]
    fn test_benefit_factor_at_fra_is_one() {
        assert!((benefit_factor(67) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_benefit_factor_at_62() {
        // 36 months at 5/9% + 24 months at 5/12% = 20% + 10% = 30% reduction
        assert!((benefit_factor(62) - 0.70).abs() < 1e-9);
    }

    #[test]
    fn test_benefit_factor_at_70() {
        // Three years of delayed credits at 8%
        assert!((benefit_factor(70) - 1.24).abs() < 1e-9);
    }

    #[test]
    fn test_benefit_factor_clamps_outside_statutory_range() {
        // Delayed credits stop accruing at 70; early reduction stops at 62
        assert!((benefit_factor(75) - 1.24).abs() < 1e-9);
        assert!((benefit_factor(58) - 0.70).abs() < 1e-9);
    }

    #[test]
    fn test_factors_increase_with_age() {
        for age in 62..70u8 {
            assert!(benefit_factor(age) < benefit_factor(age + 1));
        }
    }

    #[test]
    fn test_claiming_grid_shape() {
        let analysis = claiming_analysis(2_000.0, 90, 0.03);
        assert_eq!(analysis.points.len(), 9);
        assert_eq!(analysis.points[0].age, 62);
        assert_eq!(analysis.points[8].age, 70);
        assert!(analysis.points[0].break_even_age.is_none());
        assert!(analysis.points[1].break_even_age.is_some());
    }

    #[test]
    fn test_long_life_favors_delay() {
        let analysis = claiming_analysis(2_000.0, 95, 0.03);
        assert_eq!(analysis.optimal_age, 70);
    }

    #[test]
    fn test_short_life_favors_early_claim() {
        let analysis = claiming_analysis(2_000.0, 75, 0.03);
        assert!(analysis.optimal_age < 67);
    }
}
