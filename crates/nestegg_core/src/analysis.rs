//! Point-in-time tax analysis and ranked optimization suggestions
//!
//! Everything here is stateless arithmetic over a [`HouseholdProfile`]:
//! a current-year tax snapshot, Roth conversion sizing, forward RMD
//! projections, claiming-age grids, state comparisons, and the ranked
//! recommendation list that ties them together. The Monte Carlo engine
//! never calls into this module; both read the same profile.

use serde::{Deserialize, Serialize};

use crate::model::{HouseholdProfile, Recommendation, RecommendationCategory, TaxSnapshot};
use crate::tax::brackets::TaxBracketTable;
use crate::tax::federal::{capital_gains_tax, federal_tax};
use crate::tax::irmaa;
use crate::tax::rmd::{self, RMD_START_AGE, RmdProjectionYear};
use crate::tax::roth::{self, BracketRoom, OptimalConversion};
use crate::tax::social_security::{ClaimingAnalysis, FULL_RETIREMENT_AGE, benefit_factor, claiming_analysis, taxable_benefit};

/// Conversions are sized to fill brackets no higher than this rate
const DEFAULT_CONVERSION_RATE_CAP: f64 = 0.24;

/// Flat state tax applies to one year's taxable income in a comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateComparison {
    pub code: String,
    pub rate: f64,
    pub annual_tax: f64,
    /// Positive when moving to this state would lower the bill
    pub savings_vs_current: f64,
}

/// Tax analysis over one household in one tax year
pub struct TaxAnalyzer<'a> {
    profile: &'a HouseholdProfile,
    tables: TaxBracketTable,
    as_of_year: i16,
}

impl<'a> TaxAnalyzer<'a> {
    #[must_use]
    pub fn new(profile: &'a HouseholdProfile, as_of_year: i16) -> Self {
        Self {
            profile,
            tables: TaxBracketTable::default(),
            as_of_year,
        }
    }

    /// Annual Social Security benefit for everyone already claiming
    /// this year, at their claiming-age-adjusted amount
    fn annual_ss_benefit(&self) -> f64 {
        self.profile
            .persons
            .iter()
            .filter_map(|p| {
                let claim_age = p.ss_claim_age.unwrap_or(FULL_RETIREMENT_AGE);
                (p.age_in_year(self.as_of_year) >= i16::from(claim_age))
                    .then(|| p.monthly_ss_benefit * benefit_factor(claim_age) * 12.0)
            })
            .sum()
    }

    /// Ordinary income from every stream active this year
    fn ordinary_income(&self) -> f64 {
        let retirement_year = self.profile.retirement_year(self.as_of_year);
        self.profile
            .income_streams
            .iter()
            .filter(|s| s.active_in(self.as_of_year, retirement_year))
            .map(|s| s.annual_amount)
            .sum()
    }

    /// Full tax picture for the current year, with `realized_gains` of
    /// long-term capital gains stacked on top of ordinary income
    #[must_use]
    pub fn snapshot(&self, realized_gains: f64) -> TaxSnapshot {
        let status = self.profile.filing_status;
        let ordinary = self.ordinary_income();
        let ss_benefit = self.annual_ss_benefit();

        let taxable_ss = taxable_benefit(ordinary + realized_gains, 0.0, ss_benefit, status);
        let taxable_ss_fraction = if ss_benefit > 0.0 {
            taxable_ss / ss_benefit
        } else {
            0.0
        };

        let agi = ordinary + realized_gains + taxable_ss;
        let filers_65 = self
            .profile
            .persons
            .iter()
            .filter(|p| p.age_in_year(self.as_of_year) >= 65)
            .count() as u8;
        let deduction = TaxBracketTable::standard_deduction(status, filers_65);

        // Gains stack on top of ordinary income for their own schedule
        let ordinary_taxable = (ordinary + taxable_ss - deduction).max(0.0);
        let fed = federal_tax(ordinary_taxable, status);
        let gains_tax = capital_gains_tax(ordinary_taxable, realized_gains, status);
        let taxable_income = ordinary_taxable + realized_gains;
        let state_tax = taxable_income * self.tables.state_rate(&self.profile.state_code);
        let irmaa_surcharge = irmaa::surcharge(agi, status).annual_surcharge;

        let gross_income = ordinary + realized_gains + ss_benefit;
        let total_tax = fed.total_tax + gains_tax + state_tax;
        let effective_rate = if gross_income > 0.0 {
            total_tax / gross_income
        } else {
            0.0
        };

        TaxSnapshot {
            gross_income,
            taxable_social_security: taxable_ss,
            taxable_ss_fraction,
            agi,
            deduction,
            taxable_income,
            federal_tax: fed.total_tax,
            state_tax,
            capital_gains_tax: gains_tax,
            irmaa_surcharge,
            marginal_rate: fed.marginal_rate,
            effective_rate,
            brackets: fed.brackets,
        }
    }

    /// Unused room in each bounded bracket above this year's ordinary
    /// taxable income
    #[must_use]
    pub fn bracket_room(&self) -> Vec<BracketRoom> {
        let snapshot = self.snapshot(0.0);
        roth::bracket_space(
            snapshot.taxable_income,
            self.profile.filing_status,
        )
    }

    /// Conversion sized against the household's pre-tax balances,
    /// capped at `rate_cap` (or the 24% bracket when None)
    #[must_use]
    pub fn conversion_plan(&self, rate_cap: Option<f64>) -> Option<OptimalConversion> {
        let buckets = self.profile.starting_buckets();
        let snapshot = self.snapshot(0.0);
        roth::optimal_conversion(
            snapshot.taxable_income,
            buckets.pretax + buckets.pretax_457,
            rate_cap.unwrap_or(DEFAULT_CONVERSION_RATE_CAP),
            self.profile.filing_status,
        )
    }

    /// Forward RMD schedule for the primary person's pre-tax balances,
    /// growing at the assumed portfolio mean, through the planning
    /// horizon
    #[must_use]
    pub fn rmd_projection(&self) -> Vec<RmdProjectionYear> {
        let assumptions = self.profile.resolved_assumptions();
        let primary = self.profile.primary();
        let current_age = primary.age_in_year(self.as_of_year).clamp(0, 255) as u8;
        let buckets = self.profile.starting_buckets();

        let start_age = current_age.max(RMD_START_AGE);
        let years_until = f64::from(start_age - current_age);
        // Grow today's balance forward to the projection start
        let balance_at_start = (buckets.pretax + buckets.pretax_457)
            * (1.0 + assumptions.portfolio_mean()).powf(years_until);

        rmd::project(
            start_age,
            self.as_of_year + i16::from(start_age - current_age),
            balance_at_start,
            assumptions.portfolio_mean(),
            assumptions.planning_horizon_age.max(start_age),
        )
    }

    /// Claiming-age grid for the primary person
    #[must_use]
    pub fn claiming_grid(&self) -> ClaimingAnalysis {
        let assumptions = self.profile.resolved_assumptions();
        claiming_analysis(
            self.profile.primary().monthly_ss_benefit,
            assumptions.planning_horizon_age,
            assumptions.ss_discount_rate,
        )
    }

    /// This year's flat state tax under each candidate state, relative
    /// to the current one
    #[must_use]
    pub fn compare_states(&self, candidates: &[&str]) -> Vec<StateComparison> {
        let snapshot = self.snapshot(0.0);
        let current_tax = snapshot.state_tax;
        candidates
            .iter()
            .map(|code| {
                let rate = self.tables.state_rate(code);
                let annual_tax = snapshot.taxable_income * rate;
                StateComparison {
                    code: (*code).to_string(),
                    rate,
                    annual_tax,
                    savings_vs_current: current_tax - annual_tax,
                }
            })
            .collect()
    }

    /// Ranked, quantified suggestions. Sorted by estimated annual
    /// impact, largest first.
    #[must_use]
    pub fn recommendations(&self) -> Vec<Recommendation> {
        let mut recs = Vec::new();
        let snapshot = self.snapshot(0.0);

        if let Some(rec) = self.roth_recommendation(&snapshot) {
            recs.push(rec);
        }
        if let Some(rec) = self.claiming_recommendation() {
            recs.push(rec);
        }
        if let Some(rec) = self.state_recommendation(&snapshot) {
            recs.push(rec);
        }
        if let Some(rec) = self.withdrawal_order_recommendation() {
            recs.push(rec);
        }

        recs.sort_by(|a, b| {
            b.annual_impact
                .partial_cmp(&a.annual_impact)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        recs
    }

    fn roth_recommendation(&self, snapshot: &TaxSnapshot) -> Option<Recommendation> {
        let plan = self.conversion_plan(None)?;
        // Worth flagging only when the conversion is taxed below the
        // bracket RMDs would later push the household into
        let future_marginal = self
            .rmd_projection()
            .iter()
            .map(|y| {
                federal_tax(snapshot.taxable_income + y.rmd, self.profile.filing_status)
                    .marginal_rate
            })
            .fold(0.0_f64, f64::max);
        let rate_saved = future_marginal - plan.analysis.effective_rate;
        if rate_saved <= 0.0 || plan.amount < 1_000.0 {
            return None;
        }

        Some(Recommendation {
            category: RecommendationCategory::RothConversion,
            description: format!(
                "Converting ${:.0} fills brackets through {:.0}% at an effective cost of {:.1}%, below the {:.0}% rate projected once required distributions begin",
                plan.amount,
                plan.target_bracket_rate * 100.0,
                plan.analysis.effective_rate * 100.0,
                future_marginal * 100.0,
            ),
            annual_impact: plan.amount * rate_saved,
            action: format!("Convert ${:.0} from pre-tax to Roth this year", plan.amount),
        })
    }

    fn claiming_recommendation(&self) -> Option<Recommendation> {
        let primary = self.profile.primary();
        let claim_age = primary.ss_claim_age.unwrap_or(FULL_RETIREMENT_AGE);
        // Already claimed; the decision is behind them
        if primary.age_in_year(self.as_of_year) >= i16::from(claim_age) {
            return None;
        }

        let grid = self.claiming_grid();
        if grid.optimal_age == claim_age {
            return None;
        }
        let planned = grid.points.iter().find(|p| p.age == claim_age)?;
        let optimal = grid.points.iter().find(|p| p.age == grid.optimal_age)?;
        let lifetime_gain = optimal.lifetime_benefit - planned.lifetime_benefit;
        if lifetime_gain <= 0.0 {
            return None;
        }
        let years = f64::from(
            self.profile
                .resolved_assumptions()
                .planning_horizon_age
                .saturating_sub(grid.optimal_age),
        )
        .max(1.0);

        Some(Recommendation {
            category: RecommendationCategory::SocialSecurityClaiming,
            description: format!(
                "Claiming at {} instead of {} raises the monthly benefit from ${:.0} to ${:.0} and lifetime benefits by ${:.0}",
                grid.optimal_age,
                claim_age,
                planned.monthly_benefit,
                optimal.monthly_benefit,
                lifetime_gain,
            ),
            annual_impact: lifetime_gain / years,
            action: format!("Delay Social Security to age {}", grid.optimal_age),
        })
    }

    fn state_recommendation(&self, snapshot: &TaxSnapshot) -> Option<Recommendation> {
        if snapshot.state_tax <= 0.0 {
            return None;
        }
        Some(Recommendation {
            category: RecommendationCategory::StateRelocation,
            description: format!(
                "State income tax in {} costs ${:.0} per year; a no-income-tax state eliminates it",
                self.profile.state_code, snapshot.state_tax,
            ),
            annual_impact: snapshot.state_tax,
            action: "Compare relocation to a no-income-tax state".to_string(),
        })
    }

    fn withdrawal_order_recommendation(&self) -> Option<Recommendation> {
        let buckets = self.profile.starting_buckets();
        let primary_age = self.profile.primary().age_in_year(self.as_of_year);
        // Ordering only matters when both taxable and pre-tax money exist
        // and required distributions have not taken over
        if buckets.taxable <= 0.0
            || buckets.pretax + buckets.pretax_457 <= 0.0
            || primary_age >= i16::from(RMD_START_AGE)
        {
            return None;
        }

        let assumptions = self.profile.resolved_assumptions();
        let rate_spread = (self.profile.effective_tax_rate - assumptions.ltcg_rate).max(0.0);
        let annual_need = self.profile.target_annual_income;

        Some(Recommendation {
            category: RecommendationCategory::WithdrawalOrder,
            description: format!(
                "Spending taxable holdings before pre-tax accounts taxes gains at {:.0}% instead of ordinary rates near {:.0}%",
                assumptions.ltcg_rate * 100.0,
                self.profile.effective_tax_rate * 100.0,
            ),
            annual_impact: annual_need * rate_spread,
            action: "Draw cash and taxable accounts first, pre-tax accounts after, Roth last"
                .to_string(),
        })
    }
}
