//! Household profile: the validated input to every engine entry point

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::{
    FilingStatus, HomeProperty, Holding, IncomeStream, MarketAssumptions, Person,
};
use crate::tax::social_security::{EARLIEST_CLAIM_AGE, LATEST_CLAIM_AGE};
use crate::withdrawal::BucketState;

/// Supported range for the Monte Carlo trial count. Requests outside
/// this range are clamped, not rejected.
pub const MIN_TRIALS: usize = 1_000;
pub const MAX_TRIALS: usize = 50_000;

/// Everything the engine knows about a household. Consumed read-only;
/// each trial copies the mutable parts (buckets, homes) into private
/// per-path state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HouseholdProfile {
    /// One or two persons
    pub persons: Vec<Person>,
    pub holdings: Vec<Holding>,
    #[serde(default)]
    pub income_streams: Vec<IncomeStream>,
    #[serde(default)]
    pub homes: Vec<HomeProperty>,
    /// Target annual spending in retirement, in today's dollars
    pub target_annual_income: f64,
    /// Annual spending before retirement, in today's dollars
    pub annual_expenses: f64,
    pub filing_status: FilingStatus,
    /// Two-letter state code; unknown codes fall back to a documented
    /// default flat rate
    pub state_code: String,
    /// Assumed effective ordinary rate applied to pre-tax withdrawals
    /// inside simulated paths
    pub effective_tax_rate: f64,
    /// Requested trial count; clamped to [`MIN_TRIALS`, `MAX_TRIALS`]
    pub num_simulations: usize,
    /// Overrides the documented baseline assumptions when present
    #[serde(default)]
    pub assumptions: Option<MarketAssumptions>,
}

impl HouseholdProfile {
    /// Fail-fast validation of all numeric fields and ages.
    ///
    /// Only structural problems are errors. Unknown state codes and
    /// ages beyond lookup tables are legitimate inputs that clamp to
    /// boundary values downstream.
    pub fn validate(&self, as_of_year: i16) -> Result<(), ValidationError> {
        if self.persons.is_empty() {
            return Err(ValidationError::EmptyHousehold);
        }
        if self.persons.len() > 2 {
            return Err(ValidationError::TooManyPersons(self.persons.len()));
        }

        for person in &self.persons {
            let age = person.age_in_year(as_of_year);
            if !(18..=110).contains(&age) {
                return Err(ValidationError::AgeOutOfRange {
                    name: person.name.clone(),
                    age,
                });
            }
            check_finite(person.monthly_ss_benefit, "monthly_ss_benefit")?;
            check_non_negative(person.monthly_ss_benefit, "monthly_ss_benefit")?;
            if let Some(claim_age) = person.ss_claim_age {
                if !(EARLIEST_CLAIM_AGE..=LATEST_CLAIM_AGE).contains(&claim_age) {
                    return Err(ValidationError::ClaimAgeOutOfRange {
                        name: person.name.clone(),
                        claim_age,
                    });
                }
            }
        }

        for holding in &self.holdings {
            check_finite(holding.value, "holding.value")?;
            check_non_negative(holding.value, "holding.value")?;
            if let Some(basis) = holding.cost_basis {
                check_finite(basis, "holding.cost_basis")?;
                check_non_negative(basis, "holding.cost_basis")?;
                if basis > holding.value {
                    return Err(ValidationError::BasisExceedsValue {
                        value: holding.value,
                        basis,
                    });
                }
            }
        }

        for stream in &self.income_streams {
            check_finite(stream.annual_amount, "income_stream.annual_amount")?;
            check_non_negative(stream.annual_amount, "income_stream.annual_amount")?;
        }

        for home in &self.homes {
            check_finite(home.value, "home.value")?;
            check_finite(home.mortgage_balance, "home.mortgage_balance")?;
            check_finite(home.appreciation_rate, "home.appreciation_rate")?;
            check_finite(home.annual_carrying_cost, "home.annual_carrying_cost")?;
            check_finite(home.purchase_price, "home.purchase_price")?;
            check_finite(home.replacement_cost, "home.replacement_cost")?;
        }

        check_finite(self.target_annual_income, "target_annual_income")?;
        check_non_negative(self.target_annual_income, "target_annual_income")?;
        check_finite(self.annual_expenses, "annual_expenses")?;
        check_non_negative(self.annual_expenses, "annual_expenses")?;
        check_finite(self.effective_tax_rate, "effective_tax_rate")?;
        check_non_negative(self.effective_tax_rate, "effective_tax_rate")?;
        // A rate at or above 1.0 would make every pre-tax dollar vanish
        // in gross-up arithmetic downstream
        if self.effective_tax_rate >= 1.0 {
            return Err(ValidationError::RateOutOfRange {
                field: "effective_tax_rate",
                value: self.effective_tax_rate,
            });
        }

        Ok(())
    }

    /// Trial count clamped to the supported range
    #[must_use]
    pub fn clamped_trials(&self) -> usize {
        self.num_simulations.clamp(MIN_TRIALS, MAX_TRIALS)
    }

    /// Assumptions to use for this profile: its own override, or the
    /// documented baseline
    #[must_use]
    pub fn resolved_assumptions(&self) -> MarketAssumptions {
        self.assumptions.unwrap_or_default()
    }

    /// Categorized starting balances, summed across holdings of the
    /// same bucket kind. Taxable basis defaults to full value.
    #[must_use]
    pub fn starting_buckets(&self) -> BucketState {
        let mut buckets = BucketState::default();
        for holding in &self.holdings {
            buckets.deposit(holding.kind, holding.value, holding.cost_basis);
        }
        buckets
    }

    /// The first listed person, whose age drives RMDs and penalty
    /// thresholds inside simulated paths
    #[must_use]
    pub fn primary(&self) -> &Person {
        &self.persons[0]
    }

    /// Earliest retirement year across the household
    #[must_use]
    pub fn retirement_year(&self, as_of_year: i16) -> i16 {
        self.persons
            .iter()
            .map(|p| p.retirement_year(as_of_year))
            .min()
            .unwrap_or(as_of_year)
    }
}

fn check_finite(value: f64, field: &'static str) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFiniteField { field })
    }
}

fn check_non_negative(value: f64, field: &'static str) -> Result<(), ValidationError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NegativeField { field })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    fn valid_profile() -> HouseholdProfile {
        HouseholdProfile {
            persons: vec![Person {
                name: "Kim".to_string(),
                birth_date: date(1962, 7, 4),
                retirement_date: Some(date(2027, 7, 4)),
                monthly_ss_benefit: 2_400.0,
                ss_claim_age: Some(67),
            }],
            holdings: vec![Holding {
                kind: crate::model::BucketKind::Taxable,
                value: 300_000.0,
                cost_basis: Some(200_000.0),
            }],
            income_streams: vec![],
            homes: vec![],
            target_annual_income: 60_000.0,
            annual_expenses: 55_000.0,
            filing_status: FilingStatus::Single,
            state_code: "WA".to_string(),
            effective_tax_rate: 0.22,
            num_simulations: 1_000,
            assumptions: None,
        }
    }

    #[test]
    fn test_valid_profile_passes() {
        valid_profile().validate(2026).unwrap();
    }

    #[test]
    fn test_claim_age_outside_62_to_70_rejected() {
        let mut profile = valid_profile();
        profile.persons[0].ss_claim_age = Some(80);
        assert_eq!(
            profile.validate(2026),
            Err(ValidationError::ClaimAgeOutOfRange {
                name: "Kim".to_string(),
                claim_age: 80,
            })
        );

        profile.persons[0].ss_claim_age = Some(61);
        assert!(profile.validate(2026).is_err());

        // Statutory boundaries themselves are legal
        profile.persons[0].ss_claim_age = Some(62);
        profile.validate(2026).unwrap();
        profile.persons[0].ss_claim_age = Some(70);
        profile.validate(2026).unwrap();
    }

    #[test]
    fn test_effective_tax_rate_must_stay_below_one() {
        let mut profile = valid_profile();
        profile.effective_tax_rate = 1.0;
        assert_eq!(
            profile.validate(2026),
            Err(ValidationError::RateOutOfRange {
                field: "effective_tax_rate",
                value: 1.0,
            })
        );

        profile.effective_tax_rate = 0.99;
        profile.validate(2026).unwrap();
    }

    #[test]
    fn test_basis_above_value_rejected() {
        let mut profile = valid_profile();
        profile.holdings[0].cost_basis = Some(400_000.0);
        assert!(matches!(
            profile.validate(2026),
            Err(ValidationError::BasisExceedsValue { .. })
        ));
    }
}
