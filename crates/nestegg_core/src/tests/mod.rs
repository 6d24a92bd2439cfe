//! Whole-engine scenario tests
//!
//! Unit tests live next to the code they cover; these exercise full
//! simulation runs end to end.

mod simulation_scenarios;

use jiff::civil::date;

use crate::model::{
    BucketKind, FilingStatus, Holding, HouseholdProfile, MarketAssumptions, Person,
};

/// A single retiree holding only a taxable account, with no income or
/// spending. Scenarios override what they need.
pub(crate) fn bare_profile() -> HouseholdProfile {
    HouseholdProfile {
        persons: vec![Person {
            name: "Sam".to_string(),
            birth_date: date(1961, 4, 2),
            retirement_date: Some(date(2024, 1, 1)),
            monthly_ss_benefit: 0.0,
            ss_claim_age: None,
        }],
        holdings: vec![Holding {
            kind: BucketKind::Taxable,
            value: 1_000_000.0,
            cost_basis: Some(1_000_000.0),
        }],
        income_streams: vec![],
        homes: vec![],
        target_annual_income: 0.0,
        annual_expenses: 0.0,
        filing_status: FilingStatus::Single,
        state_code: "TX".to_string(),
        effective_tax_rate: 0.22,
        num_simulations: 1_000,
        assumptions: Some(MarketAssumptions::default()),
    }
}

/// Assumptions with every source of randomness and drift turned off
pub(crate) fn still_market(planning_horizon_age: u8) -> MarketAssumptions {
    MarketAssumptions {
        stock_allocation: 0.60,
        stock_return_mean: 0.0,
        stock_return_vol: 0.0,
        bond_return_mean: 0.0,
        bond_return_vol: 0.0,
        cash_yield: 0.0,
        inflation_mean: 0.0,
        inflation_vol: 0.0,
        ss_discount_rate: 0.03,
        ltcg_rate: 0.15,
        planning_horizon_age,
    }
}
