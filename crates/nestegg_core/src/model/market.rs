//! Market assumptions shared by all simulation trials
//!
//! Read-only during a run. `Default` carries the documented baseline
//! values used when a profile omits its own assumptions.

use serde::{Deserialize, Serialize};

/// Return, inflation, and allocation parameters for the Monte Carlo
/// engine. Shared and immutable; every trial reads the same instance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MarketAssumptions {
    /// Fraction of the growth buckets allocated to stocks, in [0, 1].
    /// The remainder is allocated to bonds.
    pub stock_allocation: f64,
    pub stock_return_mean: f64,
    pub stock_return_vol: f64,
    pub bond_return_mean: f64,
    pub bond_return_vol: f64,
    /// Fixed yield on the cash bucket; no volatility
    pub cash_yield: f64,
    pub inflation_mean: f64,
    pub inflation_vol: f64,
    /// Discount rate for Social Security net-present-value comparisons
    pub ss_discount_rate: f64,
    /// Long-term capital gains rate used for gross-ups inside simulated
    /// paths, where the full stacking calculation would be overkill
    pub ltcg_rate: f64,
    /// Simulate through the year the youngest person reaches this age
    pub planning_horizon_age: u8,
}

impl Default for MarketAssumptions {
    fn default() -> Self {
        Self {
            stock_allocation: 0.60,
            stock_return_mean: 0.07,
            stock_return_vol: 0.16,
            bond_return_mean: 0.04,
            bond_return_vol: 0.05,
            cash_yield: 0.02,
            inflation_mean: 0.025,
            inflation_vol: 0.012,
            ss_discount_rate: 0.03,
            ltcg_rate: 0.15,
            planning_horizon_age: 95,
        }
    }
}

impl MarketAssumptions {
    /// Blended mean return of the stock/bond mix
    #[must_use]
    pub fn portfolio_mean(&self) -> f64 {
        let stock = self.stock_allocation.clamp(0.0, 1.0);
        stock * self.stock_return_mean + (1.0 - stock) * self.bond_return_mean
    }

    /// Blended volatility of the stock/bond mix. Stock and bond shocks
    /// are treated as uncorrelated.
    #[must_use]
    pub fn portfolio_vol(&self) -> f64 {
        let stock = self.stock_allocation.clamp(0.0, 1.0);
        let sv = stock * self.stock_return_vol;
        let bv = (1.0 - stock) * self.bond_return_vol;
        (sv * sv + bv * bv).sqrt()
    }
}
