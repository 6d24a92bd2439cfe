//! Account buckets, home properties, and income streams
//!
//! Every investable dollar in a profile lives in one of five buckets
//! with distinct tax and penalty treatment on withdrawal. Each
//! simulation trial owns a private copy of all bucket balances.

use serde::{Deserialize, Serialize};

/// The five account categories tracked by the engine
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BucketKind {
    /// Checking/savings. No market volatility, fixed yield, withdrawn
    /// tax-free and penalty-free.
    Cash,
    /// Brokerage. Grows with market returns; cost basis is tracked and
    /// only the unrealized gain portion is taxed on withdrawal.
    Taxable,
    /// Traditional IRA / 401k. Ordinary income tax on distribution plus
    /// a 10% penalty before age 59.5.
    PretaxStandard,
    /// Governmental 457(b). Same ordinary-income treatment but exempt
    /// from the early-withdrawal penalty.
    Pretax457,
    /// Roth IRA / Roth 401k. Distributions are tax-free.
    Roth,
}

/// A categorized investment holding from profile storage
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Holding {
    pub kind: BucketKind,
    pub value: f64,
    /// Cost basis, only meaningful for `Taxable`. Defaults to the full
    /// value (no unrealized gain) when unset.
    #[serde(default)]
    pub cost_basis: Option<f64>,
}

/// A residence owned by the household. Mutated in place per simulation
/// path when sold: value and mortgage are zeroed and net proceeds are
/// routed to the taxable bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeProperty {
    pub name: String,
    pub value: f64,
    pub mortgage_balance: f64,
    pub appreciation_rate: f64,
    /// Taxes, insurance, upkeep per year while the home is owned
    pub annual_carrying_cost: f64,
    pub purchase_price: f64,
    /// Cost of a replacement home bought from the sale proceeds
    #[serde(default)]
    pub replacement_cost: f64,
    /// Calendar year of a planned sale, if any
    #[serde(default)]
    pub planned_sale_year: Option<i16>,
}

/// Whether a stream is earned income (FICA applies) or not
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum IncomeKind {
    /// Wages and self-employment income; subject to FICA and ends at
    /// the earner's retirement when no explicit end year is given
    Wages,
    /// Pension or annuity payments
    Pension,
    /// Rental income, royalties, and other taxable income
    #[default]
    Other,
}

/// A guaranteed income stream, read-only per simulation path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeStream {
    pub name: String,
    pub annual_amount: f64,
    pub start_year: i16,
    #[serde(default)]
    pub end_year: Option<i16>,
    /// Grow the amount with the path's cumulative simulated inflation
    /// from the first simulated year
    #[serde(default)]
    pub inflation_adjusted: bool,
    #[serde(default)]
    pub kind: IncomeKind,
}

impl IncomeStream {
    /// Whether the stream pays anything in `year`. Wage streams without
    /// an explicit end year stop at `retirement_year` (exclusive).
    #[must_use]
    pub fn active_in(&self, year: i16, retirement_year: i16) -> bool {
        if year < self.start_year {
            return false;
        }
        match self.end_year {
            Some(end) => year <= end,
            None if self.kind == IncomeKind::Wages => year < retirement_year,
            None => true,
        }
    }
}
