//! Engine outputs: simulation results, tax snapshots, recommendations
//!
//! All output types are plain serializable data. The report renderer,
//! audit logger, and advisory-chat collaborators each consume these
//! without the core assuming any particular consumer.

use serde::{Deserialize, Serialize};

use crate::tax::federal::BracketContribution;

/// Percentile balances across all trials at one year index
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct YearPercentiles {
    /// Years since the start of the simulation (0 = first simulated year)
    pub year_index: usize,
    pub p5: f64,
    pub median: f64,
    pub p95: f64,
}

/// Aggregate outcome of a Monte Carlo run. Immutable after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Fraction of trials ending with a positive total balance, in [0, 1]
    pub success_rate: f64,
    pub percentile_5_ending: f64,
    pub median_ending: f64,
    pub percentile_95_ending: f64,
    /// Percentile balances computed independently at each year index
    pub trajectory: Vec<YearPercentiles>,
    /// Sum of all bucket balances at the start of the run
    pub starting_total: f64,
    /// First-year gap between target spending and guaranteed income
    pub annual_withdrawal_need: f64,
    pub num_trials: usize,
    pub horizon_years: usize,
}

/// Point-in-time tax picture for a household. Stateless; one produced
/// per analysis call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxSnapshot {
    pub gross_income: f64,
    pub taxable_social_security: f64,
    /// Taxable share of the Social Security benefit, in [0, 0.85]
    pub taxable_ss_fraction: f64,
    pub agi: f64,
    pub deduction: f64,
    pub taxable_income: f64,
    pub federal_tax: f64,
    pub state_tax: f64,
    pub capital_gains_tax: f64,
    pub irmaa_surcharge: f64,
    pub marginal_rate: f64,
    pub effective_rate: f64,
    /// Per-bracket contributions to the federal tax
    pub brackets: Vec<BracketContribution>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RecommendationCategory {
    RothConversion,
    SocialSecurityClaiming,
    StateRelocation,
    WithdrawalOrder,
}

/// A ranked, quantified optimization suggestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: RecommendationCategory,
    pub description: String,
    /// Estimated annual dollar impact, used for ranking
    pub annual_impact: f64,
    pub action: String,
}
