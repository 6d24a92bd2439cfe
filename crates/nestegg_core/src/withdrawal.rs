//! Shortfall funding across account buckets
//!
//! A yearly shortfall is covered by visiting buckets in a fixed
//! priority order, an explicit state machine so the order is auditable
//! and each state is testable in isolation:
//!
//! 1. Cash - tax-free, penalty-free
//! 2. Pretax457 before 59.5 - ordinary tax, no penalty (457 exception)
//! 3. Taxable - grossed up for capital-gains tax on the unrealized gain
//! 4. PretaxStandard - ordinary tax plus 10% penalty before 59.5
//! 5. Remaining Pretax457 - ordinary tax, never a penalty
//! 6. Roth - tax-free, last resort
//!
//! Before the sequencer runs, a separate RMD step forcibly withdraws
//! required distributions from both pre-tax buckets regardless of need.

use serde::{Deserialize, Serialize};

use crate::model::BucketKind;
use crate::tax::rmd;

/// Penalty applied to pre-59.5 distributions from standard pre-tax
/// accounts
pub const EARLY_WITHDRAWAL_PENALTY: f64 = 0.10;

/// Age threshold for the early-withdrawal penalty
pub const PENALTY_AGE: f64 = 59.5;

/// One trial's private bucket balances. Invariants: every balance stays
/// non-negative, and `taxable_basis <= taxable`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketState {
    pub cash: f64,
    pub taxable: f64,
    pub taxable_basis: f64,
    pub pretax: f64,
    pub pretax_457: f64,
    pub roth: f64,
}

impl BucketState {
    /// Sum of all five bucket balances
    #[must_use]
    pub fn total(&self) -> f64 {
        self.cash + self.taxable + self.pretax + self.pretax_457 + self.roth
    }

    /// Add value to a bucket. Taxable deposits carry their basis
    /// (defaulting to full value for cash-like additions).
    pub fn deposit(&mut self, kind: BucketKind, value: f64, basis: Option<f64>) {
        match kind {
            BucketKind::Cash => self.cash += value,
            BucketKind::Taxable => {
                self.taxable += value;
                self.taxable_basis += basis.unwrap_or(value);
            }
            BucketKind::PretaxStandard => self.pretax += value,
            BucketKind::Pretax457 => self.pretax_457 += value,
            BucketKind::Roth => self.roth += value,
        }
    }

    /// Unrealized gain as a fraction of the taxable balance, guarded to
    /// 0 on an empty bucket and clamped to [0, 1]
    #[must_use]
    pub fn gain_ratio(&self) -> f64 {
        if self.taxable <= 0.0 {
            return 0.0;
        }
        ((self.taxable - self.taxable_basis) / self.taxable).clamp(0.0, 1.0)
    }

    /// Zero every balance. Used when a path depletes.
    pub fn clear(&mut self) {
        *self = BucketState::default();
    }
}

/// Per-year tax context for the sequencer
#[derive(Debug, Clone, Copy)]
pub struct WithdrawalParams {
    /// Age of the primary account owner this year
    pub age: f64,
    /// Assumed effective ordinary rate on pre-tax distributions
    pub ordinary_rate: f64,
    /// Long-term capital-gains rate for taxable gross-ups
    pub ltcg_rate: f64,
}

/// The named states of the funding machine, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WithdrawalStage {
    Cash,
    /// Pretax457 visited early, only before age 59.5
    Early457,
    Taxable,
    PretaxStandard,
    Pretax457,
    Roth,
}

impl WithdrawalStage {
    /// Fixed visiting order
    pub const ORDER: [WithdrawalStage; 6] = [
        WithdrawalStage::Cash,
        WithdrawalStage::Early457,
        WithdrawalStage::Taxable,
        WithdrawalStage::PretaxStandard,
        WithdrawalStage::Pretax457,
        WithdrawalStage::Roth,
    ];
}

/// What one year's funding pass did
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WithdrawalOutcome {
    /// After-tax dollars delivered toward the shortfall
    pub net_delivered: f64,
    /// Gross dollars removed from buckets
    pub gross_withdrawn: f64,
    pub taxes_paid: f64,
    pub penalties_paid: f64,
    /// True when every bucket was exhausted before the shortfall was met
    pub depleted: bool,
}

/// Gross amount and net-per-gross rate for one stage, given current
/// bucket state. Returns None when the stage is skipped this year.
fn stage_rates(
    stage: WithdrawalStage,
    buckets: &BucketState,
    params: &WithdrawalParams,
) -> Option<(f64, f64, f64)> {
    // (available, net_per_gross, penalty_rate)
    match stage {
        WithdrawalStage::Cash => Some((buckets.cash, 1.0, 0.0)),
        WithdrawalStage::Early457 => {
            if params.age < PENALTY_AGE {
                Some((buckets.pretax_457, 1.0 - params.ordinary_rate, 0.0))
            } else {
                None
            }
        }
        WithdrawalStage::Taxable => {
            let gain_tax = buckets.gain_ratio() * params.ltcg_rate;
            Some((buckets.taxable, 1.0 - gain_tax, 0.0))
        }
        WithdrawalStage::PretaxStandard => {
            let penalty = if params.age < PENALTY_AGE {
                EARLY_WITHDRAWAL_PENALTY
            } else {
                0.0
            };
            Some((
                buckets.pretax,
                1.0 - params.ordinary_rate - penalty,
                penalty,
            ))
        }
        WithdrawalStage::Pretax457 => {
            Some((buckets.pretax_457, 1.0 - params.ordinary_rate, 0.0))
        }
        WithdrawalStage::Roth => Some((buckets.roth, 1.0, 0.0)),
    }
}

/// Remove `gross` from the bucket a stage draws on. Taxable reduces
/// cost basis proportionally to the withdrawn fraction.
fn debit_stage(stage: WithdrawalStage, buckets: &mut BucketState, gross: f64) {
    match stage {
        WithdrawalStage::Cash => buckets.cash -= gross,
        WithdrawalStage::Early457 | WithdrawalStage::Pretax457 => buckets.pretax_457 -= gross,
        WithdrawalStage::Taxable => {
            let fraction = if buckets.taxable > 0.0 {
                gross / buckets.taxable
            } else {
                0.0
            };
            buckets.taxable_basis -= buckets.taxable_basis * fraction;
            buckets.taxable -= gross;
        }
        WithdrawalStage::PretaxStandard => buckets.pretax -= gross,
        WithdrawalStage::Roth => buckets.roth -= gross,
    }
    // Float noise can leave a balance epsilon-negative
    buckets.cash = buckets.cash.max(0.0);
    buckets.taxable = buckets.taxable.max(0.0);
    buckets.taxable_basis = buckets.taxable_basis.max(0.0);
    buckets.pretax = buckets.pretax.max(0.0);
    buckets.pretax_457 = buckets.pretax_457.max(0.0);
    buckets.roth = buckets.roth.max(0.0);
}

/// Fund `shortfall` net dollars from the buckets in priority order.
///
/// The machine terminates as soon as the shortfall reaches zero, or
/// marks the outcome depleted when every stage is exhausted first.
pub fn fund_shortfall(
    buckets: &mut BucketState,
    shortfall: f64,
    params: &WithdrawalParams,
) -> WithdrawalOutcome {
    let mut outcome = WithdrawalOutcome::default();
    let mut remaining = shortfall.max(0.0);

    for stage in WithdrawalStage::ORDER {
        if remaining <= f64::EPSILON {
            break;
        }
        let Some((available, net_per_gross, penalty_rate)) =
            stage_rates(stage, buckets, params)
        else {
            continue;
        };
        if available <= 0.0 || net_per_gross <= 0.0 {
            continue;
        }

        let gross_needed = remaining / net_per_gross;
        let gross = gross_needed.min(available);
        let net = gross * net_per_gross;

        debit_stage(stage, buckets, gross);

        outcome.gross_withdrawn += gross;
        outcome.net_delivered += net;
        outcome.penalties_paid += gross * penalty_rate;
        outcome.taxes_paid += gross - net - gross * penalty_rate;
        remaining -= net;
    }

    if remaining > 0.01 {
        outcome.depleted = true;
    }
    outcome
}

/// What the forced RMD step did this year
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RmdOutcome {
    pub gross: f64,
    pub net: f64,
    /// Net proceeds used toward this year's shortfall
    pub applied_to_shortfall: f64,
    /// Net proceeds reinvested into the taxable bucket
    pub reinvested: f64,
}

/// Forced distribution from both pre-tax buckets when the owner is at
/// or past the RMD age. Runs before the sequencer: net proceeds first
/// cover the year's shortfall, and any excess is reinvested in Taxable.
pub fn apply_rmd(
    buckets: &mut BucketState,
    age: u8,
    ordinary_rate: f64,
    shortfall: &mut f64,
) -> RmdOutcome {
    let rmd_standard = rmd::required_distribution(age, buckets.pretax);
    let rmd_457 = rmd::required_distribution(age, buckets.pretax_457);
    let gross = rmd_standard + rmd_457;
    if gross <= 0.0 {
        return RmdOutcome::default();
    }

    buckets.pretax = (buckets.pretax - rmd_standard).max(0.0);
    buckets.pretax_457 = (buckets.pretax_457 - rmd_457).max(0.0);

    let net = gross * (1.0 - ordinary_rate).max(0.0);
    let applied = net.min(*shortfall);
    *shortfall -= applied;

    let reinvested = net - applied;
    if reinvested > 0.0 {
        buckets.deposit(BucketKind::Taxable, reinvested, None);
    }

    RmdOutcome {
        gross,
        net,
        applied_to_shortfall: applied,
        reinvested,
    }
}
