//! Retirement projection and tax engine
//!
//! This crate projects a household's retirement outcomes under market
//! uncertainty and U.S. federal tax law. It provides:
//! - A Monte Carlo engine over five account buckets (cash, taxable,
//!   pre-tax, 457, Roth) with columnar per-trial state
//! - Progressive federal tax calculation with per-bracket breakdown and
//!   long-term capital gains stacking
//! - Social Security taxability and claiming-age analysis
//! - IRMAA surcharge tiers, Required Minimum Distribution schedules,
//!   and Roth conversion optimization
//! - A fixed-priority withdrawal sequencer for funding yearly shortfalls
//!
//! All calculators take an explicit `as_of_year`; nothing reads the wall
//! clock, so every computation is deterministic given its inputs.

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod analysis;
pub mod error;
pub mod metrics;
pub mod simulation;
pub mod tax;
pub mod withdrawal;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use model::{
    FilingStatus, HouseholdProfile, MarketAssumptions, Person, SimulationResult, TaxSnapshot,
};
pub use simulation::{EngineConfig, run_simulation};
