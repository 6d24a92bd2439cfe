//! U.S. federal and state tax calculators
//!
//! Bracket schedules, deductions, and tier tables are 2024 constants.
//! Everything here is pure arithmetic over read-only tables; no
//! calculator mutates shared state or reads the wall clock.

pub mod brackets;
pub mod federal;
pub mod irmaa;
pub mod rmd;
pub mod roth;
pub mod social_security;

pub use brackets::{TaxBracket, TaxBracketTable};
pub use federal::{BracketContribution, FederalTaxResult};
pub use irmaa::{IrmaaResult, IrmaaTier};
pub use rmd::{RMD_START_AGE, RmdProjectionYear};
pub use roth::{BracketRoom, ConversionAnalysis, OptimalConversion};
pub use social_security::{ClaimingAgePoint, ClaimingAnalysis};
