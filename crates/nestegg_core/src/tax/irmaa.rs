//! IRMAA: Medicare premium surcharge tiers keyed to Modified AGI
//!
//! 2024 Part B tiers. Surcharges are stored annualized (monthly
//! surcharge times 12) since the engine works in whole years.

use serde::{Deserialize, Serialize};

use crate::model::FilingStatus;

/// One surcharge tier: MAGI in [lower, upper) pays `annual_surcharge`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct IrmaaTier {
    pub lower: f64,
    pub upper: f64,
    pub annual_surcharge: f64,
}

const fn tier(lower: f64, upper: f64, monthly: f64) -> IrmaaTier {
    IrmaaTier {
        lower,
        upper,
        annual_surcharge: monthly * 12.0,
    }
}

const INF: f64 = f64::INFINITY;

const TIERS_SINGLE: &[IrmaaTier] = &[
    tier(0.0, 103_000.0, 0.0),
    tier(103_000.0, 129_000.0, 69.90),
    tier(129_000.0, 161_000.0, 174.70),
    tier(161_000.0, 193_000.0, 279.50),
    tier(193_000.0, 500_000.0, 384.30),
    tier(500_000.0, INF, 419.30),
];

const TIERS_MARRIED_JOINT: &[IrmaaTier] = &[
    tier(0.0, 206_000.0, 0.0),
    tier(206_000.0, 258_000.0, 69.90),
    tier(258_000.0, 322_000.0, 174.70),
    tier(322_000.0, 386_000.0, 279.50),
    tier(386_000.0, 750_000.0, 384.30),
    tier(750_000.0, INF, 419.30),
];

// Married filing separately has a compressed statutory schedule
const TIERS_MARRIED_SEPARATE: &[IrmaaTier] = &[
    tier(0.0, 103_000.0, 0.0),
    tier(103_000.0, 397_000.0, 384.30),
    tier(397_000.0, INF, 419.30),
];

/// Result of a tier lookup
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IrmaaResult {
    pub annual_surcharge: f64,
    pub tier_index: usize,
    /// MAGI room left before the next tier boundary; None in the top tier
    pub headroom_to_next: Option<f64>,
}

/// Tier table for a filing status
#[must_use]
pub fn tiers(status: FilingStatus) -> &'static [IrmaaTier] {
    match status {
        FilingStatus::Single | FilingStatus::HeadOfHousehold => TIERS_SINGLE,
        FilingStatus::MarriedJoint => TIERS_MARRIED_JOINT,
        FilingStatus::MarriedSeparate => TIERS_MARRIED_SEPARATE,
    }
}

/// Annual IRMAA surcharge for a Modified AGI
#[must_use]
pub fn surcharge(magi: f64, status: FilingStatus) -> IrmaaResult {
    let table = tiers(status);
    let magi = magi.max(0.0);

    for (index, t) in table.iter().enumerate() {
        if magi < t.upper {
            return IrmaaResult {
                annual_surcharge: t.annual_surcharge,
                tier_index: index,
                // The top tier is unbounded; there is nothing above it
                headroom_to_next: t.upper.is_finite().then(|| t.upper - magi),
            };
        }
    }

    // The loop always matches because the top tier is unbounded
    IrmaaResult {
        annual_surcharge: table[table.len() - 1].annual_surcharge,
        tier_index: table.len() - 1,
        headroom_to_next: None,
    }
}
