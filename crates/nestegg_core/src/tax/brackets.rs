//! Static 2024 tax schedules: federal brackets, capital-gains brackets,
//! standard deductions, Social Security thresholds, and state flat rates
//!
//! All tables are read-only constants shared by every calculator and
//! every simulation trial.

use rustc_hash::FxHashMap;

use crate::model::FilingStatus;

/// One progressive bracket: income in [lower, upper) is taxed at `rate`.
/// The top bracket of each schedule has `upper = f64::INFINITY`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxBracket {
    pub lower: f64,
    pub upper: f64,
    pub rate: f64,
}

impl TaxBracket {
    const fn new(lower: f64, upper: f64, rate: f64) -> Self {
        Self { lower, upper, rate }
    }

    /// Width of the bracket; infinite for the top bracket
    #[must_use]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

const INF: f64 = f64::INFINITY;

// ============================================================================
// Federal ordinary-income brackets (2024)
// ============================================================================

const FEDERAL_SINGLE: &[TaxBracket] = &[
    TaxBracket::new(0.0, 11_600.0, 0.10),
    TaxBracket::new(11_600.0, 47_150.0, 0.12),
    TaxBracket::new(47_150.0, 100_525.0, 0.22),
    TaxBracket::new(100_525.0, 191_950.0, 0.24),
    TaxBracket::new(191_950.0, 243_725.0, 0.32),
    TaxBracket::new(243_725.0, 609_350.0, 0.35),
    TaxBracket::new(609_350.0, INF, 0.37),
];

const FEDERAL_MARRIED_JOINT: &[TaxBracket] = &[
    TaxBracket::new(0.0, 23_200.0, 0.10),
    TaxBracket::new(23_200.0, 94_300.0, 0.12),
    TaxBracket::new(94_300.0, 201_050.0, 0.22),
    TaxBracket::new(201_050.0, 383_900.0, 0.24),
    TaxBracket::new(383_900.0, 487_450.0, 0.32),
    TaxBracket::new(487_450.0, 731_200.0, 0.35),
    TaxBracket::new(731_200.0, INF, 0.37),
];

const FEDERAL_MARRIED_SEPARATE: &[TaxBracket] = &[
    TaxBracket::new(0.0, 11_600.0, 0.10),
    TaxBracket::new(11_600.0, 47_150.0, 0.12),
    TaxBracket::new(47_150.0, 100_525.0, 0.22),
    TaxBracket::new(100_525.0, 191_950.0, 0.24),
    TaxBracket::new(191_950.0, 243_725.0, 0.32),
    TaxBracket::new(243_725.0, 365_600.0, 0.35),
    TaxBracket::new(365_600.0, INF, 0.37),
];

const FEDERAL_HEAD_OF_HOUSEHOLD: &[TaxBracket] = &[
    TaxBracket::new(0.0, 16_550.0, 0.10),
    TaxBracket::new(16_550.0, 63_100.0, 0.12),
    TaxBracket::new(63_100.0, 100_500.0, 0.22),
    TaxBracket::new(100_500.0, 191_950.0, 0.24),
    TaxBracket::new(191_950.0, 243_725.0, 0.32),
    TaxBracket::new(243_725.0, 609_350.0, 0.35),
    TaxBracket::new(609_350.0, INF, 0.37),
];

// ============================================================================
// Long-term capital-gains brackets (2024)
// ============================================================================

const LTCG_SINGLE: &[TaxBracket] = &[
    TaxBracket::new(0.0, 47_025.0, 0.0),
    TaxBracket::new(47_025.0, 518_900.0, 0.15),
    TaxBracket::new(518_900.0, INF, 0.20),
];

const LTCG_MARRIED_JOINT: &[TaxBracket] = &[
    TaxBracket::new(0.0, 94_050.0, 0.0),
    TaxBracket::new(94_050.0, 583_750.0, 0.15),
    TaxBracket::new(583_750.0, INF, 0.20),
];

const LTCG_MARRIED_SEPARATE: &[TaxBracket] = &[
    TaxBracket::new(0.0, 47_025.0, 0.0),
    TaxBracket::new(47_025.0, 291_850.0, 0.15),
    TaxBracket::new(291_850.0, INF, 0.20),
];

const LTCG_HEAD_OF_HOUSEHOLD: &[TaxBracket] = &[
    TaxBracket::new(0.0, 63_000.0, 0.0),
    TaxBracket::new(63_000.0, 551_350.0, 0.15),
    TaxBracket::new(551_350.0, INF, 0.20),
];

// ============================================================================
// State flat-rate approximations
// ============================================================================

// Top marginal rate applied flat to full taxable income. This is a
// documented simplification, not a progressive state schedule.
const STATE_RATES: &[(&str, f64)] = &[
    ("AK", 0.0),
    ("AZ", 0.025),
    ("CA", 0.093),
    ("CO", 0.044),
    ("CT", 0.0699),
    ("FL", 0.0),
    ("GA", 0.0549),
    ("IL", 0.0495),
    ("MA", 0.05),
    ("MI", 0.0425),
    ("MN", 0.0785),
    ("NC", 0.045),
    ("NH", 0.0),
    ("NJ", 0.0637),
    ("NV", 0.0),
    ("NY", 0.0685),
    ("OH", 0.035),
    ("OR", 0.099),
    ("PA", 0.0307),
    ("SD", 0.0),
    ("TN", 0.0),
    ("TX", 0.0),
    ("UT", 0.0465),
    ("VA", 0.0575),
    ("WA", 0.0),
    ("WI", 0.0765),
    ("WY", 0.0),
];

/// Flat rate used for state codes not in the table
pub const DEFAULT_STATE_RATE: f64 = 0.05;

/// FICA (Social Security + Medicare employee share) on wages
pub const FICA_RATE: f64 = 0.0765;

/// The 2024 schedule set. Bracket slices are static; the state-rate map
/// is built once per instance.
#[derive(Debug, Clone)]
pub struct TaxBracketTable {
    state_rates: FxHashMap<&'static str, f64>,
}

impl Default for TaxBracketTable {
    fn default() -> Self {
        Self {
            state_rates: STATE_RATES.iter().copied().collect(),
        }
    }
}

impl TaxBracketTable {
    /// Federal ordinary-income brackets for a filing status
    #[must_use]
    pub fn federal(status: FilingStatus) -> &'static [TaxBracket] {
        match status {
            FilingStatus::Single => FEDERAL_SINGLE,
            FilingStatus::MarriedJoint => FEDERAL_MARRIED_JOINT,
            FilingStatus::MarriedSeparate => FEDERAL_MARRIED_SEPARATE,
            FilingStatus::HeadOfHousehold => FEDERAL_HEAD_OF_HOUSEHOLD,
        }
    }

    /// Long-term capital-gains brackets for a filing status
    #[must_use]
    pub fn capital_gains(status: FilingStatus) -> &'static [TaxBracket] {
        match status {
            FilingStatus::Single => LTCG_SINGLE,
            FilingStatus::MarriedJoint => LTCG_MARRIED_JOINT,
            FilingStatus::MarriedSeparate => LTCG_MARRIED_SEPARATE,
            FilingStatus::HeadOfHousehold => LTCG_HEAD_OF_HOUSEHOLD,
        }
    }

    /// Standard deduction: base amount by filing status plus a fixed
    /// addition per filer aged 65 or older (`filers_65` is 0, 1, or 2).
    #[must_use]
    pub fn standard_deduction(status: FilingStatus, filers_65: u8) -> f64 {
        let (base, age_addition) = match status {
            FilingStatus::Single => (14_600.0, 1_950.0),
            FilingStatus::MarriedJoint => (29_200.0, 1_550.0),
            FilingStatus::MarriedSeparate => (14_600.0, 1_550.0),
            FilingStatus::HeadOfHousehold => (21_900.0, 1_950.0),
        };
        let max_filers = if status == FilingStatus::MarriedJoint {
            2
        } else {
            1
        };
        base + age_addition * f64::from(filers_65.min(max_filers))
    }

    /// Social Security taxability thresholds (first, second) on combined
    /// income. Married-separate filers have statutory zero thresholds.
    #[must_use]
    pub fn ss_thresholds(status: FilingStatus) -> (f64, f64) {
        match status {
            FilingStatus::Single | FilingStatus::HeadOfHousehold => (25_000.0, 34_000.0),
            FilingStatus::MarriedJoint => (32_000.0, 44_000.0),
            FilingStatus::MarriedSeparate => (0.0, 0.0),
        }
    }

    /// Flat state rate for a two-letter code. Unknown codes fall back to
    /// [`DEFAULT_STATE_RATE`] with no error; they represent legitimate
    /// jurisdictions outside the table.
    #[must_use]
    pub fn state_rate(&self, code: &str) -> f64 {
        let upper = code.trim().to_ascii_uppercase();
        self.state_rates
            .get(upper.as_str())
            .copied()
            .unwrap_or(DEFAULT_STATE_RATE)
    }

    /// Primary-residence capital-gain exclusion on a home sale
    #[must_use]
    pub fn home_sale_exclusion(status: FilingStatus) -> f64 {
        if status == FilingStatus::MarriedJoint {
            500_000.0
        } else {
            250_000.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brackets_are_contiguous() {
        for status in [
            FilingStatus::Single,
            FilingStatus::MarriedJoint,
            FilingStatus::MarriedSeparate,
            FilingStatus::HeadOfHousehold,
        ] {
            let brackets = TaxBracketTable::federal(status);
            assert_eq!(brackets[0].lower, 0.0);
            for pair in brackets.windows(2) {
                assert_eq!(pair[0].upper, pair[1].lower, "gap in {status:?} schedule");
            }
            assert!(brackets.last().is_some_and(|b| b.upper.is_infinite()));
        }
    }

    #[test]
    fn test_rates_ascend() {
        let brackets = TaxBracketTable::federal(FilingStatus::Single);
        for pair in brackets.windows(2) {
            assert!(pair[0].rate < pair[1].rate);
        }
    }

    #[test]
    fn test_standard_deduction_with_age_additions() {
        assert_eq!(
            TaxBracketTable::standard_deduction(FilingStatus::Single, 0),
            14_600.0
        );
        assert_eq!(
            TaxBracketTable::standard_deduction(FilingStatus::Single, 1),
            16_550.0
        );
        assert_eq!(
            TaxBracketTable::standard_deduction(FilingStatus::MarriedJoint, 2),
            32_300.0
        );
        // A single filer cannot claim two age additions
        assert_eq!(
            TaxBracketTable::standard_deduction(FilingStatus::Single, 2),
            16_550.0
        );
    }

    #[test]
    fn test_state_rate_lookup_and_fallback() {
        let table = TaxBracketTable::default();
        assert_eq!(table.state_rate("TX"), 0.0);
        assert_eq!(table.state_rate("ca"), 0.093);
        assert_eq!(table.state_rate(" ny "), 0.0685);
        assert_eq!(table.state_rate("ZZ"), DEFAULT_STATE_RATE);
    }

    #[test]
    fn test_ltcg_zero_bracket_exists() {
        for status in [FilingStatus::Single, FilingStatus::MarriedJoint] {
            let brackets = TaxBracketTable::capital_gains(status);
            assert_eq!(brackets[0].rate, 0.0);
        }
    }
}
