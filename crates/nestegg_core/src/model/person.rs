//! Persons and filing status

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// Federal filing status. Determines bracket schedules, standard
/// deduction, Social Security taxability thresholds, and IRMAA tiers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FilingStatus {
    Single,
    MarriedJoint,
    MarriedSeparate,
    HeadOfHousehold,
}

impl FilingStatus {
    /// Whether this status files as a married couple
    #[must_use]
    pub fn is_married(self) -> bool {
        matches!(self, FilingStatus::MarriedJoint | FilingStatus::MarriedSeparate)
    }
}

/// One member of the household. Immutable once a simulation run starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub birth_date: Date,
    /// When this person stops earning wages. None means already retired.
    pub retirement_date: Option<Date>,
    /// Monthly Social Security benefit at full retirement age (the PIA)
    pub monthly_ss_benefit: f64,
    /// Age at which Social Security is claimed. Defaults to full
    /// retirement age when unset; resolved once at profile validation.
    #[serde(default)]
    pub ss_claim_age: Option<u8>,
}

impl Person {
    /// Age attained during `year`, by calendar-year difference.
    /// Month-of-birth granularity is deliberately ignored; the engine
    /// works in whole simulated years.
    #[must_use]
    pub fn age_in_year(&self, year: i16) -> i16 {
        year - self.birth_date.year()
    }

    /// Calendar year wages stop. Falls back to `as_of_year` for a person
    /// with no retirement date (already retired).
    #[must_use]
    pub fn retirement_year(&self, as_of_year: i16) -> i16 {
        self.retirement_date.map_or(as_of_year, |d| d.year())
    }
}
