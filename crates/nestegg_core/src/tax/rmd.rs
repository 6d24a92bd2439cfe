//! Required Minimum Distribution schedule
//!
//! IRS Uniform Lifetime Table (2024 edition), ages 72 through 120.
//! Distributions are required starting at age 73; ages beyond the table
//! clamp to the final divisor since they are legitimate real-world ages.

use serde::{Deserialize, Serialize};

/// Age at which distributions become mandatory
pub const RMD_START_AGE: u8 = 73;

/// (age, life-expectancy divisor) pairs from the Uniform Lifetime Table
const UNIFORM_LIFETIME: &[(u8, f64)] = &[
    (72, 27.4),
    (73, 26.5),
    (74, 25.5),
    (75, 24.6),
    (76, 23.7),
    (77, 22.9),
    (78, 22.0),
    (79, 21.1),
    (80, 20.2),
    (81, 19.4),
    (82, 18.5),
    (83, 17.7),
    (84, 16.8),
    (85, 16.0),
    (86, 15.2),
    (87, 14.4),
    (88, 13.7),
    (89, 12.9),
    (90, 12.2),
    (91, 11.5),
    (92, 10.8),
    (93, 10.1),
    (94, 9.5),
    (95, 8.9),
    (96, 8.4),
    (97, 7.8),
    (98, 7.3),
    (99, 6.8),
    (100, 6.4),
    (101, 6.0),
    (102, 5.6),
    (103, 5.2),
    (104, 4.9),
    (105, 4.6),
    (106, 4.3),
    (107, 4.1),
    (108, 3.9),
    (109, 3.7),
    (110, 3.5),
    (111, 3.4),
    (112, 3.3),
    (113, 3.1),
    (114, 3.0),
    (115, 2.9),
    (116, 2.8),
    (117, 2.7),
    (118, 2.5),
    (119, 2.3),
    (120, 2.0),
];

/// Divisor for an age. Ages past the end of the table use the final
/// entry; ages before the table use the first.
#[must_use]
pub fn divisor_for_age(age: u8) -> f64 {
    UNIFORM_LIFETIME
        .iter()
        .find(|(a, _)| *a == age)
        .map(|(_, d)| *d)
        .unwrap_or_else(|| {
            if age > 120 {
                UNIFORM_LIFETIME[UNIFORM_LIFETIME.len() - 1].1
            } else {
                UNIFORM_LIFETIME[0].1
            }
        })
}

/// Required distribution for an age and pre-tax balance. Zero before
/// age 73.
#[must_use]
pub fn required_distribution(age: u8, balance: f64) -> f64 {
    if age < RMD_START_AGE || balance <= 0.0 {
        return 0.0;
    }
    balance / divisor_for_age(age)
}

/// One year of a forward RMD projection
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RmdProjectionYear {
    pub year: i16,
    pub age: u8,
    /// Balance at the start of the year, before the distribution
    pub starting_balance: f64,
    pub rmd: f64,
}

/// Project distributions forward from `current_age` in `as_of_year`.
///
/// Each year takes the RMD at the current age from the current balance,
/// then grows the remainder at `growth_rate` before the next year.
#[must_use]
pub fn project(
    current_age: u8,
    as_of_year: i16,
    balance: f64,
    growth_rate: f64,
    through_age: u8,
) -> Vec<RmdProjectionYear> {
    let mut projection = Vec::new();
    let mut balance = balance.max(0.0);

    for age in current_age..=through_age {
        let rmd = required_distribution(age, balance);
        projection.push(RmdProjectionYear {
            year: as_of_year + i16::from(age - current_age),
            age,
            starting_balance: balance,
            rmd,
        });
        balance = ((balance - rmd) * (1.0 + growth_rate)).max(0.0);
    }

    projection
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divisor_age_73() {
        assert_eq!(divisor_for_age(73), 26.5);
    }

    #[test]
    fn test_divisor_age_90() {
        assert_eq!(divisor_for_age(90), 12.2);
    }

    #[test]
    fn test_divisor_clamps_beyond_120() {
        assert_eq!(divisor_for_age(121), 2.0);
        assert_eq!(divisor_for_age(130), 2.0);
    }

    #[test]
    fn test_rmd_at_73_on_one_million() {
        let rmd = required_distribution(73, 1_000_000.0);
        assert!((rmd - 37_735.85).abs() < 0.01, "Expected 37,735.85, got {rmd}");
    }

    #[test]
    fn test_rmd_at_90_on_one_million() {
        let rmd = required_distribution(90, 1_000_000.0);
        assert!((rmd - 81_967.21).abs() < 0.01, "Expected 81,967.21, got {rmd}");
    }

    #[test]
    fn test_no_rmd_before_73() {
        assert_eq!(required_distribution(72, 1_000_000.0), 0.0);
        assert_eq!(required_distribution(60, 1_000_000.0), 0.0);
    }

    #[test]
    fn test_no_rmd_on_empty_balance() {
        assert_eq!(required_distribution(80, 0.0), 0.0);
    }

    #[test]
    fn test_projection_zero_growth() {
        let projection = project(73, 2033, 1_000_000.0, 0.0, 75);
        assert_eq!(projection.len(), 3);
        assert_eq!(projection[0].year, 2033);
        assert_eq!(projection[0].age, 73);
        assert!((projection[0].rmd - 37_735.85).abs() < 0.01);

        // Second year starts from the reduced balance
        let expected_second = 1_000_000.0 - projection[0].rmd;
        assert!((projection[1].starting_balance - expected_second).abs() < 0.01);
        assert!((projection[1].rmd - expected_second / 25.5).abs() < 0.01);
    }

    #[test]
    fn test_projection_before_rmd_age_grows_untouched() {
        let projection = project(70, 2030, 500_000.0, 0.05, 73);
        assert_eq!(projection[0].rmd, 0.0);
        assert_eq!(projection[1].rmd, 0.0);
        assert_eq!(projection[2].rmd, 0.0);
        // Three years of growth before the first required year
        let expected = 500_000.0 * 1.05f64.powi(3);
        assert!((projection[3].starting_balance - expected).abs() < 0.01);
        assert!(projection[3].rmd > 0.0);
    }
}
