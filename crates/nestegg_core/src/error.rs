use std::fmt;

/// Errors raised while validating a household profile.
///
/// Input validation fails fast: a profile with missing or non-finite
/// fields is rejected before any simulation work starts, rather than
/// being silently defaulted.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A numeric field is NaN or infinite
    NonFiniteField { field: &'static str },
    /// A field that must be non-negative is negative
    NegativeField { field: &'static str },
    /// The household has no persons
    EmptyHousehold,
    /// The household has more than two persons
    TooManyPersons(usize),
    /// A person's age at the analysis year is outside the supported range
    AgeOutOfRange { name: String, age: i16 },
    /// A Social Security claiming age outside the statutory 62-70 window
    ClaimAgeOutOfRange { name: String, claim_age: u8 },
    /// A rate field that must stay below 1.0 is at or above it
    RateOutOfRange { field: &'static str, value: f64 },
    /// A taxable holding's cost basis exceeds its value
    BasisExceedsValue { value: f64, basis: f64 },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NonFiniteField { field } => {
                write!(f, "field {field} is not a finite number")
            }
            ValidationError::NegativeField { field } => {
                write!(f, "field {field} must be non-negative")
            }
            ValidationError::EmptyHousehold => write!(f, "profile has no persons"),
            ValidationError::TooManyPersons(n) => {
                write!(f, "profile has {n} persons, at most 2 supported")
            }
            ValidationError::AgeOutOfRange { name, age } => {
                write!(f, "age {age} for {name} is outside the supported range")
            }
            ValidationError::ClaimAgeOutOfRange { name, claim_age } => {
                write!(
                    f,
                    "claiming age {claim_age} for {name} is outside the statutory 62-70 window"
                )
            }
            ValidationError::RateOutOfRange { field, value } => {
                write!(f, "rate {value} for {field} must be below 1")
            }
            ValidationError::BasisExceedsValue { value, basis } => {
                write!(f, "cost basis {basis} exceeds holding value {value}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised by the Monte Carlo engine
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    Validation(ValidationError),
    /// A return or inflation distribution was configured with invalid parameters
    InvalidDistributionParameters {
        what: &'static str,
        mean: f64,
        std_dev: f64,
    },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Validation(e) => write!(f, "{e}"),
            SimulationError::InvalidDistributionParameters {
                what,
                mean,
                std_dev,
            } => {
                write!(
                    f,
                    "invalid {what} parameters (mean={mean}, std_dev={std_dev}): std_dev must be non-negative and finite"
                )
            }
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Validation(e) => Some(e),
            SimulationError::InvalidDistributionParameters { .. } => None,
        }
    }
}

impl From<ValidationError> for SimulationError {
    fn from(e: ValidationError) -> Self {
        SimulationError::Validation(e)
    }
}
