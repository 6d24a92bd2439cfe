mod accounts;
mod market;
mod person;
mod profile;
mod results;

pub use accounts::{BucketKind, HomeProperty, Holding, IncomeKind, IncomeStream};
pub use market::MarketAssumptions;
pub use person::{FilingStatus, Person};
pub use profile::{HouseholdProfile, MAX_TRIALS, MIN_TRIALS};
pub use results::{
    Recommendation, RecommendationCategory, SimulationResult, TaxSnapshot, YearPercentiles,
};
