use jiff::civil::date;

use super::{bare_profile, still_market};
use crate::model::{BucketKind, Holding, IncomeKind, IncomeStream, Person};
use crate::simulation::{EngineConfig, run_simulation};

const CONFIG: EngineConfig = EngineConfig {
    seed: 42,
    as_of_year: 2026,
};

#[test]
fn test_deterministic_accumulation_year() {
    // A 50-year-old earning $100,000 with $50,000 of expenses and a
    // dead-flat market. Federal tax on (100,000 - 14,600) is $13,841
    // and FICA is $7,650, leaving a surplus of $28,509. Texas adds
    // nothing.
    let mut profile = bare_profile();
    profile.persons = vec![Person {
        name: "Lee".to_string(),
        birth_date: date(1976, 3, 1),
        retirement_date: Some(date(2027, 1, 1)),
        monthly_ss_benefit: 0.0,
        ss_claim_age: None,
    }];
    profile.holdings = vec![Holding {
        kind: BucketKind::Taxable,
        value: 100_000.0,
        cost_basis: Some(100_000.0),
    }];
    profile.income_streams = vec![IncomeStream {
        name: "salary".to_string(),
        annual_amount: 100_000.0,
        start_year: 2020,
        end_year: None,
        inflation_adjusted: false,
        kind: IncomeKind::Wages,
    }];
    profile.annual_expenses = 50_000.0;
    profile.target_annual_income = 50_000.0;
    profile.assumptions = Some(still_market(52));

    let result = run_simulation(&profile, &CONFIG).unwrap();

    assert_eq!(result.horizon_years, 2);
    let first_year = result.trajectory[0];
    assert!(
        (first_year.median - 128_509.0).abs() < 2.0,
        "expected 100,000 + 28,509 surplus, got {}",
        first_year.median
    );
    // Every trial is identical with zero volatility
    assert!((first_year.p5 - first_year.p95).abs() < 1e-6);

    // Year two: retired, no wages, $50,000 drawn from a zero-gain
    // taxable account with no tax cost
    assert!(
        (result.median_ending - 78_509.0).abs() < 2.0,
        "expected 128,509 - 50,000, got {}",
        result.median_ending
    );
    assert!((result.success_rate - 1.0).abs() < 1e-12);
}

#[test]
fn test_same_seed_reproduces_exactly() {
    let profile = bare_profile();
    let a = run_simulation(&profile, &CONFIG).unwrap();
    let b = run_simulation(&profile, &CONFIG).unwrap();
    assert_eq!(a.median_ending, b.median_ending);
    assert_eq!(a.success_rate, b.success_rate);
    for (ya, yb) in a.trajectory.iter().zip(&b.trajectory) {
        assert_eq!(ya.p5, yb.p5);
        assert_eq!(ya.median, yb.median);
        assert_eq!(ya.p95, yb.p95);
    }
}

#[test]
fn test_different_seed_changes_paths() {
    let profile = bare_profile();
    let a = run_simulation(&profile, &CONFIG).unwrap();
    let b = run_simulation(
        &profile,
        &EngineConfig {
            seed: 43,
            ..CONFIG
        },
    )
    .unwrap();
    assert_ne!(
        a.median_ending, b.median_ending,
        "distinct seeds should produce distinct medians"
    );
}

#[test]
fn test_percentiles_ordered_every_year() {
    let profile = bare_profile();
    let result = run_simulation(&profile, &CONFIG).unwrap();
    assert!((0.0..=1.0).contains(&result.success_rate));
    for year in &result.trajectory {
        assert!(
            year.p5 <= year.median && year.median <= year.p95,
            "percentiles out of order at year {}: {} / {} / {}",
            year.year_index,
            year.p5,
            year.median,
            year.p95
        );
    }
    assert!(result.percentile_5_ending <= result.median_ending);
    assert!(result.median_ending <= result.percentile_95_ending);
}

#[test]
fn test_volatility_drags_down_the_median() {
    // Identical arithmetic mean, very different volatility. Compounding
    // punishes the volatile path: its median multiplier decays like
    // exp(-vol^2 / 2) per year.
    let mut calm = bare_profile();
    let mut assumptions = still_market(95);
    assumptions.stock_allocation = 1.0;
    assumptions.stock_return_mean = 0.05;
    assumptions.stock_return_vol = 0.02;
    calm.assumptions = Some(assumptions);

    let mut wild = bare_profile();
    assumptions.stock_return_vol = 0.25;
    wild.assumptions = Some(assumptions);

    let calm_result = run_simulation(&calm, &CONFIG).unwrap();
    let wild_result = run_simulation(&wild, &CONFIG).unwrap();
    assert!(
        wild_result.median_ending < calm_result.median_ending,
        "volatile median {} should trail calm median {}",
        wild_result.median_ending,
        calm_result.median_ending
    );
}

#[test]
fn test_depleted_path_clamps_to_zero() {
    // $10,000 cannot fund $200,000 a year; every trial fails in the
    // first year and stays at zero.
    let mut profile = bare_profile();
    profile.holdings = vec![Holding {
        kind: BucketKind::Taxable,
        value: 10_000.0,
        cost_basis: Some(10_000.0),
    }];
    profile.target_annual_income = 200_000.0;
    profile.annual_expenses = 200_000.0;
    profile.assumptions = Some(still_market(95));

    let result = run_simulation(&profile, &CONFIG).unwrap();
    assert_eq!(result.success_rate, 0.0);
    assert_eq!(result.median_ending, 0.0);
    assert!(result.trajectory.iter().all(|y| y.median >= 0.0));
}

#[test]
fn test_trial_count_is_clamped() {
    let mut profile = bare_profile();
    profile.num_simulations = 10;
    let result = run_simulation(&profile, &CONFIG).unwrap();
    assert_eq!(result.num_trials, 1_000);
}

#[test]
fn test_rmds_do_not_sink_a_funded_household() {
    // A 74-year-old with pre-tax money and modest spending. Forced
    // distributions reinvest their after-tax excess, so the household
    // stays solvent in a flat market.
    let mut profile = bare_profile();
    profile.persons = vec![Person {
        name: "Ruth".to_string(),
        birth_date: date(1952, 8, 9),
        retirement_date: Some(date(2017, 8, 9)),
        monthly_ss_benefit: 0.0,
        ss_claim_age: None,
    }];
    profile.holdings = vec![Holding {
        kind: BucketKind::PretaxStandard,
        value: 1_000_000.0,
        cost_basis: None,
    }];
    profile.target_annual_income = 20_000.0;
    profile.annual_expenses = 20_000.0;
    profile.assumptions = Some(still_market(80));

    let result = run_simulation(&profile, &CONFIG).unwrap();
    assert!(
        (result.success_rate - 1.0).abs() < 1e-12,
        "spending 2% should survive forced distributions, success {}",
        result.success_rate
    );
    // Withdrawals and tax leakage still shrink the total over time
    let first = result.trajectory.first().unwrap().median;
    let last = result.trajectory.last().unwrap().median;
    assert!(last < first);
}
