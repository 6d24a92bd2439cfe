//! Monte Carlo projection engine
//!
//! Trials are statistically independent: each owns a private copy of
//! all mutable state and reads only the shared immutable profile and
//! assumptions. Trials are grouped into fixed-size batches laid out as
//! columnar arrays (one entry per trial), and batches are distributed
//! across rayon workers. Each batch seeds its own `SmallRng` from the
//! run seed plus the batch index, so random streams never overlap and
//! results are reproducible for a given seed regardless of scheduling.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand_distr::{Distribution, Normal};
#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::error::SimulationError;
use crate::metrics::{percentile_sorted, standard, success_rate};
use crate::model::{
    BucketKind, HomeProperty, HouseholdProfile, IncomeKind, MarketAssumptions, SimulationResult,
    YearPercentiles,
};
use crate::tax::brackets::{FICA_RATE, TaxBracketTable};
use crate::tax::federal::federal_tax;
use crate::tax::rmd::RMD_START_AGE;
use crate::tax::social_security::{FULL_RETIREMENT_AGE, benefit_factor, taxable_benefit};
use crate::withdrawal::{BucketState, WithdrawalParams, apply_rmd, fund_shortfall};

/// Selling a home costs this fraction of its value in commissions and
/// closing costs
const HOME_SALE_TRANSACTION_COST: f64 = 0.06;

/// Trials per columnar batch. Batches are the unit of parallelism.
const BATCH_SIZE: usize = 256;

/// Run-level configuration independent of the household profile
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Base seed; batch i uses `seed + i`
    pub seed: u64,
    /// Tax/calendar year the simulation starts in
    pub as_of_year: i16,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            as_of_year: 2024,
        }
    }
}

/// Shared read-only context for all batches of one run
struct RunContext<'a> {
    profile: &'a HouseholdProfile,
    assumptions: MarketAssumptions,
    as_of_year: i16,
    horizon_years: usize,
    retirement_year: i16,
    state_rate: f64,
}

/// Columnar per-trial state for one batch: same-shaped arrays with one
/// entry per trial, so a simulated year is computed across the whole
/// batch at once.
struct TrialColumns {
    buckets: Vec<BucketState>,
    /// Cumulative inflation factor per trial (1.0 at the start)
    cum_inflation: Vec<f64>,
    /// Private copy of the home list per trial: homes[home][trial]
    home_values: Vec<Vec<f64>>,
    home_mortgages: Vec<Vec<f64>>,
    failed: Vec<bool>,
}

impl TrialColumns {
    fn new(profile: &HouseholdProfile, batch_size: usize) -> Self {
        let start = profile.starting_buckets();
        Self {
            buckets: vec![start; batch_size],
            cum_inflation: vec![1.0; batch_size],
            home_values: profile
                .homes
                .iter()
                .map(|h| vec![h.value; batch_size])
                .collect(),
            home_mortgages: profile
                .homes
                .iter()
                .map(|h| vec![h.mortgage_balance; batch_size])
                .collect(),
            failed: vec![false; batch_size],
        }
    }
}

/// Output of one batch: per-trial yearly totals, [year][trial]
struct BatchOutput {
    yearly_totals: Vec<Vec<f64>>,
}

/// Run the full Monte Carlo projection for a household.
///
/// The computation is synchronous CPU-bound work with no side effects;
/// callers in a request-serving context should offload it and may
/// cancel by discarding the result.
pub fn run_simulation(
    profile: &HouseholdProfile,
    config: &EngineConfig,
) -> Result<SimulationResult, SimulationError> {
    profile.validate(config.as_of_year)?;

    let assumptions = profile.resolved_assumptions();
    let return_dist = normal_dist(
        assumptions.portfolio_mean(),
        assumptions.portfolio_vol(),
        "portfolio return",
    )?;
    let inflation_dist = normal_dist(
        assumptions.inflation_mean,
        assumptions.inflation_vol,
        "inflation",
    )?;

    let youngest_age = profile
        .persons
        .iter()
        .map(|p| p.age_in_year(config.as_of_year))
        .min()
        .unwrap_or(65);
    let horizon_years = usize::try_from(
        (i16::from(assumptions.planning_horizon_age) - youngest_age).max(1),
    )
    .unwrap_or(1);

    let ctx = RunContext {
        profile,
        assumptions,
        as_of_year: config.as_of_year,
        horizon_years,
        retirement_year: profile.retirement_year(config.as_of_year),
        state_rate: TaxBracketTable::default().state_rate(&profile.state_code),
    };

    let num_trials = profile.clamped_trials();
    let num_batches = num_trials.div_ceil(BATCH_SIZE);

    let run_batch = |batch_index: usize| -> BatchOutput {
        let batch_size = if batch_index == num_batches - 1 {
            num_trials - batch_index * BATCH_SIZE
        } else {
            BATCH_SIZE
        };
        let mut rng = SmallRng::seed_from_u64(config.seed.wrapping_add(batch_index as u64));
        simulate_batch(&ctx, batch_size, &mut rng, &return_dist, &inflation_dist)
    };

    #[cfg(feature = "parallel")]
    let batches: Vec<BatchOutput> = (0..num_batches).into_par_iter().map(run_batch).collect();
    #[cfg(not(feature = "parallel"))]
    let batches: Vec<BatchOutput> = (0..num_batches).map(run_batch).collect();

    Ok(aggregate(&ctx, num_trials, &batches))
}

fn normal_dist(mean: f64, std_dev: f64, what: &'static str) -> Result<Normal<f64>, SimulationError> {
    Normal::new(mean, std_dev).map_err(|_| SimulationError::InvalidDistributionParameters {
        what,
        mean,
        std_dev,
    })
}

/// Simulate every year for one batch of trials
fn simulate_batch(
    ctx: &RunContext<'_>,
    batch_size: usize,
    rng: &mut SmallRng,
    return_dist: &Normal<f64>,
    inflation_dist: &Normal<f64>,
) -> BatchOutput {
    let mut columns = TrialColumns::new(ctx.profile, batch_size);
    let mut yearly_totals = Vec::with_capacity(ctx.horizon_years);

    for year_index in 0..ctx.horizon_years {
        let year = ctx.as_of_year + year_index as i16;
        let mut totals = vec![0.0; batch_size];

        for trial in 0..batch_size {
            if columns.failed[trial] {
                continue;
            }

            // One market-return and one inflation draw per trial-year
            let market_return = return_dist.sample(rng);
            let inflation = inflation_dist.sample(rng);

            grow_buckets(&mut columns.buckets[trial], ctx, market_return);
            columns.cum_inflation[trial] *= (1.0 + inflation).max(0.0);

            for home_index in 0..ctx.profile.homes.len() {
                step_home(ctx, &mut columns, home_index, trial, year);
            }

            let failed = simulate_year(ctx, &mut columns, trial, year);
            if failed {
                columns.failed[trial] = true;
                columns.buckets[trial].clear();
            }

            totals[trial] = columns.buckets[trial].total();
        }

        yearly_totals.push(totals);
    }

    BatchOutput { yearly_totals }
}

/// Apply one year of growth to every bucket. Multipliers are clamped at
/// zero so a catastrophic draw cannot produce a negative balance.
fn grow_buckets(buckets: &mut BucketState, ctx: &RunContext<'_>, market_return: f64) {
    let growth = (1.0 + market_return).max(0.0);
    buckets.cash *= 1.0 + ctx.assumptions.cash_yield;
    buckets.taxable *= growth;
    buckets.pretax *= growth;
    buckets.pretax_457 *= growth;
    buckets.roth *= growth;
    // Growth never raises basis; a crash can leave value below basis
    buckets.taxable_basis = buckets.taxable_basis.min(buckets.taxable);
}

/// Appreciate one home and execute its planned sale if this is the year
fn step_home(
    ctx: &RunContext<'_>,
    columns: &mut TrialColumns,
    home_index: usize,
    trial: usize,
    year: i16,
) {
    let home = &ctx.profile.homes[home_index];
    let value = &mut columns.home_values[home_index][trial];
    if *value <= 0.0 {
        return; // already sold on this path
    }
    *value *= 1.0 + home.appreciation_rate;

    if home.planned_sale_year == Some(year) {
        let mortgage = columns.home_mortgages[home_index][trial];
        let proceeds = sale_proceeds(ctx, home, *value, mortgage);
        let net = (proceeds - home.replacement_cost).max(0.0);
        columns.buckets[trial].deposit(BucketKind::Taxable, net, None);
        *value = 0.0;
        columns.home_mortgages[home_index][trial] = 0.0;
    }
}

/// Net proceeds of a home sale: value less mortgage, transaction costs,
/// and capital-gains tax on the gain above the primary-residence
/// exclusion
fn sale_proceeds(ctx: &RunContext<'_>, home: &HomeProperty, value: f64, mortgage: f64) -> f64 {
    let gain = value - home.purchase_price;
    let exclusion = TaxBracketTable::home_sale_exclusion(ctx.profile.filing_status);
    let taxable_gain = (gain - exclusion).max(0.0);
    let gains_tax = taxable_gain * ctx.assumptions.ltcg_rate;
    (value - mortgage - value * HOME_SALE_TRANSACTION_COST - gains_tax).max(0.0)
}

/// Income, taxes, spending, and shortfall funding for one trial-year.
/// Returns true when the path depletes.
fn simulate_year(ctx: &RunContext<'_>, columns: &mut TrialColumns, trial: usize, year: i16) -> bool {
    let inflation_factor = columns.cum_inflation[trial];
    let primary_age = ctx.profile.primary().age_in_year(year);

    // Guaranteed income: wages, pensions, other streams, Social Security
    let mut wages = 0.0;
    let mut other_income = 0.0;
    for stream in &ctx.profile.income_streams {
        if !stream.active_in(year, ctx.retirement_year) {
            continue;
        }
        let amount = if stream.inflation_adjusted {
            stream.annual_amount * inflation_factor
        } else {
            stream.annual_amount
        };
        if stream.kind == IncomeKind::Wages {
            wages += amount;
        } else {
            other_income += amount;
        }
    }

    // Social Security carries a cost-of-living adjustment, so benefits
    // scale with the trial's cumulative inflation
    let mut ss_income = 0.0;
    for person in &ctx.profile.persons {
        let claim_age = person.ss_claim_age.unwrap_or(FULL_RETIREMENT_AGE);
        if person.age_in_year(year) >= i16::from(claim_age) {
            ss_income +=
                person.monthly_ss_benefit * benefit_factor(claim_age) * 12.0 * inflation_factor;
        }
    }

    // Taxes on the year's guaranteed income
    let taxable_ss = taxable_benefit(
        wages + other_income,
        0.0,
        ss_income,
        ctx.profile.filing_status,
    );
    let filers_65 = ctx
        .profile
        .persons
        .iter()
        .filter(|p| p.age_in_year(year) >= 65)
        .count() as u8;
    let deduction = TaxBracketTable::standard_deduction(ctx.profile.filing_status, filers_65);
    let taxable_income = (wages + other_income + taxable_ss - deduction).max(0.0);
    let fed = federal_tax(taxable_income, ctx.profile.filing_status).total_tax;
    let state = taxable_income * ctx.state_rate;
    let fica = wages * FICA_RATE;
    let net_income = wages + other_income + ss_income - fed - state - fica;

    // Target spending plus housing carrying costs, in this path's dollars
    let base_spending = if year >= ctx.retirement_year {
        ctx.profile.target_annual_income
    } else {
        ctx.profile.annual_expenses
    };
    let mut spending = base_spending * inflation_factor;
    for (home_index, home) in ctx.profile.homes.iter().enumerate() {
        if columns.home_values[home_index][trial] > 0.0 {
            spending += home.annual_carrying_cost * inflation_factor;
        }
    }

    let gap = spending - net_income;
    if gap <= 0.0 {
        // Surplus is reinvested at full basis
        columns.buckets[trial].deposit(BucketKind::Taxable, -gap, None);
        return false;
    }

    let mut shortfall = gap;
    let buckets = &mut columns.buckets[trial];
    if primary_age >= i16::from(RMD_START_AGE) {
        apply_rmd(
            buckets,
            primary_age.clamp(0, 255) as u8,
            ctx.profile.effective_tax_rate,
            &mut shortfall,
        );
    }

    let outcome = fund_shortfall(
        buckets,
        shortfall,
        &WithdrawalParams {
            age: f64::from(primary_age),
            ordinary_rate: ctx.profile.effective_tax_rate,
            ltcg_rate: ctx.assumptions.ltcg_rate,
        },
    );
    outcome.depleted
}

/// Fold batch outputs into the aggregate result
fn aggregate(ctx: &RunContext<'_>, num_trials: usize, batches: &[BatchOutput]) -> SimulationResult {
    let mut trajectory = Vec::with_capacity(ctx.horizon_years);
    let mut endings: Vec<f64> = Vec::with_capacity(num_trials);

    for year_index in 0..ctx.horizon_years {
        let mut year_totals: Vec<f64> = Vec::with_capacity(num_trials);
        for batch in batches {
            year_totals.extend_from_slice(&batch.yearly_totals[year_index]);
        }
        year_totals.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        trajectory.push(YearPercentiles {
            year_index,
            p5: percentile_sorted(&year_totals, standard::P5),
            median: percentile_sorted(&year_totals, standard::P50),
            p95: percentile_sorted(&year_totals, standard::P95),
        });

        if year_index == ctx.horizon_years - 1 {
            endings = year_totals;
        }
    }

    let starting_total = ctx.profile.starting_buckets().total();

    SimulationResult {
        success_rate: success_rate(&endings),
        percentile_5_ending: percentile_sorted(&endings, standard::P5),
        median_ending: percentile_sorted(&endings, standard::P50),
        percentile_95_ending: percentile_sorted(&endings, standard::P95),
        trajectory,
        starting_total,
        annual_withdrawal_need: first_year_withdrawal_need(ctx),
        num_trials,
        horizon_years: ctx.horizon_years,
    }
}

/// Gap between target retirement spending and guaranteed income in the
/// first retirement year, before inflation
fn first_year_withdrawal_need(ctx: &RunContext<'_>) -> f64 {
    let year = ctx.retirement_year.max(ctx.as_of_year);
    let mut guaranteed = 0.0;
    for stream in &ctx.profile.income_streams {
        if stream.kind != IncomeKind::Wages && stream.active_in(year, ctx.retirement_year) {
            guaranteed += stream.annual_amount;
        }
    }
    for person in &ctx.profile.persons {
        let claim_age = person.ss_claim_age.unwrap_or(FULL_RETIREMENT_AGE);
        if person.age_in_year(year) >= i16::from(claim_age) {
            guaranteed += person.monthly_ss_benefit * benefit_factor(claim_age) * 12.0;
        }
    }
    let carrying: f64 = ctx.profile.homes.iter().map(|h| h.annual_carrying_cost).sum();
    (ctx.profile.target_annual_income + carrying - guaranteed).max(0.0)
}
