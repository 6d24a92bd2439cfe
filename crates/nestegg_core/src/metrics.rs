//! Percentile and summary helpers shared by the engine and its consumers

/// Standard percentiles reported from Monte Carlo results
pub mod standard {
    pub const P5: f64 = 0.05;
    pub const P50: f64 = 0.50;
    pub const P95: f64 = 0.95;
}

/// Compute a percentile from an unsorted sample using linear interpolation
/// between closest ranks. `p` is a fraction in [0, 1].
#[must_use]
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    percentile_sorted(&sorted, p)
}

/// Percentile of an already-sorted sample. Callers aggregating many
/// percentiles from the same sample should sort once and use this.
#[must_use]
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = rank - lo as f64;
        sorted[lo] * (1.0 - frac) + sorted[hi] * frac
    }
}

/// Fraction of trials with a strictly positive ending balance
#[must_use]
pub fn success_rate(ending_balances: &[f64]) -> f64 {
    if ending_balances.is_empty() {
        return 0.0;
    }
    let successes = ending_balances.iter().filter(|b| **b > 0.0).count();
    successes as f64 / ending_balances.len() as f64
}
