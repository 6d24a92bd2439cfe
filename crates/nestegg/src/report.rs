//! Plain-text report rendering for simulation and analysis output

use nestegg_core::model::{Recommendation, SimulationResult, TaxSnapshot};

/// Format a whole-dollar currency value with thousands separators
pub fn format_currency(value: f64) -> String {
    let abs_value = value.abs();
    let dollars = abs_value.round() as i64;

    let dollars_str = dollars.to_string();
    let mut result = String::new();
    for (i, c) in dollars_str.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    let dollars_formatted: String = result.chars().rev().collect();

    if value >= 0.0 {
        format!("${dollars_formatted}")
    } else {
        format!("-${dollars_formatted}")
    }
}

/// Format a fraction as a percentage
pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

/// Render the Monte Carlo summary and trajectory table
pub fn render_simulation(result: &SimulationResult) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Trials: {}    Horizon: {} years\n",
        result.num_trials, result.horizon_years
    ));
    out.push_str(&format!(
        "Starting balance:   {}\n",
        format_currency(result.starting_total)
    ));
    out.push_str(&format!(
        "Withdrawal need:    {} per year\n",
        format_currency(result.annual_withdrawal_need)
    ));
    out.push_str(&format!(
        "Success rate:       {}\n\n",
        format_percentage(result.success_rate)
    ));
    out.push_str(&format!(
        "Ending balance      p5 {}   median {}   p95 {}\n\n",
        format_currency(result.percentile_5_ending),
        format_currency(result.median_ending),
        format_currency(result.percentile_95_ending)
    ));

    out.push_str("Year        p5            median        p95\n");
    for year in &result.trajectory {
        out.push_str(&format!(
            "{:<8}{:>14}{:>14}{:>14}\n",
            year.year_index,
            format_currency(year.p5),
            format_currency(year.median),
            format_currency(year.p95)
        ));
    }
    out
}

/// Render the current-year tax picture and ranked recommendations
pub fn render_snapshot(snapshot: &TaxSnapshot, recommendations: &[Recommendation]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Gross income:        {}\n",
        format_currency(snapshot.gross_income)
    ));
    out.push_str(&format!(
        "Taxable Soc Sec:     {} ({} of benefit)\n",
        format_currency(snapshot.taxable_social_security),
        format_percentage(snapshot.taxable_ss_fraction)
    ));
    out.push_str(&format!("AGI:                 {}\n", format_currency(snapshot.agi)));
    out.push_str(&format!(
        "Standard deduction:  {}\n",
        format_currency(snapshot.deduction)
    ));
    out.push_str(&format!(
        "Taxable income:      {}\n\n",
        format_currency(snapshot.taxable_income)
    ));

    out.push_str(&format!(
        "Federal tax:         {}\n",
        format_currency(snapshot.federal_tax)
    ));
    for bracket in &snapshot.brackets {
        out.push_str(&format!(
            "  {:>4} bracket {:>12}\n",
            format_percentage(bracket.rate),
            format_currency(bracket.tax)
        ));
    }
    out.push_str(&format!(
        "Capital gains tax:   {}\n",
        format_currency(snapshot.capital_gains_tax)
    ));
    out.push_str(&format!(
        "State tax:           {}\n",
        format_currency(snapshot.state_tax)
    ));
    if snapshot.irmaa_surcharge > 0.0 {
        out.push_str(&format!(
            "IRMAA surcharge:     {} per year\n",
            format_currency(snapshot.irmaa_surcharge)
        ));
    }
    out.push_str(&format!(
        "Marginal rate:       {}\n",
        format_percentage(snapshot.marginal_rate)
    ));
    out.push_str(&format!(
        "Effective rate:      {}\n",
        format_percentage(snapshot.effective_rate)
    ));

    if !recommendations.is_empty() {
        out.push_str("\nRecommendations\n");
        for (i, rec) in recommendations.iter().enumerate() {
            out.push_str(&format!(
                "{}. [{}] {}\n   {}\n",
                i + 1,
                format_currency(rec.annual_impact),
                rec.action,
                rec.description
            ));
        }
    }
    out
}
