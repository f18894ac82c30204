use chrono::NaiveDate;

/// Recency weight of a match played on `match_date`, seen from `as_of`.
///
/// Halves every `half_life_days`; matches on or after `as_of` weigh 1.
/// A non-positive half-life disables decay. Loaded configs never carry
/// one, see [`crate::config::AppConfig::validate`].
pub fn calculate_weight(match_date: NaiveDate, as_of: NaiveDate, half_life_days: f64) -> f64 {
    let age_days = calculate_age_days(match_date, as_of);
    apply_exponential_decay(age_days, half_life_days)
}

fn calculate_age_days(match_date: NaiveDate, as_of: NaiveDate) -> i64 {
    let duration = as_of.signed_duration_since(match_date);
    duration.num_days().max(0)
}

fn apply_exponential_decay(age_days: i64, half_life_days: f64) -> f64 {
    // formula: weight = exp(-λ × days_ago)
    // where λ = ln(2) / half_life_days
    if half_life_days <= 0.0 {
        return 1.0;
    }
    let lambda = std::f64::consts::LN_2 / half_life_days;
    let decay_factor = -lambda * (age_days as f64);
    decay_factor.exp()
}
