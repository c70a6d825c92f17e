//! Sampling primitives shared by every entity generator.
//!
//! All functions draw from the caller's RNG so the order of calls fully
//! determines the output for a given seed.

use chrono::{Datelike, NaiveDate, TimeDelta};
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand_distr::LogNormal;

use crate::errors::GenerationError;

/// Probability that a biased date is moved into the closing days of its quarter.
pub const QUARTER_END_BIAS_RATE: f64 = 0.30;
const QUARTER_END_FIRST_DAY: u32 = 20;
const QUARTER_END_LAST_DAY: u32 = 28;
const DECEMBER_LAST_DAY: u32 = 31;

/// Draw one option with probability proportional to its weight.
///
/// Weights are normalized before sampling, so they need not sum to 1.
pub fn weighted_choice<'a, T>(
    options: &'a [T],
    weights: &[f64],
    rng: &mut impl Rng,
) -> Result<&'a T, GenerationError> {
    if options.len() != weights.len() {
        return Err(GenerationError::InvalidDistribution(format!(
            "{} options but {} weights",
            options.len(),
            weights.len()
        )));
    }
    if options.is_empty() {
        return Err(GenerationError::InvalidDistribution(
            "no options to choose from".to_string(),
        ));
    }
    let total: f64 = weights.iter().sum();
    if !(total > 0.0) {
        return Err(GenerationError::InvalidDistribution(format!(
            "weights must sum to a positive value, got {total}"
        )));
    }
    let index = WeightedIndex::new(weights)
        .map_err(|err| GenerationError::InvalidDistribution(err.to_string()))?;
    Ok(&options[index.sample(rng)])
}

/// Weighted draw over a `(value, weight)` reference table.
pub fn pick_weighted<T: Copy>(
    table: &[(T, f64)],
    rng: &mut impl Rng,
) -> Result<T, GenerationError> {
    let options: Vec<T> = table.iter().map(|(value, _)| *value).collect();
    let weights: Vec<f64> = table.iter().map(|(_, weight)| *weight).collect();
    weighted_choice(&options, &weights, rng).copied()
}

/// Draw from LogNormal(mu, sigma) and clamp into `[lower, upper]`.
///
/// Out-of-range draws are clamped, not re-sampled, so the result carries point
/// masses at both bounds.
pub fn bounded_lognormal(
    mu: f64,
    sigma: f64,
    lower: f64,
    upper: f64,
    rng: &mut impl Rng,
) -> Result<f64, GenerationError> {
    if lower > upper {
        return Err(GenerationError::InvalidDistribution(format!(
            "lognormal lower bound {lower} exceeds upper bound {upper}"
        )));
    }
    let dist = LogNormal::new(mu, sigma)
        .map_err(|err| GenerationError::InvalidDistribution(format!("lognormal: {err}")))?;
    Ok(dist.sample(rng).clamp(lower, upper))
}

/// Uniformly sample a whole date in `[start, end]`.
///
/// With `quarter_end_bias`, 30% of draws are relocated into the last days of
/// the enclosing quarter. A single-day range always returns that day.
pub fn date_in_range(
    start: NaiveDate,
    end: NaiveDate,
    quarter_end_bias: bool,
    rng: &mut impl Rng,
) -> Result<NaiveDate, GenerationError> {
    if start > end {
        return Err(GenerationError::InvalidRange { start, end });
    }
    let span = (end - start).num_days();
    let date = start + TimeDelta::days(rng.random_range(0..=span));
    if quarter_end_bias && span > 0 && chance(QUARTER_END_BIAS_RATE, rng) {
        return Ok(move_to_quarter_end(date, rng));
    }
    Ok(date)
}

fn move_to_quarter_end(date: NaiveDate, rng: &mut impl Rng) -> NaiveDate {
    let quarter_end_month = ((date.month() - 1) / 3 + 1) * 3;
    let last_day = if quarter_end_month == 12 {
        DECEMBER_LAST_DAY
    } else {
        QUARTER_END_LAST_DAY
    };
    let day = rng.random_range(QUARTER_END_FIRST_DAY..=last_day);
    NaiveDate::from_ymd_opt(date.year(), quarter_end_month, day).unwrap_or(date)
}

/// Bernoulli trial with success probability `p`.
pub fn chance(p: f64, rng: &mut impl Rng) -> bool {
    rng.random::<f64>() < p
}

/// Uniform float in `[low, high)`.
pub fn uniform(low: f64, high: f64, rng: &mut impl Rng) -> f64 {
    rng.random_range(low..high)
}

/// Uniform whole-day offset in `[low, high]`.
pub fn day_offset(low: i64, high: i64, rng: &mut impl Rng) -> TimeDelta {
    TimeDelta::days(rng.random_range(low..=high))
}

pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn to_cents(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

pub fn from_cents(cents: i64) -> f64 {
    cents as f64 / 100.0
}
