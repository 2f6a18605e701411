use crate::probe::SuccessRecord;

use super::report::{LatencySummary, RateLimitSummary};

/// Remaining quota at or below which the target is considered near its limit.
pub const NEAR_LIMIT_REMAINING: u64 = 5;

/// Microseconds per millisecond.
const US_PER_MS: f64 = 1_000.0;
const PERCENT: f64 = 100.0;

pub(super) fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 * PERCENT / total as f64
}

/// Min/max/mean/median latency. Values are kept as whole microseconds until
/// the final conversion so whole-millisecond inputs stay exact.
pub(super) fn latency_summary(successes: &[&SuccessRecord]) -> Option<LatencySummary> {
    let mut latencies_us: Vec<u128> = successes
        .iter()
        .map(|success| success.latency.as_micros())
        .collect();
    latencies_us.sort_unstable();

    let min = *latencies_us.first()?;
    let max = *latencies_us.last()?;
    let count = u128::try_from(latencies_us.len()).ok()?;
    let sum = latencies_us
        .iter()
        .fold(0u128, |acc, value| acc.saturating_add(*value));
    let mean = sum.checked_div(count)?;
    let median = median(&latencies_us)?;

    Some(LatencySummary {
        min_ms: us_to_ms(min),
        max_ms: us_to_ms(max),
        mean_ms: us_to_ms(mean),
        median_ms: us_to_ms(median),
    })
}

/// Middle value of sorted input; the mean of the two middle values when the
/// length is even.
fn median(sorted: &[u128]) -> Option<u128> {
    let mid = sorted.len().checked_div(2)?;
    let upper = *sorted.get(mid)?;
    if sorted.len() % 2 == 1 {
        return Some(upper);
    }
    let lower = *sorted.get(mid.checked_sub(1)?)?;
    lower.saturating_add(upper).checked_div(2)
}

fn us_to_ms(value: u128) -> f64 {
    value as f64 / US_PER_MS
}

/// Summarises rate-limit headers, but only when every success carried a
/// remaining-quota value.
pub(super) fn rate_limit_summary(successes: &[&SuccessRecord]) -> Option<RateLimitSummary> {
    let remaining: Vec<u64> = successes
        .iter()
        .map(|success| success.rate_limit.remaining)
        .collect::<Option<Vec<u64>>>()?;
    let min_remaining = *remaining.iter().min()?;
    let total = remaining
        .iter()
        .fold(0u128, |acc, value| acc.saturating_add(u128::from(*value)));
    let average_remaining = total as f64 / remaining.len() as f64;

    Some(RateLimitSummary {
        average_remaining,
        min_remaining,
        is_near_limit: remaining.iter().any(|value| *value <= NEAR_LIMIT_REMAINING),
        limit: successes
            .iter()
            .filter_map(|success| success.rate_limit.limit)
            .min(),
        next_reset: successes
            .iter()
            .filter_map(|success| success.rate_limit.reset)
            .min(),
    })
}
