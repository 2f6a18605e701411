//! Consistency analysis over a finished probe aggregate.
mod health;
mod report;
mod stats;


use std::collections::{BTreeMap, BTreeSet};

use crate::probe::{ProbeAggregate, SuccessRecord};

pub use health::{
    ADEQUATE_LATENCY_MS, EXCELLENT_LATENCY_MS, HIGH_AVAILABILITY_PERCENT, HealthIndicator,
    MODERATE_AVAILABILITY_PERCENT, availability_indicator, classify, latency_indicator,
};
pub use report::{ConsistencyReport, Insight, LatencySummary, RateLimitSummary, Recommendation};
pub use stats::NEAR_LIMIT_REMAINING;

/// Failures copied into a degraded report.
const FAILURE_SAMPLE_LIMIT: usize = 3;
/// Status code that counts as a consistent, healthy answer.
const STATUS_OK: u16 = 200;

/// Builds the consistency report for a finished probe. Pure: the same
/// aggregate always yields the same report.
#[must_use]
pub fn analyze(aggregate: &ProbeAggregate) -> ConsistencyReport {
    let successes: Vec<&SuccessRecord> = aggregate.successes().collect();
    let total_requests = aggregate.len();
    let success_count = successes.len();
    let failure_count = total_requests.saturating_sub(success_count);
    let success_rate_percent = stats::percent(success_count, total_requests);

    if successes.is_empty() {
        return ConsistencyReport {
            total_requests,
            success_count,
            failure_count,
            success_rate_percent,
            latency: None,
            unique_status_code_count: 0,
            status_code_histogram: BTreeMap::new(),
            response_size_variance_detected: false,
            rate_limiting: None,
            health_indicators: vec![HealthIndicator::Unavailable],
            insights: Vec::new(),
            recommendations: vec![
                Recommendation::CheckConnectivity,
                Recommendation::ConfirmCredentials,
                Recommendation::ReviewEndpoint,
            ],
            failure_samples: aggregate
                .failures()
                .take(FAILURE_SAMPLE_LIMIT)
                .cloned()
                .collect(),
        };
    }

    let latency = stats::latency_summary(&successes);
    let status_code_histogram = status_histogram(&successes);
    let unique_status_code_count = status_code_histogram.len();
    let distinct_sizes: BTreeSet<u64> = successes.iter().map(|s| s.response_bytes).collect();
    let response_size_variance_detected = distinct_sizes.len() > 1;

    let mut insights = Vec::new();
    if unique_status_code_count == 1 && status_code_histogram.contains_key(&STATUS_OK) {
        insights.push(Insight::ConsistentResponses);
        insights.push(Insight::StableBehaviour);
    }
    if response_size_variance_detected {
        insights.push(Insight::ResponseSizeVariation);
        insights.push(Insight::PossibleDynamicContent);
    }

    let health_indicators = latency.map_or_else(
        || vec![availability_indicator(success_rate_percent)],
        |summary| classify(success_rate_percent, summary.mean_ms),
    );

    ConsistencyReport {
        total_requests,
        success_count,
        failure_count,
        success_rate_percent,
        latency,
        unique_status_code_count,
        status_code_histogram,
        response_size_variance_detected,
        rate_limiting: stats::rate_limit_summary(&successes),
        health_indicators,
        insights,
        recommendations: Vec::new(),
        failure_samples: Vec::new(),
    }
}

fn status_histogram(successes: &[&SuccessRecord]) -> BTreeMap<u16, usize> {
    let mut histogram = BTreeMap::new();
    for success in successes {
        let count = histogram.entry(success.http_status).or_insert(0usize);
        *count = count.saturating_add(1);
    }
    histogram
}
