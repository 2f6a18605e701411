//! Human-readable rendering of probe and suite results.
use crate::analysis::ConsistencyReport;
use crate::probe::ProbeRun;
use crate::suite::{SuiteHealth, SuiteRun};

/// Lines describing one probe run, in display order.
#[must_use]
pub fn run_lines(run: &ProbeRun) -> Vec<String> {
    let mut lines = vec![
        format!("Target: {} {}", run.method, run.target),
        format!(
            "Workers: {} launched ({} requested), {}ms apart",
            run.launched_workers,
            run.requested_workers,
            run.inter_launch_delay.as_millis()
        ),
        format!("Dispatch Duration: {}ms", run.dispatch_duration.as_millis()),
    ];
    lines.extend(report_lines(&run.report));
    lines
}

#[must_use]
pub fn report_lines(report: &ConsistencyReport) -> Vec<String> {
    let mut lines = vec![
        format!("Total Requests: {}", report.total_requests),
        format!(
            "Successful: {} ({:.1}%)",
            report.success_count, report.success_rate_percent
        ),
        format!("Failed: {}", report.failure_count),
    ];

    if let Some(latency) = &report.latency {
        lines.push(format!(
            "Latency: min {:.1}ms / median {:.1}ms / mean {:.1}ms / max {:.1}ms",
            latency.min_ms, latency.median_ms, latency.mean_ms, latency.max_ms
        ));
    }

    if !report.status_code_histogram.is_empty() {
        let histogram = report
            .status_code_histogram
            .iter()
            .map(|(status, count)| format!("{}x{}", status, count))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!(
            "Status Codes ({} unique): {}",
            report.unique_status_code_count, histogram
        ));
        lines.push(format!(
            "Response Size Variance: {}",
            if report.response_size_variance_detected {
                "yes"
            } else {
                "no"
            }
        ));
    }

    if let Some(rate) = &report.rate_limiting {
        let mut parts = vec![
            format!("avg remaining {:.1}", rate.average_remaining),
            format!("min remaining {}", rate.min_remaining),
        ];
        if let Some(limit) = rate.limit {
            parts.push(format!("limit {}", limit));
        }
        if let Some(reset) = rate.next_reset {
            parts.push(format!("resets {}", reset.to_rfc3339()));
        }
        let near = if rate.is_near_limit { " (near limit)" } else { "" };
        lines.push(format!("Rate Limit: {}{}", parts.join(", "), near));
    }

    lines.push(format!(
        "Health: {}",
        report
            .health_indicators
            .iter()
            .map(|indicator| indicator.label())
            .collect::<Vec<_>>()
            .join(", ")
    ));
    for insight in &report.insights {
        lines.push(format!("Insight: {}", insight.label()));
    }
    for recommendation in &report.recommendations {
        lines.push(format!("Recommendation: {}", recommendation.label()));
    }
    for failure in &report.failure_samples {
        lines.push(format!(
            "Failure (worker {}): {} after {}ms: {}",
            failure.worker_id,
            failure.error_kind,
            failure.elapsed.as_millis(),
            failure.message
        ));
    }
    lines
}

#[must_use]
pub fn suite_lines(suite: &SuiteRun) -> Vec<String> {
    let mut lines = Vec::new();
    for entry in &suite.entries {
        lines.push(format!("== {} ==", entry.name));
        lines.extend(run_lines(&entry.run));
        lines.push(String::new());
    }
    let summary = &suite.summary;
    lines.push(format!(
        "Suite: {}/{} targets passed ({:.1}%), {}",
        summary.passed,
        summary.total,
        summary.overall_success_rate_percent,
        match summary.health {
            SuiteHealth::Healthy => "healthy",
            SuiteHealth::Partial => "partial",
        }
    ));
    lines
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::time::Duration;

    use chrono::Utc;

    use super::*;
    use crate::analysis::analyze;
    use crate::probe::{
        FailureKind, FailureRecord, ProbeAggregate, ProbeOutcome, RateLimitHeaders,
        SuccessRecord,
    };

    #[test]
    fn healthy_report_lists_latency_and_health() -> Result<(), String> {
        let report = analyze(&ProbeAggregate::from(vec![ProbeOutcome::Success(
            SuccessRecord {
                worker_id: 1,
                http_status: 200,
                latency: Duration::from_millis(120),
                response_bytes: 64,
                rate_limit: RateLimitHeaders {
                    remaining: Some(3),
                    reset: None,
                    limit: Some(50),
                },
                server_headers: BTreeMap::new(),
                started_at: Utc::now(),
            },
        )]));
        let lines = report_lines(&report);
        let expected = [
            "Successful: 1 (100.0%)",
            "Status Codes (1 unique): 200x1",
            "Rate Limit: avg remaining 3.0, min remaining 3, limit 50 (near limit)",
            "Health: high availability, excellent",
            "Insight: consistent responses",
        ];
        for line in expected {
            if !lines.iter().any(|actual| actual == line) {
                return Err(format!("Missing line '{}' in {:?}", line, lines));
            }
        }
        Ok(())
    }

    #[test]
    fn degraded_report_lists_failures() -> Result<(), String> {
        let report = analyze(&ProbeAggregate::from(vec![ProbeOutcome::Failure(
            FailureRecord {
                worker_id: 1,
                error_kind: FailureKind::Connect,
                message: "connection refused".to_owned(),
                elapsed: Duration::from_millis(3),
                started_at: Utc::now(),
            },
        )]));
        let lines = report_lines(&report);
        if lines.iter().any(|line| line.starts_with("Latency")) {
            return Err("Degraded report must not show latency".to_owned());
        }
        if !lines
            .iter()
            .any(|line| line == "Failure (worker 1): connect after 3ms: connection refused")
        {
            return Err(format!("Missing failure sample: {:?}", lines));
        }
        if !lines.iter().any(|line| line == "Health: unavailable") {
            return Err(format!("Missing health line: {:?}", lines));
        }
        Ok(())
    }
}
