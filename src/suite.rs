//! Sequential probing of several named targets with a combined verdict.
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use crate::analysis::ConsistencyReport;
use crate::error::ProbeError;
use crate::probe::{ProbeEngine, ProbeRequest, ProbeRun};
use crate::shutdown::{ShutdownReceiver, sleep_or_shutdown};

/// Success rate (percent) a target needs to count as passing.
pub const SUITE_PASS_PERCENT: f64 = 80.0;
/// Default pause between two probes of a suite.
pub const DEFAULT_SUITE_PAUSE: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct SuiteTarget {
    pub name: String,
    pub request: ProbeRequest,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuiteEntry {
    pub name: String,
    pub run: ProbeRun,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SuiteHealth {
    Healthy,
    Partial,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct SuiteSummary {
    pub passed: usize,
    pub total: usize,
    pub overall_success_rate_percent: f64,
    pub health: SuiteHealth,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuiteRun {
    pub entries: Vec<SuiteEntry>,
    pub summary: SuiteSummary,
}

/// Probes each target in order, pausing between targets.
///
/// # Errors
///
/// Stops at the first caller-misuse error reported by the engine, or with
/// `ProbeError::Cancelled` once a shutdown is signalled.
pub async fn run_suite(
    engine: &ProbeEngine,
    targets: Vec<SuiteTarget>,
    pause: Duration,
    shutdown: &mut ShutdownReceiver,
) -> Result<SuiteRun, ProbeError> {
    let total = targets.len();
    let mut entries = Vec::with_capacity(total);

    for (index, target) in targets.into_iter().enumerate() {
        if index > 0 && !pause.is_zero() {
            debug!(pause = ?pause, "Pausing before next target");
            if sleep_or_shutdown(pause, Some(&mut *shutdown)).await {
                return Err(ProbeError::Cancelled { launched: 0 });
            }
        }
        info!(name = %target.name, "Probing suite target");
        let run = engine.run_until_shutdown(target.request, shutdown).await?;
        entries.push(SuiteEntry {
            name: target.name,
            run,
        });
    }

    let summary = summarize(entries.iter().map(|entry| &entry.run.report));
    info!(
        passed = summary.passed,
        total = summary.total,
        "Suite finished"
    );
    Ok(SuiteRun { entries, summary })
}

#[must_use]
pub fn summarize<'report, I>(reports: I) -> SuiteSummary
where
    I: IntoIterator<Item = &'report ConsistencyReport>,
{
    let mut total = 0usize;
    let mut passed = 0usize;
    for report in reports {
        total = total.saturating_add(1);
        if report.success_rate_percent >= SUITE_PASS_PERCENT {
            passed = passed.saturating_add(1);
        }
    }

    let overall_success_rate_percent = if total == 0 {
        0.0
    } else {
        passed as f64 * 100.0 / total as f64
    };

    SuiteSummary {
        passed,
        total,
        overall_success_rate_percent,
        health: if passed == total {
            SuiteHealth::Healthy
        } else {
            SuiteHealth::Partial
        },
    }
}
