use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::analysis::{ConsistencyReport, analyze};
use crate::error::ProbeError;
use crate::shutdown::{ShutdownReceiver, shutdown_pending, sleep_or_shutdown};

use super::aggregate::{ProbeAggregate, ResultAggregator};
use super::executor::{REQUEST_TIMEOUT, run_worker};
use super::outcome::{FailureKind, FailureRecord, ProbeOutcome, serialize_ms};
use super::request::{HttpMethod, ProbeRequest};

/// Hard ceiling on workers per probe, whatever the caller asks for. Bounds
/// the load placed on the remote target.
pub const MAX_CONCURRENT_WORKERS: usize = 2;

pub(crate) const DEFAULT_USER_AGENT: &str = concat!("probeburst/", env!("CARGO_PKG_VERSION"));

/// Number of workers actually launched for a requested concurrency.
#[must_use]
pub const fn clamp_workers(requested: usize) -> usize {
    if requested > MAX_CONCURRENT_WORKERS {
        MAX_CONCURRENT_WORKERS
    } else if requested == 0 {
        1
    } else {
        requested
    }
}

/// Everything one probe produced: parameters, raw outcomes, and the report.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeRun {
    pub target: String,
    pub method: HttpMethod,
    pub requested_workers: usize,
    pub launched_workers: usize,
    #[serde(rename = "inter_launch_delay_ms", serialize_with = "serialize_ms")]
    pub inter_launch_delay: Duration,
    pub started_at: DateTime<Utc>,
    #[serde(rename = "dispatch_duration_ms", serialize_with = "serialize_ms")]
    pub dispatch_duration: Duration,
    pub outcomes: ProbeAggregate,
    pub report: ConsistencyReport,
}

/// Stateless probe runner. Holds only the HTTP client, so one engine can run
/// any number of probes one after another.
#[derive(Debug, Clone)]
pub struct ProbeEngine {
    client: Client,
}

struct LaunchedWorker {
    worker_id: usize,
    started_at: DateTime<Utc>,
    start: Instant,
    handle: JoinHandle<()>,
}

/// Workers spawned by one dispatch. Dropping the set aborts every worker
/// still running, so an abandoned run cannot leave a writer behind.
struct LaunchedWorkers(Vec<LaunchedWorker>);

impl Drop for LaunchedWorkers {
    fn drop(&mut self) {
        for worker in &self.0 {
            worker.handle.abort();
        }
    }
}

impl ProbeEngine {
    /// Builds an engine with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn new() -> Result<Self, ProbeError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|err| {
                error!("Failed to build HTTP client: {}", err);
                ProbeError::BuildClientFailed { source: err }
            })?;
        Ok(Self { client })
    }

    /// Uses a caller-provided client. The per-call timeout is still applied
    /// to every request.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Runs one probe to completion and analyzes it.
    ///
    /// Dropping the returned future (for example under
    /// `tokio::time::timeout`) aborts the workers it already launched.
    ///
    /// # Errors
    ///
    /// Only caller misuse surfaces here; transport failures are part of the
    /// returned report.
    pub async fn run(&self, request: ProbeRequest) -> Result<ProbeRun, ProbeError> {
        self.dispatch(request, None).await
    }

    /// Like [`ProbeEngine::run`], but stops launching workers once a shutdown
    /// is signalled. Workers already launched are always awaited.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::Cancelled` when the shutdown fired before every
    /// worker was launched.
    pub async fn run_until_shutdown(
        &self,
        request: ProbeRequest,
        shutdown: &mut ShutdownReceiver,
    ) -> Result<ProbeRun, ProbeError> {
        self.dispatch(request, Some(shutdown)).await
    }

    async fn dispatch(
        &self,
        request: ProbeRequest,
        mut shutdown: Option<&mut ShutdownReceiver>,
    ) -> Result<ProbeRun, ProbeError> {
        let requested_workers = request.concurrency();
        let workers = clamp_workers(requested_workers);
        if workers < requested_workers {
            warn!(
                requested = requested_workers,
                launched = workers,
                "Concurrency clamped to the safety ceiling."
            );
        }

        let request = Arc::new(request);
        let aggregator = ResultAggregator::with_capacity(workers);
        let started_at = Utc::now();
        let start = Instant::now();
        let mut launched = LaunchedWorkers(Vec::with_capacity(workers));
        let mut cancelled = shutdown.as_deref_mut().is_some_and(shutdown_pending);

        info!(
            target_url = %request.target_url(),
            method = %request.method(),
            workers,
            "Starting probe"
        );

        for worker_id in 1..=workers {
            if cancelled {
                break;
            }
            if worker_id > 1 {
                cancelled =
                    sleep_or_shutdown(request.inter_launch_delay(), shutdown.as_deref_mut())
                        .await;
                if cancelled {
                    break;
                }
            }

            let client = self.client.clone();
            let worker_request = Arc::clone(&request);
            let worker_aggregator = Arc::clone(&aggregator);
            debug!(worker_id, "Launching worker");
            launched.0.push(LaunchedWorker {
                worker_id,
                started_at: Utc::now(),
                start: Instant::now(),
                handle: tokio::spawn(async move {
                    run_worker(&client, &worker_request, worker_id, worker_aggregator).await;
                }),
            });
        }

        let launched_workers = launched.0.len();
        for worker in &mut launched.0 {
            if let Err(err) = (&mut worker.handle).await {
                error!(worker_id = worker.worker_id, "Worker task ended abnormally: {}", err);
                aggregator.record(ProbeOutcome::Failure(FailureRecord {
                    worker_id: worker.worker_id,
                    error_kind: FailureKind::Aborted,
                    message: err.to_string(),
                    elapsed: worker.start.elapsed(),
                    started_at: worker.started_at,
                }));
            }
        }
        drop(launched);
        let dispatch_duration = start.elapsed();

        if cancelled {
            warn!(
                launched = launched_workers,
                "Probe cancelled; launched workers drained."
            );
            return Err(ProbeError::Cancelled {
                launched: launched_workers,
            });
        }

        let outcomes = aggregator.snapshot()?;
        let report = analyze(&outcomes);
        info!(
            duration = ?dispatch_duration,
            successes = report.success_count,
            failures = report.failure_count,
            "Probe finished"
        );

        Ok(ProbeRun {
            target: request.target_url().to_string(),
            method: request.method(),
            requested_workers,
            launched_workers,
            inter_launch_delay: request.inter_launch_delay(),
            started_at,
            dispatch_duration,
            outcomes,
            report,
        })
    }
}
