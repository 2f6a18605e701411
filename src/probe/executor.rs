use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use tokio::time::Instant;
use tracing::{debug, warn};

use super::aggregate::ResultAggregator;
use super::headers::{rate_limit_headers, server_headers};
use super::outcome::{FailureKind, FailureRecord, ProbeOutcome, SuccessRecord};
use super::request::ProbeRequest;

/// Fixed per-call timeout covering connect, TLS, and the full body read.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Content type sent with a body when the caller did not set one.
pub const DEFAULT_BODY_CONTENT_TYPE: &str = "application/json";

/// Runs one worker: a single request whose outcome is written into the
/// shared aggregator exactly once.
pub(crate) async fn run_worker(
    client: &Client,
    request: &ProbeRequest,
    worker_id: usize,
    aggregator: Arc<ResultAggregator>,
) {
    let outcome = execute(client, request, worker_id).await;
    match &outcome {
        ProbeOutcome::Success(record) => debug!(
            worker_id,
            status = record.http_status,
            latency = ?record.latency,
            bytes = record.response_bytes,
            "Worker finished"
        ),
        ProbeOutcome::Failure(record) => warn!(
            worker_id,
            kind = %record.error_kind,
            "Worker failed: {}",
            record.message
        ),
    }
    aggregator.record(outcome);
    drop(aggregator);
}

/// Issues one request and reduces whatever happens to a `ProbeOutcome`.
/// Never retries and never returns an error.
pub async fn execute(client: &Client, request: &ProbeRequest, worker_id: usize) -> ProbeOutcome {
    let started_at = Utc::now();
    let start = Instant::now();

    let mut builder = client
        .request(request.method().as_reqwest(), request.target_url().clone())
        .headers(request.headers().clone())
        .timeout(REQUEST_TIMEOUT);
    if let Some(body) = request.body() {
        if !request.headers().contains_key(CONTENT_TYPE) {
            builder = builder.header(
                CONTENT_TYPE,
                HeaderValue::from_static(DEFAULT_BODY_CONTENT_TYPE),
            );
        }
        builder = builder.body(body.to_vec());
    }

    let response = match builder.send().await {
        Ok(response) => response,
        Err(err) => return failure(worker_id, &err, start, started_at),
    };

    let http_status = response.status().as_u16();
    let rate_limit = rate_limit_headers(response.headers());
    let server_headers = server_headers(response.headers());

    match drain_response_body(response).await {
        Ok(response_bytes) => ProbeOutcome::Success(SuccessRecord {
            worker_id,
            http_status,
            latency: start.elapsed(),
            response_bytes,
            rate_limit,
            server_headers,
            started_at,
        }),
        Err(err) => failure(worker_id, &err, start, started_at),
    }
}

fn failure(
    worker_id: usize,
    err: &reqwest::Error,
    start: Instant,
    started_at: chrono::DateTime<Utc>,
) -> ProbeOutcome {
    ProbeOutcome::Failure(FailureRecord {
        worker_id,
        error_kind: FailureKind::from_reqwest(err),
        message: err.to_string(),
        elapsed: start.elapsed(),
        started_at,
    })
}

async fn drain_response_body(response: reqwest::Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}
