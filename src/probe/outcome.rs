use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// Microseconds per millisecond.
const US_PER_MS: f64 = 1_000.0;

/// Converts a duration to fractional milliseconds with microsecond precision.
#[must_use]
pub fn duration_ms(duration: Duration) -> f64 {
    duration.as_micros() as f64 / US_PER_MS
}

pub(crate) fn serialize_ms<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(duration_ms(*duration))
}

/// What one worker observed. Exactly one is recorded per launched worker.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum ProbeOutcome {
    Success(SuccessRecord),
    Failure(FailureRecord),
}

impl ProbeOutcome {
    #[must_use]
    pub const fn worker_id(&self) -> usize {
        match self {
            ProbeOutcome::Success(record) => record.worker_id,
            ProbeOutcome::Failure(record) => record.worker_id,
        }
    }

    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        match self {
            ProbeOutcome::Success(record) => record.started_at,
            ProbeOutcome::Failure(record) => record.started_at,
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, ProbeOutcome::Success(_))
    }
}

/// A response was received, whatever its status code.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SuccessRecord {
    pub worker_id: usize,
    pub http_status: u16,
    #[serde(rename = "latency_ms", serialize_with = "serialize_ms")]
    pub latency: Duration,
    pub response_bytes: u64,
    pub rate_limit: RateLimitHeaders,
    pub server_headers: BTreeMap<String, String>,
    pub started_at: DateTime<Utc>,
}

/// Rate-limit hints advertised by the target. Each field is absent when the
/// header was missing or unparsable.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct RateLimitHeaders {
    pub remaining: Option<u64>,
    pub reset: Option<DateTime<Utc>>,
    pub limit: Option<u64>,
}

/// No usable response. Transport problems end up here as data.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FailureRecord {
    pub worker_id: usize,
    pub error_kind: FailureKind,
    pub message: String,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_ms")]
    pub elapsed: Duration,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    Timeout,
    Connect,
    Redirect,
    Body,
    Decode,
    Request,
    Aborted,
}

impl FailureKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            FailureKind::Timeout => "timeout",
            FailureKind::Connect => "connect",
            FailureKind::Redirect => "redirect",
            FailureKind::Body => "body",
            FailureKind::Decode => "decode",
            FailureKind::Request => "request",
            FailureKind::Aborted => "aborted",
        }
    }

    /// Classifies a transport error. Timeouts win over every other flag
    /// since a connect timeout reports both.
    #[must_use]
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            FailureKind::Timeout
        } else if err.is_connect() {
            FailureKind::Connect
        } else if err.is_redirect() {
            FailureKind::Redirect
        } else if err.is_body() {
            FailureKind::Body
        } else if err.is_decode() {
            FailureKind::Decode
        } else {
            FailureKind::Request
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_ms_keeps_whole_milliseconds_exact() -> Result<(), String> {
        let ms = duration_ms(Duration::from_millis(150));
        if (ms - 150.0).abs() > f64::EPSILON {
            return Err(format!("Expected 150ms, got {}", ms));
        }
        let fractional = duration_ms(Duration::from_micros(1_500));
        if (fractional - 1.5).abs() > f64::EPSILON {
            return Err(format!("Expected 1.5ms, got {}", fractional));
        }
        Ok(())
    }

    #[test]
    fn outcome_serializes_with_tag_and_ms() -> Result<(), String> {
        let outcome = ProbeOutcome::Failure(FailureRecord {
            worker_id: 2,
            error_kind: FailureKind::Connect,
            message: "connection refused".to_owned(),
            elapsed: Duration::from_millis(3),
            started_at: DateTime::<Utc>::UNIX_EPOCH,
        });
        let value = serde_json::to_value(&outcome).map_err(|err| format!("{}", err))?;
        if value.get("outcome").and_then(|v| v.as_str()) != Some("failure") {
            return Err(format!("Missing tag: {}", value));
        }
        if value.get("error_kind").and_then(|v| v.as_str()) != Some("connect") {
            return Err(format!("Unexpected error kind: {}", value));
        }
        let elapsed = value.get("elapsed_ms").and_then(serde_json::Value::as_f64);
        if elapsed.is_none_or(|ms| (ms - 3.0).abs() > f64::EPSILON) {
            return Err(format!("Unexpected elapsed: {}", value));
        }
        Ok(())
    }
}
