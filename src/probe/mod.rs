//! Paced, bounded-concurrency HTTP probing of a single endpoint.
mod aggregate;
mod dispatch;
mod executor;
mod headers;
mod outcome;
mod request;

pub use aggregate::{ProbeAggregate, ResultAggregator};
pub use dispatch::{MAX_CONCURRENT_WORKERS, ProbeEngine, ProbeRun, clamp_workers};
pub use executor::{REQUEST_TIMEOUT, execute};
pub use outcome::{
    FailureKind, FailureRecord, ProbeOutcome, RateLimitHeaders, SuccessRecord, duration_ms,
};
pub use request::{HttpMethod, ProbeRequest};
