//! Core library for the `probeburst` CLI.
//!
//! The engine issues a small, paced burst of HTTP requests against one
//! endpoint, collects one outcome per worker, and turns the outcomes into a
//! consistency and health report. Concurrency is capped at
//! [`probe::MAX_CONCURRENT_WORKERS`] whatever the caller asks for.
//!
//! ```no_run
//! # async fn demo() -> Result<(), probeburst::error::ProbeError> {
//! use probeburst::probe::{HttpMethod, ProbeEngine, ProbeRequest};
//!
//! let engine = ProbeEngine::new()?;
//! let request = ProbeRequest::new("https://example.com/health", HttpMethod::Get)?;
//! let run = engine.run(request).await?;
//! println!("{:.1}% ok", run.report.success_rate_percent);
//! # Ok(())
//! # }
//! ```
pub mod analysis;
pub mod args;
pub mod config;
pub mod error;
pub mod logger;
pub mod output;
pub mod probe;
pub mod shutdown;
pub mod suite;
