use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::probe::FailureRecord;

use super::health::HealthIndicator;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConsistencyReport {
    pub total_requests: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub success_rate_percent: f64,
    /// Absent when nothing succeeded.
    pub latency: Option<LatencySummary>,
    pub unique_status_code_count: usize,
    pub status_code_histogram: BTreeMap<u16, usize>,
    pub response_size_variance_detected: bool,
    /// Present only when every success advertised a remaining quota.
    pub rate_limiting: Option<RateLimitSummary>,
    pub health_indicators: Vec<HealthIndicator>,
    pub insights: Vec<Insight>,
    pub recommendations: Vec<Recommendation>,
    pub failure_samples: Vec<FailureRecord>,
}

impl ConsistencyReport {
    /// True when the run produced no successful response at all.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.success_count == 0
    }
}

/// Latency over successful outcomes, in milliseconds.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct LatencySummary {
    pub min_ms: f64,
    pub max_ms: f64,
    pub mean_ms: f64,
    pub median_ms: f64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct RateLimitSummary {
    pub average_remaining: f64,
    pub min_remaining: u64,
    pub is_near_limit: bool,
    /// Smallest advertised quota, when any success carried one.
    pub limit: Option<u64>,
    /// Earliest advertised reset, when any success carried one.
    pub next_reset: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insight {
    ConsistentResponses,
    StableBehaviour,
    ResponseSizeVariation,
    PossibleDynamicContent,
}

impl Insight {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Insight::ConsistentResponses => "consistent responses",
            Insight::StableBehaviour => "stable behaviour",
            Insight::ResponseSizeVariation => "response size variation",
            Insight::PossibleDynamicContent => "possible dynamic content",
        }
    }
}

impl Serialize for Insight {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    CheckConnectivity,
    ConfirmCredentials,
    ReviewEndpoint,
}

impl Recommendation {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Recommendation::CheckConnectivity => "check network connectivity",
            Recommendation::ConfirmCredentials => "confirm credential validity",
            Recommendation::ReviewEndpoint => "review target endpoint",
        }
    }
}

impl Serialize for Recommendation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.label())
    }
}
