use serde::{Serialize, Serializer};

/// Success rate (percent) at or above which availability is "high".
pub const HIGH_AVAILABILITY_PERCENT: f64 = 95.0;
/// Success rate (percent) at or above which availability is "moderate".
pub const MODERATE_AVAILABILITY_PERCENT: f64 = 80.0;
/// Mean latency (ms) below which response time is "excellent".
pub const EXCELLENT_LATENCY_MS: f64 = 200.0;
/// Mean latency (ms) below which response time is "adequate".
pub const ADEQUATE_LATENCY_MS: f64 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthIndicator {
    HighAvailability,
    ModerateAvailability,
    AvailabilityProblem,
    Excellent,
    Adequate,
    Slow,
    Unavailable,
}

impl HealthIndicator {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            HealthIndicator::HighAvailability => "high availability",
            HealthIndicator::ModerateAvailability => "moderate availability",
            HealthIndicator::AvailabilityProblem => "availability problem",
            HealthIndicator::Excellent => "excellent",
            HealthIndicator::Adequate => "adequate",
            HealthIndicator::Slow => "slow",
            HealthIndicator::Unavailable => "unavailable",
        }
    }
}

impl std::fmt::Display for HealthIndicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for HealthIndicator {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

#[must_use]
pub fn availability_indicator(success_rate_percent: f64) -> HealthIndicator {
    if success_rate_percent >= HIGH_AVAILABILITY_PERCENT {
        HealthIndicator::HighAvailability
    } else if success_rate_percent >= MODERATE_AVAILABILITY_PERCENT {
        HealthIndicator::ModerateAvailability
    } else {
        HealthIndicator::AvailabilityProblem
    }
}

#[must_use]
pub fn latency_indicator(mean_latency_ms: f64) -> HealthIndicator {
    if mean_latency_ms < EXCELLENT_LATENCY_MS {
        HealthIndicator::Excellent
    } else if mean_latency_ms < ADEQUATE_LATENCY_MS {
        HealthIndicator::Adequate
    } else {
        HealthIndicator::Slow
    }
}

/// Availability label first, latency label second.
#[must_use]
pub fn classify(success_rate_percent: f64, mean_latency_ms: f64) -> Vec<HealthIndicator> {
    vec![
        availability_indicator(success_rate_percent),
        latency_indicator(mean_latency_ms),
    ]
}
