use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Unsupported URL scheme in '{url}'. Use http or https.")]
    UnsupportedScheme { url: String },
    #[error("Unsupported HTTP method '{value}'. Use GET, POST, or PATCH.")]
    UnsupportedMethod { value: String },
    #[error("Concurrency must be >= 1.")]
    ZeroConcurrency,
    #[error("Invalid header name '{header}': {source}")]
    InvalidHeaderName {
        header: String,
        #[source]
        source: reqwest::header::InvalidHeaderName,
    },
    #[error("Invalid value for header '{header}': {source}")]
    InvalidHeaderValue {
        header: String,
        #[source]
        source: reqwest::header::InvalidHeaderValue,
    },
    #[error("Failed to build HTTP client: {source}")]
    BuildClientFailed {
        #[source]
        source: reqwest::Error,
    },
    #[error("Aggregate snapshot requested while {outstanding} worker handle(s) are still live.")]
    AggregateInFlight { outstanding: usize },
    #[error("Probe cancelled after launching {launched} worker(s); launched workers were drained.")]
    Cancelled { launched: usize },
}
