use std::time::Duration;

use clap::ValueEnum;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ProbeError;

/// Methods the engine knows how to issue.
#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
}

impl HttpMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
        }
    }

    pub(crate) const fn as_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Patch => reqwest::Method::PATCH,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HttpMethod {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PATCH" => Ok(HttpMethod::Patch),
            _ => Err(ProbeError::UnsupportedMethod {
                value: s.to_owned(),
            }),
        }
    }
}

/// Description of one probe: which endpoint to hit, how, and how hard.
///
/// Built once by the caller and shared read-only with every worker once
/// dispatch begins.
#[derive(Debug, Clone)]
pub struct ProbeRequest {
    target_url: Url,
    method: HttpMethod,
    body: Option<Vec<u8>>,
    headers: HeaderMap,
    concurrency: usize,
    inter_launch_delay: Duration,
}

impl ProbeRequest {
    /// Default number of workers requested when the caller does not choose.
    pub const DEFAULT_CONCURRENCY: usize = 2;
    /// Default pause between two worker launches.
    pub const DEFAULT_INTER_LAUNCH_DELAY: Duration = Duration::from_millis(500);

    /// Creates a request for `url` with default concurrency and pacing.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL cannot be parsed or is not http(s).
    pub fn new(url: &str, method: HttpMethod) -> Result<Self, ProbeError> {
        let target_url = Url::parse(url).map_err(|err| ProbeError::InvalidUrl {
            url: url.to_owned(),
            source: err,
        })?;
        if !matches!(target_url.scheme(), "http" | "https") {
            return Err(ProbeError::UnsupportedScheme {
                url: url.to_owned(),
            });
        }
        Ok(Self {
            target_url,
            method,
            body: None,
            headers: HeaderMap::new(),
            concurrency: Self::DEFAULT_CONCURRENCY,
            inter_launch_delay: Self::DEFAULT_INTER_LAUNCH_DELAY,
        })
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Adds one request header. Repeated names are appended, not replaced.
    ///
    /// # Errors
    ///
    /// Returns an error when the header name or value is not valid HTTP.
    pub fn with_header(mut self, key: &str, value: &str) -> Result<Self, ProbeError> {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|err| {
            ProbeError::InvalidHeaderName {
                header: key.to_owned(),
                source: err,
            }
        })?;
        let value = HeaderValue::from_str(value).map_err(|err| ProbeError::InvalidHeaderValue {
            header: key.to_owned(),
            source: err,
        })?;
        self.headers.append(name, value);
        Ok(self)
    }

    /// Sets the requested worker count. The engine still clamps it to its
    /// safety ceiling at dispatch time.
    ///
    /// # Errors
    ///
    /// Returns an error when `concurrency` is zero.
    pub fn with_concurrency(mut self, concurrency: usize) -> Result<Self, ProbeError> {
        if concurrency == 0 {
            return Err(ProbeError::ZeroConcurrency);
        }
        self.concurrency = concurrency;
        Ok(self)
    }

    #[must_use]
    pub fn with_inter_launch_delay(mut self, delay: Duration) -> Self {
        self.inter_launch_delay = delay;
        self
    }

    #[must_use]
    pub const fn target_url(&self) -> &Url {
        &self.target_url
    }

    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    #[must_use]
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[must_use]
    pub const fn concurrency(&self) -> usize {
        self.concurrency
    }

    #[must_use]
    pub const fn inter_launch_delay(&self) -> Duration {
        self.inter_launch_delay
    }
}
