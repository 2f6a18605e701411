use clap::{Parser, ValueEnum};
use std::time::Duration;

use crate::probe::{HttpMethod, ProbeRequest};

use super::parsers::{parse_delay, parse_header};

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Paced, bounded-concurrency HTTP endpoint probe with a consistency and health report."
)]
pub struct ProbeArgs {
    /// Target URL to probe
    #[arg(long, short)]
    pub url: Option<String>,

    /// HTTP method to use
    #[arg(long, short = 'X', value_enum, ignore_case = true, default_value_t = HttpMethod::Get)]
    pub method: HttpMethod,

    /// HTTP header to add (repeatable, 'Key: Value')
    #[arg(long = "header", short = 'H', value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Request body, sent as application/json unless -H sets Content-Type
    #[arg(long, short = 'd')]
    pub data: Option<String>,

    /// Requested number of workers (capped by the engine)
    #[arg(long, short, default_value_t = ProbeRequest::DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Delay between worker launches (seconds, e.g. 0.5, or 500ms/1s)
    #[arg(long, value_parser = parse_delay)]
    pub delay: Option<Duration>,

    /// Path to a TOML or JSON config file with probe targets
    #[arg(long)]
    pub config: Option<String>,

    /// Pause between targets when probing a suite
    #[arg(long = "suite-pause", value_parser = parse_delay)]
    pub suite_pause: Option<Duration>,

    /// Report format written to stdout
    #[arg(long = "output-format", value_enum, default_value_t = OutputFormat::Text)]
    pub output_format: OutputFormat,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,

    /// Disable colored log output
    #[arg(long = "no-color")]
    pub no_color: bool,
}
