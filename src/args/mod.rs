//! CLI argument types and parsing helpers.
mod cli;
pub(crate) mod parsers;


pub use cli::{OutputFormat, ProbeArgs};
pub use parsers::{parse_delay, parse_header};
