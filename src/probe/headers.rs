use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;

use super::outcome::RateLimitHeaders;

pub(crate) const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";
pub(crate) const RATE_LIMIT_RESET: &str = "x-ratelimit-reset";
pub(crate) const RATE_LIMIT_LIMIT: &str = "x-ratelimit-limit";

/// Response headers copied verbatim into a success record.
pub(crate) const SERVER_HEADERS: [&str; 3] = ["server", "cf-ray", "content-type"];

/// Digits kept from the fractional part of a reset timestamp.
const NANOS_DIGITS: usize = 9;

pub(crate) fn rate_limit_headers(headers: &HeaderMap) -> RateLimitHeaders {
    RateLimitHeaders {
        remaining: header_str(headers, RATE_LIMIT_REMAINING).and_then(parse_count),
        reset: header_str(headers, RATE_LIMIT_RESET).and_then(parse_epoch_seconds),
        limit: header_str(headers, RATE_LIMIT_LIMIT).and_then(parse_count),
    }
}

pub(crate) fn server_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    SERVER_HEADERS
        .iter()
        .filter_map(|name| {
            header_str(headers, name).map(|value| ((*name).to_owned(), value.to_owned()))
        })
        .collect()
}

fn header_str<'headers>(headers: &'headers HeaderMap, name: &str) -> Option<&'headers str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
}

fn parse_count(value: &str) -> Option<u64> {
    value.parse().ok()
}

/// Parses `1470173023` or `1470173023.123` into a UTC timestamp.
fn parse_epoch_seconds(value: &str) -> Option<DateTime<Utc>> {
    let (secs_part, frac_part) = value.split_once('.').unwrap_or((value, ""));
    let secs: i64 = secs_part.parse().ok()?;
    if !frac_part.chars().all(|ch| ch.is_ascii_digit()) {
        return None;
    }
    let mut digits: String = frac_part.chars().take(NANOS_DIGITS).collect();
    while digits.len() < NANOS_DIGITS {
        digits.push('0');
    }
    let nanos: u32 = digits.parse().ok()?;
    DateTime::from_timestamp(secs, nanos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderName, HeaderValue};

    fn header_map(pairs: &[(&str, &'static str)]) -> Result<HeaderMap, String> {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            let name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|err| format!("{}", err))?;
            headers.insert(name, HeaderValue::from_static(*value));
        }
        Ok(headers)
    }

    #[test]
    fn rate_limit_headers_are_parsed() -> Result<(), String> {
        let headers = header_map(&[
            ("X-RateLimit-Remaining", "4"),
            ("X-RateLimit-Limit", "5"),
            ("X-RateLimit-Reset", "1470173023.250"),
        ])?;
        let parsed = rate_limit_headers(&headers);
        if parsed.remaining != Some(4) || parsed.limit != Some(5) {
            return Err(format!("Unexpected counts: {:?}", parsed));
        }
        let reset = parsed.reset.ok_or("Missing reset")?;
        if reset.timestamp() != 1_470_173_023 || reset.timestamp_subsec_millis() != 250 {
            return Err(format!("Unexpected reset: {}", reset));
        }
        Ok(())
    }

    #[test]
    fn unparsable_rate_limit_values_are_absent() -> Result<(), String> {
        let headers = header_map(&[
            ("X-RateLimit-Remaining", "many"),
            ("X-RateLimit-Reset", "soon.ish"),
        ])?;
        let parsed = rate_limit_headers(&headers);
        if parsed != RateLimitHeaders::default() {
            return Err(format!("Expected empty rate limit info, got {:?}", parsed));
        }
        Ok(())
    }

    #[test]
    fn server_headers_keep_known_names_only() -> Result<(), String> {
        let headers = header_map(&[
            ("Server", "cloudflare"),
            ("CF-Ray", "abc123-GRU"),
            ("X-Other", "ignored"),
        ])?;
        let captured = server_headers(&headers);
        if captured.len() != 2 {
            return Err(format!("Unexpected headers: {:?}", captured));
        }
        if captured.get("server").map(String::as_str) != Some("cloudflare") {
            return Err("Missing server header".to_owned());
        }
        Ok(())
    }
}
