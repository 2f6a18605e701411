use std::time::Duration;

use crate::error::{AppError, AppResult, ValidationError};

pub fn parse_header(s: &str) -> Result<(String, String), ValidationError> {
    s.split_once(':')
        .map(|(key, value)| (key.trim(), value.trim()))
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_owned(), value.to_owned()))
        .ok_or_else(|| ValidationError::InvalidHeaderFormat {
            value: s.to_owned(),
        })
}

/// Parses a pacing delay: plain (possibly fractional) seconds such as `0.5`,
/// or an integer with an `ms`/`s`/`m` suffix. Zero is allowed.
pub fn parse_delay(s: &str) -> AppResult<Duration> {
    let value = s.trim();
    if value.is_empty() {
        return Err(AppError::validation(ValidationError::DelayEmpty));
    }

    if value.chars().all(|ch| ch.is_ascii_digit() || ch == '.') {
        return value
            .parse::<f64>()
            .ok()
            .and_then(|seconds| Duration::try_from_secs_f64(seconds).ok())
            .ok_or_else(|| {
                AppError::validation(ValidationError::InvalidDelay {
                    value: value.to_owned(),
                })
            });
    }

    parse_duration_arg(value)
}

fn parse_duration_arg(value: &str) -> AppResult<Duration> {
    let digits_len = value.chars().take_while(char::is_ascii_digit).count();
    if digits_len == 0 {
        return Err(AppError::validation(
            ValidationError::InvalidDurationFormat {
                value: value.to_owned(),
            },
        ));
    }
    let (num_part, unit_part) = value.split_at(digits_len);
    let number: u64 = num_part.parse().map_err(|err| {
        AppError::validation(ValidationError::InvalidDurationNumber {
            value: value.to_owned(),
            source: err,
        })
    })?;

    match unit_part {
        "ms" => Ok(Duration::from_millis(number)),
        "s" => Ok(Duration::from_secs(number)),
        "m" => number
            .checked_mul(60)
            .map(Duration::from_secs)
            .ok_or_else(|| AppError::validation(ValidationError::DurationOverflow)),
        _ => Err(AppError::validation(ValidationError::InvalidDurationUnit {
            unit: unit_part.to_owned(),
        })),
    }
}
