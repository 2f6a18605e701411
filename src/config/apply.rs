use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::{AppError, AppResult, ConfigError, ProbeError};
use crate::probe::{HttpMethod, ProbeRequest};
use crate::suite::SuiteTarget;

use super::types::{ConfigFile, DefaultsConfig, DelayValue, TargetConfig};

/// Turns every configured target into a ready-to-run probe request.
///
/// Target values override `[defaults]`; `cli_headers` are appended to every
/// target after the configured headers.
///
/// # Errors
///
/// Returns an error when the config has no targets or a target is invalid.
pub fn build_targets(
    config: &ConfigFile,
    cli_headers: &[(String, String)],
) -> AppResult<Vec<SuiteTarget>> {
    if config.targets.is_empty() {
        return Err(AppError::config(ConfigError::NoTargets));
    }
    let defaults = config.defaults.as_ref();
    config
        .targets
        .iter()
        .map(|target| build_target(target, defaults, cli_headers))
        .collect()
}

/// Pause between suite targets taken from `[defaults]`, if set.
///
/// # Errors
///
/// Returns an error when the configured pause is not a valid delay.
pub fn suite_pause(config: &ConfigFile) -> AppResult<Option<Duration>> {
    config
        .defaults
        .as_ref()
        .and_then(|defaults| defaults.pause.as_ref())
        .map(|pause| with_target_name("defaults", pause.to_duration()))
        .transpose()
}

fn build_target(
    target: &TargetConfig,
    defaults: Option<&DefaultsConfig>,
    cli_headers: &[(String, String)],
) -> AppResult<SuiteTarget> {
    let name = target.name.clone().unwrap_or_else(|| target.url.clone());
    let invalid = |source: ProbeError| {
        AppError::config(ConfigError::InvalidTarget {
            name: name.clone(),
            source,
        })
    };

    let method = match target.method.as_deref() {
        Some(value) => value.parse::<HttpMethod>().map_err(invalid)?,
        None => HttpMethod::Get,
    };
    let mut request = ProbeRequest::new(&target.url, method).map_err(invalid)?;

    if let Some(body) = &target.body {
        request = request.with_body(body.as_bytes());
    }

    let mut headers: BTreeMap<&str, &str> = BTreeMap::new();
    for source in [defaults.and_then(|d| d.headers.as_ref()), target.headers.as_ref()]
        .into_iter()
        .flatten()
    {
        for (key, value) in source {
            headers.insert(key, value);
        }
    }
    for (key, value) in headers {
        request = request.with_header(key, value).map_err(invalid)?;
    }
    for (key, value) in cli_headers {
        request = request.with_header(key, value).map_err(invalid)?;
    }

    if let Some(concurrency) = target
        .concurrency
        .or_else(|| defaults.and_then(|d| d.concurrency))
    {
        request = request.with_concurrency(concurrency).map_err(invalid)?;
    }

    let delay: Option<&DelayValue> = target
        .delay
        .as_ref()
        .or_else(|| defaults.and_then(|d| d.delay.as_ref()));
    if let Some(delay) = delay {
        request = request.with_inter_launch_delay(with_target_name(&name, delay.to_duration())?);
    }

    Ok(SuiteTarget { name, request })
}

fn with_target_name<T>(name: &str, result: AppResult<T>) -> AppResult<T> {
    result.map_err(|err| {
        if let AppError::Validation(source) = err {
            AppError::config(ConfigError::InvalidTargetValue {
                name: name.to_owned(),
                source,
            })
        } else {
            err
        }
    })
}
