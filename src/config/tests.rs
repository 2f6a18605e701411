use std::time::Duration;

use tempfile::tempdir;

use super::types::ConfigFile;
use super::{build_targets, load_config, load_config_file, suite_pause};
use crate::error::{AppError, ConfigError, ProbeError};
use crate::probe::HttpMethod;

fn write_config(name: &str, content: &str) -> Result<ConfigFile, String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join(name);
    std::fs::write(&path, content).map_err(|err| format!("write failed: {}", err))?;
    load_config_file(&path).map_err(|err| format!("load failed: {}", err))
}

#[test]
fn parse_toml_config_with_defaults() -> Result<(), String> {
    let config = write_config(
        "probeburst.toml",
        r#"
[defaults]
concurrency = 2
delay = 0.25
pause = "1s"

[defaults.headers]
Authorization = "Bot token"

[[targets]]
name = "users"
url = "https://api.example.test/users/@me"

[[targets]]
name = "update"
url = "https://api.example.test/users/@me"
method = "PATCH"
body = '{"bio":"x"}'
delay = "100ms"

[targets.headers]
Authorization = "Bot other"
"#,
    )?;

    let targets = build_targets(&config, &[("X-Trace".to_owned(), "1".to_owned())])
        .map_err(|err| format!("build failed: {}", err))?;
    let (first, second) = match targets.as_slice() {
        [first, second] => (first, second),
        _ => return Err(format!("Expected 2 targets, got {}", targets.len())),
    };

    if first.name != "users" || first.request.method() != HttpMethod::Get {
        return Err(format!("Unexpected first target: {:?}", first));
    }
    if first.request.inter_launch_delay() != Duration::from_millis(250) {
        return Err(format!(
            "Unexpected default delay: {:?}",
            first.request.inter_launch_delay()
        ));
    }
    if first.request.headers().get("authorization").map(|v| v.as_bytes())
        != Some(b"Bot token".as_slice())
    {
        return Err("Expected default authorization header".to_owned());
    }
    if first.request.headers().get("x-trace").is_none() {
        return Err("Expected CLI header on every target".to_owned());
    }

    if second.request.method() != HttpMethod::Patch
        || second.request.body() != Some(br#"{"bio":"x"}"#.as_slice())
    {
        return Err(format!("Unexpected second target: {:?}", second));
    }
    if second.request.inter_launch_delay() != Duration::from_millis(100) {
        return Err("Target delay must override defaults".to_owned());
    }
    let auth: Vec<_> = second
        .request
        .headers()
        .get_all("authorization")
        .iter()
        .collect();
    if auth.len() != 1 || auth.first().map(|v| v.as_bytes()) != Some(b"Bot other".as_slice()) {
        return Err(format!("Target header must override defaults: {:?}", auth));
    }

    let pause = suite_pause(&config).map_err(|err| format!("pause failed: {}", err))?;
    if pause != Some(Duration::from_secs(1)) {
        return Err(format!("Unexpected pause: {:?}", pause));
    }
    Ok(())
}

#[test]
fn parse_json_config() -> Result<(), String> {
    let config = write_config(
        "probeburst.json",
        r#"{
  "targets": [
    { "url": "http://localhost:8080/health", "concurrency": 50 }
  ]
}"#,
    )?;
    let targets = build_targets(&config, &[]).map_err(|err| format!("build failed: {}", err))?;
    let target = targets.first().ok_or("Missing target")?;
    if target.name != "http://localhost:8080/health" {
        return Err(format!("Name should default to the url: {}", target.name));
    }
    if target.request.concurrency() != 50 {
        return Err("Requested concurrency is kept until dispatch".to_owned());
    }
    Ok(())
}

#[test]
fn unsupported_extension_is_rejected() -> Result<(), String> {
    match write_config("probeburst.yaml", "targets: []") {
        Err(message) if message.contains("yaml") => Ok(()),
        Err(message) => Err(format!("Unexpected error: {}", message)),
        Ok(_) => Err("Expected error for yaml config".to_owned()),
    }
}

#[test]
fn config_without_targets_is_rejected() -> Result<(), String> {
    let config = write_config("probeburst.toml", "[defaults]\nconcurrency = 1\n")?;
    match build_targets(&config, &[]) {
        Err(AppError::Config(ConfigError::NoTargets)) => Ok(()),
        Err(err) => Err(format!("Unexpected error: {}", err)),
        Ok(_) => Err("Expected NoTargets".to_owned()),
    }
}

#[test]
fn invalid_target_reports_its_name() -> Result<(), String> {
    let config = write_config(
        "probeburst.toml",
        "[[targets]]\nname = \"bad\"\nurl = \"http://localhost\"\nmethod = \"DELETE\"\n",
    )?;
    match build_targets(&config, &[]) {
        Err(AppError::Config(ConfigError::InvalidTarget {
            name,
            source: ProbeError::UnsupportedMethod { .. },
        })) if name == "bad" => Ok(()),
        Err(err) => Err(format!("Unexpected error: {}", err)),
        Ok(_) => Err("Expected unsupported method".to_owned()),
    }
}

#[test]
fn invalid_delay_reports_target_value() -> Result<(), String> {
    let config = write_config(
        "probeburst.toml",
        "[[targets]]\nname = \"slow\"\nurl = \"http://localhost\"\ndelay = \"soon\"\n",
    )?;
    match build_targets(&config, &[]) {
        Err(AppError::Config(ConfigError::InvalidTargetValue { name, .. })) if name == "slow" => {
            Ok(())
        }
        Err(err) => Err(format!("Unexpected error: {}", err)),
        Ok(_) => Err("Expected invalid delay".to_owned()),
    }
}

#[test]
fn explicit_config_path_is_loaded() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("suite.json");
    std::fs::write(&path, r#"{"targets":[{"url":"http://localhost/health"}]}"#)
        .map_err(|err| format!("write failed: {}", err))?;
    let path = path.to_string_lossy().into_owned();

    let config = load_config(Some(path.as_str()))
        .map_err(|err| format!("load failed: {}", err))?
        .ok_or("Expected a config")?;
    if config.targets.len() != 1 {
        return Err(format!("Unexpected targets: {:?}", config.targets));
    }
    Ok(())
}

#[test]
fn missing_explicit_config_is_an_error() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("absent.toml").to_string_lossy().into_owned();
    match load_config(Some(path.as_str())) {
        Err(AppError::Config(ConfigError::ReadConfig { .. })) => Ok(()),
        Err(err) => Err(format!("Unexpected error: {}", err)),
        Ok(_) => Err("Expected a read error".to_owned()),
    }
}
