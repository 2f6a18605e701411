use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::args::parse_delay;
use crate::error::AppResult;

#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub defaults: Option<DefaultsConfig>,
    #[serde(default)]
    pub targets: Vec<TargetConfig>,
}

/// Values applied to every target unless the target sets its own.
#[derive(Debug, Default, Deserialize)]
pub struct DefaultsConfig {
    pub headers: Option<BTreeMap<String, String>>,
    pub concurrency: Option<usize>,
    pub delay: Option<DelayValue>,
    pub pause: Option<DelayValue>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TargetConfig {
    pub name: Option<String>,
    pub url: String,
    pub method: Option<String>,
    pub body: Option<String>,
    pub headers: Option<BTreeMap<String, String>>,
    pub concurrency: Option<usize>,
    pub delay: Option<DelayValue>,
}

/// A delay written either as a number of seconds or as text such as `"250ms"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DelayValue {
    Seconds(f64),
    Text(String),
}

impl DelayValue {
    pub(crate) fn to_duration(&self) -> AppResult<Duration> {
        match self {
            DelayValue::Seconds(seconds) => parse_delay(&seconds.to_string()),
            DelayValue::Text(text) => parse_delay(text),
        }
    }
}
