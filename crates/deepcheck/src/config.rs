//! Asserter-wide settings.

use serde::{Deserialize, Serialize};
use std::rc::Rc;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::format::DEFAULT_MAX_LENGTH;
use crate::output::{ConsoleSink, LogSink, OutputSink, SilentSink};

pub const ENV_THROW_ON_FAILURE: &str = "DEEPCHECK_THROW_ON_FAILURE";
pub const ENV_LOG_ON_SUCCESS: &str = "DEEPCHECK_LOG_ON_SUCCESS";
pub const ENV_MAX_VALUE_LENGTH: &str = "DEEPCHECK_MAX_VALUE_LENGTH";
pub const ENV_SINK: &str = "DEEPCHECK_SINK";

/// Where assertion messages go by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Standard output.
    #[default]
    Console,
    /// The `log` facade.
    Log,
    /// Nowhere.
    Silent,
}

impl SinkKind {
    pub fn create(&self) -> Rc<dyn OutputSink> {
        match self {
            Self::Console => Rc::new(ConsoleSink),
            Self::Log => Rc::new(LogSink),
            Self::Silent => Rc::new(SilentSink),
        }
    }
}

impl FromStr for SinkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "console" => Ok(Self::Console),
            "log" => Ok(Self::Log),
            "silent" => Ok(Self::Silent),
            _ => Err(format!(
                "Invalid sink: '{}'. Valid options are: console, log, silent",
                s
            )),
        }
    }
}

impl std::fmt::Display for SinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Console => write!(f, "console"),
            Self::Log => write!(f, "log"),
            Self::Silent => write!(f, "silent"),
        }
    }
}

/// Defaults that apply to every assertion made through one asserter.
///
/// Per-assertion and per-call options take precedence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssertionSettings {
    pub throw_on_failure: bool,
    pub log_on_success: bool,
    pub max_value_length: usize,
    pub sink: SinkKind,
}

impl Default for AssertionSettings {
    fn default() -> Self {
        Self {
            throw_on_failure: true,
            log_on_success: false,
            max_value_length: DEFAULT_MAX_LENGTH,
            sink: SinkKind::default(),
        }
    }
}

impl AssertionSettings {
    /// Parse settings from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Apply `DEEPCHECK_*` environment variables on top of these settings.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_THROW_ON_FAILURE) {
            self.throw_on_failure = parse_env(ENV_THROW_ON_FAILURE, &value, parse_flag)?;
        }
        if let Some(value) = lookup(ENV_LOG_ON_SUCCESS) {
            self.log_on_success = parse_env(ENV_LOG_ON_SUCCESS, &value, parse_flag)?;
        }
        if let Some(value) = lookup(ENV_MAX_VALUE_LENGTH) {
            self.max_value_length = parse_env(ENV_MAX_VALUE_LENGTH, &value, |v| {
                v.trim().parse::<usize>().map_err(|e| e.to_string())
            })?;
        }
        if let Some(value) = lookup(ENV_SINK) {
            self.sink = parse_env(ENV_SINK, &value, SinkKind::from_str)?;
        }
        Ok(self)
    }
}

fn parse_env<T, F>(variable: &str, value: &str, parse: F) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Result<T, String>,
{
    parse(value).map_err(|message| {
        log::warn!("Invalid value for {}: {}", variable, message);
        ConfigError::InvalidEnv {
            variable: variable.to_string(),
            value: value.to_string(),
            message,
        }
    })
}

fn parse_flag(value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err("expected one of: true, false, 1, 0, yes, no, on, off".to_string()),
    }
}
