//! Configuration management for the planner client
//!
//! This module provides utilities for loading and validating the client
//! configuration, with support for environment variables.

use std::env;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use once_cell::sync::Lazy;
use url::Url;

use crate::error::{Result, ServiceError};
use crate::util::parse_duration;

/// Backend used when nothing is configured
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:5000";

/// A source of string settings
pub trait ConfigProvider: Send + Sync {
    /// Raw value for `key`; a configuration error when it is not set
    fn get_string(&self, key: &str) -> Result<String>;
}

/// Typed lookups on top of any `ConfigProvider`
pub trait ConfigProviderExt: ConfigProvider {
    fn get_int(&self, key: &str) -> Result<i64> {
        let raw = self.get_string(key)?;
        raw.trim()
            .parse::<i64>()
            .map_err(|_| invalid_value(key, "an integer", &raw))
    }

    /// Accepts true/false, yes/no, on/off and 1/0
    fn get_bool(&self, key: &str) -> Result<bool> {
        let raw = self.get_string(key)?;
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(invalid_value(key, "a boolean", &raw)),
        }
    }

    /// Durations such as "30s", "2m", "250ms" or a bare number of seconds
    fn get_duration(&self, key: &str) -> Result<Duration> {
        let raw = self.get_string(key)?;
        parse_duration(&raw).ok_or_else(|| invalid_value(key, "a duration", &raw))
    }

    fn get_string_or(&self, key: &str, default: &str) -> String {
        self.get_string(key).unwrap_or_else(|_| default.to_string())
    }

    fn get_int_or(&self, key: &str, default: i64) -> i64 {
        self.get_int(key).unwrap_or(default)
    }

    fn get_bool_or(&self, key: &str, default: bool) -> bool {
        self.get_bool(key).unwrap_or(default)
    }
}

impl<T: ConfigProvider + ?Sized> ConfigProviderExt for T {}

fn invalid_value(key: &str, expected: &str, raw: &str) -> ServiceError {
    ServiceError::configuration(format!("{} must be {}, got {:?}", key, expected, raw))
}

/// Reads settings from environment variables
///
/// `api_base` with prefix `PLANNER` is read from `PLANNER_API_BASE`; an
/// optional namespace is inserted between the two.
#[derive(Debug, Clone, Default)]
pub struct EnvConfigProvider {
    prefix: Option<String>,
    namespace: Option<String>,
}

impl EnvConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Environment variable name for a setting key
    pub(crate) fn format_key(&self, key: &str) -> String {
        let key: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
            .collect();

        self.prefix
            .iter()
            .chain(self.namespace.iter())
            .map(String::as_str)
            .chain(std::iter::once(key.as_str()))
            .collect::<Vec<_>>()
            .join("_")
    }
}

impl ConfigProvider for EnvConfigProvider {
    fn get_string(&self, key: &str) -> Result<String> {
        let var = self.format_key(key);
        env::var(&var).map_err(|e| match e {
            env::VarError::NotPresent => {
                ServiceError::configuration(format!("{} is not set", var))
            }
            env::VarError::NotUnicode(_) => {
                ServiceError::configuration(format!("{} is not valid unicode", var))
            }
        })
    }
}

/// Fixed in-memory settings
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigProvider {
    values: HashMap<String, String>,
}

impl MemoryConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: ToString,
    {
        self.values.insert(key.into(), value.to_string());
    }
}

impl ConfigProvider for MemoryConfigProvider {
    fn get_string(&self, key: &str) -> Result<String> {
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| ServiceError::configuration(format!("{} is not set", key)))
    }
}

/// Chain of providers; the first one that knows a key answers
#[derive(Default)]
pub struct CompositeConfigProvider {
    providers: Vec<Box<dyn ConfigProvider>>,
}

impl CompositeConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_provider(&mut self, provider: impl ConfigProvider + 'static) {
        self.providers.push(Box::new(provider));
    }

    pub fn with_provider(mut self, provider: impl ConfigProvider + 'static) -> Self {
        self.add_provider(provider);
        self
    }
}

impl ConfigProvider for CompositeConfigProvider {
    fn get_string(&self, key: &str) -> Result<String> {
        self.providers
            .iter()
            .find_map(|provider| provider.get_string(key).ok())
            .ok_or_else(|| {
                ServiceError::configuration(format!("{} is not set by any provider", key))
            })
    }
}

/// Global default configuration provider (`PLANNER_*` variables)
pub static DEFAULT_PROVIDER: Lazy<Arc<EnvConfigProvider>> = Lazy::new(|| {
    Arc::new(EnvConfigProvider::new().with_prefix("PLANNER"))
});

/// Trait for validated configuration records
pub trait ServiceConfig: Debug + Send + Sync {
    /// Validate this configuration
    fn validate(&self) -> Result<()>;

    /// Service name
    fn service_name(&self) -> &str;
}

/// Client configuration for the study planner backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Base URL every endpoint is resolved against
    pub base_url: String,

    /// Optional request timeout; requests wait indefinitely when unset
    #[serde(default, with = "optional_duration")]
    pub timeout: Option<Duration>,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            timeout: None,
            user_agent: None,
        }
    }
}

impl PlannerConfig {
    /// Load configuration from a config provider
    pub fn from_provider<P: ConfigProvider + ?Sized>(provider: &P) -> Result<Self> {
        let base_url = provider.get_string_or("api_base", DEFAULT_API_BASE);
        let timeout = match provider.get_string("timeout") {
            Ok(_) => Some(provider.get_duration("timeout")?),
            Err(_) => None,
        };
        let user_agent = provider.get_string("user_agent").ok();

        let config = Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            user_agent,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `PLANNER_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_provider(&**DEFAULT_PROVIDER)
    }
}

impl ServiceConfig for PlannerConfig {
    fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(ServiceError::configuration("Planner API base URL is required"));
        }

        let url = Url::parse(&self.base_url).map_err(|e| {
            ServiceError::configuration(format!("Invalid API base URL {}: {}", self.base_url, e))
        })?;

        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(ServiceError::configuration(format!(
                "Unsupported API base URL scheme: {}",
                other
            ))),
        }
    }

    fn service_name(&self) -> &str {
        "planner"
    }
}

mod optional_duration {
    use std::time::Duration;

    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::util::parse_duration;

    /// Accepts bare seconds or a `parse_duration` string
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDuration {
        Seconds(u64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) if d.subsec_nanos() == 0 => {
                serializer.serialize_some(&format!("{}s", d.as_secs()))
            }
            Some(d) => serializer.serialize_some(&format!("{}ms", d.as_millis())),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        match Option::<RawDuration>::deserialize(deserializer)? {
            None => Ok(None),
            Some(RawDuration::Seconds(secs)) => Ok(Some(Duration::from_secs(secs))),
            Some(RawDuration::Text(text)) => parse_duration(&text)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid duration: {}", text))),
        }
    }
}
