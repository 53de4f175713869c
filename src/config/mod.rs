//! Configuration module for the payments client.
//!
//! Provides configuration management including the ordered credential
//! source chain, base URL, timeout, and API version settings.
//!
//! The secret key itself is not part of the configuration: it is
//! resolved from the source chain exactly once, at first acquisition of
//! the client (see [`crate::provider::LazyClientProvider`]).

use std::time::Duration;

use crate::auth::SecretKey;
use crate::errors::{PaymentsError, PaymentsResult};

/// Default base URL for the payments API.
pub const DEFAULT_BASE_URL: &str = "https://api.stripe.com/v1";

/// Default request timeout (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default API version header value.
pub const DEFAULT_API_VERSION: &str = "2024-06-20";

/// Default credential source chain, in precedence order.
///
/// Two names support two deployment conventions: server processes export
/// `STRIPE_SECRET_KEY` directly, while Expo-packaged builds inline the
/// `EXPO_PUBLIC_`-prefixed variant. The first non-empty value wins.
pub const DEFAULT_KEY_SOURCES: [&str; 2] = ["STRIPE_SECRET_KEY", "EXPO_PUBLIC_STRIPE_SECRET_KEY"];

/// A named credential source.
#[derive(Clone)]
pub enum KeySource {
    /// An environment variable, read at resolution time.
    Env(String),
    /// A fixed value carried under a name (tests, embedded deployments).
    Fixed {
        /// Source name used in diagnostics.
        name: String,
        /// The credential value. An empty string counts as absent.
        value: String,
    },
}

impl KeySource {
    /// Creates an environment-variable source.
    pub fn env(name: impl Into<String>) -> Self {
        KeySource::Env(name.into())
    }

    /// Creates a fixed-value source.
    pub fn fixed(name: impl Into<String>, value: impl Into<String>) -> Self {
        KeySource::Fixed {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Returns the source name.
    pub fn name(&self) -> &str {
        match self {
            KeySource::Env(name) => name,
            KeySource::Fixed { name, .. } => name,
        }
    }

    /// Reads the source, treating an empty value as absent.
    fn read(&self) -> Option<String> {
        let value = match self {
            KeySource::Env(name) => std::env::var(name).ok()?,
            KeySource::Fixed { value, .. } => value.clone(),
        };
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

impl std::fmt::Debug for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeySource::Env(name) => f.debug_tuple("Env").field(name).finish(),
            KeySource::Fixed { name, .. } => f
                .debug_struct("Fixed")
                .field("name", name)
                .field("value", &"[REDACTED]")
                .finish(),
        }
    }
}

/// Resolves the first non-empty source in the chain.
///
/// Returns the winning source name alongside the key so the caller can
/// log where the credential came from without logging the credential.
pub fn resolve_key(sources: &[KeySource]) -> Option<(String, SecretKey)> {
    sources
        .iter()
        .find_map(|source| source.read().map(|v| (source.name().to_string(), SecretKey::new(v))))
}

/// Configuration for the payments client.
#[derive(Debug, Clone)]
pub struct PaymentsConfig {
    /// Ordered credential source chain.
    pub key_sources: Vec<KeySource>,
    /// Base URL for API requests.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// API version header value.
    pub api_version: String,
}

impl PaymentsConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> PaymentsConfigBuilder {
        PaymentsConfigBuilder::new()
    }
}

impl Default for PaymentsConfig {
    fn default() -> Self {
        Self {
            key_sources: DEFAULT_KEY_SOURCES.iter().map(|&name| KeySource::env(name)).collect(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }
}

/// Builder for `PaymentsConfig`.
#[derive(Default)]
pub struct PaymentsConfigBuilder {
    key_sources: Vec<KeySource>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    api_version: Option<String>,
}

impl PaymentsConfigBuilder {
    /// Creates a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a credential source to the chain.
    pub fn key_source(mut self, source: KeySource) -> Self {
        self.key_sources.push(source);
        self
    }

    /// Replaces the credential source chain.
    pub fn key_sources(mut self, sources: Vec<KeySource>) -> Self {
        self.key_sources = sources;
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the API version header value.
    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> PaymentsResult<PaymentsConfig> {
        let key_sources = if self.key_sources.is_empty() {
            DEFAULT_KEY_SOURCES.iter().map(|&name| KeySource::env(name)).collect()
        } else {
            self.key_sources
        };

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        if !base_url.starts_with("https://") {
            return Err(PaymentsError::configuration("Base URL must use HTTPS"));
        }

        // Catches malformed hosts before they reach the HTTP layer.
        url::Url::parse(&base_url)?;

        Ok(PaymentsConfig {
            key_sources,
            base_url,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            api_version: self
                .api_version
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
        })
    }
}
