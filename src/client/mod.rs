//! Payments client handle and connector.
//!
//! [`PaymentsClient`] is the opaque, ready-to-use handle produced by the
//! provider. [`ClientConnector`] is the construction seam: the default
//! [`StripeConnector`] validates the key shape and builds an HTTP client
//! with credentials pre-applied, while tests substitute counting or
//! failing connectors.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};

use crate::auth::{KeyMode, SecretKey};
use crate::config::PaymentsConfig;
use crate::errors::{PaymentsError, PaymentsResult};

/// Constructor for a client handle.
///
/// Implementations take a resolved credential and produce a handle, or
/// reject the credential. The provider guarantees `connect` is invoked at
/// most once per process lifetime.
#[async_trait]
pub trait ClientConnector: Send + Sync {
    /// The handle type this connector produces.
    type Handle: Send + Sync + 'static;

    /// Constructs a client handle from the resolved secret key.
    async fn connect(&self, secret: &SecretKey) -> PaymentsResult<Self::Handle>;
}

/// A ready-to-use handle to the payments service.
///
/// Holds an HTTP client with bearer auth and API-version headers already
/// applied. The handle carries no payment operations itself; services are
/// layered on top of it by consumers.
pub struct PaymentsClient {
    http: reqwest::Client,
    base_url: String,
    key_hint: String,
    mode: KeyMode,
}

impl PaymentsClient {
    /// Returns the base URL requests are issued against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the credential hint (last 4 characters).
    pub fn key_hint(&self) -> &str {
        &self.key_hint
    }

    /// Returns the operating mode the handle was constructed in.
    pub fn mode(&self) -> KeyMode {
        self.mode
    }

    /// Returns true if the handle moves real money.
    pub fn is_live(&self) -> bool {
        self.mode == KeyMode::Live
    }

    /// Returns the underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }
}

impl std::fmt::Debug for PaymentsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentsClient")
            .field("base_url", &self.base_url)
            .field("key_hint", &self.key_hint)
            .field("mode", &self.mode)
            .finish()
    }
}

/// Default connector for the payments service.
pub struct StripeConnector {
    config: PaymentsConfig,
}

impl StripeConnector {
    /// Creates a connector from a configuration.
    pub fn new(config: PaymentsConfig) -> Self {
        Self { config }
    }
}

impl std::fmt::Debug for StripeConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConnector")
            .field("config", &self.config)
            .finish()
    }
}

#[async_trait]
impl ClientConnector for StripeConnector {
    type Handle = PaymentsClient;

    async fn connect(&self, secret: &SecretKey) -> PaymentsResult<PaymentsClient> {
        secret.validate()?;

        let mut headers = HeaderMap::new();

        let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", secret.expose()))
            .map_err(|_| {
                PaymentsError::credential(
                    "secret key contains characters not valid in a header",
                    Some(secret.key_hint()),
                )
            })?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        headers.insert(
            HeaderName::from_static("stripe-version"),
            HeaderValue::from_str(&self.config.api_version).map_err(|_| {
                PaymentsError::configuration("API version is not a valid header value")
            })?,
        );

        let http = reqwest::Client::builder()
            .timeout(self.config.timeout)
            .default_headers(headers)
            .build()?;

        tracing::debug!(
            base_url = %self.config.base_url,
            key_hint = %secret.key_hint(),
            mode = ?secret.mode(),
            "payments client constructed"
        );

        Ok(PaymentsClient {
            http,
            base_url: self.config.base_url.clone(),
            key_hint: secret.key_hint(),
            mode: secret.mode(),
        })
    }
}
