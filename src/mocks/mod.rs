//! Mock implementations for testing.
//!
//! Provides a connector that records, delays, or fails construction so
//! provider behavior can be tested without the real payments service.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::auth::SecretKey;
use crate::client::ClientConnector;
use crate::errors::{PaymentsError, PaymentsResult};

/// A handle produced by [`MockConnector`], carrying the credential it was
/// built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockHandle {
    /// The raw credential the connector received.
    pub secret: String,
}

/// Mock connector for testing.
pub struct MockConnector {
    calls: Mutex<Vec<String>>,
    delay: Option<Duration>,
    fail_with: Option<PaymentsError>,
}

impl MockConnector {
    /// Creates a connector that succeeds immediately.
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            delay: None,
            fail_with: None,
        }
    }

    /// Holds each construction open for `delay` before resolving.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Makes every construction attempt fail with `error`.
    pub fn failing(mut self, error: PaymentsError) -> Self {
        self.fail_with = Some(error);
        self
    }

    /// Returns how many times `connect` was invoked.
    pub fn connect_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns the credentials `connect` was invoked with, in order.
    pub fn credentials(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClientConnector for MockConnector {
    type Handle = MockHandle;

    async fn connect(&self, secret: &SecretKey) -> PaymentsResult<MockHandle> {
        let raw = secret.expose().to_string();
        self.calls.lock().unwrap().push(raw.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = &self.fail_with {
            return Err(error.clone());
        }

        Ok(MockHandle { secret: raw })
    }
}

impl std::fmt::Debug for MockConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockConnector")
            .field("connect_count", &self.connect_count())
            .finish()
    }
}
