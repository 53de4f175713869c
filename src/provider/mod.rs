//! Lazy, memoized client provider.
//!
//! [`LazyClientProvider`] defers client construction until the first
//! [`acquire`](LazyClientProvider::acquire) and guarantees the connector
//! runs at most once per process lifetime, whatever the call volume. The
//! memoized slot is an async once-cell, so concurrent callers that arrive
//! while construction is in flight await the same initialization instead
//! of racing to build their own client.
//!
//! Resolution outcomes are all memoized permanently:
//!
//! - a resolved credential that connects yields `Ok(Some(handle))`
//! - no source in the chain yielding a value gives `Ok(None)`, logged
//!   once; callers treat this as "payments unavailable" and degrade
//! - a connector rejection is stored and cloned to every later caller
//!
//! Missing configuration is deliberately not an error: a deployment
//! without a key runs the rest of the application unharmed.

use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::client::{ClientConnector, StripeConnector};
use crate::config::{resolve_key, KeySource, PaymentsConfig};
use crate::errors::PaymentsResult;

/// Lazily constructs and memoizes a client handle.
///
/// # Example
///
/// ```rust,no_run
/// use payments_client::LazyClientProvider;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let provider = LazyClientProvider::from_env()?;
///
///     match provider.acquire().await? {
///         Some(client) => println!("payments ready ({})", client.key_hint()),
///         None => println!("payments unavailable: no key configured"),
///     }
///     Ok(())
/// }
/// ```
pub struct LazyClientProvider<C: ClientConnector> {
    connector: C,
    sources: Vec<KeySource>,
    slot: OnceCell<PaymentsResult<Option<Arc<C::Handle>>>>,
}

impl LazyClientProvider<StripeConnector> {
    /// Creates a provider over the default environment source chain.
    pub fn from_env() -> PaymentsResult<Self> {
        Ok(Self::new(PaymentsConfig::builder().build()?))
    }

    /// Creates a provider from a configuration.
    pub fn new(config: PaymentsConfig) -> Self {
        let sources = config.key_sources.clone();
        Self::with_connector(StripeConnector::new(config), sources)
    }
}

impl<C: ClientConnector> LazyClientProvider<C> {
    /// Creates a provider from an explicit connector and source chain.
    pub fn with_connector(connector: C, sources: Vec<KeySource>) -> Self {
        Self {
            connector,
            sources,
            slot: OnceCell::new(),
        }
    }

    /// Returns the memoized client handle, constructing it on first call.
    ///
    /// `Ok(None)` means no credential source yielded a value; that outcome
    /// is permanent for the lifetime of the provider and the diagnostic is
    /// emitted only on the call that discovers it. A connector failure is
    /// memoized the same way and returned to every subsequent caller.
    pub async fn acquire(&self) -> PaymentsResult<Option<Arc<C::Handle>>> {
        self.slot.get_or_init(|| self.initialize()).await.clone()
    }

    /// Returns true once the slot has been filled (any outcome).
    pub fn initialized(&self) -> bool {
        self.slot.initialized()
    }

    async fn initialize(&self) -> PaymentsResult<Option<Arc<C::Handle>>> {
        let Some((source_name, key)) = resolve_key(&self.sources) else {
            let names: Vec<&str> = self.sources.iter().map(KeySource::name).collect();
            tracing::error!(
                sources = ?names,
                "payments secret key missing; client disabled for process lifetime"
            );
            return Ok(None);
        };

        tracing::debug!(
            source = %source_name,
            key_hint = %key.key_hint(),
            "constructing payments client"
        );

        let handle = self.connector.connect(&key).await?;
        Ok(Some(Arc::new(handle)))
    }
}

impl<C: ClientConnector> std::fmt::Debug for LazyClientProvider<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyClientProvider")
            .field("sources", &self.sources)
            .field("initialized", &self.initialized())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use crate::errors::PaymentsError;
    use crate::mocks::MockConnector;

    fn two_sources(primary: &str, fallback: &str) -> Vec<KeySource> {
        vec![
            KeySource::fixed("PRIMARY_KEY", primary),
            KeySource::fixed("FALLBACK_KEY", fallback),
        ]
    }

    #[tokio::test]
    async fn test_sequential_calls_construct_once() {
        let provider = LazyClientProvider::with_connector(
            MockConnector::new(),
            two_sources("sk_test_12345", ""),
        );

        let first = provider.acquire().await.unwrap().unwrap();
        let second = provider.acquire().await.unwrap().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(provider.connector.connect_count(), 1);
    }

    #[tokio::test]
    async fn test_fallback_chain_skips_empty_source() {
        let provider =
            LazyClientProvider::with_connector(MockConnector::new(), two_sources("", "sk_test_123"));

        let handle = provider.acquire().await.unwrap().unwrap();

        assert_eq!(handle.secret, "sk_test_123");
        assert_eq!(provider.connector.credentials(), vec!["sk_test_123"]);
    }

    #[tokio::test]
    async fn test_live_fallback_key_scenario() {
        let provider =
            LazyClientProvider::with_connector(MockConnector::new(), two_sources("", "pk_live_abc"));

        let handle = provider.acquire().await.unwrap().unwrap();

        assert_eq!(handle.secret, "pk_live_abc");
    }

    #[tokio::test]
    async fn test_missing_key_degrades_to_none_permanently() {
        let provider = LazyClientProvider::with_connector(MockConnector::new(), two_sources("", ""));

        assert!(provider.acquire().await.unwrap().is_none());
        assert!(provider.acquire().await.unwrap().is_none());
        assert_eq!(provider.connector.connect_count(), 0);
        assert!(provider.initialized());
    }

    #[tokio::test]
    async fn test_interleaved_calls_share_one_construction() {
        let provider = LazyClientProvider::with_connector(
            MockConnector::new().with_delay(Duration::from_millis(50)),
            two_sources("sk_test_12345", ""),
        );

        // Both futures start before the first resolves.
        let (first, second) = tokio::join!(provider.acquire(), provider.acquire());

        let first = first.unwrap().unwrap();
        let second = second.unwrap().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(provider.connector.connect_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_construction_is_memoized() {
        let provider = LazyClientProvider::with_connector(
            MockConnector::new()
                .failing(PaymentsError::credential("malformed key", Some("...2345".into()))),
            two_sources("sk_test_12345", ""),
        );

        let first = provider.acquire().await;
        let second = provider.acquire().await;

        assert!(matches!(first, Err(PaymentsError::Credential { .. })));
        assert!(matches!(second, Err(PaymentsError::Credential { .. })));
        assert_eq!(provider.connector.connect_count(), 1);
    }

    #[tokio::test]
    async fn test_multibyte_key_is_rejected_not_panicked() {
        // A key whose tail is multibyte passes the prefix check but is
        // rejected as a header value; the rejection must surface as a
        // credential error from acquire(), never a panic.
        let config = PaymentsConfig::builder()
            .key_sources(vec![KeySource::fixed("PRIMARY_KEY", "sk_test_日本語")])
            .build()
            .unwrap();
        let provider = LazyClientProvider::new(config);

        let result = provider.acquire().await;

        assert!(matches!(result, Err(PaymentsError::Credential { .. })));
    }

    #[tokio::test]
    async fn test_env_source_chain() {
        // Unique names so parallel tests cannot interfere.
        std::env::set_var("PAYMENTS_PROVIDER_TEST_FALLBACK_7321", "sk_test_env");

        let provider = LazyClientProvider::with_connector(
            MockConnector::new(),
            vec![
                KeySource::env("PAYMENTS_PROVIDER_TEST_PRIMARY_7321"),
                KeySource::env("PAYMENTS_PROVIDER_TEST_FALLBACK_7321"),
            ],
        );

        let handle = provider.acquire().await.unwrap().unwrap();
        assert_eq!(handle.secret, "sk_test_env");

        std::env::remove_var("PAYMENTS_PROVIDER_TEST_FALLBACK_7321");
    }

    /// Collects formatted log output into a shared buffer.
    #[derive(Clone, Default)]
    struct CaptureWriter(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl CaptureWriter {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl std::io::Write for CaptureWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CaptureWriter {
        type Writer = CaptureWriter;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test]
    async fn test_missing_key_diagnostic_emitted_once() {
        let writer = CaptureWriter::default();
        let _guard = tracing::subscriber::set_default(
            tracing_subscriber::fmt()
                .with_writer(writer.clone())
                .with_ansi(false)
                .finish(),
        );

        let provider = LazyClientProvider::with_connector(MockConnector::new(), two_sources("", ""));

        assert!(provider.acquire().await.unwrap().is_none());
        // Slot is filled; the second call returns without re-resolving.
        assert!(provider.initialized());
        assert!(provider.acquire().await.unwrap().is_none());

        let output = writer.contents();
        let missing_lines = output.lines().filter(|l| l.contains("missing")).count();
        assert_eq!(missing_lines, 1, "diagnostic must be logged exactly once");
    }
}
