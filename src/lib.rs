//! Payments Client Library
//!
//! A lazily-initialized Rust client for a Stripe-compatible payments API.
//! The central piece is [`LazyClientProvider`]: client construction is
//! deferred until first use, happens at most once per process lifetime,
//! and a missing credential degrades to a permanent "payments
//! unavailable" state instead of an error.
//!
//! # Features
//!
//! - **Lazy Construction**: nothing is built until the first `acquire()`
//! - **Memoization**: one construction attempt, shared by all callers,
//!   including callers that arrive while construction is still in flight
//! - **Credential Fallback Chain**: ordered environment sources, first
//!   non-empty value wins
//! - **Graceful Degradation**: no configured key means `Ok(None)`, logged
//!   once, never retried
//! - **Secure Handling**: secrets are redacted from `Debug` output and
//!   never logged
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use payments_client::LazyClientProvider;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads STRIPE_SECRET_KEY, then EXPO_PUBLIC_STRIPE_SECRET_KEY.
//!     let provider = LazyClientProvider::from_env()?;
//!
//!     let Some(client) = provider.acquire().await? else {
//!         eprintln!("payments disabled: no secret key configured");
//!         return Ok(());
//!     };
//!
//!     println!("payments ready against {} ({})", client.base_url(), client.key_hint());
//!     Ok(())
//! }
//! ```
//!
//! # Custom Source Chain
//!
//! ```rust,no_run
//! use payments_client::{KeySource, LazyClientProvider, PaymentsConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PaymentsConfig::builder()
//!     .key_source(KeySource::env("PAYMENTS_KEY"))
//!     .key_source(KeySource::env("LEGACY_PAYMENTS_KEY"))
//!     .build()?;
//!
//! let provider = LazyClientProvider::new(config);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod provider;

// Re-exports for convenience
pub use auth::{KeyMode, SecretKey};
pub use client::{ClientConnector, PaymentsClient, StripeConnector};
pub use config::{KeySource, PaymentsConfig, PaymentsConfigBuilder};
pub use errors::{PaymentsError, PaymentsResult};
pub use provider::LazyClientProvider;

/// Mock implementations for testing.
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
