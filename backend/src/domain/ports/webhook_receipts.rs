//! Driven port recording which carrier webhook events were already handled.
//!
//! Carriers deliver at least once; the reconciler consults this store before
//! fanning out notifications so a replayed event does not message twice.

use async_trait::async_trait;

use super::define_port_error;

/// Deterministic identity of one webhook event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WebhookEventKey(String);

impl WebhookEventKey {
    /// Wrap a precomputed key.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the raw key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

define_port_error! {
    /// Errors raised by receipt store adapters.
    pub enum WebhookReceiptStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "webhook receipt store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "webhook receipt store query failed: {message}",
    }
}

/// Port for webhook idempotency records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebhookReceiptStore: Send + Sync {
    /// Record the key; returns `false` when it had already been recorded.
    async fn record_if_new(&self, key: &WebhookEventKey) -> Result<bool, WebhookReceiptStoreError>;
}
