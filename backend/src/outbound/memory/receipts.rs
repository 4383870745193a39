//! In-memory [`WebhookReceiptStore`].

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{WebhookEventKey, WebhookReceiptStore, WebhookReceiptStoreError};

/// Set of processed webhook event keys.
#[derive(Debug, Default)]
pub struct InMemoryWebhookReceipts {
    seen: Mutex<HashSet<WebhookEventKey>>,
}

impl InMemoryWebhookReceipts {
    /// Empty receipt set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct events recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether no event has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl WebhookReceiptStore for InMemoryWebhookReceipts {
    async fn record_if_new(&self, key: &WebhookEventKey) -> Result<bool, WebhookReceiptStoreError> {
        Ok(self
            .seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn only_the_first_record_is_new() {
        let receipts = InMemoryWebhookReceipts::new();
        let key = WebhookEventKey::new("abc");
        assert!(receipts.record_if_new(&key).await.expect("record"));
        assert!(!receipts.record_if_new(&key).await.expect("record"));
        assert_eq!(receipts.len(), 1);
    }
}
