//! Notifier that writes every notification to the log.
//!
//! Stands in for the storefront's multi-channel dispatcher when the service
//! runs on its own. Message bodies are logged at debug only since they may
//! carry customer details.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::order::UserId;
use crate::domain::ports::{Notification, Notifier, NotifierError};

/// Notifier that emits each notification as a log event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(
        &self,
        user_id: &UserId,
        notification: &Notification,
    ) -> Result<(), NotifierError> {
        info!(
            user_id = %user_id,
            kind = ?notification.kind,
            title = %notification.title,
            "customer notification"
        );
        debug!(user_id = %user_id, message = %notification.message, data = %notification.data);
        Ok(())
    }

    async fn notify_admins(&self, notification: &Notification) -> Result<(), NotifierError> {
        info!(
            kind = ?notification.kind,
            title = %notification.title,
            "operator notification"
        );
        debug!(message = %notification.message, data = %notification.data);
        Ok(())
    }
}
