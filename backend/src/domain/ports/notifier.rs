//! Driven port for the multi-channel notification dispatcher.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::domain::order::UserId;

use super::define_port_error;

/// Notification category understood by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Delivery progress for a customer or operator.
    Shipping,
    /// Something needs an operator's follow-up.
    Alert,
}

/// One message handed to the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    /// Category used for routing.
    pub kind: NotificationKind,
    /// Short headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Structured payload (order id, tracking, status).
    pub data: Value,
}

define_port_error! {
    /// Errors raised by notifier adapters.
    pub enum NotifierError {
        /// The dispatcher refused or failed to queue the message.
        Dispatch { message: String } => "notification dispatch failed: {message}",
    }
}

/// Port for sending customer and operator notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Notify one customer.
    async fn notify(&self, user_id: &UserId, notification: &Notification)
    -> Result<(), NotifierError>;

    /// Notify every operator.
    async fn notify_admins(&self, notification: &Notification) -> Result<(), NotifierError>;
}
