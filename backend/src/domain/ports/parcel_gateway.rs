//! Driven port for the carrier's parcel lifecycle endpoints.
//!
//! Every expected failure (missing credentials, unreachable carrier, malformed
//! JSON, carrier refusal) is a [`ParcelGatewayError`] value; adapters never
//! panic on carrier input. The gateway performs no deduplication: callers
//! must not create twice for one order.

use async_trait::async_trait;

use crate::domain::parcel::{ParcelDraft, ParcelPatch, ParcelRecord, TrackingNumber};

use super::define_port_error;

define_port_error! {
    /// Errors raised by parcel gateway adapters.
    pub enum ParcelGatewayError {
        /// Carrier credentials are absent.
        NotConfigured => "carrier credentials are not configured",
        /// Network transport failed before a response arrived.
        Transport { message: String } => "carrier transport failed: {message}",
        /// The call exceeded its timeout.
        Timeout { message: String } => "carrier timeout: {message}",
        /// The carrier answered with JSON this client cannot interpret.
        ResponseShape { message: String, raw_body: String } =>
            "unexpected carrier response: {message}",
        /// The carrier refused the request; `message` is the carrier's text.
        Rejected { message: String } => "{message}",
        /// No parcel exists for the tracking number.
        NotFound { tracking: String } => "parcel {tracking} not found",
        /// The request was invalid before leaving the process.
        InvalidRequest { message: String } => "invalid parcel request: {message}",
    }
}

impl ParcelGatewayError {
    /// Whether the carrier could not be reached at all.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout { .. })
    }
}

/// Port for creating, amending, deleting, and reading carrier parcels.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParcelGateway: Send + Sync {
    /// Create one parcel.
    async fn create(&self, draft: &ParcelDraft) -> Result<ParcelRecord, ParcelGatewayError>;

    /// Apply a partial update.
    async fn update(
        &self,
        tracking: &TrackingNumber,
        patch: &ParcelPatch,
    ) -> Result<ParcelRecord, ParcelGatewayError>;

    /// Delete a parcel.
    async fn delete(&self, tracking: &TrackingNumber) -> Result<(), ParcelGatewayError>;

    /// Fetch the carrier's current view of a parcel.
    async fn get(&self, tracking: &TrackingNumber) -> Result<ParcelRecord, ParcelGatewayError>;
}
