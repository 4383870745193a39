//! Applies carrier webhooks to orders.

use std::sync::Arc;

use chrono::TimeDelta;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::Error;
use crate::domain::order::{CodStatus, Order, OrderUpdate};
use crate::domain::parcel::TrackingNumber;
use crate::domain::ports::{Notifier, OrderStore, WebhookReceiptStore};

use super::{
    CarrierStatus, ReconcileOutcome, SignatureError, WebhookEvent, WebhookVerifier,
    admin_notification, customer_notification,
};

/// Turns carrier webhooks into order updates and notifications.
#[derive(Clone)]
pub struct StatusReconciler {
    orders: Arc<dyn OrderStore>,
    receipts: Arc<dyn WebhookReceiptStore>,
    notifier: Arc<dyn Notifier>,
    verifier: WebhookVerifier,
    clock: Arc<dyn Clock>,
    estimated_delivery: TimeDelta,
}

impl StatusReconciler {
    /// Wire the reconciler to its ports.
    #[must_use]
    pub fn new(
        orders: Arc<dyn OrderStore>,
        receipts: Arc<dyn WebhookReceiptStore>,
        notifier: Arc<dyn Notifier>,
        verifier: WebhookVerifier,
        clock: Arc<dyn Clock>,
        estimated_delivery_days: u32,
    ) -> Self {
        Self {
            orders,
            receipts,
            notifier,
            verifier,
            clock,
            estimated_delivery: TimeDelta::days(i64::from(estimated_delivery_days)),
        }
    }

    /// Authenticate and parse a raw webhook body.
    ///
    /// A header signature covers the raw body. Without a header the payload's
    /// own `signature` field must cover [`WebhookEvent::signed_content`].
    ///
    /// # Errors
    ///
    /// `unauthorized` for any signature refusal, `invalid_request` for a body
    /// that is not a webhook payload.
    pub fn authenticate(
        &self,
        body: &[u8],
        signature_header: Option<&str>,
    ) -> Result<WebhookEvent, Error> {
        if !self.verifier.is_configured() {
            return Err(reject(SignatureError::MissingSecret));
        }
        if let Some(signature) = signature_header {
            self.verifier.verify(body, signature).map_err(reject)?;
            return parse(body);
        }

        let event = parse(body)?;
        let signature = event
            .signature
            .as_deref()
            .ok_or_else(|| reject(SignatureError::MissingSignature))?;
        self.verifier
            .verify(event.signed_content().as_bytes(), signature)
            .map_err(reject)?;
        Ok(event)
    }

    /// Authenticate, parse, and reconcile a raw webhook.
    ///
    /// # Errors
    ///
    /// See [`Self::authenticate`] and [`Self::reconcile`].
    pub async fn receive(
        &self,
        body: &[u8],
        signature_header: Option<&str>,
    ) -> Result<ReconcileOutcome, Error> {
        let event = self.authenticate(body, signature_header)?;
        self.reconcile(&event).await
    }

    /// Apply an authenticated event.
    ///
    /// # Errors
    ///
    /// Only store failures; a missing order is an outcome, not an error.
    pub async fn reconcile(&self, event: &WebhookEvent) -> Result<ReconcileOutcome, Error> {
        let tracking = &event.parcel.tracking_number;
        let carrier_status = event.carrier_status();
        if carrier_status.is_unknown() {
            warn!(
                tracking = %tracking,
                event = %event.event,
                status = %carrier_status,
                "unknown carrier status; treating as submitted"
            );
        }

        let Some(order) = self
            .orders
            .find_by_tracking_number(tracking)
            .await?
        else {
            warn!(tracking = %tracking, event = %event.event, "webhook for unknown parcel");
            return Ok(ReconcileOutcome::OrderNotFound {
                tracking: tracking.clone(),
            });
        };

        let current = order.delivery_state();
        let target = carrier_status.cod_status();
        let Some(update) = self.plan(&order, current, target) else {
            info!(
                order_id = %order.id,
                tracking = %tracking,
                current = ?current,
                ignored = ?target,
                "stale carrier event ignored"
            );
            return Ok(ReconcileOutcome::Stale {
                order_id: order.id,
                current,
                ignored: target,
            });
        };

        let updated = self
            .orders
            .update_status(&order.id, &update)
            .await?;
        info!(
            order_id = %updated.id,
            tracking = %tracking,
            event = %event.event,
            from = ?current,
            to = ?target,
            "order delivery state reconciled"
        );

        let first_delivery = self
            .receipts
            .record_if_new(&event.key())
            .await
            .map_err(|error| Error::service_unavailable(error.to_string()))?;
        if !first_delivery {
            debug!(
                order_id = %updated.id,
                tracking = %tracking,
                "duplicate webhook; skipping notifications"
            );
            return Ok(ReconcileOutcome::Duplicate {
                order_id: updated.id,
            });
        }

        self.fan_out(&carrier_status, &updated, tracking).await;
        Ok(ReconcileOutcome::Applied {
            order_id: updated.id,
            state: target,
            status: updated.status,
        })
    }

    /// Order update for a transition, or `None` when the event is stale.
    fn plan(&self, order: &Order, current: CodStatus, target: CodStatus) -> Option<OrderUpdate> {
        if current.is_terminal() && target != current {
            return None;
        }
        if target.rank() < current.rank() {
            return None;
        }

        let now = self.clock.utc();
        let mut update = OrderUpdate::transition(order, target);
        let shipped = matches!(target, CodStatus::Dispatched | CodStatus::Delivered);
        if shipped && order.shipped_at.is_none() {
            update.shipped_at = Some(now);
        }
        if target == CodStatus::Dispatched && order.estimated_delivery.is_none() {
            update.estimated_delivery = Some(now + self.estimated_delivery);
        }
        if target == CodStatus::Delivered && order.delivered_at.is_none() {
            update.delivered_at = Some(now);
        }
        Some(update)
    }

    async fn fan_out(&self, status: &CarrierStatus, order: &Order, tracking: &TrackingNumber) {
        if let Some(user_id) = &order.user_id {
            let notification = customer_notification(status, &order.id, tracking);
            if let Err(error) = self.notifier.notify(user_id, &notification).await {
                warn!(order_id = %order.id, error = %error, "customer notification failed");
            }
        }
        if let Some(notification) = admin_notification(status, &order.id, tracking) {
            if let Err(error) = self.notifier.notify_admins(&notification).await {
                warn!(order_id = %order.id, error = %error, "operator notification failed");
            }
        }
    }
}

fn reject(error: SignatureError) -> Error {
    warn!(reason = error.reason(), "webhook signature rejected");
    Error::unauthorized(error.to_string()).with_details(json!({ "reason": error.reason() }))
}

fn parse(body: &[u8]) -> Result<WebhookEvent, Error> {
    serde_json::from_slice(body)
        .map_err(|error| Error::invalid_request(format!("invalid webhook payload: {error}")))
}
