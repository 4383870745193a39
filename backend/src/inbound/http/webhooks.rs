//! Carrier webhook receiver.
//!
//! ```text
//! POST /api/v1/webhooks/carrier
//! ```
//!
//! The body is taken as raw bytes so the signature covers exactly what the
//! carrier sent.

use actix_web::{HttpRequest, post, web};

use crate::domain::reconciliation::{ReconcileOutcome, SIGNATURE_HEADER};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, ReconcileOutcomeSchema};
use crate::inbound::http::state::HttpState;

/// Receive a parcel status event from the carrier.
#[utoipa::path(
    post,
    path = "/api/v1/webhooks/carrier",
    tags = ["webhooks"],
    request_body(content = String, content_type = "application/json"),
    params(
        ("X-Webhook-Signature" = Option<String>, Header,
            description = "Hex HMAC-SHA256 of the raw body, optionally prefixed `sha256=`")
    ),
    responses(
        (status = 200, description = "Event processed", body = ReconcileOutcomeSchema),
        (status = 400, description = "Body is not a webhook payload", body = ErrorSchema),
        (status = 401, description = "Signature refused", body = ErrorSchema),
        (status = 503, description = "Order store unavailable", body = ErrorSchema)
    )
)]
#[post("/webhooks/carrier")]
pub async fn receive_carrier_webhook(
    state: web::Data<HttpState>,
    request: HttpRequest,
    body: web::Bytes,
) -> ApiResult<web::Json<ReconcileOutcome>> {
    let signature = request
        .headers()
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());
    let outcome = state.reconciler.receive(&body, signature).await?;
    Ok(web::Json(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::{Value, json};
    use zeroize::Zeroizing;

    use crate::domain::order::{CodStatus, Order, OrderId, OrderStatus, PaymentMethod};
    use crate::domain::parcel::TrackingNumber;
    use crate::domain::reconciliation::WebhookVerifier;
    use crate::inbound::http::test_utils::{TEST_WEBHOOK_SECRET, offline_state_with};
    use crate::outbound::memory::InMemoryOrderStore;

    fn shipped_store() -> Arc<InMemoryOrderStore> {
        let mut order = Order::new(
            OrderId::new("ord-9"),
            None,
            PaymentMethod::CashOnDelivery,
        );
        order.tracking_number = Some(TrackingNumber::new("YAL-9"));
        order.cod_status = Some(CodStatus::Submitted);
        order.status = OrderStatus::Confirmed;
        Arc::new(InMemoryOrderStore::with_orders([order]))
    }

    fn signature(body: &[u8]) -> String {
        WebhookVerifier::new(Some(Zeroizing::new(TEST_WEBHOOK_SECRET.to_owned())))
            .sign(body)
            .expect("secret configured")
    }

    fn delivered_body() -> Vec<u8> {
        serde_json::to_vec(&json!({
            "event": "parcel.delivered",
            "parcel": { "trackingNumber": "YAL-9" },
            "timestamp": "2025-03-01T09:30:00Z"
        }))
        .expect("static JSON")
    }

    #[actix_web::test]
    async fn signed_delivery_marks_order_delivered() {
        let store = shipped_store();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(offline_state_with(Arc::clone(&store))))
                .service(web::scope("/api/v1").service(receive_carrier_webhook)),
        )
        .await;
        let body = delivered_body();

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/webhooks/carrier")
                .insert_header((SIGNATURE_HEADER, format!("sha256={}", signature(&body))))
                .set_payload(body)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let outcome: Value = test::read_body_json(res).await;
        assert_eq!(outcome["outcome"], "applied");
        assert_eq!(outcome["state"], "DELIVERED");

        let order = store.get(&OrderId::new("ord-9")).expect("order kept");
        assert_eq!(order.status, OrderStatus::Delivered);
        assert!(order.delivered_at.is_some());
    }

    #[rstest]
    #[case::wrong_signature(Some("deadbeef"))]
    #[case::missing_signature(None)]
    #[actix_rt::test]
    async fn unsigned_or_forged_events_are_refused(#[case] header: Option<&str>) {
        let store = shipped_store();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(offline_state_with(Arc::clone(&store))))
                .service(web::scope("/api/v1").service(receive_carrier_webhook)),
        )
        .await;
        let mut request = test::TestRequest::post()
            .uri("/api/v1/webhooks/carrier")
            .set_payload(delivered_body());
        if let Some(value) = header {
            request = request.insert_header((SIGNATURE_HEADER, value));
        }

        let res = test::call_service(&app, request.to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let order = store.get(&OrderId::new("ord-9")).expect("order kept");
        assert_eq!(order.cod_status, Some(CodStatus::Submitted));
    }
}
