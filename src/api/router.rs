//! Intake API router.
//!
//! One create endpoint per document kind, mirroring the downstream ledger
//! module's surface, plus a ping. The pipeline is synchronous (blocking
//! oracle and ledger calls), so handlers run it under `spawn_blocking`.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Map, Value};

use crate::models::DocumentKind;
use crate::pipeline::IntakeError;
use crate::service::IntakeService;

use super::error::ApiError;
use super::types::{ApiContext, CreateRequest, Envelope};

pub fn intake_router(service: Arc<IntakeService>) -> Router {
    let ctx = ApiContext { service };
    Router::new()
        .route("/api/ping", get(ping))
        .route("/api/invoice/create", post(create_invoice))
        .route("/api/po/create", post(create_purchase_order))
        .route("/api/so/create", post(create_sales_order))
        .with_state(ctx)
}

async fn ping() -> Json<Envelope> {
    Json(Envelope::ok("API OK", Map::new()))
}

async fn create_invoice(
    State(ctx): State<ApiContext>,
    Json(req): Json<CreateRequest>,
) -> Result<(StatusCode, Json<Envelope>), ApiError> {
    create_document(ctx, DocumentKind::Invoice, req).await
}

async fn create_purchase_order(
    State(ctx): State<ApiContext>,
    Json(req): Json<CreateRequest>,
) -> Result<(StatusCode, Json<Envelope>), ApiError> {
    create_document(ctx, DocumentKind::PurchaseOrder, req).await
}

async fn create_sales_order(
    State(ctx): State<ApiContext>,
    Json(req): Json<CreateRequest>,
) -> Result<(StatusCode, Json<Envelope>), ApiError> {
    create_document(ctx, DocumentKind::SalesOrder, req).await
}

async fn create_document(
    ctx: ApiContext,
    kind: DocumentKind,
    req: CreateRequest,
) -> Result<(StatusCode, Json<Envelope>), ApiError> {
    let service = ctx.service.clone();
    let created = tokio::task::spawn_blocking(move || service.process(kind, &req.text))
        .await
        .map_err(|e| IntakeError::Assembly(format!("pipeline task failed: {e}")))??;

    let mut data = Map::new();
    data.insert("id".into(), Value::from(created.id));
    data.insert("name".into(), Value::from(created.name));

    let message = match kind {
        DocumentKind::Invoice => "Invoice created",
        DocumentKind::PurchaseOrder => "Purchase order created",
        DocumentKind::SalesOrder => "Sales order created",
    };
    Ok((StatusCode::CREATED, Json(Envelope::ok(message, data))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MemoryLedger;
    use crate::pipeline::extraction::{ExtractionClient, MockOracleClient};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn router_with(completion: &str, ledger: MemoryLedger) -> Router {
        let extraction =
            ExtractionClient::new(Box::new(MockOracleClient::new(completion)), "test-model");
        let service = Arc::new(IntakeService::new(extraction, Arc::new(ledger)));
        intake_router(service)
    }

    async fn post_json(router: Router, uri: &str, body: &str) -> (StatusCode, Envelope) {
        let request = axum::http::Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(axum::body::Body::from(body.to_string()))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let envelope = serde_json::from_slice(&bytes).unwrap();
        (status, envelope)
    }

    #[tokio::test]
    async fn ping_responds_ok() {
        let router = router_with("unused", MemoryLedger::new());
        let request = axum::http::Request::builder()
            .uri("/api/ping")
            .body(axum::body::Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn invoice_create_returns_created_envelope() {
        let completion = r#"{"client": "Acme", "invoice_number": "INV-1",
            "lines": [{"name": "Widget", "quantity": "2", "unit_price": "10,50"}]}"#;
        let router = router_with(completion, MemoryLedger::new().with_partner("Acme"));

        let (status, envelope) = post_json(
            router,
            "/api/invoice/create",
            r#"{"text": "FACTURE INV-1 ..."}"#,
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert!(envelope.success);
        assert!(envelope.data.contains_key("id"));
        assert!(envelope.data.contains_key("name"));
    }

    #[tokio::test]
    async fn missing_counterparty_maps_to_bad_request() {
        let completion = r#"{"invoice_number": "INV-1"}"#;
        let router = router_with(completion, MemoryLedger::new().with_partner("Acme"));

        let (status, envelope) =
            post_json(router, "/api/invoice/create", r#"{"text": "scan"}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!envelope.success);
        assert!(!envelope.message.is_empty());
    }

    #[tokio::test]
    async fn unknown_vendor_on_po_maps_to_bad_request() {
        let completion = r#"{"vendor": "Nobody", "po_number": "PO-1", "lines": []}"#;
        let router = router_with(completion, MemoryLedger::new());

        let (status, envelope) =
            post_json(router, "/api/po/create", r#"{"text": "scan"}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(envelope.message.contains("Nobody"));
    }
}
