//! Dispatch API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the dispatch API router.
///
/// CORS is permissive: the browser frontend is served from another origin
/// and no credentials travel through this API.
pub fn dispatch_api_router(core: Arc<CoreState>) -> Router {
    let ctx = ApiContext::new(core);

    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/scheduling/release", post(endpoints::scheduling::release))
        .route("/scheduling/queue", get(endpoints::scheduling::queue))
        .route(
            "/receivables/payment-request",
            post(endpoints::receivables::request_payment),
        )
        .route("/receivables/queue", get(endpoints::receivables::queue))
        .route("/notifications", get(endpoints::notifications::list))
        .with_state(ctx);

    Router::new()
        .nest("/api", api)
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::config::AppConfig;
    use crate::dispatch::{
        DispatchError, DispatchExecutor, DispatchOutcome, Dispatchable, NotificationFeed,
        QueueConfig, SequentialDispatchQueue, ServerAck, WorkflowKind,
    };
    use crate::models::appointment::tests::sample_appointment;
    use crate::models::receivable::tests::sample_payment_request;
    use crate::models::{ReceivableStatus, SchedulingStatus};

    /// Records dispatched entity ids and acknowledges immediately.
    struct RecordingExecutor {
        sent: Arc<Mutex<Vec<String>>>,
    }

    impl<P: Dispatchable> DispatchExecutor<P> for RecordingExecutor {
        async fn execute(&self, payload: &P) -> Result<DispatchOutcome, DispatchError> {
            self.sent.lock().unwrap().push(payload.entity_id());
            Ok(DispatchOutcome::synced(ServerAck(
                serde_json::json!({"message": "recebido"}),
            )))
        }
    }

    struct Harness {
        core: Arc<CoreState>,
        sent: Arc<Mutex<Vec<String>>>,
    }

    fn harness(configured: bool) -> Harness {
        let pairs: Vec<(&str, &str)> = if configured {
            vec![
                ("CLINIC_SCHEDULING_WEBHOOK_URL", "http://hooks.test/liberar"),
                ("CLINIC_RECEIVABLE_WEBHOOK_URL", "http://hooks.test/pagamento"),
            ]
        } else {
            Vec::new()
        };
        let config = AppConfig::from_lookup(|key| {
            pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| v.to_string())
        })
        .unwrap();

        let sent = Arc::new(Mutex::new(Vec::new()));
        let feed = Arc::new(NotificationFeed::new());
        let scheduling = SequentialDispatchQueue::spawn(
            RecordingExecutor { sent: sent.clone() },
            feed.clone(),
            QueueConfig::new(WorkflowKind::SchedulingRelease),
        );
        let receivables = SequentialDispatchQueue::spawn(
            RecordingExecutor { sent: sent.clone() },
            feed.clone(),
            QueueConfig::new(WorkflowKind::ReceivablePayment),
        );

        Harness {
            core: Arc::new(CoreState::from_parts(config, feed, scheduling, receivables)),
            sent,
        }
    }

    fn post_json(uri: &str, body: &impl serde::Serialize) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_of(response: axum::response::Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn health_reports_configuration() {
        let h = harness(true);
        let app = dispatch_api_router(h.core.clone());

        let response = app.oneshot(get("/api/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_of(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["scheduling_configured"], true);
        assert_eq!(json["receivables_configured"], true);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let h = harness(true);
        let app = dispatch_api_router(h.core.clone());
        let response = app.oneshot(get("/api/nope")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn release_queues_fresh_appointment() {
        let h = harness(true);
        let app = dispatch_api_router(h.core.clone());
        let appt = sample_appointment("ag-1", SchedulingStatus::Confirmed);

        let response = app
            .oneshot(post_json("/api/scheduling/release", &appt))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let json = json_of(response).await;
        assert_eq!(json["entity_id"], "ag-1");
        assert_eq!(json["decision"], "queued");
        assert_eq!(json["queue"]["pending"][0], "ag-1");
        assert!(h.core.scheduling.is_in_flight("ag-1"));
    }

    #[tokio::test]
    async fn release_of_requested_appointment_needs_confirmation() {
        let h = harness(true);
        let appt = sample_appointment("ag-2", SchedulingStatus::Requested);

        let response = dispatch_api_router(h.core.clone())
            .oneshot(post_json("/api/scheduling/release", &appt))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let json = json_of(response).await;
        assert_eq!(json["error"]["code"], "RESEND_CONFIRMATION_REQUIRED");
        assert!(!h.core.scheduling.is_in_flight("ag-2"));

        let response = dispatch_api_router(h.core.clone())
            .oneshot(post_json("/api/scheduling/release?confirm_resend=true", &appt))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let json = json_of(response).await;
        assert_eq!(json["decision"], "resend_queued");
    }

    #[tokio::test]
    async fn duplicate_release_is_rejected() {
        let h = harness(true);
        let appt = sample_appointment("ag-3", SchedulingStatus::Scheduled);

        let first = dispatch_api_router(h.core.clone())
            .oneshot(post_json("/api/scheduling/release", &appt))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::ACCEPTED);

        let second = dispatch_api_router(h.core.clone())
            .oneshot(post_json("/api/scheduling/release", &appt))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);
        assert_eq!(json_of(second).await["error"]["code"], "ALREADY_QUEUED");
        assert_eq!(h.core.scheduling.pending_len(), 1);
    }

    #[tokio::test]
    async fn unconfigured_webhook_rejects_before_queueing() {
        let h = harness(false);
        let req = sample_payment_request("cr-1", ReceivableStatus::Pending);

        let response = dispatch_api_router(h.core.clone())
            .oneshot(post_json("/api/receivables/payment-request", &req))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json_of(response).await["error"]["code"], "WEBHOOK_NOT_CONFIGURED");
        assert_eq!(h.core.receivables.pending_len(), 0);
    }

    #[tokio::test]
    async fn payment_request_rejects_non_positive_amount() {
        let h = harness(true);
        let mut req = sample_payment_request("cr-2", ReceivableStatus::Pending);
        req.receivable.amount = 0.0;

        let response = dispatch_api_router(h.core.clone())
            .oneshot(post_json("/api/receivables/payment-request", &req))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn release_accepts_status_outside_known_set() {
        let h = harness(true);
        let body = serde_json::json!({
            "id": "ag-7",
            "patient": {"id": "p-1", "name": "Ana"},
            "date": "2026-05-02",
            "status": "PENDENTE",
            "sala": "2"
        });

        let response = dispatch_api_router(h.core.clone())
            .oneshot(post_json("/api/scheduling/release", &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(json_of(response).await["decision"], "queued");
        assert!(h.core.scheduling.is_in_flight("ag-7"));
    }

    #[tokio::test]
    async fn malformed_body_is_client_error() {
        let h = harness(true);
        let request = Request::builder()
            .method("POST")
            .uri("/api/scheduling/release")
            .header("Content-Type", "application/json")
            .body(Body::from(r#"{"id": "x"}"#))
            .unwrap();

        let response = dispatch_api_router(h.core.clone()).oneshot(request).await.unwrap();
        assert!(response.status().is_client_error());
        assert_eq!(h.core.scheduling.pending_len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn payment_request_is_dispatched_and_reported() {
        let h = harness(true);
        let req = sample_payment_request("cr-3", ReceivableStatus::Pending);

        let response = dispatch_api_router(h.core.clone())
            .oneshot(post_json("/api/receivables/payment-request", &req))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(h.sent.lock().unwrap().as_slice(), &["cr-3".to_string()]);

        let response = dispatch_api_router(h.core.clone())
            .oneshot(get("/api/receivables/queue"))
            .await
            .unwrap();
        let snapshot = json_of(response).await;
        assert_eq!(snapshot["workflow"], "receivable_payment");
        assert_eq!(snapshot["pending"].as_array().unwrap().len(), 0);

        let response = dispatch_api_router(h.core.clone())
            .oneshot(get("/api/notifications?after=0"))
            .await
            .unwrap();
        let feed = json_of(response).await;
        let entries = feed["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["level"], "info");
        assert_eq!(entries[1]["level"], "success");
        assert_eq!(entries[1]["entity_label"], "Maria Souza");
        assert!(entries[1]["message"].as_str().unwrap().contains("recebido"));
        assert_eq!(feed["last_seq"], 2);

        let response = dispatch_api_router(h.core.clone())
            .oneshot(get("/api/notifications?after=2"))
            .await
            .unwrap();
        assert!(json_of(response).await["entries"].as_array().unwrap().is_empty());
    }
}
