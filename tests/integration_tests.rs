use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::{get, patch, post};
use axum::Router;
use tower::ServiceExt;

use scoopo::client::{BookingApi, BookingForm, SubmitStatus};
use scoopo::config::AppConfig;
use scoopo::handlers;
use scoopo::models::Language;
use scoopo::services::email::EmailProvider;
use scoopo::state::AppState;
use scoopo::storage::MemoryStore;

// ── Mock Providers ──

#[derive(Clone)]
struct SentEmail {
    to: String,
    subject: String,
    body: String,
}

struct MockMailer {
    sent: Arc<Mutex<Vec<SentEmail>>>,
    fail_for: Option<String>,
}

impl MockMailer {
    fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(vec![])),
            fail_for: None,
        }
    }

    fn failing_for(recipient: &str) -> Self {
        Self {
            sent: Arc::new(Mutex::new(vec![])),
            fail_for: Some(recipient.to_string()),
        }
    }
}

#[async_trait]
impl EmailProvider for MockMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        if self.fail_for.as_deref() == Some(to) {
            anyhow::bail!("simulated delivery failure to {to}");
        }
        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

// ── Helpers ──

fn test_config() -> AppConfig {
    AppConfig {
        port: 8080,
        database_url: None,
        admin_token: "test-token".to_string(),
        cors_origin: "http://localhost:3000".to_string(),
        resend_api_key: "".to_string(),
        from_email: "ScooPo <info@example.com>".to_string(),
        owner_email: "owner@example.com".to_string(),
    }
}

fn test_state_with(mailer: MockMailer) -> (Arc<AppState>, Arc<Mutex<Vec<SentEmail>>>) {
    let sent = Arc::clone(&mailer.sent);
    let state = Arc::new(AppState {
        config: test_config(),
        store: Box::new(MemoryStore::new()),
        mailer: Box::new(mailer),
    });
    (state, sent)
}

fn test_state() -> (Arc<AppState>, Arc<Mutex<Vec<SentEmail>>>) {
    test_state_with(MockMailer::new())
}

fn test_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/api/bookings",
            post(handlers::bookings::create_booking).get(handlers::admin::list_bookings),
        )
        .route(
            "/api/bookings/:id",
            patch(handlers::admin::update_booking).delete(handlers::admin::delete_booking),
        )
        .with_state(state)
}

fn booking_json(name: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "email": format!("{name}@example.com"),
        "phone": "0400 000 000",
        "address": "123 Example St, Blackburn",
        "numCats": 3,
        "frequency": 4,
        "plan": "Essential",
        "timeOfDay": "morning",
        "notes": "side gate",
        "language": "English",
    })
}

fn post_booking(body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/bookings")
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn admin_get() -> Request<Body> {
    Request::builder()
        .uri("/api/bookings")
        .header("admin-token", "test-token")
        .body(Body::empty())
        .unwrap()
}

async fn body_json(res: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn admin_list(state: Arc<AppState>) -> Vec<serde_json::Value> {
    let res = test_app(state).oneshot(admin_get()).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    match body_json(res).await {
        serde_json::Value::Array(items) => items,
        other => panic!("expected array, got {other}"),
    }
}

// ── Booking Submission ──

#[tokio::test]
async fn test_health() {
    let (state, _) = test_state();
    let res = test_app(state)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_booking_persists_and_notifies() {
    let (state, sent) = test_state();

    let res = test_app(state.clone())
        .oneshot(post_booking(&booking_json("jane")))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let json = body_json(res).await;
    assert_eq!(json["name"], "jane");
    assert_eq!(json["status"], "pending");
    assert_eq!(json["numCats"], 3);
    assert_eq!(json["frequency"], 4);
    assert!(!json["id"].as_str().unwrap().is_empty());

    let bookings = admin_list(state).await;
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0]["id"], json["id"]);

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 2);
    // Owner first, always in the operator's language.
    assert_eq!(sent[0].to, "owner@example.com");
    assert!(sent[0].subject.contains("新预约"));
    assert!(sent[0].body.contains("姓名：jane"));
    // Then the customer confirmation, in the customer's language, with the
    // shared-pricing weekly total: (10 + 2*5) * 0.95 * 4 = 76.
    assert_eq!(sent[1].to, "jane@example.com");
    assert!(sent[1].subject.starts_with("Booking Confirmed"));
    assert!(sent[1].body.contains("Weekly Total: $76"));
}

#[tokio::test]
async fn test_validation_failure_reports_all_fields_and_has_no_side_effects() {
    let (state, sent) = test_state();

    let res = test_app(state.clone())
        .oneshot(post_booking(&serde_json::json!({
            "address": "123 Example St",
            "numCats": 1,
            "frequency": 2,
        })))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let json = body_json(res).await;
    let fields: Vec<&str> = json["error"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "email", "phone"]);

    assert!(admin_list(state).await.is_empty());
    assert!(sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_email_only_contact_is_accepted() {
    let (state, _) = test_state();

    let mut body = booking_json("jane");
    body["phone"] = serde_json::Value::Null;
    let res = test_app(state)
        .oneshot(post_booking(&body))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_phone_only_contact_skips_customer_confirmation() {
    let (state, sent) = test_state();

    let mut body = booking_json("jane");
    body["email"] = serde_json::Value::Null;
    let res = test_app(state.clone())
        .oneshot(post_booking(&body))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "owner@example.com");
}

#[tokio::test]
async fn test_invalid_frequency_string_is_a_field_error() {
    let (state, _) = test_state();

    let mut body = booking_json("jane");
    body["frequency"] = serde_json::json!("fortnightly");
    let res = test_app(state)
        .oneshot(post_booking(&body))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let json = body_json(res).await;
    assert_eq!(json["error"][0]["field"], "frequency");
}

#[tokio::test]
async fn test_custom_frequency_round_trips() {
    let (state, sent) = test_state();

    let mut body = booking_json("jane");
    body["frequency"] = serde_json::json!("custom");
    let res = test_app(state.clone())
        .oneshot(post_booking(&body))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["frequency"], "custom");

    let sent = sent.lock().unwrap();
    assert!(sent[1].body.contains("Weekly Total: Quote (Contact Us)"));
}

// ── Notification Failure Policy ──

#[tokio::test]
async fn test_owner_notification_failure_fails_request_but_keeps_booking() {
    let (state, sent) = test_state_with(MockMailer::failing_for("owner@example.com"));

    let res = test_app(state.clone())
        .oneshot(post_booking(&booking_json("jane")))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    // The booking was persisted before the notification attempt.
    let bookings = admin_list(state).await;
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0]["name"], "jane");

    // The customer confirmation is not attempted once the owner side fails.
    assert!(sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_customer_confirmation_failure_is_swallowed() {
    let (state, sent) = test_state_with(MockMailer::failing_for("jane@example.com"));

    let res = test_app(state.clone())
        .oneshot(post_booking(&booking_json("jane")))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "owner@example.com");
}

// ── Admin API ──

#[tokio::test]
async fn test_admin_requires_token() {
    let (state, _) = test_state();

    let res = test_app(state.clone())
        .oneshot(
            Request::builder()
                .uri("/api/bookings")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = test_app(state.clone())
        .oneshot(
            Request::builder()
                .uri("/api/bookings")
                .header("admin-token", "wrong-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = test_app(state)
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/bookings/some-id")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_list_is_newest_first() {
    let (state, _) = test_state();

    for name in ["first", "second", "third"] {
        let res = test_app(state.clone())
            .oneshot(post_booking(&booking_json(name)))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    let names: Vec<String> = admin_list(state)
        .await
        .iter()
        .map(|b| b["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn test_admin_status_update() {
    let (state, _) = test_state();

    let res = test_app(state.clone())
        .oneshot(post_booking(&booking_json("jane")))
        .await
        .unwrap();
    let id = body_json(res).await["id"].as_str().unwrap().to_string();

    let res = test_app(state.clone())
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri(format!("/api/bookings/{id}"))
                .header("admin-token", "test-token")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"status":"contacted"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["ok"], true);

    let bookings = admin_list(state).await;
    assert_eq!(bookings[0]["status"], "contacted");
}

#[tokio::test]
async fn test_admin_status_update_of_missing_id_is_a_no_op_success() {
    let (state, _) = test_state();

    test_app(state.clone())
        .oneshot(post_booking(&booking_json("jane")))
        .await
        .unwrap();

    let res = test_app(state.clone())
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/api/bookings/no-such-id")
                .header("admin-token", "test-token")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"status":"contacted"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let bookings = admin_list(state).await;
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0]["status"], "pending");
}

#[tokio::test]
async fn test_admin_delete_is_idempotent() {
    let (state, _) = test_state();

    let res = test_app(state.clone())
        .oneshot(post_booking(&booking_json("jane")))
        .await
        .unwrap();
    let id = body_json(res).await["id"].as_str().unwrap().to_string();

    for uri in [format!("/api/bookings/{id}"), format!("/api/bookings/{id}")] {
        let res = test_app(state.clone())
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(uri)
                    .header("admin-token", "test-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    assert!(admin_list(state).await.is_empty());
}

// ── Submission Client ──

async fn serve(state: Arc<AppState>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, test_app(state)).await.unwrap();
    });
    format!("http://{addr}")
}

fn completed_form() -> BookingForm {
    let mut form = BookingForm::new(Language::English);
    form.set_name("Jane Doe");
    form.set_email("jane@example.com");
    form.set_address("123 Example St, Blackburn");
    form.next();
    form.set_num_cats(2);
    form.next();
    form.set_agreed_to_terms(true);
    form
}

#[tokio::test]
async fn test_form_submission_round_trip() {
    let (state, sent) = test_state();
    let api = BookingApi::new(serve(state).await);

    let mut form = completed_form();
    assert!(form.submit(&api).await);
    assert!(matches!(form.status(), SubmitStatus::Success { .. }));

    assert_eq!(sent.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_form_submission_failure_is_retryable() {
    // Owner notification failing turns the response into a 500, which the
    // client maps to a generic retryable error.
    let (state, _) = test_state_with(MockMailer::failing_for("owner@example.com"));
    let api = BookingApi::new(serve(state).await);

    let mut form = completed_form();
    assert!(!form.submit(&api).await);
    assert_eq!(form.status(), SubmitStatus::Failed);

    // Retrying is a fresh user-initiated submission.
    assert!(form.can_submit());
}
