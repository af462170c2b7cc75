use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::{middleware, routing::get, Extension, Router};
use http_body_util::BodyExt;
use std::error::Error;
use std::sync::Arc;
use tower::ServiceExt;

use request_log_enrich::capture::CaptureSink;
use request_log_enrich::context::{
    RequestContext, CORRELATION_ID_KEY, REQUEST_METHOD_KEY, REQUEST_PATH_KEY,
    REQUEST_USER_AGENT_KEY,
};
use request_log_enrich::correlation::{CorrelationIdProvider, IdSource, FALLBACK_ID_LENGTH};
use request_log_enrich::enrich::{EnrichingSink, META_GROUP_KEY};
use request_log_enrich::init::install;
use request_log_enrich::logger::Logger;
use request_log_enrich::record::Record;
use request_log_enrich::value::{Attr, ToLogValue, Value};

#[allow(dead_code)]
struct Customer {
    user_id: String,
    email: String,
    gst_number: String,
}

impl ToLogValue for Customer {
    fn to_log_value(&self) -> Value {
        Value::group(vec![Attr::new("user_id", self.user_id.as_str())])
    }
}

#[allow(dead_code)]
struct Bank {
    branch_id: u64,
    branch_secret: String,
}

impl ToLogValue for Bank {
    fn to_log_value(&self) -> Value {
        Value::Uint(self.branch_id)
    }
}

async fn get_customer(
    Extension(logger): Extension<Logger>,
    Extension(cx): Extension<RequestContext>,
) -> &'static str {
    let customer = Customer {
        user_id: "u-1".to_string(),
        email: "ada@example.com".to_string(),
        gst_number: "29ABCDE1234F1Z5".to_string(),
    };
    let _ = logger
        .info(&cx, "logging customer data", vec![Attr::new("customer", &customer)])
        .await;
    "ok"
}

async fn get_bank(
    Extension(logger): Extension<Logger>,
    Extension(cx): Extension<RequestContext>,
) -> &'static str {
    let bank = Bank {
        branch_id: 42,
        branch_secret: "do-not-log".to_string(),
    };
    let _ = logger
        .error(&cx, "logging bank data", vec![Attr::new("bank", &bank)])
        .await;
    "ok"
}

fn enriched_logger(capture: &CaptureSink) -> Logger {
    Logger::new(Arc::new(EnrichingSink::new(Arc::new(capture.clone()))))
}

fn router(logger: Logger, provider: CorrelationIdProvider) -> Router {
    Router::new()
        .route("/get_customer", get(get_customer))
        .route("/get_bank", get(get_bank))
        .layer(Extension(logger))
        .layer(middleware::from_fn(
            request_log_enrich::middleware::request_metadata_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            provider,
            request_log_enrich::middleware::correlation_id_middleware,
        ))
}

fn meta_fields(record: &Record) -> Vec<(String, String)> {
    let last = record.attrs.last().expect("record has attributes");
    assert_eq!(last.key, META_GROUP_KEY);
    match &last.value {
        Value::Group(attrs) => attrs
            .iter()
            .map(|a| {
                let s = a.value.as_str().expect("meta values are strings");
                (a.key.clone(), s.to_string())
            })
            .collect(),
        other => panic!("meta_information is not a group: {other:?}"),
    }
}

fn meta_value<'a>(fields: &'a [(String, String)], key: &str) -> &'a str {
    fields
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .unwrap_or_else(|| panic!("missing meta key {key}"))
}

#[tokio::test]
async fn request_metadata_lands_in_every_record() {
    let capture = CaptureSink::new();
    let app = router(enriched_logger(&capture), CorrelationIdProvider::default());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/get_customer")
                .header(header::USER_AGENT, "test-agent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"ok");

    let records = capture.records();
    assert_eq!(records.len(), 1);

    let meta = meta_fields(&records[0]);
    assert_eq!(meta.len(), 4);
    assert_eq!(meta_value(&meta, REQUEST_METHOD_KEY), "GET");
    assert_eq!(meta_value(&meta, REQUEST_PATH_KEY), "/get_customer");
    assert_eq!(meta_value(&meta, REQUEST_USER_AGENT_KEY), "test-agent");

    // UUID textual format from the primary generator.
    let correlation_id = meta_value(&meta, CORRELATION_ID_KEY);
    assert_eq!(correlation_id.len(), 36);
    assert_eq!(correlation_id.bytes().filter(|b| *b == b'-').count(), 4);

    // The redacting loggable only exposed its selected field.
    let customer = &records[0].attrs[0];
    assert_eq!(customer.key, "customer");
    assert_eq!(
        customer.value,
        Value::group(vec![Attr::new("user_id", "u-1")])
    );
    let rendered = serde_json::to_string(&customer.value.to_json()).unwrap();
    assert!(!rendered.contains("ada@example.com"));
    assert!(!rendered.contains("29ABCDE1234F1Z5"));
}

#[tokio::test]
async fn scalar_loggable_stays_a_single_primitive() {
    let capture = CaptureSink::new();
    let app = router(enriched_logger(&capture), CorrelationIdProvider::default());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/get_bank?branch=main")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let records = capture.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].attrs[0].value, Value::Uint(42));

    let rendered = serde_json::to_string(&records[0].attrs[0].value.to_json()).unwrap();
    assert_eq!(rendered, "42");
    assert!(!rendered.contains("do-not-log"));

    // Query string is part of the captured request target.
    let meta = meta_fields(&records[0]);
    assert_eq!(meta_value(&meta, REQUEST_PATH_KEY), "/get_bank?branch=main");
}

#[tokio::test]
async fn concurrent_requests_keep_their_own_metadata() {
    let capture = CaptureSink::new();
    let app = router(enriched_logger(&capture), CorrelationIdProvider::default());

    let customer_req = Request::builder()
        .uri("/get_customer")
        .header(header::USER_AGENT, "agent-one")
        .body(Body::empty())
        .unwrap();
    let bank_req = Request::builder()
        .uri("/get_bank")
        .header(header::USER_AGENT, "agent-two")
        .body(Body::empty())
        .unwrap();

    let (a, b) = tokio::join!(app.clone().oneshot(customer_req), app.oneshot(bank_req));
    assert_eq!(a.unwrap().status(), StatusCode::OK);
    assert_eq!(b.unwrap().status(), StatusCode::OK);

    let records = capture.records();
    assert_eq!(records.len(), 2);

    let mut seen_ids = Vec::new();
    for record in &records {
        let meta = meta_fields(record);
        match meta_value(&meta, REQUEST_PATH_KEY) {
            "/get_customer" => assert_eq!(meta_value(&meta, REQUEST_USER_AGENT_KEY), "agent-one"),
            "/get_bank" => assert_eq!(meta_value(&meta, REQUEST_USER_AGENT_KEY), "agent-two"),
            other => panic!("unexpected path {other}"),
        }
        seen_ids.push(meta_value(&meta, CORRELATION_ID_KEY).to_string());
    }
    assert_ne!(seen_ids[0], seen_ids[1]);
}

struct FailingSource;

impl IdSource for FailingSource {
    fn try_generate(&self) -> Result<String, Box<dyn Error + Send + Sync>> {
        Err("entropy source unavailable".into())
    }
}

#[tokio::test]
async fn fallback_id_still_enriches_and_install_happens_once() {
    // Install the process-wide default logger so the provider's error
    // event has somewhere to go; the second install must be rejected.
    let default_capture = CaptureSink::new();
    install(Arc::new(default_capture.clone())).expect("first install succeeds");
    assert!(install(Arc::new(CaptureSink::new())).is_err());

    let capture = CaptureSink::new();
    let app = router(
        enriched_logger(&capture),
        CorrelationIdProvider::new(Arc::new(FailingSource)),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/get_customer")
                .header(header::USER_AGENT, "test-agent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Logging-subsystem failure never rejects the request.
    assert_eq!(response.status(), StatusCode::OK);

    let records = capture.records();
    assert_eq!(records.len(), 1);
    let meta = meta_fields(&records[0]);
    let correlation_id = meta_value(&meta, CORRELATION_ID_KEY);
    assert_eq!(correlation_id.len(), FALLBACK_ID_LENGTH);
    assert!(correlation_id.bytes().all(|b| b.is_ascii_alphanumeric()));

    // The generation failure itself was logged through the default
    // logger, with blank metadata since no id existed yet.
    let error_records = default_capture.records();
    assert_eq!(error_records.len(), 1);
    assert_eq!(error_records[0].message, "failed to generate unique correlation id");
    let error_meta = meta_fields(&error_records[0]);
    assert_eq!(meta_value(&error_meta, CORRELATION_ID_KEY), "");
}
