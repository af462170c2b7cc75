use axum::{middleware, routing::get, Extension, Router};

use request_log_enrich::context::RequestContext;
use request_log_enrich::correlation::CorrelationIdProvider;
use request_log_enrich::env::{env_or, LOG_ENRICH_LEVEL_ENV, LOG_ENRICH_LISTEN_ADDR_ENV};
use request_log_enrich::init::install_stdout;
use request_log_enrich::json_sink::JsonSinkConfig;
use request_log_enrich::logger::default_logger;
use request_log_enrich::middleware::{correlation_id_middleware, request_metadata_middleware};
use request_log_enrich::record::Level;
use request_log_enrich::value::{Attr, ToLogValue, Value};

#[allow(dead_code)]
struct Customer {
    user_id: String,
    name: String,
    email: String,
    gst_number: String,
}

impl ToLogValue for Customer {
    // Group-producing variant: everything but the user id is redacted.
    fn to_log_value(&self) -> Value {
        Value::group(vec![Attr::new("user_id", self.user_id.as_str())])
    }
}

#[allow(dead_code)]
struct Bank {
    branch_id: u64,
    branch_name: String,
    branch_secret: String,
}

impl ToLogValue for Bank {
    // Scalar-producing variant: the whole value collapses to one field.
    fn to_log_value(&self) -> Value {
        Value::Uint(self.branch_id)
    }
}

async fn get_customer(Extension(cx): Extension<RequestContext>) -> &'static str {
    let customer = Customer {
        user_id: "u-1001".to_string(),
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        gst_number: "29ABCDE1234F1Z5".to_string(),
    };
    let _ = default_logger()
        .info(&cx, "logging customer data", vec![Attr::new("customer", &customer)])
        .await;
    "ok"
}

async fn get_bank(Extension(cx): Extension<RequestContext>) -> &'static str {
    let bank = Bank {
        branch_id: 42,
        branch_name: "Main Street".to_string(),
        branch_secret: "do-not-log".to_string(),
    };
    let _ = default_logger()
        .error(&cx, "logging bank data", vec![Attr::new("bank", &bank)])
        .await;
    "ok"
}

#[tokio::main]
async fn main() {
    let min_level = env_or(LOG_ENRICH_LEVEL_ENV, "info")
        .parse::<Level>()
        .unwrap_or(Level::Info);
    install_stdout(JsonSinkConfig { min_level }).expect("install default logger");

    let app = Router::new()
        .route("/get_customer", get(get_customer))
        .route("/get_bank", get(get_bank))
        .layer(middleware::from_fn(request_metadata_middleware))
        // Added last so it runs first: the correlation id is in place
        // before the metadata middleware derives its context.
        .layer(middleware::from_fn_with_state(
            CorrelationIdProvider::default(),
            correlation_id_middleware,
        ));

    let addr = env_or(LOG_ENRICH_LISTEN_ADDR_ENV, "127.0.0.1:8080");
    let listener = tokio::net::TcpListener::bind(&addr).await.expect("bind listen address");
    println!("listening on {addr}");
    axum::serve(listener, app).await.expect("serve");
}
