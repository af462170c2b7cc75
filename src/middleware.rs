use crate::context::{
    RequestContext, CORRELATION_ID_KEY, REQUEST_METHOD_KEY, REQUEST_PATH_KEY,
    REQUEST_USER_AGENT_KEY,
};
use crate::correlation::CorrelationIdProvider;
use axum::body::Body;
use axum::extract::State;
use axum::http::header::USER_AGENT;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Outermost interceptor: binds a fresh correlation id into the
/// request's context.
///
/// Register with `middleware::from_fn_with_state` and a
/// [`CorrelationIdProvider`]. Derives a new [`RequestContext`] carrying
/// `correlation_id`, re-inserts it into the request extensions, then
/// calls the next stage exactly once and returns its response
/// unchanged.
pub async fn correlation_id_middleware(
    State(provider): State<CorrelationIdProvider>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let id = provider.generate().await;
    let cx = current_context(&req).put(CORRELATION_ID_KEY, id);
    req.extensions_mut().insert(cx);
    next.run(req).await
}

/// Second interceptor: binds method, full request target and user agent
/// into the request's context, then passes through.
pub async fn request_metadata_middleware(mut req: Request<Body>, next: Next) -> Response {
    let method = req.method().to_string();
    // The full target, query string included.
    let path = req.uri().to_string();
    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let cx = current_context(&req)
        .put(REQUEST_METHOD_KEY, method)
        .put(REQUEST_PATH_KEY, path)
        .put(REQUEST_USER_AGENT_KEY, user_agent);
    req.extensions_mut().insert(cx);
    next.run(req).await
}

fn current_context(req: &Request<Body>) -> RequestContext {
    req.extensions()
        .get::<RequestContext>()
        .cloned()
        .unwrap_or_default()
}
