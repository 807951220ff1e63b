use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, Uri};
use axum::response::Response;
use bytes::Bytes;
use http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_LENGTH, CONTENT_TYPE,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::classify::{Route, Scope, classify_route, classify_scope};
use crate::context::RequestContext;
use crate::core::CoreState;
use crate::error::GatewayError;
use crate::pipeline;

pub const TRACE_HEADER: &str = "x-pixgate-trace-id";

/// Largest request body read from a client.
pub const MAX_REQUEST_BODY_BYTES: usize = 2 * 1024 * 1024;

/// What a request resolved to, before headers are attached.
#[derive(Debug)]
pub enum Reply {
    Json { status: StatusCode, body: Bytes },
    NoContent,
}

pub async fn gateway_handler(
    State(state): State<Arc<CoreState>>,
    method: Method,
    headers: HeaderMap,
    uri: Uri,
    body: Body,
) -> Response {
    handle_request(&state, method, uri.path(), &headers, body).await
}

/// Handles one inbound request end to end. Every failure ends up as an error
/// envelope; nothing escapes as a panic or bare status.
///
/// The body is read here rather than by an extractor so that an oversized
/// body still gets the envelope and trace header.
pub async fn handle_request(
    state: &CoreState,
    method: Method,
    path: &str,
    headers: &HeaderMap,
    body: Body,
) -> Response {
    let ctx = RequestContext::new();
    let started_at = Instant::now();
    info!(
        event = "downstream_received",
        trace_id = %ctx.trace_id,
        method = %method,
        path = %path
    );

    let reply = match dispatch(state, &ctx, &method, path, headers, body).await {
        Ok(reply) => reply,
        Err(err) => {
            warn!(
                event = "downstream_error",
                trace_id = %ctx.trace_id,
                status = %err.status.as_u16(),
                code = %err.code,
                message = %err.message
            );
            Reply::Json {
                status: err.status,
                body: err.body(),
            }
        }
    };

    let response = into_response(reply, &ctx);
    info!(
        event = "downstream_responded",
        trace_id = %ctx.trace_id,
        status = %response.status().as_u16(),
        elapsed_ms = started_at.elapsed().as_millis()
    );
    response
}

async fn dispatch(
    state: &CoreState,
    ctx: &RequestContext,
    method: &Method,
    path: &str,
    headers: &HeaderMap,
    body: Body,
) -> Result<Reply, GatewayError> {
    if classify_scope(method, path)? == Scope::Preflight {
        return Ok(Reply::NoContent);
    }
    state.auth.authenticate(headers)?;

    let route = classify_route(method, path)?;
    info!(
        event = "downstream_routed",
        trace_id = %ctx.trace_id,
        op = %route.operation()
    );
    match route {
        Route::ListModels => json_reply(&pipeline::list_models(state)),
        Route::ImageGenerations => {
            let body = read_body(headers, body).await?;
            json_reply(&pipeline::create_image(state, ctx, &body).await?)
        }
        Route::ChatCompletions => {
            let body = read_body(headers, body).await?;
            json_reply(&pipeline::create_chat_completion(state, ctx, &body).await?)
        }
    }
}

async fn read_body(headers: &HeaderMap, body: Body) -> Result<Bytes, GatewayError> {
    let too_large = || {
        GatewayError::payload_too_large(format!(
            "request body exceeds {MAX_REQUEST_BODY_BYTES} bytes"
        ))
    };
    let declared = headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok());
    if declared.is_some_and(|len| len > MAX_REQUEST_BODY_BYTES as u64) {
        return Err(too_large());
    }
    axum::body::to_bytes(body, MAX_REQUEST_BODY_BYTES)
        .await
        .map_err(|err| {
            if err.to_string().contains("length limit exceeded") {
                too_large()
            } else {
                GatewayError::invalid_request(format!("failed to read request body: {err}"))
            }
        })
}

fn json_reply<T: Serialize>(value: &T) -> Result<Reply, GatewayError> {
    let body = serde_json::to_vec(value)
        .map_err(|err| GatewayError::internal(format!("encode response: {err}")))?;
    Ok(Reply::Json {
        status: StatusCode::OK,
        body: Bytes::from(body),
    })
}

fn into_response(reply: Reply, ctx: &RequestContext) -> Response {
    let mut resp = match reply {
        Reply::Json { status, body } => {
            let mut resp = Response::new(Body::from(body));
            *resp.status_mut() = status;
            resp.headers_mut().insert(
                CONTENT_TYPE,
                HeaderValue::from_static("application/json; charset=utf-8"),
            );
            resp
        }
        Reply::NoContent => {
            let mut resp = Response::new(Body::empty());
            *resp.status_mut() = StatusCode::NO_CONTENT;
            resp
        }
    };
    insert_cors_headers(resp.headers_mut());
    if let Ok(value) = HeaderValue::from_str(&ctx.trace_id) {
        resp.headers_mut().insert(TRACE_HEADER, value);
    }
    resp
}

fn insert_cors_headers(headers: &mut HeaderMap) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Authorization"),
    );
}
