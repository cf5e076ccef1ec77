//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// The number of bytes of a request or response body to log at the `info` level.
///
/// Longer bodies are truncated, and the full body is logged at the `debug` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// The method, URI and HTMX headers of the request, the status of the response
/// and the bodies of both are logged at the `info` level.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body = match collect_body(body).await {
        Ok(body) => body,
        Err(error) => {
            tracing::error!("could not read body of request to {}: {error}", parts.uri);
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    tracing::info!(
        method = %parts.method,
        uri = %parts.uri,
        htmx = is_htmx_request(&parts.headers),
        "Received request, body: {}",
        truncate_body(&body)
    );
    log_full_body("request", &body);

    let request = Request::from_parts(parts, Body::from(body));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body = match collect_body(body).await {
        Ok(body) => body,
        Err(error) => {
            tracing::error!("could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    tracing::info!(
        status = %parts.status,
        "Sending response, body: {}",
        truncate_body(&body)
    );
    log_full_body("response", &body);

    Response::from_parts(parts, Body::from(body))
}

async fn collect_body(body: Body) -> Result<Bytes, axum::Error> {
    axum::body::to_bytes(body, usize::MAX).await
}

fn is_htmx_request(headers: &HeaderMap) -> bool {
    headers.contains_key(axum_htmx::HX_REQUEST)
}

fn truncate_body(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);

    if text.len() > LOG_BODY_LENGTH_LIMIT {
        // Slicing at a byte offset may split a multi-byte character.
        let end = (0..=LOG_BODY_LENGTH_LIMIT)
            .rev()
            .find(|&index| text.is_char_boundary(index))
            .unwrap_or(0);
        format!("{:?}...", &text[..end])
    } else {
        format!("{text:?}")
    }
}

fn log_full_body(direction: &str, body: &[u8]) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::debug!("Full {direction} body: {:?}", String::from_utf8_lossy(body));
    }
}
