use crate::tracing::{scope_request_id, RequestId};
use axum::{
    extract::Request,
    http::{header::HeaderName, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};

/// Header carrying the request id in both directions
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const HEADER: HeaderName = HeaderName::from_static(REQUEST_ID_HEADER);

/// Reuses a printable incoming id, otherwise mints a UUID.
fn resolve(headers: &HeaderMap) -> (RequestId, HeaderValue) {
    if let Some(value) = headers.get(&HEADER) {
        if let Ok(text) = value.to_str() {
            if !text.trim().is_empty() {
                return (RequestId::new(text), value.clone());
            }
        }
    }
    let id = RequestId::default();
    let value = HeaderValue::from_str(id.as_str()).unwrap_or(HeaderValue::from_static("unknown"));
    (id, value)
}

/// Tags the request (extension, header and task-local) and the response with
/// an `x-request-id`. Error bodies pick the id up through
/// [`crate::tracing::current_request_id`].
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let (request_id, value) = resolve(request.headers());
    request.headers_mut().insert(HEADER, value.clone());
    request.extensions_mut().insert(request_id.clone());

    let mut response = scope_request_id(request_id, next.run(request)).await;
    response.headers_mut().insert(HEADER, value);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        extract::Extension,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    async fn echo(Extension(id): Extension<RequestId>) -> String {
        let scoped = crate::tracing::current_request_id().map(|r| r.0).unwrap_or_default();
        format!("{}|{}", id, scoped)
    }

    async fn call(header: Option<&str>) -> (Option<String>, String) {
        let app = Router::new()
            .route("/", get(echo))
            .layer(axum::middleware::from_fn(request_id_middleware));
        let mut builder = axum::http::Request::builder().uri("/");
        if let Some(h) = header {
            builder = builder.header(REQUEST_ID_HEADER, h);
        }
        let response = app
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let header = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .map(|v| v.to_str().unwrap().to_string());
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (header, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn mints_an_id_when_none_is_sent() {
        let (header, body) = call(None).await;
        let id = header.expect("response header");
        assert!(uuid::Uuid::parse_str(&id).is_ok());
        assert_eq!(body, format!("{id}|{id}"));
    }

    #[tokio::test]
    async fn keeps_the_callers_id() {
        let (header, body) = call(Some("front-desk-42")).await;
        assert_eq!(header.as_deref(), Some("front-desk-42"));
        assert_eq!(body, "front-desk-42|front-desk-42");
    }

    #[tokio::test]
    async fn blank_ids_are_replaced() {
        let (header, _) = call(Some("   ")).await;
        assert_ne!(header.as_deref(), Some("   "));
    }
}
