//! Request correlation IDs.
//!
//! Every request carries an [`RequestId`] extension. An upstream
//! `x-request-id` is reused when it looks sane; otherwise a UUID v4 is
//! minted. The ID lands in the request span, the Sentry scope and the
//! response headers.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_UPSTREAM_LEN: usize = 128;

/// Correlation ID of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    fn from_upstream(value: &HeaderValue) -> Option<Self> {
        let value = value.to_str().ok()?.trim();
        let acceptable = !value.is_empty()
            && value.len() <= MAX_UPSTREAM_LEN
            && value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        acceptable.then(|| Self(value.to_string()))
    }

    fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(RequestId::from_upstream)
        .unwrap_or_else(RequestId::generate);

    Span::current().record("request_id", request_id.as_str());
    sentry::configure_scope(|scope| scope.set_tag("request_id", request_id.as_str()));
    request.extensions_mut().insert(request_id.clone());

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_id_is_reused_when_sane() {
        let id = RequestId::from_upstream(&HeaderValue::from_static("cf-8a1b_2.3"));
        assert_eq!(id, Some(RequestId("cf-8a1b_2.3".to_string())));
    }

    #[test]
    fn test_upstream_id_rejected_when_odd() {
        assert!(RequestId::from_upstream(&HeaderValue::from_static("")).is_none());
        assert!(RequestId::from_upstream(&HeaderValue::from_static("a b")).is_none());
        let long = "x".repeat(MAX_UPSTREAM_LEN + 1);
        assert!(RequestId::from_upstream(&HeaderValue::from_str(&long).unwrap()).is_none());
    }
}
