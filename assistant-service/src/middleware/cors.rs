//! Cross-origin policy: a fixed allow-list of browser origins.
//!
//! `tower-http`'s `CorsLayer` only decorates responses, so a guard in front of
//! it turns away requests whose `Origin` is not on the list before any handler
//! runs. Requests without an `Origin` header are not browser cross-origin
//! requests and pass through.

use axum::{
    extract::{Request, State},
    http::{header::ORIGIN, HeaderValue},
    middleware::Next,
    response::Response,
};
use service_core::error::AppError;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

#[derive(Debug, Clone)]
pub struct AllowedOrigins(Arc<Vec<HeaderValue>>);

impl AllowedOrigins {
    pub fn new(origins: Vec<HeaderValue>) -> Self {
        Self(Arc::new(origins))
    }

    pub fn allows(&self, origin: &HeaderValue) -> bool {
        self.0.iter().any(|allowed| allowed == origin)
    }

    pub fn to_vec(&self) -> Vec<HeaderValue> {
        self.0.as_ref().clone()
    }
}

/// CORS headers for allowed origins: any method, any request header, credentials allowed.
pub fn cors_layer(origins: &AllowedOrigins) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins.to_vec()))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub async fn origin_guard_middleware(
    State(allowed): State<AllowedOrigins>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(origin) = request.headers().get(ORIGIN) {
        if !allowed.allows(origin) {
            tracing::warn!(
                origin = ?origin,
                method = %request.method(),
                path = %request.uri().path(),
                "Rejected request from disallowed origin"
            );
            return Err(AppError::Forbidden(anyhow::anyhow!(
                "Disallowed CORS origin"
            )));
        }
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_only_exact_matches() {
        let allowed = AllowedOrigins::new(vec![HeaderValue::from_static("http://localhost:3000")]);

        assert!(allowed.allows(&HeaderValue::from_static("http://localhost:3000")));
        assert!(!allowed.allows(&HeaderValue::from_static("http://localhost:3000/")));
        assert!(!allowed.allows(&HeaderValue::from_static("https://localhost:3000")));
        assert!(!allowed.allows(&HeaderValue::from_static("http://evil.example")));
    }
}
