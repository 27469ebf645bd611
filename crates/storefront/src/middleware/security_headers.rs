//! Security and caching headers for storefront responses.
//!
//! The content security policy allows first-party scripts and styles plus the
//! image origins the plan catalog actually links to. Wizard pages are
//! per-visitor and never cached; fingerprinted stylesheets are cached forever.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use axum::{
    extract::Request,
    http::{
        HeaderName, HeaderValue,
        header::{
            CACHE_CONTROL, CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
            X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};
use url::Url;

use fitplan_core::{Category, catalog};

/// Prefix of content-hashed assets written by the build script.
const FINGERPRINTED_PREFIX: &str = "/static/css/derived/";

/// Used if the catalog ever yields an origin that is not a valid header value.
const SELF_ONLY_POLICY: &str = "default-src 'self'; object-src 'none'; frame-ancestors 'none'";

static CONTENT_POLICY: LazyLock<HeaderValue> = LazyLock::new(|| {
    HeaderValue::from_str(&content_policy(&catalog_image_origins()))
        .unwrap_or_else(|_| HeaderValue::from_static(SELF_ONLY_POLICY))
});

/// Distinct origins of every catalog image, e.g. `https://images.pexels.com`.
#[must_use]
pub fn catalog_image_origins() -> BTreeSet<String> {
    Category::ALL
        .iter()
        .flat_map(|category| catalog::plans(*category))
        .filter_map(|card| Url::parse(card.image).ok())
        .filter(|url| url.scheme() == "https")
        .map(|url| url.origin().ascii_serialization())
        .collect()
}

/// Build the policy for the given image origins.
///
/// Payment and contact codes are inline SVG, so nothing beyond `'self'`
/// is needed for scripts, styles or connections.
#[must_use]
pub fn content_policy(image_origins: &BTreeSet<String>) -> String {
    let mut img_src = String::from("'self'");
    for origin in image_origins {
        img_src.push(' ');
        img_src.push_str(origin);
    }

    [
        "default-src 'none'".to_string(),
        "script-src 'self'".to_string(),
        "style-src 'self'".to_string(),
        format!("img-src {img_src}"),
        "connect-src 'self'".to_string(),
        "base-uri 'none'".to_string(),
        "form-action 'self'".to_string(),
        "frame-ancestors 'none'".to_string(),
    ]
    .join("; ")
}

/// Add security and caching headers to every response.
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let fingerprinted = request.uri().path().starts_with(FINGERPRINTED_PREFIX);

    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(CONTENT_SECURITY_POLICY, CONTENT_POLICY.clone());
    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));

    // Intake answers end up in the page; keep them out of Referer
    headers.insert(REFERRER_POLICY, HeaderValue::from_static("no-referrer"));

    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static("camera=(), microphone=(), geolocation=(), payment=()"),
    );
    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin"),
    );

    let cache = if fingerprinted {
        "public, max-age=31536000, immutable"
    } else {
        "no-store"
    };
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(cache));

    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Router, body::Body, middleware, routing::get};
    use tower::ServiceExt;

    use super::*;

    async fn headers_for(path: &str) -> axum::http::HeaderMap {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .route("/static/css/derived/main.abcd1234.css", get(|| async { "css" }))
            .layer(middleware::from_fn(security_headers_middleware));

        app.oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .headers()
            .clone()
    }

    #[test]
    fn test_image_origins_come_from_catalog() {
        let origins = catalog_image_origins();
        assert_eq!(
            origins.into_iter().collect::<Vec<_>>(),
            vec!["https://images.pexels.com".to_string()]
        );
    }

    #[test]
    fn test_policy_lists_each_origin() {
        let origins = BTreeSet::from([
            "https://a.example".to_string(),
            "https://b.example".to_string(),
        ]);
        let policy = content_policy(&origins);

        assert!(policy.contains("img-src 'self' https://a.example https://b.example;"));
        assert!(policy.starts_with("default-src 'none'"));
        assert!(!policy.contains("unsafe-inline"));
    }

    #[tokio::test]
    async fn test_pages_are_not_cached() {
        let headers = headers_for("/").await;

        assert_eq!(headers.get(X_FRAME_OPTIONS).unwrap(), "DENY");
        assert_eq!(headers.get(CACHE_CONTROL).unwrap(), "no-store");
        let csp = headers.get(CONTENT_SECURITY_POLICY).unwrap().to_str().unwrap();
        assert!(csp.contains("script-src 'self'"));
        assert!(csp.contains("https://images.pexels.com"));
    }

    #[tokio::test]
    async fn test_fingerprinted_assets_are_immutable() {
        let headers = headers_for("/static/css/derived/main.abcd1234.css").await;

        assert_eq!(
            headers.get(CACHE_CONTROL).unwrap(),
            "public, max-age=31536000, immutable"
        );
    }
}
