use prometheus::{Encoder, TextEncoder};

use crate::error::AppError;

pub async fn metrics_handler() -> Result<String, AppError> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| AppError::Internal(format!("metrics encoding failed: {e}")))?;
    String::from_utf8(buffer).map_err(|e| AppError::Internal(format!("metrics were not UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::handlers::router;
    use crate::state::test_support::harness;

    #[tokio::test]
    async fn exposes_signup_counters() {
        let h = harness();
        let app = router(h.state.clone());

        let signup = Request::builder()
            .method("POST")
            .uri("/api/signup")
            .header("content-type", "application/json")
            .header("x-forwarded-for", "203.0.113.77")
            .body(Body::from(r#"{"email":"metrics@example.com"}"#))
            .unwrap();
        let res = app.clone().oneshot(signup).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let req = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("giftlist_signup_requests_total"));
        assert!(text.contains("giftlist_signups_accepted_total"));
    }
}
