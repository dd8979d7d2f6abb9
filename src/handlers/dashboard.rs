use std::sync::Arc;

use axum::Json;
use axum::extract::State;

use crate::error::AppError;
use crate::models::DashboardResponse;
use crate::session::AuthSession;
use crate::state::AppState;

// Signed-in landing data; `family` is null until onboarding has run
pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
    session: AuthSession,
) -> Result<Json<DashboardResponse>, AppError> {
    let family = state
        .backend
        .find_family_by_user(&session.token, &session.user.id)
        .await?;

    Ok(Json(DashboardResponse {
        user: session.user,
        family,
    }))
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::handlers::router;
    use crate::state::test_support::{TOKEN, harness};

    #[tokio::test]
    async fn requires_a_session() {
        let h = harness();
        let req = Request::builder().uri("/api/dashboard").body(Body::empty()).unwrap();
        let res = router(h.state).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "error": "Not authenticated" }));
    }

    #[tokio::test]
    async fn rejects_unknown_tokens() {
        let h = harness();
        let req = Request::builder()
            .uri("/api/dashboard")
            .header("authorization", "Bearer stale-token")
            .body(Body::empty())
            .unwrap();
        let res = router(h.state).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn shows_user_before_onboarding() {
        let h = harness();
        let req = Request::builder()
            .uri("/api/dashboard")
            .header("cookie", format!("sb-access-token={TOKEN}"))
            .body(Body::empty())
            .unwrap();
        let res = router(h.state).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["user"]["email"], "parent@example.com");
        assert!(body["family"].is_null());
    }
}
