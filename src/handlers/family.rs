use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use tracing::info;

use crate::error::AppError;
use crate::family::generate_slug;
use crate::models::{CreateFamilyRequest, FamilySettings, NewFamily};
use crate::session::AuthSession;
use crate::state::AppState;

const SLUG_TAKEN: &str = "This family URL is already taken. Please choose another.";

// Onboarding step 1: create the family and reserve its share slug
pub async fn create_family_handler(
    State(state): State<Arc<AppState>>,
    session: AuthSession,
    payload: Result<Json<CreateFamilyRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<FamilySettings>), AppError> {
    let Json(req) = payload?;
    let family_name = req.family_name.trim();
    if family_name.is_empty() {
        return Err(AppError::Validation("Family name is required"));
    }

    // A hand-edited slug goes through the same normalisation as a generated one
    let slug_source = req
        .share_slug
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(family_name);
    let share_slug = generate_slug(slug_source);
    if share_slug.is_empty() {
        return Err(AppError::Validation("Family URL must contain letters or numbers"));
    }

    let backend = &state.backend;
    if backend
        .find_family_by_slug(&session.token, &share_slug)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(SLUG_TAKEN));
    }

    let family = backend
        .insert_family(
            &session.token,
            NewFamily {
                user_id: session.user.id.clone(),
                family_name: family_name.to_string(),
                share_slug,
                is_public: true,
            },
        )
        .await?;

    info!(user_id = %session.user.id, share_slug = %family.share_slug, "Family created");
    Ok((StatusCode::CREATED, Json(family)))
}
