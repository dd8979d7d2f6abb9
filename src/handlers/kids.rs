use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::error::AppError;
use crate::holidays::derived_holidays;
use crate::models::{CreateKidRequest, Kid, KidCreated, NewKid};
use crate::session::AuthSession;
use crate::state::AppState;

fn parse_birthday(raw: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::Validation("Birthday must be a date in YYYY-MM-DD format")),
    }
}

// Add a kid, then best-effort create the reminder entries that go with it
pub async fn create_kid_handler(
    State(state): State<Arc<AppState>>,
    session: AuthSession,
    payload: Result<Json<CreateKidRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<KidCreated>), AppError> {
    let Json(req) = payload?;
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Child's name is required"));
    }
    let birthday = parse_birthday(req.birthday.as_deref())?;

    let kid = state
        .backend
        .insert_kid(
            &session.token,
            NewKid {
                parent_user_id: session.user.id.clone(),
                name: name.to_string(),
                birthday,
            },
        )
        .await?;
    info!(user_id = %session.user.id, kid_id = %kid.id, "Kid created");

    let mut holidays = derived_holidays(
        &session.user.id,
        &kid.name,
        kid.birthday,
        state.clock.today(),
        req.onboarding,
    );
    if !holidays.is_empty() {
        // the kid already exists; a failed reminder insert must not undo that
        if let Err(e) = state.backend.insert_holidays(&session.token, &holidays).await {
            warn!(kid_id = %kid.id, error = %e, "Could not create holiday entries");
            holidays.clear();
        }
    }

    Ok((StatusCode::CREATED, Json(KidCreated { kid, holidays })))
}

pub async fn list_kids_handler(
    State(state): State<Arc<AppState>>,
    session: AuthSession,
) -> Result<Json<Vec<Kid>>, AppError> {
    let kids = state.backend.list_kids(&session.token, &session.user.id).await?;
    Ok(Json(kids))
}
