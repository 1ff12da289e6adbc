//! User routes.

use atrium_core::user::{PublicUser, UserPatch};
use atrium_shared::types::UserId;
use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;

use crate::AppState;
use crate::error::ApiError;
use crate::extractors::{AppJson, AppPath, AppQuery, AvatarForm, UserForm};
use crate::responses::{DELETE_ANSWER, MessageResponse, ResponseCode, UPDATE_ANSWER};

/// Creates the user routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{user_id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route("/users/{user_id}/avatars", post(add_avatar))
}

/// Query parameters for deletion.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteParams {
    /// `json` returns `200` with a body instead of an empty `204`.
    pub ack: Option<String>,
}

async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<PublicUser>>, ApiError> {
    Ok(Json(state.users.list().await?))
}

async fn create_user(
    State(state): State<AppState>,
    form: UserForm,
) -> Result<(axum::http::StatusCode, Json<PublicUser>), ApiError> {
    let user = state.users.create(form.input, form.avatar).await?;
    Ok((ResponseCode::Created.status(), Json(user)))
}

async fn get_user(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<UserId>,
) -> Result<Json<PublicUser>, ApiError> {
    Ok(Json(state.users.get(user_id).await?))
}

async fn add_avatar(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<UserId>,
    form: AvatarForm,
) -> Result<Json<MessageResponse>, ApiError> {
    state.users.add_avatar(user_id, form.avatar).await?;
    Ok(Json(UPDATE_ANSWER))
}

async fn update_user(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<UserId>,
    AppJson(patch): AppJson<UserPatch>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.users.update(user_id, patch).await?;
    Ok(Json(UPDATE_ANSWER))
}

async fn delete_user(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<UserId>,
    AppQuery(params): AppQuery<DeleteParams>,
) -> Result<Response, ApiError> {
    state.users.delete(user_id).await?;

    if params.ack.as_deref() == Some("json") {
        Ok((ResponseCode::Ok.status(), Json(DELETE_ANSWER)).into_response())
    } else {
        Ok(ResponseCode::Delete.status().into_response())
    }
}
