//! User CRUD handlers. All routes here require a valid access token.

use axum::Json;
use axum::extract::State;
use validator::Validate;

use userhub_service::user::service::UpdateUserInput;

use crate::dto::request::UpdateUserRequest;
use crate::dto::response::{ApiResponse, MessageResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::{ApiJson, ApiPath, AuthUser};
use crate::state::AppState;

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = state.user_service.get_user(id).await?;
    Ok(Json(ApiResponse::ok(UserResponse::from(user))))
}

/// PUT /api/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    req.validate()?;

    let user = state
        .user_service
        .update_user(
            id,
            UpdateUserInput {
                username: req.username,
                email: req.email,
                password: req.password,
            },
        )
        .await?;

    Ok(Json(ApiResponse::ok(UserResponse::from(user))))
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.user_service.delete_user(id).await?;

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "user deleted".to_string(),
    })))
}
