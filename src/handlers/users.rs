use crate::{
    errors::ServiceError,
    handlers::common::{bounded, validate_input},
    services::users::LoginInput,
    AppState,
};
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Serialize;
use uuid::Uuid;

/// Creates the router for user endpoints
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub message: String,
}

/// Logs a user in, registering them on first sight.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginInput>,
) -> Result<(StatusCode, Json<LoginResponse>), ServiceError> {
    validate_input(&payload)?;

    let user_id = bounded(
        state.config.store_timeout(),
        state.services.users.login(payload),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(LoginResponse {
            user_id,
            message: "logged-in successfully".to_string(),
        }),
    ))
}
