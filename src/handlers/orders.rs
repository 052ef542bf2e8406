use crate::{
    errors::ServiceError,
    handlers::common::{bounded, MessageResponse},
    services::orders::CreateOrderInput,
    AppState,
};
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

/// Creates the router for order endpoints
pub fn order_routes() -> Router<AppState> {
    Router::new().route("/", post(create_order))
}

async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderInput>,
) -> Result<(StatusCode, Json<MessageResponse>), ServiceError> {
    bounded(
        state.config.store_timeout(),
        state.services.orders.create_order(payload),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Order placed successfully")),
    ))
}
