use crate::{
    entities::item,
    errors::ServiceError,
    handlers::common::{bounded, validate_input, MessageResponse},
    services::items::{CreateItemInput, ItemFilter},
    AppState,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

/// Creates the router for item endpoints
pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(add_item))
        .route("/", get(get_items))
}

#[derive(Debug, Serialize)]
pub struct ItemsResponse {
    pub items: Vec<item::Model>,
}

async fn add_item(
    State(state): State<AppState>,
    Json(payload): Json<CreateItemInput>,
) -> Result<(StatusCode, Json<MessageResponse>), ServiceError> {
    validate_input(&payload)?;

    bounded(
        state.config.store_timeout(),
        state.services.items.create_item(payload),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Item added successfully")),
    ))
}

async fn get_items(
    State(state): State<AppState>,
    Query(filter): Query<ItemFilter>,
) -> Result<Json<ItemsResponse>, ServiceError> {
    let items = bounded(
        state.config.store_timeout(),
        state.services.items.list_items(filter),
    )
    .await?;

    Ok(Json(ItemsResponse { items }))
}
