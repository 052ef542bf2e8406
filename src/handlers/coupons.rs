use crate::{
    errors::{ErrorResponse, ServiceError},
    handlers::common::{bounded, validate_input, MessageResponse},
    services::coupons::{ApplicableCoupon, CouponQuery, CouponView, CreateCouponInput},
    AppState,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Creates the router for coupon query endpoints
pub fn coupon_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_coupons))
        .route("/applicable", post(applicable_coupons))
        .route("/validate", post(validate_coupon))
}

/// Creates the router for administrative coupon endpoints
pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/coupons", post(create_coupon))
}

#[derive(Debug, Deserialize)]
pub struct ValidateParams {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApplicableCouponsResponse {
    pub applicable_coupons: Vec<ApplicableCoupon>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogResponse {
    pub coupons: Vec<CouponView>,
}

/// Items/charges discount figures reported for a validated coupon.
#[derive(Debug, Serialize, ToSchema)]
pub struct DiscountFigures {
    pub items_discount: f64,
    pub charges_discount: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationResponse {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<DiscountFigures>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Rejections applied before the engine runs. The order total check is an
/// exact zero comparison; negative totals pass through and surface as a
/// negative charges figure downstream.
fn validate_query(query: &CouponQuery) -> Result<(), ServiceError> {
    if query.cart_items.is_empty() {
        return Err(ServiceError::ValidationError("no items added".to_string()));
    }
    if query.order_total == Decimal::ZERO {
        return Err(ServiceError::ValidationError(
            "order total is zero".to_string(),
        ));
    }
    if query.timestamp.is_empty() {
        return Err(ServiceError::ValidationError(
            "timestamp required".to_string(),
        ));
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/coupons",
    tag = "coupons",
    request_body = CreateCouponInput,
    responses(
        (status = 201, description = "Coupon created", body = MessageResponse),
        (status = 400, description = "Invalid coupon payload", body = ErrorResponse)
    )
)]
pub async fn create_coupon(
    State(state): State<AppState>,
    Json(payload): Json<CreateCouponInput>,
) -> Result<(StatusCode, Json<MessageResponse>), ServiceError> {
    validate_input(&payload)?;

    bounded(
        state.config.store_timeout(),
        state.services.coupons.create_coupon(payload),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("coupon created")),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/coupons/applicable",
    tag = "coupons",
    request_body = CouponQuery,
    responses(
        (status = 200, description = "Coupons applicable to the cart", body = ApplicableCouponsResponse),
        (status = 400, description = "Invalid query", body = ErrorResponse)
    )
)]
pub async fn applicable_coupons(
    State(state): State<AppState>,
    Json(query): Json<CouponQuery>,
) -> Result<Json<ApplicableCouponsResponse>, ServiceError> {
    validate_query(&query)?;

    let applicable_coupons = bounded(
        state.config.store_timeout(),
        state.services.coupons.applicable_coupons(&query),
    )
    .await?;

    Ok(Json(ApplicableCouponsResponse { applicable_coupons }))
}

#[utoipa::path(
    post,
    path = "/api/v1/coupons/validate",
    tag = "coupons",
    params(("user_id" = Uuid, Query, description = "User the coupon is validated for")),
    request_body = CouponQuery,
    responses(
        (status = 200, description = "Validation outcome", body = ValidationResponse),
        (status = 400, description = "Invalid query", body = ErrorResponse)
    )
)]
pub async fn validate_coupon(
    State(state): State<AppState>,
    Query(params): Query<ValidateParams>,
    Json(query): Json<CouponQuery>,
) -> Result<Json<ValidationResponse>, ServiceError> {
    validate_query(&query)?;
    if query.coupon_code.is_empty() {
        return Err(ServiceError::ValidationError(
            "coupon code required".to_string(),
        ));
    }

    let breakdown = bounded(
        state.config.store_timeout(),
        state
            .services
            .coupons
            .validate_coupon(&query, params.user_id),
    )
    .await?;

    // A zero breakdown covers every not-applicable outcome, including a
    // genuine zero discount.
    if breakdown.is_zero() {
        return Ok(Json(ValidationResponse {
            is_valid: false,
            discount: None,
            message: None,
            reason: Some("coupon expired or not applicable".to_string()),
        }));
    }

    Ok(Json(ValidationResponse {
        is_valid: true,
        discount: Some(DiscountFigures {
            items_discount: breakdown.items_discount.to_f64().unwrap_or(0.0),
            charges_discount: breakdown.charges_discount.to_f64().unwrap_or(0.0),
        }),
        message: Some("coupon applied successfully".to_string()),
        reason: None,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/coupons",
    tag = "coupons",
    responses(
        (status = 200, description = "Full coupon catalog", body = CatalogResponse)
    )
)]
pub async fn list_coupons(
    State(state): State<AppState>,
) -> Result<Json<CatalogResponse>, ServiceError> {
    let coupons = bounded(
        state.config.store_timeout(),
        state.services.coupons.all_coupons(),
    )
    .await?;

    Ok(Json(CatalogResponse { coupons }))
}
