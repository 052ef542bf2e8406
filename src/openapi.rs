use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::errors::ErrorResponse;
use crate::handlers::common::MessageResponse;
use crate::handlers::coupons::{
    ApplicableCouponsResponse, CatalogResponse, DiscountFigures, ValidationResponse,
};
use crate::services::coupons::{
    ApplicableCoupon, CartItemInput, CouponQuery, CouponView, CreateCouponInput,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::coupons::create_coupon,
        crate::handlers::coupons::applicable_coupons,
        crate::handlers::coupons::validate_coupon,
        crate::handlers::coupons::list_coupons,
    ),
    components(schemas(
        ApplicableCoupon,
        ApplicableCouponsResponse,
        CartItemInput,
        CatalogResponse,
        CouponQuery,
        CouponView,
        CreateCouponInput,
        DiscountFigures,
        ErrorResponse,
        MessageResponse,
        ValidationResponse,
    )),
    tags(
        (name = "coupons", description = "Coupon eligibility and discount computation")
    )
)]
pub struct ApiDoc;

/// Swagger UI mounted at /docs, serving the generated document.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
