use crate::{
    cache::{CatalogCache, CATALOG_KEY},
    entities::coupon::{self, Entity as Coupon},
    entities::order,
    errors::ServiceError,
    events::{Event, EventSender},
    services::discounts::{self, DiscountBreakdown},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Cart line as submitted by the storefront. Only `category` and `price`
/// drive coupon decisions; `id` and `name` ride along.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartItemInput {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub category: String,
    pub price: Decimal,
}

/// Query context for both coupon operations.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CouponQuery {
    pub cart_items: Vec<CartItemInput>,
    /// Full payable amount; may exceed the item sum by fees and other
    /// non-item charges.
    pub order_total: Decimal,
    /// Reference instant for expiry checks, RFC 3339. Caller-supplied so
    /// evaluation is reproducible independent of the server clock.
    pub timestamp: String,
    #[serde(default)]
    pub coupon_code: String,
}

impl CouponQuery {
    /// Sum of the cart item prices (not the order total).
    pub fn total_item_price(&self) -> Decimal {
        self.cart_items.iter().map(|item| item.price).sum()
    }

    fn reference_time(&self) -> Result<DateTime<Utc>, ServiceError> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(|err| {
                ServiceError::ValidationError(format!("timestamp must be RFC 3339: {}", err))
            })
    }
}

/// Payload for the administrative coupon write.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCouponInput {
    #[validate(length(min = 1, max = 64))]
    pub coupon_code: String,
    pub expiry_date: DateTime<Utc>,
    pub usage_type: String,
    #[serde(default)]
    pub applicable_categories: BTreeSet<String>,
    #[serde(default)]
    pub applicable_medicine_ids: Option<BTreeSet<String>>,
    #[serde(default)]
    pub min_order_value: Decimal,
    #[serde(default)]
    pub valid_time_window: Option<String>,
    #[serde(default)]
    pub terms_and_conditions: Option<String>,
    pub discount_type: String,
    pub discount_value: Decimal,
    #[serde(default)]
    pub max_usage_per_user: i32,
}

/// Catalog representation with the stored label strings expanded back into
/// sets.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CouponView {
    pub coupon_code: String,
    pub expiry_date: DateTime<Utc>,
    pub usage_type: String,
    pub applicable_categories: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicable_medicine_ids: Option<BTreeSet<String>>,
    pub min_order_value: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_time_window: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms_and_conditions: Option<String>,
    pub discount_type: String,
    pub discount_value: Decimal,
    pub max_usage_per_user: i32,
}

impl From<coupon::Model> for CouponView {
    fn from(model: coupon::Model) -> Self {
        Self {
            applicable_categories: model.category_set(),
            applicable_medicine_ids: model
                .applicable_medicine_ids
                .as_deref()
                .map(coupon::split_categories),
            coupon_code: model.coupon_code,
            expiry_date: model.expiry_date,
            usage_type: model.usage_type,
            min_order_value: model.min_order_value,
            valid_time_window: model.valid_time_window,
            terms_and_conditions: model.terms_and_conditions,
            discount_type: model.discount_type,
            discount_value: model.discount_value,
            max_usage_per_user: model.max_usage_per_user,
        }
    }
}

/// One row of the applicable-coupons listing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApplicableCoupon {
    pub coupon_code: String,
    /// Combined discount against the order total, formatted to two decimals.
    pub discount_value: String,
}

/// Coupon catalog service: the administrative write, the two query
/// operations, and the cache-backed full-catalog read.
///
/// The catalog cache is an injected component owned by this service; it is
/// the only shared mutable state the coupon paths touch.
#[derive(Clone)]
pub struct CouponService {
    db: Arc<DatabaseConnection>,
    catalog_cache: CatalogCache,
    event_sender: Arc<EventSender>,
}

impl CouponService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        catalog_cache: CatalogCache,
        event_sender: Arc<EventSender>,
    ) -> Self {
        Self {
            db,
            catalog_cache,
            event_sender,
        }
    }

    /// Creates a coupon and drops the cached catalog before acknowledging
    /// the write, so a follow-up listing cannot serve the pre-write
    /// snapshot. Reads already in flight may still return the old one.
    #[instrument(skip(self, input), fields(coupon_code = %input.coupon_code))]
    pub async fn create_coupon(&self, input: CreateCouponInput) -> Result<coupon::Model, ServiceError> {
        let model = coupon::ActiveModel {
            coupon_code: Set(input.coupon_code),
            expiry_date: Set(input.expiry_date),
            usage_type: Set(input.usage_type),
            applicable_categories: Set(coupon::join_labels(&input.applicable_categories)),
            applicable_medicine_ids: Set(input
                .applicable_medicine_ids
                .as_ref()
                .map(coupon::join_labels)),
            min_order_value: Set(input.min_order_value),
            valid_time_window: Set(input.valid_time_window),
            terms_and_conditions: Set(input.terms_and_conditions),
            discount_type: Set(input.discount_type),
            discount_value: Set(input.discount_value),
            max_usage_per_user: Set(input.max_usage_per_user),
            created_at: Set(Utc::now()),
        };

        let created = model.insert(&*self.db).await?;

        self.catalog_cache.invalidate(CATALOG_KEY);

        self.event_sender
            .send_or_log(Event::CouponCreated(created.coupon_code.clone()))
            .await;

        info!("Created coupon {}", created.coupon_code);
        Ok(created)
    }

    /// Lists the coupons applicable to the given cart together with the
    /// discount each grants against the order total.
    ///
    /// Candidates are unexpired coupons whose minimum order value is at or
    /// below the cart's item sum. This query always goes to the store; only
    /// the unfiltered catalog listing is cache-backed. Results keep storage
    /// iteration order.
    #[instrument(skip(self, query))]
    pub async fn applicable_coupons(
        &self,
        query: &CouponQuery,
    ) -> Result<Vec<ApplicableCoupon>, ServiceError> {
        let reference = query.reference_time()?;
        let total_item_price = query.total_item_price();

        let candidates = Coupon::find()
            .filter(coupon::Column::ExpiryDate.gt(reference))
            .filter(coupon::Column::MinOrderValue.lte(total_item_price))
            .all(&*self.db)
            .await?;

        let mut applicable = Vec::new();
        for candidate in candidates {
            let categories = candidate.category_set();
            let cart_categories = query.cart_items.iter().map(|item| item.category.as_str());
            if !discounts::matches_cart(&categories, cart_categories) {
                continue;
            }

            let discount = discounts::listing_discount(
                &candidate.discount_type,
                candidate.discount_value,
                query.order_total,
            );
            applicable.push(ApplicableCoupon {
                coupon_code: candidate.coupon_code,
                discount_value: discounts::format_amount(discount),
            });
        }

        Ok(applicable)
    }

    /// Validates a single named coupon for a user and computes its
    /// item/charges discount split.
    ///
    /// Every not-applicable outcome (unknown code, below the minimum order
    /// value, expired, category mismatch, exhausted one-time use) collapses
    /// to the zero breakdown rather than an error; a coupon whose genuine
    /// discount computes to exactly zero is therefore indistinguishable
    /// from an invalid one.
    #[instrument(skip(self, query), fields(coupon_code = %query.coupon_code))]
    pub async fn validate_coupon(
        &self,
        query: &CouponQuery,
        user_id: Uuid,
    ) -> Result<DiscountBreakdown, ServiceError> {
        let reference = query.reference_time()?;
        let total_item_price = query.total_item_price();

        let found = Coupon::find()
            .filter(coupon::Column::CouponCode.eq(query.coupon_code.as_str()))
            .filter(coupon::Column::MinOrderValue.lte(total_item_price))
            .filter(coupon::Column::ExpiryDate.gt(reference))
            .one(&*self.db)
            .await?;

        let found = match found {
            Some(model) => model,
            None => return Ok(DiscountBreakdown::ZERO),
        };

        let cart_categories = query.cart_items.iter().map(|item| item.category.as_str());
        if !discounts::matches_cart(&found.category_set(), cart_categories) {
            return Ok(DiscountBreakdown::ZERO);
        }

        // Usage gate: only the one-time/multi-use distinction is enforced.
        // max_usage_per_user is stored but not consulted here.
        let usage_count = order::Entity::find()
            .filter(order::Column::CouponCodeUsed.eq(query.coupon_code.as_str()))
            .filter(order::Column::UserId.eq(user_id))
            .count(&*self.db)
            .await?;

        if found.usage_type == "one-time" && usage_count >= 1 {
            warn!(
                coupon_code = %found.coupon_code,
                %user_id,
                "one-time coupon already consumed"
            );
            return Ok(DiscountBreakdown::ZERO);
        }

        Ok(discounts::split_discount(
            &found.discount_type,
            found.discount_value,
            total_item_price,
            query.order_total,
        ))
    }

    /// Full catalog, cache-first. Misses fall through to the store and
    /// repopulate the cache entry.
    #[instrument(skip(self))]
    pub async fn all_coupons(&self) -> Result<Vec<CouponView>, ServiceError> {
        if let Some(raw) = self.catalog_cache.get(CATALOG_KEY) {
            match serde_json::from_str::<Vec<CouponView>>(&raw) {
                Ok(coupons) => return Ok(coupons),
                Err(err) => {
                    warn!("Discarding undecodable cached catalog: {}", err);
                    self.catalog_cache.invalidate(CATALOG_KEY);
                }
            }
        }

        let coupons: Vec<CouponView> = Coupon::find()
            .all(&*self.db)
            .await?
            .into_iter()
            .map(CouponView::from)
            .collect();

        let serialized = serde_json::to_string(&coupons)
            .map_err(|err| ServiceError::SerializationError(err.to_string()))?;
        self.catalog_cache.insert(CATALOG_KEY, serialized);

        Ok(coupons)
    }
}
