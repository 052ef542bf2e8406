use crate::{
    entities::order,
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

/// Order placement payload. `coupon_code_used` links the order into the
/// coupon usage history.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateOrderInput {
    pub user_id: Uuid,
    #[serde(default)]
    pub order_status: Option<String>,
    #[serde(default)]
    pub coupon_code_used: Option<String>,
    #[serde(default)]
    pub amount_paid: Decimal,
}

/// Service for placing orders.
#[derive(Clone)]
pub struct OrderService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

impl OrderService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, input), fields(user_id = %input.user_id))]
    pub async fn create_order(&self, input: CreateOrderInput) -> Result<order::Model, ServiceError> {
        let model = order::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id),
            order_status: Set(input.order_status.unwrap_or_else(|| "placed".to_string())),
            ordered_at: Set(Utc::now()),
            coupon_code_used: Set(input.coupon_code_used),
            amount_paid: Set(input.amount_paid),
        };

        let created = model.insert(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::OrderCreated(created.id))
            .await;

        info!("Placed order {}", created.id);
        Ok(created)
    }
}
