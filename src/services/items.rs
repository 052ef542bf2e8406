use crate::{
    entities::item::{self, Entity as Item},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateItemInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 255))]
    pub category: String,
    pub price: Decimal,
}

/// Optional narrowing of the item listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemFilter {
    pub id: Option<Uuid>,
    pub category: Option<String>,
}

/// Service for the item catalog.
#[derive(Clone)]
pub struct ItemService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

impl ItemService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_item(&self, input: CreateItemInput) -> Result<item::Model, ServiceError> {
        let model = item::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            category: Set(input.category),
            price: Set(input.price),
            created_at: Set(Utc::now()),
        };

        let created = model.insert(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::ItemAdded(created.id))
            .await;

        info!("Added item {}", created.id);
        Ok(created)
    }

    /// Lists items, optionally narrowed by id and/or exact category.
    #[instrument(skip(self))]
    pub async fn list_items(&self, filter: ItemFilter) -> Result<Vec<item::Model>, ServiceError> {
        let mut query = Item::find();
        if let Some(id) = filter.id {
            query = query.filter(item::Column::Id.eq(id));
        }
        if let Some(category) = filter.category.filter(|c| !c.is_empty()) {
            query = query.filter(item::Column::Category.eq(category));
        }

        let items = query
            .order_by_asc(item::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        Ok(items)
    }
}
